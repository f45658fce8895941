//! Wire types for the pet registry backend.
//!
//! Field names follow the backend's Portuguese JSON keys; the Rust side
//! uses English names with `#[serde(rename)]`. Domain translation happens
//! in `petadmin-core::convert`.

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Page envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Zero-indexed page number echoed by the server.
    pub page: u32,
    pub size: u32,
    /// Total number of records matching the query.
    pub total: u64,
    pub page_count: u32,
    pub content: Vec<T>,
}

/// Query parameters shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    /// Name filter (`nome`), omitted when `None`.
    pub name: Option<String>,
}

impl ListQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(ref name) = self.name {
            params.push(("nome", name.clone()));
        }
        params
    }
}

// ── Authentication ───────────────────────────────────────────────────

/// Body of `POST /autenticacao/login`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ── Photos ───────────────────────────────────────────────────────────

/// Stored photo metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    pub content_type: String,
    pub url: String,
}

// ── Pets ─────────────────────────────────────────────────────────────

/// A pet as returned by `/v1/pets` endpoints.
///
/// `tutors` is only populated by the single-pet endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetResponse {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "raca", default)]
    pub breed: Option<String>,
    #[serde(rename = "idade", default)]
    pub age: Option<u32>,
    #[serde(rename = "foto", default)]
    pub photo: Option<PhotoResponse>,
    #[serde(rename = "tutores", default)]
    pub tutors: Vec<TutorResponse>,
}

/// Body of `POST /v1/pets` and `PUT /v1/pets/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "raca")]
    pub breed: String,
    #[serde(rename = "idade")]
    pub age: u32,
}

// ── Tutors ───────────────────────────────────────────────────────────

/// A tutor as returned by `/v1/tutores` endpoints.
///
/// `pets` is only populated by the single-tutor endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorResponse {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(rename = "foto", default)]
    pub photo: Option<PhotoResponse>,
    #[serde(default)]
    pub pets: Vec<PetResponse>,
}

/// Body of `POST /v1/tutores` and `PUT /v1/tutores/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
}

// ── Uploads ──────────────────────────────────────────────────────────

/// A file to send as the `foto` multipart field.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pet_detail_decodes_nested_tutors() {
        let body = json!({
            "id": 3,
            "nome": "Rex",
            "raca": "Vira-lata",
            "idade": 4,
            "foto": null,
            "tutores": [{ "id": 9, "nome": "Ana", "telefone": "65999990000" }]
        });
        let pet: PetResponse = serde_json::from_value(body).expect("decode");
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.tutors.len(), 1);
        assert_eq!(pet.tutors[0].phone.as_deref(), Some("65999990000"));
    }

    #[test]
    fn tutor_request_omits_absent_optionals() {
        let req = TutorRequest {
            name: "Ana".into(),
            email: None,
            phone: "65999990000".into(),
            address: None,
            cpf: None,
        };
        let value = serde_json::to_value(&req).expect("encode");
        assert_eq!(value, json!({ "nome": "Ana", "telefone": "65999990000" }));
    }

    #[test]
    fn list_query_skips_empty_name() {
        let query = ListQuery {
            page: 2,
            size: 10,
            name: None,
        };
        assert_eq!(
            query.params(),
            vec![("page", "2".to_owned()), ("size", "10".to_owned())]
        );
    }
}
