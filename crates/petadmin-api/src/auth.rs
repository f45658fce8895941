// Session authentication
//
// Username/password login against `/autenticacao/login`. The returned
// access token is installed on the client and sent as a bearer token on
// every later request.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{LoginRequest, LoginResponse};

impl ApiClient {
    /// Authenticate with username/password and install the access token.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url("autenticacao/login")?;
        debug!("logging in at {url}");

        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let tokens: LoginResponse = crate::client::handle_response(resp).await?;
        if tokens.access_token.is_empty() {
            return Err(Error::Authentication {
                message: "login response carried an empty access token".into(),
            });
        }

        self.set_token(SecretString::from(tokens.access_token.clone()));
        debug!(expires_in = ?tokens.expires_in, "login successful");
        Ok(tokens)
    }

    /// Drop the session token. The backend has no logout endpoint.
    pub fn logout(&self) {
        self.clear_token();
        debug!("session token cleared");
    }
}
