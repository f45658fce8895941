// ── Input validation and display formatting ──
//
// Pure functions over form input. Facades run `validate_pet` /
// `validate_tutor` before any network call.

use crate::error::CoreError;
use crate::model::{PetInput, TutorInput};

const MAX_NAME_LEN: usize = 100;

/// Strip everything except ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

// ── CPF ──────────────────────────────────────────────────────────────

/// Check a Brazilian CPF number. Punctuation is ignored.
pub fn is_valid_cpf(s: &str) -> bool {
    let digits: Vec<u32> = digits_only(s)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Mod-11 check digit over `prefix`, weighting from `len + 1` down to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = u32::try_from(prefix.len()).unwrap_or(0) + 1;
    let sum: u32 = prefix
        .iter()
        .zip((2..=top).rev())
        .map(|(d, w)| d * w)
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 { 0 } else { rest }
}

/// Format as `000.000.000-00`. Input without 11 digits is returned as-is.
pub fn format_cpf(s: &str) -> String {
    let d = digits_only(s);
    if d.len() != 11 {
        return s.to_owned();
    }
    format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..])
}

// ── Email ────────────────────────────────────────────────────────────

pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

// ── Phone ────────────────────────────────────────────────────────────

/// Landline (10 digits) or mobile (11 digits), area code included.
pub fn is_valid_phone(s: &str) -> bool {
    matches!(digits_only(s).len(), 10 | 11)
}

/// Format as `(00) 0000-0000` or `(00) 00000-0000`.
pub fn format_phone(s: &str) -> String {
    let d = digits_only(s);
    match d.len() {
        10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        11 => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
        _ => s.to_owned(),
    }
}

// ── Form validation ──────────────────────────────────────────────────

fn validate_name(name: &str) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_pet(input: &PetInput) -> Result<(), CoreError> {
    validate_name(&input.name)
}

pub fn validate_tutor(input: &TutorInput) -> Result<(), CoreError> {
    validate_name(&input.name)?;

    if input.phone.trim().is_empty() {
        return Err(CoreError::validation("Phone is required"));
    }
    if !is_valid_phone(&input.phone) {
        return Err(CoreError::validation("Phone must have 10 or 11 digits"));
    }
    if let Some(email) = non_blank(input.email.as_deref()) {
        if !is_valid_email(email) {
            return Err(CoreError::validation(format!("Invalid email: {email}")));
        }
    }
    if let Some(cpf) = non_blank(input.cpf.as_deref()) {
        if !is_valid_cpf(cpf) {
            return Err(CoreError::validation(format!("Invalid CPF: {cpf}")));
        }
    }
    Ok(())
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cpf_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("1234"));
    }

    #[test]
    fn cpf_formatting() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.com.br"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana@example..com"));
        assert!(!is_valid_email("ana maria@example.com"));
    }

    #[test]
    fn phone_lengths_and_format() {
        assert!(is_valid_phone("(65) 3333-4444"));
        assert!(is_valid_phone("65999991234"));
        assert!(!is_valid_phone("999991234"));
        assert_eq!(format_phone("6533334444"), "(65) 3333-4444");
        assert_eq!(format_phone("65999991234"), "(65) 99999-1234");
        assert_eq!(format_phone("12"), "12");
    }

    #[test]
    fn pet_name_rules() {
        let mut input = PetInput {
            name: "   ".into(),
            ..PetInput::default()
        };
        assert_eq!(
            validate_pet(&input).unwrap_err().to_string(),
            "Name is required"
        );

        input.name = "x".repeat(101);
        assert!(validate_pet(&input).is_err());

        input.name = "Rex".into();
        assert!(validate_pet(&input).is_ok());
    }

    #[test]
    fn tutor_reports_first_bad_field() {
        let mut input = TutorInput {
            name: "Ana".into(),
            phone: "123".into(),
            email: Some("not-an-email".into()),
            ..TutorInput::default()
        };
        assert_eq!(
            validate_tutor(&input).unwrap_err().to_string(),
            "Phone must have 10 or 11 digits"
        );

        input.phone = "(65) 99999-1234".into();
        assert!(validate_tutor(&input).unwrap_err().to_string().contains("email"));

        input.email = Some(String::new());
        input.cpf = Some("529.982.247-25".into());
        assert!(validate_tutor(&input).is_ok());
    }
}
