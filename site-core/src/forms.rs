use std::sync::OnceLock;

use regex::Regex;

use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Required,
    InvalidEmail,
    InvalidPhone,
}

impl FieldProblem {
    pub fn message(&self, language: &Language) -> &'static str {
        let english = *language == Language::ENGLISH;
        match (self, english) {
            (FieldProblem::Required, true) => "This field is required",
            (FieldProblem::Required, false) => "ఈ ఫీల్డ్ అవసరం",
            (FieldProblem::InvalidEmail, true) => "Please enter a valid email address",
            (FieldProblem::InvalidEmail, false) => {
                "దయచేసి చెల్లుబాటు అయ్యే ఇమెయిల్ చిరునామా నమోదు చేయండి"
            }
            (FieldProblem::InvalidPhone, true) => "Please enter a valid phone number",
            (FieldProblem::InvalidPhone, false) => {
                "దయచేసి చెల్లుబాటు అయ్యే ఫోన్ నంబర్ నమోదు చేయండి"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
    pub message: String,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone regex"))
}

fn phone_is_valid(value: &str) -> bool {
    let digits: String = value
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(*c, '-' | '(' | ')')))
        .collect();
    phone_pattern().is_match(&digits)
}

/// Checks one field on its trimmed value. Format checks only apply to
/// non-empty input.
pub fn validate_field(field: &FieldSpec, language: &Language) -> Result<(), FieldError> {
    let value = field.value.trim();
    let problem = if field.required && value.is_empty() {
        Some(FieldProblem::Required)
    } else if value.is_empty() {
        None
    } else {
        match field.kind {
            FieldKind::Email if !email_pattern().is_match(value) => Some(FieldProblem::InvalidEmail),
            FieldKind::Tel if !phone_is_valid(value) => Some(FieldProblem::InvalidPhone),
            _ => None,
        }
    };

    match problem {
        Some(problem) => Err(FieldError {
            field: field.name.clone(),
            problem,
            message: problem.message(language).to_string(),
        }),
        None => Ok(()),
    }
}

/// Every error in the form; empty means the form may be submitted.
pub fn validate_form(fields: &[FieldSpec], language: &Language) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| validate_field(field, language).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind, required: bool, value: &str) -> FieldSpec {
        FieldSpec {
            value: value.into(),
            ..FieldSpec::new("f", kind, required)
        }
    }

    #[test]
    fn required_uses_trimmed_value() {
        let err = validate_field(&field(FieldKind::Text, true, "   "), &Language::ENGLISH).unwrap_err();
        assert_eq!(err.problem, FieldProblem::Required);
        assert_eq!(err.message, "This field is required");
        assert!(validate_field(&field(FieldKind::Text, false, ""), &Language::ENGLISH).is_ok());
    }

    #[test]
    fn email_format() {
        assert!(validate_field(&field(FieldKind::Email, true, "a@b.in"), &Language::ENGLISH).is_ok());
        let err = validate_field(&field(FieldKind::Email, false, "a@b"), &Language::TELUGU).unwrap_err();
        assert_eq!(err.problem, FieldProblem::InvalidEmail);
        assert!(err.message.starts_with("దయచేసి"));
    }

    #[test]
    fn phone_format_ignores_separators() {
        assert!(validate_field(&field(FieldKind::Tel, true, "+91 (98480) 22-338"), &Language::ENGLISH).is_ok());
        assert!(validate_field(&field(FieldKind::Tel, true, "0123"), &Language::ENGLISH).is_err());
        assert!(validate_field(&field(FieldKind::Tel, true, "12345678901234567"), &Language::ENGLISH).is_err());
    }

    #[test]
    fn form_collects_every_error() {
        let fields = vec![
            FieldSpec::new("name", FieldKind::Text, true),
            field(FieldKind::Email, true, "nope"),
            field(FieldKind::Tel, false, ""),
        ];
        let errors = validate_form(&fields, &Language::ENGLISH);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
    }
}
