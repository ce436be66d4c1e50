use serde::Deserialize;
use thiserror::Error;

use crate::types::NewReferral;

/// Raw referral submission as received on the wire.
///
/// Every field is optional so that absent and `null` values deserialize
/// uniformly; [`validate`] decides what is actually acceptable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferralSubmission {
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

/// Errors produced when a submission fails intake validation.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl IntakeError {
    /// Names of the fields that failed the presence check.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
        }
    }
}

/// Checks required-field presence and normalizes the accepted values.
///
/// A field is missing when it is absent, `null`, empty, or whitespace-only.
/// Accepted values are trimmed of surrounding whitespace. All missing
/// fields are reported at once so the caller can name every problem in a
/// single response.
pub fn validate(submission: ReferralSubmission) -> Result<NewReferral, IntakeError> {
    let mut missing = Vec::new();

    let referrer = required(submission.referrer, "referrer", &mut missing);
    let referee = required(submission.referee, "referee", &mut missing);
    let email = required(submission.email, "email", &mut missing);
    let course = required(submission.course, "course", &mut missing);

    let (Some(referrer), Some(referee), Some(email), Some(course)) =
        (referrer, referee, email, course)
    else {
        return Err(IntakeError::MissingFields(missing));
    };

    Ok(NewReferral::new(referrer, referee, email, course))
}

fn required(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                missing.push(field);
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => {
            missing.push(field);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> ReferralSubmission {
        ReferralSubmission {
            referrer: Some("Ana".to_string()),
            referee: Some("Bo".to_string()),
            email: Some("bo@example.com".to_string()),
            course: Some("CS101".to_string()),
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        let accepted = validate(full_submission()).expect("should validate");
        assert_eq!(accepted.referrer(), "Ana");
        assert_eq!(accepted.referee(), "Bo");
        assert_eq!(accepted.email(), "bo@example.com");
        assert_eq!(accepted.course(), "CS101");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let mut submission = full_submission();
        submission.referrer = Some("  Ana ".to_string());
        submission.email = Some(" bo@example.com\n".to_string());

        let accepted = validate(submission).expect("should validate");
        assert_eq!(accepted.referrer(), "Ana");
        assert_eq!(accepted.email(), "bo@example.com");
    }

    #[test]
    fn rejects_when_a_field_is_absent() {
        let mut submission = full_submission();
        submission.email = None;

        let err = validate(submission).expect_err("should reject");
        assert_eq!(err.missing_fields(), ["email"]);
    }

    #[test]
    fn rejects_empty_and_whitespace_only_values() {
        let mut submission = full_submission();
        submission.referee = Some(String::new());
        submission.course = Some("   ".to_string());

        let err = validate(submission).expect_err("should reject");
        assert_eq!(err.missing_fields(), ["referee", "course"]);
    }

    #[test]
    fn reports_all_missing_fields_in_canonical_order() {
        let err = validate(ReferralSubmission::default()).expect_err("should reject");
        assert_eq!(
            err.missing_fields(),
            ["referrer", "referee", "email", "course"]
        );
        assert_eq!(
            err.to_string(),
            "missing required fields: referrer, referee, email, course"
        );
    }

    #[test]
    fn submission_deserializes_with_missing_and_null_fields() {
        let submission: ReferralSubmission =
            serde_json::from_str(r#"{"referrer": "Ana", "email": null}"#).expect("deserialize");
        assert_eq!(submission.referrer.as_deref(), Some("Ana"));
        assert!(submission.referee.is_none());
        assert!(submission.email.is_none());
        assert!(submission.course.is_none());
    }
}
