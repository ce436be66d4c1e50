use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A referral as persisted and returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    pub id: String,
    pub referrer: String,
    pub referee: String,
    pub email: String,
    pub course: String,
    pub created_at: DateTime<Utc>,
}

/// A validated referral submission ready for persistence.
///
/// Fields are private and the only constructor lives in [`crate::intake`],
/// so holding a value is proof every required field is present and
/// non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReferral {
    referrer: String,
    referee: String,
    email: String,
    course: String,
}

impl NewReferral {
    pub(crate) fn new(referrer: String, referee: String, email: String, course: String) -> Self {
        Self {
            referrer,
            referee,
            email,
            course,
        }
    }

    /// Name of the person making the referral.
    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    /// Name of the person being referred.
    pub fn referee(&self) -> &str {
        &self.referee
    }

    /// Notification destination for the referee.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Course identifier supplied by the caller.
    pub fn course(&self) -> &str {
        &self.course
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn referral_serializes_with_rfc3339_timestamp() {
        let referral = Referral {
            id: "r-1".to_string(),
            referrer: "Ana".to_string(),
            referee: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            course: "CS101".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&referral).expect("serialize");
        assert_eq!(json["id"], "r-1");
        assert_eq!(json["referrer"], "Ana");
        assert_eq!(json["referee"], "Bo");
        assert_eq!(json["email"], "bo@example.com");
        assert_eq!(json["course"], "CS101");
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn referral_round_trips_through_json() {
        let referral = Referral {
            id: "r-2".to_string(),
            referrer: "Ana".to_string(),
            referee: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            course: "CS101".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap(),
        };

        let json = serde_json::to_string(&referral).expect("serialize");
        let parsed: Referral = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, referral);
    }
}
