pub mod intake;
pub mod types;

pub use intake::{validate, IntakeError, ReferralSubmission};
pub use types::{NewReferral, Referral};
