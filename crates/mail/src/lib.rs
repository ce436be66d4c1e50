pub mod client;

pub use client::{MailClient, MailError, ReferralNotice};
