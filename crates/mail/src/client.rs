use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Client for the outbound transactional-mail relay.
///
/// The relay account identity and credential are supplied once at process
/// start; every send reuses the same authenticated HTTP client.
#[derive(Clone)]
pub struct MailClient {
    http: Client,
    base_url: Url,
    sender: String,
    auth_token: String,
}

impl MailClient {
    /// Creates a new mail client with the provided configuration.
    pub fn new(
        base_url: Url,
        sender: impl Into<String>,
        auth_token: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            http,
            base_url,
            sender: sender.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Delivers the referral confirmation message to `to`.
    ///
    /// One attempt, no retry; a non-2xx relay response surfaces as
    /// [`MailError::Status`].
    pub async fn send_referral_notice(
        &self,
        to: &str,
        notice: &ReferralNotice<'_>,
    ) -> Result<(), MailError> {
        let url = self.base_url.join("email")?;
        let text_body = notice.text_body();
        let body = OutgoingEmail {
            from: &self.sender,
            to,
            subject: ReferralNotice::SUBJECT,
            text_body: &text_body,
        };

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&body)
            .send()
            .await?;

        ensure_success(response).await
    }
}

/// Context rendered into the confirmation message sent to the referee.
pub struct ReferralNotice<'a> {
    pub referee: &'a str,
    pub referrer: &'a str,
    pub course: &'a str,
}

impl ReferralNotice<'_> {
    pub const SUBJECT: &'static str = "Course Referral";

    /// Renders the plain-text message body.
    pub fn text_body(&self) -> String {
        format!(
            "Hi {},\n\nYou have been referred by {} for the {} course.\n\nBest regards,\nThe Course Team",
            self.referee, self.referrer, self.course
        )
    }
}

#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

/// Errors produced by the mail client.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("failed to build url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

async fn ensure_success(response: Response) -> Result<(), MailError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<unavailable>"));
        return Err(MailError::Status { status, body });
    }
    Ok(())
}
