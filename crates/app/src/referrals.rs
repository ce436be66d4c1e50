use axum::{extract::State, http::StatusCode, Json};
use metrics::counter;
use tracing::{error, info, warn};

use referral_core::intake::{self, ReferralSubmission};
use referral_core::types::Referral;
use referral_mail::ReferralNotice;

use crate::error::ErrorResponse;
use crate::router::AppState;

/// Handles `POST /referrals`: validate, persist, then notify the referee.
///
/// The notification send is awaited but best-effort: once the row is
/// written the response is 201 regardless of relay outcome.
pub async fn create(
    State(state): State<AppState>,
    Json(submission): Json<ReferralSubmission>,
) -> Result<(StatusCode, Json<Referral>), ErrorResponse> {
    let accepted = match intake::validate(submission) {
        Ok(accepted) => accepted,
        Err(err) => {
            counter!("referral_requests_total", "outcome" => "rejected").increment(1);
            return Err(ErrorResponse::bad_request(err.to_string()));
        }
    };

    let referral = state
        .storage()
        .referrals()
        .insert(&accepted, state.now())
        .await
        .map_err(|err| {
            error!(stage = "store", error = %err, "failed to persist referral");
            counter!("referral_requests_total", "outcome" => "store_failed").increment(1);
            ErrorResponse::internal()
        })?;

    info!(
        stage = "store",
        referral_id = %referral.id,
        course = %referral.course,
        "referral recorded"
    );

    let notice = ReferralNotice {
        referee: &referral.referee,
        referrer: &referral.referrer,
        course: &referral.course,
    };
    match state
        .mailer()
        .send_referral_notice(&referral.email, &notice)
        .await
    {
        Ok(()) => {
            counter!("referral_notifications_total", "result" => "sent").increment(1);
        }
        Err(err) => {
            warn!(
                stage = "notify",
                referral_id = %referral.id,
                error = %err,
                "confirmation email failed"
            );
            counter!("referral_notifications_total", "result" => "error").increment(1);
        }
    }

    counter!("referral_requests_total", "outcome" => "created").increment(1);
    Ok((StatusCode::CREATED, Json(referral)))
}
