use crate::AppState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use trueself_core::{dispatch, ErrorBody, NarrativeRequest, RoastText, TrackRequest};
use trueself_quiz::{resolve as resolve_archetype, Resolution, ScoreVector};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// `POST /api/resolve` body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolveRequest {
    /// Score per dimension key
    pub scores: HashMap<String, i32>,
}

/// `POST /api/resolve` response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolveResponse {
    /// Archetype and ranking
    #[serde(flatten)]
    pub resolution: Resolution,
    /// Normalized scores
    pub scores: ScoreVector,
}

fn json<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

fn error(status: u16, message: impl Into<String>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json(
        &ErrorBody {
            error: message.into(),
        },
        status,
    )
}

pub(crate) async fn generate_result(
    request: NarrativeRequest,
    state: AppState,
) -> Result<Response, Infallible> {
    tracing::info!(archetype = %request.archetype.name, "generate-result");
    Ok(match state.narrator.roast(&request).await {
        Ok(text) => json(&RoastText { text }, StatusCode::OK),
        Err(e) => {
            tracing::error!(error = %e, "generate-result failed");
            error(e.status_code(), e.user_message())
        }
    })
}

pub(crate) async fn generate_report(
    request: NarrativeRequest,
    state: AppState,
) -> Result<Response, Infallible> {
    tracing::info!(archetype = %request.archetype.name, "generate-report");
    Ok(match state.narrator.report(&request).await {
        Ok(report) => json(&report, StatusCode::OK),
        Err(e) => {
            tracing::error!(error = %e, "generate-report failed");
            error(e.status_code(), e.user_message())
        }
    })
}

pub(crate) async fn track_referral(
    request: TrackRequest,
    state: AppState,
) -> Result<Response, Infallible> {
    let action = request.action.clone();
    Ok(match dispatch(state.referrals.as_ref(), request).await {
        Ok(response) => json(&response, StatusCode::OK),
        Err(e) => {
            tracing::warn!(action = %action, error = %e, "track-referral rejected");
            error(e.status_code(), e.user_message())
        }
    })
}

pub(crate) async fn resolve(request: ResolveRequest) -> Result<Response, Infallible> {
    let entries = request.scores.iter().map(|(k, v)| (k.as_str(), *v));
    Ok(match ScoreVector::from_entries(entries) {
        Ok(scores) => json(
            &ResolveResponse {
                resolution: resolve_archetype(&scores),
                scores,
            },
            StatusCode::OK,
        ),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed scores");
            error(422, e.to_string())
        }
    })
}

pub(crate) async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(error(404, "Not found"));
    }
    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        return Ok(error(400, e.to_string()));
    }
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error(413, "Payload too large"));
    }
    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error(415, "Unsupported media type"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error(405, "Method not allowed"));
    }
    if let Some(e) = err.find::<warp::filters::cors::CorsForbidden>() {
        return Ok(error(403, e.to_string()));
    }

    tracing::error!(rejection = ?err, "unhandled rejection");
    Ok(error(500, "Unknown error"))
}
