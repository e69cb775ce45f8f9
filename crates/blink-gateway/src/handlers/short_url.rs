use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, StatsResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::Json;
use blink_core::ShortCode;
use tracing::{error, info};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload?;

    let code = state.store().create(&request.original_url).await?;
    info!(code = %code, "short url created");

    let response = CreateUrlResponse {
        short_url: code.to_url(state.base_url()),
        stats_url: code.to_stats_url(state.base_url()),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Answers with `303 See Other` pointing at the original URL.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, [(header::HeaderName, HeaderValue); 1])> {
    let code = ShortCode::new(short_code)?;
    let original_url = state.store().resolve(&code).await?;
    let location = HeaderValue::try_from(original_url).map_err(|err| {
        error!(code = %code, error = %err, "stored url is not a valid location header");
        AppError::Internal
    })?;

    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]))
}

pub async fn stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let code = ShortCode::new(short_code)?;
    let num_redirects = state.store().stats(&code).await?;

    Ok(Json(StatsResponse {
        short_url: code.to_url(state.base_url()),
        num_redirects,
    }))
}
