use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use myrun_core::AppError;
use myrun_domain::RunId;

use crate::dto::{RunListItemResponse, RunResponse};
use crate::error::ApiResult;
use crate::state::AppState;

mod form;

use form::read_create_run_form;

pub async fn list_runs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RunListItemResponse>>> {
    let runs = state
        .run_service
        .list_runs()
        .await?
        .into_iter()
        .map(RunListItemResponse::from)
        .collect();

    Ok(Json(runs))
}

pub async fn create_run_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<RunResponse>)> {
    let multipart = multipart.map_err(|rejection| {
        AppError::Validation(format!("expected a multipart form: {rejection}"))
    })?;
    let input = read_create_run_form(multipart).await?;

    let record = state.run_service.create_run(input).await?;

    Ok((StatusCode::CREATED, Json(RunResponse::from(record))))
}

pub async fn delete_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<StatusCode> {
    let run_id = run_id.parse::<RunId>()?;
    state.run_service.delete_run(run_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
