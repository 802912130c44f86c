//! Leave ledger endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    LeaveBulkCreate, LeaveBulkResult, LeaveEntry, LeaveEntryCreate, LeaveEntryUpdate,
};

use super::{ApiResult, IdPath, JsonBody};
use crate::state::AppState;
use crate::util::{parse_date, parse_optional_date};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/employees/leave", get(list).post(create))
        .route("/api/employees/leave/bulk", post(bulk_create))
        .route("/api/employees/leave/{id}", put(update).delete(delete))
}

async fn list(State(state): State<AppState>) -> ApiResult<Vec<LeaveEntry>> {
    Ok(Json(state.leave.list_entries().await?))
}

async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LeaveEntryCreate>,
) -> Result<(StatusCode, Json<LeaveEntry>), AppError> {
    let employee_id = payload.employee_id.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "employeeId is required")
            .with_detail("field", "employeeId")
    })?;
    let leave_date = parse_optional_date("leaveDate", payload.leave_date.as_deref())?;

    let entry = state.leave.add_entry(employee_id, leave_date).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<LeaveEntryUpdate>,
) -> ApiResult<LeaveEntry> {
    let leave_date = parse_optional_date("leaveDate", payload.leave_date.as_deref())?;
    let entry = state
        .leave
        .update_entry(id, payload.employee_id, leave_date)
        .await?;
    Ok(Json(entry))
}

async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    state.leave.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LeaveBulkCreate>,
) -> Result<(StatusCode, Json<LeaveBulkResult>), AppError> {
    let start = parse_date("startDate", &payload.start_date)?;
    let end = parse_date("endDate", &payload.end_date)?;

    let result = state
        .leave
        .bulk_add(&payload.employee_ids, start, end)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}
