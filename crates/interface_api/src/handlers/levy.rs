//! Levy schedule handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Currency, LevyScheduleId, Money, RequestContext, SchemeId};
use domain_levy::{CreateScheduleRequest, ScheduleRemoval, UpdateScheduleRequest};

use crate::dto::levy::{
    CreateScheduleDto, ScheduleResponse, ScheduleWithPeriodsResponse, UpdateScheduleDto,
};
use crate::error::ApiError;
use crate::AppState;

fn ctx(scheme_id: Uuid) -> RequestContext {
    RequestContext::for_scheme(SchemeId::from_uuid(scheme_id))
}

/// Creates a levy schedule with its billing periods
pub async fn create_schedule(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Json(dto): Json<CreateScheduleDto>,
) -> Result<Json<ScheduleWithPeriodsResponse>, ApiError> {
    dto.validate()?;
    let currency = Currency::default();
    let request = CreateScheduleRequest {
        budget_year_start: dto.budget_year_start,
        budget_year_end: dto.budget_year_end,
        admin_fund_total: Money::new(dto.admin_fund_total, currency),
        capital_works_fund_total: Money::new(dto.capital_works_fund_total, currency),
        frequency: dto.frequency,
        periods_per_year: dto.periods_per_year,
        due_day: dto.due_day,
    };
    let created = state.billing.create_schedule(&ctx(scheme_id), request).await?;
    Ok(Json(created.into()))
}

/// Lists a scheme's levy schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let schedules = state.billing.list_schedules(&ctx(scheme_id)).await?;
    Ok(Json(schedules.into_iter().map(Into::into).collect()))
}

/// Fetches a schedule and its periods
pub async fn get_schedule(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScheduleWithPeriodsResponse>, ApiError> {
    let schedule = state
        .billing
        .get_schedule(&ctx(scheme_id), LevyScheduleId::from_uuid(id))
        .await?;
    Ok(Json(schedule.into()))
}

/// Updates a schedule's fund totals or due day
pub async fn update_schedule(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<UpdateScheduleDto>,
) -> Result<Json<ScheduleWithPeriodsResponse>, ApiError> {
    dto.validate()?;
    let currency = Currency::default();
    let request = UpdateScheduleRequest {
        admin_fund_total: dto.admin_fund_total.map(|a| Money::new(a, currency)),
        capital_works_fund_total: dto
            .capital_works_fund_total
            .map(|a| Money::new(a, currency)),
        due_day: dto.due_day,
    };
    let updated = state
        .billing
        .update_schedule(&ctx(scheme_id), LevyScheduleId::from_uuid(id), request)
        .await?;
    Ok(Json(updated.into()))
}

/// Removes a schedule, deactivating it when levy items exist
pub async fn remove_schedule(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removal = state
        .billing
        .remove_schedule(&ctx(scheme_id), LevyScheduleId::from_uuid(id))
        .await?;
    let result = match removal {
        ScheduleRemoval::Deactivated => "deactivated",
        ScheduleRemoval::Deleted => "deleted",
    };
    Ok(Json(serde_json::json!({ "result": result })))
}
