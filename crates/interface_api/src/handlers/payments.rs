//! Payment handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Currency, LotId, Money, PaymentId, RequestContext, SchemeId};
use domain_levy::RecordPaymentRequest;

use crate::dto::levy::{
    AllocationResponse, OverdueSweepDto, OverdueSweepResponse, PaymentDetailResponse,
    PaymentListQuery, PaymentReceiptResponse, PaymentResponse, RecordPaymentDto,
};
use crate::error::ApiError;
use crate::AppState;

fn ctx(scheme_id: Uuid) -> RequestContext {
    RequestContext::for_scheme(SchemeId::from_uuid(scheme_id))
}

/// Records a payment and allocates it FIFO across outstanding levy items
///
/// A partially-persisted allocation state comes back as a receipt with a
/// warning, never as an error, because the payment itself is already
/// recorded at that point.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Json(dto): Json<RecordPaymentDto>,
) -> Result<Json<PaymentReceiptResponse>, ApiError> {
    dto.validate()?;
    let request = RecordPaymentRequest {
        lot_id: LotId::from_uuid(dto.lot_id),
        amount: Money::new(dto.amount, Currency::default()),
        payment_date: dto.payment_date,
        method: dto.method,
        reference: dto.reference,
        notes: dto.notes,
    };
    let outcome = state.billing.record_payment(&ctx(scheme_id), request).await?;
    let warning = outcome.warning.clone();
    Ok(Json(PaymentReceiptResponse::from_receipt(
        outcome.value,
        warning,
    )))
}

/// Lists a lot's payments
pub async fn list_payments(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state
        .billing
        .list_payments(&ctx(scheme_id), LotId::from_uuid(query.lot_id))
        .await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Fetches a payment with its allocations
pub async fn get_payment(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PaymentDetailResponse>, ApiError> {
    let (payment, allocations) = state
        .billing
        .get_payment(&ctx(scheme_id), PaymentId::from_uuid(id))
        .await?;
    Ok(Json(PaymentDetailResponse {
        payment: payment.into(),
        allocations: allocations
            .into_iter()
            .map(AllocationResponse::from)
            .collect(),
    }))
}

/// Marks a lot's unpaid items past their due date as overdue
pub async fn sweep_overdue(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Json(dto): Json<OverdueSweepDto>,
) -> Result<Json<OverdueSweepResponse>, ApiError> {
    let updated = state
        .billing
        .refresh_overdue_items(&ctx(scheme_id), LotId::from_uuid(dto.lot_id), dto.as_of)
        .await?;
    Ok(Json(OverdueSweepResponse { updated }))
}
