//! Quotation generator for the admin panel.
//!
//! Quotations are not stored as documents. Issuing one draws a
//! `QTN-<year>-<NNN>` number, records it in the ledger (which rejects
//! numbers already used) and returns the rendered PDF.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use convex_core::error::CoreError;
use convex_core::quotation::{
    generate_quotation_number, QuotationForm, QuotationTotals, ValidatedQuotation,
};
use convex_core::quotation_document::{build_document, render_pdf, QuotationDocument};
use convex_core::types::ist_date;
use convex_db::models::quotation::CreateQuotationRecord;
use convex_db::repositories::QuotationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ReportDbError};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Numbers drawn before giving up on finding an unused one.
pub const MAX_NUMBER_ATTEMPTS: usize = 10;

/// Response header carrying the issued number alongside the PDF.
pub const QUOTATION_NUMBER_HEADER: &str = "x-quotation-number";

const DEFAULT_RECENT_LIMIT: i64 = 20;
const MAX_RECENT_LIMIT: i64 = 100;

#[derive(Debug, Serialize)]
pub struct QuotationPreview {
    pub quotation: ValidatedQuotation,
    pub totals: QuotationTotals,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

/// POST /api/v1/admin/quotations/preview
///
/// Validate the form and return the computed totals without issuing a number.
pub async fn preview(
    _admin: AdminSession,
    Json(form): Json<QuotationForm>,
) -> AppResult<Json<DataResponse<QuotationPreview>>> {
    let quotation = form.validate()?;
    let totals = quotation.costs.totals();
    Ok(Json(DataResponse {
        data: QuotationPreview { quotation, totals },
    }))
}

/// POST /api/v1/admin/quotations
///
/// Issue a quotation and return it as `application/pdf`.
pub async fn issue(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(form): Json<QuotationForm>,
) -> AppResult<impl IntoResponse> {
    let quotation = form.validate()?;
    let issue_date = ist_date(Utc::now());
    let totals = quotation.costs.totals();

    let mut issued = None;
    for attempt in 1..=MAX_NUMBER_ATTEMPTS {
        let number = generate_quotation_number(issue_date, &mut rand::rng());
        let record = CreateQuotationRecord {
            quotation_number: number.clone(),
            customer_name: quotation.customer.name.clone(),
            customer_phone: quotation.customer.phone.clone(),
            system_size: quotation.system.size_kw.clone(),
            subtotal: totals.subtotal,
            total: totals.total,
            issued_on: issue_date,
        };

        match QuotationRepo::try_record(&state.pool, &record)
            .await
            .reported(&state.reporter, "record quotation")?
        {
            Some(row) => {
                issued = Some(row);
                break;
            }
            None => tracing::debug!(attempt, number = %number, "Quotation number taken, redrawing"),
        }
    }

    let record = issued.ok_or_else(|| {
        tracing::warn!(issued_on = %issue_date, "No free quotation number after retries");
        AppError::Core(CoreError::Conflict(
            "Could not allocate a unique quotation number. Please try again".into(),
        ))
    })?;

    let document = build_document(&quotation, &record.quotation_number, issue_date);
    let pdf = render_pdf(&document);

    tracing::info!(
        quotation_number = %record.quotation_number,
        total = totals.total,
        size = pdf.len(),
        "Quotation issued",
    );

    Ok((
        StatusCode::CREATED,
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.pdf\"", record.quotation_number),
            ),
            (
                HeaderName::from_static(QUOTATION_NUMBER_HEADER),
                record.quotation_number.clone(),
            ),
        ],
        pdf,
    ))
}

/// POST /api/v1/admin/quotations/document
///
/// Lay out a quotation without issuing it, for an on-screen preview. The
/// number shown is a placeholder.
pub async fn preview_document(
    _admin: AdminSession,
    Json(form): Json<QuotationForm>,
) -> AppResult<Json<DataResponse<QuotationDocument>>> {
    let quotation = form.validate()?;
    let document = build_document(&quotation, "QTN-DRAFT", ist_date(Utc::now()));
    Ok(Json(DataResponse { data: document }))
}

/// GET /api/v1/admin/quotations?limit=
///
/// Most recently issued quotations, newest first.
pub async fn list_recent(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    let records = QuotationRepo::list_recent(&state.pool, limit)
        .await
        .reported(&state.reporter, "list quotations")?;
    Ok(Json(DataResponse { data: records }))
}
