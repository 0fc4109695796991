//! Handlers for inquiries: the public contact form, admin management and
//! the live admin stream.
//!
//! Every mutation publishes a [`TableChange`](convex_events::TableChange)
//! for the `inquiries` table. Stream subscribers answer each change by
//! re-reading the whole list, so a missed or duplicated notification only
//! costs an extra refresh.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use convex_core::error::CoreError;
use convex_core::inquiry::ContactForm;
use convex_core::types::DbId;
use convex_db::models::inquiry::{CreateInquiry, Inquiry, UpdateInquiryStatus};
use convex_db::repositories::InquiryRepo;
use convex_events::{ChangeKind, InquiryMail, MailPayload, RefreshAction};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use crate::captcha::CaptchaError;
use crate::error::{AppError, AppResult, ReportDbError};
use crate::handlers::publish_change;
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: &str = "inquiries";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Inquiry",
        id,
    })
}

// ---------------------------------------------------------------------------
// Public contact form
// ---------------------------------------------------------------------------

/// Request body for `POST /inquiries`.
#[derive(Debug, Deserialize)]
pub struct SubmitInquiry {
    #[serde(flatten)]
    pub form: ContactForm,
    /// Bot-challenge token from the site widget.
    #[serde(default)]
    pub captcha_token: Option<String>,
}

/// POST /api/v1/inquiries
///
/// Validate and store a contact-form submission, then notify the operator
/// by mail in the background. Mail failure never fails the request.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitInquiry>,
) -> AppResult<impl IntoResponse> {
    state
        .captcha
        .verify(input.captcha_token.as_deref())
        .await
        .map_err(|e| match e {
            CaptchaError::Missing | CaptchaError::Rejected(_) => {
                tracing::warn!(error = %e, "Captcha check failed");
                AppError::BadRequest("Please complete the captcha verification".into())
            }
            CaptchaError::Request(_) => {
                state.reporter.auth("verify captcha", &e);
                AppError::InternalError(e.to_string())
            }
        })?;

    let contact = input.form.validate()?;
    let energy_label = contact.energy_needs.map(|needs| needs.label().to_string());

    let inquiry = InquiryRepo::create(&state.pool, &CreateInquiry::from(contact))
        .await
        .reported(&state.reporter, "create inquiry")?;

    publish_change(&state, TABLE, ChangeKind::Insert, inquiry.id);
    tracing::info!(inquiry_id = inquiry.id, location = %inquiry.location, "Inquiry received");

    state
        .mailer
        .send_in_background(MailPayload::Inquiry(InquiryMail {
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            phone: inquiry.phone.clone(),
            location: inquiry.location.clone(),
            address: inquiry.address.clone(),
            energy_needs: energy_label,
            message: inquiry.message.clone(),
            received_at: inquiry.created_at,
        }
        .unescaped()));

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/inquiries
///
/// Newest first.
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let inquiries = InquiryRepo::list(&state.pool)
        .await
        .reported(&state.reporter, "list inquiries")?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/v1/admin/inquiries/{id}
pub async fn get_by_id(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inquiry = InquiryRepo::find_by_id(&state.pool, id)
        .await
        .reported(&state.reporter, "load inquiry")?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: inquiry }))
}

/// PATCH /api/v1/admin/inquiries/{id}/status
pub async fn update_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInquiryStatus>,
) -> AppResult<impl IntoResponse> {
    let inquiry = InquiryRepo::update_status(&state.pool, id, input.status)
        .await
        .reported(&state.reporter, "update inquiry status")?
        .ok_or_else(|| not_found(id))?;

    publish_change(&state, TABLE, ChangeKind::Update, id);
    tracing::info!(inquiry_id = id, status = %inquiry.status, "Inquiry status changed");

    Ok(Json(DataResponse { data: inquiry }))
}

/// DELETE /api/v1/admin/inquiries/{id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = InquiryRepo::delete(&state.pool, id)
        .await
        .reported(&state.reporter, "delete inquiry")?;
    if !deleted {
        return Err(not_found(id));
    }

    publish_change(&state, TABLE, ChangeKind::Delete, id);
    tracing::info!(inquiry_id = id, "Inquiry deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Live stream
// ---------------------------------------------------------------------------

/// One frame pushed to stream subscribers: always the complete list.
#[derive(Debug, Serialize)]
pub struct InquirySnapshot<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: &'a [Inquiry],
    pub sent_at: chrono::DateTime<Utc>,
}

/// GET /api/v1/admin/inquiries/stream
///
/// WebSocket upgrade. The client receives the full inquiry list on connect
/// and again after every change to the table.
pub async fn stream(
    _admin: AdminSession,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Inquiry stream connected");

    // Subscribe before the first read so no change slips between them.
    let mut changes = state.event_bus.subscribe();
    let (mut sink, mut stream) = socket.split();

    let sender_state = state.clone();
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        let mut refresh = true;
        loop {
            if refresh {
                if let Some(frame) = snapshot_frame(&sender_state).await {
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "Inquiry stream sink closed");
                        break;
                    }
                }
            }

            match RefreshAction::for_table(&changes.recv().await, TABLE) {
                RefreshAction::Refetch => refresh = true,
                RefreshAction::Ignore => refresh = false,
                RefreshAction::Stop => break,
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Inquiry stream receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Inquiry stream disconnected");
}

/// Serialize the current inquiry list, or `None` when it cannot be read.
async fn snapshot_frame(state: &AppState) -> Option<String> {
    let inquiries = match InquiryRepo::list(&state.pool).await {
        Ok(rows) => rows,
        Err(e) => {
            state.reporter.database("refresh inquiry stream", &e, None);
            return None;
        }
    };

    let snapshot = InquirySnapshot {
        kind: "inquiries",
        data: &inquiries,
        sent_at: Utc::now(),
    };
    match serde_json::to_string(&snapshot) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize inquiry snapshot");
            None
        }
    }
}
