//! `/api/*` handlers. Each one extracts its typed body and hands it to the
//! matching service; errors render through [`ApiError`](crate::error::ApiError).

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    error::ApiResult,
    extract::ApiJson,
    requests::{
        BulkEmail, MakeCall, Newsletter, PostPhoto, RemoteCommand, RemoteCommands, SendEmail,
        SendHtmlEmail, SendSms, SendWhatsApp, SendWhatsAppTo, TemplateEmail,
    },
    services::BatchSummary,
    state::GatewayState,
};

type AppState = State<Arc<GatewayState>>;
type JsonValue = Json<serde_json::Value>;

/// Every POST route the gateway serves.
pub const ENDPOINTS: &[&str] = &[
    "/api/send_sms",
    "/api/make_call",
    "/api/post_instagram",
    "/api/remote_command",
    "/api/remote_commands",
    "/api/send_whatsapp",
    "/api/send_whatsapp_twilio",
    "/api/send_whatsapp_instant",
    "/api/send_gmail",
    "/api/send_gmail_html",
    "/api/send_gmail_bulk",
    "/api/send_gmail_template",
    "/api/send_gmail_newsletter",
];

// ── Telephony ───────────────────────────────────────────────────────────────

pub async fn send_sms(State(state): AppState, ApiJson(req): ApiJson<SendSms>) -> ApiResult<JsonValue> {
    Ok(Json(state.services.telephony.send_sms(req).await?))
}

pub async fn make_call(State(state): AppState, ApiJson(req): ApiJson<MakeCall>) -> ApiResult<JsonValue> {
    Ok(Json(state.services.telephony.make_call(req).await?))
}

// ── Instagram ───────────────────────────────────────────────────────────────

pub async fn post_instagram(
    State(state): AppState,
    ApiJson(req): ApiJson<PostPhoto>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.social.post_photo(req).await?))
}

// ── Remote execution ────────────────────────────────────────────────────────

pub async fn remote_command(
    State(state): AppState,
    ApiJson(req): ApiJson<RemoteCommand>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.remote.run(req).await?))
}

pub async fn remote_commands(
    State(state): AppState,
    ApiJson(req): ApiJson<RemoteCommands>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.remote.run_many(req).await?))
}

// ── WhatsApp ────────────────────────────────────────────────────────────────

pub async fn send_whatsapp(
    State(state): AppState,
    ApiJson(req): ApiJson<SendWhatsApp>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.whatsapp.send_default(req).await?))
}

pub async fn send_whatsapp_twilio(
    State(state): AppState,
    ApiJson(req): ApiJson<SendWhatsAppTo>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.whatsapp.send_twilio(req).await?))
}

pub async fn send_whatsapp_instant(
    State(state): AppState,
    ApiJson(req): ApiJson<SendWhatsAppTo>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.whatsapp.send_instant(req).await?))
}

// ── Mail ────────────────────────────────────────────────────────────────────

pub async fn send_gmail(State(state): AppState, ApiJson(req): ApiJson<SendEmail>) -> ApiResult<JsonValue> {
    Ok(Json(state.services.mail.send(req).await?))
}

pub async fn send_gmail_html(
    State(state): AppState,
    ApiJson(req): ApiJson<SendHtmlEmail>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.mail.send_html(req).await?))
}

pub async fn send_gmail_bulk(
    State(state): AppState,
    ApiJson(req): ApiJson<BulkEmail>,
) -> ApiResult<Json<BatchSummary>> {
    Ok(Json(state.services.mail.send_bulk(req).await?))
}

pub async fn send_gmail_template(
    State(state): AppState,
    ApiJson(req): ApiJson<TemplateEmail>,
) -> ApiResult<JsonValue> {
    Ok(Json(state.services.mail.send_template(req).await?))
}

pub async fn send_gmail_newsletter(
    State(state): AppState,
    ApiJson(req): ApiJson<Newsletter>,
) -> ApiResult<Json<BatchSummary>> {
    Ok(Json(state.services.mail.send_newsletter(req).await?))
}
