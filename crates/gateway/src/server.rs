use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    serde_json::json,
    switchboard_config::SwitchboardConfig,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{
    api::{self, ENDPOINTS},
    services::GatewayServices,
    state::GatewayState,
};

// ── Service wiring ───────────────────────────────────────────────────────────

/// Build the live services the compiled features allow.
///
/// Missing credentials keep the live service (each call answers 400). Any
/// other construction failure leaves the noop service in place (503).
#[cfg_attr(
    not(any(
        feature = "instagram",
        feature = "mail",
        feature = "sms",
        feature = "ssh",
        feature = "whatsapp"
    )),
    allow(unused_variables, unused_mut)
)]
pub fn build_services(config: &SwitchboardConfig) -> GatewayServices {
    let mut services = GatewayServices::noop();

    #[cfg(feature = "sms")]
    match crate::live::sms::LiveTelephonyService::from_config(&config.twilio) {
        Ok(live) => services = services.with_telephony(Arc::new(live)),
        Err(e) => tracing::warn!(error = %e, "sms service disabled"),
    }

    #[cfg(feature = "mail")]
    match crate::live::mail::LiveMailService::from_config(&config.mail) {
        Ok(live) => services = services.with_mail(Arc::new(live)),
        Err(e) => tracing::warn!(error = %e, "mail service disabled"),
    }

    #[cfg(feature = "instagram")]
    match crate::live::instagram::LiveSocialService::from_config(&config.instagram) {
        Ok(live) => services = services.with_social(Arc::new(live)),
        Err(e) => tracing::warn!(error = %e, "instagram service disabled"),
    }

    #[cfg(feature = "ssh")]
    {
        services = services.with_remote(Arc::new(
            crate::live::ssh::LiveRemoteService::from_config(&config.ssh),
        ));
    }

    #[cfg(feature = "whatsapp")]
    match crate::live::whatsapp::LiveWhatsAppService::from_config(config) {
        Ok(live) => services = services.with_whatsapp(Arc::new(live)),
        Err(e) => tracing::warn!(error = %e, "whatsapp service disabled"),
    }

    services
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/send_sms", post(api::send_sms))
        .route("/api/make_call", post(api::make_call))
        .route("/api/post_instagram", post(api::post_instagram))
        .route("/api/remote_command", post(api::remote_command))
        .route("/api/remote_commands", post(api::remote_commands))
        .route("/api/send_whatsapp", post(api::send_whatsapp))
        .route("/api/send_whatsapp_twilio", post(api::send_whatsapp_twilio))
        .route("/api/send_whatsapp_instant", post(api::send_whatsapp_instant))
        .route("/api/send_gmail", post(api::send_gmail))
        .route("/api/send_gmail_html", post(api::send_gmail_html))
        .route("/api/send_gmail_bulk", post(api::send_gmail_bulk))
        .route("/api/send_gmail_template", post(api::send_gmail_template))
        .route("/api/send_gmail_newsletter", post(api::send_gmail_newsletter))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start_gateway(bind: &str, port: u16, config: SwitchboardConfig) -> anyhow::Result<()> {
    let services = build_services(&config);
    let state = GatewayState::new(services);
    let statuses = state.services.statuses();
    let app = build_gateway_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let summary = statuses
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, status)| format!("{name}={}", status.as_str().unwrap_or("?")))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let lines = [
        format!("switchboard gateway v{}", state.version),
        format!("listening on http://{addr}"),
        format!("{} endpoints registered", ENDPOINTS.len()),
        format!("services: {summary}"),
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(json!({
        "message": "API is running!",
        "version": state.version,
        "endpoints": ENDPOINTS,
        "services": state.services.statuses(),
    }))
}

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": state.version,
        "uptime_secs": state.uptime_secs(),
    }))
}
