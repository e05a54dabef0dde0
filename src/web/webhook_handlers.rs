// src/web/webhook_handlers.rs
use crate::{
    error::AppResult,
    models::lead::WebhookLeadPayload,
    services::lead_service::{self, EntradaLead},
    state::AppState,
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};

/// POST /webhook/leads: entrada de leads de formulários e campanhas.
/// Sem corretor elegível o lead é aceite na mesma (`distribuido: false`).
pub async fn receber_lead(
    State(state): State<AppState>,
    Json(payload): Json<WebhookLeadPayload>,
) -> AppResult<(StatusCode, Json<EntradaLead>)> {
    let entrada =
        lead_service::receber_webhook(&state.db_pool, payload, state.config.roleta_automatica)
            .await?;

    if let Some(rodada) = &entrada.rodada {
        state.publicar_rodada(rodada).await;
    }
    Ok((StatusCode::CREATED, Json(entrada)))
}
