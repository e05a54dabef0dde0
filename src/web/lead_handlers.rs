// src/web/lead_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        lead::{AlterarEtapaPayload, Lead, LeadsQuery, NovoLeadPayload},
        rodada::{OrigemDisparo, RodadaDistribuicao},
    },
    services::lead_service::{self, EntradaLead},
    state::AppState,
    web::extract::QueryValida,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

// POST /api/leads
pub async fn criar(
    State(state): State<AppState>,
    Json(payload): Json<NovoLeadPayload>,
) -> AppResult<(StatusCode, Json<EntradaLead>)> {
    let entrada =
        lead_service::registrar_entrada(&state.db_pool, &payload, OrigemDisparo::Manual).await?;
    if let Some(rodada) = &entrada.rodada {
        state.publicar_rodada(rodada).await;
    }
    Ok((StatusCode::CREATED, Json(entrada)))
}

// GET /api/leads?etapa=novo
pub async fn listar(
    State(state): State<AppState>,
    QueryValida(params): QueryValida<LeadsQuery>,
) -> AppResult<Json<Vec<Lead>>> {
    let leads = lead_service::listar_leads(&state.db_pool, params.etapa).await?;
    Ok(Json(leads))
}

pub async fn detalhe(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> AppResult<Json<Lead>> {
    lead_service::buscar_lead(&state.db_pool, &lead_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NaoEncontrado(format!("Lead '{}' não encontrado.", lead_id)))
}

// PATCH /api/leads/{id}/etapa  { "etapa": "visita" }
pub async fn alterar_etapa(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    Json(payload): Json<AlterarEtapaPayload>,
) -> AppResult<Json<Lead>> {
    let lead = lead_service::alterar_etapa(&state.db_pool, &lead_id, payload.etapa).await?;
    Ok(Json(lead))
}

/// POST /api/leads/{id}/distribuir: dispara a roleta manualmente para o lead.
/// 404 se o lead não existe, 409 se não há corretor elegível.
pub async fn distribuir(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> AppResult<Json<RodadaDistribuicao>> {
    tracing::debug!("POST /api/leads/{}/distribuir", lead_id);
    let rodada = lead_service::distribuir_lead(&state.db_pool, &lead_id, OrigemDisparo::Manual).await?;
    state.publicar_rodada(&rodada).await;
    Ok(Json(rodada))
}
