// src/web/turno_handlers.rs
use crate::{
    error::AppResult,
    models::{
        plantao::{Plantao, PlantaoDetalhado, PlantaoPayload, PlantaoQuery},
        turno::{Turno, TurnoPayload},
    },
    services::turno_service,
    state::AppState,
    web::extract::QueryValida,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

// --- Turnos ---

pub async fn listar_turnos(State(state): State<AppState>) -> AppResult<Json<Vec<Turno>>> {
    Ok(Json(turno_service::listar_turnos(&state.db_pool).await?))
}

pub async fn criar_turno(
    State(state): State<AppState>,
    Json(payload): Json<TurnoPayload>,
) -> AppResult<impl IntoResponse> {
    let turno = turno_service::criar_turno(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(turno)))
}

pub async fn atualizar_turno(
    State(state): State<AppState>,
    Path(turno_id): Path<i64>,
    Json(payload): Json<TurnoPayload>,
) -> AppResult<Json<Turno>> {
    let turno = turno_service::atualizar_turno(&state.db_pool, turno_id, &payload).await?;
    Ok(Json(turno))
}

pub async fn remover_turno(
    State(state): State<AppState>,
    Path(turno_id): Path<i64>,
) -> AppResult<StatusCode> {
    turno_service::remover_turno(&state.db_pool, turno_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Plantão (quem está na roleta em cada turno/dia) ---

// GET /api/plantoes?data=2025-03-01&turno_id=1
pub async fn listar_plantao(
    State(state): State<AppState>,
    QueryValida(params): QueryValida<PlantaoQuery>,
) -> AppResult<Json<Vec<PlantaoDetalhado>>> {
    let entradas =
        turno_service::listar_plantao(&state.db_pool, params.data, params.turno_id).await?;
    Ok(Json(entradas))
}

pub async fn adicionar_plantao(
    State(state): State<AppState>,
    Json(payload): Json<PlantaoPayload>,
) -> AppResult<(StatusCode, Json<Plantao>)> {
    let plantao = turno_service::adicionar_plantao(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(plantao)))
}

pub async fn remover_plantao(
    State(state): State<AppState>,
    Path(plantao_id): Path<i64>,
) -> AppResult<StatusCode> {
    turno_service::remover_plantao(&state.db_pool, plantao_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
