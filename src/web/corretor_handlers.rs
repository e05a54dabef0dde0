// src/web/corretor_handlers.rs
use crate::{
    error::AppResult,
    models::corretor::{AlterarRoletaPayload, Corretor, NovoCorretorPayload},
    services::corretor_service,
    state::AppState,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

// GET /api/corretores
pub async fn listar(State(state): State<AppState>) -> AppResult<Json<Vec<Corretor>>> {
    let corretores = corretor_service::listar_corretores(&state.db_pool).await?;
    Ok(Json(corretores))
}

// POST /api/corretores
pub async fn criar(
    State(state): State<AppState>,
    Json(payload): Json<NovoCorretorPayload>,
) -> AppResult<impl IntoResponse> {
    let corretor = corretor_service::criar_corretor(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(corretor)))
}

// PATCH /api/corretores/{id}/roleta  { "ativa": true }
pub async fn alterar_roleta(
    State(state): State<AppState>,
    Path(corretor_id): Path<String>,
    Json(payload): Json<AlterarRoletaPayload>,
) -> AppResult<Json<Corretor>> {
    let corretor =
        corretor_service::alterar_roleta(&state.db_pool, &corretor_id, payload.ativa).await?;
    Ok(Json(corretor))
}
