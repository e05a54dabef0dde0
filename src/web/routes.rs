// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        corretor_handlers, lead_handlers, mw_token, painel_handlers, turno_handlers,
        webhook_handlers,
    },
};
use axum::{
    middleware,
    response::Redirect,
    routing::{delete, get, patch, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(|| async { Redirect::permanent("/painel") }));

    // --- Webhook (token próprio no header x-webhook-token) ---
    let webhook_routes = Router::new()
        .route("/leads", post(webhook_handlers::receber_lead))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_token::require_webhook_token,
        ));

    // --- API JSON ---
    let api_routes = Router::new()
        .route(
            "/corretores",
            get(corretor_handlers::listar).post(corretor_handlers::criar),
        )
        .route("/corretores/{id}/roleta", patch(corretor_handlers::alterar_roleta))
        .route(
            "/turnos",
            get(turno_handlers::listar_turnos).post(turno_handlers::criar_turno),
        )
        .route(
            "/turnos/{id}",
            put(turno_handlers::atualizar_turno).delete(turno_handlers::remover_turno),
        )
        .route(
            "/plantoes",
            get(turno_handlers::listar_plantao).post(turno_handlers::adicionar_plantao),
        )
        .route("/plantoes/{id}", delete(turno_handlers::remover_plantao))
        .route("/leads", get(lead_handlers::listar).post(lead_handlers::criar))
        .route("/leads/{id}", get(lead_handlers::detalhe))
        .route("/leads/{id}/etapa", patch(lead_handlers::alterar_etapa))
        .route("/leads/{id}/distribuir", post(lead_handlers::distribuir))
        .route("/painel/resumo", get(painel_handlers::resumo))
        .route("/rodadas", get(painel_handlers::rodadas));

    // --- Painel ---
    let painel_routes = Router::new()
        .route("/", get(painel_handlers::pagina_painel))
        .route("/ws", get(painel_handlers::painel_websocket_handler));

    // Tudo o que está aqui exige o API_TOKEN (incluindo as rotas aninhadas)
    let protected_routes = Router::new()
        .nest("/api", api_routes)
        .nest("/painel", painel_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_token::require_api_token,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .nest("/webhook", webhook_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
