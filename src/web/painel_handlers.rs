// src/web/painel_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::rodada::{RodadaComCorretor, RodadasQuery},
    services::{
        corretor_service,
        painel_service::{self, ResumoPainel, LIMITE_RODADAS_PADRAO},
        roleta_service::agora_local,
    },
    state::AppState,
    templates::{LinhaContagem, LinhaRodada, PainelRoletaPage},
    web::extract::QueryValida,
};
use askama::Template;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Json, State,
    },
    response::{Html, IntoResponse},
};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

// --- JSON ---

// GET /api/painel/resumo
pub async fn resumo(State(state): State<AppState>) -> AppResult<Json<ResumoPainel>> {
    let resumo = painel_service::resumo(&state.db_pool, agora_local()).await?;
    Ok(Json(resumo))
}

// GET /api/rodadas?limite=50
pub async fn rodadas(
    State(state): State<AppState>,
    QueryValida(params): QueryValida<RodadasQuery>,
) -> AppResult<Json<Vec<RodadaComCorretor>>> {
    let limite = params.limite.unwrap_or(LIMITE_RODADAS_PADRAO);
    let rodadas = painel_service::rodadas_recentes(&state.db_pool, limite).await?;
    Ok(Json(rodadas))
}

// --- Página HTML (GET /painel) ---

pub async fn pagina_painel(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let resumo = painel_service::resumo(&state.db_pool, agora_local()).await?;

    // id -> nome, para mostrar o "próximo da vez" pelo nome
    let nomes: HashMap<String, String> = corretor_service::listar_corretores(&state.db_pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.nome))
        .collect();

    let (escopo, proximo, total_candidatos) = match &resumo.previsao {
        Some(p) => (
            Some(p.escopo.clone()),
            Some(nomes.get(&p.proximo).cloned().unwrap_or_else(|| p.proximo.clone())),
            p.candidatos.len(),
        ),
        None => (None, None, 0),
    };

    let template = PainelRoletaPage {
        data: resumo.data.format("%d/%m/%Y").to_string(),
        turno: resumo.turno.as_ref().map(|t| {
            format!("{} ({}–{})", t.nome, t.hora_inicio.format("%H:%M"), t.hora_fim.format("%H:%M"))
        }),
        escopo,
        proximo,
        total_candidatos,
        contagem: resumo
            .contagem
            .iter()
            .map(|c| LinhaContagem {
                corretor: c.corretor_nome.clone().unwrap_or_else(|| c.corretor_id.clone()),
                total: c.total,
            })
            .collect(),
        rodadas: resumo
            .rodadas
            .iter()
            .map(|r| LinhaRodada {
                hora: r.created_at.format("%H:%M:%S").to_string(),
                corretor: r.corretor_nome.clone().unwrap_or_else(|| r.corretor_id.clone()),
                cliente: r.cliente.clone(),
                origem: r.origem_disparo.clone(),
            })
            .collect(),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template PainelRoletaPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// --- WebSocket (GET /painel/ws) ---

pub async fn painel_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Cada painel ligado recebe as rodadas novas; o cliente não envia nada útil.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<Message>(32);
    state.feed.connections.lock().await.insert(conn_id, tx);
    tracing::info!(
        "🔌 Painel ligado: {} ({} conexões)",
        conn_id,
        state.feed.total_conexoes().await
    );

    // Task 1: canal -> cliente
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                tracing::warn!("Falha ao enviar msg WS para {}, terminando send_task.", conn_id);
                break;
            }
        }
    });

    // Task 2: só escuta o Close (e ignora o resto)
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Close(_) => {
                    tracing::debug!("Painel {} enviou Close frame.", conn_id);
                    break;
                }
                _ => tracing::trace!("Ignorando msg WS do painel {}", conn_id),
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.feed.connections.lock().await.remove(&conn_id);
    tracing::info!("🔌 Painel {} desligado.", conn_id);
}
