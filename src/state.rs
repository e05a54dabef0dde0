// src/state.rs
use crate::{
    config::Config,
    models::rodada::{EventoRoleta, RodadaDistribuicao},
    services::corretor_service,
};
use axum::extract::ws::Message;
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

// Tipo para o 'sender' de uma conexão WebSocket individual
type WsTx = mpsc::Sender<Message>;

/// Conexões WebSocket abertas no painel da roleta.
#[derive(Debug, Clone, Default)]
pub struct RoletaFeed {
    // ID da conexão -> canal para a task que escreve no socket
    pub connections: Arc<Mutex<HashMap<Uuid, WsTx>>>,
}

impl RoletaFeed {
    /// Envia uma mensagem para TODAS as conexões ativas.
    pub async fn broadcast(&self, message_text: String) {
        let connections = self.connections.lock().await;
        let message = Message::Text(message_text.into());

        for tx in connections.values() {
            // try_send: um cliente lento não pode travar a distribuição
            let _ = tx.try_send(message.clone());
        }
    }

    pub async fn total_conexoes(&self) -> usize {
        self.connections.lock().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
    pub feed: RoletaFeed,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
            feed: RoletaFeed::default(),
        }
    }

    /// Publica uma rodada nova para os painéis ligados.
    pub async fn publicar_rodada(&self, rodada: &RodadaDistribuicao) {
        let corretor_nome =
            match corretor_service::nome_do_corretor(&self.db_pool, &rodada.corretor_id).await {
                Ok(nome) => nome,
                Err(e) => {
                    tracing::warn!("Nome do corretor {} indisponível: {:?}", rodada.corretor_id, e);
                    None
                }
            };
        let evento = EventoRoleta::nova_rodada(rodada.clone(), corretor_nome);
        match serde_json::to_string(&evento) {
            Ok(texto) => self.feed.broadcast(texto).await,
            Err(e) => tracing::error!("Erro ao serializar evento da roleta: {:?}", e),
        }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for RoletaFeed {
    fn from_ref(state: &AppState) -> RoletaFeed {
        state.feed.clone()
    }
}
