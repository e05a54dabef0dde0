// src/services/roleta_store.rs
use crate::{
    error::RoletaError,
    models::{
        lead::EtapaLead,
        rodada::{RodadaDistribuicao, STATUS_SUCESSO},
        turno::Turno,
    },
    services::roleta_service::{proximo_corretor, PedidoAtribuicao, RoletaStore},
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{SqliteConnection, SqlitePool};

pub const RODADA_COLUMNS: &str =
    "id, corretor_id, lead_id, cliente, status, origem_disparo, escopo, created_at";

/// Store da roleta sobre SQLite.
#[derive(Clone)]
pub struct SqliteRoletaStore {
    pool: SqlitePool,
}

impl SqliteRoletaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Cursor do escopo; sem cursor, a rodada mais recente de todas (continuidade
// com o histórico gravado antes do escopo existir).
async fn ultimo_corretor_em(
    conn: &mut SqliteConnection,
    escopo: &str,
) -> Result<Option<String>, sqlx::Error> {
    let cursor: Option<Option<String>> =
        sqlx::query_scalar("SELECT ultimo_corretor_id FROM cursores_roleta WHERE escopo = ?")
            .bind(escopo)
            .fetch_optional(&mut *conn)
            .await?;

    if let Some(Some(corretor_id)) = cursor {
        return Ok(Some(corretor_id));
    }

    sqlx::query_scalar(
        "SELECT corretor_id FROM rodadas_distribuicao ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await
}

#[async_trait]
impl RoletaStore for SqliteRoletaStore {
    async fn turno_ativo(&self, hora: NaiveTime) -> Result<Option<Turno>, RoletaError> {
        // A janela é avaliada em Rust: turnos noturnos não cabem num BETWEEN
        let turnos = sqlx::query_as::<_, Turno>(
            "SELECT id, nome, hora_inicio, hora_fim, ativo, created_at \
             FROM turnos WHERE ativo = 1 ORDER BY hora_inicio ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(turnos.into_iter().find(|t| t.cobre(hora)))
    }

    async fn plantao_do_dia(
        &self,
        dia: NaiveDate,
        turno_id: i64,
    ) -> Result<Vec<String>, RoletaError> {
        let corretores = sqlx::query_scalar::<_, String>(
            "SELECT corretor_id FROM plantoes WHERE data = ? AND turno_id = ? ORDER BY ordem ASC, id ASC",
        )
        .bind(dia)
        .bind(turno_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(corretores)
    }

    async fn corretores_elegiveis(&self) -> Result<Vec<String>, RoletaError> {
        let corretores = sqlx::query_scalar::<_, String>(
            "SELECT id FROM corretores WHERE roleta_ativa = 1 ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(corretores)
    }

    async fn ultimo_corretor(&self, escopo: &str) -> Result<Option<String>, RoletaError> {
        let mut conn = self.pool.acquire().await?;
        Ok(ultimo_corretor_em(&mut conn, escopo).await?)
    }

    async fn registrar_atribuicao(
        &self,
        pedido: &PedidoAtribuicao<'_>,
    ) -> Result<RodadaDistribuicao, RoletaError> {
        let escopo = pedido.candidatos.escopo.chave();
        let mut tx = self.pool.begin().await?;

        // A primeira instrução é uma escrita: a transação fica com o lock de
        // escrita antes de ler o cursor, e as outras esperam pelo busy_timeout.
        sqlx::query(
            "INSERT INTO cursores_roleta (escopo, ultimo_corretor_id, atualizado_em) \
             VALUES (?, NULL, ?) ON CONFLICT(escopo) DO NOTHING",
        )
        .bind(&escopo)
        .bind(pedido.momento)
        .execute(&mut *tx)
        .await?;

        let ultimo = ultimo_corretor_em(&mut tx, &escopo).await?;
        let escolhido = proximo_corretor(&pedido.candidatos.corretores, ultimo.as_deref())
            .ok_or(RoletaError::SemCorretorElegivel)?
            .to_string();

        let afetadas = sqlx::query(
            "UPDATE leads SET responsavel_id = ?, atribuido = 1, etapa = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&escolhido)
        .bind(EtapaLead::Novo.as_str())
        .bind(pedido.momento)
        .bind(pedido.lead_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if afetadas == 0 {
            tracing::warn!("Roleta: lead {} não existe, nada gravado", pedido.lead_id);
            tx.rollback().await?;
            return Err(RoletaError::LeadNaoEncontrado(pedido.lead_id.to_string()));
        }

        let query = format!(
            "INSERT INTO rodadas_distribuicao \
             (corretor_id, lead_id, cliente, status, origem_disparo, escopo, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {RODADA_COLUMNS}"
        );
        let rodada = sqlx::query_as::<_, RodadaDistribuicao>(&query)
            .bind(&escolhido)
            .bind(pedido.lead_id)
            .bind(pedido.cliente)
            .bind(STATUS_SUCESSO)
            .bind(pedido.origem.as_str())
            .bind(&escopo)
            .bind(pedido.momento)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE cursores_roleta SET ultimo_corretor_id = ?, atualizado_em = ? WHERE escopo = ?",
        )
        .bind(&escolhido)
        .bind(pedido.momento)
        .bind(&escopo)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rodada)
    }
}
