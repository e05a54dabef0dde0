// src/services/corretor_service.rs
use crate::{
    error::{AppError, AppResult},
    models::corretor::{Corretor, NovoCorretorPayload},
    services::roleta_service::agora_local,
};
use sqlx::SqlitePool;
use uuid::Uuid;

const CORRETOR_COLUMNS: &str = "id, nome, email, telefone, roleta_ativa, created_at";

/// Lista os corretores na ordem de cadastro (a mesma ordem usada pela roleta).
pub async fn listar_corretores(db_pool: &SqlitePool) -> AppResult<Vec<Corretor>> {
    let query = format!("SELECT {CORRETOR_COLUMNS} FROM corretores ORDER BY rowid ASC");
    let corretores = sqlx::query_as::<_, Corretor>(&query)
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Encontrados {} corretores.", corretores.len());
    Ok(corretores)
}

pub async fn criar_corretor(
    db_pool: &SqlitePool,
    payload: &NovoCorretorPayload,
) -> AppResult<Corretor> {
    let nome = payload.nome.trim();
    if nome.is_empty() {
        return Err(AppError::RequisicaoInvalida("O nome do corretor é obrigatório.".into()));
    }

    let id = Uuid::new_v4().to_string();
    let query = format!(
        "INSERT INTO corretores (id, nome, email, telefone, roleta_ativa, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {CORRETOR_COLUMNS}"
    );
    let corretor = sqlx::query_as::<_, Corretor>(&query)
        .bind(&id)
        .bind(nome)
        .bind(&payload.email)
        .bind(&payload.telefone)
        .bind(payload.roleta_ativa)
        .bind(agora_local())
        .fetch_one(db_pool)
        .await?;

    tracing::info!("✅ Corretor '{}' criado ({}).", corretor.nome, corretor.id);
    Ok(corretor)
}

pub async fn nome_do_corretor(db_pool: &SqlitePool, corretor_id: &str) -> AppResult<Option<String>> {
    let nome = sqlx::query_scalar::<_, String>("SELECT nome FROM corretores WHERE id = ?")
        .bind(corretor_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(nome)
}

/// Liga/desliga a elegibilidade do corretor no pool `roleta_ativa`.
pub async fn alterar_roleta(db_pool: &SqlitePool, corretor_id: &str, ativa: bool) -> AppResult<Corretor> {
    let query = format!(
        "UPDATE corretores SET roleta_ativa = ? WHERE id = ? RETURNING {CORRETOR_COLUMNS}"
    );
    let corretor = sqlx::query_as::<_, Corretor>(&query)
        .bind(ativa)
        .bind(corretor_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Corretor '{}' não encontrado ao alterar roleta.", corretor_id);
            AppError::NaoEncontrado(format!("Corretor '{}' não encontrado.", corretor_id))
        })?;

    tracing::info!(
        "Roleta {} para o corretor {}",
        if ativa { "ativada" } else { "desativada" },
        corretor_id
    );
    Ok(corretor)
}
