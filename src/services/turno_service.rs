// src/services/turno_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        plantao::{Plantao, PlantaoDetalhado, PlantaoPayload},
        turno::{parse_hora, Turno, TurnoPayload},
    },
    services::roleta_service::agora_local,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

const TURNO_COLUMNS: &str = "id, nome, hora_inicio, hora_fim, ativo, created_at";

// Valida o payload e devolve (nome, início, fim)
fn validar_turno(payload: &TurnoPayload) -> AppResult<(&str, NaiveTime, NaiveTime)> {
    let nome = payload.nome.trim();
    if nome.is_empty() {
        return Err(AppError::RequisicaoInvalida("O nome do turno é obrigatório.".into()));
    }
    let inicio = parse_hora(&payload.hora_inicio).ok_or_else(|| {
        AppError::RequisicaoInvalida(format!("Hora de início inválida: '{}'", payload.hora_inicio))
    })?;
    let fim = parse_hora(&payload.hora_fim).ok_or_else(|| {
        AppError::RequisicaoInvalida(format!("Hora de fim inválida: '{}'", payload.hora_fim))
    })?;
    if inicio == fim {
        return Err(AppError::RequisicaoInvalida(
            "Início e fim do turno não podem ser iguais.".into(),
        ));
    }
    if inicio > fim {
        tracing::info!("Turno '{}' atravessa a meia-noite ({} → {}).", nome, inicio, fim);
    }
    Ok((nome, inicio, fim))
}

pub async fn listar_turnos(db_pool: &SqlitePool) -> AppResult<Vec<Turno>> {
    let query = format!("SELECT {TURNO_COLUMNS} FROM turnos ORDER BY hora_inicio ASC, id ASC");
    let turnos = sqlx::query_as::<_, Turno>(&query).fetch_all(db_pool).await?;
    Ok(turnos)
}

pub async fn criar_turno(db_pool: &SqlitePool, payload: &TurnoPayload) -> AppResult<Turno> {
    let (nome, inicio, fim) = validar_turno(payload)?;
    let query = format!(
        "INSERT INTO turnos (nome, hora_inicio, hora_fim, ativo, created_at) VALUES (?, ?, ?, ?, ?) \
         RETURNING {TURNO_COLUMNS}"
    );
    let turno = sqlx::query_as::<_, Turno>(&query)
        .bind(nome)
        .bind(inicio)
        .bind(fim)
        .bind(payload.ativo)
        .bind(agora_local())
        .fetch_one(db_pool)
        .await?;
    tracing::info!("✅ Turno '{}' criado ({}).", turno.nome, turno.id);
    Ok(turno)
}

pub async fn atualizar_turno(
    db_pool: &SqlitePool,
    turno_id: i64,
    payload: &TurnoPayload,
) -> AppResult<Turno> {
    let (nome, inicio, fim) = validar_turno(payload)?;
    let query = format!(
        "UPDATE turnos SET nome = ?, hora_inicio = ?, hora_fim = ?, ativo = ? WHERE id = ? \
         RETURNING {TURNO_COLUMNS}"
    );
    sqlx::query_as::<_, Turno>(&query)
        .bind(nome)
        .bind(inicio)
        .bind(fim)
        .bind(payload.ativo)
        .bind(turno_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado(format!("Turno {} não encontrado.", turno_id)))
}

/// Remove o turno e, por cascata, o seu planejamento de plantão.
pub async fn remover_turno(db_pool: &SqlitePool, turno_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM turnos WHERE id = ?")
        .bind(turno_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NaoEncontrado(format!("Turno {} não encontrado.", turno_id)));
    }
    tracing::info!("Turno {} removido.", turno_id);
    Ok(())
}

// --- Planejamento de plantão ---

pub async fn listar_plantao(
    db_pool: &SqlitePool,
    data: NaiveDate,
    turno_id: Option<i64>,
) -> AppResult<Vec<PlantaoDetalhado>> {
    let entradas = sqlx::query_as::<_, PlantaoDetalhado>(
        r#"
        SELECT p.id, p.turno_id, t.nome AS turno_nome, p.corretor_id,
               c.nome AS corretor_nome, p.data, p.ordem
        FROM plantoes p
        JOIN turnos t ON t.id = p.turno_id
        JOIN corretores c ON c.id = p.corretor_id
        WHERE p.data = ? AND (? IS NULL OR p.turno_id = ?)
        ORDER BY t.hora_inicio ASC, p.turno_id ASC, p.ordem ASC, p.id ASC
        "#,
    )
    .bind(data)
    .bind(turno_id)
    .bind(turno_id)
    .fetch_all(db_pool)
    .await?;
    Ok(entradas)
}

pub async fn adicionar_plantao(db_pool: &SqlitePool, payload: &PlantaoPayload) -> AppResult<Plantao> {
    // Sem ordem explícita, entra no fim da fila daquele turno/dia
    let resultado = sqlx::query_as::<_, Plantao>(
        r#"
        INSERT INTO plantoes (turno_id, corretor_id, data, ordem)
        VALUES (?1, ?2, ?3, COALESCE(?4,
            (SELECT COALESCE(MAX(ordem) + 1, 0) FROM plantoes WHERE turno_id = ?1 AND data = ?3)))
        RETURNING id, turno_id, corretor_id, data, ordem
        "#,
    )
    .bind(payload.turno_id)
    .bind(&payload.corretor_id)
    .bind(payload.data)
    .bind(payload.ordem)
    .fetch_one(db_pool)
    .await;

    match resultado {
        Ok(plantao) => {
            tracing::info!(
                "Plantão: corretor {} no turno {} em {} (ordem {}).",
                plantao.corretor_id,
                plantao.turno_id,
                plantao.data,
                plantao.ordem
            );
            Ok(plantao)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(AppError::RequisicaoInvalida(
                "Este corretor já está no plantão deste turno neste dia.".into(),
            ))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
            Err(AppError::RequisicaoInvalida("Turno ou corretor inexistente.".into()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn remover_plantao(db_pool: &SqlitePool, plantao_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM plantoes WHERE id = ?")
        .bind(plantao_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::NaoEncontrado(format!(
            "Entrada de plantão {} não encontrada.",
            plantao_id
        )));
    }
    Ok(())
}
