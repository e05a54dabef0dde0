// src/services/painel_service.rs
use crate::{
    error::AppResult,
    models::{
        rodada::{ContagemCorretor, RodadaComCorretor},
        turno::Turno,
    },
    services::{
        roleta_service::{self, PrevisaoRoleta, RoletaStore},
        roleta_store::SqliteRoletaStore,
    },
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::SqlitePool;

pub const LIMITE_RODADAS_PADRAO: i64 = 20;
pub const LIMITE_RODADAS_MAX: i64 = 500;

#[derive(Debug, Serialize)]
pub struct ResumoPainel {
    pub data: NaiveDate,
    pub turno: Option<Turno>,
    pub previsao: Option<PrevisaoRoleta>,
    pub contagem: Vec<ContagemCorretor>,
    pub rodadas: Vec<RodadaComCorretor>,
}

pub async fn rodadas_recentes(db_pool: &SqlitePool, limite: i64) -> AppResult<Vec<RodadaComCorretor>> {
    let limite = limite.clamp(1, LIMITE_RODADAS_MAX);
    let rodadas = sqlx::query_as::<_, RodadaComCorretor>(
        r#"
        SELECT r.id, r.corretor_id, c.nome AS corretor_nome, r.lead_id, r.cliente,
               r.origem_disparo, r.created_at
        FROM rodadas_distribuicao r
        LEFT JOIN corretores c ON c.id = r.corretor_id
        ORDER BY r.created_at DESC, r.id DESC
        LIMIT ?
        "#,
    )
    .bind(limite)
    .fetch_all(db_pool)
    .await?;
    Ok(rodadas)
}

/// Quantos leads cada corretor recebeu no dia.
pub async fn contagem_do_dia(db_pool: &SqlitePool, dia: NaiveDate) -> AppResult<Vec<ContagemCorretor>> {
    let contagem = sqlx::query_as::<_, ContagemCorretor>(
        r#"
        SELECT r.corretor_id, c.nome AS corretor_nome, COUNT(*) AS total
        FROM rodadas_distribuicao r
        LEFT JOIN corretores c ON c.id = r.corretor_id
        WHERE date(r.created_at) = ?
        GROUP BY r.corretor_id, c.nome
        ORDER BY total DESC, c.nome ASC
        "#,
    )
    .bind(dia)
    .fetch_all(db_pool)
    .await?;
    Ok(contagem)
}

pub async fn resumo(db_pool: &SqlitePool, agora: NaiveDateTime) -> AppResult<ResumoPainel> {
    let store = SqliteRoletaStore::new(db_pool.clone());
    let turno = store.turno_ativo(agora.time()).await?;
    let previsao = roleta_service::previsualizar_proximo(&store, agora).await?;
    let contagem = contagem_do_dia(db_pool, agora.date()).await?;
    let rodadas = rodadas_recentes(db_pool, LIMITE_RODADAS_PADRAO).await?;

    Ok(ResumoPainel {
        data: agora.date(),
        turno,
        previsao,
        contagem,
        rodadas,
    })
}
