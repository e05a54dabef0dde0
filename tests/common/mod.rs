//! Helpers partilhados pelos testes de integração.
//!
//! Cada teste recebe a sua própria base SQLite num diretório temporário, já
//! com as migrações aplicadas pelo mesmo `create_db_pool` usado em produção.
#![allow(dead_code)]

use axum::{body::Body, http::Response, Router};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use http_body_util::BodyExt;
use roleta::{
    config::Config,
    db,
    models::{
        corretor::NovoCorretorPayload,
        lead::NovoLeadPayload,
        plantao::PlantaoPayload,
        turno::TurnoPayload,
    },
    services::{corretor_service, lead_service, turno_service},
    state::AppState,
    web,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const API_TOKEN: &str = "token-de-teste";
pub const WEBHOOK_TOKEN: &str = "webhook-de-teste";

/// Base de dados temporária; o diretório é apagado quando isto sai de escopo.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("roleta.db").display());
    let pool = db::create_db_pool(&url, 5).await.expect("pool de teste");
    TestDb { pool, _dir: dir }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        db_max_connections: 5,
        api_token: API_TOKEN.to_string(),
        webhook_token: WEBHOOK_TOKEN.to_string(),
        roleta_automatica: true,
    }
}

/// Router completo, igual ao de produção, sobre o pool dado.
pub fn build_test_app(pool: SqlitePool) -> Router {
    web::routes::create_router(AppState::new(pool, test_config()))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

// --- Dados ---

pub fn momento(dia: &str, hora: &str) -> NaiveDateTime {
    let dia = NaiveDate::parse_from_str(dia, "%Y-%m-%d").expect("dia");
    let hora = NaiveTime::parse_from_str(hora, "%H:%M").expect("hora");
    dia.and_time(hora)
}

pub async fn criar_corretor(pool: &SqlitePool, nome: &str, roleta_ativa: bool) -> String {
    let payload = NovoCorretorPayload {
        nome: nome.to_string(),
        email: None,
        telefone: None,
        roleta_ativa,
    };
    corretor_service::criar_corretor(pool, &payload)
        .await
        .expect("criar corretor")
        .id
}

pub async fn criar_lead(pool: &SqlitePool, nome: &str) -> String {
    let payload = NovoLeadPayload {
        nome: nome.to_string(),
        telefone: Some("11999990000".to_string()),
        email: None,
        mensagem: None,
        canal: None,
        distribuir: false,
    };
    lead_service::criar_lead(pool, &payload).await.expect("criar lead").id
}

pub async fn criar_turno(pool: &SqlitePool, nome: &str, inicio: &str, fim: &str) -> i64 {
    let payload = TurnoPayload {
        nome: nome.to_string(),
        hora_inicio: inicio.to_string(),
        hora_fim: fim.to_string(),
        ativo: true,
    };
    turno_service::criar_turno(pool, &payload).await.expect("criar turno").id
}

pub async fn escalar(pool: &SqlitePool, turno_id: i64, corretor_id: &str, dia: &str) {
    let payload = PlantaoPayload {
        turno_id,
        corretor_id: corretor_id.to_string(),
        data: NaiveDate::parse_from_str(dia, "%Y-%m-%d").expect("dia"),
        ordem: None,
    };
    turno_service::adicionar_plantao(pool, &payload).await.expect("escalar");
}

/// Grava uma rodada antiga diretamente, como se viesse do histórico.
pub async fn rodada_anterior(pool: &SqlitePool, corretor_id: &str, quando: &str) {
    sqlx::query(
        "INSERT INTO rodadas_distribuicao \
         (corretor_id, lead_id, cliente, status, origem_disparo, escopo, created_at) \
         VALUES (?, 'lead-antigo', 'Cliente antigo', 'sucesso', 'manual', 'roleta_ativa', ?)",
    )
    .bind(corretor_id)
    .bind(quando)
    .execute(pool)
    .await
    .expect("rodada anterior");
}

pub async fn total_rodadas(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM rodadas_distribuicao")
        .fetch_one(pool)
        .await
        .expect("contar rodadas")
}
