// src/services/lead_service.rs
use crate::{
    error::{AppError, AppResult, RoletaError},
    models::{
        lead::{EtapaLead, Lead, NovoLeadPayload, WebhookLeadPayload},
        rodada::{OrigemDisparo, RodadaDistribuicao},
    },
    services::{
        roleta_service::{self, agora_local},
        roleta_store::SqliteRoletaStore,
    },
};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

const LEAD_COLUMNS: &str = "\
    id, nome, telefone, email, mensagem, canal, responsavel_id, atribuido, etapa, \
    created_at, updated_at";

pub const CANAL_MANUAL: &str = "manual";
pub const CANAL_WEBHOOK: &str = "webhook";

/// Resultado da entrada de um lead (o lead pode ficar sem responsável).
#[derive(Debug, Serialize)]
pub struct EntradaLead {
    pub lead: Lead,
    pub distribuido: bool,
    pub rodada: Option<RodadaDistribuicao>,
}

pub async fn criar_lead(db_pool: &SqlitePool, payload: &NovoLeadPayload) -> AppResult<Lead> {
    let nome = payload.nome.trim();
    if nome.is_empty() {
        return Err(AppError::RequisicaoInvalida("O nome do lead é obrigatório.".into()));
    }
    let canal = payload
        .canal
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(CANAL_MANUAL);

    let id = Uuid::new_v4().to_string();
    let query = format!(
        "INSERT INTO leads (id, nome, telefone, email, mensagem, canal, etapa, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {LEAD_COLUMNS}"
    );
    let agora = agora_local();
    let lead = sqlx::query_as::<_, Lead>(&query)
        .bind(&id)
        .bind(nome)
        .bind(&payload.telefone)
        .bind(&payload.email)
        .bind(&payload.mensagem)
        .bind(canal)
        .bind(EtapaLead::Novo.as_str())
        .bind(agora)
        .bind(agora)
        .fetch_one(db_pool)
        .await?;

    tracing::info!("📥 Lead '{}' criado via {} ({}).", lead.nome, lead.canal, lead.id);
    Ok(lead)
}

pub async fn buscar_lead(db_pool: &SqlitePool, lead_id: &str) -> AppResult<Option<Lead>> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?");
    let lead = sqlx::query_as::<_, Lead>(&query)
        .bind(lead_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(lead)
}

pub async fn listar_leads(db_pool: &SqlitePool, etapa: Option<EtapaLead>) -> AppResult<Vec<Lead>> {
    let query = format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE (? IS NULL OR etapa = ?) \
         ORDER BY created_at DESC, rowid DESC"
    );
    let etapa = etapa.map(|e| e.as_str());
    let leads = sqlx::query_as::<_, Lead>(&query)
        .bind(etapa)
        .bind(etapa)
        .fetch_all(db_pool)
        .await?;
    Ok(leads)
}

/// Move o lead para outra etapa do funil.
pub async fn alterar_etapa(db_pool: &SqlitePool, lead_id: &str, etapa: EtapaLead) -> AppResult<Lead> {
    let query = format!(
        "UPDATE leads SET etapa = ?, updated_at = ? WHERE id = ? RETURNING {LEAD_COLUMNS}"
    );
    let lead = sqlx::query_as::<_, Lead>(&query)
        .bind(etapa.as_str())
        .bind(agora_local())
        .bind(lead_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado(format!("Lead '{}' não encontrado.", lead_id)))?;

    tracing::debug!("Lead {} passou para a etapa {}", lead_id, etapa.as_str());
    Ok(lead)
}

/// Passa um lead existente pela roleta.
pub async fn distribuir_lead(
    db_pool: &SqlitePool,
    lead_id: &str,
    origem: OrigemDisparo,
) -> AppResult<RodadaDistribuicao> {
    let lead = buscar_lead(db_pool, lead_id)
        .await?
        .ok_or_else(|| RoletaError::LeadNaoEncontrado(lead_id.to_string()))?;

    let store = SqliteRoletaStore::new(db_pool.clone());
    let rodada =
        roleta_service::distribuir(&store, &lead.id, &lead.nome, origem, agora_local()).await?;
    Ok(rodada)
}

/// Cria o lead e, se pedido, distribui-o logo. Sem corretores elegíveis o lead
/// fica registado sem responsável; qualquer outro erro da roleta é propagado.
pub async fn registrar_entrada(
    db_pool: &SqlitePool,
    payload: &NovoLeadPayload,
    origem: OrigemDisparo,
) -> AppResult<EntradaLead> {
    let lead = criar_lead(db_pool, payload).await?;
    if !payload.distribuir {
        return Ok(EntradaLead { lead, distribuido: false, rodada: None });
    }

    match distribuir_lead(db_pool, &lead.id, origem).await {
        Ok(rodada) => {
            // Relê o lead para devolver o responsável já preenchido
            let lead = buscar_lead(db_pool, &lead.id)
                .await?
                .ok_or(AppError::InternalServerError)?;
            Ok(EntradaLead { lead, distribuido: true, rodada: Some(rodada) })
        }
        Err(AppError::Roleta(RoletaError::SemCorretorElegivel)) => {
            tracing::warn!(
                "⚠️ Lead {} ficou sem responsável: nenhum corretor elegível na roleta.",
                lead.id
            );
            Ok(EntradaLead { lead, distribuido: false, rodada: None })
        }
        Err(e) => Err(e),
    }
}

/// Entrada pelo webhook: canal = campanha (ou "webhook").
pub async fn receber_webhook(
    db_pool: &SqlitePool,
    payload: WebhookLeadPayload,
    roleta_automatica: bool,
) -> AppResult<EntradaLead> {
    let novo = NovoLeadPayload {
        nome: payload.nome,
        telefone: payload.telefone,
        email: payload.email,
        mensagem: payload.mensagem,
        canal: Some(payload.campanha.unwrap_or_else(|| CANAL_WEBHOOK.to_string())),
        distribuir: roleta_automatica,
    };
    registrar_entrada(db_pool, &novo, OrigemDisparo::Webhook).await
}
