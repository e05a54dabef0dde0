// src/services/roleta_service.rs
//! Roleta: distribuição round-robin de leads entre os corretores do plantão.
//!
//! A ordem dos candidatos vem sempre do store (plantão do dia/turno ou, na
//! falta dele, corretores com `roleta_ativa`). O próximo corretor depende só
//! dessa ordem e do último atribuído no mesmo escopo de rotação.

use crate::{
    error::RoletaError,
    models::{
        rodada::{OrigemDisparo, RodadaDistribuicao},
        turno::Turno,
    },
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const ESCOPO_ROLETA_ATIVA: &str = "roleta_ativa";

/// Escopo de rotação: cada escopo tem o seu próprio cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscopoRotacao {
    Plantao { turno_id: i64, dia: NaiveDate },
    RoletaAtiva,
}

impl EscopoRotacao {
    pub fn chave(&self) -> String {
        match self {
            EscopoRotacao::Plantao { turno_id, dia } => {
                format!("plantao:{}:{}", turno_id, dia.format("%Y-%m-%d"))
            }
            EscopoRotacao::RoletaAtiva => ESCOPO_ROLETA_ATIVA.to_string(),
        }
    }
}

/// Lista de candidatos de uma tentativa, já na ordem do store.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidatos {
    pub escopo: EscopoRotacao,
    pub turno: Option<Turno>,
    pub corretores: Vec<String>,
}

pub struct PedidoAtribuicao<'a> {
    pub lead_id: &'a str,
    pub cliente: &'a str,
    pub origem: OrigemDisparo,
    pub candidatos: &'a Candidatos,
    pub momento: NaiveDateTime,
}

/// Quem seria o próximo, sem gravar nada.
#[derive(Debug, Clone, Serialize)]
pub struct PrevisaoRoleta {
    pub escopo: String,
    pub turno: Option<Turno>,
    pub candidatos: Vec<String>,
    pub proximo: String,
}

#[async_trait]
pub trait RoletaStore: Send + Sync {
    /// Primeiro turno ativo cuja janela contém a hora.
    async fn turno_ativo(&self, hora: NaiveTime) -> Result<Option<Turno>, RoletaError>;

    /// Corretores do plantão do dia para o turno, na ordem do store.
    async fn plantao_do_dia(&self, dia: NaiveDate, turno_id: i64)
        -> Result<Vec<String>, RoletaError>;

    /// Corretores com `roleta_ativa`, na ordem do store.
    async fn corretores_elegiveis(&self) -> Result<Vec<String>, RoletaError>;

    /// Último corretor atribuído no escopo (cursor; sem cursor, a rodada mais recente).
    async fn ultimo_corretor(&self, escopo: &str) -> Result<Option<String>, RoletaError>;

    /// Lê o cursor, escolhe o próximo, atualiza o lead, grava a rodada e avança
    /// o cursor, tudo de forma atómica. Um lead inexistente aborta sem gravar nada.
    async fn registrar_atribuicao(
        &self,
        pedido: &PedidoAtribuicao<'_>,
    ) -> Result<RodadaDistribuicao, RoletaError>;
}

/// Relógio de parede local, usado para o turno e o dia do plantão.
pub fn agora_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Regra de rotação: o seguinte ao último; volta ao início se o último for o
/// fim da lista, não existir, ou já não estiver entre os candidatos.
pub fn proximo_corretor<'a>(candidatos: &'a [String], ultimo: Option<&str>) -> Option<&'a str> {
    let primeiro = candidatos.first()?;
    let posicao = ultimo.and_then(|u| candidatos.iter().position(|c| c == u));
    match posicao {
        Some(i) if i + 1 < candidatos.len() => Some(candidatos[i + 1].as_str()),
        _ => Some(primeiro.as_str()),
    }
}

/// Passos 1 a 3: plantão do turno atual, ou o pool `roleta_ativa`. Nunca mistura.
pub async fn resolver_candidatos<S>(store: &S, agora: NaiveDateTime) -> Result<Candidatos, RoletaError>
where
    S: RoletaStore + ?Sized,
{
    let turno = store.turno_ativo(agora.time()).await?;

    if let Some(turno_id) = turno.as_ref().map(|t| t.id) {
        let dia = agora.date();
        let corretores = store.plantao_do_dia(dia, turno_id).await?;
        tracing::debug!(
            "Roleta: turno {} com {} corretor(es) de plantão em {}",
            turno_id,
            corretores.len(),
            dia
        );
        if !corretores.is_empty() {
            return Ok(Candidatos {
                escopo: EscopoRotacao::Plantao { turno_id, dia },
                turno,
                corretores,
            });
        }
    } else {
        tracing::debug!("Roleta: nenhum turno ativo às {}", agora.time());
    }

    let corretores = store.corretores_elegiveis().await?;
    tracing::debug!("Roleta: fallback roleta_ativa com {} corretor(es)", corretores.len());
    Ok(Candidatos {
        escopo: EscopoRotacao::RoletaAtiva,
        turno,
        corretores,
    })
}

/// Distribui o lead ao próximo corretor da roleta e devolve a rodada gravada.
pub async fn distribuir<S>(
    store: &S,
    lead_id: &str,
    cliente: &str,
    origem: OrigemDisparo,
    agora: NaiveDateTime,
) -> Result<RodadaDistribuicao, RoletaError>
where
    S: RoletaStore + ?Sized,
{
    let candidatos = resolver_candidatos(store, agora).await?;
    if candidatos.corretores.is_empty() {
        tracing::warn!("Roleta: sem corretores elegíveis para o lead {}", lead_id);
        return Err(RoletaError::SemCorretorElegivel);
    }

    let pedido = PedidoAtribuicao {
        lead_id,
        cliente,
        origem,
        candidatos: &candidatos,
        momento: agora,
    };
    let rodada = store.registrar_atribuicao(&pedido).await?;

    tracing::info!(
        "🎯 Lead {} distribuído para {} (escopo {}, origem {})",
        lead_id,
        rodada.corretor_id,
        rodada.escopo,
        rodada.origem_disparo
    );
    Ok(rodada)
}

pub async fn previsualizar_proximo<S>(
    store: &S,
    agora: NaiveDateTime,
) -> Result<Option<PrevisaoRoleta>, RoletaError>
where
    S: RoletaStore + ?Sized,
{
    let candidatos = resolver_candidatos(store, agora).await?;
    let escopo = candidatos.escopo.chave();
    let ultimo = store.ultimo_corretor(&escopo).await?;

    let proximo = match proximo_corretor(&candidatos.corretores, ultimo.as_deref()) {
        Some(id) => id.to_string(),
        None => return Ok(None),
    };

    Ok(Some(PrevisaoRoleta {
        escopo,
        turno: candidatos.turno,
        candidatos: candidatos.corretores,
        proximo,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rodada::STATUS_SUCESSO;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn ids(lista: &[&str]) -> Vec<String> {
        lista.iter().map(|s| s.to_string()).collect()
    }

    fn agora() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn turno_comercial() -> Turno {
        Turno {
            id: 1,
            nome: "Comercial".into(),
            hora_inicio: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            hora_fim: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ativo: true,
            created_at: NaiveDateTime::default(),
        }
    }

    /// Store em memória com o mesmo contrato do SQLite.
    #[derive(Default)]
    struct StoreFalso {
        turnos: Vec<Turno>,
        plantao: HashMap<(NaiveDate, i64), Vec<String>>,
        elegiveis: Vec<String>,
        falhar: bool,
        leads: Mutex<HashMap<String, Option<String>>>,
        rodadas: Mutex<Vec<RodadaDistribuicao>>,
        cursores: Mutex<HashMap<String, String>>,
    }

    impl StoreFalso {
        fn com_lead(mut self, id: &str) -> Self {
            self.leads.get_mut().unwrap().insert(id.to_string(), None);
            self
        }

        fn com_rodada_anterior(self, corretor_id: &str) -> Self {
            self.rodadas.lock().unwrap().push(RodadaDistribuicao {
                id: 1,
                corretor_id: corretor_id.to_string(),
                lead_id: "lead-antigo".into(),
                cliente: "Antigo".into(),
                status: STATUS_SUCESSO.into(),
                origem_disparo: "manual".into(),
                escopo: "qualquer".into(),
                created_at: agora() - chrono::Duration::hours(1),
            });
            self
        }

        fn com_plantao(mut self, corretores: &[&str]) -> Self {
            self.turnos.push(turno_comercial());
            self.plantao.insert((agora().date(), 1), ids(corretores));
            self
        }

        fn verificar(&self) -> Result<(), RoletaError> {
            if self.falhar {
                Err(RoletaError::Store(sqlx::Error::PoolClosed))
            } else {
                Ok(())
            }
        }

        fn ultimo(&self, escopo: &str) -> Option<String> {
            self.cursores
                .lock()
                .unwrap()
                .get(escopo)
                .cloned()
                .or_else(|| self.rodadas.lock().unwrap().last().map(|r| r.corretor_id.clone()))
        }
    }

    #[async_trait]
    impl RoletaStore for StoreFalso {
        async fn turno_ativo(&self, hora: NaiveTime) -> Result<Option<Turno>, RoletaError> {
            self.verificar()?;
            Ok(self.turnos.iter().find(|t| t.cobre(hora)).cloned())
        }

        async fn plantao_do_dia(
            &self,
            dia: NaiveDate,
            turno_id: i64,
        ) -> Result<Vec<String>, RoletaError> {
            self.verificar()?;
            Ok(self.plantao.get(&(dia, turno_id)).cloned().unwrap_or_default())
        }

        async fn corretores_elegiveis(&self) -> Result<Vec<String>, RoletaError> {
            self.verificar()?;
            Ok(self.elegiveis.clone())
        }

        async fn ultimo_corretor(&self, escopo: &str) -> Result<Option<String>, RoletaError> {
            self.verificar()?;
            Ok(self.ultimo(escopo))
        }

        async fn registrar_atribuicao(
            &self,
            pedido: &PedidoAtribuicao<'_>,
        ) -> Result<RodadaDistribuicao, RoletaError> {
            self.verificar()?;
            let escopo = pedido.candidatos.escopo.chave();
            let ultimo = self.ultimo(&escopo);
            let escolhido = proximo_corretor(&pedido.candidatos.corretores, ultimo.as_deref())
                .ok_or(RoletaError::SemCorretorElegivel)?
                .to_string();

            let mut leads = self.leads.lock().unwrap();
            let responsavel = leads
                .get_mut(pedido.lead_id)
                .ok_or_else(|| RoletaError::LeadNaoEncontrado(pedido.lead_id.to_string()))?;
            *responsavel = Some(escolhido.clone());

            let mut rodadas = self.rodadas.lock().unwrap();
            let rodada = RodadaDistribuicao {
                id: rodadas.len() as i64 + 1,
                corretor_id: escolhido.clone(),
                lead_id: pedido.lead_id.to_string(),
                cliente: pedido.cliente.to_string(),
                status: STATUS_SUCESSO.into(),
                origem_disparo: pedido.origem.as_str().into(),
                escopo: escopo.clone(),
                created_at: pedido.momento,
            };
            rodadas.push(rodada.clone());
            self.cursores.lock().unwrap().insert(escopo, escolhido);
            Ok(rodada)
        }
    }

    #[test]
    fn proximo_segue_a_ordem_e_da_a_volta() {
        let lista = ids(&["A", "B", "C"]);
        assert_eq!(proximo_corretor(&lista, None), Some("A"));
        assert_eq!(proximo_corretor(&lista, Some("A")), Some("B"));
        assert_eq!(proximo_corretor(&lista, Some("B")), Some("C"));
        assert_eq!(proximo_corretor(&lista, Some("C")), Some("A"));
        assert_eq!(proximo_corretor(&lista, Some("Z")), Some("A"));
        assert_eq!(proximo_corretor(&[], Some("A")), None);
    }

    #[test]
    fn chave_do_escopo() {
        let dia = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(
            EscopoRotacao::Plantao { turno_id: 7, dia }.chave(),
            "plantao:7:2026-03-10"
        );
        assert_eq!(EscopoRotacao::RoletaAtiva.chave(), "roleta_ativa");
    }

    #[tokio::test]
    async fn ultimo_b_entrega_para_c() {
        let store = StoreFalso::default()
            .com_plantao(&["A", "B", "C"])
            .com_rodada_anterior("B")
            .com_lead("L1");

        let rodada = distribuir(&store, "L1", "Maria", OrigemDisparo::Manual, agora())
            .await
            .unwrap();

        assert_eq!(rodada.corretor_id, "C");
        assert_eq!(rodada.escopo, "plantao:1:2026-03-10");
        assert_eq!(store.leads.lock().unwrap()["L1"].as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn ultimo_da_lista_volta_ao_primeiro() {
        let store = StoreFalso::default()
            .com_plantao(&["A", "B", "C"])
            .com_rodada_anterior("C")
            .com_lead("L1");

        let rodada = distribuir(&store, "L1", "Maria", OrigemDisparo::Manual, agora())
            .await
            .unwrap();
        assert_eq!(rodada.corretor_id, "A");
    }

    #[tokio::test]
    async fn sem_rodada_anterior_escolhe_o_primeiro() {
        let store = StoreFalso::default().com_plantao(&["A", "B", "C"]).com_lead("L1");

        let rodada = distribuir(&store, "L1", "Maria", OrigemDisparo::Webhook, agora())
            .await
            .unwrap();
        assert_eq!(rodada.corretor_id, "A");
        assert_eq!(rodada.origem_disparo, "webhook");
        assert_eq!(rodada.status, STATUS_SUCESSO);
    }

    #[tokio::test]
    async fn plantao_vazio_usa_fallback_roleta_ativa() {
        let mut store = StoreFalso::default()
            .com_plantao(&[])
            .com_rodada_anterior("X")
            .com_lead("L1");
        store.elegiveis = ids(&["X", "Y"]);

        let rodada = distribuir(&store, "L1", "Maria", OrigemDisparo::Automatica, agora())
            .await
            .unwrap();
        assert_eq!(rodada.corretor_id, "Y");
        assert_eq!(rodada.escopo, ESCOPO_ROLETA_ATIVA);
    }

    #[tokio::test]
    async fn sem_candidatos_falha_sem_mutar_nada() {
        let store = StoreFalso::default().com_lead("L1");

        let erro = distribuir(&store, "L1", "Maria", OrigemDisparo::Manual, agora())
            .await
            .unwrap_err();

        assert!(matches!(erro, RoletaError::SemCorretorElegivel));
        assert!(store.rodadas.lock().unwrap().is_empty());
        assert_eq!(store.leads.lock().unwrap()["L1"], None);
    }

    #[tokio::test]
    async fn erro_do_store_aborta_antes_de_qualquer_escrita() {
        let mut store = StoreFalso::default().com_plantao(&["A"]).com_lead("L1");
        store.falhar = true;

        let erro = distribuir(&store, "L1", "Maria", OrigemDisparo::Manual, agora())
            .await
            .unwrap_err();

        assert!(matches!(erro, RoletaError::Store(_)));
        assert!(store.rodadas.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rodadas_sucessivas_percorrem_o_plantao() {
        let store = StoreFalso::default()
            .com_plantao(&["A", "B", "C"])
            .com_lead("L1")
            .com_lead("L2")
            .com_lead("L3")
            .com_lead("L4");

        let mut escolhidos = Vec::new();
        for lead in ["L1", "L2", "L3", "L4"] {
            let rodada = distribuir(&store, lead, lead, OrigemDisparo::Manual, agora())
                .await
                .unwrap();
            escolhidos.push(rodada.corretor_id);
        }
        assert_eq!(escolhidos, ids(&["A", "B", "C", "A"]));
    }

    #[tokio::test]
    async fn previsao_nao_grava_nada() {
        let store = StoreFalso::default()
            .com_plantao(&["A", "B"])
            .com_rodada_anterior("A");

        let previsao = previsualizar_proximo(&store, agora()).await.unwrap().unwrap();
        assert_eq!(previsao.proximo, "B");
        assert_eq!(previsao.candidatos, ids(&["A", "B"]));
        assert_eq!(store.rodadas.lock().unwrap().len(), 1);

        let vazio = StoreFalso::default();
        assert!(previsualizar_proximo(&vazio, agora()).await.unwrap().is_none());
    }
}
