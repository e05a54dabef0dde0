// src/templates.rs
use askama::Template; // Trait necessário para Askama

// Uma linha da tabela "últimas rodadas" (já formatada para exibição)
#[derive(Clone, Debug)]
pub struct LinhaRodada {
    pub hora: String,
    pub corretor: String,
    pub cliente: String,
    pub origem: String,
}

// Uma linha da contagem do dia por corretor
#[derive(Clone, Debug)]
pub struct LinhaContagem {
    pub corretor: String,
    pub total: i64,
}

/// Página do painel da roleta (`templates/painel.html`).
#[derive(Template)]
#[template(path = "painel.html")]
pub struct PainelRoletaPage {
    pub data: String,
    // "Comercial (08:00–18:00)" ou None fora de qualquer turno
    pub turno: Option<String>,
    pub escopo: Option<String>,
    pub proximo: Option<String>,
    pub total_candidatos: usize,
    pub contagem: Vec<LinhaContagem>,
    pub rodadas: Vec<LinhaRodada>,
}
