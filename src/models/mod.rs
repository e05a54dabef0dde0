// src/models/mod.rs
pub mod corretor;
pub mod lead;
pub mod plantao;
pub mod rodada;
pub mod turno;
