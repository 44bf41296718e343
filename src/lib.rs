//! Ledger de comissões imobiliárias: stores em memória com latência simulada,
//! cálculo de comissão por papel e o fluxo de registro de vendas.

pub mod common;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
