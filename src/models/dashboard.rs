// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::user::User;

// 1. Cards do topo do painel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_properties: usize,
    pub available_properties: usize,
    pub total_sales: usize,         // Imóveis vendidos
    pub total_earnings: Decimal,    // Comissões não canceladas
    pub team_size: usize,           // Todos menos admins
}

// 2. Resumo da página de comissões (parte do membro)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub total_commissions: usize,
    pub total_earnings: Decimal,
    pub pending_earnings: Decimal,
}

// 3. Um membro na visão de equipe, com agregados calculados por requisição
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberView {
    #[serde(flatten)]
    pub user: User,
    pub sub_members: Vec<User>,
    pub total_sales: usize,
    pub total_earnings: Decimal,
}
