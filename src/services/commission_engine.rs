// src/services/commission_engine.rs

// Cálculo puro da comissão: valor da venda + tabela de taxas -> distribuição por papel.
// Nada aqui toca em store; mesma entrada, mesma saída.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    commission::Distribution,
    constants::{SALE_ROLES, STANDARD_MEMBER_RATE, STANDARD_SUB_MEMBER_RATE},
    property::PropertyCategory,
    user::UserRole,
};

/// Taxa (fração da venda) de cada papel. Papel ausente = taxa zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<UserRole, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 3% para o membro e 2% para o sub-membro: 5% no total, 60/40.
    pub fn standard() -> Self {
        Self::new()
            .with_rate(UserRole::Member, STANDARD_MEMBER_RATE)
            .with_rate(UserRole::SubMember, STANDARD_SUB_MEMBER_RATE)
    }

    pub fn with_rate(mut self, role: UserRole, rate: Decimal) -> Self {
        self.rates.insert(role, rate);
        self
    }

    pub fn rate_for(&self, role: UserRole) -> Decimal {
        self.rates.get(&role).copied().unwrap_or(Decimal::ZERO)
    }

    /// Soma das taxas dos papéis que participam de uma venda.
    pub fn total_rate(&self) -> Decimal {
        SALE_ROLES
            .iter()
            .map(|role| self.rate_for(*role))
            .filter(|rate| *rate > Decimal::ZERO)
            .sum()
    }
}

/// Tabela padrão mais exceções por categoria de imóvel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSchedule {
    pub default: RateTable,
    pub by_category: HashMap<PropertyCategory, RateTable>,
}

impl RateSchedule {
    pub fn new(default: RateTable) -> Self {
        Self { default, by_category: HashMap::new() }
    }

    pub fn with_override(mut self, category: PropertyCategory, table: RateTable) -> Self {
        self.by_category.insert(category, table);
        self
    }

    pub fn table_for(&self, category: PropertyCategory) -> &RateTable {
        self.by_category.get(&category).unwrap_or(&self.default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionBreakdown {
    pub sale_amount: Decimal,
    pub commission_rate: Decimal,
    pub total_commission: Decimal,
    pub distributions: Vec<Distribution>,
}

/// Calcula a comissão total e a parte de cada papel.
///
/// `totalCommission = saleAmount × totalRate`; cada papel recebe
/// `totalCommission × rate / totalRate`. A última distribuição fica com o
/// resto, então as somas fecham exatamente em `totalCommission` e 100%.
/// Venda não positiva (ou tabela sem taxas) gera uma distribuição zerada.
pub fn calculate(sale_amount: Decimal, table: &RateTable) -> CommissionBreakdown {
    let shares: Vec<(UserRole, Decimal)> = SALE_ROLES
        .iter()
        .map(|role| (*role, table.rate_for(*role)))
        .filter(|(_, rate)| *rate > Decimal::ZERO)
        .collect();
    let total_rate: Decimal = shares.iter().map(|(_, rate)| *rate).sum();

    if sale_amount <= Decimal::ZERO || total_rate.is_zero() {
        return CommissionBreakdown {
            sale_amount,
            commission_rate: total_rate,
            total_commission: Decimal::ZERO,
            distributions: Vec::new(),
        };
    }

    let total_commission = sale_amount * total_rate;
    let last = shares.len() - 1;

    let mut allocated_amount = Decimal::ZERO;
    let mut allocated_percentage = Decimal::ZERO;
    let mut distributions = Vec::with_capacity(shares.len());

    for (index, (role, rate)) in shares.into_iter().enumerate() {
        let (amount, percentage) = if index == last {
            (total_commission - allocated_amount, Decimal::ONE_HUNDRED - allocated_percentage)
        } else {
            let fraction = rate / total_rate;
            (total_commission * fraction, fraction * Decimal::ONE_HUNDRED)
        };
        allocated_amount += amount;
        allocated_percentage += percentage;
        distributions.push(Distribution { role, amount, percentage });
    }

    CommissionBreakdown {
        sale_amount,
        commission_rate: total_rate,
        total_commission,
        distributions,
    }
}
