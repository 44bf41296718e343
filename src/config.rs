// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use rust_decimal::Decimal;

use crate::{
    db::{seed::load_records, CommissionRepository, InMemoryStore, PropertyRepository, UserRepository},
    models::{
        commission::Commission,
        constants::{STANDARD_MEMBER_RATE, STANDARD_SUB_MEMBER_RATE},
        property::{Property, PropertyCategory},
        user::{User, UserRole},
    },
    services::{
        commission_engine::{RateSchedule, RateTable},
        CommissionService, DashboardService, PropertyService, SaleService, TeamService,
    },
};

const DEFAULT_SEED_DIR: &str = "data";
const DEFAULT_LATENCY_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub seed_dir: PathBuf,
    pub store_latency: Duration,
    pub rates: RateSchedule,
}

impl AppConfig {
    /// Lê o ambiente (e o `.env`, se existir).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let seed_dir = lookup("SEED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_DIR));

        let latency_ms = match lookup("STORE_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("STORE_LATENCY_MS deve ser um inteiro em milissegundos, recebido '{raw}'"))?,
            None => DEFAULT_LATENCY_MS,
        };

        let default_table = RateTable::new()
            .with_rate(
                UserRole::Member,
                read_rate(&lookup, "COMMISSION_MEMBER_RATE")?.unwrap_or(STANDARD_MEMBER_RATE),
            )
            .with_rate(
                UserRole::SubMember,
                read_rate(&lookup, "COMMISSION_SUB_MEMBER_RATE")?.unwrap_or(STANDARD_SUB_MEMBER_RATE),
            );

        // Exceções por categoria: COMMISSION_RATE_VILLA_MEMBER, COMMISSION_RATE_VILLA_SUB_MEMBER, ...
        let mut rates = RateSchedule::new(default_table.clone());
        for category in PropertyCategory::ALL {
            let prefix = format!("COMMISSION_RATE_{}", category.as_str().to_uppercase());
            let member = read_rate(&lookup, &format!("{prefix}_MEMBER"))?;
            let sub_member = read_rate(&lookup, &format!("{prefix}_SUB_MEMBER"))?;
            if member.is_none() && sub_member.is_none() {
                continue;
            }
            let table = RateTable::new()
                .with_rate(UserRole::Member, member.unwrap_or(default_table.rate_for(UserRole::Member)))
                .with_rate(
                    UserRole::SubMember,
                    sub_member.unwrap_or(default_table.rate_for(UserRole::SubMember)),
                );
            rates = rates.with_override(category, table);
        }

        Ok(Self {
            seed_dir,
            store_latency: Duration::from_millis(latency_ms),
            rates,
        })
    }
}

fn read_rate(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<Decimal>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let rate = Decimal::from_str(raw.trim())
        .with_context(|| format!("{key} deve ser uma fração decimal (ex: 0.03), recebido '{raw}'"))?;
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        bail!("{key} deve estar entre 0 e 1, recebido {rate}");
    }
    Ok(Some(rate))
}

// O estado compartilhado: stores criadas uma vez e injetadas nos serviços
#[derive(Clone)]
pub struct AppState {
    pub properties: PropertyRepository,
    pub users: UserRepository,
    pub commissions: CommissionRepository,

    pub property_service: PropertyService,
    pub team_service: TeamService,
    pub commission_service: CommissionService,
    pub sale_service: SaleService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Carrega os seeds do diretório configurado e monta o gráfico de dependências.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let properties: Vec<Property> = load_records(&config.seed_dir.join("properties.json")).await?;
        let users: Vec<User> = load_records(&config.seed_dir.join("users.json")).await?;
        let commissions: Vec<Commission> = load_records(&config.seed_dir.join("commissions.json")).await?;

        let latency = config.store_latency;
        Ok(Self::from_stores(
            InMemoryStore::with_records(properties, latency).into_shared(),
            InMemoryStore::with_records(users, latency).into_shared(),
            InMemoryStore::with_records(commissions, latency).into_shared(),
            config.rates.clone(),
        ))
    }

    /// Monta os serviços sobre stores já prontas (testes usam isso com stores próprias).
    pub fn from_stores(
        properties: PropertyRepository,
        users: UserRepository,
        commissions: CommissionRepository,
        rates: RateSchedule,
    ) -> Self {
        let rates = Arc::new(rates);

        let property_service = PropertyService::new(properties.clone());
        let team_service = TeamService::new(users.clone(), commissions.clone());
        let commission_service = CommissionService::new(commissions.clone());
        let sale_service = SaleService::new(properties.clone(), commissions.clone(), users.clone(), rates);
        let dashboard_service = DashboardService::new(properties.clone(), users.clone(), commissions.clone());

        Self {
            properties,
            users,
            commissions,
            property_service,
            team_service,
            commission_service,
            sale_service,
            dashboard_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.seed_dir, PathBuf::from("data"));
        assert_eq!(config.store_latency, Duration::from_millis(300));
        assert_eq!(config.rates.default, RateTable::standard());
        assert!(config.rates.by_category.is_empty());
    }

    #[test]
    fn category_overrides_inherit_missing_roles() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STORE_LATENCY_MS", "0"),
            ("COMMISSION_RATE_COMMERCIAL_MEMBER", "0.05"),
        ]))
        .unwrap();

        let commercial = config.rates.table_for(PropertyCategory::Commercial);
        assert_eq!(commercial.rate_for(UserRole::Member), Decimal::new(5, 2));
        assert_eq!(commercial.rate_for(UserRole::SubMember), STANDARD_SUB_MEMBER_RATE);
        assert_eq!(config.rates.table_for(PropertyCategory::Land), &RateTable::standard());
        assert!(config.store_latency.is_zero());
    }

    #[test]
    fn bad_values_fail_with_the_key_name() {
        let err = AppConfig::from_lookup(lookup(&[("COMMISSION_MEMBER_RATE", "3%")])).unwrap_err();
        assert!(format!("{err:#}").contains("COMMISSION_MEMBER_RATE"));

        let err = AppConfig::from_lookup(lookup(&[("COMMISSION_SUB_MEMBER_RATE", "1.5")])).unwrap_err();
        assert!(err.to_string().contains("entre 0 e 1"));

        assert!(AppConfig::from_lookup(lookup(&[("STORE_LATENCY_MS", "fast")])).is_err());
    }
}
