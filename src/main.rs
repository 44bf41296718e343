//src/main.rs

use tracing_subscriber::EnvFilter;

use realty_ledger::{
    common::format::{format_currency, format_percentage},
    config::{AppConfig, AppState},
    services::query::TeamFilter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: RUST_LOG controla o nível (padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração ou os seeds falharem, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;
    tracing::info!("✅ Stores carregadas de {}", config.seed_dir.display());

    let summary = app_state.dashboard_service.summary().await;
    tracing::info!(
        total_properties = summary.total_properties,
        available = summary.available_properties,
        sold = summary.total_sales,
        team_size = summary.team_size,
        "📊 Ganhos totais: {}",
        format_currency(summary.total_earnings)
    );

    for property in app_state.property_service.available().await {
        tracing::info!(
            property_id = property.id,
            "🏠 {} [{}] ({}) por {}",
            property.title,
            property.category.label(),
            property.location,
            format_currency(property.price.into())
        );
    }

    for member in app_state.team_service.team_view(&TeamFilter::default()).await {
        tracing::info!(
            user_id = member.user.id,
            recruits = member.sub_members.len(),
            sales = member.total_sales,
            "👤 {} ({}): {}",
            member.user.name,
            member.user.role.label(),
            format_currency(member.total_earnings)
        );
    }

    let rates = &config.rates.default;
    tracing::info!(
        "🚀 Ledger pronto. Comissão padrão: {}",
        format_percentage(rates.total_rate() * rust_decimal::Decimal::ONE_HUNDRED)
    );

    Ok(())
}
