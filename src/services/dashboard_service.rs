// src/services/dashboard_service.rs

use rust_decimal::Decimal;

use crate::{
    db::{CommissionRepository, PropertyRepository, UserRepository},
    models::{
        commission::CommissionStatus,
        dashboard::DashboardSummary,
        property::PropertyStatus,
        user::UserRole,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    properties: PropertyRepository,
    users: UserRepository,
    commissions: CommissionRepository,
}

impl DashboardService {
    pub fn new(properties: PropertyRepository, users: UserRepository, commissions: CommissionRepository) -> Self {
        Self { properties, users, commissions }
    }

    // As três leituras correm juntas; a latência simulada não se soma
    pub async fn summary(&self) -> DashboardSummary {
        let (properties, users, commissions) = tokio::join!(
            self.properties.get_all(),
            self.users.get_all(),
            self.commissions.get_all(),
        );

        DashboardSummary {
            total_properties: properties.len(),
            available_properties: properties.iter().filter(|p| p.status == PropertyStatus::Available).count(),
            total_sales: properties.iter().filter(|p| p.status == PropertyStatus::Sold).count(),
            total_earnings: commissions
                .iter()
                .filter(|c| c.status != CommissionStatus::Cancelled)
                .map(|c| c.total_commission)
                .sum::<Decimal>(),
            team_size: users.iter().filter(|u| u.role != UserRole::Admin).count(),
        }
    }
}
