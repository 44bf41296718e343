// src/services/commission_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{CommissionRepository, RecordId},
    models::{
        commission::{Commission, CommissionPatch, CommissionStatus},
        dashboard::EarningsSummary,
        user::UserRole,
    },
    services::query::{filter_commissions, CommissionFilter},
};

#[derive(Clone)]
pub struct CommissionService {
    repo: CommissionRepository,
}

impl CommissionService {
    pub fn new(repo: CommissionRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Vec<Commission> {
        self.repo.get_all().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Commission, AppError> {
        self.repo.get_by_id(id).await
    }

    /// Histórico filtrado por dia e/ou status.
    pub async fn history(&self, filter: &CommissionFilter) -> Vec<Commission> {
        filter_commissions(&self.repo.get_all().await, filter)
    }

    pub async fn for_property(&self, property_id: RecordId) -> Vec<Commission> {
        self.repo.find_where(&|c: &Commission| c.property_id == property_id).await
    }

    pub async fn for_member(&self, member_id: RecordId) -> Vec<Commission> {
        self.repo.find_where(&|c: &Commission| c.member_id == Some(member_id)).await
    }

    /// pending -> paid | cancelled; qualquer outra mudança é recusada.
    /// A checagem roda sobre o status atual, no mesmo passo da escrita.
    pub async fn transition(&self, id: RecordId, next: CommissionStatus) -> Result<Commission, AppError> {
        let allowed = |current: &Commission| -> Result<(), AppError> {
            if current.status.can_transition_to(next) {
                return Ok(());
            }
            Err(AppError::InvalidTransition {
                entity: "Commission",
                from: current.status.to_string(),
                to: next.to_string(),
            })
        };

        let updated = self
            .repo
            .update_if(id, &allowed, CommissionPatch { status: Some(next), ..Default::default() })
            .await?;
        tracing::info!(commission_id = id, status = %next, "Status da comissão atualizado");
        Ok(updated)
    }

    /// Ganhos da parte "member" (canceladas não contam).
    pub async fn earnings_summary(&self) -> EarningsSummary {
        let commissions = self.repo.get_all().await;
        let live = commissions.iter().filter(|c| c.status != CommissionStatus::Cancelled);

        let mut total_earnings = Decimal::ZERO;
        let mut pending_earnings = Decimal::ZERO;
        for commission in live {
            let share = commission.share_for(UserRole::Member);
            total_earnings += share;
            if commission.status == CommissionStatus::Pending {
                pending_earnings += share;
            }
        }

        EarningsSummary {
            total_commissions: commissions.len(),
            total_earnings,
            pending_earnings,
        }
    }
}
