// src/models/commission.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{Record, RecordId};
use crate::models::user::UserRole;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl CommissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Paid => "paid",
            CommissionStatus::Cancelled => "cancelled",
        }
    }

    // Só "pending" anda; pago e cancelado são finais
    pub fn can_transition_to(self, next: CommissionStatus) -> bool {
        matches!(
            (self, next),
            (CommissionStatus::Pending, CommissionStatus::Paid | CommissionStatus::Cancelled)
        )
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marca da saga de venda: a comissão nasce `Pending` e vira `Applied`
/// depois que o imóvel foi marcado como vendido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertySync {
    Pending,
    #[default]
    Applied,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub role: UserRole,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: RecordId,
    pub property_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<RecordId>, // Membro creditado pela venda
    pub sale_amount: Decimal,
    pub commission_rate: Decimal, // Fração (0.05 = 5%)
    pub total_commission: Decimal,
    pub distributions: Vec<Distribution>,
    pub status: CommissionStatus,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub date: DateTime<Utc>, // Criação do registro, diferente de saleDate
    #[serde(default)]
    pub property_sync: PropertySync,
}

impl Commission {
    /// Valor da distribuição de um papel (zero se o papel não participou).
    pub fn share_for(&self, role: UserRole) -> Decimal {
        self.distributions
            .iter()
            .filter(|d| d.role == role)
            .map(|d| d.amount)
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct NewCommission {
    pub property_id: RecordId,
    pub member_id: Option<RecordId>,
    pub sale_amount: Decimal,
    pub commission_rate: Decimal,
    pub total_commission: Decimal,
    pub distributions: Vec<Distribution>,
    pub status: CommissionStatus,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub property_sync: PropertySync,
}

#[derive(Debug, Clone, Default)]
pub struct CommissionPatch {
    pub status: Option<CommissionStatus>,
    pub property_sync: Option<PropertySync>,
}

impl Record for Commission {
    type Draft = NewCommission;
    type Patch = CommissionPatch;

    const LABEL: &'static str = "Commission record";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewCommission, now: DateTime<Utc>) -> Self {
        Commission {
            id,
            property_id: draft.property_id,
            member_id: draft.member_id,
            sale_amount: draft.sale_amount,
            commission_rate: draft.commission_rate,
            total_commission: draft.total_commission,
            distributions: draft.distributions,
            status: draft.status,
            buyer_name: draft.buyer_name,
            sale_date: draft.sale_date,
            date: now,
            property_sync: draft.property_sync,
        }
    }

    fn apply(&mut self, patch: CommissionPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(sync) = patch.property_sync {
            self.property_sync = sync;
        }
    }
}
