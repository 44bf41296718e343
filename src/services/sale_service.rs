// src/services/sale_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::Mutex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::{field_error, AppError},
    db::{CommissionRepository, PropertyRepository, RecordId, UserRepository},
    models::{
        commission::{Commission, CommissionPatch, CommissionStatus, NewCommission, PropertySync},
        property::{validate_not_blank, Property, PropertyPatch, PropertyStatus},
        user::UserRole,
    },
    services::commission_engine::{self, RateSchedule},
};

pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d";

// Payload do formulário "Registrar venda"
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordSale {
    pub property_id: RecordId,

    #[validate(custom(function = "validate_positive_amount"))]
    pub sale_amount: Decimal,

    #[validate(custom(function = "validate_not_blank"))]
    pub buyer_name: String,

    #[validate(custom(function = "validate_sale_date"))]
    pub sale_date: String, // "YYYY-MM-DD"

    // Membro creditado pela venda (opcional)
    #[serde(default)]
    pub member_id: Option<RecordId>,
}

fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(field_error("range", "Sale amount must be greater than zero."));
    }
    Ok(())
}

fn validate_sale_date(value: &str) -> Result<(), ValidationError> {
    parse_sale_date(value)
        .map(|_| ())
        .ok_or_else(|| field_error("date", "Sale date must be a valid YYYY-MM-DD date."))
}

fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), SALE_DATE_FORMAT).ok()
}

// Outra escrita (ex: mudança de status manual) pode ter chegado entre a validação e o passo 4
fn still_available(current: &Property) -> Result<(), AppError> {
    if current.status == PropertyStatus::Available {
        return Ok(());
    }
    Err(AppError::InvalidTransition {
        entity: "Property",
        from: current.status.to_string(),
        to: PropertyStatus::Sold.to_string(),
    })
}

/// Registro de vendas: a única operação que escreve em duas stores.
///
/// Passos: valida, calcula a comissão, grava a comissão (`propertySync =
/// pending`), marca o imóvel como vendido e só então marca a comissão como
/// `applied`. Se o imóvel não puder ser atualizado (ou deixou de estar
/// disponível nesse meio tempo) a comissão é removida
/// (compensação); se nem isso der certo, o erro é `ConsistencyGap`.
#[derive(Clone)]
pub struct SaleService {
    properties: PropertyRepository,
    commissions: CommissionRepository,
    users: UserRepository,
    rates: Arc<RateSchedule>,
    // Serializa vendas: duas vendas do mesmo imóvel não passam juntas pela validação
    sale_lock: Arc<Mutex<()>>,
}

impl SaleService {
    pub fn new(
        properties: PropertyRepository,
        commissions: CommissionRepository,
        users: UserRepository,
        rates: Arc<RateSchedule>,
    ) -> Self {
        Self {
            properties,
            commissions,
            users,
            rates,
            sale_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn record_sale(&self, payload: RecordSale) -> Result<Commission, AppError> {
        let _guard = self.sale_lock.lock().await;

        // 1. Validação (nenhuma escrita se falhar)
        let (property, sale_date) = self.validate(&payload).await?;

        // 2. Cálculo
        let table = self.rates.table_for(property.category);
        let breakdown = commission_engine::calculate(payload.sale_amount, table);

        // 3. Grava a comissão, ainda pendente de sincronizar o imóvel
        let commission = self
            .commissions
            .create(NewCommission {
                property_id: property.id,
                member_id: payload.member_id,
                sale_amount: breakdown.sale_amount,
                commission_rate: breakdown.commission_rate,
                total_commission: breakdown.total_commission,
                distributions: breakdown.distributions,
                status: CommissionStatus::Pending,
                buyer_name: payload.buyer_name.trim().to_string(),
                sale_date,
                property_sync: PropertySync::Pending,
            })
            .await?;

        // 4. Marca o imóvel como vendido, desde que ainda esteja disponível
        if let Err(cause) = self
            .properties
            .update_if(property.id, &still_available, PropertyPatch::status(PropertyStatus::Sold))
            .await
        {
            return Err(self.compensate(&commission, cause).await);
        }

        // 5. Fecha a saga
        let settled = self
            .commissions
            .update(
                commission.id,
                CommissionPatch { property_sync: Some(PropertySync::Applied), ..Default::default() },
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    commission_id = commission.id,
                    property_id = property.id,
                    "🔥 Imóvel vendido mas a comissão ficou pendente de sincronização: {}",
                    e
                );
                AppError::ConsistencyGap { commission_id: commission.id, property_id: property.id }
            })?;

        tracing::info!(
            commission_id = settled.id,
            property_id = property.id,
            total = %settled.total_commission,
            "Venda registrada"
        );
        Ok(settled)
    }

    // Regras que dependem das stores entram no mesmo ValidationErrors do derive
    async fn validate(&self, payload: &RecordSale) -> Result<(Property, NaiveDate), AppError> {
        let mut errors = match payload.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        let property = match self.properties.get_by_id(payload.property_id).await {
            Ok(p) if p.status == PropertyStatus::Available => Some(p),
            Ok(p) => {
                errors.add(
                    "property_id",
                    field_error("unavailable", format!("Property is {} and cannot be sold.", p.status.label())),
                );
                None
            }
            Err(e) if e.is_not_found() => {
                errors.add("property_id", field_error("not_found", "Property not found."));
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(member_id) = payload.member_id {
            match self.users.get_by_id(member_id).await {
                Ok(u) if u.is_active && u.role != UserRole::Admin => {}
                Ok(_) => errors.add(
                    "member_id",
                    field_error("inactive", "Only active team members can be credited with a sale."),
                ),
                Err(e) if e.is_not_found() => {
                    errors.add("member_id", field_error("not_found", "Team member not found."))
                }
                Err(e) => return Err(e),
            }
        }

        match (property, parse_sale_date(&payload.sale_date)) {
            (Some(property), Some(date)) if errors.is_empty() => Ok((property, date)),
            _ => Err(AppError::ValidationError(errors)),
        }
    }

    async fn compensate(&self, commission: &Commission, cause: AppError) -> AppError {
        tracing::warn!(
            commission_id = commission.id,
            property_id = commission.property_id,
            "Falha ao marcar imóvel como vendido ({}); desfazendo a comissão",
            cause
        );

        match self.commissions.delete(commission.id).await {
            Ok(_) => cause,
            Err(rollback) => {
                tracing::error!(
                    commission_id = commission.id,
                    property_id = commission.property_id,
                    "🔥 Compensação falhou: {}",
                    rollback
                );
                AppError::ConsistencyGap {
                    commission_id: commission.id,
                    property_id: commission.property_id,
                }
            }
        }
    }
}
