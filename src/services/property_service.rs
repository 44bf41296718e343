// src/services/property_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{PropertyRepository, RecordId},
    models::property::{NewProperty, Property, PropertyPatch, PropertyStatus},
    services::query::{filter_properties, sort_properties, PropertyFilter, PropertySort},
};

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Vec<Property> {
        self.repo.get_all().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Property, AppError> {
        self.repo.get_by_id(id).await
    }

    /// Lista para a tela de busca: filtra e depois ordena.
    pub async fn browse(&self, filter: &PropertyFilter, sort: PropertySort) -> Vec<Property> {
        let mut found = filter_properties(&self.repo.get_all().await, filter);
        sort_properties(&mut found, sort);
        found
    }

    /// Imóveis que ainda podem ter uma venda registrada.
    pub async fn available(&self) -> Vec<Property> {
        self.repo
            .find_where(&|p: &Property| p.status == PropertyStatus::Available)
            .await
    }

    pub async fn create(&self, draft: NewProperty) -> Result<Property, AppError> {
        draft.validate()?;
        let property = self.repo.create(draft).await?;
        tracing::info!(property_id = property.id, "Imóvel cadastrado: {}", property.title);
        Ok(property)
    }

    pub async fn update(&self, id: RecordId, patch: PropertyPatch) -> Result<Property, AppError> {
        self.repo.update(id, patch).await
    }

    /// Mudança de status pela tela de detalhes; vendido/alugado não voltam atrás.
    pub async fn change_status(&self, id: RecordId, next: PropertyStatus) -> Result<Property, AppError> {
        let updated = self
            .repo
            .update_if(id, &status_guard(next), PropertyPatch::status(next))
            .await?;
        tracing::info!(property_id = id, status = %next, "Status do imóvel atualizado");
        Ok(updated)
    }
}

/// Recusa a mudança se o status atual do imóvel não permitir ir para `next`.
pub(crate) fn status_guard(next: PropertyStatus) -> impl Fn(&Property) -> Result<(), AppError> + Send + Sync {
    move |current: &Property| {
        if current.status.can_transition_to(next) {
            return Ok(());
        }
        Err(AppError::InvalidTransition {
            entity: "Property",
            from: current.status.to_string(),
            to: next.to_string(),
        })
    }
}
