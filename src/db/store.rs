// src/db/store.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::common::error::AppError;

pub type RecordId = u64;

/// Um tipo de registro que pode viver numa store.
///
/// `Draft` são os campos que o chamador informa no `create`; a store completa
/// o resto (id, carimbos de data). `Patch` lista só os campos atualizáveis.
pub trait Record: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    /// Nome usado nas mensagens de erro ("Property not found").
    const LABEL: &'static str;

    fn id(&self) -> RecordId;

    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

pub type Predicate<'a, R> = &'a (dyn Fn(&R) -> bool + Send + Sync);

/// Checagem feita sobre o estado atual do registro, dentro do lock de escrita.
pub type Guard<'a, R> = &'a (dyn Fn(&R) -> Result<(), AppError> + Send + Sync);

/// O contrato do repositório. A implementação em memória abaixo é a única hoje,
/// mas um adaptador de banco de dados implementaria exatamente isso.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn get_all(&self) -> Vec<R>;

    async fn get_by_id(&self, id: RecordId) -> Result<R, AppError>;

    async fn create(&self, draft: R::Draft) -> Result<R, AppError>;

    async fn update(&self, id: RecordId, patch: R::Patch) -> Result<R, AppError>;

    /// Aplica o patch só se `guard` aceitar o registro como está agora.
    /// Checagem e escrita acontecem sem nenhuma outra mutação no meio.
    async fn update_if(&self, id: RecordId, guard: Guard<'_, R>, patch: R::Patch) -> Result<R, AppError>;

    async fn delete(&self, id: RecordId) -> Result<R, AppError>;

    async fn find_where(&self, predicate: Predicate<'_, R>) -> Vec<R>;

    /// Contador incrementado a cada mutação; serve para invalidar caches.
    async fn revision(&self) -> u64;
}

struct Inner<R> {
    records: Vec<R>,
    revision: u64,
}

pub struct InMemoryStore<R> {
    inner: RwLock<Inner<R>>,
    latency: Duration,
}

impl<R: Record> InMemoryStore<R> {
    pub fn new(latency: Duration) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    pub fn with_records(records: Vec<R>, latency: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner { records, revision: 0 }),
            latency,
        }
    }

    pub fn into_shared(self) -> Arc<dyn RecordStore<R>> {
        Arc::new(self)
    }

    // Simula a latência de um serviço remoto, antes de tocar no estado
    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryStore<R> {
    async fn get_all(&self) -> Vec<R> {
        self.simulate_latency().await;
        self.inner.read().await.records.clone()
    }

    async fn get_by_id(&self, id: RecordId) -> Result<R, AppError> {
        self.simulate_latency().await;
        self.inner
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(R::LABEL))
    }

    async fn create(&self, draft: R::Draft) -> Result<R, AppError> {
        self.simulate_latency().await;

        // O lock de escrita cobre o cálculo do id e o push: dois creates nunca geram o mesmo id
        let mut inner = self.inner.write().await;
        let id = inner.records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        let record = R::from_draft(id, draft, Utc::now());
        inner.records.push(record.clone());
        inner.revision += 1;

        tracing::debug!(label = R::LABEL, id, "registro criado");
        Ok(record)
    }

    async fn update(&self, id: RecordId, patch: R::Patch) -> Result<R, AppError> {
        self.update_if(id, &|_: &R| -> Result<(), AppError> { Ok(()) }, patch).await
    }

    async fn update_if(&self, id: RecordId, guard: Guard<'_, R>, patch: R::Patch) -> Result<R, AppError> {
        self.simulate_latency().await;

        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(R::LABEL))?;
        guard(record)?;
        record.apply(patch);
        let updated = record.clone();
        inner.revision += 1;

        tracing::debug!(label = R::LABEL, id, "registro atualizado");
        Ok(updated)
    }

    async fn delete(&self, id: RecordId) -> Result<R, AppError> {
        self.simulate_latency().await;

        let mut inner = self.inner.write().await;
        let index = inner
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(R::LABEL))?;
        let removed = inner.records.remove(index);
        inner.revision += 1;

        tracing::debug!(label = R::LABEL, id, "registro removido");
        Ok(removed)
    }

    async fn find_where(&self, predicate: Predicate<'_, R>) -> Vec<R> {
        self.simulate_latency().await;
        self.inner
            .read()
            .await
            .records
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }

    async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }
}
