// Fixtures compartilhadas pelos testes de integração.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use realty_ledger::{
    common::error::AppError,
    config::AppState,
    db::{Guard, InMemoryStore, Predicate, Record, RecordId, RecordStore},
    models::{
        commission::Commission,
        property::{Property, PropertyCategory, PropertyStatus},
        user::{User, UserRole},
    },
    services::commission_engine::{RateSchedule, RateTable},
};

pub fn property(id: RecordId, price: u64, status: PropertyStatus) -> Property {
    Property {
        id,
        title: format!("Property {id}"),
        location: "Whitefield, Bangalore".into(),
        category: PropertyCategory::Villa,
        size: "2400 sq ft".into(),
        price,
        status,
        images: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap(),
        listed_by: None,
        description: None,
    }
}

pub fn user(id: RecordId, role: UserRole, upline_id: Option<RecordId>) -> User {
    User {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@realestate.com"),
        phone: "9876543210".into(),
        role,
        joined_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        is_active: true,
        upline_id,
    }
}

pub fn team() -> Vec<User> {
    vec![
        user(1, UserRole::Admin, None),
        user(2, UserRole::Member, Some(1)),
        user(3, UserRole::SubMember, Some(2)),
    ]
}

pub fn state_with(
    properties: Arc<dyn RecordStore<Property>>,
    users: Vec<User>,
    commissions: Arc<dyn RecordStore<Commission>>,
) -> AppState {
    AppState::from_stores(
        properties,
        InMemoryStore::with_records(users, Duration::ZERO).into_shared(),
        commissions,
        RateSchedule::new(RateTable::standard()),
    )
}

/// Estado com stores em memória sem latência.
pub fn state(properties: Vec<Property>, users: Vec<User>, commissions: Vec<Commission>) -> AppState {
    state_with(
        InMemoryStore::with_records(properties, Duration::ZERO).into_shared(),
        users,
        InMemoryStore::with_records(commissions, Duration::ZERO).into_shared(),
    )
}

/// Store que delega tudo para uma `InMemoryStore`, mas pode recusar updates ou deletes.
pub struct FlakyStore<R> {
    inner: InMemoryStore<R>,
    fail_update: bool,
    fail_delete: bool,
}

impl<R: Record> FlakyStore<R> {
    pub fn new(records: Vec<R>, fail_update: bool, fail_delete: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryStore::with_records(records, Duration::ZERO),
            fail_update,
            fail_delete,
        })
    }
}

fn offline() -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("store offline"))
}

#[async_trait]
impl<R: Record> RecordStore<R> for FlakyStore<R> {
    async fn get_all(&self) -> Vec<R> {
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: RecordId) -> Result<R, AppError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, draft: R::Draft) -> Result<R, AppError> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: RecordId, patch: R::Patch) -> Result<R, AppError> {
        if self.fail_update {
            return Err(offline());
        }
        self.inner.update(id, patch).await
    }

    async fn update_if(&self, id: RecordId, guard: Guard<'_, R>, patch: R::Patch) -> Result<R, AppError> {
        if self.fail_update {
            return Err(offline());
        }
        self.inner.update_if(id, guard, patch).await
    }

    async fn delete(&self, id: RecordId) -> Result<R, AppError> {
        if self.fail_delete {
            return Err(offline());
        }
        self.inner.delete(id).await
    }

    async fn find_where(&self, predicate: Predicate<'_, R>) -> Vec<R> {
        self.inner.find_where(predicate).await
    }

    async fn revision(&self) -> u64 {
        self.inner.revision().await
    }
}
