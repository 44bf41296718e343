pub mod store;
pub use store::{Guard, InMemoryStore, Predicate, Record, RecordId, RecordStore};
pub mod seed;

use std::sync::Arc;

use crate::models::{commission::Commission, property::Property, user::User};

// Um repositório por entidade, todos sobre o mesmo contrato
pub type PropertyRepository = Arc<dyn RecordStore<Property>>;
pub type UserRepository = Arc<dyn RecordStore<User>>;
pub type CommissionRepository = Arc<dyn RecordStore<Commission>>;
