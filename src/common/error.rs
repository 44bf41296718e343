// src/common/error.rs

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::db::RecordId;

// Erros de domínio do ledger. Nada aqui derruba o processo, exceto na carga inicial.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("One or more fields are invalid")]
    ValidationError(#[from] ValidationErrors),

    // A mensagem já vem pronta ("Property not found")
    #[error("{0}")]
    NotFound(String),

    #[error("{entity} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    // Venda parcialmente gravada: a comissão existe, mas o imóvel não foi marcado como vendido
    #[error(
        "Commission {commission_id} was recorded but property {property_id} could not be marked as sold"
    )]
    ConsistencyGap {
        commission_id: RecordId,
        property_id: RecordId,
    },

    #[error("Invalid seed file {}: {reason}", path.display())]
    SeedData { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(label: &str) -> Self {
        AppError::NotFound(format!("{label} not found"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Campo -> mensagens, no mesmo formato que a camada de apresentação exibe.
    /// Erros que não são de validação viram uma entrada única em "error".
    pub fn details(&self) -> HashMap<String, Vec<String>> {
        let mut details = HashMap::new();
        match self {
            AppError::ValidationError(errors) => {
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
            }
            other => {
                details.insert("error".to_string(), vec![other.to_string()]);
            }
        }
        details
    }
}

/// Monta um `ValidationError` com código e mensagem legível.
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}
