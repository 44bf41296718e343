// src/db/seed.rs

// Carga inicial das stores a partir dos arquivos JSON estáticos.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::common::error::AppError;
use crate::db::store::Record;

/// Lê um array JSON de registros. Arquivo ausente = store vazia;
/// JSON inválido ou ids repetidos fazem a inicialização falhar.
pub async fn load_records<R>(path: &Path) -> Result<Vec<R>, AppError>
where
    R: Record + DeserializeOwned,
{
    if !tokio::fs::try_exists(path).await? {
        tracing::warn!("Arquivo de seed {} não encontrado; {} começa vazio", path.display(), R::LABEL);
        return Ok(Vec::new());
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<R> = serde_json::from_str(&raw).map_err(|e| AppError::SeedData {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id()) {
            return Err(AppError::SeedData {
                path: path.to_path_buf(),
                reason: format!("duplicate id {}", record.id()),
            });
        }
    }

    tracing::info!("✅ {} registros de {} carregados de {}", records.len(), R::LABEL, path.display());
    Ok(records)
}
