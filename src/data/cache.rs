use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::error::DataResult;
use super::loader::{SourceFormat, load_bytes};
use super::model::Table;

/// Parsed tables keyed by the SHA-256 of the uploaded bytes.
///
/// Re-opening identical content skips parsing. Entries are never mutated or
/// invalidated; failed loads are not stored.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<(SourceFormat, [u8; 32]), Arc<Table>>,
}

impl LoadCache {
    pub fn get_or_load(&mut self, format: SourceFormat, bytes: &[u8]) -> DataResult<Arc<Table>> {
        let digest: [u8; 32] = Sha256::digest(bytes).into();
        let key = (format, digest);
        if let Some(table) = self.entries.get(&key) {
            log::debug!("Load cache hit ({} rows)", table.len());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_bytes(format, bytes)?);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
