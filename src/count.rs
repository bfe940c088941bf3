use crate::{Error, Result};
use ::once_cell::unsync::OnceCell;

pub static COUNT_SUBQUERY_ALIAS: &str = "sub_query_for_count";
pub static COUNT_COLUMN_NAME: &str = "row_count";

/// Wraps `raw_sql` so it returns a single `row_count` column holding the
/// number of rows the raw query produces.
pub fn count_query(raw_sql: &str) -> String {
    format!("SELECT COUNT(*) AS {COUNT_COLUMN_NAME} FROM ({raw_sql}) AS {COUNT_SUBQUERY_ALIAS}")
}

/// Checks the scalar returned by a count query.
pub fn checked_count(value: Option<i64>) -> Result<u64> {
    let value = value.ok_or_else(|| Error::database("count query returned no rows"))?;
    u64::try_from(value).map_err(|_| Error::database(format!("count query returned a negative count ({value})")))
}

/// A row count resolved at most once.
///
/// Failures are not cached: the next access runs the count again. There is
/// no invalidation, a fresh count needs a fresh cache.
#[derive(Clone, Debug, Default)]
pub struct CountCache(OnceCell<u64>);

impl CountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<u64> {
        self.0.get().copied()
    }

    pub fn get_or_resolve(&self, resolve: impl FnOnce() -> Result<u64>) -> Result<u64> {
        if let Some(count) = self.get() {
            tracing::trace!(count, "reusing cached count");
            return Ok(count);
        }
        self.0.get_or_try_init(resolve).copied()
    }
}
