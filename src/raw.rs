//! Paging a raw SQL query inside the database.

use crate::{
    checked_count, count_query, DialectRegistry, PageSource, PageWindow, QueryDescriptor, Result, ServerVersion, SqlParam,
};

/// The boundary to whatever actually runs SQL.
///
/// Methods take `&self`; executors around connections that need exclusive
/// access are expected to use interior mutability.
pub trait QueryExecutor {
    type Row;

    /// Vendor identifier used to pick a dialect, e.g. `"postgresql"`.
    fn vendor(&self) -> &str;

    /// Only consulted by dialects that gate on the server version.
    fn server_version(&self) -> Option<ServerVersion> {
        None
    }

    /// Runs a query returning a single integer column; `None` if it returned no rows.
    fn query_count(&self, sql: &str, params: &[SqlParam]) -> Result<Option<i64>>;

    fn query_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Self::Row>>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    type Row = E::Row;

    fn vendor(&self) -> &str {
        (**self).vendor()
    }
    fn server_version(&self) -> Option<ServerVersion> {
        (**self).server_version()
    }
    fn query_count(&self, sql: &str, params: &[SqlParam]) -> Result<Option<i64>> {
        (**self).query_count(sql, params)
    }
    fn query_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Self::Row>> {
        (**self).query_rows(sql, params)
    }
}

/// A raw query paged through an executor the caller owns.
#[derive(Debug)]
pub struct RawQuerySource<'c, E: ?Sized> {
    query: QueryDescriptor,
    executor: &'c E,
    dialects: DialectRegistry,
}

impl<'c, E: QueryExecutor + ?Sized> RawQuerySource<'c, E> {
    pub fn new(query: QueryDescriptor, executor: &'c E) -> Self {
        Self::with_dialects(query, executor, DialectRegistry::default())
    }

    pub fn with_dialects(query: QueryDescriptor, executor: &'c E, dialects: DialectRegistry) -> Self {
        Self {
            query,
            executor,
            dialects,
        }
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    pub fn executor(&self) -> &'c E {
        self.executor
    }

    pub fn dialects(&self) -> &DialectRegistry {
        &self.dialects
    }

    /// The bounded SQL `fetch` would run for `window`.
    pub fn bounded_query(&self, window: PageWindow) -> Result<String> {
        self.dialects.bounded_query(
            self.executor.vendor(),
            &self.query.raw_sql,
            window,
            self.executor.server_version(),
        )
    }
}

impl<'c, E: QueryExecutor + ?Sized> PageSource for RawQuerySource<'c, E> {
    type Item = E::Row;

    fn count(&self) -> Result<u64> {
        let sql = count_query(&self.query.raw_sql);
        tracing::debug!(database = %self.query.database_id, sql = %sql, "counting raw query rows");
        checked_count(self.executor.query_count(&sql, &self.query.params)?)
    }

    fn fetch(&self, window: PageWindow) -> Result<Vec<E::Row>> {
        let sql = self.bounded_query(window)?;
        tracing::debug!(
            database = %self.query.database_id,
            vendor = self.executor.vendor(),
            limit = window.limit,
            offset = window.offset,
            sql = %sql,
            "fetching page"
        );
        self.executor.query_rows(&sql, &self.query.params)
    }
}
