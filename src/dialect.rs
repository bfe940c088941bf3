//! Vendor-specific bounded queries.
//!
//! A [`DialectRegistry`] maps the vendor identifier reported by a connection
//! (`"postgresql"`, `"mysql"`, ...) to a [`QueryDialect`] that wraps a raw
//! query so the database only returns the rows of one [`PageWindow`].

use crate::{Error, PageWindow, Result};
use ::dyn_clone::DynClone;
use ::itertools::Itertools;
use ::std::collections::HashMap;
use ::std::fmt;

pub static PAGINATION_SUBQUERY_ALIAS: &str = "sub_query_for_pagination";

pub static MYSQL: &str = "mysql";
pub static POSTGRESQL: &str = "postgresql";
pub static SQLITE: &str = "sqlite";
pub static ORACLE: &str = "oracle";
pub static FIREBIRD: &str = "firebird";

/// `major.minor` version of the connected database server.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl From<(u32, u32)> for ServerVersion {
    fn from((major, minor): (u32, u32)) -> Self {
        Self::new(major, minor)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

pub trait QueryDialect: DynClone + Send + Sync {
    fn bounded_query(&self, raw_sql: &str, window: PageWindow, version: Option<ServerVersion>) -> Result<String>;
}

dyn_clone::clone_trait_object!(QueryDialect);

impl<F> QueryDialect for F
where
    F: Fn(&str, PageWindow, Option<ServerVersion>) -> Result<String> + Clone + Send + Sync,
{
    fn bounded_query(&self, raw_sql: &str, window: PageWindow, version: Option<ServerVersion>) -> Result<String> {
        self(raw_sql, window, version)
    }
}

/// `LIMIT n OFFSET m`; understood by mysql, postgresql and sqlite.
#[derive(Clone, Copy, Debug, Default)]
pub struct LimitOffset;

impl QueryDialect for LimitOffset {
    fn bounded_query(&self, raw_sql: &str, window: PageWindow, _: Option<ServerVersion>) -> Result<String> {
        Ok(format!(
            "SELECT * FROM ({raw_sql}) AS {PAGINATION_SUBQUERY_ALIAS} LIMIT {} OFFSET {}",
            window.limit, window.offset,
        ))
    }
}

/// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, available from Oracle 12.1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Oracle;

impl Oracle {
    pub const MIN_VERSION: ServerVersion = ServerVersion::new(12, 1);
}

impl QueryDialect for Oracle {
    fn bounded_query(&self, raw_sql: &str, window: PageWindow, version: Option<ServerVersion>) -> Result<String> {
        match version {
            Some(found) if found >= Self::MIN_VERSION => Ok(format!(
                "SELECT * FROM ({raw_sql}) AS {PAGINATION_SUBQUERY_ALIAS} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                window.offset, window.limit,
            )),
            found => Err(Error::UnsupportedDatabaseVersion {
                vendor: ORACLE.into(),
                required: Self::MIN_VERSION,
                found,
            }),
        }
    }
}

/// `SELECT FIRST n SKIP m`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Firebird;

impl QueryDialect for Firebird {
    fn bounded_query(&self, raw_sql: &str, window: PageWindow, _: Option<ServerVersion>) -> Result<String> {
        Ok(format!(
            "SELECT FIRST {} SKIP {} * FROM ({raw_sql}) AS {PAGINATION_SUBQUERY_ALIAS}",
            window.limit, window.offset,
        ))
    }
}

#[derive(Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Box<dyn QueryDialect>>,
}

impl DialectRegistry {
    pub fn empty() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::empty()
            .with(MYSQL, LimitOffset)
            .with(POSTGRESQL, LimitOffset)
            .with(SQLITE, LimitOffset)
            .with(ORACLE, Oracle)
            .with(FIREBIRD, Firebird)
    }

    /// Adds or replaces the dialect used for `vendor`.
    pub fn register(&mut self, vendor: impl Into<String>, dialect: impl QueryDialect + 'static) -> &mut Self {
        self.dialects.insert(vendor.into(), Box::new(dialect));
        self
    }

    pub fn with(mut self, vendor: impl Into<String>, dialect: impl QueryDialect + 'static) -> Self {
        self.register(vendor, dialect);
        self
    }

    pub fn get(&self, vendor: &str) -> Option<&dyn QueryDialect> {
        self.dialects.get(vendor).map(|dialect| &**dialect)
    }

    pub fn supports(&self, vendor: &str) -> bool {
        self.dialects.contains_key(vendor)
    }

    /// Registered vendor identifiers, sorted.
    pub fn vendors(&self) -> Vec<&str> {
        self.dialects.keys().map(String::as_str).sorted().collect()
    }

    pub fn bounded_query(
        &self,
        vendor: &str,
        raw_sql: &str,
        window: PageWindow,
        version: Option<ServerVersion>,
    ) -> Result<String> {
        let dialect = self.get(vendor).ok_or_else(|| Error::UnsupportedDatabase {
            vendor: vendor.to_owned(),
        })?;
        dialect.bounded_query(raw_sql, window, version)
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("vendors", &self.vendors().into_iter().join(", "))
            .finish()
    }
}
