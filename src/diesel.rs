//! [`QueryExecutor`](crate::QueryExecutor) over a diesel connection.
//!
//! Rows come back through [`diesel::sql_query`], so the row type must be
//! [`QueryableByName`](diesel::QueryableByName) for the connection's backend.

use crate::ServerVersion;
use ::std::cell::RefCell;
use ::std::marker::PhantomData;

cfg_if! { if #[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))] {
    use crate::{Error, QueryExecutor, Result, SqlParam};
    use ::diesel::query_builder::{BoxedSqlQuery, SqlQuery};
    use ::diesel::sql_types::{BigInt, Bool, Double, Nullable, Text, Timestamp};
    use ::diesel::{QueryableByName, RunQueryDsl};
    use ::std::cell::RefMut;

    // field name must match crate::COUNT_COLUMN_NAME
    #[derive(Debug, QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = BigInt)]
        row_count: i64,
    }
} }

/// Owns a diesel connection and pages raw queries through it.
///
/// The connection sits in a `RefCell`: diesel needs `&mut` access while
/// pages borrow the paginator immutably.
pub struct DieselExecutor<C, U> {
    conn: RefCell<C>,
    server_version: Option<ServerVersion>,
    row: PhantomData<fn() -> U>,
}

impl<C, U> DieselExecutor<C, U> {
    pub fn new(conn: C) -> Self {
        Self {
            conn: RefCell::new(conn),
            server_version: None,
            row: PhantomData,
        }
    }

    pub fn with_server_version(mut self, version: impl Into<ServerVersion>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    pub fn into_inner(self) -> C {
        self.conn.into_inner()
    }

    #[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
    fn conn(&self) -> Result<RefMut<'_, C>> {
        self.conn
            .try_borrow_mut()
            .map_err(|_| Error::database("diesel connection is already in use"))
    }
}

#[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
macro_rules! bind_params {
    ($backend:ty, $sql:expr, $params:expr) => {{
        let mut query: BoxedSqlQuery<'static, $backend, SqlQuery> = ::diesel::sql_query($sql).into_boxed();
        for param in $params.iter().cloned() {
            query = match param {
                SqlParam::Null => query.bind::<Nullable<Text>, _>(None::<String>),
                SqlParam::Bool(value) => query.bind::<Bool, _>(value),
                SqlParam::Int(value) => query.bind::<BigInt, _>(value),
                SqlParam::Float(value) => query.bind::<Double, _>(value),
                SqlParam::Timestamp(value) => query.bind::<Timestamp, _>(value),
                SqlParam::Uuid(value) => query.bind::<Text, _>(value.to_string()),
                SqlParam::Text(value) => query.bind::<Text, _>(value),
            };
        }
        query
    }};
}

macro_rules! diesel_executor {
    ($($feature:literal: $conn:ty, $backend:ty, $vendor:expr;)*) => {
        $(
            #[cfg(feature = $feature)]
            impl<U> QueryExecutor for DieselExecutor<$conn, U>
            where
                U: QueryableByName<$backend> + 'static,
            {
                type Row = U;

                fn vendor(&self) -> &str {
                    $vendor
                }

                fn server_version(&self) -> Option<ServerVersion> {
                    self.server_version
                }

                fn query_count(&self, sql: &str, params: &[SqlParam]) -> Result<Option<i64>> {
                    let mut conn = self.conn()?;
                    let rows: Vec<CountRow> = bind_params!($backend, sql, params).load(&mut *conn)?;
                    match rows.as_slice() {
                        [] => Ok(None),
                        [row] => Ok(Some(row.row_count)),
                        _ => Err(Error::database(format!("count query returned {} rows", rows.len()))),
                    }
                }

                fn query_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<U>> {
                    let mut conn = self.conn()?;
                    Ok(bind_params!($backend, sql, params).load(&mut *conn)?)
                }
            }
        )*
    };
}

diesel_executor! {
    "postgres": ::diesel::pg::PgConnection, ::diesel::pg::Pg, crate::POSTGRESQL;
    "mysql": ::diesel::mysql::MysqlConnection, ::diesel::mysql::Mysql, crate::MYSQL;
    "sqlite": ::diesel::sqlite::SqliteConnection, ::diesel::sqlite::Sqlite, crate::SQLITE;
}
