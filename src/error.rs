//! Error types for raw-page-util.
//!
//! Page-number errors ([`Error::PageNotAnInteger`], [`Error::EmptyPage`]) are
//! the ones callers are expected to catch and turn into "page not found";
//! everything else is a dialect, configuration or database failure.

use crate::ServerVersion;
use ::thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("page number {token:?} is not an integer")]
    PageNotAnInteger { token: String },

    #[error("page {number} {reason}")]
    EmptyPage { number: i64, reason: EmptyPageReason },

    #[error("{vendor} is not supported by the raw query paginator")]
    UnsupportedDatabase { vendor: String },

    #[error("{vendor} version must be {required} or higher (found {})", .found.map(|v| v.to_string()).unwrap_or_else(|| "unknown".into()))]
    UnsupportedDatabaseVersion {
        vendor: String,
        required: ServerVersion,
        found: Option<ServerVersion>,
    },

    #[error("per_page must be between 1 and {} (got {per_page})", .max.map(u64::from).unwrap_or(u64::MAX))]
    InvalidPerPage { per_page: u64, max: Option<u32> },

    #[error("database error: {0}")]
    Database(#[source] BoxError),
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, IsVariant, PartialEq)]
pub enum EmptyPageReason {
    #[display(fmt = "is less than 1")]
    BelowRange,
    #[display(fmt = "contains no results")]
    NoResults,
}

impl Error {
    pub fn database(err: impl Into<BoxError>) -> Self {
        Self::Database(err.into())
    }

    /// True for the errors caused by the requested page number rather than
    /// by the database or configuration.
    pub fn is_invalid_page(&self) -> bool {
        matches!(self, Self::PageNotAnInteger { .. } | Self::EmptyPage { .. })
    }

    pub(crate) fn below_range(number: i64) -> Self {
        Self::EmptyPage {
            number,
            reason: EmptyPageReason::BelowRange,
        }
    }

    pub(crate) fn no_results(number: i64) -> Self {
        Self::EmptyPage {
            number,
            reason: EmptyPageReason::NoResults,
        }
    }
}

#[cfg(feature = "diesel")]
impl From<::diesel::result::Error> for Error {
    fn from(err: ::diesel::result::Error) -> Self {
        Self::Database(Box::new(err))
    }
}
