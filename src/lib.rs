//! Page-oriented slicing of raw SQL queries, done by the database.
//!
//! A [`Paginator`] counts the rows of a raw query once with a wrapped
//! `COUNT(*)`, and fetches each page with a bounded query in the connected
//! vendor's syntax (see [`DialectRegistry`]). The same paginator also slices
//! in-memory collections through the [`PageSource`] trait.

#[macro_use]
extern crate cfg_if;
#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate serde;

mod calculator;
mod config;
mod count;
mod dialect;
mod error;
mod page;
mod paginator;
mod query;
mod raw;
mod source;
mod window;

pub use crate::calculator::*;
pub use crate::config::*;
pub use crate::count::*;
pub use crate::dialect::*;
pub use crate::error::*;
pub use crate::page::*;
pub use crate::paginator::*;
pub use crate::query::*;
pub use crate::raw::*;
pub use crate::source::*;
pub use crate::window::*;

cfg_if! { if #[cfg(feature = "diesel")] {
    mod diesel;
    pub use crate::diesel::*;
} }
