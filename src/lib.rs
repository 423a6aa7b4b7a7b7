//! Quarterly financial statements, scraped page by page and turned into
//! dense monthly series per ticker.
//!
//! Stages run in order over a ticker list: [`fetch`] → [`extract`] →
//! [`merge`] → [`prep`] → [`join`]. Each stage reads the previous stage's
//! directory and leaves existing outputs alone unless asked to overwrite.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod join;
pub mod logging;
pub mod merge;
pub mod output;
pub mod period;
pub mod prep;
pub mod table;
pub mod tickers;
pub mod validate;

pub use error::FormatError;
