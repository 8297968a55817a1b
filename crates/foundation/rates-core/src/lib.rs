//! # Rates Core
//!
//! Domain model for the rates board.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     RATE SNAPSHOT TABLE                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Timestamp          05 Marla  08 Marla  ...  08 Marla Comm.  │
//! │  2024-01-14 10:00      50        75     ...       310        │
//! │  2024-01-15 10:00      52        74     ...       310        │  <- previous
//! │  2024-01-16 10:00      53        74     ...       315        │  <- current
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - Rows are kept sorted by timestamp, oldest first
//! - The category set is fixed at compile time ([`Category::ALL`])
//! - Deltas compare the last two rows, see [`delta::compute_deltas`]

pub mod category;
pub mod delta;
pub mod table;

pub use category::Category;
pub use delta::{compute_deltas, format_delta, format_rate, CategoryDelta, DeltaState};
pub use table::{RateTable, SnapshotRow, TIMESTAMP_COLUMN};

/// Result type for rates-board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or configuring the board
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid timestamp on line {line}: {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Invalid rate for {category} on line {line}: {value:?}")]
    InvalidRate {
        line: u64,
        category: Category,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
