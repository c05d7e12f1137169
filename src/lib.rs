//! Aggregate queries over a snapshot of remittance transactions.
//!
//! Raw rows (one per transaction and issue pair) are merged by the
//! [`loader`] into one [`Transaction`] per id, and the [`Engine`] answers
//! read-only questions about the result: totals, maxima, per-client lookups,
//! compliance issue filters and rankings.
//!
//! ```no_run
//! use std::path::Path;
//! use tally::{load_file, Engine, SourceFormat};
//!
//! let engine = Engine::new(load_file(Path::new("transactions.json"), SourceFormat::Auto)?);
//! println!("{}", engine.total_amount());
//! # Ok::<(), tally::LoadError>(())
//! ```

pub mod engine;
pub mod error;
pub mod loader;
pub mod ordered;
pub mod transaction;

pub use engine::{ClientSummary, Engine, Summary};
pub use error::{ClientRole, LoadError, QueryError, RecordError};
pub use loader::{load, load_csv, load_file, load_json, SourceFormat, Transactions};
pub use transaction::{Issue, IssueId, RawTransaction, Transaction, TransactionId};
