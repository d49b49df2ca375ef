//! JSON persistence of snapshots and correlation lists.
//!
//! The persisted form is the data model verbatim: the engine owns no file
//! format of its own, so everything round-trips through `serde_json`.

pub mod error;

mod reader;
mod writer;

pub use error::Error;
pub use reader::{read_rebuild, read_snapshot};
pub use writer::{write_correlations, write_rebuild};
