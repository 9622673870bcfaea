//! Graph reads and ingestion for the kindred relationship service.
//!
//! [`resolver`] answers "who is connected to this person" with access
//! decisions applied per edge. [`linker`] attaches a new or existing person
//! to the graph in one step. [`records`] covers the single-record
//! operations. Every read exits through [`projection`], so callers only
//! ever see fully-populated views.

pub mod error;
pub mod linker;
pub mod projection;
pub mod records;
pub mod resolver;

pub use error::{GraphError, Result};
