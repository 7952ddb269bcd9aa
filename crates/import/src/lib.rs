//! # Atlas Import
//!
//! Import adapters that turn external documents into library fragments, kept
//! fully decoupled from the graph engine behind a capability interface:
//! every adapter is `parse(bytes) -> Library`, selected by file-name suffix
//! dispatch, so adapters can be swapped or stubbed in tests.
//!
//! Shipped adapters cover the tabular solution-table JSON export, decoded
//! workbook rows, and plain-text notes, plus the free-text dependency-table
//! parser used by the dependency import action.

mod adapter;
mod dependency_table;
mod error;
mod notes_text;
mod sheet_rows;
mod solution_table;

pub use adapter::{AdapterRegistry, ImportAdapter, ImportDiagnostic, ImportFile};
pub use dependency_table::{parse_dependency_table, DependencyTable, ProcessRef};
pub use error::{ImportError, Result};
pub use notes_text::NotesTextAdapter;
pub use sheet_rows::SheetRowsAdapter;
pub use solution_table::{parse_range_or_list, SolutionTableAdapter};

use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric process identifier: three or more digits.
pub(crate) static NUMERIC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3,}$").expect("valid regex"));
