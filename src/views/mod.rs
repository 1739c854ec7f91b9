//! Presentational view models
//!
//! Pure functions of data that was already fetched. The browser UI renders
//! these as components; the CLI renders them as plain text.

pub mod analysis;
pub mod diff;
pub mod layout;
pub mod text;

pub use analysis::{AnalysisView, ScoreTone, Severity};
pub use diff::{DiffKind, DiffSpan};
pub use layout::{NavItem, FEATURES, NAV_ITEMS};
