//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod analysis;
pub mod diff;
pub mod guard;
pub mod loading;
pub mod nav;
pub mod toast;
pub mod upload;

pub use analysis::AnalysisPanel;
pub use diff::DiffView;
pub use guard::Guarded;
pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use toast::Toast;
pub use upload::UploadButton;
