//! Page Components
//!
//! One component per route.

pub mod auth;
pub mod credits;
pub mod dashboard;
pub mod documents;
pub mod history;
pub mod index;
pub mod mindmap;
pub mod profile;
pub mod story;

pub use auth::Auth;
pub use credits::Credits;
pub use dashboard::Dashboard;
pub use documents::Documents;
pub use history::History;
pub use index::Index;
pub use mindmap::Mindmap;
pub use profile::Profile;
pub use story::Story;

/// `"1 credit"`, `"2 credits"`
pub(crate) fn credits_label(n: u32) -> String {
    format!("{} credit{}", n, if n == 1 { "" } else { "s" })
}
