//! State Management
//!
//! Global session state and reactive handles over the shared page
//! controllers.

pub mod controller;
pub mod global;

pub use controller::Controller;
pub use global::{provide_global_state, use_report, GlobalState};
