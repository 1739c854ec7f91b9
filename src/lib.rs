//! # NarrativeIQ
//!
//! Client core for the NarrativeIQ narrative-writing assistant. The backend
//! does the writing and analysis; this crate holds everything between it and
//! a screen.
//!
//! ## Modules
//!
//! - [`api`]: typed gateway over a pluggable HTTP transport
//! - [`session`]: durable bearer credential
//! - [`auth`]: the current user, shared by every page
//! - [`guard`]: route table and access decisions
//! - [`controllers`]: per-page state and the paid-operation pipeline
//! - [`views`]: presentational helpers shared by the UI and the CLI
//!
//! With the default `native` feature the crate also ships a reqwest
//! transport, a file-backed session, TOML config and the `narrativeiq` CLI.
//! Build with `default-features = false` for the browser.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use narrativeiq::api::{ApiGateway, HttpClient};
//! use narrativeiq::auth::AuthSession;
//! use narrativeiq::controllers::{AnalysisKind, WorkspaceController};
//! use narrativeiq::session::FileSessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = ApiGateway::new(
//!         "http://localhost:5000",
//!         Arc::new(HttpClient::new(None)?),
//!         Arc::new(FileSessionStore::new("./narrativeiq_data")),
//!     );
//!     let auth = Arc::new(AuthSession::new(gateway));
//!     auth.login("ann@example.com", "secret1").await?;
//!
//!     let workspace = WorkspaceController::new(auth.clone());
//!     workspace.set_text("It was a dark and stormy night.");
//!     workspace.analyze(AnalysisKind::Structure).await?;
//!
//!     println!("{} credits left", auth.credits());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod controllers;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod views;

#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;

#[cfg(test)]
mod testing;

pub use api::{ApiGateway, Transport};
pub use auth::{AuthSession, AuthState};
pub use controllers::Operation;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardDecision, Route};
pub use models::User;
pub use session::{MemorySessionStore, SessionStore};
