//! NarrativeIQ Backend API
//!
//! Typed bindings for the backend HTTP surface.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/auth/register`, `POST /api/auth/login`
//! - `GET /api/auth/me`
//! - `PUT /api/auth/update-profile`, `PUT /api/auth/change-password`
//!
//! ## Credits
//! - `GET /api/credits/balance`, `GET /api/credits/pricing`
//! - `POST /api/credits/add`
//!
//! ## Enhancement & documents
//! - `GET /api/enhance/personas`, `POST /api/enhance/persona`
//! - `GET /api/enhance/documents`, `GET /api/enhance/documents/:id`
//! - `POST /api/enhance/save`, `GET /api/enhance/history`
//!
//! ## Analysis
//! - `POST /api/analyze/{consistency,structure,character,deep-scan}`
//!
//! ## Mindmap, story, upload
//! - `POST /api/mindmap/generate`, `POST /api/mindmap/image` (binary)
//! - `POST /api/story/complete`
//! - `POST /api/upload/extract` (multipart)
//!
//! # Example
//!
//! ```rust,ignore
//! use narrativeiq::api::{ApiGateway, HttpClient};
//! use narrativeiq::session::MemorySessionStore;
//! use std::sync::Arc;
//!
//! let gateway = ApiGateway::new(
//!     "http://localhost:5000",
//!     Arc::new(HttpClient::new(None)?),
//!     Arc::new(MemorySessionStore::new()),
//! );
//! let personas = gateway.personas().await?;
//! ```

pub mod dto;
pub mod gateway;
#[cfg(feature = "native")]
pub mod http;
pub mod transport;

pub use dto::*;
pub use gateway::{ApiGateway, DEFAULT_API_BASE};
#[cfg(feature = "native")]
pub use http::HttpClient;
pub use transport::{FilePart, HttpRequest, HttpResponse, Method, RequestBody, Transport};
