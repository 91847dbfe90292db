#![warn(missing_docs)]
//! mdedit HTTP - blocking server collaborators for `mdedit-core`.
//!
//! [`HttpClient`] implements [`ContentStore`](mdedit_core::ContentStore),
//! [`ListingApi`](mdedit_core::ListingApi) and [`SearchApi`](mdedit_core::SearchApi) against the
//! wiki server's routes. Every non-success status becomes
//! [`ApiError::Status`](mdedit_core::ApiError::Status); nothing is retried.
//!
//! ```rust,no_run
//! use mdedit_core::{DocumentId, ContentStore};
//! use mdedit_http::HttpClient;
//!
//! let client = HttpClient::new("http://localhost:8000")?;
//! client.save(&DocumentId::article("demo", 1), "# Title\n")?;
//! # Ok::<(), mdedit_core::ApiError>(())
//! ```

mod client;
pub mod routes;

pub use client::HttpClient;
pub use routes::Routes;
