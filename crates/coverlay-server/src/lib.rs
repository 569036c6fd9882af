//! Coverlay server integration
//!
//! Mounts the coverage pipeline's HTTP surface on an axum-based dev server:
//! a middleware that answers `GET /__coverage__` with the accumulated
//! runtime counters as pretty-printed JSON, and falls through to the host's
//! routes for every other path. The middleware is only installed when the
//! session gate is enabled; a disabled session leaves the router exactly as
//! it was.
//!
//! ```no_run
//! use axum::Router;
//! # fn attach_to(router: Router, session: &coverlay::PluginSession) -> Router {
//! let router = coverlay_server::attach(router, session);
//! # router }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod endpoint;

pub use endpoint::{attach, with_registry, COVERAGE_PUBLIC_PATH};
