//! Provider version layer: upstream fetching, durable caching, and the
//! refresh workflow that ties them together
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ UpstreamHost │────▶│   refresh   │────▶│ VersionStore │
//! │   (fetch)    │     │ (workflow)  │     │  (storage)   │
//! └──────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-backed implementation of [`store::VersionStore`]
//! - [`github`]: GitHub REST implementation of [`upstream::UpstreamHost`]
//! - [`refresh`]: the validate → lookup → staleness → existence → fetch →
//!   store workflow
//! - [`store`]: storage trait plus the tri-state [`store::CacheLookup`]
//! - [`upstream`]: upstream host trait
//! - [`error`]: error taxonomy for cache, upstream, and refresh failures
//! - [`types`]: provider keys, version records, and cache documents

pub mod cache;
pub mod error;
pub mod github;
pub mod refresh;
pub mod store;
pub mod types;
pub mod upstream;
