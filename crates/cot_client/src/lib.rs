//! Client for the COT Analysis Platform backend.
//!
//! The [`CachedFetcher`] wraps every GET with a short-TTL response cache and
//! falls back to stale entries when the network fails. [`CotApiClient`]
//! exposes one method per backend endpoint and adapts each payload to the
//! canonical schema, and [`DashboardContext`] owns the per-session state
//! (selected symbol, history window) that drives whole-dashboard reloads.

pub mod api;
pub mod cache;
pub mod context;
pub mod fetcher;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::CotApiClient;
pub use cache::{CacheEntry, ResponseCache};
pub use context::{DashboardContext, DashboardSnapshot, Overview, Panel, ReloadReport};
pub use fetcher::{CachedFetcher, Fetched, Origin};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
