//! Cached GET with stale fallback.
//!
//! Successful payloads are stored per URL. Within the freshness window a
//! repeat request is answered from memory; after a failed request the last
//! good payload is served instead, unless the caller asked to bypass the
//! cache. Concurrent non-bypassing requests for one URL share a single
//! network call and its outcome, success or failure.

use chrono::Utc;
use common::config::FetchConfig;
use common::{DashboardConfig, Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use normalize::search::is_truthy;
use normalize::signals_error;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

use crate::cache::ResponseCache;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Where a returned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Fetched from the network on this call.
    Fresh,
    /// Served from a cache entry within its freshness window.
    Cached,
    /// Served from an expired entry after the network request failed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Fetched {
    pub value: Value,
    pub origin: Origin,
}

/// Outcome of an in-flight request, published once it settles.
type Flight = watch::Receiver<Option<Result<Fetched>>>;

enum Role {
    Leader(watch::Sender<Option<Result<Fetched>>>),
    Follower(Flight),
}

/// Drops the in-flight entry when the leading request settles or is cancelled.
struct FlightGuard<'a> {
    flights: &'a DashMap<String, Flight>,
    key: &'a str,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flights.remove(self.key);
    }
}

#[derive(Clone)]
pub struct CachedFetcher {
    transport: Arc<dyn Transport>,
    base_url: Url,
    cache: ResponseCache,
    in_flight: Arc<DashMap<String, Flight>>,
    ttl: Duration,
    timeout: Duration,
    coalesce: bool,
}

impl CachedFetcher {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, fetch: &FetchConfig) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| Error::Url(format!("{base_url}: {e}")))?;
        Ok(Self {
            transport,
            base_url,
            cache: ResponseCache::new(),
            in_flight: Arc::new(DashMap::new()),
            ttl: fetch.cache_ttl(),
            timeout: fetch.timeout(),
            coalesce: fetch.coalesce_in_flight,
        })
    }

    /// Fetcher over a pooled `reqwest` client.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api.user_agent)?;
        Self::new(Arc::new(transport), &config.api.base_url, &config.fetch)
    }

    /// GET `url` through the cache with the default timeout.
    pub async fn fetch_with_cache(&self, url: &str, bypass_cache: bool) -> Result<Value> {
        self.fetch_with_origin(url, bypass_cache, self.timeout)
            .await
            .map(|fetched| fetched.value)
    }

    /// GET `url` through the cache, reporting where the value came from.
    pub async fn fetch_with_origin(&self, url: &str, bypass_cache: bool, timeout: Duration) -> Result<Fetched> {
        if bypass_cache {
            return self.fetch_network(url, true, timeout).await;
        }

        if let Some(value) = self.cache.get_fresh(url, self.ttl) {
            debug!("cache hit for {}", url);
            return Ok(Fetched { value, origin: Origin::Cached });
        }

        if !self.coalesce {
            return self.fetch_network(url, false, timeout).await;
        }

        match self.join_flight(url) {
            Role::Leader(publish) => {
                let _flight = FlightGuard {
                    flights: &self.in_flight,
                    key: url,
                };
                // A previous flight may have filled the entry since the first check.
                let outcome = match self.cache.get_fresh(url, self.ttl) {
                    Some(value) => Ok(Fetched { value, origin: Origin::Cached }),
                    None => self.fetch_network(url, false, timeout).await,
                };
                publish.send_replace(Some(outcome.clone()));
                outcome
            }
            Role::Follower(mut flight) => {
                let shared = match tokio::time::timeout(timeout, flight.wait_for(Option::is_some)).await {
                    Ok(Ok(settled)) => Option::clone(&settled),
                    Ok(Err(_)) => None,
                    Err(_) => return self.expired_wait(url, timeout),
                };
                match shared {
                    Some(outcome) => {
                        debug!("coalesced onto in-flight request for {}", url);
                        outcome.map(|fetched| Fetched {
                            origin: match fetched.origin {
                                Origin::Fresh => Origin::Cached,
                                other => other,
                            },
                            value: fetched.value,
                        })
                    }
                    // The leading request was cancelled before it settled.
                    None => self.fetch_network(url, false, timeout).await,
                }
            }
        }
    }

    /// Plain GET that neither reads nor writes the cache.
    pub async fn fetch_uncached(&self, url: &str, timeout: Duration) -> Result<Value> {
        self.request(url, false, timeout).await
    }

    pub fn clear_cache(&self) {
        let dropped = self.cache.len();
        self.cache.clear();
        debug!("cleared {} cached responses", dropped);
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.contains(url)
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    fn join_flight(&self, url: &str) -> Role {
        match self.in_flight.entry(url.to_string()) {
            Entry::Occupied(entry) => Role::Follower(entry.get().clone()),
            Entry::Vacant(entry) => {
                let (publish, flight) = watch::channel(None);
                entry.insert(flight);
                Role::Leader(publish)
            }
        }
    }

    /// A follower outwaited its own deadline: stale entry if any, else timeout.
    fn expired_wait(&self, url: &str, timeout: Duration) -> Result<Fetched> {
        match self.cache.get(url) {
            Some(entry) => {
                warn!("{} still in flight after {:?}; serving cached copy", url, timeout);
                Ok(Fetched {
                    value: entry.value,
                    origin: Origin::Stale,
                })
            }
            None => Err(Error::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn fetch_network(&self, url: &str, bypass_cache: bool, timeout: Duration) -> Result<Fetched> {
        match self.request(url, bypass_cache, timeout).await {
            Ok(value) => {
                if !is_truthy(&value) || signals_error(&value) {
                    debug!("not caching empty or error payload from {}", url);
                } else {
                    self.cache.insert(url, value.clone());
                }
                Ok(Fetched { value, origin: Origin::Fresh })
            }
            Err(err) if err.is_fetch_failure() && !bypass_cache => match self.cache.get(url) {
                Some(entry) => {
                    warn!(
                        "{} failed ({}); serving cached copy from {}s ago",
                        url,
                        err,
                        entry.age().as_secs()
                    );
                    Ok(Fetched {
                        value: entry.value,
                        origin: Origin::Stale,
                    })
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(url)
                .map_err(|e| Error::Url(format!("{url}: {e}"))),
            Err(e) => Err(Error::Url(format!("{url}: {e}"))),
        }
    }

    async fn request(&self, url: &str, bypass_cache: bool, timeout: Duration) -> Result<Value> {
        let mut target = self.resolve(url)?;
        let mut headers = Vec::new();
        if bypass_cache {
            target
                .query_pairs_mut()
                .append_pair("_t", &Utc::now().timestamp_millis().to_string());
            headers.push((
                "Cache-Control".to_string(),
                "no-cache, no-store, must-revalidate".to_string(),
            ));
            headers.push(("Pragma".to_string(), "no-cache".to_string()));
        }

        let request = HttpRequest {
            url: target.to_string(),
            headers,
        };

        let response = match tokio::time::timeout(timeout, self.transport.get(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        };

        if !response.is_success() {
            return Err(Error::Http {
                status: response.status,
                url: url.to_string(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| Error::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTransport, BASE};
    use serde_json::json;

    fn fetcher_with(transport: &Arc<FakeTransport>, fetch: FetchConfig) -> CachedFetcher {
        let transport: Arc<dyn Transport> = transport.clone();
        CachedFetcher::new(transport, BASE, &fetch).unwrap()
    }

    fn fetcher(transport: &Arc<FakeTransport>) -> CachedFetcher {
        fetcher_with(transport, FetchConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_within_ttl_hits_cache() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD", "SILVER"]));
        let fetcher = fetcher(&transport);

        let first = fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        let second = fetcher
            .fetch_with_origin("/api/symbols", false, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(first, json!(["GOLD", "SILVER"]));
        assert_eq!(second.value, first);
        assert_eq!(second.origin, Origin::Cached);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        transport.json("/api/symbols", json!(["GOLD", "OIL"]));

        let fetched = fetcher
            .fetch_with_origin("/api/symbols", false, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(fetched.origin, Origin::Fresh);
        assert_eq!(fetched.value, json!(["GOLD", "OIL"]));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_bypass_always_hits_network() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/system/status", json!({"status": "ok"}));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/system/status", false).await.unwrap();
        fetcher.fetch_with_cache("/api/system/status", true).await.unwrap();
        fetcher.fetch_with_cache("/api/system/status", true).await.unwrap();

        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_bypass_adds_cache_buster_and_headers() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/data/GOLD", json!([]));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/data/GOLD?days=90", true).await.unwrap();

        let request = transport.last_request().unwrap();
        assert!(request.url.starts_with("http://cot.test/api/data/GOLD?days=90&_t="));
        assert_eq!(
            request.header("cache-control"),
            Some("no-cache, no-store, must-revalidate")
        );
        assert_eq!(request.header("pragma"), Some("no-cache"));
        // The cache key is the caller's URL, not the busted one.
        assert!(fetcher.is_cached("/api/data/GOLD?days=90"));
        assert_eq!(fetcher.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_plain_request_has_no_cache_buster() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!([]));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://cot.test/api/symbols");
        assert!(request.headers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_serves_stale_entry() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/economic/current", json!({"vix": {"value": 14.2}}));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/economic/current", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(600)).await;
        transport.fail("/api/economic/current", "connection refused");

        let fetched = fetcher
            .fetch_with_origin("/api/economic/current", false, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(fetched.origin, Origin::Stale);
        assert_eq!(fetched.value, json!({"vix": {"value": 14.2}}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_and_bad_json_also_fall_back() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/technical/GOLD", json!({"current_price": 2400.0}));
        let fetcher = fetcher(&transport);
        fetcher.fetch_with_cache("/api/technical/GOLD", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        transport.status("/api/technical/GOLD", 503);
        let from_http = fetcher.fetch_with_cache("/api/technical/GOLD", false).await.unwrap();
        assert_eq!(from_http, json!({"current_price": 2400.0}));

        transport.raw("/api/technical/GOLD", "<html>bad gateway</html>");
        let from_decode = fetcher.fetch_with_cache("/api/technical/GOLD", false).await.unwrap();
        assert_eq!(from_decode, json!({"current_price": 2400.0}));
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail("/api/symbols", "connection refused");
        let fetcher = fetcher(&transport);

        let err = fetcher.fetch_with_cache("/api/symbols", false).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));

        transport.status("/api/symbols", 500);
        let err = fetcher.fetch_with_cache("/api/symbols", false).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bypass_failure_ignores_cache() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        let fetcher = fetcher(&transport);
        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();

        transport.fail("/api/symbols", "connection reset");
        let err = fetcher.fetch_with_cache("/api/symbols", true).await.unwrap_err();
        assert!(err.is_fetch_failure());
        // The old entry is still there for non-bypassing callers.
        assert!(fetcher.is_cached("/api/symbols"));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        fetcher.clear_cache();
        assert_eq!(fetcher.cached_len(), 0);

        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_cleared_cache_cannot_serve_stale() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        let fetcher = fetcher(&transport);
        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        fetcher.clear_cache();

        transport.fail("/api/symbols", "down");
        assert!(fetcher.fetch_with_cache("/api/symbols", false).await.is_err());
    }

    #[tokio::test]
    async fn test_error_payload_returned_but_not_cached() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/technical/XYZ", json!({"error": "unknown symbol"}));
        let fetcher = fetcher(&transport);

        let value = fetcher.fetch_with_cache("/api/technical/XYZ", false).await.unwrap();
        assert_eq!(value, json!({"error": "unknown symbol"}));
        assert!(!fetcher.is_cached("/api/technical/XYZ"));

        fetcher.fetch_with_cache("/api/technical/XYZ", false).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_payloads_are_not_cached() {
        let transport = Arc::new(FakeTransport::new());
        let fetcher = fetcher(&transport);

        for body in ["null", "false", "0", "\"\""] {
            transport.raw("/api/predictions/GOLD", body);
            fetcher.fetch_with_cache("/api/predictions/GOLD", false).await.unwrap();
            assert!(!fetcher.is_cached("/api/predictions/GOLD"), "{body} was cached");
        }
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn test_falsy_error_member_is_cached() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/system/status", json!({"error": null, "database": {"status": "OK"}}));
        let fetcher = fetcher(&transport);

        fetcher.fetch_with_cache("/api/system/status", false).await.unwrap();
        assert!(fetcher.is_cached("/api/system/status"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_cache_is_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/analysis/complete/GOLD", json!({"symbol": "GOLD"}));
        transport.delay(Duration::from_secs(60));
        let fetcher = fetcher(&transport);

        let err = fetcher
            .fetch_with_origin("/api/analysis/complete/GOLD", false, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, Error::Timeout { timeout_ms: 5000, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_to_stale() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/economic/calendar", json!({"events": []}));
        let fetcher = fetcher(&transport);
        fetcher.fetch_with_cache("/api/economic/calendar", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;

        transport.delay(Duration::from_secs(120));
        let fetched = fetcher
            .fetch_with_origin("/api/economic/calendar", false, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(fetched.origin, Origin::Stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_coalesce() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        transport.delay(Duration::from_millis(200));
        let fetcher = fetcher(&transport);

        let (a, b, c) = tokio::join!(
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
        );

        assert_eq!(transport.calls(), 1);
        let origins = [a.unwrap().origin, b.unwrap().origin, c.unwrap().origin];
        assert_eq!(origins.iter().filter(|o| **o == Origin::Fresh).count(), 1);
        assert_eq!(origins.iter().filter(|o| **o == Origin::Cached).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_timeouts_share_one_request() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        transport.delay(Duration::from_secs(60));
        let fetcher = fetcher(&transport);

        let started = tokio::time::Instant::now();
        let (a, b, c) = tokio::join!(
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
        );

        assert_eq!(transport.calls(), 1);
        assert!(started.elapsed() < Duration::from_secs(6));
        for result in [a, b, c] {
            assert!(result.unwrap_err().is_timeout());
        }
        assert_eq!(fetcher.in_flight_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_failure_shares_stale_entry() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        let fetcher = fetcher(&transport);
        fetcher.fetch_with_cache("/api/symbols", false).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        transport.fail("/api/symbols", "connection refused");
        transport.delay(Duration::from_millis(100));
        let (a, b) = tokio::join!(
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(5)),
        );

        assert_eq!(transport.calls(), 2);
        assert_eq!(a.unwrap().origin, Origin::Stale);
        assert_eq!(b.unwrap().origin, Origin::Stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_request_leaves_no_flight() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        transport.delay(Duration::from_secs(60));
        let fetcher = fetcher(&transport);

        let cancelled = tokio::time::timeout(
            Duration::from_secs(1),
            fetcher.fetch_with_origin("/api/symbols", false, Duration::from_secs(30)),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(fetcher.in_flight_len(), 0);

        transport.delay(Duration::from_millis(1));
        let fetched = fetcher
            .fetch_with_origin("/api/symbols", false, Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(fetched.origin, Origin::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalescing_disabled_sends_every_call() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        transport.delay(Duration::from_millis(200));
        let fetcher = fetcher_with(
            &transport,
            FetchConfig {
                coalesce_in_flight: false,
                ..FetchConfig::default()
            },
        );

        let (a, b) = tokio::join!(
            fetcher.fetch_with_cache("/api/symbols", false),
            fetcher.fetch_with_cache("/api/symbols", false),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bypass_calls_do_not_coalesce() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!(["GOLD"]));
        transport.delay(Duration::from_millis(200));
        let fetcher = fetcher(&transport);

        let (a, b) = tokio::join!(
            fetcher.fetch_with_cache("/api/symbols", true),
            fetcher.fetch_with_cache("/api/symbols", true),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_uncached_leaves_cache_alone() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/scrape/GOLD", json!({"status": "success"}));
        let fetcher = fetcher(&transport);

        fetcher
            .fetch_uncached("/api/scrape/GOLD", Duration::from_secs(5))
            .await
            .unwrap();
        fetcher
            .fetch_uncached("/api/scrape/GOLD", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(transport.calls(), 2);
        assert_eq!(fetcher.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_absolute_url_is_used_as_is() {
        let transport = Arc::new(FakeTransport::new());
        transport.json("/api/symbols", json!([]));
        let fetcher = fetcher(&transport);

        fetcher
            .fetch_with_cache("http://cot.test/api/symbols", false)
            .await
            .unwrap();
        assert_eq!(transport.calls_to("/api/symbols"), 1);
        assert!(fetcher.is_cached("http://cot.test/api/symbols"));
        assert!(!fetcher.is_cached("/api/symbols"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let transport: Arc<dyn Transport> = Arc::new(FakeTransport::new());
        let err = CachedFetcher::new(transport, "not a url", &FetchConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Url(_)));
    }
}
