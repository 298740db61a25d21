//! The Crawl Engine (§4.4): breadth-first, bounded-parallel traversal from a
//! seed URL.
//!
//! Unlike the Go reference, which recurses through `crawlRecursive` and
//! opens a fresh fan-out-capped channel per recursive call, this engine
//! drives the whole crawl from a single `tokio::main`-less async loop over
//! an explicit frontier of already-canonicalized fetch paths (`Vec<String>`),
//! per the queue-over-recursion recommendation in spec.md §9. Each level
//! still respects the `MaxConcurrentFetches` cap as its own `Semaphore`,
//! matching "the cap applies per recursion level, not globally" (§4.4).

pub mod canonicalize;
pub mod dedup;
pub mod error;
pub mod extractor;

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use canonicalize::canonicalize;
use dedup::DedupSet;
use error::CrawlError;
use extractor::{extract, ExtractPolicy};

/// Default fan-out cap (§4.4): at most this many concurrent fetches per
/// recursion level.
pub const MAX_CONCURRENT_FETCHES: usize = 10;

/// Sink invoked with each batch of newly first-observed URLs. Boxed because
/// the orchestrator's implementation needs to own a database handle across
/// the `.await`.
pub type OnDiscovered =
    Arc<dyn Fn(Vec<String>) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync>;

pub struct CrawlEngine {
    client: reqwest::Client,
    policy: ExtractPolicy,
    max_concurrent_fetches: usize,
}

impl CrawlEngine {
    pub fn new(client: reqwest::Client, policy: ExtractPolicy) -> Self {
        Self {
            client,
            policy,
            max_concurrent_fetches: MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn with_fan_out(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n;
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, ..self })
    }

    /// Crawl `seed_url`, invoking `on_discovered` with each batch of
    /// first-observed URLs. Returns the full dedup set (not including the
    /// seed itself, which is never passed through `Add` — see DESIGN.md)
    /// and, if the traversal was aborted, the first fatal error observed.
    ///
    /// The frontier holds already-canonicalized fetch paths, not raw hrefs:
    /// each href is run through the Canonicalizer against the page that
    /// contained it as soon as it is extracted, before it is deduped,
    /// reported to `on_discovered`, or queued for the next level. This is
    /// what makes `Link.url` (§3) the Canonicalizer's output rather than the
    /// bare attribute text — a plain relative href like `page2.html` found
    /// two levels deep would otherwise be reported as-is instead of as the
    /// resolvable path it actually names.
    pub async fn crawl(
        &self,
        seed_url: &str,
        on_discovered: OnDiscovered,
    ) -> (HashSet<String>, Option<CrawlError>) {
        let dedup = DedupSet::new();
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut frontier = vec![canonicalize(seed_url, "", seed_url)];

        while !frontier.is_empty() {
            let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
            let mut tasks = FuturesUnordered::new();

            for processed in frontier.drain(..) {
                let semaphore = Arc::clone(&semaphore);
                let cancelled = Arc::clone(&cancelled);
                let client = self.client.clone();
                let seed_url = seed_url.to_string();
                let on_discovered = Arc::clone(&on_discovered);
                let dedup = &dedup;
                let policy = &self.policy;

                tasks.push(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("semaphore never closed");

                    if cancelled.load(Ordering::SeqCst) {
                        return Ok(None);
                    }

                    let fetch_url = format!("{seed_url}{processed}");

                    let response = match client.get(&fetch_url).send().await {
                        Ok(response) => response,
                        Err(source) => {
                            cancelled.store(true, Ordering::SeqCst);
                            return Err(CrawlError::Transport {
                                url: fetch_url,
                                source,
                            });
                        }
                    };

                    if response.status() != reqwest::StatusCode::OK {
                        // Dead end: non-OK status is not a fatal error.
                        return Ok(Some(Vec::new()));
                    }

                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(source) => {
                            cancelled.store(true, Ordering::SeqCst);
                            return Err(CrawlError::Transport {
                                url: fetch_url,
                                source,
                            });
                        }
                    };

                    let hrefs = match extract(&body, policy) {
                        Ok(hrefs) => hrefs,
                        Err(source) => {
                            cancelled.store(true, Ordering::SeqCst);
                            return Err(CrawlError::Extract {
                                url: fetch_url,
                                source,
                            });
                        }
                    };

                    // Canonicalize each raw href against this page's own
                    // canonical path before deduping or reporting it. A
                    // fragment-only href (§4.4: "no fetch, no recursion
                    // from it") is still deduped/reported but never
                    // queued for the next level.
                    let mut new_links = Vec::new();
                    let mut next = Vec::new();
                    for href in hrefs {
                        if href.is_empty() {
                            continue;
                        }
                        let is_fragment = href.starts_with('#');
                        let canonical = canonicalize(&href, &processed, &seed_url);
                        if dedup.add(canonical.clone()) {
                            new_links.push(canonical.clone());
                            if !is_fragment {
                                next.push(canonical);
                            }
                        }
                    }

                    if !new_links.is_empty() {
                        if let Err(source) = on_discovered(new_links).await {
                            cancelled.store(true, Ordering::SeqCst);
                            return Err(CrawlError::Callback(source));
                        }
                    }

                    Ok(Some(next))
                });
            }

            let mut next_frontier = Vec::new();
            let mut first_error = None;

            while let Some(result) = tasks.next().await {
                match result {
                    Ok(Some(next)) => next_frontier.extend(next),
                    Ok(None) => {}
                    Err(err) => {
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }

            if let Some(err) = first_error {
                return (dedup.snapshot(), Some(err));
            }

            frontier = next_frontier;
        }

        (dedup.snapshot(), None)
    }
}
