use crate::client::{Client, ClientBuilder};
use crate::client_pool::ClientPool;
use crate::types::FetchResult;
use anyhow::{ensure, Context, Result};
use tokio::sync::mpsc;
use url::Url;

/// Concurrency ceiling used when the caller has no opinion.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Fetch all `urls` with a default [`Client`], keeping at most
/// `max_concurrent` requests in flight.
///
/// Returns one [`FetchResult`] per URL, in input order, regardless of the
/// order in which the fetches complete. Per-URL failures never fail the
/// batch; the only errors returned are configuration errors
/// (`max_concurrent < 1`, malformed URL), raised before any request is
/// issued. An empty input returns an empty list without constructing a
/// client.
pub async fn fetch_all<T: AsRef<str>>(
    urls: &[T],
    max_concurrent: usize,
) -> Result<Vec<FetchResult>> {
    ensure!(
        max_concurrent >= 1,
        "max_concurrent must be at least 1, got {}",
        max_concurrent
    );
    if urls.is_empty() {
        return Ok(Vec::new());
    }
    let client = ClientBuilder::default().build()?;
    fetch_all_with_client(&client, urls, max_concurrent).await
}

/// Like [`fetch_all`], but with a caller-configured [`Client`].
pub async fn fetch_all_with_client<T: AsRef<str>>(
    client: &Client,
    urls: &[T],
    max_concurrent: usize,
) -> Result<Vec<FetchResult>> {
    ensure!(
        max_concurrent >= 1,
        "max_concurrent must be at least 1, got {}",
        max_concurrent
    );
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    // Reject malformed input up front; by the time requests go out, every
    // per-URL outcome is a FetchResult, never an error.
    let parsed = urls
        .iter()
        .map(|url| {
            Url::parse(url.as_ref()).with_context(|| format!("invalid URL: {}", url.as_ref()))
        })
        .collect::<Result<Vec<_>>>()?;

    let (send_req, recv_req) = mpsc::channel(max_concurrent);
    let (send_resp, mut recv_resp) = mpsc::channel(max_concurrent);

    tokio::spawn(async move {
        for request in parsed.into_iter().enumerate() {
            if send_req.send(request).await.is_err() {
                break;
            }
        }
    });

    let clients = (0..max_concurrent).map(|_| client.clone()).collect();
    tokio::spawn(async move {
        let mut pool = ClientPool::new(send_resp, recv_req, clients);
        pool.listen().await;
    });

    // The channel closes once the pool and all fetch tasks are done.
    let mut indexed = Vec::with_capacity(urls.len());
    while let Some(result) = recv_resp.recv().await {
        indexed.push(result);
    }

    indexed.sort_unstable_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, result)| result).collect())
}
