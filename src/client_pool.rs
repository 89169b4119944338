use crate::client::Client;
use crate::types::FetchResult;
use deadpool::unmanaged::Pool;
use tokio::sync::mpsc;
use url::Url;

/// Dispatches fetches over a fixed set of client handles.
///
/// The pool size is the concurrency ceiling: each fetch holds one handle
/// for its whole duration, so at most `clients.len()` requests are in
/// flight at any time. Requests arrive tagged with their input index and
/// results are sent back with the same tag, since completion order is
/// unconstrained.
pub struct ClientPool {
    tx: mpsc::Sender<(usize, FetchResult)>,
    rx: mpsc::Receiver<(usize, Url)>,
    pool: Pool<Client>,
}

impl ClientPool {
    pub fn new(
        tx: mpsc::Sender<(usize, FetchResult)>,
        rx: mpsc::Receiver<(usize, Url)>,
        clients: Vec<Client>,
    ) -> Self {
        let pool = Pool::from(clients);
        ClientPool { tx, rx, pool }
    }

    /// Run until the request channel closes and all requests are dispatched.
    pub async fn listen(&mut self) {
        while let Some((index, url)) = self.rx.recv().await {
            let client = self.pool.get().await;
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = client.fetch(&url).await;
                // The receiving side stays open until every result arrived.
                tx.send((index, result)).await.unwrap();
            });
        }
    }
}
