/*!
* `bulkfetch` is a library for fetching batches of URLs concurrently while
* keeping the number of simultaneously in-flight requests below a fixed
* ceiling. Every URL yields exactly one `FetchResult` — transport failures
* and HTTP error statuses included — and results come back in input order.
*
* "Hello world" example:
* ```no_run
* use bulkfetch::fetch_all;
*
* #[tokio::main]
* async fn main() -> anyhow::Result<()> {
*     let urls = ["https://example.com", "https://example.com/missing"];
*     for result in fetch_all(&urls, 5).await? {
*         println!("{}", result);
*     }
*     Ok(())
* }
* ```
*/
mod client;
mod client_pool;
mod fetcher;
mod types;

pub mod test_utils;

pub use client::{Client, ClientBuilder, DEFAULT_USER_AGENT};
pub use client_pool::ClientPool;
pub use fetcher::{fetch_all, fetch_all_with_client, DEFAULT_MAX_CONCURRENT};
pub use types::FetchResult;
