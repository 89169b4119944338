use anyhow::{anyhow, Result};
use headers::{HeaderMap, HeaderName};
use std::time::Duration;
use structopt::StructOpt;

use bulkfetch::{fetch_all_with_client, ClientBuilder, FetchResult};

mod options;
mod stats;

use options::{Config, FetchOptions};
use stats::FetchStats;

/// A C-like enum that can be cast to `i32` and used as process exit code.
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator, which covers configuration errors.
    #[allow(unused)]
    UnexpectedFailure = 1,
    FetchFailure = 2,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let mut opts = FetchOptions::from_args();

    // Load a potentially existing config file and merge it into the config from the CLI
    if let Some(c) = Config::load_from_file(&opts.config_file)? {
        opts.config.merge(c)
    }
    let cfg = &opts.config;

    let runtime = match cfg.threads {
        // We build our own runtime instead of using the `tokio::main`
        // attribute since we want to make the number of threads configurable
        Some(threads) => tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .enable_all()
            .build()?,
        None => tokio::runtime::Runtime::new()?,
    };
    let errorcode = runtime.block_on(run(cfg, opts.urls))?;
    std::process::exit(errorcode);
}

async fn run(cfg: &Config, urls: Vec<String>) -> Result<i32> {
    let headers = parse_headers(&cfg.headers)?;
    let timeout = cfg.timeout.map(Duration::from_secs);

    let client = ClientBuilder::default()
        .user_agent(cfg.user_agent.clone())
        .custom_headers(headers)
        .timeout(timeout)
        .build()?;

    let mut stats = FetchStats::new();
    let results = fetch_all_with_client(&client, &urls, cfg.max_concurrent).await?;
    for result in &results {
        stats.add(result);
    }

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            show_result(result, cfg.verbose);
        }
        println!("\n{}", stats);
    }

    match stats.is_success() {
        true => Ok(ExitCode::Success as i32),
        false => Ok(ExitCode::FetchFailure as i32),
    }
}

/// Failures are always shown; successes only in verbose mode.
fn show_result(result: &FetchResult, verbose: bool) {
    if verbose || !result.is_success() {
        println!("{}", result);
    }
}

fn read_header(input: &str) -> Result<(String, String)> {
    let elements: Vec<_> = input.split('=').collect();
    if elements.len() != 2 {
        return Err(anyhow!(
            "Header value should be of the form key=value, got {}",
            input
        ));
    }
    Ok((elements[0].into(), elements[1].into()))
}

fn parse_headers<T: AsRef<str>>(headers: &[T]) -> Result<HeaderMap> {
    let mut out = HeaderMap::new();
    for header in headers {
        let (key, val) = read_header(header.as_ref())?;
        out.insert(HeaderName::from_bytes(key.as_bytes())?, val.parse()?);
    }
    Ok(out)
}
