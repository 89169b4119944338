use anyhow::{Error, Result};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::{fs, io::ErrorKind};
use structopt::StructOpt;

use bulkfetch::{DEFAULT_MAX_CONCURRENT, DEFAULT_USER_AGENT};

const CONFIG_FILE: &str = "bulkfetch.toml";

// this exists because structopt requires `&str` type values for defaults
// (we can't use e.g. `DEFAULT_MAX_CONCURRENT` which is a usize)
lazy_static! {
    static ref MAX_CONCURRENT_STR: String = DEFAULT_MAX_CONCURRENT.to_string();
}

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    max_concurrent: usize = DEFAULT_MAX_CONCURRENT;
    user_agent: String = DEFAULT_USER_AGENT.to_string();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ( $cli:ident , $toml:ident ; $( $key:ident : $default:expr; )* ) => {
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bulkfetch",
    about = "Fetch batches of URLs concurrently with a bounded number of in-flight requests"
)]
pub(crate) struct FetchOptions {
    /// The URLs to fetch.
    /// Prefix with `--` to separate URLs from options that allow multiple
    /// arguments.
    #[structopt(name = "urls")]
    pub urls: Vec<String>,

    /// Configuration file to use
    #[structopt(short, long = "config", default_value = CONFIG_FILE)]
    pub config_file: String,

    #[structopt(flatten)]
    pub config: Config,
}

#[derive(Debug, Deserialize, StructOpt)]
pub(crate) struct Config {
    /// Maximum number of concurrent network requests
    #[structopt(short, long, default_value = &MAX_CONCURRENT_STR)]
    #[serde(default = "max_concurrent")]
    pub max_concurrent: usize,

    /// Number of threads to utilize.
    /// Defaults to number of cores available to the system
    #[structopt(short = "T", long)]
    #[serde(default)]
    pub threads: Option<usize>,

    /// User agent
    #[structopt(short, long, default_value = DEFAULT_USER_AGENT)]
    #[serde(default = "user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. Without it, a request runs until the
    /// transport gives up on its own
    #[structopt(short, long)]
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Custom request headers. E.g. `accept=text/html`
    #[structopt(short, long)]
    #[serde(default)]
    pub headers: Vec<String>,

    /// Also show successful fetches, not just failures
    #[structopt(short, long)]
    #[serde(default)]
    pub verbose: bool,

    /// Print the full result list as JSON instead of the summary
    #[structopt(short, long)]
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &str) -> Result<Option<Config>> {
        // Read configuration file
        let result = fs::read(path);

        // Ignore a file not found error, since the default config path is
        // probed on every run
        let contents = match result {
            Ok(c) => c,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::NotFound => Ok(None),
                    _ => Err(Error::from(e)),
                }
            }
        };

        Ok(Some(toml::from_slice(&contents)?))
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        fold_in! {
            // Destination and source configs
            self, toml;

            // Keys with defaults to assign
            max_concurrent: DEFAULT_MAX_CONCURRENT;
            threads: None;
            user_agent: DEFAULT_USER_AGENT;
            timeout: None;
            headers: Vec::<String>::new();
            verbose: false;
            json: false;
        }
    }
}
