use clap::Parser;
use org_stats::api::Sort;
use secrecy::SecretString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Organization whose repositories are reported
    #[clap(short, long, env)]
    pub org: String,

    /// Repository listing order
    #[clap(short, long, env, default_value = "updated")]
    pub sort: Sort,

    /// API access token
    #[clap(long = "token", env = "TOKEN")]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Delay between repositories in milliseconds
    #[clap(long, env, default_value_t = 200)]
    pub delay_ms: u64,

    /// Write the report to a file instead of standard output
    #[clap(long)]
    pub output: Option<PathBuf>,
}
