mod args;

pub use args::Args;

use github_client::GithubClientBuilder;
use log::debug;
use org_stats::api::{Error, Result};
use org_stats::collector::{ReportRow, StatsCollector};
use std::time::Duration;
use tokio::sync::mpsc::Receiver;

/// Builds the API client from the given configuration and starts the
/// collection. The credential is required; no request is made without it.
pub async fn collect_org_stats(args: Args) -> Result<Receiver<ReportRow>> {
    let token = args.api_token.ok_or(Error::Error(
        "TOKEN not set. Export a personal access token in the TOKEN environment variable.",
    ))?;
    let client = GithubClientBuilder::default()
        .with_github_url(args.api_url)
        .try_with_token(token)?
        .build()?;
    debug!("TOKEN found");

    let collector = StatsCollector::new(client, Duration::from_millis(args.delay_ms));
    collector.collect(args.org, args.sort).await
}
