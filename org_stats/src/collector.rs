use crate::api::{Client, Release, Repo, Result, Sort, Traffic};
use derive_more::Constructor;
use log::{error, info};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;

pub const MAX_REPOS_PAGE: u32 = 100;
pub const MAX_CONTRIBUTORS_PAGE: u32 = 30;

pub const REPORT_HEADER: &str = "repository,stars,forks,watchers,open_issues,contributors_estimate,size_kb,created_date,updated_date,clones_14d,unique_clones_14d,views_14d,unique_views_14d,total_downloads,primary_language,license,has_wiki,has_pages,archived,default_branch,topics";

/// One report line. `Display` renders the CSV row matching `REPORT_HEADER`;
/// only the topics field is quoted.
#[derive(Debug, PartialEq)]
pub struct ReportRow {
    pub repository: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub contributors_estimate: String,
    pub size_kb: u64,
    pub created_date: String,
    pub updated_date: String,
    pub clones_14d: u64,
    pub unique_clones_14d: u64,
    pub views_14d: u64,
    pub unique_views_14d: u64,
    pub total_downloads: u64,
    pub primary_language: String,
    pub license: String,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub archived: bool,
    pub default_branch: String,
    pub topics: String,
}

impl Display for ReportRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},\"{}\"",
            self.repository,
            self.stars,
            self.forks,
            self.watchers,
            self.open_issues,
            self.contributors_estimate,
            self.size_kb,
            self.created_date,
            self.updated_date,
            self.clones_14d,
            self.unique_clones_14d,
            self.views_14d,
            self.unique_views_14d,
            self.total_downloads,
            self.primary_language,
            self.license,
            self.has_wiki,
            self.has_pages,
            self.archived,
            self.default_branch,
            self.topics,
        ))
    }
}

impl ReportRow {
    fn assemble(repo: Repo, enrichment: Enrichment) -> ReportRow {
        ReportRow {
            repository: repo.name,
            stars: repo.stars,
            forks: repo.forks,
            watchers: repo.watchers,
            open_issues: repo.open_issues,
            contributors_estimate: enrichment.contributors_estimate,
            size_kb: repo.size_kb,
            created_date: repo.created_date,
            updated_date: repo.updated_date,
            clones_14d: enrichment.clones.count,
            unique_clones_14d: enrichment.clones.uniques,
            views_14d: enrichment.views.count,
            unique_views_14d: enrichment.views.uniques,
            total_downloads: enrichment.total_downloads,
            primary_language: repo.language.unwrap_or_default(),
            license: repo.license.unwrap_or_default(),
            has_wiki: repo.has_wiki,
            has_pages: repo.has_pages,
            archived: repo.archived,
            default_branch: repo.default_branch,
            topics: repo.topics.join(";"),
        }
    }
}

/// Per-repository sub-resource results after the degrade-to-zero rule has
/// been applied.
#[derive(Debug, PartialEq, Constructor)]
pub struct Enrichment {
    pub clones: Traffic,
    pub views: Traffic,
    pub total_downloads: u64,
    pub contributors_estimate: String,
}

pub struct StatsCollector<CLIENT>
where
    CLIENT: 'static + Client,
{
    client: Arc<CLIENT>,
    delay: Duration,
}

impl<CLIENT> StatsCollector<CLIENT>
where
    CLIENT: 'static + Client,
{
    pub fn new(client: CLIENT, delay: Duration) -> Self {
        let client = Arc::new(client);
        StatsCollector { client, delay }
    }

    /// Lists the organization repositories, then walks them sequentially,
    /// sending one `ReportRow` per repository in listing order.
    ///
    /// The listing call is fatal. Every per-repository call is best effort.
    pub async fn collect(self, org: String, sort: Sort) -> Result<Receiver<ReportRow>> {
        let repos = self.client.org_repos(&org, sort, MAX_REPOS_PAGE).await?;
        info!("Found {} repositories in {}", repos.len(), org);
        let (sender, receiver) = tokio::sync::mpsc::channel::<ReportRow>(10);
        let client = self.client.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            for repo in repos {
                info!("Processing {}", repo.name);
                let enrichment = enrich(client.as_ref(), &org, &repo.name).await;
                let row = ReportRow::assemble(repo, enrichment);
                if let Err(err) = sender.send(row).await {
                    error!("Failure: {}", err);
                }
                tokio::time::sleep(delay).await;
            }
        });
        Ok(receiver)
    }
}

/// Fetches the four sub-resources of one repository. Each failed call is
/// logged and its fields fall back to zero, so one bad endpoint does not
/// lose the whole row.
async fn enrich<CLIENT: Client>(client: &CLIENT, org: &str, repo: &str) -> Enrichment {
    let clones = client.clone_traffic(org, repo).await.unwrap_or_else(|err| {
        error!("Failed to get clone traffic for {}: {}", repo, err);
        Traffic::default()
    });
    let views = client.view_traffic(org, repo).await.unwrap_or_else(|err| {
        error!("Failed to get view traffic for {}: {}", repo, err);
        Traffic::default()
    });
    let releases = client.releases(org, repo).await.unwrap_or_else(|err| {
        error!("Failed to get releases for {}: {}", repo, err);
        Vec::new()
    });
    let contributors = client
        .contributors(org, repo, MAX_CONTRIBUTORS_PAGE)
        .await
        .unwrap_or_else(|err| {
            error!("Failed to get contributors for {}: {}", repo, err);
            Vec::new()
        });
    Enrichment::new(
        clones,
        views,
        total_downloads(&releases),
        contributors_estimate(contributors.len(), MAX_CONTRIBUTORS_PAGE),
    )
}

fn total_downloads(releases: &[Release]) -> u64 {
    releases
        .iter()
        .flat_map(|release| &release.assets)
        .map(|asset| asset.download_count)
        .sum()
}

/// A full page means the real count is unknown, only that it is at least
/// the page size.
fn contributors_estimate(count: usize, page_size: u32) -> String {
    if count >= page_size as usize {
        format!("{}+", page_size)
    } else {
        count.to_string()
    }
}

/// Tests

#[test]
fn total_downloads_flattens_release_assets() {
    use crate::api::Asset;
    let releases = vec![
        Release::new(vec![Asset::new(5), Asset::new(10)]),
        Release::new(vec![]),
        Release::new(vec![Asset::new(1)]),
    ];
    assert_eq!(total_downloads(&releases), 16);
}

#[test]
fn total_downloads_without_releases_is_zero() {
    assert_eq!(total_downloads(&[]), 0);
}

#[test]
fn contributors_estimate_below_page_cap_is_exact() {
    assert_eq!(contributors_estimate(29, 30), "29");
    assert_eq!(contributors_estimate(0, 30), "0");
}

#[test]
fn contributors_estimate_full_page_is_capped() {
    assert_eq!(contributors_estimate(30, 30), "30+");
}

#[test]
fn report_header_has_21_fields() {
    assert_eq!(REPORT_HEADER.split(',').count(), 21);
}

#[cfg(test)]
fn sample_repo() -> Repo {
    Repo {
        name: "widget".to_string(),
        stars: 42,
        forks: 7,
        watchers: 42,
        open_issues: 3,
        size_kb: 2048,
        created_date: "2019-06-01".to_string(),
        updated_date: "2024-03-15".to_string(),
        language: Some("Rust".to_string()),
        license: Some("mit".to_string()),
        has_wiki: true,
        has_pages: false,
        archived: false,
        default_branch: "main".to_string(),
        topics: vec!["cli".to_string(), "stats".to_string()],
    }
}

#[test]
fn report_row_renders_in_header_order_with_quoted_topics() {
    let enrichment = Enrichment::new(Traffic::new(12, 4), Traffic::new(100, 40), 16, "2".to_string());
    let row = ReportRow::assemble(sample_repo(), enrichment);
    assert_eq!(
        row.to_string(),
        "widget,42,7,42,3,2,2048,2019-06-01,2024-03-15,12,4,100,40,16,Rust,mit,true,false,false,main,\"cli;stats\""
    );
}

#[test]
fn absent_language_and_license_render_empty() {
    let mut repo = sample_repo();
    repo.language = None;
    repo.license = None;
    repo.topics = Vec::new();
    let enrichment = Enrichment::new(Traffic::default(), Traffic::default(), 0, "0".to_string());
    let row = ReportRow::assemble(repo, enrichment);
    assert_eq!(
        row.to_string(),
        "widget,42,7,42,3,0,2048,2019-06-01,2024-03-15,0,0,0,0,0,,,true,false,false,main,\"\""
    );
}
