use async_trait::async_trait;
use derive_more::Constructor;
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    // the only reason of `reqwest` dependency..
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Listing order of the organization repositories endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Sort {
    Created,
    Updated,
    Pushed,
    FullName,
}

/// One repository from the organization listing.
///
/// `language` and `license` are absent for repositories without detected
/// code or a recognized license file.
#[derive(Clone, Debug, PartialEq)]
pub struct Repo {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub size_kb: u64,
    pub created_date: String,
    pub updated_date: String,
    pub language: Option<String>,
    pub license: Option<String>,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub archived: bool,
    pub default_branch: String,
    pub topics: Vec<String>,
}

/// Count and unique count over the trailing 14 day window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Constructor)]
pub struct Traffic {
    pub count: u64,
    pub uniques: u64,
}

#[derive(Clone, Debug, PartialEq, Constructor)]
pub struct Release {
    pub assets: Vec<Asset>,
}

#[derive(Clone, Debug, PartialEq, Constructor)]
pub struct Asset {
    pub download_count: u64,
}

#[derive(Clone, Debug, PartialEq, Constructor)]
pub struct Contributor {
    pub name: String,
    pub contributions: u32,
}

#[async_trait]
pub trait Client: Send + Sync {
    /// Single page of the organization repository listing.
    async fn org_repos(&self, org: &str, sort: Sort, per_page: u32) -> Result<Vec<Repo>>;

    async fn clone_traffic(&self, org: &str, repo: &str) -> Result<Traffic>;

    async fn view_traffic(&self, org: &str, repo: &str) -> Result<Traffic>;

    async fn releases(&self, org: &str, repo: &str) -> Result<Vec<Release>>;

    /// Contributors are fetched as a single page; a full page only proves
    /// the real count is at least `per_page`.
    async fn contributors(&self, org: &str, repo: &str, per_page: u32) -> Result<Vec<Contributor>>;
}
