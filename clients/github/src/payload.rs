//! Typed API responses. Conversions into the domain types apply the
//! default-on-absent rule in one place.

use chrono::{DateTime, Utc};
use org_stats::api;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    // reported in kilobytes
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
    pub license: Option<License>,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct License {
    pub key: Option<String>,
}

impl From<Repo> for api::Repo {
    fn from(repo: Repo) -> Self {
        api::Repo {
            name: repo.name,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            open_issues: repo.open_issues_count,
            size_kb: repo.size,
            created_date: repo.created_at.date_naive().to_string(),
            updated_date: repo.updated_at.date_naive().to_string(),
            language: repo.language,
            license: repo.license.and_then(|license| license.key),
            has_wiki: repo.has_wiki,
            has_pages: repo.has_pages,
            archived: repo.archived,
            default_branch: repo.default_branch,
            topics: repo.topics,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Traffic {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

impl From<Traffic> for api::Traffic {
    fn from(traffic: Traffic) -> Self {
        api::Traffic::new(traffic.count, traffic.uniques)
    }
}

#[derive(Deserialize, Debug)]
pub struct Release {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Deserialize, Debug)]
pub struct Asset {
    #[serde(default)]
    pub download_count: u64,
}

impl From<Release> for api::Release {
    fn from(release: Release) -> Self {
        api::Release::new(
            release
                .assets
                .into_iter()
                .map(|asset| api::Asset::new(asset.download_count))
                .collect(),
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: u32,
}

impl From<Contributor> for api::Contributor {
    fn from(contributor: Contributor) -> Self {
        api::Contributor::new(contributor.login, contributor.contributions)
    }
}

/// Tests

#[test]
fn repo_payload_maps_to_domain_record() {
    let body = r#"{
        "name": "widget",
        "stargazers_count": 42,
        "forks_count": 7,
        "watchers_count": 42,
        "open_issues_count": 3,
        "size": 2048,
        "created_at": "2019-06-01T10:00:00Z",
        "updated_at": "2024-03-15T08:30:00Z",
        "language": "Rust",
        "license": { "key": "mit" },
        "has_wiki": true,
        "has_pages": false,
        "archived": false,
        "default_branch": "main",
        "topics": ["cli", "stats"]
    }"#;
    let repo: Repo = serde_json::from_str(body).unwrap();
    let repo = api::Repo::from(repo);
    assert_eq!(repo.name, "widget");
    assert_eq!(repo.stars, 42);
    assert_eq!(repo.size_kb, 2048);
    assert_eq!(repo.created_date, "2019-06-01");
    assert_eq!(repo.updated_date, "2024-03-15");
    assert_eq!(repo.license.as_deref(), Some("mit"));
    assert_eq!(repo.topics, vec!["cli".to_string(), "stats".to_string()]);
}

#[test]
fn absent_fields_take_defaults() {
    let body = r#"{
        "name": "bare",
        "created_at": "2020-01-02T00:00:00Z",
        "updated_at": "2020-01-02T00:00:00Z",
        "language": null,
        "license": null
    }"#;
    let repo: Repo = serde_json::from_str(body).unwrap();
    let repo = api::Repo::from(repo);
    assert_eq!(repo.stars, 0);
    assert_eq!(repo.language, None);
    assert_eq!(repo.license, None);
    assert!(repo.topics.is_empty());
    assert!(!repo.has_wiki);
}

#[test]
fn traffic_payload_maps_counts() {
    let body = r#"{ "count": 12, "uniques": 4, "clones": [] }"#;
    let traffic: Traffic = serde_json::from_str(body).unwrap();
    assert_eq!(api::Traffic::from(traffic), api::Traffic::new(12, 4));
}

#[test]
fn release_payload_keeps_asset_downloads() {
    let body = r#"[
        { "assets": [ { "download_count": 5 }, { "download_count": 10 } ] },
        { "assets": [] }
    ]"#;
    let releases: Vec<Release> = serde_json::from_str(body).unwrap();
    let releases: Vec<api::Release> = releases.into_iter().map(api::Release::from).collect();
    assert_eq!(releases[0].assets.len(), 2);
    assert_eq!(releases[0].assets[1].download_count, 10);
    assert!(releases[1].assets.is_empty());
}
