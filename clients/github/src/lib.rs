mod builder;
mod payload;

pub use builder::GithubClientBuilder;

use async_trait::async_trait;
use log::debug;
use org_stats::api;
use org_stats::api::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub struct GithubClient {
    client: Client,
    github_url: String,
}

impl GithubClient {
    async fn get_json<BODY: DeserializeOwned>(
        &self,
        request_url: String,
        query: &[(&str, String)],
    ) -> Result<BODY> {
        debug!("GET {}", request_url);
        let response = self.client.get(request_url).query(query).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json::<BODY>().await?)
    }
}

#[async_trait]
impl api::Client for GithubClient {
    async fn org_repos(&self, org: &str, sort: api::Sort, per_page: u32) -> Result<Vec<api::Repo>> {
        let request_url = format!("{}/orgs/{}/repos", self.github_url, org);
        let response: Vec<payload::Repo> = self
            .get_json(
                request_url,
                &[("sort", sort.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;
        Ok(response.into_iter().map(api::Repo::from).collect())
    }

    async fn clone_traffic(&self, org: &str, repo: &str) -> Result<api::Traffic> {
        let request_url = format!("{}/repos/{}/{}/traffic/clones", self.github_url, org, repo);
        let response: payload::Traffic = self.get_json(request_url, &[]).await?;
        Ok(response.into())
    }

    async fn view_traffic(&self, org: &str, repo: &str) -> Result<api::Traffic> {
        let request_url = format!("{}/repos/{}/{}/traffic/views", self.github_url, org, repo);
        let response: payload::Traffic = self.get_json(request_url, &[]).await?;
        Ok(response.into())
    }

    async fn releases(&self, org: &str, repo: &str) -> Result<Vec<api::Release>> {
        let request_url = format!("{}/repos/{}/{}/releases", self.github_url, org, repo);
        let response: Vec<payload::Release> = self.get_json(request_url, &[]).await?;
        Ok(response.into_iter().map(api::Release::from).collect())
    }

    async fn contributors(&self, org: &str, repo: &str, per_page: u32) -> Result<Vec<api::Contributor>> {
        let request_url = format!("{}/repos/{}/{}/contributors", self.github_url, org, repo);
        let response: Vec<payload::Contributor> = self
            .get_json(request_url, &[("per_page", per_page.to_string())])
            .await?;
        Ok(response.into_iter().map(api::Contributor::from).collect())
    }
}
