use async_trait::async_trait;
use octocrab::{models::Repository, Octocrab};
use secrecy::ExposeSecret as _;

use crate::{config::Config, errors::AppResult, models::domain::RepositoryHit};

const MISSING_DESCRIPTION: &str = "No description available.";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeRepositorySearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<RepositoryHit>>;
}

/// GitHub repository search, most-starred first.
pub struct GithubRepositorySearch {
    octocrab: Octocrab,
}

impl GithubRepositorySearch {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = &config.github_token {
            builder = builder.personal_token(token.expose_secret().to_string());
        }

        Ok(Self {
            octocrab: builder.build()?,
        })
    }
}

fn description_or_placeholder(description: Option<String>) -> String {
    description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string())
}

fn to_hit(repo: Repository) -> RepositoryHit {
    RepositoryHit {
        name: repo.name,
        url: repo.html_url.map(|u| u.to_string()).unwrap_or_default(),
        owner: repo.owner.map(|o| o.login).unwrap_or_default(),
        description: description_or_placeholder(repo.description),
        stars: repo.stargazers_count,
    }
}

#[async_trait]
impl CodeRepositorySearch for GithubRepositorySearch {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<RepositoryHit>> {
        let per_page = limit.clamp(1, 100) as u8;

        let page = self
            .octocrab
            .search()
            .repositories(query)
            .sort("stars")
            .order("desc")
            .per_page(per_page)
            .send()
            .await?;

        log::debug!(
            "GitHub returned {} repositories for '{}'",
            page.items.len(),
            query
        );

        Ok(page.items.into_iter().take(limit).map(to_hit).collect())
    }
}
