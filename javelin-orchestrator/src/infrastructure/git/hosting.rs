//! GitHub and GitLab repository creation over their REST APIs

use std::time::Duration;

use chrono::Utc;
use javelin_core::config::GitConfig;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::services::GitServiceError;
use crate::domain::value_objects::GitPlatform;

const API_TIMEOUT: Duration = Duration::from_secs(30);

/// A repository that now exists on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepository {
    pub name: String,
    pub web_url: String,
    pub clone_url: String,
}

#[derive(Deserialize)]
struct GithubRepository {
    html_url: String,
    clone_url: String,
}

#[derive(Deserialize)]
struct GitlabProject {
    web_url: String,
    http_url_to_repo: String,
}

enum Creation {
    Created(CreatedRepository),
    NameTaken,
}

#[derive(Debug, Clone)]
pub struct HostingApi {
    http: reqwest::Client,
    github_api_url: String,
    gitlab_api_url: String,
}

impl HostingApi {
    pub fn new(config: &GitConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("javelin/", env!("CARGO_PKG_VERSION")))
            .timeout(API_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            github_api_url: config.github_api_url.trim_end_matches('/').to_string(),
            gitlab_api_url: config.gitlab_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a public, empty repository. When the name is taken a
    /// timestamp suffix is appended and creation is tried once more.
    pub async fn create_repository(
        &self,
        platform: GitPlatform,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatedRepository, GitServiceError> {
        if let Creation::Created(repo) = self.try_create(platform, token, name, description).await? {
            return Ok(repo);
        }

        let retry_name = format!("{}-{}", name, Utc::now().timestamp());
        warn!(%platform, name, retry_name = %retry_name, "Repository name taken, retrying with suffix");
        match self.try_create(platform, token, &retry_name, description).await? {
            Creation::Created(repo) => Ok(repo),
            Creation::NameTaken => Err(GitServiceError::Api {
                platform,
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                message: format!("Repository name {} already exists", retry_name),
            }),
        }
    }

    async fn try_create(
        &self,
        platform: GitPlatform,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<Creation, GitServiceError> {
        let request = match platform {
            GitPlatform::Github => self
                .http
                .post(format!("{}/user/repos", self.github_api_url))
                .bearer_auth(token)
                .header(ACCEPT, "application/vnd.github+json")
                .json(&json!({
                    "name": name,
                    "description": description,
                    "private": false,
                    "auto_init": false,
                })),
            GitPlatform::Gitlab => self
                .http
                .post(format!("{}/projects", self.gitlab_api_url))
                .header("PRIVATE-TOKEN", token)
                .json(&json!({
                    "name": name,
                    "description": description,
                    "visibility": "public",
                })),
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let (web_url, clone_url) = match platform {
                GitPlatform::Github => {
                    let repo: GithubRepository = response.json().await?;
                    (repo.html_url, repo.clone_url)
                }
                GitPlatform::Gitlab => {
                    let project: GitlabProject = response.json().await?;
                    (project.web_url, project.http_url_to_repo)
                }
            };
            info!(%platform, name, web_url = %web_url, "Repository created");
            return Ok(Creation::Created(CreatedRepository {
                name: name.to_string(),
                web_url,
                clone_url,
            }));
        }

        let body = response.text().await.unwrap_or_default();
        if is_name_taken(status, &body) {
            return Ok(Creation::NameTaken);
        }
        Err(GitServiceError::Api {
            platform,
            status: status.as_u16(),
            message: api_message(&body),
        })
    }
}

fn is_name_taken(status: StatusCode, body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    matches!(status, StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST)
        && (body.contains("already exists") || body.contains("has already been taken"))
}

/// The `message` field of an API error body, or the body itself
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").map(|m| m.to_string()))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
