use crate::artifacts::branch::branch_name::BranchName;
use crate::config::{TravisConfig, TravisTarget};
use crate::error::{Error, Result};
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use url::Url;

const TRAVIS_API_VERSION: &str = "3";

/// Triggers builds through the CI service's `POST /requests` endpoint
#[derive(Debug, Clone)]
pub struct TravisClient {
    http_client: HttpClient,
    requests_url: Url,
    token: String,
}

impl TravisClient {
    pub fn new(repo_url: &str, token: String) -> Result<Self> {
        let requests_url = Url::parse(&format!("{}/requests", repo_url.trim_end_matches('/')))?;
        let http_client = HttpClient::builder()
            .user_agent(concat!("bob/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(TravisClient {
            http_client,
            requests_url,
            token,
        })
    }

    pub fn from_config(config: &TravisConfig) -> Result<Self> {
        Self::new(&config.repo_url, config.token.clone())
    }

    #[tracing::instrument(skip_all, fields(target = %target.name, branch = %branch))]
    pub async fn execute(&self, target: &TravisTarget, branch: &BranchName) -> Result<()> {
        let response = self
            .http_client
            .post(self.requests_url.clone())
            .header("Travis-API-Version", TRAVIS_API_VERSION)
            .header("Authorization", format!("token {}", self.token))
            .json(&request_body(target, branch))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        tracing::info!("build request accepted");
        Ok(())
    }
}

/// Target configuration with the target's script on top
fn request_body(target: &TravisTarget, branch: &BranchName) -> Value {
    let mut config = target.config.clone();
    config.insert("script".to_string(), Value::String(target.script.clone()));

    json!({
        "request": {
            "branch": branch.as_ref(),
            "config": config,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_merges_script_into_config() {
        let mut config = serde_json::Map::new();
        config.insert("os".to_string(), json!("osx"));
        config.insert("script".to_string(), json!("overridden"));
        let target = TravisTarget {
            name: "beta".to_string(),
            script: "fastlane beta".to_string(),
            config,
        };
        let branch = BranchName::try_parse("release/2.0".to_string()).unwrap();

        assert_eq!(
            request_body(&target, &branch),
            json!({
                "request": {
                    "branch": "release/2.0",
                    "config": {"os": "osx", "script": "fastlane beta"}
                }
            })
        );
    }

    #[test]
    fn test_requests_url() {
        let client =
            TravisClient::new("https://api.travis-ci.com/repo/acme%2Fapp/", "t".to_string()).unwrap();

        assert_eq!(
            client.requests_url.as_str(),
            "https://api.travis-ci.com/repo/acme%2Fapp/requests"
        );
    }
}
