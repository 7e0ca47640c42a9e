//! GitHub REST implementation of [`RemoteObjectClient`]
//!
//! Every route is appended to the repository API url, e.g.
//! `https://api.github.com/repos/{owner}/{repo}`, one percent-encoded path
//! segment at a time. The credential is resolved once
//! when the client is built and attached to every request.

use crate::areas::remote::{BranchDetail, RemoteObjectClient};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::blob::{Blob, EncodedBlob, NewBlob};
use crate::artifacts::objects::commit::{Commit, NewCommit, ShaRef};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{NewTree, Tree, TreeItem};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("bob/", env!("CARGO_PKG_VERSION"));

/// How requests authenticate against the API
#[derive(Clone)]
pub enum Credential {
    Bearer(String),
    Basic { username: String, password: String },
}

impl Credential {
    /// Basic auth when a username is configured, a bearer token otherwise
    pub fn resolve(username: Option<&str>, token: &str) -> Self {
        match username {
            Some(username) if !username.is_empty() => Credential::Basic {
                username: username.to_string(),
                password: token.to_string(),
            },
            _ => Credential::Bearer(token.to_string()),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credential::Bearer(token) => request.bearer_auth(token),
            Credential::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(***)"),
            Credential::Basic { username, .. } => write!(f, "Basic({username}:***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http_client: HttpClient,
    repo_url: Url,
    credential: Credential,
}

/// One operation of the git-data API
///
/// Branch names become path segments and are percent-encoded one `/`-separated
/// component at a time, so `fix#12` addresses `heads/fix%2312`.
#[derive(Debug, Clone, Copy)]
enum Route<'a> {
    Branches,
    Branch(&'a BranchName),
    Commit(&'a ObjectId),
    Tree(&'a ObjectId),
    Blob(&'a ObjectId),
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef(&'a BranchName),
}

impl Route<'_> {
    fn method(&self) -> Method {
        match self {
            Route::Branches
            | Route::Branch(_)
            | Route::Commit(_)
            | Route::Tree(_)
            | Route::Blob(_) => Method::GET,
            Route::CreateBlob | Route::CreateTree | Route::CreateCommit => Method::POST,
            Route::UpdateRef(_) => Method::PATCH,
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Route::Branches => vec!["branches"],
            Route::Branch(name) => ["branches"]
                .into_iter()
                .chain(name.as_ref().split('/'))
                .collect(),
            Route::Commit(sha) => vec!["git", "commits", sha.as_ref()],
            Route::Tree(sha) => vec!["git", "trees", sha.as_ref()],
            Route::Blob(sha) => vec!["git", "blobs", sha.as_ref()],
            Route::CreateBlob => vec!["git", "blobs"],
            Route::CreateTree => vec!["git", "trees"],
            Route::CreateCommit => vec!["git", "commits"],
            Route::UpdateRef(branch) => ["git", "refs", "heads"]
                .into_iter()
                .chain(branch.as_ref().split('/'))
                .collect(),
        }
    }

    fn query(&self) -> Option<&'static str> {
        match self {
            Route::Branches => Some("per_page=100"),
            Route::Tree(_) => Some("recursive=1"),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct BranchSummary {
    name: String,
}

#[derive(Deserialize)]
struct TreeListing {
    #[serde(flatten)]
    tree: Tree,
    #[serde(default)]
    truncated: bool,
}

#[derive(Serialize)]
struct RefUpdate<'s> {
    sha: &'s ObjectId,
}

impl GitHubClient {
    pub fn new(repo_url: &str, credential: Credential) -> Result<Self> {
        let repo_url = Url::parse(repo_url)?;
        if repo_url.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            http_client,
            repo_url,
            credential,
        })
    }

    /// Method and absolute url of `route`
    fn route(&self, route: Route<'_>) -> Result<(Method, Url)> {
        let mut url = self.repo_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(route.segments());
        url.set_query(route.query());

        Ok((route.method(), url))
    }

    async fn get<T: DeserializeOwned>(&self, route: Route<'_>) -> Result<T> {
        self.request(route, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, route: Route<'_>, body: &B) -> Result<T> {
        self.request(route, Some(body)).await
    }

    async fn send<B: Serialize + Sync>(
        &self,
        route: Route<'_>,
        body: Option<&B>,
    ) -> Result<(Url, StatusCode, String)> {
        let (method, url) = self.route(route)?;
        tracing::trace!(%method, %url, "sending request");

        let mut request = self
            .credential
            .apply(self.http_client.request(method, url.clone()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::trace!(%url, status = status.as_u16(), "received response");

        Ok((url, status, text))
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        route: Route<'_>,
        body: Option<&B>,
    ) -> Result<T> {
        let (url, status, text) = self.send(route, body).await?;
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_body(&url, &text)
    }
}

fn parse_body<T: DeserializeOwned>(url: &Url, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|err| Error::InvalidResponse {
        url: url.to_string(),
        reason: err.to_string(),
    })
}

/// Outcome of `PATCH /git/refs/heads/{branch}`
///
/// GitHub answers a non fast-forward update with 422 "Update is not a fast
/// forward"; 409 is used when the ref changed underneath the request.
fn ref_update_outcome(branch: &BranchName, status: StatusCode, body: String) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let is_conflict = status == StatusCode::CONFLICT
        || (status == StatusCode::UNPROCESSABLE_ENTITY
            && body.to_lowercase().contains("fast forward"));
    if is_conflict {
        return Err(Error::Conflict {
            branch: branch.to_string(),
            body,
        });
    }

    Err(Error::Remote {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RemoteObjectClient for GitHubClient {
    #[tracing::instrument(skip_all)]
    async fn branches(&self) -> Result<Vec<BranchName>> {
        let branches: Vec<BranchSummary> = self.get(Route::Branches).await?;

        Ok(branches
            .into_iter()
            .filter_map(|branch| match BranchName::try_parse(branch.name) {
                Ok(name) => Some(name),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unsupported branch name");
                    None
                }
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(name = %name))]
    async fn branch(&self, name: &BranchName) -> Result<BranchDetail> {
        self.get(Route::Branch(name)).await
    }

    #[tracing::instrument(skip_all, fields(sha = %sha))]
    async fn commit(&self, sha: &ObjectId) -> Result<Commit> {
        self.get(Route::Commit(sha)).await
    }

    #[tracing::instrument(skip_all, fields(sha = %sha))]
    async fn tree(&self, sha: &ObjectId) -> Result<Tree> {
        let listing: TreeListing = self.get(Route::Tree(sha)).await?;
        if listing.truncated {
            tracing::warn!(%sha, "tree listing was truncated by the remote");
        }

        Ok(listing.tree)
    }

    #[tracing::instrument(skip_all, fields(sha = %sha))]
    async fn blob(&self, sha: &ObjectId) -> Result<Blob> {
        let encoded: EncodedBlob = self.get(Route::Blob(sha)).await?;
        encoded.decode()
    }

    #[tracing::instrument(skip_all, fields(len = content.len()))]
    async fn create_blob(&self, content: &str) -> Result<ObjectId> {
        let created: ShaRef = self.post(Route::CreateBlob, &NewBlob::utf8(content)).await?;
        Ok(created.sha)
    }

    #[tracing::instrument(skip_all, fields(base = %base, items = items.len()))]
    async fn create_tree(&self, base: &ObjectId, items: &[TreeItem]) -> Result<ObjectId> {
        let created: ShaRef = self.post(Route::CreateTree, &NewTree::new(base, items)).await?;
        Ok(created.sha)
    }

    #[tracing::instrument(skip_all, fields(tree = %commit.tree))]
    async fn create_commit(&self, commit: &NewCommit) -> Result<ObjectId> {
        let created: ShaRef = self.post(Route::CreateCommit, commit).await?;
        Ok(created.sha)
    }

    #[tracing::instrument(skip_all, fields(branch = %branch, sha = %sha))]
    async fn update_ref(&self, branch: &BranchName, sha: &ObjectId) -> Result<()> {
        let (_, status, body) = self
            .send(Route::UpdateRef(branch), Some(&RefUpdate { sha }))
            .await?;

        ref_update_outcome(branch, status, body)
    }
}
