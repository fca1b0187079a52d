use super::{checked_path, RemoteStore, StoreError};
use crate::domain::constants::{DEFAULT_GITHUB_API, DEFAULT_TIMEOUT_MS, HISTORY_PAGE_SIZE};
use crate::domain::models::{CommitRecord, TreeEntry, WriteReceipt};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("badger/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GitHubStore`].
#[derive(Debug, Clone)]
pub struct GitHubStoreConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GitHubStoreConfig {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            api_base: DEFAULT_GITHUB_API.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api}/repos/{owner}/{repo}` plus `tail`, each piece percent-encoded
    /// as one path segment.
    fn repo_url<'a>(&self, tail: impl IntoIterator<Item = &'a str>) -> Result<Url, StoreError> {
        let invalid = || StoreError::InvalidUrl(self.api_base.clone());
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn contents_url(&self, path: &str) -> Result<Url, StoreError> {
        let mut tail = vec!["contents"];
        if !path.is_empty() {
            tail.extend(path.split('/'));
        }
        self.repo_url(tail)
    }

    fn commits_url(&self, page: u32) -> Result<Url, StoreError> {
        let mut url = self.repo_url(["commits"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &HISTORY_PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    sha: String,
    commit: CommitBody,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    commit: Option<PutCommit>,
}

#[derive(Debug, Deserialize)]
struct PutCommit {
    sha: String,
}

/// Badge repository hosted on GitHub, accessed through the REST contents and
/// commits endpoints.
pub struct GitHubStore {
    client: Client,
    config: GitHubStoreConfig,
}

impl GitHubStore {
    pub fn new(config: GitHubStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GitHubStoreConfig {
        &self.config
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header("Accept", "application/vnd.github+json");
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Lists one directory. `None` when GitHub reports it missing, which is
    /// what an empty repository answers for its root.
    fn list(&self, path: &str) -> Result<Option<Vec<ContentItem>>, StoreError> {
        let url = self.config.contents_url(path)?;
        debug!(%url, "listing repository contents");
        let resp = self.authorized(self.client.get(url)).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = success_body(resp)?;
        Ok(Some(parse_contents(&body)?))
    }
}

fn success_body(resp: Response) -> Result<String, StoreError> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// GitHub's 422 for a create over an existing file: the request lacks the
/// existing blob's `sha`.
fn missing_sha(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(|m| m.contains("\"sha\"")))
        .unwrap_or(false)
}

fn parse_contents(body: &str) -> Result<Vec<ContentItem>, StoreError> {
    // A file path answers with a single object instead of a listing.
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

fn parse_commits(body: &str) -> Result<Vec<CommitItem>, StoreError> {
    Ok(serde_json::from_str(body)?)
}

impl RemoteStore for GitHubStore {
    fn read_tree(&self, path: &str) -> Result<Vec<TreeEntry>, StoreError> {
        let path = checked_path(path)?;
        let Some(items) = self.list(path)? else {
            return Ok(vec![]);
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if item.kind == "dir" {
                let children = self
                    .list(&item.path)?
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|c| c.kind == "file")
                    .map(|c| c.name)
                    .collect();
                out.push(TreeEntry::Directory {
                    name: item.name,
                    children,
                });
            } else {
                out.push(TreeEntry::Leaf(item.name));
            }
        }
        Ok(out)
    }

    fn read_history(&self, depth: u32) -> Result<Vec<CommitRecord>, StoreError> {
        let mut out = Vec::new();
        for page in 1..=depth.max(1) {
            let url = self.config.commits_url(page)?;
            debug!(%url, "reading commit history");
            let resp = self.authorized(self.client.get(url)).send()?;
            // 409: the repository has no commits yet.
            if resp.status() == StatusCode::CONFLICT {
                break;
            }
            let commits = parse_commits(&success_body(resp)?)?;
            let short_page = commits.len() < HISTORY_PAGE_SIZE as usize;
            for c in commits {
                debug!(sha = %c.sha, "history entry");
                out.push(CommitRecord::new(c.commit.message));
            }
            if short_page {
                break;
            }
        }
        Ok(out)
    }

    fn write_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let path = checked_path(path)?;
        let url = self.config.contents_url(path)?;
        let payload = serde_json::json!({
            "message": message,
            "content": content,
        });
        let resp = self
            .authorized(self.client.put(url))
            .json(&payload)
            .send()?;
        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body = resp.text()?;
            if missing_sha(&body) {
                return Err(StoreError::Conflict(path.to_string()));
            }
            return Err(StoreError::Status { status: 422, body });
        }
        let body = success_body(resp)?;
        let parsed: PutResponse = serde_json::from_str(&body)?;
        let commit = parsed.commit.map(|c| c.sha);
        debug!(path, commit = commit.as_deref().unwrap_or("-"), "pushed file");
        Ok(WriteReceipt {
            path: path.to_string(),
            commit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{missing_sha, parse_commits, parse_contents, GitHubStore, GitHubStoreConfig};
    use crate::domain::models::TreeEntry;
    use crate::store::{RemoteStore, StoreError};
    use serde_json::json;
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_server() -> (Runtime, MockServer) {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        (rt, server)
    }

    fn mount(rt: &Runtime, server: &MockServer, mock: Mock) {
        rt.block_on(mock.mount(server));
    }

    fn store(server: &MockServer, token: Option<&str>) -> GitHubStore {
        GitHubStore::new(
            GitHubStoreConfig::new("acme", "badges")
                .with_api_base(&server.uri())
                .with_token(token.map(str::to_string)),
        )
        .unwrap()
    }

    #[test]
    fn urls_follow_rest_layout() {
        let cfg = GitHubStoreConfig::new("acme", "badges").with_api_base("http://localhost:9/");
        assert_eq!(
            cfg.contents_url("").unwrap().as_str(),
            "http://localhost:9/repos/acme/badges/contents"
        );
        assert_eq!(
            cfg.contents_url("Foo_Bar/class.json").unwrap().as_str(),
            "http://localhost:9/repos/acme/badges/contents/Foo_Bar/class.json"
        );
        assert_eq!(
            cfg.commits_url(2).unwrap().as_str(),
            "http://localhost:9/repos/acme/badges/commits?per_page=100&page=2"
        );
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let cfg = GitHubStoreConfig::new("acme", "badges").with_api_base("http://localhost:9");
        let url = cfg.contents_url("C#_Basics/class.json").unwrap();
        assert_eq!(url.path(), "/repos/acme/badges/contents/C%23_Basics/class.json");
        assert_eq!(url.fragment(), None);

        let url = cfg.contents_url("Why?/img.png").unwrap();
        assert_eq!(url.path(), "/repos/acme/badges/contents/Why%3F/img.png");
        assert_eq!(url.query(), None);

        let url = cfg.contents_url("Café_100%/img.png").unwrap();
        assert_eq!(url.path(), "/repos/acme/badges/contents/Caf%C3%A9_100%25/img.png");
    }

    #[test]
    fn api_base_path_prefix_is_kept() {
        let cfg = GitHubStoreConfig::new("acme", "badges")
            .with_api_base("https://ghe.example.com/api/v3/");
        assert_eq!(
            cfg.contents_url("img.png").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/acme/badges/contents/img.png"
        );
        let bad = GitHubStoreConfig::new("acme", "badges").with_api_base("not a url");
        assert!(matches!(bad.contents_url(""), Err(StoreError::InvalidUrl(_))));
    }

    #[test]
    fn blank_token_is_dropped() {
        let cfg = GitHubStoreConfig::new("acme", "badges")
            .with_token(Some("  ".to_string()))
            .with_timeout(Duration::from_secs(1));
        assert!(cfg.token.is_none());
        assert_eq!(cfg.timeout, Duration::from_secs(1));
    }

    #[test]
    fn contents_listing_and_single_file_both_parse() {
        let listing = r#"[
            {"name": "issuer.json", "path": "issuer.json", "type": "file", "sha": "a"},
            {"name": "Foo_Bar", "path": "Foo_Bar", "type": "dir", "sha": "b"}
        ]"#;
        let items = parse_contents(listing).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind, "dir");
        assert_eq!(items[1].path, "Foo_Bar");

        let single = r#"{"name": "img.png", "path": "img.png", "type": "file"}"#;
        let items = parse_contents(single).unwrap();
        assert_eq!(items[0].name, "img.png");
    }

    #[test]
    fn commit_messages_are_extracted() {
        let body = r#"[
            {"sha": "2", "commit": {"message": "Add badge 'x' in class 'Foo_Bar'", "author": {}}},
            {"sha": "1", "commit": {"message": "Add metadata for class 'Foo_Bar'"}}
        ]"#;
        let commits = parse_commits(body).unwrap();
        assert_eq!(commits[1].commit.message, "Add metadata for class 'Foo_Bar'");
        assert_eq!(commits[0].sha, "2");
    }

    #[test]
    fn only_sha_complaints_count_as_existing_file() {
        assert!(missing_sha(r#"{"message": "Invalid request.\n\n\"sha\" wasn't supplied."}"#));
        assert!(!missing_sha(r#"{"message": "content is not valid Base64"}"#));
        assert!(!missing_sha("not json"));
    }

    #[test]
    fn empty_repository_reads_as_empty_tree_and_history() {
        let (rt, server) = mock_server();
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/contents"))
                .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "This repository is empty."}))),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/commits"))
                .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Git Repository is empty."}))),
        );

        let store = store(&server, None);
        assert!(store.read_tree("").unwrap().is_empty());
        assert!(store.read_history(3).unwrap().is_empty());
    }

    #[test]
    fn tree_expands_directories_to_their_files() {
        let (rt, server) = mock_server();
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/contents"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"name": "issuer.json", "path": "issuer.json", "type": "file"},
                    {"name": "Foo_Bar", "path": "Foo_Bar", "type": "dir"}
                ]))),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/contents/Foo_Bar"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"name": "class.json", "path": "Foo_Bar/class.json", "type": "file"},
                    {"name": "img.png", "path": "Foo_Bar/img.png", "type": "file"},
                    {"name": "nested", "path": "Foo_Bar/nested", "type": "dir"}
                ]))),
        );

        let tree = store(&server, None).read_tree("").unwrap();
        assert_eq!(
            tree,
            vec![
                TreeEntry::leaf("issuer.json"),
                TreeEntry::dir("Foo_Bar", ["class.json", "img.png"]),
            ]
        );
    }

    #[test]
    fn history_stops_at_first_short_page() {
        let (rt, server) = mock_server();
        let full: Vec<_> = (0..100)
            .map(|i| json!({"sha": format!("s{i}"), "commit": {"message": format!("m{i}")}}))
            .collect();
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/commits"))
                .and(query_param("page", "1"))
                .and(query_param("per_page", "100"))
                .respond_with(ResponseTemplate::new(200).set_body_json(full))
                .expect(1),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/commits"))
                .and(query_param("page", "2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"sha": "last", "commit": {"message": "Add metadata for class 'Foo'"}}
                ])))
                .expect(1),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/repos/acme/badges/commits"))
                .and(query_param("page", "3"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(0),
        );

        let history = store(&server, None).read_history(3).unwrap();
        assert_eq!(history.len(), 101);
        assert_eq!(history[0].message, "m0");
        assert_eq!(history[100].message, "Add metadata for class 'Foo'");
        rt.block_on(server.verify());
    }

    #[test]
    fn write_sends_auth_headers_and_encoded_path() {
        let (rt, server) = mock_server();
        mount(
            &rt,
            &server,
            Mock::given(method("PUT"))
                .and(path("/repos/acme/badges/contents/C%23_Basics/class.json"))
                .and(header("authorization", "Bearer tok"))
                .and(header("accept", "application/vnd.github+json"))
                .and(body_json(json!({
                    "message": "Add metadata for class 'C#_Basics'",
                    "content": "e30="
                })))
                .respond_with(
                    ResponseTemplate::new(201).set_body_json(json!({"commit": {"sha": "abc123"}})),
                )
                .expect(1),
        );

        let receipt = store(&server, Some("tok"))
            .write_file(
                "C#_Basics/class.json",
                "Add metadata for class 'C#_Basics'",
                "e30=",
            )
            .unwrap();
        assert_eq!(receipt.path, "C#_Basics/class.json");
        assert_eq!(receipt.commit.as_deref(), Some("abc123"));
        rt.block_on(server.verify());
    }

    #[test]
    fn write_failures_map_to_store_errors() {
        let (rt, server) = mock_server();
        mount(
            &rt,
            &server,
            Mock::given(method("PUT"))
                .and(path("/repos/acme/badges/contents/img.png"))
                .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                    "message": "Invalid request.\n\n\"sha\" wasn't supplied."
                }))),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("PUT"))
                .and(path("/repos/acme/badges/contents/issuer.json"))
                .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                    "message": "content is not valid Base64"
                }))),
        );
        mount(
            &rt,
            &server,
            Mock::given(method("PUT"))
                .and(path("/repos/acme/badges/contents/award.html"))
                .respond_with(ResponseTemplate::new(500).set_body_string("boom")),
        );

        let store = store(&server, None);
        let err = store.write_file("img.png", "m", "eA==").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref p) if p == "img.png"));

        let err = store.write_file("issuer.json", "m", "!!").unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 422, ref body } if body.contains("Base64")));

        let err = store.write_file("award.html", "m", "eA==").unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 500, ref body } if body == "boom"));
    }
}
