//! HTTP implementation of the boundary services.
//!
//! Non-2xx responses are read rather than raised by the transport so the
//! backend's `{ "error": ... }` payload can be carried into the notice.
use super::{
    DocumentStore, EnvConfigSource, IdentityProvider, KnowledgeFile, SubmissionSink, UploadFile,
};
use crate::adapter::ContributionDocument;
use crate::model::{UserIdentity, WizardMode};
use crate::provenance::UploadResult;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use ureq::http::Response;
use ureq::{Agent, Body};

/// Default hosted identity endpoint.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("cwiz/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FetchedFile {
    content: String,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    file: FetchedFile,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    files: &'a [UploadFile],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    document: &'a ContributionDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<&'a UserIdentity>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: Option<bool>,
}

/// Backend client for one deployment.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
    github_api: String,
    mode: WizardMode,
}

/// Message from an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .map(|payload| payload.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn read_json<T: DeserializeOwned>(mut response: Response<Body>, what: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .body_mut()
        .read_to_string()
        .with_context(|| format!("read {what} response"))?;
    if !status.is_success() {
        return Err(anyhow!(
            "{what} failed with status {}: {}",
            status.as_u16(),
            error_message(&body)
        ));
    }
    serde_json::from_str(&body).with_context(|| format!("parse {what} response"))
}

impl HttpBackend {
    pub fn new(base_url: &str, mode: WizardMode, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
            github_api: DEFAULT_GITHUB_API.to_string(),
            mode,
        }
    }

    pub fn with_github_api(mut self, github_api: &str) -> Self {
        self.github_api = github_api.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn files_path(&self) -> &'static str {
        match self.mode {
            WizardMode::Github => "/api/github/knowledge-files",
            WizardMode::Native => "/api/native/git/knowledge-files",
        }
    }

    fn submit_path(&self, document: &ContributionDocument) -> String {
        match self.mode {
            WizardMode::Github => format!("/api/pr/{}", document.kind),
            WizardMode::Native => format!("/api/native/pr/{}", document.kind),
        }
    }

    fn post_submission(&self, path: &str, request: &SubmitRequest<'_>) -> Result<bool> {
        let start = Instant::now();
        let response = self
            .agent
            .post(self.url(path))
            .header("User-Agent", USER_AGENT)
            .send_json(request)
            .with_context(|| format!("POST {path}"))?;
        let parsed: SubmitResponse = read_json(response, "submission")?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            path,
            "submission request complete"
        );
        Ok(parsed.success.unwrap_or(true))
    }
}

impl EnvConfigSource for HttpBackend {
    fn dev_mode_enabled(&self) -> Result<bool> {
        let response = self
            .agent
            .get(self.url("/api/envConfig"))
            .header("User-Agent", USER_AGENT)
            .call()
            .context("GET /api/envConfig")?;
        let config: BTreeMap<String, serde_json::Value> = read_json(response, "env config")?;
        Ok(config
            .get("ENABLE_DEV_MODE")
            .and_then(serde_json::Value::as_str)
            == Some("true"))
    }
}

impl IdentityProvider for HttpBackend {
    fn user_info(&self, token: &str) -> Result<UserIdentity> {
        let response = self
            .agent
            .get(format!("{}/user", self.github_api))
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .call()
            .context("GET /user")?;
        let user: GithubUser = read_json(response, "user lookup")?;
        Ok(UserIdentity {
            login: user.login,
            name: user.name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
        })
    }
}

impl DocumentStore for HttpBackend {
    fn fetch_content(&self, filename: &str) -> Result<String> {
        let response = self
            .agent
            .get(self.url("/api/documents/get"))
            .query("filename", filename)
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("fetch document {filename}"))?;
        let fetched: FetchResponse =
            read_json(response, &format!("document fetch for {filename}"))?;
        Ok(fetched.file.content)
    }

    fn list_documents(&self) -> Result<Vec<KnowledgeFile>> {
        let path = self.files_path();
        let response = self
            .agent
            .get(self.url(path))
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("GET {path}"))?;
        read_json(response, "document listing")
    }

    fn upload(&self, files: &[UploadFile]) -> Result<UploadResult> {
        let path = self.files_path();
        let response = self
            .agent
            .post(self.url(path))
            .header("User-Agent", USER_AGENT)
            .send_json(&UploadRequest { files })
            .with_context(|| format!("POST {path}"))?;
        read_json(response, "document upload")
    }
}

impl SubmissionSink for HttpBackend {
    fn submit(
        &self,
        document: &ContributionDocument,
        identity: Option<&UserIdentity>,
    ) -> Result<bool> {
        let path = self.submit_path(document);
        self.post_submission(
            &path,
            &SubmitRequest {
                document,
                branch_name: None,
                identity,
            },
        )
    }

    fn update(
        &self,
        document: &ContributionDocument,
        original_branch: &str,
        identity: Option<&UserIdentity>,
    ) -> Result<bool> {
        let path = format!("{}/update", self.submit_path(document));
        self.post_submission(
            &path,
            &SubmitRequest {
                document,
                branch_name: Some(original_branch),
                identity,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_payload_message_is_extracted() {
        assert_eq!(error_message(r#"{"error":"file not found"}"#), "file not found");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
    }

    #[test]
    fn routes_follow_mode() {
        let native = HttpBackend::new("http://localhost:3000/", WizardMode::Native, Duration::from_secs(5));
        assert_eq!(native.url("/api/envConfig"), "http://localhost:3000/api/envConfig");
        assert_eq!(native.files_path(), "/api/native/git/knowledge-files");
        let hosted = HttpBackend::new("http://localhost:3000", WizardMode::Github, Duration::from_secs(5));
        assert_eq!(hosted.files_path(), "/api/github/knowledge-files");
    }

    #[test]
    fn github_user_tolerates_null_fields() {
        let user: GithubUser =
            serde_json::from_str(r#"{"login":"octo","name":null,"email":null}"#).expect("parse");
        assert_eq!(user.login, "octo");
        assert!(user.name.is_none());
    }
}
