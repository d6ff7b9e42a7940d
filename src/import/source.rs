//! Hosting-api access and URL translation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use super::ImportError;

/// `GET rawContent(api_url, token) -> bytes`
#[async_trait]
pub trait RawContentSource: Send + Sync {
    async fn fetch(&self, api_url: &str, token: Option<&str>) -> Result<Bytes, ImportError>;
}

/// GitHub (or GitHub Enterprise) contents api, raw media type.
#[derive(Clone, Debug)]
pub struct GithubContentSource {
    client: Client,
}

impl GithubContentSource {
    pub fn new() -> Result<Self, ImportError> {
        let client = Client::builder()
            .user_agent(concat!("assetpush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RawContentSource for GithubContentSource {
    async fn fetch(&self, api_url: &str, token: Option<&str>) -> Result<Bytes, ImportError> {
        let mut req = self
            .client
            .get(api_url)
            .header(ACCEPT, "application/vnd.github.v3.raw");
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("token {token}"));
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(ImportError::HttpStatus {
                status: status.as_u16(),
                url: api_url.to_string(),
            });
        }
        Ok(resp.bytes().await?)
    }
}

/// Translate a browser URL into a contents-api URL.
///
/// ```text
/// https://github.com/org/repo/blob/main/dist/a.css
///   -> https://api.github.com/repos/org/repo/contents/dist/a.css?ref=main
/// https://git.corp/org/repo/blob/v2/a.css
///   -> https://git.corp/api/v3/repos/org/repo/contents/a.css?ref=v2
/// ```
///
/// URLs already in contents-api form pass through. Anything else is
/// rejected without touching the network.
pub fn api_url(source: &str) -> Result<String, ImportError> {
    let invalid = || ImportError::InvalidUrl(source.to_string());
    let url = Url::parse(source.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    let host = url.host_str().ok_or_else(invalid)?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    // org/repo/blob/branch/path...
    if let [org, repo, "blob", branch, path @ ..] = segments.as_slice()
        && !path.is_empty()
    {
        let base = if host.eq_ignore_ascii_case("github.com") {
            "https://api.github.com".to_string()
        } else {
            let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
            format!("{}://{host}{port}/api/v3", url.scheme())
        };
        return Ok(format!(
            "{base}/repos/{org}/{repo}/contents/{}?ref={branch}",
            path.join("/")
        ));
    }

    let api_path = url.path();
    let is_api = (api_path.starts_with("/repos/") || api_path.starts_with("/api/v3/repos/"))
        && api_path.contains("/contents/");
    if is_api {
        Ok(url.to_string())
    } else {
        Err(invalid())
    }
}
