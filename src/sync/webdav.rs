use crate::errors::{AppError, AppResult};
use crate::sync::config::WebDavConfig;
use crate::sync::transport::{NETWORK_TIMEOUT, Transport, UploadReport};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode, Url};
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct WebDav {
    client: Client,
    config: WebDavConfig,
}

impl WebDav {
    pub fn new(config: WebDavConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(NETWORK_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// `<url>/<remote_path>/`, with single slashes between parts.
    pub fn collection_url(&self) -> String {
        let base = self.config.url.trim_end_matches('/');
        let remote = self.config.remote_path.trim_matches('/');
        if remote.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{remote}/")
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);
        if self.config.username.is_empty() {
            req
        } else {
            req.basic_auth(&self.config.username, Some(&self.config.password))
        }
    }

    fn method(name: &str) -> AppResult<Method> {
        Method::from_bytes(name.as_bytes()).map_err(|e| AppError::Sync(e.to_string()))
    }

    /// Create the remote collection. "Already exists" answers are fine.
    fn ensure_collection(&self) -> AppResult<()> {
        let url = self.collection_url();
        let resp = self.request(Self::method("MKCOL")?, &url).send()?;
        let status = resp.status();
        debug!(%url, %status, "MKCOL");

        if status.is_success()
            || status == StatusCode::METHOD_NOT_ALLOWED
            || status.is_redirection()
        {
            return Ok(());
        }
        Err(AppError::Sync(format!("MKCOL {url} failed: {status}")))
    }
}

impl Transport for WebDav {
    fn name(&self) -> &'static str {
        "webdav"
    }

    fn is_available(&self) -> bool {
        Url::parse(&self.config.url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    fn check(&mut self) -> AppResult<String> {
        let resp = self
            .request(Self::method("PROPFIND")?, &self.config.url)
            .header("Depth", "0")
            .send()?;
        let status = resp.status();
        if status.is_success() || status.as_u16() == 207 {
            Ok(format!("WebDAV server answered {status}"))
        } else {
            Err(AppError::Sync(format!("WebDAV server answered {status}")))
        }
    }

    fn upload(&mut self, name: &str, archive: &Path) -> AppResult<UploadReport> {
        self.ensure_collection()?;

        let url = format!("{}{name}", self.collection_url());
        let body = fs::read(archive)?;
        let resp = self.request(Method::PUT, &url).body(body).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Sync(format!("PUT {url} failed: {status}")));
        }
        Ok(UploadReport {
            remote: url,
            files: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dav(url: &str, remote: &str) -> WebDav {
        WebDav::new(WebDavConfig {
            url: url.into(),
            remote_path: remote.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn collection_url_normalizes_slashes() {
        assert_eq!(
            dav("https://dav.example/files/", "/schooldesk_sync/").collection_url(),
            "https://dav.example/files/schooldesk_sync/"
        );
        assert_eq!(dav("https://dav.example", "").collection_url(), "https://dav.example/");
    }

    #[test]
    fn empty_url_is_unavailable() {
        assert!(!dav("", "/x/").is_available());
        assert!(dav("http://localhost:8080", "/x/").is_available());
    }
}
