use crate::remote::error::FetchError;
use crate::remote::RemoteSource;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"?/][^"]*)""#).expect("valid href pattern"));

/// Reads directory indexes and files from the HTTPS mirror of the archive.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, directory: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            directory.trim_matches('/'),
            file_name
        )
    }

    async fn get_bytes(&self, url: String) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(FetchError::from_reqwest(url, e));
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        Ok(body)
    }
}

/// Extracts the file entries of an HTML directory index. Parent links, sort links and
/// subdirectories are skipped.
pub fn parse_listing(html: &str) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|href| !href.ends_with('/'))
        .map(|href| href.rsplit('/').next().unwrap_or(href).to_string())
        .collect()
}

impl RemoteSource for HttpRemote {
    async fn list(&self, directory: &str) -> Result<Vec<String>, FetchError> {
        let url = self.url(directory, "");
        debug!("Listing {}", url);
        let body = self.get_bytes(url).await?;
        let entries = parse_listing(&String::from_utf8_lossy(&body));
        debug!("{} entries in {}", entries.len(), directory);
        Ok(entries)
    }

    async fn fetch(&self, directory: &str, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url(directory, file_name);
        info!("Downloading {}", url);
        let body = self.get_bytes(url).await?;
        info!("Downloaded {} bytes of {}", body.len(), file_name);
        Ok(body)
    }
}
