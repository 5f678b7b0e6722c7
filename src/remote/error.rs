use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {0} timed out")]
    Timeout(String, #[source] reqwest::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    // Stream errors while reading a response body
    #[error("Data download failed")]
    DownloadIo(#[from] std::io::Error),
}

impl FetchError {
    pub(crate) fn from_reqwest(url: String, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(url, e)
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus {
                url,
                status,
                source: e,
            }
        } else {
            FetchError::NetworkRequest(url, e)
        }
    }
}
