//! Access to the remote archive tree.
//!
//! The pipeline only ever needs two things from the remote side: the file names inside a
//! directory and the bytes of one file. [`RemoteSource`] captures exactly that so the cache and
//! loaders can run against the HTTPS mirror or an in-memory stand-in.

pub mod error;
pub mod http;

use crate::remote::error::FetchError;
use std::future::Future;

pub trait RemoteSource: Send + Sync {
    /// File names (not paths) directly inside `directory`.
    fn list(&self, directory: &str) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;

    fn fetch(
        &self,
        directory: &str,
        file_name: &str,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}
