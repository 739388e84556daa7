pub mod client;
pub mod models;

pub use client::{FetchError, Fetcher, HttpFetcher, ResponseHandle};
pub use models::LauncherConfig;
