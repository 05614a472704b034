//! GitHub Adapter
//!
//! 通过 GitHub Releases 镜像工具包产物

mod github_release_store;

pub use github_release_store::{GithubReleaseStore, GithubReleaseStoreConfig};
