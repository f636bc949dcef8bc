//! GitHub release metadata lookup and asset downloads.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// User-Agent sent with every request (GitHub rejects anonymous agents).
const USER_AGENT: &str = concat!("bootstrap-cli/", env!("CARGO_PKG_VERSION"));

/// TCP connect + transfer timeout for metadata requests.
const API_TIMEOUT: Duration = Duration::from_secs(15);

/// Transfer timeout for asset downloads (fonts can run to tens of MB).
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// A GitHub release with its downloadable assets.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A single downloadable asset descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Fetch the latest release for `owner/repo` from the GitHub API.
///
/// # Errors
///
/// Returns an error on network failure, a non-success HTTP status, or an
/// unparseable response body.
pub fn fetch_latest_release(owner: &str, repo: &str) -> Result<ReleaseInfo> {
    let agent = ureq::AgentBuilder::new().timeout(API_TIMEOUT).build();
    let url = format!("https://api.github.com/repos/{owner}/{repo}/releases/latest");
    let resp = agent
        .get(&url)
        .set("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("fetching latest release for {owner}/{repo}"))?;
    serde_json::from_reader(resp.into_reader())
        .with_context(|| format!("parsing release metadata for {owner}/{repo}"))
}

/// Fetch only the latest release tag (e.g. `v3.2.1`).
///
/// # Errors
///
/// Same failure modes as [`fetch_latest_release`].
pub fn latest_release_tag(owner: &str, repo: &str) -> Result<String> {
    Ok(fetch_latest_release(owner, repo)?.tag_name)
}

/// Pick the download URL for the `.rpm` asset matching `arch`.
///
/// Falls back to a `noarch.rpm` asset when no architecture-specific build is
/// published.
#[must_use]
pub fn rpm_asset_url(assets: &[ReleaseAsset], arch: &str) -> Option<String> {
    let mut noarch = None;
    for asset in assets {
        if asset.name.ends_with(&format!("{arch}.rpm")) {
            return Some(asset.browser_download_url.clone());
        }
        if asset.name.ends_with("noarch.rpm") {
            noarch = Some(asset.browser_download_url.clone());
        }
    }
    noarch
}

/// Stream `url` into `dest`.
///
/// # Errors
///
/// Returns an error on network failure, a non-success HTTP status, or a
/// write failure on `dest`.
pub fn download(url: &str, dest: &mut impl Write) -> Result<u64> {
    let agent = ureq::AgentBuilder::new()
        .timeout(DOWNLOAD_TIMEOUT)
        .build();
    let resp = agent
        .get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("downloading {url}"))?;
    let mut reader = resp.into_reader();
    std::io::copy(&mut reader, dest).with_context(|| format!("writing download of {url}"))
}
