use std::collections::HashSet;

use sdkui_platform::sdkman_platform;

pub const CATALOG_BASE_URL: &str = "https://api.sdkman.io/2";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to fetch versions of {candidate}: {source}")]
    Request {
        candidate: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("versions catalog returned HTTP {status} for {candidate}")]
    Status {
        candidate: String,
        status: reqwest::StatusCode,
    },
    #[error("versions catalog has no entries for {candidate}")]
    Empty { candidate: String },
}

#[must_use]
pub fn catalog_url(base_url: &str, candidate: &str, platform: &str) -> String {
    format!(
        "{}/candidates/{candidate}/{platform}/versions/all",
        base_url.trim_end_matches('/')
    )
}

/// Split a comma-separated catalog body into distinct identifiers, keeping
/// the first occurrence of each.
#[must_use]
pub fn parse_catalog(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    body.split(',')
        .map(str::trim)
        .filter(|identifier| !identifier.is_empty() && seen.insert(*identifier))
        .map(str::to_string)
        .collect()
}

/// Fetch every published version of `candidate` for the running platform.
///
/// # Errors
/// Returns an error if the request fails, the server answers with a
/// non-success status, or the body lists no versions.
pub async fn fetch_candidate_versions(
    client: &reqwest::Client,
    base_url: &str,
    candidate: &str,
) -> Result<Vec<String>, CatalogError> {
    let url = catalog_url(base_url, candidate, sdkman_platform());
    log::debug!("Fetching versions catalog: {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| CatalogError::Request {
            candidate: candidate.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(CatalogError::Status {
            candidate: candidate.to_string(),
            status: response.status(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| CatalogError::Request {
            candidate: candidate.to_string(),
            source,
        })?;

    let versions = parse_catalog(&body);
    if versions.is_empty() {
        return Err(CatalogError::Empty {
            candidate: candidate.to_string(),
        });
    }
    Ok(versions)
}
