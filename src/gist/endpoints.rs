// Gist API endpoint URLs.
// Builds fully encoded URLs for the list and single-gist endpoints.

use url::Url;

use crate::error::{GistError, Result};

/// `{api_base}/users/{username}/gists?access_token=..&page=..&per_page=..`
///
/// Numbers are written as given; callers validate them first.
pub fn list_url(
    api_base: &str,
    username: &str,
    token: &str,
    page: i64,
    per_page: i64,
) -> Result<Url> {
    let mut url = with_segments(api_base, &["users", username, "gists"])?;
    url.query_pairs_mut()
        .append_pair("access_token", token)
        .append_pair("page", &page.to_string())
        .append_pair("per_page", &per_page.to_string());
    Ok(url)
}

/// `{api_base}/gists/{id}`, without credentials.
pub fn gist_url(api_base: &str, id: &str) -> Result<Url> {
    with_segments(api_base, &["gists", id])
}

/// `{api_base}/gists/{id}?access_token=..`
pub fn document_url(api_base: &str, id: &str, token: &str) -> Result<Url> {
    let mut url = gist_url(api_base, id)?;
    url.query_pairs_mut().append_pair("access_token", token);
    Ok(url)
}

/// Append percent-encoded path segments to the base URL.
fn with_segments(api_base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(api_base)?;
    url.path_segments_mut()
        .map_err(|_| GistError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
