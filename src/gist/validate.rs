// Request validation.
// Pure checks run before any network or disk access.

use crate::error::{GistError, Result};

/// Check credentials and pagination for a list request.
///
/// Checks run in a fixed order: empty token, empty username, username
/// containing a space, then pagination. The first failure wins.
pub fn validate_list(username: &str, token: &str, per_page: i64, page: i64) -> Result<()> {
    if token.is_empty() {
        return Err(GistError::EmptyToken);
    }
    if username.is_empty() {
        return Err(GistError::EmptyUsername);
    }
    if username.contains(' ') {
        return Err(GistError::BadUsername);
    }
    if per_page <= 0 || page < 0 {
        return Err(GistError::Pagination);
    }
    Ok(())
}

pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(GistError::EmptyId);
    }
    Ok(())
}
