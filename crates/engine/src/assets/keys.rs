use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetIdError {
    #[error("asset id must not be empty")]
    Empty,
    #[error("asset id must not start with '/'")]
    LeadingSlash,
    #[error("asset id must not contain '..'")]
    ParentTraversal,
    #[error("asset id contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_asset_id(id: &str) -> Result<(), AssetIdError> {
    if id.is_empty() {
        return Err(AssetIdError::Empty);
    }
    if id.starts_with('/') {
        return Err(AssetIdError::LeadingSlash);
    }
    if id.contains("..") {
        return Err(AssetIdError::ParentTraversal);
    }
    for ch in id.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-') {
            continue;
        }
        return Err(AssetIdError::InvalidCharacter { character: ch });
    }
    Ok(())
}
