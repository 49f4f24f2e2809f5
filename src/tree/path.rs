//! Config name normalization and path rendering

use crate::error::TreeError;
use unicode_normalization::UnicodeNormalization;

/// Separator used when rendering group paths
pub const PATH_SEPARATOR: char = '/';

/// Normalize a value key, policy name or group name for insertion
///
/// Names are normalized to Unicode NFC so that visually identical names
/// contributed by different organizations land on the same entry. Empty names
/// and names containing the path separator are rejected.
pub fn normalize_name(name: &str) -> Result<String, TreeError> {
    let normalized: String = name.nfc().collect();

    if normalized.trim().is_empty() {
        return Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if normalized.contains(PATH_SEPARATOR) {
        return Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: format!("name contains '{}'", PATH_SEPARATOR),
        });
    }
    if normalized.chars().any(char::is_control) {
        return Err(TreeError::InvalidName {
            name: name.to_string(),
            reason: "name contains control characters".to_string(),
        });
    }

    Ok(normalized)
}

/// NFC form of a name used for lookups, without validation
pub fn lookup_key(name: &str) -> String {
    name.nfc().collect()
}

/// Normalize every element of a group path
pub fn normalize_path<S: AsRef<str>>(path: &[S]) -> Result<Vec<String>, TreeError> {
    path.iter().map(|p| normalize_name(p.as_ref())).collect()
}

/// Render a group path for messages, `/` for the root
pub fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return PATH_SEPARATOR.to_string();
    }
    let mut rendered = String::new();
    for element in path {
        rendered.push(PATH_SEPARATOR);
        rendered.push_str(element.as_ref());
    }
    rendered
}
