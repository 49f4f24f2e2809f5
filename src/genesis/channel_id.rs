//! Channel identifier rules

use crate::error::GenesisError;

/// Longest accepted channel identifier, in characters
pub const MAX_CHANNEL_ID_LENGTH: usize = 249;

/// Check a channel identifier
///
/// Accepted: 1 to 249 characters, a lowercase ASCII letter first, then
/// lowercase ASCII letters, digits, `.` or `-`.
pub fn validate_channel_id(channel_id: &str) -> Result<(), GenesisError> {
    let invalid = |reason: String| GenesisError::InvalidChannelId {
        channel_id: channel_id.to_string(),
        reason,
    };

    let mut chars = channel_id.chars();
    let first = chars
        .next()
        .ok_or_else(|| invalid("channel ID is empty".to_string()))?;

    let length = channel_id.chars().count();
    if length > MAX_CHANNEL_ID_LENGTH {
        return Err(invalid(format!(
            "length {} exceeds the maximum of {}",
            length, MAX_CHANNEL_ID_LENGTH
        )));
    }
    if !first.is_ascii_lowercase() {
        return Err(invalid(format!(
            "must start with a lowercase letter, found {:?}",
            first
        )));
    }
    if let Some(bad) =
        chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-'))
    {
        return Err(invalid(format!(
            "contains {:?}; only [a-z0-9.-] are allowed",
            bad
        )));
    }

    Ok(())
}
