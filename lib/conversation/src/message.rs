//! Seed example parsing.
//!
//! Seed examples are configured as `"role:content"` strings and injected
//! ahead of the real conversation to steer the model.

use crate::error::SeedExampleError;
use chat_relay_ai::{Role, Turn};
use tracing::warn;

/// Parses one `"role:content"` example, splitting on the first ':'.
///
/// # Errors
///
/// Returns an error if the separator is missing, either part is empty after
/// trimming, or the role is not a known role.
pub fn parse_seed_example(example: &str) -> Result<Turn, SeedExampleError> {
    let (role, content) =
        example
            .split_once(':')
            .ok_or_else(|| SeedExampleError::MissingSeparator {
                example: example.to_string(),
            })?;

    let role = role.trim();
    let content = content.trim();
    if role.is_empty() || content.is_empty() {
        return Err(SeedExampleError::EmptyPart {
            example: example.to_string(),
        });
    }

    let role: Role = role.parse().map_err(|_| SeedExampleError::UnknownRole {
        example: example.to_string(),
        role: role.to_lowercase(),
    })?;

    Ok(Turn::new(role, content))
}

/// Parses every example, dropping and logging the malformed ones.
pub fn parse_seed_examples<I, S>(examples: I) -> Vec<Turn>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    examples
        .into_iter()
        .filter_map(|example| match parse_seed_example(example.as_ref()) {
            Ok(turn) => Some(turn),
            Err(e) => {
                warn!(error = %e, "skipping malformed seed example");
                None
            }
        })
        .collect()
}
