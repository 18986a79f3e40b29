//! Allow-list access control.

use std::collections::HashSet;
use tracing::warn;

/// Name used for an identity field the platform did not provide.
pub const MISSING_IDENTITY: &str = "none";

/// Who may talk to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// No allow-list configured; everyone is authorized.
    #[default]
    Unrestricted,
    /// Only the listed user or group names (lowercase) are authorized.
    Restricted(HashSet<String>),
}

impl AccessPolicy {
    /// Builds a policy from configured names.
    ///
    /// Names are trimmed and lowercased; blank names are ignored. If nothing
    /// usable remains the policy is [`AccessPolicy::Unrestricted`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: HashSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            Self::Unrestricted
        } else {
            Self::Restricted(names)
        }
    }

    /// Returns whether the user or the group they write from is authorized.
    ///
    /// Missing names are compared as the literal `"none"`.
    #[must_use]
    pub fn is_authorized(&self, user_name: Option<&str>, group_name: Option<&str>) -> bool {
        let Self::Restricted(names) = self else {
            return true;
        };

        let user_name = user_name.unwrap_or(MISSING_IDENTITY).to_lowercase();
        let group_name = group_name.unwrap_or(MISSING_IDENTITY).to_lowercase();

        if names.contains(&user_name) || names.contains(&group_name) {
            return true;
        }

        warn!(user = %user_name, group = %group_name, "unauthorized user tried to talk to the bot");
        false
    }

    /// Returns whether an allow-list is in force.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }
}
