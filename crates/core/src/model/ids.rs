use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a chat user, as assigned by the transport.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a new `UserId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse UserId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| ParseIdError { raw: s.to_string() })
    }
}

/// A user as seen by the quiz: identity plus an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: UserId,
    display_name: Option<String>,
}

impl UserProfile {
    /// Name recorded for users that expose no display name.
    pub const ANONYMOUS: &'static str = "anonymous";

    #[must_use]
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        Self { id, display_name }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The display name, or `"anonymous"` when none was given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(Self::ANONYMOUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_and_parse() {
        let id: UserId = " 123456789 ".parse().unwrap();
        assert_eq!(id, UserId::new(123_456_789));
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn user_id_rejects_garbage() {
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn blank_display_name_falls_back_to_anonymous() {
        let profile = UserProfile::new(UserId::new(7), Some("   ".into()));
        assert_eq!(profile.display_name(), UserProfile::ANONYMOUS);

        let named = UserProfile::new(UserId::new(7), Some(" alice ".into()));
        assert_eq!(named.display_name(), "alice");
    }
}
