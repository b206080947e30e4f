use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a host tab.
///
/// Identity is plain string equality. A tab that closes and a new one that
/// happens to reuse the id are indistinguishable and treated as one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Returns `None` for an empty id, which the host uses for "no tab".
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(TabId::new("").is_none());
        assert_eq!(TabId::new("tab-1").unwrap().as_str(), "tab-1");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = TabId::new("tab-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""tab-7""#);
    }
}
