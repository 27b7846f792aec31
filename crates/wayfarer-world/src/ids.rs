//! Identity types for everything that lives in the world.
//!
//! Every entity kind gets its own newtype so a `LocationId` can never be
//! passed where a `PlayerId` is expected, even though both are `u64`
//! underneath. All of them serialize as their inner value
//! (`#[serde(transparent)]`), so a room with vnum 3001 is just `3001` in a
//! world file.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Numeric ids
// ---------------------------------------------------------------------------

/// The vnum of a room. Unique across the whole world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

/// A connected player session.
///
/// Two sessions logged into the same account get two different
/// `PlayerId`s; the account name is what ties them together.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A non-player character instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NpcId(pub u64);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String ids
// ---------------------------------------------------------------------------

/// A named grouping of rooms, used for area-wide broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub String);

impl AreaId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An item identifier such as `"brass-key"`. Door keys refer to items by
/// this id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A locale tag such as `"en"` or `"es"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(pub String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_serialize_transparently() {
        let json = serde_json::to_string(&LocationId(3001)).unwrap();
        assert_eq!(json, "3001");
        let back: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(back, PlayerId(42));
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(LocationId(7).to_string(), "L-7");
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(NpcId(7).to_string(), "N-7");
        assert_eq!(ItemId::new("brass-key").to_string(), "brass-key");
    }

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(Locale::default().as_str(), "en");
    }
}
