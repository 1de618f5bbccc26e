//! Platform-conditional representation: `PlatformTag`, `PlatformMap`,
//! `PlatformSchema`, `PlatformCodeBlock` (§3.1, invariant 6).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::PropValue;

/// The six platform tags recognized structurally as `PlatformMap` keys
/// (invariant 6). No other string is ever treated as a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    /// Apple iOS.
    Ios,
    /// Google Android.
    Android,
    /// Web/browser target.
    Web,
    /// Apple macOS.
    Macos,
    /// Microsoft Windows.
    Windows,
    /// Linux desktop.
    Linux,
}

impl PlatformTag {
    /// All recognized platform tags, in a stable canonical order.
    pub const ALL: [PlatformTag; 6] = [
        PlatformTag::Ios,
        PlatformTag::Android,
        PlatformTag::Web,
        PlatformTag::Macos,
        PlatformTag::Windows,
        PlatformTag::Linux,
    ];

    /// Parse a lowercase tag string (`"ios"`, `"android"`, ...), or `None`
    /// if it does not name a recognized platform.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ios" => Some(PlatformTag::Ios),
            "android" => Some(PlatformTag::Android),
            "web" => Some(PlatformTag::Web),
            "macos" => Some(PlatformTag::Macos),
            "windows" => Some(PlatformTag::Windows),
            "linux" => Some(PlatformTag::Linux),
            _ => None,
        }
    }

    /// The lowercase tag string this platform serializes as.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformTag::Ios => "ios",
            PlatformTag::Android => "android",
            PlatformTag::Web => "web",
            PlatformTag::Macos => "macos",
            PlatformTag::Windows => "windows",
            PlatformTag::Linux => "linux",
        }
    }

    /// The Dart `Platform.isXxx` predicate this tag corresponds to (§4.2).
    pub fn dart_predicate(&self) -> &'static str {
        match self {
            PlatformTag::Ios => "Platform.isIOS",
            PlatformTag::Android => "Platform.isAndroid",
            PlatformTag::Web => "Platform.isWeb",
            PlatformTag::Macos => "Platform.isMacOS",
            PlatformTag::Windows => "Platform.isWindows",
            PlatformTag::Linux => "Platform.isLinux",
        }
    }

    /// The JSX `Platform.OS === "..."` string literal this tag corresponds to (§4.1).
    pub fn jsx_os_literal(&self) -> &'static str {
        self.as_str()
    }
}

/// A mapping from platform tag (plus optional `fallback`) to an alternative
/// `PropValue`, recognized structurally rather than by any explicit marker
/// (invariant 6): a mapping becomes a `PlatformMap` only when it has at
/// least one platform-tag key and no non-platform keys other than `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMap {
    /// Per-platform values, keyed by tag.
    pub by_platform: IndexMap<PlatformTag, Box<PropValue>>,
    /// Value used when no platform-specific entry matches.
    pub fallback: Option<Box<PropValue>>,
}

/// Attempt to recognize a generic string-keyed map as a [`PlatformMap`].
///
/// Per invariant 6, a map qualifies only if it has at least one platform-tag
/// key and every other key (if any) is exactly `fallback`. A map with only a
/// `fallback` key and no platform tags does **not** qualify (§8 boundary
/// behavior) and is returned unchanged as an ordinary mapping.
pub fn recognize_platform_map(map: &IndexMap<String, PropValue>) -> Option<PlatformMap> {
    let mut by_platform = IndexMap::new();
    let mut fallback = None;
    let mut saw_platform_tag = false;

    for (key, value) in map {
        if let Some(tag) = PlatformTag::parse(key) {
            by_platform.insert(tag, Box::new(value.clone()));
            saw_platform_tag = true;
        } else if key == "fallback" {
            fallback = Some(Box::new(value.clone()));
        } else {
            // A non-platform, non-fallback key demotes this to an ordinary mapping.
            return None;
        }
    }

    if !saw_platform_tag {
        return None;
    }

    Some(PlatformMap {
        by_platform,
        fallback,
    })
}

/// One opaque, preserved implementation body for a specific set of platforms
/// (§3.1 `PlatformSchema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformImplementation {
    /// Platforms this implementation applies to.
    pub platforms: Vec<PlatformTag>,
    /// Opaque verbatim source for this branch.
    pub code: String,
    /// The source dialect this code payload is written in.
    pub language: SourceLanguage,
}

/// Which surface dialect a payload of opaque code is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLanguage {
    /// JSX/TypeScript.
    JsxTs,
    /// Dart.
    Dart,
}

/// One platform-conditional code block lowered from an `if/else`-chain or
/// ternary (§3.1, §4.1, §4.2, §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformCodeBlock {
    /// Unique id within the IR's `PlatformSchema`.
    pub id: String,
    /// Branch implementations, one per covered platform set.
    pub implementations: Vec<PlatformImplementation>,
    /// Fallback (`else`) payload, if present.
    pub fallback: Option<String>,
    /// Warnings recorded while lowering this block (e.g. missing `else`).
    pub warnings: Vec<String>,
}

/// The side-table of all platform-conditional blocks in an IR (§3.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSchema {
    /// Every platform code block in the IR.
    pub blocks: Vec<PlatformCodeBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_only_map_does_not_recognize_as_platform_map() {
        let mut map = IndexMap::new();
        map.insert("fallback".to_string(), PropValue::Str("x".to_string()));
        assert!(recognize_platform_map(&map).is_none());
    }

    #[test]
    fn platform_tags_with_fallback_recognize() {
        let mut map = IndexMap::new();
        map.insert("ios".to_string(), PropValue::Str("a".to_string()));
        map.insert("android".to_string(), PropValue::Str("b".to_string()));
        map.insert("fallback".to_string(), PropValue::Str("c".to_string()));
        let platform_map = recognize_platform_map(&map).expect("should recognize");
        assert_eq!(platform_map.by_platform.len(), 2);
        assert!(platform_map.fallback.is_some());
    }

    #[test]
    fn non_platform_key_demotes_to_ordinary_map() {
        let mut map = IndexMap::new();
        map.insert("ios".to_string(), PropValue::Str("a".to_string()));
        map.insert("color".to_string(), PropValue::Str("red".to_string()));
        assert!(recognize_platform_map(&map).is_none());
    }
}
