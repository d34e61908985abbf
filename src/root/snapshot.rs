//! Owned view of a matched element
//!
//! Both backends hand back the same shape so callers can switch between a
//! static document and a live page without touching their match handling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An element as it looked during the round that matched it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Concatenated descendant text
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub outer_html: String,
}

impl ElementSnapshot {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_decodes_script_payload() {
        let payload = serde_json::json!({
            "tag": "button",
            "attributes": { "id": "go", "class": "btn primary" },
            "text": "Go",
            "outerHtml": "<button id=\"go\" class=\"btn primary\">Go</button>"
        });
        let snapshot: ElementSnapshot = match serde_json::from_value(payload) {
            Ok(s) => s,
            Err(e) => panic!("payload should decode: {e}"),
        };
        assert_eq!(snapshot.id(), Some("go"));
        assert!(snapshot.has_class("primary"));
        assert!(!snapshot.has_class("secondary"));
        assert_eq!(snapshot.text, "Go");
    }
}
