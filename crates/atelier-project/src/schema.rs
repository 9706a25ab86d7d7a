//! JSON schema for serialized project trees.

use serde::{Deserialize, Deserializer, Serialize};

/// One node of a serialized project tree.
///
/// A node with `children` is a directory; anything else is a file. The `data`
/// field is tri-state: absent means the content must be fetched from the
/// template source, an explicit `null` means intentionally blank, and a
/// string is inline content. [`TreeNode::data`] keeps all three apart as
/// `None`, `Some(None)`, and `Some(Some(_))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        self.children.is_some()
    }
}

/// Keeps a missing field apart from an explicit `null`: with
/// `#[serde(default)]` an absent field stays `None`, while a present field
/// (null included) lands in `Some`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
