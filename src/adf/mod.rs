//! Atlassian Document Format (ADF).
//!
//! Jira stores descriptions and comment bodies as ADF: a JSON tree of typed
//! nodes. This module models the subset we render as a closed enum. Node
//! kinds we don't know deserialize to [`Node::Unknown`] and are skipped by the
//! renderer, as are unknown marks. A child that fails to parse (no `type`,
//! wrongly typed attributes) also becomes `Unknown`, so its siblings survive.

mod render;

pub use render::{render, render_value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a child list element by element, replacing any element that does
/// not parse with `T::default()`.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let values: Vec<serde_json::Value> = null_as_default(deserializer)?;
    Ok(values.into_iter().map(|v| serde_json::from_value(v).unwrap_or_default()).collect())
}

/// The root `doc` node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Top-level block nodes, in order.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub content: Vec<Node>,
}

impl Document {
    /// Build a document from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not shaped like an ADF document.
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }
}

/// A block or inline ADF node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// A paragraph of inline content.
    Paragraph {
        /// Inline children.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// A heading of level 1-6.
    Heading {
        /// Heading attributes.
        #[serde(default, deserialize_with = "null_as_default")]
        attrs: HeadingAttrs,
        /// Inline children.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// An unordered list of `listItem` nodes.
    BulletList {
        /// List items.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// A numbered list of `listItem` nodes.
    OrderedList {
        /// List attributes.
        #[serde(default, deserialize_with = "null_as_default")]
        attrs: OrderedListAttrs,
        /// List items.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// One entry of a list, holding paragraphs.
    ListItem {
        /// Block children.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// A fenced code block.
    CodeBlock {
        /// Code block attributes.
        #[serde(default, deserialize_with = "null_as_default")]
        attrs: CodeBlockAttrs,
        /// Text children holding the code.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// A horizontal rule.
    Rule,
    /// A block quote of paragraphs.
    Blockquote {
        /// Block children.
        #[serde(default, deserialize_with = "lenient_vec")]
        content: Vec<Node>,
    },
    /// A run of text with optional marks.
    Text {
        /// The text itself.
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
        /// Formatting applied to the text, in order.
        #[serde(default, deserialize_with = "lenient_vec")]
        marks: Vec<Mark>,
    },
    /// A line break inside a paragraph.
    HardBreak,
    /// Any node kind not listed above.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Inline formatting on a text node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Mark {
    /// Rendered as `**x**`.
    #[serde(rename = "strong")]
    Bold,
    /// Rendered as `*x*`.
    #[serde(rename = "em")]
    Italic,
    /// Rendered as `` `x` ``.
    #[serde(rename = "code")]
    InlineCode,
    /// Rendered as `~~x~~`.
    #[serde(rename = "strike")]
    Strikethrough,
    /// Links, colours, underline and the rest: ignored.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Attributes of a heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct HeadingAttrs {
    /// Heading level; missing means 1.
    #[serde(default)]
    pub level: Option<u64>,
}

impl HeadingAttrs {
    /// The level clamped to 1..=6.
    #[must_use]
    pub fn level(&self) -> usize {
        usize::try_from(self.level.unwrap_or(1).clamp(1, 6)).unwrap_or(1)
    }
}

/// Attributes of an ordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OrderedListAttrs {
    /// First item number; missing means 1.
    #[serde(default)]
    pub order: Option<u64>,
    /// Legacy spelling of `order` used by older Jira payloads.
    #[serde(default)]
    pub start: Option<u64>,
}

impl OrderedListAttrs {
    /// The number of the first item.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start.or(self.order).unwrap_or(1)
    }
}

/// Attributes of a code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeBlockAttrs {
    /// Language tag for the fence; missing means none.
    #[serde(default)]
    pub language: Option<String>,
}
