//! ADF to markdown-ish text.

use super::{Document, Mark, Node};
use crate::logging;
use serde_json::Value;

/// Render a document as flat text, blocks separated by a blank line.
///
/// Blocks that render to nothing (empty paragraphs, unknown kinds) are
/// dropped instead of leaving empty lines behind.
#[must_use]
pub fn render(doc: &Document) -> String {
    doc.content.iter().filter_map(render_block).collect::<Vec<_>>().join("\n\n")
}

/// Render a Jira rich-text field that may be ADF or already plain text.
///
/// Strings pass through unchanged, objects are rendered as ADF, and `null`
/// means the field is absent. Malformed nodes inside a document are skipped.
/// An object whose top level is not a document is logged and rendered as
/// empty text.
#[must_use]
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => match Document::from_value(value) {
            Ok(doc) => Some(render(&doc)),
            Err(e) => {
                logging::log_warning(&format!("Ignoring rich text that is not valid ADF: {e}"));
                Some(String::new())
            }
        },
        other => Some(other.to_string()),
    }
}

fn render_block(node: &Node) -> Option<String> {
    let rendered = match node {
        Node::Paragraph { content } => render_inline(content),
        Node::Heading { attrs, content } => {
            let text = render_inline(content);
            if text.is_empty() {
                return None;
            }
            format!("{} {text}", "#".repeat(attrs.level()))
        }
        Node::BulletList { content } => render_list(content, |_| "- ".to_string()),
        Node::OrderedList { attrs, content } => {
            let start = attrs.start();
            render_list(content, |idx| format!("{}. ", start + idx))
        }
        Node::CodeBlock { attrs, content } => {
            let code: String = content
                .iter()
                .filter_map(|n| match n {
                    Node::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            if code.is_empty() {
                return None;
            }
            format!("```{}\n{code}\n```", attrs.language.as_deref().unwrap_or(""))
        }
        Node::Rule => "---".to_string(),
        Node::Blockquote { content } => content
            .iter()
            .filter_map(paragraph_text)
            .map(|text| format!("> {text}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    (!rendered.is_empty()).then_some(rendered)
}

/// Render list items one per line. Numbering follows the item's position,
/// so an empty item still consumes its number.
fn render_list(items: &[Node], prefix: impl Fn(u64) -> String) -> String {
    items
        .iter()
        .zip(0_u64..)
        .filter_map(|(item, idx)| {
            let Node::ListItem { content } = item else {
                return None;
            };
            let parts: Vec<String> = content.iter().filter_map(paragraph_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(format!("{}{}", prefix(idx), parts.join(" ")))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(node: &Node) -> Option<String> {
    match node {
        Node::Paragraph { content } => {
            let text = render_inline(content);
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

fn render_inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text { text, marks } => out.push_str(&apply_marks(text, marks)),
            Node::HardBreak => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Wrap `text` in each mark in list order, innermost first.
fn apply_marks(text: &str, marks: &[Mark]) -> String {
    marks.iter().fold(text.to_string(), |acc, mark| match mark {
        Mark::Bold => format!("**{acc}**"),
        Mark::Italic => format!("*{acc}*"),
        Mark::InlineCode => format!("`{acc}`"),
        Mark::Strikethrough => format!("~~{acc}~~"),
        Mark::Unknown => acc,
    })
}
