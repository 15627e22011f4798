use lazy_static::lazy_static;
use regex::Regex;

use super::Transform;
use crate::markdown::tree::{AlertKind, Block, Inline, Node};

lazy_static! {
    static ref ALERT_MARKER: Regex = Regex::new(r"^\[!([A-Z]+)\][ \t]*").expect("alert marker pattern");
}

/// GitHub-style `> [!NOTE]` blockquotes.
pub struct AlertTransform;

impl Transform for AlertTransform {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Block(Block::BlockQuote(children)) => match alert_kind(&children) {
                Some(kind) => vec![Node::Block(Block::Alert {
                    kind,
                    children: strip_marker(children),
                })],
                None => vec![Node::Block(Block::BlockQuote(children))],
            },
            other => vec![other],
        }
    }
}

fn alert_kind(children: &[Node]) -> Option<AlertKind> {
    let Some(Node::Block(Block::Paragraph(inlines))) = children.first() else {
        return None;
    };
    let Some(Node::Text(first)) = inlines.first() else {
        return None;
    };
    let caps = ALERT_MARKER.captures(first)?;
    AlertKind::from_marker(&caps[1])
}

/// Drops the marker and the line break after it. A paragraph left empty
/// is removed.
fn strip_marker(mut children: Vec<Node>) -> Vec<Node> {
    let Some(Node::Block(Block::Paragraph(inlines))) = children.first_mut() else {
        return children;
    };

    if let Some(Node::Text(first)) = inlines.first_mut() {
        let rest = ALERT_MARKER.replace(first, "").into_owned();
        if rest.is_empty() {
            inlines.remove(0);
            if matches!(
                inlines.first(),
                Some(Node::Inline(Inline::SoftBreak)) | Some(Node::Inline(Inline::HardBreak))
            ) {
                inlines.remove(0);
            }
        } else {
            *first = rest;
        }
    }

    if inlines.is_empty() {
        children.remove(0);
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse::parse_markdown;
    use pretty_assertions::assert_eq;

    fn run(markdown: &str) -> Vec<Node> {
        parse_markdown(markdown)
            .children
            .into_iter()
            .flat_map(|n| AlertTransform.apply(n))
            .collect()
    }

    #[test]
    fn test_marker_removed() {
        assert_eq!(
            run("> [!WARNING]\n> Area uses cm², not cm!"),
            vec![Node::Block(Block::Alert {
                kind: AlertKind::Warning,
                children: vec![Node::paragraph(vec![Node::text("Area uses cm², not cm!")])],
            })]
        );
    }

    #[test]
    fn test_marker_alone_in_paragraph() {
        assert_eq!(
            run("> [!TIP]\n>\n> Use pen and paper!"),
            vec![Node::Block(Block::Alert {
                kind: AlertKind::Tip,
                children: vec![Node::paragraph(vec![Node::text("Use pen and paper!")])],
            })]
        );
    }

    #[test]
    fn test_same_line_content() {
        assert_eq!(
            run("> [!NOTE] Remember this formula."),
            vec![Node::Block(Block::Alert {
                kind: AlertKind::Note,
                children: vec![Node::paragraph(vec![Node::text("Remember this formula.")])],
            })]
        );
    }

    #[test]
    fn test_unknown_or_lowercase_keyword_stays_blockquote() {
        for markdown in ["> [!DANGER]\n> hot", "> [!note]\n> quiet", "> plain quote"] {
            let out = run(markdown);
            assert!(
                matches!(out.as_slice(), [Node::Block(Block::BlockQuote(_))]),
                "{markdown}: {out:?}"
            );
        }
    }
}
