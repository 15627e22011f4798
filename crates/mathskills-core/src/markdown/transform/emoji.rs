use lazy_static::lazy_static;
use regex::Regex;

use super::Transform;
use crate::markdown::tree::{Inline, Node};

lazy_static! {
    // a pictograph plus any trailing variation selector, joiner or skin tone
    static ref EMOJI_RUN: Regex = Regex::new(
        r"(?:[\p{Emoji_Presentation}\p{Extended_Pictographic}][\x{FE0F}\x{200D}\p{Emoji_Modifier}]*)+"
    )
    .expect("emoji pattern");
}

/// Splits text into plain runs and emoji runs, preserving order.
pub fn split_emoji(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for m in EMOJI_RUN.find_iter(text) {
        if m.start() > last {
            nodes.push(Node::Text(text[last..m.start()].to_string()));
        }
        nodes.push(Node::Inline(Inline::Emoji(m.as_str().to_string())));
        last = m.end();
    }
    if last < text.len() {
        nodes.push(Node::Text(text[last..].to_string()));
    }
    nodes
}

pub struct EmojiTransform;

impl Transform for EmojiTransform {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Text(text) if EMOJI_RUN.is_match(&text) => split_emoji(&text),
            other => vec![other],
        }
    }
}
