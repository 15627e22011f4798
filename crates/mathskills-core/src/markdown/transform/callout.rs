use super::Transform;
use crate::markdown::tree::{Block, CalloutKind, Node};

/// `:::hint`, `:::warning`, `:::example`, `:::solution`, `:::steps`.
pub struct CalloutTransform;

impl Transform for CalloutTransform {
    fn name(&self) -> &'static str {
        "callout"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Block(Block::Directive { name, children }) => match CalloutKind::from_name(&name) {
                Some(kind) => vec![Node::Block(Block::Callout { kind, children })],
                None => vec![Node::Block(Block::Directive { name, children })],
            },
            other => vec![other],
        }
    }
}
