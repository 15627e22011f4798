use super::Transform;
use crate::animation::{AnimationTrigger, CelebrationKind};
use crate::markdown::tree::{Block, Node};

/// `:::celebrate-<kind>` containers. Unknown kinds are left alone.
pub struct CelebrationTransform;

impl Transform for CelebrationTransform {
    fn name(&self) -> &'static str {
        "celebration"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Block(Block::Directive { name, children }) => {
                match CelebrationKind::from_directive(&name) {
                    Some(kind) => vec![Node::Block(Block::Celebration {
                        trigger: AnimationTrigger::autoplay(kind),
                        children,
                    })],
                    None => vec![Node::Block(Block::Directive { name, children })],
                }
            }
            other => vec![other],
        }
    }
}
