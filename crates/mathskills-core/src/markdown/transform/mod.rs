//! Tree rewrites applied between parsing and rendering.
//!
//! Every transform is a pure `Node -> Vec<Node>` rule run bottom-up over the
//! whole tree. Rules only match node shapes produced by the parser, so the
//! output of one pass never re-triggers an earlier one.

mod alert;
mod callout;
mod celebration;
mod diagram;
mod emoji;
mod image_prompt;

pub use alert::AlertTransform;
pub use callout::CalloutTransform;
pub use celebration::CelebrationTransform;
pub use diagram::DiagramTransform;
pub use emoji::{split_emoji, EmojiTransform};
pub use image_prompt::{pollinations_image_url, ImagePromptTransform, IMAGE_STYLE};

use tracing::trace;

use super::tree::{map_nodes, Document, Node};

pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrites one node whose children were already visited. Input that
    /// does not match is returned unchanged.
    fn apply(&self, node: Node) -> Vec<Node>;
}

pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Callouts, celebrations, diagrams, image prompts, alerts, emoji.
    pub fn standard() -> Self {
        Self::empty()
            .with(CalloutTransform)
            .with(CelebrationTransform)
            .with(DiagramTransform)
            .with(ImagePromptTransform)
            .with(AlertTransform)
            .with(EmojiTransform)
    }

    pub fn with<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn run(&self, mut document: Document) -> Document {
        for transform in &self.transforms {
            trace!(transform = transform.name(), "Applying transform");
            document.children = map_nodes(document.children, &mut |node| transform.apply(node));
        }
        document
    }
}

impl Default for TransformChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse::parse_markdown;
    use crate::markdown::tree::{Block, CalloutKind, Inline};

    #[test]
    fn test_standard_order() {
        assert_eq!(
            TransformChain::standard().names(),
            vec!["callout", "celebration", "diagram", "image-prompt", "alert", "emoji"]
        );
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let doc = parse_markdown(":::hint\n💡 tip\n:::");
        assert_eq!(TransformChain::empty().run(doc.clone()), doc);
    }

    #[test]
    fn test_emoji_inside_callout() {
        let doc = TransformChain::standard().run(parse_markdown(":::hint\n💡 Tip\n:::"));
        assert_eq!(
            doc.children,
            vec![Node::Block(Block::Callout {
                kind: CalloutKind::Hint,
                children: vec![Node::paragraph(vec![
                    Node::Inline(Inline::Emoji("💡".to_string())),
                    Node::text(" Tip"),
                ])],
            })]
        );
    }
}
