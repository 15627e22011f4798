use super::Transform;
use crate::markdown::tree::{Block, Diagram, Node};

pub const JSXGRAPH_LANG: &str = "jsxgraph";
pub const GEOGEBRA_LANG: &str = "geogebra";
pub const GEOGEBRA_EMBED_LANG: &str = "geogebra-embed";

/// Interactive geometry fences. Scripts are passed through verbatim; the
/// engine reports its own errors.
pub struct DiagramTransform;

impl Transform for DiagramTransform {
    fn name(&self) -> &'static str {
        "diagram"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        let Node::Block(Block::CodeBlock { lang, code }) = node else {
            return vec![node];
        };

        let diagram = match lang.as_deref() {
            Some(JSXGRAPH_LANG) => Diagram::JsxGraph { script: code },
            Some(GEOGEBRA_LANG) => Diagram::GeoGebra { script: code },
            Some(GEOGEBRA_EMBED_LANG) => Diagram::GeoGebraEmbed {
                template_id: code.trim().to_string(),
            },
            _ => return vec![Node::Block(Block::CodeBlock { lang, code })],
        };
        vec![Node::Block(Block::Diagram(diagram))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence(lang: &str, code: &str) -> Node {
        Node::Block(Block::CodeBlock {
            lang: Some(lang.to_string()),
            code: code.to_string(),
        })
    }

    #[test]
    fn test_scripts_are_verbatim() {
        let script = "p1 = point(0, 0) << name: 'A' >>;\n  p2 = point(3, 0);";
        assert_eq!(
            DiagramTransform.apply(fence("jsxgraph", script)),
            vec![Node::Block(Block::Diagram(Diagram::JsxGraph {
                script: script.to_string()
            }))]
        );
        assert_eq!(
            DiagramTransform.apply(fence("geogebra", "A = (0, 0)\nnot valid ((")),
            vec![Node::Block(Block::Diagram(Diagram::GeoGebra {
                script: "A = (0, 0)\nnot valid ((".to_string()
            }))]
        );
    }

    #[test]
    fn test_embed_id_is_trimmed() {
        assert_eq!(
            DiagramTransform.apply(fence("geogebra-embed", "  pythagoras \n")),
            vec![Node::Block(Block::Diagram(Diagram::GeoGebraEmbed {
                template_id: "pythagoras".to_string()
            }))]
        );
    }

    #[test]
    fn test_other_languages_untouched() {
        assert_eq!(DiagramTransform.apply(fence("python", "x = 1")), vec![fence("python", "x = 1")]);
        assert_eq!(DiagramTransform.apply(fence("JSXGraph", "x")), vec![fence("JSXGraph", "x")]);
    }
}
