//! Owned Markdown syntax tree.
//!
//! A render pass owns its [`Document`] outright, so transforms consume nodes
//! and hand back replacements instead of patching through references.

use crate::animation::AnimationTrigger;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Inline(Inline),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    Code(String),
    Math(String),
    DisplayMath(String),
    Link {
        url: String,
        title: String,
        children: Vec<Node>,
    },
    Image {
        url: String,
        title: String,
        alt: String,
    },
    Html(String),
    SoftBreak,
    HardBreak,
    Emoji(String),
    TaskMarker(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Hint,
    Warning,
    Example,
    Solution,
    Steps,
}

impl CalloutKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hint" => Some(CalloutKind::Hint),
            "warning" => Some(CalloutKind::Warning),
            "example" => Some(CalloutKind::Example),
            "solution" => Some(CalloutKind::Solution),
            "steps" => Some(CalloutKind::Steps),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutKind::Hint => "hint",
            CalloutKind::Warning => "warning",
            CalloutKind::Example => "example",
            CalloutKind::Solution => "solution",
            CalloutKind::Steps => "steps",
        }
    }

    pub fn classes(&self) -> &'static str {
        match self {
            CalloutKind::Hint => {
                "border-l-4 border-blue-500 bg-blue-50 dark:bg-blue-950 p-4 my-4 rounded-r"
            }
            CalloutKind::Warning => {
                "border-l-4 border-amber-500 bg-amber-50 dark:bg-amber-950 p-4 my-4 rounded-r"
            }
            CalloutKind::Example => {
                "border-l-4 border-green-500 bg-green-50 dark:bg-green-950 p-4 my-4 rounded-r"
            }
            CalloutKind::Solution => {
                "border-l-4 border-purple-500 bg-purple-50 dark:bg-purple-950 p-4 my-4 rounded-r"
            }
            CalloutKind::Steps => {
                "border border-gray-300 dark:border-gray-700 bg-gray-50 dark:bg-gray-900 p-4 my-4 rounded"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// Keyword as written between `[!` and `]`, uppercase only.
    pub fn from_marker(keyword: &str) -> Option<Self> {
        match keyword {
            "NOTE" => Some(AlertKind::Note),
            "TIP" => Some(AlertKind::Tip),
            "IMPORTANT" => Some(AlertKind::Important),
            "WARNING" => Some(AlertKind::Warning),
            "CAUTION" => Some(AlertKind::Caution),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Note => "note",
            AlertKind::Tip => "tip",
            AlertKind::Important => "important",
            AlertKind::Warning => "warning",
            AlertKind::Caution => "caution",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Note => "Note",
            AlertKind::Tip => "Tip",
            AlertKind::Important => "Important",
            AlertKind::Warning => "Warning",
            AlertKind::Caution => "Caution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagram {
    JsxGraph { script: String },
    GeoGebra { script: String },
    GeoGebraEmbed { template_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Node>),
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    BlockQuote(Vec<Node>),
    List {
        start: Option<u64>,
        items: Vec<Node>,
    },
    ListItem(Vec<Node>),
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    Table {
        alignments: Vec<Align>,
        children: Vec<Node>,
    },
    TableHead(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    Rule,
    Html(String),
    /// `:::name` container no transform claimed
    Directive {
        name: String,
        children: Vec<Node>,
    },
    Callout {
        kind: CalloutKind,
        children: Vec<Node>,
    },
    Alert {
        kind: AlertKind,
        children: Vec<Node>,
    },
    Celebration {
        trigger: AnimationTrigger,
        children: Vec<Node>,
    },
    Diagram(Diagram),
    GeneratedImage {
        src: String,
        alt: String,
    },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Block(Block::Paragraph(children))
    }

    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Text(_) => None,
            Node::Inline(inline) => match inline {
                Inline::Emphasis(c) | Inline::Strong(c) | Inline::Strikethrough(c) => Some(c),
                Inline::Link { children, .. } => Some(children),
                _ => None,
            },
            Node::Block(block) => match block {
                Block::Paragraph(c)
                | Block::BlockQuote(c)
                | Block::ListItem(c)
                | Block::TableHead(c)
                | Block::TableRow(c)
                | Block::TableCell(c) => Some(c),
                Block::Heading { children, .. }
                | Block::Table { children, .. }
                | Block::Directive { children, .. }
                | Block::Callout { children, .. }
                | Block::Alert { children, .. }
                | Block::Celebration { children, .. } => Some(children),
                Block::List { items, .. } => Some(items),
                _ => None,
            },
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text(_) => None,
            Node::Inline(inline) => match inline {
                Inline::Emphasis(c) | Inline::Strong(c) | Inline::Strikethrough(c) => Some(c),
                Inline::Link { children, .. } => Some(children),
                _ => None,
            },
            Node::Block(block) => match block {
                Block::Paragraph(c)
                | Block::BlockQuote(c)
                | Block::ListItem(c)
                | Block::TableHead(c)
                | Block::TableRow(c)
                | Block::TableCell(c) => Some(c),
                Block::Heading { children, .. }
                | Block::Table { children, .. }
                | Block::Directive { children, .. }
                | Block::Callout { children, .. }
                | Block::Alert { children, .. }
                | Block::Celebration { children, .. } => Some(children),
                Block::List { items, .. } => Some(items),
                _ => None,
            },
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Inline(Inline::Code(s))
            | Node::Inline(Inline::Math(s))
            | Node::Inline(Inline::DisplayMath(s))
            | Node::Inline(Inline::Emoji(s)) => out.push_str(s),
            Node::Inline(Inline::SoftBreak) | Node::Inline(Inline::HardBreak) => out.push('\n'),
            Node::Inline(Inline::Image { alt, .. }) => out.push_str(alt),
            other => {
                if let Some(children) = other.children() {
                    collect_text(children, out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Pre-order walk over every node.
    pub fn visit<F: FnMut(&Node)>(&self, mut f: F) {
        visit_nodes(&self.children, &mut f);
    }
}

fn visit_nodes<F: FnMut(&Node)>(nodes: &[Node], f: &mut F) {
    for node in nodes {
        f(node);
        if let Some(children) = node.children() {
            visit_nodes(children, f);
        }
    }
}

/// Bottom-up rewrite: children are mapped before their parent, and each
/// node is replaced by whatever `f` returns (zero, one or many nodes).
pub fn map_nodes<F>(nodes: Vec<Node>, f: &mut F) -> Vec<Node>
where
    F: FnMut(Node) -> Vec<Node>,
{
    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        if let Some(children) = node.children_mut() {
            let taken = std::mem::take(children);
            *children = map_nodes(taken, f);
        }
        out.extend(f(node));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_is_bottom_up() {
        let nodes = vec![Node::paragraph(vec![
            Node::text("a"),
            Node::Inline(Inline::Strong(vec![Node::text("b")])),
        ])];

        let mut order = Vec::new();
        map_nodes(nodes, &mut |node| {
            order.push(match &node {
                Node::Text(s) => s.clone(),
                Node::Inline(_) => "strong".to_string(),
                Node::Block(_) => "paragraph".to_string(),
            });
            vec![node]
        });

        assert_eq!(order, vec!["a", "b", "strong", "paragraph"]);
    }

    #[test]
    fn test_map_can_splice_and_drop() {
        let nodes = vec![Node::text("x"), Node::Block(Block::Rule), Node::text("y")];
        let mapped = map_nodes(nodes, &mut |node| match node {
            Node::Block(Block::Rule) => vec![],
            Node::Text(s) => vec![Node::Text(s.clone()), Node::Text(s)],
            other => vec![other],
        });

        assert_eq!(
            mapped,
            vec![Node::text("x"), Node::text("x"), Node::text("y"), Node::text("y")]
        );
    }

    #[test]
    fn test_plain_text_and_visit() {
        let doc = Document::new(vec![Node::Block(Block::Callout {
            kind: CalloutKind::Hint,
            children: vec![Node::paragraph(vec![
                Node::text("Use "),
                Node::Inline(Inline::Math("a^2".to_string())),
            ])],
        })]);

        assert_eq!(doc.children[0].plain_text(), "Use a^2");

        let mut count = 0;
        doc.visit(|_| count += 1);
        assert_eq!(count, 4);
    }
}
