//! HTML output for transformed documents.
//!
//! Custom elements (celebrations, geometry boards, template embeds) are
//! looked up by tag name in a [`ComponentRegistry`]; everything else is plain
//! HTML. Math is emitted as escaped TeX inside KaTeX-style class markup for
//! the browser to typeset.

use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

use super::tree::{Align, Block, Diagram, Document, Inline, Node};
use crate::templates::get_template;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

pub const CELEBRATION_TAG: &str = "celebration-animation";
pub const JSXGRAPH_TAG: &str = "JSXGraphBoard";
pub const GEOGEBRA_TAG: &str = "GeoGebraBoard";
pub const GEOGEBRA_EMBED_TAG: &str = "GeoGebraEmbed";

const IMAGE_CLASSES: &str = "pollinations-image rounded-lg my-4 mx-auto max-w-full";

pub type Props = BTreeMap<String, String>;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A custom element. `children` is already-rendered HTML.
pub trait Component: Send + Sync {
    fn render(&self, props: &Props, children: &str) -> String;
}

fn data_attrs(props: &Props) -> String {
    props
        .iter()
        .map(|(k, v)| format!(" data-{}=\"{}\"", kebab(k), escape_html(v)))
        .collect()
}

fn kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

struct CelebrationAnimation;

impl Component for CelebrationAnimation {
    fn render(&self, props: &Props, _children: &str) -> String {
        format!("<div class=\"celebration-animation\" aria-hidden=\"true\"{}></div>", data_attrs(props))
    }
}

struct GeometryBoard {
    class: &'static str,
    width: u32,
    height: u32,
}

impl Component for GeometryBoard {
    fn render(&self, props: &Props, _children: &str) -> String {
        let mut props = props.clone();
        props.entry("width".to_string()).or_insert_with(|| self.width.to_string());
        props.entry("height".to_string()).or_insert_with(|| self.height.to_string());
        format!("<div class=\"{}\"{}></div>", self.class, data_attrs(&props))
    }
}

/// Resolves `templateId` against the built-in catalog.
struct GeoGebraEmbed;

impl Component for GeoGebraEmbed {
    fn render(&self, props: &Props, _children: &str) -> String {
        let id = props.get("templateId").map(String::as_str).unwrap_or_default();
        let Some(template) = get_template(id) else {
            debug!(template_id = id, "Unknown GeoGebra template");
            return format!(
                "<div class=\"geogebra-embed-missing\">⚠️ GeoGebra template not found: <code>{}</code></div>",
                escape_html(id)
            );
        };

        let mut attrs = Props::new();
        attrs.insert("templateId".to_string(), template.id.to_string());
        attrs.insert("code".to_string(), template.script.to_string());
        attrs.insert("width".to_string(), template.width.to_string());
        attrs.insert("height".to_string(), template.height.to_string());
        format!(
            "<figure class=\"geogebra-embed\"{}><figcaption>{}</figcaption></figure>",
            data_attrs(&attrs),
            escape_html(template.name)
        )
    }
}

#[derive(Clone)]
pub struct ComponentRegistry {
    components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentRegistry {
    pub fn empty() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(CELEBRATION_TAG, CelebrationAnimation);
        registry.register(
            JSXGRAPH_TAG,
            GeometryBoard {
                class: "jsxgraph-board",
                width: 500,
                height: 400,
            },
        );
        registry.register(
            GEOGEBRA_TAG,
            GeometryBoard {
                class: "geogebra-board",
                width: 600,
                height: 400,
            },
        );
        registry.register(GEOGEBRA_EMBED_TAG, GeoGebraEmbed);
        registry
    }

    pub fn register<C: Component + 'static>(&mut self, tag: &str, component: C) {
        self.components.insert(tag.to_string(), Arc::new(component));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Unregistered tags render as a neutral placeholder around `children`.
    pub fn render(&self, tag: &str, props: &Props, children: &str) -> String {
        match self.components.get(tag) {
            Some(component) => component.render(props, children),
            None => format!(
                "<div data-component=\"{}\"{}>{}</div>",
                escape_html(tag),
                data_attrs(props),
                children
            ),
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Inline-styled syntax highlighting for fenced code.
pub struct CodeHighlighter {
    theme: &'static Theme,
}

impl CodeHighlighter {
    pub fn new(theme_name: &str) -> Option<Self> {
        THEME_SET.themes.get(theme_name).map(|theme| Self { theme })
    }

    /// Highlighted lines, or `None` for unknown languages and highlighter
    /// failures.
    pub fn highlight(&self, lang: &str, code: &str) -> Option<String> {
        let syntax = SYNTAX_SET.find_syntax_by_token(lang)?;
        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let mut html = String::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &SYNTAX_SET).ok()?;
            html.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
        }
        Some(html)
    }
}

pub struct HtmlRenderer {
    registry: ComponentRegistry,
    highlighter: Option<CodeHighlighter>,
}

impl HtmlRenderer {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            highlighter: CodeHighlighter::new("InspiredGitHub"),
        }
    }

    pub fn with_theme(mut self, theme_name: &str) -> Self {
        self.highlighter = CodeHighlighter::new(theme_name);
        self
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn render(&self, document: &Document) -> String {
        let mut out = String::new();
        self.render_nodes(&document.children, &mut out);
        out
    }

    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            self.render_node(node, out);
        }
    }

    fn render_children(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        self.render_nodes(nodes, &mut out);
        out
    }

    fn wrap(&self, tag: &str, attrs: &str, children: &[Node], out: &mut String) {
        out.push_str(&format!("<{tag}{attrs}>"));
        self.render_nodes(children, out);
        out.push_str(&format!("</{tag}>"));
    }

    fn render_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Inline(inline) => self.render_inline(inline, out),
            Node::Block(block) => self.render_block(block, out),
        }
    }

    fn render_inline(&self, inline: &Inline, out: &mut String) {
        match inline {
            Inline::Emphasis(c) => self.wrap("em", "", c, out),
            Inline::Strong(c) => self.wrap("strong", "", c, out),
            Inline::Strikethrough(c) => self.wrap("del", "", c, out),
            Inline::Code(code) => out.push_str(&format!("<code>{}</code>", escape_html(code))),
            Inline::Math(tex) => {
                out.push_str(&format!("<span class=\"math math-inline\">{}</span>", escape_html(tex)))
            }
            Inline::DisplayMath(tex) => {
                out.push_str(&format!("<span class=\"math math-display\">{}</span>", escape_html(tex)))
            }
            Inline::Link {
                url,
                title,
                children,
            } => {
                let mut attrs = format!(" href=\"{}\"", escape_html(url));
                if !title.is_empty() {
                    attrs.push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                self.wrap("a", &attrs, children, out);
            }
            Inline::Image { url, title, alt } => {
                out.push_str(&format!("<img src=\"{}\" alt=\"{}\"", escape_html(url), escape_html(alt)));
                if !title.is_empty() {
                    out.push_str(&format!(" title=\"{}\"", escape_html(title)));
                }
                out.push_str(" />");
            }
            Inline::Html(html) => out.push_str(html),
            Inline::SoftBreak => out.push('\n'),
            Inline::HardBreak => out.push_str("<br />\n"),
            Inline::Emoji(emoji) => {
                out.push_str(&format!("<span class=\"emoji\">{}</span>", escape_html(emoji)))
            }
            Inline::TaskMarker(checked) => out.push_str(if *checked {
                "<input type=\"checkbox\" disabled checked /> "
            } else {
                "<input type=\"checkbox\" disabled /> "
            }),
        }
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Paragraph(c) => self.wrap("p", "", c, out),
            Block::Heading { level, children } => self.wrap(&format!("h{level}"), "", children, out),
            Block::BlockQuote(c) => self.wrap("blockquote", "", c, out),
            Block::List { start, items } => match start {
                Some(1) => self.wrap("ol", "", items, out),
                Some(n) => self.wrap("ol", &format!(" start=\"{n}\""), items, out),
                None => self.wrap("ul", "", items, out),
            },
            Block::ListItem(c) => self.wrap("li", "", c, out),
            Block::CodeBlock { lang, code } => self.render_code(lang.as_deref(), code, out),
            Block::Table {
                alignments,
                children,
            } => self.render_table(alignments, children, out),
            Block::TableHead(_) | Block::TableRow(_) | Block::TableCell(_) => {
                // only reachable through render_table
                self.render_nodes(node_children(block), out);
            }
            Block::Rule => out.push_str("<hr />"),
            Block::Html(html) => out.push_str(html),
            Block::Directive { name, children } => {
                self.wrap("div", &format!(" data-directive=\"{}\"", escape_html(name)), children, out)
            }
            Block::Callout { kind, children } => self.wrap(
                "div",
                &format!(" class=\"{}\" data-callout=\"{}\"", kind.classes(), kind.as_str()),
                children,
                out,
            ),
            Block::Alert { kind, children } => {
                out.push_str(&format!(
                    "<div class=\"markdown-alert markdown-alert-{}\"><p class=\"markdown-alert-title\">{}</p>",
                    kind.as_str(),
                    kind.title()
                ));
                self.render_nodes(children, out);
                out.push_str("</div>");
            }
            Block::Celebration { trigger, children } => {
                let mut props = Props::new();
                props.insert("type".to_string(), trigger.kind.as_str().to_string());
                props.insert("autoplay".to_string(), trigger.autoplay.to_string());
                if let Ok(burst) = serde_json::to_string(&trigger.kind.burst()) {
                    props.insert("burst".to_string(), burst);
                }
                out.push_str("<div class=\"celebration-wrapper\">");
                out.push_str(&self.registry.render(CELEBRATION_TAG, &props, ""));
                self.wrap("div", " class=\"celebration-content\"", children, out);
                out.push_str("</div>");
            }
            Block::Diagram(diagram) => {
                let (tag, key, value) = match diagram {
                    Diagram::JsxGraph { script } => (JSXGRAPH_TAG, "code", script),
                    Diagram::GeoGebra { script } => (GEOGEBRA_TAG, "code", script),
                    Diagram::GeoGebraEmbed { template_id } => {
                        (GEOGEBRA_EMBED_TAG, "templateId", template_id)
                    }
                };
                let mut props = Props::new();
                props.insert(key.to_string(), value.clone());
                out.push_str(&self.registry.render(tag, &props, ""));
            }
            Block::GeneratedImage { src, alt } => out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" class=\"{}\" loading=\"lazy\" />",
                escape_html(src),
                escape_html(alt),
                IMAGE_CLASSES
            )),
        }
    }

    fn render_code(&self, lang: Option<&str>, code: &str, out: &mut String) {
        let highlighted = match (lang, &self.highlighter) {
            (Some(lang), Some(highlighter)) => highlighter.highlight(lang, code),
            _ => None,
        };
        let body = highlighted.unwrap_or_else(|| escape_html(code));
        match lang {
            Some(lang) => out.push_str(&format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(lang),
                body
            )),
            None => out.push_str(&format!("<pre><code>{}</code></pre>", body)),
        }
    }

    fn render_table(&self, alignments: &[Align], children: &[Node], out: &mut String) {
        out.push_str("<table>");
        let mut body_open = false;
        for child in children {
            match child {
                Node::Block(Block::TableHead(cells)) => {
                    out.push_str("<thead><tr>");
                    self.render_cells("th", alignments, cells, out);
                    out.push_str("</tr></thead>");
                }
                Node::Block(Block::TableRow(cells)) => {
                    if !body_open {
                        out.push_str("<tbody>");
                        body_open = true;
                    }
                    out.push_str("<tr>");
                    self.render_cells("td", alignments, cells, out);
                    out.push_str("</tr>");
                }
                other => self.render_node(other, out),
            }
        }
        if body_open {
            out.push_str("</tbody>");
        }
        out.push_str("</table>");
    }

    fn render_cells(&self, tag: &str, alignments: &[Align], cells: &[Node], out: &mut String) {
        for (i, cell) in cells.iter().enumerate() {
            let style = match alignments.get(i) {
                Some(Align::Left) => " style=\"text-align: left\"",
                Some(Align::Center) => " style=\"text-align: center\"",
                Some(Align::Right) => " style=\"text-align: right\"",
                _ => "",
            };
            let inner = match cell {
                Node::Block(Block::TableCell(c)) => self.render_children(c),
                other => self.render_children(std::slice::from_ref(other)),
            };
            out.push_str(&format!("<{tag}{style}>{inner}</{tag}>"));
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(ComponentRegistry::standard())
    }
}

fn node_children(block: &Block) -> &[Node] {
    match block {
        Block::TableHead(c) | Block::TableRow(c) | Block::TableCell(c) => c,
        _ => &[],
    }
}
