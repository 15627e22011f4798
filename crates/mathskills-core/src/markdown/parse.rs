//! Markdown to [`Document`].
//!
//! `:::name` containers are split out with a line scanner first; everything
//! between them goes through pulldown-cmark.

use lazy_static::lazy_static;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;

use super::tree::{Align, Block, Document, Inline, Node};

lazy_static! {
    static ref DIRECTIVE_OPEN: Regex = Regex::new(
        r"^ {0,3}:{3,}[ \t]*([A-Za-z][\w-]*)[ \t]*(?:\[[^\]\n]*\])?[ \t]*(?:\{[^}\n]*\})?[ \t]*\r?\n?$"
    )
    .expect("directive open pattern");
    static ref DIRECTIVE_CLOSE: Regex =
        Regex::new(r"^ {0,3}:{3,}[ \t]*\r?\n?$").expect("directive close pattern");
}

pub fn parse_markdown(input: &str) -> Document {
    let segments = split_directives(input);
    Document::new(segments_to_nodes(segments))
}

#[derive(Debug, PartialEq)]
enum Segment {
    Markdown(String),
    Directive { name: String, body: Vec<Segment> },
}

struct Container {
    name: String,
    segments: Vec<Segment>,
    pending: String,
}

impl Container {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            segments: Vec::new(),
            pending: String::new(),
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.segments
                .push(Segment::Markdown(std::mem::take(&mut self.pending)));
        }
    }

    fn finish(mut self) -> (String, Vec<Segment>) {
        self.flush();
        (self.name, self.segments)
    }
}

/// Containers nest, close on a line of bare colons, and run to the end of
/// the input when never closed. Fenced code is opaque.
///
/// Only raw lines are scanned, so a `:::` line inside a blockquote
/// (`> :::hint`) stays ordinary Markdown. Lines indented up to three spaces
/// still open a top-level container.
fn split_directives(input: &str) -> Vec<Segment> {
    let mut stack = vec![Container::new("")];
    let mut fence: Option<Fence> = None;

    for line in input.split_inclusive('\n') {
        let depth = stack.len();
        let Some(top) = stack.last_mut() else {
            break;
        };

        if let Some(open) = fence {
            top.pending.push_str(line);
            if open.is_closed_by(line) {
                fence = None;
            }
            continue;
        }

        if let Some(open) = Fence::opening(line) {
            fence = Some(open);
            top.pending.push_str(line);
            continue;
        }

        if let Some(caps) = DIRECTIVE_OPEN.captures(line) {
            top.flush();
            stack.push(Container::new(&caps[1]));
            continue;
        }

        if depth > 1 && DIRECTIVE_CLOSE.is_match(line) {
            close_innermost(&mut stack);
            continue;
        }

        top.pending.push_str(line);
    }

    while stack.len() > 1 {
        close_innermost(&mut stack);
    }
    stack
        .pop()
        .map(|root| root.finish().1)
        .unwrap_or_default()
}

fn close_innermost(stack: &mut Vec<Container>) {
    if let Some(container) = stack.pop() {
        let (name, body) = container.finish();
        if let Some(parent) = stack.last_mut() {
            parent.flush();
            parent.segments.push(Segment::Directive { name, body });
        }
    }
}

/// An open ``` or ~~~ fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: u8,
    width: usize,
}

impl Fence {
    fn opening(line: &str) -> Option<Fence> {
        let trimmed = strip_indent(line)?;
        let marker = *trimmed.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let width = trimmed.bytes().take_while(|&b| b == marker).count();
        if width < 3 {
            return None;
        }
        // backtick info strings may not contain backticks
        if marker == b'`' && trimmed[width..].contains('`') {
            return None;
        }
        Some(Fence { marker, width })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(trimmed) = strip_indent(line) else {
            return false;
        };
        let width = trimmed.bytes().take_while(|&b| b == self.marker).count();
        width >= self.width && trimmed[width..].trim().is_empty()
    }
}

/// Up to three leading spaces; four or more is an indented code line.
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    if indent > 3 {
        return None;
    }
    Some(&line[indent..])
}

fn segments_to_nodes(segments: Vec<Segment>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for segment in segments {
        match segment {
            Segment::Markdown(text) => nodes.extend(parse_commonmark(&text)),
            Segment::Directive { name, body } => nodes.push(Node::Block(Block::Directive {
                name,
                children: segments_to_nodes(body),
            })),
        }
    }
    nodes
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);
    options
}

enum Frame {
    Paragraph,
    Heading(u8),
    BlockQuote,
    List(Option<u64>),
    Item,
    CodeBlock(Option<String>),
    HtmlBlock,
    Table(Vec<Align>),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Containers without a tree counterpart; children are spliced upward
    Transparent,
}

fn frame_for(tag: Tag<'_>) -> Frame {
    match tag {
        Tag::Paragraph => Frame::Paragraph,
        Tag::Heading { level, .. } => Frame::Heading(level as u8),
        Tag::BlockQuote(_) => Frame::BlockQuote,
        Tag::List(start) => Frame::List(start),
        Tag::Item => Frame::Item,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Frame::CodeBlock(
            info.split_whitespace()
                .next()
                .map(|lang| lang.to_string()),
        ),
        Tag::CodeBlock(CodeBlockKind::Indented) => Frame::CodeBlock(None),
        Tag::HtmlBlock => Frame::HtmlBlock,
        Tag::Table(alignments) => Frame::Table(alignments.iter().map(align).collect()),
        Tag::TableHead => Frame::TableHead,
        Tag::TableRow => Frame::TableRow,
        Tag::TableCell => Frame::TableCell,
        Tag::Emphasis => Frame::Emphasis,
        Tag::Strong => Frame::Strong,
        Tag::Strikethrough => Frame::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => Frame::Link {
            url: dest_url.to_string(),
            title: title.to_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => Frame::Image {
            url: dest_url.to_string(),
            title: title.to_string(),
        },
        _ => Frame::Transparent,
    }
}

fn align(alignment: &Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

fn joined_text(children: &[Node]) -> String {
    children.iter().map(Node::plain_text).collect()
}

fn close_frame(frame: Frame, children: Vec<Node>) -> Vec<Node> {
    let node = match frame {
        Frame::Paragraph => Node::Block(Block::Paragraph(children)),
        Frame::Heading(level) => Node::Block(Block::Heading { level, children }),
        Frame::BlockQuote => Node::Block(Block::BlockQuote(children)),
        Frame::List(start) => Node::Block(Block::List {
            start,
            items: children,
        }),
        Frame::Item => Node::Block(Block::ListItem(children)),
        Frame::CodeBlock(lang) => {
            let mut code = joined_text(&children);
            if code.ends_with('\n') {
                code.pop();
            }
            Node::Block(Block::CodeBlock { lang, code })
        }
        Frame::HtmlBlock => Node::Block(Block::Html(joined_text(&children))),
        Frame::Table(alignments) => Node::Block(Block::Table {
            alignments,
            children,
        }),
        Frame::TableHead => Node::Block(Block::TableHead(children)),
        Frame::TableRow => Node::Block(Block::TableRow(children)),
        Frame::TableCell => Node::Block(Block::TableCell(children)),
        Frame::Emphasis => Node::Inline(Inline::Emphasis(children)),
        Frame::Strong => Node::Inline(Inline::Strong(children)),
        Frame::Strikethrough => Node::Inline(Inline::Strikethrough(children)),
        Frame::Link { url, title } => Node::Inline(Inline::Link {
            url,
            title,
            children,
        }),
        Frame::Image { url, title } => Node::Inline(Inline::Image {
            url,
            title,
            alt: joined_text(&children),
        }),
        Frame::Transparent => return children,
    };
    vec![node]
}

/// Appends `node`, merging runs of text that pulldown-cmark emits in pieces.
fn push_node(children: &mut Vec<Node>, node: Node) {
    if let Node::Text(next) = &node {
        if let Some(Node::Text(prev)) = children.last_mut() {
            prev.push_str(next);
            return;
        }
    }
    children.push(node);
}

fn parse_commonmark(text: &str) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<(Frame, Vec<Node>)> = Vec::new();

    for event in Parser::new_ext(text, options()) {
        let node = match event {
            Event::Start(tag) => {
                stack.push((frame_for(tag), Vec::new()));
                continue;
            }
            Event::End(_) => {
                let Some((frame, children)) = stack.pop() else {
                    continue;
                };
                let target = match stack.last_mut() {
                    Some((_, parent)) => parent,
                    None => &mut root,
                };
                for node in close_frame(frame, children) {
                    push_node(target, node);
                }
                continue;
            }
            Event::Text(s) => Node::Text(s.to_string()),
            Event::Code(s) => Node::Inline(Inline::Code(s.to_string())),
            Event::InlineMath(s) => Node::Inline(Inline::Math(s.to_string())),
            Event::DisplayMath(s) => Node::Inline(Inline::DisplayMath(s.to_string())),
            Event::Html(s) => Node::Text(s.to_string()),
            Event::InlineHtml(s) => Node::Inline(Inline::Html(s.to_string())),
            Event::SoftBreak => Node::Inline(Inline::SoftBreak),
            Event::HardBreak => Node::Inline(Inline::HardBreak),
            Event::Rule => Node::Block(Block::Rule),
            Event::TaskListMarker(checked) => Node::Inline(Inline::TaskMarker(checked)),
            Event::FootnoteReference(label) => Node::Text(format!("[^{}]", label)),
        };

        let target = match stack.last_mut() {
            Some((_, children)) => children,
            None => &mut root,
        };
        push_node(target, node);
    }

    root
}
