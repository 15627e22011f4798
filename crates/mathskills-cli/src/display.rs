use colored::*;
use mathskills_core::animation::{CelebrationKind, MountLedger};
use mathskills_core::markdown::tree::{AlertKind, Block, CalloutKind, Diagram, Document, Inline, Node};
use mathskills_core::progress::{ProgressRecord, PROGRESS_BLOCKS};
use mathskills_core::templates::get_template;

/// Draws a transformed reply for the terminal. Celebrations play once per
/// (message, ordinal) as recorded in the ledger.
pub struct TerminalView<'a> {
    message_id: &'a str,
    ledger: &'a mut MountLedger,
    celebration_count: usize,
}

impl<'a> TerminalView<'a> {
    pub fn new(message_id: &'a str, ledger: &'a mut MountLedger) -> Self {
        Self {
            message_id,
            ledger,
            celebration_count: 0,
        }
    }

    pub fn render(mut self, document: &Document) -> String {
        let mut out = String::new();
        for node in &document.children {
            self.block(node, 0, &mut out);
        }
        out.trim_end().to_string()
    }

    fn blocks(&mut self, nodes: &[Node], depth: usize) -> String {
        let mut out = String::new();
        for node in nodes {
            self.block(node, depth, &mut out);
        }
        out
    }

    fn block(&mut self, node: &Node, depth: usize, out: &mut String) {
        let Node::Block(block) = node else {
            out.push_str(&inlines(std::slice::from_ref(node)));
            return;
        };

        match block {
            Block::Paragraph(children) => {
                out.push_str(&inlines(children));
                out.push_str("\n\n");
            }
            Block::Heading { level, children } => {
                let text = inlines(children);
                let styled = if *level <= 2 {
                    text.bold().blue().to_string()
                } else {
                    text.bold().magenta().to_string()
                };
                out.push_str(&format!("{}\n\n", styled));
            }
            Block::BlockQuote(children) => {
                let body = self.blocks(children, depth);
                out.push_str(&bar(&body, &"│".dimmed().to_string()));
            }
            Block::List { start, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = match start {
                        Some(n) => format!("{}.", n + i as u64),
                        None => "•".to_string(),
                    };
                    let body = match item {
                        Node::Block(Block::ListItem(children)) => self.list_item(children, depth + 1),
                        other => inlines(std::slice::from_ref(other)),
                    };
                    out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), marker, body.trim_end()));
                }
                if depth == 0 {
                    out.push('\n');
                }
            }
            Block::ListItem(children) => {
                let body = self.list_item(children, depth + 1);
                out.push_str(&body);
            }
            Block::CodeBlock { lang, code } => {
                if let Some(lang) = lang {
                    out.push_str(&format!("{}\n", lang.dimmed()));
                }
                for line in code.lines() {
                    out.push_str(&format!("    {}\n", line.yellow()));
                }
                out.push('\n');
            }
            Block::Table { children, .. } => {
                for row in children {
                    let cells: Vec<String> = row
                        .children()
                        .map(|cells| {
                            cells
                                .iter()
                                .map(|c| inlines(c.children().map(Vec::as_slice).unwrap_or_default()))
                                .collect()
                        })
                        .unwrap_or_default();
                    let line = cells.join(" │ ");
                    if matches!(row, Node::Block(Block::TableHead(_))) {
                        out.push_str(&format!("{}\n", line.bold()));
                    } else {
                        out.push_str(&format!("{}\n", line));
                    }
                }
                out.push('\n');
            }
            Block::TableHead(_) | Block::TableRow(_) | Block::TableCell(_) => {}
            Block::Rule => out.push_str(&format!("{}\n\n", "─".repeat(40).dimmed())),
            Block::Html(html) => {
                out.push_str(html);
                out.push('\n');
            }
            Block::Directive { children, .. } => {
                let body = self.blocks(children, depth);
                out.push_str(&body);
            }
            Block::Callout { kind, children } => {
                let body = self.blocks(children, depth);
                let (label, edge) = callout_style(*kind);
                out.push_str(&format!("{} {}\n", edge, label.bold()));
                out.push_str(&bar(&body, &edge));
            }
            Block::Alert { kind, children } => {
                let body = self.blocks(children, depth);
                let (label, edge) = alert_style(*kind);
                out.push_str(&format!("{} {}\n", edge, label.bold()));
                out.push_str(&bar(&body, &edge));
            }
            Block::Celebration { trigger, children } => {
                let ordinal = self.celebration_count;
                self.celebration_count += 1;
                if trigger.autoplay && self.ledger.should_fire(self.message_id, ordinal) {
                    out.push_str(&format!("{}\n\n", celebration_banner(trigger.kind)));
                }
                let body = self.blocks(children, depth);
                out.push_str(&body);
            }
            Block::Diagram(diagram) => {
                out.push_str(&diagram_card(diagram));
                out.push_str("\n\n");
            }
            Block::GeneratedImage { src, alt } => {
                out.push_str(&format!("🖼  {}\n   {}\n\n", alt.italic(), src.dimmed()));
            }
        }
    }

    fn list_item(&mut self, children: &[Node], depth: usize) -> String {
        let mut out = String::new();
        for child in children {
            match child {
                Node::Block(Block::Paragraph(inner)) => {
                    out.push_str(&inlines(inner));
                    out.push(' ');
                }
                Node::Block(Block::List { .. }) => {
                    out.push('\n');
                    self.block(child, depth, &mut out);
                }
                Node::Block(_) => self.block(child, depth, &mut out),
                other => out.push_str(&inlines(std::slice::from_ref(other))),
            }
        }
        out
    }
}

fn bar(body: &str, edge: &str) -> String {
    let mut out = String::new();
    for line in body.trim_end().lines() {
        out.push_str(&format!("{} {}\n", edge, line));
    }
    out.push('\n');
    out
}

fn callout_style(kind: CalloutKind) -> (&'static str, String) {
    match kind {
        CalloutKind::Hint => ("💡 Hint", "┃".blue().to_string()),
        CalloutKind::Warning => ("⚠️  Warning", "┃".yellow().to_string()),
        CalloutKind::Example => ("📝 Example", "┃".green().to_string()),
        CalloutKind::Solution => ("✅ Solution", "┃".magenta().to_string()),
        CalloutKind::Steps => ("🪜 Steps", "┃".white().to_string()),
    }
}

fn alert_style(kind: AlertKind) -> (&'static str, String) {
    match kind {
        AlertKind::Note => ("ℹ️  Note", "┃".blue().to_string()),
        AlertKind::Tip => ("💡 Tip", "┃".green().to_string()),
        AlertKind::Important => ("❗ Important", "┃".magenta().to_string()),
        AlertKind::Warning => ("⚠️  Warning", "┃".yellow().to_string()),
        AlertKind::Caution => ("🛑 Caution", "┃".red().to_string()),
    }
}

pub fn celebration_banner(kind: CelebrationKind) -> String {
    let banner = match kind {
        CelebrationKind::Confetti => "🎉 🎊 🎉 🎊 🎉",
        CelebrationKind::Fireworks => "🎆 ✨ 🎇 ✨ 🎆",
        CelebrationKind::Particles => "✨ · ✨ · ✨",
        CelebrationKind::Slowmo => "🌟  .  .  .  🌟",
    };
    banner.bold().to_string()
}

fn diagram_card(diagram: &Diagram) -> String {
    match diagram {
        Diagram::JsxGraph { script } => format!(
            "{} {}",
            "📐 JSXGraph diagram".cyan(),
            format!("({} lines, export with --html to view)", script.lines().count()).dimmed()
        ),
        Diagram::GeoGebra { script } => format!(
            "{} {}",
            "📐 GeoGebra diagram".cyan(),
            format!("({} lines, export with --html to view)", script.lines().count()).dimmed()
        ),
        Diagram::GeoGebraEmbed { template_id } => match get_template(template_id) {
            Some(template) => format!(
                "{} {}",
                format!("📐 {}", template.name).cyan(),
                format!("({})", template.description).dimmed()
            ),
            None => format!("⚠️ GeoGebra template not found: {}", template_id.yellow()),
        },
    }
}

pub fn inlines(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Inline(inline) => out.push_str(&inline_text(inline)),
            Node::Block(_) => out.push_str(&node.plain_text()),
        }
    }
    out
}

fn inline_text(inline: &Inline) -> String {
    match inline {
        Inline::Emphasis(c) => inlines(c).italic().to_string(),
        Inline::Strong(c) => inlines(c).bold().to_string(),
        Inline::Strikethrough(c) => inlines(c).strikethrough().to_string(),
        Inline::Code(code) => code.yellow().to_string(),
        Inline::Math(tex) => format!("${}$", tex).magenta().to_string(),
        Inline::DisplayMath(tex) => format!("$${}$$", tex).magenta().to_string(),
        Inline::Link { url, children, .. } => {
            let text = inlines(children);
            if text == *url {
                url.underline().to_string()
            } else {
                format!("{} ({})", text.underline(), url.dimmed())
            }
        }
        Inline::Image { alt, url, .. } => format!("[image: {}] {}", alt, url.dimmed()),
        Inline::Html(html) => html.clone(),
        Inline::SoftBreak | Inline::HardBreak => "\n".to_string(),
        Inline::Emoji(emoji) => emoji.clone(),
        Inline::TaskMarker(true) => "[x] ".to_string(),
        Inline::TaskMarker(false) => "[ ] ".to_string(),
    }
}

pub fn progress_bar(record: &ProgressRecord) -> String {
    let filled = record.filled_blocks().min(PROGRESS_BLOCKS) as usize;
    let empty = PROGRESS_BLOCKS as usize - filled;
    format!(
        "📊 Question {} of {}\n{}{} {}%\n{} | {}",
        record.current,
        record.total,
        "█".repeat(filled).green(),
        "░".repeat(empty).dimmed(),
        record.percentage(),
        format!("✓ {} correct", record.correct).green(),
        format!("✗ {} incorrect", record.incorrect).red()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathskills_core::markdown::MarkdownPipeline;

    fn view(source: &str, message_id: &str, ledger: &mut MountLedger) -> String {
        colored::control::set_override(false);
        let doc = MarkdownPipeline::default().prepare(source);
        TerminalView::new(message_id, ledger).render(&doc)
    }

    #[test]
    fn test_celebration_plays_once_per_message() {
        let mut ledger = MountLedger::new();
        let source = ":::celebrate-confetti\nCorrect! $c = 13$\n:::";

        let first = view(source, "m1", &mut ledger);
        assert!(first.starts_with("🎉 🎊 🎉 🎊 🎉"));
        assert!(first.ends_with("Correct! $c = 13$"));

        let again = view(source, "m1", &mut ledger);
        assert_eq!(again, "Correct! $c = 13$");

        let other = view(source, "m2", &mut ledger);
        assert!(other.starts_with("🎉"));
    }

    #[test]
    fn test_callout_and_missing_template() {
        let mut ledger = MountLedger::new();
        let out = view(":::hint\nUse a calculator\n:::\n\n```geogebra-embed\nnope\n```", "m", &mut ledger);
        assert!(out.contains("┃ 💡 Hint\n┃ Use a calculator"));
        assert!(out.contains("⚠️ GeoGebra template not found: nope"));
    }

    #[test]
    fn test_lists() {
        let mut ledger = MountLedger::new();
        let out = view("1. First step\n2. Second step", "m", &mut ledger);
        assert_eq!(out, "1. First step\n2. Second step");
    }

    #[test]
    fn test_progress_bar_text() {
        colored::control::set_override(false);
        let record = ProgressRecord {
            current: 3,
            total: 14,
            correct: 2,
            incorrect: 1,
        };
        assert_eq!(
            progress_bar(&record),
            "📊 Question 3 of 14\n████░░░░░░░░░░░░░░░░ 21%\n✓ 2 correct | ✗ 1 incorrect"
        );
    }
}
