//! Tutor reply rendering: normalize math delimiters, strip progress tags,
//! parse, run the transform chain, render.

pub mod normalize;
pub mod parse;
pub mod render;
pub mod transform;
pub mod tree;

pub use normalize::normalize_math_delimiters;
pub use parse::parse_markdown;
pub use render::{escape_html, Component, ComponentRegistry, HtmlRenderer, Props};
pub use transform::{Transform, TransformChain};
pub use tree::{Block, Document, Inline, Node};

use crate::animation::AnimationTrigger;
use crate::progress::{strip_progress_tags, ProgressRecord, PROGRESS_BLOCKS};
use crate::state::{ChatMessage, ChatRole};
use crate::storage::Theme;

pub struct MarkdownPipeline {
    chain: TransformChain,
    renderer: HtmlRenderer,
}

impl MarkdownPipeline {
    pub fn new(chain: TransformChain, renderer: HtmlRenderer) -> Self {
        Self { chain, renderer }
    }

    /// Transformed tree for `source`.
    pub fn prepare(&self, source: &str) -> Document {
        let normalized = normalize_math_delimiters(source);
        let visible = strip_progress_tags(&normalized);
        self.chain.run(parse_markdown(&visible))
    }

    pub fn render(&self, source: &str) -> String {
        self.renderer.render(&self.prepare(source))
    }

    pub fn renderer(&self) -> &HtmlRenderer {
        &self.renderer
    }

    /// Standalone page for a whole conversation. System messages are left
    /// out.
    pub fn render_transcript(
        &self,
        messages: &[ChatMessage],
        progress: Option<&ProgressRecord>,
        theme: Theme,
    ) -> String {
        let mut body = String::new();

        if let Some(record) = progress {
            body.push_str(&progress_header(record));
        }

        for message in messages.iter().filter(|m| m.role != ChatRole::System) {
            let content = match message.role {
                ChatRole::User => format!("<p>{}</p>", escape_html(&message.text())),
                _ => self.render(&message.text()),
            };
            body.push_str(&format!(
                "<article class=\"message message-{}\" data-message-id=\"{}\">{}</article>\n",
                message.role.as_str(),
                escape_html(&message.id),
                content
            ));
        }

        let root_class = match theme {
            Theme::Dark => " class=\"dark\"",
            Theme::Light => "",
        };
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\"{root_class}>\n<head>\n<meta charset=\"utf-8\" />\n<title>MathsSkills conversation</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
        )
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new(TransformChain::standard(), HtmlRenderer::default())
    }
}

/// Celebrations in document order, used to key one-shot playback.
pub fn celebrations(document: &Document) -> Vec<AnimationTrigger> {
    let mut found = Vec::new();
    document.visit(|node| {
        if let Node::Block(Block::Celebration { trigger, .. }) = node {
            found.push(*trigger);
        }
    });
    found
}

fn progress_header(record: &ProgressRecord) -> String {
    let filled = record.filled_blocks().min(PROGRESS_BLOCKS) as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BLOCKS as usize - filled)
    );
    format!(
        "<header class=\"diagnostic-progress\" data-current=\"{}\" data-total=\"{}\"><p>Question {} of {}</p><p class=\"progress-bar\">{} {}%</p><p>✓ {} correct | ✗ {} incorrect</p></header>\n",
        record.current,
        record.total,
        record.current,
        record.total,
        bar,
        record.percentage(),
        record.correct,
        record.incorrect
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::CelebrationKind;
    use crate::markdown::tree::{CalloutKind, Diagram};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pythagoras_walkthrough() {
        let source = "\
## Pythagoras 📐

:::hint
Remember \\( a^2 + b^2 = c^2 \\)
:::

```geogebra-embed
pythagoras
```

:::celebrate-confetti
Correct! 🎉
:::
";
        let doc = MarkdownPipeline::default().prepare(source);

        assert_eq!(doc.children.len(), 4);
        assert_eq!(
            doc.children[0],
            Node::Block(Block::Heading {
                level: 2,
                children: vec![
                    Node::text("Pythagoras "),
                    Node::Inline(Inline::Emoji("📐".to_string())),
                ],
            })
        );
        assert_eq!(
            doc.children[1],
            Node::Block(Block::Callout {
                kind: CalloutKind::Hint,
                children: vec![Node::paragraph(vec![
                    Node::text("Remember "),
                    Node::Inline(Inline::Math("a^2 + b^2 = c^2".to_string())),
                ])],
            })
        );
        assert_eq!(
            doc.children[2],
            Node::Block(Block::Diagram(Diagram::GeoGebraEmbed {
                template_id: "pythagoras".to_string()
            }))
        );
        assert_eq!(
            doc.children[3],
            Node::Block(Block::Celebration {
                trigger: AnimationTrigger::autoplay(CelebrationKind::Confetti),
                children: vec![Node::paragraph(vec![
                    Node::text("Correct! "),
                    Node::Inline(Inline::Emoji("🎉".to_string())),
                ])],
            })
        );
        assert_eq!(celebrations(&doc).len(), 1);
    }

    #[test]
    fn test_display_math_then_confetti_renders_clean() {
        let html = MarkdownPipeline::default().render(
            "Here's Pythagoras: $$a^2+b^2=c^2$$\n\n:::celebrate-confetti\n✅ Correct!\n:::",
        );

        assert!(html.contains("<span class=\"math math-display\">a^2+b^2=c^2</span>"));
        let trigger = html.find("data-type=\"confetti\"").unwrap();
        let content = html.find("<p><span class=\"emoji\">✅</span> Correct!</p>").unwrap();
        assert!(trigger < content);
        assert!(!html.contains(":::"));
    }

    #[test]
    fn test_fireworks_cue() {
        let pipeline = MarkdownPipeline::default();
        let source = ":::celebrate-fireworks\n✅ Perfect!\n:::";

        assert_eq!(
            pipeline.prepare(source).children,
            vec![Node::Block(Block::Celebration {
                trigger: AnimationTrigger::autoplay(CelebrationKind::Fireworks),
                children: vec![Node::paragraph(vec![
                    Node::Inline(Inline::Emoji("✅".to_string())),
                    Node::text(" Perfect!"),
                ])],
            })]
        );
        let html = pipeline.render(source);
        assert!(html.contains("data-type=\"fireworks\""));
        assert!(!html.contains(":::"));
    }

    #[test]
    fn test_progress_tag_never_rendered() {
        let html = MarkdownPipeline::default().render(
            "Nice! ✅\n\n<progress><current>3</current><total>14</total><correct>3</correct><incorrect>0</incorrect></progress>\n\n**Q4:** Simplify",
        );
        assert!(!html.contains("progress"));
        assert!(!html.contains("<current>"));
        assert!(html.contains("<strong>Q4:</strong>"));
    }

    #[test]
    fn test_unknown_directive_keeps_content() {
        let html = MarkdownPipeline::default().render(":::aside\nkept\n:::");
        assert_eq!(html, "<div data-directive=\"aside\"><p>kept</p></div>");
    }

    #[test]
    fn test_pollinations_whitespace_prompt_stays_code() {
        let doc = MarkdownPipeline::default().prepare("```pollinations\n   \n```");
        assert_eq!(
            doc.children,
            vec![Node::Block(Block::CodeBlock {
                lang: Some("pollinations".to_string()),
                code: "   ".to_string(),
            })]
        );
    }

    #[test]
    fn test_alert_rendering() {
        let html = MarkdownPipeline::default().render("> [!IMPORTANT]\n> Key concept!");
        assert_eq!(
            html,
            "<div class=\"markdown-alert markdown-alert-important\"><p class=\"markdown-alert-title\">Important</p><p>Key concept!</p></div>"
        );
    }

    #[test]
    fn test_transcript_page() {
        let messages = vec![
            ChatMessage::system("hidden"),
            ChatMessage::user("<b>hi</b>"),
            ChatMessage::assistant("Hello 👋"),
        ];
        let record = ProgressRecord {
            current: 7,
            total: 14,
            correct: 5,
            incorrect: 2,
        };

        let page = MarkdownPipeline::default().render_transcript(&messages, Some(&record), Theme::Dark);
        assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"en\" class=\"dark\">"));
        assert!(!page.contains("hidden"));
        assert!(page.contains("<p>&lt;b&gt;hi&lt;/b&gt;</p>"));
        assert!(page.contains("<span class=\"emoji\">👋</span>"));
        assert!(page.contains("██████████░░░░░░░░░░ 50%"));
        assert!(page.contains("✓ 5 correct | ✗ 2 incorrect"));
    }
}
