use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::Transform;
use crate::config::DEFAULT_REFERRER;
use crate::markdown::tree::{Block, Node};

pub const IMAGE_PROMPT_LANG: &str = "pollinations";

pub const IMAGE_STYLE: &str = "minimal geometric abstract interpretation, black and white manga comic ink style, solid blacks, clean linework, expressive and conceptual";

const IMAGE_ENDPOINT: &str = "https://image.pollinations.ai/prompt/";

/// Everything `encodeURIComponent` escapes: all but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generated-image URL for an already trimmed prompt.
pub fn pollinations_image_url(prompt: &str) -> String {
    let styled = format!("{}, {}", prompt, IMAGE_STYLE);
    format!(
        "{}{}?model=gptimage-mini&width=600&height=400&quality=high&nologo=true&referrer={}",
        IMAGE_ENDPOINT,
        utf8_percent_encode(&styled, URI_COMPONENT),
        DEFAULT_REFERRER
    )
}

/// ```` ```pollinations ```` fences become generated illustrations.
pub struct ImagePromptTransform;

impl Transform for ImagePromptTransform {
    fn name(&self) -> &'static str {
        "image-prompt"
    }

    fn apply(&self, node: Node) -> Vec<Node> {
        match node {
            Node::Block(Block::CodeBlock { lang, code })
                if lang.as_deref() == Some(IMAGE_PROMPT_LANG) && !code.trim().is_empty() =>
            {
                let prompt = code.trim();
                vec![Node::Block(Block::GeneratedImage {
                    src: pollinations_image_url(prompt),
                    alt: prompt.to_string(),
                })]
            }
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence(code: &str) -> Node {
        Node::Block(Block::CodeBlock {
            lang: Some("pollinations".to_string()),
            code: code.to_string(),
        })
    }

    #[test]
    fn test_url_encoding_matches_uri_component() {
        let url = pollinations_image_url("a ladder & a wall: 3-4-5 (right) 'triangle'?");
        assert!(url.starts_with(
            "https://image.pollinations.ai/prompt/a%20ladder%20%26%20a%20wall%3A%203-4-5%20(right)%20'triangle'%3F%2C%20minimal%20geometric"
        ));
        assert!(url.ends_with(
            "?model=gptimage-mini&width=600&height=400&quality=high&nologo=true&referrer=pppp"
        ));
    }

    #[test]
    fn test_non_ascii_is_utf8_encoded() {
        let url = pollinations_image_url("π");
        assert!(url.contains("/prompt/%CF%80%2C%20"));
    }

    #[test]
    fn test_prompt_becomes_image() {
        let out = ImagePromptTransform.apply(fence("\n  a right triangle  \n"));
        let [Node::Block(Block::GeneratedImage { src, alt })] = out.as_slice() else {
            panic!("expected generated image, got {out:?}");
        };
        assert_eq!(alt, "a right triangle");
        assert_eq!(src, &pollinations_image_url("a right triangle"));
    }

    #[test]
    fn test_whitespace_only_prompt_is_left_alone() {
        assert_eq!(ImagePromptTransform.apply(fence("  \n\t")), vec![fence("  \n\t")]);
    }
}
