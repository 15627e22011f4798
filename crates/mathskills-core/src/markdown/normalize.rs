//! Rewrites LaTeX bracket delimiters into dollar delimiters.
//!
//! `\( x \)` becomes `$x$` and `\[ x \]` becomes `$$x$$`. Fenced code blocks
//! and inline code spans pass through untouched.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::{Captures, Regex};
use std::ops::Range;

lazy_static! {
    static ref INLINE_MATH: Regex = Regex::new(r"\\\(([\s\S]*?)\\\)").expect("inline math pattern");
    static ref DISPLAY_MATH: Regex = Regex::new(r"\\\[([\s\S]*?)\\\]").expect("display math pattern");
}

pub fn normalize_math_delimiters(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for range in code_ranges(input) {
        if range.start < last {
            continue;
        }
        out.push_str(&rewrite_math(&input[last..range.start]));
        out.push_str(&input[range.clone()]);
        last = range.end;
    }
    out.push_str(&rewrite_math(&input[last..]));
    out
}

/// Byte ranges of code blocks and code spans, in document order, as
/// CommonMark sees them. Spans never cross a block boundary.
fn code_ranges(input: &str) -> Vec<Range<usize>> {
    Parser::new_ext(input, Options::empty())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Code(_) | Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

fn rewrite_math(text: &str) -> String {
    let text = DISPLAY_MATH.replace_all(text, |caps: &Captures| format!("$${}$$", caps[1].trim()));
    INLINE_MATH
        .replace_all(&text, |caps: &Captures| format!("${}$", caps[1].trim()))
        .into_owned()
}
