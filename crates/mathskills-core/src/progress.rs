//! Diagnostic quiz progress carried in assistant replies.
//!
//! The tutor reports quiz progress with a tag of the exact shape
//!
//! ```text
//! <progress><current>3</current><total>14</total><correct>2</correct><incorrect>1</incorrect></progress>
//! ```
//!
//! Only the newest assistant message is consulted; older values never carry
//! over.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::warn;

use crate::state::{ChatMessage, ChatRole};

/// Width of the block-style progress bar.
pub const PROGRESS_BLOCKS: u32 = 20;

lazy_static! {
    static ref PROGRESS_TAG: Regex = Regex::new(
        r"<progress>\s*<current>(\d+)</current>\s*<total>(\d+)</total>\s*<correct>(\d+)</correct>\s*<incorrect>(\d+)</incorrect>\s*</progress>"
    )
    .expect("progress tag pattern");
    static ref PROGRESS_MARKUP: Regex = Regex::new(
        r"(?s)<progress>.*?</progress>|</?(?:progress|current|total|correct|incorrect)>"
    )
    .expect("progress markup pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub current: u32,
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl ProgressRecord {
    /// `0 <= current <= total` and `correct + incorrect <= current`.
    pub fn is_consistent(&self) -> bool {
        self.current <= self.total
            && self
                .correct
                .checked_add(self.incorrect)
                .is_some_and(|answered| answered <= self.current)
    }

    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.current as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn filled_blocks(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.current as f64 / self.total as f64) * PROGRESS_BLOCKS as f64).round() as u32
    }
}

/// Parses the first progress tag in `text`.
pub fn parse_progress_tag(text: &str) -> Option<ProgressRecord> {
    let caps = PROGRESS_TAG.captures(text)?;
    let field = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

    let record = ProgressRecord {
        current: field(1)?,
        total: field(2)?,
        correct: field(3)?,
        incorrect: field(4)?,
    };

    if !record.is_consistent() {
        warn!(?record, "Ignoring inconsistent progress tag");
        return None;
    }
    Some(record)
}

/// Progress reported by the most recent assistant message, if any.
pub fn extract_progress(messages: &[ChatMessage]) -> Option<ProgressRecord> {
    let last = messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::Assistant)?;
    parse_progress_tag(&last.text())
}

/// Removes progress markup so it never reaches the screen.
pub fn strip_progress_tags(text: &str) -> Cow<'_, str> {
    PROGRESS_MARKUP.replace_all(text, "")
}

/// Holds the current progress and only swaps it when a field changes, so
/// consumers comparing by pointer skip redundant redraws.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    current: Option<Arc<ProgressRecord>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<ProgressRecord>> {
        self.current.clone()
    }

    /// Re-derives progress from the full message list. Returns whether the
    /// visible state changed.
    pub fn update(&mut self, messages: &[ChatMessage]) -> bool {
        match (extract_progress(messages), &self.current) {
            (Some(next), Some(prev)) if **prev == next => false,
            (Some(next), _) => {
                self.current = Some(Arc::new(next));
                true
            }
            (None, Some(_)) => {
                self.current = None;
                true
            }
            (None, None) => false,
        }
    }
}
