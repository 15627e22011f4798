use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use futures_util::future::AbortHandle;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use mathskills_core::markdown::celebrations;
use mathskills_core::{
    load_suggestions, ChatMessage, ChatRole, ConfigStore, ConversationAdapter, ConversationHistory,
    MarkdownPipeline, MountLedger, ProgressTracker, Theme,
};

use crate::display::{progress_bar, TerminalView};

/// One interactive tutoring conversation, persisted after every turn.
pub struct ChatSession {
    adapter: ConversationAdapter,
    store: Arc<dyn ConfigStore>,
    history: ConversationHistory,
    pipeline: MarkdownPipeline,
    tracker: ProgressTracker,
    ledger: MountLedger,
    messages: Vec<ChatMessage>,
    html_out: Option<PathBuf>,
}

impl ChatSession {
    pub fn new(adapter: ConversationAdapter, store: Arc<dyn ConfigStore>, html_out: Option<PathBuf>) -> Self {
        let history = ConversationHistory::new(store.clone());
        let messages = history.load();
        Self {
            adapter,
            store,
            history,
            pipeline: MarkdownPipeline::default(),
            tracker: ProgressTracker::new(),
            ledger: MountLedger::new(),
            messages,
            html_out,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("\n{}", "🧮 MathsSkills Tutor".bold().blue());
        println!("{}", "=".repeat(50).dimmed());
        println!(
            "{}",
            format!("Model: {}  |  /help for commands", self.adapter.model()).dimmed()
        );

        if self.messages.is_empty() {
            self.start_fresh().await?;
        } else {
            self.replay();
        }

        loop {
            let line = match Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("You")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(e) => {
                    debug!("Input closed: {}", e);
                    break;
                }
            };

            match line.trim() {
                "" => continue,
                "/quit" | "/exit" => break,
                "/help" => print_help(),
                "/new" => {
                    self.reset()?;
                    self.start_fresh().await?;
                }
                "/retry" => self.retry().await?,
                text => self.submit(text).await?,
            }
        }

        println!("{}", "👋 See you next time!".green());
        Ok(())
    }

    /// Appends the user's turn, persists it, then asks the tutor.
    pub async fn submit(&mut self, text: &str) -> Result<()> {
        self.messages.push(ChatMessage::user(text));
        self.history.save(&self.messages)?;
        self.request().await
    }

    async fn retry(&mut self) -> Result<()> {
        if !matches!(self.messages.last(), Some(m) if m.role == ChatRole::User) {
            println!("{}", "Nothing to resend.".yellow());
            return Ok(());
        }
        self.request().await
    }

    async fn request(&mut self) -> Result<()> {
        println!("{}", "🤔 Thinking... (Ctrl-C to cancel)".dimmed());

        let result = {
            let (handle, registration) = AbortHandle::new_pair();
            let request = self.adapter.send_abortable(&self.messages, registration);
            tokio::pin!(request);

            let finished = tokio::select! {
                result = &mut request => Some(result),
                _ = tokio::signal::ctrl_c() => None,
            };
            match finished {
                Some(result) => result,
                None => {
                    handle.abort();
                    request.await
                }
            }
        };

        match result {
            Ok(reply) => self.accept_reply(reply)?,
            Err(e) if e.is_aborted() => {
                println!("{}", "Request cancelled. Use /retry to resend.".yellow());
            }
            Err(e) => {
                println!("{}: {}", "Error talking to the tutor".red(), e);
                println!("{}", "Your message was kept. Use /retry to resend.".dimmed());
            }
        }
        Ok(())
    }

    fn accept_reply(&mut self, reply: ChatMessage) -> Result<()> {
        self.messages.push(reply);
        self.history.save(&self.messages)?;

        if let Some(reply) = self.messages.last() {
            println!("\n{}", "🧮 Tutor".bold().green());
            let document = self.pipeline.prepare(&reply.text());
            println!("{}\n", TerminalView::new(&reply.id, &mut self.ledger).render(&document));
        }

        if self.tracker.update(&self.messages) {
            self.print_progress();
        }
        self.export_html()
    }

    fn replay(&mut self) {
        println!("{}", "Continuing your last conversation.".dimmed());
        for message in self.messages.iter().filter(|m| m.role != ChatRole::System) {
            match message.role {
                ChatRole::User => println!("\n{} {}", "You:".bold().cyan(), message.text()),
                _ => {
                    let document = self.pipeline.prepare(&message.text());
                    // replayed replies count as already played
                    for ordinal in 0..celebrations(&document).len() {
                        self.ledger.should_fire(&message.id, ordinal);
                    }
                    println!("\n{}", "🧮 Tutor".bold().green());
                    println!("{}", TerminalView::new(&message.id, &mut self.ledger).render(&document));
                }
            }
        }
        println!();

        if self.tracker.update(&self.messages) {
            self.print_progress();
        }
    }

    async fn start_fresh(&mut self) -> Result<()> {
        if let Some(action) = self.pick_suggestion() {
            println!("{} {}", "You:".bold().cyan(), action);
            self.submit(&action).await?;
        }
        Ok(())
    }

    fn pick_suggestion(&self) -> Option<String> {
        let suggestions = load_suggestions(self.store.as_ref());
        let mut items: Vec<String> = suggestions
            .iter()
            .map(|s| format!("{} {}", s.title, s.label.dimmed()))
            .collect();
        items.push("Ask my own question".to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("How can I help you today?")
            .items(&items)
            .default(0)
            .interact();

        match selection {
            Ok(index) => suggestions.get(index).map(|s| s.action.clone()),
            Err(e) => {
                debug!("Suggestion picker unavailable: {}", e);
                None
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.messages.clear();
        self.history.clear()?;
        self.tracker = ProgressTracker::new();
        self.ledger.clear();
        info!("Started a new conversation");
        println!("{}", "✨ New conversation".bold().blue());
        Ok(())
    }

    fn print_progress(&self) {
        if let Some(record) = self.tracker.current() {
            println!("{}\n", progress_bar(&record));
        }
    }

    fn export_html(&self) -> Result<()> {
        let Some(path) = &self.html_out else {
            return Ok(());
        };
        let theme = Theme::load(self.store.as_ref()).unwrap_or(Theme::Light);
        let current = self.tracker.current();
        let page = self
            .pipeline
            .render_transcript(&self.messages, current.as_deref(), theme);
        fs::write(path, page)?;
        debug!("Transcript written to {}", path.display());
        Ok(())
    }
}

fn print_help() {
    println!("\n{}", "Commands".bold());
    println!("  {}   start a new conversation", "/new".cyan());
    println!("  {} resend your last message", "/retry".cyan());
    println!("  {}  leave the tutor", "/quit".cyan());
    println!("  {}  show this help\n", "/help".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mathskills_core::ai::WireMessage;
    use mathskills_core::{AdapterError, ChatModel, MemoryStore};

    struct ScriptedTutor {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatModel for ScriptedTutor {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _model: &str, _messages: &[WireMessage]) -> Result<String, AdapterError> {
            self.reply.clone().ok_or(AdapterError::MissingContent)
        }
    }

    fn session(reply: Option<&str>, html_out: Option<PathBuf>) -> (ChatSession, Arc<dyn ConfigStore>) {
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new());
        let tutor = Arc::new(ScriptedTutor {
            reply: reply.map(str::to_string),
        });
        let adapter = ConversationAdapter::new(tutor, store.clone(), "openai-large");
        (ChatSession::new(adapter, store.clone(), html_out), store)
    }

    #[tokio::test]
    async fn test_reply_is_persisted_and_tracked() {
        let (mut session, store) = session(
            Some("Good! <progress><current>2</current><total>14</total><correct>1</correct><incorrect>0</incorrect></progress>"),
            None,
        );

        session.submit("I'm ready to start!").await.unwrap();

        assert_eq!(session.messages().len(), 2);
        assert_eq!(ConversationHistory::new(store).load().len(), 2);
        let record = session.tracker.current().unwrap();
        assert_eq!((record.current, record.total), (2, 14));
    }

    #[tokio::test]
    async fn test_failed_turn_stays_in_history() {
        let (mut session, store) = session(None, None);

        session.submit("Explain Pythagoras' theorem").await.unwrap();

        let saved = ConversationHistory::new(store).load();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].role, ChatRole::User);
        assert!(session.tracker.current().is_none());
    }

    #[tokio::test]
    async fn test_transcript_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.html");
        let (mut session, _store) = session(Some("Correct! 🎉"), Some(path.clone()));

        session.submit("2 + 2 = 4?").await.unwrap();

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("2 + 2 = 4?"));
        assert!(page.contains("<span class=\"emoji\">🎉</span>"));
    }
}
