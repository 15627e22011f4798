use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod chat;
mod display;

use chat::ChatSession;
use display::{progress_bar, TerminalView};
use mathskills_core::progress::parse_progress_tag;
use mathskills_core::suggestions::reset_suggestions;
use mathskills_core::templates::{templates_by_topic, topics, GeoGebraTemplate};
use mathskills_core::{
    extract_progress, load_suggestions, ChatRole, Config, ConfigStore, ConversationAdapter,
    ConversationHistory, FileStore, MarkdownPipeline, MountLedger, PollinationsClient, PromptBuilder,
    TextModel, Theme,
};

#[derive(Parser)]
#[command(name = "mathskills")]
#[command(about = "MathsSkills - a friendly AI math tutor in your terminal")]
#[command(version)]
struct Cli {
    /// Show debug logs (overrides MATHSKILLS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or continue a tutoring conversation
    Chat {
        /// Text model to use
        #[arg(short, long)]
        model: Option<String>,
        /// Write the conversation as HTML after every reply
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Render a tutor reply written in Markdown (reads stdin without a file)
    Render {
        file: Option<PathBuf>,
        /// Emit HTML instead of terminal text
        #[arg(long)]
        html: bool,
    },
    /// Print the system prompt sent with every request
    Prompt,
    /// List the GeoGebra template catalog
    Templates {
        /// Only show one topic
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Show or change the pedagogical protocol
    Protocol {
        #[command(subcommand)]
        action: ProtocolAction,
    },
    /// List conversation starters
    Suggestions {
        /// Restore the default starters
        #[arg(long)]
        reset: bool,
    },
    /// Inspect the saved conversation
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Light or dark theme for exported transcripts
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// List available text models
    Models {
        /// Make this model the default
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProtocolAction {
    Show,
    /// Replace the protocol with the contents of a file
    Set { file: PathBuf },
    Reset,
}

#[derive(Subcommand)]
enum HistoryAction {
    Show,
    Clear,
    /// Write the conversation as a standalone HTML page
    Export { file: PathBuf },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let store: Arc<dyn ConfigStore> = Arc::new(FileStore::open(&config.storage_path()?)?);
    info!("MathsSkills v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Chat { model, html } => run_chat(&config, store, model, html).await?,
        Commands::Render { file, html } => render(file, html)?,
        Commands::Prompt => println!("{}", PromptBuilder::new(store.as_ref()).build(None)),
        Commands::Templates { topic } => list_templates(topic.as_deref()),
        Commands::Protocol { action } => protocol(store.as_ref(), action)?,
        Commands::Suggestions { reset } => suggestions(store.as_ref(), reset)?,
        Commands::History { action } => history(store, action)?,
        Commands::Theme { action } => theme(store.as_ref(), action)?,
        Commands::Models { set } => models(&config, set)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mathskills=debug,mathskills_core=debug")
    } else {
        EnvFilter::try_from_env("MATHSKILLS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_chat(
    config: &Config,
    store: Arc<dyn ConfigStore>,
    model: Option<String>,
    html: Option<PathBuf>,
) -> Result<()> {
    let model = model.unwrap_or_else(|| config.model());
    if TextModel::from_str(&model).is_none() {
        warn!("Unknown model '{}', sending it as-is", model);
    }

    let client = Arc::new(PollinationsClient::from_config(config));
    debug!("Chat endpoint: {}", client.endpoint());
    let adapter = ConversationAdapter::new(client, store.clone(), &model);

    ChatSession::new(adapter, store, html).run().await
}

fn render(file: Option<PathBuf>, html: bool) -> Result<()> {
    let source = match file {
        Some(path) => fs::read_to_string(&path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let pipeline = MarkdownPipeline::default();
    if html {
        println!("{}", pipeline.render(&source));
        return Ok(());
    }

    if let Some(record) = parse_progress_tag(&source) {
        println!("{}\n", progress_bar(&record));
    }
    let mut ledger = MountLedger::new();
    let document = pipeline.prepare(&source);
    println!("{}", TerminalView::new("render", &mut ledger).render(&document));
    Ok(())
}

fn list_templates(topic: Option<&str>) {
    println!("\n{}", "📐 GeoGebra Templates".bold().blue());
    println!("{}", "=".repeat(50).dimmed());

    let selected: Vec<&str> = match topic {
        Some(topic) => vec![topic],
        None => topics(),
    };

    for topic in selected {
        let templates = templates_by_topic(topic);
        if templates.is_empty() {
            println!("{}", format!("No templates for topic '{}'", topic).yellow());
            continue;
        }
        println!("\n{}", topic.bold().magenta());
        for template in templates {
            print_template(template);
        }
    }
}

fn print_template(template: &GeoGebraTemplate) {
    println!(
        "  {} {} {}",
        template.id.cyan(),
        template.name,
        format!("{}x{}", template.width, template.height).dimmed()
    );
    println!("    {}", template.description.dimmed());
}

fn protocol(store: &dyn ConfigStore, action: ProtocolAction) -> Result<()> {
    let builder = PromptBuilder::new(store);
    match action {
        ProtocolAction::Show => {
            let label = if builder.is_customized() { "custom" } else { "default" };
            println!("{}", format!("Pedagogical protocol ({})", label).bold().blue());
            println!("{}", "=".repeat(50).dimmed());
            println!("{}", builder.protocol());
        }
        ProtocolAction::Set { file } => {
            let protocol = fs::read_to_string(&file)?;
            builder.set_protocol(&protocol)?;
            println!("{} {}", "✓ Protocol loaded from".green(), file.display());
        }
        ProtocolAction::Reset => {
            builder.reset_protocol()?;
            println!("{}", "✓ Protocol reset to the default".green());
        }
    }
    Ok(())
}

fn suggestions(store: &dyn ConfigStore, reset: bool) -> Result<()> {
    if reset {
        reset_suggestions(store)?;
        println!("{}", "✓ Suggestions reset to the defaults".green());
    }

    println!("\n{}", "💬 Conversation starters".bold().blue());
    for suggestion in load_suggestions(store) {
        println!("  {} {}", suggestion.title.bold(), suggestion.label.dimmed());
        println!("    {} {}", "→".dimmed(), suggestion.action);
    }
    Ok(())
}

fn history(store: Arc<dyn ConfigStore>, action: HistoryAction) -> Result<()> {
    let history = ConversationHistory::new(store.clone());
    match action {
        HistoryAction::Show => {
            let messages = history.load();
            if messages.is_empty() {
                println!("{}", "No saved conversation.".dimmed());
                return Ok(());
            }

            let pipeline = MarkdownPipeline::default();
            let mut ledger = MountLedger::new();
            for message in messages.iter().filter(|m| m.role != ChatRole::System) {
                match message.role {
                    ChatRole::User => println!("\n{} {}", "You:".bold().cyan(), message.text()),
                    _ => {
                        let document = pipeline.prepare(&message.text());
                        println!("\n{}", "🧮 Tutor".bold().green());
                        println!("{}", TerminalView::new(&message.id, &mut ledger).render(&document));
                    }
                }
            }
            if let Some(record) = extract_progress(&messages) {
                println!("\n{}", progress_bar(&record));
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("{}", "✓ Conversation cleared".green());
        }
        HistoryAction::Export { file } => {
            let messages = history.load();
            let theme = Theme::load(store.as_ref()).unwrap_or(Theme::Light);
            let page = MarkdownPipeline::default().render_transcript(
                &messages,
                extract_progress(&messages).as_ref(),
                theme,
            );
            fs::write(&file, page)?;
            println!("{} {}", "✓ Transcript written to".green(), file.display());
        }
    }
    Ok(())
}

fn theme(store: &dyn ConfigStore, action: ThemeAction) -> Result<()> {
    let current = Theme::load(store).unwrap_or(Theme::Light);
    match action {
        ThemeAction::Show => println!("{}", current.as_str()),
        ThemeAction::Toggle => {
            let next = current.toggled();
            next.save(store)?;
            println!("{} {}", "✓ Theme set to".green(), next.as_str());
        }
    }
    Ok(())
}

fn models(config: &Config, set: Option<String>) -> Result<()> {
    if let Some(name) = set {
        let model = TextModel::from_str(&name).ok_or_else(|| anyhow!("Unknown model: {}", name))?;
        Config::save_default_model(model.as_str())?;
        println!("{} {}", "✓ Default model set to".green(), model.as_str());
        return Ok(());
    }

    let current = config.model();
    println!("\n{}", "🤖 Text models".bold().blue());
    for model in TextModel::all() {
        let marker = if model.as_str() == current { "●".green() } else { "○".dimmed() };
        println!("  {} {} {}", marker, model.as_str().cyan(), model.display_name().dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathskills_core::MemoryStore;

    #[test]
    fn test_parse_chat_flags() {
        let cli = Cli::try_parse_from(["mathskills", "chat", "--model", "mistral", "--html", "out.html"]).unwrap();
        match cli.command {
            Commands::Chat { model, html } => {
                assert_eq!(model.as_deref(), Some("mistral"));
                assert_eq!(html, Some(PathBuf::from("out.html")));
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["mathskills", "templates", "-v", "--topic", "Circles"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Templates { topic: Some(ref t) } if t == "Circles"));
    }

    #[test]
    fn test_subcommand_actions() {
        assert!(Cli::try_parse_from(["mathskills", "protocol", "set", "p.md"]).is_ok());
        assert!(Cli::try_parse_from(["mathskills", "history", "export", "t.html"]).is_ok());
        assert!(Cli::try_parse_from(["mathskills", "theme", "toggle"]).is_ok());
        assert!(Cli::try_parse_from(["mathskills", "protocol"]).is_err());
    }

    #[test]
    fn test_theme_toggle_persists() {
        let store = MemoryStore::new();
        theme(&store, ThemeAction::Toggle).unwrap();
        assert_eq!(Theme::load(&store), Some(Theme::Dark));
        theme(&store, ThemeAction::Toggle).unwrap();
        assert_eq!(Theme::load(&store), Some(Theme::Light));
    }

    #[test]
    fn test_history_export_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("t.html");
        let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new());
        ConversationHistory::new(store.clone())
            .append(&mathskills_core::ChatMessage::assistant("Time to begin! 🚀"))
            .unwrap();

        history(store, HistoryAction::Export { file: file.clone() }).unwrap();

        let page = fs::read_to_string(&file).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Time to begin!"));
    }
}
