use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use parley_cli::config;
use parley_cli::terminal::{self, TYPING, TerminalTranscript};
use parley_core::error::CoreError;
use parley_core::models::image::{ImagePayload, mime_for_extension};
use parley_core::models::turn::{Role, Turn, TurnKind};
use parley_session::exchange::{APOLOGY, ExchangeOutcome};
use parley_session::gallery::ImageSource;
use parley_session::preferences::{Preferences, Theme};
use parley_session::store::{FlushOutcome, SessionStore};
use parley_session::transcript::{NullTranscript, Transcript};
use parley_storage::file::FileStore;
use parley_upstream::chat::HttpChatBackend;

#[derive(Debug, Parser)]
#[command(name = "parley", version, about = "Terminal chat client with local history")]
struct Cli {
    /// Chat proxy endpoint.
    #[arg(long, env = "PARLEY_PROXY_URL")]
    proxy_url: Option<String>,

    /// Directory holding conversations and preferences.
    #[arg(long, env = "PARLEY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current conversation.
    Show,
    /// Send one message and print the reply.
    Send {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Interactive session. `/clear` archives the conversation, `/quit` exits.
    Chat,
    /// Add an image file to the current conversation.
    Attach { path: PathBuf },
    /// Archive the current conversation and start a new one.
    Clear,
    /// List archived conversations, most recent first.
    History,
    /// Make a copy of an archived conversation the current one.
    Open { id: i64 },
    /// Delete every archived conversation.
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List images across the archive and the current conversation.
    Gallery,
    /// Re-send a gallery image in the current conversation.
    ReuseImage { index: usize },
    /// Delete a gallery image from every archived conversation.
    DeleteImage {
        index: usize,
        #[arg(long)]
        yes: bool,
    },
    /// Show the effective settings; `--save` writes them to the config file.
    Config {
        #[arg(long)]
        request_timeout_secs: Option<u64>,
        #[arg(long)]
        save: bool,
    },
    /// Show or change preferences.
    Prefs {
        #[arg(long)]
        voice_speed: Option<f32>,
        #[arg(long)]
        font_size: Option<u32>,
        #[arg(long, conflicts_with = "toggle_theme")]
        theme: Option<Theme>,
        #[arg(long)]
        toggle_theme: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;

    if let Command::Config {
        request_timeout_secs,
        save,
    } = cli.command
    {
        let mut config = config;
        if let Some(url) = cli.proxy_url {
            config.proxy_url = url;
        }
        if let Some(dir) = cli.data_dir {
            config.data_dir = Some(dir);
        }
        if let Some(secs) = request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if save {
            config::save_config(&config)?;
            println!("saved {}", config::config_path()?.display());
        }
        println!("proxy url:       {}", config.proxy_url);
        println!("data dir:        {}", config.resolved_data_dir()?.display());
        println!("request timeout: {}s", config.request_timeout_secs);
        return Ok(());
    }

    let proxy_url = cli.proxy_url.unwrap_or_else(|| config.proxy_url.clone());
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.resolved_data_dir()?,
    };
    tracing::debug!(data_dir = %data_dir.display(), %proxy_url, "starting");

    let storage = FileStore::open(data_dir)?;
    let mut transcript = TerminalTranscript::stdout();

    match cli.command {
        Command::Config { .. } => {}
        Command::Show => {
            SessionStore::load(storage, &mut transcript);
        }
        Command::Send { text } => {
            let session = Mutex::new(SessionStore::load(storage, &mut NullTranscript::default()));
            let backend = HttpChatBackend::new(proxy_url, config.request_timeout());
            send(&session, &backend, &mut transcript, &text.join(" ")).await?;
        }
        Command::Chat => {
            let session = Mutex::new(SessionStore::load(storage, &mut transcript));
            let backend = HttpChatBackend::new(proxy_url, config.request_timeout());
            chat_loop(&session, &backend, &mut transcript).await?;
        }
        Command::Attach { path } => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            attach(&mut store, &mut transcript, &path)?;
        }
        Command::Clear => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            let summary = store.clear_current();
            match summary.archived_id {
                Some(id) => println!("archived conversation {id}"),
                None => println!("nothing to archive"),
            }
            warn_if_failed(summary.current_flush);
            if let Some(flush) = summary.archive_flush {
                warn_if_failed(flush);
            }
        }
        Command::History => {
            let store = SessionStore::load(storage, &mut NullTranscript::default());
            print_history(&store);
        }
        Command::Open { id } => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            let flush = store.load_archived_conversation(id)?;
            store.replay(&mut transcript);
            warn_if_failed(flush);
        }
        Command::ClearHistory { yes } => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            let flush = if yes {
                Some(store.clear_archive())
            } else {
                store.clear_archive_confirmed(|| {
                    confirm("Clear all saved conversations? This cannot be undone.")
                })
            };
            match flush {
                Some(flush) => {
                    println!("history cleared");
                    warn_if_failed(flush);
                }
                None => println!("cancelled"),
            }
        }
        Command::Gallery => {
            let store = SessionStore::load(storage, &mut NullTranscript::default());
            print_gallery(&store);
        }
        Command::ReuseImage { index } => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            let content = gallery_content(&store, index)?;
            let turn = Turn::image(Role::User, ImagePayload::parse(&content)?);
            transcript.append(turn.content(), turn.role(), turn.kind());
            warn_if_failed(store.append_turn(turn));
        }
        Command::DeleteImage { index, yes } => {
            let mut store = SessionStore::load(storage, &mut NullTranscript::default());
            let content = gallery_content(&store, index)?;
            if !yes && !confirm("Delete this image from the gallery?") {
                println!("cancelled");
                return Ok(());
            }
            let summary = store.gallery_mut().delete_image(&content);
            println!(
                "removed {} image(s), dropped {} empty conversation(s)",
                summary.removed_turns, summary.dropped_conversations
            );
            warn_if_failed(summary.flush);
        }
        Command::Prefs {
            voice_speed,
            font_size,
            theme,
            toggle_theme,
        } => {
            let mut storage = storage;
            let mut prefs = Preferences::load(&storage);
            let changed =
                voice_speed.is_some() || font_size.is_some() || theme.is_some() || toggle_theme;

            if let Some(speed) = voice_speed {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(eyre::eyre!("voice speed must be a positive number"));
                }
                prefs.voice_speed = speed;
            }
            if let Some(size) = font_size {
                prefs.font_size = size;
            }
            if let Some(theme) = theme {
                prefs.theme = theme;
            }
            if toggle_theme {
                prefs.theme = prefs.theme.toggled();
            }
            if changed {
                prefs.save(&mut storage)?;
            }

            println!("voice speed: {}x", prefs.voice_speed);
            println!("font size:   {}px", prefs.font_size);
            println!("theme:       {}", prefs.theme);
        }
    }

    Ok(())
}

async fn send(
    session: &Mutex<SessionStore<FileStore>>,
    backend: &HttpChatBackend,
    transcript: &mut dyn Transcript,
    text: &str,
) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(eyre::eyre!("message is empty"));
    }

    tracing::debug!(url = backend.url(), "sending message");
    transcript.append(text, Role::User, TurnKind::Text);
    let typing = transcript.append(TYPING, Role::Assistant, TurnKind::Text);

    let outcome = parley_upstream::exchange::send_message(session, backend, text).await;
    transcript.remove(typing);

    match outcome? {
        ExchangeOutcome::Replied(turn) => {
            transcript.append(turn.content(), turn.role(), turn.kind());
        }
        ExchangeOutcome::Failed(e) => {
            tracing::debug!(error = %e, "reply failed");
            transcript.append(APOLOGY, Role::Assistant, TurnKind::Text);
        }
        ExchangeOutcome::Discarded => {}
    }
    Ok(())
}

async fn chat_loop(
    session: &Mutex<SessionStore<FileStore>>,
    backend: &HttpChatBackend,
    transcript: &mut TerminalTranscript<std::io::Stdout>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                let summary = session.lock().await.clear_current();
                transcript.clear();
                if let Some(id) = summary.archived_id {
                    tracing::info!(id, "conversation archived");
                }
            }
            text => match send(session, backend, transcript, text).await {
                Ok(()) => {}
                Err(e) => eprintln!("{e}"),
            },
        }
    }
    Ok(())
}

fn attach(
    store: &mut SessionStore<FileStore>,
    transcript: &mut dyn Transcript,
    path: &Path,
) -> Result<()> {
    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| eyre::eyre!("not a recognized image file: {}", path.display()))?;

    let bytes = std::fs::read(path)?;
    let payload = match ImagePayload::from_bytes(&bytes, mime) {
        Ok(payload) => payload,
        Err(CoreError::PayloadTooLarge { .. }) => {
            transcript.append("Image too large (max 3MB).", Role::Assistant, TurnKind::Text);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let turn = Turn::image(Role::User, payload);
    transcript.append(turn.content(), turn.role(), turn.kind());
    warn_if_failed(store.append_turn(turn));
    Ok(())
}

fn print_history(store: &SessionStore<FileStore>) {
    if store.archive().is_empty() {
        println!("No saved conversations.");
        return;
    }

    let archive = store.archive();
    println!("{} of {} saved conversations", archive.len(), archive.capacity());

    let tz = jiff::tz::TimeZone::system();
    for conversation in archive.iter() {
        let when = conversation.timestamp.to_zoned(tz.clone());
        let preview = conversation
            .last_turn()
            .map(|turn| terminal::preview(turn.content(), turn.kind()))
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {}  {}", conversation.id, when.strftime("%Y-%m-%d %H:%M"), preview);
    }
}

fn print_gallery(store: &SessionStore<FileStore>) {
    let tz = jiff::tz::TimeZone::system();
    let gallery = store.gallery();
    let mut images = gallery.list_images().peekable();
    if images.peek().is_none() {
        println!("No images yet.");
        return;
    }

    for (index, image) in images.enumerate() {
        let source = match image.source {
            ImageSource::Archived { conversation_id } => format!("conversation {conversation_id}"),
            ImageSource::Current => "current".to_string(),
        };
        println!(
            "{index:>3}  {}  {}  {}",
            image.source_timestamp.to_zoned(tz.clone()).strftime("%Y-%m-%d %H:%M"),
            source,
            terminal::describe(image.content, TurnKind::Image)
        );
    }
}

fn gallery_content(store: &SessionStore<FileStore>, index: usize) -> Result<String> {
    store
        .gallery()
        .list_images()
        .nth(index)
        .map(|image| image.content.to_string())
        .ok_or_else(|| eyre::eyre!("no gallery image at index {index}"))
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn warn_if_failed(flush: FlushOutcome) {
    if !flush.is_durable() {
        eprintln!("warning: change was not saved to disk");
    }
}
