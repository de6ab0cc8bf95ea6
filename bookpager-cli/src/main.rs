use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use bookpager_bot::{Dispatcher, Reply, Request};
use bookpager_core::{Book, FileTextSource, MemoryRegistry, PagerConfig, Reader, UserId};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "bookpager",
    version,
    about = "Splits a book into punctuation-aligned pages and serves them to readers"
)]
struct Args {
    /// TOML file with book_path, page_size, overflow and preview_chars
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// UTF-8 text file to paginate (overrides the config file)
    #[arg(short = 'b', long = "book", global = true)]
    book: Option<PathBuf>,

    /// Maximum page length in characters (overrides the config file)
    #[arg(short = 'p', long = "page-size", global = true)]
    page_size: Option<usize>,

    /// Directory for the log file instead of the platform data directory
    #[arg(long = "log-dir", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Print every page with its length and how it ends
    Paginate {
        #[arg(long)]
        json: bool,
    },
    /// Read `<user> <message>` or `<user> @<button>` lines from stdin and answer each one
    Serve {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.clone())?;

    let config = resolve_config(&args)?;
    let book_path = config.validate()?.to_path_buf();
    let source = FileTextSource::new(&book_path);
    let book = Book::load_with(&source, &config.paginate_options())
        .await
        .with_context(|| format!("failed to paginate book {:?}", book_path))?;
    info!(path = ?book_path, pages = book.page_count(), "book ready");

    match args.command {
        Mode::Paginate { json } => print_pages(&book, json),
        Mode::Serve { json } => {
            let reader = Reader::new(Arc::new(book), Arc::new(MemoryRegistry::new()));
            let dispatcher = Dispatcher::new(Arc::new(reader), config.preview_chars);
            serve(&dispatcher, json).await
        }
    }
}

fn resolve_config(args: &Args) -> Result<PagerConfig> {
    let mut config = match &args.config {
        Some(path) => PagerConfig::load(path)?,
        None => PagerConfig::default(),
    };
    if let Some(book) = &args.book {
        config.book_path = Some(book.clone());
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    Ok(config)
}

#[derive(Serialize)]
struct PageSummary<'a> {
    number: usize,
    offset: usize,
    len: usize,
    end: bookpager_core::PageEnd,
    text: &'a str,
}

fn print_pages(book: &Book, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for page in book.pages() {
        if json {
            let summary = PageSummary {
                number: page.number,
                offset: page.offset,
                len: page.len,
                end: page.end,
                text: &page.text,
            };
            writeln!(out, "{}", serde_json::to_string(&summary)?)?;
        } else {
            let first_line = page.text.lines().next().unwrap_or_default();
            writeln!(
                out,
                "{:>5} {:>6} {:<11} {}",
                page.number,
                page.len,
                format!("{:?}", page.end),
                first_line
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

async fn serve(dispatcher: &Dispatcher, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (user, request) = match parse_request(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, line = %line, "skipping malformed request");
                continue;
            }
        };
        let reply = dispatcher.handle(user, &request);
        let rendered = if json {
            reply.to_json()?
        } else {
            render_reply(&reply)
        };
        let mut out = stdout.lock();
        writeln!(out, "{}", rendered)?;
        out.flush()?;
    }
    Ok(())
}

/// `42 /start` is a message from user 42, `42 @forward` a button press.
fn parse_request(line: &str) -> Result<(UserId, Request)> {
    let (user, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("expected `<user> <request>`"))?;
    let user: UserId = user
        .parse()
        .with_context(|| format!("invalid user id {:?}", user))?;
    let rest = rest.trim();
    if rest.is_empty() {
        bail!("empty request");
    }
    let request = match rest.strip_prefix('@') {
        Some(data) => Request::Callback(data.to_string()),
        None => Request::Message(rest.to_string()),
    };
    Ok((user, request))
}

fn render_reply(reply: &Reply) -> String {
    let kind = match reply {
        Reply::Send { .. } => "send",
        Reply::Edit { .. } => "edit",
        Reply::Notice { .. } => "notice",
    };
    let mut rendered = format!("[{}] {}", kind, reply.text());
    if let Some(keyboard) = reply.keyboard() {
        for row in &keyboard.rows {
            let buttons: Vec<String> = row
                .iter()
                .map(|button| format!("[{} -> @{}]", button.text, button.data))
                .collect();
            rendered.push_str("\n    ");
            rendered.push_str(&buttons.join(" "));
        }
    }
    rendered
}

fn init_logging(log_dir: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    let log_dir = log_dir.or_else(|| {
        ProjectDirs::from("net", "bookpager", "bookpager")
            .map(|dirs| dirs.data_local_dir().join("logs"))
    });
    let file = log_dir.and_then(|dir| match fs::create_dir_all(&dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(&dir, "bookpager.log");
            Some(tracing_appender::non_blocking(appender))
        }
        Err(err) => {
            eprintln!("logging to console only, cannot create {:?}: {}", dir, err);
            None
        }
    });

    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(guard)
}
