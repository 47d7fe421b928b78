mod config;
mod error;

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use schema::{BotMessage, BotMessageType, Direction, Event};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracking::{BotMetrics, MetricsRecord, SqliteMetrics};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "botmetrics.toml";

#[derive(Parser)]
#[command(name = "botmetrics")]
#[command(about = "Track response metrics for chatbot events", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./botmetrics.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one event with the echo bot and record its metrics
    Track {
        /// Input text for a new incoming event
        #[arg(short, long, default_value = "hello")]
        text: String,
        /// Input message type for a new incoming event
        #[arg(long = "type", default_value = "text")]
        kind: String,
        /// Direction of a new event (incoming or outgoing)
        #[arg(long, default_value = "incoming")]
        direction: String,
        /// Load the event from a JSON file instead
        #[arg(short, long, conflicts_with = "text")]
        event: Option<PathBuf>,
        /// Make the handler fail
        #[arg(long)]
        fail: bool,
    },
    /// Validate an event JSON file
    Validate {
        file: PathBuf,
    },
    /// Show recorded metrics from a SQLite sink
    History {
        /// Show only the last N records
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Track {
            text,
            kind,
            direction,
            event,
            fail,
        } => cmd_track(&config, text, &kind, &direction, event.as_deref(), fail),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::History { limit } => cmd_history(&config, limit),
    }
}

fn cmd_track(
    config: &Config,
    text: String,
    kind: &str,
    direction: &str,
    event_file: Option<&Path>,
    fail: bool,
) -> Result<()> {
    let event = match event_file {
        Some(path) => Event::from_json(&std::fs::read_to_string(path)?)?,
        None => {
            let kind: BotMessageType = kind.parse()?;
            let direction: Direction = direction.parse()?;
            Event::incoming(text, kind.as_str()).with_direction(direction)
        }
    };
    let event_id = event.id.clone();
    info!(event_id = %event_id, sink = %config.sink.kind, "tracking event");

    let tracker = config.tracker()?;
    let outcome = tracker.track(|metrics| -> Result<usize> {
        metrics.capture_event(event);
        metrics.track_start();
        let replies = echo(metrics, fail)?;
        metrics.track_end();
        Ok(replies)
    })?;

    match outcome {
        Some(replies) => println!("Event {event_id} processed with {replies} reply message(s)."),
        None => println!("Event {event_id} failed; recorded as unsuccessful."),
    }
    Ok(())
}

/// Demo bot: replies with the input text.
fn echo(metrics: &mut BotMetrics, fail: bool) -> Result<usize> {
    if fail {
        return Err(Error::Handler("simulated failure".to_string()));
    }
    let event = metrics.event_mut()?;
    let reply = format!("You said: {}", event.input_text().unwrap_or_default());
    event.add_reply(BotMessage::text(reply));
    Ok(event.bot_reply.len())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let event = Event::from_json(&std::fs::read_to_string(path)?)?;
    let sent = event.sent_on.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");

    println!("Valid event {}", event.id);
    println!("  direction:    {}", event.direction);
    println!("  sent:         {sent}");
    println!("  user:         {}", event.user_id);
    println!("  conversation: {}", event.conversation_id);
    println!(
        "  input:        {} ({} chars)",
        event.input_type().unwrap_or("-"),
        event
            .input_text()
            .map(|t| t.chars().count().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    let output: usize = event.bot_reply.iter().map(BotMessage::message_size).sum();
    println!(
        "  replies:      {} ({output} chars of text)",
        event.bot_reply.len()
    );
    Ok(())
}

fn cmd_history(config: &Config, limit: usize) -> Result<()> {
    let db_path = config.sqlite_path().ok_or(Error::NoHistory)?;
    if !db_path.exists() {
        return Err(Error::DatabaseNotFound {
            path: db_path.to_path_buf(),
        });
    }
    let records = SqliteMetrics::open(db_path)?.recent(limit)?;

    if records.is_empty() {
        println!("No metrics recorded.");
        return Ok(());
    }

    println!(
        "{:<20}  {:<4}  {:<14}  {:<12}  {:<8}  {:>6}  {:>6}  TIME",
        "WHEN", "OK", "CONVERSATION", "USER", "TYPE", "IN", "OUT"
    );
    println!("{}", "-".repeat(96));

    for record in &records {
        print_record(record);
    }

    Ok(())
}

fn print_record(record: &MetricsRecord) {
    let when = record
        .started_at_local()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let ok = if record.success { "yes" } else { "no" };
    let size = |n: Option<usize>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());

    println!(
        "{:<20}  {:<4}  {:<14}  {:<12}  {:<8}  {:>6}  {:>6}  {:.2}s",
        when,
        ok,
        record.conversation_id.as_deref().unwrap_or("-"),
        record.user_id.as_deref().unwrap_or("-"),
        record.input_message_type.as_deref().unwrap_or("-"),
        size(record.user_input_size),
        size(record.bot_output_size),
        record.response_time,
    );
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}
