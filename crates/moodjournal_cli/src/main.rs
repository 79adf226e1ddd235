//! Terminal front end for the mood journal.
//!
//! # Responsibility
//! - Drive the core wizard state through one create per invocation.
//! - Print entries and notices; all journal rules live in `moodjournal_core`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moodjournal_core::db::open_db;
use moodjournal_core::flow::view::DEFAULT_EXCERPT_LENGTH;
use moodjournal_core::flow::{
    abort_save, begin_save, continue_to_reflection, edit_reflection, expand_entries, finish_save,
    select_mood,
};
use moodjournal_core::{
    entry_rows, init_from_config, reflection_counter, EncouragementGenerator, EntryService,
    EntryServiceError, JournalConfig, Mood, SqliteEntryRepository, ViewState,
};
use std::io::Read;
use std::path::PathBuf;

/// Guided mood and reflection journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file; defaults apply when it does not exist.
    #[arg(short, long, value_name = "FILE", default_value = "moodjournal.toml")]
    config: PathBuf,

    /// Overrides `database_path` from the config file.
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new entry and print its encouragement
    New {
        /// happy | down | angry | neutral | overwhelmed
        #[arg(short, long)]
        mood: Mood,
        /// Reflection text; read from stdin when omitted
        #[arg(short, long)]
        reflection: Option<String>,
    },

    /// List entries, newest first
    List {
        /// Show full reflections for these entry ids
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<String>,
        /// Show every reflection in full
        #[arg(long)]
        full: bool,
    },

    /// Delete an entry by id (unknown ids are ignored)
    Delete { id: String },

    /// Print the accepted moods
    Moods,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = JournalConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_from_config(&config.logging).context("initializing logging")?;

    if let Commands::Moods = cli.command {
        for mood in Mood::ALL {
            println!("{mood}");
        }
        return Ok(());
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    let conn = open_db(&db_path).with_context(|| format!("opening {}", db_path.display()))?;
    let repo = SqliteEntryRepository::with_key(&conn, config.storage_key.clone())?;
    let generator = EncouragementGenerator::from_config(&config)?;
    let service = EntryService::new(repo, generator);

    match cli.command {
        Commands::New { mood, reflection } => {
            let text = match reflection {
                Some(text) => text,
                None => read_stdin()?,
            };
            run_new(&service, &config, mood, text)
        }
        Commands::List { expand, full } => {
            let entries = service.list_entries();
            let state = expand_entries(ViewState::new(), expand);
            let limit = if full { usize::MAX } else { DEFAULT_EXCERPT_LENGTH };
            if entries.is_empty() {
                println!("No entries yet.");
            }
            for row in entry_rows(&entries, &state, limit) {
                println!("[{}] {} {}", row.id, row.date, row.mood);
                println!("  {}", row.reflection);
                println!("  > {}", row.encouragement);
            }
            Ok(())
        }
        Commands::Delete { id } => {
            service.delete_entry(&id)?;
            println!("Deleted {id}.");
            Ok(())
        }
        Commands::Moods => Ok(()),
    }
}

fn run_new(
    service: &EntryService<SqliteEntryRepository<'_>>,
    config: &JournalConfig,
    mood: Mood,
    text: String,
) -> Result<()> {
    let counter = reflection_counter(&text, config.max_reflection_display_length);
    if counter.over_limit {
        eprintln!(
            "note: reflection is {} characters (suggested maximum {})",
            counter.used, counter.max
        );
    }

    let state = select_mood(ViewState::new(), mood)?;
    let state = continue_to_reflection(state)?;
    let state = edit_reflection(state, text)?;
    let state = begin_save(state)?;

    let mut rng = rand::thread_rng();
    let result = service.create_entry(
        state.selected_mood,
        state.reflection_text.as_str(),
        &mut rng,
    );
    let created = match result {
        Ok(created) => created,
        Err(err @ EntryServiceError::Storage(_)) => {
            abort_save(state)?;
            eprintln!("Could not save your entry. Please try again.");
            return Err(err.into());
        }
        Err(err) => {
            abort_save(state)?;
            return Err(err.into());
        }
    };

    if created.source.is_offline_fallback() {
        eprintln!("note: encouragement service unavailable, used offline mode");
    }
    let state = finish_save(state, created.entry.encouragement.clone())?;
    if let Some(message) = state.last_encouragement.as_deref() {
        println!("{message}");
    }
    log::debug!("event=cli_new module=cli status=ok entry_id={}", created.entry.id);
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading reflection from stdin")?;
    Ok(text)
}
