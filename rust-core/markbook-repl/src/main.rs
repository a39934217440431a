// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! Markbook shell — interactive manager for a single table of student
//! records.
//!
//! Provides a readline-based shell with:
//! - Case-insensitive command verbs (OPEN, SHOW, FIND, INSERT, ...)
//! - Tab completion for verbs and field markers
//! - Syntax highlighting of verbs, fields, quoted and numeric values
//! - Multiple output formats (table, CSV, JSON)
//! - Persistent command history
//!
//! All table semantics live in `markbook-core`; this binary only maps lines
//! onto session calls and renders the outcomes.

mod completer;
mod formatter;
mod highlighter;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::MatchingBracketValidator;
use rustyline_derive::{Completer, Helper, Highlighter, Hinter, Validator};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use markbook_core::query::SearchField;
use markbook_core::session::{AutosaveStatus, OpenOutcome, Session};
use markbook_core::MarkbookError;
use markbook_storage::FlatFileStore;

use formatter::{
    render_matches, render_programme_summary, render_records, render_summary, OutputFormat,
};

/// Markbook version string, pulled from Cargo.toml at compile time.
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// mbk — interactive shell for Markbook record tables.
#[derive(Parser, Debug)]
#[command(name = "mbk", version = VERSION, about = "Markbook record shell")]
struct Cli {
    /// Directory where snapshot files live.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Default output format (table, csv, or json).
    #[arg(long, default_value = "table")]
    format: String,

    /// Open this team's table at startup.
    #[arg(long)]
    open: Option<String>,
}

// ---------------------------------------------------------------------------
// Rustyline helper (bundles all traits into one type)
// ---------------------------------------------------------------------------

/// Combined helper that provides highlighting, completion, hinting, and
/// bracket validation for the rustyline editor.
#[derive(Helper, Highlighter, Completer, Hinter, Validator)]
struct ShellHelper {
    #[rustyline(Highlighter)]
    highlighter: highlighter::CommandHighlighter,
    #[rustyline(Completer)]
    completer: completer::CommandCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

type Editor = rustyline::Editor<ShellHelper, DefaultHistory>;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    // Log lines go to stderr so they never interleave with table output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format: OutputFormat = cli.format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Defaulting to table format.");
        OutputFormat::Table
    });

    let mut session = Session::new(FlatFileStore::new(), cli.data_dir.clone());
    info!(data_dir = %cli.data_dir.display(), %format, "shell starting");

    print_banner(&cli, format);

    let helper = ShellHelper {
        highlighter: highlighter::CommandHighlighter,
        completer: completer::CommandCompleter,
        hinter: HistoryHinter::new(),
        validator: MatchingBracketValidator::new(),
    };

    let mut editor = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} failed to create line editor: {e}", "Error:".red().bold());
            return;
        }
    };
    editor.set_helper(Some(helper));
    editor.set_auto_add_history(true);

    // Load history from ~/.markbook_history (ignore errors on first run).
    let history_path = history_file_path();
    let _ = editor.load_history(&history_path);

    if let Some(team) = &cli.open {
        handle_open(&mut session, team);
    }

    // Main command loop.
    loop {
        let prompt = format!("{} ", "mbk>".bright_green().bold());
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if dispatch(&mut session, &mut editor, format, line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use EXIT or Ctrl-D to leave.");
            }
            Err(ReadlineError::Eof) => {
                println!("Bye.");
                break;
            }
            Err(e) => {
                eprintln!("{} readline error: {e}", "Error:".red().bold());
                break;
            }
        }
    }

    let _ = editor.save_history(&history_path);
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Map one input line onto a session call and render the outcome.
///
/// Returns `true` when the shell should exit. No command failure ever
/// terminates the session; every error becomes one descriptive line.
fn dispatch(
    session: &mut Session<FlatFileStore>,
    editor: &mut Editor,
    format: OutputFormat,
    line: &str,
) -> bool {
    let upper = line.to_uppercase();
    debug!(command = line, "dispatching");

    if upper.starts_with("EXIT") || upper.starts_with("QUIT") {
        println!("Bye.");
        return true;
    }

    if upper.starts_with("HELP") {
        print_help(session.autosave_enabled());
    } else if upper.starts_with("OPEN") {
        handle_open(session, line["OPEN".len()..].trim());
    } else if upper.starts_with("SHOW ALL") {
        handle_show_all(session, format, &line["SHOW ALL".len()..]);
    } else if upper.starts_with("SHOW PROGRAMME SUMMARY") {
        handle_programme_summary(session, format);
    } else if upper.starts_with("SHOW SUMMARY") {
        handle_summary(session, format);
    } else if upper.starts_with("FIND NAME") {
        handle_find(session, format, SearchField::Name, line);
    } else if upper.starts_with("FIND PROGRAMME") {
        handle_find(session, format, SearchField::Programme, line);
    } else if upper.starts_with("INSERT") {
        handle_insert(session, line);
    } else if upper.starts_with("QUERY") {
        handle_query(session, format, line);
    } else if upper.starts_with("UPDATE") {
        handle_update(session, line);
    } else if upper.starts_with("DELETE") {
        handle_delete(session, editor, line);
    } else if upper.starts_with("SET AUTOSAVE") {
        handle_set_autosave(session, &upper["SET AUTOSAVE".len()..]);
    } else if upper.starts_with("SAVE") {
        handle_save(session);
    } else if upper.starts_with("UNDO") {
        handle_undo(session);
    } else if upper.starts_with("FIND") {
        println!("Usage: FIND NAME=\"<keyword>\" or FIND PROGRAMME=\"<keyword>\"");
    } else {
        println!("Unknown command. Type HELP to see available commands.");
    }

    false
}

// ---------------------------------------------------------------------------
// Per-verb handlers
// ---------------------------------------------------------------------------

fn handle_open(session: &mut Session<FlatFileStore>, team: &str) {
    match session.open(team) {
        Ok(OpenOutcome::Loaded { path, count }) => {
            println!(
                "Opened \"{}\" ({count} record{}).",
                path.display(),
                if count == 1 { "" } else { "s" }
            );
        }
        Ok(OpenOutcome::Fresh { path }) => {
            println!(
                "New table: \"{}\" will be created on first SAVE (0 records).",
                path.display()
            );
        }
        Err(e) => report_error(&e),
    }
}

fn handle_show_all(session: &Session<FlatFileStore>, format: OutputFormat, args: &str) {
    match session.show_all(args) {
        Ok(records) => println!("{}", render_records(&records, format)),
        Err(e) => report_error(&e),
    }
}

fn handle_summary(session: &Session<FlatFileStore>, format: OutputFormat) {
    match session.summary() {
        Some(summary) => println!("{}", render_summary(&summary, format)),
        None => println!("No records loaded."),
    }
}

fn handle_programme_summary(session: &Session<FlatFileStore>, format: OutputFormat) {
    let groups = session.programme_summary();
    if groups.is_empty() {
        println!("No records loaded.");
    } else {
        println!("{}", render_programme_summary(&groups, format));
    }
}

fn handle_find(
    session: &Session<FlatFileStore>,
    format: OutputFormat,
    field: SearchField,
    line: &str,
) {
    match session.find(field, line) {
        Ok((keyword, matches)) => {
            let count = matches.len();
            println!("Search results for \"{keyword}\":");
            if count == 0 {
                println!("(no matches)");
            } else {
                println!("{}", render_matches(&matches, format));
            }
        }
        Err(e) => report_error(&e),
    }
}

fn handle_insert(session: &mut Session<FlatFileStore>, line: &str) {
    match session.insert(line) {
        Ok(receipt) => {
            println!("Inserted record with ID={}.", receipt.record.id);
            report_autosave(receipt.autosave.as_ref());
        }
        Err(e) => report_error(&e),
    }
}

fn handle_query(session: &Session<FlatFileStore>, format: OutputFormat, line: &str) {
    match session.query(line) {
        Ok(record) => println!("{}", render_records(&[record], format)),
        Err(e) => report_error(&e),
    }
}

fn handle_update(session: &mut Session<FlatFileStore>, line: &str) {
    match session.update(line) {
        Ok(receipt) => {
            println!("Updated record with ID={}.", receipt.record.id);
            report_autosave(receipt.autosave.as_ref());
        }
        Err(e) => report_error(&e),
    }
}

/// DELETE blocks on a Y/N confirmation before anything is mutated. Any
/// answer other than an affirmative — including end of input — cancels
/// with no state change and no undo entry.
fn handle_delete(session: &mut Session<FlatFileStore>, editor: &mut Editor, line: &str) {
    let target = match session.prepare_delete(line) {
        Ok(record) => record,
        Err(e) => {
            report_error(&e);
            return;
        }
    };

    println!(
        "Delete record ID={} ({})? Type Y to confirm or N to cancel.",
        target.id, target.name
    );
    let confirmed = match editor.readline("You: ") {
        Ok(answer) => answer.trim().to_uppercase().starts_with('Y'),
        Err(_) => false,
    };
    if !confirmed {
        println!("Deletion cancelled.");
        return;
    }

    match session.commit_delete(target.id) {
        Ok(receipt) => {
            println!("Deleted record with ID={}.", receipt.record.id);
            report_autosave(receipt.autosave.as_ref());
        }
        Err(e) => report_error(&e),
    }
}

fn handle_set_autosave(session: &mut Session<FlatFileStore>, args: &str) {
    match args.split_whitespace().next() {
        Some("ON") => {
            session.set_autosave(true);
            println!("AUTOSAVE is ON.");
        }
        Some("OFF") => {
            session.set_autosave(false);
            println!("AUTOSAVE is OFF.");
        }
        _ => println!("Usage: SET AUTOSAVE ON|OFF"),
    }
}

fn handle_save(session: &Session<FlatFileStore>) {
    match session.save() {
        Ok((path, count)) => {
            println!(
                "Saved \"{}\" ({count} record{}).",
                path.display(),
                if count == 1 { "" } else { "s" }
            );
        }
        Err(e) => report_error(&e),
    }
}

fn handle_undo(session: &mut Session<FlatFileStore>) {
    match session.undo() {
        Ok(receipt) => {
            println!(
                "Undo successful (reverted {} of ID={}).",
                receipt.report.kind, receipt.report.id
            );
            report_autosave(receipt.autosave.as_ref());
        }
        Err(e) => report_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// One descriptive line per failure. An empty undo history is informational
/// and is printed without the error prefix.
fn report_error(err: &MarkbookError) {
    match err {
        MarkbookError::NothingToUndo => println!("Nothing to undo."),
        other => eprintln!("{} {other}", "Error:".red().bold()),
    }
}

fn report_autosave(status: Option<&AutosaveStatus>) {
    match status {
        Some(AutosaveStatus::Saved(path)) => {
            println!("Autosaved to \"{}\".", path.display());
        }
        Some(AutosaveStatus::Failed(reason)) => {
            eprintln!("{} autosave failed: {reason}", "Error:".red().bold());
        }
        None => {}
    }
}

// ---------------------------------------------------------------------------
// History file path
// ---------------------------------------------------------------------------

/// Determine the history file path (~/.markbook_history).
fn history_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".markbook_history")
}

// ---------------------------------------------------------------------------
// Help and banner
// ---------------------------------------------------------------------------

/// Print the welcome banner.
fn print_banner(cli: &Cli, format: OutputFormat) {
    println!();
    println!("{}", "  Markbook record shell".bright_cyan().bold());
    println!("  {} {}", "Version: ".dimmed(), VERSION);
    println!("  {} {}", "Data dir:".dimmed(), cli.data_dir.display());
    println!("  {} {}", "Format:  ".dimmed(), format);
    println!();
    println!(
        "  Type {} for commands, {} to leave.",
        "HELP".bright_yellow(),
        "EXIT".bright_yellow()
    );
    println!();
}

/// Print the command reference, including the live autosave state.
fn print_help(autosave: bool) {
    println!("Available commands:");
    println!("  OPEN <team>");
    println!("  SHOW ALL [SORT BY ID|MARK|PROGRAMME] [ASC|DESC]");
    println!("  SHOW SUMMARY");
    println!("  SHOW PROGRAMME SUMMARY");
    println!("  FIND NAME=\"<keyword>\"");
    println!("  FIND PROGRAMME=\"<keyword>\"");
    println!("  INSERT ID=<int> NAME=\"<str>\" PROGRAMME=\"<str>\" MARK=<float 0..100>");
    println!("  QUERY  ID=<int>");
    println!("  UPDATE ID=<int> [NAME=\"<str>\"] [PROGRAMME=\"<str>\"] [MARK=<float 0..100>]");
    println!("  DELETE ID=<int>   (asks Y/N)");
    println!("  SAVE");
    println!(
        "  SET AUTOSAVE ON|OFF   (currently {})",
        if autosave { "ON" } else { "OFF" }
    );
    println!("  UNDO");
    println!("  HELP");
    println!("  EXIT | QUIT");
}
