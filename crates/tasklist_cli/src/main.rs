//! Terminal front-end for the task list.
//!
//! # Responsibility
//! - Stand in for the single-page form and list on a terminal.
//! - Re-render the list after every write through a manager subscription.

mod command;

use clap::Parser;
use command::{Command, HELP};
use log::warn;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version, default_log_level, init_logging, Clock, KeyValueStore, SqliteStore, TaskList,
    TaskListManager,
};

const STORE_DB_FILE_NAME: &str = "tasklist.sqlite3";
const LOG_DIR_NAME: &str = "tasklist-logs";

#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(about = "Add, complete and delete tasks from the terminal")]
#[command(version)]
struct Args {
    /// SQLite file holding the task list (defaults to the temp dir)
    #[arg(env = "TASKLIST_DB_PATH")]
    db_path: Option<PathBuf>,
}

impl Args {
    fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(STORE_DB_FILE_NAME))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tasklist: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let log_dir = std::env::temp_dir().join(LOG_DIR_NAME);
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("tasklist: logging disabled: {err}");
    }

    let db_path = args.db_path();
    let conn = open_db(&db_path)?;
    let store = SqliteStore::try_new(&conn)?;
    let mut manager = TaskListManager::load(store);
    if manager.is_read_only() {
        eprintln!("tasklist: stored list could not be read; changes will be refused");
    }

    let mut out = io::stdout().lock();
    writeln!(out, "tasklist {} ({})", core_version(), db_path.display())?;
    writeln!(out, "{HELP}")?;
    render(&mut out, manager.list())?;
    drop(out);
    manager.subscribe(|list| {
        if let Err(err) = render(&mut io::stdout().lock(), list) {
            warn!("event=cli_render module=cli status=error error={err}");
        }
    });

    for line in io::stdin().lock().lines() {
        let line = line?;
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(err) = apply(&mut manager, command, &mut io::stdout().lock()) {
                    warn!("event=cli_command module=cli status=error error={err}");
                    eprintln!("error: {err}");
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

fn apply<S: KeyValueStore, C: Clock>(
    manager: &mut TaskListManager<S, C>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Add(title) => {
            manager.add(&title)?;
        }
        Command::Toggle(id) => {
            if !manager.toggle(id)? {
                writeln!(out, "no task with id {id}")?;
            }
        }
        Command::Delete(id) => {
            if !manager.delete(id)? {
                writeln!(out, "no task with id {id}")?;
            }
        }
        Command::List => render(out, manager.list())?,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

fn render(out: &mut impl Write, list: &TaskList) -> io::Result<()> {
    if list.is_empty() {
        return writeln!(out, "(no tasks)");
    }
    for task in list {
        let mark = if task.completed { 'x' } else { ' ' };
        writeln!(out, "[{mark}] {} {}", task.id, task.title)?;
    }
    Ok(())
}
