mod cli;

use std::io;
use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::Parser;

use career_todo::console::{Console, FAREWELL_INTERRUPTED};
use career_todo::model::{DueDateEdit, NewTask, TaskPatch};
use career_todo::ops::{self, Mode};
use career_todo::output;
use career_todo::paths::resolve_data_file;
use career_todo::store::{self, TaskStore};
use career_todo::validate::{parse_category, parse_due_date, parse_priority};
use career_todo::web;
use cli::{Cli, Command};

fn setup_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Some(Command::Serve { .. }));
    setup_logging(if serving { "info" } else { "warn" });

    let store = TaskStore::open(resolve_data_file(cli.file)?);

    match cli.command.unwrap_or(Command::Console) {
        Command::Console => run_console(&store)?,

        Command::Serve { addr } => {
            let addr: SocketAddr = addr
                .parse()
                .with_context(|| format!("invalid listen address '{addr}'"))?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::serve(store, addr))?;
        }

        Command::Add {
            title,
            category,
            priority,
            due,
            notes,
        } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let task = ops::add_task(
                &store,
                NewTask {
                    title,
                    category: category.unwrap_or_default(),
                    priority: priority.unwrap_or_default(),
                    due_date: parse_due_date(due.as_deref().unwrap_or(""))?,
                    notes,
                },
            )?;
            println!("{}", task.id);
            eprintln!("Added task {} '{}'", task.id, task.title);
        }

        Command::List { mode, json } => {
            let mode = Mode::parse(&mode);
            let tasks = ops::list_tasks(&store, &mode)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", output::format_task_list(&tasks, &mode));
            }
        }

        Command::Show { id } => {
            let task = ops::get_task(&store, id)?;
            print!("{}", output::format_task_detail(&task));
        }

        Command::Done { id } => {
            ops::mark_done(&store, id)?;
            eprintln!("Marked task {id} as done");
        }

        Command::Reopen { id } => {
            ops::reopen_task(&store, id)?;
            eprintln!("Reopened task {id}");
        }

        Command::Toggle { id } => match ops::toggle_done(&store, id)? {
            Some(task) if task.done => eprintln!("Marked task {id} as done"),
            Some(_) => eprintln!("Reopened task {id}"),
            None => bail!("task {id} not found"),
        },

        Command::Edit {
            id,
            title,
            category,
            priority,
            due,
            clear_due,
            notes,
        } => {
            let due_date = match (due, clear_due) {
                (_, true) => DueDateEdit::Clear,
                (Some(raw), false) => match parse_due_date(&raw)? {
                    Some(d) => DueDateEdit::Set(d),
                    None => DueDateEdit::Keep,
                },
                (None, false) => DueDateEdit::Keep,
            };
            let patch = TaskPatch {
                title,
                category: category.as_deref().map(parse_category).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                due_date,
                notes,
            };
            ops::edit_task(&store, id, patch)?;
            eprintln!("Updated task {id}");
        }

        Command::Rm { id } => match ops::remove_task(&store, id)? {
            Some(task) => eprintln!("Removed task {id} '{}'", task.title),
            None => eprintln!("No task {id}; nothing removed"),
        },

        Command::Progress => {
            let progress = ops::progress(&store)?;
            println!("{}", output::format_progress(&progress));
        }

        Command::Seed => {
            let added = ops::seed_samples(&store)?;
            eprintln!("Added {} sample tasks", added.len());
        }
    }

    Ok(())
}

fn run_console(store: &TaskStore) -> Result<()> {
    ctrlc::set_handler(|| {
        let _saves = store::block_saves();
        println!("\n\n{FAREWELL_INTERRUPTED}");
        std::process::exit(0);
    })
    .context("failed to set Ctrl+C handler")?;

    let stdin = io::stdin();
    Console::new(store, stdin.lock(), io::stdout()).run()
}
