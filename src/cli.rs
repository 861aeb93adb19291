use std::path::PathBuf;

use clap::{Parser, Subcommand};

use career_todo::paths::DEFAULT_ADDR;

#[derive(Parser)]
#[command(name = "career-todo", about = "Job-search task tracker")]
pub struct Cli {
    /// Path to the JSON data file [default: ~/.career_todo/todos.json]
    #[arg(long, env = "CAREER_TODO_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive numbered menu
    Console,

    /// Serve the web form
    Serve {
        /// Address to listen on
        #[arg(long, env = "CAREER_TODO_ADDR", default_value = DEFAULT_ADDR)]
        addr: String,
    },

    /// Add a task
    Add {
        /// What to do
        title: String,
        /// Category label or slug (cover-letter, portfolio, interview, company, ai, other)
        #[arg(short, long)]
        category: Option<String>,
        /// Priority label or slug (high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List tasks
    List {
        /// all, open, done, today, week, or category:<name>
        #[arg(default_value = "all")]
        mode: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        id: u32,
    },

    /// Mark a task as done
    Done {
        id: u32,
    },

    /// Mark a task as not done
    Reopen {
        id: u32,
    },

    /// Flip a task between done and not done
    Toggle {
        id: u32,
    },

    /// Edit a task; omitted fields keep their value
    Edit {
        id: u32,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        /// New due date, YYYY-MM-DD
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Remove a task
    Rm {
        id: u32,
    },

    /// Show completion percentage
    Progress,

    /// Add the sample career-prep tasks
    Seed,
}
