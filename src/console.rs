//! Interactive numbered-menu front end.
//!
//! Every action is one store call; the list is never cached between menu
//! choices, so edits made by another process show up on the next listing.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;

use crate::error::as_task_error;
use crate::model::{Category, DueDateEdit, NewTask, Priority, TaskPatch};
use crate::ops::{self, Mode};
use crate::output::{format_progress, format_task_line, format_task_list};
use crate::store::TaskStore;
use crate::validate::parse_due_date;

pub const FAREWELL_INTERRUPTED: &str = "Interrupted. Goodbye!";

/// Input ended (EOF) while waiting at a prompt.
#[derive(Error, Debug)]
#[error("input closed")]
struct InputClosed;

const MENU: &str = "\
1) List all
2) List open
3) List done
4) Due today
5) Due this week (7 days)
6) List by category
7) Add task
8) Edit task
9) Mark done
10) Reopen
11) Delete
12) Progress
13) Add sample tasks
0) Exit";

pub struct Console<'a, R, W> {
    store: &'a TaskStore,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(store: &'a TaskStore, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Run the menu until the user exits or input ends.
    ///
    /// Mistakes the user can correct are printed and the menu continues;
    /// I/O failures end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => {
                    writeln!(
                        self.out,
                        "\nGoodbye! Your tasks are saved in {}",
                        self.store.path().display()
                    )?;
                    return Ok(());
                }
                Err(e) if e.is::<InputClosed>() => {
                    writeln!(self.out, "\n\n{FAREWELL_INTERRUPTED}")?;
                    return Ok(());
                }
                Err(e) => match as_task_error(&e) {
                    Some(task_err) => writeln!(self.out, "! {task_err}")?,
                    None => return Err(e),
                },
            }
        }
    }

    /// Show the menu and handle one choice. `Ok(false)` means exit.
    fn step(&mut self) -> Result<bool> {
        writeln!(self.out, "\n{}", "=".repeat(70))?;
        writeln!(self.out, "Career Todo")?;
        writeln!(self.out, "{}", "=".repeat(70))?;
        writeln!(self.out, "{MENU}")?;
        let choice = self.read_line("\nChoose: ")?;
        match choice.as_str() {
            "1" => self.list(Mode::All)?,
            "2" => self.list(Mode::Open)?,
            "3" => self.list(Mode::Done)?,
            "4" => self.list(Mode::Today)?,
            "5" => self.list(Mode::Week)?,
            "6" => {
                let category = self.pick("Category", &Category::ALL, None)?;
                self.list(Mode::Category(category))?;
            }
            "7" => self.add()?,
            "8" => self.edit()?,
            "9" => self.set_done(true)?,
            "10" => self.set_done(false)?,
            "11" => self.delete()?,
            "12" => {
                let progress = ops::progress(self.store)?;
                writeln!(self.out, "Progress: {}", format_progress(&progress))?;
            }
            "13" => self.seed()?,
            "0" => return Ok(false),
            _ => writeln!(self.out, "! Choose one of the listed numbers.")?,
        }
        Ok(true)
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    /// Non-empty text; Enter returns `default` when there is one.
    fn prompt_text(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        let prompt = match default {
            Some(d) => format!("{label} (Enter keeps: {d}): "),
            None => format!("{label}: "),
        };
        loop {
            let s = self.read_line(&prompt)?;
            if !s.is_empty() {
                return Ok(s);
            }
            if let Some(d) = default {
                return Ok(d.to_string());
            }
            writeln!(self.out, "! Input is empty, please try again.")?;
        }
    }

    fn pick<T: Copy + Display>(
        &mut self,
        label: &str,
        options: &[T],
        default: Option<T>,
    ) -> Result<T> {
        writeln!(self.out, "\n{label}")?;
        for (i, opt) in options.iter().enumerate() {
            writeln!(self.out, "  {}. {opt}", i + 1)?;
        }
        let prompt = match default {
            Some(d) => format!("Number (Enter keeps: {d}): "),
            None => "Number: ".to_string(),
        };
        loop {
            let s = self.read_line(&prompt)?;
            if s.is_empty() {
                if let Some(d) = default {
                    return Ok(d);
                }
            }
            if let Ok(n) = s.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(options[n - 1]);
                }
            }
            writeln!(self.out, "! Enter one of the listed numbers.")?;
        }
    }

    /// `None` after telling the user the id was not a number.
    fn prompt_id(&mut self, label: &str) -> Result<Option<u32>> {
        let s = self.prompt_text(label, None)?;
        match s.parse::<u32>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.out, "! Enter a numeric ID.")?;
                Ok(None)
            }
        }
    }

    fn list(&mut self, mode: Mode) -> Result<()> {
        let tasks = ops::list_tasks(self.store, &mode)?;
        write!(self.out, "{}", format_task_list(&tasks, &mode))?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        writeln!(self.out, "\nNew task")?;
        let title = self.prompt_text("Title (what will you do?)", None)?;
        let category = self.pick("Category", &Category::ALL, Some(Category::Other))?;
        let priority = self.pick("Priority", &Priority::ALL, Some(Priority::Medium))?;
        let due_date = loop {
            let raw = self.read_line("Due date (YYYY-MM-DD, Enter for none): ")?;
            match parse_due_date(&raw) {
                Ok(d) => break d,
                Err(e) => writeln!(self.out, "! {e}")?,
            }
        };
        let task = ops::add_task(
            self.store,
            NewTask {
                title,
                category,
                priority,
                due_date,
                notes: String::new(),
            },
        )?;
        writeln!(self.out, "Added.")?;
        writeln!(self.out, "{}", format_task_line(&task))?;
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("ID to edit")? else {
            return Ok(());
        };
        let current = ops::get_task(self.store, id)?;

        writeln!(self.out, "\nEdit task (Enter keeps the current value)")?;
        let title = self.prompt_text("Title", Some(&current.title))?;
        let category = self.pick("Category", &Category::ALL, Some(current.category))?;
        let priority = self.pick("Priority", &Priority::ALL, Some(current.priority))?;
        let shown_due = current
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let due_date = loop {
            let raw = self.read_line(&format!(
                "Due date (YYYY-MM-DD, Enter keeps, '-' clears) [now: {shown_due}]: "
            ))?;
            match raw.as_str() {
                "" => break DueDateEdit::Keep,
                "-" => break DueDateEdit::Clear,
                _ => match parse_due_date(&raw) {
                    Ok(Some(d)) => break DueDateEdit::Set(d),
                    Ok(None) => break DueDateEdit::Keep,
                    Err(e) => writeln!(self.out, "! {e}")?,
                },
            }
        };
        let has_notes = if current.notes.is_empty() { "none" } else { "set" };
        let notes = self.read_line(&format!("Notes (Enter keeps) [now: {has_notes}]: "))?;

        let task = ops::edit_task(
            self.store,
            id,
            TaskPatch {
                title: Some(title),
                category: Some(category),
                priority: Some(priority),
                due_date,
                notes: (!notes.is_empty()).then_some(notes),
            },
        )?;
        writeln!(self.out, "Updated.")?;
        writeln!(self.out, "{}", format_task_line(&task))?;
        Ok(())
    }

    fn set_done(&mut self, done: bool) -> Result<()> {
        let label = if done { "ID to mark done" } else { "ID to reopen" };
        let Some(id) = self.prompt_id(label)? else {
            return Ok(());
        };
        let task = if done {
            ops::mark_done(self.store, id)?
        } else {
            ops::reopen_task(self.store, id)?
        };
        writeln!(self.out, "{}", if done { "Marked done." } else { "Reopened." })?;
        writeln!(self.out, "{}", format_task_line(&task))?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("ID to delete")? else {
            return Ok(());
        };
        let task = ops::get_task(self.store, id)?;
        writeln!(self.out, "{}", format_task_line(&task))?;
        if !self.confirm("Really delete? (y/N): ")? {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }
        ops::remove_task(self.store, id)?;
        writeln!(self.out, "Deleted.")?;
        Ok(())
    }

    fn seed(&mut self) -> Result<()> {
        if !self.store.load()?.is_empty() {
            writeln!(self.out, "You already have tasks; samples work best on an empty list.")?;
            if !self.confirm("Add the samples anyway? (y/N): ")? {
                return Ok(());
            }
        }
        let added = ops::seed_samples(self.store)?;
        writeln!(self.out, "Added {} sample tasks.", added.len())?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.read_line(prompt)?.eq_ignore_ascii_case("y"))
    }
}
