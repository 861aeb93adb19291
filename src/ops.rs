use std::fmt;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use log::warn;

use crate::error::TaskError;
use crate::model::{Category, DueDateEdit, NewTask, Priority, Progress, Task, TaskPatch};
use crate::store::TaskStore;
use crate::validate::validate_title;

/// Current local time at minute resolution.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One past the highest id in use; fails once `u32::MAX` is taken.
pub fn next_id(tasks: &[Task]) -> Result<u32, TaskError> {
    tasks
        .iter()
        .map(|t| t.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(TaskError::IdsExhausted)
}

pub fn find_task(tasks: &[Task], id: u32) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

fn find_task_mut(tasks: &mut [Task], id: u32) -> Result<&mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))
}

/// Load, run `f`, and save only if `f` succeeded.
fn mutate<R>(store: &TaskStore, f: impl FnOnce(&mut Vec<Task>) -> Result<R>) -> Result<R> {
    let mut tasks = store.load()?;
    let out = f(&mut tasks)?;
    store.save(&tasks)?;
    Ok(out)
}

pub fn add_task(store: &TaskStore, new: NewTask) -> Result<Task> {
    let title = validate_title(&new.title)?;
    mutate(store, |tasks| {
        let task = Task {
            id: next_id(tasks)?,
            title,
            category: new.category,
            priority: new.priority,
            due_date: new.due_date,
            done: false,
            created_at: now(),
            updated_at: None,
            notes: new.notes,
        };
        tasks.push(task.clone());
        Ok(task)
    })
}

pub fn get_task(store: &TaskStore, id: u32) -> Result<Task> {
    let tasks = store.load()?;
    match find_task(&tasks, id) {
        Some(t) => Ok(t.clone()),
        None => Err(TaskError::NotFound(id).into()),
    }
}

/// Flip `done`. An unknown id changes nothing but the file is still
/// rewritten; `None` tells the caller nothing matched.
pub fn toggle_done(store: &TaskStore, id: u32) -> Result<Option<Task>> {
    mutate(store, |tasks| {
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|t| {
            t.done = !t.done;
            t.updated_at = Some(now());
            t.clone()
        }))
    })
}

fn set_done(store: &TaskStore, id: u32, done: bool) -> Result<Task> {
    mutate(store, |tasks| {
        let task = find_task_mut(tasks, id)?;
        task.done = done;
        task.updated_at = Some(now());
        Ok(task.clone())
    })
}

pub fn mark_done(store: &TaskStore, id: u32) -> Result<Task> {
    set_done(store, id, true)
}

pub fn reopen_task(store: &TaskStore, id: u32) -> Result<Task> {
    set_done(store, id, false)
}

/// Apply `patch` to task `id`. Always stamps `updated_at`.
pub fn edit_task(store: &TaskStore, id: u32, patch: TaskPatch) -> Result<Task> {
    let title = patch.title.as_deref().map(validate_title).transpose()?;
    mutate(store, |tasks| {
        let task = find_task_mut(tasks, id)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        match patch.due_date {
            DueDateEdit::Keep => {}
            DueDateEdit::Clear => task.due_date = None,
            DueDateEdit::Set(d) => task.due_date = Some(d),
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }
        task.updated_at = Some(now());
        Ok(task.clone())
    })
}

/// Remove task `id`, returning it if it existed. The file is rewritten
/// either way.
pub fn remove_task(store: &TaskStore, id: u32) -> Result<Option<Task>> {
    mutate(store, |tasks| {
        let removed = tasks.iter().position(|t| t.id == id).map(|i| tasks.remove(i));
        Ok(removed)
    })
}

/// Which tasks a listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    All,
    Open,
    Done,
    Today,
    /// Due between today and seven days from now, inclusive.
    Week,
    Category(Category),
    /// `category:<name>` naming no known category; matches nothing.
    UnknownCategory(String),
}

impl Mode {
    /// Parse a mode selector. Unrecognized selectors list everything.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "all" => Self::All,
            "open" => Self::Open,
            "done" => Self::Done,
            "today" => Self::Today,
            "week" => Self::Week,
            other => match other.strip_prefix("category:") {
                Some(name) => match Category::parse(name) {
                    Some(c) => Self::Category(c),
                    None => Self::UnknownCategory(name.to_string()),
                },
                None => {
                    warn!("unrecognized list mode '{other}', showing all tasks");
                    Self::All
                }
            },
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Open => !task.done,
            Self::Done => task.done,
            Self::Today => task.due_date == Some(today),
            Self::Week => task
                .due_date
                .is_some_and(|d| d >= today && d <= today + Duration::days(7)),
            Self::Category(c) => task.category == *c,
            Self::UnknownCategory(_) => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Open => f.write_str("open"),
            Self::Done => f.write_str("done"),
            Self::Today => f.write_str("today"),
            Self::Week => f.write_str("week"),
            Self::Category(c) => write!(f, "category:{}", c.label()),
            Self::UnknownCategory(name) => write!(f, "category:{name}"),
        }
    }
}

/// Display order: open before done, soonest due first (undated last),
/// higher priority first, then id.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| {
        (
            t.done,
            t.due_date.unwrap_or(NaiveDate::MAX),
            t.priority.rank(),
            t.id,
        )
    });
}

pub fn filter_tasks(tasks: &[Task], mode: &Mode, today: NaiveDate) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| mode.matches(t, today))
        .cloned()
        .collect();
    sort_tasks(&mut out);
    out
}

pub fn list_tasks(store: &TaskStore, mode: &Mode) -> Result<Vec<Task>> {
    Ok(filter_tasks(&store.load()?, mode, today()))
}

pub fn progress(store: &TaskStore) -> Result<Progress> {
    Ok(Progress::of(&store.load()?))
}

const SAMPLES: [(&str, Category, Priority); 5] = [
    (
        "기업 분석 3개 정리(핵심가치/사업/채용포인트)",
        Category::CompanyResearch,
        Priority::Medium,
    ),
    (
        "자소서 STAR 1개 완성(문제-행동-성과)",
        Category::CoverLetter,
        Priority::High,
    ),
    (
        "포트폴리오 프로젝트 1개 정리(성과 중심)",
        Category::Portfolio,
        Priority::High,
    ),
    (
        "면접 질문 10개 답변 구조 작성",
        Category::Interview,
        Priority::Medium,
    ),
    (
        "AI로 초안 만들고 내 경험 문장으로 리라이팅",
        Category::AiUsage,
        Priority::Medium,
    ),
];

/// Append the starter set of career-prep tasks.
pub fn seed_samples(store: &TaskStore) -> Result<Vec<Task>> {
    mutate(store, |tasks| {
        let created_at = now();
        let mut added = Vec::with_capacity(SAMPLES.len());
        for (title, category, priority) in SAMPLES {
            let task = Task {
                id: next_id(tasks)?,
                title: title.to_string(),
                category,
                priority,
                due_date: None,
                done: false,
                created_at,
                updated_at: None,
                notes: String::new(),
            };
            tasks.push(task.clone());
            added.push(task);
        }
        Ok(added)
    })
}
