use crate::model::{minute_stamp, Progress, Task};
use crate::ops::Mode;

const RULE: &str = "----------------------------------------------------------------------";

pub fn format_task_line(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} [ID:{}] ({}/{}) due:{} | {} | created:{}",
        task.marker(),
        task.id,
        task.category,
        task.priority,
        due,
        task.title,
        task.created_at.format(minute_stamp::FORMAT)
    )
}

pub fn format_task_list(tasks: &[Task], mode: &Mode) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Tasks ({mode}) | {} total\n", tasks.len()));
    out.push_str(RULE);
    out.push('\n');
    if tasks.is_empty() {
        out.push_str("Nothing to show.\n");
    }
    for task in tasks {
        out.push_str(&format_task_line(task));
        out.push('\n');
    }
    out
}

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:        {}\n", task.id));
    out.push_str(&format!("Title:     {}\n", task.title));
    out.push_str(&format!(
        "Status:    {}\n",
        if task.done { "done" } else { "open" }
    ));
    out.push_str(&format!(
        "Category:  {} ({})\n",
        task.category,
        task.category.slug()
    ));
    out.push_str(&format!(
        "Priority:  {} ({})\n",
        task.priority,
        task.priority.slug()
    ));
    if let Some(due) = task.due_date {
        out.push_str(&format!("Due:       {due}\n"));
    }
    out.push_str(&format!(
        "Created:   {}\n",
        task.created_at.format(minute_stamp::FORMAT)
    ));
    if let Some(updated) = task.updated_at {
        out.push_str(&format!(
            "Updated:   {}\n",
            updated.format(minute_stamp::FORMAT)
        ));
    }
    if !task.notes.is_empty() {
        out.push_str(&format!("Notes:     {}\n", task.notes));
    }
    out
}

/// `1/4 done (25.0%)`, or a hint when there is nothing to count.
pub fn format_progress(progress: &Progress) -> String {
    match progress.percent() {
        Some(pct) => format!("{}/{} done ({pct:.1}%)", progress.done, progress.total),
        None => "No tasks yet. Add one first.".to_string(),
    }
}

/// Plain percentage for the web endpoint: `42.9%`, or `0` with no tasks.
pub fn format_percent(progress: &Progress) -> String {
    match progress.percent() {
        Some(pct) => format!("{pct:.1}%"),
        None => "0".to_string(),
    }
}
