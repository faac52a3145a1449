use chrono::{DateTime, Local};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use tasktrack_core::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        TaskRow {
            id: task.id,
            title: task.title.clone(),
            due: format_due(task),
            priority: task.priority.label().to_string(),
            status: task.status.label().to_string(),
            assignee: task.assignee.clone(),
        }
    }
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_detail(task: &Task) -> String {
    let mut lines = vec![
        format!("ID:          {}", task.id),
        format!("Title:       {}", task.title),
        format!("Assignee:    {}", task.assignee),
        format!("Priority:    {}", task.priority.label()),
        format!("Status:      {}", task.status.label()),
        format!("Due:         {}", format_due(task)),
        format!("Created:     {}", local_timestamp(task.created_date)),
    ];
    if let Some(done) = task.completed_date {
        lines.push(format!("Completed:   {}", local_timestamp(done)));
    }
    if task.is_overdue() {
        lines.push("             (overdue)".to_string());
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push(task.description.clone());
    }
    lines.join("\n")
}

fn format_due(task: &Task) -> String {
    task.due_date
        .map(|due| DateTime::<Local>::from(due).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn local_timestamp(at: DateTime<chrono::Utc>) -> String {
    DateTime::<Local>::from(at).format("%Y-%m-%d %H:%M").to_string()
}
