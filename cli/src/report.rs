use chrono::{DateTime, Local};
use tasktrack_core::{AssigneeGroup, Task};
use tracing::info;

const RULE: &str = "----------------------------------------";

pub fn overdue_report(tasks: &[Task], now: DateTime<Local>) -> String {
    info!("Generating overdue tasks report");
    if tasks.is_empty() {
        return "No overdue tasks found.".to_string();
    }

    let mut lines = vec![
        "=== OVERDUE TASKS REPORT ===".to_string(),
        generated_on(now),
        format!("Total overdue tasks: {}", tasks.len()),
        String::new(),
        "Overdue Tasks:".to_string(),
        RULE.to_string(),
    ];
    for task in tasks {
        let days = task.due_date.map(|due| (now.to_utc() - due).num_days()).unwrap_or(0);
        push_task_block(&mut lines, task);
        lines.push(format!("Days Overdue: {}", days));
        lines.push(RULE.to_string());
    }
    lines.join("\n")
}

pub fn assignee_report(groups: &[AssigneeGroup], now: DateTime<Local>) -> String {
    info!("Generating tasks by assignee report");
    if groups.is_empty() {
        return "No tasks found.".to_string();
    }

    let mut lines = vec![
        "=== TASKS BY ASSIGNEE REPORT ===".to_string(),
        generated_on(now),
        String::new(),
    ];
    for group in groups {
        lines.push(format!("Assignee: {}", group.assignee));
        lines.push(format!("Task Count: {}", group.tasks.len()));
        lines.push("Tasks:".to_string());
        for task in &group.tasks {
            lines.push(format!(
                "  - ID: {}, Title: {}, Status: {}, Due: {}",
                task.id,
                task.title,
                task.status,
                due_day(task)
            ));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Tasks are listed soonest first regardless of the order they arrive in.
pub fn upcoming_report(tasks: &[Task], days: i64, now: DateTime<Local>) -> String {
    info!("Generating upcoming deadlines report for next {} days", days);
    if tasks.is_empty() {
        return format!("No upcoming deadlines found within the next {} days.", days);
    }

    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| t.due_date);

    let mut lines = vec![
        "=== UPCOMING DEADLINES REPORT ===".to_string(),
        generated_on(now),
        format!("Next {} days", days),
        format!("Total upcoming tasks: {}", sorted.len()),
        String::new(),
        "Upcoming Tasks:".to_string(),
        RULE.to_string(),
    ];
    for task in &sorted {
        let days_left = task.due_date.map(|due| (due - now.to_utc()).num_days()).unwrap_or(0);
        push_task_block(&mut lines, task);
        lines.push(format!("Days Until Due: {}", days_left));
        lines.push(RULE.to_string());
    }
    lines.join("\n")
}

fn push_task_block(lines: &mut Vec<String>, task: &Task) {
    lines.push(format!("ID: {}", task.id));
    lines.push(format!("Title: {}", task.title));
    lines.push(format!("Assignee: {}", task.assignee));
    lines.push(format!("Due Date: {}", due_day(task)));
}

fn generated_on(now: DateTime<Local>) -> String {
    format!("Generated on: {}", now.format("%Y-%m-%d %H:%M:%S"))
}

fn due_day(task: &Task) -> String {
    task.due_date
        .map(|due| DateTime::<Local>::from(due).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
