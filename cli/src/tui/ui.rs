use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use tasktrack_core::{Priority, Status, Task, TaskStore};

use crate::tui::app::{App, InputMode};

const HELP: &str = "j/k: Move | space: Status | a: Add | d: Delete | /: Search | s: Sort | r: Reverse | q: Quit";

pub fn draw<S: TaskStore>(f: &mut Frame, app: &mut App<S>) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    let mut title = format!("TASKTRACK  ·  sort: {}", app.sort_label());
    if !app.filter.is_empty() {
        title.push_str(&format!("  ·  filter: {}", app.filter));
    }
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    draw_task_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_footer(f, app, main_chunks[2]);
}

fn draw_task_list<S: TaskStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|task| {
            let status_icon = match task.status {
                Status::ToDo => "☐",
                Status::InProgress => "◐",
                Status::Done => "✔",
            };
            let (pri_str, priority_style) = match task.priority {
                Priority::High => ("H", Style::default().fg(Color::Red)),
                Priority::Medium => ("M", Style::default().fg(Color::Yellow)),
                Priority::Low => ("L", Style::default().fg(Color::Green)),
            };
            let due_style = if task.is_overdue() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::raw(status_icon),
                Span::styled(pri_str, priority_style),
                Span::styled(short_due(task), due_style),
                Span::raw(task.assignee.clone()),
                Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Priority
            Constraint::Length(6),  // Due
            Constraint::Length(12), // Assignee
            Constraint::Min(10),    // Title
        ],
    )
    .header(Row::new(vec!["St", "Pr", "Due", "Assignee", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Tasks ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view<S: TaskStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);

    let Some(task) = app.selected_task() else {
        f.render_widget(block, area);
        return;
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Blue));
    let mut detail_text = vec![
        Line::from(vec![
            label("Title: "),
            Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.to_string()),
        ]),
        Line::from(vec![label("Status: "), Span::raw(task.status.label())]),
        Line::from(vec![label("Priority: "), Span::raw(task.priority.label())]),
        Line::from(vec![label("Assignee: "), Span::raw(task.assignee.as_str())]),
        Line::from(vec![label("Due: "), Span::raw(long_due(task))]),
        Line::from(vec![label("Created: "), Span::raw(local(task.created_date))]),
    ];
    if let Some(done) = task.completed_date {
        detail_text.push(Line::from(vec![label("Completed: "), Span::raw(local(done))]));
    }
    if !task.description.is_empty() {
        detail_text.push(Line::from(""));
        detail_text.push(Line::from(label("Description:")));
        detail_text.push(Line::from(task.description.as_str()));
    }

    let detail = Paragraph::new(detail_text).block(block).wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_footer<S: TaskStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let prompt = match app.input_mode {
        InputMode::Adding => Some("add> "),
        InputMode::Searching => Some("search> "),
        InputMode::Normal | InputMode::ConfirmDelete(_) => None,
    };

    match prompt {
        Some(prompt) => {
            let line = Paragraph::new(format!("{}{}", prompt, app.input))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(line, area);
            let x = cursor_x(area, prompt.chars().count() + app.cursor_position);
            f.set_cursor_position((x, area.y));
        }
        None => {
            let text = app.message.as_deref().unwrap_or(HELP);
            let footer = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(footer, area);
        }
    }
}

/// Column for the input cursor, kept inside `area`.
fn cursor_x(area: Rect, offset: usize) -> u16 {
    let last = area.width.saturating_sub(1);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX).min(last);
    area.x.saturating_add(offset)
}

fn short_due(task: &Task) -> String {
    task.due_date
        .map(|d| DateTime::<Local>::from(d).format("%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn long_due(task: &Task) -> String {
    task.due_date.map(local).unwrap_or_else(|| "None".to_string())
}

fn local(at: DateTime<chrono::Utc>) -> String {
    DateTime::<Local>::from(at).format("%Y-%m-%d %H:%M").to_string()
}
