use std::collections::HashSet;

use ratatui::widgets::TableState;
use tasktrack_core::{TaskEdit, Task, TaskManager, TaskStore};

pub enum InputMode {
    Normal,
    Adding,
    Searching,
    /// Waiting for y/N before deleting the task with this id.
    ConfirmDelete(i64),
}

pub struct App<S: TaskStore> {
    pub manager: TaskManager<S>,
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    /// Index into `manager.strategy_names()`; `None` keeps insertion order.
    pub sort_index: Option<usize>,
    pub ascending: bool,
    pub filter: String,
    pub message: Option<String>,
}

impl<S: TaskStore> App<S> {
    pub fn new(manager: TaskManager<S>) -> App<S> {
        let mut app = App {
            manager,
            tasks: Vec::new(),
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            sort_index: None,
            ascending: true,
            filter: String::new(),
            message: None,
        };
        app.reload_tasks();
        app
    }

    pub fn sort_label(&self) -> String {
        match self.current_strategy() {
            Some(name) => format!("{} {}", name, if self.ascending { "asc" } else { "desc" }),
            None => "added".to_string(),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// ToDo -> InProgress -> Done -> ToDo on the selected task.
    pub fn advance_status(&mut self) {
        let Some((id, status)) = self.selected_task().map(|t| (t.id, t.status.next())) else {
            return;
        };
        match self.manager.set_status(id, status) {
            Ok(task) => self.message = Some(format!("Task {} is now {}", task.id, task.status.label())),
            Err(e) => self.message = Some(e.to_string()),
        }
        self.reload_tasks();
    }

    pub fn request_delete(&mut self) {
        let Some((id, title)) = self.selected_task().map(|t| (t.id, t.title.clone())) else {
            return;
        };
        self.input_mode = InputMode::ConfirmDelete(id);
        self.message = Some(format!("Are you sure you want to delete task '{}'? (y/N)", title));
    }

    /// Deletes the pending task on `y`; any other answer cancels.
    pub fn answer_delete(&mut self, confirmed: bool) {
        let InputMode::ConfirmDelete(id) = self.input_mode else {
            return;
        };
        self.input_mode = InputMode::Normal;
        if !confirmed {
            self.message = Some("Task deletion cancelled.".to_string());
            return;
        }
        match self.manager.delete(id) {
            Ok(()) => self.message = Some(format!("Task {} deleted", id)),
            Err(e) => self.message = Some(e.to_string()),
        }
        self.reload_tasks();
    }

    /// Steps through the registered strategies, then back to insertion order.
    pub fn cycle_sort(&mut self) {
        let count = self.manager.strategy_names().len();
        self.sort_index = match self.sort_index {
            None if count > 0 => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            _ => None,
        };
        self.reload_tasks();
    }

    pub fn toggle_direction(&mut self) {
        self.ascending = !self.ascending;
        self.reload_tasks();
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input = self.filter.clone();
        self.cursor_position = self.input.chars().count();
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Searching => self.submit_search(),
            InputMode::Normal | InputMode::ConfirmDelete(_) => {}
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let args: Vec<String> = self.input.split_whitespace().map(String::from).collect();
        let result = TaskEdit::parse(&args)
            .map(|edit| edit.into_task(self.manager.next_id()))
            .and_then(|task| {
                let id = task.id;
                self.manager.add(task).map(|_| id)
            });

        match result {
            Ok(id) => {
                self.message = Some(format!("Task {} created", id));
                self.reload_tasks();
                if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
                    self.state.select(Some(pos));
                }
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn submit_search(&mut self) {
        self.filter = self.input.trim().to_string();
        self.reload_tasks();
        self.message = Some(format!("{} matching tasks", self.tasks.len()));
    }

    fn current_strategy(&self) -> Option<&'static str> {
        self.sort_index
            .and_then(|i| self.manager.strategy_names().get(i).copied())
    }

    fn reload_tasks(&mut self) {
        let mut tasks = match self.current_strategy() {
            Some(name) => self.manager.sort(name, self.ascending),
            None => self.manager.get_all(),
        };
        if !self.filter.is_empty() {
            let hits: HashSet<i64> = self.manager.search(&self.filter).iter().map(|t| t.id).collect();
            tasks.retain(|t| hits.contains(&t.id));
        }
        self.tasks = tasks;

        let selected = match self.state.selected() {
            _ if self.tasks.is_empty() => None,
            Some(i) => Some(i.min(self.tasks.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }
}
