use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::logger::SharedLogger;
use crate::model::{Status, Task};
use crate::repository::{TaskRepository, TaskStore};
use crate::service::sort::{builtin_sort, default_strategies, SortField, SortStrategy};
use crate::validation::{validate_id, validate_task};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AssigneeGroup {
    pub assignee: String,
    pub tasks: Vec<Task>,
}

/// Validation, search, sorting and derived queries on top of a
/// [`TaskRepository`].
pub struct TaskManager<S: TaskStore> {
    repo: TaskRepository<S>,
    logger: SharedLogger,
    strategies: HashMap<&'static str, Box<dyn SortStrategy>>,
}

impl<S: TaskStore> TaskManager<S> {
    pub fn new(repo: TaskRepository<S>, logger: SharedLogger) -> Self {
        let strategies = default_strategies()
            .into_iter()
            .map(|s| (s.name(), s))
            .collect();
        logger.info("TaskManager initialized with sorting strategies");

        Self {
            repo,
            logger,
            strategies,
        }
    }

    /// Registers an extra strategy, replacing any existing one with the same name.
    pub fn with_strategy(mut self, strategy: Box<dyn SortStrategy>) -> Self {
        self.strategies.insert(strategy.name(), strategy);
        self
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn get_all(&self) -> Vec<Task> {
        self.logger.info("Retrieving all tasks");
        self.repo.get_all()
    }

    /// `None` when no task has this id.
    pub fn get_by_id(&self, id: i64) -> Option<Task> {
        self.logger.info(&format!("Retrieving task with ID {}", id));
        match self.repo.get_by_id(id) {
            Ok(task) => Some(task),
            Err(_) => {
                self.logger.warn(&format!("Task with ID {} not found", id));
                None
            }
        }
    }

    /// Smallest id greater than every stored id; 1 for an empty collection.
    pub fn next_id(&self) -> i64 {
        self.repo
            .get_all()
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn add(&mut self, task: Task) -> Result<()> {
        if let Err(e) = validate_task(&task) {
            self.logger.error(&format!("Failed to add task: {}", e));
            return Err(e);
        }

        let (title, id) = (task.title.clone(), task.id);
        self.repo.add(task)?;
        self.logger.info(&format!(
            "Task '{}' added successfully with ID {}",
            title, id
        ));
        Ok(())
    }

    pub fn update(&mut self, task: Task) -> Result<()> {
        if let Err(e) = validate_task(&task) {
            self.logger.error(&format!("Failed to update task: {}", e));
            return Err(e);
        }

        let title = task.title.clone();
        self.repo.update(task).inspect_err(|e| {
            if e.is_not_found() {
                self.logger.error(&format!("Failed to update task: {}", e));
            }
        })?;
        self.logger
            .info(&format!("Task '{}' updated successfully", title));
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        validate_id(id)
            .and_then(|_| self.repo.delete(id))
            .inspect_err(|e| {
                if !matches!(e, Error::Io(_)) {
                    self.logger.error(&format!("Failed to delete task: {}", e));
                }
            })?;
        self.logger
            .info(&format!("Task with ID {} deleted successfully", id));
        Ok(())
    }

    /// Moves a task to `status`, setting or clearing its completion time.
    ///
    /// Field validation is not re-run, so an overdue task can still be
    /// closed.
    pub fn set_status(&mut self, id: i64, status: Status) -> Result<Task> {
        validate_id(id)?;
        let mut task = self.repo.get_by_id(id)?;
        task.update_status(status);
        self.repo.update(task.clone())?;
        self.logger
            .info(&format!("Task with ID {} moved to {}", id, status));
        Ok(task)
    }

    pub fn search(&self, term: &str) -> Vec<Task> {
        self.logger
            .info(&format!("Searching tasks with term: '{}'", term));
        self.repo.search(term)
    }

    /// Same predicate as [`search`](Self::search), applied by walking a
    /// snapshot one task at a time.
    pub fn linear_search(&self, term: &str) -> Vec<Task> {
        self.logger
            .info(&format!("Linear searching tasks with term: '{}'", term));
        let all = self.repo.get_all();

        if term.trim().is_empty() {
            return all;
        }

        let lower = term.to_lowercase();
        let mut results = Vec::new();
        for task in all {
            let hit = task.id.to_string().contains(term)
                || task.title.to_lowercase().contains(&lower)
                || task.assignee.to_lowercase().contains(&lower)
                || task.status.to_string().to_lowercase().contains(&lower);
            if hit {
                results.push(task);
            }
        }
        results
    }

    /// Sorts with a registered strategy. Unknown names log a warning and
    /// return the tasks in insertion order.
    pub fn sort(&self, strategy_name: &str, ascending: bool) -> Vec<Task> {
        let tasks = self.get_all();

        let Some(strategy) = self.strategies.get(strategy_name.to_lowercase().as_str()) else {
            self.logger.warn(&format!(
                "Sorting strategy '{}' not found. Returning unsorted tasks.",
                strategy_name
            ));
            return tasks;
        };

        self.logger.info(&format!(
            "Sorting {} tasks by {} in {} order",
            tasks.len(),
            strategy_name,
            direction(ascending)
        ));
        strategy.sort(&tasks, ascending)
    }

    /// Library-sort counterpart to [`sort`](Self::sort); also accepts
    /// `createddate`. Unknown keys return insertion order.
    pub fn builtin_sort(&self, sort_by: &str, ascending: bool) -> Vec<Task> {
        let mut tasks = self.get_all();
        self.logger.info(&format!(
            "Built-in sorting {} tasks by {} in {} order",
            tasks.len(),
            sort_by,
            direction(ascending)
        ));

        match sort_by.parse::<SortField>() {
            Ok(field) => builtin_sort(&mut tasks, field, ascending),
            Err(_) => self.logger.warn(&format!(
                "Sort field '{}' not recognised. Returning unsorted tasks.",
                sort_by
            )),
        }
        tasks
    }

    pub fn overdue_tasks(&self) -> Vec<Task> {
        self.overdue_tasks_at(Utc::now())
    }

    pub fn overdue_tasks_at(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.logger.info("Retrieving overdue tasks");
        self.repo
            .get_all()
            .into_iter()
            .filter(|t| t.is_overdue_at(now))
            .collect()
    }

    /// Groups are ordered by the first appearance of each assignee.
    pub fn tasks_by_assignee(&self) -> Vec<AssigneeGroup> {
        self.logger.info("Retrieving tasks grouped by assignee");
        let mut groups: Vec<AssigneeGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for task in self.repo.get_all() {
            match index.get(&task.assignee).copied() {
                Some(i) => groups[i].tasks.push(task),
                None => {
                    index.insert(task.assignee.clone(), groups.len());
                    groups.push(AssigneeGroup {
                        assignee: task.assignee.clone(),
                        tasks: vec![task],
                    });
                }
            }
        }
        groups
    }

    pub fn upcoming_deadlines(&self, days: i64) -> Vec<Task> {
        self.upcoming_deadlines_at(days, Utc::now())
    }

    /// Open tasks due in `[now, now + days]`. A window reaching past the
    /// representable date range has no upper bound.
    pub fn upcoming_deadlines_at(&self, days: i64, now: DateTime<Utc>) -> Vec<Task> {
        self.logger.info(&format!(
            "Retrieving tasks with deadlines in the next {} days",
            days
        ));
        let cutoff = Duration::try_days(days).and_then(|span| now.checked_add_signed(span));
        self.repo
            .get_all()
            .into_iter()
            .filter(|t| {
                t.status != Status::Done
                    && t.due_date
                        .is_some_and(|due| due >= now && cutoff.map_or(true, |c| due <= c))
            })
            .collect()
    }
}

fn direction(ascending: bool) -> &'static str {
    if ascending {
        "ascending"
    } else {
        "descending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use crate::model::Priority;
    use crate::repository::InMemoryTaskStore;
    use crate::test_support::{date, task, FlakyStore, Level, RecordingLogger};
    use std::sync::Arc;

    fn manager_with(tasks: Vec<Task>) -> TaskManager<InMemoryTaskStore> {
        let logger = NullLogger::shared();
        let repo = TaskRepository::new(InMemoryTaskStore::with_tasks(tasks), logger.clone());
        TaskManager::new(repo, logger)
    }

    fn recorded(tasks: Vec<Task>) -> (TaskManager<InMemoryTaskStore>, Arc<RecordingLogger>) {
        let logger = RecordingLogger::shared();
        let repo = TaskRepository::new(InMemoryTaskStore::with_tasks(tasks), logger.clone());
        (TaskManager::new(repo, logger.clone()), logger)
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, "Design schema", "Alice", Priority::Medium),
            task(2, "Write migrations", "bob", Priority::High),
            task(3, "Review schema", "Alice", Priority::Low),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_add_valid_task() {
        let mut manager = manager_with(vec![]);
        let new_task = task(1, "Set up CI", "carol", Priority::High);

        manager.add(new_task.clone()).unwrap();

        assert_eq!(manager.get_by_id(1), Some(new_task));
        assert_eq!(manager.repository().store().save_count(), 1);
    }

    #[test]
    fn test_add_invalid_task_never_touches_repository() {
        let (mut manager, logger) = recorded(vec![]);
        let mut bad = task(1, "", "carol", Priority::High);
        bad.title = " ".to_string();

        let err = manager.add(bad).unwrap_err();

        assert!(matches!(err, Error::InvalidTaskData(_)));
        assert!(manager.get_all().is_empty());
        assert_eq!(manager.repository().store().save_count(), 0);
        assert!(logger.has(Level::Error, "Failed to add task"));
    }

    #[test]
    fn test_add_past_due_rejected() {
        let mut manager = manager_with(vec![]);
        let mut late = task(1, "Late", "carol", Priority::High);
        late.due_date = Some(date(2020, 1, 1));

        assert!(matches!(manager.add(late), Err(Error::InvalidTaskData(_))));
    }

    #[test]
    fn test_get_by_id_missing_is_none() {
        let (manager, logger) = recorded(fixture());
        assert!(manager.get_by_id(42).is_none());
        assert!(logger.has(Level::Warn, "Task with ID 42 not found"));
    }

    #[test]
    fn test_update_unknown_id_propagates_not_found() {
        let mut manager = manager_with(fixture());
        let before = manager.get_all();

        let result = manager.update(task(9, "Nope", "zed", Priority::Low));

        assert!(matches!(result, Err(Error::TaskNotFound(9))));
        assert_eq!(manager.get_all(), before);
    }

    #[test]
    fn test_update_validates_first() {
        let mut manager = manager_with(fixture());
        let mut changed = manager.get_by_id(2).unwrap();
        changed.assignee.clear();

        assert!(matches!(manager.update(changed), Err(Error::InvalidTaskData(_))));
        assert_eq!(manager.get_by_id(2).unwrap().assignee, "bob");
    }

    #[test]
    fn test_update_existing() {
        let mut manager = manager_with(fixture());
        let mut changed = manager.get_by_id(2).unwrap();
        changed.priority = Priority::Low;

        manager.update(changed).unwrap();

        assert_eq!(manager.get_by_id(2).unwrap().priority, Priority::Low);
    }

    #[test]
    fn test_delete_validates_id() {
        let mut manager = manager_with(fixture());
        assert!(matches!(manager.delete(0), Err(Error::InvalidTaskData(_))));
        assert!(matches!(manager.delete(-3), Err(Error::InvalidTaskData(_))));
        assert_eq!(manager.get_all().len(), 3);
    }

    #[test]
    fn test_delete_then_lookup() {
        let mut manager = manager_with(fixture());
        manager.delete(1).unwrap();
        assert!(manager.get_by_id(1).is_none());
        assert!(matches!(manager.delete(1), Err(Error::TaskNotFound(1))));
    }

    #[test]
    fn test_delete_persistence_failure_propagates() {
        let logger = NullLogger::shared();
        let store = FlakyStore {
            initial: fixture(),
            ..Default::default()
        };
        let mut manager = TaskManager::new(TaskRepository::new(store, logger.clone()), logger);
        manager.repository().store().fail_save.set(true);

        assert!(matches!(manager.delete(1), Err(Error::Io(_))));
    }

    #[test]
    fn test_set_status_maintains_completed_date() {
        let mut manager = manager_with(fixture());

        let done = manager.set_status(2, Status::Done).unwrap();
        assert!(done.completed_date.is_some());
        assert!(manager.get_by_id(2).unwrap().completed_date.is_some());

        let reopened = manager.set_status(2, Status::InProgress).unwrap();
        assert!(reopened.completed_date.is_none());

        assert!(matches!(manager.set_status(50, Status::Done), Err(Error::TaskNotFound(50))));
    }

    #[test]
    fn test_set_status_allows_closing_overdue_task() {
        let mut overdue = task(1, "Old", "amy", Priority::Low);
        overdue.due_date = Some(date(2020, 1, 1));
        let mut manager = manager_with(vec![overdue]);

        assert!(manager.set_status(1, Status::Done).is_ok());
    }

    #[test]
    fn test_next_id() {
        assert_eq!(manager_with(vec![]).next_id(), 1);
        let mut tasks = fixture();
        tasks[1].id = 10;
        assert_eq!(manager_with(tasks).next_id(), 11);
    }

    #[test]
    fn test_linear_search_blank_returns_all_in_order() {
        let manager = manager_with(fixture());
        assert_eq!(manager.linear_search(""), manager.get_all());
    }

    #[test]
    fn test_linear_search_agrees_with_search() {
        let manager = manager_with(fixture());
        for term in ["schema", "ALICE", "2", "todo", "done", "missing", "  "] {
            assert_eq!(manager.linear_search(term), manager.search(term), "term {:?}", term);
        }
        assert_eq!(ids(&manager.linear_search("schema")), vec![1, 3]);
    }

    #[test]
    fn test_sort_by_named_strategy() {
        let mut tasks = fixture();
        tasks[0].due_date = Some(date(2023, 12, 31));
        tasks[1].due_date = Some(date(2023, 10, 15));
        tasks[2].due_date = Some(date(2023, 11, 20));
        let manager = manager_with(tasks);

        assert_eq!(ids(&manager.sort("duedate", true)), vec![2, 3, 1]);
        assert_eq!(ids(&manager.sort("DueDate", false)), vec![1, 3, 2]);
        assert_eq!(ids(&manager.sort("priority", false)), vec![2, 1, 3]);
        assert_eq!(ids(&manager.sort("assignee", true)), vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_unknown_strategy_returns_insertion_order() {
        let (manager, logger) = recorded(fixture());
        assert_eq!(ids(&manager.sort("colour", true)), vec![1, 2, 3]);
        assert!(logger.has(Level::Warn, "Sorting strategy 'colour' not found"));
    }

    #[test]
    fn test_builtin_sort_invalid_field_is_unsorted() {
        let manager = manager_with(fixture());
        let sorted = manager.builtin_sort("invalidfield", true);
        assert_eq!(sorted.len(), 3);
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }

    #[test]
    fn test_builtin_sort_priority_and_created() {
        let mut tasks = fixture();
        tasks[0].created_date = date(2026, 1, 3);
        tasks[1].created_date = date(2026, 1, 1);
        tasks[2].created_date = date(2026, 1, 2);
        let manager = manager_with(tasks);

        assert_eq!(ids(&manager.builtin_sort("PRIORITY", false)), vec![2, 1, 3]);
        assert_eq!(ids(&manager.builtin_sort("createddate", true)), vec![2, 3, 1]);
    }

    #[test]
    fn test_custom_strategy_registration() {
        struct ById;
        impl SortStrategy for ById {
            fn name(&self) -> &'static str {
                "id"
            }
            fn sort(&self, tasks: &[Task], ascending: bool) -> Vec<Task> {
                let mut out = tasks.to_vec();
                out.sort_by_key(|t| t.id);
                if !ascending {
                    out.reverse();
                }
                out
            }
        }

        let manager = manager_with(fixture()).with_strategy(Box::new(ById));
        assert_eq!(ids(&manager.sort("id", false)), vec![3, 2, 1]);
        assert_eq!(manager.strategy_names(), vec!["assignee", "duedate", "id", "priority"]);
    }

    #[test]
    fn test_overdue_tasks_excludes_done_and_future() {
        let now = date(2026, 6, 1);
        let mut tasks = fixture();
        tasks[0].due_date = Some(now - Duration::hours(1));
        tasks[1].due_date = Some(now - Duration::days(2));
        tasks[1].update_status(Status::Done);
        tasks[2].due_date = Some(now + Duration::hours(1));
        let manager = manager_with(tasks);

        assert_eq!(ids(&manager.overdue_tasks_at(now)), vec![1]);
    }

    #[test]
    fn test_tasks_by_assignee_groups_in_first_appearance_order() {
        let manager = manager_with(fixture());
        let groups = manager.tasks_by_assignee();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].assignee, "Alice");
        assert_eq!(ids(&groups[0].tasks), vec![1, 3]);
        assert_eq!(groups[1].assignee, "bob");
        assert_eq!(ids(&groups[1].tasks), vec![2]);
    }

    #[test]
    fn test_upcoming_deadlines_window_is_inclusive() {
        let now = date(2026, 6, 1);
        let mut tasks = fixture();
        tasks[0].due_date = Some(now + Duration::days(7));
        tasks[1].due_date = Some(now + Duration::days(3));
        tasks[1].update_status(Status::Done);
        tasks[2].due_date = Some(now + Duration::days(7) + Duration::seconds(1));
        let mut past = task(4, "Past", "dan", Priority::Low);
        past.due_date = Some(now - Duration::seconds(1));
        tasks.push(past);
        let manager = manager_with(tasks);

        assert_eq!(ids(&manager.upcoming_deadlines_at(7, now)), vec![1]);
        assert!(manager.upcoming_deadlines_at(0, now).is_empty());
    }

    #[test]
    fn test_upcoming_deadlines_huge_window_has_no_upper_bound() {
        let now = date(2026, 6, 1);
        let mut tasks = fixture();
        tasks[0].due_date = Some(now + Duration::days(3650));
        tasks[1].due_date = Some(now - Duration::days(1));
        tasks[2].due_date = Some(now + Duration::days(1));
        let manager = manager_with(tasks);

        assert_eq!(ids(&manager.upcoming_deadlines_at(i64::MAX, now)), vec![1, 3]);
        assert_eq!(ids(&manager.upcoming_deadlines_at(1_000_000_000, now)), vec![1, 3]);
    }
}
