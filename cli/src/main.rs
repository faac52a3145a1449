mod report;
mod table;
mod tui;

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use tasktrack_core::{
    open_file_manager, Config, JsonFileStore, Status, TaskEdit, TaskManager, TracingLogger,
    validate_id,
};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "A single-user task tracker", long_about = None)]
struct Cli {
    /// Directory holding tasks.json and activity_log.txt (default: ~/.tasktrack)
    #[arg(long, global = true, env = "TASKTRACK_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add Write report due:fri assignee:kim pri:h)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List tasks, optionally sorted
    List {
        /// duedate, priority or assignee (createddate too with --builtin)
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Use the library sort instead of the named strategy
        #[arg(long)]
        builtin: bool,
    },
    /// Show one task in full
    Show { id: i64 },
    /// Change fields of a task (usage: update 3 New title due:+2d)
    Update {
        id: i64,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Move a task to todo, inprogress or done
    Status { id: i64, status: String },
    /// Delete a task after a y/N prompt
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search by id, title, assignee or status
    Search {
        #[arg(default_value = "")]
        term: String,
        /// Use the linear scan instead of the repository search
        #[arg(long)]
        linear: bool,
    },
    /// List open tasks past their due time
    Overdue,
    /// List tasks grouped by assignee
    Assignees,
    /// List open tasks due within the next N days
    Upcoming {
        #[arg(long)]
        days: Option<i64>,
    },
    /// Print a text report
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
        #[arg(long)]
        days: Option<i64>,
    },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Overdue,
    Assignee,
    Upcoming,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.clone())?;

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_tracing(&config, interactive);

    let mut manager = open_file_manager(&config, TracingLogger::shared());

    match cli.command {
        Some(Commands::Add { args }) => {
            let task = TaskEdit::parse(&args)?.into_task(manager.next_id());
            let (id, title) = (task.id, task.title.clone());
            manager.add(task)?;
            println!("Task '{}' created successfully with ID {}!", title, id);
        }
        Some(Commands::List { sort, desc, builtin }) => {
            let tasks = match sort {
                Some(key) if builtin => manager.builtin_sort(&key, !desc),
                Some(name) => manager.sort(&name, !desc),
                None => manager.get_all(),
            };
            println!("{}", table::render_tasks(&tasks));
        }
        Some(Commands::Show { id }) => {
            let task = find(&manager, id)?;
            println!("{}", table::render_detail(&task));
        }
        Some(Commands::Update { id, args }) => {
            let mut task = find(&manager, id)?;
            TaskEdit::parse(&args)?.apply(&mut task);
            manager.update(task)?;
            println!("Task {} updated successfully!", id);
        }
        Some(Commands::Status { id, status }) => {
            let status: Status = status.parse()?;
            let task = manager.set_status(id, status)?;
            println!("Task {} is now {}", task.id, task.status.label());
        }
        Some(Commands::Delete { id, yes }) => {
            validate_id(id)?;
            let task = find(&manager, id)?;
            if !yes && !confirm(&format!("Are you sure you want to delete task '{}'? (y/N)", task.title))? {
                println!("Task deletion cancelled.");
                return Ok(());
            }
            manager.delete(id)?;
            println!("Task '{}' deleted successfully!", task.title);
        }
        Some(Commands::Search { term, linear }) => {
            let tasks = if linear {
                manager.linear_search(&term)
            } else {
                manager.search(&term)
            };
            println!("{}", table::render_tasks(&tasks));
        }
        Some(Commands::Overdue) => {
            println!("{}", table::render_tasks(&manager.overdue_tasks()));
        }
        Some(Commands::Assignees) => {
            let groups = manager.tasks_by_assignee();
            if groups.is_empty() {
                println!("No tasks found.");
            }
            for group in groups {
                println!("{} ({})", group.assignee, group.tasks.len());
                println!("{}", table::render_tasks(&group.tasks));
            }
        }
        Some(Commands::Upcoming { days }) => {
            let days = days.unwrap_or(config.upcoming_days);
            println!("{}", table::render_tasks(&manager.upcoming_deadlines(days)));
        }
        Some(Commands::Report { kind, days }) => {
            let now = Local::now();
            let text = match kind {
                ReportKind::Overdue => report::overdue_report(&manager.overdue_tasks(), now),
                ReportKind::Assignee => report::assignee_report(&manager.tasks_by_assignee(), now),
                ReportKind::Upcoming => {
                    let days = days.unwrap_or(config.upcoming_days);
                    report::upcoming_report(&manager.upcoming_deadlines(days), days, now)
                }
            };
            println!("{}", text);
        }
        Some(Commands::Tui) | None => {
            tui::run(manager)?;
        }
    }
    Ok(())
}

fn find(manager: &TaskManager<JsonFileStore>, id: i64) -> Result<tasktrack_core::Task> {
    manager
        .get_by_id(id)
        .ok_or_else(|| anyhow!("Task with ID {} not found.", id))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Stderr follows `RUST_LOG` (default `warn`, silenced while the TUI owns the
/// terminal). Everything at `info` and above also goes to the activity log.
fn init_tracing(config: &Config, interactive: bool) {
    let stderr_filter = if interactive {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_filter(stderr_filter);

    let activity_layer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.activity_log)
        .ok()
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO)
        });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(activity_layer)
        .init();
}
