use chrono::{Datelike, Local, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use tasklet::domain::{Folder, NewTask, Priority, Task, TaskStatus, TaskUpdate, validate_folder_name};
use tasklet::export::{ExportFilter, ExportFormat, export_csv, export_filename, export_json, share_text};
use tasklet::storage::{self, KeyValueStore};
use tasklet::store::TaskStore;
use tasklet::views;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, FolderCommands, TaskCommands};
use cli::parse::{parse_date, parse_month, parse_when, resolve_folder, resolve_task};
use config::Config;

type Store = TaskStore<Box<dyn KeyValueStore>>;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklet")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasklet.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if let (None, Some(level)) = (std::env::var_os("RUST_LOG"), &config.log_level) {
        builder.parse_filters(level);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(cli: &Cli, config: &Config) -> Result<Store> {
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.resolve_data_dir());
    info!("Using data directory {}", data_dir.display());

    let store = TaskStore::new(storage::open_or_unavailable(&data_dir));
    if !store.storage().is_available() {
        eprintln!(
            "{} cannot open {}; changes will not be saved",
            "Warning:".yellow(),
            data_dir.display()
        );
    }
    store.initialize_defaults().context("Failed to initialize default folders")?;
    Ok(store)
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let store = open_store(cli, config)?;

    match &cli.command {
        None => handle_overview(&store),
        Some(Commands::Init) => handle_init(&store),
        Some(Commands::Task { command }) => handle_task_command(command, &store),
        Some(Commands::Folder { command }) => handle_folder_command(command, &store),
        Some(Commands::Today) => handle_today(&store),
        Some(Commands::Upcoming) => handle_upcoming(&store),
        Some(Commands::Day { date }) => handle_day(date, &store),
        Some(Commands::Progress { month }) => handle_progress(month.as_deref(), &store),
        Some(Commands::Stats) => handle_stats(&store),
        Some(Commands::Export {
            format,
            folder,
            exclude_completed,
            output,
        }) => handle_export(format, folder.as_deref(), *exclude_completed, output.as_ref(), &store, config),
        Some(Commands::Share {
            folder,
            exclude_completed,
        }) => handle_share(folder.as_deref(), *exclude_completed, &store, config),
        Some(Commands::Clear { yes }) => handle_clear(*yes, &store),
    }
}

//=== Output helpers ===

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn colored_priority(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.as_str().red(),
        Priority::Medium => priority.as_str().yellow(),
        Priority::Low => priority.as_str().normal(),
    }
}

fn print_task(task: &Task, folders: &[Folder]) {
    let mark = if task.status.is_completed() { "✓".green() } else { "○".normal() };
    let due = task.due_date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let folder = views::folder_name(folders, task.folder_id.as_deref())
        .map(|name| format!(" ({})", name))
        .unwrap_or_default();
    println!(
        "{} {} {}{} - due {} [{}]",
        short_id(&task.id).dimmed(),
        mark,
        task.title,
        folder.cyan(),
        due,
        colored_priority(task.priority)
    );
}

fn print_tasks(heading: &str, tasks: &[&Task], folders: &[Folder]) {
    println!("{}", heading.bold());
    if tasks.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for task in tasks {
        print!("  ");
        print_task(task, folders);
    }
}

fn print_progress(label: &str, progress: &views::Progress) {
    println!(
        "{} {}/{} completed ({}%), {} pending",
        label.bold(),
        progress.completed,
        progress.total,
        progress.completion_rate,
        progress.pending
    );
}

fn export_filter(store: &Store, folder: Option<&str>, exclude_completed: bool) -> Result<ExportFilter> {
    let folder_id = match folder {
        Some(key) => Some(resolve_folder(&store.list_folders()?, key)?.id.clone()),
        None => None,
    };
    Ok(ExportFilter {
        folder_id,
        include_completed: !exclude_completed,
    })
}

//=== Command handlers ===

fn handle_overview(store: &Store) -> Result<()> {
    handle_today(store)?;
    println!();
    handle_upcoming(store)
}

fn handle_init(store: &Store) -> Result<()> {
    let folders = store.list_folders()?;
    println!("{} {} folders ready", "Initialized:".green(), folders.len());
    Ok(())
}

fn handle_task_command(command: &TaskCommands, store: &Store) -> Result<()> {
    info!("Handling task command: {:?}", command);
    match command {
        TaskCommands::Add {
            title,
            due,
            description,
            priority,
            folder,
            reminder,
        } => {
            let mut fields = NewTask::new(title.trim(), parse_when(due)?)
                .description(description.as_str())
                .priority(priority.parse::<Priority>()?);
            if let Some(key) = folder {
                fields = fields.folder(resolve_folder(&store.list_folders()?, key)?.id.as_str());
            }
            if let Some(reminder) = reminder {
                fields = fields.reminder(parse_when(reminder)?);
            }
            fields.validate()?;

            let task = store.add_task(fields)?;
            println!("{} {} ({})", "Added:".green(), task.title, task.id);
        }
        TaskCommands::List { folder, status } => {
            let folders = store.list_folders()?;
            let mut tasks = store.list_tasks()?;
            if let Some(key) = folder {
                let folder_id = resolve_folder(&folders, key)?.id.clone();
                tasks.retain(|t| t.in_folder(&folder_id));
            }
            if let Some(status) = status {
                let status: TaskStatus = status.parse()?;
                tasks.retain(|t| t.status == status);
            }
            let refs: Vec<&Task> = tasks.iter().collect();
            print_tasks("Tasks", &refs, &folders);
        }
        TaskCommands::Show { id } => {
            let tasks = store.list_tasks()?;
            let folders = store.list_folders()?;
            let task = resolve_task(&tasks, id)?;
            println!("{} {}", "Task:".green(), task.title);
            println!("  id:          {}", task.id);
            println!("  status:      {}", task.status);
            println!("  priority:    {}", colored_priority(task.priority));
            println!("  due:         {}", task.due_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            if let Some(reminder) = task.reminder_time {
                println!("  reminder:    {}", reminder.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            }
            println!(
                "  folder:      {}",
                views::folder_name(&folders, task.folder_id.as_deref()).unwrap_or("(none)")
            );
            println!("  created:     {}", task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            if !task.description.is_empty() {
                println!("  description: {}", task.description);
            }
        }
        TaskCommands::Edit {
            id,
            title,
            description,
            due,
            priority,
            folder,
            unfile,
            reminder,
            clear_reminder,
        } => {
            let task_id = resolve_task(&store.list_tasks()?, id)?.id.clone();

            let folder_id = match folder {
                Some(key) => Some(Some(resolve_folder(&store.list_folders()?, key)?.id.clone())),
                None if *unfile => Some(None),
                None => None,
            };
            let reminder_time = match reminder {
                Some(reminder) => Some(Some(parse_when(reminder)?)),
                None if *clear_reminder => Some(None),
                None => None,
            };
            let update = TaskUpdate {
                title: title.as_ref().map(|t| t.trim().to_string()),
                description: description.clone(),
                due_date: due.as_deref().map(parse_when).transpose()?,
                reminder_time,
                folder_id,
                priority: priority.as_deref().map(str::parse::<Priority>).transpose()?,
                status: None,
            };
            if update.is_empty() {
                bail!("Nothing to change; pass at least one field option");
            }
            update.validate()?;

            match store.update_task(&task_id, update)? {
                Some(task) => println!("{} {}", "Updated:".green(), task.title),
                None => println!("{} task {}", "Not found:".red(), id),
            }
        }
        TaskCommands::Complete { id } => {
            set_status(store, id, TaskStatus::Completed)?;
        }
        TaskCommands::Reopen { id } => {
            set_status(store, id, TaskStatus::Pending)?;
        }
        TaskCommands::Delete { id } => {
            let task = resolve_task(&store.list_tasks()?, id)?.clone();
            store.delete_task(&task.id)?;
            println!("{} {}", "Deleted:".red(), task.title);
        }
    }
    Ok(())
}

fn set_status(store: &Store, id: &str, status: TaskStatus) -> Result<()> {
    let task_id = resolve_task(&store.list_tasks()?, id)?.id.clone();
    if let Some(task) = store.update_task(&task_id, TaskUpdate::status(status))? {
        let label = match status {
            TaskStatus::Completed => "Completed:".green(),
            TaskStatus::Pending => "Reopened:".yellow(),
        };
        println!("{} {}", label, task.title);
    }
    Ok(())
}

fn handle_folder_command(command: &FolderCommands, store: &Store) -> Result<()> {
    info!("Handling folder command: {:?}", command);
    match command {
        FolderCommands::Add { name } => {
            validate_folder_name(name)?;
            let folder = store.add_folder(name.trim())?;
            println!("{} {} ({})", "Added folder:".green(), folder.name, folder.id);
        }
        FolderCommands::List => {
            let tasks = store.list_tasks()?;
            println!("{}", "Folders".bold());
            for folder in store.list_folders()? {
                println!(
                    "  {} {} - {} pending",
                    short_id(&folder.id).dimmed(),
                    folder.name,
                    views::pending_count(&tasks, &folder.id)
                );
            }
        }
        FolderCommands::Show { folder } => {
            let folders = store.list_folders()?;
            let tasks = store.list_tasks()?;
            let folder = resolve_folder(&folders, folder)?;
            let detail = views::folder_detail(&tasks, &folder.id);
            println!("{} {}", "Folder:".green(), folder.name);
            print_tasks("Pending", &detail.pending, &folders);
            print_tasks("Completed", &detail.completed, &folders);
        }
        FolderCommands::Delete { folder } => {
            let folder = resolve_folder(&store.list_folders()?, folder)?.clone();
            if folder.is_reserved() {
                bail!("The {} folder cannot be deleted", folder.name);
            }
            store.delete_folder(&folder.id)?;
            println!("{} {}", "Deleted folder:".red(), folder.name);
        }
    }
    Ok(())
}

fn handle_today(store: &Store) -> Result<()> {
    let tasks = store.list_tasks()?;
    let folders = store.list_folders()?;
    let today = views::today_tasks(&tasks, Utc::now(), &Local);
    print_tasks("Today", &today, &folders);
    Ok(())
}

fn handle_upcoming(store: &Store) -> Result<()> {
    let tasks = store.list_tasks()?;
    let folders = store.list_folders()?;
    let upcoming = views::upcoming_tasks(&tasks, Utc::now());
    print_tasks("Upcoming", &upcoming, &folders);
    Ok(())
}

fn handle_day(date: &str, store: &Store) -> Result<()> {
    let date = parse_date(date)?;
    let tasks = store.list_tasks()?;
    let folders = store.list_folders()?;
    let day = views::tasks_for_day(&tasks, date, &Local);
    print_tasks(&date.format("%A %Y-%m-%d").to_string(), &day, &folders);
    Ok(())
}

fn handle_progress(month: Option<&str>, store: &Store) -> Result<()> {
    let tasks = store.list_tasks()?;
    let now = Utc::now();
    let (year, month) = match month {
        Some(month) => parse_month(month)?,
        None => {
            let today = now.with_timezone(&Local);
            (today.year(), today.month())
        }
    };

    let weekly = views::weekly_progress(&tasks, now, &Local);
    let monthly = views::monthly_progress(&tasks, year, month, &Local)?;
    print_progress("This week:", &weekly);
    print_progress(&format!("{}-{:02}:", year, month), &monthly);
    Ok(())
}

fn handle_stats(store: &Store) -> Result<()> {
    let stats = views::stats(&store.list_tasks()?, &store.list_folders()?);
    println!("{} {}", "Tasks:".bold(), stats.tasks);
    println!("{} {}", "Completed:".bold(), stats.completed);
    println!("{} {}", "Folders:".bold(), stats.folders);
    Ok(())
}

fn handle_export(
    format: &str,
    folder: Option<&str>,
    exclude_completed: bool,
    output: Option<&PathBuf>,
    store: &Store,
    config: &Config,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let tasks = store.list_tasks()?;
    let folders = store.list_folders()?;

    let content = match format {
        ExportFormat::Csv => {
            let filter = export_filter(store, folder, exclude_completed)?;
            export_csv(&filter.apply(&tasks), &folders, &config.export.date_format, &Local)
        }
        ExportFormat::Json => export_json(&tasks, &folders, Utc::now())?,
    };

    let path = match output {
        Some(path) => path.clone(),
        None => config
            .export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(export_filename(format, Local::now().date_naive())),
    };
    fs::write(&path, content).with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!("Exported {} to {}", format, path.display());
    println!("{} {}", "Exported:".green(), path.display());
    Ok(())
}

fn handle_share(folder: Option<&str>, exclude_completed: bool, store: &Store, config: &Config) -> Result<()> {
    let filter = export_filter(store, folder, exclude_completed)?;
    let tasks = filter.apply(&store.list_tasks()?);
    println!("{}", share_text(&tasks, &store.list_folders()?, &config.export.date_format, &Local));
    Ok(())
}

fn handle_clear(yes: bool, store: &Store) -> Result<()> {
    if !yes {
        println!("{} this deletes every task and folder. Re-run with --yes to confirm.", "Warning:".yellow());
        return Ok(());
    }
    store.clear_all()?;
    println!("{}", "All data cleared".red());
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let (config, config_warnings) = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(&config).context("Failed to setup logging")?;

    for warning in &config_warnings {
        warn!("{}", warning);
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
