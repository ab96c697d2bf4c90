mod config;
mod db;
mod error;
mod logging;
mod models;
mod operations;
mod stores;

use clap::Parser;
use config::AppConfig;
use db::kv_store::{KeyValueStore, MemoryStore, SqliteStore};
use error::Error;
use models::goal::PROGRESS_STEP;
use operations::add::{ADD_FORMAT_HINT, parse_iso_date, parse_transaction_draft};
use operations::analytics::{self, TransactionFilter};
use operations::{dashboard, export, import, report};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stores::goal_store::GoalStore;
use stores::habit_store::HabitStore;
use stores::transaction_store::TransactionStore;

const HELP: &str = "\
Commands:
  add [details]                 add a transaction (date, description, amount, type, category)
  remove <id>                   remove a transaction
  list [all|income|expense]     list transactions, newest first
  totals                        income, expenses and balance
  categories                    expenses by category
  monthly                       income and expenses for the last six months
  balance                       running balance for the last six months
  export [dir]                  write the transactions to a CSV file
  import <file>                 import transactions from a CSV export
  dashboard                     open the interactive dashboard
  habit add|toggle <id>|remove <id>|reset|list
  goal add|toggle <id>|progress <id> [+|-]|remove <id>|list
  help                          show this help
  exit                          quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommands {
    Add,
    Remove,
    List,
    Totals,
    Categories,
    Monthly,
    Balance,
    Export,
    Import,
    Dashboard,
    Habit,
    Goal,
    Help,
    Exit,
    Unknown,
}

struct Session<S: KeyValueStore> {
    transactions: TransactionStore<S>,
    habits: HabitStore<S>,
    goals: GoalStore<S>,
    export_dir: PathBuf,
}

impl<S: KeyValueStore + Copy> Session<S> {
    fn load(store: S, export_dir: PathBuf) -> Self {
        Self {
            transactions: TransactionStore::load(store),
            habits: HabitStore::load(store),
            goals: GoalStore::load(store),
            export_dir,
        }
    }
}

fn main() -> ExitCode {
    let config = AppConfig::parse();

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Failed to open log file: {}. Logging to stderr instead.", e);
        let fallback = AppConfig {
            log_file: None,
            ..config.clone()
        };
        match logging::init_logging(&fallback) {
            Ok(()) => tracing::warn!("Log file unavailable, logging to stderr"),
            Err(e) => eprintln!("Failed to set up logging: {}", e),
        }
    }

    if config.in_memory {
        tracing::info!("Using in-memory store, nothing will be saved");
        let kv = MemoryStore::new();
        run_session(&kv, &config);
        return ExitCode::SUCCESS;
    }

    match db::connection::establish_connection(&config.data_path) {
        Ok(conn) => {
            tracing::info!("Opened data store {}", config.data_path.display());
            let kv = SqliteStore::new(conn);
            run_session(&kv, &config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to open data store {}: {e}", config.data_path.display());
            eprintln!(
                "Failed to open data store '{}': {}",
                config.data_path.display(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

fn run_session<S: KeyValueStore>(kv: &S, config: &AppConfig) {
    let mut session = Session::load(kv, config.export_dir.clone());

    println!("Welcome to the pocket tracker! Type 'help' for the list of commands.");
    loop {
        print!("> ");
        // A failed flush only affects the prompt.
        let _ = io::stdout().flush();

        let input = match read_user_input() {
            Ok(Some(input)) => input,
            Ok(None) => break,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };

        let today = chrono::Local::now().date_naive();
        match execute(&mut session, &input, today) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    if session.transactions.has_unsaved_changes()
        || session.habits.has_unsaved_changes()
        || session.goals.has_unsaved_changes()
    {
        println!("Warning: some changes could not be saved. See the log for details.");
    }
    println!("Exiting the application.");
}

/// Runs one line of input. Returns `false` when the session should end.
fn execute<S: KeyValueStore>(
    session: &mut Session<S>,
    input: &str,
    today: chrono::NaiveDate,
) -> Result<bool, Error> {
    let input = input.trim();
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    if command.is_empty() {
        return Ok(true);
    }
    let args: Vec<&str> = rest.split_whitespace().collect();

    match check_for_command(command) {
        UserCommands::Add => {
            let details = if rest.is_empty() {
                prompt(&format!("Enter transaction details:\n{}", ADD_FORMAT_HINT))?
            } else {
                rest.to_string()
            };
            let draft = parse_transaction_draft(&details, today)?;
            let transaction = session.transactions.add(draft)?;
            println!("Transaction added:\n{}", report::transaction_line(&transaction));
        }
        UserCommands::Remove => {
            let id = required_arg(&args, 0, "transaction ID")?;
            let existed = session.transactions.get(id).is_some();
            session.transactions.remove(id);
            if existed {
                println!("Transaction removed successfully.");
            } else {
                println!("No transaction with ID '{}'.", id);
            }
        }
        UserCommands::List => {
            let filter = rest.parse::<TransactionFilter>().map_err(Error::InvalidInput)?;
            let view = analytics::filtered_view(session.transactions.list(), filter);
            if view.is_empty() {
                println!("No transactions found");
            }
            for transaction in view {
                println!("{}", report::transaction_line(transaction));
            }
        }
        UserCommands::Totals => {
            println!("{}", report::totals_report(&analytics::totals(session.transactions.list())));
        }
        UserCommands::Categories => {
            let breakdown = analytics::category_breakdown(session.transactions.list());
            println!("{}", report::category_report(&breakdown));
        }
        UserCommands::Monthly => {
            let series = analytics::monthly_series(session.transactions.list(), today);
            println!("{}", report::monthly_report(&series));
        }
        UserCommands::Balance => {
            let points = analytics::running_balance(session.transactions.list(), today);
            println!("{}", report::balance_report(&points));
        }
        UserCommands::Export => {
            let dir = if rest.is_empty() {
                session.export_dir.clone()
            } else {
                PathBuf::from(rest)
            };
            let path = export::write_export(&dir, session.transactions.list(), today)?;
            println!(
                "Exported {} transactions to {}",
                session.transactions.list().len(),
                path.display()
            );
        }
        UserCommands::Import => {
            let file = if rest.is_empty() {
                prompt("Enter the path of the CSV file to import:")?
            } else {
                rest.to_string()
            };
            let count = import::import_transactions(&mut session.transactions, Path::new(&file))?;
            println!("Successfully imported {} transactions.", count);
        }
        UserCommands::Dashboard => {
            dashboard::run_dashboard(&mut session.transactions, &session.export_dir, today)?;
        }
        UserCommands::Habit => run_habit_command(&mut session.habits, &args)?,
        UserCommands::Goal => run_goal_command(&mut session.goals, &args)?,
        UserCommands::Help => println!("{}", HELP),
        UserCommands::Exit => return Ok(false),
        UserCommands::Unknown => {
            println!("Unknown command '{}'. Type 'help' for the list of commands.", command);
        }
    }

    Ok(true)
}

fn run_habit_command<S: KeyValueStore>(
    habits: &mut HabitStore<S>,
    args: &[&str],
) -> Result<(), Error> {
    match args.first().copied().unwrap_or("list") {
        "add" => {
            let name = prompt("Habit name:")?;
            let description = prompt("Description (optional):")?;
            let habit = habits.add(&name, &description)?;
            println!("Habit added:\n{}", report::habit_line(&habit));
        }
        "toggle" => {
            let id = required_arg(args, 1, "habit ID")?;
            match habits.toggle(id) {
                Some(habit) => println!("{}", report::habit_line(&habit)),
                None => println!("No habit with ID '{}'.", id),
            }
        }
        "remove" => {
            let id = required_arg(args, 1, "habit ID")?;
            habits.remove(id);
            println!("Habit removed.");
        }
        "reset" => {
            habits.reset_all();
            println!("All habits reset.");
        }
        "list" => {
            let stats = habits.stats();
            println!(
                "{} habits, {} completed today, {} pending",
                stats.total, stats.completed, stats.pending
            );
            for habit in habits.list() {
                println!("{}", report::habit_line(habit));
            }
        }
        other => {
            return Err(Error::invalid_input(format!(
                "Unknown habit command '{}'. Use add, toggle, remove, reset or list.",
                other
            )));
        }
    }
    Ok(())
}

fn run_goal_command<S: KeyValueStore>(
    goals: &mut GoalStore<S>,
    args: &[&str],
) -> Result<(), Error> {
    match args.first().copied().unwrap_or("list") {
        "add" => {
            let name = prompt("Goal name:")?;
            let description = prompt("Description (optional):")?;
            let target = prompt("Target (a whole number, e.g. 100):")?;
            let target_date = parse_optional_date(&prompt("Target date (YYYY-MM-DD, optional):")?)?;
            let goal = goals.add(&name, &description, &target, target_date)?;
            println!("Goal added:\n{}", report::goal_line(&goal));
        }
        "toggle" => {
            let id = required_arg(args, 1, "goal ID")?;
            match goals.toggle(id) {
                Some(goal) => println!("{}", report::goal_line(&goal)),
                None => println!("No goal with ID '{}'.", id),
            }
        }
        "progress" => {
            let id = required_arg(args, 1, "goal ID")?;
            let delta = parse_progress_delta(args.get(2).copied())?;
            match goals.update_progress(id, delta) {
                Some(goal) => println!("{}", report::goal_line(&goal)),
                None => println!("No goal with ID '{}'.", id),
            }
        }
        "remove" => {
            let id = required_arg(args, 1, "goal ID")?;
            goals.remove(id);
            println!("Goal removed.");
        }
        "list" => {
            let stats = goals.stats();
            println!(
                "{} goals, {} completed, {} in progress",
                stats.total, stats.completed, stats.in_progress
            );
            for goal in goals.list() {
                println!("{}", report::goal_line(goal));
            }
        }
        other => {
            return Err(Error::invalid_input(format!(
                "Unknown goal command '{}'. Use add, toggle, progress, remove or list.",
                other
            )));
        }
    }
    Ok(())
}

fn required_arg<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str, Error> {
    args.get(index)
        .copied()
        .ok_or_else(|| Error::invalid_input(format!("Missing {}", what)))
}

fn parse_progress_delta(direction: Option<&str>) -> Result<i64, Error> {
    match direction {
        None | Some("+") => Ok(PROGRESS_STEP),
        Some("-") => Ok(-PROGRESS_STEP),
        Some(other) => Err(Error::invalid_input(format!(
            "Invalid progress step '{}'. Use '+' or '-'.",
            other
        ))),
    }
}

fn parse_optional_date(input: &str) -> Result<Option<chrono::NaiveDate>, Error> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_iso_date(input).map(Some)
    }
}

fn prompt(message: &str) -> Result<String, Error> {
    println!("{}", message);
    read_user_input()?.ok_or_else(|| Error::invalid_input("No input provided"))
}

/// Reads one trimmed line from stdin. `None` means stdin is closed.
fn read_user_input() -> Result<Option<String>, Error> {
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn check_for_command(input: &str) -> UserCommands {
    match input.to_lowercase().as_str() {
        "add" => UserCommands::Add,
        "remove" => UserCommands::Remove,
        "list" => UserCommands::List,
        "totals" => UserCommands::Totals,
        "categories" => UserCommands::Categories,
        "monthly" => UserCommands::Monthly,
        "balance" => UserCommands::Balance,
        "export" => UserCommands::Export,
        "import" => UserCommands::Import,
        "dashboard" => UserCommands::Dashboard,
        "habit" => UserCommands::Habit,
        "goal" => UserCommands::Goal,
        "help" => UserCommands::Help,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
