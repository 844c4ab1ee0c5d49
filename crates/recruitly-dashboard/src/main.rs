//! Recruitly employee dashboard CLI
//!
//! Drives the dashboard view state against the remote employee service from
//! the command line: list with filters, add, edit and delete records.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::{Parser, Subcommand};
use recruitly_core::{Config, Department, EmploymentStatus, Error, Result, init_logging};
use recruitly_dashboard::{
    Dashboard, DashboardEvent, EmployeeGateway, HttpGateway, RecordId, SyncOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Command line interface for the Recruitly dashboard
#[derive(Parser)]
#[command(
    name = "recruitly",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee dashboard for the Recruitly employee service",
    long_about = "Lists, filters, creates, edits and deletes employee records held by the Recruitly employee REST service."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Employee service base URL, overriding the configuration
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// List employees matching a filter
    List {
        /// Name substring to search for
        #[arg(long, default_value = "")]
        name: String,

        /// Restrict to one department
        #[arg(long)]
        department: Option<Department>,

        /// Only active employees
        #[arg(long)]
        active_only: bool,
    },

    /// Add an employee
    Add {
        /// Employee name
        #[arg(long)]
        name: String,

        /// Department
        #[arg(long)]
        department: Department,

        /// Role
        #[arg(long)]
        role: String,

        /// Salary
        #[arg(long)]
        salary: String,

        /// Employment status
        #[arg(long, default_value = "Active")]
        status: EmploymentStatus,
    },

    /// Edit an employee; omitted fields keep their current value
    Edit {
        /// Employee identifier
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New department
        #[arg(long)]
        department: Option<Department>,

        /// New role
        #[arg(long)]
        role: Option<String>,

        /// New salary
        #[arg(long)]
        salary: Option<String>,

        /// New employment status
        #[arg(long)]
        status: Option<EmploymentStatus>,
    },

    /// Delete an employee
    Delete {
        /// Employee identifier
        id: String,
    },
}

/// Main entry point
///
/// # Errors
///
/// Returns error if configuration is invalid or a request fails
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    config.validate()?;
    init_logging(&config.logging)?;

    let http = HttpGateway::from_config(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = http.base_url(),
        "Recruitly dashboard starting"
    );
    let gateway: Arc<dyn EmployeeGateway> = Arc::new(http);

    let mut dashboard: Dashboard<dyn EmployeeGateway> = Dashboard::new(gateway, &config.dashboard);
    let mut events = dashboard.subscribe();

    let result = run(cli.command, &mut dashboard).await;
    print_notices(&mut events);
    result?;

    print!("{}", dashboard.render(true));
    Ok(())
}

async fn run(command: Commands, dashboard: &mut Dashboard<dyn EmployeeGateway>) -> Result<()> {
    match command {
        Commands::List {
            name,
            department,
            active_only,
        } => {
            dashboard.set_name_pattern(name);
            dashboard.set_department(department);
            dashboard.set_active_only(active_only);
            load(dashboard).await
        }
        Commands::Add {
            name,
            department,
            role,
            salary,
            status,
        } => {
            if let SyncOutcome::Failed { error, .. } = dashboard.start().await {
                warn!(%error, "initial load failed, adding anyway");
            }
            dashboard.open_create();
            dashboard.edit_draft(|draft| {
                draft.name = name;
                draft.department = Some(department);
                draft.role = role;
                draft.salary = salary;
                draft.status = status;
            });
            dashboard.submit().await?;
            Ok(())
        }
        Commands::Edit {
            id,
            name,
            department,
            role,
            salary,
            status,
        } => {
            load(dashboard).await?;
            let id = RecordId::new(id);
            if !dashboard.open_edit(&id) {
                return Err(Error::validation("id", format!("no employee with id '{id}'")));
            }
            dashboard.edit_draft(|draft| {
                if let Some(name) = name {
                    draft.name = name;
                }
                if department.is_some() {
                    draft.department = department;
                }
                if let Some(role) = role {
                    draft.role = role;
                }
                if let Some(salary) = salary {
                    draft.salary = salary;
                }
                if let Some(status) = status {
                    draft.status = status;
                }
            });
            dashboard.submit().await?;
            Ok(())
        }
        Commands::Delete { id } => {
            if let SyncOutcome::Failed { error, .. } = dashboard.start().await {
                warn!(%error, "initial load failed, deleting anyway");
            }
            dashboard.delete(&RecordId::new(id)).await?;
            Ok(())
        }
    }
}

/// Initial load with the current filter; a failed load is an error here
async fn load(dashboard: &mut Dashboard<dyn EmployeeGateway>) -> Result<()> {
    match dashboard.start().await {
        SyncOutcome::Failed { error, .. } => Err(error.into()),
        SyncOutcome::Applied { .. } | SyncOutcome::Discarded { .. } => Ok(()),
    }
}

fn print_notices(events: &mut broadcast::Receiver<DashboardEvent>) {
    while let Ok(event) = events.try_recv() {
        if let Some(notice) = event.notice() {
            eprintln!("{notice}");
        }
    }
}
