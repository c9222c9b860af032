use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use loyalty_points::config::{AppConfig, DEFAULT_CONFIG_PATH};
use loyalty_points::db::Database;
use loyalty_points::export::{write_achievements_to_dir, write_achievements_to_file, write_json};
use loyalty_points::handlers::{
    AddAchievementForm, FormHandlers, RemoveAchievementForm, ViewAchievementsForm, ViewOutcome,
};
use loyalty_points::logging::init_logging;
use loyalty_points::models::{Achievement, ExportFormat};
use loyalty_points::repository::SqliteAchievementStore;
use loyalty_points::LoyaltyError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record points for an employee's achievement
    Add {
        /// Full name of the employee
        #[arg(short, long)]
        employee: String,

        /// Department; inherited from the employee's last entry when omitted
        #[arg(short, long)]
        department: Option<String>,

        /// What the employee accomplished
        #[arg(short, long)]
        achievement: String,

        /// Points awarded
        #[arg(short, long, allow_hyphen_values = true)]
        point: String,
    },
    /// Search achievements by employee name and total their points
    View {
        /// Part of the employee name; lists everything when omitted
        #[arg(short, long)]
        employee: Option<String>,

        /// Print the results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Export the results to the configured output directory
        #[arg(long)]
        export: bool,

        /// Export the results to this file instead
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (json or csv)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
    /// Delete an achievement by id
    Remove {
        /// Id of the achievement
        #[arg(short, long)]
        id: String,
    },
    /// List the configured departments
    Departments,
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Initialize logging
    let _log_guard = init_logging(Some(&config.get_log_level()), &config.logging)?;

    info!("Starting loyalty-points");

    match run(cli.command, config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_user_facing() => {
            writeln!(io::stderr().lock(), "{}", err.user_message())?;
            Ok(ExitCode::FAILURE)
        },
        Err(err) => {
            error!(error = %err, "Request failed");
            Err(err.into())
        },
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), LoyaltyError> {
    let mut out = io::stdout().lock();

    match command {
        Commands::Departments => {
            for department in &config.department {
                writeln!(out, "{department}")?;
            }
            return Ok(());
        },
        Commands::Config => {
            write!(out, "{}", config.to_yaml()?)?;
            return Ok(());
        },
        _ => {},
    }

    let database = Database::with_config(&loyalty_points::config::DatabaseConfig {
        url: config.get_database_url(),
        ..config.database.clone()
    })?;
    let store = Arc::new(SqliteAchievementStore::new(database));
    let config = Arc::new(config);
    let handlers = FormHandlers::new(store, Arc::clone(&config));

    match command {
        Commands::Add {
            employee,
            department,
            achievement,
            point,
        } => {
            let row = handlers
                .add
                .handle(AddAchievementForm {
                    employee,
                    department,
                    achievement,
                    point,
                })
                .await?;
            writeln!(out, "Added achievement {} for {} ({})", row.id, row.employee, row.department)?;
        },
        Commands::View {
            employee,
            json,
            export,
            output,
            format,
        } => {
            let outcome = handlers.view.handle(ViewAchievementsForm { employee }).await?;

            if json {
                write_json(&outcome.achievements, &mut out)?;
            } else {
                render_view(&outcome, &mut out)?;
            }

            let format = match format {
                Some(format) => format,
                None => config
                    .export
                    .default_format
                    .parse()
                    .map_err(LoyaltyError::InvalidConfig)?,
            };
            if let Some(path) = output {
                write_achievements_to_file(&outcome.achievements, format, &path)?;
                info!(path = %path.display(), "Exported achievements");
            } else if export {
                let path = write_achievements_to_dir(
                    &outcome.achievements,
                    format,
                    PathBuf::from(&config.export.output_directory).as_path(),
                )?;
                info!(path = %path.display(), "Exported achievements");
            }
        },
        Commands::Remove { id } => {
            let outcome = handlers.remove.handle(RemoveAchievementForm { id }).await?;
            if outcome.removed {
                writeln!(out, "Removed achievement {}", outcome.id)?;
            } else {
                writeln!(out, "No achievement with id {}", outcome.id)?;
            }
        },
        Commands::Departments | Commands::Config => {},
    }

    Ok(())
}

/// Render search results as an aligned table followed by the point total
fn render_view<W: Write>(outcome: &ViewOutcome, out: &mut W) -> io::Result<()> {
    let headers = ["id", "employee", "department", "achievement", "point", "update_ts"];
    let rows: Vec<[String; 6]> = outcome.achievements.iter().map(table_row).collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "{}", line(&headers.map(String::from)).trim_end())?;
    for row in &rows {
        writeln!(out, "{}", line(row).trim_end())?;
    }
    writeln!(out)?;
    writeln!(out, "Points: {}", outcome.points)?;
    Ok(())
}

fn table_row(row: &Achievement) -> [String; 6] {
    [
        row.id.to_string(),
        row.employee.clone(),
        row.department.clone(),
        row.achievement.clone(),
        row.point.clone(),
        row.update_ts_display(),
    ]
}
