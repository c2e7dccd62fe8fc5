//! Aula CLI
//!
//! Command-line interface for the academic records API:
//! - CRUD over academic years, courses, subjects, students and enrollments
//! - Course rosters
//! - Gradebook and attendance sheets, with bulk saves from CSV
//! - Working days per course/subject/term
//! - Three-term summary with the annual average

use anyhow::{bail, Context};
use aula::client::{
    load_roster, AcademicApi, AcademicClient, BulkAttendanceSave, BulkGradeSave, Resource,
    WorkingDaysUpdate,
};
use aula::config::{generate_default_config, Config};
use aula::grading::{GradeKey, Term};
use aula::normalize::current_year;
use aula::screen::{Action, Gradebook, NoticeLevel, View};
use aula::sheet::{parse_data_arg, read_attendance_csv, read_grade_csv, OutputFormat, Sheet};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aula")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Academic records client: rosters, gradebooks and attendance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Config file (default: ~/.config/aula/config.toml, then ./aula.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Course/year/subject/term selection
#[derive(Args, Clone)]
pub struct Filters {
    /// Course id
    #[arg(long)]
    pub course: String,
    /// Academic year id (default: the current year)
    #[arg(long)]
    pub year: Option<String>,
    /// Subject id
    #[arg(long)]
    pub subject: String,
    /// Term: 1, 2, 3 (or T1, primer, ...)
    #[arg(long, default_value = "1")]
    pub term: Term,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records of a resource (years, courses, subjects, students, enrollments)
    List { resource: Resource },

    /// Show one record
    Show { resource: Resource, id: String },

    /// Create a record
    Create {
        resource: Resource,
        /// JSON body, or @file
        #[arg(short, long)]
        data: String,
    },

    /// Update a record
    Update {
        resource: Resource,
        id: String,
        /// JSON body, or @file
        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete { resource: Resource, id: String },

    /// Show the roster of a course
    Roster {
        course: String,
        /// Academic year id, used when the course has no embedded roster
        #[arg(long)]
        year: Option<String>,
    },

    /// Show the gradebook for a course/subject/term
    Grades {
        #[command(flatten)]
        filters: Filters,
    },

    /// Save grades from a CSV file (estudianteId,promedio,faltasJustificadas,faltasInjustificadas)
    GradesSave {
        #[command(flatten)]
        filters: Filters,
        /// CSV file
        #[arg(long)]
        file: PathBuf,
    },

    /// Show the attendance sheet for a course/subject/term
    Attendance {
        #[command(flatten)]
        filters: Filters,
    },

    /// Save absences from a CSV file (estudianteId,faltasJustificadas,faltasInjustificadas)
    AttendanceSave {
        #[command(flatten)]
        filters: Filters,
        /// CSV file
        #[arg(long)]
        file: PathBuf,
        /// Working days to save alongside the absences
        #[arg(long)]
        working_days: Option<u32>,
    },

    /// Get or set the working days for a course/subject/term
    WorkingDays {
        #[command(flatten)]
        filters: Filters,
        /// New value
        #[arg(long)]
        set: Option<u32>,
    },

    /// Three-term summary with the annual average
    Summary {
        #[command(flatten)]
        filters: Filters,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Ignoring config file, using defaults");
        eprintln!("Warning: {}; using defaults", e);
    }

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aula={}", config.logging.level)));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(config.display.default_format.as_str())
        .parse()?;

    let command = match cli.command {
        Commands::Config { output } => return write_config(output.as_ref()),
        command => command,
    };

    let client = AcademicClient::new(config.to_client_config())?;
    let api: Arc<dyn AcademicApi> = Arc::new(client);
    tracing::debug!(base_url = %config.api.base_url, "Using academic API");

    match command {
        Commands::List { resource } => {
            let records = api.list(resource).await?;
            if records.is_empty() && format == OutputFormat::Table {
                println!("No {} found.", resource);
                return Ok(());
            }
            emit(format, &records, &Sheet::records(&records))?;
        }

        Commands::Show { resource, id } => {
            let record = api.get(resource, &id).await?;
            emit(format, &record, &Sheet::records(std::slice::from_ref(&record)))?;
        }

        Commands::Create { resource, data } => {
            let body = parse_data_arg(&data)?;
            let created = api.create(resource, &body).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }

        Commands::Update { resource, id, data } => {
            let body = parse_data_arg(&data)?;
            let updated = api.update(resource, &id, &body).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }

        Commands::Delete { resource, id } => {
            api.delete(resource, &id).await?;
            println!("Deleted {} {}", resource, id);
        }

        Commands::Roster { course, year } => {
            let roster = load_roster(api.as_ref(), &course, year.as_deref()).await?;
            emit(format, &roster, &Sheet::roster(&roster))?;
        }

        Commands::Grades { filters } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            let book = open_screen(api, View::Grades, key).await?;
            emit(format, &book.state().grades, &Sheet::grades(&book.state().grades))?;
        }

        Commands::GradesSave { filters, file } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            let input = std::fs::File::open(&file).with_context(|| format!("Failed to open {:?}", file))?;
            let calificaciones = read_grade_csv(input)?;
            if calificaciones.is_empty() {
                bail!("No grade rows in {:?}", file);
            }

            let body = BulkGradeSave { key, calificaciones };
            let response = api.save_grades(&body).await?;
            tracing::info!(rows = body.calificaciones.len(), "Grades saved");
            println!("Saved {} grades", body.calificaciones.len());
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }

        Commands::Attendance { filters } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            let book = open_screen(api, View::Attendance, key).await?;
            let table = &book.state().attendance;
            if format == OutputFormat::Table {
                match table.working_days {
                    Some(days) => println!("Working days: {}\n", days),
                    None => println!("Working days: not set\n"),
                }
            }
            emit(format, table, &Sheet::attendance(table))?;
        }

        Commands::AttendanceSave {
            filters,
            file,
            working_days,
        } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            let input = std::fs::File::open(&file).with_context(|| format!("Failed to open {:?}", file))?;
            let registros = read_attendance_csv(input)?;
            if registros.is_empty() {
                bail!("No attendance rows in {:?}", file);
            }

            let body = BulkAttendanceSave {
                key,
                dias_laborables: working_days.filter(|d| *d > 0),
                registros,
            };
            let response = api.save_attendance(&body).await?;
            tracing::info!(rows = body.registros.len(), "Attendance saved");
            println!("Saved {} attendance rows", body.registros.len());
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }

        Commands::WorkingDays { filters, set } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            match set {
                Some(days) => {
                    api.set_working_days(&WorkingDaysUpdate {
                        key,
                        dias_laborables: days,
                    })
                    .await?;
                    println!("Working days set to {}", days);
                }
                None => match api.working_days(&key).await? {
                    Some(days) => println!("{}", days),
                    None => println!("Working days not set"),
                },
            }
        }

        Commands::Summary { filters } => {
            let key = resolve_key(api.as_ref(), &filters).await?;
            let book = open_screen(api, View::Summary, key).await?;
            emit(format, &book.state().summary, &Sheet::summary(&book.state().summary))?;
        }

        Commands::Config { output } => write_config(output.as_ref())?,
    }

    Ok(())
}

/// Fill in the academic year when it was not given
async fn resolve_key(api: &dyn AcademicApi, filters: &Filters) -> anyhow::Result<GradeKey> {
    let year = match &filters.year {
        Some(year) => year.clone(),
        None => {
            let years = api.list(Resource::AcademicYears).await?;
            let today = chrono::Local::now().date_naive();
            let year = current_year(&years, today)
                .context("No current academic year found; pass --year")?;
            tracing::info!(year = %year.id, name = year.display_name(), "Using current academic year");
            year.id
        }
    };

    let key = GradeKey::new(filters.course.trim(), year, filters.subject.trim(), filters.term);
    if !key.is_complete() {
        bail!("--course, --year and --subject must not be empty");
    }
    Ok(key)
}

/// Load a screen for `key` and surface its notice
async fn open_screen(api: Arc<dyn AcademicApi>, view: View, key: GradeKey) -> anyhow::Result<Gradebook> {
    let mut book = Gradebook::new(api, view);
    book.dispatch(Action::SetFilters(key)).await;

    if let Some(notice) = &book.state().notice {
        match notice.level {
            NoticeLevel::Error => bail!("{}", notice.message),
            _ => eprintln!("{}", notice.message),
        }
    }
    Ok(book)
}

fn emit<T: Serialize + ?Sized>(format: OutputFormat, data: &T, sheet: &Sheet) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Csv => sheet.write_csv(std::io::stdout().lock())?,
        OutputFormat::Table => {
            if sheet.is_empty() {
                println!("No rows.");
            } else {
                sheet.write_table(&mut std::io::stdout().lock())?;
            }
        }
    }
    Ok(())
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}
