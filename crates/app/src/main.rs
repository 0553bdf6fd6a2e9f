use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use maglab_core::model::LessonCatalog;
use services::{
    ActivityLogService, AppServices, AssetLocator, Clock, LessonService, LogSchema, QuizBank,
    ReportExporter, ServiceOptions, TutorService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://maglab.sqlite3";
const DEFAULT_ROW_LIMIT: u32 = 20;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidColumns { raw: String },
    InvalidLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidColumns { raw } => {
                write!(f, "invalid --columns value: {raw} (expected 8 or 9)")
            }
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn catalog(&self) -> Arc<LessonCatalog> {
        self.services.catalog()
    }

    fn lessons(&self) -> Arc<LessonService> {
        self.services.lessons()
    }

    fn tutor(&self) -> Arc<TutorService> {
        self.services.tutor()
    }

    fn activity(&self) -> Arc<ActivityLogService> {
        self.services.activity()
    }

    fn assets(&self) -> Arc<AssetLocator> {
        self.services.assets()
    }

    fn exporters(&self) -> Vec<Arc<dyn ReportExporter>> {
        self.services.exporters().to_vec()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--columns <8|9>] [--assets <dir>]");
    eprintln!("                           [--quiz <file>] [--out <dir>]");
    eprintln!("  cargo run -p app -- rows [--db <sqlite_url>] [--limit <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --columns 9");
    eprintln!("  --out <current directory>");
    eprintln!("  --limit {DEFAULT_ROW_LIMIT}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MAGLAB_DB_URL, MAGLAB_LOG_COLUMNS, MAGLAB_ASSET_DIR, MAGLAB_QUIZ_FILE,");
    eprintln!("  MAGLAB_EXPORT_DIR, MAGLAB_AI_API_KEY, MAGLAB_AI_BASE_URL, MAGLAB_AI_MODEL,");
    eprintln!("  RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Rows,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "rows" => Some(Self::Rows),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    db_url: String,
    columns: Option<LogSchema>,
    asset_dir: Option<PathBuf>,
    quiz_file: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    limit: u32,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: std::env::var("MAGLAB_DB_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            export_dir: std::env::var("MAGLAB_EXPORT_DIR")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            limit: DEFAULT_ROW_LIMIT,
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (Command::Ui, "--columns") => {
                    let value = require_value(args, "--columns")?;
                    let schema = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|columns| LogSchema::from_columns(columns).ok())
                        .ok_or_else(|| ArgsError::InvalidColumns { raw: value.clone() })?;
                    parsed.columns = Some(schema);
                }
                (Command::Ui, "--assets") => {
                    parsed.asset_dir = Some(require_value(args, "--assets")?.into());
                }
                (Command::Ui, "--quiz") => {
                    parsed.quiz_file = Some(require_value(args, "--quiz")?.into());
                }
                (Command::Ui, "--out") => {
                    parsed.export_dir = Some(require_value(args, "--out")?.into());
                }
                (Command::Rows, "--limit") => {
                    let value = require_value(args, "--limit")?;
                    parsed.limit = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Environment defaults overridden by whatever was given on the command line.
    fn service_options(&self) -> Result<ServiceOptions, Box<dyn std::error::Error>> {
        let mut options = ServiceOptions::from_env()?;
        if let Some(schema) = self.columns {
            options.schema = schema;
        }
        if let Some(dir) = &self.asset_dir {
            options.assets = options.assets.prepend(dir.clone());
        }
        if let Some(path) = &self.quiz_file {
            options.quizzes = QuizBank::from_file(path)?;
        }
        Ok(options)
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the lesson window.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite here so the library crates never touch the filesystem layout.
    prepare_sqlite_file(&parsed.db_url)?;
    let options = parsed.service_options()?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::System, options).await?;

    match cmd {
        Command::Ui => {
            let export_dir = parsed.export_dir();
            info!(
                export_dir = %export_dir.display(),
                tutor = services.tutor().enabled(),
                "launching lesson window"
            );
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                export_dir,
            });
            let context = build_app_context(&app);

            // Some window managers default dev builds to always-on-top.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Magnetism Lab")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Rows => {
            let records = services.activity().recent(parsed.limit).await?;
            for record in records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id,
                    record.logged_at.to_rfc3339(),
                    record.source,
                    record.fields.join("\t").replace('\n', " ")
                );
            }
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
