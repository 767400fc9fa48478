use std::fmt;
use std::sync::Arc;

use assess_core::model::{ActivityKind, ActivityRecord};
use chrono::Duration;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    ActivityService, AppServices, AssessmentService, Clock, EvaluationClient,
    EvaluationClientConfig, HttpEvaluationClient, InsightsService, ResultService,
};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidEvalUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidEvalUrl { raw } => write!(f, "invalid --eval-url value: {raw}"),
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
}

impl UiApp for DesktopApp {
    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn activities(&self) -> Arc<ActivityService> {
        self.services.activities()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }

    fn insights(&self) -> Arc<InsightsService> {
        self.services.insights()
    }
}

struct Args {
    db_url: String,
    eval_url: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--eval-url <url>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!();
    eprintln!("Environment (a .env file is read when present):");
    eprintln!("  ASSESS_DB_URL");
    eprintln!("  ASSESS_EVAL_BASE_URL, ASSESS_EVAL_API_KEY, ASSESS_EVAL_TIMEOUT_SECS");
    eprintln!("  RUST_LOG (defaults to info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("ASSESS_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut eval_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--eval-url" => {
                    let value = require_value(args, "--eval-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidEvalUrl { raw: value });
                    }
                    eval_url = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, eval_url })
    }

    fn evaluation_config(&self) -> Option<EvaluationClientConfig> {
        let from_env = EvaluationClientConfig::from_env();
        match (&self.eval_url, from_env) {
            (Some(url), Some(mut config)) => {
                config.base_url.clone_from(url);
                Some(config)
            }
            (Some(url), None) => Some(EvaluationClientConfig::new(url.clone())),
            (None, from_env) => from_env,
        }
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
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
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

    // No subcommand launches the UI.
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

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    tracing::info!(db = %parsed.db_url, "storage ready");

    match cmd {
        Command::Ui => {
            let client = HttpEvaluationClient::new(parsed.evaluation_config());
            if !client.enabled() {
                tracing::warn!("no evaluation service configured; sessions will fail to load");
            }
            let client: Arc<dyn EvaluationClient> = Arc::new(client);
            let services = AppServices::from_storage(&storage, Clock::system(), client);

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // Some dev setups open the window always-on-top unless told otherwise.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Assess")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let written = seed_activity(&storage, &Clock::system()).await?;
            tracing::info!(records = written, "seeded sample activity");
            Ok(())
        }
    }
}

/// Append a week of sample sessions so the history and analytics views have data.
async fn seed_activity(
    storage: &Storage,
    clock: &Clock,
) -> Result<usize, Box<dyn std::error::Error>> {
    let samples = [
        (6, ActivityKind::Assessment, "Python", 55),
        (5, ActivityKind::Quiz, "Python", 70),
        (4, ActivityKind::Quiz, "Rust", 40),
        (3, ActivityKind::Assessment, "Rust", 65),
        (2, ActivityKind::Quiz, "JavaScript", 80),
        (1, ActivityKind::Assessment, "Python", 85),
        (0, ActivityKind::Quiz, "Rust", 75),
    ];
    let count = samples.len();
    let now = clock.now();
    for (days_ago, kind, language, score) in samples {
        let record = ActivityRecord::new(kind, language, score, now - Duration::days(days_ago));
        storage.activities.append_activity(&record).await?;
    }
    Ok(count)
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

    let path = std::path::Path::new(path);
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
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|arg| (*arg).to_string()))
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/app.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/app.sqlite3"), "{url}");
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }

    #[test]
    fn eval_url_flag_must_be_http() {
        let err = parse(&["--eval-url", "ftp://example.com"]).err();
        assert!(matches!(err, Some(ArgsError::InvalidEvalUrl { .. })));

        let args = parse(&["--eval-url", "http://localhost:8000", "--db", "sqlite::memory:"])
            .expect("valid args");
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(
            args.evaluation_config().map(|config| config.base_url),
            Some("http://localhost:8000".to_string())
        );
    }

    #[test]
    fn missing_flag_value_is_reported() {
        let err = parse(&["--db"]).err();
        assert!(matches!(err, Some(ArgsError::MissingValue { flag: "--db" })));
    }

    #[tokio::test]
    async fn seed_writes_sample_activity() {
        let storage = Storage::in_memory();
        let written = seed_activity(&storage, &assess_core::time::fixed_clock())
            .await
            .expect("seed");
        let recent = storage
            .activities
            .list_recent_activities(50)
            .await
            .expect("list");
        assert_eq!(recent.len(), written);
    }
}
