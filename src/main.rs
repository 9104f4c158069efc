use preference_initializer::config::Config;
use preference_initializer::reporter::{WebhookConfig, WebhookReporter};
use preference_initializer::storage::SqliteStorage;
use preference_initializer::{ApplyError, ApplySummary, PreferenceInitializer};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/initializer.yaml";

#[derive(Debug, PartialEq)]
enum Command {
    Configs,
    Gateways,
    All,
    Migrate,
    Get { section: String, property: String },
}

struct Args {
    config_path: String,
    environment: Option<String>,
    command: Command,
}

fn parse_args() -> Result<Args, String> {
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut environment = None;
    let mut positional = Vec::new();

    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            config_path = path.to_string();
        } else if let Some(env) = arg.strip_prefix("--env=") {
            environment = Some(env.to_string());
        } else {
            positional.push(arg);
        }
    }

    let command = match positional.first().map(String::as_str) {
        None | Some("all") => Command::All,
        Some("configs") => Command::Configs,
        Some("gateways") => Command::Gateways,
        Some("migrate") => Command::Migrate,
        Some("get") => match (positional.get(1), positional.get(2)) {
            (Some(section), Some(property)) => Command::Get {
                section: section.clone(),
                property: property.clone(),
            },
            _ => return Err("usage: get <section> <property>".into()),
        },
        Some(other) => return Err(format!("unknown command: {}", other)),
    };

    Ok(Args {
        config_path,
        environment,
        command,
    })
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn build_reporter(config: &Config) -> Option<Arc<WebhookReporter>> {
    let settings = config.active_reporter()?;

    let mut webhook = WebhookConfig::new(settings.endpoint.clone()).with_timeout(settings.timeout);
    if !settings.api_key.is_empty() {
        webhook = webhook.with_api_key(settings.api_key.clone());
    }

    match WebhookReporter::new(webhook) {
        Ok(reporter) => Some(Arc::new(reporter)),
        Err(e) => {
            warn!(error = %e, "Error reporter disabled");
            None
        }
    }
}

fn log_summary(kind: &str, summary: &ApplySummary) {
    info!(
        kind,
        applied = summary.sections_applied,
        skipped = summary.sections_skipped,
        written = summary.preferences_written,
        "Settings applied"
    );
}

async fn run(initializer: &mut PreferenceInitializer, config: &Config, command: &Command) -> Result<(), ApplyError> {
    match command {
        Command::Configs => {
            let summary = initializer.load_configs(&config.files.config).await?;
            log_summary("configs", &summary);
        }
        Command::Gateways => {
            let summary = initializer.load_gateways(&config.files.gateways).await?;
            log_summary("gateways", &summary);
        }
        Command::All => {
            let summary = initializer.load_configs(&config.files.config).await?;
            log_summary("configs", &summary);
            let summary = initializer.load_gateways(&config.files.gateways).await?;
            log_summary("gateways", &summary);
        }
        Command::Get { section, property } => {
            let value = initializer.load_config_property(section, property, &config.files.config)?;
            println!("{}", value);
        }
        Command::Migrate => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let mut config = match Config::load(&args.config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(env) = args.environment {
        config.app.env = env;
    }

    init_tracing(config.app.log_level.as_deref());

    let migrate = config.storage.migrate || args.command == Command::Migrate;
    let storage = if migrate {
        SqliteStorage::new(config.storage.sqlite()).await
    } else {
        SqliteStorage::connect(config.storage.sqlite()).await
    };
    let storage = match storage {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!(error = %e, path = %config.storage.path, "Failed to open storage");
            return ExitCode::FAILURE;
        }
    };

    info!(
        config = %args.config_path,
        environment = %config.app.env,
        "Preference initializer started"
    );

    let mut initializer = PreferenceInitializer::new(
        config.app.env.clone(),
        storage.clone(),
        storage.clone(),
    )
    .verify_schema(config.strict_schema());
    if let Some(reporter) = build_reporter(&config) {
        initializer = initializer.with_reporter(reporter);
    }

    let result = run(&mut initializer, &config, &args.command).await;

    for warning in initializer.warnings() {
        println!("warning: {}", warning);
    }

    storage.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to apply settings");
            ExitCode::FAILURE
        }
    }
}
