use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use rscope::config::Config;
use rscope::runscope::{
    format_api_error, AccessToken, Bucket, Environment, RunscopeClient, RunscopeError, Team, Test,
};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command line for the Runscope API
#[derive(Parser, Debug)]
#[command(name = "rscope", version, about, long_about = None)]
struct Args {
    /// Runscope API URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Access token (defaults to RUNSCOPE_ACCESS_TOKEN, then the config file)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the account owning the token
    Account,
    /// Manage buckets
    #[command(subcommand)]
    Buckets(BucketCommand),
    /// Manage tests
    #[command(subcommand)]
    Tests(TestCommand),
    /// Manage shared and test environments
    #[command(subcommand)]
    Environments(EnvironmentCommand),
    /// Inspect team integrations
    #[command(subcommand)]
    Integrations(IntegrationCommand),
    /// Show or change saved defaults
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum BucketCommand {
    List,
    Show {
        key: String,
    },
    Create {
        #[arg(long)]
        name: String,
        /// Owning team (defaults to the configured team)
        #[arg(long)]
        team: Option<String>,
    },
    Delete {
        key: String,
    },
}

#[derive(ClapArgs, Debug)]
struct BucketArg {
    /// Bucket key (defaults to the configured bucket)
    #[arg(short, long)]
    bucket: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TestCommand {
    List {
        #[command(flatten)]
        bucket: BucketArg,
    },
    Show {
        id: String,
        #[command(flatten)]
        bucket: BucketArg,
    },
    Delete {
        id: String,
        #[command(flatten)]
        bucket: BucketArg,
    },
}

#[derive(Subcommand, Debug)]
enum EnvironmentCommand {
    List {
        #[command(flatten)]
        bucket: BucketArg,
        /// List the environments of this test instead of shared ones
        #[arg(short, long)]
        test: Option<String>,
    },
    Show {
        id: String,
        #[command(flatten)]
        bucket: BucketArg,
        #[arg(short, long)]
        test: Option<String>,
    },
    Delete {
        id: String,
        #[command(flatten)]
        bucket: BucketArg,
        #[arg(short, long)]
        test: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum IntegrationCommand {
    List {
        /// Team UUID (defaults to the configured team, then the account's first team)
        #[arg(long)]
        team: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    SetToken { token: String },
    SetTeam { team_id: String },
    SetBucket { bucket_key: String },
    SetApiUrl { api_url: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Filter for the log file: `--log-level` sets the default and gates logging
/// entirely, `RUST_LOG` directives refine it per target
fn log_filter(level: LogLevel, directives: Option<&str>) -> Option<EnvFilter> {
    let tracing_level = level.to_tracing_level()?;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level).into())
        .parse_lossy(directives.unwrap_or_default());
    Some(filter)
}

fn open_log_file(log_path: &Path) -> Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let Some(filter) = log_filter(level, directives.as_deref()) else {
        return Ok(None);
    };

    let log_path = get_log_path();
    let file = open_log_file(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("rscope started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("rscope").join("rscope.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".rscope").join("rscope.log");
    }
    PathBuf::from("rscope.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();

    if let Err(err) = run(&args, &mut config).await {
        // API failures get the short, sanitized message; details go to the log
        if let Some(api_err) = err.downcast_ref::<RunscopeError>() {
            tracing::error!("{:?}", err);
            anyhow::bail!(format_api_error(api_err));
        }
        return Err(err);
    }

    Ok(())
}

async fn run(args: &Args, config: &mut Config) -> Result<()> {
    if let Command::Config(command) = &args.command {
        return run_config(command, config, args.output);
    }

    let client = connect(args, config)?;
    let output = args.output;

    match &args.command {
        Command::Account => print(output, &client.read_account().await?),
        Command::Buckets(command) => run_buckets(&client, command, config, output).await,
        Command::Tests(command) => run_tests(&client, command, config, output).await,
        Command::Environments(command) => run_environments(&client, command, config, output).await,
        Command::Integrations(IntegrationCommand::List { team }) => {
            let team = match team.clone().or_else(|| config.effective_team()) {
                Some(team) => team,
                None => {
                    let account = client.read_account().await?;
                    account
                        .primary_team()
                        .map(|t| t.id.clone())
                        .context("Account has no teams")?
                }
            };
            print(output, &client.list_integrations(&team).await?)
        }
        Command::Config(_) => Ok(()),
    }
}

fn connect(args: &Args, config: &Config) -> Result<RunscopeClient> {
    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| config.effective_api_url());
    let token = match &args.token {
        Some(token) => AccessToken::new(token)?,
        None => config.effective_token()?,
    };

    tracing::info!("Using API: {}", api_url);
    RunscopeClient::new(&api_url, token).context("Failed to initialize Runscope client")
}

fn bucket_for(arg: &BucketArg, config: &Config) -> Result<Bucket> {
    let key = arg
        .bucket
        .clone()
        .or_else(|| config.effective_bucket())
        .context("No bucket given. Use --bucket or 'rscope config set-bucket'")?;
    Ok(Bucket::with_key(&key))
}

async fn run_buckets(
    client: &RunscopeClient,
    command: &BucketCommand,
    config: &Config,
    output: OutputFormat,
) -> Result<()> {
    match command {
        BucketCommand::List => print(output, &client.list_buckets().await?),
        BucketCommand::Show { key } => print(output, &client.read_bucket(key).await?),
        BucketCommand::Create { name, team } => {
            let team_id = team
                .clone()
                .or_else(|| config.effective_team())
                .context("No team given. Use --team or 'rscope config set-team'")?;
            let bucket = Bucket {
                name: name.clone(),
                team: Some(Team {
                    id: team_id,
                    ..Team::default()
                }),
                ..Bucket::default()
            };
            print(output, &client.create_bucket(&bucket).await?)
        }
        BucketCommand::Delete { key } => {
            client.delete_bucket(&Bucket::with_key(key)).await?;
            tracing::info!("Deleted bucket {}", key);
            Ok(())
        }
    }
}

async fn run_tests(
    client: &RunscopeClient,
    command: &TestCommand,
    config: &Config,
    output: OutputFormat,
) -> Result<()> {
    match command {
        TestCommand::List { bucket } => {
            let bucket = bucket_for(bucket, config)?;
            print(output, &client.list_tests(&bucket).await?)
        }
        TestCommand::Show { id, bucket } => {
            let bucket = bucket_for(bucket, config)?;
            let test = Test::in_bucket(&bucket.key, id);
            print(output, &client.read_test(&test).await?)
        }
        TestCommand::Delete { id, bucket } => {
            let bucket = bucket_for(bucket, config)?;
            client.delete_test(&Test::in_bucket(&bucket.key, id)).await?;
            tracing::info!("Deleted test {}", id);
            Ok(())
        }
    }
}

async fn run_environments(
    client: &RunscopeClient,
    command: &EnvironmentCommand,
    config: &Config,
    output: OutputFormat,
) -> Result<()> {
    match command {
        EnvironmentCommand::List { bucket, test } => {
            let bucket = bucket_for(bucket, config)?;
            let environments = match test {
                Some(test_id) => {
                    let test = Test::in_bucket(&bucket.key, test_id);
                    client.list_test_environments(&bucket, &test).await?
                }
                None => client.list_shared_environments(&bucket).await?,
            };
            print(output, &environments)
        }
        EnvironmentCommand::Show { id, bucket, test } => {
            let bucket = bucket_for(bucket, config)?;
            let environment = environment_handle(id);
            let environment = match test {
                Some(test_id) => {
                    let test = Test::in_bucket(&bucket.key, test_id);
                    client.read_test_environment(&environment, &test).await?
                }
                None => client.read_shared_environment(&environment, &bucket).await?,
            };
            print(output, &environment)
        }
        EnvironmentCommand::Delete { id, bucket, test } => {
            let bucket = bucket_for(bucket, config)?;
            let environment = environment_handle(id);
            match test {
                Some(test_id) => {
                    let test = Test::in_bucket(&bucket.key, test_id);
                    client.delete_test_environment(&environment, &test).await?
                }
                None => client.delete_environment(&environment, &bucket).await?,
            }
            tracing::info!("Deleted environment {}", id);
            Ok(())
        }
    }
}

fn environment_handle(id: &str) -> Environment {
    Environment {
        id: Some(id.to_string()),
        ..Environment::new()
    }
}

fn run_config(command: &ConfigCommand, config: &mut Config, output: OutputFormat) -> Result<()> {
    match command {
        ConfigCommand::Show => print(output, &config.redacted()),
        ConfigCommand::SetToken { token } => config.set_token(token),
        ConfigCommand::SetTeam { team_id } => config.set_team(team_id),
        ConfigCommand::SetBucket { bucket_key } => config.set_bucket(bucket_key),
        ConfigCommand::SetApiUrl { api_url } => config.set_api_url(api_url),
    }
}

fn print<T: Serialize>(output: OutputFormat, value: &T) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
