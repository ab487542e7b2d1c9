use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use svensson::application::errors::BotError;
use svensson::application::messaging::EventDispatcher;
use svensson::application::services::{DeadlineScheduler, MessageService, Outbox};
use svensson::domain::entities::CommandTable;
use svensson::domain::traits::{StanzaSink, SystemClock};
use svensson::infrastructure::adapters::console::ConsoleSession;
use svensson::infrastructure::config::Config;
use svensson::infrastructure::giphy::GiphyResolver;

#[derive(Parser)]
#[command(name = "svensson")]
#[command(about = "Group-chat bot with gifs and exam reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Nickname (overrides config)
    #[arg(short, long)]
    nick: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Validate the config and print the effective settings
    CheckConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(&cli.config, cli.nick),
        Commands::Version => {
            println!("svensson v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(&cli.config),
        Commands::CheckConfig => check_config(&cli.config, cli.nick),
    }
}

fn load_config(config_path: &str, nick_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        let mut config = Config::load(config_path)?;
        config.apply_env()?;
        config
    } else {
        tracing::warn!("{} not found, using defaults and environment", config_path);
        Config::load_env()?
    };

    if let Some(nick) = nick_override {
        config.bot.nick = nick;
    }

    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: &str, nick_override: Option<String>) -> ExitCode {
    let config = match load_config(config_path, nick_override) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting svensson as {} in {}", config.bot.nick, config.bot.muc);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(serve(config));
    // A pending stdin read would otherwise hold the runtime open.
    rt.shutdown_timeout(Duration::from_secs(1));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Arc<Config>) -> Result<(), BotError> {
    // Console session (dev mode)
    let session = Arc::new(ConsoleSession::new(config.bot.muc.clone()));
    tracing::info!("Status: {} ({})", config.bot.status, config.status_message());

    let (outbox, _writer) = Outbox::spawn(session.clone(), 64);
    let sink: Arc<dyn StanzaSink> = Arc::new(outbox);

    let resolver = Arc::new(GiphyResolver::from_config(&config)?);
    let mut commands = CommandTable::standard();
    if config.bot.help_command {
        commands = commands.with_help();
    }
    let dispatcher = EventDispatcher::new(
        &config.bot.nick,
        commands,
        resolver,
        MessageService::new(sink.clone()),
    );

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
                cancel.cancel();
            }
        });
    }

    let reminders = if config.reminders.enabled {
        let scheduler = DeadlineScheduler::new(
            config.exams()?,
            config.reminders.recipient.clone(),
            MessageService::new(sink.clone()),
            SystemClock,
        )?;
        let cancel = cancel.clone();
        Some(tokio::spawn(async move { scheduler.run(cancel).await }))
    } else {
        None
    };

    let result = dispatcher.run(session.as_ref(), cancel.clone()).await;
    cancel.cancel();

    if let Some(handle) = reminders {
        match handle.await {
            Ok(Err(e)) => tracing::error!("Reminder scheduler failed: {}", e),
            Err(e) => tracing::error!("Reminder scheduler panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }

    result
}

fn init_config(config_path: &str) -> ExitCode {
    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match std::fs::write(config_path, yaml) {
        Ok(()) => {
            println!("Config written to {}", config_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to write config: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check_config(config_path: &str, nick_override: Option<String>) -> ExitCode {
    let config = match load_config(config_path, nick_override) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("nick:       {}", config.bot.nick);
    println!("muc:        {}", config.bot.muc);
    println!("address:    {} (tls: {}, server name: {})", config.server.address, config.server.tls, config.tls_server_name());
    println!("username:   {}", config.server.username);
    println!("password:   <redacted>");
    println!("giphy key:  <redacted>");
    if config.reminders.enabled {
        println!("reminders:  {} exams -> {}", config.reminders.exams.len(), config.reminders.recipient);
    } else {
        println!("reminders:  off");
    }
    ExitCode::SUCCESS
}
