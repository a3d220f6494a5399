//! CLI entrypoint for Screening Client
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use screening_application::{
    ReviewApplicationUseCase, RunChatInput, RunChatUseCase, ScreeningApi,
};
use screening_domain::{LoginRequest, ParticipantSource, SignupRequest};
use screening_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, HttpScreeningApi, JsonlConversationLogger,
    WsChatConnector,
};
use screening_presentation::{ChatArgs, ChatConsole, Cli, Command, ConsoleFormatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    if let Some(url) = &cli.api_url {
        config.endpoints.api_base_url = url.clone();
    }
    if let Some(url) = &cli.ws_url {
        config.endpoints.ws_url = url.clone();
    }

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, &config.logging);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("{}", ConsoleFormatter::format_error(&issue.to_string()));
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    info!("Starting Screening Client");

    // === Dependency Injection ===
    let api = Arc::new(HttpScreeningApi::new(config.endpoints.api_base_url.clone()));

    match command {
        Command::Jobs => {
            let jobs = api.list_jobs().await?;
            print!("{}", ConsoleFormatter::format_jobs(&jobs));
        }
        Command::Login { email, password } => {
            let user = api.login(&LoginRequest { email, password }).await?;
            print!("{}", ConsoleFormatter::format_user(&user));
        }
        Command::Signup(args) => {
            let request = SignupRequest {
                email: args.email,
                password: args.password,
                first_name: args.first_name,
                last_name: args.last_name,
                address: args.address,
                apt_num: args.apt_num.filter(|apt| !apt.trim().is_empty()),
                state: args.state,
                zip_code: args.zip_code,
            };
            let user = api.signup(&request).await?;
            println!("Account created for {}.", user.full_name());
            print!("{}", ConsoleFormatter::format_user(&user));
        }
        Command::Profile { user_id } => {
            let user = api.get_user(&user_id).await?;
            print!("{}", ConsoleFormatter::format_user(&user));
        }
        Command::Chat(args) => run_chat(args, &config, api, cli.quiet).await?,
        Command::Summary {
            application_id,
            user,
        } => {
            let outcome = ReviewApplicationUseCase::new(api)
                .outcome(&user, &application_id)
                .await?;
            print!("{}", ConsoleFormatter::format_outcome(&outcome));
        }
        Command::Download {
            application_id,
            output,
        } => {
            let download = ReviewApplicationUseCase::new(api)
                .download(&application_id)
                .await?;
            let dir = output.unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(safe_filename(&download.filename, &application_id));
            std::fs::write(&path, &download.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved transcript to {}", path.display());
        }
        Command::Withdraw { application_id } => {
            ReviewApplicationUseCase::new(api)
                .withdraw(&application_id)
                .await?;
            println!("Application {} withdrawn.", application_id);
        }
    }

    Ok(())
}

/// Set up stderr logging from the `-v` count, plus the optional daily file.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let mut file_error = None;
    let (file_layer, guard) = match logging.log_dir().filter(|_| logging.file) {
        Some(dir) => match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("screening-client")
            .filename_suffix("log")
            .build(&dir)
        {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                file_error = Some(format!("{}: {}", dir.display(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(error) = file_error {
        warn!("File logging disabled: {}", error);
    }
    guard
}

async fn run_chat(
    args: ChatArgs,
    config: &FileConfig,
    api: Arc<HttpScreeningApi>,
    quiet: bool,
) -> Result<()> {
    let (source, existing) = if args.skip_profile {
        (ParticipantSource::fixed(&args.user, &args.job), None)
    } else {
        let user = api.get_user(&args.user).await?;
        let existing = user
            .application_for_job(&args.job)
            .map(|app| app.application_id.clone());
        (
            ParticipantSource::authenticated(Some(user), Some(args.job.clone())),
            existing,
        )
    };

    let mut input = RunChatInput::new(source, config.endpoints.ws_url.clone());
    match existing {
        Some(application_id) if args.restart => input = input.replacing(application_id),
        Some(application_id) => {
            println!(
                "You already applied to this job (application {}).",
                application_id
            );
            println!(
                "Use --restart to start over, or `summary {} --user {}` to see the result.",
                application_id, args.user
            );
            return Ok(());
        }
        None => {}
    }

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let connector = Arc::new(WsChatConnector::new(config.connection.to_policy()));
    let mut use_case = RunChatUseCase::new(connector, api).with_cancellation(cancel);

    if let Some(dir) = &config.logging.transcript_dir
        && let Some(logger) = JsonlConversationLogger::in_dir(dir)
    {
        info!("Writing transcript to {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let output = ChatConsole::new(use_case)
        .with_quiet(quiet)
        .run(input)
        .await?;

    if output.outcome.is_none() && !quiet {
        println!();
        println!(
            "Chat closed after {} message(s) ({}).",
            output.turns.len(),
            output.session.status()
        );
    }

    Ok(())
}

/// Keep a server-suggested filename from escaping the output directory
fn safe_filename(suggested: &str, application_id: &str) -> PathBuf {
    Path::new(suggested)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("conversation_{}.txt", application_id)))
}
