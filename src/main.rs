//! BeFake - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use console::Term;
use tracing_subscriber::{fmt, EnvFilter};

use befake::{
    api::{HttpTransport, Transport},
    cli::{Args, Command, FeedArgs, FriendsArgs},
    config::{validate_config, Config},
    download::{FeedDownloader, FeedStats, FriendsDownloader},
    error::{exit_codes, Result},
    output::{
        create_spinner, print_banner, print_debug, print_error, print_feed_stats,
        print_feed_summary, print_friends_summary, print_info, print_success, print_summary,
        print_warning,
    },
    session::{FileSessionStore, SessionManager, SessionStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    let quiet = args.quiet;
    if !quiet {
        print_banner();
    }

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let session_path = config.session_path()?;
    if args.debug {
        print_debug(&format!("Session file: {}", session_path.display()));
    }

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.api)?);
    let mut sessions = SessionManager::new(transport.clone(), FileSessionStore::new(session_path));

    match args.command {
        Command::Login {
            phone_number,
            otp_code,
        } => {
            login(&mut sessions, &phone_number, otp_code).await?;
            Ok(exit_codes::SUCCESS)
        }
        Command::Refresh => {
            let session = sessions.refresh().await?;
            print_success(&format!(
                "Session refreshed, valid until {}",
                session.expiry_timestamp
            ));
            Ok(exit_codes::SUCCESS)
        }
        Command::Feed(feed) => download_feed(&mut sessions, transport, &config, &feed, quiet).await,
        Command::Friends(friends) => {
            download_friends(&mut sessions, transport, &config, &friends, quiet).await
        }
    }
}

async fn login<S: SessionStore>(
    sessions: &mut SessionManager<S>,
    phone_number: &str,
    otp_code: Option<String>,
) -> Result<()> {
    print_info(&format!("Requesting a passcode for {}", phone_number));
    let handle = sessions.begin_login(phone_number).await?;

    let code = match otp_code {
        Some(code) => code,
        None => prompt("Passcode: ")?,
    };

    let session = sessions.complete_login(&handle, code.trim()).await?;
    print_success(&format!("Logged in as {}", session.identity_id));
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    let term = Term::stdout();
    term.write_str(label)?;
    Ok(term.read_line()?)
}

async fn download_feed<S: SessionStore>(
    sessions: &mut SessionManager<S>,
    transport: Arc<dyn Transport>,
    config: &Config,
    feed: &FeedArgs,
    quiet: bool,
) -> Result<i32> {
    // Templates are checked before any request goes out.
    let job = feed.to_job(config)?;
    job.validate()?;

    if !quiet {
        print_feed_summary(&job);
    }

    let session = sessions.ensure_authenticated().await?.clone();

    let spinner = create_spinner(
        &format!("Reading {} feed...", job.kind),
        config.options.show_progress,
    );
    let result = FeedDownloader::new(transport)
        .run(&job, &session, &spinner)
        .await;
    spinner.finish_and_clear();
    let stats = result?;

    Ok(report(&format!("{} feed", job.kind), &stats, quiet))
}

async fn download_friends<S: SessionStore>(
    sessions: &mut SessionManager<S>,
    transport: Arc<dyn Transport>,
    config: &Config,
    friends: &FriendsArgs,
    quiet: bool,
) -> Result<i32> {
    let job = friends.to_job(config)?;
    job.validate()?;

    if !quiet {
        print_friends_summary(&job);
    }

    let session = sessions.ensure_authenticated().await?.clone();

    let spinner = create_spinner("Reading friends list...", config.options.show_progress);
    let result = FriendsDownloader::new(transport)
        .run(&job, &session, &spinner)
        .await;
    spinner.finish_and_clear();
    let stats = result?;

    Ok(report("friends list", &stats, quiet))
}

/// Print the run's statistics and pick the exit code.
fn report(label: &str, stats: &FeedStats, quiet: bool) -> i32 {
    if quiet {
        print_summary(stats);
    } else {
        print_feed_stats(label, stats);
    }

    if stats.has_failures() {
        print_warning(&format!("{} item(s) failed", stats.items_failed));
        return exit_codes::SOME_ITEMS_FAILED;
    }

    exit_codes::SUCCESS
}
