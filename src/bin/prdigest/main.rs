use anyhow::Result;
use chrono::{Duration, Utc};
use prdigest::{
    DEFAULT_PAGE_SIZE, GitHub, Mailer, build_digest, github_token, mail, parse_args, render,
};
use tracing::info;

/// Length of the rolling window the digest covers.
const WINDOW_DAYS: i64 = 7;

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match parse_args(std::env::args()) {
        Ok(config) => config,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::new(&config.repo, github_token()?)?;
    let window_start = Utc::now() - Duration::days(WINDOW_DAYS);

    let digest = build_digest(&github, window_start, DEFAULT_PAGE_SIZE).await?;
    if digest.is_empty() {
        info!(repo = %config.repo, "no pull-request activity in the window");
    }

    let body = render(&digest, config.format)?;

    let mailer = Mailer::new(&config.smtp)?;
    mailer
        .send(&mail::subject(&config.repo), body, config.format)
        .await?;

    Ok(())
}
