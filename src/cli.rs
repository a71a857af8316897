use anyhow::Result;
use clap::Parser;

use crate::{report::ReportFormat, types::Repo};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// Runtime configuration, assembled once at startup and passed by parameter
/// into the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo: Repo,
    pub smtp: SmtpConfig,
    pub format: ReportFormat,
}

/// Connection and addressing details for the outbound SMTP session.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub recipient: String,
}

#[derive(Parser, Debug)]
#[command(name = "prdigest")]
#[command(
    about = "Emails a weekly digest of opened, updated, and closed pull requests for a GitHub repository"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// The owner of the repository
    #[arg(short = 'o', long, value_name = "OWNER", default_value = "m3db")]
    owner: String,

    /// The name of the repository
    #[arg(short = 'r', long, value_name = "NAME", default_value = "m3")]
    repo: String,

    /// The SMTP server address to connect to
    #[arg(long, env = "SMTP_SERVER", value_name = "HOST")]
    server: String,

    /// The port used to connect to the SMTP server
    #[arg(long, env = "SMTP_PORT", value_name = "PORT")]
    port: u16,

    /// The username used for SMTP auth (also the From address)
    #[arg(short = 'u', long, env = "SMTP_USER", value_name = "USERNAME")]
    username: String,

    /// The password used for SMTP auth
    #[arg(
        short = 'p',
        long,
        env = "SMTP_PASS",
        value_name = "PASSWORD",
        hide_env_values = true
    )]
    password: String,

    /// The recipient email address for the digest
    #[arg(long, env = "SMTP_RECIPIENT", value_name = "ADDRESS")]
    recipient: String,

    /// Report body format
    #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Parses command-line arguments into the runtime configuration.
///
/// Each SMTP flag falls back to its same-named environment variable and is
/// required when neither is supplied. The GitHub token is environment-only
/// and read separately (see [`github_token`](crate::github::github_token)).
pub fn parse_args<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;

    let repo = Repo::new(&cli.owner, &cli.repo)
        .map_err(|e| anyhow::anyhow!("Invalid repository '{}/{}': {}", cli.owner, cli.repo, e))?;

    Ok(Config {
        repo,
        smtp: SmtpConfig {
            server: cli.server,
            port: cli.port,
            username: cli.username,
            password: cli.password,
            recipient: cli.recipient,
        },
        format: cli.format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_args(extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            "prdigest",
            "--server",
            "smtp.example.com",
            "--port",
            "465",
            "--username",
            "digest@example.com",
            "--password",
            "hunter2",
            "--recipient",
            "team@example.com",
        ]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
        args.extend(extra.iter().map(|s| (*s).to_string()));
        args
    }

    #[test]
    fn defaults_to_the_m3_repository_and_text_format() {
        let config = parse_args(full_args(&[])).expect("parse");
        assert_eq!(config.repo.to_string(), "m3db/m3");
        assert_eq!(config.format, ReportFormat::Text);
        assert_eq!(config.smtp.port, 465);
    }

    #[test]
    fn accepts_repository_and_format_overrides() {
        let config = parse_args(full_args(&[
            "--owner", "tokio-rs", "--repo", "tokio", "--format", "html",
        ]))
        .expect("parse");
        assert_eq!(config.repo.to_string(), "tokio-rs/tokio");
        assert_eq!(config.format, ReportFormat::Html);
    }

    #[test]
    fn rejects_a_non_numeric_port() {
        let mut args = full_args(&[]);
        let port_value = args.iter().position(|a| a == "465").expect("port arg");
        args[port_value] = "not-a-port".to_string();

        assert!(parse_args(args).is_err());
    }

    #[test]
    fn rejects_an_owner_containing_a_slash() {
        let err = parse_args(full_args(&["--owner", "m3db/m3"])).unwrap_err();
        assert!(err.to_string().contains("Invalid repository"));
    }
}
