//! Prdigest: weekly pull-request digests by email.
//!
//! Collects the pull requests opened, updated, or closed in the past week
//! for a configured GitHub repository, renders the result as a plain-text
//! or HTML report, and delivers it over an authenticated SMTP session.
//! The collection pipeline walks the paged REST list endpoint once per
//! digest section and stops as soon as the rolling window is exhausted.

pub mod cli;
pub mod error;
pub mod github;
pub mod mail;
pub mod query;
pub mod report;
pub mod types;

pub use cli::{Config, SmtpConfig, parse_args};
pub use error::{DeliveryError, FetchError, RenderError};
pub use github::{GitHub, github_token};
pub use mail::Mailer;
pub use query::{DEFAULT_PAGE_SIZE, build_digest, collect};
pub use report::{ReportFormat, render};
pub use types::{
    Digest, DigestSection, PageSource, PullRequest, PullState, Repo, RepoError, Section, SortKey,
};
