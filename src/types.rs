use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::FetchError;

/// Pull-request state filter accepted by the upstream list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullState {
    Open,
    Closed,
}

impl PullState {
    pub fn as_str(self) -> &'static str {
        match self {
            PullState::Open => "open",
            PullState::Closed => "closed",
        }
    }
}

/// Sort keys the upstream list endpoint accepts.
///
/// The endpoint cannot sort by close time, which is why the Closed digest
/// section sorts by `updated` and windows on `closed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Created,
    Updated,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Updated => "updated",
        }
    }

    /// Timestamp the upstream sort key orders records by.
    pub fn value(self, pr: &PullRequest) -> DateTime<Utc> {
        match self {
            SortKey::Created => pr.created_at,
            SortKey::Updated => pr.updated_at,
        }
    }
}

/// One section of the weekly digest, fixing the query shape it is built
/// from: the upstream state filter, the sort key, and the timestamp field
/// consulted when deciding whether a record falls inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Created,
    InProgress,
    Closed,
}

impl Section {
    /// Fixed iteration order of the digest sections.
    pub const ALL: [Section; 3] = [Section::Created, Section::InProgress, Section::Closed];

    pub fn title(self) -> &'static str {
        match self {
            Section::Created => "Created",
            Section::InProgress => "In Progress",
            Section::Closed => "Closed",
        }
    }

    pub fn state(self) -> PullState {
        match self {
            Section::Created | Section::InProgress => PullState::Open,
            Section::Closed => PullState::Closed,
        }
    }

    pub fn sort(self) -> SortKey {
        match self {
            Section::Created => SortKey::Created,
            Section::InProgress | Section::Closed => SortKey::Updated,
        }
    }

    /// Timestamp used to window records for this section. `None` means the
    /// record can never qualify (an unclosed PR under the Closed section).
    pub fn window_value(self, pr: &PullRequest) -> Option<DateTime<Utc>> {
        match self {
            Section::Created => Some(pr.created_at),
            Section::InProgress => Some(pr.updated_at),
            Section::Closed => pr.closed_at,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Immutable snapshot of one pull request as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Validation failures when constructing a [`Repo`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("repository owner must not be empty")]
    EmptyOwner,
    #[error("repository name must not be empty")]
    EmptyName,
    #[error("'{0}' must not contain '/'")]
    ContainsSlash(String),
}

/// A validated GitHub repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();

        if owner.is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName);
        }
        for part in [&owner, &name] {
            if part.contains('/') {
                return Err(RepoError::ContainsSlash(part.clone()));
            }
        }

        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Source of one page of pull-request records.
///
/// Implemented by the live [`GitHub`](crate::github::GitHub) client; tests
/// substitute their own implementations to script page contents and observe
/// how many fetches the collector issues.
#[async_trait]
pub trait PageSource {
    /// Fetches one page of records, newest first by `sort`.
    async fn fetch_page(
        &self,
        state: PullState,
        sort: SortKey,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PullRequest>, FetchError>;
}

/// The records collected for one digest section, in API return order.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSection {
    pub section: Section,
    pub pulls: Vec<PullRequest>,
}

/// The full weekly digest: one entry per [`Section`], in fixed order.
///
/// Built fresh for every run and discarded after rendering; nothing is
/// persisted between invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub sections: Vec<DigestSection>,
}

impl Digest {
    /// True when no section contains any records.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.pulls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_pr(closed_at: Option<DateTime<Utc>>) -> PullRequest {
        PullRequest {
            number: 7,
            title: "Tighten bounds check".to_string(),
            html_url: "https://github.com/m3db/m3/pull/7".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap(),
            closed_at,
        }
    }

    #[test]
    fn repo_rejects_empty_and_slashed_components() {
        assert_eq!(Repo::new("", "m3"), Err(RepoError::EmptyOwner));
        assert_eq!(Repo::new("m3db", ""), Err(RepoError::EmptyName));
        assert_eq!(
            Repo::new("m3db/extra", "m3"),
            Err(RepoError::ContainsSlash("m3db/extra".to_string()))
        );

        let repo = Repo::new("m3db", "m3").expect("valid repo");
        assert_eq!(repo.to_string(), "m3db/m3");
    }

    #[test]
    fn sections_map_to_expected_query_shapes() {
        assert_eq!(Section::Created.state(), PullState::Open);
        assert_eq!(Section::Created.sort(), SortKey::Created);
        assert_eq!(Section::InProgress.state(), PullState::Open);
        assert_eq!(Section::InProgress.sort(), SortKey::Updated);
        assert_eq!(Section::Closed.state(), PullState::Closed);
        assert_eq!(Section::Closed.sort(), SortKey::Updated);
    }

    #[test]
    fn closed_section_windows_on_close_time() {
        let closed = Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
        assert_eq!(
            Section::Closed.window_value(&sample_pr(Some(closed))),
            Some(closed)
        );
        assert_eq!(Section::Closed.window_value(&sample_pr(None)), None);
    }

    #[test]
    fn section_order_is_created_in_progress_closed() {
        let titles: Vec<_> = Section::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Created", "In Progress", "Closed"]);
    }
}
