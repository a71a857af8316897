use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    error::FetchError,
    types::{Digest, DigestSection, PageSource, PullRequest, Section},
};

/// Default page size requested from the upstream API.
pub const DEFAULT_PAGE_SIZE: u8 = 20;

/// Collects the records for one digest section, walking pages until the
/// window is exhausted.
///
/// Pages arrive newest-first by the section's sort key. Every record on a
/// fetched page is evaluated: those whose window timestamp is at or after
/// `window_start` are kept in return order. The walk advances to the next
/// page only while the current page was full AND no record on it carried a
/// sort-key timestamp behind the window start - once the sort key falls out
/// of the window, descending order guarantees nothing later can qualify.
/// The termination test uses the sort key rather than the window field so it
/// stays sound for the Closed section, where records are ordered by update
/// time but windowed on close time (`closed_at` never exceeds `updated_at`).
pub async fn collect<S>(
    source: &S,
    section: Section,
    window_start: DateTime<Utc>,
    per_page: u8,
) -> Result<Vec<PullRequest>, FetchError>
where
    S: PageSource + Sync,
{
    let mut matched = Vec::new();
    let mut page: u32 = 1;

    loop {
        let records = source
            .fetch_page(section.state(), section.sort(), page, per_page)
            .await?;
        let fetched = records.len();
        let mut past_window = false;

        for pr in records {
            if section.sort().value(&pr) < window_start {
                past_window = true;
            }
            if section
                .window_value(&pr)
                .is_some_and(|when| when >= window_start)
            {
                matched.push(pr);
            }
        }

        debug!(
            section = %section,
            page,
            fetched,
            matched = matched.len(),
            "fetched pull-request page"
        );

        if fetched < usize::from(per_page) || past_window {
            break;
        }
        page += 1;
    }

    Ok(matched)
}

/// Builds the weekly digest by running every section's collection in fixed
/// order (Created, In Progress, Closed), sequentially.
///
/// The first fetch failure aborts the whole run; a partial digest is never
/// returned.
pub async fn build_digest<S>(
    source: &S,
    window_start: DateTime<Utc>,
    per_page: u8,
) -> Result<Digest, FetchError>
where
    S: PageSource + Sync,
{
    let mut sections = Vec::with_capacity(Section::ALL.len());

    for section in Section::ALL {
        let pulls = collect(source, section, window_start, per_page).await?;
        sections.push(DigestSection { section, pulls });
    }

    Ok(Digest { sections })
}
