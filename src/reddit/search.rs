// Subreddit search — top submissions for a keyword.

use anyhow::{Context, Result};
use tracing::info;

use super::client::RedditClient;
use super::types::{Listing, Submission, SubmissionThing};

/// Reddit caps a single listing page at 100 items.
const MAX_PAGE_SIZE: usize = 100;

/// Search `subreddit` for `keyword`, ranked by top score of all time.
///
/// Returns at most `limit` submissions in ranking order. Only one page is
/// requested; limits above the page size are clamped.
pub async fn search_submissions(
    client: &RedditClient,
    subreddit: &str,
    keyword: &str,
    limit: usize,
) -> Result<Vec<Submission>> {
    let limit_str = limit.min(MAX_PAGE_SIZE).to_string();

    let listing: Listing<SubmissionThing> = client
        .api_get(
            &format!("/r/{subreddit}/search"),
            &[
                ("q", keyword),
                ("restrict_sr", "1"),
                ("sort", "top"),
                ("t", "all"),
                ("limit", &limit_str),
            ],
        )
        .await
        .with_context(|| format!("Failed to search r/{subreddit} for \"{keyword}\""))?;

    let submissions: Vec<Submission> = listing
        .data
        .children
        .into_iter()
        .map(|thing| thing.data)
        .take(limit)
        .collect();

    info!(
        count = submissions.len(),
        subreddit = subreddit,
        keyword = keyword,
        "Search returned submissions"
    );

    Ok(submissions)
}
