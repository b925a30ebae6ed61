// Comment source trait — what the pipeline needs from a content platform.
//
// The pipeline only asks for "raw comment texts matching a query". Reddit is
// the one real implementation; tests substitute canned sources.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::client::RedditClient;
use super::{comments, search};

/// Subreddit searched when nothing else is configured.
pub const DEFAULT_SUBREDDIT: &str = "Turkey";
/// Search keyword ("artificial intelligence").
pub const DEFAULT_KEYWORD: &str = "yapay zeka";
/// Number of top submissions to read.
pub const DEFAULT_RESULT_LIMIT: usize = 25;
/// Maximum comments taken from each submission.
pub const DEFAULT_COMMENT_LIMIT: usize = 20;

/// What to fetch: a keyword inside one community, bounded by two limits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub subreddit: String,
    pub keyword: String,
    pub result_limit: usize,
    pub comment_limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            keyword: DEFAULT_KEYWORD.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

/// A platform that can produce raw comment texts for a query.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Collect raw comment bodies in collection order.
    ///
    /// Either the whole fetch succeeds or it returns an error; partial
    /// results are never returned.
    async fn fetch_comments(&self, query: &SearchQuery) -> Result<Vec<String>>;
}

#[async_trait]
impl CommentSource for RedditClient {
    async fn fetch_comments(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let submissions =
            search::search_submissions(self, &query.subreddit, &query.keyword, query.result_limit)
                .await?;

        let mut bodies = Vec::new();
        for submission in &submissions {
            debug!(
                id = %submission.id,
                title = %crate::report::truncate_chars(&submission.title, 60),
                "Reading submission"
            );
            let mut comments =
                comments::fetch_submission_comments(self, &submission.id, query.comment_limit)
                    .await?;
            bodies.append(&mut comments);
        }

        Ok(bodies)
    }
}
