// Comment retrieval — one request per submission, flattened breadth-first.
//
// "Load more comments" stubs are dropped rather than expanded, so each
// submission costs exactly one request.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use tracing::debug;

use super::client::RedditClient;
use super::types::{CommentThing, CommentsResponse};

/// Flatten a comment forest into comment bodies, breadth-first.
///
/// All top-level comments come first in their native order, then their
/// direct replies, and so on with no depth cutoff. `more` stubs are skipped.
pub fn flatten_comment_forest(forest: Vec<CommentThing>) -> Vec<String> {
    let mut queue: VecDeque<CommentThing> = forest.into();
    let mut bodies = Vec::new();

    while let Some(thing) = queue.pop_front() {
        if let CommentThing::Comment(comment) = thing {
            bodies.push(comment.body);
            queue.extend(comment.replies);
        }
    }

    bodies
}

/// Fetch a submission's comments and keep the first `limit` bodies.
pub async fn fetch_submission_comments(
    client: &RedditClient,
    submission_id: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let response: CommentsResponse = client
        .api_get(&format!("/comments/{submission_id}"), &[])
        .await
        .with_context(|| format!("Failed to fetch comments for submission {submission_id}"))?;

    let mut bodies = flatten_comment_forest(response.1.data.children);
    let available = bodies.len();
    bodies.truncate(limit);

    debug!(
        submission = submission_id,
        available = available,
        kept = bodies.len(),
        "Collected comments"
    );

    Ok(bodies)
}
