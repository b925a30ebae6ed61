// Serde types for Reddit's "Listing" JSON envelope.
//
// Every collection endpoint wraps its items as
// `{"kind": "Listing", "data": {"children": [{"kind": ..., "data": ...}]}}`.
// Only the fields the pipeline reads are modeled.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A Listing envelope around a page of things.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<T>,
}

/// A search result child. Search only ever returns `t3` (link) things.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionThing {
    pub data: Submission,
}

/// A top-level post returned by search.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    /// Base-36 id without the `t3_` prefix.
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A node in a comment tree: either a real comment or a "load more" stub.
/// Stubs are never expanded, so their payload is skipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(Comment),
    #[serde(rename = "more")]
    More(IgnoredAny),
}

/// A reply attached to a submission or to another comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: String,
    /// Reddit sends `""` instead of an empty listing for leaf comments.
    #[serde(default, deserialize_with = "deserialize_replies")]
    pub replies: Vec<CommentThing>,
}

/// `GET /comments/{id}` returns the submission listing followed by the
/// comment forest listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsResponse(pub Listing<SubmissionThing>, pub Listing<CommentThing>);

fn deserialize_replies<'de, D>(deserializer: D) -> Result<Vec<CommentThing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Listing<CommentThing>),
        Empty(IgnoredAny),
    }

    Ok(match Replies::deserialize(deserializer)? {
        Replies::Listing(listing) => listing.data.children,
        Replies::Empty(_) => Vec::new(),
    })
}
