// Reddit API access — authentication, search, comment trees.
//
// Each submodule handles one area of the API surface; `source` ties them
// together behind the CommentSource trait the pipeline consumes.

pub mod client;
pub mod comments;
pub mod search;
pub mod source;
pub mod types;
