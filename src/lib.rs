// commentmood: sentiment report for Reddit comments.
//
// This is the library root. Each module corresponds to one stage of the
// fetch → clean → classify → report pipeline.

pub mod config;
pub mod pipeline;
pub mod reddit;
pub mod report;
pub mod sentiment;
pub mod status;
pub mod text;
