//! Input model: the processed-document record produced upstream.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{
    CodeSnippet, ContentStats, ContextAnalysis, ContextPage, DEFAULT_CONTENT_TYPE, LinkAnalysis,
    MediaElement, ProcessedContent, truncate_chars,
};
