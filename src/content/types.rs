use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::{ContextualSetting, NormalizedUrl, SessionIdentity, normalize_url};

/// Content type assumed when the upstream record omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "mixed";

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Document record written by the upstream content-processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedContent {
    /// Source URL as fetched (not normalized).
    pub url: String,
    /// Detected genre label, e.g. `tutorial` or `api-reference`.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Document body as markdown / plain text.
    #[serde(default)]
    pub markdown_content: String,
    #[serde(default)]
    pub code_snippets: Vec<CodeSnippet>,
    #[serde(default)]
    pub media_elements: Vec<MediaElement>,
    #[serde(default)]
    pub link_analysis: LinkAnalysis,
    /// Related pages analyzed alongside the document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_analysis: Option<ContextAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub has_version_info: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaElement {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkAnalysis {
    pub total_links: usize,
    pub internal_links: usize,
    pub sub_pages_identified: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextAnalysis {
    /// Free-form scope label, e.g. `single-page` or `with-parent-and-children`.
    pub analysis_scope: String,
    pub total_pages_analyzed: usize,
    pub context_pages: Vec<ContextPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextPage {
    pub title: String,
    /// Relationship to the scored document, e.g. `parent`, `child`, `sibling`.
    pub relationship: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Aggregate counts embedded into every dimension prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub code_snippets: usize,
    pub snippets_with_version_info: usize,
    /// Snippet count per language tag, sorted by tag.
    pub languages: BTreeMap<String, usize>,
    pub media_elements: usize,
    /// Media count per type tag, sorted by tag.
    pub media_types: BTreeMap<String, usize>,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub sub_pages: usize,
}

impl ProcessedContent {
    /// Creates a minimal record; mostly useful for tests and tooling.
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
            markdown_content: String::new(),
            code_snippets: Vec::new(),
            media_elements: Vec::new(),
            link_analysis: LinkAnalysis::default(),
            context_analysis: None,
        }
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown_content = markdown.into();
        self
    }

    pub fn with_context(mut self, context: ContextAnalysis) -> Self {
        self.context_analysis = Some(context);
        self
    }

    /// Related pages discovered upstream (empty when analyzed in isolation).
    pub fn context_pages(&self) -> &[ContextPage] {
        self.context_analysis
            .as_ref()
            .map(|c| c.context_pages.as_slice())
            .unwrap_or(&[])
    }

    /// `with-context` iff at least one related page was discovered.
    pub fn contextual_setting(&self) -> ContextualSetting {
        ContextualSetting::from_related_page_count(self.context_pages().len())
    }

    pub fn normalized_url(&self) -> NormalizedUrl {
        normalize_url(&self.url)
    }

    /// Canonical session identity of this document, as the upstream stage derives it.
    pub fn canonical_session(&self) -> SessionIdentity {
        SessionIdentity::from_normalized(&self.normalized_url(), self.contextual_setting())
    }

    pub fn stats(&self) -> ContentStats {
        let mut languages = BTreeMap::new();
        for snippet in &self.code_snippets {
            let lang = if snippet.language.trim().is_empty() {
                "unknown".to_string()
            } else {
                snippet.language.trim().to_lowercase()
            };
            *languages.entry(lang).or_insert(0) += 1;
        }

        let mut media_types = BTreeMap::new();
        for media in &self.media_elements {
            let kind = if media.kind.trim().is_empty() {
                "unknown".to_string()
            } else {
                media.kind.trim().to_lowercase()
            };
            *media_types.entry(kind).or_insert(0) += 1;
        }

        let links = &self.link_analysis;
        ContentStats {
            code_snippets: self.code_snippets.len(),
            snippets_with_version_info: self
                .code_snippets
                .iter()
                .filter(|s| s.has_version_info)
                .count(),
            languages,
            media_elements: self.media_elements.len(),
            media_types,
            total_links: links.total_links,
            internal_links: links.internal_links,
            external_links: links.total_links.saturating_sub(links.internal_links),
            sub_pages: links.sub_pages_identified.len(),
        }
    }

    /// Returns the body cut to at most `max_chars` characters (never splits a char).
    pub fn truncated_body(&self, max_chars: usize) -> &str {
        truncate_chars(&self.markdown_content, max_chars)
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
