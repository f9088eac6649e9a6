use super::*;
use crate::identity::{ContextualSetting, derive_session_identity};

fn sample_json() -> &'static str {
    r#"{
        "url": "https://Docs.Example.com/guide/?x=1",
        "contentType": "tutorial",
        "markdownContent": "Install with `cargo add`.",
        "codeSnippets": [
            {"language": "rust", "hasVersionInfo": true},
            {"language": "Rust"},
            {"language": "bash", "code": "cargo build"}
        ],
        "mediaElements": [{"type": "image"}, {"type": "video"}, {"type": "image"}],
        "linkAnalysis": {"totalLinks": 12, "internalLinks": 9, "subPagesIdentified": ["/a", "/b"]},
        "contextAnalysis": {
            "analysisScope": "with-parent",
            "totalPagesAnalyzed": 2,
            "contextPages": [{"title": "Overview", "relationship": "parent", "confidence": 0.9}]
        }
    }"#
}

#[test]
fn test_deserialize_full_record() {
    let content: ProcessedContent = serde_json::from_str(sample_json()).unwrap();

    assert_eq!(content.content_type, "tutorial");
    assert_eq!(content.code_snippets.len(), 3);
    assert!(content.code_snippets[0].has_version_info);
    assert!(!content.code_snippets[1].has_version_info);
    assert_eq!(content.media_elements[1].kind, "video");
    assert_eq!(content.link_analysis.internal_links, 9);
    assert_eq!(content.context_pages().len(), 1);
    assert_eq!(content.context_pages()[0].relationship, "parent");
}

#[test]
fn test_deserialize_minimal_record_uses_defaults() {
    let content: ProcessedContent =
        serde_json::from_str(r#"{"url": "https://example.com/"}"#).unwrap();

    assert_eq!(content.content_type, DEFAULT_CONTENT_TYPE);
    assert!(content.markdown_content.is_empty());
    assert!(content.context_analysis.is_none());
    assert_eq!(content.link_analysis, LinkAnalysis::default());
}

#[test]
fn test_contextual_setting() {
    let content: ProcessedContent = serde_json::from_str(sample_json()).unwrap();
    assert_eq!(content.contextual_setting(), ContextualSetting::WithContext);

    let isolated = ProcessedContent::new("https://example.com/", "tutorial");
    assert_eq!(
        isolated.contextual_setting(),
        ContextualSetting::WithoutContext
    );

    let empty_context = isolated.clone().with_context(ContextAnalysis {
        analysis_scope: "single-page".to_string(),
        total_pages_analyzed: 1,
        context_pages: vec![],
    });
    assert_eq!(
        empty_context.contextual_setting(),
        ContextualSetting::WithoutContext
    );
}

#[test]
fn test_canonical_session_matches_derivation() {
    let content: ProcessedContent = serde_json::from_str(sample_json()).unwrap();
    assert_eq!(
        content.canonical_session(),
        derive_session_identity(
            "https://docs.example.com/guide?x=1",
            ContextualSetting::WithContext
        )
    );
}

#[test]
fn test_stats() {
    let content: ProcessedContent = serde_json::from_str(sample_json()).unwrap();
    let stats = content.stats();

    assert_eq!(stats.code_snippets, 3);
    assert_eq!(stats.snippets_with_version_info, 1);
    assert_eq!(stats.languages.get("rust"), Some(&2));
    assert_eq!(stats.languages.get("bash"), Some(&1));
    assert_eq!(stats.media_elements, 3);
    assert_eq!(stats.media_types.get("image"), Some(&2));
    assert_eq!(stats.total_links, 12);
    assert_eq!(stats.internal_links, 9);
    assert_eq!(stats.external_links, 3);
    assert_eq!(stats.sub_pages, 2);
}

#[test]
fn test_stats_tolerates_inconsistent_link_counts() {
    let mut content = ProcessedContent::new("https://example.com/", "mixed");
    content.link_analysis.total_links = 2;
    content.link_analysis.internal_links = 5;

    assert_eq!(content.stats().external_links, 0);
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo wörld", 4), "héll");
    assert_eq!(truncate_chars("short", 100), "short");
    assert_eq!(truncate_chars("", 3), "");
    assert_eq!(truncate_chars("abc", 0), "");
}

#[test]
fn test_truncated_body() {
    let content = ProcessedContent::new("https://example.com/", "mixed").with_markdown("abcdef");
    assert_eq!(content.truncated_body(3), "abc");
}
