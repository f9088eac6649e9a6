use std::fmt::Write;

use crate::content::{ContentStats, ProcessedContent};

use super::types::Dimension;
use super::weights::ContentType;

/// Grading instructions for each dimension.
fn criteria(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Relevance => {
            "Judge how well the page serves its apparent audience and purpose. \
             Consider whether the title, headings and body stay on topic, whether \
             examples match the stated goal, and whether related pages make this \
             page redundant or out of place."
        }
        Dimension::Freshness => {
            "Judge how current the page is. Look for deprecated APIs, outdated \
             version numbers, stale screenshots or links, and whether code \
             snippets state the versions they target."
        }
        Dimension::Clarity => {
            "Judge how easy the page is to read and follow. Consider structure, \
             heading hierarchy, sentence length, jargon without definitions, and \
             whether code and media support the prose."
        }
        Dimension::Accuracy => {
            "Judge whether the technical content is correct. Look for code that \
             would not run, inconsistent parameter names, contradictions between \
             prose and examples, and claims that conflict with related pages."
        }
        Dimension::Completeness => {
            "Judge whether the page covers what a reader needs. Look for missing \
             prerequisites, unexplained error cases, absent examples, and gaps \
             that sub-pages or related pages do not fill."
        }
    }
}

fn write_stats(out: &mut String, stats: &ContentStats) {
    let _ = writeln!(
        out,
        "- Code snippets: {} ({} with version info)",
        stats.code_snippets, stats.snippets_with_version_info
    );
    if !stats.languages.is_empty() {
        let langs: Vec<String> = stats
            .languages
            .iter()
            .map(|(lang, n)| format!("{lang}: {n}"))
            .collect();
        let _ = writeln!(out, "- Snippet languages: {}", langs.join(", "));
    }
    let _ = writeln!(out, "- Media elements: {}", stats.media_elements);
    if !stats.media_types.is_empty() {
        let kinds: Vec<String> = stats
            .media_types
            .iter()
            .map(|(kind, n)| format!("{kind}: {n}"))
            .collect();
        let _ = writeln!(out, "- Media types: {}", kinds.join(", "));
    }
    let _ = writeln!(
        out,
        "- Links: {} total, {} internal, {} external",
        stats.total_links, stats.internal_links, stats.external_links
    );
    let _ = writeln!(out, "- Sub-pages identified: {}", stats.sub_pages);
}

/// Builds the grading prompt for one dimension.
///
/// The first line always names the dimension (`Quality dimension: {name}`).
pub fn build_prompt(
    dimension: Dimension,
    content: &ProcessedContent,
    content_type: ContentType,
    max_content_chars: usize,
) -> String {
    let mut out = String::with_capacity(max_content_chars + 2048);
    let profile = content_type.profile();

    let _ = writeln!(out, "Quality dimension: {}", dimension);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "You are reviewing a documentation page for {}.",
        dimension
    );
    let _ = writeln!(out, "{}", criteria(dimension));
    let _ = writeln!(out);
    let _ = writeln!(out, "URL: {}", content.url);
    let _ = writeln!(
        out,
        "Content type: {} ({} weight for this content type: {}%)",
        content_type,
        dimension,
        profile.percent(dimension)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Page statistics:");
    write_stats(&mut out, &content.stats());

    let pages = content.context_pages();
    if !pages.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Related pages analyzed with this page:");
        for page in pages {
            let _ = writeln!(
                out,
                "- {} (relationship: {}, confidence: {:.2})",
                page.title, page.relationship, page.confidence
            );
        }
    }

    let body = content.truncated_body(max_content_chars);
    let _ = writeln!(out);
    let _ = writeln!(out, "Page content:");
    let _ = writeln!(out, "<content>");
    let _ = writeln!(out, "{}", body);
    if body.len() < content.markdown_content.len() {
        let _ = writeln!(out, "[content truncated]");
    }
    let _ = writeln!(out, "</content>");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Respond with a single JSON object and nothing else, in this shape:"
    );
    out.push_str(
        r#"{"score": <integer 0-100>, "findings": ["<observation>", ...], "recommendations": [{"priority": "high|medium|low", "action": "<what to change>", "impact": "<why it matters>"}]}"#,
    );
    out.push('\n');

    out
}
