use docscore::content::{CodeSnippet, ContextAnalysis, ContextPage, LinkAnalysis, MediaElement};
use docscore::{Dimension, ProcessedContent};

/// Scores used by the tutorial scenario, in `Dimension::ALL` order.
pub const TUTORIAL_SCORES: [u32; 5] = [80, 70, 90, 60, 75];

pub fn tutorial_content() -> ProcessedContent {
    let mut content = ProcessedContent::new("https://docs.example.com/guide/?x=1", "tutorial")
        .with_markdown("# Getting started\n\nInstall the CLI with `cargo install`, then run `tool init`.");
    content.code_snippets = vec![
        CodeSnippet {
            language: "bash".into(),
            has_version_info: false,
            code: Some("cargo install tool".into()),
        },
        CodeSnippet {
            language: "toml".into(),
            has_version_info: true,
            code: None,
        },
    ];
    content.media_elements = vec![MediaElement {
        kind: "image".into(),
        alt: Some("Architecture diagram".into()),
    }];
    content.link_analysis = LinkAnalysis {
        total_links: 12,
        internal_links: 9,
        sub_pages_identified: vec!["https://docs.example.com/guide/install".into()],
    };
    content
}

pub fn with_related_pages(content: ProcessedContent) -> ProcessedContent {
    content.with_context(ContextAnalysis {
        analysis_scope: "with-parent-and-children".into(),
        total_pages_analyzed: 3,
        context_pages: vec![
            ContextPage {
                title: "Docs home".into(),
                relationship: "parent".into(),
                confidence: 0.95,
            },
            ContextPage {
                title: "Install".into(),
                relationship: "child".into(),
                confidence: 0.8,
            },
        ],
    })
}

pub fn assessment(score: u32) -> String {
    format!(
        "Sure! Here is the assessment.\n```json\n{{\"score\": {score}, \"findings\": [\"Observed {score}\"], \"recommendations\": [{{\"priority\": \"medium\", \"action\": \"Add examples\", \"impact\": \"Faster onboarding\"}}]}}\n```"
    )
}

pub fn prompt_marker(dimension: Dimension) -> String {
    format!("Quality dimension: {}", dimension)
}
