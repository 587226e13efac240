/// Assemble the markdown document written by `scenarist generate`.
///
/// # Examples
///
/// ```
/// use scenarist_prompt::render_document;
///
/// let doc = render_document("Changes Summary:\n", "1. foo works", None);
/// assert!(doc.starts_with("# Generated Test Scenarios"));
/// assert!(!doc.contains("# Generated Test Code"));
/// ```
pub fn render_document(summary: &str, scenarios: &str, test_code: Option<&str>) -> String {
    let mut doc = String::from("# Generated Test Scenarios\n\n");
    doc.push_str("## Summary\n\n```\n");
    doc.push_str(summary.trim_end());
    doc.push_str("\n```\n\n## Scenarios\n\n");
    doc.push_str(scenarios.trim());
    doc.push('\n');

    if let Some(code) = test_code {
        doc.push_str("\n# Generated Test Code\n\n");
        doc.push_str(code.trim());
        doc.push('\n');
    }
    doc
}
