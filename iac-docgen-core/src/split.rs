//! Splits the model's combined answer into the README and the diagram script.
//!
//! The model is asked for the README followed by one ```` ```python ```` block.
//! Nothing guarantees it complies, so every step here tolerates noise (wrapper
//! fences, labels announcing file names, missing closers) but refuses to hand
//! back an empty artifact.

use tracing::debug;

use crate::contract::{ArtifactPair, DiagramArtifact, DocumentArtifact, ResponseSplitter};
use crate::error::MalformedResponseError;

const FENCE: &str = "```";
const DIAGRAM_FENCE: &str = "```python";
const DOCUMENT_FENCE_TAGS: [&str; 2] = ["markdown", "md"];

/// File names the model tends to announce right before each section.
const README_LABEL: &str = "README.md";
const DIAGRAM_LABEL: &str = "generate_diagram.py";

/// Default splitting strategy: the first ```` ```python ```` fence is the split point.
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceSplitter;

impl ResponseSplitter for FenceSplitter {
    fn split(&self, response: &str) -> Result<ArtifactPair, MalformedResponseError> {
        split_response(response)
    }
}

/// Splits `response` into the documentation and diagram artifacts.
///
/// Everything before the first ```` ```python ```` marker is the document, the
/// text between that marker and the next ```` ``` ```` is the diagram. Fenced
/// blocks after that are discarded. A missing closing fence means the diagram
/// runs to the end of the response.
pub fn split_response(response: &str) -> Result<ArtifactPair, MalformedResponseError> {
    let start = response
        .find(DIAGRAM_FENCE)
        .ok_or(MalformedResponseError::MissingDiagramFence)?;
    let (doc_candidate, diagram_candidate) = response.split_at(start);

    let diagram = extract_diagram(diagram_candidate)?;
    let document = clean_document(doc_candidate)?;
    debug!(
        document_bytes = document.0.len(),
        diagram_bytes = diagram.0.len(),
        "Split generation response"
    );
    Ok(ArtifactPair { document, diagram })
}

/// `candidate` starts at the opening ```` ```python ```` marker.
fn extract_diagram(candidate: &str) -> Result<DiagramArtifact, MalformedResponseError> {
    let after_marker = &candidate[DIAGRAM_FENCE.len()..];
    // The rest of the opening line is an info string (`python3`, `title=...`), not code.
    let body = match after_marker.find('\n') {
        Some(eol) => &after_marker[eol + 1..],
        None => "",
    };
    let body = match body.find(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };
    let body = body.trim();
    if body.is_empty() {
        return Err(MalformedResponseError::EmptyDiagram);
    }
    Ok(DiagramArtifact(body.to_string()))
}

fn clean_document(candidate: &str) -> Result<DocumentArtifact, MalformedResponseError> {
    let mut doc = candidate.trim();

    doc = drop_first_line_if(doc, |line| is_file_label(line, README_LABEL));
    doc = drop_first_line_if(doc, is_document_opener);
    doc = drop_last_line_if(doc, |line| is_file_label(line, DIAGRAM_LABEL));

    // A wrapper closer left without its opener makes the fence count odd.
    // Inner blocks such as the deploy commands come in pairs and are kept.
    if count_fence_lines(doc) % 2 == 1 {
        doc = drop_last_line_if(doc, |line| line.trim() == FENCE);
        doc = drop_last_line_if(doc, |line| is_file_label(line, DIAGRAM_LABEL));
    }

    if doc.is_empty() {
        return Err(MalformedResponseError::EmptyDocument);
    }
    Ok(DocumentArtifact(doc.to_string()))
}

fn is_document_opener(line: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .map(|tag| {
            DOCUMENT_FENCE_TAGS
                .iter()
                .any(|t| tag.trim().eq_ignore_ascii_case(t))
        })
        .unwrap_or(false)
}

/// A line such as `### 2. **generate_diagram.py**:` that only names a file.
fn is_file_label(line: &str, file_name: &str) -> bool {
    let core = line.trim().trim_matches(|c: char| {
        matches!(c, '#' | '*' | '`' | ':' | '.' | '_' | '-') || c.is_whitespace() || c.is_ascii_digit()
    });
    core.eq_ignore_ascii_case(file_name)
}

fn count_fence_lines(text: &str) -> usize {
    text.lines()
        .filter(|l| l.trim_start().starts_with(FENCE))
        .count()
}

fn drop_first_line_if(text: &str, pred: impl Fn(&str) -> bool) -> &str {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    if pred(first) {
        rest.trim()
    } else {
        text
    }
}

fn drop_last_line_if(text: &str, pred: impl Fn(&str) -> bool) -> &str {
    let (rest, last) = text.rsplit_once('\n').unwrap_or(("", text));
    if pred(last) {
        rest.trim()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_labels_are_recognised_with_decoration() {
        assert!(is_file_label("### 2. **generate_diagram.py**:", DIAGRAM_LABEL));
        assert!(is_file_label("`generate_diagram.py`", DIAGRAM_LABEL));
        assert!(is_file_label("# README.md", README_LABEL));
        assert!(!is_file_label("Run generate_diagram.py to render it", DIAGRAM_LABEL));
    }

    #[test]
    fn document_opener_accepts_markdown_and_md_tags() {
        assert!(is_document_opener("```markdown"));
        assert!(is_document_opener("```md "));
        assert!(!is_document_opener("```bash"));
        assert!(!is_document_opener("```"));
    }

    #[test]
    fn line_helpers_leave_text_alone_when_predicate_fails() {
        let text = "a\nb\nc";
        assert_eq!(drop_first_line_if(text, |l| l == "x"), text);
        assert_eq!(drop_last_line_if(text, |l| l == "c"), "a\nb");
        assert_eq!(drop_first_line_if(text, |l| l == "a"), "b\nc");
    }
}
