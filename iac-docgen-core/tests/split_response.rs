use iac_docgen_core::contract::ResponseSplitter;
use iac_docgen_core::error::MalformedResponseError;
use iac_docgen_core::split::{split_response, FenceSplitter};

const WELL_FORMED: &str = r#"```markdown
# 📌 Network Gateway

### 🏢 **Key Components**
- 📦 **Compute**: EC2 instance `aws_instance.web`.
- 📡 **Networking**: Application Load Balancer `aws_lb.front`.

### 📖 **Deployment Instructions**
```bash
terraform init
terraform apply -auto-approve
```
```

### generate_diagram.py
```python
from diagrams import Diagram
from diagrams.aws.compute import EC2
from diagrams.aws.network import ElbApplicationLoadBalancer

with Diagram("Network", show=False, filename="architecture"):
    ElbApplicationLoadBalancer("front") >> EC2("web")
```
"#;

#[test]
fn test_split_well_formed_response_yields_clean_artifacts() {
    let pair = split_response(WELL_FORMED).expect("well-formed response should split");

    let doc = pair.document.as_str();
    assert!(doc.starts_with("# 📌 Network Gateway"), "doc: {doc}");
    assert!(doc.contains("Key Components"));
    assert!(!doc.contains("```markdown"));
    assert!(!doc.contains("```python"));
    assert!(!doc.contains("generate_diagram.py"));
    // The deploy block keeps both its fences.
    assert!(doc.ends_with("terraform apply -auto-approve\n```"), "doc: {doc}");

    let diagram = pair.diagram.as_str();
    assert!(diagram.starts_with("from diagrams import Diagram"));
    assert!(diagram.ends_with(r#"ElbApplicationLoadBalancer("front") >> EC2("web")"#));
    assert!(!diagram.contains("```"));
}

#[test]
fn test_split_is_a_pure_function_of_its_input() {
    let first = split_response(WELL_FORMED).unwrap();
    let second = split_response(WELL_FORMED).unwrap();
    assert_eq!(first, second);
    assert_eq!(FenceSplitter.split(WELL_FORMED).unwrap(), first);
}

#[test]
fn test_split_without_python_fence_fails() {
    let response = "# README\n\nSome text\n\n```bash\nterraform init\n```\n";
    assert_eq!(
        split_response(response).unwrap_err(),
        MalformedResponseError::MissingDiagramFence
    );
    assert_eq!(
        split_response("").unwrap_err(),
        MalformedResponseError::MissingDiagramFence
    );
}

#[test]
fn test_split_keeps_only_first_python_block() {
    let response = "# Title\n\nBody\n\n```python\nfirst = 1\n```\n\nMore prose\n\n```python\nsecond = 2\n```\n";
    let pair = split_response(response).unwrap();
    assert_eq!(pair.diagram.as_str(), "first = 1");
    assert_eq!(pair.document.as_str(), "# Title\n\nBody");
}

#[test]
fn test_split_without_closing_fence_takes_rest_of_response() {
    let response = "# Title\n\n```python\nfrom diagrams import Diagram\nprint('x')\n";
    let pair = split_response(response).unwrap();
    assert_eq!(
        pair.diagram.as_str(),
        "from diagrams import Diagram\nprint('x')"
    );
}

#[test]
fn test_split_discards_info_string_of_opening_fence() {
    let response = "# Title\n```python3\nimport diagrams\n```";
    let pair = split_response(response).unwrap();
    assert_eq!(pair.diagram.as_str(), "import diagrams");
}

#[test]
fn test_split_unwrapped_document_keeps_trailing_code_block() {
    let response = "# Title\n\n### Destruction Instructions\n```bash\nterraform destroy -auto-approve\n```\n\n```python\nx = 1\n```";
    let pair = split_response(response).unwrap();
    assert_eq!(
        pair.document.as_str(),
        "# Title\n\n### Destruction Instructions\n```bash\nterraform destroy -auto-approve\n```"
    );
}

#[test]
fn test_split_strips_readme_label_and_md_fence() {
    let response = "**README.md**\n```md\n# Title\n\nText\n```\n\n2. **generate_diagram.py**:\n```python\nx = 1\n```";
    let pair = split_response(response).unwrap();
    assert_eq!(pair.document.as_str(), "# Title\n\nText");
    assert_eq!(pair.diagram.as_str(), "x = 1");
}

#[test]
fn test_split_empty_diagram_block_fails() {
    let response = "# Title\n\n```python\n\n```\n";
    assert_eq!(
        split_response(response).unwrap_err(),
        MalformedResponseError::EmptyDiagram
    );
}

#[test]
fn test_split_empty_document_fails() {
    let response = "```markdown\n```\n```python\nx = 1\n```";
    assert_eq!(
        split_response(response).unwrap_err(),
        MalformedResponseError::EmptyDocument
    );
}
