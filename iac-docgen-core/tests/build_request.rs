use iac_docgen_core::contract::{Role, SourceCorpus};
use iac_docgen_core::prompt::{
    build_request, catalog_entries, DIAGRAM_IMAGE_FILENAME, GITHUB_ACTIONS_ICON_URL,
};

fn corpus(folder: &str, text: &str) -> SourceCorpus {
    SourceCorpus {
        folder_name: folder.to_string(),
        text: text.to_string(),
        file_count: 1,
    }
}

#[test]
fn test_request_has_system_then_user_message_carrying_corpus() {
    let code = "resource \"aws_instance\" \"web\" {}\n\n";
    let request = build_request("network", &corpus("network", code));

    assert_eq!(request.folder_name, "network");
    let [instruction, task] = request.messages();
    assert_eq!(instruction.role, Role::System);
    assert_eq!(task.role, Role::User);
    assert!(instruction.content.contains(code));
    assert!(task.content.contains(code));
    assert!(instruction.content.contains("`network`"));
}

#[test]
fn test_instruction_encodes_readme_layout_and_diagram_rules() {
    let request = build_request("edge", &corpus("edge", "x"));
    let text = &request.instruction.content;

    let headings = [
        "Project Name",
        "Overview",
        "Key Components",
        "Architecture",
        "Prerequisites",
        "Deployment Instructions",
        "Destruction Instructions",
        "Notes & Considerations",
    ];
    let mut last = 0;
    for heading in headings {
        let pos = text[last..]
            .find(heading)
            .unwrap_or_else(|| panic!("missing or out-of-order heading {heading}"));
        last += pos;
    }

    assert!(text.contains("![Diagram](architecture.png)"));
    assert!(text.contains(DIAGRAM_IMAGE_FILENAME));
    assert!(text.contains("Omit SecurityGroups"));
    assert!(text.contains("diagrams.aws.network.PrivateSubnet"));
    assert!(text.contains(GITHUB_ACTIONS_ICON_URL));
}

#[test]
fn test_instruction_embeds_entire_node_catalog() {
    let request = build_request("data", &corpus("data", "x"));
    let entries: Vec<&str> = catalog_entries().collect();

    assert!(entries.len() > 400, "catalog unexpectedly small: {}", entries.len());
    assert!(entries.contains(&"diagrams.aws.compute.EC2"));
    assert!(entries.contains(&"diagrams.aws.network.ElbApplicationLoadBalancer"));
    for entry in entries {
        assert!(entry.starts_with("diagrams.aws."), "bad entry {entry}");
        assert!(request.instruction.content.contains(entry));
    }
}

#[test]
fn test_instruction_differs_between_folders_only_in_name_and_corpus() {
    let a = build_request("alpha", &corpus("alpha", "CODE"));
    let b = build_request("beta", &corpus("beta", "CODE"));

    assert_eq!(
        a.instruction.content.replace("alpha", "NAME"),
        b.instruction.content.replace("beta", "NAME")
    );
    assert_eq!(a.task, b.task);
}
