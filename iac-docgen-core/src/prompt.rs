//! Builds the generation request for one folder.
//!
//! The instruction message fixes the README layout, the closed set of
//! `diagrams` node identifiers the model may use, and the rules for laying out
//! the diagram. It is the same for every folder apart from the folder name and
//! corpus embedded in it.

use crate::contract::{GenerationRequest, Message, Role, SourceCorpus};

/// Every `diagrams.aws.*` node the generated script is allowed to import, one per line.
pub const DIAGRAM_CATALOG: &str = include_str!("../assets/aws_diagram_nodes.txt");

/// Image the generated diagram script renders, referenced from the README.
pub const DIAGRAM_IMAGE_FILENAME: &str = "architecture.png";

/// Icon fetched by the generated script when GitHub Actions is part of the stack.
pub const GITHUB_ACTIONS_ICON_URL: &str =
    "https://iconduck.com/api/v2/vectors/vctrzwq272bb/media/png/256/download";

/// Iterates over the permitted node identifiers, e.g. `diagrams.aws.compute.EC2`.
pub fn catalog_entries() -> impl Iterator<Item = &'static str> {
    DIAGRAM_CATALOG
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

const README_LAYOUT: &str = r#"### 📌 **Project Name**
- Based on the folder name and detected infrastructure, generate an appropriate title.

### 🏗 **Overview**
- Explain the infrastructure in simple terms.
- Indicate whether Terraform or CDK is used.
- State the purpose of this infrastructure (e.g., "This infrastructure deploys a Kubernetes cluster on AWS using EKS and Terraform").

### 🏢 **Key Components**
- List the AWS services being used and their purpose.
  - 📦 **Compute**: EC2, Lambda, EKS, ECS, etc.
  - 🗄 **Storage**: S3, EBS, EFS, etc.
  - 📡 **Networking**: VPC, ALB/NLB, Route 53, etc.
  - 🔐 **Security**: IAM, Security Groups, KMS, etc.
  - 🛠 **Others**: RDS, DynamoDB, SQS, SNS, etc.

### 📜 **Architecture**
- Describe the overall architecture in text form.
- Include a reference to the generated diagram: `![Diagram](architecture.png)`

### 🚀 **Prerequisites**
- List the required tools to deploy the infrastructure.
  - Terraform (`>=1.3.0`)
  - AWS CLI (`>=2.0`)
  - CDK (`>=2.50.0`) if applicable
  - Python with the `diagrams` library

### 📖 **Deployment Instructions**
```bash
terraform init
terraform apply -auto-approve
```

### 🔄 **Destruction Instructions**
```bash
terraform destroy -auto-approve
```

### 🎯 **Notes & Considerations**
- Mention any customizable configurations in variables or `tfvars`.
- Indicate external dependencies or integrations.
- Provide cost or AWS service limitations warnings."#;

const EXAMPLE_DIAGRAM: &str = r#"```python
from urllib.request import urlretrieve

from diagrams import Cluster, Diagram
from diagrams.aws.compute import EC2
from diagrams.aws.network import ElbApplicationLoadBalancer
from diagrams.custom import Custom

github_actions_url = (
    "https://iconduck.com/api/v2/vectors/vctrzwq272bb/media/png/256/download"
)
github_actions_icon = "github_actions_icon.png"

urlretrieve(github_actions_url, github_actions_icon)

with Diagram("Pandape Gateway Infrastructure", show=False, filename="architecture"):
    vcs = Custom("GitHub Actions", icon_path="github_actions_icon.png")

    with Cluster("VPC"):
        with Cluster("Public Subnet"):
            app_lb = ElbApplicationLoadBalancer("Application Load Balancer")

        with Cluster("EC2 Instances"):
            with Cluster("Private Subnet"):
                ec2_instances = [EC2("Instance 1"), EC2("Instance 2")]

            app_lb >> ec2_instances
            vcs >> ec2_instances
```"#;

fn instruction_text(folder_name: &str, corpus: &str) -> String {
    format!(
        r#"You are a system that generates documentation for AWS infrastructure code.
Your goal is to analyze the provided AWS infrastructure code and generate two files:
1. **README.md** for the `{folder_name}` folder with the following structure:

{README_LAYOUT}

---

2. **generate_diagram.py** for the `{folder_name}` folder to create an architecture diagram using the `diagrams` library.
   - The code should represent the detected AWS services and their relationships.
   - Use icons from `diagrams.aws.compute`, `diagrams.aws.network`, `diagrams.aws.database`, etc.
   - If a VPC is detected, group the elements within it using the `Cluster` resource.
   - If a VpcId is provided use it as the name of the VPC Cluster, otherwise use the VPC name.
   - If private subnets are detected use the `diagrams.aws.network.PrivateSubnet` resource, if public subnets are detected use the `diagrams.aws.network.PublicSubnet` resource. If you cannot tell whether a subnet is public or private, use `diagrams.aws.network.PrivateSubnet`.
   - Omit SecurityGroups resources.
   - The filename for the diagram should be `{DIAGRAM_IMAGE_FILENAME}`.
   - If there are any GitHubActions resources in the code, render them with the following code instead, only if applicable:

     from diagrams.custom import Custom
     from urllib.request import urlretrieve

     github_actions_url = "{GITHUB_ACTIONS_ICON_URL}"
     github_actions_icon = "github_actions_icon.png"

     urlretrieve(github_actions_url, github_actions_icon)

     with Diagram("DiagramName", show=False, filename="architecture"):
        vcs = Custom("GitHub Actions", icon_path="github_actions_icon.png")

   ---

   - The following list contains the only `diagrams` resources you may use. Do not invent diagrams code; if a resource is not in this list, leave it out:

{catalog}

- Use the following example to create a diagram:

{EXAMPLE_DIAGRAM}

**AWS Infrastructure Code for `{folder_name}`:**
```
{corpus}
```

Generate only the markdown file and the diagram code. Put the diagram code in a single ```python block after the README."#,
        catalog = DIAGRAM_CATALOG.trim_end(),
    )
}

fn task_text(corpus: &str) -> String {
    format!(
        "Analyze the following AWS infrastructure code (written in Terraform/CDK) and generate two files, one for the diagram and one for the README.\n\n{corpus}"
    )
}

/// Composes the instruction and task messages for `folder_name`.
///
/// Pure string composition: the corpus is embedded as-is, without validation.
pub fn build_request(folder_name: &str, corpus: &SourceCorpus) -> GenerationRequest {
    GenerationRequest {
        folder_name: folder_name.to_string(),
        instruction: Message {
            role: Role::System,
            content: instruction_text(folder_name, &corpus.text),
        },
        task: Message {
            role: Role::User,
            content: task_text(&corpus.text),
        },
    }
}
