//! Compatibility-suggestion flow for a single named component.

use serde::{Deserialize, Serialize};

use crate::ai::client::{AiError, CompletionClient};
use crate::ai::{parse, prompt};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompatiblePartsInput {
    pub component_type: String,
    pub component_name: String,
    pub component_details: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatiblePart {
    pub part_type: String,
    pub part_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatiblePartsOutput {
    pub compatible_parts: Vec<CompatiblePart>,
    #[serde(default)]
    pub potential_issues: Option<Vec<String>>,
}

/// Asks the model for parts compatible with the described component.
pub async fn get_compatible_parts<C: CompletionClient>(
    client: &C,
    input: &CompatiblePartsInput,
) -> Result<CompatiblePartsOutput, AiError> {
    let system = prompt::compatibility_system();
    let user = prompt::compatibility_user(
        &input.component_type,
        &input.component_name,
        input.component_details.as_deref(),
    );
    let raw = client.complete(&system, &user).await?;
    parse::parse_json_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;

    fn input() -> CompatiblePartsInput {
        CompatiblePartsInput {
            component_type: "CPU".into(),
            component_name: "Ryzen 7 7800X3D".into(),
            component_details: None,
        }
    }

    #[actix_web::test]
    async fn parses_parts_and_optional_issues() {
        let client = StubClient {
            response: r#"{"compatibleParts":[{"partType":"Motherboard",
"partName":"B650 Tomahawk","reason":"Socket AM5"}],
"potentialIssues":["Requiere actualización de BIOS"]}"#
                .to_string(),
        };

        let output = get_compatible_parts(&client, &input()).await.unwrap();
        assert_eq!(output.compatible_parts.len(), 1);
        assert_eq!(output.compatible_parts[0].part_type, "Motherboard");
        assert_eq!(output.potential_issues.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn issues_field_may_be_absent() {
        let client = StubClient {
            response: r#"{"compatibleParts":[]}"#.to_string(),
        };

        let output = get_compatible_parts(&client, &input()).await.unwrap();
        assert!(output.compatible_parts.is_empty());
        assert!(output.potential_issues.is_none());
    }
}
