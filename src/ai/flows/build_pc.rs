//! Build-from-description flow: free text in, one catalog slug per slot out.

use serde::Deserialize;

use crate::ai::client::{AiError, CompletionClient};
use crate::ai::{parse, prompt};
use crate::domain::component::Component;
use crate::domain::types::Category;

/// One slug per slot, keyed by the canonical category names.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SuggestedBuild {
    #[serde(rename = "CPU")]
    pub cpu: String,
    #[serde(rename = "Motherboard")]
    pub motherboard: String,
    #[serde(rename = "RAM")]
    pub ram: String,
    #[serde(rename = "GPU")]
    pub gpu: String,
    #[serde(rename = "Storage")]
    pub storage: String,
    #[serde(rename = "Power Supply")]
    pub power_supply: String,
    #[serde(rename = "Case")]
    pub case: String,
}

impl SuggestedBuild {
    /// Slot/slug pairs in registry order.
    pub fn slugs(&self) -> [(Category, &str); 7] {
        [
            (Category::Cpu, self.cpu.as_str()),
            (Category::Motherboard, self.motherboard.as_str()),
            (Category::Ram, self.ram.as_str()),
            (Category::Gpu, self.gpu.as_str()),
            (Category::Storage, self.storage.as_str()),
            (Category::PowerSupply, self.power_supply.as_str()),
            (Category::Case, self.case.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BuildPcOutput {
    pub build: SuggestedBuild,
}

/// Asks the model for a complete build over the given catalog.
pub async fn build_pc<C: CompletionClient>(
    client: &C,
    catalog: &[Component],
    description: &str,
) -> Result<BuildPcOutput, AiError> {
    let system = prompt::build_pc_system(&prompt::catalog_context(catalog));
    let user = prompt::build_pc_user(description);
    let raw = client.complete(&system, &user).await?;
    parse::parse_json_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;

    #[actix_web::test]
    async fn parses_a_full_seven_slot_build() {
        let client = StubClient {
            response: r#"{"build":{"CPU":"cpu-1","Motherboard":"mb-1","RAM":"ram-1",
"GPU":"gpu-1","Storage":"ssd-1","Power Supply":"psu-1","Case":"case-1"}}"#
                .to_string(),
        };

        let output = build_pc(&client, &[], "una pc para gaming").await.unwrap();
        let slugs = output.build.slugs();
        assert_eq!(slugs.len(), 7);
        assert_eq!(slugs[5], (Category::PowerSupply, "psu-1"));
    }

    #[actix_web::test]
    async fn missing_slot_is_a_malformed_output() {
        let client = StubClient {
            response: r#"{"build":{"CPU":"cpu-1"}}"#.to_string(),
        };

        let result = build_pc(&client, &[], "lo que sea").await;
        assert!(matches!(result, Err(AiError::Malformed(_))));
    }

    #[actix_web::test]
    async fn empty_model_output_maps_to_empty_error() {
        let client = StubClient {
            response: String::new(),
        };

        let result = build_pc(&client, &[], "lo que sea").await;
        assert!(matches!(result, Err(AiError::Empty)));
    }
}
