//! Summarizer gateway: prompt construction and feedback assembly.

use chrono::Utc;
use tracing::{debug, instrument};

use sapscout_gemini::TextGenerator;
use sapscout_shared::{FeedbackBlock, Result, TableDefinition};

/// Version of the analysis prompt, recorded in every feedback block.
pub const PROMPT_VERSION: &str = "1.0";

/// Build the analysis prompt for a table definition.
///
/// Deterministic: the same definition always yields the same prompt.
pub fn build_prompt(def: &TableDefinition) -> String {
    let fields = serde_json::to_string_pretty(&def.fields).unwrap_or_default();

    format!(
        "Analyze this SAP table structure and provide a detailed description:\n\
         Table: {}\n\
         Current description: {}\n\
         Fields: {}\n\
         \n\
         Produce a technical description covering:\n\
         1. Primary purpose of the table\n\
         2. Key relationships to other tables\n\
         3. Common use cases\n",
        def.name, def.description, fields
    )
}

/// Run one definition through the text-generation collaborator and wrap
/// the response in a [`FeedbackBlock`].
///
/// Single attempt, no retry. Failures propagate so the caller can turn
/// the whole row into an error result.
#[instrument(skip_all, fields(table = %def.name))]
pub async fn summarize(
    generator: &dyn TextGenerator,
    def: &TableDefinition,
) -> Result<FeedbackBlock> {
    let prompt = build_prompt(def);
    debug!(prompt_len = prompt.len(), "requesting analysis");

    let analysis = generator.generate(&prompt).await?;

    Ok(FeedbackBlock {
        analysis: analysis.trim().to_string(),
        timestamp: Utc::now(),
        model: generator.model_id().to_string(),
        prompt_version: PROMPT_VERSION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sapscout_shared::{FieldRecord, SapScoutError};

    struct StubGenerator {
        reply: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.reply
                .clone()
                .ok_or_else(|| SapScoutError::Generation("quota exhausted".into()))
        }

        fn model_id(&self) -> &str {
            "stub-model"
        }
    }

    fn sample_definition() -> TableDefinition {
        TableDefinition {
            name: "MARA".into(),
            description: "General Material Data".into(),
            fields: vec![FieldRecord {
                name: "MATNR".into(),
                description: "Material Number".into(),
                data_element: "MATNR".into(),
                field_type: "CHAR".into(),
                length: "18".into(),
                decimals: "0".into(),
            }],
            agent_feedback: None,
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let def = sample_definition();
        assert_eq!(build_prompt(&def), build_prompt(&def));
    }

    #[test]
    fn prompt_embeds_name_description_and_fields() {
        let prompt = build_prompt(&sample_definition());
        assert!(prompt.contains("Table: MARA"));
        assert!(prompt.contains("Current description: General Material Data"));
        assert!(prompt.contains("MATNR"));
        assert!(prompt.contains("1. Primary purpose of the table"));
        assert!(prompt.contains("3. Common use cases"));
    }

    #[tokio::test]
    async fn summarize_builds_feedback_block() {
        let generator = StubGenerator {
            reply: Some("  Material master data.  ".into()),
        };

        let feedback = summarize(&generator, &sample_definition()).await.unwrap();
        assert_eq!(feedback.analysis, "Material master data.");
        assert_eq!(feedback.model, "stub-model");
        assert_eq!(feedback.prompt_version, PROMPT_VERSION);
    }

    #[tokio::test]
    async fn summarize_propagates_generator_failure() {
        let generator = StubGenerator { reply: None };

        let err = summarize(&generator, &sample_definition())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn empty_model_reply_yields_empty_analysis() {
        let generator = StubGenerator {
            reply: Some("".into()),
        };

        let feedback = summarize(&generator, &sample_definition()).await.unwrap();
        assert_eq!(feedback.analysis, "");
    }
}
