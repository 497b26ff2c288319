//! Instruction payload sent to the generative model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::Category;

/// Sampling parameters forwarded verbatim as `generationConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Gemini `generateContent` request body.
    pub fn to_request(&self, config: &GenerationConfig) -> Value {
        json!({
            "contents": [
                {
                    "parts": [
                        { "text": self.system },
                        { "text": self.user },
                    ]
                }
            ],
            "generationConfig": config,
        })
    }
}

const OUTPUT_SHAPE: &str = r#"{
  "items": [
    {
      "id": "unique-id",
      "description": "Concise description of the lifestyle factor",
      "category": "<CATEGORIES>",
      "impact": -0.0000057,
      "confidence": 0.8,
      "interactions": [
        {
          "itemId": "id-of-interacting-factor",
          "effect": "enhances|diminishes|neutralizes",
          "description": "How this interaction works"
        }
      ],
      "recommendations": ["Specific actionable recommendation"],
      "sources": ["Brief scientific source or study reference"]
    }
  ],
  "netImpact": -0.0000114
}"#;

fn category_list(separator: &str) -> String {
    Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn system_instructions() -> String {
    let shape = OUTPUT_SHAPE.replace("<CATEGORIES>", &category_list("|"));

    format!(
        "You are an expert longevity analyst with deep knowledge of scientific research on lifestyle factors affecting lifespan.

TASK:
Analyze the user's daily journal entry and extract distinct lifestyle factors. For each factor:
1. Categorize it as one of: {categories}
2. Estimate its impact on lifespan in fractional years (negative for a reduction)
3. Consider interaction effects with the other identified factors and list them under \"interactions\"
4. Give a confidence between 0 and 1 reflecting the strength of the scientific evidence
5. Suggest actionable improvements

OUTPUT FORMAT:
Respond with exactly one JSON object inside a ```json fenced block, with no comments, shaped like:
{shape}
\"netImpact\" is the sum of all item impacts.

CALIBRATION:
- A single day's action typically changes lifespan by seconds or a few minutes at most, never hours or days
- 1 second = 0.00000003 years, 1 minute = 0.0000019 years, 1 hour = 0.000114 years
- Example: -0.0000029 years is roughly -90 seconds; -0.000019 years is roughly -10 minutes
- Time with friends typically adds 15 to 30 seconds for a single day

ANALYSIS PRINCIPLES:
- Base estimates on peer-reviewed research
- Consider both immediate and long-term effects
- Acknowledge uncertainty through the confidence value
- Focus on the most significant factors first
- If you identify concerning patterns (e.g. signs of depression, harmful substance use), include them with appropriate sensitivity",
        categories = category_list(", "),
        shape = shape,
    )
}

/// Deterministic prompt for one day's journal text.
pub fn build_prompt(day_description: &str) -> Prompt {
    Prompt {
        system: system_instructions(),
        user: format!("User's journal entry: {}", day_description.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("ran 5k"), build_prompt("ran 5k"));
    }

    #[test]
    fn prompt_lists_every_category_and_anchor() {
        let prompt = build_prompt("slept until noon");
        for category in Category::ALL {
            assert!(prompt.system.contains(category.as_str()), "{category}");
        }
        assert!(prompt.system.contains("1 second = 0.00000003 years"));
        assert!(prompt.system.contains("1 minute = 0.0000019 years"));
        assert!(prompt.system.contains("1 hour = 0.000114 years"));
        assert!(prompt.system.contains("interaction"));
        assert!(prompt.system.contains("\"netImpact\""));
        assert_eq!(prompt.user, "User's journal entry: slept until noon");
    }

    #[test]
    fn request_body_carries_generation_config() {
        let request = build_prompt("ate salad").to_request(&GenerationConfig::default());
        let parts = &request["contents"][0]["parts"];
        assert_eq!(parts.as_array().map(Vec::len), Some(2));
        assert_eq!(parts[1]["text"], "User's journal entry: ate salad");
        assert_eq!(request["generationConfig"]["topK"], 40);
        assert_eq!(request["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(request["generationConfig"]["temperature"], 0.2);
    }
}
