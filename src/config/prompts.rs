//! Prompt templates for Spotter.
//!
//! The coach template can be replaced by placing a `coach.toml` file in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub coach: CoachPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt used to answer a fitness question from retrieved context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachPrompts {
    pub template: String,
}

impl Default for CoachPrompts {
    fn default() -> Self {
        Self {
            template: r#"As {{coach_name}}'s AI fitness assistant, use the context to answer the query. Follow these guidelines:

1. Style: Direct, informative, and encouraging. Use "we" for shared journey.
2. Content: Focus on {{program}} principles:
    - Proper form and technique
    - Mind-muscle connection
    - Functional training
    - Injury prevention
3. Explain: Briefly cover biomechanics and muscle activation.
4. Tailor: Consider user's potential limitations, offer modifications if needed.
5. Motivate: Include a brief encouragement or {{program}} catchphrase.
6. Honesty: If unsure, say so. Don't speculate.

Context: {{context}}

User Query: {{query}}

Response:"#
                .to_string(),
        }
    }
}

/// Variables every template can rely on unless overridden in config.
fn default_variables() -> HashMap<String, String> {
    HashMap::from([
        ("coach_name".to_string(), "Jeff Cavaliere".to_string()),
        ("program".to_string(), "AthleanX".to_string()),
    ])
}

impl Prompts {
    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts {
            variables: default_variables(),
            ..Default::default()
        };

        if let Some(vars) = custom_variables {
            prompts.variables.extend(vars.clone());
        }

        if let Some(dir) = custom_dir {
            let coach_path = PathBuf::from(shellexpand::tilde(dir).to_string()).join("coach.toml");
            if coach_path.exists() {
                let content = std::fs::read_to_string(&coach_path)?;
                prompts.coach = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template, so a value that
    /// itself contains `{{...}}` is inserted verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match vars.get(key.trim()) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = default_variables();
        merged.extend(self.variables.clone());
        merged.extend(vars.clone());
        Self::render(template, &merged)
    }

    /// Build the coaching prompt for a question and its assembled context.
    pub fn coach_prompt(&self, query: &str, context: &str) -> String {
        let vars = HashMap::from([
            ("query".to_string(), query.to_string()),
            ("context".to_string(), context.to_string()),
        ]);
        self.render_with_custom(&self.coach.template, &vars)
    }
}
