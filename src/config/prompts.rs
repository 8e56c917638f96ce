//! Prompt templates for Auditorium.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub transcription: TranscriptionPrompts,
    pub answer: AnswerPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Instruction sent alongside uploaded audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionPrompts {
    pub instruction: String,
}

impl Default for TranscriptionPrompts {
    fn default() -> Self {
        Self {
            instruction: "Transcribe the audio accurately, keeping the speaker's language. \
Use proper punctuation and split the text into paragraphs where it makes sense."
                .to_string(),
        }
    }
}

/// Prompts for answering a question from lecture transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant answering questions asked during a live class.
You only know what was said in the class, as given in the transcribed context."#
                .to_string(),

            user: r#"Based on the text provided below as context, answer the question briefly and objectively.

CONTEXT:
{{context}}

QUESTION:
{{question}}

INSTRUCTIONS:
- Use only information contained in the context;
- If the answer is not found in the context, say you don't have enough information to answer;
- Be objective;
- Keep an educational and professional tone;
- Quote relevant passages of the context when appropriate;
- When quoting, refer to it as "class content"."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let transcription_path = custom_path.join("transcription.toml");
            if transcription_path.exists() {
                let content = std::fs::read_to_string(&transcription_path)?;
                prompts.transcription = toml::from_str(&content)?;
            }

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Render the answer template for a question and its joined context.
    pub fn render_answer(&self, question: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context.to_string());
        self.render_with_custom(&self.answer.user, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.transcription.instruction.is_empty());
        assert!(prompts.answer.user.contains("{{context}}"));
        assert!(prompts.answer.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_answer_prefers_call_variables() {
        let mut prompts = Prompts::default();
        prompts.answer.user = "{{course}}: {{question}} / {{context}}".to_string();
        prompts.variables.insert("course".to_string(), "Rust 101".to_string());
        prompts.variables.insert("question".to_string(), "shadowed".to_string());

        let rendered = prompts.render_answer("What is X?", "X is a letter.");
        assert_eq!(rendered, "Rust 101: What is X? / X is a letter.");
    }

    #[test]
    fn test_load_custom_answer_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answer.toml"),
            "system = \"Be brief.\"\nuser = \"Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.answer.system, "Be brief.");
        assert_eq!(prompts.render_answer("why?", ""), "Q: why?");
        assert!(!prompts.transcription.instruction.is_empty());
    }
}
