use serde::{Deserialize, Serialize};

/// Body of a `models/{model}:generateText` call.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerateTextRequest {
    pub prompt: TextPrompt,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub text: String,
}

impl GenerateTextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            prompt: TextPrompt { text: text.into() },
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TextCompletion {
    pub output: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GenerateTextResponse {
    #[serde(default)]
    pub candidates: Option<Vec<TextCompletion>>,
}

impl GenerateTextResponse {
    /// Output of the first candidate, if the upstream produced one.
    pub fn first_output(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .output
            .as_deref()
    }
}
