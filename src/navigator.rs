use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const CONFIRMATION_PHRASES: [&str; 4] = [
    "added to your hunting list",
    "happy hunting",
    "successfully caught",
    "you caught",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GuidanceRequest {
    pub generation: u64,
    pub prompt: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NavigatorState {
    pub prompt: String,
    pub loading: bool,
    pub response: Option<String>,
    pub error: Option<String>,
    pub generation: u64,
}

impl NavigatorState {
    /// Start a request. Ignored for blank prompts or while one is in flight.
    pub fn submit(&mut self, prompt: &str) -> Option<GuidanceRequest> {
        if prompt.trim().is_empty() || self.loading {
            return None;
        }
        self.prompt = prompt.to_string();
        self.loading = true;
        self.error = None;
        self.response = None;
        self.generation += 1;
        Some(GuidanceRequest {
            generation: self.generation,
            prompt: self.prompt.clone(),
        })
    }

    /// Apply an answer. `None` when the answer is stale; otherwise whether it
    /// reads like a hunt or catch confirmation.
    pub fn resolve(&mut self, generation: u64, result: Result<String, String>) -> Option<bool> {
        if generation != self.generation || !self.loading {
            return None;
        }
        self.loading = false;
        match result {
            Ok(text) => {
                let confirmed = looks_like_hunt_confirmation(&text);
                self.response = Some(text);
                Some(confirmed)
            }
            Err(message) => {
                self.error = Some(message);
                Some(false)
            }
        }
    }

    pub fn reset(&mut self) {
        self.prompt.clear();
        self.response = None;
        self.error = None;
        self.loading = false;
        self.generation += 1;
    }
}

/// Best-effort: the answer links at least one Pokémon and uses one of a few
/// confirmation phrases.
pub fn looks_like_hunt_confirmation(text: &str) -> bool {
    if link_tokens(text).is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    CONFIRMATION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Names inside `{{...}}` tokens, with or without a `pokemon:` prefix.
pub fn link_tokens(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let inner = after[..end].trim();
        let name = inner.strip_prefix("pokemon:").unwrap_or(inner).trim();
        if !name.is_empty() {
            names.push(name);
        }
        rest = &after[end + 2..];
    }
    names
}
