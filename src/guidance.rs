//! AI guidance proxy client.
//!
//! The proxy wraps a Gemini `generateContent` call. Its JSON reply is turned
//! into a typed result in [`classify`]; nothing downstream looks at raw
//! response fields.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::GuidanceError;
use crate::persist::KeyValueStore;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:8888/.netlify/functions/gemini-proxy";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const CACHE_PREFIX: &str = "kalosdex-navigator-cache-";
/// The proxy gives up after 9 s; waiting a little longer lets its own
/// timeout error reach us instead of a bare client abort.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
const CACHE_KEY_CHARS: usize = 100;

const SYSTEM_INSTRUCTION: &str = "\
You are the Navigator, an assistant inside a companion app for Pokémon Legends: Z-A, set in Lumiose City in the Kalos region.
Answer the player's question accurately for Kalos and the mechanics of Pokémon X and Y, mentioning Mega Evolution where it matters.
Keep answers short and to the point. Do not list full trainer teams or movesets unless asked.
Reply in plain text; markdown lists are fine, code fences and JSON are not.
Wrap every Pokémon name you mention in double curly braces, for example {{Pikachu}}.";

#[async_trait]
pub trait GuidanceClient: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, GuidanceError>;
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub finish_message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

/// Map one proxy reply to the answer text or the reason there is none.
pub fn classify(ok: bool, status: u16, body: Value) -> Result<String, GuidanceError> {
    if !ok {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(GuidanceError::Server { status, message });
    }

    let response: ProxyResponse =
        serde_json::from_value(body).map_err(|err| GuidanceError::Decode(err.to_string()))?;
    match response.text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_text_reason(&response)),
    }
}

fn missing_text_reason(response: &ProxyResponse) -> GuidanceError {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return GuidanceError::Blocked {
                reason: reason.clone(),
                message: feedback.block_reason_message.clone(),
            };
        }
    }
    match response
        .candidates
        .first()
        .and_then(|candidate| candidate.finish_reason.as_deref())
    {
        Some(reason) if reason != "STOP" => GuidanceError::AbnormalStop {
            reason: reason.to_string(),
        },
        _ => GuidanceError::EmptyResponse,
    }
}

pub fn request_body(model: &str, prompt: &str) -> Value {
    json!({
        "params": {
            "model": model,
            "contents": prompt,
            "config": {
                "systemInstruction": SYSTEM_INSTRUCTION,
                "temperature": 0.3,
                "topK": 40,
                "topP": 0.95,
            }
        }
    })
}

pub struct ProxyClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl ProxyClient {
    pub fn new(url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
        }
    }

    async fn post(&self, prompt: &str) -> Result<String, GuidanceError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request_body(&self.model, prompt))
            .send()
            .await
            .map_err(|e| GuidanceError::Transport(e.to_string()))?;
        let status = response.status();
        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => return Err(GuidanceError::Decode(e.to_string())),
        };
        classify(status.is_success(), status.as_u16(), body)
    }
}

#[async_trait]
impl GuidanceClient for ProxyClient {
    async fn ask(&self, prompt: &str) -> Result<String, GuidanceError> {
        debug!(model = %self.model, "navigator request");
        match tokio::time::timeout(CLIENT_TIMEOUT, self.post(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GuidanceError::Timeout),
        }
    }
}

/// Cache slot for a prompt: lowercased, whitespace runs collapsed to `_`,
/// first 100 characters.
pub fn cache_key(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    let mut in_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                normalized.push('_');
            }
            in_space = true;
        } else {
            normalized.push(ch);
            in_space = false;
        }
    }
    let truncated: String = normalized.chars().take(CACHE_KEY_CHARS).collect();
    format!("{CACHE_PREFIX}{truncated}")
}

/// Answers are cached per prompt. Failures are never cached.
pub struct CachedGuidance<C, S> {
    inner: C,
    store: S,
}

impl<C, S> CachedGuidance<C, S> {
    pub fn new(inner: C, store: S) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<C, S> GuidanceClient for CachedGuidance<C, S>
where
    C: GuidanceClient,
    S: KeyValueStore,
{
    async fn ask(&self, prompt: &str) -> Result<String, GuidanceError> {
        let key = cache_key(prompt);
        match crate::persist::read_json::<String>(&self.store, &key) {
            Ok(Some(answer)) => {
                info!(key = %key, "navigator answer served from cache");
                return Ok(answer);
            }
            Ok(None) => {}
            Err(err) => warn!(key = %key, error = %err, "navigator cache read failed"),
        }

        let answer = self.inner.ask(prompt).await?;
        if let Err(err) = crate::persist::write_json(&self.store, &key, &answer) {
            warn!(key = %key, error = %err, "navigator cache write failed");
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::persist::MemoryStore;

    #[test]
    fn server_error_uses_proxy_message() {
        let err = classify(false, 500, json!({ "error": "API key is invalid." })).unwrap_err();
        assert_eq!(err.to_string(), "API key is invalid.");

        let err = classify(false, 502, Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Proxy request failed with status 502");
    }

    #[test]
    fn empty_text_reports_the_block_reason() {
        let err = classify(
            true,
            200,
            json!({ "text": "", "promptFeedback": { "blockReason": "SAFETY" } }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn empty_text_distinguishes_abnormal_stop_from_plain_empty() {
        let err = classify(
            true,
            200,
            json!({ "text": "  ", "candidates": [{ "finishReason": "MAX_TOKENS" }] }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GuidanceError::AbnormalStop {
                reason: "MAX_TOKENS".into()
            }
        );

        let err = classify(
            true,
            200,
            json!({ "text": null, "candidates": [{ "finishReason": "STOP" }] }),
        )
        .unwrap_err();
        assert_eq!(err, GuidanceError::EmptyResponse);
    }

    #[test]
    fn text_passes_through() {
        let text = classify(true, 200, json!({ "text": "Try {{Froakie}}." })).unwrap();
        assert_eq!(text, "Try {{Froakie}}.");
    }

    #[test]
    fn request_body_carries_generation_config() {
        let body = request_body("gemini-2.5-flash", "where is ralts?");
        assert_eq!(body["params"]["model"], "gemini-2.5-flash");
        assert_eq!(body["params"]["contents"], "where is ralts?");
        assert_eq!(body["params"]["config"]["topK"], 40);
        assert!(body["params"]["config"]["systemInstruction"]
            .as_str()
            .unwrap()
            .contains("{{Pikachu}}"));
    }

    #[test]
    fn cache_key_normalizes_prompt() {
        assert_eq!(
            cache_key("Where  is\tRalts?"),
            "kalosdex-navigator-cache-where_is_ralts?"
        );
        let long = "a".repeat(250);
        assert_eq!(cache_key(&long).len(), CACHE_PREFIX.len() + 100);
    }

    struct CountingClient {
        calls: Arc<AtomicUsize>,
        reply: Result<String, GuidanceError>,
    }

    #[async_trait]
    impl GuidanceClient for CountingClient {
        async fn ask(&self, _prompt: &str) -> Result<String, GuidanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn cached_answers_skip_the_proxy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CachedGuidance::new(
            CountingClient {
                calls: calls.clone(),
                reply: Ok("Look near {{Ralts}}.".into()),
            },
            MemoryStore::new(),
        );
        assert_eq!(client.ask("Where is Ralts").await.unwrap(), "Look near {{Ralts}}.");
        assert_eq!(client.ask("where  is ralts").await.unwrap(), "Look near {{Ralts}}.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CachedGuidance::new(
            CountingClient {
                calls: calls.clone(),
                reply: Err(GuidanceError::Timeout),
            },
            MemoryStore::new(),
        );
        assert_eq!(client.ask("x").await, Err(GuidanceError::Timeout));
        assert_eq!(client.ask("x").await, Err(GuidanceError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
