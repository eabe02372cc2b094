//! Thematic emoji for a book, from a chat-completions model or a fixed list.

use std::time::Duration;

use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Description text sent to the model is cut to this many characters.
const MAX_DESCRIPTION_CHARS: usize = 1000;

pub const FALLBACK_EMOJI: &[&str] = &[
    "📚", "📖", "✨", "🌙", "🔥", "🌊", "🗺️", "🕰️", "🧭", "🌿", "🎭", "🔮", "🐉", "🚀", "🏰",
    "💡",
];

const SYSTEM_PROMPT: &str = "You pick emoji for a reading log. Reply with exactly two emoji \
that capture the book's themes, separated by a space, and nothing else.";

#[derive(Clone, Debug)]
pub struct EmojiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl EmojiConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            cfg.model = model;
        }
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            cfg.base_url = base;
        }
        cfg
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[derive(thiserror::Error, Debug)]
enum EmojiError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("reply held fewer than two emoji: {0:?}")]
    Unusable(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Suggests two emoji for a book.
pub struct EmojiSuggester {
    http: reqwest::Client,
    cfg: EmojiConfig,
}

impl EmojiSuggester {
    pub fn new(cfg: EmojiConfig) -> Self {
        // Falls back to a default client if the builder rejects the timeout.
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .unwrap_or_default();
        Self { http, cfg }
    }

    pub fn from_env() -> Self {
        Self::new(EmojiConfig::from_env())
    }

    /// Returns two distinct emoji. Any model failure falls back to the
    /// built-in list, so this never errors.
    pub async fn suggest(&self, title: &str, description: &str) -> [String; 2] {
        match self.request(title, description).await {
            Ok(pair) => {
                tracing::debug!("model suggested {} {}", pair[0], pair[1]);
                pair
            }
            Err(EmojiError::MissingApiKey) => {
                tracing::debug!("no OPENAI_API_KEY, using fallback emoji");
                fallback_pair()
            }
            Err(e) => {
                tracing::warn!("emoji suggestion failed, using fallback: {}", e);
                fallback_pair()
            }
        }
    }

    async fn request(&self, title: &str, description: &str) -> Result<[String; 2], EmojiError> {
        let api_key = self.cfg.api_key.as_deref().ok_or(EmojiError::MissingApiKey)?;
        let description: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        let body = ChatRequest {
            model: &self.cfg.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Title: {}\nDescription: {}", title, description),
                },
            ],
            max_tokens: 16,
            temperature: 0.7,
        };
        let endpoint = format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'));

        let resp = self
            .http
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(EmojiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .unwrap_or_default();
        parse_pair(&content).ok_or(EmojiError::Unusable(content))
    }
}

/// One emoji cluster: a flag, a keycap, or a pictograph with optional
/// variation selectors, skin tones and zero-width-joined parts.
const EMOJI_PATTERN: &str = concat!(
    r"\p{Regional_Indicator}{2}",
    r"|[0-9#*]\x{FE0F}?\x{20E3}",
    r"|\p{Extended_Pictographic}(?:\x{FE0F}|\p{Emoji_Modifier})*",
    r"(?:\x{200D}\p{Extended_Pictographic}(?:\x{FE0F}|\p{Emoji_Modifier})*)*",
);

/// First two distinct emoji clusters in `reply`, in order.
fn parse_pair(reply: &str) -> Option<[String; 2]> {
    let re = match Regex::new(EMOJI_PATTERN) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("emoji pattern failed to compile: {}", e);
            return None;
        }
    };
    let mut found: Vec<&str> = Vec::with_capacity(2);
    for m in re.find_iter(reply) {
        let cluster = m.as_str();
        if found.contains(&cluster) {
            continue;
        }
        found.push(cluster);
        if found.len() == 2 {
            return Some([found[0].to_string(), found[1].to_string()]);
        }
    }
    None
}

fn fallback_pair() -> [String; 2] {
    let mut rng = rand::thread_rng();
    let picked: Vec<&&str> = FALLBACK_EMOJI.choose_multiple(&mut rng, 2).collect();
    match picked.as_slice() {
        [a, b] => [a.to_string(), b.to_string()],
        _ => [FALLBACK_EMOJI[0].to_string(), FALLBACK_EMOJI[1].to_string()],
    }
}
