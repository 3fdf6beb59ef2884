use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::ServiceError;
use crate::message::{ChatReply, value_text};

/// Turns a user message into a structured reply. The message arrives as the
/// client sent it; implementations decide which values they can read.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn get_chat_response(&self, message: &Value) -> Result<ChatReply, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Search(String),
    Recommend(Option<String>),
    Greeting,
    Help,
    Unknown,
}

const SEARCH_PREFIXES: &[&str] = &[
    "search for ",
    "search ",
    "look for ",
    "listen to ",
    "find me ",
    "find ",
    "play me ",
    "play ",
];

const RECOMMEND_MARKERS: &[&str] = &["similar to ", "songs like ", "something like "];

fn clean_query(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string()
}

pub fn detect_intent(msg: &str) -> Intent {
    let msg_lower = msg.trim().to_lowercase();

    for prefix in SEARCH_PREFIXES {
        if let Some(rest) = msg_lower.strip_prefix(prefix) {
            let query = clean_query(rest);
            if !query.is_empty() {
                return Intent::Search(query);
            }
        }
    }

    for marker in RECOMMEND_MARKERS {
        if let Some(idx) = msg_lower.find(marker) {
            let seed = clean_query(&msg_lower[idx + marker.len()..]);
            return Intent::Recommend((!seed.is_empty()).then_some(seed));
        }
    }
    if msg_lower.contains("recommend") || msg_lower.contains("suggest") {
        return Intent::Recommend(None);
    }

    let words: Vec<&str> = msg_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.iter().any(|w| matches!(*w, "hello" | "hi" | "hey")) {
        Intent::Greeting
    } else if words.contains(&"help") {
        Intent::Help
    } else {
        Intent::Unknown
    }
}

pub fn generate_reply(user_msg: &str) -> ChatReply {
    match detect_intent(user_msg) {
        Intent::Search(query) => ChatReply::with_action(
            format!("Searching for \"{}\"...", query),
            "search",
            query,
        ),
        Intent::Recommend(Some(seed)) => ChatReply::with_action(
            format!("Let me find something similar to \"{}\".", seed),
            "recommend",
            seed,
        ),
        Intent::Recommend(None) => ChatReply::text(
            "Pick a song from the results and I'll recommend similar tracks.",
        ),
        Intent::Greeting => {
            ChatReply::text("Hi! Tell me what you'd like to listen to, e.g. \"play some jazz\".")
        }
        Intent::Help => ChatReply::text(
            "You can ask me to play or find music (\"play Miles Davis\") or to suggest songs similar to one you like.",
        ),
        Intent::Unknown => ChatReply::text(format!(
            "I didn't quite catch that: \"{}\". Try \"play <artist or song>\".",
            user_msg.trim()
        )),
    }
}

/// Rule-based responder used when no external chat service is configured.
#[derive(Debug, Default, Clone)]
pub struct KeywordChatService;

#[async_trait]
impl ChatService for KeywordChatService {
    async fn get_chat_response(&self, message: &Value) -> Result<ChatReply, ServiceError> {
        Ok(generate_reply(&value_text(message)?))
    }
}

/// Forwards messages, untouched, to an external chat service that answers
/// with `{response, action, query}` plus any fields of its own.
#[derive(Debug, Clone)]
pub struct HttpChatService {
    client: reqwest::Client,
    url: String,
}

impl HttpChatService {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into() }
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn get_chat_response(&self, message: &Value) -> Result<ChatReply, ServiceError> {
        let res = self
            .client
            .post(&self.url)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream { status: status.as_u16(), body });
        }

        Ok(res.json::<ChatReply>().await?)
    }
}
