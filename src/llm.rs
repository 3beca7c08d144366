//! Answer strategies for ASK_AI.
//!
//! A `Provider` is chosen once at startup and handed to the response handler as
//! a `&dyn Answer`. Every strategy returns a single cleaned line or an `LlmError`.

use crate::error::LlmError;
use crate::models::Exchange;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Longest answer handed back to the caller, in characters
pub const MAX_ANSWER_CHARS: usize = 500;
/// Prompt characters echoed back by the mock
pub const MOCK_SNIPPET_CHARS: usize = 160;
/// Transcript exchanges handed to the provider as conversation context
pub const HISTORY_TURNS: usize = 6;
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 512;

/// Something that can answer a free-form prompt
pub trait Answer {
    fn answer(&self, prompt: &str, history: &[Exchange]) -> Result<String, LlmError>;
}

impl<F> Answer for F
where
    F: Fn(&str) -> Result<String, LlmError>,
{
    fn answer(&self, prompt: &str, _history: &[Exchange]) -> Result<String, LlmError> {
        self(prompt)
    }
}

/// LLM strategy selected at startup
pub enum Provider {
    /// Offline echo of the prompt
    Mock,
    /// Offline answer read from a local text file
    MockFile(PathBuf),
    OpenAi(HttpChat),
    Anthropic(HttpChat),
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Mock => "mock",
            Provider::MockFile(_) => "mock-file",
            Provider::OpenAi(_) => "openai",
            Provider::Anthropic(_) => "anthropic",
        }
    }
}

impl Answer for Provider {
    fn answer(&self, prompt: &str, history: &[Exchange]) -> Result<String, LlmError> {
        debug!(provider = self.name(), "answering prompt");
        let raw = match self {
            Provider::Mock => mock_answer(prompt),
            Provider::MockFile(path) => fs::read_to_string(path).map_err(|source| {
                LlmError::MockFile {
                    path: path.display().to_string(),
                    source,
                }
            })?,
            Provider::OpenAi(chat) => chat.complete_openai(prompt, history)?,
            Provider::Anthropic(chat) => chat.complete_anthropic(prompt, history)?,
        };
        clean_answer(&raw)
    }
}

fn mock_answer(prompt: &str) -> String {
    let snippet: String = prompt.chars().take(MOCK_SNIPPET_CHARS).collect();
    format!("[mock] {}", snippet.replace('\n', " "))
}

/// Collapse whitespace to single spaces and cap the length.
pub fn clean_answer(raw: &str) -> Result<String, LlmError> {
    let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    if line.chars().count() <= MAX_ANSWER_CHARS {
        return Ok(line);
    }
    let cut: String = line.chars().take(MAX_ANSWER_CHARS).collect();
    Ok(format!("{}...", cut.trim_end()))
}

/// Blocking HTTP chat-completion client shared by both hosted APIs
pub struct HttpChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    system: Option<String>,
}

impl HttpChat {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        system: Option<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Transport(format!("cannot build HTTP client: {e}")))?;

        Ok(HttpChat {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            system,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete_openai(&self, prompt: &str, history: &[Exchange]) -> Result<String, LlmError> {
        let mut messages = Vec::new();
        if let Some(system) = &self.system {
            messages.push(Message::new("system", system));
        }
        messages.extend(history_messages(history));
        messages.push(Message::new("user", prompt));

        let request = OpenAiRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        let completion: OpenAiResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    fn complete_anthropic(&self, prompt: &str, history: &[Exchange]) -> Result<String, LlmError> {
        let mut messages = history_messages(history);
        messages.push(Message::new("user", prompt));

        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            system: self.system.as_deref(),
            messages,
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        let completion: AnthropicResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(LlmError::EmptyResponse)
    }
}

fn history_messages(history: &[Exchange]) -> Vec<Message<'_>> {
    history
        .iter()
        .flat_map(|ex| {
            [
                Message::new("user", &ex.user),
                Message::new("assistant", &ex.reply),
            ]
        })
        .collect()
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Transport(format!("timed out after {HTTP_TIMEOUT_SECS}s"))
    } else {
        LlmError::Transport(e.to_string())
    }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect();
    Err(LlmError::Status {
        code: status.as_u16(),
        body,
    })
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Message<'a> {
    fn new(role: &'static str, content: &'a str) -> Self {
        Message { role, content }
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transcript;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::NamedTempFile;

    /// Serve exactly one HTTP request with a canned response; returns the base URL
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            // Drain headers and body so the client sees a clean exchange
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });

        format!("http://{addr}")
    }

    #[test]
    fn test_mock_echoes_prompt() {
        let out = Provider::Mock.answer("what is\nrust", &[]).unwrap();
        assert_eq!(out, "[mock] what is rust");
    }

    #[test]
    fn test_mock_truncates_prompt() {
        let prompt = "x".repeat(400);
        let out = Provider::Mock.answer(&prompt, &[]).unwrap();
        assert_eq!(out.len(), "[mock] ".len() + MOCK_SNIPPET_CHARS);
    }

    #[test]
    fn test_mock_file_collapses_to_one_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first line\n\n   second\tline  ").unwrap();
        let provider = Provider::MockFile(file.path().to_path_buf());
        assert_eq!(
            provider.answer("ignored", &[]).unwrap(),
            "first line second line"
        );
    }

    #[test]
    fn test_mock_file_missing_is_error() {
        let provider = Provider::MockFile(PathBuf::from("/definitely/not/here.txt"));
        let err = provider.answer("x", &[]).unwrap_err();
        assert!(matches!(err, LlmError::MockFile { .. }));
    }

    #[test]
    fn test_clean_answer_caps_length() {
        let long = "word ".repeat(300);
        let out = clean_answer(&long).unwrap();
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= MAX_ANSWER_CHARS + 3);
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_clean_answer_empty() {
        assert!(matches!(clean_answer(" \n\t "), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_closure_is_an_answer() {
        let upper = |p: &str| -> Result<String, LlmError> { Ok(p.to_uppercase()) };
        assert_eq!(upper.answer("hi", &[]).unwrap(), "HI");
    }

    #[test]
    fn test_history_messages_alternate_roles() {
        let mut transcript = Transcript::new();
        for i in 0..10 {
            transcript.push(format!("u{i}"), format!("r{i}"));
        }
        let messages = history_messages(transcript.recent(HISTORY_TURNS));
        assert_eq!(messages.len(), HISTORY_TURNS * 2);
        assert_eq!(messages[0].content, "u4");
        assert_eq!(messages[1].role, "assistant");
    }

    #[test]
    fn test_http_chat_trims_base_url() {
        let chat = HttpChat::new("https://api.example.com/v1/", "key", "m", None).unwrap();
        assert_eq!(chat.base_url, "https://api.example.com/v1");
        assert_eq!(chat.model(), "m");
    }

    #[test]
    fn test_openai_non_success_status() {
        let base = serve_once("HTTP/1.1 401 Unauthorized", r#"{"error":"nope"}"#);
        let provider = Provider::OpenAi(HttpChat::new(base, "bad-key", "m", None).unwrap());

        let err = provider.answer("x", &[]).unwrap_err();
        match &err {
            LlmError::Status { code, body } => {
                assert_eq!(*code, 401);
                assert!(body.contains("nope"));
            }
            other => panic!("expected status error, got {other}"),
        }
        assert_eq!(err.to_string(), r#"HTTP 401: {"error":"nope"}"#);
    }

    #[test]
    fn test_anthropic_non_success_status() {
        let base = serve_once("HTTP/1.1 529 Overloaded", "{}");
        let provider = Provider::Anthropic(HttpChat::new(base, "key", "m", None).unwrap());
        let err = provider.answer("x", &[]).unwrap_err();
        assert!(matches!(err, LlmError::Status { code: 529, .. }));
    }

    #[test]
    fn test_openai_unexpected_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"unexpected": true}"#);
        let provider = Provider::OpenAi(HttpChat::new(base, "key", "m", None).unwrap());
        let err = provider.answer("x", &[]).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_anthropic_unexpected_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"content": "not a list"}"#);
        let provider = Provider::Anthropic(HttpChat::new(base, "key", "m", None).unwrap());
        let err = provider.answer("x", &[]).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_openai_success_is_cleaned() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices": [{"message": {"content": "Short\n  answer. "}}]}"#,
        );
        let provider = Provider::OpenAi(HttpChat::new(base, "key", "m", None).unwrap());
        assert_eq!(provider.answer("x", &[]).unwrap(), "Short answer.");
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let chat = HttpChat::new("http://127.0.0.1:9", "key", "m", None).unwrap();
        let provider = Provider::OpenAi(chat);
        let err = provider.answer("x", &[]).unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
