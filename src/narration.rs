//! Flavor-text narration
//!
//! Narration is a best-effort side channel. Requests are handed to a
//! dispatcher that runs them as detached tokio tasks; the frame loop only
//! ever drains finished lines and never waits on one. Every failure turns
//! into a fixed fallback line.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Shown when no API key is configured
pub const FALLBACK_NO_CREDENTIALS: &str = "The laboratory alarms blare...";
/// Shown when the model answered with nothing
pub const FALLBACK_EMPTY: &str = "Security protocols failing...";
/// Shown for transport errors, bad statuses and timeouts
pub const FALLBACK_OFFLINE: &str = "Connection to security feed lost...";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 120;

const SYSTEM_PROMPT: &str = "You write single-line status log entries for a secret \
underground laboratory whose experiment, Subject 09, has breached containment.";

/// Snapshot of the session a narration line is written about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationRequest {
    pub level: u32,
    pub humans_eaten: u32,
    pub walls_broken: u32,
    pub is_victory: bool,
}

impl NarrationRequest {
    pub fn prompt(&self) -> String {
        let status = if self.is_victory {
            "FAILED - SUBJECT ESCAPED"
        } else {
            "ACTIVE EMERGENCY"
        };
        let task = if self.is_victory {
            "Describe Subject 09 reaching the surface world."
        } else {
            "Describe the subject consuming staff, smashing lab equipment, or breaking glass walls."
        };

        format!(
            "Status:\n\
             - Subject Growth Phase: {}\n\
             - Research Staff Casualties: {}\n\
             - Security Sectors Breached: {}\n\
             - Containment Status: {}\n\n\
             Write a single, clinical yet horrified status log entry from the facility AI \
             or a dying scientist. {}",
            self.level, self.humans_eaten, self.walls_broken, status, task
        )
    }
}

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("narration credentials not set ({0})")]
    MissingCredentials(&'static str),

    #[error("narration request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("narration API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("narration response was empty")]
    EmptyResponse,
}

impl NarrationError {
    /// The line shown in the game log in place of real narration
    pub fn fallback_text(&self) -> &'static str {
        match self {
            NarrationError::MissingCredentials(_) => FALLBACK_NO_CREDENTIALS,
            NarrationError::EmptyResponse => FALLBACK_EMPTY,
            NarrationError::Http(_) | NarrationError::Status { .. } => FALLBACK_OFFLINE,
        }
    }
}

/// Something that can write a narration line
pub trait Narrator: Send + Sync + 'static {
    fn narrate(
        &self,
        request: NarrationRequest,
    ) -> impl Future<Output = Result<String, NarrationError>> + Send;
}

/// An unconfigured narrator behaves like one with missing credentials
impl<N: Narrator> Narrator for Option<N> {
    async fn narrate(&self, request: NarrationRequest) -> Result<String, NarrationError> {
        match self {
            Some(narrator) => narrator.narrate(request).await,
            None => Err(NarrationError::MissingCredentials("NARRATION_API_KEY")),
        }
    }
}

/// Offline narrator with fixed lines
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedNarrator;

impl Narrator for CannedNarrator {
    async fn narrate(&self, request: NarrationRequest) -> Result<String, NarrationError> {
        if request.is_victory {
            return Ok(format!(
                "Subject 09 has reached the surface. {} staff unaccounted for.",
                request.humans_eaten
            ));
        }
        Ok(format!(
            "Growth phase {} confirmed. {} staff lost, {} sectors breached.",
            request.level, request.humans_eaten, request.walls_broken
        ))
    }
}

/// Narrator backed by an OpenAI-compatible chat completions endpoint
pub struct LlmNarrator {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LlmNarrator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Create a narrator from environment variables
    ///
    /// Required: NARRATION_API_KEY
    /// Optional: NARRATION_API_URL, NARRATION_MODEL
    pub fn from_env() -> Result<Self, NarrationError> {
        let api_key = std::env::var("NARRATION_API_KEY")
            .map_err(|_| NarrationError::MissingCredentials("NARRATION_API_KEY"))?;
        let api_url =
            std::env::var("NARRATION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("NARRATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Ok(Self::new(api_key, api_url, model))
    }
}

impl Narrator for LlmNarrator {
    async fn narrate(&self, request: NarrationRequest) -> Result<String, NarrationError> {
        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                Message {
                    role: "user".into(),
                    content: request.prompt(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NarrationError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Run one narration with a deadline. Never fails.
pub async fn narrate_or_fallback<N: Narrator>(
    narrator: &N,
    request: NarrationRequest,
    timeout: Duration,
) -> String {
    match tokio::time::timeout(timeout, narrator.narrate(request)).await {
        Ok(Ok(text)) if text.trim().is_empty() => FALLBACK_EMPTY.to_string(),
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            log::warn!("Narration failed: {}", err);
            err.fallback_text().to_string()
        }
        Err(_) => {
            log::warn!("Narration timed out after {:?}", timeout);
            FALLBACK_OFFLINE.to_string()
        }
    }
}

/// Where the frame driver sends narration requests
pub trait NarrationSink {
    /// Queue a request; must return immediately
    fn submit(&mut self, request: NarrationRequest);

    /// Lines finished since the last call
    fn drain(&mut self) -> Vec<String>;

    /// Drop every request still in flight
    fn cancel_all(&mut self);
}

/// Runs each request as a detached task on a tokio runtime
pub struct NarrationDispatcher<N: Narrator> {
    narrator: Arc<N>,
    handle: Handle,
    timeout: Duration,
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl<N: Narrator> NarrationDispatcher<N> {
    pub fn new(narrator: N, handle: Handle, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            narrator: Arc::new(narrator),
            handle,
            timeout,
            tx,
            rx,
            tasks: Vec::new(),
        }
    }

    /// Tasks that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait for the next finished line
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl<N: Narrator> NarrationSink for NarrationDispatcher<N> {
    fn submit(&mut self, request: NarrationRequest) {
        log::debug!("Dispatching narration: {:?}", request);
        self.tasks.retain(|t| !t.is_finished());

        let narrator = Arc::clone(&self.narrator);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let task = self.handle.spawn(async move {
            let line = narrate_or_fallback(narrator.as_ref(), request, timeout).await;
            // Receiver gone means the session was torn down
            let _ = tx.send(line);
        });
        self.tasks.push(task);
    }

    fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    fn cancel_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        // Anything that finished before the abort is stale too
        while self.rx.try_recv().is_ok() {}
    }
}

impl<N: Narrator> Drop for NarrationDispatcher<N> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(is_victory: bool) -> NarrationRequest {
        NarrationRequest {
            level: 3,
            humans_eaten: 12,
            walls_broken: 4,
            is_victory,
        }
    }

    struct SlowNarrator;

    impl Narrator for SlowNarrator {
        async fn narrate(&self, _request: NarrationRequest) -> Result<String, NarrationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    struct QuickNarrator;

    impl Narrator for QuickNarrator {
        async fn narrate(&self, _request: NarrationRequest) -> Result<String, NarrationError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("quick".into())
        }
    }

    struct EmptyNarrator;

    impl Narrator for EmptyNarrator {
        async fn narrate(&self, _request: NarrationRequest) -> Result<String, NarrationError> {
            Err(NarrationError::EmptyResponse)
        }
    }

    #[test]
    fn test_prompt_mentions_status() {
        let playing = request(false).prompt();
        assert!(playing.contains("Growth Phase: 3"));
        assert!(playing.contains("Casualties: 12"));
        assert!(playing.contains("ACTIVE EMERGENCY"));
        assert!(request(true).prompt().contains("SUBJECT ESCAPED"));
    }

    #[test]
    fn test_fallback_text_per_error() {
        assert_eq!(
            NarrationError::MissingCredentials("KEY").fallback_text(),
            FALLBACK_NO_CREDENTIALS
        );
        assert_eq!(NarrationError::EmptyResponse.fallback_text(), FALLBACK_EMPTY);
        let status = NarrationError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(status.fallback_text(), FALLBACK_OFFLINE);
    }

    #[tokio::test]
    async fn test_missing_narrator_falls_back() {
        let narrator: Option<CannedNarrator> = None;
        let line = narrate_or_fallback(&narrator, request(false), Duration::from_secs(1)).await;
        assert_eq!(line, FALLBACK_NO_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let line = narrate_or_fallback(&EmptyNarrator, request(false), Duration::from_secs(1)).await;
        assert_eq!(line, FALLBACK_EMPTY);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let line =
            narrate_or_fallback(&SlowNarrator, request(true), Duration::from_millis(10)).await;
        assert_eq!(line, FALLBACK_OFFLINE);
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_lines() {
        let mut dispatcher =
            NarrationDispatcher::new(CannedNarrator, Handle::current(), Duration::from_secs(1));
        dispatcher.submit(request(false));

        let line = tokio::time::timeout(Duration::from_secs(1), dispatcher.next_line())
            .await
            .expect("narration should finish")
            .expect("channel open");
        assert!(line.starts_with("Growth phase 3"));
        assert!(dispatcher.drain().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_requests_never_deliver() {
        let mut dispatcher =
            NarrationDispatcher::new(QuickNarrator, Handle::current(), Duration::from_secs(1));
        dispatcher.submit(request(false));
        dispatcher.submit(request(true));
        assert_eq!(dispatcher.in_flight(), 2);

        dispatcher.cancel_all();
        // Well past the point where both would have finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(dispatcher.drain().is_empty());

        // The dispatcher still works for the next session
        dispatcher.submit(request(false));
        let line = tokio::time::timeout(Duration::from_secs(1), dispatcher.next_line())
            .await
            .expect("narration should finish")
            .expect("channel open");
        assert_eq!(line, "quick");
    }

    #[test]
    fn test_from_env_missing_key() {
        if std::env::var("NARRATION_API_KEY").is_err() {
            assert!(matches!(
                LlmNarrator::from_env(),
                Err(NarrationError::MissingCredentials(_))
            ));
        }
    }
}
