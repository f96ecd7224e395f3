use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum RunStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "requires_action")]
    RequiresAction,
    #[serde(rename = "cancelling")]
    Cancelling,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "incomplete")]
    Incomplete,
    #[serde(rename = "expired")]
    Expired,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }

    /// Whether the service will never move this run to another status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Object {
//     "id": String("run_abc123"),
//     "object": String("thread.run"),
//     "created_at": Number(1699063290),
//     "assistant_id": String("asst_abc123"),
//     "thread_id": String("thread_abc123"),
//     "status": String("queued"),
//     ...
// }
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
}

#[derive(Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<Value>,
}

/// The remote operations one conversation turn needs. A trait so the
/// poller and the session run against a hand-rolled fake in tests.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Open a new conversation thread and return its id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user message to a thread.
    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<()>;

    /// Start an assistant run over the thread's messages.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List the thread's messages, newest first. Elements stay raw
    /// JSON: a malformed message has to reach the normalizer as data,
    /// not fail the fetch.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Value>>;
}

pub struct AssistantsClient {
    api_hostname: String,
    api_key: String,
    client: reqwest::Client,
}

impl AssistantsClient {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_hostname.trim_end_matches("/"), path)
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("OpenAI-Beta", "assistants=v2")
            .timeout(Duration::from_secs(30))
            .json(payload)
            .send()
            .await?;

        Self::into_json(response).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        Self::into_json(response).await
    }

    // Error responses carry `{"error": {"message": ...}}` which is
    // worth surfacing over a bare status code.
    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            bail!("Assistant service returned {}: {}", status, detail);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AssistantService for AssistantsClient {
    async fn create_thread(&self) -> Result<String> {
        let response = self.post("threads", &json!({})).await?;
        let thread: ThreadObject = serde_json::from_value(response)?;
        Ok(thread.id)
    }

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let payload = json!({"role": "user", "content": text});
        self.post(&format!("threads/{}/messages", thread_id), &payload)
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let payload = json!({"assistant_id": assistant_id});
        let response = self
            .post(&format!("threads/{}/runs", thread_id), &payload)
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let response = self
            .get(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Value>> {
        let response = self.get(&format!("threads/{}/messages", thread_id)).await?;
        let list: MessageList = serde_json::from_value(response)?;
        Ok(list.data)
    }
}
