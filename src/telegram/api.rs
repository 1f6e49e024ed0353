use crate::bot::{ChatError, ChatSession, MessageHandle, Reply, TextFormat};
use crate::config::BotConfig;
use crate::telegram::types::{ApiResponse, Message, Update, User};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

/// Headroom on top of the long-poll timeout before the HTTP client gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Minimal Bot API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct TelegramApi {
    client: Client,
    base: String,
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // base embeds the token
        f.debug_struct("TelegramApi").finish_non_exhaustive()
    }
}

impl TelegramApi {
    /// Creates a client for the bot identified by `token`
    pub fn new(config: &BotConfig, token: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + POLL_GRACE)
            .build()?;

        Ok(Self {
            client,
            base: format!("{}/bot{}", config.api_url.trim_end_matches('/'), token),
        })
    }

    /// Calls a Bot API method and unwraps the response envelope
    async fn call<T: DeserializeOwned>(&self, method: &str, params: &Value) -> Result<T, ChatError> {
        let url = format!("{}/{}", self.base, method);

        // reqwest errors carry the URL, which contains the token
        let response: ApiResponse<T> = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?;

        if !response.ok {
            return Err(ChatError::Api {
                method: method.to_string(),
                description: response
                    .description
                    .unwrap_or_else(|| format!("error code {:?}", response.error_code)),
            });
        }

        response.result.ok_or_else(|| ChatError::Api {
            method: method.to_string(),
            description: "response has no result".to_string(),
        })
    }

    pub async fn get_me(&self) -> Result<User, ChatError> {
        self.call("getMe", &json!({})).await
    }

    /// Long-polls for updates with `update_id >= offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChatError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, reply: &Reply) -> Result<Message, ChatError> {
        let mut params = json!({
            "chat_id": chat_id,
            "text": reply.text,
        });
        if reply.format == TextFormat::Markdown {
            params["parse_mode"] = json!("Markdown");
        }
        self.call("sendMessage", &params).await
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ChatError> {
        let _: bool = self
            .call(
                "deleteMessage",
                &json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                }),
            )
            .await?;
        Ok(())
    }
}

/// A single Telegram chat
#[derive(Debug, Clone)]
pub struct TelegramChat {
    api: TelegramApi,
    chat_id: i64,
}

impl TelegramChat {
    pub fn new(api: TelegramApi, chat_id: i64) -> Self {
        Self { api, chat_id }
    }
}

#[async_trait]
impl ChatSession for TelegramChat {
    async fn send(&self, reply: &Reply) -> Result<MessageHandle, ChatError> {
        let message = self.api.send_message(self.chat_id, reply).await?;
        Ok(MessageHandle(message.message_id))
    }

    async fn delete(&self, handle: MessageHandle) -> Result<(), ChatError> {
        self.api.delete_message(self.chat_id, handle.0).await
    }
}
