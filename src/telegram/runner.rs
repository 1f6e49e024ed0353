//! Long-polling loop
//!
//! Pulls updates from the Bot API and hands each text message to the
//! dispatcher in its own task. Messages are handled concurrently; the only
//! shared state is the dispatcher's dedup guard.

use crate::bot::messages::INTERNAL_ERROR_MESSAGE;
use crate::bot::{ChatSession, Dispatcher, InboundMessage, Reply};
use crate::telegram::api::{TelegramApi, TelegramChat};
use crate::telegram::types::Update;
use crate::BotError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};

/// Pause after a failed getUpdates call
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Runs the bot until SIGINT or SIGTERM
pub async fn run_bot(
    api: TelegramApi,
    dispatcher: Arc<Dispatcher>,
    poll_timeout_secs: u64,
) -> Result<(), BotError> {
    run_until(api, dispatcher, poll_timeout_secs, wait_for_shutdown_signal()).await
}

/// Runs the bot until `shutdown` resolves
///
/// In-flight messages are allowed to finish before returning.
pub async fn run_until<F>(
    api: TelegramApi,
    dispatcher: Arc<Dispatcher>,
    poll_timeout_secs: u64,
    shutdown: F,
) -> Result<(), BotError>
where
    F: Future<Output = ()>,
{
    let me = api.get_me().await?;
    tracing::info!(
        "Connected as @{} ({})",
        me.username.as_deref().unwrap_or("unknown"),
        me.id
    );

    tokio::pin!(shutdown);
    let mut tasks = JoinSet::new();
    let mut offset = 0;

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = api.get_updates(offset, poll_timeout_secs) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let Some((chat_id, inbound)) = to_inbound(&update) else {
                        continue;
                    };
                    let session = TelegramChat::new(api.clone(), chat_id);
                    let dispatcher = Arc::clone(&dispatcher);
                    tasks.spawn(async move {
                        handle_update(&dispatcher, &session, &inbound).await;
                    });
                }
            }
            Err(e) => {
                tracing::warn!("Polling failed: {}", e);
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
            }
        }

        while let Some(joined) = tasks.try_join_next() {
            log_join_failure(joined);
        }
    }

    tracing::info!("Shutting down gracefully...");
    while let Some(joined) = tasks.join_next().await {
        log_join_failure(joined);
    }

    // Confirm the last handled batch; unconfirmed updates are redelivered
    if offset > 0 {
        if let Err(e) = api.get_updates(offset, 0).await {
            tracing::warn!("Could not confirm update offset {}: {}", offset, e);
        }
    }
    Ok(())
}

/// Logs a handler task that panicked or was cancelled
fn log_join_failure(joined: Result<(), JoinError>) -> bool {
    match joined {
        Ok(()) => false,
        Err(e) => {
            tracing::error!("Message handler task failed: {}", e);
            true
        }
    }
}

/// Converts a text message update into a dispatcher message
///
/// The dedup key combines chat and message ids because message ids are only
/// unique within a chat.
fn to_inbound(update: &Update) -> Option<(i64, InboundMessage)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_ref()?;
    let key = format!("{}:{}", message.chat.id, message.message_id);
    Some((message.chat.id, InboundMessage::new(key, text.clone())))
}

/// Dispatches one message; a failed terminal reply gets a generic apology
async fn handle_update<S: ChatSession>(dispatcher: &Dispatcher, session: &S, inbound: &InboundMessage) {
    match dispatcher.handle(session, inbound).await {
        Ok(outcome) => tracing::debug!("Handled {}: {:?}", inbound.message_id, outcome),
        Err(e) => {
            tracing::error!("Bot error on {}: {}", inbound.message_id, e);
            if let Err(e) = session.send(&Reply::plain(INTERNAL_ERROR_MESSAGE)).await {
                tracing::warn!("Could not send error reply: {}", e);
            }
        }
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = sigint.recv() => tracing::info!("Received SIGINT"),
                }
            }
            _ => {
                tracing::warn!("Could not register signal handlers, falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
