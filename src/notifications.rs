//! Optional Slack/Telegram fan-out of warning and error change events.

use crate::domain::changelog::models::entry::{ChangeEvent, Severity};
use chatterbox::message::{Dispatcher, Message};
use log::{error, info};
use tokio::sync::mpsc::Receiver;

pub fn setup_dispatcher() -> Dispatcher {
    let slack = match std::env::var("SOCWATCH_SLACK_WEBHOOK_URL") {
        Ok(webhook_url) => {
            info!("Using Slack dispatcher");
            let channel = std::env::var("SOCWATCH_SLACK_CHANNEL")
                .expect("SOCWATCH_SLACK_CHANNEL not defined");
            Some(chatterbox::dispatcher::slack::Slack {
                webhook_url,
                channel,
            })
        }
        Err(_) => {
            info!("SOCWATCH_SLACK_WEBHOOK_URL not defined");
            None
        }
    };
    let telegram = match std::env::var("SOCWATCH_TELEGRAM_BOT_TOKEN") {
        Ok(bot_token) => {
            info!("Using Telegram dispatcher");
            let chat_id = std::env::var("SOCWATCH_TELEGRAM_CHAT_ID")
                .expect("SOCWATCH_TELEGRAM_CHAT_ID not defined");
            Some(chatterbox::dispatcher::telegram::Telegram { bot_token, chat_id })
        }
        Err(_) => {
            info!("SOCWATCH_TELEGRAM_BOT_TOKEN not defined");
            None
        }
    };
    let sender = chatterbox::dispatcher::Sender {
        slack,
        telegram,
        email: None,
    };

    Dispatcher::new(sender)
}

/// Drains appended change events and dispatches the ones worth a ping.
/// Info and success entries stay in the changelog only.
pub async fn start_notification_handler(mut rx: Receiver<ChangeEvent>, dispatcher: Dispatcher) {
    while let Some(event) = rx.recv().await {
        match event.level {
            Severity::Warning | Severity::Error => {
                let message = Message::new(event.action.label().to_string(), event.details);
                if let Err(e) = dispatcher.dispatch(&message).await {
                    error!("failed to dispatch message: {e}");
                }
            }
            _ => {}
        }
    }
}
