use teloxide::{payloads::SendMessage, prelude::*, requests::JsonRequest, types::Message};

use crate::bot::{
    dispatcher::{BotError, HandlerResult},
    processor::ProcessError,
};

use super::constants::{NO_USERNAME_MESSAGE, UNKNOWN_ERROR_MESSAGE};

/* Common utilites for handlers. */

// Send a message to the chat the command came from.
pub fn send_bot_message(bot: &Bot, msg: &Message, message: String) -> JsonRequest<SendMessage> {
    bot.send_message(msg.chat.id, message)
}

// The sender's account key: their lowercased username.
pub fn sender_account(msg: &Message) -> Option<String> {
    msg.from()
        .and_then(|user| user.username.clone())
        .map(|username| username.to_lowercase())
}

/* Resolves the sender into an account key, or tells them why not.
 * Returns None after replying, so callers can just return.
 */
pub async fn require_account(bot: &Bot, msg: &Message) -> Result<Option<String>, BotError> {
    match sender_account(msg) {
        Some(account) => Ok(Some(account)),
        None => {
            send_bot_message(bot, msg, NO_USERNAME_MESSAGE.to_string()).await?;
            Ok(None)
        }
    }
}

// Normalizes a typed @mention into an account key.
pub fn parse_account_ref(text: &str) -> String {
    text.trim().trim_start_matches('@').to_lowercase()
}

// Display form of an account key.
pub fn display_account(account: &str) -> String {
    format!("@{account}")
}

/* Reports a failed operation to the invoking user.
 * Infrastructure failures are logged and surfaced generically;
 * everything else carries its own reason.
 */
pub async fn send_process_error(bot: &Bot, msg: &Message, error: ProcessError) -> HandlerResult {
    let text = match &error {
        ProcessError::Validation(reason) => format!("❌ {reason}"),
        ProcessError::InsufficientFunds { needed, available } => {
            format!("❌ Not enough credits: you need {needed}, but have {available}.")
        }
        ProcessError::StateConflict(reason) => format!("🟥 {reason}"),
        ProcessError::NotFound(reason) => format!("❌ {reason}"),
        ProcessError::Permission(reason) => format!("⛔ {reason}"),
        ProcessError::CrudError(crud_error) => {
            log::error!("Store failure while handling a command: {crud_error}");
            UNKNOWN_ERROR_MESSAGE.to_string()
        }
    };

    send_bot_message(bot, msg, text).await?;
    Ok(())
}
