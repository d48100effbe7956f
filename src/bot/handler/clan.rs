use teloxide::prelude::*;

use crate::bot::{
    dispatcher::HandlerResult,
    processor::{self, CLAN_CREATION_PRICE},
    redis::Database,
};

use super::utils::{require_account, send_bot_message, send_process_error};

/* Create-clan command.
 * Founds a clan for the creation price; the founder becomes the owner.
 */
pub async fn action_create_clan(bot: Bot, msg: Message, name: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::create_clan(&db, &account, &name) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ Clan '{}' founded for {CLAN_CREATION_PRICE} credits! You are its owner. (Balance: {})",
                    report.name, report.owner_balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Join-clan command. */
pub async fn action_join_clan(bot: Bot, msg: Message, name: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::join_clan(&db, &account, &name) {
        Ok(name) => {
            send_bot_message(&bot, &msg, format!("✅ You joined the clan '{name}'!")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Leave-clan command. The owner cannot leave. */
pub async fn action_leave_clan(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::leave_clan(&db, &account) {
        Ok(name) => {
            send_bot_message(&bot, &msg, format!("👋 You left the clan '{name}'.")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Clan-deposit command.
 * Moves personal credits into the shared treasury.
 */
pub async fn action_clan_deposit(bot: Bot, msg: Message, amount: i64, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::clan_deposit(&db, &account, amount) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ You deposited {amount} credits into '{}'.\n🏦 Treasury: {} credits. Your balance: {}",
                    report.clan, report.treasury_balance, report.account_balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Clan-withdraw command, owner only. */
pub async fn action_clan_withdraw(
    bot: Bot,
    msg: Message,
    amount: i64,
    db: Database,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::clan_withdraw(&db, &account, amount) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ You withdrew {amount} credits from '{}'.\n🏦 Treasury: {} credits. Your balance: {}",
                    report.clan, report.treasury_balance, report.account_balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Clan-top command.
 * The richest clans by treasury, with live member counts.
 */
pub async fn action_clan_top(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    match processor::clan_top(&db) {
        Ok(summaries) => {
            if summaries.is_empty() {
                send_bot_message(&bot, &msg, "😔 No clans exist yet.".to_string()).await?;
                return Ok(());
            }

            let mut lines: Vec<String> = vec!["🏆 Top clans:".to_string()];
            for (position, clan) in summaries.iter().enumerate() {
                lines.push(format!(
                    "{}. {} — {} credits ({} members)",
                    position + 1,
                    clan.name,
                    clan.treasury,
                    clan.members
                ));
            }
            send_bot_message(&bot, &msg, lines.join("\n")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}
