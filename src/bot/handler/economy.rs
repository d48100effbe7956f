use rand::{rngs::StdRng, SeedableRng};
use teloxide::prelude::*;

use crate::bot::{
    config::Config,
    cooldown::format_wait,
    dispatcher::HandlerResult,
    processor::{self, DailyReport, ProcessError},
    redis::Database,
};

use super::{
    constants::{ADMIN_ONLY_MESSAGE, COMMAND_SET_DESCRIPTION},
    utils::{
        display_account, parse_account_ref, require_account, send_bot_message,
        send_process_error,
    },
};

/* Balance command.
 * Shows the sender's personal balance.
 */
pub async fn action_balance(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::balance_of(&db, &account) {
        Ok(balance) => {
            send_bot_message(&bot, &msg, format!("💰 Your balance: {balance} credits")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Transfer command.
 * Moves credits from the sender to another account.
 */
pub async fn action_transfer(
    bot: Bot,
    msg: Message,
    (target, amount): (String, i64),
    db: Database,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let target = parse_account_ref(&target);
    if target.is_empty() {
        send_bot_message(&bot, &msg, "❌ Tell me who to pay: @username.".to_string()).await?;
        return Ok(());
    }

    match processor::transfer(&db, &account, &target, amount) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ You sent {amount} credits to {}! (Balance: {})",
                    display_account(&target),
                    report.sender_balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Leaderboard command.
 * Shows the top 10 accounts by balance.
 */
pub async fn action_top(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    match processor::leaderboard(&db) {
        Ok(standings) => {
            if standings.is_empty() {
                send_bot_message(&bot, &msg, "😔 The leaderboard is empty.".to_string())
                    .await?;
                return Ok(());
            }

            let mut lines: Vec<String> = vec!["🏆 Top 10 by balance:".to_string()];
            for (position, (account, balance)) in standings.iter().enumerate() {
                lines.push(format!(
                    "{}. {} — {balance} credits",
                    position + 1,
                    display_account(account)
                ));
            }
            send_bot_message(&bot, &msg, lines.join("\n")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Daily command.
 * Claims the once-a-day reward; the window is tracked per account.
 */
pub async fn action_daily(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let mut rng = StdRng::from_entropy();
    match processor::claim_daily(&db, &mut rng, &account, chrono::Utc::now()) {
        Ok(DailyReport::Claimed { reward, balance }) => {
            send_bot_message(
                &bot,
                &msg,
                format!("🎁 You received {reward} credits! (Balance: {balance})"),
            )
            .await?;
        }
        Ok(DailyReport::NotReady { wait_secs }) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "⏳ You already claimed your daily reward! Come back in {}.",
                    format_wait(wait_secs)
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Profile command.
 * Shows the sender's profile, or another account's when mentioned.
 */
pub async fn action_profile(bot: Bot, msg: Message, target: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let target = parse_account_ref(&target);
    let subject = if target.is_empty() { account } else { target };

    match processor::profile(&db, &subject) {
        Ok(report) => {
            let mut lines: Vec<String> = vec![format!("👤 Profile of {}", display_account(&subject))];
            if let Some(description) = &report.description {
                lines.push(format!("📝 {description}"));
            }
            lines.push(format!("💰 Balance: {} credits", report.balance));
            lines.push(format!(
                "👥 Clan: {}",
                report.clan.as_deref().unwrap_or("none")
            ));
            if report.lottery_role {
                lines.push(format!("🎖 Role: {}", super::constants::LOTTERY_ROLE_NAME));
            }
            if let Some(license) = report.license {
                lines.push(format!("🏢 Business license: {}", license.as_str()));
            }
            if let Some(premium) = report.premium {
                lines.push(format!("✨ Premium: {}", premium.as_str()));
            }
            send_bot_message(&bot, &msg, lines.join("\n")).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Set-description command.
 * Updates the sender's profile description, capped at 200 characters.
 */
pub async fn action_set_description(
    bot: Bot,
    msg: Message,
    text: String,
    db: Database,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    if text.trim().is_empty() {
        send_bot_message(
            &bot,
            &msg,
            format!("❌ Usage: {COMMAND_SET_DESCRIPTION} your new description."),
        )
        .await?;
        return Ok(());
    }

    match processor::set_description(&db, &account, &text) {
        Ok(()) => {
            send_bot_message(&bot, &msg, "✅ Profile description updated!".to_string()).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Award command, admin only.
 * Grants credits to an account out of thin air.
 */
pub async fn action_award(
    bot: Bot,
    msg: Message,
    (target, amount): (String, i64),
    db: Database,
    config: Config,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };
    if !config.is_admin(&account) {
        send_bot_message(&bot, &msg, ADMIN_ONLY_MESSAGE.to_string()).await?;
        return Ok(());
    }

    let target = parse_account_ref(&target);
    match processor::award(&db, &target, amount) {
        Ok(balance) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ Awarded {amount} credits to {}.\n💰 Their new balance: {balance} credits",
                    display_account(&target)
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Fine command, admin only.
 * Removes credits from an account; the account must cover the fine.
 */
pub async fn action_fine(
    bot: Bot,
    msg: Message,
    (target, amount): (String, i64),
    db: Database,
    config: Config,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };
    if !config.is_admin(&account) {
        send_bot_message(&bot, &msg, ADMIN_ONLY_MESSAGE.to_string()).await?;
        return Ok(());
    }

    let target = parse_account_ref(&target);
    match processor::fine(&db, &target, amount) {
        Ok(balance) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ Fined {} {amount} credits.\n💰 Their new balance: {balance} credits",
                    display_account(&target)
                ),
            )
            .await?;
        }
        Err(ProcessError::InsufficientFunds { available, .. }) => {
            send_bot_message(
                &bot,
                &msg,
                format!("❌ They only have {available} credits, the fine doesn't fit."),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}
