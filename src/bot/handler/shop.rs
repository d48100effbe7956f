use chrono::Utc;
use teloxide::prelude::*;

use crate::bot::{
    cooldown::format_wait,
    dispatcher::HandlerResult,
    processor::{
        self, booster_price, license_hourly_income, license_price, premium_price, CollectReport,
        CUSTOM_ROLE_PRICE,
    },
    redis::{BoosterKind, Database, LicenseKind, PremiumTier},
};

use super::{
    constants::{
        COMMAND_BUY_BOOSTER, COMMAND_BUY_LICENSE, COMMAND_BUY_PREMIUM, COMMAND_BUY_ROLE,
        COMMAND_COLLECT,
    },
    utils::{require_account, send_bot_message, send_process_error},
};

/* Shop command.
 * Lists everything money can buy and the sender's balance.
 */
pub async fn action_shop(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let balance = match processor::balance_of(&db, &account) {
        Ok(balance) => balance,
        Err(error) => return send_process_error(&bot, &msg, error).await,
    };

    let text = format!(
        "🛍 The credit shop:\n\n\
         🎨 {COMMAND_BUY_ROLE} Name #ff0000 — a custom role ({CUSTOM_ROLE_PRICE} credits)\n\
         🚜 {COMMAND_BUY_BOOSTER} farm — +50% farm income for 24h ({} credits)\n\
         🎰 {COMMAND_BUY_BOOSTER} roulette — better odds for 12h ({} credits)\n\
         🏢 {COMMAND_BUY_LICENSE} small|medium|large — hourly income of {}/{}/{} ({}/{}/{} credits)\n\
         ✨ {COMMAND_BUY_PREMIUM} gold|platinum — premium tiers ({}/{} credits)\n\n\
         Collect business income anytime with {COMMAND_COLLECT}.\n\
         💰 Your balance: {balance} credits",
        booster_price(BoosterKind::Farm),
        booster_price(BoosterKind::Roulette),
        license_hourly_income(LicenseKind::Small),
        license_hourly_income(LicenseKind::Medium),
        license_hourly_income(LicenseKind::Large),
        license_price(LicenseKind::Small),
        license_price(LicenseKind::Medium),
        license_price(LicenseKind::Large),
        premium_price(PremiumTier::Gold),
        premium_price(PremiumTier::Platinum),
    );
    send_bot_message(&bot, &msg, text).await?;
    Ok(())
}

/* Buy-role command.
 * A cosmetic role with a name and a hex color; an old one is replaced.
 */
pub async fn action_buy_role(
    bot: Bot,
    msg: Message,
    (name, color): (String, String),
    db: Database,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::buy_custom_role(&db, &account, &name, &color) {
        Ok(report) => {
            let replaced_note = match report.replaced {
                Some(old) => format!(" Your old role \"{}\" has been retired.", old.name),
                None => String::new(),
            };
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ You bought the role \"{}\" ({}) for {CUSTOM_ROLE_PRICE} credits!{replaced_note} (Balance: {})",
                    report.role.name, report.role.color, report.balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Buy-booster command. */
pub async fn action_buy_booster(bot: Bot, msg: Message, kind: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let kind = match kind.trim().to_lowercase().as_str() {
        "farm" => BoosterKind::Farm,
        "roulette" => BoosterKind::Roulette,
        _ => {
            send_bot_message(
                &bot,
                &msg,
                format!("❌ Usage: {COMMAND_BUY_BOOSTER} farm|roulette."),
            )
            .await?;
            return Ok(());
        }
    };

    match processor::buy_booster(&db, &account, kind, Utc::now()) {
        Ok(report) => {
            let label = match report.kind {
                BoosterKind::Farm => "farm booster (+50% income)",
                BoosterKind::Roulette => "roulette booster (better odds)",
            };
            let hours = processor::booster_duration_secs(report.kind) / 3600;
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ Your {label} is active for the next {hours}h! (Balance: {})",
                    report.balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Buy-license command. */
pub async fn action_buy_license(bot: Bot, msg: Message, kind: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let kind = match LicenseKind::parse(&kind.trim().to_lowercase()) {
        Some(kind) => kind,
        None => {
            send_bot_message(
                &bot,
                &msg,
                format!("❌ Usage: {COMMAND_BUY_LICENSE} small|medium|large."),
            )
            .await?;
            return Ok(());
        }
    };

    match processor::buy_license(&db, &account, kind, Utc::now()) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✅ You now run a {} business earning {} credits per hour! (Balance: {})",
                    report.kind.as_str(),
                    license_hourly_income(report.kind),
                    report.balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Collect command.
 * Pays out whole hours of accrued business income.
 */
pub async fn action_collect(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    match processor::collect_income(&db, &account, Utc::now()) {
        Ok(CollectReport::Collected {
            hours,
            amount,
            balance,
        }) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "🏢 Your business made {amount} credits over {hours}h! (Balance: {balance})"
                ),
            )
            .await?;
        }
        Ok(CollectReport::NotReady { wait_secs }) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "⏳ Nothing to collect yet, the next payout is in {}.",
                    format_wait(wait_secs)
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Buy-premium command. */
pub async fn action_buy_premium(bot: Bot, msg: Message, tier: String, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let tier = match PremiumTier::parse(&tier.trim().to_lowercase()) {
        Some(tier) => tier,
        None => {
            send_bot_message(
                &bot,
                &msg,
                format!("❌ Usage: {COMMAND_BUY_PREMIUM} gold|platinum."),
            )
            .await?;
            return Ok(());
        }
    };

    match processor::buy_premium(&db, &account, tier) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "✨ Welcome to the {} tier! (Balance: {})",
                    report.tier.as_str(),
                    report.balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}
