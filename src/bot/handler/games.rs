use rand::{rngs::StdRng, SeedableRng};
use teloxide::prelude::*;

use crate::bot::{
    dispatcher::HandlerResult,
    odds::{LotteryOutcome, RouletteOutcome, SlotsPrize, SLOT_SYMBOLS},
    processor::{self, SlotsReport},
    redis::Database,
};

use super::{
    constants::LOTTERY_ROLE_NAME,
    utils::{display_account, parse_account_ref, require_account, send_bot_message, send_process_error},
};

/* Lottery command.
 * One roll for the coveted role; a miss costs a small penalty.
 */
pub async fn action_lottery(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let mut rng = StdRng::from_entropy();
    match processor::lottery(&db, &mut rng, &account) {
        Ok(report) => {
            let text = match report.outcome {
                LotteryOutcome::Crit => format!(
                    "💥 CRIT! You won the {LOTTERY_ROLE_NAME} role and {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                LotteryOutcome::Success => format!(
                    "🟥 You won the {LOTTERY_ROLE_NAME} role and {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                LotteryOutcome::Miss => format!(
                    "🕊 No luck: {} credits lost. Try again! (Balance: {})",
                    -report.delta, report.balance
                ),
            };
            send_bot_message(&bot, &msg, text).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Farm command.
 * Steady income for role holders, boosted by an active farm booster.
 */
pub async fn action_farm(bot: Bot, msg: Message, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let mut rng = StdRng::from_entropy();
    match processor::farm(&db, &mut rng, &account, chrono::Utc::now()) {
        Ok(report) => {
            let boost_note = if report.boosted { " 🚀 (booster active)" } else { "" };
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "🌾 You earned {} credits!{boost_note} (Balance: {})",
                    report.reward, report.balance
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Roulette command.
 * Wagers the bet on the odds table matching the booster state.
 */
pub async fn action_roulette(bot: Bot, msg: Message, bet: i64, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let mut rng = StdRng::from_entropy();
    match processor::roulette(&db, &mut rng, &account, bet, chrono::Utc::now()) {
        Ok(report) => {
            let text = match report.outcome {
                RouletteOutcome::Win => format!(
                    "🎉 You won {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                RouletteOutcome::Lose => format!(
                    "💀 You lost {bet} credits... (Balance: {})",
                    report.balance
                ),
                RouletteOutcome::Refund => format!(
                    "🔄 Your {bet} credits come back to you. (Balance: {})",
                    report.balance
                ),
                RouletteOutcome::Jackpot => format!(
                    "💎 JACKPOT! You won {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
            };
            send_bot_message(&bot, &msg, text).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

fn display_reels(report: &SlotsReport) -> String {
    report
        .reels
        .iter()
        .map(|&reel| SLOT_SYMBOLS[reel])
        .collect::<Vec<&str>>()
        .join(" | ")
}

/* Slots command.
 * Three reels; triples pay big, an adjacent pair pays modestly.
 */
pub async fn action_slots(bot: Bot, msg: Message, bet: i64, db: Database) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let mut rng = StdRng::from_entropy();
    match processor::slots(&db, &mut rng, &account, bet) {
        Ok(report) => {
            let reels = display_reels(&report);
            let text = match report.prize {
                SlotsPrize::TopTriple => format!(
                    "🎰 {reels}\n💥 TRIPLE SEVENS! You won {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                SlotsPrize::SecondTriple => format!(
                    "🎰 {reels}\n💎 Triple diamonds! You won {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                SlotsPrize::Triple => format!(
                    "🎰 {reels}\n🎉 A triple! You won {} credits! (Balance: {})",
                    report.delta, report.balance
                ),
                SlotsPrize::Pair => format!(
                    "🎰 {reels}\n🙂 A pair pays {} credits. (Balance: {})",
                    report.delta, report.balance
                ),
                SlotsPrize::Miss => format!(
                    "🎰 {reels}\n💀 Nothing lines up, {bet} credits lost. (Balance: {})",
                    report.balance
                ),
            };
            send_bot_message(&bot, &msg, text).await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}

/* Duel command.
 * A coin flip for the stake; both sides must cover the bet.
 */
pub async fn action_duel(
    bot: Bot,
    msg: Message,
    (target, bet): (String, i64),
    db: Database,
) -> HandlerResult {
    let account = match require_account(&bot, &msg).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let target = parse_account_ref(&target);
    if target.is_empty() {
        send_bot_message(&bot, &msg, "❌ Tell me who to fight: @username.".to_string()).await?;
        return Ok(());
    }

    let mut rng = StdRng::from_entropy();
    match processor::duel(&db, &mut rng, &account, &target, bet) {
        Ok(report) => {
            send_bot_message(
                &bot,
                &msg,
                format!(
                    "⚔️ Duel over! {} wins and takes {} credits from {}!",
                    display_account(&report.winner),
                    report.bet,
                    display_account(&report.loser)
                ),
            )
            .await?;
        }
        Err(error) => send_process_error(&bot, &msg, error).await?,
    }
    Ok(())
}
