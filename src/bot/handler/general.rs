use teloxide::{prelude::*, utils::command::BotCommands};

use crate::bot::dispatcher::{Command, HandlerResult};

use super::{
    constants::{
        COMMAND_BALANCE, COMMAND_BUY_ROLE, COMMAND_CLAN_DEPOSIT, COMMAND_CLAN_TOP,
        COMMAND_CLAN_WITHDRAW, COMMAND_CREATE_CLAN, COMMAND_DAILY, COMMAND_DUEL, COMMAND_FARM,
        COMMAND_HELP, COMMAND_JOIN_CLAN, COMMAND_LOTTERY, COMMAND_PROFILE, COMMAND_ROULETTE,
        COMMAND_SHOP, COMMAND_SLOTS, COMMAND_TOP, COMMAND_TRANSFER,
    },
    utils::send_bot_message,
};

/* Invalid state.
 * Invoked for any non-command message addressed to the bot.
 * Currently, simply does not respond to anything. Reduces spam.
 */
pub async fn invalid_state(_bot: Bot, _msg: Message) -> HandlerResult {
    Ok(())
}

/* Start command.
 * Displays a welcome message to the user.
 */
pub async fn action_start(bot: Bot, msg: Message) -> HandlerResult {
    let introduction = format!("👋 Welcome to the credit economy! 💰\n\nEarn credits, climb the leaderboard, and pool your riches with a clan. Check where you stand anytime with {COMMAND_BALANCE}.");
    let earn_info = &format!("🎲 Try {COMMAND_LOTTERY} for the role, then {COMMAND_FARM} to earn steadily. Don't miss your {COMMAND_DAILY} reward!");
    let play_info = &format!("🎰 Feeling lucky? Wager your credits on {COMMAND_ROULETTE}, {COMMAND_SLOTS}, or challenge someone to a {COMMAND_DUEL}!");
    let social_info = &format!("👥 Check the {COMMAND_TOP}, browse the {COMMAND_SHOP}, or found your own clan with {COMMAND_CREATE_CLAN}!");
    let closing = &format!("ℹ️ Ask me for {COMMAND_HELP} anytime!");
    send_bot_message(
        &bot,
        &msg,
        format!("{introduction}\n\n{earn_info}\n\n{play_info}\n\n{social_info}\n\n{closing}"),
    )
    .await?;
    Ok(())
}

/* Help command.
 * Displays a list of commands available to the user.
 */
pub async fn action_help(bot: Bot, msg: Message) -> HandlerResult {
    let commands = Command::descriptions().to_string();

    let examples = format!(
        "Examples:\n{COMMAND_TRANSFER} @friend 100\n{COMMAND_ROULETTE} 100\n{COMMAND_BUY_ROLE} Tycoon #ff0000\n{COMMAND_DUEL} @rival 200\n{COMMAND_PROFILE} @friend"
    );
    let clan_info = format!(
        "Clans share a treasury: join one with {COMMAND_JOIN_CLAN}, chip in with {COMMAND_CLAN_DEPOSIT}, and only the owner may {COMMAND_CLAN_WITHDRAW}. See {COMMAND_CLAN_TOP} for the standings."
    );

    send_bot_message(
        &bot,
        &msg,
        format!("📜 My Commands 📜\n\n{commands}\n\n{examples}\n\n{clan_info}"),
    )
    .await?;

    Ok(())
}
