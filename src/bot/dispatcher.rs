use chrono::Utc;
use teloxide::{prelude::*, utils::command::BotCommands, RequestError};

use super::config::Config;
use super::cooldown::{format_wait, CommandKind, CooldownTracker};
use super::handler::{
    action_award, action_balance, action_buy_booster, action_buy_license, action_buy_premium,
    action_buy_role, action_clan_deposit, action_clan_top, action_clan_withdraw, action_collect,
    action_create_clan, action_daily, action_duel, action_farm, action_fine, action_help,
    action_join_clan, action_leave_clan, action_lottery, action_profile, action_roulette,
    action_set_description, action_shop, action_slots, action_start, action_top, action_transfer,
    invalid_state, send_bot_message, sender_account,
};
use super::processor::ProcessError;
use super::redis::Database;

/* The dispatcher is the front door of the bot.
 * It maps each inbound command onto its handler and enforces the
 * per-account cooldown before any handler runs: a command still on
 * cooldown is answered with the remaining wait and never reaches its
 * handler, so it has no side effects at all.
 */

/* Types */
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("User error: {0}")]
    UserError(String),
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Request error: {0}")]
    RequestError(RequestError),
}

impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Show this help message.")]
    Help,
    #[command(description = "Start the bot.")]
    Start,
    #[command(description = "Try your luck at the role lottery (2h cooldown).")]
    Lottery,
    #[command(description = "Farm credits, role holders only (20m cooldown).")]
    Farm,
    #[command(description = "Show your balance (5s cooldown).")]
    Balance,
    #[command(description = "Transfer credits: /transfer @user amount.", parse_with = "split")]
    Transfer { target: String, amount: i64 },
    #[command(description = "Top 10 accounts by balance (5s cooldown).")]
    Top,
    #[command(description = "Claim the daily reward (once per 24h).")]
    Daily,
    #[command(description = "Spin the roulette: /roulette bet (30s cooldown).")]
    Roulette { bet: i64 },
    #[command(description = "Spin the slots: /slots bet (30s cooldown).")]
    Slots { bet: i64 },
    #[command(description = "Challenge a duel: /duel @user bet (5m cooldown).", parse_with = "split")]
    Duel { target: String, bet: i64 },
    #[command(description = "Browse the shop.")]
    Shop,
    #[command(description = "Buy a custom role: /buyrole Name #ff0000.", parse_with = "split")]
    BuyRole { name: String, color: String },
    #[command(description = "Buy a booster: /buybooster farm|roulette.")]
    BuyBooster { kind: String },
    #[command(description = "Buy a business license: /buylicense small|medium|large.")]
    BuyLicense { kind: String },
    #[command(description = "Collect your business income.")]
    Collect,
    #[command(description = "Buy a premium tier: /buypremium gold|platinum.")]
    BuyPremium { tier: String },
    #[command(description = "View a profile: /profile [@user].")]
    Profile { target: String },
    #[command(description = "Set your profile description.")]
    SetDescription { text: String },
    #[command(description = "Admin: award credits: /award @user amount.", parse_with = "split")]
    Award { target: String, amount: i64 },
    #[command(description = "Admin: fine a user: /fine @user amount.", parse_with = "split")]
    Fine { target: String, amount: i64 },
    #[command(description = "Found a clan: /createclan name.")]
    CreateClan { name: String },
    #[command(description = "Join a clan: /joinclan name.")]
    JoinClan { name: String },
    #[command(description = "Leave your clan.")]
    LeaveClan,
    #[command(description = "Deposit credits into the clan treasury.")]
    ClanDeposit { amount: i64 },
    #[command(description = "Withdraw from the clan treasury, owner only.")]
    ClanWithdraw { amount: i64 },
    #[command(description = "Top 10 clans by treasury (5s cooldown).")]
    ClanTop,
}

// Commands without an entry here carry no cooldown.
fn command_kind(command: &Command) -> Option<CommandKind> {
    match command {
        Command::Lottery => Some(CommandKind::Lottery),
        Command::Farm => Some(CommandKind::Farm),
        Command::Balance => Some(CommandKind::Balance),
        Command::Top => Some(CommandKind::Leaderboard),
        Command::Roulette { .. } => Some(CommandKind::Roulette),
        Command::Slots { .. } => Some(CommandKind::Slots),
        Command::Duel { .. } => Some(CommandKind::Duel),
        Command::ClanTop => Some(CommandKind::ClanTop),
        _ => None,
    }
}

/* The cooldown gate.
 * Runs after command parsing and before every handler. Returning
 * false stops the chain, so a rejected command has zero side effects.
 */
async fn enforce_cooldown(
    bot: Bot,
    msg: Message,
    command: Command,
    cooldowns: CooldownTracker,
) -> bool {
    let kind = match command_kind(&command) {
        Some(kind) => kind,
        None => return true,
    };
    // Accounts without a username are rejected later by the handler.
    let account = match sender_account(&msg) {
        Some(account) => account,
        None => return true,
    };

    match cooldowns.begin(&account, kind, Utc::now()) {
        Ok(()) => true,
        Err(wait_secs) => {
            let text = format!(
                "⏳ Please wait {} before using this command again.",
                format_wait(wait_secs)
            );
            if let Err(err) = send_bot_message(&bot, &msg, text).await {
                log::warn!("Failed to send cooldown notice: {err}");
            }
            false
        }
    }
}

/* Main Dispatch function */
pub async fn run_dispatcher(bot: Bot, db: Database, config: Config) {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .chain(dptree::filter_async(enforce_cooldown))
        .branch(case![Command::Help].endpoint(action_help))
        .branch(case![Command::Start].endpoint(action_start))
        .branch(case![Command::Lottery].endpoint(action_lottery))
        .branch(case![Command::Farm].endpoint(action_farm))
        .branch(case![Command::Balance].endpoint(action_balance))
        .branch(case![Command::Transfer { target, amount }].endpoint(action_transfer))
        .branch(case![Command::Top].endpoint(action_top))
        .branch(case![Command::Daily].endpoint(action_daily))
        .branch(case![Command::Roulette { bet }].endpoint(action_roulette))
        .branch(case![Command::Slots { bet }].endpoint(action_slots))
        .branch(case![Command::Duel { target, bet }].endpoint(action_duel))
        .branch(case![Command::Shop].endpoint(action_shop))
        .branch(case![Command::BuyRole { name, color }].endpoint(action_buy_role))
        .branch(case![Command::BuyBooster { kind }].endpoint(action_buy_booster))
        .branch(case![Command::BuyLicense { kind }].endpoint(action_buy_license))
        .branch(case![Command::Collect].endpoint(action_collect))
        .branch(case![Command::BuyPremium { tier }].endpoint(action_buy_premium))
        .branch(case![Command::Profile { target }].endpoint(action_profile))
        .branch(case![Command::SetDescription { text }].endpoint(action_set_description))
        .branch(case![Command::Award { target, amount }].endpoint(action_award))
        .branch(case![Command::Fine { target, amount }].endpoint(action_fine))
        .branch(case![Command::CreateClan { name }].endpoint(action_create_clan))
        .branch(case![Command::JoinClan { name }].endpoint(action_join_clan))
        .branch(case![Command::LeaveClan].endpoint(action_leave_clan))
        .branch(case![Command::ClanDeposit { amount }].endpoint(action_clan_deposit))
        .branch(case![Command::ClanWithdraw { amount }].endpoint(action_clan_withdraw))
        .branch(case![Command::ClanTop].endpoint(action_clan_top));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(invalid_state));

    Dispatcher::builder(bot, message_handler)
        .dependencies(dptree::deps![db, config, CooldownTracker::new()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
