/* User-facing command names and shared message fragments. */

pub const COMMAND_HELP: &str = "/help";
pub const COMMAND_LOTTERY: &str = "/lottery";
pub const COMMAND_FARM: &str = "/farm";
pub const COMMAND_BALANCE: &str = "/balance";
pub const COMMAND_TRANSFER: &str = "/transfer";
pub const COMMAND_TOP: &str = "/top";
pub const COMMAND_DAILY: &str = "/daily";
pub const COMMAND_ROULETTE: &str = "/roulette";
pub const COMMAND_SLOTS: &str = "/slots";
pub const COMMAND_DUEL: &str = "/duel";
pub const COMMAND_SHOP: &str = "/shop";
pub const COMMAND_BUY_ROLE: &str = "/buyrole";
pub const COMMAND_BUY_BOOSTER: &str = "/buybooster";
pub const COMMAND_BUY_LICENSE: &str = "/buylicense";
pub const COMMAND_COLLECT: &str = "/collect";
pub const COMMAND_BUY_PREMIUM: &str = "/buypremium";
pub const COMMAND_PROFILE: &str = "/profile";
pub const COMMAND_SET_DESCRIPTION: &str = "/setdescription";
pub const COMMAND_CREATE_CLAN: &str = "/createclan";
pub const COMMAND_JOIN_CLAN: &str = "/joinclan";
pub const COMMAND_CLAN_DEPOSIT: &str = "/clandeposit";
pub const COMMAND_CLAN_WITHDRAW: &str = "/clanwithdraw";
pub const COMMAND_CLAN_TOP: &str = "/clantop";

// The cosmetic role handed out by the lottery.
pub const LOTTERY_ROLE_NAME: &str = "Patriot";

pub const UNKNOWN_ERROR_MESSAGE: &str =
    "❌ Something went wrong while processing your command. Please try again later!";
pub const NO_USERNAME_MESSAGE: &str =
    "❌ You need a Telegram username before you can use the economy!";
pub const ADMIN_ONLY_MESSAGE: &str = "⛔ This command is for administrators only!";
