// Exported functions
pub use self::clan::{
    action_clan_deposit, action_clan_top, action_clan_withdraw, action_create_clan,
    action_join_clan, action_leave_clan,
};
pub use self::economy::{
    action_award, action_balance, action_daily, action_fine, action_profile,
    action_set_description, action_top, action_transfer,
};
pub use self::games::{action_duel, action_farm, action_lottery, action_roulette, action_slots};
pub use self::general::{action_help, action_start, invalid_state};
pub use self::shop::{
    action_buy_booster, action_buy_license, action_buy_premium, action_buy_role, action_collect,
    action_shop,
};
pub use self::utils::{send_bot_message, sender_account};

// Submodules
mod clan;
mod constants;
mod economy;
mod games;
mod general;
mod shop;
mod utils;
