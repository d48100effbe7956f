// Exported functions
pub use self::connect::open_default;
pub use self::manager::{
    adjust_account_balance, clan_exists, clan_member_count, create_clan, get_account_balance,
    get_account_clan, get_account_custom_role, get_account_lottery_role, get_account_premium_tier,
    get_booster_until, get_business_license, get_clan_record, get_daily_claimed_at,
    get_profile_description, join_clan, leave_clan, move_clan_treasury, set_account_custom_role,
    set_account_lottery_role, set_account_premium_tier, set_booster_until, set_business_license,
    set_daily_claimed_at, set_profile_description, top_accounts, top_clans,
    transfer_account_balance,
};

// Exported structs and types
pub use self::clan::ClanRecord;
pub use self::connect::{DBError, Database};
pub use self::manager::{BoosterKind, ClanSummary, CrudError, LicenseKind, PremiumTier};
pub use self::role::CustomRoleRecord;

// Submodules
mod account;
mod clan;
mod connect;
mod manager;
mod role;

// Cleanup helpers for store-backed tests outside this module.
#[cfg(test)]
pub mod test_support {
    use redis::Connection;

    use super::{account, clan};

    pub fn delete_account_fixture(con: &mut Connection, key: &str) {
        account::delete_account(con, key).unwrap();
    }

    pub fn delete_clan_fixture(con: &mut Connection, name: &str, members: &[&str]) {
        for member in members {
            clan::delete_account_clan(con, member).unwrap();
        }
        clan::delete_clan(con, name).unwrap();
    }
}
