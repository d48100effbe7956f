use redis::RedisError;

use super::{
    account::{
        get_account_keys, get_balance, get_description, get_license, get_lottery_role,
        get_timestamp, incr_balance, move_balance, set_description, set_license, set_lottery_role,
        set_timestamp,
    },
    clan::{
        add_clan_with_owner, add_member, get_account_clan as get_account_clan_raw, get_clan,
        get_clan_exists, get_clan_names, get_member_count, move_treasury, remove_member,
        ClanRecord,
    },
    connect::{DBError, Database},
    role::{
        get_custom_role, get_premium_tier, set_custom_role, set_premium_tier, CustomRoleRecord,
    },
};

/* Redis Manager
 * Manager represents a module that manages all database operations.
 * No external package should call any of the database operations directly,
 * only through the manager.
 * The manager then exposes APIs for the main package to call.
 */

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CrudError {
    #[error("Redis operation error: {0}")]
    RedisError(RedisError),
    #[error("Redis database error: {0}")]
    DBError(DBError),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

// Implement the From trait to convert from RedisError to CrudError
impl From<RedisError> for CrudError {
    fn from(redis_error: RedisError) -> CrudError {
        CrudError::RedisError(redis_error)
    }
}

// Implement the From trait to convert from DBError to CrudError
impl From<DBError> for CrudError {
    fn from(db_error: DBError) -> CrudError {
        CrudError::DBError(db_error)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BoosterKind {
    Farm,
    Roulette,
}

impl BoosterKind {
    fn field(&self) -> &'static str {
        match self {
            Self::Farm => "farm_booster_until",
            Self::Roulette => "roulette_booster_until",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LicenseKind {
    Small,
    Medium,
    Large,
}

impl LicenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PremiumTier {
    Gold,
    Platinum,
}

impl PremiumTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClanSummary {
    pub name: String,
    pub treasury: i64,
    pub members: u32,
}

const DAILY_CLAIMED_AT_FIELD: &str = "daily_claimed_at";

/* Ledger operations. The balance field is only ever mutated through
 * HINCRBY; callers are responsible for sufficiency checks.
 */

pub fn get_account_balance(db: &Database, account: &str) -> Result<i64, CrudError> {
    let mut con = db.connect()?;
    Ok(get_balance(&mut con, account)?)
}

pub fn adjust_account_balance(db: &Database, account: &str, delta: i64) -> Result<i64, CrudError> {
    let mut con = db.connect()?;
    Ok(incr_balance(&mut con, account, delta)?)
}

// Debit-and-credit as one atomic unit. Returns the sender's new balance.
pub fn transfer_account_balance(
    db: &Database,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<i64, CrudError> {
    let mut con = db.connect()?;
    Ok(move_balance(&mut con, from, to, amount)?)
}

/* Retrieves the n richest accounts, highest balance first.
 * The account index is scanned and sorted in memory; ties keep a
 * stable order by account key.
 */
pub fn top_accounts(db: &Database, n: usize) -> Result<Vec<(String, i64)>, CrudError> {
    let mut con = db.connect()?;

    let mut standings: Vec<(String, i64)> = Vec::new();
    let mut keys = get_account_keys(&mut con)?;
    keys.sort();
    for key in keys {
        let balance = get_balance(&mut con, &key)?;
        standings.push((key, balance));
    }

    standings.sort_by(|a, b| b.1.cmp(&a.1));
    standings.truncate(n);
    Ok(standings)
}

pub fn get_profile_description(db: &Database, account: &str) -> Result<Option<String>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_description(&mut con, account)?)
}

pub fn set_profile_description(
    db: &Database,
    account: &str,
    description: &str,
) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_description(&mut con, account, description)?)
}

pub fn get_account_lottery_role(db: &Database, account: &str) -> Result<bool, CrudError> {
    let mut con = db.connect()?;
    Ok(get_lottery_role(&mut con, account)?)
}

pub fn set_account_lottery_role(db: &Database, account: &str, held: bool) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_lottery_role(&mut con, account, held)?)
}

pub fn get_daily_claimed_at(db: &Database, account: &str) -> Result<Option<i64>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_timestamp(&mut con, account, DAILY_CLAIMED_AT_FIELD)?)
}

pub fn set_daily_claimed_at(db: &Database, account: &str, at: i64) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_timestamp(&mut con, account, DAILY_CLAIMED_AT_FIELD, at)?)
}

pub fn get_booster_until(
    db: &Database,
    account: &str,
    kind: BoosterKind,
) -> Result<Option<i64>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_timestamp(&mut con, account, kind.field())?)
}

pub fn set_booster_until(
    db: &Database,
    account: &str,
    kind: BoosterKind,
    until: i64,
) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_timestamp(&mut con, account, kind.field(), until)?)
}

pub fn get_business_license(
    db: &Database,
    account: &str,
) -> Result<Option<(LicenseKind, i64)>, CrudError> {
    let mut con = db.connect()?;
    match get_license(&mut con, account)? {
        Some((raw, claimed_at)) => {
            let kind = LicenseKind::parse(&raw)
                .ok_or_else(|| CrudError::MalformedRecord(format!("license kind '{raw}'")))?;
            Ok(Some((kind, claimed_at)))
        }
        None => Ok(None),
    }
}

pub fn set_business_license(
    db: &Database,
    account: &str,
    kind: LicenseKind,
    claimed_at: i64,
) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_license(&mut con, account, kind.as_str(), claimed_at)?)
}

/* Cosmetic role records. */

pub fn get_account_custom_role(
    db: &Database,
    account: &str,
) -> Result<Option<CustomRoleRecord>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_custom_role(&mut con, account)?)
}

pub fn set_account_custom_role(
    db: &Database,
    account: &str,
    role: &CustomRoleRecord,
) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_custom_role(&mut con, account, role)?)
}

pub fn get_account_premium_tier(
    db: &Database,
    account: &str,
) -> Result<Option<PremiumTier>, CrudError> {
    let mut con = db.connect()?;
    match get_premium_tier(&mut con, account)? {
        Some(raw) => {
            let tier = PremiumTier::parse(&raw)
                .ok_or_else(|| CrudError::MalformedRecord(format!("premium tier '{raw}'")))?;
            Ok(Some(tier))
        }
        None => Ok(None),
    }
}

pub fn set_account_premium_tier(
    db: &Database,
    account: &str,
    tier: PremiumTier,
) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(set_premium_tier(&mut con, account, tier.as_str())?)
}

/* Clan operations. */

pub fn get_account_clan(db: &Database, account: &str) -> Result<Option<String>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_account_clan_raw(&mut con, account)?)
}

pub fn clan_exists(db: &Database, name: &str) -> Result<bool, CrudError> {
    let mut con = db.connect()?;
    Ok(get_clan_exists(&mut con, name)?)
}

pub fn get_clan_record(db: &Database, name: &str) -> Result<Option<ClanRecord>, CrudError> {
    let mut con = db.connect()?;
    Ok(get_clan(&mut con, name)?)
}

/* Creates the clan, enrols the owner and debits the creation price as
 * one atomic unit. Returns the owner's new balance.
 */
pub fn create_clan(
    db: &Database,
    name: &str,
    owner: &str,
    member_slots: u32,
    income_multiplier: f64,
    creation_price: i64,
) -> Result<i64, CrudError> {
    let mut con = db.connect()?;
    Ok(add_clan_with_owner(
        &mut con,
        name,
        owner,
        member_slots,
        income_multiplier,
        creation_price,
    )?)
}

pub fn join_clan(db: &Database, name: &str, account: &str) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(add_member(&mut con, name, account)?)
}

pub fn leave_clan(db: &Database, name: &str, account: &str) -> Result<(), CrudError> {
    let mut con = db.connect()?;
    Ok(remove_member(&mut con, name, account)?)
}

pub fn clan_member_count(db: &Database, name: &str) -> Result<u32, CrudError> {
    let mut con = db.connect()?;
    Ok(get_member_count(&mut con, name)?)
}

// Positive amount: personal -> treasury. Negative: treasury -> personal.
// Returns (new personal balance, new treasury balance).
pub fn move_clan_treasury(
    db: &Database,
    name: &str,
    account: &str,
    amount: i64,
) -> Result<(i64, i64), CrudError> {
    let mut con = db.connect()?;
    Ok(move_treasury(&mut con, name, account, amount)?)
}

/* Retrieves the n richest clans by treasury balance, each annotated
 * with its live member count.
 */
pub fn top_clans(db: &Database, n: usize) -> Result<Vec<ClanSummary>, CrudError> {
    let mut con = db.connect()?;

    let mut summaries: Vec<ClanSummary> = Vec::new();
    let mut names = get_clan_names(&mut con)?;
    names.sort();
    for name in names {
        if let Some(record) = get_clan(&mut con, &name)? {
            let members = get_member_count(&mut con, &name)?;
            summaries.push(ClanSummary {
                name,
                treasury: record.balance,
                members,
            });
        }
    }

    summaries.sort_by(|a, b| b.treasury.cmp(&a.treasury));
    summaries.truncate(n);
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::super::account::delete_account;
    use super::super::clan::{delete_account_clan, delete_clan};
    use super::super::connect::open_default;
    use super::*;

    #[test]
    #[ignore = "requires a running redis"]
    fn test_adjust_balance_is_associative() {
        let db = open_default().unwrap();
        let account_split = "manager_test_user_0";
        let account_single = "manager_test_user_1";

        adjust_account_balance(&db, account_split, 70).unwrap();
        adjust_account_balance(&db, account_split, -30).unwrap();
        let combined = adjust_account_balance(&db, account_single, 70 - 30).unwrap();

        assert_eq!(get_account_balance(&db, account_split).unwrap(), combined);

        let mut con = db.connect().unwrap();
        delete_account(&mut con, account_split).unwrap();
        delete_account(&mut con, account_single).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_top_accounts_orders_by_balance() {
        let db = open_default().unwrap();
        let poor = "manager_test_user_2";
        let rich = "manager_test_user_3";

        adjust_account_balance(&db, poor, 10).unwrap();
        adjust_account_balance(&db, rich, 9000).unwrap();

        let standings = top_accounts(&db, 100).unwrap();
        let rich_pos = standings.iter().position(|(k, _)| k == rich).unwrap();
        let poor_pos = standings.iter().position(|(k, _)| k == poor).unwrap();
        assert!(rich_pos < poor_pos);

        let mut con = db.connect().unwrap();
        delete_account(&mut con, poor).unwrap();
        delete_account(&mut con, rich).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_clan_lifecycle() {
        let db = open_default().unwrap();
        let name = "manager_test_clan_0";
        let owner = "manager_test_user_4";
        let member = "manager_test_user_5";

        adjust_account_balance(&db, owner, 5000).unwrap();
        let owner_balance = create_clan(&db, name, owner, 10, 1.0, 5000).unwrap();
        assert_eq!(owner_balance, 0);
        assert_eq!(get_account_clan(&db, owner).unwrap(), Some(name.to_string()));

        join_clan(&db, name, member).unwrap();
        assert_eq!(clan_member_count(&db, name).unwrap(), 2);

        leave_clan(&db, name, member).unwrap();
        assert_eq!(clan_member_count(&db, name).unwrap(), 1);
        assert_eq!(get_account_clan(&db, member).unwrap(), None);

        let mut con = db.connect().unwrap();
        delete_clan(&mut con, name).unwrap();
        delete_account_clan(&mut con, owner).unwrap();
        delete_account(&mut con, owner).unwrap();
        delete_account(&mut con, member).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_booster_and_license_fields() {
        let db = open_default().unwrap();
        let account = "manager_test_user_6";

        assert_eq!(
            get_booster_until(&db, account, BoosterKind::Farm).unwrap(),
            None
        );
        set_booster_until(&db, account, BoosterKind::Farm, 1700086400).unwrap();
        assert_eq!(
            get_booster_until(&db, account, BoosterKind::Farm).unwrap(),
            Some(1700086400)
        );
        assert_eq!(
            get_booster_until(&db, account, BoosterKind::Roulette).unwrap(),
            None
        );

        set_business_license(&db, account, LicenseKind::Large, 1700000000).unwrap();
        assert_eq!(
            get_business_license(&db, account).unwrap(),
            Some((LicenseKind::Large, 1700000000))
        );

        let mut con = db.connect().unwrap();
        delete_account(&mut con, account).unwrap();
    }
}
