use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use uuid::Uuid;

use super::{
    odds::{
        apply_farm_boost, daily_reward, farm_reward, lottery_outcome, lottery_penalty,
        lottery_roll, roulette_delta, roulette_draw, slots_delta, slots_prize, slots_spin,
        LotteryOutcome, RouletteOutcome, SlotsPrize, LOTTERY_CRIT_REWARD, LOTTERY_SUCCESS_REWARD,
        ROULETTE_TABLE_BASE, ROULETTE_TABLE_BOOSTED,
    },
    redis::{
        adjust_account_balance, clan_exists, clan_member_count, create_clan as create_clan_row,
        get_account_balance, get_account_clan, get_account_custom_role, get_account_lottery_role,
        get_account_premium_tier, get_booster_until, get_business_license, get_clan_record,
        get_daily_claimed_at, get_profile_description, join_clan as join_clan_row,
        leave_clan as leave_clan_row, move_clan_treasury, set_account_custom_role,
        set_account_lottery_role, set_account_premium_tier, set_booster_until,
        set_business_license, set_daily_claimed_at, set_profile_description, top_accounts,
        top_clans, transfer_account_balance, BoosterKind, ClanSummary, CrudError,
        CustomRoleRecord, Database, LicenseKind, PremiumTier,
    },
};

/* Processor is the overall logic center of the bot.
 * It handles the main logic, communicating with the front-facing handlers
 * and the back-facing redis manager.
 * Every operation validates its preconditions, resolves any chance
 * outcome through the odds module, then applies the balance deltas
 * through the manager. Sufficiency checks happen before the debit in
 * the same operation; the store itself never rejects a delta.
 */

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProcessError {
    #[error("{0}")]
    Validation(String),
    #[error("Not enough credits: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("{0}")]
    StateConflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Permission(String),
    #[error("{0}")]
    CrudError(CrudError),
}

// Implement the From trait to convert from CrudError to ProcessError
impl From<CrudError> for ProcessError {
    fn from(crud_error: CrudError) -> ProcessError {
        ProcessError::CrudError(crud_error)
    }
}

pub const CUSTOM_ROLE_PRICE: i64 = 2000;
pub const CLAN_CREATION_PRICE: i64 = 5000;
pub const CLAN_MEMBER_SLOTS: u32 = 10;
pub const CLAN_INCOME_MULTIPLIER: f64 = 1.0;
pub const LEADERBOARD_SIZE: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const CLAN_NAME_MAX_CHARS: usize = 32;
pub const ROLE_NAME_MAX_CHARS: usize = 64;
pub const DAILY_WINDOW_SECS: i64 = 86_400;

pub fn booster_price(kind: BoosterKind) -> i64 {
    match kind {
        BoosterKind::Farm => 1500,
        BoosterKind::Roulette => 2000,
    }
}

pub fn booster_duration_secs(kind: BoosterKind) -> i64 {
    match kind {
        BoosterKind::Farm => 24 * 3600,
        BoosterKind::Roulette => 12 * 3600,
    }
}

pub fn license_price(kind: LicenseKind) -> i64 {
    match kind {
        LicenseKind::Small => 2500,
        LicenseKind::Medium => 5000,
        LicenseKind::Large => 10_000,
    }
}

pub fn license_hourly_income(kind: LicenseKind) -> i64 {
    match kind {
        LicenseKind::Small => 50,
        LicenseKind::Medium => 120,
        LicenseKind::Large => 300,
    }
}

pub fn premium_price(tier: PremiumTier) -> i64 {
    match tier {
        PremiumTier::Gold => 10_000,
        PremiumTier::Platinum => 25_000,
    }
}

/* Reports returned to handlers for rendering. */

#[derive(Debug, PartialEq)]
pub struct LotteryReport {
    pub roll: u32,
    pub outcome: LotteryOutcome,
    pub delta: i64,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct FarmReport {
    pub reward: i64,
    pub boosted: bool,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub enum DailyReport {
    Claimed { reward: i64, balance: i64 },
    NotReady { wait_secs: i64 },
}

#[derive(Debug, PartialEq)]
pub struct TransferReport {
    pub sender_balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct RouletteReport {
    pub outcome: RouletteOutcome,
    pub boosted: bool,
    pub delta: i64,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct SlotsReport {
    pub reels: [usize; 3],
    pub prize: SlotsPrize,
    pub delta: i64,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct BoosterReport {
    pub kind: BoosterKind,
    pub until: i64,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct LicenseReport {
    pub kind: LicenseKind,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub enum CollectReport {
    Collected { hours: i64, amount: i64, balance: i64 },
    NotReady { wait_secs: i64 },
}

#[derive(Debug, PartialEq)]
pub struct RolePurchaseReport {
    pub role: CustomRoleRecord,
    pub replaced: Option<CustomRoleRecord>,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct PremiumReport {
    pub tier: PremiumTier,
    pub balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct DuelReport {
    pub winner: String,
    pub loser: String,
    pub bet: i64,
}

#[derive(Debug, PartialEq)]
pub struct ProfileReport {
    pub account: String,
    pub description: Option<String>,
    pub balance: i64,
    pub clan: Option<String>,
    pub lottery_role: bool,
    pub license: Option<LicenseKind>,
    pub premium: Option<PremiumTier>,
}

#[derive(Debug, PartialEq)]
pub struct ClanCreateReport {
    pub name: String,
    pub owner_balance: i64,
}

#[derive(Debug, PartialEq)]
pub struct TreasuryReport {
    pub clan: String,
    pub account_balance: i64,
    pub treasury_balance: i64,
}

/* Utility functions */

fn check_positive(amount: i64) -> Result<(), ProcessError> {
    if amount <= 0 {
        return Err(ProcessError::Validation(
            "The amount must be positive.".to_string(),
        ));
    }
    Ok(())
}

// Sufficiency check preceding a debit in the same operation.
fn check_funds(db: &Database, account: &str, needed: i64) -> Result<i64, ProcessError> {
    let available = get_account_balance(db, account)?;
    if available < needed {
        return Err(ProcessError::InsufficientFunds { needed, available });
    }
    Ok(available)
}

pub fn booster_active(
    db: &Database,
    account: &str,
    kind: BoosterKind,
    now: DateTime<Utc>,
) -> Result<bool, ProcessError> {
    let until = get_booster_until(db, account, kind)?;
    Ok(matches!(until, Some(until) if now.timestamp() < until))
}

/* The role lottery.
 * One roll in [1, 100]: a crit grants the role plus the large reward,
 * a plain success grants the role plus the small reward, and a miss
 * costs a penalty capped by the current balance. Holding the role
 * already makes the spin a no-op.
 */
pub fn lottery(
    db: &Database,
    rng: &mut impl Rng,
    account: &str,
) -> Result<LotteryReport, ProcessError> {
    let roll = lottery_roll(rng);
    lottery_with_roll(db, account, roll)
}

pub fn lottery_with_roll(
    db: &Database,
    account: &str,
    roll: u32,
) -> Result<LotteryReport, ProcessError> {
    if get_account_lottery_role(db, account)? {
        return Err(ProcessError::StateConflict(
            "You already hold the role.".to_string(),
        ));
    }

    let outcome = lottery_outcome(roll);
    let (delta, balance) = match outcome {
        LotteryOutcome::Crit => {
            set_account_lottery_role(db, account, true)?;
            let balance = adjust_account_balance(db, account, LOTTERY_CRIT_REWARD)?;
            (LOTTERY_CRIT_REWARD, balance)
        }
        LotteryOutcome::Success => {
            set_account_lottery_role(db, account, true)?;
            let balance = adjust_account_balance(db, account, LOTTERY_SUCCESS_REWARD)?;
            (LOTTERY_SUCCESS_REWARD, balance)
        }
        LotteryOutcome::Miss => {
            let penalty = lottery_penalty(get_account_balance(db, account)?);
            let balance = adjust_account_balance(db, account, -penalty)?;
            (-penalty, balance)
        }
    };

    Ok(LotteryReport {
        roll,
        outcome,
        delta,
        balance,
    })
}

/* Farming, open to role holders only.
 * A small uniform reward, half again as much under an active booster.
 */
pub fn farm(
    db: &Database,
    rng: &mut impl Rng,
    account: &str,
    now: DateTime<Utc>,
) -> Result<FarmReport, ProcessError> {
    if !get_account_lottery_role(db, account)? {
        return Err(ProcessError::Permission(
            "The farm is open to role holders only.".to_string(),
        ));
    }

    let boosted = booster_active(db, account, BoosterKind::Farm, now)?;
    let mut reward = farm_reward(rng);
    if boosted {
        reward = apply_farm_boost(reward);
    }
    let balance = adjust_account_balance(db, account, reward)?;

    Ok(FarmReport {
        reward,
        boosted,
        balance,
    })
}

pub fn balance_of(db: &Database, account: &str) -> Result<i64, ProcessError> {
    Ok(get_account_balance(db, account)?)
}

/* Moves credits between two accounts.
 * The debit and the credit are applied as one atomic unit after the
 * sufficiency check.
 */
pub fn transfer(
    db: &Database,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<TransferReport, ProcessError> {
    check_positive(amount)?;
    if from == to {
        return Err(ProcessError::Validation(
            "You cannot transfer credits to yourself.".to_string(),
        ));
    }
    check_funds(db, from, amount)?;

    let sender_balance = transfer_account_balance(db, from, to, amount)?;
    Ok(TransferReport { sender_balance })
}

pub fn leaderboard(db: &Database) -> Result<Vec<(String, i64)>, ProcessError> {
    Ok(top_accounts(db, LEADERBOARD_SIZE)?)
}

/* The daily claim.
 * Gated by the persisted claim timestamp so the window survives a
 * restart; expiry is evaluated lazily on the next claim.
 */
pub fn claim_daily(
    db: &Database,
    rng: &mut impl Rng,
    account: &str,
    now: DateTime<Utc>,
) -> Result<DailyReport, ProcessError> {
    if let Some(claimed_at) = get_daily_claimed_at(db, account)? {
        let eligible_at = claimed_at + DAILY_WINDOW_SECS;
        if now.timestamp() < eligible_at {
            return Ok(DailyReport::NotReady {
                wait_secs: eligible_at - now.timestamp(),
            });
        }
    }

    let reward = daily_reward(rng);
    let balance = adjust_account_balance(db, account, reward)?;
    set_daily_claimed_at(db, account, now.timestamp())?;

    Ok(DailyReport::Claimed { reward, balance })
}

/* Roulette.
 * The bet is validated against the balance, the outcome is drawn from
 * the odds table matching the booster state, and the signed delta is
 * applied in one increment.
 */
pub fn roulette(
    db: &Database,
    rng: &mut impl Rng,
    account: &str,
    bet: i64,
    now: DateTime<Utc>,
) -> Result<RouletteReport, ProcessError> {
    check_positive(bet)?;
    check_funds(db, account, bet)?;

    let boosted = booster_active(db, account, BoosterKind::Roulette, now)?;
    let table = if boosted {
        ROULETTE_TABLE_BOOSTED
    } else {
        ROULETTE_TABLE_BASE
    };
    let outcome = roulette_draw(rng, table);
    resolve_roulette(db, account, bet, outcome, boosted)
}

pub fn resolve_roulette(
    db: &Database,
    account: &str,
    bet: i64,
    outcome: RouletteOutcome,
    boosted: bool,
) -> Result<RouletteReport, ProcessError> {
    let delta = roulette_delta(outcome, bet);
    let balance = adjust_account_balance(db, account, delta)?;

    Ok(RouletteReport {
        outcome,
        boosted,
        delta,
        balance,
    })
}

/* The slot machine. */
pub fn slots(
    db: &Database,
    rng: &mut impl Rng,
    account: &str,
    bet: i64,
) -> Result<SlotsReport, ProcessError> {
    check_positive(bet)?;
    check_funds(db, account, bet)?;

    let reels = slots_spin(rng);
    resolve_slots(db, account, bet, reels)
}

pub fn resolve_slots(
    db: &Database,
    account: &str,
    bet: i64,
    reels: [usize; 3],
) -> Result<SlotsReport, ProcessError> {
    let prize = slots_prize(reels);
    let delta = slots_delta(prize, bet);
    let balance = adjust_account_balance(db, account, delta)?;

    Ok(SlotsReport {
        reels,
        prize,
        delta,
        balance,
    })
}

/* Buys a time-windowed booster.
 * Rebuying while the previous window is still running is rejected.
 */
pub fn buy_booster(
    db: &Database,
    account: &str,
    kind: BoosterKind,
    now: DateTime<Utc>,
) -> Result<BoosterReport, ProcessError> {
    if booster_active(db, account, kind, now)? {
        return Err(ProcessError::StateConflict(
            "That booster is already active.".to_string(),
        ));
    }

    let price = booster_price(kind);
    check_funds(db, account, price)?;

    let balance = adjust_account_balance(db, account, -price)?;
    let until = now.timestamp() + booster_duration_secs(kind);
    set_booster_until(db, account, kind, until)?;

    Ok(BoosterReport {
        kind,
        until,
        balance,
    })
}

/* Buys a business license.
 * Buying over an existing license replaces it and restarts the income
 * clock at the purchase time.
 */
pub fn buy_license(
    db: &Database,
    account: &str,
    kind: LicenseKind,
    now: DateTime<Utc>,
) -> Result<LicenseReport, ProcessError> {
    if let Some((held, _)) = get_business_license(db, account)? {
        if held == kind {
            return Err(ProcessError::StateConflict(
                "You already own that license.".to_string(),
            ));
        }
    }

    let price = license_price(kind);
    check_funds(db, account, price)?;

    let balance = adjust_account_balance(db, account, -price)?;
    set_business_license(db, account, kind, now.timestamp())?;

    Ok(LicenseReport { kind, balance })
}

/* Collects accrued license income.
 * Pays whole hours since the last claim and advances the claim stamp
 * by exactly the hours paid, so a partial hour carries over.
 */
pub fn collect_income(
    db: &Database,
    account: &str,
    now: DateTime<Utc>,
) -> Result<CollectReport, ProcessError> {
    let (kind, claimed_at) = get_business_license(db, account)?.ok_or_else(|| {
        ProcessError::NotFound("You don't own a business license.".to_string())
    })?;

    let elapsed = (now.timestamp() - claimed_at).max(0);
    let hours = elapsed / 3600;
    if hours == 0 {
        return Ok(CollectReport::NotReady {
            wait_secs: 3600 - elapsed % 3600,
        });
    }

    let amount = hours * license_hourly_income(kind);
    let balance = adjust_account_balance(db, account, amount)?;
    set_business_license(db, account, kind, claimed_at + hours * 3600)?;

    Ok(CollectReport::Collected {
        hours,
        amount,
        balance,
    })
}

fn check_color(color: &str) -> Result<(), ProcessError> {
    let pattern = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    if !pattern.is_match(color) {
        return Err(ProcessError::Validation(
            "Invalid color format. Use hex like #ff0000.".to_string(),
        ));
    }
    Ok(())
}

/* Buys a custom cosmetic role.
 * An existing role record is replaced wholesale; the caller receives
 * the replaced record so the platform side of it can be revoked.
 */
pub fn buy_custom_role(
    db: &Database,
    account: &str,
    name: &str,
    color: &str,
) -> Result<RolePurchaseReport, ProcessError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProcessError::Validation(
            "The role needs a name.".to_string(),
        ));
    }
    if name.chars().count() > ROLE_NAME_MAX_CHARS {
        return Err(ProcessError::Validation(format!(
            "Role names are capped at {ROLE_NAME_MAX_CHARS} characters."
        )));
    }
    check_color(color)?;
    check_funds(db, account, CUSTOM_ROLE_PRICE)?;

    let replaced = get_account_custom_role(db, account)?;
    let role = CustomRoleRecord {
        role_ref: Uuid::new_v4().to_string(),
        name: name.to_string(),
        color: color.to_lowercase(),
    };
    set_account_custom_role(db, account, &role)?;
    let balance = adjust_account_balance(db, account, -CUSTOM_ROLE_PRICE)?;

    Ok(RolePurchaseReport {
        role,
        replaced,
        balance,
    })
}

/* Buys a premium tier. Holding the tier already is reported without
 * a charge; a different tier replaces the held one.
 */
pub fn buy_premium(
    db: &Database,
    account: &str,
    tier: PremiumTier,
) -> Result<PremiumReport, ProcessError> {
    if get_account_premium_tier(db, account)? == Some(tier) {
        return Err(ProcessError::StateConflict(
            "You already own that tier.".to_string(),
        ));
    }

    let price = premium_price(tier);
    check_funds(db, account, price)?;

    let balance = adjust_account_balance(db, account, -price)?;
    set_account_premium_tier(db, account, tier)?;

    Ok(PremiumReport { tier, balance })
}

/* A duel: a coin flip for the stake, both sides must cover the bet.
 * The loser pays the winner in one atomic unit.
 */
pub fn duel(
    db: &Database,
    rng: &mut impl Rng,
    challenger: &str,
    target: &str,
    bet: i64,
) -> Result<DuelReport, ProcessError> {
    check_positive(bet)?;
    if challenger == target {
        return Err(ProcessError::Validation(
            "You cannot duel yourself.".to_string(),
        ));
    }
    check_funds(db, challenger, bet)?;

    let target_balance = get_account_balance(db, target)?;
    if target_balance < bet {
        return Err(ProcessError::StateConflict(format!(
            "Your opponent only has {target_balance} credits."
        )));
    }

    let challenger_wins = rng.gen_range(0..2) == 0;
    let (winner, loser) = if challenger_wins {
        (challenger, target)
    } else {
        (target, challenger)
    };
    transfer_account_balance(db, loser, winner, bet)?;

    Ok(DuelReport {
        winner: winner.to_string(),
        loser: loser.to_string(),
        bet,
    })
}

pub fn profile(db: &Database, account: &str) -> Result<ProfileReport, ProcessError> {
    Ok(ProfileReport {
        account: account.to_string(),
        description: get_profile_description(db, account)?,
        balance: get_account_balance(db, account)?,
        clan: get_account_clan(db, account)?,
        lottery_role: get_account_lottery_role(db, account)?,
        license: get_business_license(db, account)?.map(|(kind, _)| kind),
        premium: get_account_premium_tier(db, account)?,
    })
}

pub fn set_description(db: &Database, account: &str, text: &str) -> Result<(), ProcessError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProcessError::Validation(
            "The description cannot be empty.".to_string(),
        ));
    }
    if text.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ProcessError::Validation(format!(
            "Descriptions are capped at {DESCRIPTION_MAX_CHARS} characters."
        )));
    }
    Ok(set_profile_description(db, account, text)?)
}

/* Administrative credit grants and fines. The admin gate itself lives
 * with the command surface; these only guard the amounts.
 */
pub fn award(db: &Database, target: &str, amount: i64) -> Result<i64, ProcessError> {
    check_positive(amount)?;
    Ok(adjust_account_balance(db, target, amount)?)
}

pub fn fine(db: &Database, target: &str, amount: i64) -> Result<i64, ProcessError> {
    check_positive(amount)?;
    check_funds(db, target, amount)?;
    Ok(adjust_account_balance(db, target, -amount)?)
}

fn check_clan_name(name: &str) -> Result<&str, ProcessError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProcessError::Validation(
            "The clan needs a name.".to_string(),
        ));
    }
    if name.chars().count() > CLAN_NAME_MAX_CHARS {
        return Err(ProcessError::Validation(format!(
            "Clan names are capped at {CLAN_NAME_MAX_CHARS} characters."
        )));
    }
    Ok(name)
}

/* Founds a clan.
 * The founder must be clanless and able to pay the creation price.
 * Row, membership and debit apply as one atomic unit.
 */
pub fn create_clan(
    db: &Database,
    account: &str,
    name: &str,
) -> Result<ClanCreateReport, ProcessError> {
    let name = check_clan_name(name)?;
    check_funds(db, account, CLAN_CREATION_PRICE)?;

    if get_account_clan(db, account)?.is_some() {
        return Err(ProcessError::StateConflict(
            "You are already in a clan.".to_string(),
        ));
    }
    if clan_exists(db, name)? {
        return Err(ProcessError::StateConflict(
            "A clan with that name already exists.".to_string(),
        ));
    }

    let owner_balance = create_clan_row(
        db,
        name,
        account,
        CLAN_MEMBER_SLOTS,
        CLAN_INCOME_MULTIPLIER,
        CLAN_CREATION_PRICE,
    )?;

    Ok(ClanCreateReport {
        name: name.to_string(),
        owner_balance,
    })
}

/* Joins an existing clan with a free slot. */
pub fn join_clan(db: &Database, account: &str, name: &str) -> Result<String, ProcessError> {
    let name = check_clan_name(name)?;

    if get_account_clan(db, account)?.is_some() {
        return Err(ProcessError::StateConflict(
            "You are already in a clan.".to_string(),
        ));
    }
    let record = get_clan_record(db, name)?
        .ok_or_else(|| ProcessError::NotFound("No such clan exists.".to_string()))?;
    if clan_member_count(db, name)? >= record.member_slots {
        return Err(ProcessError::StateConflict(
            "That clan has no free slots.".to_string(),
        ));
    }

    join_clan_row(db, name, account)?;
    Ok(name.to_string())
}

/* Leaves the current clan. The owner cannot leave. */
pub fn leave_clan(db: &Database, account: &str) -> Result<String, ProcessError> {
    let name = get_account_clan(db, account)?
        .ok_or_else(|| ProcessError::StateConflict("You are not in a clan.".to_string()))?;
    let record = get_clan_record(db, &name)?
        .ok_or_else(|| ProcessError::NotFound("No such clan exists.".to_string()))?;
    if record.owner == account {
        return Err(ProcessError::StateConflict(
            "The clan owner cannot leave the clan.".to_string(),
        ));
    }

    leave_clan_row(db, &name, account)?;
    Ok(name)
}

/* Deposits personal credits into the clan treasury. */
pub fn clan_deposit(
    db: &Database,
    account: &str,
    amount: i64,
) -> Result<TreasuryReport, ProcessError> {
    check_positive(amount)?;
    let name = get_account_clan(db, account)?
        .ok_or_else(|| ProcessError::StateConflict("You are not in a clan.".to_string()))?;
    check_funds(db, account, amount)?;

    let (account_balance, treasury_balance) = move_clan_treasury(db, &name, account, amount)?;
    Ok(TreasuryReport {
        clan: name,
        account_balance,
        treasury_balance,
    })
}

/* Withdraws treasury credits to the owner's personal balance.
 * Owner-gated; the treasury must cover the amount.
 */
pub fn clan_withdraw(
    db: &Database,
    account: &str,
    amount: i64,
) -> Result<TreasuryReport, ProcessError> {
    check_positive(amount)?;
    let name = get_account_clan(db, account)?
        .ok_or_else(|| ProcessError::StateConflict("You are not in a clan.".to_string()))?;
    let record = get_clan_record(db, &name)?
        .ok_or_else(|| ProcessError::NotFound("No such clan exists.".to_string()))?;
    if record.owner != account {
        return Err(ProcessError::Permission(
            "Only the clan owner can withdraw from the treasury.".to_string(),
        ));
    }
    if record.balance < amount {
        return Err(ProcessError::InsufficientFunds {
            needed: amount,
            available: record.balance,
        });
    }

    let (account_balance, treasury_balance) = move_clan_treasury(db, &name, account, -amount)?;
    Ok(TreasuryReport {
        clan: name,
        account_balance,
        treasury_balance,
    })
}

pub fn clan_top(db: &Database) -> Result<Vec<ClanSummary>, ProcessError> {
    Ok(top_clans(db, LEADERBOARD_SIZE)?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::super::redis::open_default;
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    // Validation failures fire before any store round-trip, so these
    // run against a handle that is never connected.
    fn dangling_db() -> Database {
        Database::open("redis://127.0.0.1:1/").unwrap()
    }

    #[test]
    fn test_transfer_rejects_non_positive_amounts() {
        let db = dangling_db();
        assert_eq!(
            transfer(&db, "alice", "bob", 0),
            Err(ProcessError::Validation(
                "The amount must be positive.".to_string()
            ))
        );
        assert!(matches!(
            transfer(&db, "alice", "bob", -5),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_transfer_rejects_self_transfer() {
        let db = dangling_db();
        assert!(matches!(
            transfer(&db, "alice", "alice", 10),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_duel_rejects_self_and_non_positive() {
        let db = dangling_db();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert!(matches!(
            duel(&db, &mut rng, "alice", "alice", 10),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            duel(&db, &mut rng, "alice", "bob", 0),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_custom_role_name_and_color_validation() {
        let db = dangling_db();
        assert!(matches!(
            buy_custom_role(&db, "alice", "  ", "#ff0000"),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            buy_custom_role(&db, "alice", "Tycoon", "ff0000"),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            buy_custom_role(&db, "alice", "Tycoon", "#ff00"),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            buy_custom_role(&db, "alice", "Tycoon", "#gg0000"),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_clan_name_validation() {
        let db = dangling_db();
        assert!(matches!(
            create_clan(&db, "alice", ""),
            Err(ProcessError::Validation(_))
        ));
        let long = "x".repeat(CLAN_NAME_MAX_CHARS + 1);
        assert!(matches!(
            join_clan(&db, "alice", &long),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_description_validation() {
        let db = dangling_db();
        let long = "x".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert!(matches!(
            set_description(&db, "alice", &long),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            set_description(&db, "alice", "   "),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    fn test_award_and_fine_reject_non_positive() {
        let db = dangling_db();
        assert!(matches!(
            award(&db, "alice", 0),
            Err(ProcessError::Validation(_))
        ));
        assert!(matches!(
            fine(&db, "alice", -1),
            Err(ProcessError::Validation(_))
        ));
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_adjust_balance_sequential_equals_combined() {
        let db = open_default().unwrap();
        let split = "processor_test_user_0";
        let single = "processor_test_user_1";

        award(&db, split, 300).unwrap();
        fine(&db, split, 120).unwrap();
        let combined = award(&db, single, 300 - 120).unwrap();
        assert_eq!(balance_of(&db, split).unwrap(), combined);

        fine(&db, split, combined).unwrap();
        fine(&db, single, combined).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_transfer_insufficient_leaves_balances_unchanged() {
        let db = open_default().unwrap();
        let sender = "processor_test_user_2";
        let receiver = "processor_test_user_3";

        award(&db, sender, 50).unwrap();
        let before_receiver = balance_of(&db, receiver).unwrap();

        assert_eq!(
            transfer(&db, sender, receiver, 51),
            Err(ProcessError::InsufficientFunds {
                needed: 51,
                available: 50
            })
        );
        assert_eq!(balance_of(&db, sender).unwrap(), 50);
        assert_eq!(balance_of(&db, receiver).unwrap(), before_receiver);

        fine(&db, sender, 50).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_lottery_crit_roll_grants_role_once() {
        let db = open_default().unwrap();
        let account = "processor_test_user_4";

        let report = lottery_with_roll(&db, account, 5).unwrap();
        assert_eq!(report.outcome, LotteryOutcome::Crit);
        assert_eq!(report.delta, LOTTERY_CRIT_REWARD);

        // Holding the role makes any further roll a no-op.
        let before = balance_of(&db, account).unwrap();
        assert!(matches!(
            lottery_with_roll(&db, account, 5),
            Err(ProcessError::StateConflict(_))
        ));
        assert!(matches!(
            lottery_with_roll(&db, account, 99),
            Err(ProcessError::StateConflict(_))
        ));
        assert_eq!(balance_of(&db, account).unwrap(), before);

        fine(&db, account, before).unwrap();
        super::super::redis::set_account_lottery_role(&db, account, false).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_roulette_jackpot_pays_five_times_the_bet() {
        let db = open_default().unwrap();
        let account = "processor_test_user_5";

        award(&db, account, 100).unwrap();
        let report =
            resolve_roulette(&db, account, 100, RouletteOutcome::Jackpot, true).unwrap();
        assert_eq!(report.delta, 500);
        assert_eq!(report.balance, 600);

        fine(&db, account, 600).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_clan_creation_at_exact_price_boundary() {
        let db = open_default().unwrap();
        let rich = "processor_test_user_6";
        let poor = "processor_test_user_7";
        let name = "processor_test_clan_0";

        award(&db, poor, CLAN_CREATION_PRICE - 1).unwrap();
        assert!(matches!(
            create_clan(&db, poor, "processor_test_clan_poor"),
            Err(ProcessError::InsufficientFunds { .. })
        ));
        assert_eq!(balance_of(&db, poor).unwrap(), CLAN_CREATION_PRICE - 1);

        award(&db, rich, CLAN_CREATION_PRICE).unwrap();
        let report = create_clan(&db, rich, name).unwrap();
        assert_eq!(report.owner_balance, 0);

        // Cleanup
        let mut con = db.connect().unwrap();
        crate::bot::redis::test_support::delete_clan_fixture(&mut con, name, &[rich]);
        crate::bot::redis::test_support::delete_account_fixture(&mut con, rich);
        crate::bot::redis::test_support::delete_account_fixture(&mut con, poor);
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_clan_join_full_clan_rejected() {
        let db = open_default().unwrap();
        let owner = "processor_test_user_8";
        let joiner = "processor_test_user_9";
        let name = "processor_test_clan_1";

        award(&db, owner, CLAN_CREATION_PRICE).unwrap();
        create_clan(&db, owner, name).unwrap();

        // Fill the remaining slots.
        for i in 0..(CLAN_MEMBER_SLOTS - 1) {
            join_clan(&db, &format!("processor_test_filler_{i}"), name).unwrap();
        }

        assert!(matches!(
            join_clan(&db, joiner, name),
            Err(ProcessError::StateConflict(_))
        ));
        assert_eq!(get_account_clan(&db, joiner).unwrap(), None);

        let mut con = db.connect().unwrap();
        let mut members: Vec<String> = vec![owner.to_string()];
        for i in 0..(CLAN_MEMBER_SLOTS - 1) {
            members.push(format!("processor_test_filler_{i}"));
        }
        let member_refs: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
        crate::bot::redis::test_support::delete_clan_fixture(&mut con, name, &member_refs);
        crate::bot::redis::test_support::delete_account_fixture(&mut con, owner);
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_clan_withdraw_is_owner_gated() {
        let db = open_default().unwrap();
        let owner = "processor_test_user_10";
        let member = "processor_test_user_11";
        let name = "processor_test_clan_2";

        award(&db, owner, CLAN_CREATION_PRICE + 500).unwrap();
        create_clan(&db, owner, name).unwrap();
        join_clan(&db, member, name).unwrap();
        clan_deposit(&db, owner, 500).unwrap();

        assert!(matches!(
            clan_withdraw(&db, member, 1),
            Err(ProcessError::Permission(_))
        ));
        let summary = clan_top(&db)
            .unwrap()
            .into_iter()
            .find(|clan| clan.name == name)
            .unwrap();
        assert_eq!(summary.treasury, 500);
        assert_eq!(summary.members, 2);

        let report = clan_withdraw(&db, owner, 500).unwrap();
        assert_eq!(report.treasury_balance, 0);
        assert_eq!(report.account_balance, 500);

        let mut con = db.connect().unwrap();
        crate::bot::redis::test_support::delete_clan_fixture(&mut con, name, &[owner, member]);
        crate::bot::redis::test_support::delete_account_fixture(&mut con, owner);
        crate::bot::redis::test_support::delete_account_fixture(&mut con, member);
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_collect_income_carries_partial_hours() {
        let db = open_default().unwrap();
        let account = "processor_test_user_12";

        award(&db, account, license_price(LicenseKind::Small)).unwrap();
        buy_license(&db, account, LicenseKind::Small, now()).unwrap();

        // 90 minutes later: one whole hour pays out, 30 minutes carry.
        let later = now() + chrono::Duration::minutes(90);
        let report = collect_income(&db, account, later).unwrap();
        assert_eq!(
            report,
            CollectReport::Collected {
                hours: 1,
                amount: license_hourly_income(LicenseKind::Small),
                balance: license_hourly_income(LicenseKind::Small),
            }
        );

        // 40 more minutes: the carried 30 complete another hour.
        let again = later + chrono::Duration::minutes(40);
        let report = collect_income(&db, account, again).unwrap();
        assert!(matches!(report, CollectReport::Collected { hours: 1, .. }));

        let balance = balance_of(&db, account).unwrap();
        fine(&db, account, balance).unwrap();
        let mut con = db.connect().unwrap();
        crate::bot::redis::test_support::delete_account_fixture(&mut con, account);
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_daily_claim_window() {
        let db = open_default().unwrap();
        let account = "processor_test_user_13";
        let mut rng = Pcg64Mcg::seed_from_u64(3);

        let report = claim_daily(&db, &mut rng, account, now()).unwrap();
        let reward = match report {
            DailyReport::Claimed { reward, .. } => reward,
            other => panic!("expected a claim, got {other:?}"),
        };

        // A second claim within the window reports the remaining wait.
        let later = now() + chrono::Duration::hours(1);
        assert_eq!(
            claim_daily(&db, &mut rng, account, later).unwrap(),
            DailyReport::NotReady {
                wait_secs: 23 * 3600
            }
        );

        fine(&db, account, reward).unwrap();
        let mut con = db.connect().unwrap();
        crate::bot::redis::test_support::delete_account_fixture(&mut con, account);
    }
}
