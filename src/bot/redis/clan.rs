use redis::{Commands, Connection, RedisResult};

const CLAN_KEY: &str = "clan";
const CLAN_INDEX_KEY: &str = "clans";
const CLAN_MEMBERS_KEY: &str = "clan_members";
const ACCOUNT_CLAN_KEY: &str = "account_clan";

/* Clan rows are Redis hashes keyed by the unique clan name.
 * Membership is stored in both directions: a single account -> clan
 * string (which is what makes "at most one clan per account" hold),
 * and a clan -> members set used for counting and capacity checks.
 */

#[derive(Debug, PartialEq, Clone)]
pub struct ClanRecord {
    pub owner: String,
    pub balance: i64,
    pub member_slots: u32,
    pub income_multiplier: f64,
}

pub fn get_clan_exists(con: &mut Connection, name: &str) -> RedisResult<bool> {
    con.exists(format!("{CLAN_KEY}:{name}"))
}

pub fn get_clan(con: &mut Connection, name: &str) -> RedisResult<Option<ClanRecord>> {
    let owner: Option<String> = con.hget(format!("{CLAN_KEY}:{name}"), "owner")?;
    let owner = match owner {
        Some(owner) => owner,
        None => return Ok(None),
    };

    let balance: Option<i64> = con.hget(format!("{CLAN_KEY}:{name}"), "balance")?;
    let member_slots: Option<u32> = con.hget(format!("{CLAN_KEY}:{name}"), "member_slots")?;
    let income_multiplier: Option<f64> =
        con.hget(format!("{CLAN_KEY}:{name}"), "income_multiplier")?;

    Ok(Some(ClanRecord {
        owner,
        balance: balance.unwrap_or(0),
        member_slots: member_slots.unwrap_or(0),
        income_multiplier: income_multiplier.unwrap_or(1.0),
    }))
}

/* Creates the clan row, the owner's membership (both directions) and
 * the creation-price debit as one atomic pipeline, so the store never
 * holds a clan without a paid-up owner or vice versa.
 */
pub fn add_clan_with_owner(
    con: &mut Connection,
    name: &str,
    owner: &str,
    member_slots: u32,
    income_multiplier: f64,
    creation_price: i64,
) -> RedisResult<i64> {
    let fields: &[(&str, String)] = &[
        ("owner", owner.to_string()),
        ("balance", "0".to_string()),
        ("member_slots", member_slots.to_string()),
        ("income_multiplier", income_multiplier.to_string()),
    ];
    let (_, _, _, _, owner_balance): ((), i64, (), i64, i64) = redis::pipe()
        .atomic()
        .hset_multiple(format!("{CLAN_KEY}:{name}"), fields)
        .sadd(CLAN_INDEX_KEY, name)
        .set(format!("{ACCOUNT_CLAN_KEY}:{owner}"), name)
        .sadd(format!("{CLAN_MEMBERS_KEY}:{name}"), owner)
        .hincr(super::account::hash_key(owner), "balance", -creation_price)
        .query(con)?;
    Ok(owner_balance)
}

pub fn get_account_clan(con: &mut Connection, account: &str) -> RedisResult<Option<String>> {
    con.get(format!("{ACCOUNT_CLAN_KEY}:{account}"))
}

pub fn add_member(con: &mut Connection, name: &str, account: &str) -> RedisResult<()> {
    redis::pipe()
        .atomic()
        .set(format!("{ACCOUNT_CLAN_KEY}:{account}"), name)
        .ignore()
        .sadd(format!("{CLAN_MEMBERS_KEY}:{name}"), account)
        .ignore()
        .query(con)
}

pub fn remove_member(con: &mut Connection, name: &str, account: &str) -> RedisResult<()> {
    redis::pipe()
        .atomic()
        .del(format!("{ACCOUNT_CLAN_KEY}:{account}"))
        .ignore()
        .srem(format!("{CLAN_MEMBERS_KEY}:{name}"), account)
        .ignore()
        .query(con)
}

pub fn get_member_count(con: &mut Connection, name: &str) -> RedisResult<u32> {
    con.scard(format!("{CLAN_MEMBERS_KEY}:{name}"))
}

// Moves an amount between a member's account and the clan treasury.
// A positive amount deposits, a negative amount withdraws.
// Returns (new account balance, new treasury balance).
pub fn move_treasury(
    con: &mut Connection,
    name: &str,
    account: &str,
    amount: i64,
) -> RedisResult<(i64, i64)> {
    let (account_balance, treasury_balance): (i64, i64) = redis::pipe()
        .atomic()
        .hincr(super::account::hash_key(account), "balance", -amount)
        .hincr(format!("{CLAN_KEY}:{name}"), "balance", amount)
        .query(con)?;
    Ok((account_balance, treasury_balance))
}

pub fn get_clan_names(con: &mut Connection) -> RedisResult<Vec<String>> {
    con.smembers(CLAN_INDEX_KEY)
}

// Removes a clan row, its index entry and its member set. Used by tests.
pub fn delete_clan(con: &mut Connection, name: &str) -> RedisResult<()> {
    let _: () = con.del(format!("{CLAN_KEY}:{name}"))?;
    let _: () = con.del(format!("{CLAN_MEMBERS_KEY}:{name}"))?;
    con.srem(CLAN_INDEX_KEY, name)
}

pub fn delete_account_clan(con: &mut Connection, account: &str) -> RedisResult<()> {
    con.del(format!("{ACCOUNT_CLAN_KEY}:{account}"))
}
