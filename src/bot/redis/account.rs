use redis::{Commands, Connection, RedisResult};

const ACCOUNT_KEY: &str = "account";
const ACCOUNT_INDEX_KEY: &str = "accounts";

// The account hash key, shared with sibling modules whose atomic
// pipelines touch an account balance alongside their own rows.
pub(super) fn hash_key(account: &str) -> String {
    format!("{ACCOUNT_KEY}:{account}")
}

/* Account rows are Redis hashes keyed by a normalized username.
 * Rows are created lazily by the first mutation and never deleted.
 * The balance field is only ever touched through HINCRBY, which is
 * an atomic insert-or-increment on the store side.
 */

// Gets a balance. Unknown accounts read as 0.
pub fn get_balance(con: &mut Connection, account: &str) -> RedisResult<i64> {
    let balance: Option<i64> = con.hget(hash_key(account), "balance")?;
    Ok(balance.unwrap_or(0))
}

// Applies a signed delta to a balance, returns the new balance.
// The increment and the index update go through one atomic pipeline.
pub fn incr_balance(con: &mut Connection, account: &str, delta: i64) -> RedisResult<i64> {
    let (balance, _): (i64, i64) = redis::pipe()
        .atomic()
        .hincr(hash_key(account), "balance", delta)
        .sadd(ACCOUNT_INDEX_KEY, account)
        .query(con)?;
    Ok(balance)
}

// Moves an amount between two accounts as one atomic pipeline.
// Returns the sender's new balance.
pub fn move_balance(con: &mut Connection, from: &str, to: &str, amount: i64) -> RedisResult<i64> {
    let (from_balance, _, _, _): (i64, i64, i64, i64) = redis::pipe()
        .atomic()
        .hincr(hash_key(from), "balance", -amount)
        .hincr(hash_key(to), "balance", amount)
        .sadd(ACCOUNT_INDEX_KEY, from)
        .sadd(ACCOUNT_INDEX_KEY, to)
        .query(con)?;
    Ok(from_balance)
}

// Lists every account key ever touched by a balance mutation.
pub fn get_account_keys(con: &mut Connection) -> RedisResult<Vec<String>> {
    con.smembers(ACCOUNT_INDEX_KEY)
}

pub fn get_description(con: &mut Connection, account: &str) -> RedisResult<Option<String>> {
    con.hget(hash_key(account), "description")
}

pub fn set_description(con: &mut Connection, account: &str, description: &str) -> RedisResult<()> {
    con.hset(hash_key(account), "description", description)
}

pub fn get_lottery_role(con: &mut Connection, account: &str) -> RedisResult<bool> {
    let held: Option<i64> = con.hget(hash_key(account), "lottery_role")?;
    Ok(held.unwrap_or(0) != 0)
}

pub fn set_lottery_role(con: &mut Connection, account: &str, held: bool) -> RedisResult<()> {
    con.hset(hash_key(account), "lottery_role", if held { 1 } else { 0 })
}

// Timestamp fields below are Unix seconds; absent means never set.

pub fn get_timestamp(con: &mut Connection, account: &str, field: &str) -> RedisResult<Option<i64>> {
    con.hget(hash_key(account), field)
}

pub fn set_timestamp(
    con: &mut Connection,
    account: &str,
    field: &str,
    value: i64,
) -> RedisResult<()> {
    con.hset(hash_key(account), field, value)
}

pub fn get_license(con: &mut Connection, account: &str) -> RedisResult<Option<(String, i64)>> {
    let kind: Option<String> = con.hget(hash_key(account), "license_kind")?;
    match kind {
        Some(kind) => {
            let claimed_at: Option<i64> = con.hget(hash_key(account), "license_claimed_at")?;
            Ok(Some((kind, claimed_at.unwrap_or(0))))
        }
        None => Ok(None),
    }
}

pub fn set_license(
    con: &mut Connection,
    account: &str,
    kind: &str,
    claimed_at: i64,
) -> RedisResult<()> {
    let license: &[(&str, String)] = &[
        ("license_kind", kind.to_string()),
        ("license_claimed_at", claimed_at.to_string()),
    ];
    con.hset_multiple(hash_key(account), license)
}

// Removes an account row and its index entry. Used by tests.
pub fn delete_account(con: &mut Connection, account: &str) -> RedisResult<()> {
    let _: () = con.del(hash_key(account))?;
    con.srem(ACCOUNT_INDEX_KEY, account)
}

// Tests
#[cfg(test)]
mod tests {
    use super::super::connect::open_default;
    use super::*;

    #[test]
    #[ignore = "requires a running redis"]
    fn test_balance_defaults_to_zero() {
        let db = open_default().unwrap();
        let mut con = db.connect().unwrap();
        let account = "account_test_user_0";

        assert_eq!(get_balance(&mut con, account).unwrap(), 0);
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_incr_balance_upserts() {
        let db = open_default().unwrap();
        let mut con = db.connect().unwrap();
        let account = "account_test_user_1";

        assert_eq!(incr_balance(&mut con, account, 40).unwrap(), 40);
        assert_eq!(incr_balance(&mut con, account, -15).unwrap(), 25);
        assert_eq!(get_balance(&mut con, account).unwrap(), 25);
        assert!(get_account_keys(&mut con)
            .unwrap()
            .contains(&account.to_string()));

        delete_account(&mut con, account).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_move_balance() {
        let db = open_default().unwrap();
        let mut con = db.connect().unwrap();
        let from = "account_test_user_2";
        let to = "account_test_user_3";

        incr_balance(&mut con, from, 100).unwrap();
        assert_eq!(move_balance(&mut con, from, to, 30).unwrap(), 70);
        assert_eq!(get_balance(&mut con, to).unwrap(), 30);

        delete_account(&mut con, from).unwrap();
        delete_account(&mut con, to).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_lottery_role_flag() {
        let db = open_default().unwrap();
        let mut con = db.connect().unwrap();
        let account = "account_test_user_4";

        assert!(!get_lottery_role(&mut con, account).unwrap());
        set_lottery_role(&mut con, account, true).unwrap();
        assert!(get_lottery_role(&mut con, account).unwrap());

        delete_account(&mut con, account).unwrap();
    }

    #[test]
    #[ignore = "requires a running redis"]
    fn test_license_round_trip() {
        let db = open_default().unwrap();
        let mut con = db.connect().unwrap();
        let account = "account_test_user_5";

        assert_eq!(get_license(&mut con, account).unwrap(), None);
        set_license(&mut con, account, "medium", 1700000000).unwrap();
        assert_eq!(
            get_license(&mut con, account).unwrap(),
            Some(("medium".to_string(), 1700000000))
        );

        delete_account(&mut con, account).unwrap();
    }
}
