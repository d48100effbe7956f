use redis::{Commands, Connection, RedisResult};
use serde::{Deserialize, Serialize};

const CUSTOM_ROLE_KEY: &str = "custom_role";
const PREMIUM_KEY: &str = "premium";

/* Cosmetic role records. An account holds at most one custom role,
 * stored as a single JSON value and replaced wholesale on repurchase,
 * and at most one premium tier, stored as a plain string.
 */

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CustomRoleRecord {
    pub role_ref: String,
    pub name: String,
    pub color: String,
}

pub fn get_custom_role(
    con: &mut Connection,
    account: &str,
) -> RedisResult<Option<CustomRoleRecord>> {
    let raw: Option<String> = con.get(format!("{CUSTOM_ROLE_KEY}:{account}"))?;
    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw).ok()),
        None => Ok(None),
    }
}

pub fn set_custom_role(
    con: &mut Connection,
    account: &str,
    role: &CustomRoleRecord,
) -> RedisResult<()> {
    let raw = serde_json::to_string(role).unwrap_or_default();
    con.set(format!("{CUSTOM_ROLE_KEY}:{account}"), raw)
}

pub fn get_premium_tier(con: &mut Connection, account: &str) -> RedisResult<Option<String>> {
    con.get(format!("{PREMIUM_KEY}:{account}"))
}

// Idempotent: writing the same tier twice leaves the same record.
pub fn set_premium_tier(con: &mut Connection, account: &str, tier: &str) -> RedisResult<()> {
    con.set(format!("{PREMIUM_KEY}:{account}"), tier)
}

// Used by tests.
pub fn delete_roles(con: &mut Connection, account: &str) -> RedisResult<()> {
    let _: () = con.del(format!("{CUSTOM_ROLE_KEY}:{account}"))?;
    con.del(format!("{PREMIUM_KEY}:{account}"))
}
