use std::env;

/* Runtime configuration, read once at startup.
 * The chat SDK consumes TELOXIDE_TOKEN on its own; everything else
 * the bot needs lives here and is injected where required.
 */
#[derive(Clone, Debug)]
pub struct Config {
    pub redis_url: String,
    pub admin_users: Vec<String>,
    pub keepalive_url: Option<String>,
}

const REDIS_URL_DEFAULT: &str = "redis://127.0.0.1/";

impl Config {
    pub fn from_env() -> Self {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| REDIS_URL_DEFAULT.to_string());
        let admin_users = env::var("ADMIN_USERS")
            .map(|raw| parse_admin_list(&raw))
            .unwrap_or_default();
        let keepalive_url = env::var("KEEPALIVE_URL").ok();

        Self {
            redis_url,
            admin_users,
            keepalive_url,
        }
    }

    pub fn is_admin(&self, account: &str) -> bool {
        self.admin_users.iter().any(|admin| admin == account)
    }
}

// ADMIN_USERS is a comma-separated list of usernames, with or
// without the leading '@'.
fn parse_admin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|name| name.trim().trim_start_matches('@').to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_list() {
        assert_eq!(
            parse_admin_list("@Alice, bob,,  @Carol "),
            vec!["alice", "bob", "carol"]
        );
        assert!(parse_admin_list("").is_empty());
    }

    #[test]
    fn test_is_admin() {
        let config = Config {
            redis_url: REDIS_URL_DEFAULT.to_string(),
            admin_users: vec!["alice".to_string()],
            keepalive_url: None,
        };
        assert!(config.is_admin("alice"));
        assert!(!config.is_admin("bob"));
    }
}
