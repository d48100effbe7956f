use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/* Cooldowns gate how often an account may run each command.
 * The tracker is an explicit per-account, per-command map of
 * next-eligible timestamps, checked by the dispatcher before a
 * handler runs. A rejected invocation has zero side effects and
 * reports the remaining wait, rounded down to whole seconds.
 * Expiry is lazy: nothing ticks in the background.
 */

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CommandKind {
    Lottery,
    Farm,
    Balance,
    Leaderboard,
    Roulette,
    Slots,
    Duel,
    ClanTop,
}

impl CommandKind {
    pub fn window(&self) -> Duration {
        let seconds = match self {
            Self::Lottery => 7200,
            Self::Farm => 1200,
            Self::Balance => 5,
            Self::Leaderboard => 5,
            Self::Roulette => 30,
            Self::Slots => 30,
            Self::Duel => 300,
            Self::ClanTop => 5,
        };
        Duration::seconds(seconds)
    }
}

#[derive(Clone, Default)]
pub struct CooldownTracker {
    next_eligible: Arc<Mutex<HashMap<(String, CommandKind), DateTime<Utc>>>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /* Admits the invocation and stamps the next eligible time, or
     * rejects it with the remaining wait in whole seconds.
     */
    pub fn begin(
        &self,
        account: &str,
        kind: CommandKind,
        now: DateTime<Utc>,
    ) -> Result<(), i64> {
        let mut map = self
            .next_eligible
            .lock()
            .expect("cooldown map lock poisoned");

        let slot = (account.to_string(), kind);
        if let Some(next) = map.get(&slot) {
            if now < *next {
                return Err((*next - now).num_seconds());
            }
        }

        map.insert(slot, now + kind.window());
        Ok(())
    }
}

// Renders a wait in seconds as h/m/s, skipping leading zero units.
pub fn format_wait(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
