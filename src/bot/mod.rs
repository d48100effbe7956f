// bot/mod.rs

// Exported functions
pub use self::dispatcher::run_dispatcher;
pub use self::keepalive::spawn_keepalive;

// Exported structs and types
pub use self::config::Config;
pub use self::dispatcher::{BotError, Command, HandlerResult};
pub use self::redis::Database;

// Declare submodules
mod config;
mod cooldown;
mod dispatcher;
mod handler;
mod keepalive;
mod odds;
mod processor;
mod redis;
