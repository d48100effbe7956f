use credibot::bot::{run_dispatcher, spawn_keepalive, Config, Database};

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting CrediBot...");

    let config = Config::from_env();
    let db = match Database::open(&config.redis_url) {
        Ok(db) => db,
        Err(err) => {
            log::error!("Failed to open the store: {err}");
            return;
        }
    };

    let bot = teloxide::Bot::from_env();
    spawn_keepalive(config.keepalive_url.clone());

    log::info!("CrediBot started successfully!");

    run_dispatcher(bot, db, config).await;
}
