use std::time::Duration;

/* Keep-alive poller.
 * Free-tier hosts idle the process out unless something fetches it,
 * so a background task pings the configured URL every five minutes.
 * Without a URL the task is never started.
 */

const PING_INTERVAL: Duration = Duration::from_secs(300);
const RETRY_INTERVAL: Duration = Duration::from_secs(60);
const PING_TIMEOUT: Duration = Duration::from_secs(10);

pub fn spawn_keepalive(url: Option<String>) {
    let url = match url {
        Some(url) => url,
        None => {
            log::info!("No keep-alive URL configured, poller disabled");
            return;
        }
    };

    tokio::spawn(async move {
        let client = reqwest::Client::new();
        loop {
            match client.get(&url).timeout(PING_TIMEOUT).send().await {
                Ok(response) => {
                    log::debug!("Keep-alive ping sent (status: {})", response.status());
                    tokio::time::sleep(PING_INTERVAL).await;
                }
                Err(err) => {
                    log::warn!("Keep-alive ping failed: {err}");
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
            }
        }
    });
}
