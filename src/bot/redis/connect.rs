use redis::{Client, Commands, Connection, RedisResult};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DBError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),
}

/* Database is the handle to the underlying Redis store.
 * It is constructed once at startup and injected into the dispatcher,
 * so no module reaches for an ambient global connection.
 * Cloning only copies the connection info, not a live connection.
 */
#[derive(Clone)]
pub struct Database {
    client: Client,
}

impl Database {
    pub fn open(url: &str) -> Result<Self, DBError> {
        let client = Client::open(url).map_err(|err| DBError::ConnectionError(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn connect(&self) -> Result<Connection, DBError> {
        self.client
            .get_connection()
            .map_err(|err| DBError::ConnectionError(err.to_string()))
    }
}

const REDIS_URL_DEFAULT: &str = "redis://127.0.0.1/";

// Opens a handle to the local store. Used by tests.
pub fn open_default() -> Result<Database, DBError> {
    Database::open(REDIS_URL_DEFAULT)
}

// Tests connection to Redis
pub fn test_redis_connection(db: &Database) -> RedisResult<bool> {
    let mut con = db.connect().expect("Failed to get Redis connection");
    let _: () = con.set("my_key", 42)?;
    let res: i32 = con.get("my_key")?;
    let _: () = con.del("my_key")?;

    Ok(res == 42)
}
