use anyhow::{anyhow, Context};

const DEFAULT_DATABASE_NAME: &str = "todo";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first if present.
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    #[cfg(test)]
    pub fn new_mongodb_uri(mongodb_uri: String) -> Self {
        Self {
            mongodb_uri,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            debug: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = lookup("MONGODB_URI")
            .or_else(|| lookup("MONGO_URL"))
            .ok_or_else(|| anyhow!("MONGODB_URI (or MONGO_URL) must be set"))?;
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got `{}`", port))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            mongodb_uri,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            debug: lookup("DEBUG").is_some_and(|debug| debug.eq_ignore_ascii_case("true")),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}
