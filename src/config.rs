use std::env;

/// Credentials for the superuser seeded on first start, when the users
/// table is still empty. Stands in for an interactive "create admin" step.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl: i64,
    pub page_size: i64,
    pub max_page_size: i64,
    pub admin: Option<AdminBootstrap>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sechub.db".to_string(),
            bind_address: "0.0.0.0:3001".to_string(),
            jwt_secret: "insecure-dev-secret".to_string(),
            access_token_ttl: 7 * 24 * 3600,
            refresh_token_ttl: 30 * 24 * 3600,
            page_size: 20,
            max_page_size: 100,
            admin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminBootstrap {
                username,
                password,
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
                surname: env::var("ADMIN_SURNAME").unwrap_or_else(|_| "Admin".to_string()),
                phone: env::var("ADMIN_PHONE").unwrap_or_else(|_| "+70000000000".to_string()),
                email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost.local".to_string()),
            }),
            _ => None,
        };

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            access_token_ttl: env_i64("ACCESS_TOKEN_TTL", defaults.access_token_ttl),
            refresh_token_ttl: env_i64("REFRESH_TOKEN_TTL", defaults.refresh_token_ttl),
            page_size: env_i64("PAGE_SIZE", defaults.page_size),
            max_page_size: env_i64("MAX_PAGE_SIZE", defaults.max_page_size),
            admin,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
