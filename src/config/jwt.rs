use std::env;

/// Signing secret and token lifetimes for the panel session.
///
/// The refresh lifetime defaults to the same 30-day window the
/// "remember me" session cookies carry, so a remembered browser session
/// and its refresh token expire together.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

const DEFAULT_ACCESS_EXPIRY: i64 = 3600; // 1 hour
const DEFAULT_REFRESH_EXPIRY: i64 = 30 * 24 * 3600; // 30 days

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, using an insecure development secret");
            "oqim-dev-secret".to_string()
        });

        Self {
            secret,
            access_token_expiry: parse_expiry("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY),
            refresh_token_expiry: parse_expiry("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY),
        }
    }
}

fn parse_expiry(var: &str, default: i64) -> i64 {
    match env::var(var) {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!("{var} is not a positive number of seconds, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}
