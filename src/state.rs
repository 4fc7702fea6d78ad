use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::rate_limit::RateLimitConfig;
use crate::modules::activity::logger::ActivityLogger;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    /// Best-effort activity log writer; owned by the state so its
    /// subscription dies with the application, not a process-wide set.
    pub activity: ActivityLogger,
}

pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    AppState {
        activity: ActivityLogger::spawn(db.clone()),
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    }
}
