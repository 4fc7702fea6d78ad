use sqlx::PgPool;

use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

/// Create the bootstrap superadmin account. Idempotent on phone number.
pub async fn create_super_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    phone: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password = hash_password(password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (first_name, last_name, phone, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (phone) DO NOTHING",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(hashed_password)
    .bind(UserRole::SuperAdmin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this phone number already exists".into());
    }

    Ok(())
}
