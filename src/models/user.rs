use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Buyer/admin identity row. The `role` column is the authoritative role
/// source when token metadata carries none.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
