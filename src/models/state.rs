use rusqlite::params;

use crate::db::DbPool;

pub const KEY_THEME: &str = "theme";
pub const KEY_CART: &str = "cart";

/// Key/value rows in the `local_state` table — the storefront's stand-in
/// for browser localStorage. Reads swallow pool errors and fall back to
/// the caller's default; persistence is best-effort.
pub struct LocalState;

impl LocalState {
    pub fn get(pool: &DbPool, key: &str) -> Option<String> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT value FROM local_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .ok()
    }

    pub fn get_or(pool: &DbPool, key: &str, default: &str) -> String {
        Self::get(pool, key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(pool: &DbPool, key: &str, value: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO local_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Persisted theme preference: "light" or "dark", defaulting to light.
pub struct Theme;

impl Theme {
    pub fn get(pool: &DbPool) -> String {
        let theme = LocalState::get_or(pool, KEY_THEME, "light");
        if theme == "dark" {
            theme
        } else {
            "light".to_string()
        }
    }

    /// Flip the preference and return the new value.
    pub fn toggle(pool: &DbPool) -> Result<String, String> {
        let next = if Self::get(pool) == "dark" { "light" } else { "dark" };
        LocalState::set(pool, KEY_THEME, next)?;
        Ok(next.to_string())
    }
}
