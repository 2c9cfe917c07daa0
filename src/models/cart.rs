use log::warn;
use serde::{Deserialize, Serialize};

use super::state::{LocalState, KEY_CART};
use crate::db::DbPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// The shopping cart: a JSON-serialized list under one `local_state` key,
/// keyed by item id. The only mutation is "add"; there is no removal or
/// decrement. The read-modify-write is not atomic — single-user scope.
pub struct Cart;

impl Cart {
    /// Load the persisted cart. An absent or corrupt value yields an
    /// empty cart rather than an error.
    pub fn load(pool: &DbPool) -> Vec<CartEntry> {
        let raw = match LocalState::get(pool, KEY_CART) {
            Some(v) => v,
            None => return vec![],
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding corrupt cart state: {}", e);
                vec![]
            }
        }
    }

    /// Increment the entry matching `id`, or append a new one with
    /// quantity 1, then persist the whole list back.
    pub fn add(pool: &DbPool, id: &str, name: &str, price: f64) -> Result<Vec<CartEntry>, String> {
        let mut cart = Self::load(pool);

        match cart.iter_mut().find(|entry| entry.id == id) {
            Some(existing) => existing.quantity += 1,
            None => cart.push(CartEntry {
                id: id.to_string(),
                name: name.to_string(),
                price,
                quantity: 1,
            }),
        }

        let raw = serde_json::to_string(&cart).map_err(|e| e.to_string())?;
        LocalState::set(pool, KEY_CART, &raw)?;
        Ok(cart)
    }

    /// Total number of units across all entries, for the nav badge.
    pub fn count(pool: &DbPool) -> i64 {
        Self::load(pool).iter().map(|entry| entry.quantity).sum()
    }
}
