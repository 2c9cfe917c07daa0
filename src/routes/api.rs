use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::models::cart::Cart;
use crate::models::state::Theme;

// ── Add to cart ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CartAddRequest {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct CartAddResponse {
    pub ok: bool,
    /// Total units across the cart, for the nav badge.
    pub count: i64,
}

#[post("/cart/add", format = "json", data = "<req>")]
pub fn cart_add(pool: &State<DbPool>, req: Json<CartAddRequest>) -> Json<CartAddResponse> {
    match Cart::add(pool, &req.id, &req.name, req.price) {
        Ok(cart) => Json(CartAddResponse {
            ok: true,
            count: cart.iter().map(|entry| entry.quantity).sum(),
        }),
        Err(e) => {
            log::error!("Cart persist failed: {}", e);
            Json(CartAddResponse {
                ok: false,
                count: Cart::count(pool),
            })
        }
    }
}

// ── Theme toggle ───────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: String,
}

#[post("/theme")]
pub fn theme_toggle(pool: &State<DbPool>) -> Json<ThemeResponse> {
    let theme = match Theme::toggle(pool) {
        Ok(theme) => theme,
        Err(e) => {
            log::error!("Theme persist failed: {}", e);
            Theme::get(pool)
        }
    };
    Json(ThemeResponse { theme })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![cart_add, theme_toggle]
}
