#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::json;

use crate::cms::images::{data_uri, is_tunnel_url, mime_from_extension, resolve_url};
use crate::cms::{parse_listing, parse_page_meta, unwrap_single, ClientError, CmsClient};
use crate::config::{CmsConfig, Config};
use crate::db::{run_migrations, DbPool};
use crate::models::cart::{Cart, CartEntry};
use crate::models::item::{flatten_description, CatalogItem};
use crate::models::service::ServiceItem;
use crate::models::state::{LocalState, Theme};
use crate::render;
use crate::render::catalog::{page_window, render_pagination, urlencode, PageToken};

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with migrations applied. Uses a
/// named shared-cache in-memory DB so multiple connections see the same data.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    pool
}

fn test_client() -> CmsClient {
    let cfg = CmsConfig {
        base_url: "http://localhost:1337".to_string(),
        ..CmsConfig::default()
    };
    CmsClient::new(&cfg).expect("Failed to build test client")
}

fn make_item(name: &str, stock: i64) -> CatalogItem {
    CatalogItem {
        id: "1".to_string(),
        name: name.to_string(),
        category: "Phones".to_string(),
        price: 9.99,
        stock,
        featured: false,
        description: "A phone".to_string(),
        image: None,
    }
}

// ═══════════════════════════════════════════════════════════
// Local state
// ═══════════════════════════════════════════════════════════

#[test]
fn local_state_set_and_get() {
    let pool = test_pool();
    assert_eq!(LocalState::get(&pool, "missing"), None);
    LocalState::set(&pool, "k", "v").unwrap();
    assert_eq!(LocalState::get(&pool, "k"), Some("v".to_string()));
}

#[test]
fn local_state_upsert() {
    let pool = test_pool();
    LocalState::set(&pool, "k", "first").unwrap();
    LocalState::set(&pool, "k", "second").unwrap();
    assert_eq!(LocalState::get(&pool, "k"), Some("second".to_string()));
}

#[test]
fn local_state_get_or_default() {
    let pool = test_pool();
    assert_eq!(LocalState::get_or(&pool, "missing", "fallback"), "fallback");
}

#[test]
fn theme_defaults_to_light() {
    let pool = test_pool();
    assert_eq!(Theme::get(&pool), "light");
}

#[test]
fn theme_toggle_persists() {
    let pool = test_pool();
    assert_eq!(Theme::toggle(&pool).unwrap(), "dark");
    assert_eq!(Theme::get(&pool), "dark");
    assert_eq!(Theme::toggle(&pool).unwrap(), "light");
    assert_eq!(Theme::get(&pool), "light");
}

#[test]
fn theme_unknown_value_reads_as_light() {
    let pool = test_pool();
    LocalState::set(&pool, "theme", "sepia").unwrap();
    assert_eq!(Theme::get(&pool), "light");
}

// ═══════════════════════════════════════════════════════════
// Cart
// ═══════════════════════════════════════════════════════════

#[test]
fn cart_starts_empty() {
    let pool = test_pool();
    assert!(Cart::load(&pool).is_empty());
    assert_eq!(Cart::count(&pool), 0);
}

#[test]
fn cart_add_twice_increments_quantity() {
    let pool = test_pool();
    Cart::add(&pool, "p1", "Widget", 9.99).unwrap();
    let cart = Cart::add(&pool, "p1", "Widget", 9.99).unwrap();
    assert_eq!(
        cart,
        vec![CartEntry {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            price: 9.99,
            quantity: 2,
        }]
    );
    // And the persisted copy agrees.
    assert_eq!(Cart::load(&pool), cart);
}

#[test]
fn cart_distinct_ids_append() {
    let pool = test_pool();
    Cart::add(&pool, "p1", "Widget", 9.99).unwrap();
    let cart = Cart::add(&pool, "p2", "Gadget", 4.50).unwrap();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart[0].id, "p1");
    assert_eq!(cart[1].id, "p2");
    assert_eq!(cart[1].quantity, 1);
    assert_eq!(Cart::count(&pool), 2);
}

#[test]
fn cart_corrupt_state_resets() {
    let pool = test_pool();
    LocalState::set(&pool, "cart", "not json at all").unwrap();
    assert!(Cart::load(&pool).is_empty());
    let cart = Cart::add(&pool, "p1", "Widget", 9.99).unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 1);
}

// ═══════════════════════════════════════════════════════════
// Description flattening
// ═══════════════════════════════════════════════════════════

#[test]
fn description_plain_string_passes_through() {
    let v = json!("Just a phone.");
    assert_eq!(flatten_description(Some(&v)), "Just a phone.");
}

#[test]
fn description_blocks_flatten_with_spaces() {
    let v = json!([
        {"children": [{"text": "A"}]},
        {"children": [{"text": "B"}]}
    ]);
    assert_eq!(flatten_description(Some(&v)), "A B");
}

#[test]
fn description_block_with_multiple_spans() {
    let v = json!([{"children": [{"text": "Fast"}, {"text": "charging"}]}]);
    assert_eq!(flatten_description(Some(&v)), "Fast charging");
}

#[test]
fn description_single_block_object() {
    let v = json!({"children": [{"text": "One"}, {"text": "block"}]});
    assert_eq!(flatten_description(Some(&v)), "One block");
}

#[test]
fn description_missing_or_null_is_empty() {
    assert_eq!(flatten_description(None), "");
    let v = json!(null);
    assert_eq!(flatten_description(Some(&v)), "");
}

// ═══════════════════════════════════════════════════════════
// Item normalization
// ═══════════════════════════════════════════════════════════

#[test]
fn item_from_attributes_wrapped_entry() {
    let entry = json!({
        "id": 7,
        "attributes": {
            "name": "Phone X",
            "category": "Phones",
            "price": 499.5,
            "stock": 3,
            "featured": true,
            "description": "Nice.",
            "image": {"data": {"attributes": {"url": "/x.png"}}}
        }
    });
    let item = CatalogItem::from_entry(&entry).unwrap();
    assert_eq!(item.id, "7");
    assert_eq!(item.name, "Phone X");
    assert_eq!(item.category, "Phones");
    assert_eq!(item.price, 499.5);
    assert_eq!(item.stock, 3);
    assert!(item.featured);
    assert!(item.image.is_some());
}

#[test]
fn item_from_flat_entry_with_defaults() {
    let entry = json!({"id": "abc", "name": "Bare"});
    let item = CatalogItem::from_entry(&entry).unwrap();
    assert_eq!(item.id, "abc");
    assert_eq!(item.category, "Uncategorized");
    assert_eq!(item.price, 0.0);
    assert_eq!(item.stock, 0);
    assert!(!item.featured);
    assert_eq!(item.description, "");
    assert!(item.image.is_none());
    assert!(!item.in_stock());
}

#[test]
fn item_without_name_is_skipped() {
    let entry = json!({"id": 1, "attributes": {"price": 5.0}});
    assert!(CatalogItem::from_entry(&entry).is_none());
}

#[test]
fn item_accepts_alternate_media_keys() {
    let entry = json!({"id": 1, "name": "Alt", "picture": {"url": "/p.png"}});
    let item = CatalogItem::from_entry(&entry).unwrap();
    assert!(item.image.is_some());
}

#[test]
fn service_from_entry() {
    let entry = json!({
        "id": 2,
        "attributes": {"title": "Repair", "description": "<p>We fix.</p>", "icon": "🔧"}
    });
    let service = ServiceItem::from_entry(&entry).unwrap();
    assert_eq!(service.id, "2");
    assert_eq!(service.title, "Repair");
    assert_eq!(service.description, "<p>We fix.</p>");
    assert_eq!(service.icon.as_deref(), Some("🔧"));
}

#[test]
fn service_without_title_is_skipped() {
    let entry = json!({"id": 2, "attributes": {"description": "x"}});
    assert!(ServiceItem::from_entry(&entry).is_none());
}

// ═══════════════════════════════════════════════════════════
// Envelope parsing
// ═══════════════════════════════════════════════════════════

#[test]
fn listing_parses_items_and_pagination() {
    let body = json!({
        "data": [
            {"id": 1, "attributes": {"name": "A", "price": 1.0}},
            {"id": 2, "name": "B", "price": 2.0}
        ],
        "meta": {"pagination": {"page": 2, "pageSize": 6, "pageCount": 5, "total": 27}}
    });
    let listing = parse_listing(&body).unwrap();
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[0].name, "A");
    assert_eq!(listing.items[1].name, "B");
    let meta = listing.pagination.unwrap();
    assert_eq!(meta.page, 2);
    assert_eq!(meta.page_count, 5);
    assert_eq!(meta.total, 27);
}

#[test]
fn listing_skips_nameless_entries() {
    let body = json!({"data": [{"id": 1}, {"id": 2, "name": "Ok"}]});
    let listing = parse_listing(&body).unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name, "Ok");
}

#[test]
fn listing_without_data_is_shape_error() {
    let body = json!({"error": "nope"});
    match parse_listing(&body) {
        Err(ClientError::Shape(_)) => {}
        other => panic!("expected shape error, got {:?}", other.map(|l| l.items.len())),
    }
}

#[test]
fn listing_null_data_is_empty() {
    let body = json!({"data": null});
    let listing = parse_listing(&body).unwrap();
    assert!(listing.items.is_empty());
    assert!(listing.pagination.is_none());
}

#[test]
fn page_meta_absent_is_none() {
    assert!(parse_page_meta(&json!({"data": []})).is_none());
}

#[test]
fn single_unwraps_both_shapes() {
    let wrapped = json!({"data": {"id": 1, "attributes": {"title": "Hi"}}});
    assert_eq!(unwrap_single(&wrapped).unwrap()["title"], "Hi");

    let flat = json!({"data": {"id": 1, "title": "Hi"}});
    assert_eq!(unwrap_single(&flat).unwrap()["title"], "Hi");
}

// ═══════════════════════════════════════════════════════════
// URL building
// ═══════════════════════════════════════════════════════════

#[test]
fn collection_url_includes_pagination_params() {
    let client = test_client();
    let url = client.collection_url(
        "products",
        &[
            ("populate", "image"),
            ("pagination[page]", "2"),
            ("pagination[pageSize]", "6"),
        ],
    );
    let s = url.as_str();
    assert!(s.starts_with("http://localhost:1337/api/products?"));
    assert!(s.contains("populate=image"));
    assert!(s.contains("pagination%5Bpage%5D=2"));
    assert!(s.contains("pagination%5BpageSize%5D=6"));
}

#[test]
fn collection_url_encodes_filter_values() {
    let client = test_client();
    let url = client.collection_url("products", &[("filters[name][$eq]", "Super Phone 5G")]);
    assert!(url.as_str().contains("filters%5Bname%5D%5B%24eq%5D=Super+Phone+5G"));
}

#[test]
fn client_origin_has_no_trailing_slash() {
    let client = test_client();
    assert_eq!(client.origin(), "http://localhost:1337");
}

// ═══════════════════════════════════════════════════════════
// Image resolution
// ═══════════════════════════════════════════════════════════

const HOST: &str = "http://localhost:1337";

#[test]
fn image_nested_relative_url_joins_host() {
    let field = json!({"data": {"attributes": {"url": "/img.png"}}});
    assert_eq!(resolve_url(HOST, &field), "http://localhost:1337/img.png");
}

#[test]
fn image_flat_absolute_url_unchanged() {
    let field = json!({"url": "https://x/img.png"});
    assert_eq!(resolve_url(HOST, &field), "https://x/img.png");
}

#[test]
fn image_null_is_empty() {
    assert_eq!(resolve_url(HOST, &json!(null)), "");
}

#[test]
fn image_array_wrapped_takes_first() {
    let field = json!({"data": [
        {"attributes": {"url": "/first.png"}},
        {"attributes": {"url": "/second.png"}}
    ]});
    assert_eq!(resolve_url(HOST, &field), "http://localhost:1337/first.png");
}

#[test]
fn image_bare_string_joins_host() {
    assert_eq!(
        resolve_url(HOST, &json!("/uploads/a.jpg")),
        "http://localhost:1337/uploads/a.jpg"
    );
}

#[test]
fn image_object_without_url_is_empty() {
    assert_eq!(resolve_url(HOST, &json!({"data": {"attributes": {}}})), "");
    assert_eq!(resolve_url(HOST, &json!({"data": []})), "");
}

#[test]
fn tunnel_detection_matches_host_only() {
    assert!(is_tunnel_url("https://abc.ngrok-free.app/img.png", "ngrok"));
    assert!(!is_tunnel_url("https://example.com/ngrok.png", "ngrok"));
    assert!(!is_tunnel_url("https://abc.ngrok-free.app/img.png", ""));
    assert!(!is_tunnel_url("not a url", "ngrok"));
}

#[test]
fn data_uri_encodes_base64() {
    assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
}

#[test]
fn mime_detection_from_extension() {
    assert_eq!(mime_from_extension("/a/b/photo.JPG"), "image/jpeg");
    assert_eq!(mime_from_extension("x.png"), "image/png");
    assert_eq!(mime_from_extension("x.webp?v=2"), "image/webp");
    assert_eq!(mime_from_extension("noext"), "application/octet-stream");
}

// ═══════════════════════════════════════════════════════════
// Pagination window
// ═══════════════════════════════════════════════════════════

#[test]
fn window_contiguous_up_to_seven() {
    use PageToken::Num;
    assert_eq!(
        page_window(3, 7),
        vec![Num(1), Num(2), Num(3), Num(4), Num(5), Num(6), Num(7)]
    );
    assert_eq!(page_window(1, 1), vec![Num(1)]);
}

#[test]
fn window_near_start() {
    use PageToken::{Gap, Num};
    assert_eq!(
        page_window(2, 10),
        vec![Num(1), Num(2), Num(3), Num(4), Gap, Num(10)]
    );
}

#[test]
fn window_at_last_page_shows_final_block() {
    use PageToken::{Gap, Num};
    // current = pageCount > 7 → 1, gap, pageCount-3..pageCount
    assert_eq!(
        page_window(10, 10),
        vec![Num(1), Gap, Num(7), Num(8), Num(9), Num(10)]
    );
}

#[test]
fn window_in_the_middle() {
    use PageToken::{Gap, Num};
    assert_eq!(
        page_window(5, 10),
        vec![Num(1), Gap, Num(4), Num(5), Num(6), Gap, Num(10)]
    );
}

#[test]
fn pagination_control_empty_for_single_page() {
    assert_eq!(render_pagination(1, 1), "");
    assert_eq!(render_pagination(1, 0), "");
}

#[test]
fn pagination_control_marks_active_page() {
    let html = render_pagination(2, 5);
    assert!(html.contains(r#"<span class="current" aria-current="page">2</span>"#));
    assert!(html.contains(r#"href="/products?page=1#products""#));
    assert!(html.contains("Prev"));
    assert!(html.contains("Next"));
}

#[test]
fn pagination_control_disables_edges() {
    let first = render_pagination(1, 3);
    assert!(first.contains(r#"<span class="disabled">&laquo; Prev</span>"#));
    let last = render_pagination(3, 3);
    assert!(last.contains(r#"<span class="disabled">Next &raquo;</span>"#));
}

// ═══════════════════════════════════════════════════════════
// Render fragments
// ═══════════════════════════════════════════════════════════

#[test]
fn price_formats_two_decimals() {
    assert_eq!(render::format_price(9.99), "$9.99");
    assert_eq!(render::format_price(5.0), "$5.00");
}

#[test]
fn truncate_appends_ellipsis_only_when_cut() {
    assert_eq!(render::truncate_chars("short", 80), "short");
    let long = "x".repeat(100);
    let cut = render::truncate_chars(&long, 80);
    assert_eq!(cut.chars().count(), 83);
    assert!(cut.ends_with("..."));
}

#[test]
fn card_disables_add_to_cart_when_out_of_stock() {
    let html = render::catalog::render_card(&make_item("Phone", 0), "img.png");
    assert!(html.contains("Out of Stock"));
    assert!(html.contains(" disabled"));
    assert!(!html.contains("in stock"));
}

#[test]
fn card_shows_price_and_stock() {
    let html = render::catalog::render_card(&make_item("Phone", 4), "img.png");
    assert!(html.contains("$9.99"));
    assert!(html.contains("4 in stock"));
    assert!(html.contains(">Add to Cart</button>"));
    assert!(!html.contains(" disabled"));
}

#[test]
fn card_escapes_markup_in_fields() {
    let mut item = make_item("<b>Phone</b>", 1);
    item.description = "<script>alert(1)</script>".to_string();
    let html = render::catalog::render_card(&item, "img.png");
    assert!(!html.contains("<b>Phone</b>"));
    assert!(!html.contains("<script>alert(1)</script>"));
}

#[test]
fn grid_renders_one_card_per_item() {
    let items = vec![make_item("A", 1), make_item("B", 2)];
    let urls = vec!["a.png".to_string(), "b.png".to_string()];
    let html = render::catalog::render_grid(&items, &urls);
    assert_eq!(html.matches("product-card").count(), 2);
}

#[test]
fn detail_messages() {
    assert!(render::detail::not_provided().contains("No product name provided."));
    assert!(render::detail::not_found("Ghost").contains("Product not found"));
}

#[test]
fn detail_panel_renders_badges_and_back_link() {
    let mut item = make_item("Phone X", 0);
    item.featured = true;
    let html = render::detail::render_panel(&item, "img.png");
    assert!(html.contains("Featured"));
    assert!(html.contains("badge-oos"));
    assert!(html.contains("Back"));
    assert!(html.contains(" disabled"));
}

#[test]
fn related_card_snippet_is_bounded() {
    let mut item = make_item("Rel", 1);
    item.description = "d".repeat(200);
    let html = render::detail::render_related_card(&item, "img.png");
    assert!(html.contains(&format!("{}...", "d".repeat(80))));
    assert!(html.contains("View Details"));
}

#[test]
fn related_rail_empty_renders_nothing() {
    assert_eq!(render::detail::render_related_rail("Phones", &[], &[]), "");
}

#[test]
fn related_rail_titles_by_category() {
    let items = vec![make_item("Rel", 1)];
    let urls = vec!["img.png".to_string()];
    let html = render::detail::render_related_rail("Phones", &items, &urls);
    assert!(html.contains("More Phones Products"));
    assert!(html.contains("rail-prev"));
    assert!(html.contains("rail-next"));
}

#[test]
fn service_card_falls_back_to_icon() {
    let service = ServiceItem {
        id: "1".to_string(),
        title: "Repair".to_string(),
        description: "We fix things.".to_string(),
        icon: None,
        image: None,
    };
    let html = render::services::render_card(&service, "");
    assert!(html.contains("icon-fallback"));
    assert!(html.contains("🔧"));
}

#[test]
fn service_fragment_preserves_markup() {
    let service = ServiceItem {
        id: "1".to_string(),
        title: "Repair".to_string(),
        description: "<p>Full <strong>detail</strong>.</p>".to_string(),
        icon: Some("⚙".to_string()),
        image: None,
    };
    let html = render::services::render_fragment(&service, "");
    assert!(html.contains("<p>Full <strong>detail</strong>.</p>"));
    assert!(html.contains("⚙"));
}

#[test]
fn service_fragment_error_states() {
    assert!(render::services::fragment_missing().contains("Service not found."));
    assert!(render::services::fragment_error().contains("Failed to load service details."));
}

#[test]
fn layout_applies_dark_class_from_theme() {
    let dark = render::layout("Shop", "T", "dark", 0, "<p>b</p>", "");
    assert!(dark.contains(r#"<html lang="en" class="dark">"#));
    let light = render::layout("Shop", "T", "light", 0, "<p>b</p>", "");
    assert!(light.contains(r#"<html lang="en">"#));
}

#[test]
fn layout_shows_cart_count() {
    let html = render::layout("Shop", "T", "light", 3, "", "");
    assert!(html.contains("🛒 3"));
}

#[test]
fn home_renders_banner_footer_and_year() {
    let banner = json!({"text": "Sale on now"});
    let contact = json!({"email": "hi@shop.test", "phone": "555-0100"});
    let html = render::home::render_home("Shop", Some(&banner), None, None, Some(&contact));
    assert!(html.contains("Sale on now"));
    assert!(html.contains("hi@shop.test"));
    assert!(html.contains(&chrono::Utc::now().format("%Y").to_string()));
}

#[test]
fn urlencode_encodes_spaces() {
    assert_eq!(urlencode("Super Phone"), "Super+Phone");
}

// ═══════════════════════════════════════════════════════════
// Config
// ═══════════════════════════════════════════════════════════

#[test]
fn config_defaults_are_sane() {
    let cfg = Config::default();
    assert_eq!(cfg.cms.api_prefix, "api");
    assert_eq!(cfg.site.products_per_page, 6);
    assert!(!cfg.site.placeholder_image.is_empty());
}

#[test]
fn config_missing_file_falls_back_to_defaults() {
    let cfg = Config::load_from("/nonexistent/shopfront.toml");
    assert_eq!(cfg.cms.base_url, "http://localhost:1337");
}

#[test]
fn config_partial_file_fills_defaults() {
    let cfg: Config = toml::from_str("[site]\nname = \"X\"\n").unwrap();
    assert_eq!(cfg.site.name, "X");
    assert_eq!(cfg.site.products_per_page, 6);
    assert_eq!(cfg.cms.api_prefix, "api");
}
