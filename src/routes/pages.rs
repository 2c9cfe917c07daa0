use log::error;
use rocket::response::content::RawHtml;
use rocket::State;
use serde_json::Value;

use crate::cms::{images, CmsClient};
use crate::config::Config;
use crate::db::DbPool;
use crate::models::cart::Cart;
use crate::models::state::Theme;
use crate::render;

/// Wrap a body in the shared layout with the persisted theme and the
/// current cart badge.
fn page(
    pool: &DbPool,
    config: &Config,
    title: &str,
    body: &str,
    extra_script: &str,
) -> RawHtml<String> {
    let theme = Theme::get(pool);
    let count = Cart::count(pool);
    RawHtml(render::layout(
        &config.site.name,
        title,
        &theme,
        count,
        body,
        extra_script,
    ))
}

// ── Homepage ───────────────────────────────────────────

#[get("/")]
pub fn home(
    pool: &State<DbPool>,
    client: &State<CmsClient>,
    config: &State<Config>,
) -> RawHtml<String> {
    // Each single-type collection degrades independently; a missing
    // banner never blanks the page.
    let banner = section(client.marketing_banner(), "marketing-banner");
    let homepage = section(client.homepage(), "homepage");
    let footer = section(client.footer_content(), "footer-content");
    let contact = section(client.contact_info(), "contact-info");

    let body = render::home::render_home(
        &config.site.name,
        banner.as_ref(),
        homepage.as_ref(),
        footer.as_ref(),
        contact.as_ref(),
    );
    page(pool, config, "Home", &body, "")
}

fn section(result: Result<Value, crate::cms::ClientError>, what: &str) -> Option<Value> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            error!("Homepage section {} unavailable: {}", what, e);
            None
        }
    }
}

// ── Catalog list ───────────────────────────────────────

#[get("/products?<page>")]
pub fn products(
    pool: &State<DbPool>,
    client: &State<CmsClient>,
    config: &State<Config>,
    page: Option<i64>,
) -> RawHtml<String> {
    let requested = page.unwrap_or(1).max(1);
    let page_size = config.site.products_per_page;

    let body = match client.products_page(requested, page_size) {
        Err(e) => render::catalog::error_state(requested, &e.to_string()),
        Ok(listing) if listing.items.is_empty() => render::catalog::empty_state(),
        Ok(listing) => {
            // List cards use plain URL resolution; only the detail view
            // pays for inlining.
            let image_urls: Vec<String> = listing
                .items
                .iter()
                .map(|item| {
                    let url = item
                        .image
                        .as_ref()
                        .map(|field| client.image_url(field))
                        .unwrap_or_default();
                    if url.is_empty() {
                        config.site.placeholder_image.clone()
                    } else {
                        url
                    }
                })
                .collect();

            let mut body = render::catalog::render_grid(&listing.items, &image_urls);
            if let Some(meta) = listing.pagination {
                // The CMS echoes the page it actually served, so an
                // out-of-range request renders with a clamped control.
                body.push_str(&render::catalog::render_pagination(
                    meta.page,
                    meta.page_count,
                ));
            }
            body
        }
    };

    self::page(pool, config, "Products", &body, "")
}

// ── Item detail ────────────────────────────────────────

#[get("/product?<name>")]
pub fn product_detail(
    pool: &State<DbPool>,
    client: &State<CmsClient>,
    config: &State<Config>,
    name: Option<String>,
) -> RawHtml<String> {
    let name = match name.filter(|n| !n.is_empty()) {
        Some(n) => n,
        None => {
            return page(
                pool,
                config,
                "Product",
                &render::detail::not_provided(),
                "",
            )
        }
    };

    let items = match client.products_by_name(&name) {
        Ok(items) => items,
        Err(e) => {
            let body = render::detail::error_state(&name, &e.to_string());
            return page(pool, config, "Product", &body, "");
        }
    };

    let item = match items.first() {
        Some(item) => item,
        // A miss is an expected outcome; no related request is made.
        None => {
            let body = render::detail::not_found(&name);
            return page(pool, config, "Product", &body, "");
        }
    };

    let image = images::display_url(client, item.image.as_ref(), &config.site.placeholder_image);
    let mut body = render::detail::render_panel(item, &image);
    let mut extra_script = "";

    if item.category != "Uncategorized" {
        match client.products_by_category(&item.category) {
            Ok(related) => {
                let related: Vec<_> = related
                    .into_iter()
                    .filter(|r| r.name != item.name)
                    .collect();
                let fields: Vec<Option<Value>> =
                    related.iter().map(|r| r.image.clone()).collect();
                let urls = images::display_urls(client, &fields, &config.site.placeholder_image);
                body.push_str(&render::detail::render_related_rail(
                    &item.category,
                    &related,
                    &urls,
                ));
                extra_script = render::detail::CAROUSEL_JS;
            }
            // The rail degrades silently; the panel above already rendered.
            Err(e) => error!("Related products fetch failed: {}", e),
        }
    }

    page(pool, config, &item.name, &body, extra_script)
}

// ── Services ───────────────────────────────────────────

#[get("/services")]
pub fn services(
    pool: &State<DbPool>,
    client: &State<CmsClient>,
    config: &State<Config>,
) -> RawHtml<String> {
    let (body, extra_script) = match client.services() {
        Err(e) => (render::services::error_state(&e.to_string()), ""),
        Ok(list) if list.is_empty() => (render::services::empty_state(), ""),
        Ok(list) => {
            let image_urls: Vec<String> = list
                .iter()
                .map(|service| {
                    service
                        .image
                        .as_ref()
                        .map(|field| client.image_url(field))
                        .unwrap_or_default()
                })
                .collect();
            (
                render::services::render_grid(&list, &image_urls),
                render::services::MODAL_JS,
            )
        }
    };

    page(pool, config, "Services", &body, extra_script)
}

/// Modal content, fetched on demand by the services page script. Errors
/// render inline inside the modal rather than closing it.
#[get("/services/<id>/fragment")]
pub fn service_fragment(client: &State<CmsClient>, id: &str) -> RawHtml<String> {
    match client.service(id) {
        Ok(Some(service)) => {
            let image_url = service
                .image
                .as_ref()
                .map(|field| client.image_url(field))
                .unwrap_or_default();
            RawHtml(render::services::render_fragment(&service, &image_url))
        }
        Ok(None) => RawHtml(render::services::fragment_missing()),
        Err(e) => {
            error!("Service detail fetch failed for {}: {}", id, e);
            RawHtml(render::services::fragment_error())
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![home, products, product_detail, services, service_fragment]
}
