use super::{format_price, html_escape, truncate_chars};
use crate::models::item::CatalogItem;

/// How many pages the control shows before collapsing into a window.
const WINDOW_THRESHOLD: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Num(i64),
    Gap,
}

/// The page numbers worth showing for a given position. Contiguous when
/// the total fits; otherwise first page, last page, the current page and
/// its immediate neighbors, with the rest collapsed into gaps.
pub fn page_window(current: i64, total: i64) -> Vec<PageToken> {
    use PageToken::{Gap, Num};

    if total <= WINDOW_THRESHOLD {
        return (1..=total).map(Num).collect();
    }

    if current <= 3 {
        vec![Num(1), Num(2), Num(3), Num(4), Gap, Num(total)]
    } else if current >= total - 2 {
        vec![
            Num(1),
            Gap,
            Num(total - 3),
            Num(total - 2),
            Num(total - 1),
            Num(total),
        ]
    } else {
        vec![
            Num(1),
            Gap,
            Num(current - 1),
            Num(current),
            Num(current + 1),
            Gap,
            Num(total),
        ]
    }
}

/// The pagination control. Renders nothing at all for a single page.
pub fn render_pagination(current: i64, total: i64) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="pagination" aria-label="Pagination">"#);

    // The #products fragment scrolls the grid back into view on change.
    if current > 1 {
        html.push_str(&format!(
            r#"<a href="/products?page={}#products">&laquo; Prev</a>"#,
            current - 1
        ));
    } else {
        html.push_str(r#"<span class="disabled">&laquo; Prev</span>"#);
    }

    for token in page_window(current, total) {
        match token {
            PageToken::Num(p) if p == current => {
                html.push_str(&format!(
                    r#"<span class="current" aria-current="page">{}</span>"#,
                    p
                ));
            }
            PageToken::Num(p) => {
                html.push_str(&format!(
                    r#"<a href="/products?page={}#products">{}</a>"#,
                    p, p
                ));
            }
            PageToken::Gap => {
                html.push_str(r#"<span class="gap">...</span>"#);
            }
        }
    }

    if current < total {
        html.push_str(&format!(
            r#"<a href="/products?page={}#products">Next &raquo;</a>"#,
            current + 1
        ));
    } else {
        html.push_str(r#"<span class="disabled">Next &raquo;</span>"#);
    }

    html.push_str("</nav>");
    html
}

/// One product card. `image_url` is already resolved; the add-to-cart
/// button is disabled (and relabeled) at zero stock.
pub fn render_card(item: &CatalogItem, image_url: &str) -> String {
    let name = html_escape(&item.name);
    let description = truncate_chars(&item.description, 100);

    let featured_badge = if item.featured {
        r#"<span class="badge badge-featured">Featured</span>"#
    } else {
        ""
    };
    let oos_badge = if item.in_stock() {
        ""
    } else {
        r#"<span class="badge badge-oos">Out of Stock</span>"#
    };

    let stock_note = if item.in_stock() {
        format!(r#"<p class="stock-note">{} in stock</p>"#, item.stock)
    } else {
        String::new()
    };

    let (disabled, label) = if item.in_stock() {
        ("", "Add to Cart")
    } else {
        (" disabled", "Out of Stock")
    };

    format!(
        r#"<div class="product-card">
    <a href="/product?name={name_q}"><img src="{image}" alt="{name}"></a>
    {featured_badge}{oos_badge}
    <div class="card-body">
        <span class="category-label">{category}</span>
        <h3><a href="/product?name={name_q}">{name}</a></h3>
        <p>{description}</p>
        <div class="card-footer">
            <span class="price">{price}</span>
            <button class="add-to-cart" data-id="{id}" data-name="{name}" data-price="{raw_price}"{disabled}>{label}</button>
        </div>
        {stock_note}
    </div>
</div>"#,
        name_q = urlencode(&item.name),
        image = html_escape(image_url),
        name = name,
        featured_badge = featured_badge,
        oos_badge = oos_badge,
        category = html_escape(&item.category),
        description = html_escape(&description),
        price = format_price(item.price),
        id = html_escape(&item.id),
        raw_price = item.price,
        disabled = disabled,
        label = label,
        stock_note = stock_note,
    )
}

/// The card grid for one page of products. `image_urls` is parallel to
/// `items`, resolved by the caller.
pub fn render_grid(items: &[CatalogItem], image_urls: &[String]) -> String {
    let cards: String = items
        .iter()
        .zip(image_urls.iter())
        .map(|(item, url)| render_card(item, url))
        .collect();
    format!(r#"<div class="product-grid" id="products">{}</div>"#, cards)
}

pub fn empty_state() -> String {
    super::state_message("No products found!")
}

pub fn error_state(page: i64, detail: &str) -> String {
    super::error_state(
        "Error loading products",
        detail,
        &format!("/products?page={}", page),
    )
}

/// Query-string encoding for product names used in detail links.
pub fn urlencode(s: &str) -> String {
    let mut url = url::Url::parse("http://x/").expect("static URL");
    url.query_pairs_mut().append_pair("name", s);
    url.query()
        .and_then(|q| q.strip_prefix("name="))
        .unwrap_or_default()
        .to_string()
}
