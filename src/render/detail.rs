use super::catalog::urlencode;
use super::{format_price, html_escape, truncate_chars};
use crate::models::item::CatalogItem;

pub fn not_provided() -> String {
    super::state_message("No product name provided.")
}

pub fn not_found(name: &str) -> String {
    super::state_message(&format!("Product not found: {}", name))
}

pub fn error_state(name: &str, detail: &str) -> String {
    super::error_state(
        "Error loading product details",
        detail,
        &format!("/product?name={}", urlencode(name)),
    )
}

/// The detail panel: image with featured/out-of-stock badges, category,
/// name, flattened description, price, stock count, add-to-cart (disabled
/// at zero stock) and back navigation.
pub fn render_panel(item: &CatalogItem, image_url: &str) -> String {
    let name = html_escape(&item.name);
    let description = if item.description.is_empty() {
        "No description available.".to_string()
    } else {
        html_escape(&item.description)
    };

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

    let stock_line = if item.in_stock() {
        format!(r#"<span class="stock-note">{} in stock</span>"#, item.stock)
    } else {
        r#"<span class="stock-note state-error">Out of stock</span>"#.to_string()
    };

    let (disabled, label) = if item.in_stock() {
        ("", "Add to Cart")
    } else {
        (" disabled", "Out of Stock")
    };

    format!(
        r#"<div class="detail-panel">
    <div class="detail-image">
        <img src="{image}" alt="{name}">
        {featured_badge}{oos_badge}
    </div>
    <div class="detail-info">
        <div>
            <span class="category-label">{category}</span>
            <h1>{name}</h1>
            <p>{description}</p>
            <p><span class="price">{price}</span> {stock_line}</p>
        </div>
        <div class="detail-actions">
            <button class="add-to-cart" data-id="{id}" data-name="{name}" data-price="{raw_price}"{disabled}>{label}</button>
            <a href="/products" class="back-link">&larr; Back</a>
        </div>
    </div>
</div>"#,
        image = html_escape(image_url),
        name = name,
        featured_badge = featured_badge,
        oos_badge = oos_badge,
        category = html_escape(&item.category),
        description = description,
        price = format_price(item.price),
        stock_line = stock_line,
        id = html_escape(&item.id),
        raw_price = item.price,
        disabled = disabled,
        label = label,
    )
}

/// One related-item card for the rail: resolved image, name, ≤80-char
/// snippet, price and a link back into the detail view.
pub fn render_related_card(item: &CatalogItem, image_url: &str) -> String {
    let snippet = truncate_chars(&item.description, 80);
    format!(
        r#"<div class="related-card product-card">
    <a href="/product?name={name_q}"><img src="{image}" alt="{name}"></a>
    <div class="card-body">
        <h3>{name}</h3>
        <p>{snippet}</p>
        <div class="card-footer">
            <span class="price">{price}</span>
            <a class="retry-link" href="/product?name={name_q}">View Details</a>
        </div>
    </div>
</div>"#,
        name_q = urlencode(&item.name),
        image = html_escape(image_url),
        name = html_escape(&item.name),
        snippet = html_escape(&snippet),
        price = format_price(item.price),
    )
}

/// The horizontally scrolling related-items rail with prev/next controls.
/// Renders nothing when there is nothing related.
pub fn render_related_rail(category: &str, items: &[CatalogItem], image_urls: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let cards: String = items
        .iter()
        .zip(image_urls.iter())
        .map(|(item, url)| render_related_card(item, url))
        .collect();

    format!(
        r#"<section class="related-section">
    <h2>More {category} Products</h2>
    <div class="rail-wrap">
        <button id="rail-prev" class="rail-nav hidden" aria-label="Scroll left">&larr;</button>
        <button id="rail-next" class="rail-nav hidden" aria-label="Scroll right">&rarr;</button>
        <div class="related-rail" id="related-rail">{cards}</div>
    </div>
</section>"#,
        category = html_escape(category),
        cards = cards,
    )
}

/// Rail scroll controls: hidden while the content fits the viewport,
/// dimmed at either scroll extreme.
pub const CAROUSEL_JS: &str = r#"<script>
(function(){
var rail=document.getElementById('related-rail');
var prev=document.getElementById('rail-prev');
var next=document.getElementById('rail-next');
if(!rail||!prev||!next)return;
var STEP=324;
function update(){
    if(rail.scrollWidth<=rail.clientWidth){
        prev.classList.add('hidden');next.classList.add('hidden');return;
    }
    prev.classList.remove('hidden');next.classList.remove('hidden');
    prev.classList.toggle('dimmed',rail.scrollLeft<=10);
    next.classList.toggle('dimmed',rail.scrollLeft+rail.clientWidth>=rail.scrollWidth-10);
}
prev.addEventListener('click',function(){rail.scrollBy({left:-STEP,behavior:'smooth'});});
next.addEventListener('click',function(){rail.scrollBy({left:STEP,behavior:'smooth'});});
rail.addEventListener('scroll',update);
window.addEventListener('resize',update);
update();
})();
</script>"#;
