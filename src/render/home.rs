use serde_json::Value;

use super::html_escape;

fn text_field<'a>(value: Option<&'a Value>, keys: &[&str]) -> Option<&'a str> {
    let value = value?;
    keys.iter()
        .find_map(|k| value.get(k).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
}

/// The homepage body, assembled from whichever single-type collections
/// answered: banner strip, hero, and a footer built from footer-content
/// and contact-info. Any collection that failed or is empty simply
/// renders nothing — the homepage never shows an error state.
pub fn render_home(
    site_name: &str,
    banner: Option<&Value>,
    homepage: Option<&Value>,
    footer: Option<&Value>,
    contact: Option<&Value>,
) -> String {
    let banner_html = text_field(banner, &["text", "message", "title"])
        .map(|t| format!(r#"<div class="banner-strip">{}</div>"#, html_escape(t)))
        .unwrap_or_default();

    let hero_title = text_field(homepage, &["title", "heading"]).unwrap_or(site_name);
    let hero_sub = text_field(homepage, &["subtitle", "tagline", "description"])
        .map(|t| format!("<p>{}</p>", html_escape(t)))
        .unwrap_or_default();

    let contact_html = [
        text_field(contact, &["email"]),
        text_field(contact, &["phone"]),
        text_field(contact, &["address"]),
    ]
    .iter()
    .flatten()
    .map(|v| format!("<span>{}</span>", html_escape(v)))
    .collect::<Vec<_>>()
    .join(" · ");

    let footer_text = text_field(footer, &["text", "about", "description"])
        .map(|t| format!("<p>{}</p>", html_escape(t)))
        .unwrap_or_default();

    format!(
        r#"{banner_html}
<section class="hero">
    <h1>{hero_title}</h1>
    {hero_sub}
    <p>
        <a class="retry-link" href="/products">Browse Products</a>
        <a class="retry-link" href="/services">Our Services</a>
    </p>
</section>
<footer class="site-footer" id="contact">
    {footer_text}
    <p>{contact_html}</p>
    <p>&copy; {year} {site_name}</p>
</footer>"#,
        banner_html = banner_html,
        hero_title = html_escape(hero_title),
        hero_sub = hero_sub,
        footer_text = footer_text,
        contact_html = contact_html,
        year = chrono::Utc::now().format("%Y"),
        site_name = html_escape(site_name),
    )
}
