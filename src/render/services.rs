use super::{html_escape, truncate_chars};
use crate::models::service::ServiceItem;

const DEFAULT_ICON: &str = "🔧";

fn icon_or(service: &ServiceItem) -> &str {
    service.icon.as_deref().unwrap_or(DEFAULT_ICON)
}

/// One service card: background image or emoji/icon fallback, title,
/// truncated description and a "Learn more" action that opens the modal.
pub fn render_card(service: &ServiceItem, image_url: &str) -> String {
    let media = if image_url.is_empty() {
        format!(r#"<div class="icon-fallback">{}</div>"#, icon_or(service))
    } else {
        format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape(image_url),
            html_escape(&service.title)
        )
    };

    format!(
        r#"<div class="service-card">
    {media}
    <div class="card-body">
        <h3>{title}</h3>
        <p>{description}</p>
        <button class="learn-more" data-service-id="{id}">Learn More &rarr;</button>
    </div>
</div>"#,
        media = media,
        title = html_escape(&service.title),
        description = html_escape(&truncate_chars(&service.description, 150)),
        id = html_escape(&service.id),
    )
}

/// The services page body: the card grid plus the (initially hidden)
/// modal shell the detail fragments load into.
pub fn render_grid(services: &[ServiceItem], image_urls: &[String]) -> String {
    let cards: String = services
        .iter()
        .zip(image_urls.iter())
        .map(|(service, url)| render_card(service, url))
        .collect();

    format!(
        r#"<h1>Our Services</h1>
<div class="service-grid">{cards}</div>
{modal}"#,
        cards = cards,
        modal = MODAL_SHELL,
    )
}

pub fn empty_state() -> String {
    super::state_message("No services found.")
}

pub fn error_state(detail: &str) -> String {
    super::error_state("Failed to load services", detail, "/services")
}

/// Modal content for one service: full markup-preserving description,
/// image or icon fallback, and a close action.
pub fn render_fragment(service: &ServiceItem, image_url: &str) -> String {
    let media = if image_url.is_empty() {
        format!(r#"<div class="icon-fallback">{}</div>"#, icon_or(service))
    } else {
        format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape(image_url),
            html_escape(&service.title)
        )
    };

    format!(
        r#"<div class="modal-body">
    {media}
    <h2>{title}</h2>
    <div class="service-description">{description}</div>
    <button class="retry-link modal-dismiss">Close</button>
</div>"#,
        media = media,
        title = html_escape(&service.title),
        description = service.description,
    )
}

pub fn fragment_missing() -> String {
    r#"<p class="state-error">Service not found.</p>"#.to_string()
}

pub fn fragment_error() -> String {
    r#"<p class="state-error">Failed to load service details.</p>"#.to_string()
}

const MODAL_SHELL: &str = r#"<div id="service-modal" class="modal-overlay hidden">
    <div class="modal-box">
        <button class="modal-close" aria-label="Close">&times;</button>
        <div id="service-modal-content"></div>
    </div>
</div>"#;

/// Modal wiring: "Learn more" opens the modal with a spinner, fetches the
/// fragment endpoint, and swaps it in; a fetch failure renders an inline
/// error inside the modal rather than closing it. Closing restores page
/// scroll.
pub const MODAL_JS: &str = r#"<script>
(function(){
var modal=document.getElementById('service-modal');
var content=document.getElementById('service-modal-content');
if(!modal||!content)return;
function close(){
    modal.classList.add('hidden');
    document.body.style.overflow='auto';
}
document.querySelectorAll('.learn-more').forEach(function(btn){
    btn.addEventListener('click',function(){
        modal.classList.remove('hidden');
        document.body.style.overflow='hidden';
        content.innerHTML='<div class="spinner"></div>';
        fetch('/services/'+encodeURIComponent(this.dataset.serviceId)+'/fragment')
        .then(function(r){return r.text()})
        .then(function(html){content.innerHTML=html;})
        .catch(function(){content.innerHTML='<p class="state-error">Failed to load service details.</p>';});
    });
});
modal.addEventListener('click',function(e){
    if(e.target===modal||e.target.closest('.modal-close')||e.target.closest('.modal-dismiss'))close();
});
})();
</script>"#;
