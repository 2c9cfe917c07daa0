pub mod catalog;
pub mod detail;
pub mod home;
pub mod services;

/// Escape text destined for HTML body or attribute positions.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Prices always render with two decimals.
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Truncate on a char boundary, appending an ellipsis only when text was
/// actually dropped.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Shared page chrome. The persisted theme decides the `dark` class up
/// front so pages never flash the wrong mode; the toggle itself happens
/// client-side and is persisted through POST /theme.
pub fn layout(
    site_name: &str,
    title: &str,
    theme: &str,
    cart_count: i64,
    body: &str,
    extra_script: &str,
) -> String {
    let dark_class = if theme == "dark" { " class=\"dark\"" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en"{dark_class}>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — {site_name}</title>
<style>{css}</style>
</head>
<body>
<header class="site-header">
    <a href="/" class="site-logo">{site_name}</a>
    <nav>
        <a href="/">Home</a>
        <a href="/products">Products</a>
        <a href="/services">Services</a>
        <a href="/#contact">Contact</a>
    </nav>
    <div class="header-actions">
        <span class="cart-badge" id="cart-count" title="Items in cart">🛒 {cart_count}</span>
        <button id="dark-mode-toggle" title="Toggle dark mode">◐</button>
    </div>
</header>
<main>
{body}
</main>
<script>{bootstrap_js}</script>
{extra_script}
</body>
</html>"#,
        dark_class = dark_class,
        title = html_escape(title),
        site_name = html_escape(site_name),
        css = BASE_CSS,
        cart_count = cart_count,
        body = body,
        bootstrap_js = BOOTSTRAP_JS,
        extra_script = extra_script,
    )
}

const BASE_CSS: &str = r#"
:root { --bg:#fff; --fg:#1a1a2e; --muted:#667; --accent:#2563eb; --card:#f7f8fa; }
html.dark { --bg:#111827; --fg:#f3f4f6; --muted:#9ca3af; --accent:#60a5fa; --card:#1f2937; }
body { margin:0; font-family:system-ui,sans-serif; background:var(--bg); color:var(--fg); }
main { max-width:1100px; margin:0 auto; padding:24px 16px; }
.site-header { display:flex; align-items:center; gap:24px; padding:12px 24px; border-bottom:1px solid var(--card); }
.site-header nav { flex:1; display:flex; gap:16px; }
.site-header a { color:var(--fg); text-decoration:none; }
.site-logo { font-weight:700; font-size:1.2em; }
.header-actions { display:flex; gap:12px; align-items:center; }
#dark-mode-toggle { background:none; border:1px solid var(--muted); border-radius:6px; color:var(--fg); cursor:pointer; padding:4px 10px; }
.product-grid { display:grid; grid-template-columns:repeat(auto-fill,minmax(280px,1fr)); gap:24px; }
.product-card { background:var(--card); border-radius:10px; overflow:hidden; position:relative; }
.product-card img { width:100%; height:200px; object-fit:cover; display:block; }
.product-card .card-body { padding:14px; }
.category-label { text-transform:uppercase; font-size:.75em; color:var(--accent); font-weight:600; }
.badge { position:absolute; top:10px; font-size:.7em; color:#fff; padding:3px 8px; border-radius:9999px; }
.badge-featured { right:10px; background:var(--accent); }
.badge-oos { left:10px; background:#dc2626; }
.price { font-size:1.4em; font-weight:700; }
.stock-note { font-size:.8em; color:var(--muted); }
button.add-to-cart { background:var(--accent); color:#fff; border:none; border-radius:6px; padding:8px 14px; cursor:pointer; }
button.add-to-cart[disabled] { opacity:.5; cursor:not-allowed; }
.pagination { display:flex; justify-content:center; gap:4px; margin-top:32px; }
.pagination a, .pagination span { padding:6px 12px; border:1px solid var(--muted); border-radius:4px; color:var(--fg); text-decoration:none; }
.pagination .current { background:var(--accent); color:#fff; border-color:var(--accent); }
.pagination .disabled { opacity:.5; pointer-events:none; }
.state-message { text-align:center; padding:48px 0; color:var(--muted); }
.state-error { color:#dc2626; font-weight:600; }
.retry-link { display:inline-block; margin-top:12px; background:var(--accent); color:#fff; padding:8px 16px; border-radius:6px; text-decoration:none; }
.detail-panel { display:grid; grid-template-columns:1fr 1fr; gap:24px; background:var(--card); border-radius:10px; overflow:hidden; }
.detail-image { position:relative; display:flex; align-items:center; justify-content:center; padding:16px; }
.detail-image img { max-width:100%; max-height:420px; object-fit:contain; }
.detail-info { padding:24px; display:flex; flex-direction:column; justify-content:space-between; }
.related-rail { display:flex; gap:24px; overflow-x:auto; scroll-behavior:smooth; padding-bottom:12px; scrollbar-width:none; }
.related-rail::-webkit-scrollbar { display:none; }
.related-card { flex:none; width:300px; }
.rail-wrap { position:relative; }
.rail-nav { position:absolute; top:50%; transform:translateY(-50%); z-index:10; background:var(--bg); border:1px solid var(--muted); border-radius:9999px; width:40px; height:40px; cursor:pointer; color:var(--fg); }
.rail-nav.dimmed { opacity:.5; cursor:not-allowed; }
.rail-nav.hidden { display:none; }
#rail-prev { left:-12px; }
#rail-next { right:-12px; }
.service-grid { display:grid; grid-template-columns:repeat(auto-fill,minmax(300px,1fr)); gap:24px; }
.service-card { background:var(--card); border-radius:10px; overflow:hidden; }
.service-card .icon-fallback, .modal-body .icon-fallback { display:flex; align-items:center; justify-content:center; height:180px; font-size:4em; background:linear-gradient(135deg,#3b82f6,#1d4ed8); color:#fff; }
.service-card img { width:100%; height:180px; object-fit:cover; display:block; }
.learn-more { background:none; border:none; color:var(--accent); cursor:pointer; font-weight:600; padding:0; }
.modal-overlay { position:fixed; inset:0; background:rgba(0,0,0,.6); display:flex; align-items:center; justify-content:center; z-index:100; }
.modal-overlay.hidden { display:none; }
.modal-box { background:var(--bg); border-radius:10px; max-width:640px; width:90%; max-height:85vh; overflow-y:auto; padding:24px; position:relative; }
.modal-close { position:absolute; top:12px; right:12px; background:none; border:none; font-size:1.4em; color:var(--muted); cursor:pointer; }
.spinner { display:flex; justify-content:center; padding:48px 0; }
.spinner::after { content:""; width:40px; height:40px; border:4px solid var(--card); border-bottom-color:var(--accent); border-radius:50%; animation:spin 1s linear infinite; }
@keyframes spin { to { transform:rotate(360deg); } }
.banner-strip { background:var(--accent); color:#fff; text-align:center; padding:10px; border-radius:8px; margin-bottom:24px; }
.hero { text-align:center; padding:48px 0; }
.site-footer { border-top:1px solid var(--card); margin-top:48px; padding:24px 0; color:var(--muted); text-align:center; }
"#;

/// Page bootstrap, shared by every view: dark-mode toggle persisted via
/// POST /theme, smooth-scroll interception for in-page anchors (bare `#`
/// is skipped), and delegated add-to-cart handling with transient button
/// feedback.
const BOOTSTRAP_JS: &str = r##"
(function(){
var toggle=document.getElementById('dark-mode-toggle');
if(toggle)toggle.addEventListener('click',function(){
    document.documentElement.classList.toggle('dark');
    fetch('/theme',{method:'POST'}).catch(function(){});
});
document.querySelectorAll('a[href^="#"], a[href^="/#"]').forEach(function(anchor){
    anchor.addEventListener('click',function(e){
        var href=this.getAttribute('href');
        var hash=href.slice(href.indexOf('#')+1);
        if(!hash)return;
        var target=document.getElementById(hash);
        if(!target)return;
        e.preventDefault();
        target.scrollIntoView({behavior:'smooth',block:'start'});
    });
});
document.addEventListener('click',function(e){
    var btn=e.target.closest('button.add-to-cart');
    if(!btn||btn.disabled)return;
    var original=btn.textContent;
    btn.disabled=true;
    fetch('/cart/add',{method:'POST',headers:{'Content-Type':'application/json'},
        body:JSON.stringify({id:btn.dataset.id,name:btn.dataset.name,price:parseFloat(btn.dataset.price)})})
    .then(function(r){return r.json()})
    .then(function(j){
        btn.textContent='✓ Added!';
        var badge=document.getElementById('cart-count');
        if(badge&&typeof j.count==='number')badge.textContent='🛒 '+j.count;
    })
    .catch(function(){btn.textContent='Failed';})
    .finally(function(){
        setTimeout(function(){btn.textContent=original;btn.disabled=false;},2000);
    });
});
})();
"##;

/// Centered inline message for empty/not-found states.
pub fn state_message(text: &str) -> String {
    format!(
        r#"<div class="state-message"><p>{}</p></div>"#,
        html_escape(text)
    )
}

/// Inline error state with a user-initiated retry link. Nothing retries
/// automatically.
pub fn error_state(message: &str, detail: &str, retry_href: &str) -> String {
    format!(
        r#"<div class="state-message">
    <p class="state-error">{message}</p>
    <p>{detail}</p>
    <a class="retry-link" href="{href}">Retry</a>
</div>"#,
        message = html_escape(message),
        detail = html_escape(detail),
        href = html_escape(retry_href),
    )
}
