//! Dioxus desktop shell rendering the site's pages.
use anyhow::Result;
use dioxus::prelude::*;
use log::{debug, error, warn};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::blog::{self, Post, PostId};
use crate::config::SiteConfig;
use crate::contact::{ContactFields, Mailer};
use crate::content::ContentSource;
use crate::i18n::{Dictionary, TranslationStore};
use crate::lang::{self, CookieJar, Lang};
use crate::route::{self, Location, Route};

// 全站浅色主题 CSS (设计令牌 + 鼠尾草绿色调)
const GLOBAL_CSS: &str = r#":root {
    color-scheme: light;
    --color-bg: #fbfaf7;
    --color-panel: #ffffff;
    --color-border: #e4e2da;
    --color-text: #2e332f;
    --color-text-dim: #8a918c;
    --color-accent: #819A88;
    --color-accent-dark: #5f7668;
    --radius-sm: 4px;
    --radius-md: 8px;
    --transition: .16s cubic-bezier(.4,0,.2,1);
}
html,body { margin:0; background:var(--color-bg); color:var(--color-text); font-family:'Georgia','Times New Roman',serif; -webkit-font-smoothing:antialiased; }
.shell { min-height:100vh; display:flex; flex-direction:column; }
.topbar { display:flex; align-items:center; gap:18px; padding:14px 22px; background:var(--color-panel); border-bottom:1px solid var(--color-border); position:sticky; top:0; }
.brand { font-size:18px; font-weight:700; letter-spacing:.5px; color:var(--color-accent-dark); margin-right:auto; }
.nav-desktop { display:flex; gap:14px; }
.nav-link { font-size:14px; color:var(--color-text); cursor:pointer; text-decoration:none; padding:4px 2px; border-bottom:2px solid transparent; transition:var(--transition); }
.nav-link:hover { color:var(--color-accent-dark); border-bottom-color:var(--color-accent); }
.lang-switcher { display:flex; gap:4px; }
.lang-btn { background:none; border:1px solid transparent; border-radius:var(--radius-sm); padding:4px 8px; font-size:12px; color:var(--color-text-dim); cursor:pointer; transition:var(--transition); }
.lang-btn:hover { color:var(--color-accent-dark); }
.lang-btn.active { font-weight:700; color:var(--color-accent); }
.menu-btn { display:none; background:none; border:1px solid var(--color-border); border-radius:var(--radius-sm); padding:4px 10px; font-size:16px; cursor:pointer; color:var(--color-text); }
.mobile-menu { flex-direction:column; gap:10px; padding:12px 22px; background:var(--color-panel); border-bottom:1px solid var(--color-border); }
@media (max-width: 720px) {
    .nav-desktop { display:none; }
    .menu-btn { display:inline-flex; }
}
.content { flex:1; width:100%; max-width:880px; margin:0 auto; padding:28px 22px 48px 22px; box-sizing:border-box; }
.hero h1 { font-size:30px; margin:0 0 10px 0; color:var(--color-accent-dark); }
.lead { font-size:16px; color:var(--color-text-dim); margin:0 0 26px 0; }
.page h2 { font-size:24px; margin:0 0 16px 0; color:var(--color-accent-dark); }
.blog-grid { display:grid; grid-template-columns:repeat(auto-fill,minmax(240px,1fr)); gap:18px; }
.blog-card { background:var(--color-panel); border:1px solid var(--color-border); border-radius:var(--radius-md); overflow:hidden; cursor:pointer; transition:var(--transition); }
.blog-card:hover { border-color:var(--color-accent); transform:translateY(-2px); }
.blog-card-image img { width:100%; height:150px; object-fit:cover; display:block; background:var(--color-bg); }
.blog-card-content { padding:10px 14px 14px 14px; }
.blog-card-content h3 { margin:0; font-size:16px; }
.post-title { font-size:28px; margin:0 0 14px 0; color:var(--color-accent-dark); }
.post-image { width:100%; max-height:320px; object-fit:cover; border-radius:var(--radius-md); margin-bottom:18px; background:var(--color-panel); }
.post-content p { line-height:1.6; }
.muted { text-align:center; color:#999; }
.contact-form { display:flex; flex-direction:column; gap:12px; max-width:520px; }
.form-row { display:flex; gap:12px; }
.form-row input { flex:1; }
input,textarea { background:var(--color-panel); color:var(--color-text); border:1px solid var(--color-border); border-radius:var(--radius-sm); padding:8px 10px; font-size:14px; font-family:inherit; transition:var(--transition); }
input:focus,textarea:focus { outline:none; border-color:var(--color-accent); }
.hp-field { position:absolute; left:-9999px; top:-9999px; }
.submit-btn { align-self:flex-start; background:var(--color-accent); color:#fff; border:none; border-radius:var(--radius-sm); padding:10px 22px; font-size:14px; cursor:pointer; transition:var(--transition); }
.submit-btn:hover { background:var(--color-accent-dark); }
.submit-btn:disabled { opacity:.55; cursor:not-allowed; }
.footer { padding:18px 22px; font-size:12px; color:var(--color-text-dim); border-top:1px solid var(--color-border); text-align:center; }
"#;

/// Literal user-facing fallbacks for regions that fail to load.
const LIST_ERROR: &str = "Could not load the blog posts.";
const POST_ERROR: &str = "Could not load the blog post.";
const POST_MISSING_ID: &str = "No blog post identifier was given.";
const POST_NOT_FOUND: &str = "The requested blog post could not be found.";
const NO_CONTENT: &str = "No content is available in this language.";

const NAV_ITEMS: [(&str, &str, &str); 3] = [
    ("index", "nav.home", "Home"),
    ("blog", "nav.blog", "Blog"),
    ("contact", "nav.contact", "Contact"),
];

/// Immutable wiring shared by every handler, set once before launch.
struct Boot {
    content: ContentSource,
    translations: TranslationStore,
    jar: CookieJar,
    mailer: Mailer,
    start: Location,
    start_lang: Lang,
}

static BOOT: OnceCell<Boot> = OnceCell::new();

fn boot() -> &'static Boot {
    BOOT.get().expect("boot wiring set before launch")
}

/// Resolve startup state and hand control to the desktop event loop.
pub fn run(cfg: SiteConfig) -> Result<()> {
    let jar = CookieJar::open(cfg.profile_dir.join("cookies.txt"));
    let start = cfg
        .start_url
        .as_ref()
        .map(|url| route::parse_href(url.as_str()))
        .unwrap_or_else(Location::home);
    let start_lang = lang::resolve(start.lang.as_deref(), &jar);
    let wiring = Boot {
        translations: TranslationStore::new(cfg.content.clone()),
        content: cfg.content,
        jar,
        mailer: cfg.mailer,
        start,
        start_lang,
    };
    BOOT.set(wiring).ok();
    dioxus_desktop::launch::launch(
        app,
        vec![],
        vec![Box::new(dioxus_desktop::Config::default())],
    );
}

/// Everything the view renders from; one instance behind a signal.
struct AppState {
    lang: Lang,
    dict: Option<Arc<Dictionary>>,
    route: Route,
    menu_open: bool,
    list: Option<ListView>,
    post: Option<PostView>,
    form: ContactFields,
    sending: bool,
}

/// Blog list region states.
enum ListView {
    Ready(Vec<Post>),
    Failed,
}

/// Blog detail region states; missing-id and not-found are distinct
/// terminal states, not errors.
enum PostView {
    MissingId,
    Ready(Box<Post>),
    NotFound,
    Failed,
}

impl AppState {
    fn new() -> Self {
        let wiring = boot();
        Self {
            lang: wiring.start_lang,
            dict: None,
            route: wiring.start.route.clone(),
            menu_open: false,
            list: None,
            post: None,
            form: ContactFields::default(),
            sending: false,
        }
    }

    /// Dictionary text for `key`, or the element's built-in text.
    fn text(&self, key: &str, fallback: &str) -> String {
        self.dict
            .as_deref()
            .and_then(|d| d.lookup(key, self.lang))
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Root component: top bar, the active page and the shared footer.
fn app() -> Element {
    let mut st: Signal<AppState> = use_signal(AppState::new);

    // Page-load hook: translations always, page data when the page shows it.
    let start_route = boot().start.route.clone();
    use_future(move || {
        let route = start_route.clone();
        async move {
            load_static_text(st);
            match route {
                Route::Blog => load_blog_list(st),
                Route::Post { id } => load_blog_post(st, id),
                _ => {}
            }
        }
    });

    // 动态窗口标题: 跟随当前语言
    let window = dioxus_desktop::use_window();
    {
        let win = window.clone();
        use_effect(move || {
            let title = st.read().text("site.title", "Hillside Garden Studio");
            win.set_title(&title);
        });
    }

    let route = st.read().route.clone();
    let menu_open = st.read().menu_open;
    rsx! {
        div { class: "shell",
            style { {GLOBAL_CSS} },
            header { class: "topbar",
                span { class: "brand", dangerous_inner_html: st.read().text("site.brand", "Hillside Garden Studio") }
                nav { class: "nav-desktop", {nav_links(st)} }
                {lang_switcher(st)}
                button {
                    class: "menu-btn",
                    onclick: move |_| {
                        let open = st.read().menu_open;
                        st.write().menu_open = !open;
                    },
                    "☰"
                }
            }
            div {
                class: "mobile-menu",
                style: format!("display:{};", if menu_open { "flex" } else { "none" }),
                {nav_links(st)}
            }
            main { class: "content",
                { match route {
                    Route::Home => home_page(st),
                    Route::Blog => blog_page(st),
                    Route::Post { .. } => post_page(st),
                    Route::Contact => contact_page(st),
                } }
            }
            footer { class: "footer", dangerous_inner_html: st.read().text("site.footer", "© Hillside Garden Studio") }
        }
    }
}

fn nav_links(st: Signal<AppState>) -> Element {
    rsx! {
        { NAV_ITEMS.iter().map(|(href, key, fallback)| {
            let label = st.read().text(key, fallback);
            let target = *href;
            rsx!( a {
                key: "{target}",
                class: "nav-link",
                onclick: move |_| open_page(st, target),
                dangerous_inner_html: "{label}"
            } )
        }) }
    }
}

fn lang_switcher(st: Signal<AppState>) -> Element {
    let current = st.read().lang;
    rsx! {
        div { class: "lang-switcher",
            { Lang::ALL.iter().map(|&l| {
                let class = if l == current { "lang-btn active" } else { "lang-btn" };
                rsx!( button {
                    key: "{l}",
                    class: class,
                    onclick: move |_| switch_lang(st, l),
                    { l.label() }
                } )
            }) }
        }
    }
}

fn home_page(st: Signal<AppState>) -> Element {
    let r = st.read();
    rsx! {
        section { class: "hero",
            h1 { dangerous_inner_html: r.text("home.title", "Gardens that belong to their hillside") }
            p { class: "lead", dangerous_inner_html: r.text("home.lead", "From design to planting, near-natural gardens in Transylvania.") }
        }
        section { class: "page",
            h2 { dangerous_inner_html: r.text("about.title", "About us") }
            p { dangerous_inner_html: r.text("about.body", "We plan, build and keep alive gardens that fit their slope, soil and people.") }
        }
    }
}

fn blog_page(st: Signal<AppState>) -> Element {
    let lang = st.read().lang;
    rsx! {
        section { class: "page",
            h2 { dangerous_inner_html: st.read().text("blog.title", "Blog") }
            div { class: "blog-grid",
                { match &st.read().list {
                    None => rsx! {},
                    Some(ListView::Failed) => rsx!( p { class: "muted", {LIST_ERROR} } ),
                    Some(ListView::Ready(posts)) => rsx!( {
                        posts.iter().map(|post| {
                            let id = post.id.to_string();
                            let title = post.title_for(lang).to_string();
                            let href = route::post_href(&post.id, lang);
                            let image = image_url(&post.image);
                            rsx!( div {
                                key: "{id}",
                                class: "blog-card",
                                onclick: move |_| open_page(st, &href),
                                div { class: "blog-card-image",
                                    img { src: "{image}", alt: "{title}" }
                                }
                                div { class: "blog-card-content",
                                    h3 { dangerous_inner_html: "{title}" }
                                }
                            } )
                        })
                    } ),
                } }
            }
        }
    }
}

fn post_page(st: Signal<AppState>) -> Element {
    let lang = st.read().lang;
    rsx! {
        section { class: "page",
            { match &st.read().post {
                None => rsx! {},
                Some(PostView::MissingId) => rsx!( p { class: "muted", {POST_MISSING_ID} } ),
                Some(PostView::NotFound) => rsx!( p { class: "muted", {POST_NOT_FOUND} } ),
                Some(PostView::Failed) => rsx!( p { class: "muted", {POST_ERROR} } ),
                Some(PostView::Ready(post)) => {
                    let title = post.title_for(lang).to_string();
                    let image = image_url(&post.image);
                    let body = post.content_html(lang);
                    rsx!(
                        h1 { class: "post-title", dangerous_inner_html: "{title}" }
                        img { class: "post-image", src: "{image}", alt: "{title}" }
                        div { class: "post-content",
                            { match body {
                                Some(html) => rsx!( div { dangerous_inner_html: "{html}" } ),
                                None => rsx!( p { class: "muted", {NO_CONTENT} } ),
                            } }
                        }
                    )
                }
            } }
        }
    }
}

fn contact_page(mut st: Signal<AppState>) -> Element {
    let sending = st.read().sending;
    let submit_label = if sending {
        st.read().text("contact.sending", "Sending…")
    } else {
        st.read().text("contact.submit", "Send message")
    };
    rsx! {
        section { class: "page",
            h2 { dangerous_inner_html: st.read().text("contact.title", "Contact") }
            p { class: "lead", dangerous_inner_html: st.read().text("contact.lead", "Tell us about your garden.") }
            div { class: "contact-form",
                div { class: "form-row",
                    input {
                        placeholder: st.read().text("form.last_name", "Last name"),
                        value: st.read().form.last_name.clone(),
                        oninput: move |e| st.write().form.last_name = e.value(),
                    }
                    input {
                        placeholder: st.read().text("form.first_name", "First name"),
                        value: st.read().form.first_name.clone(),
                        oninput: move |e| st.write().form.first_name = e.value(),
                    }
                }
                input {
                    r#type: "email",
                    placeholder: st.read().text("form.email", "E-mail"),
                    value: st.read().form.email.clone(),
                    oninput: move |e| st.write().form.email = e.value(),
                }
                input {
                    r#type: "tel",
                    placeholder: st.read().text("form.phone", "Phone (optional)"),
                    value: st.read().form.phone.clone(),
                    oninput: move |e| st.write().form.phone = e.value(),
                }
                textarea {
                    rows: "6",
                    placeholder: st.read().text("form.message", "Message"),
                    value: st.read().form.message.clone(),
                    oninput: move |e| st.write().form.message = e.value(),
                }
                // honeypot: off-screen, never shown to visitors
                input {
                    class: "hp-field",
                    tabindex: "-1",
                    autocomplete: "off",
                    placeholder: "Website",
                    value: st.read().form.website.clone(),
                    oninput: move |e| st.write().form.website = e.value(),
                }
                button {
                    class: "submit-btn",
                    disabled: sending,
                    onclick: move |_| submit_contact(st),
                    {submit_label}
                }
            }
        }
    }
}

/// Navigate to an in-app href: re-resolve the language from the href,
/// then run the same loads a fresh page view would.
fn open_page(mut st: Signal<AppState>, href: &str) {
    debug!("navigate to {href}");
    let location = route::parse_href(href);
    let lang = lang::resolve(location.lang.as_deref(), &boot().jar);
    {
        let mut w = st.write();
        w.lang = lang;
        w.route = location.route.clone();
        w.menu_open = false;
        w.list = None;
        w.post = None;
    }
    load_static_text(st);
    match location.route {
        Route::Blog => load_blog_list(st),
        Route::Post { id } => load_blog_post(st, id),
        _ => {}
    }
}

/// Language switcher click: persist the selection, reapply the memoized
/// dictionary and re-run the active page's loads.
fn switch_lang(mut st: Signal<AppState>, lang: Lang) {
    boot().jar.persist_lang(lang);
    st.write().lang = lang;
    load_static_text(st);
    let route = st.read().route.clone();
    match route {
        Route::Blog => load_blog_list(st),
        Route::Post { id } => load_blog_post(st, id),
        _ => {}
    }
}

/// Page-load text fill: the first call fetches, every later one reuses
/// the memoized dictionary.
fn load_static_text(mut st: Signal<AppState>) {
    let store = &boot().translations;
    spawn(async move {
        if let Some(dict) = store.load().await {
            st.write().dict = Some(dict);
        }
    });
}

fn load_blog_list(mut st: Signal<AppState>) {
    let content = &boot().content;
    spawn(async move {
        match blog::load_posts(content).await {
            Ok(posts) => st.write().list = Some(ListView::Ready(posts)),
            Err(e) => {
                error!("failed to load blog list from {content}: {e}");
                st.write().list = Some(ListView::Failed);
            }
        }
    });
}

fn load_blog_post(mut st: Signal<AppState>, id: Option<PostId>) {
    let Some(id) = id else {
        // terminal: no identifier means no fetch either
        st.write().post = Some(PostView::MissingId);
        return;
    };
    let content = &boot().content;
    spawn(async move {
        match blog::load_posts(content).await {
            Ok(posts) => {
                let view = match blog::find_post(&posts, &id) {
                    Some(post) => PostView::Ready(Box::new(post.clone())),
                    None => {
                        warn!("blog post {id} not found");
                        PostView::NotFound
                    }
                };
                st.write().post = Some(view);
            }
            Err(e) => {
                error!("failed to load blog post {id} from {content}: {e}");
                st.write().post = Some(PostView::Failed);
            }
        }
    });
}

/// Submit-button click: honeypot gate, busy state, delivery, dialog.
fn submit_contact(mut st: Signal<AppState>) {
    if st.read().sending {
        return;
    }
    let fields = st.read().form.clone();
    if fields.is_spam() {
        // silent drop, nothing shown to the visitor
        warn!("honeypot field filled; dropping submission");
        return;
    }
    let success_msg = st.read().text("contact.sent", "Thank you! Your message was sent.");
    let failure_msg = st.read().text(
        "contact.failed",
        "Something went wrong while sending. Please try again!",
    );
    st.write().sending = true;
    let mailer = &boot().mailer;
    spawn(async move {
        let payload = fields.payload();
        match mailer.send(&payload).await {
            Ok(()) => {
                st.write().form.clear();
                message_dialog(success_msg, rfd::MessageLevel::Info);
            }
            Err(e) => {
                error!("email delivery failed: {e}");
                message_dialog(failure_msg, rfd::MessageLevel::Error);
            }
        }
        // the submit control comes back on every path
        st.write().sending = false;
    });
}

/// Blocking rfd dialog on its own thread so the UI loop keeps running.
fn message_dialog(text: String, level: rfd::MessageLevel) {
    std::thread::spawn(move || {
        let _ = rfd::MessageDialog::new()
            .set_title("Hillside")
            .set_description(text)
            .set_level(level)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    });
}

/// Webview-renderable image location with the placeholder fallback.
fn image_url(image: &str) -> String {
    let content = &boot().content;
    content.display_url(&blog::resolve_image(content, image))
}
