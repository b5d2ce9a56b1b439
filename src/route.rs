//! Page hrefs.
//!
//! Navigation keeps the deployed site's vocabulary: page names (`index`,
//! `blog`, `blog-post`, `contact`, a trailing `.html` accepted) plus `id`
//! and `lang` query parameters. Deep links from the command line and
//! in-app hrefs go through the same parser.
use log::debug;
use url::Url;

use crate::blog::PostId;
use crate::lang::Lang;

/// Synthetic base so relative hrefs parse with the `url` crate.
const APP_BASE: &str = "app://site/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Blog,
    Post { id: Option<PostId> },
    Contact,
}

/// A parsed href: destination page plus the raw language override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub lang: Option<String>,
}

impl Location {
    pub fn home() -> Self {
        Location {
            route: Route::Home,
            lang: None,
        }
    }
}

pub fn parse_href(href: &str) -> Location {
    let parsed = if href.contains("://") {
        Url::parse(href)
    } else {
        Url::parse(APP_BASE).and_then(|base| base.join(href))
    };
    let url = match parsed {
        Ok(url) => url,
        Err(e) => {
            debug!("unparseable href {href:?} ({e}); falling back to index");
            return Location::home();
        }
    };

    let page = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");
    let page = page.strip_suffix(".html").unwrap_or(page);

    let mut id = None;
    let mut lang = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "id" => id = Some(PostId::from(value.as_ref())),
            "lang" => lang = Some(value.into_owned()),
            _ => {}
        }
    }

    let route = match page {
        "" | "index" => Route::Home,
        "blog" => Route::Blog,
        "blog-post" => Route::Post { id },
        "contact" => Route::Contact,
        other => {
            debug!("unknown page {other:?}; falling back to index");
            Route::Home
        }
    };
    Location { route, lang }
}

/// Card link to the detail page, carrying the post id and the active
/// language as query parameters.
pub fn post_href(id: &PostId, lang: Lang) -> String {
    format!("blog-post?id={id}&lang={lang}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_page_names_parse() {
        assert_eq!(parse_href("index").route, Route::Home);
        assert_eq!(parse_href("blog").route, Route::Blog);
        assert_eq!(parse_href("contact").route, Route::Contact);
    }

    #[test]
    fn html_suffix_is_accepted() {
        assert_eq!(parse_href("blog.html").route, Route::Blog);
    }

    #[test]
    fn detail_href_carries_id_and_lang() {
        let location = parse_href("blog-post?id=5&lang=ro");
        assert_eq!(
            location.route,
            Route::Post {
                id: Some(PostId::from("5"))
            }
        );
        assert_eq!(location.lang.as_deref(), Some("ro"));
    }

    #[test]
    fn detail_href_without_id_is_preserved_as_missing() {
        assert_eq!(parse_href("blog-post").route, Route::Post { id: None });
    }

    #[test]
    fn absolute_deep_links_parse_like_hrefs() {
        let location = parse_href("https://example.com/blog-post.html?id=7&lang=en");
        assert_eq!(
            location.route,
            Route::Post {
                id: Some(PostId::from("7"))
            }
        );
        assert_eq!(location.lang.as_deref(), Some("en"));
    }

    #[test]
    fn unknown_pages_fall_back_to_index() {
        let location = parse_href("pricing?lang=en");
        assert_eq!(location.route, Route::Home);
        // the language override still applies
        assert_eq!(location.lang.as_deref(), Some("en"));
    }

    #[test]
    fn card_href_round_trips() {
        let href = post_href(&PostId::from("12"), Lang::En);
        assert_eq!(href, "blog-post?id=12&lang=en");
        let location = parse_href(&href);
        assert_eq!(
            location.route,
            Route::Post {
                id: Some(PostId::from("12"))
            }
        );
        assert_eq!(location.lang.as_deref(), Some("en"));
    }
}
