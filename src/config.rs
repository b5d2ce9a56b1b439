//! Environment-driven application settings.
use std::env;
use std::path::PathBuf;

use log::warn;
use url::Url;

use crate::contact::Mailer;
use crate::content::ContentSource;

/// Bundled fallback content directory.
const DEFAULT_CONTENT_DIR: &str = "content";
/// The cookie jar lives here unless overridden.
const DEFAULT_PROFILE_DIR: &str = ".profile";

/// Delivery-service identifiers shipped with the client. The exposure is
/// inherent to a client-only contact form; all of them can be overridden
/// through the environment.
const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
const EMAILJS_SERVICE_ID: &str = "service_wlz0mh8";
const EMAILJS_TEMPLATE_ID: &str = "template_htc2v29";
const EMAILJS_PUBLIC_KEY: &str = "8PzqWJb02TklyGdHs";

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Optional page deep link taken from the command line.
    pub start_url: Option<Url>,
    pub content: ContentSource,
    pub profile_dir: PathBuf,
    pub mailer: Mailer,
}

impl SiteConfig {
    /// Build from the process environment and arguments. Every setting
    /// has a default; nothing here can fail the launch.
    pub fn from_env() -> Self {
        let start_url = env::args().nth(1).and_then(|arg| match Url::parse(&arg) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("ignoring malformed start url {arg:?}: {e}");
                None
            }
        });
        let content = content_source(start_url.as_ref());
        let profile_dir = env::var("SITE_PROFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROFILE_DIR));
        let mailer = Mailer {
            endpoint: env_or("EMAILJS_ENDPOINT", EMAILJS_ENDPOINT),
            service_id: env_or("EMAILJS_SERVICE_ID", EMAILJS_SERVICE_ID),
            template_id: env_or("EMAILJS_TEMPLATE_ID", EMAILJS_TEMPLATE_ID),
            public_key: env_or("EMAILJS_PUBLIC_KEY", EMAILJS_PUBLIC_KEY),
        };
        Self {
            start_url,
            content,
            profile_dir,
            mailer,
        }
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Content root precedence: `SITE_BASE` (URL or directory) > the deep
/// link's site root > the bundled content directory.
fn content_source(start_url: Option<&Url>) -> ContentSource {
    if let Ok(base) = env::var("SITE_BASE") {
        if base.starts_with("http://") || base.starts_with("https://") {
            match Url::parse(&base) {
                Ok(mut url) => {
                    // resources join against a directory
                    if !url.path().ends_with('/') {
                        url.set_path(&format!("{}/", url.path()));
                    }
                    return ContentSource::Remote(url);
                }
                Err(e) => warn!("ignoring malformed SITE_BASE {base:?}: {e}"),
            }
        } else {
            return ContentSource::Local(PathBuf::from(base));
        }
    }
    if let Some(url) = start_url {
        if let Ok(root) = url.join("/") {
            return ContentSource::Remote(root);
        }
    }
    ContentSource::Local(PathBuf::from(DEFAULT_CONTENT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn deep_link_supplies_the_site_root() {
        env::remove_var("SITE_BASE");
        let page = Url::parse("https://example.com/service/blog.html?lang=ro").unwrap();
        match content_source(Some(&page)) {
            ContentSource::Remote(root) => assert_eq!(root.as_str(), "https://example.com/"),
            other => panic!("expected a remote root, got {other:?}"),
        }
    }

    #[test]
    fn bundled_content_is_the_last_resort() {
        env::remove_var("SITE_BASE");
        match content_source(None) {
            ContentSource::Local(dir) => assert_eq!(dir, Path::new(DEFAULT_CONTENT_DIR)),
            other => panic!("expected the bundled directory, got {other:?}"),
        }
    }
}
