//! Language identity, resolution order and cookie persistence.
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use log::warn;
use parking_lot::RwLock;

/// Languages the site ships content for. `Hu` is the site default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    Hu,
    Ro,
    En,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Hu, Lang::Ro, Lang::En];

    /// Two-letter code used in hrefs, the cookie and content JSON.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Hu => "hu",
            Lang::Ro => "ro",
            Lang::En => "en",
        }
    }

    /// Switcher button label.
    pub fn label(self) -> &'static str {
        match self {
            Lang::Hu => "HU",
            Lang::Ro => "RO",
            Lang::En => "EN",
        }
    }

    /// Parse a code; anything outside the supported set is `None`.
    pub fn from_code(code: &str) -> Option<Lang> {
        Lang::ALL.iter().copied().find(|l| l.code() == code)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Cookie record carrying the selected language.
const LANG_COOKIE: &str = "lang";
/// Selection lifetime: one year.
const LANG_COOKIE_DAYS: i64 = 365;

/// Resolve the active language with precedence URL parameter > cookie >
/// default. Unknown or invalid codes fall through to the next source;
/// this can never fail.
pub fn resolve(url_param: Option<&str>, jar: &CookieJar) -> Lang {
    if let Some(lang) = url_param.and_then(Lang::from_code) {
        return lang;
    }
    if let Some(lang) = jar.get(LANG_COOKIE).as_deref().and_then(Lang::from_code) {
        return lang;
    }
    Lang::default()
}

#[derive(Debug, Clone, PartialEq)]
struct Cookie {
    value: String,
    expires: Option<DateTime<Utc>>,
    path: String,
}

/// File-backed cookie jar, the desktop stand-in for `document.cookie`.
///
/// One record per line: `name=value; expires=<rfc2822>; path=/`.
/// Unreadable files and malformed lines are skipped; save failures are
/// logged and swallowed so persistence can never take the UI down.
pub struct CookieJar {
    path: PathBuf,
    entries: RwLock<HashMap<String, Cookie>>,
}

impl CookieJar {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = HashMap::new();
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                for line in raw.lines().filter(|l| !l.trim().is_empty()) {
                    match parse_cookie(line) {
                        Some((name, cookie)) => {
                            entries.insert(name, cookie);
                        }
                        None => warn!("skipping malformed cookie line in {}", path.display()),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not read cookie jar {}: {e}", path.display()),
        }
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Value stored under `name`, unless the record has expired.
    pub fn get(&self, name: &str) -> Option<String> {
        let entries = self.entries.read();
        let cookie = entries.get(name)?;
        if let Some(expires) = cookie.expires {
            if expires <= Utc::now() {
                return None;
            }
        }
        Some(cookie.value.clone())
    }

    /// Store the language selection: one-year expiry, root path. Called on
    /// explicit user selection only.
    pub fn persist_lang(&self, lang: Lang) {
        self.set(
            LANG_COOKIE,
            lang.code(),
            Utc::now() + Duration::days(LANG_COOKIE_DAYS),
        );
    }

    fn set(&self, name: &str, value: &str, expires: DateTime<Utc>) {
        self.entries.write().insert(
            name.to_string(),
            Cookie {
                value: value.to_string(),
                expires: Some(expires),
                path: "/".into(),
            },
        );
        self.save();
    }

    fn save(&self) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!("could not create profile dir {}: {e}", dir.display());
                return;
            }
        }
        let entries = self.entries.read();
        let mut out = String::new();
        for (name, cookie) in entries.iter() {
            out.push_str(&format_cookie(name, cookie));
            out.push('\n');
        }
        drop(entries);
        if let Err(e) = std::fs::write(&self.path, out) {
            warn!("could not write cookie jar {}: {e}", self.path.display());
        }
    }
}

fn format_cookie(name: &str, cookie: &Cookie) -> String {
    let mut line = format!("{name}={}", cookie.value);
    if let Some(expires) = cookie.expires {
        line.push_str("; expires=");
        line.push_str(&expires.to_rfc2822());
    }
    line.push_str("; path=");
    line.push_str(&cookie.path);
    line
}

fn parse_cookie(line: &str) -> Option<(String, Cookie)> {
    let mut parts = line.split(';').map(str::trim);
    let (name, value) = parts.next()?.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    let mut cookie = Cookie {
        value: value.to_string(),
        expires: None,
        path: "/".into(),
    };
    for attr in parts {
        if let Some((key, val)) = attr.split_once('=') {
            match key.to_ascii_lowercase().as_str() {
                "expires" => {
                    cookie.expires = DateTime::parse_from_rfc2822(val)
                        .ok()
                        .map(|t| t.with_timezone(&Utc));
                }
                "path" => cookie.path = val.to_string(),
                _ => {}
            }
        }
    }
    Some((name.to_string(), cookie))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jar_in(dir: &tempfile::TempDir) -> CookieJar {
        CookieJar::open(dir.path().join("cookies.txt"))
    }

    #[test]
    fn url_param_wins_over_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let jar = jar_in(&dir);
        jar.persist_lang(Lang::En);
        assert_eq!(resolve(Some("ro"), &jar), Lang::Ro);
    }

    #[test]
    fn invalid_param_falls_through_to_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let jar = jar_in(&dir);
        jar.persist_lang(Lang::En);
        assert_eq!(resolve(Some("de"), &jar), Lang::En);
    }

    #[test]
    fn default_when_nothing_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let jar = jar_in(&dir);
        assert_eq!(resolve(None, &jar), Lang::Hu);
    }

    #[test]
    fn persisted_selection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        jar_in(&dir).persist_lang(Lang::Ro);
        let reopened = jar_in(&dir);
        assert_eq!(resolve(None, &reopened), Lang::Ro);
    }

    #[test]
    fn lang_cookie_has_year_expiry_and_root_path() {
        let dir = tempfile::tempdir().unwrap();
        jar_in(&dir).persist_lang(Lang::Hu);
        let raw = std::fs::read_to_string(dir.path().join("cookies.txt")).unwrap();
        let (name, cookie) = parse_cookie(raw.trim()).unwrap();
        assert_eq!(name, "lang");
        assert_eq!(cookie.value, "hu");
        assert_eq!(cookie.path, "/");
        let expires = cookie.expires.unwrap();
        assert!(expires > Utc::now() + Duration::days(360));
        assert!(expires < Utc::now() + Duration::days(370));
    }

    #[test]
    fn expired_cookie_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        let stale = Utc::now() - Duration::days(1);
        std::fs::write(&path, format!("lang=en; expires={}; path=/\n", stale.to_rfc2822())).unwrap();
        let jar = CookieJar::open(&path);
        assert_eq!(jar.get("lang"), None);
        assert_eq!(resolve(None, &jar), Lang::Hu);
    }

    #[test]
    fn unknown_cookie_value_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        std::fs::write(&path, "lang=xx; path=/\n").unwrap();
        let jar = CookieJar::open(&path);
        assert_eq!(resolve(None, &jar), Lang::Hu);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        std::fs::write(&path, "not a cookie\nlang=ro; path=/\n").unwrap();
        let jar = CookieJar::open(&path);
        assert_eq!(jar.get("lang").as_deref(), Some("ro"));
    }
}
