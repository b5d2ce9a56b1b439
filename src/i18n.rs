//! Translation dictionary: one fetch per session, then lookups only.
use std::collections::HashMap;
use std::sync::Arc;

use log::error;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::content::ContentSource;
use crate::lang::Lang;

/// Resource name under the content root.
const DICTIONARY_RESOURCE: &str = "lang.json";

/// key -> language code -> localized text (plain or an HTML fragment).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Dictionary(HashMap<String, HashMap<String, String>>);

impl Dictionary {
    /// Localized text for `key`: the exact language first, the site
    /// default second, `None` past that (callers keep their built-in
    /// text).
    pub fn lookup(&self, key: &str, lang: Lang) -> Option<&str> {
        let entry = self.0.get(key)?;
        entry
            .get(lang.code())
            .or_else(|| entry.get(Lang::default().code()))
            .map(String::as_str)
    }
}

/// Session-scoped dictionary cache.
///
/// The first successful load is memoized; every later call, typically a
/// language switch, reuses it without touching the network. A failed load
/// memoizes nothing, so the next trigger fetches again.
pub struct TranslationStore {
    source: ContentSource,
    cached: OnceCell<Arc<Dictionary>>,
}

impl TranslationStore {
    pub fn new(source: ContentSource) -> Self {
        Self {
            source,
            cached: OnceCell::new(),
        }
    }

    /// Fetch-once accessor. Failures are logged and reported as `None`;
    /// the UI then stays on its built-in texts. No retry is scheduled.
    pub async fn load(&self) -> Option<Arc<Dictionary>> {
        let loaded = self
            .cached
            .get_or_try_init(|| async {
                self.source
                    .fetch_json::<Dictionary>(DICTIONARY_RESOURCE)
                    .await
                    .map(Arc::new)
            })
            .await;
        match loaded {
            Ok(dict) => Some(dict.clone()),
            Err(e) => {
                error!("failed to load {DICTIONARY_RESOURCE} from {}: {e}", self.source);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dict(raw: &str) -> Dictionary {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn lookup_prefers_the_exact_language() {
        let d = dict(r#"{"greet":{"hu":"Szia","en":"Hello"}}"#);
        assert_eq!(d.lookup("greet", Lang::En), Some("Hello"));
        assert_eq!(d.lookup("greet", Lang::Hu), Some("Szia"));
    }

    #[test]
    fn lookup_falls_back_to_the_site_default() {
        let d = dict(r#"{"greet":{"hu":"Szia"}}"#);
        assert_eq!(d.lookup("greet", Lang::Ro), Some("Szia"));
    }

    #[test]
    fn lookup_misses_unknown_keys_and_languages() {
        let d = dict(r#"{"greet":{"en":"Hello"}}"#);
        assert_eq!(d.lookup("absent", Lang::En), None);
        // no exact entry and no site-default entry either
        assert_eq!(d.lookup("greet", Lang::Ro), None);
    }

    #[tokio::test]
    async fn successful_load_is_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.json");
        std::fs::write(&path, r#"{"greet":{"hu":"Szia"}}"#).unwrap();
        let store = TranslationStore::new(ContentSource::Local(dir.path().to_path_buf()));

        let first = store.load().await.unwrap();
        // removing the backing file proves later calls never re-fetch
        std::fs::remove_file(&path).unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failed_load_is_not_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.json");
        let store = TranslationStore::new(ContentSource::Local(dir.path().to_path_buf()));

        assert!(store.load().await.is_none());
        std::fs::write(&path, r#"{"greet":{"hu":"Szia"}}"#).unwrap();
        let dict = store.load().await.unwrap();
        assert_eq!(dict.lookup("greet", Lang::Hu), Some("Szia"));
    }
}
