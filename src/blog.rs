//! Blog post model and per-language selection rules.
use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::content::{ContentError, ContentSource};
use crate::lang::Lang;

/// Resource name under the content root.
const POSTS_RESOURCE: &str = "blog-posts.json";
/// Substitute asset for unresolvable post images.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.svg";
/// Title shown when a post has no usable localization at all.
pub const UNTITLED: &str = "Untitled";

/// Post identifier.
///
/// The collection JSON carries ids loosely (numbers in some entries,
/// strings in others); both normalize to the same string form here, so
/// lookup is a plain equality instead of a coercing comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawId")]
pub struct PostId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for PostId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => PostId(n.to_string()),
            RawId::Text(s) => PostId(s),
        }
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: HashMap<String, String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: HashMap<String, Vec<String>>,
}

impl Post {
    /// Title for `lang`: exact language, site default, then `Untitled`.
    pub fn title_for(&self, lang: Lang) -> &str {
        localized(&self.title, lang)
            .map(String::as_str)
            .unwrap_or(UNTITLED)
    }

    /// Ordered HTML blocks for `lang` (exact language, then site
    /// default); `None` when neither carries content.
    pub fn blocks_for(&self, lang: Lang) -> Option<&[String]> {
        localized(&self.content, lang).map(Vec::as_slice)
    }

    /// Detail-page body: every block concatenated in array order.
    pub fn content_html(&self, lang: Lang) -> Option<String> {
        self.blocks_for(lang).map(|blocks| blocks.concat())
    }
}

fn localized<T>(map: &HashMap<String, T>, lang: Lang) -> Option<&T> {
    map.get(lang.code())
        .or_else(|| map.get(Lang::default().code()))
}

/// Fetch the full post collection, array order preserved.
pub async fn load_posts(source: &ContentSource) -> Result<Vec<Post>, ContentError> {
    source.fetch_json(POSTS_RESOURCE).await
}

/// First post matching `id`.
pub fn find_post<'a>(posts: &'a [Post], id: &PostId) -> Option<&'a Post> {
    posts.iter().find(|p| &p.id == id)
}

/// Image reference for a card or detail view.
///
/// Empty references and references missing from a local content root
/// resolve to the placeholder. Resolving the placeholder itself is the
/// identity, which bounds the substitution to exactly one step.
pub fn resolve_image(source: &ContentSource, image: &str) -> String {
    if image == PLACEHOLDER_IMAGE {
        return image.to_string();
    }
    if image.is_empty() || !source.resource_exists(image) {
        return PLACEHOLDER_IMAGE.to_string();
    }
    image.to_string()
}
