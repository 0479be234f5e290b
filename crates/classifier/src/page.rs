//! Page-type inference

use crate::openrtb::Site;
use bidroute_core::PageType;
use url::Url;

/// Explicit page type first, then keywords in the page URL path
pub fn infer_page_type(site: Option<&Site>) -> Option<PageType> {
    let site = site?;

    let explicit = site
        .ext
        .as_ref()
        .and_then(|ext| ext.data.as_ref())
        .and_then(|data| data.pagetype.as_deref())
        .filter(|label| !label.trim().is_empty());
    if let Some(label) = explicit {
        return Some(PageType::from_label(label));
    }

    site.page.as_deref().and_then(page_type_from_url)
}

/// Keyword match on the URL path
pub fn page_type_from_url(page: &str) -> Option<PageType> {
    let url = Url::parse(page).ok()?;
    let path = url.path().to_ascii_lowercase();

    if ["/article", "/news", "/post"].iter().any(|k| path.contains(k)) {
        Some(PageType::Article)
    } else if path.is_empty() || path.ends_with('/') {
        Some(PageType::Homepage)
    } else if ["/category", "/section"].iter().any(|k| path.contains(k)) {
        Some(PageType::Section)
    } else if path.contains("/search") {
        Some(PageType::Search)
    } else if ["/video", "/watch"].iter().any(|k| path.contains(k)) {
        Some(PageType::Video)
    } else {
        None
    }
}
