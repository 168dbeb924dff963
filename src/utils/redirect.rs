// src/utils/redirect.rs

use url::Url;

/// Stand-in origin used to resolve relative targets.
const LOCAL_ORIGIN: &str = "http://quizr.invalid/";

/// Resolves a user-supplied redirect target to a path on this site.
///
/// Anything that would leave the site (absolute URLs to other hosts,
/// protocol-relative `//host` targets, other schemes) falls back to `/`.
pub fn local_redirect(target: Option<&str>) -> String {
    let Some(target) = target.filter(|t| !t.trim().is_empty()) else {
        return "/".to_string();
    };

    let Ok(base) = Url::parse(LOCAL_ORIGIN) else {
        return "/".to_string();
    };

    match base.join(target) {
        Ok(url) if url.origin() == base.origin() => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        _ => "/".to_string(),
    }
}
