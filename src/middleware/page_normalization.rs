//! Canonical redirects for paginated listing URLs.
//!
//! `/todos/1` is the same page as `/`, and `/localizados/1` the same as
//! `/localizados`. Page numbers of zero are folded into the same targets.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

/// Leading path fragments the rule never looks at.
const EXCLUDED: [&str; 4] = ["api", "_next/static", "_next/image", "favicon.ico"];

/// Listing prefixes and the canonical URL of their first page.
const LISTINGS: [(&str, &str); 2] = [("/todos/", "/"), ("/localizados/", "/localizados")];

/// Path matcher: which request paths are evaluated at all.
pub fn is_matched(path: &str) -> bool {
    let rest = path.trim_start_matches('/');
    !EXCLUDED.iter().any(|prefix| rest.starts_with(prefix))
}

/// Redirect target for a redundant page URL, or `None` to pass through.
pub fn canonical_redirect(path: &str) -> Option<&'static str> {
    LISTINGS.iter().find_map(|(prefix, target)| {
        let digits = path.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Digit strings beyond u64 are large pages, not page one.
        match digits.parse::<u64>() {
            Ok(page) if page <= 1 => Some(*target),
            _ => None,
        }
    })
}

pub async fn normalize_pages(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_matched(path) {
        if let Some(target) = canonical_redirect(path) {
            debug!(from = path, to = target, "redirecting to canonical page");
            return Redirect::temporary(target).into_response();
        }
    }
    next.run(request).await
}
