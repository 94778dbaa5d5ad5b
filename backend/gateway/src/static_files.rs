//! Static asset server for the browser front end.

use tower_http::services::ServeDir;

/// Service serving files from `dir`; directory paths resolve to their
/// `index.html`.
///
/// Returns `None` when no directory is configured.
pub fn static_router(dir: &str) -> Option<ServeDir> {
    let dir = dir.trim();
    if dir.is_empty() {
        return None;
    }
    Some(ServeDir::new(dir).append_index_html_on_directories(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_dir_disables_static_hosting() {
        assert!(static_router("").is_none());
        assert!(static_router("  ").is_none());
        assert!(static_router("public").is_some());
    }
}
