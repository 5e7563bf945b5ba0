//! Navigation seam.
//!
//! The pipeline and the watchdog both end sessions by sending the user to
//! the login entry point. Navigation itself belongs to the embedding shell
//! (webview, desktop window, test harness), so it is modeled as a trait the
//! shell implements and registers at construction time.

use url::form_urlencoded;

/// Performs full navigations on behalf of the session core.
pub trait Navigator: Send + Sync {
    /// The path the user is currently on, used as the return target after
    /// forced re-authentication.
    fn current_path(&self) -> String;

    /// Navigate, keeping the current entry in history.
    fn assign(&self, url: &str);

    /// Navigate, replacing the current history entry so the user cannot
    /// go back into a terminated session.
    fn replace(&self, url: &str);
}

/// Build the login entry point URL, carrying the intended path as a
/// `next` query parameter when one is given.
pub fn login_url(login_path: &str, next: Option<&str>) -> String {
    match next {
        Some(next) if !next.is_empty() => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish();
            format!("{}?{}", login_path, query)
        }
        _ => login_path.to_string(),
    }
}
