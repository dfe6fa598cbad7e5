//! Server-rendered HTML views.
//!
//! Every view is a pure function of its inputs returning a full document or
//! fragment as a `String`.

pub mod about;
pub mod home;
pub mod layout;
pub mod map;
pub mod navbar;
pub mod not_found;
pub mod work;

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">Q&A</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Q&amp;A&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }
}
