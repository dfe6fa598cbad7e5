use super::{escape, layout};

/// Renders the fallback page for a path that matches no view.
pub fn render(path: &str) -> String {
    let body = format!(
        r#"<section class="not-found">
    <h1 class="primary-heading">Page not found</h1>
    <p class="primary-text">Nothing lives at <code>{path}</code>.</p>
    <a class="secondary-button" href="/">Back to home</a>
</section>"#,
        path = escape(path),
    );
    layout::page(None, "Not Found", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_escaped_path() {
        let html = render("/<script>");
        assert!(html.contains("<code>/&lt;script&gt;</code>"));
        assert!(!html.contains("<script>"));
    }
}
