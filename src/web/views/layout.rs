use super::{escape, navbar};
use crate::web::routes::Route;

/// Wraps a page body in the shared document shell and navigation bar.
///
/// `current` marks the active navigation link; `None` for pages outside
/// the navigation (such as the not-found view).
pub fn page(current: Option<Route>, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Voltpath</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    {nav}
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        nav = navbar::render(current),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_escaped() {
        let html = page(None, "<x>", "");
        assert!(html.contains("<title>&lt;x&gt; - Voltpath</title>"));
    }

    #[test]
    fn body_is_embedded_verbatim() {
        let html = page(Some(Route::Home), "Home", "<p id=\"b\">hi</p>");
        assert!(html.contains("<p id=\"b\">hi</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
