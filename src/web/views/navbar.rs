use crate::web::routes::Route;

/// Renders the navigation bar with one link per navigable view.
pub fn render(current: Option<Route>) -> String {
    let links: String = Route::NAV
        .iter()
        .map(|&route| {
            let active = if Some(route) == current {
                r#" class="active" aria-current="page""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}"{active}>{}</a>"#,
                route.path(),
                route.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    format!(
        r#"<header class="navbar">
        <nav>
            <a href="/" class="nav-logo">Voltpath</a>
            {links}
        </nav>
    </header>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_every_view() {
        let html = render(None);
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains(r#"<a href="/map">Map</a>"#));
        assert!(html.contains(r#"<a href="/about">About</a>"#));
        assert!(!html.contains("aria-current"));
    }

    #[test]
    fn marks_current_view() {
        let html = render(Some(Route::Map));
        assert!(html.contains(r#"<a href="/map" class="active" aria-current="page">Map</a>"#));
        assert_eq!(html.matches("aria-current").count(), 1);
    }
}
