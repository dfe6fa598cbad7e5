use super::{escape, layout, work};
use crate::content::{HERO_HEADING, HERO_TEXT};
use crate::web::routes::Route;

/// Renders the landing page: hero banner, map link and the "How It Works" section.
pub fn render() -> String {
    let body = format!(
        r#"<div class="home-container">
    <div class="home-banner-container">
        <div class="home-text-section">
            <h1 class="primary-heading">{heading}</h1>
            <p class="primary-text">{text}</p>
            <a class="secondary-button" href="{map}">View Map <span aria-hidden="true">&rarr;</span></a>
        </div>
    </div>
</div>
{work}"#,
        heading = escape(HERO_HEADING),
        text = escape(HERO_TEXT),
        map = Route::Map.path(),
        work = work::render(),
    );
    layout::page(Some(Route::Home), Route::Home.label(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_targets_relative_map_route() {
        let html = render();
        assert!(html.contains(r#"<a class="secondary-button" href="/map">View Map"#));
        assert!(!html.contains("localhost"));
        assert!(!html.contains("http://"));
    }

    #[test]
    fn hero_comes_before_work_section() {
        let html = render();
        let hero = html.find(HERO_HEADING).unwrap_or(usize::MAX);
        let work = html.find("work-section-wrapper").unwrap_or(0);
        assert!(hero < work);
    }

    #[test]
    fn includes_navbar() {
        assert!(render().contains(r#"aria-current="page">Home</a>"#));
    }
}
