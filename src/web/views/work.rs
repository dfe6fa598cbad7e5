use super::escape;
use crate::content::{WORK_HEADING, WORK_INFO, WORK_SUBTITLE, WorkInfoItem};

/// Renders the "How It Works" section with one card per [`WORK_INFO`] item.
pub fn render() -> String {
    let cards: String = WORK_INFO.iter().map(card).collect::<Vec<_>>().join("\n");
    format!(
        r#"<section class="work-section-wrapper">
    <div class="work-section-top">
        <p class="primary-subheading">Work</p>
        <h1 class="primary-heading">{heading}</h1>
        <p class="primary-text">{subtitle}</p>
    </div>
    <div class="work-section-bottom">
{cards}
    </div>
</section>"#,
        heading = escape(WORK_HEADING),
        subtitle = escape(WORK_SUBTITLE),
    )
}

fn card(item: &WorkInfoItem) -> String {
    let title = escape(item.title);
    format!(
        r#"        <div class="work-section-info" data-key="{title}">
            <div class="info-boxes-img-container">
                <img src="{image}" alt="{title}">
            </div>
            <h2>{title}</h2>
            <p>{text}</p>
        </div>"#,
        image = escape(item.image),
        text = escape(item.text),
    )
}
