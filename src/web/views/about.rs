use super::{escape, layout};
use crate::web::routes::Route;

/// A guide entry: anchor id and heading.
const GUIDE: [(&str, &str); 5] = [
    ("purpose", "Purpose of Voltpath"),
    ("solution", "Solution Development"),
    ("simulation-flow", "Simulation Flow"),
    ("system-flow", "System Flow"),
    ("faq", "FAQ"),
];

const PURPOSE: &str = "Ontario faces a critical challenge in scaling its EV charging \
infrastructure to match the rapid growth in EV adoption. The Ministry of Transportation \
emphasizes the need for Ontario-specific strategies to grow the network of public chargers. \
Voltpath offers a data-driven approach to charging station placement along the highway \
corridor.";

/// Problem cards in the solution section.
const PROBLEMS: [(&str, &str); 3] = [
    (
        "Data Engineering Problem",
        "Traffic volume and road data from Ontario's Ministry of Transportation, together \
         with public data on existing charging infrastructure, define the demand on every \
         highway segment and the cost of building a station there.",
    ),
    (
        "Optimization Problem",
        "Station sites and levels are chosen to maximize the share of segment demand that \
         can be served by a station in range, without exceeding the construction budget. \
         Stations you place yourself are kept and the rest of the budget is filled around \
         them.",
    ),
    (
        "Simulation Problem",
        "Each station is a multi-port queue. Cars appear on segments at rates drawn from \
         the demand data, drive to the closest station in range, wait for a free port, and \
         leave without charging when the queue is full.",
    ),
];

const SIMULATION_FLOW: [&str; 5] = [
    "A car appears on its highway segment.",
    "If no station is within range, it goes uncharged.",
    "Otherwise it drives to the closest station at highway speed.",
    "It joins the waiting queue, or balks if the queue is full.",
    "It charges on the first free port, then leaves.",
];

const SYSTEM_FLOW: [&str; 4] = [
    "Pick stations and levels on the map, set a budget, or both.",
    "The optimizer completes the placement within the budget.",
    "The simulator runs a day of traffic against the placement.",
    "Review coverage, utilization and waiting times, then adjust and run again.",
];

const FAQ: [(&str, &str); 3] = [
    (
        "How are station locations chosen?",
        "A greedy search adds, one at a time, the station and level that cover the most \
         additional demand per dollar, until no affordable candidate improves coverage.",
    ),
    (
        "What do the numbers of charging ports represent?",
        "Levels 1, 2 and 3 have 2, 4 and 8 ports. A port is a connector a car can plug \
         into, so a station charges as many cars at once as it has ports.",
    ),
    (
        "Is Voltpath suitable for large-scale deployment planning?",
        "Yes. Any segment dataset in the same CSV layout can be loaded, so the same tool \
         serves regional and provincial planning.",
    ),
];

/// Renders the about page: a guide, the problem breakdown, both flows and the FAQ.
pub fn render() -> String {
    let guide: String = GUIDE
        .iter()
        .map(|(id, title)| {
            format!(
                r##"            <li><a href="#{id}">{}</a></li>"##,
                escape(title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let problems: String = PROBLEMS
        .iter()
        .map(|(title, text)| {
            format!(
                "        <div class=\"problem-card\">\n            <h2>{}</h2>\n            <p>{}</p>\n        </div>",
                escape(title),
                escape(text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let faq: String = FAQ
        .iter()
        .enumerate()
        .map(|(i, (q, a))| {
            format!(
                "        <h3>{}. {}</h3>\n        <p>{}</p>",
                i + 1,
                escape(q),
                escape(a)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<div class="about-container">
    <aside class="about-guide">
        <h2>Guide</h2>
        <ul>
{guide}
        </ul>
    </aside>
    <article class="about-content">
        <h2 id="purpose">Purpose of Voltpath</h2>
        <p class="primary-text">{purpose}</p>
        <h2 id="solution">Solution Development</h2>
{problems}
        <h2 id="simulation-flow">Simulation Flow</h2>
        <ol class="flow">
{simulation_flow}
        </ol>
        <h2 id="system-flow">System Flow</h2>
        <ol class="flow">
{system_flow}
        </ol>
        <h2 id="faq">Frequently Asked Questions</h2>
{faq}
    </article>
</div>"#,
        purpose = escape(PURPOSE),
        simulation_flow = list_items(&SIMULATION_FLOW),
        system_flow = list_items(&SYSTEM_FLOW),
    );
    layout::page(Some(Route::About), Route::About.label(), &body)
}

fn list_items(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("            <li>{}</li>", escape(item)))
        .collect::<Vec<_>>()
        .join("\n")
}
