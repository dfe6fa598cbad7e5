//! Map page: highway markers, placement form, results and segment table.

use super::{escape, layout};
use crate::network::{ExistingChargers, Highway, Segment};
use crate::placement::StationPlan;
use crate::runner::SimulationRun;
use crate::sim::report::NO_DATA;
use crate::sim::types::projection_years;
use crate::web::routes::Route;

const MAP_WIDTH: f64 = 960.0;
const MAP_HEIGHT: f64 = 360.0;
const MAP_PADDING: f64 = 28.0;

/// Values echoed back into the placement form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapForm {
    pub year: u16,
    pub budget: String,
    pub stations: String,
    /// Existing chargers are shown and count in optimization.
    pub existing: bool,
}

/// A placement that was simulated for this request.
#[derive(Debug, Clone)]
pub struct MapResult {
    pub plan: StationPlan,
    pub run: SimulationRun,
    /// The plan came from the optimizer rather than the form.
    pub optimized: bool,
    /// Form stations the optimizer had to keep.
    pub fixed: usize,
}

/// Everything the map page renders.
pub struct MapPage<'a> {
    pub highway: &'a Highway,
    pub form: &'a MapForm,
    pub result: Option<&'a MapResult>,
    /// Existing chargers to mark, when the form asks for them.
    pub existing: Option<&'a ExistingChargers>,
    pub error: Option<&'a str>,
}

/// Renders the map page.
pub fn render(page: &MapPage<'_>) -> String {
    let mut body = String::from("<section class=\"map-section\">\n");
    body.push_str("<h1 class=\"primary-heading\">Station Map</h1>\n");

    if let Some(error) = page.error {
        body.push_str(&format!(
            "<div class=\"error-banner\" role=\"alert\">{}</div>\n",
            escape(error)
        ));
    }

    let plan = page.result.map(|r| &r.plan);
    body.push_str(&render_svg(page.highway, page.result, page.existing));
    body.push_str(&render_form(page.form));
    if let Some(result) = page.result {
        body.push_str(&render_results(page.highway, result));
    }
    body.push_str(&render_segment_table(page.highway, plan, page.result));
    body.push_str("</section>");

    layout::page(Some(Route::Map), Route::Map.label(), &body)
}

/// Equirectangular fit of the segment coordinates into the SVG viewport.
struct Projection {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Projection {
    fn fit(segments: &[Segment]) -> Self {
        let init = Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        segments.iter().fold(init, |p, s| Self {
            min_lat: p.min_lat.min(s.latitude),
            max_lat: p.max_lat.max(s.latitude),
            min_lon: p.min_lon.min(s.longitude),
            max_lon: p.max_lon.max(s.longitude),
        })
    }

    fn point(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lon_span = (self.max_lon - self.min_lon).max(f64::EPSILON);
        let lat_span = (self.max_lat - self.min_lat).max(f64::EPSILON);
        let x = MAP_PADDING + (lon - self.min_lon) / lon_span * (MAP_WIDTH - 2.0 * MAP_PADDING);
        let y = MAP_PADDING + (self.max_lat - lat) / lat_span * (MAP_HEIGHT - 2.0 * MAP_PADDING);
        (x, y)
    }
}

fn render_svg(
    highway: &Highway,
    result: Option<&MapResult>,
    existing: Option<&ExistingChargers>,
) -> String {
    let proj = Projection::fit(highway.segments());
    let mut svg = format!(
        "<svg class=\"highway-map\" viewBox=\"0 0 {MAP_WIDTH} {MAP_HEIGHT}\" role=\"img\" \
         aria-label=\"Highway segments\">\n"
    );

    let route: Vec<String> = highway
        .segments()
        .iter()
        .map(|s| {
            let (x, y) = proj.point(s.latitude, s.longitude);
            format!("{x:.1},{y:.1}")
        })
        .collect();
    svg.push_str(&format!(
        "<polyline class=\"highway-line\" points=\"{}\"/>\n",
        route.join(" ")
    ));

    if let Some(result) = result {
        for band in &result.run.bands {
            let points: Vec<String> = band
                .segments
                .iter()
                .filter_map(|lhrs| highway.get(*lhrs))
                .map(|s| {
                    let (x, y) = proj.point(s.latitude, s.longitude);
                    format!("{x:.1},{y:.1}")
                })
                .collect();
            svg.push_str(&format!(
                "<polyline class=\"band band-{color}\" points=\"{points}\"><title>{first} to {last}: total coverage {total:.2}</title></polyline>\n",
                color = band.color.as_str(),
                points = points.join(" "),
                first = band.segments.first().copied().unwrap_or_default(),
                last = band.segments.last().copied().unwrap_or_default(),
                total = band.total_coverage,
            ));
        }
    }

    for seg in highway.segments() {
        let (x, y) = proj.point(seg.latitude, seg.longitude);
        let level = result.and_then(|r| r.plan.level(seg.lhrs));
        let (class, radius, label) = match level {
            Some(level) => ("marker station", 8, format!(" ({level})")),
            None => ("marker", 5, String::new()),
        };
        svg.push_str(&format!(
            "<circle class=\"{class}\" data-lhrs=\"{lhrs}\" cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"{radius}\"><title>{lhrs} {desc}{label}</title></circle>\n",
            lhrs = seg.lhrs,
            desc = escape(&seg.description),
        ));
    }

    for snapped in existing.map(ExistingChargers::stations).unwrap_or_default() {
        let station = &snapped.station;
        let (x, y) = proj.point(station.latitude, station.longitude);
        svg.push_str(&format!(
            "<circle class=\"existing-charger\" data-lhrs=\"{lhrs}\" cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\"><title>{name} ({ports} DC fast ports)</title></circle>\n",
            lhrs = snapped.lhrs,
            name = escape(&station.name),
            ports = station.dc_fast_ports.unwrap_or(0),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_form(form: &MapForm) -> String {
    let years: String = projection_years()
        .map(|y| {
            let selected = if y == form.year { " selected" } else { "" };
            format!("<option value=\"{y}\"{selected}>{y}</option>")
        })
        .collect();
    let existing = if form.existing { " checked" } else { "" };

    format!(
        r#"<form class="placement-form" method="get" action="{action}">
    <label>Year <select name="year">{years}</select></label>
    <label>Budget <input type="number" name="budget" min="0" step="1000" value="{budget}"></label>
    <label>Stations <input type="text" name="stations" placeholder="10890:3,10915:2" value="{stations}"></label>
    <label><input type="checkbox" name="existing" value="on"{existing}> Existing chargers</label>
    <button type="submit" class="secondary-button">Run Simulation</button>
</form>
<p class="form-hint">List stations as LHRS:level (levels 1 to 3) to simulate them. Add a budget to have the optimizer place more stations around them, or give only a budget to place them all.</p>
"#,
        action = Route::Map.path(),
        budget = escape(&form.budget),
        stations = escape(&form.stations),
    )
}

fn render_results(highway: &Highway, result: &MapResult) -> String {
    let report = &result.run.report;
    let plan = &result.plan;
    let fmt_opt = |v: Option<f64>, unit: &str| {
        v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{unit}"))
    };

    let source = match (result.optimized, result.fixed) {
        (false, _) => "Placement from the form".to_string(),
        (true, 0) => "Placement chosen by the optimizer".to_string(),
        (true, 1) => "Placement chosen by the optimizer around 1 fixed station".to_string(),
        (true, fixed) => format!("Placement chosen by the optimizer around {fixed} fixed stations"),
    };
    let budget = plan
        .budget()
        .map_or_else(|| "unlimited".to_string(), money);

    let mut html = format!(
        r#"<div class="results">
    <h2>Simulation Results ({year})</h2>
    <p class="primary-text">{source}: {count} stations, cost {cost} of {budget}.</p>
    <table class="summary">
        <tr><th>Cars charged</th><td>{charged}</td></tr>
        <tr><th>Cars not charged</th><td>{not_charged}</td></tr>
        <tr><th>Mean coverage</th><td>{coverage}</td></tr>
        <tr><th>Mean utilization</th><td>{utilization}</td></tr>
        <tr><th>Mean wait time</th><td>{wait}</td></tr>
    </table>
    <table class="stations">
        <thead><tr><th>LHRS</th><th>Location</th><th>Level</th><th>Ports</th><th>Charged</th><th>Utilization</th><th>Avg wait (min)</th></tr></thead>
        <tbody>
"#,
        year = report.year,
        count = plan.len(),
        cost = money(plan.cumulative_cost()),
        charged = report.cars_charged,
        not_charged = report.cars_not_charged,
        coverage = fmt_opt(report.mean_coverage, ""),
        utilization = fmt_opt(report.mean_utilization, ""),
        wait = fmt_opt(report.mean_wait_minutes, " min"),
    );

    for st in &report.stations {
        let desc = highway
            .get(st.lhrs)
            .map(|s| escape(&s.description))
            .unwrap_or_default();
        html.push_str(&format!(
            "            <tr><td>{}</td><td>{desc}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
            st.lhrs,
            st.level.index(),
            st.ports,
            st.cars_charged,
            st.utilization,
            metric(st.average_wait_minutes, 1),
        ));
    }
    html.push_str("        </tbody>\n    </table>\n</div>\n");
    html
}

fn render_segment_table(
    highway: &Highway,
    plan: Option<&StationPlan>,
    result: Option<&MapResult>,
) -> String {
    let coverage = result.map(|r| r.run.report.coverage()).unwrap_or_default();
    let mut html = String::from(
        r#"<table class="segments">
    <thead><tr><th>LHRS</th><th>Location</th><th>AADT</th><th>Demand (cars/day)</th><th>Level 1</th><th>Level 2</th><th>Level 3</th><th>Station</th><th>Coverage</th></tr></thead>
    <tbody>
"#,
    );
    for seg in highway.segments() {
        let station = plan
            .and_then(|p| p.level(seg.lhrs))
            .map(|l| l.index().to_string())
            .unwrap_or_default();
        let cov = coverage
            .get(&seg.lhrs)
            .map(|c| metric(*c, 2))
            .unwrap_or_default();
        html.push_str(&format!(
            "        <tr data-lhrs=\"{lhrs}\"><td>{lhrs}</td><td>{desc}</td><td>{aadt}</td><td>{demand:.1}</td><td>{c1}</td><td>{c2}</td><td>{c3}</td><td>{station}</td><td>{cov}</td></tr>\n",
            lhrs = seg.lhrs,
            desc = escape(&seg.description),
            aadt = seg.aadt,
            demand = seg.demand_per_day,
            c1 = money(seg.costs[0]),
            c2 = money(seg.costs[1]),
            c3 = money(seg.costs[2]),
        ));
    }
    html.push_str("    </tbody>\n</table>\n");
    html
}

/// Formats a metric, showing the no-data sentinel as "n/a".
fn metric(value: f64, precision: usize) -> String {
    if value == NO_DATA {
        "n/a".to_string()
    } else {
        format!("{value:.precision$}")
    }
}

/// Whole dollars with thousands separators, e.g. `$1,250,000`.
fn money(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::StationLevel;
    use crate::runner::simulate_plan;
    use crate::sim::SimConfig;

    fn result(highway: &Highway) -> MapResult {
        let plan = StationPlan::from_entries(
            highway,
            Some(1_000_000.0),
            [(10890, StationLevel::Level3), (10950, StationLevel::Level1)],
        )
        .expect("plan");
        let run = simulate_plan(highway, &plan, &SimConfig::for_year(2024, 42).expect("config"));
        MapResult {
            plan,
            run,
            optimized: false,
            fixed: 0,
        }
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0), "$0");
        assert_eq!(money(999.0), "$999");
        assert_eq!(money(1_250_000.0), "$1,250,000");
        assert_eq!(money(-4_500.0), "-$4,500");
    }

    #[test]
    fn empty_map_has_grey_markers_only() {
        let hwy = Highway::sample().expect("sample");
        let form = MapForm {
            year: 2024,
            ..MapForm::default()
        };
        let html = render(&MapPage {
            highway: &hwy,
            form: &form,
            result: None,
            existing: None,
            error: None,
        });
        assert_eq!(html.matches("<circle class=\"marker\"").count(), hwy.len());
        assert!(!html.contains("marker station"));
        assert!(!html.contains("class=\"band"));
        assert!(html.contains("<option value=\"2024\" selected>2024</option>"));
    }

    #[test]
    fn placement_highlights_stations_and_bands() {
        let hwy = Highway::sample().expect("sample");
        let result = result(&hwy);
        let form = MapForm {
            year: 2024,
            budget: "1000000".into(),
            stations: result.plan.to_query(),
            existing: false,
        };
        let html = render(&MapPage {
            highway: &hwy,
            form: &form,
            result: Some(&result),
            existing: None,
            error: None,
        });
        assert_eq!(html.matches("<circle class=\"marker station\"").count(), 2);
        assert_eq!(
            html.matches("<polyline class=\"band ").count(),
            result.run.bands.len()
        );
        assert!(html.contains("Simulation Results (2024)"));
        assert!(html.contains("value=\"10890:3,10950:1\""));
    }

    #[test]
    fn error_banner_is_escaped() {
        let hwy = Highway::sample().expect("sample");
        let form = MapForm::default();
        let html = render(&MapPage {
            highway: &hwy,
            form: &form,
            result: None,
            existing: None,
            error: Some("bad <input>"),
        });
        assert!(html.contains("role=\"alert\">bad &lt;input&gt;</div>"));
    }

    #[test]
    fn existing_chargers_get_their_own_markers() {
        let hwy = Highway::sample().expect("sample");
        let existing = ExistingChargers::sample(&hwy).expect("chargers");
        let form = MapForm {
            year: 2024,
            existing: true,
            ..MapForm::default()
        };
        let html = render(&MapPage {
            highway: &hwy,
            form: &form,
            result: None,
            existing: Some(&existing),
            error: None,
        });
        assert_eq!(
            html.matches("<circle class=\"existing-charger\"").count(),
            existing.len()
        );
        assert_eq!(html.matches("<circle class=\"marker\"").count(), hwy.len());
        assert!(html.contains("name=\"existing\" value=\"on\" checked"));
    }

    #[test]
    fn optimized_result_names_fixed_stations() {
        let hwy = Highway::sample().expect("sample");
        let result = MapResult {
            optimized: true,
            fixed: 2,
            ..result(&hwy)
        };
        let form = MapForm::default();
        let html = render(&MapPage {
            highway: &hwy,
            form: &form,
            result: Some(&result),
            existing: None,
            error: None,
        });
        assert!(html.contains("Placement chosen by the optimizer around 2 fixed stations"));
    }
}
