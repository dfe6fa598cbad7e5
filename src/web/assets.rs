//! Static assets compiled into the binary.

/// Stylesheet for every page.
pub const CSS: &str = include_str!("assets/style.css");

const PICK_STATION_SVG: &str = include_str!("assets/pick_station.svg");
const CHOOSE_PORT_SVG: &str = include_str!("assets/choose_port.svg");
const SIMULATION_RESULT_SVG: &str = include_str!("assets/simulation_result.svg");

/// Looks up an illustration by file name, as served under `/static/img/`.
pub fn image(name: &str) -> Option<&'static str> {
    match name {
        "pick_station.svg" => Some(PICK_STATION_SVG),
        "choose_port.svg" => Some(CHOOSE_PORT_SVG),
        "simulation_result.svg" => Some(SIMULATION_RESULT_SVG),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::WORK_INFO;

    #[test]
    fn every_card_image_exists() {
        for item in WORK_INFO {
            let name = item.image.trim_start_matches("/static/img/");
            let svg = image(name);
            assert!(svg.is_some_and(|s| s.contains("<svg")), "missing {name}");
        }
    }

    #[test]
    fn unknown_image_is_none() {
        assert!(image("../style.css").is_none());
    }
}
