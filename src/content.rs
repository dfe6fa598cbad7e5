//! Static copy and illustrations shown on the landing page.

/// A card in the "How It Works" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkInfoItem {
    /// Public path of the illustration.
    pub image: &'static str,
    /// Card title, unique within [`WORK_INFO`].
    pub title: &'static str,
    pub text: &'static str,
}

pub const HERO_HEADING: &str = "EV Charging Station Placement Simulator";

pub const HERO_TEXT: &str = "This tool aims to support the MTO in identifying, evaluating, \
                             supporting, and prioritizing appropriate EV Charging station locations";

pub const WORK_HEADING: &str = "How It Works";

pub const WORK_SUBTITLE: &str = "Plan a charging network along the highway, then let the \
                                 simulator show how well drivers would be served.";

/// The three steps of a planning session, in display order.
pub const WORK_INFO: [WorkInfoItem; 3] = [
    WorkInfoItem {
        image: "/static/img/pick_station.svg",
        title: "Select Charging Stations",
        text: "Select the charging stations to be used for the simulation",
    },
    WorkInfoItem {
        image: "/static/img/choose_port.svg",
        title: "Charger Port",
        text: "Choose the type of charger (Level 1, 2, or 3 Supercharger) that will be used",
    },
    WorkInfoItem {
        image: "/static/img/simulation_result.svg",
        title: "Simulation Results",
        text: "Average wait time and cost will be calculated using an efficient and \
               realistic stochastic model",
    },
];
