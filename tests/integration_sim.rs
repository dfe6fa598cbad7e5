mod common;

use common::{baseline_plan, default_config, sample_highway};
use voltpath::network::ExistingChargers;
use voltpath::placement::{StationLevel, StationPlan, covered_demand, optimize};
use voltpath::runner::simulate_plan;
use voltpath::sim::report::NO_DATA;
use voltpath::sim::{Engine, SimConfig};

#[test]
fn same_seed_gives_identical_reports() {
    let highway = sample_highway();
    let plan = baseline_plan(&highway);
    let cfg = default_config(7);

    let a = simulate_plan(&highway, &plan, &cfg);
    let b = simulate_plan(&highway, &plan, &cfg);

    assert_eq!(a.report.cars_charged, b.report.cars_charged);
    assert_eq!(a.report.cars_not_charged, b.report.cars_not_charged);
    assert_eq!(a.report.coverage(), b.report.coverage());
    assert_eq!(a.report.utilization(), b.report.utilization());
    assert_eq!(a.report.wait_times(), b.report.wait_times());
}

#[test]
fn metrics_stay_in_range() {
    let highway = sample_highway();
    let plan = baseline_plan(&highway);
    let run = simulate_plan(&highway, &plan, &default_config(42));

    for (lhrs, coverage) in run.report.coverage() {
        assert!(
            coverage == NO_DATA || (0.0..=1.0).contains(&coverage),
            "coverage for {lhrs} out of range: {coverage}"
        );
    }
    for (lhrs, utilization) in run.report.utilization() {
        assert!(
            (0.0..=1.0).contains(&utilization),
            "utilization for {lhrs} out of range: {utilization}"
        );
    }
    for (lhrs, wait) in run.report.wait_times() {
        assert!(wait == NO_DATA || wait >= 0.0, "wait for {lhrs}: {wait}");
    }
    assert!(run.report.cars_charged > 0);
}

#[test]
fn segments_beyond_range_never_charge() {
    let highway = sample_highway();
    let plan =
        StationPlan::from_entries(&highway, None, [(10880, StationLevel::Level3)]).expect("plan");
    let cfg = SimConfig {
        range_km: 10.0,
        ..default_config(3)
    };

    let outcome = Engine::new(cfg.clone(), &highway, &plan).run();

    let mut far = 0;
    for segment in highway.segments() {
        let distance = highway
            .distance_km(10880, segment.lhrs)
            .expect("both on the highway");
        if distance > cfg.range_km {
            far += 1;
            assert_eq!(
                outcome.charged.get(&segment.lhrs).copied().unwrap_or(0),
                0,
                "segment {} is {distance:.1} km away but charged cars",
                segment.lhrs
            );
        }
    }
    assert!(far > 0, "expected some segments outside the range");
}

#[test]
fn empty_plan_charges_nobody() {
    let highway = sample_highway();
    let run = simulate_plan(&highway, &StationPlan::unlimited(), &default_config(1));

    assert_eq!(run.report.cars_charged, 0);
    assert!(run.report.cars_not_charged > 0);
    assert!(run.report.stations.is_empty());
}

#[test]
fn later_years_bring_more_cars() {
    let highway = sample_highway();
    let plan = baseline_plan(&highway);

    let now = simulate_plan(&highway, &plan, &default_config(5));
    let later = simulate_plan(
        &highway,
        &plan,
        &SimConfig::for_year(2049, 5).expect("2049 is a projection year"),
    );

    let total = |r: &voltpath::sim::SimulationReport| r.cars_charged + r.cars_not_charged;
    assert!(total(&later.report) > total(&now.report));
}

#[test]
fn optimizer_respects_budget_and_improves_coverage() {
    let highway = sample_highway();
    let fixed = StationPlan::unlimited();

    let none = ExistingChargers::default();

    let small = optimize(&highway, 300_000.0, &fixed, &none, 40.0).expect("optimize");
    let large = optimize(&highway, 3_000_000.0, &fixed, &none, 40.0).expect("optimize");

    assert!(small.plan.cumulative_cost() <= 300_000.0);
    assert!(large.plan.cumulative_cost() <= 3_000_000.0);
    assert!(large.covered_demand >= small.covered_demand);
    let recomputed = covered_demand(&highway, &large.plan, &none, 40.0);
    assert!((recomputed - large.covered_demand).abs() < 1e-6);
}

#[test]
fn optimizer_keeps_fixed_stations() {
    let highway = sample_highway();
    let fixed =
        StationPlan::from_entries(&highway, None, [(10950, StationLevel::Level1)]).expect("plan");

    let result = optimize(&highway, 1_000_000.0, &fixed, &ExistingChargers::default(), 40.0)
        .expect("optimize");
    assert_eq!(result.plan.level(10950), Some(StationLevel::Level1));
}

#[test]
fn existing_chargers_raise_coverage_at_equal_budget() {
    let highway = sample_highway();
    let existing = ExistingChargers::sample(&highway).expect("chargers");
    let fixed = StationPlan::unlimited();

    let bare = optimize(&highway, 300_000.0, &fixed, &ExistingChargers::default(), 40.0)
        .expect("optimize");
    let helped = optimize(&highway, 300_000.0, &fixed, &existing, 40.0).expect("optimize");

    assert!(helped.covered_demand > bare.covered_demand);
    assert!(helped.plan.cumulative_cost() <= 300_000.0);
}
