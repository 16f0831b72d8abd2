use hexsite::{
    aggregate::score_cells,
    greedy::GreedySelector,
    spatial::{Bounds, HexGrid, Point2D},
    DemandPoint, FacilityPoint, PlanError, PlanSettings, Planner,
};

fn scenario_a_demand() -> Vec<DemandPoint> {
    vec![
        DemandPoint::new(0.0, 0.0, 10.0),
        DemandPoint::new(100.0, 0.0, 5.0),
        DemandPoint::new(10_000.0, 10_000.0, 20.0),
    ]
}

fn scenario_a_grid() -> HexGrid {
    let bounds = Bounds::enclosing(scenario_a_demand().iter().map(|p| p.position))
        .unwrap()
        .padded(5_000.0);
    HexGrid::generate(bounds, 3_000.0).unwrap()
}

fn settings(coverage_radius_m: f64, k: i64) -> PlanSettings {
    PlanSettings {
        name: "scenario".into(),
        coverage_radius_m,
        hex_radius_m: 3_000.0,
        k,
        padding_m: 5_000.0,
    }
}

#[test]
fn scenario_a_cell_geometry() {
    let grid = scenario_a_grid();
    assert_eq!(grid.cols(), 7);
    assert_eq!(grid.rows(), 6);

    let near = grid.locate(Point2D::new(0.0, 0.0)).unwrap();
    assert_eq!(grid.locate(Point2D::new(100.0, 0.0)), Some(near));
    let far = grid.locate(Point2D::new(10_000.0, 10_000.0)).unwrap();
    assert_eq!(near, 16);
    assert_eq!(far, 32);

    let near_center = grid.cell(near).unwrap().center;
    assert!((near_center.x - -500.0).abs() < 1e-9);
    assert!((near_center.y - 196.152_422_706_632).abs() < 1e-6);
    let far_center = grid.cell(far).unwrap().center;
    assert!((far_center.x - 8_500.0).abs() < 1e-9);
    assert!((far_center.y - 10_588.457_268_119_9).abs() < 1e-6);

    let scores = score_cells(&grid, &scenario_a_demand());
    assert_eq!(scores.get(&near), Some(&15.0));
    assert_eq!(scores.get(&far), Some(&20.0));
}

#[test]
fn scenario_a_heaviest_cell_center_is_out_of_reach() {
    // The 20-weight cell outranks the 15-weight pair, but its center is about
    // 1.6 km from the point, far beyond a 50 m radius.
    let planner = Planner::new(settings(50.0, 1)).unwrap();
    let report = planner.run(scenario_a_demand(), &[]).unwrap();

    assert_eq!(report.proposals.len(), 1);
    let proposal = &report.proposals[0];
    assert_eq!(proposal.cell, 32);
    assert_eq!(proposal.score, 20.0);
    assert_eq!(proposal.gain, 0.0);
    assert!((proposal.position.x - 8_500.0).abs() < 1e-9);
    assert!(report.demand.iter().all(|p| !p.covered));
}

#[test]
fn scenario_a_with_reachable_centers() {
    let planner = Planner::new(settings(2_000.0, 2)).unwrap();
    let report = planner.run(scenario_a_demand(), &[]).unwrap();

    let gains: Vec<f64> = report.proposals.iter().map(|p| p.gain).collect();
    assert_eq!(gains, vec![20.0, 15.0]);
    let cells: Vec<u32> = report.proposals.iter().map(|p| p.cell).collect();
    assert_eq!(cells, vec![32, 16]);
    assert!(report.demand.iter().all(|p| p.covered));
    assert_eq!(report.totals.final_covered_weight, 35.0);
}

#[test]
fn scenario_b_zero_budget() {
    let grid = scenario_a_grid();
    let selector = GreedySelector::new(&grid, 2_000.0).unwrap();
    let mut demand = scenario_a_demand();
    let proposals = selector.select(&mut demand, &[], 0).unwrap();
    assert!(proposals.is_empty());

    let planner = Planner::new(settings(2_000.0, 0)).unwrap();
    let report = planner
        .run(scenario_a_demand(), &[FacilityPoint::new(0.0, 0.0)])
        .unwrap();
    assert!(report.proposals.is_empty());
    assert_eq!(report.totals.initially_covered_weight, 15.0);
}

#[test]
fn scenario_c_everything_already_covered() {
    let grid = scenario_a_grid();
    let existing = [
        FacilityPoint::new(50.0, 0.0),
        FacilityPoint::new(10_000.0, 10_030.0),
    ];
    let mut demand = scenario_a_demand();
    let selector = GreedySelector::new(&grid, 60.0).unwrap();
    let proposals = selector.select(&mut demand, &existing, 5).unwrap();

    assert!(proposals.is_empty());
    assert!(demand.iter().all(|p| p.covered));
    assert!(score_cells(&grid, &demand).is_empty());
}

#[test]
fn empty_inputs_are_not_errors() {
    let grid = scenario_a_grid();
    let selector = GreedySelector::new(&grid, 100.0).unwrap();
    let mut demand: Vec<DemandPoint> = Vec::new();
    assert!(selector.select(&mut demand, &[], 4).unwrap().is_empty());

    let mut demand = scenario_a_demand();
    let proposals = selector.select(&mut demand, &[], 4).unwrap();
    assert!(!proposals.is_empty());
}

#[test]
fn invalid_parameters_fail_fast() {
    assert!(matches!(
        Planner::new(settings(50.0, -1)),
        Err(PlanError::InvalidParameter(_))
    ));
    assert!(matches!(
        Planner::new(settings(0.0, 1)),
        Err(PlanError::InvalidParameter(_))
    ));

    let grid = scenario_a_grid();
    let selector = GreedySelector::new(&grid, 100.0).unwrap();
    let mut demand = scenario_a_demand();
    demand.push(DemandPoint::new(1.0, 1.0, -4.0));
    let result = selector.select(&mut demand, &[FacilityPoint::new(0.0, 0.0)], 2);
    assert!(matches!(result, Err(PlanError::InvalidParameter(_))));
    assert!(demand.iter().all(|p| !p.covered));
}
