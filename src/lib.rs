pub mod aggregate;
pub mod components;
pub mod coverage;
pub mod error;
pub mod greedy;
pub mod io;
pub mod planner;
pub mod projection;
pub mod sample;
pub mod scenario;
pub mod spatial;

pub use components::{DemandPoint, FacilityPoint, Proposal};
pub use error::PlanError;
pub use planner::{PlanReport, PlanSettings, Planner};
pub use scenario::Scenario;
