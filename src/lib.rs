//! Course-to-classroom assignment with a greedy best-fit heuristic.
//!
//! [`solver::solve`] is the core: it places every course in a room large
//! enough to seat it and free at all of its meeting times, or reports the
//! instance infeasible. The remaining modules generate synthetic
//! instances, measure the solver on them, and expose it over HTTP.

pub mod data;
pub mod error;
#[cfg(feature = "exact")]
pub mod exact;
pub mod experiment;
pub mod occupancy;
pub mod report;
pub mod server;
pub mod solver;

pub use data::{AssignmentResult, Course, CourseId, Day, Room, RoomId, TimeSlot};
pub use error::ModelError;
pub use solver::{AssignmentSolver, GreedyAssignmentSolver, solve};
