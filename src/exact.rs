//! Exact baseline: decides feasibility with an ILP and minimises the
//! number of rooms used. Slow, meant for measuring how often the greedy
//! heuristic gives up on instances that do have an assignment.

use crate::data::{AssignmentResult, Course, Room};
use crate::solver::{AssignmentSolver, reject_duplicate_ids};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    default_solver, variable,
};
use itertools::Itertools;
use log::{info, trace, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactAssignmentSolver;

impl AssignmentSolver for ExactAssignmentSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, courses: &[Course], rooms: &[Room]) -> AssignmentResult {
        solve(courses, rooms)
    }
}

/// solves the room assignment problem to optimality using HiGHS.
pub fn solve(courses: &[Course], rooms: &[Room]) -> AssignmentResult {
    let start_time = Instant::now();
    if let Some(rejected) = reject_duplicate_ids(courses, rooms) {
        return rejected;
    }
    let mut result = AssignmentResult::new();

    if courses.is_empty() {
        result.finalize();
        return result;
    }

    // x_cr = 1 if course c sits in room r; only created where r seats c
    let mut problem = ProblemVariables::new();
    let mut x: Vec<Vec<(usize, Variable)>> = Vec::with_capacity(courses.len());
    for course in courses {
        let eligible: Vec<(usize, Variable)> = rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.fits(course))
            .map(|(r, _)| (r, problem.add(variable().binary())))
            .collect();
        if eligible.is_empty() {
            info!("Course {} fits in no room; exact model skipped", course.id());
            result.mark_infeasible(Some(course.id()));
            return result;
        }
        x.push(eligible);
    }
    // y_r = 1 if room r hosts anything
    let used: Vec<Variable> = rooms
        .iter()
        .map(|_| problem.add(variable().binary()))
        .collect();

    let objective: Expression = used.iter().copied().sum();
    let mut model = problem
        .minimise(objective)
        .using(default_solver)
        .set_option("threads", 1) // limit to 1 thread for reproducibility
        .set_option("random_seed", 1234)
        .set_option("output_flag", false);

    // every course placed exactly once, and only in a used room
    for placements in &x {
        let placed: Expression = placements.iter().map(|(_, v)| *v).sum();
        model.add_constraint(constraint!(placed == 1));
        for &(r, v) in placements {
            model.add_constraint(constraint!(v <= used[r]));
        }
    }

    // no two conflicting courses in the same room
    let mut conflict_rows = 0usize;
    for (a, b) in (0..courses.len()).tuple_combinations() {
        if !courses[a].conflicts_with(&courses[b]) {
            continue;
        }
        for &(r, va) in &x[a] {
            if let Some(&(_, vb)) = x[b].iter().find(|(rb, _)| *rb == r) {
                model.add_constraint(constraint!(va + vb <= 1));
                conflict_rows += 1;
            }
        }
    }
    trace!("Exact model has {} conflict constraints", conflict_rows);

    let solution = match model.solve() {
        Ok(s) => s,
        Err(ResolutionError::Infeasible) => {
            info!("Exact model infeasible after {:.2?}", start_time.elapsed());
            result.mark_infeasible(None);
            return result;
        }
        Err(e) => {
            warn!("Exact solver gave up: {}", e);
            result.mark_infeasible(None);
            return result;
        }
    };

    for (course, placements) in courses.iter().zip(&x) {
        if let Some(&(r, _)) = placements.iter().find(|(_, v)| solution.value(*v) > 0.5) {
            result.assign(course.id(), rooms[r].id());
        }
    }
    result.finalize();
    info!(
        "Exact solve of {} courses over {} rooms used {} rooms in {:.2?}",
        courses.len(),
        rooms.len(),
        result.total_rooms_used(),
        start_time.elapsed()
    );
    result
}
