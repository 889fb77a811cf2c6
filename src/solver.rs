use crate::data::{AssignmentResult, Course, Room, check_unique_ids};
use crate::error::ModelError;
use crate::occupancy::OccupancyIndex;
use log::{debug, info, trace, warn};
use std::time::Instant;

/// Anything that turns (courses, rooms) into an assignment.
pub trait AssignmentSolver {
    fn name(&self) -> &'static str;

    fn solve(&self, courses: &[Course], rooms: &[Room]) -> AssignmentResult;
}

/// Largest-course-first, smallest-fitting-room, first-free-in-time.
///
/// Single pass with no backtracking: the first course that finds no room
/// ends the solve as infeasible. Ties keep input order on both sides, so
/// the result is a deterministic function of the input sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssignmentSolver;

impl AssignmentSolver for GreedyAssignmentSolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, courses: &[Course], rooms: &[Room]) -> AssignmentResult {
        solve(courses, rooms)
    }
}

/// Rejects repeated course or room ids before any placement.
///
/// Returns the infeasible result to hand back, or `None` if the ids are
/// unique. A repeated course id is reported as the unplaced course.
pub(crate) fn reject_duplicate_ids(
    courses: &[Course],
    rooms: &[Room],
) -> Option<AssignmentResult> {
    let err = check_unique_ids(courses, rooms).err()?;
    warn!("Refusing to solve: {}", err);
    let mut result = AssignmentResult::new();
    match err {
        ModelError::DuplicateCourse(id) => result.mark_infeasible(Some(id)),
        _ => result.mark_infeasible(None),
    }
    Some(result)
}

/// Solves the room assignment problem with the greedy best-fit heuristic.
///
/// Course ids and room ids must be unique within their slices. Input that
/// repeats either is answered with an infeasible result and nothing placed.
pub fn solve(courses: &[Course], rooms: &[Room]) -> AssignmentResult {
    let start_time = Instant::now();
    if let Some(rejected) = reject_duplicate_ids(courses, rooms) {
        return rejected;
    }
    let mut result = AssignmentResult::new();
    let mut occupancy = OccupancyIndex::for_rooms(rooms);

    // stable: equal enrollments keep input order
    let mut by_demand: Vec<&Course> = courses.iter().collect();
    by_demand.sort_by(|a, b| b.enrollment().cmp(&a.enrollment()));

    // Positions into `rooms`, stable by capacity. The eligible rooms for a
    // course are a suffix of this order, which is exactly what filtering
    // then stable-sorting ascending would produce.
    let mut by_capacity: Vec<usize> = (0..rooms.len()).collect();
    by_capacity.sort_by_key(|&i| rooms[i].capacity());

    for course in by_demand {
        let first_eligible =
            by_capacity.partition_point(|&i| rooms[i].capacity() < course.enrollment());

        let chosen = by_capacity[first_eligible..].iter().copied().find(|&i| {
            let free = occupancy.is_available(i, course.schedule());
            if !free {
                trace!(
                    "{} is busy during {} ({})",
                    rooms[i].name(),
                    course.name(),
                    course.id()
                );
            }
            free
        });

        let Some(i) = chosen else {
            debug!(
                "No eligible room for course {} ({} students, {} rooms large enough)",
                course.id(),
                course.enrollment(),
                by_capacity.len() - first_eligible
            );
            result.mark_infeasible(Some(course.id()));
            info!(
                "Greedy solve of {} courses over {} rooms infeasible after {:.2?}",
                courses.len(),
                rooms.len(),
                start_time.elapsed()
            );
            return result;
        };

        let room = &rooms[i];
        debug!(
            "Course {} ({} students) -> room {} (capacity {})",
            course.id(),
            course.enrollment(),
            room.id(),
            room.capacity()
        );
        result.assign(course.id(), room.id());
        occupancy.occupy(i, course.schedule());
    }

    result.finalize();
    info!(
        "Greedy solve of {} courses over {} rooms used {} rooms in {:.2?}",
        courses.len(),
        rooms.len(),
        result.total_rooms_used(),
        start_time.elapsed()
    );
    result
}
