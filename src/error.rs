use crate::data::{CourseId, Day, Minute, RoomId};

/// Malformed problem input, rejected before any solving starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("time slot {day} {start}-{end} does not start before it ends")]
    EmptyInterval { day: Day, start: Minute, end: Minute },

    #[error("time slot on {day} ends at minute {end}, past the end of the day")]
    PastMidnight { day: Day, end: Minute },

    #[error("course {0} has no meeting times")]
    EmptySchedule(CourseId),

    #[error("course {0} has zero enrollment")]
    ZeroEnrollment(CourseId),

    #[error("room {0} has zero capacity")]
    ZeroCapacity(RoomId),

    #[error("course id {0} appears more than once")]
    DuplicateCourse(CourseId),

    #[error("room id {0} appears more than once")]
    DuplicateRoom(RoomId),

    #[error("{field} range {min}..={max} is empty")]
    EmptyRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("generator has no start slots to pick from")]
    NoStartSlots,

    #[error("{0} must lie between 0 and 1")]
    ProbabilityOutOfRange(&'static str),

    #[error("small and medium room fractions add up to more than 1")]
    FractionsExceedOne,
}
