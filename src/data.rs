use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::ModelError;

// Type aliases for clarity
pub type RoomId = u32;
pub type CourseId = u32;
pub type Minute = u16;

/// Minutes in one day; a slot may end at midnight but not past it.
pub const MINUTES_PER_DAY: Minute = 24 * 60;

/// Teaching days of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
        };
        f.write_str(s)
    }
}

#[derive(Deserialize)]
struct RawTimeSlot {
    day: Day,
    start: Minute,
    end: Minute,
}

/// A weekly meeting interval `[start, end)` in minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    day: Day,
    start: Minute,
    end: Minute,
}

impl TimeSlot {
    pub fn new(day: Day, start: Minute, end: Minute) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::EmptyInterval { day, start, end });
        }
        if end > MINUTES_PER_DAY {
            return Err(ModelError::PastMidnight { day, end });
        }
        Ok(Self { day, start, end })
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn start(&self) -> Minute {
        self.start
    }

    pub fn end(&self) -> Minute {
        self.end
    }

    /// Half-open overlap on the same day. Touching slots do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = ModelError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        TimeSlot::new(raw.day, raw.start, raw.end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{:02}-{}:{:02}",
            self.day,
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

#[derive(Deserialize)]
struct RawCourse {
    id: CourseId,
    name: String,
    enrollment: u32,
    schedule: Vec<TimeSlot>,
}

/// A course to be placed: how many students, and when it meets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCourse")]
pub struct Course {
    id: CourseId,
    name: String,
    enrollment: u32,
    schedule: Vec<TimeSlot>,
}

impl Course {
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        enrollment: u32,
        schedule: Vec<TimeSlot>,
    ) -> Result<Self, ModelError> {
        if enrollment == 0 {
            return Err(ModelError::ZeroEnrollment(id));
        }
        if schedule.is_empty() {
            return Err(ModelError::EmptySchedule(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            enrollment,
            schedule,
        })
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enrollment(&self) -> u32 {
        self.enrollment
    }

    pub fn schedule(&self) -> &[TimeSlot] {
        &self.schedule
    }

    /// True if any meeting of `self` overlaps any meeting of `other`.
    pub fn conflicts_with(&self, other: &Course) -> bool {
        self.schedule
            .iter()
            .any(|a| other.schedule.iter().any(|b| a.overlaps(b)))
    }
}

impl TryFrom<RawCourse> for Course {
    type Error = ModelError;

    fn try_from(raw: RawCourse) -> Result<Self, Self::Error> {
        Course::new(raw.id, raw.name, raw.enrollment, raw.schedule)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Course[id={}, name={}, enrollment={}]",
            self.id, self.name, self.enrollment
        )
    }
}

#[derive(Deserialize)]
struct RawRoom {
    id: RoomId,
    name: String,
    capacity: u32,
}

/// Represents a physical room with a given capacity.
///
/// Rooms are plain descriptors; which slots they hold during a solve is
/// tracked separately in [`crate::occupancy::OccupancyIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRoom")]
pub struct Room {
    id: RoomId,
    name: String,
    capacity: u32,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>, capacity: u32) -> Result<Self, ModelError> {
        if capacity == 0 {
            return Err(ModelError::ZeroCapacity(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            capacity,
        })
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether the room seats `course`.
    pub fn fits(&self, course: &Course) -> bool {
        self.capacity >= course.enrollment
    }
}

impl TryFrom<RawRoom> for Room {
    type Error = ModelError;

    fn try_from(raw: RawRoom) -> Result<Self, Self::Error> {
        Room::new(raw.id, raw.name, raw.capacity)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room[id={}, name={}, capacity={}]",
            self.id, self.name, self.capacity
        )
    }
}

/// The outcome of one solve.
///
/// When `is_feasible()` is false the mapping holds whatever was placed
/// before the failing course and must not be used as a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    course_to_room: BTreeMap<CourseId, RoomId>,
    feasible: bool,
    total_rooms_used: usize,
    unplaced: Option<CourseId>,
}

impl AssignmentResult {
    pub(crate) fn new() -> Self {
        Self {
            course_to_room: BTreeMap::new(),
            feasible: true,
            total_rooms_used: 0,
            unplaced: None,
        }
    }

    pub(crate) fn assign(&mut self, course: CourseId, room: RoomId) {
        self.course_to_room.insert(course, room);
    }

    pub(crate) fn mark_infeasible(&mut self, unplaced: Option<CourseId>) {
        self.feasible = false;
        self.total_rooms_used = 0;
        self.unplaced = unplaced;
    }

    pub(crate) fn finalize(&mut self) {
        self.total_rooms_used = self.course_to_room.values().unique().count();
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Distinct rooms hosting at least one course; 0 unless feasible.
    pub fn total_rooms_used(&self) -> usize {
        self.total_rooms_used
    }

    pub fn assignments(&self) -> &BTreeMap<CourseId, RoomId> {
        &self.course_to_room
    }

    pub fn room_for(&self, course: CourseId) -> Option<RoomId> {
        self.course_to_room.get(&course).copied()
    }

    /// The course that could not be placed, if the solve failed on one.
    pub fn unplaced(&self) -> Option<CourseId> {
        self.unplaced
    }
}

/// The complete input for the room assignment problem.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
}

impl SchedulingInput {
    /// Rejects inputs whose ids would collide in an [`AssignmentResult`].
    pub fn validate(&self) -> Result<(), ModelError> {
        check_unique_ids(&self.courses, &self.rooms)
    }
}

/// Course ids and room ids must each be unique; results are keyed by them.
pub fn check_unique_ids(courses: &[Course], rooms: &[Room]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    if let Some(c) = courses.iter().find(|c| !seen.insert(c.id())) {
        return Err(ModelError::DuplicateCourse(c.id()));
    }
    let mut seen = HashSet::new();
    if let Some(r) = rooms.iter().find(|r| !seen.insert(r.id())) {
        return Err(ModelError::DuplicateRoom(r.id()));
    }
    Ok(())
}

/// Represents a single course placed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub course_id: CourseId,
    pub room_id: RoomId,
}

/// The final output of the solver as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    pub feasible: bool,
    pub total_rooms_used: usize,
    pub assignments: Vec<Assignment>,
    pub unplaced_course: Option<CourseId>,
}

impl From<&AssignmentResult> for SchedulingOutput {
    fn from(result: &AssignmentResult) -> Self {
        let assignments = result
            .assignments()
            .iter()
            .map(|(&course_id, &room_id)| Assignment { course_id, room_id })
            .collect();
        Self {
            feasible: result.is_feasible(),
            total_rooms_used: result.total_rooms_used(),
            assignments,
            unplaced_course: result.unplaced(),
        }
    }
}
