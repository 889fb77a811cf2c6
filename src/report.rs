//! Plain-text tables for the CLI.

use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

use crate::data::{AssignmentResult, Course, Room, RoomId};
use crate::experiment::{DetailedRow, GapRow, ScalingRow};

struct Listing<'a> {
    result: &'a AssignmentResult,
    courses: &'a [Course],
    rooms: &'a [Room],
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.result.is_feasible() {
            writeln!(f, "No feasible assignment found!")?;
            if let Some(id) = self.result.unplaced() {
                let name = self
                    .courses
                    .iter()
                    .find(|c| c.id() == id)
                    .map(|c| c.name())
                    .unwrap_or("?");
                writeln!(f, "  first course without a room: {name} (id {id})")?;
            }
            return Ok(());
        }

        let by_id: HashMap<RoomId, &Room> = self.rooms.iter().map(|r| (r.id(), r)).collect();
        writeln!(f, "Assignment successful!")?;
        writeln!(f, "Total rooms used: {}", self.result.total_rooms_used())?;
        writeln!(f, "\nAssignments:")?;
        for course in self
            .courses
            .iter()
            .sorted_by(|a, b| b.enrollment().cmp(&a.enrollment()))
        {
            let Some(room) = self.result.room_for(course.id()).and_then(|r| by_id.get(&r)) else {
                continue;
            };
            writeln!(
                f,
                "  {} -> {}  [{}]",
                course,
                room,
                course.schedule().iter().join(", ")
            )?;
        }
        Ok(())
    }
}

/// Lists each course next to its room, largest course first.
pub fn assignment_listing(
    result: &AssignmentResult,
    courses: &[Course],
    rooms: &[Room],
) -> String {
    Listing {
        result,
        courses,
        rooms,
    }
    .to_string()
}

struct ScalingTable<'a>(&'a [ScalingRow]);

impl fmt::Display for ScalingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>7}  {:>5}  {:>9}  {:>9}  {:>7}",
            "Courses", "Rooms", "Time(ms)", "RoomsUsed", "Success"
        )?;
        writeln!(f, "{}", "-".repeat(45))?;
        for row in self.0 {
            writeln!(
                f,
                "{:>7}  {:>5}  {:>9.2}  {:>9}  {:>7}",
                row.courses,
                row.rooms,
                row.time_ms,
                row.rooms_used,
                if row.feasible { "Yes" } else { "No" }
            )?;
        }
        Ok(())
    }
}

pub fn scaling_table(rows: &[ScalingRow]) -> String {
    ScalingTable(rows).to_string()
}

struct DetailedTable<'a>(&'a [DetailedRow]);

impl fmt::Display for DetailedTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>7}  {:>11}  {:>8}  {:>8}  {:>11}",
            "Courses", "AvgTime(ms)", "StdDev", "AvgRooms", "SuccessRate"
        )?;
        writeln!(f, "{}", "-".repeat(53))?;
        for row in self.0 {
            writeln!(
                f,
                "{:>7}  {:>11.2}  {:>8.2}  {:>8.1}  {:>10.1}%",
                row.courses, row.avg_time_ms, row.std_dev_ms, row.avg_rooms_used, row.success_rate
            )?;
        }
        Ok(())
    }
}

pub fn detailed_table(rows: &[DetailedRow]) -> String {
    DetailedTable(rows).to_string()
}

struct GapTable<'a>(&'a [GapRow]);

impl fmt::Display for GapTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>7}  {:>5}  {:>6}  {:>6}  {:>6}  {:>6}",
            "Courses", "Rooms", "Trials", "Greedy", "Exact", "Missed"
        )?;
        writeln!(f, "{}", "-".repeat(46))?;
        for row in self.0 {
            writeln!(
                f,
                "{:>7}  {:>5}  {:>6}  {:>6}  {:>6}  {:>6}",
                row.courses,
                row.rooms,
                row.trials,
                row.heuristic_feasible,
                row.baseline_feasible,
                row.heuristic_missed
            )?;
        }
        Ok(())
    }
}

pub fn gap_table(rows: &[GapRow]) -> String {
    GapTable(rows).to_string()
}
