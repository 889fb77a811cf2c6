use crate::data::{Room, TimeSlot};

/// Slots a single room has already given away during one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomOccupancy {
    occupied: Vec<TimeSlot>,
}

impl RoomOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.occupied.clear();
    }

    /// True if none of `requested` overlaps an occupied slot.
    pub fn is_available(&self, requested: &[TimeSlot]) -> bool {
        !requested
            .iter()
            .any(|r| self.occupied.iter().any(|o| r.overlaps(o)))
    }

    // no dedup or merging; duplicates never change an overlap answer
    pub fn occupy(&mut self, slots: &[TimeSlot]) {
        self.occupied.extend_from_slice(slots);
    }

    pub fn occupied(&self) -> &[TimeSlot] {
        &self.occupied
    }
}

/// Per-solve occupancy for a room list, addressed by position in that list.
///
/// Built empty for every solve so no state leaks between calls.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    rooms: Vec<RoomOccupancy>,
}

impl OccupancyIndex {
    pub fn for_rooms(rooms: &[Room]) -> Self {
        Self {
            rooms: vec![RoomOccupancy::new(); rooms.len()],
        }
    }

    pub fn is_available(&self, room: usize, requested: &[TimeSlot]) -> bool {
        self.rooms[room].is_available(requested)
    }

    pub fn occupy(&mut self, room: usize, slots: &[TimeSlot]) {
        self.rooms[room].occupy(slots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Day;

    fn slot(day: Day, start: u16, end: u16) -> TimeSlot {
        TimeSlot::new(day, start, end).unwrap()
    }

    #[test]
    fn test_empty_room_is_available() {
        let occ = RoomOccupancy::new();
        assert!(occ.is_available(&[slot(Day::Mon, 540, 650)]));
        assert!(occ.is_available(&[]));
    }

    #[test]
    fn test_occupy_blocks_overlapping_requests_only() {
        let mut occ = RoomOccupancy::new();
        occ.occupy(&[slot(Day::Mon, 540, 650), slot(Day::Wed, 540, 650)]);

        assert!(!occ.is_available(&[slot(Day::Wed, 600, 700)]));
        assert!(!occ.is_available(&[slot(Day::Tue, 540, 650), slot(Day::Mon, 500, 541)]));
        assert!(occ.is_available(&[slot(Day::Mon, 650, 760), slot(Day::Tue, 540, 650)]));
    }

    #[test]
    fn test_duplicate_occupation_is_harmless() {
        let mut occ = RoomOccupancy::new();
        let s = [slot(Day::Fri, 900, 950)];
        occ.occupy(&s);
        occ.occupy(&s);
        assert_eq!(occ.occupied().len(), 2);
        assert!(!occ.is_available(&s));
        assert!(occ.is_available(&[slot(Day::Fri, 950, 1000)]));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut occ = RoomOccupancy::new();
        occ.occupy(&[slot(Day::Thu, 600, 710)]);
        occ.reset();
        assert!(occ.occupied().is_empty());
        assert!(occ.is_available(&[slot(Day::Thu, 600, 710)]));
    }

    #[test]
    fn test_index_tracks_rooms_independently() {
        let rooms = vec![
            Room::new(1, "A", 10).unwrap(),
            Room::new(2, "B", 10).unwrap(),
        ];
        let mut index = OccupancyIndex::for_rooms(&rooms);
        let s = [slot(Day::Mon, 540, 650)];

        index.occupy(0, &s);
        assert!(!index.is_available(0, &s));
        assert!(index.is_available(1, &s));

        let fresh = OccupancyIndex::for_rooms(&rooms);
        assert!(fresh.is_available(0, &s));
    }
}
