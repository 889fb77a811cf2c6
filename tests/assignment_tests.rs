use std::collections::HashMap;

use room_assignment::experiment::{GeneratorConfig, InstanceGenerator, sample_problem};
use room_assignment::{AssignmentResult, Course, Day, Room, RoomId, TimeSlot, solve};

fn slot(day: Day, start: u16, end: u16) -> TimeSlot {
    TimeSlot::new(day, start, end).unwrap()
}

fn mon_wed(start: u16, end: u16) -> Vec<TimeSlot> {
    vec![slot(Day::Mon, start, end), slot(Day::Wed, start, end)]
}

/// Every course fits every room; with at least as many rooms as courses
/// the greedy always finds an empty room.
fn roomy() -> GeneratorConfig {
    GeneratorConfig {
        enrollment_range: (15, 20),
        ..GeneratorConfig::default()
    }
}

/// Capacity and no-conflict checks for a feasible result.
fn assert_valid(result: &AssignmentResult, courses: &[Course], rooms: &[Room]) {
    assert!(result.is_feasible());
    assert_eq!(result.assignments().len(), courses.len());

    let room_by_id: HashMap<RoomId, &Room> = rooms.iter().map(|r| (r.id(), r)).collect();
    for course in courses {
        let room_id = result.room_for(course.id()).expect("course left unassigned");
        let room = room_by_id[&room_id];
        assert!(
            room.capacity() >= course.enrollment(),
            "{course} placed in undersized {room}"
        );
    }

    for (i, a) in courses.iter().enumerate() {
        for b in &courses[i + 1..] {
            if result.room_for(a.id()) == result.room_for(b.id()) {
                assert!(!a.conflicts_with(b), "{a} and {b} share a room and overlap");
            }
        }
    }
}

#[test]
fn test_single_course_single_room() {
    let courses = vec![Course::new(1, "CS101", 45, mon_wed(540, 650)).unwrap()];
    let rooms = vec![Room::new(1, "RoomA", 50).unwrap()];

    let result = solve(&courses, &rooms);
    assert!(result.is_feasible());
    assert_eq!(result.total_rooms_used(), 1);
    assert_eq!(result.room_for(1), Some(1));
}

#[test]
fn test_identical_schedules_need_two_rooms() {
    let courses = vec![
        Course::new(1, "A", 30, vec![slot(Day::Mon, 540, 650)]).unwrap(),
        Course::new(2, "B", 30, vec![slot(Day::Mon, 540, 650)]).unwrap(),
    ];
    let rooms = vec![Room::new(1, "Hall", 100).unwrap()];

    let result = solve(&courses, &rooms);
    assert!(!result.is_feasible());
    assert_eq!(result.total_rooms_used(), 0);
    assert_eq!(result.unplaced(), Some(2));
}

#[test]
fn test_four_course_demo() {
    let (courses, rooms) = sample_problem().unwrap();
    let result = solve(&courses, &rooms);

    assert_valid(&result, &courses, &rooms);
    assert_eq!(result.total_rooms_used(), 3);
    // MATH101 -> RoomC, CS201 -> RoomB, CS101 -> RoomA, CS301 -> RoomB
    assert_eq!(result.room_for(4), Some(3));
    assert_eq!(result.room_for(2), Some(2));
    assert_eq!(result.room_for(1), Some(1));
    assert_eq!(result.room_for(3), Some(2));
}

#[test]
fn test_no_courses_is_trivially_feasible() {
    let rooms = vec![
        Room::new(1, "RoomA", 50).unwrap(),
        Room::new(2, "RoomB", 100).unwrap(),
    ];
    let result = solve(&[], &rooms);
    assert!(result.is_feasible());
    assert_eq!(result.total_rooms_used(), 0);
    assert!(result.assignments().is_empty());
}

#[test]
fn test_solve_is_idempotent() {
    let mut generator = InstanceGenerator::new(GeneratorConfig::default(), 11).unwrap();
    let courses = generator.generate_courses(120).unwrap();
    let rooms = generator.generate_rooms(48).unwrap();

    let first = solve(&courses, &rooms);
    let second = solve(&courses, &rooms);
    assert_eq!(first, second);
}

#[test]
fn test_generated_feasible_results_respect_constraints() {
    let mut generator = InstanceGenerator::new(GeneratorConfig::default(), 3).unwrap();
    for n in [10, 40, 80, 150] {
        let courses = generator.generate_courses(n).unwrap();
        let rooms = generator.generate_rooms((n * 2 / 5).max(10)).unwrap();
        let result = solve(&courses, &rooms);
        if result.is_feasible() {
            assert_valid(&result, &courses, &rooms);
        } else {
            assert_eq!(result.total_rooms_used(), 0);
            assert!(result.unplaced().is_some());
        }
    }

    let mut generator = InstanceGenerator::new(roomy(), 3).unwrap();
    for n in [10, 40, 80] {
        let courses = generator.generate_courses(n).unwrap();
        let rooms = generator.generate_rooms(n).unwrap();
        let result = solve(&courses, &rooms);
        assert_valid(&result, &courses, &rooms);
        assert!(result.total_rooms_used() <= n);
    }
}

#[test]
fn test_adding_a_large_free_room_never_hurts() {
    let mut generator = InstanceGenerator::new(GeneratorConfig::default(), 5).unwrap();
    let mut roomy_generator = InstanceGenerator::new(roomy(), 5).unwrap();
    let mut checked = 0;
    for n in [10, 20, 30, 60, 120] {
        let (courses, rooms) = if n % 20 == 0 {
            (
                roomy_generator.generate_courses(n).unwrap(),
                roomy_generator.generate_rooms(n).unwrap(),
            )
        } else {
            (
                generator.generate_courses(n).unwrap(),
                generator.generate_rooms((n / 2).max(10)).unwrap(),
            )
        };
        let before = solve(&courses, &rooms);

        // as large as any course and any existing room, so it sorts last
        let capacity = courses
            .iter()
            .map(Course::enrollment)
            .chain(rooms.iter().map(Room::capacity))
            .max()
            .unwrap();
        let mut more_rooms = rooms.clone();
        more_rooms.push(Room::new(10_000, "Annex", capacity).unwrap());
        let after = solve(&courses, &more_rooms);

        if before.is_feasible() {
            checked += 1;
            assert_eq!(after, before, "{n} courses changed with a spare room");
        }
        if after.is_feasible() {
            assert_valid(&after, &courses, &more_rooms);
        }
    }

    // hand-built case that the greedy fails without the spare room
    let courses = vec![
        Course::new(1, "A", 30, vec![slot(Day::Mon, 540, 650)]).unwrap(),
        Course::new(2, "B", 30, vec![slot(Day::Mon, 540, 650)]).unwrap(),
    ];
    let rooms = vec![Room::new(1, "Hall", 100).unwrap()];
    assert!(!solve(&courses, &rooms).is_feasible());
    let more_rooms = vec![rooms[0].clone(), Room::new(2, "Annex", 100).unwrap()];
    let result = solve(&courses, &more_rooms);
    assert_valid(&result, &courses, &more_rooms);
    assert_eq!(result.total_rooms_used(), 2);
    assert!(checked > 0);
}

#[test]
fn test_inputs_are_untouched_between_solves() {
    let (courses, rooms) = sample_problem().unwrap();
    let snapshot = (courses.clone(), rooms.clone());

    let _ = solve(&courses, &rooms);
    let again = solve(&courses, &rooms);

    assert_eq!((courses, rooms), snapshot);
    assert_eq!(again.total_rooms_used(), 3);
}
