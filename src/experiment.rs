//! Synthetic instances and the experiments that measure the solver on them.
//!
//! Everything here is seeded, so a given [`ExperimentConfig`] reproduces
//! the same instances (timings aside) on every run.

use log::{debug, info};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Instant;

use crate::data::{Course, Day, Minute, Room, TimeSlot};
use crate::error::ModelError;
use crate::solver::AssignmentSolver;

/// Shape of the generated courses and rooms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Enrollment range (min, max), inclusive.
    pub enrollment_range: (u32, u32),
    /// Candidate meeting windows; each course picks one and repeats it.
    pub start_slots: Vec<(Minute, Minute)>,
    /// Chance a course meets MON/WED/FRI rather than TUE/THU.
    pub mwf_probability: f64,
    /// Share of rooms drawn from the small band.
    pub small_fraction: f64,
    /// Share of rooms drawn from the medium band.
    pub medium_fraction: f64,
    pub small_capacity: (u32, u32),
    pub medium_capacity: (u32, u32),
    pub large_capacity: (u32, u32),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enrollment_range: (15, 150),
            // 8:00-8:50 through 17:00-17:50
            start_slots: (0..10).map(|h| (480 + h * 60, 530 + h * 60)).collect(),
            mwf_probability: 0.5,
            small_fraction: 0.3,
            medium_fraction: 0.4,
            small_capacity: (20, 40),
            medium_capacity: (50, 80),
            large_capacity: (100, 200),
        }
    }
}

impl GeneratorConfig {
    /// Checks every range and probability the generator samples from.
    pub fn validate(&self) -> Result<(), ModelError> {
        let ranges = [
            ("enrollment", self.enrollment_range),
            ("small capacity", self.small_capacity),
            ("medium capacity", self.medium_capacity),
            ("large capacity", self.large_capacity),
        ];
        for (field, (min, max)) in ranges {
            if min > max {
                return Err(ModelError::EmptyRange { field, min, max });
            }
        }

        if self.start_slots.is_empty() {
            return Err(ModelError::NoStartSlots);
        }
        for &(start, end) in &self.start_slots {
            TimeSlot::new(Day::Mon, start, end)?;
        }

        let probabilities = [
            ("mwf probability", self.mwf_probability),
            ("small fraction", self.small_fraction),
            ("medium fraction", self.medium_fraction),
        ];
        for (field, p) in probabilities {
            // also rejects NaN
            if !(0.0..=1.0).contains(&p) {
                return Err(ModelError::ProbabilityOutOfRange(field));
            }
        }
        if self.small_fraction + self.medium_fraction > 1.0 {
            return Err(ModelError::FractionsExceedOne);
        }
        Ok(())
    }
}

/// Random course and room generator.
pub struct InstanceGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl InstanceGenerator {
    /// Fails if `config` would make sampling impossible.
    pub fn new(config: GeneratorConfig, seed: u64) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Courses with ids `0..n`, each meeting MWF or TR in a single window.
    pub fn generate_courses(&mut self, n: usize) -> Result<Vec<Course>, ModelError> {
        let (min_enr, max_enr) = self.config.enrollment_range;
        let mut courses = Vec::with_capacity(n);

        for i in 0..n {
            let enrollment = self.rng.random_range(min_enr..=max_enr);
            let days: &[Day] = if self.rng.random_bool(self.config.mwf_probability) {
                &[Day::Mon, Day::Wed, Day::Fri]
            } else {
                &[Day::Tue, Day::Thu]
            };
            let pick = self.rng.random_range(0..self.config.start_slots.len());
            let (start, end) = self.config.start_slots[pick];
            let schedule = days
                .iter()
                .map(|&day| TimeSlot::new(day, start, end))
                .collect::<Result<Vec<_>, _>>()?;

            let id = i as u32;
            courses.push(Course::new(id, format!("CS{id}"), enrollment, schedule)?);
        }
        Ok(courses)
    }

    /// Rooms with ids `0..n`, split into small, medium and large bands.
    pub fn generate_rooms(&mut self, n: usize) -> Result<Vec<Room>, ModelError> {
        let small = (n as f64 * self.config.small_fraction) as usize;
        let medium = (n as f64 * self.config.medium_fraction) as usize;
        let large = n.saturating_sub(small + medium);

        let bands = [
            (small, self.config.small_capacity),
            (medium, self.config.medium_capacity),
            (large, self.config.large_capacity),
        ];

        let mut rooms = Vec::with_capacity(n);
        for (count, (min_cap, max_cap)) in bands {
            for _ in 0..count {
                let id = rooms.len() as u32;
                let capacity = self.rng.random_range(min_cap..=max_cap);
                rooms.push(Room::new(id, format!("Room{}", id + 1), capacity)?);
            }
        }
        Ok(rooms)
    }
}

/// Configuration for an experiment run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentConfig {
    pub seed: u64,
    pub course_counts: Vec<usize>,
    /// Repetitions per course count in the detailed study.
    pub iterations: usize,
    /// Rooms generated per course.
    pub room_ratio: f64,
    pub min_rooms: usize,
    pub generator: GeneratorConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            course_counts: vec![10, 50, 100, 200, 500, 1000],
            iterations: 10,
            room_ratio: 0.4,
            min_rooms: 10,
            generator: GeneratorConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn rooms_for(&self, courses: usize) -> usize {
        self.min_rooms.max((courses as f64 * self.room_ratio) as usize)
    }
}

/// One solve at one problem size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingRow {
    pub courses: usize,
    pub rooms: usize,
    pub time_ms: f64,
    pub rooms_used: usize,
    pub feasible: bool,
}

/// Aggregate over `iterations` fresh instances at one problem size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRow {
    pub courses: usize,
    pub rooms: usize,
    pub avg_time_ms: f64,
    pub std_dev_ms: f64,
    /// Mean over feasible runs only; 0 if there were none.
    pub avg_rooms_used: f64,
    /// Percentage of feasible runs.
    pub success_rate: f64,
}

/// How often one solver is feasible where the other is not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRow {
    pub courses: usize,
    pub rooms: usize,
    pub trials: usize,
    pub heuristic_feasible: usize,
    pub baseline_feasible: usize,
    /// Instances the baseline solved and the heuristic did not.
    pub heuristic_missed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentReport {
    pub solver: String,
    pub config: ExperimentConfig,
    pub scaling: Vec<ScalingRow>,
    pub detailed: Vec<DetailedRow>,
}

/// Mean and population standard deviation; `(0, 0)` for no samples.
pub fn mean_and_std_dev(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Drives a solver over generated instances.
pub struct ExperimentRunner {
    config: ExperimentConfig,
    generator: InstanceGenerator,
}

impl ExperimentRunner {
    pub fn new(config: ExperimentConfig) -> Result<Self, ModelError> {
        let generator = InstanceGenerator::new(config.generator.clone(), config.seed)?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    fn instance(&mut self, courses: usize) -> Result<(Vec<Course>, Vec<Room>), ModelError> {
        let rooms = self.config.rooms_for(courses);
        Ok((
            self.generator.generate_courses(courses)?,
            self.generator.generate_rooms(rooms)?,
        ))
    }

    /// One instance per course count.
    pub fn run_scaling(
        &mut self,
        solver: &dyn AssignmentSolver,
    ) -> Result<Vec<ScalingRow>, ModelError> {
        info!(
            "Running {} scaling experiment over {:?} courses",
            solver.name(),
            self.config.course_counts
        );
        let counts = self.config.course_counts.clone();
        let mut rows = Vec::with_capacity(counts.len());

        for n in counts {
            let (courses, rooms) = self.instance(n)?;
            let start = Instant::now();
            let result = solver.solve(&courses, &rooms);
            let time_ms = start.elapsed().as_secs_f64() * 1000.0;

            rows.push(ScalingRow {
                courses: n,
                rooms: rooms.len(),
                time_ms,
                rooms_used: result.total_rooms_used(),
                feasible: result.is_feasible(),
            });
        }
        Ok(rows)
    }

    /// `iterations` fresh instances per course count, aggregated.
    pub fn run_detailed(
        &mut self,
        solver: &dyn AssignmentSolver,
    ) -> Result<Vec<DetailedRow>, ModelError> {
        info!(
            "Running {} detailed experiment, {} iterations per size",
            solver.name(),
            self.config.iterations
        );
        let counts = self.config.course_counts.clone();
        let iterations = self.config.iterations;
        let mut rows = Vec::with_capacity(counts.len());

        for n in counts {
            let mut times = Vec::with_capacity(iterations);
            let mut rooms_used = Vec::new();
            let mut rooms = 0;

            for iter in 0..iterations {
                let (courses, room_set) = self.instance(n)?;
                rooms = room_set.len();
                let start = Instant::now();
                let result = solver.solve(&courses, &room_set);
                times.push(start.elapsed().as_secs_f64() * 1000.0);

                debug!(
                    "{} courses, iteration {}: feasible={}",
                    n,
                    iter,
                    result.is_feasible()
                );
                if result.is_feasible() {
                    rooms_used.push(result.total_rooms_used() as f64);
                }
            }

            let (avg_time_ms, std_dev_ms) = mean_and_std_dev(&times);
            let (avg_rooms_used, _) = mean_and_std_dev(&rooms_used);
            let success_rate = if iterations == 0 {
                0.0
            } else {
                rooms_used.len() as f64 * 100.0 / iterations as f64
            };

            rows.push(DetailedRow {
                courses: n,
                rooms,
                avg_time_ms,
                std_dev_ms,
                avg_rooms_used,
                success_rate,
            });
        }
        Ok(rows)
    }

    /// Scaling then detailed, sharing one random stream.
    pub fn run(&mut self, solver: &dyn AssignmentSolver) -> Result<ExperimentReport, ModelError> {
        let scaling = self.run_scaling(solver)?;
        let detailed = self.run_detailed(solver)?;
        Ok(ExperimentReport {
            solver: solver.name().to_string(),
            config: self.config.clone(),
            scaling,
            detailed,
        })
    }

    /// Runs both solvers on the same instances and counts disagreements.
    pub fn run_gap(
        &mut self,
        heuristic: &dyn AssignmentSolver,
        baseline: &dyn AssignmentSolver,
    ) -> Result<Vec<GapRow>, ModelError> {
        info!(
            "Comparing {} against {} over {:?} courses",
            heuristic.name(),
            baseline.name(),
            self.config.course_counts
        );
        let counts = self.config.course_counts.clone();
        let trials = self.config.iterations;
        let mut rows = Vec::with_capacity(counts.len());

        for n in counts {
            let mut row = GapRow {
                courses: n,
                rooms: self.config.rooms_for(n),
                trials,
                heuristic_feasible: 0,
                baseline_feasible: 0,
                heuristic_missed: 0,
            };
            for _ in 0..trials {
                let (courses, rooms) = self.instance(n)?;
                let h = heuristic.solve(&courses, &rooms).is_feasible();
                let b = baseline.solve(&courses, &rooms).is_feasible();
                row.heuristic_feasible += h as usize;
                row.baseline_feasible += b as usize;
                row.heuristic_missed += (b && !h) as usize;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// The four-course, three-room demonstration instance.
pub fn sample_problem() -> Result<(Vec<Course>, Vec<Room>), ModelError> {
    let mon_wed = |start, end| -> Result<Vec<TimeSlot>, ModelError> {
        Ok(vec![
            TimeSlot::new(Day::Mon, start, end)?,
            TimeSlot::new(Day::Wed, start, end)?,
        ])
    };
    let tue_thu = |start, end| -> Result<Vec<TimeSlot>, ModelError> {
        Ok(vec![
            TimeSlot::new(Day::Tue, start, end)?,
            TimeSlot::new(Day::Thu, start, end)?,
        ])
    };

    let courses = vec![
        Course::new(1, "CS101", 45, mon_wed(540, 650)?)?,
        Course::new(2, "CS201", 80, tue_thu(600, 710)?)?,
        Course::new(3, "CS301", 30, mon_wed(540, 650)?)?,
        Course::new(4, "MATH101", 120, tue_thu(600, 710)?)?,
    ];
    let rooms = vec![
        Room::new(1, "RoomA", 50)?,
        Room::new(2, "RoomB", 100)?,
        Room::new(3, "RoomC", 150)?,
    ];
    Ok((courses, rooms))
}
