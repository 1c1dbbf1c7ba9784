//! Weekly schedule index over chosen classes.
//!
//! A [`Schedule`] holds the courses a student picked, one lecture and at most
//! one secondary class each, and indexes them by `(weekday, start hour)` so a
//! week grid can look up the class for a cell directly.

use chrono::Timelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Class, ClassType, Course, Weekday};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// No class with this code in the course
    #[error("{course} has no class with code {code}")]
    MissingClass { course: String, code: u32 },

    #[error("Class {} is not a lecture", class_label(.code))]
    NotALecture { code: Option<u32> },

    /// Secondary class isn't of the course's secondary type
    #[error(
        "Class {} is {}, expected {}",
        class_label(.code),
        type_label(.found),
        type_label(.expected)
    )]
    SecondaryTypeMismatch {
        code: Option<u32>,
        found: Option<ClassType>,
        expected: Option<ClassType>,
    },

    /// Classes belong to different courses
    #[error("Class {} belongs to {found}, not {expected}", class_label(.code))]
    CourseMismatch {
        code: Option<u32>,
        found: String,
        expected: String,
    },

    /// Slots already taken by earlier courses
    #[error("Time slots already taken: {}", format_slots(.slots))]
    Conflict { slots: Vec<SlotKey> },
}

fn class_label(code: &Option<u32>) -> String {
    code.map_or_else(|| "?".to_string(), |code| code.to_string())
}

fn type_label(class_type: &Option<ClassType>) -> &'static str {
    class_type.map_or("?", |t| t.code())
}

fn format_slots(slots: &[SlotKey]) -> String {
    slots
        .iter()
        .map(SlotKey::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A cell of the week grid. Displays as `"<day code><hour>"`, e.g. `"Tu14"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: Weekday,
    pub hour: u32,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.day.code(), self.hour)
    }
}

/// Slots a class starts in. TBA classes have none.
fn class_slots(class: &Class) -> Vec<SlotKey> {
    class
        .time
        .known()
        .map(|period| {
            period
                .days
                .iter()
                .map(|&day| SlotKey {
                    day,
                    hour: period.start.hour(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A course narrowed to the classes a student picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleCourse {
    pub course_id: String,
    pub title: String,
    pub lecture: Class,
    pub secondary: Option<Class>,
}

impl ScheduleCourse {
    /// Picks a lecture and an optional secondary class from a parsed course.
    pub fn select(
        course: &Course,
        lecture_code: u32,
        secondary_code: Option<u32>,
    ) -> Result<Self, ScheduleError> {
        let find = |code: u32| {
            course
                .find_class(code)
                .cloned()
                .ok_or_else(|| ScheduleError::MissingClass {
                    course: course.id.clone(),
                    code,
                })
        };

        let lecture = find(lecture_code)?;
        if !lecture.is_lecture() {
            return Err(ScheduleError::NotALecture { code: lecture.code });
        }

        let secondary = secondary_code.map(find).transpose()?;
        if let Some(secondary) = &secondary {
            if secondary.class_type.is_none() || secondary.class_type != course.secondary_class_type {
                return Err(ScheduleError::SecondaryTypeMismatch {
                    code: secondary.code,
                    found: secondary.class_type,
                    expected: course.secondary_class_type,
                });
            }
        }

        Ok(Self {
            course_id: course.id.clone(),
            title: course.title.clone(),
            lecture,
            secondary,
        })
    }

    /// Pairs classes directly, checking they belong together.
    pub fn from_classes(
        title: impl Into<String>,
        lecture: Class,
        secondary: Option<Class>,
    ) -> Result<Self, ScheduleError> {
        if !lecture.is_lecture() {
            return Err(ScheduleError::NotALecture { code: lecture.code });
        }

        if let Some(secondary) = &secondary {
            if secondary.class_type.is_none() || secondary.is_lecture() {
                return Err(ScheduleError::SecondaryTypeMismatch {
                    code: secondary.code,
                    found: secondary.class_type,
                    expected: None,
                });
            }
            if secondary.course_id != lecture.course_id {
                return Err(ScheduleError::CourseMismatch {
                    code: secondary.code,
                    found: secondary.course_id.clone(),
                    expected: lecture.course_id.clone(),
                });
            }
        }

        Ok(Self {
            course_id: lecture.course_id.clone(),
            title: title.into(),
            lecture,
            secondary,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        std::iter::once(&self.lecture).chain(self.secondary.iter())
    }

    fn classes_mut(&mut self) -> impl Iterator<Item = &mut Class> {
        std::iter::once(&mut self.lecture).chain(self.secondary.iter_mut())
    }

    fn slots(&self) -> Vec<SlotKey> {
        self.classes().flat_map(class_slots).collect()
    }
}

/// Chosen courses plus the slot index used to draw them.
///
/// Each slot holds at most one class. Adding a course that starts in an
/// occupied slot replaces the earlier occupant; use
/// [`Schedule::try_add_course`] to refuse instead.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    courses: Vec<ScheduleCourse>,
    classes: Vec<Class>,
    /// Slot -> index into `classes`
    slots: HashMap<SlotKey, usize>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course, assigning it the next color id.
    ///
    /// Returns the slots that were taken from earlier courses.
    pub fn add_course(&mut self, mut course: ScheduleCourse) -> Vec<SlotKey> {
        let color_id = self.courses.len();
        let first_new = self.classes.len();
        let mut displaced = Vec::new();

        for class in course.classes_mut() {
            class.color_id = Some(color_id);
        }

        for class in course.classes() {
            let index = self.classes.len();
            for slot in class_slots(class) {
                if let Some(previous) = self.slots.insert(slot, index) {
                    if previous < first_new {
                        displaced.push(slot);
                    }
                }
            }
            self.classes.push(class.clone());
        }

        if displaced.is_empty() {
            debug!(course = %course.course_id, color_id, "Added course to schedule");
        } else {
            warn!(
                course = %course.course_id,
                color_id,
                displaced = %format_slots(&displaced),
                "Added course over occupied slots"
            );
        }

        self.courses.push(course);
        displaced
    }

    /// Adds a course only if none of its slots are taken.
    pub fn try_add_course(&mut self, course: ScheduleCourse) -> Result<(), ScheduleError> {
        let conflicts = self.conflicts(&course);
        if !conflicts.is_empty() {
            return Err(ScheduleError::Conflict { slots: conflicts });
        }

        self.add_course(course);
        Ok(())
    }

    /// Slots `course` would take from classes already in the schedule.
    pub fn conflicts(&self, course: &ScheduleCourse) -> Vec<SlotKey> {
        let mut slots: Vec<SlotKey> = course
            .slots()
            .into_iter()
            .filter(|slot| self.slots.contains_key(slot))
            .collect();
        slots.sort();
        slots.dedup();
        slots
    }

    /// The class starting in a grid cell, if any.
    pub fn get(&self, day: Weekday, hour: u32) -> Option<&Class> {
        self.slots
            .get(&SlotKey { day, hour })
            .map(|&index| &self.classes[index])
    }

    pub fn courses(&self) -> &[ScheduleCourse] {
        &self.courses
    }

    /// Every placed class, in the order added.
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Slot index keyed by display string, ready to serialize.
    pub fn slot_map(&self) -> BTreeMap<String, &Class> {
        self.slots
            .iter()
            .map(|(slot, &index)| (slot.to_string(), &self.classes[index]))
            .collect()
    }

    pub fn view(&self) -> ScheduleView<'_> {
        ScheduleView {
            courses: &self.courses,
            slots: self.slot_map(),
        }
    }
}

/// Serializable snapshot of a schedule.
#[derive(Debug, Serialize)]
pub struct ScheduleView<'a> {
    pub courses: &'a [ScheduleCourse],
    pub slots: BTreeMap<String, &'a Class>,
}
