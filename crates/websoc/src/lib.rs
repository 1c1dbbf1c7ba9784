//! Parser for the registrar's WebSoc course listings.
//!
//! [`catalog::parse_courses`] turns a department's results page into typed
//! [`catalog::Course`]s, and [`schedule::Schedule`] indexes a selection of
//! their classes by weekly time slot.

pub mod catalog;
pub mod config;
pub mod schedule;
pub mod term;

pub use catalog::{parse_courses, Class, Course, ParseError};
pub use config::{Config, ConfigError};
pub use schedule::{Schedule, ScheduleCourse, ScheduleError, SlotKey};
pub use term::{resolve_term, Term, TermCutoff};
