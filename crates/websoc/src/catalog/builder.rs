//! Folds classified rows into courses.

use std::mem;

use tracing::debug;

use super::error::{ParseError, RowKind};
use super::schema::{decode_class, RawCell};
use super::types::Course;
use crate::term::Term;

/// A table row after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    CourseHeader { id: String, title: String },
    Class(Vec<RawCell>),
    Comment(String),
    /// Spacers, column headings, anything we don't care about
    Other,
}

impl Row {
    fn kind(&self) -> Option<RowKind> {
        match self {
            Row::CourseHeader { .. } => Some(RowKind::CourseHeader),
            Row::Class(_) => Some(RowKind::Class),
            Row::Comment(_) => Some(RowKind::Comment),
            Row::Other => None,
        }
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    NoOpenCourse,
    CourseOpen(Course),
}

/// Builds the course list one row at a time.
///
/// At most one course is open; it is complete once the next header arrives
/// or [`CatalogBuilder::finish`] is called.
pub struct CatalogBuilder<'t> {
    term: &'t Term,
    state: State,
    courses: Vec<Course>,
    rows_seen: usize,
}

impl<'t> CatalogBuilder<'t> {
    pub fn new(term: &'t Term) -> Self {
        Self {
            term,
            state: State::NoOpenCourse,
            courses: Vec::new(),
            rows_seen: 0,
        }
    }

    /// Applies one row. Class and comment rows need an open course.
    ///
    /// A failed class row leaves the open course as it was, so the caller
    /// may skip the row and keep going.
    pub fn push(&mut self, row: Row) -> Result<(), ParseError> {
        let index = self.rows_seen;
        self.rows_seen += 1;

        let state = mem::take(&mut self.state);
        let next = match (state, row) {
            (state, Row::Other) => state,

            (state, Row::CourseHeader { id, title }) => {
                if let State::CourseOpen(done) = state {
                    self.complete(done);
                }
                debug!(row = index, course = %id, "Opening course");
                State::CourseOpen(Course::new(id, title))
            }

            (State::CourseOpen(mut course), Row::Class(cells)) => {
                match decode_class(&cells, &course.id, self.term, index) {
                    Ok(class) => course.push_class(class),
                    Err(e) => {
                        self.state = State::CourseOpen(course);
                        return Err(e);
                    }
                }
                State::CourseOpen(course)
            }

            (State::CourseOpen(mut course), Row::Comment(text)) => {
                course.attach_comment(text);
                State::CourseOpen(course)
            }

            (State::NoOpenCourse, row) => {
                return Err(ParseError::MalformedRow {
                    row: index,
                    kind: row.kind().unwrap_or(RowKind::Class),
                });
            }
        };

        self.state = next;
        Ok(())
    }

    fn complete(&mut self, course: Course) {
        debug!(course = %course.id, classes = course.classes.len(), "Course complete");
        self.courses.push(course);
    }

    /// Closes the open course, if any, and returns every course in order.
    pub fn finish(mut self) -> Vec<Course> {
        if let State::CourseOpen(course) = mem::take(&mut self.state) {
            self.complete(course);
        }
        self.courses
    }
}
