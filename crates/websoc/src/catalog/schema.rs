//! Column layout of a class row and the decoder each column goes through.

use tracing::warn;

use super::decode::*;
use super::error::{FieldError, ParseError};
use super::types::*;
use crate::term::Term;

/// Text pulled out of one `<td>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// All text in the cell
    pub text: String,
    /// Text split at `<br>` elements
    pub lines: Vec<String>,
    /// `href` of the first anchor in the cell
    pub href: Option<String>,
}

impl RawCell {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lines: vec![text.to_string()],
            href: None,
        }
    }

    fn first_line(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or(&self.text)
    }
}

/// Columns of a class row, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassField {
    Code,
    Type,
    Section,
    Units,
    Instructor,
    Modality,
    Time,
    Place,
    Final,
    Maximum,
    Enrolled,
    Waitlist,
    Requests,
    NewOnlyReserved,
    Restrictions,
    Textbook,
    Website,
    Status,
}

/// The class row schema: cell `i` holds `CLASS_ROW_SCHEMA[i]`.
pub const CLASS_ROW_SCHEMA: [ClassField; 18] = [
    ClassField::Code,
    ClassField::Type,
    ClassField::Section,
    ClassField::Units,
    ClassField::Instructor,
    ClassField::Modality,
    ClassField::Time,
    ClassField::Place,
    ClassField::Final,
    ClassField::Maximum,
    ClassField::Enrolled,
    ClassField::Waitlist,
    ClassField::Requests,
    ClassField::NewOnlyReserved,
    ClassField::Restrictions,
    ClassField::Textbook,
    ClassField::Website,
    ClassField::Status,
];

impl ClassField {
    pub fn name(&self) -> &'static str {
        match self {
            ClassField::Code => "code",
            ClassField::Type => "type",
            ClassField::Section => "section",
            ClassField::Units => "units",
            ClassField::Instructor => "instructor",
            ClassField::Modality => "modality",
            ClassField::Time => "time",
            ClassField::Place => "place",
            ClassField::Final => "final",
            ClassField::Maximum => "maximum",
            ClassField::Enrolled => "enrolled",
            ClassField::Waitlist => "waitlist",
            ClassField::Requests => "requests",
            ClassField::NewOnlyReserved => "newOnlyReserved",
            ClassField::Restrictions => "restrictions",
            ClassField::Textbook => "textbook",
            ClassField::Website => "website",
            ClassField::Status => "status",
        }
    }
}

/// Keeps the value, or logs the decode failure and falls back.
fn soft<T>(row: usize, result: Result<T, FieldError>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        warn!(row, error = %e, "Treating field as unknown");
        fallback
    })
}

/// Decodes a class row's cells into a [`Class`].
///
/// Cells beyond the schema are ignored. A cell that can't be read leaves its
/// field unknown and is logged; only a row too short for the schema fails.
pub fn decode_class(
    cells: &[RawCell],
    course_id: &str,
    term: &Term,
    row: usize,
) -> Result<Class, ParseError> {
    let cell = |index: usize| {
        cells.get(index).ok_or(ParseError::MissingCell {
            row,
            index,
            field: CLASS_ROW_SCHEMA[index].name(),
        })
    };

    let mut class = Class {
        course_id: course_id.to_string(),
        code: None,
        class_type: None,
        section: Section::default(),
        units: None,
        instructor: Vec::new(),
        modality: None,
        time: Listed::Tba,
        place: Listed::Tba,
        final_exam: Listed::Tba,
        maximum: None,
        enrolled: None,
        waitlist: decode_waitlist(""),
        requests: None,
        new_only_reserved: None,
        restrictions: Vec::new(),
        textbook: None,
        website: None,
        status: None,
        comment: None,
        color_id: None,
    };
    let mut place_text = "";

    for (index, field) in CLASS_ROW_SCHEMA.iter().enumerate() {
        let raw = cell(index)?;
        let text = raw.text.as_str();

        match field {
            ClassField::Code => {
                class.code = soft(row, decode_count(text, "code").map(Some), None)
            }
            ClassField::Type => {
                class.class_type = soft(row, decode_class_type(text).map(Some), None)
            }
            ClassField::Section => class.section = decode_section(text),
            ClassField::Units => class.units = soft(row, decode_units(text).map(Some), None),
            ClassField::Instructor => class.instructor = decode_instructors(&raw.lines),
            ClassField::Modality => {
                class.modality = soft(row, decode_modality(text).map(Some), None)
            }
            ClassField::Time => {
                class.time = soft(row, decode_recurring_time(raw.first_line()), Listed::Tba)
            }
            // Depends on modality, decoded once the loop is done.
            ClassField::Place => place_text = raw.first_line(),
            ClassField::Final => {
                class.final_exam = soft(row, decode_final(text, term), Listed::Tba)
            }
            ClassField::Maximum => {
                class.maximum = soft(row, decode_count(text, "maximum").map(Some), None)
            }
            ClassField::Enrolled => {
                class.enrolled = soft(row, decode_enrolled(text).map(Some), None)
            }
            ClassField::Waitlist => class.waitlist = decode_waitlist(text),
            ClassField::Requests => {
                class.requests = soft(row, decode_count(text, "requests").map(Some), None)
            }
            ClassField::NewOnlyReserved => {
                class.new_only_reserved =
                    soft(row, decode_count(text, "newOnlyReserved").map(Some), None)
            }
            ClassField::Restrictions => class.restrictions = decode_restrictions(text),
            ClassField::Textbook => class.textbook = raw.href.as_deref().and_then(decode_link),
            ClassField::Website => class.website = raw.href.as_deref().and_then(decode_link),
            ClassField::Status => {
                class.status = soft(row, decode_status(text).map(Some), None)
            }
        }
    }

    class.place = decode_place(place_text, class.modality);
    Ok(class)
}
