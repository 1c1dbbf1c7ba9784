/// Course listing parsing module
mod builder;
mod error;
mod schema;
mod types;

pub mod decode;

pub use builder::{CatalogBuilder, Row};
pub use error::{FieldError, ParseError, RowKind};
pub use schema::{decode_class, ClassField, RawCell, CLASS_ROW_SCHEMA};
pub use types::*;

#[cfg(test)]
pub(crate) use types::tests as fixtures;

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use tracing::info;

use crate::term::Term;

// Static selectors for parsing - compiled once
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("font").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

const COURSE_TITLE_CLASS: &str = "CourseTitle";
const COMMENTS_CLASS: &str = "Comments";

/// Parses a department's search results page into courses
///
/// # Arguments
/// * `html` - The results page
/// * `term` - Term the page was requested for (final exam dates need its year)
///
/// # Returns
/// * `Ok(Vec<Course>)` - Courses in page order
/// * `Err` - If a class or comment row appears before any course header, or
///   a class row can't be decoded
pub fn parse_courses(html: &str, term: &Term) -> Result<Vec<Course>, ParseError> {
    let document = Html::parse_document(html);
    let mut builder = CatalogBuilder::new(term);

    for row in document.select(&ROW_SELECTOR) {
        builder.push(classify_row(&row))?;
    }

    let courses = builder.finish();
    info!(
        term = %term,
        courses = courses.len(),
        classes = courses.iter().map(|c| c.classes.len()).sum::<usize>(),
        "Parsed course listing"
    );

    Ok(courses)
}

/// Direct `<td>` children of a row. Nested tables are left to their own rows.
fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect()
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Decides what a `<tr>` holds.
///
/// Headers carry a `CourseTitle` cell, class rows are top-aligned with
/// `nowrap` cells, comments carry a `Comments` cell.
pub fn classify_row(row: &ElementRef) -> Row {
    let tds = cells(row);

    if let Some(title_cell) = tds.iter().find(|td| has_class(td, COURSE_TITLE_CLASS)) {
        return parse_header(title_cell);
    }

    let top_aligned = row.value().attr("valign") == Some("top");
    if top_aligned && tds.iter().any(|td| td.value().attr("nowrap").is_some()) {
        return Row::Class(tds.iter().map(raw_cell).collect());
    }

    if let Some(comment_cell) = tds.iter().find(|td| has_class(td, COMMENTS_CLASS)) {
        return Row::Comment(comment_cell.text().collect::<String>().trim().to_string());
    }

    Row::Other
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits the header cell into course id and title.
///
/// The cell reads like `"\u{a0} I&C SCI\u{a0} 32 \u{a0} PRG SOFTWARE LIB (Prerequisites)"`
/// with the title inside a `<font>`.
fn parse_header(cell: &ElementRef) -> Row {
    let header = cell.text().collect::<String>();
    let title = cell
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let id_part = if title.is_empty() {
        header.as_str()
    } else {
        header.split(title.as_str()).next().unwrap_or_default()
    };

    Row::CourseHeader {
        id: collapse_whitespace(id_part),
        title,
    }
}

/// Text of a cell, split at `<br>` into lines.
fn cell_lines(cell: &ElementRef) -> Vec<String> {
    let mut lines = vec![String::new()];
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(text);
                }
            }
            Node::Element(el) if el.name() == "br" => lines.push(String::new()),
            _ => {}
        }
    }
    lines
}

fn raw_cell(cell: &ElementRef) -> RawCell {
    RawCell {
        text: cell.text().collect(),
        lines: cell_lines(cell),
        href: cell
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_row(html: &str) -> Row {
        let document = Html::parse_document(&format!("<table>{html}</table>"));
        let row = document.select(&ROW_SELECTOR).next().unwrap();
        classify_row(&row)
    }

    #[test]
    fn test_classify_header() {
        let row = first_row(
            r##"<tr bgcolor="#fff0ff" valign="top"><td class="CourseTitle" colspan="17" nowrap="nowrap">&nbsp; I&amp;C SCI&nbsp; 32 &nbsp; <font face="sans-serif"><b>PRG SOFTWARE LIB</b></font> <span>(<a href="/p">Prerequisites</a>)</span></td></tr>"##,
        );
        assert_eq!(
            row,
            Row::CourseHeader {
                id: "I&C SCI 32".to_string(),
                title: "PRG SOFTWARE LIB".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_class_row_splits_instructors() {
        let row = first_row(
            r##"<tr valign="top" bgcolor="#FFFFCC"><td nowrap="nowrap">35500</td><td>Lec</td><td>A</td><td>4</td><td>PATTIS, R.<br>STAFF</td><td nowrap="nowrap"><a href="https://uci.bncollege.com/b">Bookstore</a></td></tr>"##,
        );
        let Row::Class(cells) = row else {
            panic!("expected a class row");
        };
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0].text, "35500");
        assert_eq!(cells[4].lines, vec!["PATTIS, R.", "STAFF"]);
        assert_eq!(cells[5].href.as_deref(), Some("https://uci.bncollege.com/b"));
    }

    #[test]
    fn test_classify_comment_and_other() {
        let row = first_row(r#"<tr><td class="Comments" colspan="17">  Same as 35510 (EECS 22).  </td></tr>"#);
        assert_eq!(row, Row::Comment("Same as 35510 (EECS 22).".to_string()));

        let row = first_row(r#"<tr><th>Code</th><th>Type</th></tr>"#);
        assert_eq!(row, Row::Other);
    }

    #[test]
    fn test_parse_rejects_orphan_class_row() {
        let html = r#"<table><tr valign="top"><td nowrap="nowrap">35500</td></tr></table>"#;
        let term = Term::new("2024-92").unwrap();
        assert!(matches!(
            parse_courses(html, &term),
            Err(ParseError::MalformedRow { row: 0, kind: RowKind::Class })
        ));
    }
}
