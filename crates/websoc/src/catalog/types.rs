/// Types for parsed course listings
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use url::Url;

/// A value the registrar may leave as "TBA" or mark as not applying at all.
///
/// `Tba` means the value exists but hasn't been announced; `NotApplicable`
/// means there is nothing to announce (no final, no room for an online class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Listed<T> {
    Tba,
    NotApplicable,
    Known(T),
}

impl<T> Listed<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Listed::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_tba(&self) -> bool {
        matches!(self, Listed::Tba)
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Listed::NotApplicable)
    }
}

/// Kind of class offering. Only `Lecture` counts as a primary section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Lecture,
    Lab,
    Discussion,
    Tutorial,
    Seminar,
    Studio,
    Activity,
    Colloquium,
    FieldWork,
    Quiz,
    Research,
}

impl ClassType {
    pub fn from_code(code: &str) -> Option<Self> {
        let class_type = match code {
            "Lec" => ClassType::Lecture,
            "Lab" => ClassType::Lab,
            "Dis" => ClassType::Discussion,
            "Tut" => ClassType::Tutorial,
            "Sem" => ClassType::Seminar,
            "Stu" => ClassType::Studio,
            "Act" => ClassType::Activity,
            "Col" => ClassType::Colloquium,
            "Fld" => ClassType::FieldWork,
            "Qiz" => ClassType::Quiz,
            "Res" => ClassType::Research,
            _ => return None,
        };
        Some(class_type)
    }

    pub fn code(&self) -> &'static str {
        match self {
            ClassType::Lecture => "Lec",
            ClassType::Lab => "Lab",
            ClassType::Discussion => "Dis",
            ClassType::Tutorial => "Tut",
            ClassType::Seminar => "Sem",
            ClassType::Studio => "Stu",
            ClassType::Activity => "Act",
            ClassType::Colloquium => "Col",
            ClassType::FieldWork => "Fld",
            ClassType::Quiz => "Qiz",
            ClassType::Research => "Res",
        }
    }

    pub fn is_lecture(&self) -> bool {
        matches!(self, ClassType::Lecture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Online,
    InPerson,
}

impl Modality {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Online" => Some(Modality::Online),
            "In-Person" => Some(Modality::InPerson),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_code(code: &str) -> Option<Self> {
        let day = match code {
            "M" => Weekday::Monday,
            "Tu" => Weekday::Tuesday,
            "W" => Weekday::Wednesday,
            "Th" => Weekday::Thursday,
            "F" => Weekday::Friday,
            "Sa" => Weekday::Saturday,
            "Su" => Weekday::Sunday,
            _ => return None,
        };
        Some(day)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
            Weekday::Saturday => "Sa",
            Weekday::Sunday => "Su",
        }
    }
}

/// Enrollment restriction codes printed in the "Rstr" column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    PrerequisiteRequired,
    AuthorizationCodeRequired,
    FeeRequired,
    PassNotPassOptionOnly,
    FreshmenOnly,
    SophomoresOnly,
    LowerDivisionOnly,
    JuniorsOnly,
    SeniorsOnly,
    UpperDivisionOnly,
    GraduateOnly,
    MajorOnly,
    NonMajorOnly,
    SchoolMajorOnly,
    NonSchoolMajorOnly,
    BiomedicalPassFail,
    SatisfactoryUnsatisfactoryOnly,
    SeparateAuthorizationCodes,
}

impl Restriction {
    pub fn from_code(code: &str) -> Option<Self> {
        let restriction = match code {
            "A" => Restriction::PrerequisiteRequired,
            "B" => Restriction::AuthorizationCodeRequired,
            "C" => Restriction::FeeRequired,
            "D" => Restriction::PassNotPassOptionOnly,
            "E" => Restriction::FreshmenOnly,
            "F" => Restriction::SophomoresOnly,
            "G" => Restriction::LowerDivisionOnly,
            "H" => Restriction::JuniorsOnly,
            "I" => Restriction::SeniorsOnly,
            "J" => Restriction::UpperDivisionOnly,
            "K" => Restriction::GraduateOnly,
            "L" => Restriction::MajorOnly,
            "M" => Restriction::NonMajorOnly,
            "N" => Restriction::SchoolMajorOnly,
            "O" => Restriction::NonSchoolMajorOnly,
            "R" => Restriction::BiomedicalPassFail,
            "S" => Restriction::SatisfactoryUnsatisfactoryOnly,
            "X" => Restriction::SeparateAuthorizationCodes,
            _ => return None,
        };
        Some(restriction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Open,
    Waitlist,
    Full,
    NewOnly,
}

impl Status {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "OPEN" => Some(Status::Open),
            "WAITL" => Some(Status::Waitlist),
            "FULL" => Some(Status::Full),
            "NEWONLY" => Some(Status::NewOnly),
            _ => None,
        }
    }

    /// Open to at least some students right now.
    pub fn is_enrollable(&self) -> bool {
        matches!(self, Status::Open | Status::NewOnly)
    }
}

/// Section identifier. Either half may be missing (e.g. "12" has no letter).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub letter: Option<String>,
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Units {
    pub min: f32,
    pub max: f32,
}

/// Weekly recurring meeting time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPeriod {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// One-off period, used for finals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrolled {
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waitlist {
    pub students: Option<u32>,
    pub turned_off: bool,
}

/// A single class offering (one row of the listing).
///
/// Fields are `None` when the cell couldn't be read, a code included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Id of the owning course (e.g. "I&C SCI 32")
    pub course_id: String,
    pub code: Option<u32>,
    pub class_type: Option<ClassType>,
    pub section: Section,
    pub units: Option<Units>,
    pub instructor: Vec<String>,
    pub modality: Option<Modality>,
    pub time: Listed<RecurringPeriod>,
    pub place: Listed<String>,
    #[serde(rename = "final")]
    pub final_exam: Listed<ExactPeriod>,
    pub maximum: Option<u32>,
    pub enrolled: Option<Enrolled>,
    pub waitlist: Waitlist,
    pub requests: Option<u32>,
    pub new_only_reserved: Option<u32>,
    pub restrictions: Vec<Restriction>,
    pub textbook: Option<Url>,
    pub website: Option<Url>,
    pub status: Option<Status>,
    pub comment: Option<String>,
    /// Set once the class is placed into a schedule
    pub color_id: Option<usize>,
}

impl Class {
    pub fn is_lecture(&self) -> bool {
        self.class_type.is_some_and(|t| t.is_lecture())
    }

    /// Maps the color id onto a palette of `palette_len` colors.
    pub fn color_slot(&self, palette_len: usize) -> Option<usize> {
        match (self.color_id, palette_len) {
            (_, 0) => None,
            (id, len) => id.map(|id| id % len),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    /// Classes in listing order
    pub classes: Vec<Class>,
    pub comment: Option<String>,
    /// The non-lecture type offered alongside the lectures, if any
    pub secondary_class_type: Option<ClassType>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            classes: Vec::new(),
            comment: None,
            secondary_class_type: None,
        }
    }

    /// Appends a class, tracking the secondary type. Last non-lecture type wins;
    /// a class of unknown type leaves it alone.
    pub fn push_class(&mut self, class: Class) {
        if let Some(class_type) = class.class_type.filter(|t| !t.is_lecture()) {
            self.secondary_class_type = Some(class_type);
        }
        self.classes.push(class);
    }

    /// Attaches a comment to the latest class, or to the course if it has none yet.
    pub fn attach_comment(&mut self, comment: String) {
        match self.classes.last_mut() {
            Some(class) => class.comment = Some(comment),
            None => self.comment = Some(comment),
        }
    }

    pub fn find_class(&self, code: u32) -> Option<&Class> {
        self.classes.iter().find(|class| class.code == Some(code))
    }

    pub fn lectures(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter().filter(|class| class.is_lecture())
    }

    pub fn secondary_classes(&self) -> impl Iterator<Item = &Class> {
        let secondary = self.secondary_class_type;
        self.classes
            .iter()
            .filter(move |class| class.class_type.is_some() && class.class_type == secondary)
    }

    /// Aggregate status across sections.
    ///
    /// Full when every lecture (and every secondary section) is full; Open
    /// when some lecture and, if there is a secondary type, some secondary
    /// section can be enrolled in; Waitlist otherwise. An unknown status
    /// counts as neither full nor enrollable.
    pub fn status(&self) -> Status {
        let full = |c: &Class| c.status == Some(Status::Full);
        let enrollable = |c: &Class| c.status.is_some_and(|s| s.is_enrollable());

        let has_secondary = self.secondary_class_type.is_some();

        let all_full = self.lectures().all(full)
            && (!has_secondary || self.secondary_classes().all(full));
        if all_full {
            return Status::Full;
        }

        let any_open = self.lectures().any(enrollable)
            && (!has_secondary || self.secondary_classes().any(enrollable));
        if any_open {
            return Status::Open;
        }

        Status::Waitlist
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal class for tests in this crate.
    pub(crate) fn class(code: u32, class_type: ClassType, status: Status) -> Class {
        Class {
            course_id: "I&C SCI 32".to_string(),
            code: Some(code),
            class_type: Some(class_type),
            section: Section::default(),
            units: Some(Units { min: 4.0, max: 4.0 }),
            instructor: vec!["STAFF".to_string()],
            modality: Some(Modality::InPerson),
            time: Listed::Tba,
            place: Listed::Tba,
            final_exam: Listed::NotApplicable,
            maximum: Some(100),
            enrolled: Some(Enrolled {
                current: 0,
                max: 100,
            }),
            waitlist: Waitlist {
                students: None,
                turned_off: false,
            },
            requests: Some(0),
            new_only_reserved: Some(0),
            restrictions: Vec::new(),
            textbook: None,
            website: None,
            status: Some(status),
            comment: None,
            color_id: None,
        }
    }

    fn course(classes: Vec<Class>) -> Course {
        let mut course = Course::new("I&C SCI 32", "PRG SOFTWARE LIB");
        for class in classes {
            course.push_class(class);
        }
        course
    }

    #[test]
    fn test_status_open_without_secondary() {
        let course = course(vec![
            class(1, ClassType::Lecture, Status::Open),
            class(2, ClassType::Lecture, Status::Open),
        ]);
        assert_eq!(course.secondary_class_type, None);
        assert_eq!(course.status(), Status::Open);
    }

    #[test]
    fn test_status_full_everywhere() {
        let course = course(vec![
            class(1, ClassType::Lecture, Status::Full),
            class(2, ClassType::Discussion, Status::Full),
            class(3, ClassType::Discussion, Status::Full),
        ]);
        assert_eq!(course.secondary_class_type, Some(ClassType::Discussion));
        assert_eq!(course.status(), Status::Full);
    }

    #[test]
    fn test_status_open_lecture_full_discussions() {
        let course = course(vec![
            class(1, ClassType::Lecture, Status::Open),
            class(2, ClassType::Discussion, Status::Full),
            class(3, ClassType::Discussion, Status::Full),
        ]);
        assert_eq!(course.status(), Status::Waitlist);
    }

    #[test]
    fn test_status_new_only_counts_as_open() {
        let course = course(vec![
            class(1, ClassType::Lecture, Status::NewOnly),
            class(2, ClassType::Lab, Status::Waitlist),
            class(3, ClassType::Lab, Status::Open),
        ]);
        assert_eq!(course.status(), Status::Open);
    }

    #[test]
    fn test_unknown_type_and_status_are_ignored() {
        let mut odd = class(3, ClassType::Lab, Status::Open);
        odd.class_type = None;
        odd.status = None;
        let course = course(vec![
            class(1, ClassType::Lecture, Status::Full),
            class(2, ClassType::Discussion, Status::Full),
            odd,
        ]);

        assert_eq!(course.secondary_class_type, Some(ClassType::Discussion));
        assert_eq!(course.lectures().count(), 1);
        assert_eq!(course.secondary_classes().count(), 1);
        assert_eq!(course.find_class(3).unwrap().status, None);
        assert_eq!(course.status(), Status::Full);
    }

    #[test]
    fn test_class_type_codes() {
        assert_eq!(
            ClassType::from_code(ClassType::FieldWork.code()),
            Some(ClassType::FieldWork)
        );
        assert_eq!(ClassType::from_code("lec"), None);
    }

    #[test]
    fn test_attach_comment_targets_latest_class() {
        let mut course = Course::new("I&C SCI 32", "PRG SOFTWARE LIB");
        course.attach_comment("Course note".to_string());
        assert_eq!(course.comment.as_deref(), Some("Course note"));

        course.push_class(class(1, ClassType::Lecture, Status::Open));
        course.push_class(class(2, ClassType::Lab, Status::Open));
        course.attach_comment("Lab note".to_string());
        assert_eq!(course.classes[1].comment.as_deref(), Some("Lab note"));
        assert_eq!(course.classes[0].comment, None);
        assert_eq!(course.comment.as_deref(), Some("Course note"));
    }

    #[test]
    fn test_color_slot_wraps() {
        let mut c = class(1, ClassType::Lecture, Status::Open);
        assert_eq!(c.color_slot(8), None);
        c.color_id = Some(9);
        assert_eq!(c.color_slot(8), Some(1));
        assert_eq!(c.color_slot(0), None);
    }
}
