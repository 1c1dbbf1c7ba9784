// tests/parse_sample.rs
use chrono::{NaiveDate, Timelike};

use websoc::catalog::{
    parse_courses, ClassType, Listed, ParseError, Restriction, Status, Weekday,
};
use websoc::{Schedule, ScheduleCourse, SlotKey, Term};

const SAMPLE: &str = include_str!("fixtures/ics_sample.html");

fn term() -> Term {
    Term::new("2024-92").unwrap()
}

#[test]
fn sample_matches_golden_shape() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();

    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0].id, "I&C SCI 31");
    assert_eq!(courses[0].title, "INTRO TO PROGRMG");
    assert_eq!(courses[1].id, "I&C SCI 32");
    assert_eq!(courses[2].id, "I&C SCI 45C");

    let class_counts: Vec<_> = courses.iter().map(|c| c.classes.len()).collect();
    assert_eq!(class_counts, vec![3, 2, 1]);
}

#[test]
fn sample_comments_land_on_course_or_class() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();
    let ics31 = &courses[0];

    assert_eq!(
        ics31.comment.as_deref(),
        Some("Open to I&C SCI majors only during the first pass.")
    );
    assert_eq!(ics31.classes[0].comment, None);
    assert_eq!(
        ics31.classes[2].comment.as_deref(),
        Some("Lab for Pattis lecture.")
    );
}

#[test]
fn sample_lecture_fields() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();
    let lecture = &courses[0].classes[0];

    assert_eq!(lecture.course_id, "I&C SCI 31");
    assert_eq!(lecture.code, Some(35500));
    assert_eq!(lecture.class_type, Some(ClassType::Lecture));
    assert_eq!(lecture.instructor, vec!["PATTIS, R.", "STAFF"]);
    assert_eq!(lecture.place, Listed::Known("SSLH 100".to_string()));

    let time = lecture.time.known().unwrap();
    assert_eq!(
        time.days,
        vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
    );
    assert_eq!((time.start.hour(), time.end.hour()), (13, 13));

    let final_exam = lecture.final_exam.known().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 12, 9).unwrap();
    assert_eq!(final_exam.start, day.and_hms_opt(13, 30, 0).unwrap());

    assert_eq!(lecture.waitlist.students, None);
    assert!(!lecture.waitlist.turned_off);
    assert_eq!(
        lecture.restrictions,
        vec![Restriction::PrerequisiteRequired, Restriction::SchoolMajorOnly]
    );
    assert_eq!(
        lecture.textbook.as_ref().map(|u| u.as_str()),
        Some("https://uci.bncollege.com/course-material/35500")
    );
    assert_eq!(lecture.website, None);
}

#[test]
fn sample_absences_stay_distinct() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();

    let lab = &courses[0].classes[1];
    assert!(lab.final_exam.is_not_applicable());
    assert!(!lab.final_exam.is_tba());
    assert!(lab.waitlist.turned_off);
    assert_eq!(lab.waitlist.students, Some(3));

    let online = &courses[1].classes[0];
    assert_eq!(online.time, Listed::Tba);
    assert_eq!(online.place, Listed::NotApplicable);
    assert!(online.final_exam.is_tba());
    assert!(!online.final_exam.is_not_applicable());
    assert_eq!(
        online.website.as_ref().map(|u| u.as_str()),
        Some("https://www.reg.uci.edu/perl/WebSoc?YearTerm=2024-92&CourseCodes=35600")
    );

    let discussion = &courses[1].classes[1];
    assert_eq!(discussion.place, Listed::Tba);
}

#[test]
fn sample_course_status_and_secondary_type() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();

    assert_eq!(courses[0].secondary_class_type, Some(ClassType::Lab));
    assert_eq!(courses[0].status(), Status::Open);

    assert_eq!(courses[1].secondary_class_type, Some(ClassType::Discussion));
    assert_eq!(courses[1].status(), Status::Waitlist);

    assert_eq!(courses[2].secondary_class_type, None);
    assert_eq!(courses[2].status(), Status::Open);

    let units = courses[2].classes[0].units.unwrap();
    assert_eq!((units.min, units.max), (2.0, 4.0));
}

#[test]
fn sample_schedule_from_picks() {
    let courses = parse_courses(SAMPLE, &term()).unwrap();
    let mut schedule = Schedule::new();

    schedule.add_course(ScheduleCourse::select(&courses[0], 35500, Some(35512)).unwrap());
    schedule.add_course(ScheduleCourse::select(&courses[1], 35600, Some(35610)).unwrap());
    schedule.add_course(ScheduleCourse::select(&courses[2], 35700, None).unwrap());

    let colors: Vec<_> = schedule.classes().iter().map(|c| c.color_id).collect();
    assert_eq!(colors, vec![Some(0), Some(0), Some(1), Some(1), Some(2)]);

    assert_eq!(schedule.get(Weekday::Monday, 13).unwrap().code, Some(35500));
    assert_eq!(schedule.get(Weekday::Tuesday, 14).unwrap().code, Some(35512));
    assert_eq!(schedule.get(Weekday::Friday, 10).unwrap().code, Some(35610));
    assert_eq!(schedule.get(Weekday::Thursday, 11).unwrap().code, Some(35700));

    // The online lecture is TBA and takes no slot.
    let slots = schedule.slot_map();
    assert!(slots.values().all(|class| class.code != Some(35600)));
    assert_eq!(slots.len(), 3 + 2 + 1 + 2);
    assert!(slots.contains_key(&SlotKey { day: Weekday::Wednesday, hour: 13 }.to_string()));
}

#[test]
fn unknown_cell_values_keep_the_page() {
    let html = SAMPLE.replacen(">Online<", ">Hybrid<", 1);
    assert_ne!(html, SAMPLE);

    let courses = parse_courses(&html, &term()).unwrap();
    assert_eq!(courses.len(), 3);

    let online = &courses[1].classes[0];
    assert_eq!(online.code, Some(35600));
    assert_eq!(online.modality, None);
    assert_eq!(online.place, Listed::Known("ON LINE".to_string()));
    assert_eq!(courses[2].classes[0].code, Some(35700));
}

#[test]
fn orphan_rows_abort_the_document() {
    let html = r#"<table><tr><td class="Comments">stray</td></tr></table>"#;
    let err = parse_courses(html, &term()).unwrap_err();
    assert!(matches!(err, ParseError::MalformedRow { .. }));
}
