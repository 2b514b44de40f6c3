use chrono::NaiveDate;
use schooldesk::core::checkin::quick_checkin;
use schooldesk::core::del::DeleteLogic;
use schooldesk::core::report::DailyReport;
use schooldesk::db::pool::DbPool;
use schooldesk::db::queries::{attendance, centers, classrooms, materials, messages, students};
use schooldesk::errors::AppError;
use schooldesk::models::attendance::{Attendance, STATUS_ABSENT, STATUS_PRESENT};
use schooldesk::models::center::Center;
use schooldesk::models::classroom::Classroom;
use schooldesk::models::filter::PlacementFilter;
use schooldesk::models::material::Material;
use schooldesk::models::message::Message;

mod common;
use common::{add_student, fresh_ctx};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn count(pool: &DbPool, table: &str) -> i64 {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn center_with_classroom_cannot_be_deleted() {
    let (_dir, ctx) = fresh_ctx();
    let pool = DbPool::open(&ctx).unwrap();

    let center = Center {
        name: "North".into(),
        ..Default::default()
    };
    let center_id = centers::insert(&pool.conn, &center).unwrap();
    let room = Classroom {
        name: "1A".into(),
        center_id: Some(center_id),
        ..Default::default()
    };
    classrooms::insert(&pool.conn, &room).unwrap();

    let res = DeleteLogic::center(&pool.conn, center_id);
    assert!(matches!(
        res,
        Err(AppError::DeleteBlocked {
            entity: "center",
            ..
        })
    ));
    assert_eq!(count(&pool, "centers"), 1);
    assert_eq!(count(&pool, "classrooms"), 1);
}

#[test]
fn classroom_with_students_cannot_be_deleted() {
    let (_dir, ctx) = fresh_ctx();
    let pool = DbPool::open(&ctx).unwrap();

    let room_id = classrooms::insert(
        &pool.conn,
        &Classroom {
            name: "2B".into(),
            ..Default::default()
        },
    )
    .unwrap();
    let id = add_student(&pool, "Ana", "Ruiz");
    let mut s = students::get(&pool.conn, id).unwrap();
    s.classroom_id = Some(room_id);
    students::update(&pool.conn, &s).unwrap();

    assert!(DeleteLogic::classroom(&pool.conn, room_id).is_err());
    assert_eq!(count(&pool, "classrooms"), 1);
}

#[test]
fn quick_checkin_marks_each_active_student_once() {
    let (_dir, ctx) = fresh_ctx();
    let mut pool = DbPool::open(&ctx).unwrap();

    for i in 0..5 {
        add_student(&pool, &format!("Student{i}"), "Test");
    }
    let inactive = add_student(&pool, "Gone", "Away");
    let mut s = students::get(&pool.conn, inactive).unwrap();
    s.active = false;
    students::update(&pool.conn, &s).unwrap();

    let filter = PlacementFilter::default();
    let first = quick_checkin(&mut pool.conn, day(), &filter, "08:45").unwrap();
    assert_eq!(first, 5);

    let records = attendance::list(&pool.conn, Some(day()), None, &filter).unwrap();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.status == STATUS_PRESENT));
    assert!(records.iter().all(|r| r.check_in.as_deref() == Some("08:45")));

    let second = quick_checkin(&mut pool.conn, day(), &filter, "09:30").unwrap();
    assert_eq!(second, 0);
    assert_eq!(count(&pool, "attendance"), 5);
}

#[test]
fn quick_checkin_skips_students_with_any_record() {
    let (_dir, ctx) = fresh_ctx();
    let mut pool = DbPool::open(&ctx).unwrap();

    let absent = add_student(&pool, "Pablo", "Sanz");
    add_student(&pool, "Irene", "Vidal");
    attendance::insert(&pool.conn, &Attendance::new(absent, day(), STATUS_ABSENT)).unwrap();

    let n = quick_checkin(&mut pool.conn, day(), &PlacementFilter::default(), "08:00").unwrap();
    assert_eq!(n, 1);
}

#[test]
fn low_stock_material_reports_quantity_to_buy() {
    let (_dir, ctx) = fresh_ctx();
    let pool = DbPool::open(&ctx).unwrap();

    let glue = Material {
        name: "Glue sticks".into(),
        quantity: 2,
        minimum: 5,
        ..Default::default()
    };
    materials::insert(&pool.conn, &glue).unwrap();
    materials::insert(
        &pool.conn,
        &Material {
            name: "Paper".into(),
            quantity: 50,
            minimum: 10,
            ..Default::default()
        },
    )
    .unwrap();

    let low = materials::list(&pool.conn, true).unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Glue sticks");
    assert_eq!(low[0].to_buy(), 3);

    let report = DailyReport::build(&pool.conn, day(), None, None).unwrap();
    let text = report.render();
    assert!(text.contains("Glue sticks"));
    assert!(text.contains("BUY: 3 units"));
    assert!(!text.contains("Paper"));
}

#[test]
fn deleting_a_student_removes_dependent_rows() {
    let (_dir, ctx) = fresh_ctx();
    let mut pool = DbPool::open(&ctx).unwrap();

    let id = add_student(&pool, "Marta", "León");
    let keep = add_student(&pool, "Hugo", "Mora");
    attendance::insert(&pool.conn, &Attendance::new(id, day(), STATUS_PRESENT)).unwrap();
    attendance::insert(&pool.conn, &Attendance::new(keep, day(), STATUS_PRESENT)).unwrap();
    messages::insert(
        &pool.conn,
        &Message {
            id: 0,
            student_id: id,
            subject: "Trip".into(),
            body: "Bring a hat".into(),
            sent_at: "2025-03-10 09:00:00".into(),
            read: false,
            student_name: None,
        },
    )
    .unwrap();

    DeleteLogic::student(&mut pool.conn, id).unwrap();

    assert_eq!(count(&pool, "students"), 1);
    assert_eq!(count(&pool, "attendance"), 1);
    assert_eq!(count(&pool, "messages"), 0);
    assert!(matches!(
        students::get(&pool.conn, id),
        Err(AppError::NotFound { .. })
    ));
}
