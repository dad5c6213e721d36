mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::attendance::Attendance;
    use btech_buddy::db::resources::Resources;
    use btech_buddy::db::subjects::Subjects;
    use btech_buddy::db::tasks::Tasks;
    use btech_buddy::db::timetable::Timetable;
    use btech_buddy::libs::attendance::{AttendanceStatus, NewAttendance};
    use btech_buddy::libs::error::BuddyError;
    use btech_buddy::libs::resource::NewResource;
    use btech_buddy::libs::subject::NewSubject;
    use btech_buddy::libs::task::NewTask;
    use btech_buddy::libs::timetable::NewTimetableEntry;
    use chrono::NaiveDate;
    use test_context::test_context;

    fn class(subject_id: i64, day: u8, start: &str, end: &str) -> NewTimetableEntry {
        NewTimetableEntry {
            subject_id,
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            location: None,
        }
    }

    #[test_context(DbContext)]
    #[test]
    fn test_create_list_update(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let subjects = Subjects::new(&ctx.db.conn, user.id);

        let maths = subjects
            .create(NewSubject {
                name: " Maths ".into(),
                code: Some("MA101".into()),
                credits: 4,
                target_attendance: 80.0,
            })
            .unwrap();
        ctx.subject(&user, "algorithms");

        let names: Vec<_> = subjects.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["algorithms", "Maths"]);

        let mut changes = NewSubject::new("Mathematics I");
        changes.target_attendance = 70.0;
        let updated = subjects.update(maths.id, changes).unwrap();
        assert_eq!(updated.name, "Mathematics I");
        assert_eq!(updated.code, None);
        assert_eq!(updated.target_attendance, 70.0);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_invalid_subject_is_rejected(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let subjects = Subjects::new(&ctx.db.conn, user.id);

        let mut subject = NewSubject::new("Physics");
        subject.target_attendance = 101.0;
        let err = subjects.create(subject).unwrap_err();
        assert!(matches!(err.downcast_ref::<BuddyError>(), Some(BuddyError::Invalid(_))));
        assert!(subjects.list().unwrap().is_empty());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_subjects_are_private(ctx: &mut DbContext) {
        let asha = ctx.register("Asha", "asha@example.com");
        let ravi = ctx.register("Ravi", "ravi@example.com");
        let physics = ctx.subject(&asha, "Physics");
        let theirs = Subjects::new(&ctx.db.conn, ravi.id);

        assert!(theirs.list().unwrap().is_empty());
        let err = theirs.get(physics.id).unwrap_err();
        assert!(matches!(err.downcast_ref::<BuddyError>(), Some(BuddyError::NotFound(_))));
        assert!(theirs.delete(physics.id).is_err());
        assert!(theirs.update(physics.id, NewSubject::new("Stolen")).is_err());
        assert!(Timetable::new(&ctx.db.conn, ravi.id)
            .add(class(physics.id, 0, "09:00", "10:00"))
            .is_err());

        assert_eq!(Subjects::new(&ctx.db.conn, asha.id).get(physics.id).unwrap().name, "Physics");
    }

    #[test_context(DbContext)]
    #[test]
    fn test_delete_cascades_and_detaches(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let physics = ctx.subject(&user, "Physics");
        let conn = &ctx.db.conn;

        Timetable::new(conn, user.id).add(class(physics.id, 1, "09:00", "10:00")).unwrap();
        Attendance::new(conn, user.id)
            .mark(NewAttendance {
                subject_id: physics.id,
                class_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                status: AttendanceStatus::Present,
                note: None,
            })
            .unwrap();
        let mut task = NewTask::new("Lab report");
        task.subject_id = Some(physics.id);
        let task = Tasks::new(conn, user.id).insert(task).unwrap();
        let mut resource = NewResource::new("Notes", "https://example.com/notes");
        resource.subject_id = Some(physics.id);
        let resource = Resources::new(conn, user.id).add(resource).unwrap();

        Subjects::new(conn, user.id).delete(physics.id).unwrap();

        assert!(Timetable::new(conn, user.id).week().unwrap().is_empty());
        assert!(Attendance::new(conn, user.id).recent(10).unwrap().is_empty());
        assert_eq!(Tasks::new(conn, user.id).get(task.id).unwrap().subject_id, None);
        assert_eq!(Resources::new(conn, user.id).get(resource.id).unwrap().subject_id, None);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_timetable_days_in_start_order(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let physics = ctx.subject(&user, "Physics");
        let maths = ctx.subject(&user, "Maths");
        let timetable = Timetable::new(&ctx.db.conn, user.id);

        timetable.add(class(maths.id, 0, "11:00", "12:00")).unwrap();
        timetable.add(class(physics.id, 0, "9:00", "10:30")).unwrap();
        timetable.add(class(physics.id, 2, "14:00", "15:00")).unwrap();

        let monday = timetable.for_day(0).unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].subject_name, "Physics");
        assert_eq!(monday[0].start_time, "09:00");
        assert_eq!(monday[1].subject_name, "Maths");
        assert!(timetable.for_day(1).unwrap().is_empty());
        assert_eq!(timetable.week().unwrap().len(), 3);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_timetable_rejects_bad_ranges(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let physics = ctx.subject(&user, "Physics");
        let timetable = Timetable::new(&ctx.db.conn, user.id);

        assert!(timetable.add(class(physics.id, 0, "10:00", "09:00")).is_err());
        assert!(timetable.add(class(physics.id, 0, "10:00", "10:00")).is_err());
        assert!(timetable.add(class(physics.id, 7, "09:00", "10:00")).is_err());
        assert!(timetable.add(class(physics.id, 0, "nine", "10:00")).is_err());
        assert!(timetable.week().unwrap().is_empty());
    }
}
