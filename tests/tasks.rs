mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::tasks::Tasks;
    use btech_buddy::libs::error::BuddyError;
    use btech_buddy::libs::task::{NewTask, Priority, TaskFilter, TaskStatus};
    use chrono::NaiveDate;
    use test_context::test_context;

    fn task(title: &str, due: Option<&str>, priority: Priority) -> NewTask {
        NewTask {
            title: title.into(),
            subject_id: None,
            due_at: due.map(str::to_string),
            priority,
        }
    }

    #[test_context(DbContext)]
    #[test]
    fn test_insert_normalizes(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let tasks = Tasks::new(&ctx.db.conn, user.id);

        let created = tasks.insert(task("  Lab report ", Some("2026-03-12 17:30"), Priority::High)).unwrap();
        assert_eq!(created.title, "Lab report");
        assert_eq!(created.due_at.as_deref(), Some("2026-03-12T17:30"));
        assert_eq!(created.status, TaskStatus::Todo);

        let err = tasks.insert(task(" ", None, Priority::Low)).unwrap_err();
        assert!(matches!(err.downcast_ref::<BuddyError>(), Some(BuddyError::Invalid(_))));
        assert!(tasks.insert(task("Essay", Some("next week"), Priority::Low)).is_err());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_set_done_is_idempotent(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let tasks = Tasks::new(&ctx.db.conn, user.id);
        let created = tasks.insert(NewTask::new("Revise graphs")).unwrap();

        tasks.set_done(created.id, true).unwrap();
        tasks.set_done(created.id, true).unwrap();
        assert!(tasks.get(created.id).unwrap().is_done());

        tasks.set_done(created.id, false).unwrap();
        assert_eq!(tasks.get(created.id).unwrap().status, TaskStatus::Todo);

        assert!(tasks.set_done(created.id + 100, true).is_err());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_toggle(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let tasks = Tasks::new(&ctx.db.conn, user.id);
        let created = tasks.insert(NewTask::new("Revise graphs")).unwrap();

        assert_eq!(tasks.toggle(created.id).unwrap(), TaskStatus::Done);
        assert_eq!(tasks.toggle(created.id).unwrap(), TaskStatus::Todo);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_filters(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let tasks = Tasks::new(&ctx.db.conn, user.id);
        let done = tasks.insert(task("Submitted", Some("2026-03-01"), Priority::Medium)).unwrap();
        tasks.insert(task("Later", None, Priority::Medium)).unwrap();
        tasks.insert(task("Soon", Some("2026-03-05"), Priority::Medium)).unwrap();
        tasks.set_done(done.id, true).unwrap();

        let open: Vec<_> = tasks.fetch(TaskFilter::Todo).unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(open, vec!["Soon", "Later"]);

        let finished = tasks.fetch(TaskFilter::Done).unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, done.id);

        let all: Vec<_> = tasks.fetch(TaskFilter::All).unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(all, vec!["Soon", "Later", "Submitted"]);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_upcoming_order(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let tasks = Tasks::new(&ctx.db.conn, user.id);
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        tasks.insert(task("Undated", None, Priority::Low)).unwrap();
        tasks.insert(task("Overdue", Some("2026-03-01"), Priority::Low)).unwrap();
        tasks.insert(task("Quiz", Some("2026-03-11"), Priority::Medium)).unwrap();
        tasks.insert(task("Project", Some("2026-03-15T23:59"), Priority::High)).unwrap();
        tasks.insert(task("Far away", Some("2026-03-30"), Priority::High)).unwrap();
        let done = tasks.insert(task("Finished", Some("2026-03-12"), Priority::High)).unwrap();
        tasks.set_done(done.id, true).unwrap();

        let upcoming: Vec<_> = tasks
            .upcoming(today, 7, 10)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(upcoming, vec!["Project", "Quiz", "Overdue", "Undated"]);

        assert_eq!(tasks.upcoming(today, 7, 2).unwrap().len(), 2);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_tasks_are_private(ctx: &mut DbContext) {
        let asha = ctx.register("Asha", "asha@example.com");
        let ravi = ctx.register("Ravi", "ravi@example.com");
        let physics = ctx.subject(&asha, "Physics");
        let created = Tasks::new(&ctx.db.conn, asha.id).insert(NewTask::new("Lab report")).unwrap();

        let theirs = Tasks::new(&ctx.db.conn, ravi.id);
        assert!(theirs.get(created.id).is_err());
        assert!(theirs.toggle(created.id).is_err());
        assert!(theirs.delete(created.id).is_err());

        let mut linked = NewTask::new("Borrowed subject");
        linked.subject_id = Some(physics.id);
        assert!(theirs.insert(linked).is_err());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_update_and_delete(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let physics = ctx.subject(&user, "Physics");
        let tasks = Tasks::new(&ctx.db.conn, user.id);
        let created = tasks.insert(NewTask::new("Lab report")).unwrap();

        let mut changes = task("Lab report v2", Some("2026-04-01"), Priority::High);
        changes.subject_id = Some(physics.id);
        let updated = tasks.update(created.id, changes).unwrap();
        assert_eq!(updated.subject_name.as_deref(), Some("Physics"));
        assert_eq!(updated.priority, Priority::High);

        tasks.delete(created.id).unwrap();
        assert!(tasks.get(created.id).is_err());
    }
}
