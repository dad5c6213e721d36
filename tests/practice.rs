mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::practice::Practice;
    use btech_buddy::libs::practice::{NewPracticeEntry, PracticeStatus};
    use chrono::NaiveDate;
    use test_context::test_context;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test_context(DbContext)]
    #[test]
    fn test_add_and_list(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let practice = Practice::new(&ctx.db.conn, user.id);

        let mut entry = NewPracticeEntry::new(day(3), " LeetCode ", "Two Sum");
        entry.status = PracticeStatus::Revisit;
        entry.topic = Some("hashing".into());
        practice.add(entry).unwrap();
        practice.add(NewPracticeEntry::new(day(5), "Codeforces", "1850A")).unwrap();

        let all = practice.list(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].log_date, "2026-03-05");
        assert_eq!(all[1].platform, "LeetCode");
        assert_eq!(all[1].status, PracticeStatus::Revisit);

        let leetcode = practice.list(Some("leetcode")).unwrap();
        assert_eq!(leetcode.len(), 1);
        assert_eq!(leetcode[0].problem, "Two Sum");
        assert_eq!(practice.list(Some("  ")).unwrap().len(), 2);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_rejects_missing_fields(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let practice = Practice::new(&ctx.db.conn, user.id);

        assert!(practice.add(NewPracticeEntry::new(day(3), "", "Two Sum")).is_err());
        assert!(practice.add(NewPracticeEntry::new(day(3), "LeetCode", " ")).is_err());
        assert!(practice.list(None).unwrap().is_empty());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_stats(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let practice = Practice::new(&ctx.db.conn, user.id);

        practice.add(NewPracticeEntry::new(day(1), "Codeforces", "A")).unwrap();
        practice.add(NewPracticeEntry::new(day(8), "LeetCode", "B")).unwrap();
        practice.add(NewPracticeEntry::new(day(9), "LeetCode", "C")).unwrap();
        practice.add(NewPracticeEntry::new(day(9), "LeetCode", "D")).unwrap();
        practice.add(NewPracticeEntry::new(day(10), "Codeforces", "E")).unwrap();

        let stats = practice.stats(day(10)).unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(
            stats.per_platform,
            vec![("LeetCode".to_string(), 3), ("Codeforces".to_string(), 2)]
        );
        assert_eq!(stats.streak, 3);

        assert_eq!(practice.stats(day(11)).unwrap().streak, 3);
        assert_eq!(practice.stats(day(12)).unwrap().streak, 0);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_platform_counts_ignore_case(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let practice = Practice::new(&ctx.db.conn, user.id);

        practice.add(NewPracticeEntry::new(day(1), "LeetCode", "A")).unwrap();
        practice.add(NewPracticeEntry::new(day(2), "leetcode", "B")).unwrap();
        practice.add(NewPracticeEntry::new(day(3), "Codeforces", "C")).unwrap();

        let stats = practice.stats(day(3)).unwrap();
        assert_eq!(
            stats.per_platform,
            vec![("LeetCode".to_string(), 2), ("Codeforces".to_string(), 1)]
        );
        let (name, count) = &stats.per_platform[0];
        assert_eq!(practice.list(Some(name)).unwrap().len(), *count);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_delete(ctx: &mut DbContext) {
        let asha = ctx.register("Asha", "asha@example.com");
        let ravi = ctx.register("Ravi", "ravi@example.com");
        let id = Practice::new(&ctx.db.conn, asha.id)
            .add(NewPracticeEntry::new(day(3), "LeetCode", "Two Sum"))
            .unwrap();

        assert!(Practice::new(&ctx.db.conn, ravi.id).delete(id).is_err());
        Practice::new(&ctx.db.conn, asha.id).delete(id).unwrap();
        assert!(Practice::new(&ctx.db.conn, asha.id).list(None).unwrap().is_empty());
    }
}
