mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::db::Db;
    use btech_buddy::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use test_context::test_context;

    #[test_context(DbContext)]
    #[test]
    fn test_migrations_run_on_open(ctx: &mut DbContext) {
        let version = get_db_version(&ctx.db.conn).unwrap();
        assert_eq!(version, MigrationManager::new().latest_version());
        assert!(!needs_migration(&ctx.db.conn).unwrap());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_migration_history_in_order(ctx: &mut DbContext) {
        let history = MigrationManager::new().get_migration_history(&ctx.db.conn).unwrap();
        assert!(!history.is_empty());
        for (i, (version, name, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
            assert!(!name.is_empty());
        }
    }

    #[test_context(DbContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut DbContext) {
        let manager = MigrationManager::new();
        let before = manager.get_migration_history(&ctx.db.conn).unwrap().len();

        let mut conn = Db::open_without_migrations(&ctx.path).unwrap();
        manager.run_migrations(&mut conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();

        let after = manager.get_migration_history(&conn).unwrap().len();
        assert_eq!(before, after);
        assert!(manager.is_migration_applied(&conn, 1).unwrap());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut DbContext) {
        let conn = Db::open_without_migrations(ctx.dir.path().join("empty.db")).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_foreign_keys_enforced(ctx: &mut DbContext) {
        let enabled: i64 = ctx
            .db
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
