mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::sessions::Sessions;
    use btech_buddy::db::users::Users;
    use btech_buddy::libs::error::AuthError;
    use btech_buddy::libs::user::NewUser;
    use chrono::Duration;
    use test_context::test_context;

    fn auth_error(err: anyhow::Error) -> AuthError {
        err.downcast::<AuthError>().unwrap()
    }

    #[test_context(DbContext)]
    #[test]
    fn test_register_normalizes_email(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "  Asha@Example.COM ");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.name, "Asha");
    }

    #[test_context(DbContext)]
    #[test]
    fn test_register_rejects_duplicates_and_bad_input(ctx: &mut DbContext) {
        ctx.register("Asha", "asha@example.com");
        let users = Users::new(&ctx.db.conn);

        let dup = users.register(NewUser::new("Other", "ASHA@example.com", "secret123")).unwrap_err();
        assert!(matches!(auth_error(dup), AuthError::EmailTaken(_)));

        let weak = users.register(NewUser::new("Ravi", "ravi@example.com", "12345")).unwrap_err();
        assert!(matches!(auth_error(weak), AuthError::WeakPassword(6)));

        let email = users.register(NewUser::new("Ravi", "ravi.example.com", "secret123")).unwrap_err();
        assert!(matches!(auth_error(email), AuthError::InvalidEmail(_)));

        let name = users.register(NewUser::new("  ", "ravi@example.com", "secret123")).unwrap_err();
        assert!(matches!(auth_error(name), AuthError::NameRequired));
    }

    #[test_context(DbContext)]
    #[test]
    fn test_authenticate(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let users = Users::new(&ctx.db.conn);

        let found = users.authenticate("ASHA@example.com", "secret123").unwrap();
        assert_eq!(found.id, user.id);

        let wrong = users.authenticate("asha@example.com", "secret124").unwrap_err();
        let unknown = users.authenticate("nobody@example.com", "secret123").unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(auth_error(wrong), AuthError::InvalidCredentials));
    }

    #[test_context(DbContext)]
    #[test]
    fn test_each_login_gets_a_fresh_token(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let sessions = Sessions::new(&ctx.db.conn);

        let first = sessions.create(user.id, Duration::hours(1)).unwrap();
        let second = sessions.create(user.id, Duration::hours(1)).unwrap();
        assert_ne!(first, second);
        assert_eq!(sessions.resolve(&first).unwrap().id, user.id);
        assert_eq!(sessions.resolve(&second).unwrap().id, user.id);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_token_is_stored_hashed(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let token = Sessions::new(&ctx.db.conn).create(user.id, Duration::hours(1)).unwrap();

        let stored: String = ctx
            .db
            .conn
            .query_row("SELECT token_hash FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, btech_buddy::libs::secret::hash_token(&token));
    }

    #[test_context(DbContext)]
    #[test]
    fn test_sessions_never_cross_users(ctx: &mut DbContext) {
        let asha = ctx.register("Asha", "asha@example.com");
        let ravi = ctx.register("Ravi", "ravi@example.com");
        let sessions = Sessions::new(&ctx.db.conn);

        let asha_token = sessions.create(asha.id, Duration::hours(1)).unwrap();
        let ravi_token = sessions.create(ravi.id, Duration::hours(1)).unwrap();

        assert_eq!(sessions.resolve(&asha_token).unwrap().id, asha.id);
        assert_eq!(sessions.resolve(&ravi_token).unwrap().id, ravi.id);
        assert!(sessions.resolve("made-up-token").is_err());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_logout_invalidates_session(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let sessions = Sessions::new(&ctx.db.conn);
        let token = sessions.create(user.id, Duration::hours(1)).unwrap();

        sessions.delete(&token).unwrap();
        let err = sessions.resolve(&token).unwrap_err();
        assert!(matches!(auth_error(err), AuthError::NotAuthenticated));
        // Logging out twice is harmless.
        sessions.delete(&token).unwrap();
    }

    #[test_context(DbContext)]
    #[test]
    fn test_expired_session_is_rejected_and_removed(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let sessions = Sessions::new(&ctx.db.conn);
        let token = sessions.create(user.id, Duration::hours(-1)).unwrap();

        let err = sessions.resolve(&token).unwrap_err();
        assert!(matches!(auth_error(err), AuthError::SessionExpired));

        let err = sessions.resolve(&token).unwrap_err();
        assert!(matches!(auth_error(err), AuthError::NotAuthenticated));
    }

    #[test_context(DbContext)]
    #[test]
    fn test_purge_expired(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let sessions = Sessions::new(&ctx.db.conn);
        sessions.create(user.id, Duration::hours(-2)).unwrap();
        sessions.create(user.id, Duration::hours(-1)).unwrap();
        let live = sessions.create(user.id, Duration::hours(1)).unwrap();

        assert_eq!(sessions.purge_expired().unwrap(), 2);
        assert!(sessions.resolve(&live).is_ok());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_change_password_signs_out_everywhere(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let users = Users::new(&ctx.db.conn);
        let sessions = Sessions::new(&ctx.db.conn);
        let token = sessions.create(user.id, Duration::hours(1)).unwrap();

        users.change_password(user.id, "another-secret").unwrap();

        assert!(sessions.resolve(&token).is_err());
        assert!(users.authenticate("asha@example.com", "secret123").is_err());
        assert!(users.authenticate("asha@example.com", "another-secret").is_ok());
        assert!(users.change_password(user.id, "123").is_err());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_delete_user_cascades(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        ctx.subject(&user, "Physics");
        let users = Users::new(&ctx.db.conn);

        assert!(users.delete(user.id).unwrap());
        assert!(!users.delete(user.id).unwrap());
        let subjects: i64 = ctx
            .db
            .conn
            .query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(subjects, 0);
    }
}
