#![allow(dead_code)]

use btech_buddy::db::db::Db;
use btech_buddy::db::subjects::Subjects;
use btech_buddy::db::users::Users;
use btech_buddy::libs::subject::{NewSubject, Subject};
use btech_buddy::libs::user::{NewUser, User};
use std::path::PathBuf;
use tempfile::TempDir;
use test_context::TestContext;

/// A fresh, migrated database in its own temporary directory.
pub struct DbContext {
    pub db: Db,
    pub path: PathBuf,
    pub dir: TempDir,
}

impl TestContext for DbContext {
    fn setup() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buddy.db");
        let db = Db::open(&path).unwrap();
        DbContext { db, path, dir }
    }
}

impl DbContext {
    pub fn register(&self, name: &str, email: &str) -> User {
        Users::new(&self.db.conn)
            .register(NewUser::new(name, email, "secret123"))
            .unwrap()
    }

    pub fn subject(&self, user: &User, name: &str) -> Subject {
        Subjects::new(&self.db.conn, user.id).create(NewSubject::new(name)).unwrap()
    }
}
