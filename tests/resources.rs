mod common;

#[cfg(test)]
mod tests {
    use crate::common::DbContext;
    use btech_buddy::db::resources::Resources;
    use btech_buddy::libs::resource::NewResource;
    use test_context::test_context;

    #[test_context(DbContext)]
    #[test]
    fn test_add_normalizes_tags(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let resources = Resources::new(&ctx.db.conn, user.id);

        let added = resources
            .add(NewResource::new("CP Algorithms", "https://cp-algorithms.com").with_tags("Graphs, DSA, dsa, "))
            .unwrap();
        assert_eq!(added.tags, vec!["dsa", "graphs"]);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_tag_filter_matches_whole_tags(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let resources = Resources::new(&ctx.db.conn, user.id);
        resources
            .add(NewResource::new("Graphs", "https://example.com/graphs").with_tags("graphs,dsa"))
            .unwrap();
        resources
            .add(NewResource::new("Graph theory", "https://example.com/theory").with_tags("graph-theory"))
            .unwrap();
        resources.add(NewResource::new("Untagged", "https://example.com/plain")).unwrap();

        let found = resources.with_tag(" GRAPHS ").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Graphs");
        assert!(resources.with_tag("graph").unwrap().is_empty());
        assert_eq!(resources.list().unwrap().len(), 3);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_tag_counts(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let other = ctx.register("Ravi", "ravi@example.com");
        let resources = Resources::new(&ctx.db.conn, user.id);
        resources.add(NewResource::new("A", "https://example.com/a").with_tags("dsa,os")).unwrap();
        resources.add(NewResource::new("B", "https://example.com/b").with_tags("dsa")).unwrap();
        Resources::new(&ctx.db.conn, other.id)
            .add(NewResource::new("C", "https://example.com/c").with_tags("dsa,networks"))
            .unwrap();

        assert_eq!(resources.tags().unwrap(), vec![("dsa".to_string(), 2), ("os".to_string(), 1)]);
    }

    #[test_context(DbContext)]
    #[test]
    fn test_update_replaces_tags(ctx: &mut DbContext) {
        let user = ctx.register("Asha", "asha@example.com");
        let resources = Resources::new(&ctx.db.conn, user.id);
        let added = resources
            .add(NewResource::new("Notes", "https://example.com/notes").with_tags("os,exam"))
            .unwrap();

        let updated = resources
            .update(added.id, NewResource::new("", "https://example.com/notes-v2").with_tags("networks"))
            .unwrap();
        assert_eq!(updated.title, "https://example.com/notes-v2");
        assert_eq!(updated.tags, vec!["networks"]);
        assert!(resources.with_tag("os").unwrap().is_empty());
    }

    #[test_context(DbContext)]
    #[test]
    fn test_rejects_bad_urls_and_foreign_rows(ctx: &mut DbContext) {
        let asha = ctx.register("Asha", "asha@example.com");
        let ravi = ctx.register("Ravi", "ravi@example.com");
        let resources = Resources::new(&ctx.db.conn, asha.id);

        assert!(resources.add(NewResource::new("Notes", "example.com")).is_err());
        let added = resources.add(NewResource::new("Notes", "https://example.com")).unwrap();

        let theirs = Resources::new(&ctx.db.conn, ravi.id);
        assert!(theirs.get(added.id).is_err());
        assert!(theirs.delete(added.id).is_err());

        resources.delete(added.id).unwrap();
        assert!(resources.list().unwrap().is_empty());
    }
}
