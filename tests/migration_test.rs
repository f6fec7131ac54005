mod helpers;

use quantmind::db;
use quantmind::db::migrations::{
    get_schema_version, get_score_version, run_migrations, CURRENT_SCHEMA_VERSION,
};
use quantmind::vault::score::SCORE_VERSION;

#[test]
fn fresh_db_migrates_to_current_version() {
    let conn = helpers::test_db();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn migration_records_score_version() {
    let conn = helpers::test_db();
    assert_eq!(get_score_version(&conn).unwrap().as_deref(), Some(SCORE_VERSION));
}

#[test]
fn migrations_are_idempotent() {
    let mut conn = helpers::test_db();
    // Running again should be a no-op
    run_migrations(&mut conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn manual_v1_db_upgrades_correctly() {
    // Simulate a v1 database that hasn't been migrated
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();

    // Verify it starts at v1
    assert_eq!(get_schema_version(&conn).unwrap(), 1);
    assert!(get_score_version(&conn).unwrap().is_none());

    // Run migrations
    run_migrations(&mut conn).unwrap();

    // Should now be at current version
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    assert!(get_score_version(&conn).unwrap().is_some());
}
