//! Scoped settings persisted through SQLite.

use scoped_settings_config::StoreConfig;
use scoped_settings_engine::{SettingsError, SettingsOwner, SettingsStore, Value};
use scoped_settings_io::{open_store, SqliteRowStore};
use serde_json::json;
use tempfile::TempDir;

struct User {
    id: u64,
}

impl SettingsOwner for User {
    const TYPE_NAME: &'static str = "User";

    fn instance_id(&self) -> String {
        self.id.to_string()
    }
}

fn file_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        database: Some(dir.path().join("nested").join("settings.db")),
        ..StoreConfig::default()
    }
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    {
        let store = open_store(&config).expect("open should succeed");
        store.global().set("float", 0.01).unwrap();
        store.global().set("complex", json!([1, "2", { "three": true }])).unwrap();
        store.global().set("off", false).unwrap();
        store.global().set("nothing", Value::Null).unwrap();
        store.for_instance("User", 1).unwrap().set("one", 1).unwrap();
    }

    let store = open_store(&config).expect("reopen should succeed");
    let float = store.global().get("float").unwrap().as_f64().unwrap();
    assert_eq!(float, 0.01);
    assert_eq!(float * 2.0, 0.02);
    assert_eq!(store.global().get("complex").unwrap(), json!([1, "2", { "three": true }]));
    assert_eq!(store.global().get("off").unwrap(), json!(false));
    assert_eq!(store.global().row("nothing").unwrap(), Some(Value::Null));
    assert_eq!(store.for_instance("User", 1).unwrap().get("one").unwrap(), json!(1));
    assert_eq!(store.global().get("one").unwrap(), Value::Null);
}

#[test]
fn test_two_users_do_not_see_each_other() {
    let store = SettingsStore::new(SqliteRowStore::open_in_memory().unwrap());
    let a = store.for_instance("User", 1).unwrap();
    let b = store.for_instance("User", 2).unwrap();
    a.set("one", 1).unwrap();
    b.set("two", 2).unwrap();

    assert_eq!(store.global().get("one").unwrap(), Value::Null);
    assert_eq!(store.global().get("two").unwrap(), Value::Null);
    assert_eq!(a.get("two").unwrap(), Value::Null);
    assert_eq!(b.get("one").unwrap(), Value::Null);
    assert_eq!(Value::Object(a.all("o").unwrap()), json!({ "one": 1 }));
}

#[test]
fn test_configured_defaults_seed_registry() {
    let config = StoreConfig::parse(
        r#"
in_memory = true

[defaults]
foo = "global default"
"#,
    )
    .unwrap();
    let store = open_store(&config).unwrap();

    assert_eq!(store.for_instance("User", 1).unwrap().get("foo").unwrap(), json!("global default"));
    store.for_type("User").unwrap().set("foo", "model default").unwrap();
    assert_eq!(store.for_instance("User", 1).unwrap().get("foo").unwrap(), json!("model default"));
    assert_eq!(store.global().get("foo").unwrap(), json!("global default"));
}

#[test]
fn test_destroy_owner_cascades_in_database() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&file_config(&dir)).unwrap();
    let (first, second) = (User { id: 1 }, User { id: 2 });
    store.for_owner(&first).unwrap().set("example", 42).unwrap();
    store.for_owner(&first).unwrap().set("other", 1).unwrap();
    store.for_owner(&second).unwrap().set("example", 43).unwrap();
    store.for_owner_type::<User>().unwrap().set("example", 0).unwrap();

    let before = store.row_count().unwrap();
    assert_eq!(store.destroy_owner(&first).unwrap(), 2);
    assert_eq!(store.row_count().unwrap(), before - 2);
    assert_eq!(store.for_owner(&first).unwrap().get("example").unwrap(), json!(0));
    assert_eq!(store.for_owner(&second).unwrap().get("example").unwrap(), json!(43));
}

#[test]
fn test_merge_and_destroy_through_sqlite() {
    let store = SettingsStore::new(SqliteRowStore::open_in_memory().unwrap());
    let settings = store.global();
    settings.set("test", "foo").unwrap();

    assert!(matches!(
        settings.merge("test", json!({ "a": 1 })),
        Err(SettingsError::TypeError { .. })
    ));
    settings.set("hash", json!({ "one": 1 })).unwrap();
    settings.merge("hash", json!({ "two": 2 })).unwrap();
    store.clear_cache();
    assert_eq!(settings.get("hash").unwrap(), json!({ "one": 1, "two": 2 }));

    settings.destroy("hash").unwrap();
    assert!(matches!(
        settings.destroy("hash"),
        Err(SettingsError::SettingNotFound { .. })
    ));
}

#[test]
fn test_corrupt_row_fails_only_its_read() {
    use scoped_settings_engine::RowStore;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.db");
    {
        let backend = SqliteRowStore::open(&path).unwrap();
        backend.upsert("global", "broken", "{not json").unwrap();
        backend.upsert("global", "fine", "\"ok\"").unwrap();
    }

    let store = SettingsStore::new(SqliteRowStore::open(&path).unwrap());
    assert!(matches!(
        store.global().get("broken"),
        Err(SettingsError::Serialization(_))
    ));
    assert_eq!(store.global().get("fine").unwrap(), json!("ok"));
    assert_eq!(store.row_count().unwrap(), 2);
}
