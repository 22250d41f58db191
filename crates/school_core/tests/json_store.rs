mod common;

use common::{parent_draft, student_draft, teacher_draft};
use school_core::{
    id_value, Class, ClassDraft, EntityKind, JsonStore, Parent, Record, ServiceError, Student,
    StoreError, Teacher,
};
use serde_json::{json, Value};
use std::fs;
use uuid::Uuid;

fn class(code: &str, teacher: Option<Uuid>) -> Class {
    Class::new(ClassDraft {
        id: None,
        code: code.to_string(),
        teacher,
    })
    .unwrap()
}

#[test]
fn open_creates_empty_backing_file_per_kind() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Teacher>::open(dir.path().join("nested")).unwrap();

    assert_eq!(store.file_path(), dir.path().join("nested").join("teacher.json"));
    assert!(store.is_empty());
    let content = fs::read_to_string(store.file_path()).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&content).unwrap(), json!([]));
}

#[test]
fn save_then_reopen_round_trips_plain_form() {
    let dir = tempfile::tempdir().unwrap();
    let teacher = Teacher::new(teacher_draft("T-1")).unwrap();
    let parent = Parent::new(parent_draft("P-1")).unwrap();
    let student = Student::new(student_draft("S-1", Uuid::new_v4(), &[parent.id])).unwrap();

    {
        let teachers = JsonStore::<Teacher>::open(dir.path()).unwrap();
        let parents = JsonStore::<Parent>::open(dir.path()).unwrap();
        let students = JsonStore::<Student>::open(dir.path()).unwrap();
        teachers.save(teacher.clone()).unwrap();
        parents.save(parent.clone()).unwrap();
        students.save(student.clone()).unwrap();
    }

    let teachers = JsonStore::<Teacher>::open(dir.path()).unwrap();
    let parents = JsonStore::<Parent>::open(dir.path()).unwrap();
    let students = JsonStore::<Student>::open(dir.path()).unwrap();
    assert_eq!(
        teachers.find_by_id(teacher.id).unwrap().to_plain(),
        teacher.to_plain()
    );
    assert_eq!(
        parents.find_by_id(parent.id).unwrap().to_plain(),
        parent.to_plain()
    );
    assert_eq!(
        students.find_by_id(student.id).unwrap().to_plain(),
        student.to_plain()
    );
}

#[test]
fn backing_file_holds_id_record_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Teacher>::open(dir.path()).unwrap();
    let teacher = Teacher::new(teacher_draft("T-1")).unwrap();
    store.save(teacher.clone()).unwrap();

    let content: Value =
        serde_json::from_str(&fs::read_to_string(store.file_path()).unwrap()).unwrap();
    let entries = content.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0][0], teacher.id.to_string());
    assert_eq!(entries[0][1], teacher.to_plain());
}

#[test]
fn save_replaces_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Teacher>::open(dir.path()).unwrap();
    let mut teacher = Teacher::new(teacher_draft("T-1")).unwrap();
    store.save(teacher.clone()).unwrap();

    teacher.major = "Physics".to_string();
    store.save(teacher.clone()).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.find_by_id(teacher.id).unwrap().major, "Physics");
}

#[test]
fn find_by_id_reports_absence_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Class>::open(dir.path()).unwrap();
    assert!(store.find_by_id(Uuid::new_v4()).is_none());
}

#[test]
fn list_by_absent_value_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Class>::open(dir.path()).unwrap();
    store.save(class("1A-M", None)).unwrap();

    assert!(store.list_by("code", &json!("9H-N")).is_empty());
    assert!(store.list_by("teacher", &id_value(Uuid::new_v4())).is_empty());
}

#[test]
fn list_by_matches_scalars_and_null() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Class>::open(dir.path()).unwrap();
    let teacher_id = Uuid::new_v4();
    let taught = class("1A-M", Some(teacher_id));
    let untaught = class("1B-M", None);
    store.save(taught.clone()).unwrap();
    store.save(untaught.clone()).unwrap();

    let by_teacher = store.list_by("teacher", &id_value(teacher_id));
    assert_eq!(by_teacher, vec![taught]);

    let without_teacher = store.list_by("teacher", &Value::Null);
    assert_eq!(without_teacher, vec![untaught]);

    assert_eq!(store.list_by("missingProperty", &Value::Null).len(), 2);
}

#[test]
fn list_by_compares_composite_values_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Parent>::open(dir.path()).unwrap();
    let mut draft = parent_draft("P-1");
    draft.phones = vec!["111".to_string(), "222".to_string()];
    let parent = Parent::new(draft).unwrap();
    store.save(parent.clone()).unwrap();

    assert_eq!(store.list_by("phones", &json!(["111", "222"])), vec![parent.clone()]);
    assert!(store.list_by("phones", &json!(["222", "111"])).is_empty());
    assert!(store.list_by("phones", &json!(["111"])).is_empty());

    let address = serde_json::to_value(&parent.address).unwrap();
    assert_eq!(store.list_by("address", &address).len(), 1);
}

#[test]
fn remove_rewrites_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Class>::open(dir.path()).unwrap();
    let kept = class("1A-M", None);
    let removed = class("1B-M", None);
    store.save(kept.clone()).unwrap();
    store.save(removed.clone()).unwrap();

    assert!(store.remove(removed.id).unwrap());
    assert!(!store.remove(removed.id).unwrap());

    let reopened = JsonStore::<Class>::open(dir.path()).unwrap();
    assert_eq!(reopened.list(), vec![kept]);
}

#[test]
fn save_rejects_invalid_record_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Teacher>::open(dir.path()).unwrap();
    let mut teacher = Teacher::new(teacher_draft("T-1")).unwrap();
    store.save(teacher.clone()).unwrap();

    teacher.salary = 0.0;
    let err = store.save(teacher.clone()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord { id, .. } if id == teacher.id));

    let reopened = JsonStore::<Teacher>::open(dir.path()).unwrap();
    assert_eq!(reopened.find_by_id(teacher.id).unwrap().salary, 3500.0);
}

#[test]
fn failed_update_map_leaves_memory_and_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::<Class>::open(dir.path()).unwrap();
    let existing = class("1A-M", None);
    store.save(existing.clone()).unwrap();

    let result: Result<(), ServiceError> = store.update_map(|records| {
        records.clear();
        Err(ServiceError::NotFound {
            kind: EntityKind::Class,
            id: existing.id,
        })
    });
    assert!(result.is_err());
    assert_eq!(store.list(), vec![existing.clone()]);

    let reopened = JsonStore::<Class>::open(dir.path()).unwrap();
    assert_eq!(reopened.list(), vec![existing]);
}

#[test]
fn malformed_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("class.json"), "{ not json").unwrap();

    let err = JsonStore::<Class>::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[test]
fn invalid_persisted_record_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    let content = json!([[id, {"id": id, "code": "not-a-code", "teacher": null}]]);
    fs::write(dir.path().join("class.json"), content.to_string()).unwrap();

    let err = JsonStore::<Class>::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::InvalidRecord { id: bad, .. } if bad == id));
}

#[test]
fn mismatched_entry_key_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let content = json!([[Uuid::new_v4(), {"id": Uuid::new_v4(), "code": "1A-M", "teacher": null}]]);
    fs::write(dir.path().join("class.json"), content.to_string()).unwrap();

    let err = JsonStore::<Class>::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}
