mod common;

use common::{class_draft, parent_draft, setup, teacher_draft};
use school_core::{
    EntityKind, EntityService, ParentPatch, School, ServiceError, TeacherPatch, ValidationError,
};
use uuid::Uuid;

#[test]
fn teacher_create_assigns_id_and_persists() {
    let (_dir, school) = setup();
    let created = school.teachers().create(teacher_draft("T-1")).unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(school.teachers().find_by_id(created.id).unwrap(), created);
    assert_eq!(school.teachers().list(), vec![created]);
}

#[test]
fn teacher_document_must_be_unique() {
    let (_dir, school) = setup();
    school.teachers().create(teacher_draft("T-1")).unwrap();

    let err = school.teachers().create(teacher_draft("T-1")).unwrap_err();
    assert!(matches!(
        &err,
        ServiceError::Conflict { kind: EntityKind::Teacher, field: "document", value }
            if value == "T-1"
    ));
    assert_eq!(err.to_string(), "Teacher with document `T-1` already exists");
    assert_eq!(school.teachers().list().len(), 1);
}

#[test]
fn teacher_create_with_existing_id_conflicts() {
    let (_dir, school) = setup();
    let created = school.teachers().create(teacher_draft("T-1")).unwrap();

    let mut draft = teacher_draft("T-2");
    draft.id = Some(created.id);
    let err = school.teachers().create(draft).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { field: "id", .. }));
    assert_eq!(school.teachers().find_by_id(created.id).unwrap().document, "T-1");
}

#[test]
fn teacher_update_keeps_own_document_but_not_others() {
    let (_dir, school) = setup();
    let first = school.teachers().create(teacher_draft("T-1")).unwrap();
    school.teachers().create(teacher_draft("T-2")).unwrap();

    let same = school
        .teachers()
        .update(
            first.id,
            TeacherPatch {
                document: Some("T-1".to_string()),
                major: Some("Physics".to_string()),
                ..TeacherPatch::default()
            },
        )
        .unwrap();
    assert_eq!(same.major, "Physics");

    let err = school
        .teachers()
        .update(
            first.id,
            TeacherPatch {
                document: Some("T-2".to_string()),
                ..TeacherPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { field: "document", .. }));
}

#[test]
fn teacher_update_merges_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let school = School::open(dir.path()).unwrap();
        let created = school.teachers().create(teacher_draft("T-1")).unwrap();
        school
            .teachers()
            .update(
                created.id,
                TeacherPatch {
                    salary: Some(4100.0),
                    ..TeacherPatch::default()
                },
            )
            .unwrap();
        created.id
    };

    let reopened = School::open(dir.path()).unwrap();
    let teacher = reopened.teachers().find_by_id(id).unwrap();
    assert_eq!(teacher.salary, 4100.0);
    assert_eq!(teacher.first_name, "Ada");
    assert_eq!(teacher.document, "T-1");
}

#[test]
fn invalid_teacher_update_leaves_record_unchanged() {
    let (_dir, school) = setup();
    let created = school.teachers().create(teacher_draft("T-1")).unwrap();

    let err = school
        .teachers()
        .update(
            created.id,
            TeacherPatch {
                email: Some("not-an-email".to_string()),
                ..TeacherPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidEmail(_))
    ));
    assert_eq!(school.teachers().find_by_id(created.id).unwrap(), created);
}

#[test]
fn unknown_ids_are_not_found() {
    let (_dir, school) = setup();
    let missing = Uuid::new_v4();

    let err = school.teachers().find_by_id(missing).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound { kind: EntityKind::Teacher, id } if id == missing
    ));
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.status(), 404);

    let err = school
        .parents()
        .update(missing, ParentPatch::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound { kind: EntityKind::Parent, .. }
    ));
}

#[test]
fn service_remove_of_teacher_does_not_cascade() {
    let (_dir, school) = setup();
    let teacher = school.teachers().create(teacher_draft("T-1")).unwrap();
    let class = school
        .classes()
        .create(class_draft("1A-M", Some(teacher.id)))
        .unwrap();

    school.teachers().remove(teacher.id).unwrap();

    assert!(school.teachers().find_by_id(teacher.id).is_err());
    assert_eq!(
        school.classes().find_by_id(class.id).unwrap().teacher,
        Some(teacher.id)
    );
}

#[test]
fn remove_of_missing_record_is_ok() {
    let (_dir, school) = setup();
    school.teachers().remove(Uuid::new_v4()).unwrap();
    school.parents().remove(Uuid::new_v4()).unwrap();
}

#[test]
fn parent_document_must_be_unique() {
    let (_dir, school) = setup();
    let first = school.parents().create(parent_draft("P-1")).unwrap();
    let second = school.parents().create(parent_draft("P-2")).unwrap();

    let err = school.parents().create(parent_draft("P-1")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict { kind: EntityKind::Parent, field: "document", .. }
    ));

    let err = school
        .parents()
        .update(
            second.id,
            ParentPatch {
                document: Some("P-1".to_string()),
                ..ParentPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { .. }));
    assert_eq!(school.parents().find_by_id(first.id).unwrap(), first);
}

#[test]
fn parent_update_revalidates_contacts() {
    let (_dir, school) = setup();
    let parent = school.parents().create(parent_draft("P-1")).unwrap();

    let err = school
        .parents()
        .update(
            parent.id,
            ParentPatch {
                emails: Some(Vec::new()),
                ..ParentPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyList("emails"))
    ));

    let updated = school
        .parents()
        .update(
            parent.id,
            ParentPatch {
                phones: Some(vec!["+1 555 0101".to_string(), "+1 555 0102".to_string()]),
                ..ParentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.phones.len(), 2);
    assert_eq!(updated.emails, parent.emails);
}
