#![allow(dead_code)]

use school_core::{ClassDraft, EntityId, ParentDraft, School, StudentDraft, TeacherDraft};
use serde_json::json;
use tempfile::TempDir;

/// Fresh registry over an isolated data directory.
pub fn setup() -> (TempDir, School) {
    let dir = tempfile::tempdir().unwrap();
    let school = School::open(dir.path()).unwrap();
    (dir, school)
}

pub fn teacher_draft(document: &str) -> TeacherDraft {
    serde_json::from_value(json!({
        "firstName": "Ada",
        "surname": "Lovelace",
        "phone": "+44 20 7946 0000",
        "email": "ada@school.org",
        "document": document,
        "salary": 3500.0,
        "hiringDate": "2015-03-01T08:00:00Z",
        "major": "Mathematics"
    }))
    .unwrap()
}

pub fn parent_draft(document: &str) -> ParentDraft {
    serde_json::from_value(json!({
        "firstName": "Grace",
        "surname": "Hopper",
        "phones": ["+1 555 0100"],
        "emails": ["grace@home.net"],
        "address": [{
            "line1": "1 Harbor Rd",
            "zipCode": "02110",
            "city": "Boston",
            "country": "US"
        }],
        "document": document
    }))
    .unwrap()
}

pub fn class_draft(code: &str, teacher: Option<EntityId>) -> ClassDraft {
    ClassDraft {
        id: None,
        code: code.to_string(),
        teacher,
    }
}

pub fn student_draft(document: &str, class_id: EntityId, parents: &[EntityId]) -> StudentDraft {
    serde_json::from_value(json!({
        "firstName": "Alan",
        "surname": "Turing",
        "document": document,
        "bloodType": "O+",
        "birthDate": "2012-06-23T00:00:00Z",
        "startDate": "2020-02-01T00:00:00Z",
        "allergies": ["peanuts"],
        "parents": parents,
        "class": class_id
    }))
    .unwrap()
}
