//! Typed records for the four agency resources.
//!
//! # Design
//! The request client itself only deals in `serde_json::Value`; these types
//! are what the resource accessors narrow those values into. They mirror the
//! backend's JSON but are defined independently of the mock server, and the
//! integration tests catch drift between the two.
//!
//! `*Input` types are the bodies sent on create/update. `*Detail` types are
//! the single-record reads, which embed related records.

use serde::{Deserialize, Serialize};

/// A spy cat agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpyCat {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub years_of_experience: i64,
    pub breed: String,
    #[serde(default)]
    pub salary: f64,
}

/// Body for creating or replacing a spy cat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpyCatInput {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

/// A spy cat together with the missions assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpyCatDetail {
    #[serde(flatten)]
    pub cat: SpyCat,
    #[serde(default)]
    pub missions: Vec<Mission>,
}

/// One page of spy cats plus the size of the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpyCatPage {
    pub spycats: Vec<SpyCat>,
    pub all_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    pub id: i64,
    #[serde(default)]
    pub cat_id: Option<i64>,
    #[serde(default)]
    pub is_complete: bool,
}

/// Body for updating a mission. A `None` cat leaves the assignment as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissionInput {
    pub cat_id: Option<i64>,
    pub is_complete: bool,
}

/// Body for creating a mission, optionally with its first targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMission {
    pub cat_id: Option<i64>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<TargetInput>>,
}

/// A mission with its assigned cat and its targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionDetail {
    #[serde(flatten)]
    pub mission: Mission,
    #[serde(default)]
    pub cat: Option<SpyCat>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// A mission as it appears in list results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionSummary {
    #[serde(flatten)]
    pub mission: Mission,
    #[serde(default)]
    pub cat: Option<SpyCat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionPage {
    pub missions: Vec<MissionSummary>,
    pub all_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub id: i64,
    #[serde(default)]
    pub mission_id: Option<i64>,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub is_complete: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetInput {
    pub name: String,
    pub country: String,
    pub is_complete: bool,
}

/// Body for creating a target, optionally with its first notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTarget {
    pub name: String,
    pub country: String,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<NoteInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetDetail {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl TargetDetail {
    /// Notes are frozen once the target or its mission is complete.
    pub fn accepts_notes(&self) -> bool {
        !self.target.is_complete && !self.mission.as_ref().is_some_and(|m| m.is_complete)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub target_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteInput {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteDetail {
    #[serde(flatten)]
    pub note: Note,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default)]
    pub mission: Option<Mission>,
}

impl NoteDetail {
    pub fn is_editable(&self) -> bool {
        !self.target.as_ref().is_some_and(|t| t.is_complete)
            && !self.mission.as_ref().is_some_and(|m| m.is_complete)
    }
}

/// A 1-based page of a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Number of records before this page. Page 0 counts as page 1.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pages needed to show `all_count` records, `limit` at a time.
pub fn page_count(all_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    all_count.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn spycat_detail_reads_embedded_missions() {
        let detail: SpyCatDetail = serde_json::from_value(json!({
            "id": 1,
            "name": "Tom",
            "years_of_experience": 4,
            "breed": "Siamese",
            "salary": 1200.5,
            "missions": [{"id": 7, "cat_id": 1, "is_complete": false}]
        }))
        .unwrap();
        assert_eq!(detail.cat.name, "Tom");
        assert_eq!(detail.missions.len(), 1);
        assert_eq!(detail.missions[0].cat_id, Some(1));
    }

    #[test]
    fn mission_detail_tolerates_missing_cat() {
        let detail: MissionDetail = serde_json::from_value(json!({
            "id": 3,
            "cat_id": null,
            "is_complete": false,
            "cat": null,
            "targets": [{"id": 1, "name": "Rex", "country": "UA", "is_complete": true}]
        }))
        .unwrap();
        assert!(detail.cat.is_none());
        assert_eq!(detail.targets[0].mission_id, None);
        assert!(detail.targets[0].is_complete);
    }

    #[test]
    fn new_mission_omits_absent_targets() {
        let body = serde_json::to_value(NewMission::default()).unwrap();
        assert_eq!(body, json!({"cat_id": null, "is_complete": false}));
    }

    #[test]
    fn completed_target_rejects_notes() {
        let mut detail = TargetDetail {
            target: Target {
                id: 1,
                mission_id: Some(2),
                name: "Rex".to_string(),
                country: "UA".to_string(),
                is_complete: false,
            },
            mission: Some(Mission {
                id: 2,
                cat_id: None,
                is_complete: false,
            }),
            notes: Vec::new(),
        };
        assert!(detail.accepts_notes());

        detail.mission.as_mut().unwrap().is_complete = true;
        assert!(!detail.accepts_notes());

        detail.mission.as_mut().unwrap().is_complete = false;
        detail.target.is_complete = true;
        assert!(!detail.accepts_notes());
    }

    #[test]
    fn note_editable_without_context() {
        let detail: NoteDetail = serde_json::from_value(json!({"id": 1, "content": "hi"})).unwrap();
        assert!(detail.is_editable());

        let detail: NoteDetail = serde_json::from_value(json!({
            "id": 1,
            "content": "hi",
            "target": {"id": 4, "name": "Rex", "country": "UA", "is_complete": false},
            "mission": {"id": 2, "cat_id": 1, "is_complete": true}
        }))
        .unwrap();
        assert!(!detail.is_editable());
    }

    #[test]
    fn pagination_math() {
        assert_eq!(PageRequest::default().skip(), 0);
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(0, 10).skip(), 0);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }
}
