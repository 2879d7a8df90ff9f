//! Mission accessors. Missions are created with their initial targets and
//! listed a page at a time.

use crate::client::ApiClient;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::transport::Transport;
use crate::types::{Mission, MissionDetail, MissionInput, MissionPage, NewMission, PageRequest};

use super::{page_query, MISSION};

impl<T: Transport> ApiClient<T> {
    pub fn create_mission(&self, input: &NewMission) -> Result<Mission, RequestError> {
        self.request_as(MISSION, RequestConfig::post().json_from(input)?)
    }

    pub fn get_mission(&self, id: i64) -> Result<MissionDetail, RequestError> {
        self.request_as(&format!("{MISSION}{id}"), RequestConfig::get())
    }

    pub fn list_missions(&self, skip: u64, limit: u64) -> Result<MissionPage, RequestError> {
        self.request_as(&format!("{MISSION}{}", page_query(skip, limit)), RequestConfig::get())
    }

    pub fn list_missions_page(&self, page: PageRequest) -> Result<MissionPage, RequestError> {
        self.list_missions(page.skip(), page.limit)
    }

    pub fn update_mission(&self, id: i64, input: &MissionInput) -> Result<Mission, RequestError> {
        self.request_as(&format!("{MISSION}{id}"), RequestConfig::put().json_from(input)?)
    }

    /// The backend refuses to delete a mission that still has a cat assigned.
    pub fn delete_mission(&self, id: i64) -> Result<Mission, RequestError> {
        self.request_as(&format!("{MISSION}{id}"), RequestConfig::delete())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::{client_with, RecordingTransport};
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;
    use crate::types::{MissionInput, NewMission, PageRequest, TargetInput};

    #[test]
    fn create_includes_initial_targets() {
        let c = client_with(RecordingTransport::replying(200, r#"{"id":1,"cat_id":null,"is_complete":false}"#));
        let input = NewMission {
            cat_id: None,
            is_complete: false,
            targets: Some(vec![TargetInput {
                name: "Rex".to_string(),
                country: "UA".to_string(),
                is_complete: false,
            }]),
        };
        let mission = c.create_mission(&input).unwrap();
        assert_eq!(mission.id, 1);

        let req = c.transport().last();
        assert_eq!(req.url, "http://localhost:8000/mission/");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["targets"][0]["country"], "UA");
    }

    #[test]
    fn update_puts_single_record() {
        let c = client_with(RecordingTransport::replying(200, r#"{"id":4,"cat_id":2,"is_complete":true}"#));
        let mission = c
            .update_mission(4, &MissionInput { cat_id: Some(2), is_complete: true })
            .unwrap();
        assert!(mission.is_complete);

        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/mission/4");
    }

    #[test]
    fn page_listing_starts_at_first_record() {
        let c = client_with(RecordingTransport::replying(200, r#"{"missions":[],"all_count":0}"#));
        let page = c.list_missions_page(PageRequest::default()).unwrap();
        assert_eq!(page.all_count, 0);
        assert_eq!(c.transport().last().url, "http://localhost:8000/mission/?skip=0&limit=10");
    }

    #[test]
    fn delete_with_assigned_cat_surfaces_detail() {
        let body = json!({"detail": "Cannot delete mission with assigned SpyCat", "headers": {}});
        let c = client_with(RecordingTransport::replying(400, &body.to_string()));
        let err = c.delete_mission(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.detail(), Some("Cannot delete mission with assigned SpyCat"));
    }
}
