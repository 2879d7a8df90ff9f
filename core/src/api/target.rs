//! Target accessors, nested under their mission for create and list.

use crate::client::ApiClient;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::transport::Transport;
use crate::types::{NewTarget, Target, TargetDetail, TargetInput};

use super::{MISSION, TARGET};

impl<T: Transport> ApiClient<T> {
    pub fn create_target(&self, mission_id: i64, input: &NewTarget) -> Result<Target, RequestError> {
        self.request_as(
            &format!("{MISSION}{mission_id}{TARGET}"),
            RequestConfig::post().json_from(input)?,
        )
    }

    pub fn get_target(&self, id: i64) -> Result<TargetDetail, RequestError> {
        self.request_as(&format!("{TARGET}{id}"), RequestConfig::get())
    }

    pub fn list_targets(&self, mission_id: i64) -> Result<Vec<Target>, RequestError> {
        self.request_as(&format!("{MISSION}{mission_id}{TARGET}"), RequestConfig::get())
    }

    pub fn update_target(&self, id: i64, input: &TargetInput) -> Result<Target, RequestError> {
        self.request_as(&format!("{TARGET}{id}"), RequestConfig::put().json_from(input)?)
    }

    pub fn delete_target(&self, id: i64) -> Result<Target, RequestError> {
        self.request_as(&format!("{TARGET}{id}"), RequestConfig::delete())
    }
}
