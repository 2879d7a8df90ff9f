//! Spy cat accessors: the `/spycat/` collection and single records.

use crate::client::ApiClient;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::transport::Transport;
use crate::types::{PageRequest, SpyCat, SpyCatDetail, SpyCatInput, SpyCatPage};

use super::{page_query, SPYCAT};

impl<T: Transport> ApiClient<T> {
    pub fn create_spycat(&self, input: &SpyCatInput) -> Result<SpyCat, RequestError> {
        self.request_as(SPYCAT, RequestConfig::post().json_from(input)?)
    }

    pub fn get_spycat(&self, id: i64) -> Result<SpyCatDetail, RequestError> {
        self.request_as(&format!("{SPYCAT}{id}"), RequestConfig::get())
    }

    pub fn list_spycats(&self, skip: u64, limit: u64) -> Result<SpyCatPage, RequestError> {
        self.request_as(&format!("{SPYCAT}{}", page_query(skip, limit)), RequestConfig::get())
    }

    pub fn list_spycats_page(&self, page: PageRequest) -> Result<SpyCatPage, RequestError> {
        self.list_spycats(page.skip(), page.limit)
    }

    pub fn update_spycat(&self, id: i64, input: &SpyCatInput) -> Result<SpyCat, RequestError> {
        self.request_as(&format!("{SPYCAT}{id}"), RequestConfig::put().json_from(input)?)
    }

    /// Returns the record as it was before deletion.
    pub fn delete_spycat(&self, id: i64) -> Result<SpyCat, RequestError> {
        self.request_as(&format!("{SPYCAT}{id}"), RequestConfig::delete())
    }
}
