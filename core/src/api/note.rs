//! Note accessors, nested under their target for create and list.

use crate::client::ApiClient;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::transport::Transport;
use crate::types::{Note, NoteDetail, NoteInput};

use super::{NOTE, TARGET};

impl<T: Transport> ApiClient<T> {
    /// Rejected by the backend when the target or its mission is complete.
    pub fn create_note(&self, target_id: i64, input: &NoteInput) -> Result<Note, RequestError> {
        self.request_as(
            &format!("{TARGET}{target_id}{NOTE}"),
            RequestConfig::post().json_from(input)?,
        )
    }

    pub fn get_note(&self, id: i64) -> Result<NoteDetail, RequestError> {
        self.request_as(&format!("{NOTE}{id}"), RequestConfig::get())
    }

    pub fn list_notes(&self, target_id: i64) -> Result<Vec<Note>, RequestError> {
        self.request_as(&format!("{TARGET}{target_id}{NOTE}"), RequestConfig::get())
    }

    pub fn update_note(&self, id: i64, input: &NoteInput) -> Result<Note, RequestError> {
        self.request_as(&format!("{NOTE}{id}"), RequestConfig::put().json_from(input)?)
    }

    pub fn delete_note(&self, id: i64) -> Result<Note, RequestError> {
        self.request_as(&format!("{NOTE}{id}"), RequestConfig::delete())
    }
}
