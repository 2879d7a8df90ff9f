//! Client for the Spy Cat Agency REST backend.
//!
//! # Overview
//! Every call to the backend (cats, missions, targets, notes) goes through
//! one entry point, [`ApiClient::request`], which applies header defaults,
//! body serialization and error shaping exactly once. The resource accessors
//! (`ApiClient::create_spycat`, `ApiClient::list_targets`, ...) are thin
//! call-sites that add a path and a verb and narrow the JSON result into the
//! records in [`types`].
//!
//! # Design
//! - `ApiClient` is stateless beyond its injected base origin; calls are
//!   independent and may run concurrently.
//! - Request normalization (`build_request`) and outcome mapping
//!   (`parse_response`) are pure; only the [`Transport`] does I/O.
//! - Failures are a single [`RequestError`] enum matched by kind:
//!   configuration, transport, http, decode.
//! - No retries and no caching. Callers decide what to do with a failure;
//!   [`notify`] holds the usual way of showing one.

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::{Body, ClientConfig, RequestConfig};
pub use error::{ErrorKind, RequestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Mission, MissionDetail, MissionInput, MissionPage, MissionSummary, NewMission, NewTarget, Note, NoteDetail,
    NoteInput, PageRequest, SpyCat, SpyCatDetail, SpyCatInput, SpyCatPage, Target, TargetDetail, TargetInput,
};
