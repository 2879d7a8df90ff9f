//! Resource accessors: one method per CRUD action per resource.
//!
//! Each accessor pairs a fixed path and verb with `ApiClient::request_as`
//! and narrows the JSON it gets back into a record from `crate::types`.
//! They hold no logic of their own.

mod mission;
mod note;
mod spycat;
mod target;

const SPYCAT: &str = "/spycat/";
const MISSION: &str = "/mission/";
const TARGET: &str = "/target/";
const NOTE: &str = "/note/";

fn page_query(skip: u64, limit: u64) -> String {
    format!("?skip={skip}&limit={limit}")
}
