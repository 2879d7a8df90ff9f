use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpyCat {
    pub id: i64,
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

#[derive(Deserialize)]
pub struct SpyCatBody {
    pub name: String,
    #[serde(default)]
    pub years_of_experience: i64,
    pub breed: String,
    #[serde(default)]
    pub salary: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    pub id: i64,
    pub cat_id: Option<i64>,
    pub is_complete: bool,
}

#[derive(Deserialize)]
pub struct MissionBody {
    #[serde(default)]
    pub cat_id: Option<i64>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub targets: Option<Vec<TargetBody>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub id: i64,
    pub mission_id: i64,
    pub name: String,
    pub country: String,
    pub is_complete: bool,
}

#[derive(Deserialize)]
pub struct TargetBody {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub notes: Option<Vec<NoteBody>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub target_id: i64,
    pub content: String,
}

#[derive(Deserialize)]
pub struct NoteBody {
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct SpyCatRead {
    #[serde(flatten)]
    pub cat: SpyCat,
    pub missions: Vec<Mission>,
}

#[derive(Serialize, Deserialize)]
pub struct SpyCatPage {
    pub spycats: Vec<SpyCat>,
    pub all_count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MissionRead {
    #[serde(flatten)]
    pub mission: Mission,
    pub cat: Option<SpyCat>,
    pub targets: Vec<Target>,
}

#[derive(Serialize, Deserialize)]
pub struct MissionListItem {
    #[serde(flatten)]
    pub mission: Mission,
    pub cat: Option<SpyCat>,
}

#[derive(Serialize, Deserialize)]
pub struct MissionPage {
    pub missions: Vec<MissionListItem>,
    pub all_count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct TargetRead {
    #[serde(flatten)]
    pub target: Target,
    pub mission: Option<Mission>,
    pub notes: Vec<Note>,
}

#[derive(Serialize, Deserialize)]
pub struct NoteRead {
    #[serde(flatten)]
    pub note: Note,
    pub target: Option<Target>,
    pub mission: Option<Mission>,
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Error reply in the backend's `{"detail": ..., "headers": {}}` shape.
pub type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({"detail": detail.into(), "headers": {}})))
}

fn bad_request(detail: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, detail)
}

fn not_found(detail: impl Into<String>) -> ApiError {
    api_error(StatusCode::NOT_FOUND, detail)
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    cats: BTreeMap<i64, SpyCat>,
    missions: BTreeMap<i64, Mission>,
    targets: BTreeMap<i64, Target>,
    notes: BTreeMap<i64, Note>,
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn cat(&self, id: i64) -> Result<&SpyCat, ApiError> {
        self.cats.get(&id).ok_or_else(|| not_found("Spy Cat not found"))
    }

    fn mission(&self, id: i64) -> Result<&Mission, ApiError> {
        self.missions.get(&id).ok_or_else(|| not_found("Mission not found"))
    }

    fn target(&self, id: i64) -> Result<&Target, ApiError> {
        self.targets.get(&id).ok_or_else(|| not_found("Target not found"))
    }

    fn note(&self, id: i64) -> Result<&Note, ApiError> {
        self.notes.get(&id).ok_or_else(|| not_found("Note not found"))
    }

    fn targets_of(&self, mission_id: i64) -> Vec<Target> {
        self.targets.values().filter(|t| t.mission_id == mission_id).cloned().collect()
    }

    fn notes_of(&self, target_id: i64) -> Vec<Note> {
        self.notes.values().filter(|n| n.target_id == target_id).cloned().collect()
    }

    fn mission_of_target(&self, target: &Target) -> Option<&Mission> {
        self.missions.get(&target.mission_id)
    }

    fn insert_target(&mut self, mission_id: i64, body: &TargetBody) -> Target {
        let target = Target {
            id: self.allocate_id(),
            mission_id,
            name: body.name.clone(),
            country: body.country.clone(),
            is_complete: body.is_complete,
        };
        self.targets.insert(target.id, target.clone());
        for note in body.notes.iter().flatten() {
            self.insert_note(target.id, note.content.clone());
        }
        target
    }

    fn insert_note(&mut self, target_id: i64, content: String) -> Note {
        let note = Note {
            id: self.allocate_id(),
            target_id,
            content,
        };
        self.notes.insert(note.id, note.clone());
        note
    }

    fn remove_target(&mut self, id: i64) -> Option<Target> {
        let target = self.targets.remove(&id)?;
        self.notes.retain(|_, n| n.target_id != id);
        Some(target)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(root))
        .route("/spycat/", get(list_spycats).post(create_spycat))
        .route("/spycat/{id}", get(read_spycat).put(update_spycat).delete(delete_spycat))
        .route("/mission/", get(list_missions).post(create_mission))
        .route("/mission/{id}", get(read_mission).put(update_mission).delete(delete_mission))
        .route("/mission/{id}/target/", get(list_targets).post(create_target))
        .route("/target/{id}", get(read_target).put(update_target).delete(delete_target))
        .route("/target/{id}/note/", get(list_notes).post(create_note))
        .route("/note/{id}", get(read_note).put(update_note).delete(delete_note))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn paginate<T>(rows: impl Iterator<Item = T>, params: &PageParams) -> Vec<T> {
    let rows = rows.skip(params.skip);
    if params.limit > 0 {
        rows.take(params.limit).collect()
    } else {
        rows.collect()
    }
}

fn spycat_is_valid(body: &SpyCatBody) -> bool {
    !body.name.is_empty() && !body.breed.is_empty() && body.years_of_experience >= 0 && body.salary >= 0.0
}

fn target_is_valid(name: &str, country: &str) -> bool {
    !name.is_empty() && !country.is_empty()
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "Welcome to the SpyCat API!"}))
}

// --- spycat ---

async fn create_spycat(State(db): State<Db>, Json(body): Json<SpyCatBody>) -> Result<Json<SpyCat>, ApiError> {
    if !spycat_is_valid(&body) {
        return Err(bad_request("Invalid SpyCat data"));
    }
    let mut store = db.write().await;
    let cat = SpyCat {
        id: store.allocate_id(),
        name: body.name,
        years_of_experience: body.years_of_experience,
        breed: body.breed,
        salary: body.salary,
    };
    store.cats.insert(cat.id, cat.clone());
    tracing::info!(id = cat.id, "spy cat created");
    Ok(Json(cat))
}

async fn read_spycat(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<SpyCatRead>, ApiError> {
    let store = db.read().await;
    let cat = store.cat(id)?.clone();
    let missions = store.missions.values().filter(|m| m.cat_id == Some(id)).cloned().collect();
    Ok(Json(SpyCatRead { cat, missions }))
}

async fn list_spycats(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<SpyCatPage> {
    let store = db.read().await;
    Json(SpyCatPage {
        spycats: paginate(store.cats.values().cloned(), &params),
        all_count: store.cats.len(),
    })
}

async fn update_spycat(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<SpyCatBody>,
) -> Result<Json<SpyCat>, ApiError> {
    let mut store = db.write().await;
    store.cat(id)?;
    if !spycat_is_valid(&body) {
        return Err(bad_request("Invalid SpyCat data"));
    }
    let cat = SpyCat {
        id,
        name: body.name,
        years_of_experience: body.years_of_experience,
        breed: body.breed,
        salary: body.salary,
    };
    store.cats.insert(id, cat.clone());
    Ok(Json(cat))
}

async fn delete_spycat(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<SpyCat>, ApiError> {
    let mut store = db.write().await;
    let cat = store.cats.remove(&id).ok_or_else(|| not_found("Spy Cat not found"))?;
    for mission in store.missions.values_mut().filter(|m| m.cat_id == Some(id)) {
        mission.cat_id = None;
    }
    tracing::info!(id, "spy cat deleted");
    Ok(Json(cat))
}

// --- mission ---

async fn create_mission(State(db): State<Db>, Json(body): Json<MissionBody>) -> Result<Json<Mission>, ApiError> {
    let mut store = db.write().await;
    if let Some(cat_id) = body.cat_id {
        store.cats.get(&cat_id).ok_or_else(|| not_found("SpyCat not found"))?;
    }
    let targets = body.targets.unwrap_or_default();
    if let Some(i) = targets.iter().position(|t| !target_is_valid(&t.name, &t.country)) {
        return Err(bad_request(format!("Invalid Target #{} data", i + 1)));
    }
    let mission = Mission {
        id: store.allocate_id(),
        cat_id: body.cat_id,
        is_complete: body.is_complete,
    };
    store.missions.insert(mission.id, mission.clone());
    for target in &targets {
        store.insert_target(mission.id, target);
    }
    tracing::info!(id = mission.id, targets = targets.len(), "mission created");
    Ok(Json(mission))
}

async fn read_mission(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<MissionRead>, ApiError> {
    let store = db.read().await;
    let mission = store.mission(id)?.clone();
    let cat = mission.cat_id.and_then(|c| store.cats.get(&c).cloned());
    let targets = store.targets_of(id);
    Ok(Json(MissionRead { mission, cat, targets }))
}

async fn list_missions(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<MissionPage> {
    let store = db.read().await;
    let items = store.missions.values().map(|m| MissionListItem {
        mission: m.clone(),
        cat: m.cat_id.and_then(|c| store.cats.get(&c).cloned()),
    });
    Json(MissionPage {
        missions: paginate(items, &params),
        all_count: store.missions.len(),
    })
}

async fn update_mission(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<MissionBody>,
) -> Result<Json<Mission>, ApiError> {
    let mut store = db.write().await;
    store.mission(id)?;
    if let Some(cat_id) = body.cat_id {
        store.cat(cat_id)?;
    }
    let Some(mission) = store.missions.get_mut(&id) else {
        return Err(not_found("Mission not found"));
    };
    mission.is_complete = body.is_complete;
    if body.cat_id.is_some() {
        mission.cat_id = body.cat_id;
    }
    Ok(Json(mission.clone()))
}

async fn delete_mission(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Mission>, ApiError> {
    let mut store = db.write().await;
    let mission = store.mission(id)?.clone();
    if mission.cat_id.is_some_and(|c| store.cats.contains_key(&c)) {
        return Err(bad_request("Cannot delete mission with assigned SpyCat"));
    }
    store.missions.remove(&id);
    for target in store.targets_of(id) {
        store.remove_target(target.id);
    }
    Ok(Json(mission))
}

// --- target ---

async fn create_target(
    State(db): State<Db>,
    Path(mission_id): Path<i64>,
    Json(body): Json<TargetBody>,
) -> Result<Json<Target>, ApiError> {
    let mut store = db.write().await;
    store.mission(mission_id)?;
    if !target_is_valid(&body.name, &body.country) {
        return Err(bad_request("Invalid Target data"));
    }
    if let Some(i) = body.notes.iter().flatten().position(|n| n.content.is_empty()) {
        return Err(bad_request(format!("Invalid Note #{} data", i + 1)));
    }
    Ok(Json(store.insert_target(mission_id, &body)))
}

async fn list_targets(State(db): State<Db>, Path(mission_id): Path<i64>) -> Result<Json<Vec<Target>>, ApiError> {
    let store = db.read().await;
    store.mission(mission_id)?;
    Ok(Json(store.targets_of(mission_id)))
}

async fn read_target(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<TargetRead>, ApiError> {
    let store = db.read().await;
    let target = store.target(id)?.clone();
    let mission = store.mission_of_target(&target).cloned();
    let notes = store.notes_of(id);
    Ok(Json(TargetRead { target, mission, notes }))
}

async fn update_target(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<TargetBody>,
) -> Result<Json<Target>, ApiError> {
    let mut store = db.write().await;
    store.target(id)?;
    if !target_is_valid(&body.name, &body.country) {
        return Err(bad_request("Invalid Target data"));
    }
    let Some(target) = store.targets.get_mut(&id) else {
        return Err(not_found("Target not found"));
    };
    target.name = body.name;
    target.country = body.country;
    target.is_complete = body.is_complete;
    Ok(Json(target.clone()))
}

async fn delete_target(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Target>, ApiError> {
    let mut store = db.write().await;
    store.remove_target(id).map(Json).ok_or_else(|| not_found("Target not found"))
}

// --- note ---

async fn create_note(
    State(db): State<Db>,
    Path(target_id): Path<i64>,
    Json(body): Json<NoteBody>,
) -> Result<Json<Note>, ApiError> {
    if body.content.is_empty() {
        return Err(bad_request("Note content is required"));
    }
    let mut store = db.write().await;
    let target = store.target(target_id)?;
    if store.mission_of_target(target).is_some_and(|m| m.is_complete) {
        return Err(bad_request("Cannot add note to a completed mission"));
    }
    if target.is_complete {
        return Err(bad_request("Cannot add note to a completed target"));
    }
    Ok(Json(store.insert_note(target_id, body.content)))
}

async fn list_notes(State(db): State<Db>, Path(target_id): Path<i64>) -> Result<Json<Vec<Note>>, ApiError> {
    let store = db.read().await;
    store.target(target_id)?;
    Ok(Json(store.notes_of(target_id)))
}

async fn read_note(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<NoteRead>, ApiError> {
    let store = db.read().await;
    let note = store.note(id)?.clone();
    let target = store.targets.get(&note.target_id).cloned();
    let mission = target.as_ref().and_then(|t| store.mission_of_target(t)).cloned();
    Ok(Json(NoteRead { note, target, mission }))
}

async fn update_note(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(body): Json<NoteBody>,
) -> Result<Json<Note>, ApiError> {
    let mut store = db.write().await;
    let note = store.note(id)?;
    if let Some(target) = store.targets.get(&note.target_id) {
        if target.is_complete {
            return Err(bad_request("Cannot update note for a completed target"));
        }
        if store.mission_of_target(target).is_some_and(|m| m.is_complete) {
            return Err(bad_request("Cannot update note for a completed mission"));
        }
    }
    if body.content.is_empty() {
        return Err(bad_request("Note content is required"));
    }
    let Some(note) = store.notes.get_mut(&id) else {
        return Err(not_found("Note not found"));
    };
    note.content = body.content;
    Ok(Json(note.clone()))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Note>, ApiError> {
    let mut store = db.write().await;
    store.notes.remove(&id).map(Json).ok_or_else(|| not_found("Note not found"))
}
