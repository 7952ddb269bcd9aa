use crate::store::LibraryStore;
use anyhow::Result;
use atlas_import::DependencyTable;
use atlas_model::{add_link_unique, ensure_process, Library, LinkKind, ProcessKind};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    store: Arc<LibraryStore>,
    /// Serializes read-modify-write cycles on the single document.
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: LibraryStore) -> Self {
        Self {
            store: Arc::new(store),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub async fn serve(bind: &str, store: LibraryStore) -> Result<()> {
    let state = AppState::new(store);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("process atlas backend listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/library", get(get_library).post(post_library))
        .route("/api/dependencies", post(post_dependencies))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_library(State(state): State<AppState>) -> Json<Library> {
    Json(state.store.load().await)
}

async fn post_library(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(library) = parse_object::<Library>(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid body");
    };

    let _guard = state.write_lock.lock().await;
    match state.store.save(&library).await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(err) => {
            log::error!("failed to persist library: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist")
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DependenciesResponse {
    ok: bool,
    main_id: String,
    sub_ids: Vec<String>,
}

async fn post_dependencies(State(state): State<AppState>, body: Bytes) -> Response {
    // `main` must be present and `subs` must be a list; everything else is
    // tolerated.
    let valid = serde_json::from_slice::<Value>(&body)
        .ok()
        .map(|v| v.get("main").is_some() && v.get("subs").map(Value::is_array) == Some(true))
        .unwrap_or(false);
    if !valid {
        return error_response(StatusCode::BAD_REQUEST, "Invalid dependency payload");
    }
    let Some(payload) = parse_object::<DependencyTable>(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid dependency payload");
    };

    let _guard = state.write_lock.lock().await;
    let mut library = state.store.load().await;
    let (main_id, sub_ids) = apply_dependencies(&mut library, &payload);

    match state.store.save(&library).await {
        Ok(()) => Json(DependenciesResponse {
            ok: true,
            main_id,
            sub_ids,
        })
        .into_response(),
        Err(err) => {
            log::error!("failed to persist library: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist")
        }
    }
}

/// Idempotently ensure the payload's processes exist and link main to subs.
fn apply_dependencies(library: &mut Library, payload: &DependencyTable) -> (String, Vec<String>) {
    let main_id = ensure_process(
        library,
        payload.main.id.as_deref(),
        &payload.main.name,
        ProcessKind::Main,
    );
    let sub_ids: Vec<String> = payload
        .subs
        .iter()
        .map(|sub| ensure_process(library, sub.id.as_deref(), &sub.name, ProcessKind::Sub))
        .collect();
    for sub_id in &sub_ids {
        add_link_unique(library, &main_id, sub_id, LinkKind::Contains);
    }
    (main_id, sub_ids)
}

fn parse_object<T: serde::de::DeserializeOwned>(body: &[u8]) -> Option<T> {
    let value: Value = serde_json::from_slice(body).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(LibraryStore::new(dir.path()));
        (dir, state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn library_posts_round_trip_through_the_store() {
        let (_dir, state) = state();

        let doc = json!({
            "processes": [{"id": "100000", "name": "Apply label", "kind": "main"}],
            "buildingBlocks": [],
            "links": [],
            "notes": []
        });
        let response = post_library(
            State(state.clone()),
            Bytes::from(serde_json::to_vec(&doc).unwrap()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let Json(library) = get_library(State(state)).await;
        assert_eq!(library.processes.len(), 1);
        assert_eq!(library.processes[0].id, "100000");
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let (_dir, state) = state();

        for body in ["[1,2,3]", "\"text\"", "not json at all"] {
            let response =
                post_library(State(state.clone()), Bytes::from(body.as_bytes().to_vec())).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        }
    }

    #[tokio::test]
    async fn missing_library_reads_as_empty_collections() {
        let (_dir, state) = state();
        let Json(library) = get_library(State(state)).await;
        assert!(library.is_empty());
    }

    #[tokio::test]
    async fn dependencies_create_processes_and_links() {
        let (_dir, state) = state();

        let payload = json!({
            "main": {"name": "Assemble housing"},
            "subs": [{"id": "200001", "name": "Fit cover"}, {"name": "Insert seal"}]
        });
        let response = post_dependencies(
            State(state.clone()),
            Bytes::from(serde_json::to_vec(&payload).unwrap()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["ok"], true);
        assert_eq!(value["mainId"], "gen:assemble-housing");
        assert_eq!(value["subIds"][0], "200001");
        assert_eq!(value["subIds"][1], "gen:insert-seal");

        let Json(library) = get_library(State(state)).await;
        assert_eq!(library.processes.len(), 3);
        assert_eq!(library.links.len(), 2);
    }

    #[tokio::test]
    async fn dependencies_are_idempotent_across_posts() {
        let (_dir, state) = state();

        let payload = json!({
            "main": {"id": "100000", "name": "Apply label"},
            "subs": [{"id": "100001", "name": "Print label"}]
        });
        let bytes = Bytes::from(serde_json::to_vec(&payload).unwrap());
        post_dependencies(State(state.clone()), bytes.clone()).await;
        post_dependencies(State(state.clone()), bytes).await;

        let Json(library) = get_library(State(state)).await;
        assert_eq!(library.processes.len(), 2);
        assert_eq!(library.links.len(), 1);
    }

    #[tokio::test]
    async fn dependency_payloads_without_main_or_subs_are_rejected() {
        let (_dir, state) = state();

        for body in [
            json!({"subs": []}),
            json!({"main": {"name": "x"}, "subs": "not a list"}),
            json!({"main": {"name": "x"}}),
        ] {
            let response = post_dependencies(
                State(state.clone()),
                Bytes::from(serde_json::to_vec(&body).unwrap()),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {body}");
        }
    }
}
