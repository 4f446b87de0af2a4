use crate::server::scene::SceneModel;
use anyhow::{Context, Result};
use detection_client::{DetectedObject, DetectionPayload};
use log::{info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use warp::{http::StatusCode, reply, Filter};

type SharedScene = Arc<RwLock<SceneModel>>;
type JsonReply = reply::WithStatus<reply::Json>;

/// HTTP stand-in for the detection server, running on its own thread.
pub struct DetectionServer {
    state: SharedScene,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DetectionServer {
    /// Binds `addr` (port 0 picks a free port) and starts serving `scene`.
    pub fn spawn(addr: SocketAddr, scene: SceneModel) -> Result<Self> {
        let state = Arc::new(RwLock::new(scene));
        let filter = routes(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (bound_tx, bound_rx) = mpsc::channel::<Result<SocketAddr>>();

        let handle = thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let err = anyhow::Error::new(err).context("building server runtime");
                    let _ = bound_tx.send(Err(err));
                    return;
                }
            };
            runtime.block_on(async move {
                let signal = async move {
                    let _ = shutdown_rx.await;
                };
                match warp::serve(filter).try_bind_with_graceful_shutdown(addr, signal) {
                    Ok((local_addr, server)) => {
                        let _ = bound_tx.send(Ok(local_addr));
                        server.await;
                    }
                    Err(err) => {
                        let err = anyhow::Error::new(err).context(format!("binding {}", addr));
                        let _ = bound_tx.send(Err(err));
                    }
                }
            });
        });

        let local_addr = bound_rx
            .recv()
            .context("server thread exited before binding")??;
        info!("detection server listening on http://{}", local_addr);

        Ok(Self {
            state,
            local_addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[cfg(test)]
    pub fn replace_scene(&self, objects: Vec<DetectedObject>) {
        if let Ok(mut guard) = self.state.write() {
            *guard = SceneModel::new(objects);
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SceneModel {
        self.state
            .read()
            .map(|scene| scene.clone())
            .unwrap_or_default()
    }

    /// Signals shutdown and waits for the server thread to exit.
    pub fn stop(mut self) {
        self.signal_shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for DetectionServer {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

fn routes(
    state: SharedScene,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let closest_route = warp::path("get_closest_object")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedScene| {
            serve_payload(&state, "/get_closest_object", SceneModel::closest_payload)
        });

    let all_route = warp::path("get_all_objects")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedScene| {
            serve_payload(&state, "/get_all_objects", SceneModel::all_payload)
        });

    let scene_route = warp::path("scene")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .map(|objects: Vec<DetectedObject>, state: SharedScene| {
            let count = objects.len();
            match state.write() {
                Ok(mut guard) => {
                    *guard = SceneModel::new(objects);
                    info!("POST /scene -> {} objects", count);
                    reply::with_status(
                        reply::json(&json!({"status": "ok", "objects": count})),
                        StatusCode::OK,
                    )
                }
                Err(_) => scene_unavailable("/scene"),
            }
        });

    closest_route.or(all_route).or(scene_route)
}

fn serve_payload(
    state: &SharedScene,
    route: &str,
    select: fn(&SceneModel) -> DetectionPayload,
) -> JsonReply {
    match state.read() {
        Ok(scene) => {
            let payload = select(&scene);
            info!("GET {} -> {} objects", route, payload.objects.len());
            reply::with_status(reply::json(&payload), StatusCode::OK)
        }
        Err(_) => scene_unavailable(route),
    }
}

fn scene_unavailable(route: &str) -> JsonReply {
    warn!("{}: scene lock poisoned", route);
    reply::with_status(
        reply::json(&json!({"error": "scene unavailable"})),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use detection_client::{ClientError, DetectionClient};

    fn spawn_local(objects: Vec<DetectedObject>) -> (DetectionServer, DetectionClient) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = DetectionServer::spawn(addr, SceneModel::new(objects)).unwrap();
        let addr = server.local_addr();
        let client = DetectionClient::new(addr.ip().to_string(), addr.port()).unwrap();
        (server, client)
    }

    #[test]
    fn server_answers_both_routes() {
        let (server, client) = spawn_local(vec![
            DetectedObject::new("car", 20, 10, 0),
            DetectedObject::new("person", 6, -3, 1),
        ]);
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(client.closest_object_class().unwrap(), "person");
        assert_eq!(client.closest_object_distance().unwrap(), 6);
        assert_eq!(client.object_class_at_index(0).unwrap(), "car");
        assert_eq!(client.object_horizontal_angle_at_index(1).unwrap(), -3);
        server.stop();
    }

    #[test]
    fn replaced_scene_is_served_on_next_request() {
        let (server, client) = spawn_local(Vec::new());
        assert!(matches!(
            client.closest_object_class().unwrap_err(),
            ClientError::EmptyResult
        ));

        server.replace_scene(vec![DetectedObject::new("cone", 2, 0, -4)]);
        assert_eq!(client.closest_object_vertical_angle().unwrap(), -4);
        server.stop();
    }

    #[test]
    fn post_scene_replaces_objects() {
        let (server, client) = spawn_local(Vec::new());
        let url = format!("http://{}/scene", server.local_addr());
        let objects = vec![
            DetectedObject::new("dog", 9, 1, 0),
            DetectedObject::new("bicycle", 5, 2, 0),
        ];
        let response = reqwest::blocking::Client::new()
            .post(&url)
            .json(&objects)
            .send()
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(server.snapshot().objects, objects);
        assert_eq!(client.all_objects().unwrap(), objects);
        server.stop();
    }
}
