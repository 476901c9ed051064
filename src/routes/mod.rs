pub mod comments;
pub mod posts;

pub use comments::comments_routes;
pub use posts::posts_routes;

use std::path::PathBuf;

use axum::{
    Router,
    extract::Request,
    http::{Uri, uri::PathAndQuery},
    routing::get,
};
use tower::{ServiceBuilder, util::MapRequest};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    services::ServeFile,
    trace::TraceLayer,
};

use crate::state::AppState;

/// The router wrapped in path clean-up, which has to run before routing.
pub type App = NormalizePath<MapRequest<Router, fn(Request) -> Request>>;

fn index_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public/index.html")
}

pub fn app(state: AppState) -> App {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api/posts", posts_routes())
        .nest("/api/posts", comments_routes())
        .route("/ping", get(heartbeat))
        .route_service("/", ServeFile::new(index_file()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state);

    ServiceBuilder::new()
        .layer(NormalizePathLayer::trim_trailing_slash())
        .map_request(clean_path as fn(Request) -> Request)
        .service(router)
}

async fn heartbeat() -> &'static str {
    "."
}

/// Rewrites the request path with repeated slashes collapsed and `.`/`..`
/// segments resolved. The query string is kept as is.
fn clean_path(mut req: Request) -> Request {
    let cleaned = normalize_segments(req.uri().path());
    if cleaned == req.uri().path() {
        return req;
    }

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{cleaned}?{query}"),
        None => cleaned,
    };

    let mut parts = req.uri().clone().into_parts();
    if let Ok(path_and_query) = path_and_query.parse::<PathAndQuery>() {
        parts.path_and_query = Some(path_and_query);
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
    }

    req
}

fn normalize_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
