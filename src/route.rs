use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handler::*,
    middleware::{mw_require_admin, mw_require_auth},
    AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/admin/todos", get(admin_get_todos))
        .route("/admin/todos/:id", delete(admin_delete_todo))
        .route_layer(from_fn(mw_require_admin));

    // Configure CORS settings for the application
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(read_all_todos))
        .route("/todo", post(create_todo))
        .route(
            "/todo/:id",
            get(get_todo_by_id).put(update_todo).delete(delete_todo),
        )
        .route("/users/me", get(get_user))
        .route("/users/change-password", put(change_password))
        .route("/users/phone-number", put(update_phone_number))
        .merge(admin_routes)
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/auth/", post(create_user))
        .route("/auth/token", post(login_for_access_token))
        .route("/healthy", get(health_check))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    app
}
