//! REST surface exposed to the slicer UI.
//!
//! ```text
//! GET    /ui                          → static HTML page
//! GET    /health                      → GET    /api/health
//! GET    /status                      → GET    /api/slice/status
//! GET    /profiles/{category}         → GET    /api/profiles/{category}
//! POST   /profiles/{category}         → POST   /api/profiles/{category}
//! GET    /profiles/{category}/{name}  → GET    /api/profiles/{category}/{name}
//! DELETE /profiles/{category}/{name}  → DELETE /api/profiles/{category}/{name}
//! POST   /profiles/{category}/{name}  → PATCH (JSON body) or PUT (anything else)
//! POST   /slice                       → POST   /api/slice, G-code saved locally
//! ```

pub mod category;
pub mod profiles;
pub mod slice;
pub mod status;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::AppState;

pub use category::ProfileCategory;

/// Routes relative to the API prefix. `/ui` exists only when the page does.
pub fn setup_api_router(with_ui: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::slice_status))
        .route(
            "/profiles/{category}",
            get(profiles::list_profiles).post(profiles::upload_profile),
        )
        .route(
            "/profiles/{category}/{*name}",
            get(profiles::get_profile)
                .delete(profiles::delete_profile)
                .post(profiles::update_profile),
        )
        .route("/slice", post(slice::slice));

    if with_ui {
        router.route("/ui", get(ui::serve_ui))
    } else {
        router
    }
}
