use axum::{Json, extract::State, response::IntoResponse};

use forum_types::api::Envelope;

use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(Envelope::success(
        "Forum statistics",
        state.engine.stats(state.stats_top_n),
    ))
}
