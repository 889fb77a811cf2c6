use axum::{Json, Router, http::StatusCode, routing::post};
use log::{info, warn};
use std::net::SocketAddr;

use crate::data::{SchedulingInput, SchedulingOutput};
use crate::solver;

async fn solve_handler(
    Json(input): Json<SchedulingInput>,
) -> Result<Json<SchedulingOutput>, (StatusCode, String)> {
    if let Err(e) = input.validate() {
        warn!("Rejected solve request: {}", e);
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }
    let result = solver::solve(&input.courses, &input.rooms);
    Ok(Json(SchedulingOutput::from(&result)))
}

pub fn router() -> Router {
    Router::new().route("/v1/rooms/solve", post(solve_handler))
}

pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
