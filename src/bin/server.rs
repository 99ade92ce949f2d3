use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use slab_cutter::job::Job;
use slab_cutter::report::Report;
use slab_cutter::solver::Solver;
use slab_cutter::types::{Placement, Rect};
use slab_cutter::PackError;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
struct OptimizeResponse {
    job_name: String,
    material: String,
    usable: Rect,
    sheets: Vec<SheetResponse>,
    report: Report,
}

#[derive(Serialize)]
struct SheetResponse {
    placements: Vec<PlacementResponse>,
    waste_area: f64,
}

#[derive(Serialize)]
struct PlacementResponse {
    label: String,
    #[serde(flatten)]
    placement: Placement,
}

fn status_for(err: &PackError) -> StatusCode {
    match err {
        PackError::InvalidConfiguration(_) | PackError::InvalidPiece { .. } => {
            StatusCode::BAD_REQUEST
        }
        PackError::PieceTooWide { .. } | PackError::PieceUnplaceable { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

async fn optimize(Json(job): Json<Job>) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&job).unwrap_or_default(),
        "POST /optimize"
    );

    if job.pieces.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no pieces to cut".to_string()));
    }

    let sheet = job.sheet();
    let solution = Solver::new(sheet, job.settings, job.pieces)
        .solve()
        .map_err(|e| {
            tracing::warn!(error = %e, "optimize failed");
            (status_for(&e), e.to_string())
        })?;
    let report = Report::new(&solution);

    let response = OptimizeResponse {
        job_name: job.job_name,
        material: job.material,
        usable: sheet.usable(),
        sheets: solution
            .sheets
            .into_iter()
            .map(|s| SheetResponse {
                placements: s
                    .placements
                    .into_iter()
                    .map(|p| PlacementResponse {
                        label: p.id.to_string(),
                        placement: p,
                    })
                    .collect(),
                waste_area: s.waste_area,
            })
            .collect(),
        report,
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Reports panics only; rejected jobs are client errors and go to the log.
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await
}
