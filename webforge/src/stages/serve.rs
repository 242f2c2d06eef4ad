//! Dev server stage: static file serving of the output directory.

use super::{Stage, StageContext};
use crate::core::StageOutput;
use crate::errors::WebforgeError;
use async_trait::async_trait;
use axum::Router;
use std::net::SocketAddr;
use tower_http::services::ServeDir;

/// Name of the dev server stage.
pub const STAGE_NAME: &str = "serve";

/// Serves the output directory over HTTP on the fixed local port.
///
/// Runs in-process rather than shelling out to a file server binary, so
/// startup failures (port in use, missing output directory) are checked
/// before serving begins. Once serving, the stage blocks until the
/// process is externally terminated; it never writes to the filesystem.
#[derive(Debug, Default)]
pub struct DevServerStage;

impl DevServerStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for DevServerStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let config = ctx.config();
        let out_dir = config.out_dir_path();

        let populated = std::fs::read_dir(&out_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !populated {
            return StageOutput::fail(
                WebforgeError::ServerStart(format!(
                    "output directory {} is missing or empty",
                    out_dir.display()
                ))
                .to_string(),
            );
        }

        let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                return StageOutput::fail(
                    WebforgeError::ServerStart(format!("cannot bind {addr}: {e}")).to_string(),
                );
            }
        };

        let app = Router::new().fallback_service(ServeDir::new(&out_dir));

        tracing::info!(
            dir = %out_dir.display(),
            url = %format!("http://127.0.0.1:{}/{}.js", config.port, config.out_name),
            "dev server listening"
        );

        // Blocks until the process is externally terminated.
        if let Err(e) = axum::serve(listener, app).await {
            return StageOutput::fail(
                WebforgeError::ServerStart(format!("server error: {e}")).to_string(),
            );
        }

        StageOutput::ok_empty()
    }
}
