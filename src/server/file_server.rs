//! Static file server used by self-serve uploads
//!
//! The board downloads the sketch itself, so the directory holding it is
//! published over plain HTTP for the rest of the process lifetime.

use std::net::SocketAddr;
use std::path::Path;
use tokio::task::JoinHandle;
use warp::Filter;

use crate::errors::{OtaError, Result};

/// Handle of a running sketch server
#[derive(Debug)]
pub struct SketchServer {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl SketchServer {
    /// Bind to `bind_addr` and serve `directory` from a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(directory: &Path, bind_addr: SocketAddr) -> Result<Self> {
        if !directory.is_dir() {
            return Err(OtaError::FileServer(format!(
                "{} is not a directory",
                directory.display()
            )));
        }

        let routes = warp::get()
            .and(warp::fs::dir(directory.to_path_buf()))
            .with(super::middleware::logging::with_download_logging());

        let (local_addr, server) = warp::serve(routes)
            .try_bind_ephemeral(bind_addr)
            .map_err(|e| OtaError::FileServer(format!("Failed to bind {}: {}", bind_addr, e)))?;

        log::info!("Serving {} on {}", directory.display(), local_addr);
        let task = tokio::spawn(server);

        Ok(Self {
            local_addr,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Leave the server running until the process exits
    pub fn detach(self) {
        log::debug!("Sketch server on {} left running", self.local_addr);
    }

    pub fn stop(self) {
        self.task.abort();
    }
}
