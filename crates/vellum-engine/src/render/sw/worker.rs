use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};

use crate::render::RenderData;

use super::{Framebuffer, raster};

/// One recorded frame waiting to be composited.
pub(crate) struct Job {
    pub shapes: Vec<RenderData>,
}

/// Dedicated rasterization thread.
///
/// Jobs are processed in submission order; each finished job sends one
/// completion message. Dropping the worker closes the job queue and joins the
/// thread after it drains.
pub(crate) struct Worker {
    jobs: Option<Sender<Job>>,
    done: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(target: Arc<Mutex<Framebuffer>>) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("vellum-sw-raster".into())
            .spawn(move || {
                for job in job_rx {
                    match target.lock() {
                        Ok(mut fb) => raster::rasterize(&mut fb, &job.shapes),
                        Err(_) => {
                            log::error!("software target mutex poisoned; raster worker stopping");
                            break;
                        }
                    }
                    if done_tx.send(()).is_err() {
                        break;
                    }
                }
                log::debug!("raster worker exiting");
            })
            .context("failed to spawn raster worker thread")?;

        Ok(Self {
            jobs: Some(job_tx),
            done: done_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, job: Job) -> Result<()> {
        let jobs = self.jobs.as_ref().context("raster worker is shutting down")?;
        jobs.send(job).map_err(|_| anyhow!("raster worker has stopped"))
    }

    /// Blocks until the oldest outstanding job has finished.
    pub fn wait(&self) -> Result<()> {
        self.done
            .recv()
            .map_err(|_| anyhow!("raster worker stopped before finishing the frame"))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("raster worker panicked");
            }
        }
    }
}
