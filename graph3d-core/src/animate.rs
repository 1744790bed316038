/// Operation queue and animator: time-sliced transform replay
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::matrix::{self, Mat4};
use crate::world::SharedWorld;

/// Status text published while no operation is animating.
pub const STATUS_IDLE: &str = "Complete.";

/// The kind of rigid transform an operation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Rotate,
    Scale,
    Translate,
}

/// A discrete, user-triggered transform request, replayed as `steps`
/// incremental matrix applications spread over `duration_ms` milliseconds.
/// Created by the input layer, consumed exactly once by the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub duration_ms: u32,
    pub steps: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rejected at the queue boundary, before an operation is enqueued.
#[derive(Debug, Error, PartialEq)]
pub enum OperationError {
    #[error("operation must have at least one step")]
    ZeroSteps,
    #[error("operation {axis} component is not finite: {value}")]
    NonFinite { axis: char, value: f64 },
    #[error("scale {axis} component must not be negative: {value}")]
    NegativeScale { axis: char, value: f64 },
    #[error("the animator has shut down")]
    QueueClosed,
}

impl Operation {
    pub fn rotate(duration_ms: u32, steps: u32, x: f64, y: f64, z: f64) -> Self {
        Self { kind: OpKind::Rotate, duration_ms, steps, x, y, z }
    }

    pub fn scale(duration_ms: u32, steps: u32, x: f64, y: f64, z: f64) -> Self {
        Self { kind: OpKind::Scale, duration_ms, steps, x, y, z }
    }

    pub fn translate(duration_ms: u32, steps: u32, x: f64, y: f64, z: f64) -> Self {
        Self { kind: OpKind::Translate, duration_ms, steps, x, y, z }
    }

    /// Queue-boundary validation. An animated scale cannot take the
    /// steps-th root of a negative factor, so those are rejected here;
    /// `matrix::scale` itself stays permissive.
    pub fn validate(&self) -> Result<(), OperationError> {
        if self.steps == 0 {
            return Err(OperationError::ZeroSteps);
        }
        for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
            if !value.is_finite() {
                return Err(OperationError::NonFinite { axis, value });
            }
            if self.kind == OpKind::Scale && value < 0.0 {
                return Err(OperationError::NegativeScale { axis, value });
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match self.kind {
            OpKind::Rotate => {
                format!("Rotation. X: {:.2} Y: {:.2} Z: {:.2}", self.x, self.y, self.z)
            }
            OpKind::Scale => {
                format!("Scale. X: {:.2} Y: {:.2} Z: {:.2}", self.x, self.y, self.z)
            }
            OpKind::Translate => {
                format!("Translate (move). X: {:.2} Y: {:.2} Z: {:.2}", self.x, self.y, self.z)
            }
        }
    }
}

/// Per-increment scale factor: the steps-th root, so that applying it
/// `steps` times lands exactly on the requested factor. An axis requested
/// as exactly 0 is unspecified and keeps factor 1.
fn per_axis_scale(factor: f64, steps: f64) -> f64 {
    if factor == 0.0 {
        1.0
    } else {
        factor.powf(1.0 / steps)
    }
}

/// Builds the per-increment delta matrix for one operation.
fn step_matrix(op: &Operation) -> Mat4 {
    let steps = f64::from(op.steps);
    let mut m = matrix::identity();
    match op.kind {
        OpKind::Rotate => {
            // Axes composed in X, then Y, then Z order; zero axes skipped.
            if op.x != 0.0 {
                m = matrix::multiply(&matrix::rotate_x(op.x / steps), &m);
            }
            if op.y != 0.0 {
                m = matrix::multiply(&matrix::rotate_y(op.y / steps), &m);
            }
            if op.z != 0.0 {
                m = matrix::multiply(&matrix::rotate_z(op.z / steps), &m);
            }
        }
        OpKind::Scale => {
            m = matrix::multiply(
                &matrix::scale(
                    per_axis_scale(op.x, steps),
                    per_axis_scale(op.y, steps),
                    per_axis_scale(op.z, steps),
                ),
                &m,
            );
        }
        OpKind::Translate => {
            m = matrix::multiply(
                &matrix::translate(op.x / steps, op.y / steps, op.z / steps),
                &m,
            );
        }
    }
    m
}

/// Owns the FIFO operation queue and the background worker that drains it.
///
/// The worker animates one operation at a time: it raises the busy gate,
/// publishes a status line, applies the per-increment matrix to every point
/// of every object once per time slice, then clears the gate and publishes
/// [`STATUS_IDLE`]. There is no cancellation; a dequeued operation runs to
/// completion.
pub struct Animator {
    tx: Sender<Operation>,
    busy: Arc<AtomicBool>,
    status: Arc<Mutex<String>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Animator {
    /// Starts the worker thread against the given world.
    pub fn spawn(world: SharedWorld) -> Self {
        let (tx, rx) = mpsc::channel::<Operation>();
        let busy = Arc::new(AtomicBool::new(false));
        let status = Arc::new(Mutex::new(STATUS_IDLE.to_string()));

        let worker_busy = Arc::clone(&busy);
        let worker_status = Arc::clone(&status);
        let worker = thread::spawn(move || {
            for op in rx {
                worker_busy.store(true, Ordering::SeqCst);
                set_status(&worker_status, op.describe());
                log::debug!("animating {:?}", op);

                let m = step_matrix(&op);
                let slice = Duration::from_millis(u64::from(op.duration_ms / op.steps));
                for _ in 0..op.steps {
                    thread::sleep(slice);
                    apply_increment(&world, &m);
                }

                log::debug!("completed {:?}", op);
                // gate first: once the status reads idle, is_busy() is false
                worker_busy.store(false, Ordering::SeqCst);
                set_status(&worker_status, STATUS_IDLE.to_string());
            }
        });

        Self {
            tx,
            busy,
            status,
            worker: Some(worker),
        }
    }

    /// Validates and enqueues an operation. The queue itself never rejects
    /// submissions made while busy; checking [`Animator::is_busy`] first is
    /// the input layer's job.
    pub fn submit(&self, op: Operation) -> Result<(), OperationError> {
        op.validate()?;
        self.tx.send(op).map_err(|_| OperationError::QueueClosed)
    }

    /// The busy gate: true while an operation is animating.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The current operation description, or [`STATUS_IDLE`] when idle.
    pub fn status(&self) -> String {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Closes the queue and waits for queued operations to finish.
    pub fn shutdown(self) {
        let Self { tx, worker, .. } = self;
        drop(tx);
        if let Some(handle) = worker {
            let _ = handle.join();
        }
    }
}

fn set_status(status: &Mutex<String>, text: String) {
    *status.lock().unwrap_or_else(PoisonError::into_inner) = text;
}

/// One increment: transform every point of every object, replacing each
/// object's point list under a narrow lock.
fn apply_increment(world: &SharedWorld, m: &Mat4) {
    for name in world.object_names() {
        let Some(points) = world.points(&name) else {
            continue;
        };
        let moved = points.iter().map(|p| matrix::apply(m, p)).collect();
        if let Err(e) = world.replace_points(&name, moved) {
            // Point counts cannot change here; log rather than poison the worker.
            log::error!("increment skipped for `{name}`: {e}");
        }
    }
}
