//! Progression coordinator — turns a completed session into a scene
//! transition.
//!
//! On completion the coordinator waits the configured delay, then asks
//! the environment's `SceneRouter` for the next level. An unresolvable
//! destination falls back to the designated default; if the fallback
//! also fails, the error is fatal to the session and surfaced to the
//! operator rather than swallowed.

use thiserror::Error;
use tracing::warn;

use crate::scheduler::{Scheduler, TimerId};

/// Errors from the completion/transition path. Everything here is fatal
/// to the session.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("neither \"{requested}\" nor fallback \"{fallback}\" could be resolved")]
    Unroutable { requested: String, fallback: String },
}

/// The environment's scene-loading seam. Out of scope for this engine;
/// injected at construction so sessions never reach for global state.
pub trait SceneRouter: Send {
    /// True if the environment can load the named scene.
    fn can_resolve(&mut self, scene: &str) -> bool;
}

/// A router backed by a fixed list of known scenes.
#[derive(Debug, Default)]
pub struct StaticSceneRouter {
    known: Vec<String>,
    permissive: bool,
}

impl StaticSceneRouter {
    pub fn new(known: Vec<String>) -> Self {
        Self {
            known,
            permissive: false,
        }
    }

    /// A router that resolves every scene. Default for standalone runs.
    pub fn permissive() -> Self {
        Self {
            known: Vec::new(),
            permissive: true,
        }
    }
}

impl SceneRouter for StaticSceneRouter {
    fn can_resolve(&mut self, scene: &str) -> bool {
        self.permissive || self.known.iter().any(|s| s == scene)
    }
}

/// Owns the post-completion transition for one level session.
#[derive(Debug)]
pub struct ProgressionCoordinator {
    next_scene: String,
    fallback_scene: String,
    delay_secs: f32,
    transition_timer: Option<TimerId>,
    transition_requested: bool,
}

impl ProgressionCoordinator {
    pub fn new(next_scene: String, fallback_scene: String, delay_secs: f32) -> Self {
        Self {
            next_scene,
            fallback_scene,
            delay_secs,
            transition_timer: None,
            transition_requested: false,
        }
    }

    /// Schedule the delayed transition. Called once from the completion
    /// path; repeated calls (force-complete racing the natural path is
    /// already excluded by the tracker claim) are no-ops.
    pub fn on_completed(&mut self, scheduler: &mut Scheduler, now: u64) -> Option<TimerId> {
        if self.transition_timer.is_some() || self.transition_requested {
            return None;
        }
        let id = scheduler.after(now, self.delay_secs);
        self.transition_timer = Some(id);
        Some(id)
    }

    /// Resolve the destination when the delay timer fires. Exactly one
    /// transition request is issued per completed session.
    pub fn fire_transition(
        &mut self,
        router: &mut dyn SceneRouter,
    ) -> Result<String, TransitionError> {
        debug_assert!(
            !self.transition_requested,
            "transition fired twice for one session"
        );
        self.transition_timer = None;
        self.transition_requested = true;

        if router.can_resolve(&self.next_scene) {
            return Ok(self.next_scene.clone());
        }
        warn!(
            requested = %self.next_scene,
            fallback = %self.fallback_scene,
            "next scene unresolvable, using fallback destination"
        );
        if router.can_resolve(&self.fallback_scene) {
            return Ok(self.fallback_scene.clone());
        }
        Err(TransitionError::Unroutable {
            requested: self.next_scene.clone(),
            fallback: self.fallback_scene.clone(),
        })
    }

    pub fn transition_requested(&self) -> bool {
        self.transition_requested
    }
}
