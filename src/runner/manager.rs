use std::collections::BTreeSet;

use crate::animation::action::Action;
use crate::foundation::core::{Tag, TargetId};
use crate::foundation::error::{ActionError, ActionResult};
use crate::scene::target::Targets;

/// Clock-side options applied to every tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ManagerOpts {
    /// Multiplier applied to every `dt` before it reaches the actions.
    pub time_scale: f64,
    /// Upper bound for a single (scaled) tick, if set.
    pub max_step: Option<f64>,
}

impl Default for ManagerOpts {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_step: None,
        }
    }
}

impl ManagerOpts {
    pub fn validate(&self) -> ActionResult<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ActionError::validation(format!(
                "time_scale must be finite and >= 0 (got {})",
                self.time_scale
            )));
        }
        match self.max_step {
            Some(max) if !max.is_finite() || max <= 0.0 => Err(ActionError::validation(format!(
                "max_step must be finite and > 0 (got {max})"
            ))),
            _ => Ok(()),
        }
    }

    fn effective_dt(&self, dt: f64) -> ActionResult<f64> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ActionError::validation(format!(
                "tick dt must be finite and >= 0 (got {dt})"
            )));
        }
        let scaled = dt * self.time_scale;
        Ok(match self.max_step {
            Some(max) => scaled.min(max),
            None => scaled,
        })
    }
}

/// Handle of an action registered with an [`ActionManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u64);

#[derive(Debug)]
struct Entry {
    id: ActionId,
    target: TargetId,
    action: Action,
}

/// Reference driver for running actions.
///
/// Actions tick in the order they were added. Pausing a target withholds ticks from its actions;
/// their elapsed time resumes where it stopped.
#[derive(Debug, Default)]
pub struct ActionManager {
    opts: ManagerOpts,
    entries: Vec<Entry>,
    paused: BTreeSet<TargetId>,
    next_id: u64,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opts(opts: ManagerOpts) -> ActionResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            ..Self::default()
        })
    }

    pub fn opts(&self) -> ManagerOpts {
        self.opts
    }

    /// Start `action` on `target` and register it.
    pub fn add(
        &mut self,
        action: impl Into<Action>,
        target: TargetId,
        targets: &mut dyn Targets,
    ) -> ActionResult<ActionId> {
        let mut action = action.into();
        action.start(targets, target)?;

        let id = ActionId(self.next_id);
        self.next_id += 1;
        tracing::debug!(action = action.name(), %target, id = id.0, "action added");
        self.entries.push(Entry { id, target, action });
        Ok(id)
    }

    /// Advance every running action on a non-paused target by one tick.
    ///
    /// Finished actions are stopped and removed in the same call.
    ///
    /// A failing action is stopped and dropped without holding up the others. Actions whose target
    /// has vanished are dropped with a warning; any other failure is returned once every entry has
    /// been ticked.
    #[tracing::instrument(level = "trace", skip(self, targets))]
    pub fn update(&mut self, dt: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        let dt = self.opts.effective_dt(dt)?;

        let mut finished = Vec::new();
        let mut failed = Vec::new();
        let mut first_err = None;
        for entry in &mut self.entries {
            if self.paused.contains(&entry.target) {
                continue;
            }
            match entry.action.update(dt, targets) {
                Ok(()) if entry.action.is_done() => finished.push(entry.id),
                Ok(()) => {}
                Err(ActionError::UnknownTarget(missing)) => {
                    tracing::warn!(action = entry.action.name(), target = %missing, id = entry.id.0, "target vanished; dropping action");
                    failed.push(entry.id);
                }
                Err(err) => {
                    tracing::warn!(action = entry.action.name(), id = entry.id.0, error = %err, "action failed; dropping it");
                    failed.push(entry.id);
                    first_err.get_or_insert(err);
                }
            }
        }

        for id in failed {
            if let Some(mut entry) = self.take(id) {
                if let Err(err) = entry.action.stop(targets) {
                    tracing::debug!(id = id.0, error = %err, "stop of failed action also failed");
                }
            }
        }
        for id in finished {
            if let Some(mut entry) = self.take(id) {
                if let Err(err) = entry.action.stop(targets) {
                    first_err.get_or_insert(err);
                    continue;
                }
                tracing::debug!(action = entry.action.name(), target = %entry.target, id = id.0, "action finished");
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn pause_target(&mut self, target: TargetId) {
        self.paused.insert(target);
    }

    pub fn resume_target(&mut self, target: TargetId) {
        self.paused.remove(&target);
    }

    pub fn is_paused(&self, target: TargetId) -> bool {
        self.paused.contains(&target)
    }

    /// Returns `false` when `id` is not running.
    pub fn stop_action(&mut self, id: ActionId, targets: &mut dyn Targets) -> ActionResult<bool> {
        let Some(mut entry) = self.take(id) else {
            return Ok(false);
        };
        entry.action.stop(targets)?;
        tracing::debug!(action = entry.action.name(), id = id.0, "action stopped");
        Ok(true)
    }

    /// Stop the oldest action on `target` carrying `tag`.
    pub fn stop_by_tag(
        &mut self,
        target: TargetId,
        tag: Tag,
        targets: &mut dyn Targets,
    ) -> ActionResult<bool> {
        let found = self
            .entries
            .iter()
            .find(|e| e.target == target && e.action.tag() == Some(tag))
            .map(|e| e.id);
        match found {
            Some(id) => self.stop_action(id, targets),
            None => Ok(false),
        }
    }

    /// Stop every action on `target`; returns how many were stopped.
    pub fn stop_all_for(
        &mut self,
        target: TargetId,
        targets: &mut dyn Targets,
    ) -> ActionResult<usize> {
        let ids: Vec<ActionId> = self
            .entries
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.id)
            .collect();
        for id in &ids {
            self.stop_action(*id, targets)?;
        }
        Ok(ids.len())
    }

    pub fn stop_all(&mut self, targets: &mut dyn Targets) -> ActionResult<usize> {
        let entries = std::mem::take(&mut self.entries);
        let n = entries.len();
        for mut entry in entries {
            entry.action.stop(targets)?;
        }
        tracing::debug!(count = n, "all actions stopped");
        Ok(n)
    }

    pub fn get_by_tag(&self, target: TargetId, tag: Tag) -> Option<&Action> {
        self.entries
            .iter()
            .find(|e| e.target == target && e.action.tag() == Some(tag))
            .map(|e| &e.action)
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.action)
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.action)
    }

    /// Number of running actions on `target`.
    pub fn running_on(&self, target: TargetId) -> usize {
        self.entries.iter().filter(|e| e.target == target).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take(&mut self, id: ActionId) -> Option<Entry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runner/manager.rs"]
mod tests;
