//! A keyed registry of chronometers.
//!
//! Each key maps to exactly one chronometer for the registry's whole
//! lifetime: registering a key twice is an error and entries are never
//! removed. The registry is an ordinary owned value; pass it to whatever
//! needs it.

use crate::chronometer::{Chronometer, Transition};
use crate::common::TaskId;
use crate::config::TaskDefaults;
use crate::error::RegistryError;
use crate::time::{SystemClock, TimeSource};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{info, warn};

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Maps caller-chosen task keys to chronometers.
#[derive(Debug)]
pub struct TaskRegistry<K, S: TimeSource = SystemClock> {
    defaults: TaskDefaults,
    tasks: SlotMap<TaskId, Chronometer<S>>,
    index: HashMap<K, TaskId>,
}

impl<K: Eq + Hash + Debug> TaskRegistry<K, SystemClock> {
    /// Creates a task with the registry's default flags.
    pub fn create_task(&mut self, key: K) -> Result<&mut Chronometer> {
        let TaskDefaults {
            high_resolution,
            auto_start,
        } = self.defaults;
        self.create_task_with(key, high_resolution, auto_start)
    }

    /// Creates a task on the host clock, optionally starting it right away.
    pub fn create_task_with(
        &mut self,
        key: K,
        high_resolution: bool,
        auto_start: bool,
    ) -> Result<&mut Chronometer> {
        let mut chrono = Chronometer::new(high_resolution);
        if auto_start {
            let _ = chrono.start();
        }
        self.register(key, chrono)
    }
}

impl<K: Eq + Hash + Debug, S: TimeSource> TaskRegistry<K, S> {
    pub fn new() -> Self {
        Self::with_defaults(TaskDefaults::default())
    }

    pub fn with_defaults(defaults: TaskDefaults) -> Self {
        Self {
            defaults,
            tasks: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }

    pub fn defaults(&self) -> TaskDefaults {
        self.defaults
    }

    /// Registers an existing chronometer under `key`.
    pub fn register(&mut self, key: K, chrono: Chronometer<S>) -> Result<&mut Chronometer<S>> {
        if self.index.contains_key(&key) {
            warn!(task = ?key, "task already created");
            return Err(RegistryError::duplicate(&key));
        }
        info!(task = ?key, state = ?chrono.state(), "task created");
        let id = self.tasks.insert(chrono);
        self.index.insert(key, id);
        Ok(&mut self.tasks[id])
    }

    pub fn get_task(&self, key: &K) -> Result<&Chronometer<S>> {
        self.id_of(key).map(|id| &self.tasks[id])
    }

    pub fn get_task_mut(&mut self, key: &K) -> Result<&mut Chronometer<S>> {
        let id = self.id_of(key)?;
        Ok(&mut self.tasks[id])
    }

    /// Records a lap on the task and returns the new lap snapshot.
    ///
    /// Unlike a plain stopwatch that hands itself back when no lap can be
    /// taken, this yields `Ok(None)` when the task is not `Started`; the task
    /// itself is still reachable through `get_task`.
    pub fn add_lap_time(
        &mut self,
        key: &K,
        label: impl Into<String>,
    ) -> Result<Option<&Chronometer<S>>> {
        Ok(self.get_task_mut(key)?.add_lap_time(label))
    }

    pub fn read_task(&self, key: &K) -> Result<f64> {
        Ok(self.get_task(key)?.read())
    }

    pub fn read_total_task(&self, key: &K) -> Result<f64> {
        Ok(self.get_task(key)?.read_total_time())
    }

    /// Pauses the task and returns its reading.
    pub fn pause_task(&mut self, key: &K) -> Result<f64> {
        Ok(self.get_task_mut(key)?.pause())
    }

    pub fn resume_task(&mut self, key: &K) -> Result<Transition> {
        Ok(self.get_task_mut(key)?.resume())
    }

    pub fn stop_task(&mut self, key: &K) -> Result<f64> {
        Ok(self.get_task_mut(key)?.stop())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over `(key, chronometer)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Chronometer<S>)> {
        let mut keyed: Vec<_> = self.index.iter().collect();
        keyed.sort_by_key(|(_, id)| **id);
        keyed.into_iter().map(|(key, id)| (key, &self.tasks[*id]))
    }

    #[doc(hidden)]
    fn id_of(&self, key: &K) -> Result<TaskId> {
        match self.index.get(key) {
            Some(id) => Ok(*id),
            None => {
                warn!(task = ?key, "unknown task");
                Err(RegistryError::unknown(key))
            }
        }
    }
}

impl<K: Eq + Hash + Debug, S: TimeSource> Default for TaskRegistry<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chronometer::State;
    use crate::time::ManualClock;
    use std::time::Duration;

    fn manual_registry() -> (ManualClock, TaskRegistry<&'static str, ManualClock>) {
        (ManualClock::new(), TaskRegistry::new())
    }

    #[test]
    fn test_create_task_auto_starts_by_default() {
        let mut registry: TaskRegistry<&str> = TaskRegistry::new();
        let chrono = registry.create_task("boot").map(|c| c.state());
        assert_eq!(chrono, Ok(State::Started));
        assert!(registry.contains(&"boot"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_task_with_flags() {
        let mut registry: TaskRegistry<u32> = TaskRegistry::new();
        let state = registry.create_task_with(7, false, false).map(|c| c.state());
        assert_eq!(state, Ok(State::Idle));
        let high = registry.get_task(&7).map(|c| c.source().is_high_resolution());
        assert_eq!(high, Ok(false));
    }

    #[test]
    fn test_defaults_drive_create_task() {
        let defaults = TaskDefaults {
            high_resolution: true,
            auto_start: false,
        };
        let mut registry: TaskRegistry<String> = TaskRegistry::with_defaults(defaults);
        let state = registry.create_task("idle".to_string()).map(|c| c.state());
        assert_eq!(state, Ok(State::Idle));
        assert_eq!(registry.defaults(), defaults);
    }

    #[test]
    fn test_duplicate_task_is_rejected() {
        let mut registry: TaskRegistry<&str> = TaskRegistry::new();
        assert!(registry.create_task("x").is_ok());
        let err = registry.create_task("x").map(|_| ()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTask {
                key: "\"x\"".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_task_is_rejected_everywhere() {
        let mut registry: TaskRegistry<&str> = TaskRegistry::new();
        let unknown = RegistryError::UnknownTask {
            key: "\"nonexistent\"".to_string(),
        };
        assert_eq!(registry.get_task(&"nonexistent").map(|_| ()), Err(unknown.clone()));
        assert_eq!(registry.read_task(&"nonexistent"), Err(unknown.clone()));
        assert_eq!(registry.read_total_task(&"nonexistent"), Err(unknown.clone()));
        assert_eq!(registry.pause_task(&"nonexistent"), Err(unknown.clone()));
        assert_eq!(registry.stop_task(&"nonexistent"), Err(unknown.clone()));
        assert_eq!(registry.resume_task(&"nonexistent"), Err(unknown.clone()));
        assert_eq!(
            registry.add_lap_time(&"nonexistent", "lap").map(|_| ()),
            Err(unknown)
        );
    }

    #[test]
    fn test_pass_throughs() {
        let (clock, mut registry) = manual_registry();
        let mut chrono = Chronometer::with_source(clock.clone());
        let _ = chrono.start();
        assert!(registry.register("job", chrono).is_ok());

        clock.advance(Duration::from_secs(2));
        assert_eq!(registry.read_task(&"job"), Ok(2.0));

        let lap = registry.add_lap_time(&"job", "half").map(|lap| lap.map(|l| l.read()));
        assert_eq!(lap, Ok(Some(2.0)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(registry.pause_task(&"job"), Ok(3.0));
        let lap = registry.add_lap_time(&"job", "paused").map(|lap| lap.is_some());
        assert_eq!(lap, Ok(false));

        clock.advance(Duration::from_secs(5));
        assert_eq!(registry.resume_task(&"job"), Ok(Transition::Applied));
        clock.advance(Duration::from_secs(1));
        assert_eq!(registry.read_total_task(&"job"), Ok(4.0));
        assert_eq!(registry.stop_task(&"job"), Ok(4.0));

        clock.advance(Duration::from_secs(9));
        assert_eq!(registry.read_task(&"job"), Ok(4.0));
        assert_eq!(registry.read_total_task(&"job"), Ok(4.0));
        let laps = registry.get_task(&"job").map(|c| c.lap_count());
        assert_eq!(laps, Ok(1));
    }

    #[test]
    fn test_lap_on_idle_task_keeps_task_reachable() {
        let (clock, mut registry) = manual_registry();
        assert!(registry
            .register("idle", Chronometer::with_source(clock.clone()))
            .is_ok());

        clock.advance(Duration::from_secs(3));
        let lap = registry.add_lap_time(&"idle", "never").map(|lap| lap.is_none());
        assert_eq!(lap, Ok(true));

        let task = registry.get_task(&"idle").map(|c| (c.state(), c.lap_count(), c.read()));
        assert_eq!(task, Ok((State::Idle, 0, 0.0)));
        assert_eq!(registry.stop_task(&"idle"), Ok(0.0));
        let state = registry.get_task(&"idle").map(|c| c.state());
        assert_eq!(state, Ok(State::Idle));
    }

    #[test]
    fn test_iter_follows_registration_order() {
        let (clock, mut registry) = manual_registry();
        for key in ["c", "a", "b"] {
            assert!(registry
                .register(key, Chronometer::with_source(clock.clone()))
                .is_ok());
        }
        let keys: Vec<_> = registry.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert!(!registry.is_empty());
    }
}
