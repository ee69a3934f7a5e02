//! The `Chronometer` state machine and its lap accounting.

use crate::common::SortOrder;
use crate::format;
use crate::time::{SystemClock, TimeSource};
use chrono::{DateTime, Utc};
use std::ops::Index;
use std::time::Duration;
use tracing::{debug, trace};

/// The lifecycle state of a `Chronometer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    Idle,
    Started,
    Paused,
    Stopped,
}

/// A request to move a chronometer to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Resume,
    Pause,
    Stop,
}

impl State {
    /// The transition table. `None` means the command is a no-op in this state.
    pub(crate) fn next(self, command: Command) -> Option<State> {
        match (self, command) {
            (State::Idle | State::Paused, Command::Start | Command::Resume) => Some(State::Started),
            (State::Started, Command::Pause) => Some(State::Paused),
            (State::Started | State::Paused, Command::Stop) => Some(State::Stopped),
            _ => None,
        }
    }
}

/// The outcome of a state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// The chronometer changed state.
    Applied,
    /// The call was not valid in the current state and nothing changed.
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

impl From<Transition> for bool {
    fn from(transition: Transition) -> Self {
        transition.is_applied()
    }
}

#[derive(Debug)]
struct Lap<S: TimeSource> {
    label: String,
    snapshot: Chronometer<S>,
}

/// A stopwatch with pause/resume and lap recording.
///
/// Readings are fractional seconds. Transitions that are not valid for the
/// current state are silently ignored and reported through the return value.
///
/// Cloning copies the timing state but never the recorded laps.
#[derive(Debug)]
pub struct Chronometer<S: TimeSource = SystemClock> {
    source: S,
    state: State,
    start_time: f64,
    run_time: f64,
    total_time: f64,
    last_lap_mark: f64,
    laps: Vec<Lap<S>>,
}

impl Chronometer<SystemClock> {
    /// Creates an idle chronometer reading the host clock.
    pub fn new(high_resolution: bool) -> Self {
        Self::with_source(SystemClock::new(high_resolution))
    }
}

impl Default for Chronometer<SystemClock> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<S: TimeSource> Clone for Chronometer<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state,
            start_time: self.start_time,
            run_time: self.run_time,
            total_time: self.total_time,
            last_lap_mark: 0.0,
            laps: Vec::new(),
        }
    }
}

impl<S: TimeSource> Chronometer<S> {
    /// Creates an idle chronometer reading from `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            state: State::Idle,
            start_time: 0.0,
            run_time: 0.0,
            total_time: 0.0,
            last_lap_mark: 0.0,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Starts the chronometer, or resumes it when paused.
    pub fn start(&mut self) -> Transition {
        self.apply(Command::Start)
    }

    /// Resumes a paused chronometer, or starts an idle one.
    pub fn resume(&mut self) -> Transition {
        self.apply(Command::Resume)
    }

    /// Pauses a running chronometer and returns the reading.
    ///
    /// Outside `Started` this only returns the current reading.
    pub fn pause(&mut self) -> f64 {
        let _ = self.apply(Command::Pause);
        self.read()
    }

    /// Stops the chronometer for good and returns the frozen reading.
    ///
    /// A running chronometer is paused first. An idle chronometer has never
    /// run and is left idle. Once stopped, every reading stays the same and
    /// all transitions are ignored.
    pub fn stop(&mut self) -> f64 {
        if self.state == State::Started {
            let _ = self.apply(Command::Pause);
        }
        let _ = self.apply(Command::Stop);
        self.read()
    }

    /// Elapsed seconds: live while running, frozen otherwise.
    pub fn read(&self) -> f64 {
        match self.state {
            State::Started => self.since_start() + self.run_time,
            _ => self.run_time,
        }
    }

    /// The total frozen at stop, or the live reading before that.
    pub fn read_total_time(&self) -> f64 {
        match self.state {
            State::Stopped => self.total_time,
            _ => self.read(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.read().max(0.0))
    }

    pub fn total_elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.read_total_time().max(0.0))
    }

    /// The reading formatted as `HH:MM:SS.ffffff`.
    pub fn read_time_string(&self) -> String {
        format::format_elapsed(self.read())
    }

    pub fn read_total_time_string(&self) -> String {
        format::format_elapsed(self.read_total_time())
    }

    pub fn read_duration(&self) -> chrono::Duration {
        format::to_duration(self.read())
    }

    pub fn read_total_duration(&self) -> chrono::Duration {
        format::to_duration(self.read_total_time())
    }

    /// The current point in time according to this chronometer's source.
    ///
    /// For display only; elapsed readings never go through wall-clock time.
    pub fn now(&self) -> DateTime<Utc> {
        self.source.now()
    }

    /// Records a lap while running and returns its snapshot.
    ///
    /// The snapshot is a stopped chronometer holding the time since the
    /// previous lap, or since the start for the first one. Reusing a label
    /// replaces that lap in place. Returns `None` unless `Started`.
    pub fn add_lap_time(&mut self, label: impl Into<String>) -> Option<&Chronometer<S>> {
        if self.state != State::Started {
            trace!(state = ?self.state, "lap ignored");
            return None;
        }
        let label = label.into();

        let mut snapshot = self.clone();
        let cumulative = snapshot.stop();
        snapshot.run_time = (cumulative - self.last_lap_mark).max(0.0);
        snapshot.total_time = snapshot.run_time;
        self.last_lap_mark = cumulative;

        debug!(label = %label, lap = snapshot.run_time, cumulative, "lap recorded");

        let index = match self.laps.iter().position(|lap| lap.label == label) {
            Some(index) => {
                self.laps[index].snapshot = snapshot;
                index
            }
            None => {
                self.laps.push(Lap { label, snapshot });
                self.laps.len() - 1
            }
        };
        Some(&self.laps[index].snapshot)
    }

    /// Enumerates recorded laps as `(label, snapshot)` pairs.
    pub fn entries(&self, order: SortOrder) -> Entries<'_, S> {
        Entries {
            inner: self.laps.iter(),
            order,
        }
    }

    pub fn has_lap(&self, label: &str) -> bool {
        self.laps.iter().any(|lap| lap.label == label)
    }

    pub fn lap(&self, label: &str) -> Option<&Chronometer<S>> {
        self.laps
            .iter()
            .find(|lap| lap.label == label)
            .map(|lap| &lap.snapshot)
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    #[doc(hidden)]
    fn since_start(&self) -> f64 {
        (self.source.seconds() - self.start_time).max(0.0)
    }

    #[doc(hidden)]
    fn apply(&mut self, command: Command) -> Transition {
        let Some(next) = self.state.next(command) else {
            trace!(state = ?self.state, ?command, "transition ignored");
            return Transition::Ignored;
        };

        if self.state == State::Started && next != State::Started {
            self.run_time += self.since_start();
        }
        if next == State::Started {
            self.start_time = self.source.seconds();
        }
        if next == State::Stopped {
            self.total_time = self.run_time;
        }

        debug!(from = ?self.state, to = ?next, run_time = self.run_time, "transition applied");
        self.state = next;
        Transition::Applied
    }
}

impl<S: TimeSource> Index<&str> for Chronometer<S> {
    type Output = Chronometer<S>;

    /// Panics when no lap carries `label`.
    fn index(&self, label: &str) -> &Self::Output {
        match self.lap(label) {
            Some(lap) => lap,
            None => panic!("no lap labelled {label:?}"),
        }
    }
}

/// Iterator over recorded laps, produced by [`Chronometer::entries`].
#[derive(Debug, Clone)]
pub struct Entries<'a, S: TimeSource> {
    inner: std::slice::Iter<'a, Lap<S>>,
    order: SortOrder,
}

impl<'a, S: TimeSource> Iterator for Entries<'a, S> {
    type Item = (&'a str, &'a Chronometer<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let lap = match self.order {
            SortOrder::Ascending => self.inner.next(),
            SortOrder::Descending => self.inner.next_back(),
        }?;
        Some((lap.label.as_str(), &lap.snapshot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: TimeSource> ExactSizeIterator for Entries<'_, S> {}
