use std::fmt::Debug;

use rand::{rngs::StdRng, SeedableRng};

use crate::time::SimTime;

use super::{Application, EventQueue, Profiler, RunLimit, Runtime, State};

/// A builder for a runtime instance.
#[must_use]
pub struct Builder {
    pub(super) quiet: bool,
    pub(super) rng: StdRng,
    pub(super) limit: RunLimit,
    pub(super) start_time: SimTime,
}

impl Builder {
    /// Creates a new unconfigured builder with an entropy-seeded RNG.
    pub fn new() -> Builder {
        Builder {
            quiet: false,
            rng: StdRng::from_entropy(),
            limit: RunLimit::None,
            start_time: SimTime::MIN,
        }
    }

    /// Creates a `Builder` with a statically seeded RNG, for fully
    /// reproducible runs.
    pub fn seeded(seed: u64) -> Builder {
        Builder {
            quiet: false,
            rng: StdRng::seed_from_u64(seed),
            limit: RunLimit::None,
            start_time: SimTime::MIN,
        }
    }

    ///
    /// Suppresses runtime messages from the simulation framework.
    ///
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    ///
    /// Changes the simulation time the runtime starts at (default: [`SimTime::MIN`]).
    ///
    pub fn start_time(mut self, time: SimTime) -> Self {
        self.start_time = time;
        self
    }

    ///
    /// Bounds the number of dispatched events.
    ///
    pub fn max_itr(mut self, max_itr: usize) -> Self {
        self.limit.add(RunLimit::EventCount(max_itr));
        self
    }

    ///
    /// Bounds the simulation time of the runtime (default: unbounded).
    ///
    pub fn max_time(mut self, max_time: SimTime) -> Self {
        self.limit.add(RunLimit::SimTime(max_time));
        self
    }

    ///
    /// Adds a custom limit to the end of the runtime, combined with any
    /// `max_itr` and `max_time` options via logical OR.
    ///
    pub fn limit(mut self, limit: RunLimit) -> Self {
        self.limit.add(limit);
        self
    }

    ///
    /// Builds a new [`Runtime`] instance around the given application.
    ///
    /// # Examples
    ///
    /// ```
    /// use linksim::prelude::*;
    ///
    /// #[derive(Debug)]
    /// struct App(usize, String);
    /// # impl Application for App {
    /// #   type EventSet = ();
    /// #   type Lifecycle = ();
    /// # }
    ///
    /// let app = App(42, String::from("Hello there!"));
    /// let rt = Builder::seeded(123).quiet().build(app);
    /// ```
    pub fn build<A: Application>(self, app: A) -> Runtime<A> {
        Runtime {
            app,

            state: State::Idle,
            time: self.start_time,

            limit: self.limit,

            scheduled: 0,
            itr: 0,

            quiet: self.quiet,
            profiler: Profiler::default(),
            rng: self.rng,

            queue: EventQueue::new(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("limit", &self.limit)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}
