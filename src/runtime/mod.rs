//!
//! Central primitives for running a discrete event simulation.
//!

use rand::{
    distributions::{Distribution, Standard},
    rngs::StdRng,
    Rng,
};
use std::{
    fmt::{Debug, Display},
    mem,
};

use crate::error::{SchedulingError, SimError};
use crate::time::{Duration, SimTime};

mod builder;
pub use self::builder::*;

mod event;
pub use self::event::*;

mod limit;
pub use self::limit::*;

mod profile;
pub use self::profile::*;

mod queue;
pub use self::queue::EventHandle;
use self::queue::EventQueue;

///
/// The central management point for an instance of a discrete event
/// based simulation.
///
/// The runtime owns everything a run depends on: the logical clock, the
/// future event set, the random number generator and the application
/// state. Nothing is shared between runtimes, so independent simulations
/// can run concurrently within one process.
///
/// # Generic usage
///
/// For a fully custom simulation, provide an `app` type implementing
/// [`Application`]: a struct holding the global state, an event set enum
/// implementing [`EventSet`] and per-event types implementing [`Event`].
/// Build the runtime with [`Builder::build`] and drive it with
/// [`run`](Runtime::run).
///
/// # Usage with the network layer
///
/// For point-to-point network simulations, pass a
/// [`Sim`](crate::net::Sim) as the app parameter. It comes preconfigured
/// with the event set and lifecycle necessary to activate installed
/// applications and deliver messages.
///
pub struct Runtime<App>
where
    App: Application,
{
    /// The contained runtime application, defining globals and the used event set.
    pub app: App,

    state: State,
    time: SimTime,

    limit: RunLimit,

    scheduled: usize,
    itr: usize,

    quiet: bool,
    profiler: Profiler,
    rng: StdRng,

    queue: EventQueue<App::EventSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Stopped,
}

impl<A> Runtime<A>
where
    A: Application,
{
    ///
    /// Returns the number of events that were scheduled on this [`Runtime`] instance.
    ///
    #[inline]
    #[must_use]
    pub fn num_events_scheduled(&self) -> usize {
        self.scheduled
    }

    ///
    /// Returns the number of events that were received & handled on this
    /// [`Runtime`] instance.
    ///
    #[must_use]
    pub fn num_events_dispatched(&self) -> usize {
        self.itr
    }

    ///
    /// Returns the number of events currently pending in the future event set.
    ///
    #[must_use]
    pub fn num_events_pending(&self) -> usize {
        self.queue.len()
    }

    ///
    /// Returns the current simulation time.
    ///
    #[must_use]
    pub fn sim_time(&self) -> SimTime {
        self.time
    }

    ///
    /// Generates a random instance of type T with a `Standard` distribution,
    /// using the runtime-owned (and thus seedable) generator.
    ///
    pub fn random<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
    {
        self.rng.gen()
    }

    ///
    /// Generates a random instance of type T with a distribution of type D.
    ///
    pub fn rng_sample<T, D>(&mut self, distr: D) -> T
    where
        D: Distribution<T>,
    {
        self.rng.sample(distr)
    }
}

impl<A> Runtime<A>
where
    A: Application,
{
    /// Runs the application until its event queue drains, a configured
    /// limit applies, or a lifecycle hook fails.
    ///
    /// A runtime that was already stopped (a finished run, or
    /// [`destroy`](Runtime::destroy)) treats `run` as a no-op and returns
    /// the existing profile.
    ///
    /// ### Examples
    ///
    /// ```
    /// use linksim::prelude::*;
    ///
    /// struct MyApp;
    /// impl Application for MyApp {
    ///     type EventSet = MyEventSet;
    ///     type Lifecycle = ();
    /// }
    ///
    /// #[derive(Debug)]
    /// enum MyEventSet {
    ///     EventA,
    ///     EventB,
    /// }
    /// impl EventSet<MyApp> for MyEventSet {
    ///     fn handle(self, rt: &mut Runtime<MyApp>) {
    ///         let _ = (self, rt.sim_time());
    ///     }
    /// }
    ///
    /// let mut rt = Builder::new().quiet().build(MyApp);
    /// rt.add_event(MyEventSet::EventA, SimTime::from(1.0)).unwrap();
    /// rt.add_event(MyEventSet::EventB, SimTime::from(2.0)).unwrap();
    ///
    /// let profile = rt.run().unwrap();
    /// assert_eq!(profile.event_count, 2);
    /// assert_eq!(profile.end_time, SimTime::from(2.0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if a lifecycle hook has determined that a
    /// simulation critical failure has occurred.
    pub fn run(&mut self) -> Result<Profiler, SimError> {
        if self.state == State::Stopped {
            return Ok(self.profiler.clone());
        }

        self.start()?;
        self.dispatch_all();
        self.finish()
    }

    /// Starts the simulation manually. If [`run`](Runtime::run) is not
    /// used, the combination of `start`, the `dispatch_*` family and
    /// `finish` completes a full execution cycle.
    ///
    /// # Errors
    ///
    /// Propagates failures of the application's start lifecycle hook.
    ///
    /// # Panics
    ///
    /// Panics if the simulation is not in the idle state.
    pub fn start(&mut self) -> Result<(), SimError> {
        assert_eq!(
            self.state,
            State::Idle,
            "only an idle simulation can be started"
        );

        if !self.quiet {
            println!("[ simulation starting ]");
            println!("[   executor  := {} ]", self.queue_descriptor());
            println!("[   limit     := {} ]", self.limit);
            println!("[   start     := {} ]", self.time);
        }

        self.profiler.start();
        A::Lifecycle::at_sim_start(self)?;
        self.state = State::Running;

        Ok(())
    }

    /// Executes the next n events in the runtime queue.
    ///
    /// # Panics
    ///
    /// Panics if the simulation has not been started.
    pub fn dispatch_n_events(&mut self, n: usize) {
        assert_eq!(
            self.state,
            State::Running,
            "dispatching is only allowed for running simulations"
        );

        let mut limit = RunLimit::EventCount(self.num_events_dispatched() + n);
        mem::swap(&mut self.limit, &mut limit);
        self.dispatch_all();
        self.limit = limit;
    }

    /// Executes runtime events until the runtime reaches the designated time.
    ///
    /// # Panics
    ///
    /// Panics if the simulation has not been started.
    pub fn dispatch_events_until(&mut self, t: SimTime) {
        assert_eq!(
            self.state,
            State::Running,
            "dispatching is only allowed for running simulations"
        );

        let mut limit = RunLimit::SimTime(t);
        mem::swap(&mut self.limit, &mut limit);
        self.dispatch_all();
        self.limit = limit;
    }

    /// Executes runtime events until the queue drains or the configured
    /// limit applies.
    ///
    /// # Panics
    ///
    /// Panics if the simulation has not been started.
    pub fn dispatch_all(&mut self) {
        assert_eq!(
            self.state,
            State::Running,
            "dispatching is only allowed for running simulations"
        );
        while !self.dispatch_event() {}
    }

    /// Ends a manually driven run: invokes the end-of-simulation lifecycle
    /// hook and seals the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the application has determined that a simulation
    /// critical failure has occurred.
    ///
    /// # Panics
    ///
    /// Panics if the runtime is not running.
    pub fn finish(&mut self) -> Result<Profiler, SimError> {
        assert_eq!(
            self.state,
            State::Running,
            "only a running simulation can be finished"
        );

        self.state = State::Stopped;
        A::Lifecycle::at_sim_end(self)?;

        self.profiler.finish(self.itr, self.time);

        if !self.quiet {
            if self.itr == 0 {
                println!("[ empty simulation, ended at event #0 ]");
            } else if self.queue.is_empty() {
                println!(
                    "[ simulation ended at event #{} after {} ]",
                    self.itr, self.time
                );
            } else {
                println!(
                    "[ simulation ended prematurely at event #{} with {} active events after {} ]",
                    self.itr,
                    self.queue.len(),
                    self.time
                );
            }
        }

        Ok(self.profiler.clone())
    }

    /// Cancels all remaining events and halts the runtime for good.
    ///
    /// Idempotent and always succeeds. Afterwards the event queue is
    /// empty and any subsequent [`run`](Runtime::run) is a no-op; the
    /// application state stays accessible until the runtime is dropped.
    pub fn destroy(&mut self) {
        self.queue.clear();
        self.state = State::Stopped;
    }

    /// Processes the next event in the future event set by calling its
    /// handler. Returns `true` if the dispatch loop should stop.
    fn dispatch_event(&mut self) -> bool {
        let Some(node) = self.queue.fetch_next() else {
            return true;
        };

        if self.limit.applies(self.itr + 1, node.time) {
            self.queue.restore(node);
            return true;
        }

        self.itr += 1;

        // The only place where simulation time advances.
        self.time = node.time;

        node.event.handle(self);

        false
    }

    ///
    /// Schedules an event to be handled in `delay` time units.
    ///
    /// Unlike [`add_event`](Runtime::add_event) this cannot fail, since a
    /// relative offset can never point into the simulated past.
    ///
    pub fn add_event_in(&mut self, event: impl Into<A::EventSet>, delay: Duration) -> EventHandle {
        self.scheduled += 1;
        self.queue.add(self.time + delay, event.into())
    }

    ///
    /// Schedules an event to be handled at the given absolute time and
    /// returns a handle usable to cancel it before dispatch.
    ///
    /// # Errors
    ///
    /// Scheduling at an instant before the current simulation time is a
    /// [`SchedulingError`]; the timeline is never silently coerced.
    ///
    pub fn add_event(
        &mut self,
        event: impl Into<A::EventSet>,
        time: SimTime,
    ) -> Result<EventHandle, SchedulingError> {
        if time < self.time {
            return Err(SchedulingError::InPast {
                requested: time,
                now: self.time,
            });
        }

        self.scheduled += 1;
        Ok(self.queue.add(time, event.into()))
    }

    ///
    /// Cancels a previously scheduled event. A no-op if the event was
    /// already dispatched or cancelled.
    ///
    pub fn cancel_event(&mut self, handle: EventHandle) {
        self.queue.cancel(handle);
    }

    fn queue_descriptor(&self) -> &'static str {
        "EventQueue::BinaryHeap"
    }
}

impl<A> Debug for Runtime<A>
where
    A: Application,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Runtime<{}> {{ sim_time: {} (itr {} / {}) scheduled: {} enqueued: {} }}",
            std::any::type_name::<A>(),
            self.sim_time(),
            self.num_events_dispatched(),
            self.limit,
            self.num_events_scheduled(),
            self.queue.len()
        )
    }
}

impl<A> Display for Runtime<A>
where
    A: Application,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}
