use crate::error::SimError;
use crate::runtime::Runtime;

///
/// A trait that defines a runtime application: the global state of a
/// simulation together with the set of events it is driven by and its
/// lifecycle management.
///
pub trait Application: Sized {
    ///
    /// The set of events used in the simulation.
    ///
    type EventSet: EventSet<Self>;

    ///
    /// A global type defining the behavior at sim start / sim end.
    ///
    type Lifecycle: EventLifecycle<Self>;
}

///
/// A type that can handle an event, specific to the given application.
///
/// Individual events do not need to implement this trait unless they are
/// dispatched through an [`EventSet`] enum in the usual pattern; nonetheless
/// it is advised, to better isolate different events and their data.
///
pub trait Event<App>
where
    App: Application,
{
    ///
    /// Handles the event at its scheduled time. The mutable runtime
    /// reference is the only way to read the clock or schedule follow-up
    /// events, which is how applications chain start / send / stop behavior.
    ///
    fn handle(self, runtime: &mut Runtime<App>);
}

///
/// The dispatch type binding all events of an application together,
/// usually an enum with one variant per event.
///
pub trait EventSet<App>
where
    App: Application,
{
    ///
    /// Forwards the contained event to its handler.
    ///
    fn handle(self, runtime: &mut Runtime<App>);
}

///
/// A type that defines the lifecycle behaviour of an application `A`.
///
/// Both hooks may fail; configuration problems discovered while wiring up
/// the initial event set surface through [`Runtime::run`] instead of being
/// deferred into the event loop.
///
pub trait EventLifecycle<A = Self> {
    ///
    /// Called once when the simulation transitions into the running state,
    /// before the first event is dispatched.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial event set cannot be established.
    #[allow(unused_variables)]
    fn at_sim_start(runtime: &mut Runtime<A>) -> Result<(), SimError>
    where
        A: Application,
    {
        Ok(())
    }

    ///
    /// Called once the simulation has reached its limit or drained
    /// its event queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the application has determined that a
    /// simulation-critical failure has occurred.
    #[allow(unused_variables)]
    fn at_sim_end(runtime: &mut Runtime<A>) -> Result<(), SimError>
    where
        A: Application,
    {
        Ok(())
    }
}

impl<A: Application> EventSet<A> for () {
    fn handle(self, _: &mut Runtime<A>) {}
}

impl<A> EventLifecycle<A> for () {}
