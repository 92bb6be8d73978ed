//!
//! Endpoint applications: behaviors attached to nodes with a timed
//! activation window.
//!

use std::net::Ipv4Addr;

use crate::error::ConfigError;
use crate::net::events::{MessageDeliveredEvent, NetEvents, TimerEvent};
use crate::net::{Message, NodeId, Sim};
use crate::runtime::{EventHandle, Runtime};
use crate::time::{Duration, SimTime};

mod echo;
pub use self::echo::*;

///
/// A behavior attached to one node, driven by the network event set.
///
/// All hooks run synchronously inside event dispatch; logical waiting is
/// expressed by scheduling a future timer through the [`AppCtx`] and
/// returning. Hooks are only invoked within the application's active
/// window; inbound messages outside of it are dropped by the runtime.
///
pub trait App {
    /// Called once when the application's start time is reached.
    fn start(&mut self, _ctx: &mut AppCtx<'_>) {}

    /// Called once when the application's stop time is reached. Pending
    /// self-scheduled events should be cancelled here.
    fn stop(&mut self, _ctx: &mut AppCtx<'_>) {}

    /// Called for every message delivered while the application is active.
    fn recv(&mut self, _ctx: &mut AppCtx<'_>, _msg: Message) {}

    /// Called when a timer scheduled via [`AppCtx::schedule_in`] fires.
    fn timer(&mut self, _ctx: &mut AppCtx<'_>) {}
}

///
/// The capability handle passed into every [`App`] hook: read the clock,
/// send datagrams, schedule and cancel timers.
///
pub struct AppCtx<'a> {
    pub(crate) node: NodeId,
    pub(crate) rt: &'a mut Runtime<Sim>,
}

impl AppCtx<'_> {
    /// The current simulation time.
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.rt.sim_time()
    }

    /// The node this application is attached to.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The address of the node's first addressed device, if any.
    #[must_use]
    pub fn local_addr(&self) -> Option<Ipv4Addr> {
        self.rt.app.topology().address_of(self.node)
    }

    ///
    /// Sends a datagram towards the destination in its header.
    ///
    /// Resolves the destination device by address and the outgoing device
    /// by direct adjacency, stamps source address and timestamps, and
    /// schedules the delivery at
    /// `now + propagation_delay + serialization_delay`. The returned
    /// handle identifies the in-flight delivery event.
    ///
    /// # Errors
    ///
    /// Fails if nobody owns the destination address, the sending node has
    /// no link towards it, or the outgoing device is unaddressed.
    ///
    pub fn send(&mut self, msg: Message) -> Result<EventHandle, ConfigError> {
        let dest = msg.header.dest_addr;

        let (dest_dev, src_addr, metrics) = {
            let topo = self.rt.app.topology();
            let dest_dev = topo
                .device_by_addr(dest)
                .ok_or(ConfigError::UnknownAddress(dest))?
                .id();
            let src_dev = topo
                .link_towards(self.node, dest_dev)
                .ok_or(ConfigError::NotAdjacent {
                    from: self.node,
                    dest,
                })?;
            let src_addr = src_dev
                .addr()
                .ok_or(ConfigError::UnassignedAddress(src_dev.id()))?;

            (dest_dev, src_addr, topo.metrics_of(src_dev.channel()))
        };

        let now = self.rt.sim_time();
        let mut msg = msg;
        msg.header.src_addr = src_addr;
        msg.header.creation_time = now;
        msg.header.send_time = now;

        let transit = metrics.transit_duration(&msg);
        tracing::trace!(
            node = %self.node,
            msg = %msg.str(),
            transit = ?transit,
            "sending message"
        );

        let handle = self.rt.add_event_in(
            NetEvents::MessageDelivered(MessageDeliveredEvent {
                device: dest_dev,
                message: msg,
            }),
            transit,
        );
        self.rt.app.note_sent(self.node);

        Ok(handle)
    }

    ///
    /// Schedules a timer for this application `delay` time units from now.
    /// The returned handle can be cancelled before the timer fires.
    ///
    pub fn schedule_in(&mut self, delay: Duration) -> EventHandle {
        self.rt
            .add_event_in(NetEvents::Timer(TimerEvent { node: self.node }), delay)
    }

    /// Cancels a previously scheduled event. A no-op if the event already
    /// fired or was cancelled.
    pub fn cancel(&mut self, handle: EventHandle) {
        self.rt.cancel_event(handle);
    }
}
