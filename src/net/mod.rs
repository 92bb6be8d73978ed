//!
//! Tools for building a point-to-point network simulation on top of the
//! generic runtime: topology, channels, messages and timed applications.
//!

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{ConfigError, SimError};
use crate::runtime::{Application, EventLifecycle, Runtime};
use crate::time::SimTime;

pub mod app;

mod channel;
mod events;
mod message;
mod topology;

pub use self::app::{App, AppCtx, EchoClient, EchoServer};
pub use self::channel::*;
pub use self::events::*;
pub use self::message::*;
pub use self::topology::*;

///
/// Per-application packet counters, maintained for observability.
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppStats {
    /// Messages sent by the application.
    pub sent: usize,
    /// Messages delivered to the application while it was active.
    pub received: usize,
}

struct AppSlot {
    app: Rc<RefCell<dyn App>>,
    start: SimTime,
    stop: SimTime,
    active: bool,
    stats: AppStats,
}

///
/// The network application driven by a [`Runtime<Sim>`].
///
/// Owns the [`Topology`] and the installed per-node applications. Its
/// lifecycle hook schedules one activation and one deactivation event per
/// installed application; everything else happens in reaction to
/// [`NetEvents`].
///
/// # Examples
///
/// ```
/// use linksim::prelude::*;
///
/// # fn main() -> Result<(), SimError> {
/// let mut topology = Topology::new();
/// let nodes = topology.create_nodes(2);
/// topology.connect(
///     nodes[0],
///     nodes[1],
///     ChannelMetrics::new(DataRate::from_mbps(5), Duration::from_millis(2)),
/// )?;
/// let addrs = topology.assign_addresses(
///     Ipv4Addr::new(10, 1, 1, 0),
///     Ipv4Addr::new(255, 255, 255, 0),
/// )?;
///
/// let mut sim = Sim::new(topology);
/// sim.install(
///     nodes[1],
///     EchoServer::new(9),
///     SimTime::from(1.0),
///     SimTime::from(10.0),
/// )?;
/// sim.install(
///     nodes[0],
///     EchoClient::new(addrs[1], 9),
///     SimTime::from(2.0),
///     SimTime::from(10.0),
/// )?;
///
/// let mut rt = Builder::seeded(42).quiet().build(sim);
/// rt.run()?;
///
/// assert_eq!(rt.app.stats(nodes[0]).unwrap().received, 1);
/// rt.destroy();
/// # Ok(())
/// # }
/// ```
///
pub struct Sim {
    topology: Topology,
    slots: BTreeMap<NodeId, AppSlot>,
}

impl Sim {
    /// Creates a network application around a fully built topology.
    #[must_use]
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            slots: BTreeMap::new(),
        }
    }

    /// The topology of the simulation.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    ///
    /// Attaches an application to a node with an activation window of
    /// `[start, stop]`. The application is created inactive; the runtime
    /// activates and deactivates it at the window bounds.
    ///
    /// # Errors
    ///
    /// Fails if the node does not exist, already carries an application,
    /// or the window is inverted.
    ///
    pub fn install(
        &mut self,
        node: NodeId,
        app: impl App + 'static,
        start: SimTime,
        stop: SimTime,
    ) -> Result<(), ConfigError> {
        if self.topology.node(node).is_none() {
            return Err(ConfigError::UnknownNode(node));
        }
        if stop < start {
            return Err(ConfigError::InvalidWindow { start, stop });
        }
        if self.slots.contains_key(&node) {
            return Err(ConfigError::AppAlreadyInstalled(node));
        }

        self.slots.insert(
            node,
            AppSlot {
                app: Rc::new(RefCell::new(app)),
                start,
                stop,
                active: false,
                stats: AppStats::default(),
            },
        );
        Ok(())
    }

    /// The packet counters of the application installed on `node`.
    #[must_use]
    pub fn stats(&self, node: NodeId) -> Option<AppStats> {
        self.slots.get(&node).map(|slot| slot.stats)
    }

    pub(crate) fn activate(&mut self, node: NodeId) -> Option<Rc<RefCell<dyn App>>> {
        let slot = self.slots.get_mut(&node)?;
        slot.active = true;
        Some(Rc::clone(&slot.app))
    }

    pub(crate) fn deactivate(&mut self, node: NodeId) -> Option<Rc<RefCell<dyn App>>> {
        let slot = self.slots.get_mut(&node)?;
        slot.active = false;
        Some(Rc::clone(&slot.app))
    }

    /// The installed application, if it is currently active.
    pub(crate) fn active_app(&self, node: NodeId) -> Option<Rc<RefCell<dyn App>>> {
        let slot = self.slots.get(&node)?;
        slot.active.then(|| Rc::clone(&slot.app))
    }

    /// Accounts for and hands out the receiving application, or `None`
    /// if the node has no active application.
    pub(crate) fn deliver(&mut self, node: NodeId) -> Option<Rc<RefCell<dyn App>>> {
        let slot = self.slots.get_mut(&node)?;
        if !slot.active {
            return None;
        }
        slot.stats.received += 1;
        Some(Rc::clone(&slot.app))
    }

    pub(crate) fn note_sent(&mut self, node: NodeId) {
        if let Some(slot) = self.slots.get_mut(&node) {
            slot.stats.sent += 1;
        }
    }
}

impl Application for Sim {
    type EventSet = NetEvents;
    type Lifecycle = Self;
}

impl EventLifecycle for Sim {
    fn at_sim_start(rt: &mut Runtime<Sim>) -> Result<(), SimError> {
        // Deterministic wiring order: slots iterate in node-id order.
        let windows: Vec<_> = rt
            .app
            .slots
            .iter()
            .map(|(node, slot)| (*node, slot.start, slot.stop))
            .collect();

        for (node, start, stop) in windows {
            rt.add_event(NetEvents::AppStart(AppStartEvent { node }), start)?;
            rt.add_event(NetEvents::AppStop(AppStopEvent { node }), stop)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("topology", &self.topology)
            .field("apps", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}
