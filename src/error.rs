//! Error types surfaced by the simulation core.
//!
//! Every error is reported at the offending call; nothing is deferred,
//! retried or silently corrected.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::net::{DeviceId, NodeId};
use crate::time::SimTime;

/// An attempt to manipulate the event timeline in an invalid way.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingError {
    /// The requested instant lies before the current simulation time.
    #[error("cannot schedule at {requested}, simulation time is already {now}")]
    InPast {
        /// The requested schedule instant.
        requested: SimTime,
        /// The simulation time at the point of the call.
        now: SimTime,
    },
}

/// A malformed topology or application setup.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The referenced node does not exist in the topology.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// Point-to-point channels connect two distinct nodes.
    #[error("cannot connect node {0} to itself")]
    SelfLink(NodeId),

    /// The referenced device does not exist in the topology.
    #[error("device {0} does not exist")]
    UnknownDevice(DeviceId),

    /// A device must be addressed before it can source traffic.
    #[error("device {0} has no assigned address")]
    UnassignedAddress(DeviceId),

    /// No device in the topology owns the given address.
    #[error("no device owns address {0}")]
    UnknownAddress(Ipv4Addr),

    /// The sending node has no channel towards the destination device.
    #[error("node {from} has no link towards {dest}")]
    NotAdjacent {
        /// The sending node.
        from: NodeId,
        /// The unreachable destination address.
        dest: Ipv4Addr,
    },

    /// Addresses are unique per device within a topology.
    #[error("address {0} is already assigned")]
    DuplicateAddress(Ipv4Addr),

    /// The device already carries an address.
    #[error("device {0} is already addressed")]
    AlreadyAddressed(DeviceId),

    /// Network masks must be contiguous.
    #[error("{0} is not a contiguous network mask")]
    InvalidMask(Ipv4Addr),

    /// At most one application per node in this model.
    #[error("node {0} already has an application installed")]
    AppAlreadyInstalled(NodeId),

    /// An application window must not end before it starts.
    #[error("application window ends at {stop} before it starts at {start}")]
    InvalidWindow {
        /// Scheduled activation instant.
        start: SimTime,
        /// Scheduled deactivation instant.
        stop: SimTime,
    },
}

/// A finite resource ran out.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionError {
    /// No assignable host addresses are left under the given network.
    #[error("address space {network}/{mask} is exhausted")]
    AddressSpace {
        /// The network base.
        network: Ipv4Addr,
        /// The network mask.
        mask: Ipv4Addr,
    },
}

/// The unified error type of the simulation core.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// See [`SchedulingError`].
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`ExhaustionError`].
    #[error(transparent)]
    Exhausted(#[from] ExhaustionError),
}
