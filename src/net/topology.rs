use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::Ipv4Addr;

use crate::error::{ConfigError, ExhaustionError, SimError};
use crate::net::channel::ChannelMetrics;

///
/// A unique identifier of a node within a topology.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

///
/// A unique identifier of a device within a topology.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u32);

///
/// A unique identifier of a channel within a topology.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// A simulated computer: an opaque identity plus its attached devices.
///
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    devices: Vec<DeviceId>,
}

impl Node {
    /// The identity of the node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The devices attached to this node, in creation order.
    #[must_use]
    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }
}

///
/// A network interface: belongs to exactly one node and references exactly
/// one channel endpoint.
///
#[derive(Debug)]
pub struct Device {
    id: DeviceId,
    node: NodeId,
    channel: ChannelId,
    peer: DeviceId,
    addr: Option<Ipv4Addr>,
}

impl Device {
    /// The identity of the device.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// The node this device belongs to.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The channel this device is an endpoint of.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// The device on the other end of the channel.
    #[must_use]
    pub fn peer(&self) -> DeviceId {
        self.peer
    }

    /// The assigned network address, if any.
    #[must_use]
    pub fn addr(&self) -> Option<Ipv4Addr> {
        self.addr
    }
}

///
/// A point-to-point link connecting exactly two devices; immutable once
/// installed.
///
#[derive(Debug)]
pub struct Channel {
    id: ChannelId,
    metrics: ChannelMetrics,
    ends: (DeviceId, DeviceId),
}

impl Channel {
    /// The identity of the channel.
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// The transmission parameters of the channel.
    #[must_use]
    pub fn metrics(&self) -> ChannelMetrics {
        self.metrics
    }

    /// The two endpoint devices.
    #[must_use]
    pub fn ends(&self) -> (DeviceId, DeviceId) {
        self.ends
    }
}

///
/// The static graph of a simulation: nodes, devices and channels.
///
/// Built up front via [`create_nodes`](Topology::create_nodes),
/// [`connect`](Topology::connect) and
/// [`assign_addresses`](Topology::assign_addresses), then owned by the
/// network application for the duration of the run.
///
#[derive(Debug, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    devices: Vec<Device>,
    channels: Vec<Channel>,
    by_addr: BTreeMap<Ipv4Addr, DeviceId>,
}

impl Topology {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a single node identity.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            devices: Vec::new(),
        });
        id
    }

    /// Allocates `n` node identities.
    pub fn create_nodes(&mut self, n: usize) -> Vec<NodeId> {
        (0..n).map(|_| self.add_node()).collect()
    }

    ///
    /// Connects two distinct nodes with a new point-to-point channel,
    /// allocating one device per endpoint. By construction every channel
    /// has exactly two devices and every device references exactly one
    /// channel.
    ///
    /// # Errors
    ///
    /// Fails if either node does not exist or both endpoints name the
    /// same node.
    ///
    pub fn connect(
        &mut self,
        a: NodeId,
        b: NodeId,
        metrics: ChannelMetrics,
    ) -> Result<ChannelId, ConfigError> {
        if a == b {
            return Err(ConfigError::SelfLink(a));
        }
        for node in [a, b] {
            if self.node(node).is_none() {
                return Err(ConfigError::UnknownNode(node));
            }
        }

        let channel = ChannelId(self.channels.len() as u32);
        let dev_a = DeviceId(self.devices.len() as u32);
        let dev_b = DeviceId(self.devices.len() as u32 + 1);

        self.devices.push(Device {
            id: dev_a,
            node: a,
            channel,
            peer: dev_b,
            addr: None,
        });
        self.devices.push(Device {
            id: dev_b,
            node: b,
            channel,
            peer: dev_a,
            addr: None,
        });

        self.nodes[a.0 as usize].devices.push(dev_a);
        self.nodes[b.0 as usize].devices.push(dev_b);

        self.channels.push(Channel {
            id: channel,
            metrics,
            ends: (dev_a, dev_b),
        });

        Ok(channel)
    }

    ///
    /// Deterministically assigns sequential host addresses under
    /// `base & mask` to every not-yet-addressed device, in device creation
    /// order. Host numbering starts at 1; the broadcast address is never
    /// assigned; addresses already in use are skipped. Returns the newly
    /// assigned addresses in assignment order.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InvalidMask`] for a non-contiguous mask
    /// and with [`ExhaustionError::AddressSpace`] once the host space
    /// under the network runs out.
    ///
    pub fn assign_addresses(
        &mut self,
        base: Ipv4Addr,
        mask: Ipv4Addr,
    ) -> Result<Vec<Ipv4Addr>, SimError> {
        let m = u32::from(mask);
        if m.count_ones() + m.trailing_zeros() != 32 {
            return Err(ConfigError::InvalidMask(mask).into());
        }

        let network = u32::from(base) & m;
        let host_max = !m; // the broadcast offset, exclusive upper bound
        let exhausted = || ExhaustionError::AddressSpace {
            network: Ipv4Addr::from(network),
            mask,
        };

        let mut host = 1u32;
        let mut assigned = Vec::new();

        for idx in 0..self.devices.len() {
            if self.devices[idx].addr.is_some() {
                continue;
            }

            while host < host_max && self.by_addr.contains_key(&Ipv4Addr::from(network | host)) {
                host += 1;
            }
            if host >= host_max {
                return Err(exhausted().into());
            }

            let addr = Ipv4Addr::from(network | host);
            self.devices[idx].addr = Some(addr);
            self.by_addr.insert(addr, DeviceId(idx as u32));
            assigned.push(addr);
            host += 1;
        }

        Ok(assigned)
    }

    ///
    /// Assigns a single address to a specific device.
    ///
    /// # Errors
    ///
    /// Fails if the device does not exist, already carries an address, or
    /// the address is in use elsewhere in the topology.
    ///
    pub fn assign_address(&mut self, device: DeviceId, addr: Ipv4Addr) -> Result<(), ConfigError> {
        let Some(dev) = self.devices.get(device.0 as usize) else {
            return Err(ConfigError::UnknownDevice(device));
        };
        if dev.addr.is_some() {
            return Err(ConfigError::AlreadyAddressed(device));
        }
        if self.by_addr.contains_key(&addr) {
            return Err(ConfigError::DuplicateAddress(addr));
        }

        self.devices[device.0 as usize].addr = Some(addr);
        self.by_addr.insert(addr, device);
        Ok(())
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Looks up a device.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.0 as usize)
    }

    /// Looks up a channel.
    #[must_use]
    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(id.0 as usize)
    }

    /// Looks up the device owning the given address.
    #[must_use]
    pub fn device_by_addr(&self, addr: Ipv4Addr) -> Option<&Device> {
        self.by_addr
            .get(&addr)
            .and_then(|id| self.device(*id))
    }

    /// The address of the first addressed device of a node, if any.
    #[must_use]
    pub fn address_of(&self, node: NodeId) -> Option<Ipv4Addr> {
        self.node(node)?
            .devices
            .iter()
            .find_map(|dev| self.devices[dev.0 as usize].addr)
    }

    ///
    /// The device on `from` whose channel peers directly with `dest`,
    /// or `None` if the nodes are not adjacent. There is no multi-hop
    /// routing in this model.
    ///
    #[must_use]
    pub fn link_towards(&self, from: NodeId, dest: DeviceId) -> Option<&Device> {
        let node = self.node(from)?;
        node.devices
            .iter()
            .map(|dev| &self.devices[dev.0 as usize])
            .find(|dev| dev.peer == dest)
    }

    /// The transmission parameters of the given channel.
    ///
    /// Channel ids handed out by [`connect`](Topology::connect) are always
    /// valid for the topology that created them.
    pub(crate) fn metrics_of(&self, id: ChannelId) -> ChannelMetrics {
        self.channels[id.0 as usize].metrics
    }

    /// The number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The number of devices.
    #[must_use]
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// The number of channels.
    #[must_use]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}
