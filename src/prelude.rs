//!
//! A list of often needed types and traits.
//!

pub use std::net::Ipv4Addr;

pub use crate::error::{ConfigError, ExhaustionError, SchedulingError, SimError};

pub use crate::runtime::{
    Application, Builder, Event, EventHandle, EventLifecycle, EventSet, Profiler, RunLimit,
    Runtime,
};

pub use crate::time::{Duration, SimTime};

pub use crate::net::{
    App, AppCtx, AppStats, Channel, ChannelId, ChannelMetrics, DataRate, Device, DeviceId,
    EchoClient, EchoServer, Message, MessageHeader, NetEvents, Node, NodeId, Port, Sim, Topology,
};
