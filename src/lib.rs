//!
//! A minimal deterministic discrete event simulator for point-to-point
//! networks.
//!
//! `linksim` provides the tools to build an event simulation from the
//! ground up with completely custom events, plus a network layer for the
//! common case: a static topology of nodes connected by delay-modelled
//! channels, exchanging datagrams between timed endpoint applications.
//!
//! # Building a simple event simulation
//!
//! At its core the crate runs an application-defined event set over an
//! ordered future event set. Events scheduled for the same instant are
//! dispatched in scheduling order, so a run is fully reproducible.
//!
//! ```
//! use linksim::prelude::*;
//!
//! #[derive(Default)]
//! struct MyApp {
//!     logs: Vec<SimTime>,
//! }
//!
//! impl Application for MyApp {
//!     type EventSet = MyEventSet;
//!     type Lifecycle = ();
//! }
//!
//! enum MyEventSet {
//!     Tick { remaining: usize },
//! }
//!
//! impl EventSet<MyApp> for MyEventSet {
//!     fn handle(self, rt: &mut Runtime<MyApp>) {
//!         let MyEventSet::Tick { remaining } = self;
//!         rt.app.logs.push(rt.sim_time());
//!         if remaining > 0 {
//!             rt.add_event_in(
//!                 MyEventSet::Tick { remaining: remaining - 1 },
//!                 Duration::from_secs(1),
//!             );
//!         }
//!     }
//! }
//!
//! let mut rt = Builder::seeded(1).quiet().build(MyApp::default());
//! rt.add_event(MyEventSet::Tick { remaining: 2 }, SimTime::ZERO).unwrap();
//!
//! let profile = rt.run().unwrap();
//! assert_eq!(profile.event_count, 3);
//! assert_eq!(rt.app.logs.len(), 3);
//! ```
//!
//! The [`Runtime`](crate::runtime::Runtime) owns the clock, the event
//! queue and the random number generator; there is no ambient simulation
//! state, so independent simulations can run side by side within one
//! process.
//!
//! # Simulating a network
//!
//! The [`net`] module layers a point-to-point network on top: build a
//! [`Topology`](crate::net::Topology), assign addresses, install
//! applications such as [`EchoServer`](crate::net::EchoServer) and
//! [`EchoClient`](crate::net::EchoClient) with their activation windows,
//! and run a [`Sim`](crate::net::Sim). See the [`net`] module
//! documentation for a complete round-trip example.
//!

pub mod error;
pub mod logger;
pub mod net;
pub mod prelude;
pub mod runtime;
pub mod time;
