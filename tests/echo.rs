use std::cell::RefCell;
use std::rc::Rc;

use linksim::prelude::*;

const BASE: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 0);
const MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

fn two_node_link() -> (Topology, Vec<NodeId>, Vec<Ipv4Addr>) {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    topology
        .connect(
            nodes[0],
            nodes[1],
            ChannelMetrics::new(DataRate::from_mbps(5), Duration::from_millis(2)),
        )
        .unwrap();
    let addrs = topology.assign_addresses(BASE, MASK).unwrap();
    (topology, nodes, addrs)
}

fn transit_1024b() -> Duration {
    Duration::from_millis(2) + Duration::from_secs_f64(8192.0 / 5_000_000.0)
}

#[test]
fn echo_roundtrip_scenario() {
    let (topology, nodes, addrs) = two_node_link();

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    sim.install(
        nodes[0],
        EchoClient::new(addrs[1], 9),
        SimTime::from(2.0),
        SimTime::from(10.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    let profile = rt.run().unwrap();

    // exactly one echoed round-trip recorded at the client
    assert_eq!(
        rt.app.stats(nodes[1]),
        Some(AppStats {
            sent: 1,
            received: 1
        })
    );
    assert_eq!(
        rt.app.stats(nodes[0]),
        Some(AppStats {
            sent: 1,
            received: 1
        })
    );

    // the run ends with the application stop events at 10s
    assert_eq!(profile.end_time, SimTime::from(10.0));
    assert_eq!(rt.num_events_pending(), 0);

    // teardown: nothing leaks past destroy, rerunning is a no-op
    rt.destroy();
    assert_eq!(rt.num_events_pending(), 0);
    let rerun = rt.run().unwrap();
    assert_eq!(rerun.event_count, profile.event_count);
}

/// Logs every arrival instant and echoes the payload, for timing assertions.
struct EchoProbe {
    port: Port,
    log: Rc<RefCell<Vec<SimTime>>>,
}

impl App for EchoProbe {
    fn recv(&mut self, ctx: &mut AppCtx<'_>, msg: Message) {
        self.log.borrow_mut().push(ctx.now());
        let reply = Message::new(msg.content)
            .to(msg.header.src_addr, msg.header.src_port)
            .from_port(self.port);
        ctx.send(reply).unwrap();
    }
}

/// Sends one payload at start and logs the arrival of the echo.
struct SendOnce {
    dest: Ipv4Addr,
    port: Port,
    size: usize,
    log: Rc<RefCell<Vec<(SimTime, Message)>>>,
}

impl App for SendOnce {
    fn start(&mut self, ctx: &mut AppCtx<'_>) {
        ctx.send(Message::new(vec![0; self.size]).to(self.dest, self.port))
            .unwrap();
    }

    fn recv(&mut self, ctx: &mut AppCtx<'_>, msg: Message) {
        self.log.borrow_mut().push((ctx.now(), msg));
    }
}

#[test]
fn delivery_times_follow_the_delay_model() {
    let (topology, nodes, addrs) = two_node_link();

    let server_log = Rc::new(RefCell::new(Vec::new()));
    let client_log = Rc::new(RefCell::new(Vec::new()));

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoProbe {
            port: 9,
            log: Rc::clone(&server_log),
        },
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    sim.install(
        nodes[0],
        SendOnce {
            dest: addrs[1],
            port: 9,
            size: 1024,
            log: Rc::clone(&client_log),
        },
        SimTime::from(2.0),
        SimTime::from(10.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    // one hop: start + propagation + serialization
    let expected_server = SimTime::from(2.0) + transit_1024b();
    assert_eq!(*server_log.borrow(), vec![expected_server]);

    // round trip: two symmetric hops
    let expected_client = expected_server + transit_1024b();
    let client_log = client_log.borrow();
    assert_eq!(client_log.len(), 1);

    let (arrival, echo) = &client_log[0];
    assert_eq!(*arrival, expected_client);

    // the echo carries the reversed addressing and the original payload
    assert_eq!(echo.header.src_addr, addrs[1]);
    assert_eq!(echo.header.dest_addr, addrs[0]);
    assert_eq!(echo.header.src_port, 9);
    assert_eq!(echo.header.length, 1024);
    assert_eq!(echo.byte_len(), 1024);
    assert_eq!(echo.header.send_time, expected_server);
}

#[test]
fn payloads_after_stop_time_are_dropped() {
    let (topology, nodes, addrs) = two_node_link();

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    // the client transmits at 10.5s, well past the server window
    sim.install(
        nodes[0],
        EchoClient::new(addrs[1], 9),
        SimTime::from(10.5),
        SimTime::from(11.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    assert_eq!(
        rt.app.stats(nodes[1]),
        Some(AppStats {
            sent: 0,
            received: 0
        })
    );
    assert_eq!(
        rt.app.stats(nodes[0]),
        Some(AppStats {
            sent: 1,
            received: 0
        })
    );
    assert_eq!(rt.num_events_pending(), 0);
}

#[test]
fn client_pacing_sends_multiple_packets() {
    let (topology, nodes, addrs) = two_node_link();

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    sim.install(
        nodes[0],
        EchoClient::new(addrs[1], 9)
            .max_packets(3)
            .interval(Duration::from_secs(1))
            .packet_size(512),
        SimTime::from(2.0),
        SimTime::from(10.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    assert_eq!(
        rt.app.stats(nodes[1]),
        Some(AppStats {
            sent: 3,
            received: 3
        })
    );
    assert_eq!(
        rt.app.stats(nodes[0]),
        Some(AppStats {
            sent: 3,
            received: 3
        })
    );
}

#[test]
fn stopping_the_client_cancels_its_pending_transmit() {
    let (topology, nodes, addrs) = two_node_link();

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    // budget of five, but the window closes after the second transmit
    sim.install(
        nodes[0],
        EchoClient::new(addrs[1], 9)
            .max_packets(5)
            .interval(Duration::from_secs(1)),
        SimTime::from(2.0),
        SimTime::from(3.5),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    assert_eq!(
        rt.app.stats(nodes[0]),
        Some(AppStats {
            sent: 2,
            received: 2
        })
    );
    assert_eq!(
        rt.app.stats(nodes[1]),
        Some(AppStats {
            sent: 2,
            received: 2
        })
    );
    assert_eq!(rt.num_events_pending(), 0);
}

#[test]
fn messages_for_other_ports_are_not_echoed() {
    let (topology, nodes, addrs) = two_node_link();

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[1],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    sim.install(
        nodes[0],
        EchoClient::new(addrs[1], 7),
        SimTime::from(2.0),
        SimTime::from(10.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    // delivered to the active server, but filtered at its port
    assert_eq!(
        rt.app.stats(nodes[1]),
        Some(AppStats {
            sent: 0,
            received: 1
        })
    );
    assert_eq!(
        rt.app.stats(nodes[0]),
        Some(AppStats {
            sent: 1,
            received: 0
        })
    );
}

#[test]
fn sending_to_unknown_or_unreachable_destinations_fails() {
    let (topology, nodes, _addrs) = two_node_link();

    let errors = Rc::new(RefCell::new(Vec::new()));

    struct FailingSender {
        errors: Rc<RefCell<Vec<ConfigError>>>,
    }

    impl App for FailingSender {
        fn start(&mut self, ctx: &mut AppCtx<'_>) {
            let err = ctx
                .send(Message::new(vec![0; 16]).to(Ipv4Addr::new(192, 0, 2, 1), 9))
                .unwrap_err();
            self.errors.borrow_mut().push(err);
        }
    }

    let mut sim = Sim::new(topology);
    sim.install(
        nodes[0],
        FailingSender {
            errors: Rc::clone(&errors),
        },
        SimTime::from(1.0),
        SimTime::from(2.0),
    )
    .unwrap();

    let mut rt = Builder::seeded(1).quiet().build(sim);
    rt.run().unwrap();

    assert_eq!(
        *errors.borrow(),
        vec![ConfigError::UnknownAddress(Ipv4Addr::new(192, 0, 2, 1))]
    );
    // a failed send is not counted
    assert_eq!(rt.app.stats(nodes[0]).unwrap().sent, 0);
}
