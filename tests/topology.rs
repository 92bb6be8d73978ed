use linksim::prelude::*;

fn metrics() -> ChannelMetrics {
    ChannelMetrics::new(DataRate::from_mbps(5), Duration::from_millis(2))
}

#[test]
fn connect_allocates_devices_and_channel() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    assert_eq!(topology.num_nodes(), 2);

    let channel = topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    assert_eq!(topology.num_devices(), 2);
    assert_eq!(topology.num_channels(), 1);

    let (a, b) = topology.channel(channel).unwrap().ends();
    let dev_a = topology.device(a).unwrap();
    let dev_b = topology.device(b).unwrap();

    assert_eq!(dev_a.node(), nodes[0]);
    assert_eq!(dev_b.node(), nodes[1]);
    assert_eq!(dev_a.peer(), b);
    assert_eq!(dev_b.peer(), a);
    assert_eq!(dev_a.channel(), channel);
    assert_eq!(dev_b.channel(), channel);
    assert_eq!(topology.node(nodes[0]).unwrap().devices(), &[a]);
}

#[test]
fn self_links_are_rejected() {
    let mut topology = Topology::new();
    let node = topology.add_node();

    assert_eq!(
        topology.connect(node, node, metrics()).unwrap_err(),
        ConfigError::SelfLink(node)
    );
}

#[test]
fn unknown_nodes_are_rejected() {
    let mut topology = Topology::new();
    let node = topology.add_node();

    assert_eq!(
        topology.connect(node, NodeId(7), metrics()).unwrap_err(),
        ConfigError::UnknownNode(NodeId(7))
    );
}

#[test]
fn addresses_are_sequential_in_creation_order() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(3);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    topology.connect(nodes[1], nodes[2], metrics()).unwrap();

    let assigned = topology
        .assign_addresses(Ipv4Addr::new(10, 1, 1, 0), Ipv4Addr::new(255, 255, 255, 0))
        .unwrap();

    assert_eq!(
        assigned,
        vec![
            Ipv4Addr::new(10, 1, 1, 1),
            Ipv4Addr::new(10, 1, 1, 2),
            Ipv4Addr::new(10, 1, 1, 3),
            Ipv4Addr::new(10, 1, 1, 4),
        ]
    );

    let dev = topology.device_by_addr(Ipv4Addr::new(10, 1, 1, 3)).unwrap();
    assert_eq!(dev.node(), nodes[1]);
    assert_eq!(topology.address_of(nodes[0]), Some(Ipv4Addr::new(10, 1, 1, 1)));
}

#[test]
fn small_networks_exhaust() {
    // /30 offers exactly two host addresses
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();

    let assigned = topology
        .assign_addresses(
            Ipv4Addr::new(192, 168, 0, 0),
            Ipv4Addr::new(255, 255, 255, 252),
        )
        .unwrap();
    assert_eq!(
        assigned,
        vec![Ipv4Addr::new(192, 168, 0, 1), Ipv4Addr::new(192, 168, 0, 2)]
    );

    let mut topology = Topology::new();
    let nodes = topology.create_nodes(3);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    topology.connect(nodes[1], nodes[2], metrics()).unwrap();

    let err = topology
        .assign_addresses(
            Ipv4Addr::new(192, 168, 0, 0),
            Ipv4Addr::new(255, 255, 255, 252),
        )
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Exhausted(ExhaustionError::AddressSpace {
            network: Ipv4Addr::new(192, 168, 0, 0),
            mask: Ipv4Addr::new(255, 255, 255, 252),
        })
    );
}

#[test]
fn reassignment_skips_addressed_devices() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    topology
        .assign_addresses(Ipv4Addr::new(10, 1, 1, 0), Ipv4Addr::new(255, 255, 255, 0))
        .unwrap();

    // a later link under the same base continues behind the taken hosts
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    let assigned = topology
        .assign_addresses(Ipv4Addr::new(10, 1, 1, 0), Ipv4Addr::new(255, 255, 255, 0))
        .unwrap();

    assert_eq!(
        assigned,
        vec![Ipv4Addr::new(10, 1, 1, 3), Ipv4Addr::new(10, 1, 1, 4)]
    );
}

#[test]
fn non_contiguous_masks_are_rejected() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();

    let err = topology
        .assign_addresses(Ipv4Addr::new(10, 1, 1, 0), Ipv4Addr::new(255, 0, 255, 0))
        .unwrap_err();
    assert_eq!(
        err,
        SimError::Config(ConfigError::InvalidMask(Ipv4Addr::new(255, 0, 255, 0)))
    );
}

#[test]
fn manual_assignment_guards_uniqueness() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    let channel = topology.connect(nodes[0], nodes[1], metrics()).unwrap();
    let (a, b) = topology.channel(channel).unwrap().ends();

    topology
        .assign_address(a, Ipv4Addr::new(10, 1, 1, 1))
        .unwrap();

    assert_eq!(
        topology
            .assign_address(b, Ipv4Addr::new(10, 1, 1, 1))
            .unwrap_err(),
        ConfigError::DuplicateAddress(Ipv4Addr::new(10, 1, 1, 1))
    );
    assert_eq!(
        topology
            .assign_address(a, Ipv4Addr::new(10, 1, 1, 9))
            .unwrap_err(),
        ConfigError::AlreadyAddressed(a)
    );
    assert_eq!(
        topology
            .assign_address(DeviceId(99), Ipv4Addr::new(10, 1, 1, 9))
            .unwrap_err(),
        ConfigError::UnknownDevice(DeviceId(99))
    );
}

#[test]
fn install_validates_nodes_and_windows() {
    let mut topology = Topology::new();
    let nodes = topology.create_nodes(2);
    topology.connect(nodes[0], nodes[1], metrics()).unwrap();

    let mut sim = Sim::new(topology);

    assert_eq!(
        sim.install(
            NodeId(9),
            EchoServer::new(9),
            SimTime::from(1.0),
            SimTime::from(10.0)
        )
        .unwrap_err(),
        ConfigError::UnknownNode(NodeId(9))
    );

    assert_eq!(
        sim.install(
            nodes[0],
            EchoServer::new(9),
            SimTime::from(5.0),
            SimTime::from(1.0)
        )
        .unwrap_err(),
        ConfigError::InvalidWindow {
            start: SimTime::from(5.0),
            stop: SimTime::from(1.0),
        }
    );

    sim.install(
        nodes[0],
        EchoServer::new(9),
        SimTime::from(1.0),
        SimTime::from(10.0),
    )
    .unwrap();
    assert_eq!(
        sim.install(
            nodes[0],
            EchoServer::new(9),
            SimTime::from(1.0),
            SimTime::from(10.0)
        )
        .unwrap_err(),
        ConfigError::AppAlreadyInstalled(nodes[0])
    );

    assert_eq!(sim.stats(nodes[0]), Some(AppStats::default()));
    assert_eq!(sim.stats(nodes[1]), None);
}
