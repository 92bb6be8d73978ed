use std::net::Ipv4Addr;

use crate::net::app::{App, AppCtx};
use crate::net::{Message, Port};
use crate::time::Duration;

///
/// An application that echoes every datagram received on its port back to
/// the sender.
///
#[derive(Debug)]
pub struct EchoServer {
    port: Port,
}

impl EchoServer {
    /// Creates an echo server listening on the given port.
    #[must_use]
    pub fn new(port: Port) -> Self {
        Self { port }
    }
}

impl App for EchoServer {
    fn recv(&mut self, ctx: &mut AppCtx<'_>, msg: Message) {
        if msg.header.dest_port != self.port {
            tracing::debug!(
                node = %ctx.node(),
                msg = %msg.str(),
                port = self.port,
                "message dropped, wrong port"
            );
            return;
        }

        tracing::info!(
            node = %ctx.node(),
            time = %ctx.now(),
            "server received {} bytes from {}:{}",
            msg.byte_len(),
            msg.header.src_addr,
            msg.header.src_port
        );

        let (reply_addr, reply_port) = (msg.header.src_addr, msg.header.src_port);
        let reply = Message::new(msg.content)
            .to(reply_addr, reply_port)
            .from_port(self.port);

        if let Err(err) = ctx.send(reply) {
            tracing::warn!(node = %ctx.node(), %err, "echo reply failed");
        }
    }
}

///
/// An application that sends fixed-size datagrams to a configured
/// destination and counts the echoes coming back.
///
/// By default a single 1024-byte payload is sent at the start time; with
/// [`max_packets`](EchoClient::max_packets) the client keeps transmitting
/// every [`interval`](EchoClient::interval) until the budget is spent or
/// its window closes. Stopping cancels the pending transmit timer.
///
#[derive(Debug)]
pub struct EchoClient {
    dest: Ipv4Addr,
    port: Port,

    packet_size: usize,
    max_packets: usize,
    interval: Duration,

    sent: usize,
    pending: Option<crate::runtime::EventHandle>,
}

impl EchoClient {
    /// Creates an echo client targeting `dest:port`, sending one
    /// 1024-byte payload.
    #[must_use]
    pub fn new(dest: Ipv4Addr, port: Port) -> Self {
        Self {
            dest,
            port,

            packet_size: 1024,
            max_packets: 1,
            interval: Duration::from_secs(1),

            sent: 0,
            pending: None,
        }
    }

    /// Sets the payload size in bytes.
    #[must_use]
    pub fn packet_size(mut self, bytes: usize) -> Self {
        self.packet_size = bytes;
        self
    }

    /// Sets the number of payloads to transmit.
    #[must_use]
    pub fn max_packets(mut self, n: usize) -> Self {
        self.max_packets = n;
        self
    }

    /// Sets the pause between consecutive transmissions.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn transmit(&mut self, ctx: &mut AppCtx<'_>) {
        if self.sent >= self.max_packets {
            return;
        }

        let msg = Message::new(vec![0; self.packet_size]).to(self.dest, self.port);
        match ctx.send(msg) {
            Ok(_) => {
                self.sent += 1;
                tracing::info!(
                    node = %ctx.node(),
                    time = %ctx.now(),
                    "client sent {} bytes to {}:{}",
                    self.packet_size,
                    self.dest,
                    self.port
                );
            }
            Err(err) => tracing::warn!(node = %ctx.node(), %err, "transmit failed"),
        }

        if self.sent < self.max_packets {
            self.pending = Some(ctx.schedule_in(self.interval));
        }
    }
}

impl App for EchoClient {
    fn start(&mut self, ctx: &mut AppCtx<'_>) {
        self.transmit(ctx);
    }

    fn timer(&mut self, ctx: &mut AppCtx<'_>) {
        self.pending = None;
        self.transmit(ctx);
    }

    fn recv(&mut self, ctx: &mut AppCtx<'_>, msg: Message) {
        tracing::info!(
            node = %ctx.node(),
            time = %ctx.now(),
            "client received {} echoed bytes from {}:{}",
            msg.byte_len(),
            msg.header.src_addr,
            msg.header.src_port
        );
    }

    fn stop(&mut self, ctx: &mut AppCtx<'_>) {
        if let Some(handle) = self.pending.take() {
            ctx.cancel(handle);
        }
    }
}
