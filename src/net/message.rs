use std::net::Ipv4Addr;

use crate::time::SimTime;

///
/// A transport port, used to demultiplex datagrams on a node.
///
pub type Port = u16;

///
/// The metadata attached to a message, independent of its contents.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MessageHeader {
    pub src_addr: Ipv4Addr,
    pub dest_addr: Ipv4Addr,

    pub src_port: Port,
    pub dest_port: Port,

    /// The payload length in bytes.
    pub length: u32,

    pub creation_time: SimTime,
    pub send_time: SimTime,
}

impl Default for MessageHeader {
    fn default() -> Self {
        Self {
            src_addr: Ipv4Addr::UNSPECIFIED,
            dest_addr: Ipv4Addr::UNSPECIFIED,

            src_port: 0,
            dest_port: 0,

            length: 0,

            creation_time: SimTime::MIN,
            send_time: SimTime::MIN,
        }
    }
}

///
/// A datagram travelling between two devices.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The metadata of the message.
    pub header: MessageHeader,
    /// The payload.
    pub content: Vec<u8>,
}

impl Message {
    ///
    /// Creates a new message around the given payload. Addressing is
    /// attached via [`to`](Message::to) / [`from_port`](Message::from_port);
    /// source address and timestamps are filled in at send time.
    ///
    #[must_use]
    pub fn new(content: Vec<u8>) -> Self {
        let header = MessageHeader {
            length: content.len() as u32,
            ..MessageHeader::default()
        };
        Self { header, content }
    }

    /// Sets the destination address and port.
    #[must_use]
    pub fn to(mut self, addr: Ipv4Addr, port: Port) -> Self {
        self.header.dest_addr = addr;
        self.header.dest_port = port;
        self
    }

    /// Sets the source port.
    #[must_use]
    pub fn from_port(mut self, port: Port) -> Self {
        self.header.src_port = port;
        self
    }

    /// The payload length in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.content.len()
    }

    /// The payload length in bits, as serialized onto a channel.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.content.len() * 8
    }

    // Compact single-line form for log output.
    pub(crate) fn str(&self) -> String {
        format!(
            "{}B {}:{} -> {}:{}",
            self.byte_len(),
            self.header.src_addr,
            self.header.src_port,
            self.header.dest_addr,
            self.header.dest_port,
        )
    }
}
