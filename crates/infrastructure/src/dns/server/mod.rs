pub mod udp;

pub use udp::{UdpDnsServer, UdpPacketSender};
