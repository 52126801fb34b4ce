//! DHCP starvation: floods a LAN with DHCP DISCOVERs from random client
//! hardware addresses until the server's address pool runs dry.
//!
//! Only run this against networks you are authorized to test.

pub mod builder;
pub mod checksum;
pub mod cli;
pub mod error;
pub mod flood;
pub mod interface;
pub mod mac;
pub mod packet;

pub use builder::build_discover_template;
pub use error::{Error, Result};
pub use flood::{FloodConfig, FloodStats, Flooder, FrameSink};
pub use interface::{LinkInterface, RawSocket, open_raw_socket, resolve_interface};
pub use mac::MacAddress;
pub use packet::EthernetFrame;
