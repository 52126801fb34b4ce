//! Link-layer plumbing: interface lookup and the raw transmit channel.

use std::io;

use pnet::datalink::{self, Channel::Ethernet, DataLinkSender, NetworkInterface};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::flood::FrameSink;
use crate::mac::MacAddress;

/// An interface resolved by name.
#[derive(Debug, Clone)]
pub struct LinkInterface {
    pub name: String,
    pub index: u32,
    pub mac: MacAddress,
    inner: NetworkInterface,
}

/// Looks up `name` and reads its index and hardware address.
pub fn resolve_interface(name: &str) -> Result<LinkInterface> {
    let inner = datalink::interfaces()
        .into_iter()
        .find(|i| i.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;

    let mac = match inner.mac {
        Some(mac) => MacAddress::from(mac),
        None => {
            debug!(interface = name, "no MAC from datalink, asking the OS directly");
            let mac = mac_address::mac_address_by_name(name)
                .map_err(|e| Error::Interface(e.to_string()))?
                .ok_or_else(|| Error::NoHardwareAddress(name.to_string()))?;
            MacAddress::from(mac.bytes())
        }
    };

    Ok(LinkInterface {
        name: inner.name.clone(),
        index: inner.index,
        mac,
        inner,
    })
}

/// Transmit half of a raw Ethernet channel bound to one interface.
pub struct RawSocket {
    tx: Box<dyn DataLinkSender>,
}

/// Opens a raw Ethernet channel on `interface`. Needs CAP_NET_RAW or root.
pub fn open_raw_socket(interface: &LinkInterface) -> Result<RawSocket> {
    match datalink::channel(&interface.inner, Default::default()) {
        Ok(Ethernet(tx, _)) => Ok(RawSocket { tx }),
        Ok(_) => Err(Error::UnsupportedChannel),
        Err(e) => Err(Error::Channel(e)),
    }
}

impl FrameSink for RawSocket {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        // The channel is already bound to the interface, and the frame
        // carries its own broadcast destination.
        match self.tx.send_to(frame, None) {
            Some(result) => result,
            None => {
                warn!("datalink sender had no room for the frame");
                Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "datalink sender buffer exhausted",
                ))
            }
        }
    }
}
