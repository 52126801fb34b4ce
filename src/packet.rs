//! Wire model of a DHCP DISCOVER frame.
//!
//! Each header has an explicit `to_bytes` / `from_bytes` pair; fields sit
//! at the offsets listed on each type, all multi-byte integers big-endian,
//! with no padding between headers.

use std::net::Ipv4Addr;

use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::IpNextHeaderProtocols;

use crate::checksum::{internet_checksum, verify};
use crate::error::{Error, Result};
use crate::mac::MacAddress;

pub const ETHERTYPE_IPV4: u16 = EtherTypes::Ipv4.0;
pub const IPPROTO_UDP: u8 = IpNextHeaderProtocols::Udp.0;

pub const DHCP_CLIENT_PORT: u16 = 68;
pub const DHCP_SERVER_PORT: u16 = 67;

pub const BOOTREQUEST: u8 = 1;
pub const HTYPE_ETHERNET: u8 = 1;
/// Asks the server to broadcast its reply; we have no address yet.
pub const BOOTP_FLAG_BROADCAST: u16 = 0x8000;
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

pub const DHCP_OPTION_MESSAGE_TYPE: u8 = 53;
pub const DHCP_OPTION_END: u8 = 0xff;
pub const DHCPDISCOVER: u8 = 1;

/// Offset of the IPv4 header within a frame.
pub const IPV4_OFFSET: usize = EthernetHeader::LEN;
/// Offset of the UDP header within a frame.
pub const UDP_OFFSET: usize = IPV4_OFFSET + Ipv4Header::LEN;
/// Offset of the BOOTP message within a frame.
pub const BOOTP_OFFSET: usize = UDP_OFFSET + UdpHeader::LEN;
/// Offset of the BOOTP client hardware address within a frame.
pub const CLIENT_HW_ADDR_OFFSET: usize = BOOTP_OFFSET + BootstrapMessage::CHADDR_OFFSET;

fn be16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn be32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn ipv4(bytes: &[u8], at: usize) -> Ipv4Addr {
    Ipv4Addr::new(bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3])
}

fn ensure_len(what: &'static str, bytes: &[u8], needed: usize) -> Result<()> {
    if bytes.len() < needed {
        return Err(Error::truncated(what, needed, bytes.len()));
    }
    Ok(())
}

/// Ethernet II header.
///
/// | offset | field       |
/// |--------|-------------|
/// | 0..6   | destination |
/// | 6..12  | source      |
/// | 12..14 | ethertype   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub destination: MacAddress,
    pub source: MacAddress,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub const LEN: usize = 14;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0..6].copy_from_slice(&self.destination.octets());
        buf[6..12].copy_from_slice(&self.source.octets());
        buf[12..14].copy_from_slice(&self.ethertype.to_be_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("Ethernet header", bytes, Self::LEN)?;
        Ok(EthernetHeader {
            destination: MacAddress::from_slice(&bytes[0..6])?,
            source: MacAddress::from_slice(&bytes[6..12])?,
            ethertype: be16(bytes, 12),
        })
    }
}

/// IPv4 header without options.
///
/// | offset | field                  |
/// |--------|------------------------|
/// | 0      | version / IHL (`0x45`) |
/// | 1      | TOS                    |
/// | 2..4   | total length           |
/// | 4..6   | identification         |
/// | 6..8   | flags / fragment offset|
/// | 8      | TTL                    |
/// | 9      | protocol               |
/// | 10..12 | header checksum        |
/// | 12..16 | source address         |
/// | 16..20 | destination address    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    pub const LEN: usize = 20;
    pub const VERSION_IHL: u8 = 0x45;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0] = Self::VERSION_IHL;
        buf[1] = self.tos;
        buf[2..4].copy_from_slice(&self.total_length.to_be_bytes());
        buf[4..6].copy_from_slice(&self.identification.to_be_bytes());
        buf[6..8].copy_from_slice(&self.flags_offset.to_be_bytes());
        buf[8] = self.ttl;
        buf[9] = self.protocol;
        buf[10..12].copy_from_slice(&self.checksum.to_be_bytes());
        buf[12..16].copy_from_slice(&self.source.octets());
        buf[16..20].copy_from_slice(&self.destination.octets());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("IPv4 header", bytes, Self::LEN)?;
        if bytes[0] != Self::VERSION_IHL {
            return Err(Error::invalid("IPv4 version/IHL", bytes[0]));
        }
        Ok(Ipv4Header {
            tos: bytes[1],
            total_length: be16(bytes, 2),
            identification: be16(bytes, 4),
            flags_offset: be16(bytes, 6),
            ttl: bytes[8],
            protocol: bytes[9],
            checksum: be16(bytes, 10),
            source: ipv4(bytes, 12),
            destination: ipv4(bytes, 16),
        })
    }

    /// Checksum of this header with the checksum field taken as zero.
    pub fn compute_checksum(&self) -> u16 {
        let zeroed = Ipv4Header {
            checksum: 0,
            ..*self
        };
        internet_checksum(&zeroed.to_bytes())
    }

    pub fn fill_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }

    pub fn has_valid_checksum(&self) -> bool {
        verify(&self.to_bytes())
    }
}

/// UDP header.
///
/// | offset | field            |
/// |--------|------------------|
/// | 0..2   | source port      |
/// | 2..4   | destination port |
/// | 4..6   | length           |
/// | 6..8   | checksum         |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub length: u16,
    /// Zero means "not computed", which IPv4 permits.
    pub checksum: u16,
}

impl UdpHeader {
    pub const LEN: usize = 8;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0..2].copy_from_slice(&self.source_port.to_be_bytes());
        buf[2..4].copy_from_slice(&self.destination_port.to_be_bytes());
        buf[4..6].copy_from_slice(&self.length.to_be_bytes());
        buf[6..8].copy_from_slice(&self.checksum.to_be_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("UDP header", bytes, Self::LEN)?;
        Ok(UdpHeader {
            source_port: be16(bytes, 0),
            destination_port: be16(bytes, 2),
            length: be16(bytes, 4),
            checksum: be16(bytes, 6),
        })
    }
}

/// A single fixed-length DHCP option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpOption {
    pub code: u8,
    pub value: u8,
}

impl DhcpOption {
    pub const LEN: usize = 3;

    pub const fn message_type(value: u8) -> Self {
        DhcpOption {
            code: DHCP_OPTION_MESSAGE_TYPE,
            value,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        [self.code, 1, self.value]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("DHCP option", bytes, Self::LEN)?;
        if bytes[1] != 1 {
            return Err(Error::invalid("DHCP option length", bytes[1]));
        }
        Ok(DhcpOption {
            code: bytes[0],
            value: bytes[2],
        })
    }
}

/// BOOTP message carrying a single DHCP Message Type option.
///
/// | offset   | field                          |
/// |----------|--------------------------------|
/// | 0        | op                             |
/// | 1        | htype                          |
/// | 2        | hlen                           |
/// | 3        | hops                           |
/// | 4..8     | transaction id                 |
/// | 8..10    | seconds elapsed                |
/// | 10..12   | flags                          |
/// | 12..28   | ciaddr, yiaddr, siaddr, giaddr |
/// | 28..34   | client hardware address        |
/// | 34..44   | hardware address padding       |
/// | 44..108  | server host name               |
/// | 108..236 | boot file name                 |
/// | 236..240 | magic cookie                   |
/// | 240..243 | message type option            |
/// | 243      | end marker                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapMessage {
    pub op: u8,
    pub htype: u8,
    pub hlen: u8,
    pub hops: u8,
    pub transaction_id: u32,
    pub seconds_elapsed: u16,
    pub flags: u16,
    pub client_ip: Ipv4Addr,
    pub your_ip: Ipv4Addr,
    pub server_ip: Ipv4Addr,
    pub relay_ip: Ipv4Addr,
    pub client_hw_addr: MacAddress,
    pub server_name: [u8; 64],
    pub boot_file: [u8; 128],
    pub message_type: DhcpOption,
}

impl BootstrapMessage {
    pub const LEN: usize = Self::OPTIONS_OFFSET + DhcpOption::LEN + 1;

    const CHADDR_OFFSET: usize = 28;
    const CHADDR_PAD_OFFSET: usize = Self::CHADDR_OFFSET + MacAddress::LEN;
    const SNAME_OFFSET: usize = 44;
    const FILE_OFFSET: usize = 108;
    const COOKIE_OFFSET: usize = 236;
    const OPTIONS_OFFSET: usize = 240;
    const END_OFFSET: usize = Self::OPTIONS_OFFSET + DhcpOption::LEN;

    /// A DISCOVER from `client_hw_addr` with everything else zeroed.
    pub fn discover(transaction_id: u32, client_hw_addr: MacAddress) -> Self {
        BootstrapMessage {
            op: BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hlen: MacAddress::LEN as u8,
            hops: 0,
            transaction_id,
            seconds_elapsed: 0,
            flags: BOOTP_FLAG_BROADCAST,
            client_ip: Ipv4Addr::UNSPECIFIED,
            your_ip: Ipv4Addr::UNSPECIFIED,
            server_ip: Ipv4Addr::UNSPECIFIED,
            relay_ip: Ipv4Addr::UNSPECIFIED,
            client_hw_addr,
            server_name: [0; 64],
            boot_file: [0; 128],
            message_type: DhcpOption::message_type(DHCPDISCOVER),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0] = self.op;
        buf[1] = self.htype;
        buf[2] = self.hlen;
        buf[3] = self.hops;
        buf[4..8].copy_from_slice(&self.transaction_id.to_be_bytes());
        buf[8..10].copy_from_slice(&self.seconds_elapsed.to_be_bytes());
        buf[10..12].copy_from_slice(&self.flags.to_be_bytes());
        buf[12..16].copy_from_slice(&self.client_ip.octets());
        buf[16..20].copy_from_slice(&self.your_ip.octets());
        buf[20..24].copy_from_slice(&self.server_ip.octets());
        buf[24..28].copy_from_slice(&self.relay_ip.octets());
        buf[Self::CHADDR_OFFSET..Self::CHADDR_OFFSET + 6]
            .copy_from_slice(&self.client_hw_addr.octets());
        buf[Self::SNAME_OFFSET..Self::FILE_OFFSET].copy_from_slice(&self.server_name);
        buf[Self::FILE_OFFSET..Self::COOKIE_OFFSET].copy_from_slice(&self.boot_file);
        buf[Self::COOKIE_OFFSET..Self::OPTIONS_OFFSET].copy_from_slice(&DHCP_MAGIC_COOKIE);
        buf[Self::OPTIONS_OFFSET..Self::END_OFFSET].copy_from_slice(&self.message_type.to_bytes());
        buf[Self::END_OFFSET] = DHCP_OPTION_END;
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("BOOTP message", bytes, Self::LEN)?;

        if bytes[0] != BOOTREQUEST {
            return Err(Error::invalid("BOOTP op", bytes[0]));
        }
        if bytes[1] != HTYPE_ETHERNET {
            return Err(Error::invalid("BOOTP htype", bytes[1]));
        }
        if usize::from(bytes[2]) != MacAddress::LEN {
            return Err(Error::invalid("BOOTP hlen", bytes[2]));
        }
        // to_bytes always zeroes the rest of the 16-byte chaddr field.
        if let Some(&pad) = bytes[Self::CHADDR_PAD_OFFSET..Self::SNAME_OFFSET]
            .iter()
            .find(|&&b| b != 0)
        {
            return Err(Error::invalid("chaddr padding", pad));
        }
        let cookie = be32(bytes, Self::COOKIE_OFFSET);
        if cookie != u32::from_be_bytes(DHCP_MAGIC_COOKIE) {
            return Err(Error::invalid("DHCP magic cookie", cookie));
        }
        let message_type = DhcpOption::from_bytes(&bytes[Self::OPTIONS_OFFSET..])?;
        if message_type.code != DHCP_OPTION_MESSAGE_TYPE {
            return Err(Error::invalid("DHCP option code", message_type.code));
        }
        if bytes[Self::END_OFFSET] != DHCP_OPTION_END {
            return Err(Error::invalid("DHCP end marker", bytes[Self::END_OFFSET]));
        }

        let mut server_name = [0u8; 64];
        server_name.copy_from_slice(&bytes[Self::SNAME_OFFSET..Self::FILE_OFFSET]);
        let mut boot_file = [0u8; 128];
        boot_file.copy_from_slice(&bytes[Self::FILE_OFFSET..Self::COOKIE_OFFSET]);

        Ok(BootstrapMessage {
            op: bytes[0],
            htype: bytes[1],
            hlen: bytes[2],
            hops: bytes[3],
            transaction_id: be32(bytes, 4),
            seconds_elapsed: be16(bytes, 8),
            flags: be16(bytes, 10),
            client_ip: ipv4(bytes, 12),
            your_ip: ipv4(bytes, 16),
            server_ip: ipv4(bytes, 20),
            relay_ip: ipv4(bytes, 24),
            client_hw_addr: MacAddress::from_slice(&bytes[Self::CHADDR_OFFSET..])?,
            server_name,
            boot_file,
            message_type,
        })
    }
}

/// The complete on-wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetFrame {
    pub ethernet: EthernetHeader,
    pub ipv4: Ipv4Header,
    pub udp: UdpHeader,
    pub bootp: BootstrapMessage,
}

impl EthernetFrame {
    pub const LEN: usize = BOOTP_OFFSET + BootstrapMessage::LEN;

    /// Writes both MAC-bearing fields so they can never disagree.
    pub fn set_client_mac(&mut self, mac: MacAddress) {
        self.ethernet.source = mac;
        self.bootp.client_hw_addr = mac;
    }

    pub fn client_mac(&self) -> MacAddress {
        self.bootp.client_hw_addr
    }

    pub fn set_transaction_id(&mut self, xid: u32) {
        self.bootp.transaction_id = xid;
    }

    pub fn transaction_id(&self) -> u32 {
        self.bootp.transaction_id
    }

    pub fn write_to(&self, buf: &mut [u8; Self::LEN]) {
        buf[..IPV4_OFFSET].copy_from_slice(&self.ethernet.to_bytes());
        buf[IPV4_OFFSET..UDP_OFFSET].copy_from_slice(&self.ipv4.to_bytes());
        buf[UDP_OFFSET..BOOTP_OFFSET].copy_from_slice(&self.udp.to_bytes());
        buf[BOOTP_OFFSET..].copy_from_slice(&self.bootp.to_bytes());
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        self.write_to(&mut buf);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len("Ethernet frame", bytes, Self::LEN)?;

        let ethernet = EthernetHeader::from_bytes(bytes)?;
        if ethernet.ethertype != ETHERTYPE_IPV4 {
            return Err(Error::invalid("ethertype", ethernet.ethertype));
        }
        let ipv4 = Ipv4Header::from_bytes(&bytes[IPV4_OFFSET..])?;
        if ipv4.protocol != IPPROTO_UDP {
            return Err(Error::invalid("IP protocol", ipv4.protocol));
        }
        let udp = UdpHeader::from_bytes(&bytes[UDP_OFFSET..])?;
        let bootp = BootstrapMessage::from_bytes(&bytes[BOOTP_OFFSET..])?;

        Ok(EthernetFrame {
            ethernet,
            ipv4,
            udp,
            bootp,
        })
    }
}
