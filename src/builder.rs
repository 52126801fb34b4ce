use std::net::Ipv4Addr;

use crate::mac::MacAddress;
use crate::packet::{
    BootstrapMessage, DHCP_CLIENT_PORT, DHCP_SERVER_PORT, ETHERTYPE_IPV4, EthernetFrame,
    EthernetHeader, IPPROTO_UDP, Ipv4Header, UdpHeader,
};

pub const DEFAULT_TTL: u8 = 255;
pub const DEFAULT_TRANSACTION_ID: u32 = 123_123_123;

/// Builds the base DISCOVER frame sent out of `mac`'s interface.
///
/// `mac` fills both MAC-bearing fields until the flood overwrites them.
/// The IPv4 checksum is final: nothing the flood changes is covered by it.
pub fn build_discover_template(mac: MacAddress) -> EthernetFrame {
    let bootp = BootstrapMessage::discover(DEFAULT_TRANSACTION_ID, mac);

    let udp_length = (UdpHeader::LEN + BootstrapMessage::LEN) as u16;
    let udp = UdpHeader {
        source_port: DHCP_CLIENT_PORT,
        destination_port: DHCP_SERVER_PORT,
        length: udp_length,
        checksum: 0,
    };

    let mut ipv4 = Ipv4Header {
        tos: 0,
        total_length: Ipv4Header::LEN as u16 + udp_length,
        identification: 0,
        flags_offset: 0,
        ttl: DEFAULT_TTL,
        protocol: IPPROTO_UDP,
        checksum: 0,
        source: Ipv4Addr::UNSPECIFIED,
        destination: Ipv4Addr::BROADCAST,
    };
    ipv4.fill_checksum();

    EthernetFrame {
        ethernet: EthernetHeader {
            destination: MacAddress::BROADCAST,
            source: mac,
            ethertype: ETHERTYPE_IPV4,
        },
        ipv4,
        udp,
        bootp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::internet_checksum;
    use crate::packet::{BOOTP_OFFSET, IPV4_OFFSET, UDP_OFFSET};
    use dhcproto::v4;
    use dhcproto::{Decodable, Decoder};
    use pnet::packet::Packet;
    use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
    use pnet::packet::ipv4::{self, Ipv4Packet};
    use pnet::packet::udp::UdpPacket;

    fn template() -> EthernetFrame {
        build_discover_template("aa:bb:cc:dd:ee:ff".parse().unwrap())
    }

    #[test]
    fn test_lengths() {
        let frame = template();
        assert_eq!(frame.ipv4.total_length, 20 + 8 + 244);
        assert_eq!(frame.udp.length, 8 + 244);
        assert_eq!(frame.to_bytes().len(), 286);
    }

    #[test]
    fn test_fixed_fields() {
        let frame = template();
        assert!(frame.ethernet.destination.is_broadcast());
        assert_eq!(frame.ethernet.ethertype, 0x0800);
        assert_eq!(frame.ipv4.protocol, 17);
        assert_eq!(frame.ipv4.source, Ipv4Addr::UNSPECIFIED);
        assert_eq!(frame.ipv4.destination, Ipv4Addr::BROADCAST);
        assert_eq!(frame.udp.checksum, 0);
        assert_eq!(frame.ethernet.source, frame.bootp.client_hw_addr);
    }

    #[test]
    fn test_checksum_matches_recomputation() {
        let bytes = template().to_bytes();
        let mut header = [0u8; Ipv4Header::LEN];
        header.copy_from_slice(&bytes[IPV4_OFFSET..UDP_OFFSET]);
        let stored = u16::from_be_bytes([header[10], header[11]]);
        header[10] = 0;
        header[11] = 0;
        assert_eq!(internet_checksum(&header), stored);
        assert_eq!(stored, 0xbadd);
    }

    #[test]
    fn test_pnet_agrees_on_layout() {
        let bytes = template().to_bytes();

        let eth = EthernetPacket::new(&bytes).unwrap();
        assert_eq!(eth.get_ethertype(), EtherTypes::Ipv4);
        assert_eq!(eth.get_source().to_string(), "aa:bb:cc:dd:ee:ff");

        let ip = Ipv4Packet::new(eth.payload()).unwrap();
        assert_eq!(ip.get_version(), 4);
        assert_eq!(ip.get_header_length(), 5);
        assert_eq!(ip.get_ttl(), DEFAULT_TTL);
        assert_eq!(ip.get_checksum(), ipv4::checksum(&ip));

        let udp = UdpPacket::new(ip.payload()).unwrap();
        assert_eq!(udp.get_source(), 68);
        assert_eq!(udp.get_destination(), 67);
        assert_eq!(usize::from(udp.get_length()), bytes.len() - UDP_OFFSET);
    }

    #[test]
    fn test_dhcproto_decodes_discover() {
        let bytes = template().to_bytes();
        let msg = v4::Message::decode(&mut Decoder::new(&bytes[BOOTP_OFFSET..])).unwrap();

        assert_eq!(msg.opcode(), v4::Opcode::BootRequest);
        assert_eq!(msg.htype(), v4::HType::Eth);
        assert_eq!(msg.xid(), DEFAULT_TRANSACTION_ID);
        assert!(msg.flags().broadcast());
        assert_eq!(&msg.chaddr()[..6], &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(msg.opts().msg_type(), Some(v4::MessageType::Discover));
        assert_eq!(msg.opts().iter().count(), 1);
    }
}
