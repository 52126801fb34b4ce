use std::fmt;
use std::str::FromStr;

use pnet::datalink::MacAddr;
use rand::Rng;

use crate::error::{Error, Result};

/// Multicast (group) bit of the first octet.
const GROUP_BIT: u8 = 0b01;
/// Locally administered bit of the first octet.
const LOCAL_BIT: u8 = 0b10;

/// A 48-bit Ethernet hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const LEN: usize = 6;
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }

    /// Copies the first six bytes of `bytes` into an address.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let octets: [u8; 6] = bytes
            .get(..Self::LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| Error::truncated("hardware address", Self::LEN, bytes.len()))?;
        Ok(MacAddress(octets))
    }

    /// Draws a random address that is unicast and globally administered.
    pub fn random_unicast<R: Rng>(rng: &mut R) -> Self {
        let mut octets = [0u8; 6];
        rng.fill(&mut octets);
        MacAddress(octets).into_unicast()
    }

    /// Clears the group and locally administered bits.
    pub const fn into_unicast(self) -> Self {
        let mut octets = self.0;
        octets[0] &= !(GROUP_BIT | LOCAL_BIT);
        MacAddress(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub const fn is_multicast(&self) -> bool {
        self.0[0] & GROUP_BIT != 0
    }

    pub const fn is_locally_administered(&self) -> bool {
        self.0[0] & LOCAL_BIT != 0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }
}

impl From<MacAddr> for MacAddress {
    fn from(mac: MacAddr) -> Self {
        let MacAddr(a, b, c, d, e, f) = mac;
        MacAddress([a, b, c, d, e, f])
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MacAddr::from_str(s)
            .map(MacAddress::from)
            .map_err(|_| Error::InvalidMacAddress(s.to_string()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_unicast_clears_low_bits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let mac = MacAddress::random_unicast(&mut rng);
            assert_eq!(mac.octets()[0] & 0b11, 0, "{mac}");
            assert!(!mac.is_multicast());
            assert!(!mac.is_locally_administered());
        }
    }

    #[test]
    fn test_into_unicast_only_touches_low_bits() {
        let mac = MacAddress::new([0xff, 0x01, 0x02, 0x03, 0x04, 0x05]).into_unicast();
        assert_eq!(mac.octets(), [0xfc, 0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn test_parse_and_display() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
        assert!(matches!(
            "not-a-mac".parse::<MacAddress>(),
            Err(Error::InvalidMacAddress(ref s)) if s == "not-a-mac"
        ));
        assert!("aa:bb:cc:dd:ee".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_from_slice() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            MacAddress::from_slice(&bytes).unwrap().octets(),
            [1, 2, 3, 4, 5, 6]
        );
        assert!(matches!(
            MacAddress::from_slice(&bytes[..4]),
            Err(Error::Truncated { needed: 6, actual: 4, .. })
        ));
    }

    #[test]
    fn test_pnet_conversion() {
        let pnet_mac = MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55);
        assert_eq!(
            MacAddress::from(pnet_mac).octets(),
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]
        );
        assert!(MacAddress::BROADCAST.is_broadcast());
    }
}
