//! Internet checksum (RFC 1071) as used in the IPv4 header.

/// One's-complement sum of big-endian 16-bit words, complemented.
///
/// An odd trailing byte is padded with a zero low byte.
pub fn internet_checksum(data: &[u8]) -> u16 {
    let sum = data
        .chunks(2)
        .map(|word| match *word {
            [hi, lo] => u32::from(u16::from_be_bytes([hi, lo])),
            [hi] => u32::from(hi) << 8,
            _ => 0,
        })
        .sum::<u32>();
    !fold(sum)
}

/// Folds carries above bit 15 back into the low 16 bits until none remain.
fn fold(mut sum: u32) -> u16 {
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    sum as u16
}

/// A header carrying a correct checksum sums to zero.
pub fn verify(data: &[u8]) -> bool {
    internet_checksum(data) == 0
}
