use clap::Parser;

use crate::flood::FloodConfig;

/// Floods a LAN with spoofed DHCP DISCOVERs to exhaust a server's pool.
#[derive(Parser, Debug)]
#[command(name = "dhcpstarve", version, about, long_about = None)]
pub struct Args {
    /// Network interface to send on
    #[arg(short, long)]
    pub interface: String,

    /// Stop after this many frames (default: run until killed)
    #[arg(short, long)]
    pub count: Option<u64>,

    /// Use this transaction id for every frame instead of a random one
    #[arg(short = 'x', long, value_parser = parse_xid)]
    pub xid: Option<u32>,

    /// Log level when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn flood_config(&self) -> FloodConfig {
        FloodConfig {
            max_frames: self.count,
            transaction_id: self.xid,
            ..FloodConfig::default()
        }
    }
}

/// Accepts decimal or `0x`-prefixed hex.
fn parse_xid(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid transaction id '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_interface_flag() {
        let args = Args::try_parse_from(["dhcpstarve", "-i", "eth0"]).unwrap();
        assert_eq!(args.interface, "eth0");
        assert_eq!(args.flood_config(), FloodConfig::default());
    }

    #[test]
    fn test_missing_interface_is_usage_error() {
        let err = Args::try_parse_from(["dhcpstarve"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Args::try_parse_from(["dhcpstarve", "-z", "eth0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_stray_argument_is_usage_error() {
        let err = Args::try_parse_from(["dhcpstarve", "-i", "eth0", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_flood_options() {
        let args =
            Args::try_parse_from(["dhcpstarve", "-i", "eth0", "-c", "100", "-x", "0x0756b5b3"])
                .unwrap();
        let config = args.flood_config();
        assert_eq!(config.max_frames, Some(100));
        assert_eq!(config.transaction_id, Some(123_123_123));
    }

    #[test]
    fn test_parse_xid() {
        assert_eq!(parse_xid("42"), Ok(42));
        assert_eq!(parse_xid("0XFF"), Ok(255));
        assert!(parse_xid("0xzz").is_err());
        assert!(parse_xid("-1").is_err());
    }
}
