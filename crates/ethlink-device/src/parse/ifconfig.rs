//! BSD / macOS `ifconfig` inventory parser

use crate::{Error, LinkStatus, NetworkInterface};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Interface block being assembled while walking the output
struct Block {
    name: String,
    flags: Vec<String>,
    media_status: Option<String>,
    addresses: Vec<Ipv4Network>,
}

impl Block {
    fn finish(self) -> NetworkInterface {
        let has = |flag: &str| self.flags.iter().any(|f| f == flag);

        let status = if !has("UP") {
            LinkStatus::Down
        } else {
            match self.media_status.as_deref() {
                Some("active") => LinkStatus::Up,
                Some("inactive") => LinkStatus::Disconnected,
                Some(_) => LinkStatus::Unknown,
                None if has("RUNNING") => LinkStatus::Up,
                None => LinkStatus::Disconnected,
            }
        };

        self.addresses
            .into_iter()
            .fold(NetworkInterface::new(self.name, status), |iface, net| {
                iface.with_address(net)
            })
    }
}

/// Converts a netmask (`0xffffff00` or `255.255.255.0`) into a prefix length
///
/// # Errors
/// * `Error::Inventory` - If the mask isn't parsable or isn't contiguous
pub fn prefix_from_mask(mask: &str) -> Result<u8, Error> {
    let bits = match mask.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16)
            .map_err(|_| Error::Inventory(format!("invalid netmask '{}'", mask)))?,
        None => {
            let ip: Ipv4Addr = mask
                .parse()
                .map_err(|_| Error::Inventory(format!("invalid netmask '{}'", mask)))?;
            u32::from(ip)
        }
    };

    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(Error::Inventory(format!("non-contiguous netmask '{}'", mask)));
    }

    Ok(bits.leading_ones() as u8)
}

/// Parses a single `inet <ip> netmask <mask> ...` line
fn parse_inet(line: &str) -> Result<Ipv4Network, Error> {
    let mut tokens = line.split_whitespace().skip(1);
    let ip = tokens
        .next()
        .ok_or_else(|| Error::Inventory(format!("missing address in '{}'", line)))?;
    let ip: Ipv4Addr = ip
        .parse()
        .map_err(|_| Error::Inventory(format!("invalid ipv4 address '{}'", ip)))?;

    let mut prefix = 32;
    while let Some(token) = tokens.next() {
        if token == "netmask" {
            let mask = tokens
                .next()
                .ok_or_else(|| Error::Inventory(format!("missing netmask in '{}'", line)))?;
            prefix = prefix_from_mask(mask)?;
        }
    }

    Ipv4Network::new(ip, prefix).map_err(|error| Error::Inventory(error.to_string()))
}

/// Parses the text printed by `ifconfig` (all interfaces)
///
/// # Arguments
/// * `text` - Raw stdout of `ifconfig`
///
/// # Errors
/// * `Error::Inventory` - If a header, address or netmask line is malformed
pub fn parse(text: &str) -> Result<Vec<NetworkInterface>, Error> {
    let mut interfaces = Vec::new();
    let mut current: Option<Block> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // interface headers start in column zero, details are indented
        if !line.starts_with(char::is_whitespace) {
            if let Some(block) = current.take() {
                interfaces.push(block.finish());
            }

            let (name, rest) = line
                .split_once(':')
                .ok_or_else(|| Error::Inventory(format!("unexpected header '{}'", line)))?;
            let flags = rest
                .split_once('<')
                .and_then(|(_, tail)| tail.split_once('>'))
                .map(|(flags, _)| flags.split(',').map(str::to_string).collect())
                .unwrap_or_default();

            current = Some(Block {
                name: name.to_string(),
                flags,
                media_status: None,
                addresses: Vec::new(),
            });
            continue;
        }

        let block = match current.as_mut() {
            Some(block) => block,
            None => return Err(Error::Inventory(format!("detail before header '{}'", line))),
        };

        let line = line.trim();
        if line.starts_with("inet ") {
            block.addresses.push(parse_inet(line)?);
        } else if let Some(status) = line.strip_prefix("status:") {
            block.media_status = Some(status.trim().to_string());
        }
    }

    if let Some(block) = current.take() {
        interfaces.push(block.finish());
    }

    Ok(interfaces)
}
