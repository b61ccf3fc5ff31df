//! Local address discovery for self-serve uploads
//!
//! The board has to reach the embedded file server, so the URL handed to it
//! must use the address of the local interface that shares its subnet.

use std::net::IpAddr;

use crate::errors::{OtaError, Result};

/// One address assigned to a local network interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    pub ip: IpAddr,
    pub netmask: IpAddr,
}

impl InterfaceAddress {
    pub fn new(name: impl Into<String>, ip: IpAddr, netmask: IpAddr) -> Self {
        Self {
            name: name.into(),
            ip,
            netmask,
        }
    }

    /// Whether `target` lies inside this interface's subnet
    pub fn contains(&self, target: IpAddr) -> bool {
        match (self.ip, self.netmask, target) {
            (IpAddr::V4(ip), IpAddr::V4(mask), IpAddr::V4(target)) => {
                let mask = u32::from(mask);
                u32::from(ip) & mask == u32::from(target) & mask
            }
            (IpAddr::V6(ip), IpAddr::V6(mask), IpAddr::V6(target)) => {
                let mask = u128::from(mask);
                u128::from(ip) & mask == u128::from(target) & mask
            }
            _ => false,
        }
    }
}

/// First interface address whose subnet contains `target`
pub fn select_local_ip(target: IpAddr, interfaces: &[InterfaceAddress]) -> Option<IpAddr> {
    interfaces
        .iter()
        .find(|iface| iface.contains(target))
        .map(|iface| iface.ip)
}

/// Enumerate the addresses of all local interfaces
pub fn local_interfaces() -> Result<Vec<InterfaceAddress>> {
    let interfaces = if_addrs::get_if_addrs()
        .map_err(|e| OtaError::FileServer(format!("Failed to get network interfaces: {}", e)))?;

    Ok(interfaces
        .into_iter()
        .map(|iface| {
            let (ip, netmask) = match &iface.addr {
                if_addrs::IfAddr::V4(v4) => (IpAddr::V4(v4.ip), IpAddr::V4(v4.netmask)),
                if_addrs::IfAddr::V6(v6) => (IpAddr::V6(v6.ip), IpAddr::V6(v6.netmask)),
            };
            log::trace!("Network interface {}: {}/{}", iface.name, ip, netmask);
            InterfaceAddress::new(iface.name, ip, netmask)
        })
        .collect())
}

/// Addresses the board's host name or literal resolves to
pub async fn resolve_target(address: &str, port: u16) -> Result<Vec<IpAddr>> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let resolved = tokio::net::lookup_host((address, port))
        .await
        .map_err(|e| OtaError::LocalAddressNotFound(format!("{} ({})", address, e)))?;
    Ok(resolved.map(|addr| addr.ip()).collect())
}

/// Local address the board can use to reach this machine
pub async fn detect_local_ip(address: &str, port: u16) -> Result<IpAddr> {
    let targets = resolve_target(address, port).await?;
    let interfaces = local_interfaces()?;

    targets
        .into_iter()
        .find_map(|target| select_local_ip(target, &interfaces))
        .ok_or_else(|| OtaError::LocalAddressNotFound(address.to_string()))
}
