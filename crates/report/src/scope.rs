//! Address scoping.
//!
//! Loopback addresses are reused by every host, so they only identify a node
//! once they are prefixed with the id of the host that observed them. Every
//! other address is taken to be unique across the merged graph already (for
//! example because it lives on an overlay network) and is left unscoped, so
//! the same remote node reported by two hosts collapses into one.
//!
//! IPv4-mapped IPv6 addresses (as seen on dual-stack sockets) are reduced to
//! their IPv4 form first, so `::ffff:127.0.0.1` is loopback and
//! `::ffff:10.0.0.5` names the same node as `10.0.0.5`.

use crate::error::{ReportError, Result};
use crate::id::{NodeId, ID_DELIM, SCOPE_DELIM};
use std::net::IpAddr;

/// Make an IP address unique over multiple hosts.
pub fn scoped_ip(host_id: &str, ip: IpAddr) -> NodeId {
    let ip = ip.to_canonical();
    if ip.is_loopback() {
        return NodeId::new(format!("{}{}{}", host_id, SCOPE_DELIM, ip));
    }
    NodeId::new(format!("{}{}", SCOPE_DELIM, ip))
}

/// Make an IP address + port tuple unique over multiple hosts.
pub fn scoped_ip_port(host_id: &str, ip: IpAddr, port: u16) -> NodeId {
    NodeId::new(format!("{}{}{}", scoped_ip(host_id, ip), SCOPE_DELIM, port))
}

/// Check that `host_id` can be embedded in composite ids and split back out.
pub fn validate_host_id(host_id: &str) -> Result<()> {
    if host_id.is_empty() || host_id.contains(ID_DELIM) || host_id.contains(SCOPE_DELIM) {
        return Err(ReportError::InvalidHostId(host_id.to_string()));
    }
    Ok(())
}
