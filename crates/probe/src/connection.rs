//! Connection records as delivered by a connection source.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Process owning the local end of a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Process id; `0` means the source could not attribute the socket.
    pub pid: u32,
    pub name: String,
}

/// One active connection in a snapshot, as observed on the local host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub local_address: IpAddr,
    pub local_port: u16,
    pub remote_address: IpAddr,
    pub remote_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
}

impl Connection {
    pub fn new(local_address: IpAddr, local_port: u16, remote_address: IpAddr, remote_port: u16) -> Self {
        Self {
            local_address,
            local_port,
            remote_address,
            remote_port,
            process: None,
        }
    }

    pub fn with_process(mut self, pid: u32, name: impl Into<String>) -> Self {
        self.process = Some(Process {
            pid,
            name: name.into(),
        });
        self
    }

    /// The owning process, if the connection carries a usable process id.
    pub fn attributed_process(&self) -> Option<&Process> {
        self.process.as_ref().filter(|p| p.pid > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        Connection::new("10.0.0.1".parse().unwrap(), 5000, "10.0.0.2".parse().unwrap(), 80)
    }

    #[test]
    fn test_attributed_process_requires_positive_pid() {
        assert!(conn().attributed_process().is_none());
        assert!(conn().with_process(0, "kernel").attributed_process().is_none());
        assert_eq!(conn().with_process(7, "curl").attributed_process().unwrap().name, "curl");
    }

    #[test]
    fn test_process_is_optional_in_json() {
        let doc = r#"{"local_address":"10.0.0.1","local_port":5000,"remote_address":"10.0.0.2","remote_port":80}"#;
        let parsed: Connection = serde_json::from_str(doc).unwrap();
        assert_eq!(parsed, conn());
    }
}
