//! Online/offline detection for the timer service.
//!
//! "Online" means the server's host accepts a TCP connection within the probe
//! timeout. `forced_offline` short-circuits everything, which is how the
//! `--offline` flag and the `offline` config key work.

use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentOnline,
    WentOffline,
}

#[derive(Debug, Clone)]
pub struct Connectivity {
    target: Option<(String, u16)>,
    forced_offline: bool,
    probe_timeout: Duration,
    last: Option<bool>,
}

impl Connectivity {
    pub fn for_server(server_url: &str, forced_offline: bool, probe_timeout: Duration) -> Self {
        let target = Url::parse(server_url).ok().and_then(|url| {
            let host = url.host_str()?.to_string();
            let port = url.port_or_known_default()?;
            Some((host, port))
        });

        Self {
            target,
            forced_offline,
            probe_timeout,
            last: None,
        }
    }

    /// Always offline; no probe is ever attempted.
    pub fn offline() -> Self {
        Self {
            target: None,
            forced_offline: true,
            probe_timeout: Duration::ZERO,
            last: None,
        }
    }

    pub fn last_known(&self) -> Option<bool> {
        self.last
    }

    pub async fn probe(&self) -> bool {
        if self.forced_offline {
            return false;
        }
        let Some((host, port)) = &self.target else {
            return false;
        };

        matches!(
            timeout(self.probe_timeout, TcpStream::connect((host.as_str(), *port))).await,
            Ok(Ok(_))
        )
    }

    /// Probe and report a change against the previous observation. The very
    /// first observation counts as a change when it finds the server up.
    pub async fn observe(&mut self) -> (bool, Option<Transition>) {
        let online = self.probe().await;
        let transition = match (self.last, online) {
            (Some(true), true) | (Some(false), false) | (None, false) => None,
            (_, true) => Some(Transition::WentOnline),
            (Some(true), false) => Some(Transition::WentOffline),
        };
        self.last = Some(online);
        (online, transition)
    }
}
