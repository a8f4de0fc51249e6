use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use url::Url;

use crate::CONNECTIVITY_FALLBACK_PROBES;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProbeTarget {
    pub(crate) host: String,
    pub(crate) port: u16,
}

/// The content host comes first, followed by well-known public endpoints so a
/// single unreachable host does not mark the machine offline.
pub(crate) fn probe_targets(content_url: &Url) -> Vec<ProbeTarget> {
    let mut targets = Vec::new();
    if let Some(host) = content_url.host_str() {
        targets.push(ProbeTarget {
            host: host.to_string(),
            port: content_url.port_or_known_default().unwrap_or(443),
        });
    }
    for (host, port) in CONNECTIVITY_FALLBACK_PROBES {
        let target = ProbeTarget {
            host: (*host).to_string(),
            port: *port,
        };
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}

pub(crate) fn probe(target: &ProbeTarget, timeout: Duration) -> bool {
    let addrs = match (target.host.as_str(), target.port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

/// Blocking; each probe is bounded by `timeout`.
pub(crate) fn is_online<L>(targets: &[ProbeTarget], timeout: Duration, log: L) -> bool
where
    L: Fn(&str),
{
    for target in targets {
        if probe(target, timeout) {
            log(&format!(
                "connectivity probe succeeded: {}:{}",
                target.host, target.port
            ));
            return true;
        }
        log(&format!(
            "connectivity probe failed: {}:{}",
            target.host, target.port
        ));
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    fn local_target(port: u16) -> ProbeTarget {
        ProbeTarget {
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    #[test]
    fn probe_targets_start_with_content_host() {
        let url = Url::parse("https://heywalnut.com/").expect("url");
        let targets = probe_targets(&url);
        assert_eq!(
            targets[0],
            ProbeTarget {
                host: "heywalnut.com".to_string(),
                port: 443
            }
        );
        assert_eq!(targets.len(), 1 + CONNECTIVITY_FALLBACK_PROBES.len());
    }

    #[test]
    fn probe_targets_keep_explicit_port() {
        let url = Url::parse("http://localhost:3000/").expect("url");
        assert_eq!(probe_targets(&url)[0].port, 3000);
    }

    #[test]
    fn is_online_when_any_probe_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let open_port = listener.local_addr().expect("local addr").port();
        let closed_port = {
            let closed = TcpListener::bind("127.0.0.1:0").expect("bind closed");
            closed.local_addr().expect("local addr").port()
        };

        let targets = [local_target(closed_port), local_target(open_port)];
        assert!(is_online(&targets, Duration::from_millis(500), |_| {}));
    }

    #[test]
    fn is_offline_when_every_probe_fails() {
        let closed_port = {
            let closed = TcpListener::bind("127.0.0.1:0").expect("bind closed");
            closed.local_addr().expect("local addr").port()
        };
        let unresolvable = ProbeTarget {
            host: "walnut.invalid".to_string(),
            port: 443,
        };

        let targets = [local_target(closed_port), unresolvable];
        assert!(!is_online(&targets, Duration::from_millis(200), |_| {}));
    }
}
