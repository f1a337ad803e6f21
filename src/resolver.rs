// src/resolver.rs
use crate::types::{FailureReason, ResolutionOutcome, ResolverConfig, ScanError};
use async_trait::async_trait;
use log::{debug, trace};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use trust_dns_resolver::config::{
    LookupIpStrategy, NameServerConfig, Protocol, ResolverConfig as DnsResolverConfig, ResolverOpts,
};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::TokioAsyncResolver;

/// Address lookup for a single name. Implementations must turn every network
/// failure into `ResolutionOutcome::Failure` instead of erroring out.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, fqdn: &str) -> ResolutionOutcome;
}

pub struct Resolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl Resolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, ScanError> {
        if config.timeout.is_zero() {
            return Err(ScanError::ConfigError("Resolver timeout must be greater than 0".to_string()));
        }

        let (resolver_config, mut opts) = if config.use_system_resolver && config.nameservers.is_empty() {
            trust_dns_resolver::system_conf::read_system_conf()
                .map_err(|e| ScanError::ResolverError(format!("Failed to read system resolver config: {}", e)))?
        } else {
            if config.nameservers.is_empty() {
                return Err(ScanError::ConfigError(
                    "No nameservers configured and system resolver disabled".to_string(),
                ));
            }

            let mut resolver_config = DnsResolverConfig::new();

            for ns in &config.nameservers {
                let socket_addr = SocketAddr::from_str(ns)
                    .map_err(|e| ScanError::ConfigError(format!("Invalid nameserver address {}: {}", ns, e)))?;
                resolver_config.add_name_server(NameServerConfig {
                    socket_addr,
                    protocol: Protocol::Udp,
                    tls_dns_name: None,
                    trust_negative_responses: true,
                    bind_addr: None,
                });
            }

            (resolver_config, ResolverOpts::default())
        };

        // One attempt per lookup so the configured timeout is the whole budget.
        opts.timeout = config.timeout;
        opts.attempts = 1;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        debug!(
            "Resolver ready with {} nameserver(s), timeout {:?}",
            resolver_config.name_servers().len(),
            config.timeout
        );

        Ok(Self::with_dns_config(resolver_config, opts, config.timeout))
    }

    fn with_dns_config(resolver_config: DnsResolverConfig, opts: ResolverOpts, timeout: Duration) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
            timeout,
        }
    }
}

/// Root-anchored form of `fqdn`, so the resolver never appends search domains.
fn absolute_name(fqdn: &str) -> String {
    if fqdn.ends_with('.') {
        fqdn.to_string()
    } else {
        format!("{}.", fqdn)
    }
}

#[async_trait]
impl Resolve for Resolver {
    async fn resolve(&self, fqdn: &str) -> ResolutionOutcome {
        let name = absolute_name(fqdn);
        let lookup = match tokio::time::timeout(self.timeout, self.resolver.lookup_ip(name.as_str())).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                let reason = classify(&e);
                trace!("{}: {} ({})", fqdn, reason, e);
                return ResolutionOutcome::failure(reason);
            }
            Err(_) => {
                trace!("{}: lookup exceeded {:?}", fqdn, self.timeout);
                return ResolutionOutcome::failure(FailureReason::Timeout);
            }
        };

        let addresses: Vec<_> = lookup.iter().collect();
        if addresses.is_empty() {
            return ResolutionOutcome::failure(FailureReason::Other);
        }
        ResolutionOutcome::Success { addresses }
    }
}

pub fn classify(error: &ResolveError) -> FailureReason {
    match error.kind() {
        ResolveErrorKind::Timeout => FailureReason::Timeout,
        ResolveErrorKind::NoRecordsFound { response_code, .. } if *response_code == ResponseCode::NXDomain => {
            FailureReason::NxDomain
        }
        _ => FailureReason::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::{Arc, Mutex};
    use tokio::net::UdpSocket;
    use trust_dns_resolver::proto::op::{Message, MessageType, OpCode};
    use trust_dns_resolver::proto::rr::{Name, RData, Record};
    use trust_dns_resolver::proto::serialize::binary::BinEncodable;

    /// Loopback DNS server: `www.example.com.` is 1.2.3.4, anything under
    /// `corp.test.` is a wildcard 10.9.9.9, everything else is NXDOMAIN.
    async fn spawn_stub_server() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(Mutex::new(Vec::new()));
        let seen = queries.clone();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            loop {
                let (len, peer) = match socket.recv_from(&mut buf).await {
                    Ok(received) => received,
                    Err(_) => continue,
                };
                let request = match Message::from_vec(&buf[..len]) {
                    Ok(request) => request,
                    Err(_) => continue,
                };
                let Some(query) = request.queries().first().cloned() else {
                    continue;
                };
                let qname = query.name().to_string().to_lowercase();
                seen.lock().unwrap().push(qname.clone());

                let mut response = Message::new();
                response
                    .set_id(request.id())
                    .set_message_type(MessageType::Response)
                    .set_op_code(OpCode::Query)
                    .set_recursion_desired(true)
                    .set_recursion_available(true)
                    .add_query(query.clone());

                let answer = if qname == "www.example.com." {
                    Some(Ipv4Addr::new(1, 2, 3, 4))
                } else if qname.ends_with(".corp.test.") {
                    Some(Ipv4Addr::new(10, 9, 9, 9))
                } else {
                    None
                };
                match answer {
                    Some(ip) => {
                        response.add_answer(Record::from_rdata(query.name().clone(), 60, RData::A(ip.into())));
                    }
                    None => {
                        response.set_response_code(ResponseCode::NXDomain);
                    }
                }

                if let Ok(bytes) = response.to_bytes() {
                    let _ = socket.send_to(&bytes, peer).await;
                }
            }
        });

        (addr, queries)
    }

    fn resolver_with_search_domain(server: SocketAddr) -> Resolver {
        let nameserver = NameServerConfig {
            socket_addr: server,
            protocol: Protocol::Udp,
            tls_dns_name: None,
            trust_negative_responses: true,
            bind_addr: None,
        };
        let search = vec![Name::from_ascii("corp.test.").unwrap()];
        let dns_config = DnsResolverConfig::from_parts(None, search, vec![nameserver]);

        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_secs(2);
        opts.attempts = 1;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        Resolver::with_dns_config(dns_config, opts, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_search_domains_never_applied() {
        let (server, queries) = spawn_stub_server().await;
        let resolver = resolver_with_search_domain(server);

        let outcome = resolver.resolve("nope.example.com").await;

        assert_eq!(outcome, ResolutionOutcome::failure(FailureReason::NxDomain));
        assert_eq!(*queries.lock().unwrap(), vec!["nope.example.com.".to_string()]);
    }

    #[tokio::test]
    async fn test_exact_name_resolves() {
        let (server, queries) = spawn_stub_server().await;
        let resolver = resolver_with_search_domain(server);

        let outcome = resolver.resolve("www.example.com").await;

        assert_eq!(
            outcome,
            ResolutionOutcome::Success {
                addresses: vec![IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))]
            }
        );
        assert_eq!(*queries.lock().unwrap(), vec!["www.example.com.".to_string()]);
    }

    #[test]
    fn test_absolute_name() {
        assert_eq!(absolute_name("www.example.com"), "www.example.com.");
        assert_eq!(absolute_name("www.example.com."), "www.example.com.");
    }

    #[test]
    fn test_classify_timeout() {
        let err = ResolveError::from(ResolveErrorKind::Timeout);
        assert_eq!(classify(&err), FailureReason::Timeout);
    }

    #[test]
    fn test_classify_other() {
        let err = ResolveError::from(ResolveErrorKind::Message("connection refused"));
        assert_eq!(classify(&err), FailureReason::Other);
    }

    #[tokio::test]
    async fn test_invalid_nameserver_is_config_error() {
        let config = ResolverConfig {
            nameservers: vec!["not-an-address".to_string()],
            use_system_resolver: false,
            ..ResolverConfig::default()
        };

        match Resolver::new(&config) {
            Err(ScanError::ConfigError(msg)) => assert!(msg.contains("not-an-address")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let config = ResolverConfig {
            timeout: Duration::ZERO,
            nameservers: vec!["127.0.0.1:53".to_string()],
            use_system_resolver: false,
        };
        assert!(matches!(Resolver::new(&config), Err(ScanError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_custom_nameservers_build() {
        let config = ResolverConfig {
            nameservers: vec!["127.0.0.1:53".to_string(), "[::1]:53".to_string()],
            use_system_resolver: false,
            ..ResolverConfig::default()
        };
        assert!(Resolver::new(&config).is_ok());
    }
}
