use dnsproxy_application::ports::{HostsReloadPort, UpstreamExchanger};
use dnsproxy_application::use_cases::{
    ChaosIdentity, HandleDnsQueryUseCase, ResolveQuestionsUseCase,
};
use dnsproxy_domain::{AuthoritySelector, Config};
use dnsproxy_infrastructure::dns::{
    CachedExchanger, FailoverExchanger, HostsFile, ResponseCache, UpstreamClient, WireClient,
};
use dnsproxy_jobs::HostsReloadJob;
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub hosts: Arc<HostsFile>,
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let authorities = config.authorities()?;
        for authority in &authorities {
            info!(
                authority = %authority,
                timeout_ms = authority.timeout.as_millis() as u64,
                "Authority configured"
            );
        }
        let selector = Arc::new(AuthoritySelector::new(authorities));

        let hosts = Arc::new(HostsFile::from_config(&config.hosts).await?);
        let exchanger = Self::build_exchanger(config);
        let identity = Self::chaos_identity(config);

        info!(
            version = %identity.version,
            hostname = %identity.hostname,
            "CHAOS identity"
        );

        let resolver = Arc::new(
            ResolveQuestionsUseCase::new(hosts.clone(), exchanger)
                .with_identity(identity)
                .with_hosts_ttl(config.hosts.ttl),
        );
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(selector, resolver));

        info!("DNS services initialized");

        Ok(Self {
            hosts,
            handler_use_case,
        })
    }

    /// Poller for the hosts file, when there is a file and polling is enabled.
    pub fn hosts_reload_job(&self, config: &Config) -> Option<HostsReloadJob> {
        self.hosts.path()?;
        let interval = config.hosts.poll_interval()?;

        Some(
            HostsReloadJob::new(self.hosts.clone() as Arc<dyn HostsReloadPort>)
                .with_interval(interval),
        )
    }

    fn build_exchanger(config: &Config) -> Arc<dyn UpstreamExchanger> {
        let client: Arc<dyn UpstreamClient> = Arc::new(WireClient::new());
        let failover = Arc::new(FailoverExchanger::new(client));

        info!(
            max_entries = config.cache.max_entries,
            ttl_secs = config.cache.ttl_secs,
            "Response cache enabled"
        );

        Arc::new(CachedExchanger::new(
            failover,
            Arc::new(ResponseCache::new(config.cache.max_entries)),
            config.cache.ttl(),
        ))
    }

    fn chaos_identity(config: &Config) -> ChaosIdentity {
        let version = config
            .server
            .version
            .clone()
            .unwrap_or_else(|| format!("dnsproxy-{}", env!("CARGO_PKG_VERSION")));

        let hostname = config.server.identity.clone().unwrap_or_else(|| {
            hostname::get()
                .ok()
                .and_then(|name| name.into_string().ok())
                .unwrap_or_else(|| "localhost".to_string())
        });

        ChaosIdentity::new(version, hostname)
    }
}
