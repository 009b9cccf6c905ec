use async_trait::async_trait;
use dnsproxy_application::ports::{HostsReloadPort, ReloadOutcome};
use dnsproxy_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct MockHostsReloadPort {
    calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockHostsReloadPort {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostsReloadPort for MockHostsReloadPort {
    async fn reload_if_changed(&self) -> Result<ReloadOutcome, DomainError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("stat /etc/hosts: denied".to_string()));
        }
        if n == 0 {
            Ok(ReloadOutcome::Reloaded { entries: 3 })
        } else {
            Ok(ReloadOutcome::Unchanged)
        }
    }
}
