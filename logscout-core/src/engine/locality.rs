use nix::unistd::gethostname;

const LOOPBACK_MARKERS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    Local,
    Remote,
}

/// Decides whether a target host string names this process.
///
/// A target is local when it contains a loopback marker or, case-insensitively,
/// this process's hostname. When no hostname could be resolved every
/// non-loopback target is remote.
#[derive(Debug, Clone, Default)]
pub struct LocalityResolver {
    hostname: Option<String>,
}

impl LocalityResolver {
    pub fn new(hostname: Option<String>) -> Self {
        let hostname = hostname
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty());
        Self { hostname }
    }

    /// Uses `identity` when given, otherwise the kernel hostname, then `$HOSTNAME`.
    pub fn from_system(identity: Option<String>) -> Self {
        let resolved = identity
            .filter(|h| !h.trim().is_empty())
            .or_else(system_hostname);

        match &resolved {
            Some(h) => tracing::info!(hostname = %h, "resolved local identity"),
            None => tracing::warn!("could not resolve hostname, only loopback targets are local"),
        }

        Self::new(resolved)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn classify(&self, target: &str) -> Locality {
        let target = target.trim().to_lowercase();

        if LOOPBACK_MARKERS.iter().any(|m| target.contains(m)) {
            return Locality::Local;
        }

        match &self.hostname {
            Some(h) if target.contains(h.as_str()) => Locality::Local,
            _ => Locality::Remote,
        }
    }

    pub fn is_local(&self, target: &str) -> bool {
        self.classify(target) == Locality::Local
    }
}

fn system_hostname() -> Option<String> {
    gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| {
            ["HOSTNAME", "hostname"]
                .iter()
                .find_map(|k| std::env::var(k).ok().filter(|h| !h.is_empty()))
        })
}
