// # dns01d - DNS-01 Solver Harness
//
// This binary is a THIN integration layer over the solver crates:
// - No DNS, registrar or credential logic lives here
// - Configuration is via environment variables only
// - One action per invocation, no retries (the caller owns backoff)
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Registering solvers and secret stores
// 3. Initializing the solver's secret store
// 4. Running Present or CleanUp for the challenge read from stdin
//
// ## Usage
//
// ```bash
// dns01d [--version] <present|cleanup> < challenge.json
// ```
//
// The challenge document uses the orchestrator's field names:
//
// ```json
// {
//   "resolvedFQDN": "_acme-challenge.example.com.",
//   "resolvedZone": "example.com.",
//   "key": "abc123",
//   "resourceNamespace": "cert-manager",
//   "config": {"apiKeySecretRef": {"name": "godaddy-creds", "key": "api-key", "secret": "api-secret"}}
// }
// ```
//
// ## Configuration
//
// - `DNS01_GROUP_NAME`: API group the solver serves (required, `GROUP_NAME` also accepted)
// - `DNS01_SOLVER`: Solver to run (default: godaddy)
// - `DNS01_SECRET_STORE_TYPE`: kubernetes (default) or directory
// - `DNS01_SECRET_STORE_PATH`: Root of mounted secrets (for directory)
// - `DNS01_ZONE_LOOKUP`: resolve (default) or request
// - `DNS01_NAMESERVERS`: Comma-separated `ip[:port]` resolvers (default: system)
// - `DNS01_API_BASE_URL`: Registrar base URL override
// - `DNS01_LOG_LEVEL`: trace, debug, info (default), warn, error

use anyhow::{Context, Result};
use dns01_core::{
    ChallengeRequest, DnsZoneResolver, SecretStoreConfig, Solver, SolverRegistry, SolverSettings,
    ZoneLookup,
};
use dns01_provider_godaddy::GoDaddySolver;
use std::env;
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Port used for nameservers given without one
const DEFAULT_DNS_PORT: u16 = 53;

/// Exit codes for different termination scenarios
///
/// - 0: Action completed
/// - 1: Configuration, input or startup error
/// - 2: The action itself failed (or was interrupted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dns01ExitCode {
    /// Action completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Present/CleanUp failed
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What the invocation should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Version,
    Present,
    CleanUp,
}

impl Command {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let args: Vec<String> = args.into_iter().collect();
        match args.as_slice() {
            [flag] if flag == "--version" || flag == "-V" => Ok(Command::Version),
            [action] if action == "present" => Ok(Command::Present),
            [action] if action == "cleanup" => Ok(Command::CleanUp),
            _ => anyhow::bail!("usage: dns01d [--version] <present|cleanup> < challenge.json"),
        }
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    solver: String,
    secret_store_type: String,
    secret_store_path: Option<String>,
    zone_lookup: String,
    nameservers: Vec<String>,
    api_base_url: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        Self {
            group_name: var("DNS01_GROUP_NAME")
                .or_else(|| var("GROUP_NAME"))
                .unwrap_or_default(),
            solver: var("DNS01_SOLVER").unwrap_or_else(|| "godaddy".to_string()),
            secret_store_type: var("DNS01_SECRET_STORE_TYPE")
                .unwrap_or_else(|| "kubernetes".to_string()),
            secret_store_path: var("DNS01_SECRET_STORE_PATH"),
            zone_lookup: var("DNS01_ZONE_LOOKUP").unwrap_or_else(|| "resolve".to_string()),
            nameservers: var("DNS01_NAMESERVERS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            api_base_url: var("DNS01_API_BASE_URL").filter(|s| !s.is_empty()),
            log_level: var("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            anyhow::bail!(
                "DNS01_GROUP_NAME is required. \
                Set it via: export DNS01_GROUP_NAME=acme.example.org"
            );
        }

        self.secret_store_config()?;
        self.solver_settings()?.validate()?;
        self.nameserver_addrs()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Secret store connection settings
    fn secret_store_config(&self) -> Result<SecretStoreConfig> {
        match self.secret_store_type.as_str() {
            "kubernetes" => Ok(SecretStoreConfig::Kubernetes),
            "directory" => match self.secret_store_path.as_deref() {
                Some(path) if !path.is_empty() => Ok(SecretStoreConfig::Directory {
                    path: PathBuf::from(path),
                }),
                _ => anyhow::bail!(
                    "DNS01_SECRET_STORE_PATH is required when DNS01_SECRET_STORE_TYPE=directory"
                ),
            },
            other => anyhow::bail!(
                "DNS01_SECRET_STORE_TYPE '{}' is not supported. \
                Supported types: kubernetes, directory",
                other
            ),
        }
    }

    /// Startup settings handed to the solver
    fn solver_settings(&self) -> Result<SolverSettings> {
        let zone_lookup: ZoneLookup = self
            .zone_lookup
            .parse()
            .context("invalid DNS01_ZONE_LOOKUP")?;

        let mut settings = SolverSettings::new(self.group_name.trim()).with_zone_lookup(zone_lookup);
        if let Some(ref url) = self.api_base_url {
            settings = settings.with_api_base_url(url);
        }
        Ok(settings)
    }

    /// Parse `DNS01_NAMESERVERS`; entries without a port use 53
    fn nameserver_addrs(&self) -> Result<Vec<SocketAddr>> {
        self.nameservers
            .iter()
            .map(|entry| {
                entry
                    .parse::<SocketAddr>()
                    .or_else(|_| {
                        entry
                            .parse::<IpAddr>()
                            .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
                    })
                    .with_context(|| format!("DNS01_NAMESERVERS entry '{}' is not ip[:port]", entry))
            })
            .collect()
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let command = match Command::from_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if command == Command::Version {
        println!("dns01d {}", env!("CARGO_PKG_VERSION"));
        return Dns01ExitCode::Success.into();
    }

    // Load and validate configuration from environment
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    // Logs go to stderr; stdout is left to the caller
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let request = match read_request(std::io::stdin()) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid challenge request: {:#}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let solver = match build_solver(&config).await {
            Ok(solver) => solver,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return Dns01ExitCode::ConfigError;
            }
        };

        tokio::select! {
            result = run_action(solver.as_ref(), command, &request) => match result {
                Ok(()) => Dns01ExitCode::Success,
                Err(e) => {
                    error!(transient = e.is_transient(), "{:?} failed: {}", command, e);
                    Dns01ExitCode::RuntimeError
                }
            },
            interrupted = wait_for_shutdown() => {
                match interrupted {
                    Ok(name) => error!("Interrupted by {} before {:?} completed", name, command),
                    Err(e) => error!("Signal handling error: {}", e),
                }
                Dns01ExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Parse the challenge request document
fn read_request<R: Read>(mut input: R) -> Result<ChallengeRequest> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .context("failed to read challenge request from stdin")?;
    serde_json::from_str(&raw).context("failed to decode challenge request")
}

/// Register everything and return the configured, initialized solver
async fn build_solver(config: &Config) -> Result<Arc<dyn Solver>> {
    let registry = SolverRegistry::new();

    dns01_core::secrets::register(&registry);

    #[cfg(feature = "kubernetes")]
    dns01_secret_kube::register(&registry);

    let store_config = config.secret_store_config()?;
    let store_factory = registry.secret_store_factory(store_config.type_name())?;
    let zone_resolver = Arc::new(DnsZoneResolver::new(&config.nameserver_addrs()?));

    dns01_provider_godaddy::register(
        &registry,
        GoDaddySolver::new(config.solver_settings()?, zone_resolver, store_factory)?,
    );

    let solver = registry.solver(&config.solver)?;
    solver.initialize(&store_config).await?;

    info!(
        "Solver '{}' ready for group '{}'",
        solver.name(),
        config.group_name
    );
    Ok(solver)
}

async fn run_action(
    solver: &dyn Solver,
    command: Command,
    request: &ChallengeRequest,
) -> dns01_core::Result<()> {
    match command {
        Command::Present => solver.present(request).await,
        Command::CleanUp => solver.clean_up(request).await,
        Command::Version => Ok(()),
    }
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::from_args(args(&["present"])).unwrap(), Command::Present);
        assert_eq!(Command::from_args(args(&["cleanup"])).unwrap(), Command::CleanUp);
        assert_eq!(Command::from_args(args(&["--version"])).unwrap(), Command::Version);
        assert!(Command::from_args(args(&[])).is_err());
        assert!(Command::from_args(args(&["present", "extra"])).is_err());
        assert!(Command::from_args(args(&["apply"])).is_err());
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DNS01_GROUP_NAME", "acme.example.org")]);
        assert!(cfg.validate().is_ok());

        assert_eq!(cfg.solver, "godaddy");
        assert_eq!(cfg.secret_store_config().unwrap(), SecretStoreConfig::Kubernetes);
        assert_eq!(cfg.solver_settings().unwrap().zone_lookup, ZoneLookup::Resolve);
        assert!(cfg.nameserver_addrs().unwrap().is_empty());
        assert_eq!(cfg.log_level(), Level::INFO);
    }

    #[test]
    fn test_group_name_required() {
        assert!(config(&[]).validate().is_err());
        assert!(config(&[("DNS01_GROUP_NAME", "  ")]).validate().is_err());

        let legacy = config(&[("GROUP_NAME", "acme.example.org")]);
        assert!(legacy.validate().is_ok());
        assert_eq!(legacy.group_name, "acme.example.org");
    }

    #[test]
    fn test_directory_store_requires_path() {
        let missing = config(&[
            ("DNS01_GROUP_NAME", "acme.example.org"),
            ("DNS01_SECRET_STORE_TYPE", "directory"),
        ]);
        assert!(missing.validate().is_err());

        let ok = config(&[
            ("DNS01_GROUP_NAME", "acme.example.org"),
            ("DNS01_SECRET_STORE_TYPE", "directory"),
            ("DNS01_SECRET_STORE_PATH", "/etc/dns01/secrets"),
        ]);
        assert_eq!(
            ok.secret_store_config().unwrap(),
            SecretStoreConfig::Directory {
                path: PathBuf::from("/etc/dns01/secrets")
            }
        );
    }

    #[test]
    fn test_nameserver_parsing() {
        let cfg = config(&[
            ("DNS01_GROUP_NAME", "acme.example.org"),
            ("DNS01_NAMESERVERS", "1.1.1.1, 9.9.9.9:5353,[2001:db8::1]:53,2001:db8::2"),
        ]);

        let addrs = cfg.nameserver_addrs().unwrap();
        assert_eq!(addrs.len(), 4);
        assert_eq!(addrs[0], "1.1.1.1:53".parse().unwrap());
        assert_eq!(addrs[1], "9.9.9.9:5353".parse().unwrap());
        assert_eq!(addrs[3], "[2001:db8::2]:53".parse().unwrap());

        let bad = config(&[
            ("DNS01_GROUP_NAME", "acme.example.org"),
            ("DNS01_NAMESERVERS", "dns.google"),
        ]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            ("DNS01_ZONE_LOOKUP", "guess"),
            ("DNS01_API_BASE_URL", "ftp://example.com"),
            ("DNS01_LOG_LEVEL", "verbose"),
            ("DNS01_SECRET_STORE_TYPE", "vault"),
        ] {
            let cfg = config(&[("DNS01_GROUP_NAME", "acme.example.org"), (key, value)]);
            assert!(cfg.validate().is_err(), "{}={} should be rejected", key, value);
        }
    }

    #[test]
    fn test_read_request() {
        let input = br#"{
            "resolvedFQDN": "_acme-challenge.example.com.",
            "resolvedZone": "example.com.",
            "key": "abc123",
            "resourceNamespace": "cert-manager"
        }"#;

        let request = read_request(&input[..]).unwrap();
        assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(request.key, "abc123");
        assert!(request.config.is_none());

        assert!(read_request(&b"not json"[..]).is_err());
    }
}
