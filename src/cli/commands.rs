// CLI command definitions

use super::lb::{
    ApplyCommand, DeleteCommand, ListCommand, LocateCommand, StatusCommand, WaitCommand,
};
use crate::domain::config::{
    apply_to_conf, parse_dynamic_configs, ConfigValidator, ReconcilerConf,
};
use crate::domain::reconciler::LoadBalancerReconciler;
use crate::infrastructure::constants::CONF_FILE_ENV;
use crate::infrastructure::openstack::backend_from_conf;
use crate::shared::locks::LockRegistry;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "lb-reconciler",
    version,
    about = "Wait for cloud load balancers and their children to settle",
    long_about = "Drives load balancers, listeners, pools, members, monitors and L7 \
                  policies/rules through create, update and delete, waiting for every \
                  provisioning status to settle"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Show the status tree of a load balancer
    Status(StatusCommand),

    /// List all load balancers
    List(ListCommand),

    /// Wait for a resource to reach a provisioning status
    Wait(WaitCommand),

    /// Find the load balancer that owns a resource
    Locate(LocateCommand),

    /// Create (or update) a resource from a YAML/JSON spec file
    Apply(ApplyCommand),

    /// Delete a resource and wait until it is gone
    Delete(DeleteCommand),
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the reconciler configuration file (TOML)
    /// If not provided, reads LB_RECONCILER_CONF_FILE, then falls back to defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Load-balancer API endpoint (overrides cloud.endpoint)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Auth token sent as X-Auth-Token (overrides cloud.token and OS_AUTH_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Use the legacy networking-extension API instead of the standalone service
    #[arg(long, global = true)]
    pub legacy: bool,

    /// Dynamic configuration properties to override any settings (-D key=value)
    ///
    /// Cloud: cloud.endpoint, cloud.token, cloud.use-octavia, cloud.request-timeout
    /// Wait: wait.timeout, wait.delay, wait.min-interval, wait.retry-interval
    ///
    /// Example: -Dwait.timeout=20m -Dcloud.use-octavia=false
    #[arg(short = 'D', value_name = "KEY=VALUE", global = true)]
    pub properties: Vec<String>,
}

impl GlobalArgs {
    /// Priority: command line flags > -D properties > config file > environment > defaults
    pub fn load_conf(&self) -> anyhow::Result<ReconcilerConf> {
        let mut conf = if let Some(ref path) = self.config {
            ReconcilerConf::from(path)?
        } else if let Ok(env_path) = std::env::var(CONF_FILE_ENV) {
            ReconcilerConf::from(&env_path)?
        } else {
            ReconcilerConf::default()
        };
        conf.apply_env();

        if !self.properties.is_empty() {
            let configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_conf(&configs, &mut conf);
        }

        if let Some(ref endpoint) = self.endpoint {
            conf.cloud.endpoint = endpoint.clone();
        }
        if let Some(ref token) = self.token {
            conf.cloud.token = Some(token.clone());
        }
        if self.legacy {
            conf.cloud.use_octavia = false;
        }

        ConfigValidator::validate(&conf)?;
        Ok(conf)
    }

    /// Builds a reconciler whose waits stop on Ctrl-C.
    pub fn reconciler(&self) -> anyhow::Result<LoadBalancerReconciler> {
        let conf = self.load_conf()?;
        let backend = backend_from_conf(&conf.cloud)?;
        info!(
            "Using {} backend at {}",
            backend.kind(),
            conf.cloud.endpoint
        );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight waits");
                trigger.cancel();
            }
        });

        Ok(
            LoadBalancerReconciler::new(backend, conf.wait_settings()?)
                .with_locks(LockRegistry::new())
                .with_cancel(cancel),
        )
    }
}
