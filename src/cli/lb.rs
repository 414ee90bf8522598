//! Load-balancer commands

use super::commands::GlobalArgs;
use super::display::{StatusIcon, TableRenderer};
use crate::domain::config::{parse_duration_string, ConfigValidator};
use crate::domain::model::{
    pending_delete_statuses, pending_statuses, ProvisioningStatus, ResourceKey, ResourceKind,
    ResourceSpec,
};
use clap::Parser;
use colored::Colorize;
use std::path::Path;

/// Addresses one resource on the command line
#[derive(clap::Args, Debug, Clone)]
pub struct ResourceArgs {
    /// Resource kind (loadbalancer, listener, pool, monitor, member, l7policy, l7rule)
    pub kind: ResourceKind,

    /// Resource id
    pub id: String,

    /// Parent pool id for members, parent policy id for L7 rules
    #[arg(long, short = 'p')]
    pub parent: Option<String>,
}

impl ResourceArgs {
    fn key(&self) -> anyhow::Result<ResourceKey> {
        ConfigValidator::validate_resource_id(&self.id)?;
        let key = ResourceKey {
            kind: self.kind,
            id: self.id.clone(),
            parent_id: self.parent.clone(),
        };
        if self.kind.requires_parent() {
            ConfigValidator::validate_resource_id(key.require_parent()?)?;
        }
        Ok(key)
    }
}

#[derive(Parser, Debug)]
pub struct StatusCommand {
    /// Load balancer id
    pub loadbalancer_id: String,
}

#[derive(Parser, Debug)]
pub struct ListCommand {}

#[derive(Parser, Debug)]
pub struct WaitCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,

    /// Target provisioning status (ACTIVE, ERROR or DELETED)
    #[arg(long, short = 't', default_value = "ACTIVE")]
    pub target: String,

    /// Overrides wait.timeout (e.g. "10m", "30s")
    #[arg(long)]
    pub timeout: Option<String>,
}

#[derive(Parser, Debug)]
pub struct LocateCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,
}

#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// Spec file (YAML, or JSON when the extension is .json)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: String,

    /// Update the existing resource with this id instead of creating one
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DeleteCommand {
    #[command(flatten)]
    pub resource: ResourceArgs,
}

impl StatusCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        ConfigValidator::validate_resource_id(&self.loadbalancer_id)?;
        let reconciler = global.reconciler()?;

        let tree = reconciler
            .backend()
            .status_tree(&self.loadbalancer_id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get status tree: {}", e))?;

        let renderer = TableRenderer::new();
        println!("{}", renderer.render_status_tree(&tree));
        Ok(())
    }
}

impl ListCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let reconciler = global.reconciler()?;

        let load_balancers = reconciler
            .backend()
            .list_load_balancers()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list load balancers: {}", e))?;

        let renderer = TableRenderer::new();
        println!("{}", renderer.render_load_balancers(&load_balancers));
        Ok(())
    }
}

impl WaitCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let key = self.resource.key()?;
        let target = ProvisioningStatus::parse(&self.target.to_uppercase());
        let pending = match target {
            ProvisioningStatus::Deleted => pending_delete_statuses(),
            ProvisioningStatus::Active | ProvisioningStatus::Error => pending_statuses(),
            _ => anyhow::bail!("Unsupported target status: {}", self.target),
        };

        let reconciler = global.reconciler()?;
        let timeout = match self.timeout {
            Some(ref timeout) => parse_duration_string(timeout)?,
            None => reconciler.settings().timeout,
        };

        reconciler
            .wait_for_key(&key, target.clone(), pending, timeout)
            .await
            .map_err(|e| anyhow::anyhow!("Failed waiting for {}: {}", key, e))?;

        println!("{} {} reached {}", StatusIcon::SUCCESS.green(), key, target);
        Ok(())
    }
}

impl LocateCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let key = self.resource.key()?;
        let reconciler = global.reconciler()?;

        let lb_id = reconciler
            .resolve_owning_load_balancer_id(&key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to locate {}: {}", key, e))?;

        println!("{}", lb_id);
        Ok(())
    }
}

impl ApplyCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let spec = load_spec(&self.file)?;
        let reconciler = global.reconciler()?;

        let object = match self.id {
            Some(ref id) => {
                ConfigValidator::validate_resource_id(id)?;
                let key = ResourceKey {
                    kind: spec.kind(),
                    id: id.clone(),
                    parent_id: spec.path_parent().map(str::to_string),
                };
                reconciler
                    .update(&key, &spec)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to update {}: {}", key, e))?
            }
            None => reconciler
                .create(&spec)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", spec.kind(), e))?,
        };

        println!(
            "{} {} is {}",
            StatusIcon::SUCCESS.green(),
            object.key(),
            ProvisioningStatus::Active
        );
        Ok(())
    }
}

impl DeleteCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let key = self.resource.key()?;
        let reconciler = global.reconciler()?;

        reconciler
            .delete(&key)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete {}: {}", key, e))?;

        println!("{} {} deleted successfully!", StatusIcon::SUCCESS.green(), key);
        Ok(())
    }
}

/// Reads a spec file; `.json` files are parsed as JSON, anything else as YAML.
pub fn load_spec(path: &str) -> anyhow::Result<ResourceSpec> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read spec file {}: {}", path, e))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let spec = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(spec)
}
