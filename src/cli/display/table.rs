//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::model::{LoadBalancer, StatusTree, TreeNode};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render load balancers list as a formatted table
    pub fn render_load_balancers(&self, load_balancers: &[LoadBalancer]) -> String {
        if load_balancers.is_empty() {
            return "No load balancers found".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("VIP").set_alignment(CellAlignment::Left),
                Cell::new("LISTENERS").set_alignment(CellAlignment::Center),
                Cell::new("POOLS").set_alignment(CellAlignment::Center),
                Cell::new("PROVISIONING").set_alignment(CellAlignment::Center),
                Cell::new("OPERATING").set_alignment(CellAlignment::Center),
            ]);

        for lb in load_balancers {
            let status = &lb.provisioning_status;
            table.add_row(vec![
                Cell::new(&lb.id),
                Cell::new(&lb.name),
                Cell::new(&lb.vip_address),
                Cell::new(lb.listeners.len()).set_alignment(CellAlignment::Center),
                Cell::new(lb.pools.len()).set_alignment(CellAlignment::Center),
                Cell::new(format!("{} {}", StatusIcon::for_status(status), status))
                    .fg(self.theme.status_color(status)),
                Cell::new(&lb.operating_status).fg(self.theme.info),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Load Balancers {} ─╮\n",
            format!("[{} total]", load_balancers.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&legend());
        output
    }

    /// Render one status tree, children indented under their parents
    pub fn render_status_tree(&self, tree: &StatusTree) -> String {
        let root = &tree.loadbalancer;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("RESOURCE").set_alignment(CellAlignment::Left),
                Cell::new("ID").set_alignment(CellAlignment::Left),
                Cell::new("PARENT").set_alignment(CellAlignment::Left),
                Cell::new("PROVISIONING").set_alignment(CellAlignment::Center),
            ]);

        let mut pool_depth = 1;
        for node in tree.nodes() {
            let depth = match node {
                TreeNode::LoadBalancer(_) => 0,
                TreeNode::Listener { .. } => 1,
                TreeNode::Pool { parent_id, .. } => {
                    pool_depth = if parent_id == root.id { 1 } else { 2 };
                    pool_depth
                }
                TreeNode::Monitor { .. } | TreeNode::Member { .. } => pool_depth + 1,
                TreeNode::L7Policy { .. } => 2,
                TreeNode::L7Rule { .. } => 3,
            };
            let status = node.provisioning_status();
            let label = format!("{}{} {}", "  ".repeat(depth), node.kind(), node.name());
            table.add_row(vec![
                Cell::new(label.trim_end()),
                Cell::new(node.id()),
                Cell::new(node.parent_id().unwrap_or("-")).fg(self.theme.muted),
                Cell::new(format!("{} {}", StatusIcon::for_status(status), status))
                    .fg(self.theme.status_color(status)),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Status tree of {} {} ─╮\n",
            if root.id.is_empty() { "<unknown>" } else { root.id.as_str() },
            format!("[{}]", root.provisioning_status).bright_black()
        ));
        if !root.provisioning_status.is_terminal() {
            output.push_str(&format!(
                "{}\n",
                "Load balancer is not settled; child statuses are not authoritative".yellow()
            ));
        }
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&legend());
        output
    }
}

fn legend() -> String {
    format!(
        "Legend: {} Active  {} Pending  {} Error\n",
        StatusIcon::SUCCESS.green(),
        StatusIcon::PENDING.yellow(),
        StatusIcon::ERROR.red()
    )
}
