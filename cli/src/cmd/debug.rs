//! `chia-tools debug`: a support report for the installation.

use chia_tools_config::{ConfigDocument, ConfigStore, Value};
use chia_tools_network::{NetworkReport, RpcNetworkInfo};
use chia_tools_utils::{collect_files, human_readable_size, render_rows, FileScanOptions};

use crate::context::CommandContext;

/// Config fields listed in the port table, with their labels.
const PORT_FIELDS: [(&str, &str); 12] = [
    ("Full Node Port", "full_node.port"),
    ("Full Node RPC", "full_node.rpc_port"),
    ("Wallet RPC", "wallet.rpc_port"),
    ("Farmer Port", "farmer.port"),
    ("Farmer RPC", "farmer.rpc_port"),
    ("Harvester RPC", "harvester.rpc_port"),
    ("Crawler RPC", "seeder.crawler.rpc_port"),
    ("Seeder Port", "seeder.port"),
    ("Data Layer Host Port", "data_layer.host_port"),
    ("Data Layer RPC", "data_layer.rpc_port"),
    ("Timelord RPC", "timelord.rpc_port"),
    ("Daemon Port", "daemon_port"),
];

/// Shown for ports missing from the config.
const MISSING: &str = "-";

#[derive(clap::Args)]
pub struct DebugArgs {
    /// List files largest first.
    #[arg(long)]
    sort: bool,

    /// Include files hidden by default (transient and delta files).
    #[arg(long)]
    all_files: bool,
}

pub async fn run(ctx: &CommandContext, args: DebugArgs) -> anyhow::Result<()> {
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let store = ctx.load_config()?;
    let document = store.document();

    let selected = document
        .selected_network()
        .map(|network| network.to_string())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "error reading selected_network");
            MISSING.to_string()
        });
    let source = RpcNetworkInfo::new(
        document,
        ctx.chia_root(),
        ctx.daemon_timeout(),
        ctx.rpc_timeout(),
    );
    println!("Network Info");
    print!("{}", NetworkReport::collect(&selected, &source).await.render());
    println!();

    println!("Ports");
    print!("{}", render_rows(&port_rows(document)));
    println!();

    let options = FileScanOptions {
        all_files: args.all_files,
        sort_by_size: args.sort,
    };
    println!("File Sizes");
    print!("{}", file_sizes(ctx, &options)?);
    Ok(())
}

/// One row per entry in [`PORT_FIELDS`].
pub fn port_rows(document: &ConfigDocument) -> Vec<(&'static str, String)> {
    PORT_FIELDS
        .iter()
        .map(|(label, path)| {
            let value = match document.get_str_path(path) {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => MISSING.to_string(),
            };
            (*label, value)
        })
        .collect()
}

fn file_sizes(ctx: &CommandContext, options: &FileScanOptions) -> anyhow::Result<String> {
    let root = ctx.chia_root();
    if !root.is_dir() {
        anyhow::bail!("chia root {} is not a directory", root.display());
    }
    let rows: Vec<(String, String)> = collect_files(root, options)
        .into_iter()
        .map(|entry| (human_readable_size(entry.size), entry.path.display().to_string()))
        .collect();
    Ok(render_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_rows_show_dash_for_missing_values() {
        let document = ConfigDocument::from_yaml_str(
            r#"
daemon_port: 55400
full_node:
  port: 8444
  rpc_port: 8555
wallet:
  rpc_port: 9256
seeder:
  port: 8444
  crawler:
    rpc_port: 8561
data_layer:
  host_port: ""
"#,
        )
        .expect("parse");

        let rows = port_rows(&document);
        assert_eq!(rows.len(), PORT_FIELDS.len());
        let lookup = |label: &str| {
            rows.iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.as_str())
                .unwrap_or_else(|| panic!("missing row {label}"))
        };
        assert_eq!(lookup("Full Node Port"), "8444");
        assert_eq!(lookup("Full Node RPC"), "8555");
        assert_eq!(lookup("Wallet RPC"), "9256");
        assert_eq!(lookup("Crawler RPC"), "8561");
        assert_eq!(lookup("Daemon Port"), "55400");
        assert_eq!(lookup("Farmer Port"), MISSING);
        assert_eq!(lookup("Data Layer Host Port"), MISSING);
        assert_eq!(lookup("Timelord RPC"), MISSING);
    }
}
