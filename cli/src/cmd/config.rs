//! `chia-tools config ...`: generate and edit the config, manage trusted
//! peers.
//!
//! `generate` and `edit` also apply `chia.`-prefixed environment overrides.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use chia_tools_config::{
    default_document, env_overrides, ConfigDocument, ConfigStore, EnvOverride, FieldPath,
    LeafPolicy, Value,
};
use chia_tools_rpc::{PeerIdResolver, TlsPeerIdResolver};
use chia_tools_types::Peer;
use chia_tools_utils::ConfirmPolicy;

use crate::context::CommandContext;

const TRUSTED_PEERS: &str = "wallet.trusted_peers";
const WALLET_FULL_NODE_PEERS: &str = "wallet.full_node_peers";

#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Write a default config, with environment overrides applied.
    Generate {
        /// Where to write the config.
        #[arg(short, long, default_value = "config.yml")]
        output: PathBuf,
    },

    /// Set one or more fields, e.g. `--set full_node.port=58444`.
    Edit {
        /// `path=value` pairs. Paths are dot-separated; list indices are numbers.
        #[arg(short = 's', long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,

        /// Show what would change without saving.
        #[arg(long)]
        dry_run: bool,
    },

    /// Trust a full node and make the wallet connect to it.
    AddTrustedPeer {
        /// IP address or DNS name. Every address a name resolves to is tried.
        host: String,

        /// Peer port. Defaults to `full_node.port`.
        port: Option<u16>,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,

        /// Retries per address when fetching the peer ID.
        #[arg(long, env = "CHIA_TOOLS_PEER_RETRIES")]
        retries: Option<u32>,
    },

    /// Stop trusting a full node.
    RemoveTrustedPeer {
        /// IP address or DNS name. Ignored with `--all`.
        #[arg(required_unless_present = "all")]
        host: Option<String>,

        /// Peer port. Defaults to `full_node.port`.
        port: Option<u16>,

        /// Remove every trusted peer and reset the wallet to the local node.
        #[arg(long)]
        all: bool,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,

        /// Retries per address when fetching the peer ID.
        #[arg(long, env = "CHIA_TOOLS_PEER_RETRIES")]
        retries: Option<u32>,
    },
}

pub async fn run(ctx: &CommandContext, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Generate { output } => {
            let overrides = env_overrides()?;
            let applied = generate(&overrides, &output)?;
            tracing::info!(path = %output.display(), overrides = applied, "wrote default config");
        }
        ConfigAction::Edit { sets, dry_run } => {
            let overrides = env_overrides()?;
            let mut store = ctx.load_config()?;
            let changes = edit(&mut store, &overrides, &sets, dry_run)?;
            if dry_run {
                for change in &changes {
                    println!("{}: {} -> {}", change.path, inline(&change.current), inline(&change.new));
                }
            } else {
                tracing::info!(count = changes.len(), path = %ctx.config_path.display(), "config updated");
            }
        }
        ConfigAction::AddTrustedPeer {
            host,
            port,
            yes,
            retries,
        } => {
            let mut store = ctx.load_config()?;
            let port = peer_port(store.document(), port)?;
            let ips = resolve_host(&host, port).await?;
            let resolver =
                TlsPeerIdResolver::from_config(store.document(), ctx.chia_root(), ctx.retry_policy(retries))
                    .context("loading full node certificates")?;
            add_trusted_peers(&mut store, &resolver, &ips, port, ctx.confirm_policy(yes)).await?;
        }
        ConfigAction::RemoveTrustedPeer {
            host,
            port,
            all,
            yes,
            retries,
        } => {
            let mut store = ctx.load_config()?;
            let confirm = ctx.confirm_policy(yes);
            if all {
                remove_all_trusted_peers(&mut store, confirm)?;
                return Ok(());
            }
            let host = host.ok_or_else(|| anyhow!("a host is required unless --all is given"))?;
            let port = peer_port(store.document(), port)?;
            let ips = resolve_host(&host, port).await?;
            let resolver =
                TlsPeerIdResolver::from_config(store.document(), ctx.chia_root(), ctx.retry_policy(retries))
                    .context("loading full node certificates")?;
            remove_trusted_peers(&mut store, &resolver, &ips, port, confirm).await?;
        }
    }
    Ok(())
}

// ── Generate ───────────────────────────────────────────────────────────

/// Write the default config with `overrides` applied to `output`, replacing
/// any existing file. Returns how many overrides were applied.
pub fn generate(overrides: &[EnvOverride], output: &Path) -> anyhow::Result<usize> {
    let mut document = default_document().context("parsing the default config")?;
    let applied = document.apply_overrides(overrides)?;
    let yaml = document.to_yaml_string()?;
    std::fs::write(output, yaml).with_context(|| format!("writing {}", output.display()))?;
    Ok(applied)
}

// ── Edit ───────────────────────────────────────────────────────────────

/// One field changed by [`edit`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange {
    pub path: FieldPath,
    pub current: Value,
    pub new: Value,
}

/// Apply environment overrides, then `path=value` assignments, so an
/// assignment wins over an override of the same field. Everything is parsed
/// and validated against the document before any field is written; nothing
/// is saved on a dry run.
pub fn edit<S: ConfigStore>(
    store: &mut S,
    overrides: &[EnvOverride],
    sets: &[String],
    dry_run: bool,
) -> anyhow::Result<Vec<FieldChange>> {
    let document = store.document();
    let mut changes = Vec::with_capacity(overrides.len() + sets.len());
    for (path, new) in document.resolve_overrides(overrides)? {
        let current = document.get(&path).cloned().unwrap_or(Value::Null);
        changes.push(FieldChange { path, current, new });
    }
    for set in sets {
        let (raw_path, raw_value) = set
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --set {set:?}: expected path=value"))?;
        let path = FieldPath::parse(raw_path.trim())?;
        let new = document.coerce(&path, raw_value)?;
        document.check(&path, &new, LeafPolicy::MustExist)?;
        let current = document.get(&path).cloned().unwrap_or(Value::Null);
        changes.push(FieldChange { path, current, new });
    }

    if changes.is_empty() {
        tracing::info!("nothing to change");
        return Ok(changes);
    }

    if dry_run {
        for change in &changes {
            tracing::info!(
                path = %change.path,
                current = %inline(&change.current),
                new = %inline(&change.new),
                "dry run, not saving"
            );
        }
        return Ok(changes);
    }

    for change in &changes {
        tracing::debug!(path = %change.path, "setting config path");
        store.set_field(&change.path, change.new.clone())?;
    }
    store.save().context("saving config")?;
    Ok(changes)
}

/// Single-line rendering of a value for logs and dry-run output.
fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

// ── Trusted peers ──────────────────────────────────────────────────────

fn peer_port(document: &ConfigDocument, port: Option<u16>) -> anyhow::Result<u16> {
    match port {
        Some(port) => Ok(port),
        None => Ok(document.full_node_port()?),
    }
}

/// Every address `host` refers to. An IP literal is used as-is.
pub async fn resolve_host(host: &str, port: u16) -> anyhow::Result<Vec<IpAddr>> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }
    let mut ips: Vec<IpAddr> = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("resolving {host}"))?
        .map(|addr| addr.ip())
        .collect();
    ips.dedup();
    if ips.is_empty() {
        bail!("{host} did not resolve to any address");
    }
    tracing::debug!(%host, count = ips.len(), "resolved host");
    Ok(ips)
}

/// Copy the two trusted-peer fields from `edited` into the store.
fn write_back<S: ConfigStore>(store: &mut S, edited: &ConfigDocument) -> anyhow::Result<()> {
    for raw in [TRUSTED_PEERS, WALLET_FULL_NODE_PEERS] {
        let path = FieldPath::parse(raw)?;
        let value = edited
            .get(&path)
            .cloned()
            .ok_or_else(|| anyhow!("{raw} missing after update"))?;
        store.set_field(&path, value)?;
    }
    Ok(())
}

/// Look up the peer ID at each address and trust the ones confirmed.
/// Returns how many were added. Fails only if no address yielded a peer ID.
pub async fn add_trusted_peers<S, R>(
    store: &mut S,
    resolver: &R,
    ips: &[IpAddr],
    port: u16,
    confirm: ConfirmPolicy,
) -> anyhow::Result<usize>
where
    S: ConfigStore,
    R: PeerIdResolver,
{
    let mut edited = store.document().clone();
    let mut found = 0;
    let mut added = 0;

    for ip in ips {
        let peer_id = match resolver.peer_id(*ip, port).await {
            Ok(peer_id) => peer_id,
            Err(e) => {
                tracing::warn!(peer = %ip, port, error = %e, "error getting peer id");
                continue;
            }
        };
        found += 1;

        let prompt = format!(
            "Would you like to add {ip}:{port} with peer id {peer_id} as a trusted peer? (y/N)"
        );
        if !confirm.confirm(&prompt) {
            tracing::info!(peer = %ip, "skipping");
            continue;
        }
        edited.add_trusted_peer(&peer_id, Peer::new(ip.to_string(), port))?;
        tracing::info!(peer = %ip, port, %peer_id, "added trusted peer");
        added += 1;
    }

    if found == 0 {
        bail!("could not get a peer id from any address on port {port}");
    }
    if added > 0 {
        write_back(store, &edited)?;
        store.save().context("saving config")?;
    }
    Ok(added)
}

/// Look up the peer ID at each address and stop trusting it. Returns how
/// many trusted IDs were removed.
pub async fn remove_trusted_peers<S, R>(
    store: &mut S,
    resolver: &R,
    ips: &[IpAddr],
    port: u16,
    confirm: ConfirmPolicy,
) -> anyhow::Result<usize>
where
    S: ConfigStore,
    R: PeerIdResolver,
{
    let mut edited = store.document().clone();
    let mut found = 0;
    let mut removed = 0;

    for ip in ips {
        let peer_id = match resolver.peer_id(*ip, port).await {
            Ok(peer_id) => peer_id,
            Err(e) => {
                tracing::warn!(peer = %ip, port, error = %e, "error getting peer id");
                continue;
            }
        };
        found += 1;

        let prompt = format!(
            "Would you like to remove {ip}:{port} with peer id {peer_id} from trusted peers? (y/N)"
        );
        if !confirm.confirm(&prompt) {
            tracing::info!(peer = %ip, "skipping");
            continue;
        }
        if edited.remove_trusted_peer(&peer_id, &Peer::new(ip.to_string(), port))? {
            tracing::info!(peer = %ip, port, %peer_id, "removed trusted peer");
            removed += 1;
        } else {
            tracing::info!(peer = %ip, %peer_id, "peer id was not trusted");
        }
    }

    if found == 0 {
        bail!("could not get a peer id from any address on port {port}");
    }
    if removed > 0 {
        write_back(store, &edited)?;
        store.save().context("saving config")?;
    }
    Ok(removed)
}

/// Reset trusted peers to the placeholder entry and the wallet to the local
/// full node. Returns whether anything was saved.
pub fn remove_all_trusted_peers<S: ConfigStore>(
    store: &mut S,
    confirm: ConfirmPolicy,
) -> anyhow::Result<bool> {
    if !confirm.confirm("Are you sure you want to remove ALL trusted peers? (y/N)") {
        tracing::info!("cancelled");
        return Ok(false);
    }
    let mut edited = store.document().clone();
    edited.reset_trusted_peers()?;
    write_back(store, &edited)?;
    store.save().context("saving config")?;
    tracing::info!("removed all trusted peers");
    Ok(true)
}
