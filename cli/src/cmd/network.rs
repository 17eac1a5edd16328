//! `chia-tools network ...`: switch networks and show what each service runs.

use anyhow::Context;
use chia_tools_config::ConfigStore;
use chia_tools_network::{
    FsCacheRelocator, NetworkReport, NetworkSwitch, RestartOutcome, RpcNetworkInfo,
};

use crate::context::CommandContext;

#[derive(clap::Subcommand)]
pub enum NetworkAction {
    /// Switch the installation to another network.
    ///
    /// Stops the full node if it is running, swaps the per-network cache
    /// files in `db/`, rewrites the network-dependent config fields and
    /// restarts the full node.
    Switch {
        /// Target network, e.g. `mainnet`, `testneta`, `testnet11`.
        name: String,
    },

    /// Show the configured network and the network each service reports.
    Show,
}

pub async fn run(ctx: &CommandContext, action: NetworkAction) -> anyhow::Result<()> {
    match action {
        NetworkAction::Switch { name } => switch(ctx, &name).await,
        NetworkAction::Show => show(ctx).await,
    }
}

async fn switch(ctx: &CommandContext, name: &str) -> anyhow::Result<()> {
    let store = ctx.load_config()?;
    let daemon = ctx.daemon(&store)?;
    let mut switch = NetworkSwitch::new(store, daemon, FsCacheRelocator, ctx.chia_root());

    let report = switch
        .switch(name)
        .await
        .with_context(|| format!("switching to {name}"))?;

    if let RestartOutcome::Failed(reason) = &report.restart {
        eprintln!("The full node did not restart ({reason}). Start it manually.");
    }
    println!("Switched from {} to {}", report.previous, report.target);
    Ok(())
}

async fn show(ctx: &CommandContext) -> anyhow::Result<()> {
    let store = ctx.load_config()?;
    let document = store.document();
    let selected = document
        .selected_network()
        .context("reading selected_network")?;

    let source = RpcNetworkInfo::new(
        document,
        ctx.chia_root(),
        ctx.daemon_timeout(),
        ctx.rpc_timeout(),
    );
    let report = NetworkReport::collect(selected.as_str(), &source).await;
    print!("{}", report.render());
    Ok(())
}
