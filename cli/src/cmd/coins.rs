//! `chia-tools coins ...`: wallet coin management.

use anyhow::{anyhow, bail, Context};
use chia_tools_rpc::types::{SpendableCoins, SplitCoinsRequest};
use chia_tools_types::{Mojos, ServiceName};

use crate::context::CommandContext;

#[derive(clap::Subcommand)]
pub enum CoinsAction {
    /// Split the wallet's largest spendable coin into equal coins.
    SplitLargest {
        /// XCH per new coin.
        #[arg(long)]
        amount_per_coin: String,

        /// How many coins to create.
        #[arg(long)]
        number_of_coins: u32,

        /// Wallet ID.
        #[arg(long, default_value_t = 1)]
        id: u32,

        /// Fee in XCH.
        #[arg(long, default_value = "0")]
        fee: String,
    },
}

pub async fn run(ctx: &CommandContext, action: CoinsAction) -> anyhow::Result<()> {
    match action {
        CoinsAction::SplitLargest {
            amount_per_coin,
            number_of_coins,
            id,
            fee,
        } => {
            let amount_per_coin = Mojos::from_xch_str(&amount_per_coin)
                .with_context(|| format!("parsing amount per coin {amount_per_coin:?}"))?;
            let fee = Mojos::from_xch_str(&fee).with_context(|| format!("parsing fee {fee:?}"))?;

            let store = ctx.load_config()?;
            let wallet = ctx.rpc_client(&store, ServiceName::Wallet)?;
            let coins = wallet
                .get_spendable_coins(id)
                .await
                .context("getting spendable coins")?;
            let request = plan_split(&coins, id, amount_per_coin, number_of_coins, fee)?;

            tracing::info!(
                coin = %request.target_coin_id,
                number_of_coins,
                amount_per_coin = request.amount_per_coin,
                "splitting largest coin"
            );
            let response = wallet.split_coins(&request).await.context("splitting coins")?;
            match response.transaction_id {
                Some(id) => println!("Transaction submitted: {id}"),
                None => println!("Transaction submitted"),
            }
        }
    }
    Ok(())
}

/// Build a request splitting the largest coin, checking it covers the new
/// coins plus the fee.
pub fn plan_split(
    coins: &SpendableCoins,
    wallet_id: u32,
    amount_per_coin: Mojos,
    number_of_coins: u32,
    fee: Mojos,
) -> anyhow::Result<SplitCoinsRequest> {
    if number_of_coins == 0 {
        bail!("number of coins must be at least 1");
    }
    if amount_per_coin == Mojos::ZERO {
        bail!("amount per coin must be greater than zero");
    }

    let largest = coins
        .largest()
        .ok_or_else(|| anyhow!("no spendable coins in wallet {wallet_id}"))?;
    let required = amount_per_coin
        .checked_mul(u64::from(number_of_coins))
        .and_then(|total| total.checked_add(fee))
        .ok_or_else(|| anyhow!("requested amount does not fit in 64 bits of mojos"))?;
    let available = Mojos::new(largest.coin.amount);
    if required > available {
        bail!("largest coin has {available}, splitting needs {required} including fee");
    }

    let target_coin_id = largest.coin.id().context("computing coin id")?;
    Ok(SplitCoinsRequest {
        wallet_id,
        target_coin_id,
        amount_per_coin: amount_per_coin.get(),
        number_of_coins,
        fee: fee.get(),
        push: true,
    })
}
