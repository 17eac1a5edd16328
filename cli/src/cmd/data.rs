//! `chia-tools data ...`: data layer mirrors and store contents.

use anyhow::{anyhow, Context};
use chia_tools_rpc::types::{decode_hex, KeyValue, Mirror};
use chia_tools_rpc::RpcClient;
use chia_tools_types::{Mojos, ServiceName};
use chia_tools_utils::ConfirmPolicy;

use crate::context::CommandContext;

#[derive(clap::Subcommand)]
pub enum DataAction {
    /// List mirrors this node owns.
    ShowMyMirrors {
        /// Only this store. Defaults to every subscribed store.
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete every mirror this node owns.
    DeleteMirrors {
        /// Only this store. Defaults to every subscribed store.
        #[arg(long)]
        id: Option<String>,

        /// Fee in XCH per deletion.
        #[arg(long, default_value = "0")]
        fee: String,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a store's keys and values, converting their encoding.
    ConvertKeysValues {
        /// Store ID.
        #[arg(long)]
        id: String,

        #[arg(long, value_enum, default_value_t = ValueFormat::Hex)]
        input_format: ValueFormat,

        #[arg(long, value_enum, default_value_t = ValueFormat::Utf8)]
        output_format: ValueFormat,
    },
}

/// Encoding of data layer keys and values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueFormat {
    /// Hex, optionally `0x`-prefixed on input, always prefixed on output.
    Hex,
    Utf8,
}

pub async fn run(ctx: &CommandContext, action: DataAction) -> anyhow::Result<()> {
    let store = ctx.load_config()?;
    let client = ctx.rpc_client(&store, ServiceName::DataLayer)?;

    match action {
        DataAction::ShowMyMirrors { id } => {
            for store_id in store_ids(&client, id).await? {
                for mirror in own_mirrors(&client, &store_id).await? {
                    println!("Store: {store_id}");
                    println!("  Coin ID: {}", mirror.coin_id);
                    println!("  Amount: {}", Mojos::new(mirror.amount));
                    for url in &mirror.urls {
                        println!("  URL: {url}");
                    }
                }
            }
        }
        DataAction::DeleteMirrors { id, fee, yes } => {
            let fee = Mojos::from_xch_str(&fee).with_context(|| format!("parsing fee {fee:?}"))?;
            let confirm = ctx.confirm_policy(yes);
            let deleted = delete_mirrors(&client, id, fee, confirm).await?;
            println!("Deleted {deleted} mirror(s)");
        }
        DataAction::ConvertKeysValues {
            id,
            input_format,
            output_format,
        } => {
            let keys_values = client
                .get_keys_values(&id)
                .await
                .with_context(|| format!("getting keys and values for {id}"))?
                .keys_values;
            let converted = keys_values
                .iter()
                .map(|kv| convert_key_value(kv, input_format, output_format))
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", serde_json::to_string_pretty(&converted)?);
        }
    }
    Ok(())
}

async fn store_ids(client: &RpcClient, id: Option<String>) -> anyhow::Result<Vec<String>> {
    match id {
        Some(id) => Ok(vec![id]),
        None => Ok(client
            .get_subscriptions()
            .await
            .context("getting subscriptions")?
            .store_ids),
    }
}

async fn own_mirrors(client: &RpcClient, store_id: &str) -> anyhow::Result<Vec<Mirror>> {
    let mirrors = client
        .get_mirrors(store_id)
        .await
        .with_context(|| format!("getting mirrors for {store_id}"))?
        .mirrors;
    Ok(mirrors.into_iter().filter(|mirror| mirror.ours).collect())
}

async fn delete_mirrors(
    client: &RpcClient,
    id: Option<String>,
    fee: Mojos,
    confirm: ConfirmPolicy,
) -> anyhow::Result<usize> {
    let mut deleted = 0;
    for store_id in store_ids(client, id).await? {
        for mirror in own_mirrors(client, &store_id).await? {
            let prompt = format!(
                "Delete mirror {} of store {store_id} ({})? (y/N)",
                mirror.coin_id,
                mirror.urls.join(", ")
            );
            if !confirm.confirm(&prompt) {
                tracing::info!(coin = %mirror.coin_id, "skipping");
                continue;
            }
            client
                .delete_mirror(&mirror.coin_id, fee)
                .await
                .with_context(|| format!("deleting mirror {}", mirror.coin_id))?;
            tracing::info!(store = %store_id, coin = %mirror.coin_id, "deleted mirror");
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Re-encode a single key or value.
pub fn convert(raw: &str, input: ValueFormat, output: ValueFormat) -> anyhow::Result<String> {
    let bytes = match input {
        ValueFormat::Hex => decode_hex(raw).with_context(|| format!("{raw:?} is not valid hex"))?,
        ValueFormat::Utf8 => raw.as_bytes().to_vec(),
    };
    match output {
        ValueFormat::Hex => Ok(format!("0x{}", hex::encode(bytes))),
        ValueFormat::Utf8 => {
            String::from_utf8(bytes).map_err(|_| anyhow!("{raw:?} does not decode to UTF-8"))
        }
    }
}

fn convert_key_value(
    kv: &KeyValue,
    input: ValueFormat,
    output: ValueFormat,
) -> anyhow::Result<KeyValue> {
    Ok(KeyValue {
        atom: None,
        hash: kv.hash.clone(),
        key: convert(&kv.key, input, output)?,
        value: convert(&kv.value, input, output)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_utf8() {
        assert_eq!(convert("0x68656c6c6f", ValueFormat::Hex, ValueFormat::Utf8).expect("convert"), "hello");
        assert_eq!(convert("776f726c64", ValueFormat::Hex, ValueFormat::Utf8).expect("convert"), "world");
        assert_eq!(convert("", ValueFormat::Hex, ValueFormat::Utf8).expect("convert"), "");
    }

    #[test]
    fn utf8_to_hex_is_prefixed() {
        assert_eq!(
            convert("hello", ValueFormat::Utf8, ValueFormat::Hex).expect("convert"),
            "0x68656c6c6f"
        );
    }

    #[test]
    fn hex_to_hex_normalises_prefix() {
        assert_eq!(
            convert("ABCD", ValueFormat::Hex, ValueFormat::Hex).expect("convert"),
            "0xabcd"
        );
    }

    #[test]
    fn invalid_input_is_an_error() {
        assert!(convert("0xzz", ValueFormat::Hex, ValueFormat::Utf8).is_err());
        assert!(convert("abc", ValueFormat::Hex, ValueFormat::Utf8).is_err());
        assert!(convert("0xff", ValueFormat::Hex, ValueFormat::Utf8).is_err());
    }

    #[test]
    fn key_values_keep_hash_and_drop_atom() {
        let kv = KeyValue {
            atom: Some(serde_json::json!(null)),
            hash: "0x01".into(),
            key: "0x6b6579".into(),
            value: "0x76616c7565".into(),
        };
        let converted =
            convert_key_value(&kv, ValueFormat::Hex, ValueFormat::Utf8).expect("convert");
        assert_eq!(converted.hash, "0x01");
        assert_eq!(converted.key, "key");
        assert_eq!(converted.value, "value");
        assert!(converted.atom.is_none());
    }
}
