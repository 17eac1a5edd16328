//! Request and response payloads for the service RPC endpoints used here.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Every service RPC response carries these two fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NetworkInfo {
    pub network_name: String,
    #[serde(default)]
    pub network_prefix: Option<String>,
}

/// A coin as the wallet reports it. Hashes are `0x`-prefixed hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub parent_coin_info: String,
    pub puzzle_hash: String,
    pub amount: u64,
}

impl Coin {
    /// The coin ID: `sha256(parent || puzzle_hash || amount)`, with the amount
    /// in chia's minimal signed big-endian encoding.
    pub fn id(&self) -> Result<String, hex::FromHexError> {
        let parent = decode_hex(&self.parent_coin_info)?;
        let puzzle_hash = decode_hex(&self.puzzle_hash)?;

        let mut hasher = Sha256::new();
        hasher.update(&parent);
        hasher.update(&puzzle_hash);
        hasher.update(amount_bytes(self.amount));
        Ok(format!("0x{}", hex::encode(hasher.finalize())))
    }
}

/// Minimal two's-complement big-endian bytes; zero encodes as nothing.
fn amount_bytes(amount: u64) -> Vec<u8> {
    if amount == 0 {
        return Vec::new();
    }
    let bytes = amount.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    let mut out = Vec::with_capacity(9);
    if bytes[first] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&bytes[first..]);
    out
}

/// Decode hex with or without a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

#[derive(Clone, Debug, Deserialize)]
pub struct CoinRecord {
    pub coin: Coin,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpendableCoins {
    #[serde(default)]
    pub confirmed_records: Vec<CoinRecord>,
}

impl SpendableCoins {
    /// The record with the largest amount, if any has a non-zero amount.
    pub fn largest(&self) -> Option<&CoinRecord> {
        self.confirmed_records
            .iter()
            .filter(|record| record.coin.amount > 0)
            .max_by_key(|record| record.coin.amount)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SplitCoinsRequest {
    pub wallet_id: u32,
    pub target_coin_id: String,
    pub amount_per_coin: u64,
    pub number_of_coins: u32,
    pub fee: u64,
    pub push: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SplitCoinsResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Subscriptions {
    #[serde(default)]
    pub store_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mirror {
    pub coin_id: String,
    pub launcher_id: String,
    pub amount: u64,
    #[serde(default)]
    pub urls: Vec<String>,
    pub ours: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mirrors {
    #[serde(default)]
    pub mirrors: Vec<Mirror>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<serde_json::Value>,
    pub hash: String,
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KeysValues {
    #[serde(default)]
    pub keys_values: Vec<KeyValue>,
}
