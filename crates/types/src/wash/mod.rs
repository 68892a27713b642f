//! Wash trading promotion models

use serde::{Deserialize, Serialize};

/// Upper bound of wash progress
pub const MAX_PROGRESS: u8 = 100;

/// Promotional NFT owned by the connected account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
	#[serde(default)]
	pub id: String,
	/// Wash progress in percent
	#[serde(default)]
	pub progress: u8,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub is_revealed: bool,
	#[serde(default)]
	pub is_rare: bool,
}

impl Nft {
	/// Progress clamped to `0..=100`
	pub fn progress_percent(&self) -> u8 {
		self.progress.min(MAX_PROGRESS)
	}

	pub fn is_fully_washed(&self) -> bool {
		self.progress_percent() == MAX_PROGRESS
	}
}

/// NFT ownership as returned by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftStatus {
	#[serde(default, alias = "hasNFT")]
	pub has_nft: bool,
	#[serde(default)]
	pub nft: Option<Nft>,
}

impl NftStatus {
	/// Progress of the owned NFT, zero when none is owned
	pub fn progress(&self) -> u8 {
		self.nft.as_ref().map(Nft::progress_percent).unwrap_or(0)
	}
}

/// Inventory entry (boosts, soaps and similar consumables)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub amount: u32,
}

/// Promotional quest and the account's progress on it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub progress: u32,
	#[serde(default)]
	pub target: u32,
}

impl Quest {
	pub fn is_complete(&self) -> bool {
		self.target > 0 && self.progress >= self.target
	}
}

/// Collection-wide metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub minted: u64,
	#[serde(default)]
	pub revealed: u64,
}

/// Body POSTed by the mint, reveal and wash actions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Inventory item spent by the action (wash only)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub item_id: Option<String>,
}

/// Backend answer to an action; an empty body is accepted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
	#[serde(default)]
	pub status: Option<String>,
}
