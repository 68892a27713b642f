//! Route execution models
//!
//! Mirrors the route shape the bridging widget hands to its event listeners.
//! Only the fields the reporting pipeline reads are modelled; anything else the
//! widget sends is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Token descriptor attached to each side of a route
///
/// Missing fields fall back to defaults so one sparse token does not sink the
/// whole event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
	/// Contract address (zero address for native assets)
	pub address: String,
	/// Chain the token lives on
	pub chain_id: u64,
	pub symbol: String,
	pub decimals: u8,
	pub name: String,
	#[serde(rename = "priceUSD", default, skip_serializing_if = "Option::is_none")]
	pub price_usd: Option<String>,
	#[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
	pub logo_uri: Option<String>,
}

impl Token {
	pub fn new(
		address: impl Into<String>,
		chain_id: u64,
		symbol: impl Into<String>,
		decimals: u8,
	) -> Self {
		let symbol = symbol.into();
		Self {
			address: address.into(),
			chain_id,
			name: symbol.clone(),
			symbol,
			decimals,
			price_usd: None,
			logo_uri: None,
		}
	}
}

/// A single execution attempt within a step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Process {
	/// Process kind as reported by the widget (e.g. "TOKEN_ALLOWANCE", "SWAP")
	#[serde(rename = "type", default)]
	pub process_type: String,
	/// Widget status string (e.g. "PENDING", "DONE", "FAILED")
	#[serde(default)]
	pub status: String,
	/// Transaction hash, present once the attempt was broadcast
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tx_hash: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tx_link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Process {
	/// Create a process that has been broadcast with the given hash
	pub fn broadcast(tx_hash: impl Into<String>) -> Self {
		Self {
			tx_hash: Some(tx_hash.into()),
			..Default::default()
		}
	}

	/// Transaction hash if one was broadcast. Empty hashes count as absent.
	pub fn transaction_hash(&self) -> Option<&str> {
		self.tx_hash.as_deref().filter(|hash| !hash.is_empty())
	}
}

/// Execution state of a step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepExecution {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub process: Vec<Process>,
}

/// One bridging or swap leg of a route
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
	#[serde(default)]
	pub id: String,
	#[serde(rename = "type", default)]
	pub step_type: String,
	/// Bridge or exchange used for this leg
	#[serde(default)]
	pub tool: String,
	/// Absent until the widget starts executing the step
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub execution: Option<StepExecution>,
}

impl Step {
	/// Create a step whose execution holds the given processes
	pub fn with_processes(processes: Vec<Process>) -> Self {
		Self {
			execution: Some(StepExecution {
				status: String::new(),
				process: processes,
			}),
			..Default::default()
		}
	}

	/// First execution attempt, if execution has started
	pub fn first_process(&self) -> Option<&Process> {
		self.execution
			.as_ref()
			.and_then(|execution| execution.process.first())
	}
}

/// A complete cross-chain transfer or swap plan
///
/// Everything but the id is optional on the wire; absent fields stay `None`
/// rather than turning into zeroes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_token: Option<Token>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_amount: Option<String>,
	#[serde(rename = "fromAmountUSD", default, skip_serializing_if = "Option::is_none")]
	pub from_amount_usd: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_chain_id: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_token: Option<Token>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_amount: Option<String>,
	#[serde(rename = "toAmountUSD", default, skip_serializing_if = "Option::is_none")]
	pub to_amount_usd: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_chain_id: Option<u64>,
	#[serde(default)]
	pub steps: Vec<Step>,
}

impl Route {
	/// Hash of the first process of the first step.
	///
	/// This is the transaction that identifies a completed route. Routes with no
	/// steps, an unstarted first step, or an unbroadcast first process yield `None`.
	pub fn first_transaction_hash(&self) -> Option<&str> {
		self.steps
			.first()
			.and_then(Step::first_process)
			.and_then(Process::transaction_hash)
	}
}

/// Progress notification for a route that is still (or was last) executing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteExecutionUpdate {
	pub route: Route,
	pub process: Process,
}

impl RouteExecutionUpdate {
	pub fn new(route: Route, process: Process) -> Self {
		Self { route, process }
	}

	/// Hash of the update's own process
	pub fn transaction_hash(&self) -> Option<&str> {
		self.process.transaction_hash()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_first_transaction_hash_from_first_step() {
		let route = Route {
			id: "r1".to_string(),
			steps: vec![
				Step::with_processes(vec![Process::broadcast("0xabc"), Process::broadcast("0xdef")]),
				Step::with_processes(vec![Process::broadcast("0x123")]),
			],
			..Default::default()
		};

		assert_eq!(route.first_transaction_hash(), Some("0xabc"));
	}

	#[test]
	fn test_first_transaction_hash_absent_cases() {
		let no_steps = Route::default();
		assert_eq!(no_steps.first_transaction_hash(), None);

		let unstarted = Route {
			steps: vec![Step::default()],
			..Default::default()
		};
		assert_eq!(unstarted.first_transaction_hash(), None);

		let no_process = Route {
			steps: vec![Step::with_processes(vec![])],
			..Default::default()
		};
		assert_eq!(no_process.first_transaction_hash(), None);

		let not_broadcast = Route {
			steps: vec![Step::with_processes(vec![Process::default()])],
			..Default::default()
		};
		assert_eq!(not_broadcast.first_transaction_hash(), None);

		let empty_hash = Route {
			steps: vec![Step::with_processes(vec![Process::broadcast("")])],
			..Default::default()
		};
		assert_eq!(empty_hash.first_transaction_hash(), None);
	}

	#[test]
	fn test_later_steps_are_not_consulted() {
		let route = Route {
			steps: vec![
				Step::with_processes(vec![]),
				Step::with_processes(vec![Process::broadcast("0x123")]),
			],
			..Default::default()
		};

		assert_eq!(route.first_transaction_hash(), None);
	}

	#[test]
	fn test_route_deserializes_widget_json() {
		let route: Route = serde_json::from_value(json!({
			"id": "r1",
			"fromAddress": "0xA",
			"fromAmount": "100",
			"fromAmountUSD": "100.00",
			"fromChainId": 1,
			"fromToken": {
				"address": "0x0000000000000000000000000000000000000000",
				"chainId": 1,
				"symbol": "ETH",
				"decimals": 18,
				"name": "Ether",
				"priceUSD": "3000"
			},
			"toAddress": "0xB",
			"toAmount": "95",
			"toAmountUSD": "95.00",
			"toChainId": 10,
			"toAmountMin": "90",
			"insurance": { "state": "NOT_INSURABLE" },
			"steps": [{
				"id": "s1",
				"type": "lifi",
				"tool": "stargate",
				"execution": {
					"status": "DONE",
					"process": [{ "type": "CROSS_CHAIN", "status": "DONE", "txHash": "0xabc" }]
				}
			}]
		}))
		.unwrap();

		assert_eq!(route.id, "r1");
		assert_eq!(route.from_address.as_deref(), Some("0xA"));
		assert_eq!(route.from_chain_id, Some(1));
		assert_eq!(route.to_chain_id, Some(10));
		let from_token = route.from_token.as_ref().unwrap();
		assert_eq!(from_token.symbol, "ETH");
		assert_eq!(from_token.price_usd.as_deref(), Some("3000"));
		assert!(route.to_token.is_none());
		assert_eq!(route.steps[0].tool, "stargate");
		assert_eq!(route.first_transaction_hash(), Some("0xabc"));
	}

	#[test]
	fn test_sparse_token_still_decodes() {
		let route: Route = serde_json::from_value(json!({
			"id": "r1",
			"fromToken": { "address": "0xT", "chainId": 1, "symbol": "USDC" },
			"toToken": {},
			"steps": []
		}))
		.unwrap();

		let from_token = route.from_token.unwrap();
		assert_eq!(from_token.symbol, "USDC");
		assert_eq!(from_token.decimals, 0);
		assert_eq!(from_token.name, "");
		assert_eq!(route.to_token, Some(Token::default()));
		assert_eq!(route.from_amount, None);
	}
}
