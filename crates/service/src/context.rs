//! Wash trading context
//!
//! Composes the read-state hooks, the mint/reveal/wash actions and the
//! reporting coordinator for one mounted view. It is passed explicitly to
//! whatever needs it; there is no global.

use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};
use wash_config::Settings;
use wash_types::{
	Collection, HookError, HookResult, Item, NftStatus, Quest, Refetch, WashReporter,
};

use crate::actions::RemoteAction;
use crate::coordinator::{ReportingCoordinator, Subscription};
use crate::error::ServiceError;
use crate::event_bus::WidgetEventBus;
use crate::hooks::RemoteResource;
use crate::http_client::build_client;
use crate::reporter::HttpWashReporter;

#[derive(Debug)]
pub struct WashTradingContext {
	pub nft: Arc<RemoteResource<NftStatus>>,
	pub items: Arc<RemoteResource<Vec<Item>>>,
	pub active_quests: Arc<RemoteResource<Vec<Quest>>>,
	pub collection: Arc<RemoteResource<Collection>>,
	/// Refreshes `nft`
	pub mint: RemoteAction,
	/// Refreshes `nft`
	pub reveal: RemoteAction,
	/// Refreshes `items`, then `nft`
	pub wash: RemoteAction,
	coordinator: ReportingCoordinator,
	subscription: Option<Subscription>,
}

impl WashTradingContext {
	/// Build a context reporting to the configured backend
	///
	/// Must be called from within a tokio runtime.
	pub fn from_settings(settings: &Settings) -> Result<Self, ServiceError> {
		let client = build_client(settings)?;
		let reporter = Arc::new(HttpWashReporter::from_settings(client.clone(), settings)?);
		Self::assemble(settings, client, reporter)
	}

	/// Build a context with a custom reporter; hooks still read from the backend
	pub fn with_reporter(
		settings: &Settings,
		reporter: Arc<dyn WashReporter>,
	) -> Result<Self, ServiceError> {
		Self::assemble(settings, build_client(settings)?, reporter)
	}

	fn assemble(
		settings: &Settings,
		client: Client,
		reporter: Arc<dyn WashReporter>,
	) -> Result<Self, ServiceError> {
		let endpoints = &settings.endpoints;

		let nft: Arc<RemoteResource<NftStatus>> = Arc::new(RemoteResource::from_settings(
			"nft",
			client.clone(),
			settings,
			&endpoints.nft,
		)?);
		let items: Arc<RemoteResource<Vec<Item>>> = Arc::new(RemoteResource::from_settings(
			"items",
			client.clone(),
			settings,
			&endpoints.items,
		)?);
		let active_quests: Arc<RemoteResource<Vec<Quest>>> = Arc::new(RemoteResource::from_settings(
			"quests",
			client.clone(),
			settings,
			&endpoints.quests,
		)?);
		let collection: Arc<RemoteResource<Collection>> = Arc::new(RemoteResource::from_settings(
			"collection",
			client.clone(),
			settings,
			&endpoints.collection,
		)?);

		let nft_hook = || Arc::clone(&nft) as Arc<dyn Refetch>;
		let items_hook = || Arc::clone(&items) as Arc<dyn Refetch>;

		let mint = RemoteAction::from_settings(
			"mint",
			client.clone(),
			settings,
			&endpoints.mint,
			vec![nft_hook()],
		)?;
		let reveal = RemoteAction::from_settings(
			"reveal",
			client.clone(),
			settings,
			&endpoints.reveal,
			vec![nft_hook()],
		)?;
		let wash = RemoteAction::from_settings(
			"wash",
			client,
			settings,
			&endpoints.wash,
			vec![items_hook(), nft_hook()],
		)?;

		let coordinator = ReportingCoordinator::new(reporter, nft_hook(), items_hook())?;

		Ok(Self {
			nft,
			items,
			active_quests,
			collection,
			mint,
			reveal,
			wash,
			coordinator,
			subscription: None,
		})
	}

	pub fn coordinator(&self) -> &ReportingCoordinator {
		&self.coordinator
	}

	/// Start reporting events from `bus`. Mounting twice keeps the first subscription.
	pub fn mount(&mut self, bus: &WidgetEventBus) {
		if self.subscription.is_some() {
			debug!("Wash trading context already mounted");
			return;
		}
		self.subscription = Some(self.coordinator.subscribe(bus));
		info!("Wash trading context mounted");
	}

	/// Stop reporting; reports already dispatched keep running
	pub fn unmount(&mut self) {
		if let Some(subscription) = self.subscription.take() {
			subscription.unsubscribe();
			info!("Wash trading context unmounted");
		}
	}

	pub fn is_mounted(&self) -> bool {
		self.subscription.is_some()
	}

	/// Fetch every hook concurrently, returning the failures
	pub async fn load_all(&self) -> Vec<HookError> {
		let hooks: [&dyn Refetch; 4] = [
			self.nft.as_ref(),
			self.items.as_ref(),
			self.active_quests.as_ref(),
			self.collection.as_ref(),
		];

		join_all(hooks.iter().map(|hook| hook.refetch()))
			.await
			.into_iter()
			.filter_map(Result::err)
			.collect()
	}

	/// Mint the account's NFT, then refresh NFT status
	pub async fn on_mint(&self) -> HookResult<String> {
		self.mint.perform(None).await
	}

	/// Reveal the account's NFT, then refresh NFT status
	pub async fn on_reveal(&self) -> HookResult<String> {
		self.reveal.perform(None).await
	}

	/// Spend `item_id` on washing the NFT, then refresh inventory and NFT status
	pub async fn on_wash(&self, item_id: impl Into<String>) -> HookResult<String> {
		self.wash.perform(Some(item_id.into())).await
	}

	/// Wait for dispatched reports and refetches to finish
	pub async fn drain(&self) {
		self.coordinator.drain().await;
	}
}
