// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{borrow::Cow, fs, time::Duration};

use reifydb_type::{Error, FetchCause, Result};
use reqwest::{blocking::Client, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};

use crate::{SourceFormat, SourceLocator};

/// Transport settings for a fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
	/// Handed to the http transport; local reads ignore it.
	pub timeout: Option<Duration>,
	pub user_agent: String,
}

impl Default for FetchConfig {
	fn default() -> Self {
		Self {
			timeout: Some(Duration::from_secs(30)),
			user_agent: concat!("reifydb-source/", env!("CARGO_PKG_VERSION")).to_string(),
		}
	}
}

impl FetchConfig {
	pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}
}

/// Raw bytes of a fetched source.
#[derive(Debug, Clone)]
pub struct Content {
	pub locator: SourceLocator,
	pub bytes: Vec<u8>,
	pub content_type: Option<String>,
}

impl Content {
	pub fn new(locator: SourceLocator, bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			locator,
			bytes: bytes.into(),
			content_type: None,
		}
	}

	/// Decodes the bytes, replacing invalid sequences.
	pub fn text_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.bytes)
	}

	pub fn format(&self) -> Option<SourceFormat> {
		SourceFormat::detect(&self.locator, self.content_type.as_deref())
	}
}

/// Reads the whole source. Failures are never retried here.
#[instrument(name = "source::fetch", level = "debug", skip(config), fields(locator = %locator))]
pub fn fetch(locator: &SourceLocator, config: &FetchConfig) -> Result<Content> {
	let result = match locator {
		SourceLocator::File(path) => {
			fs::read(path).map(|bytes| Content::new(locator.clone(), bytes)).map_err(FetchCause::Io)
		}
		SourceLocator::Url(url) => fetch_url(url, config).map(|(bytes, content_type)| Content {
			locator: locator.clone(),
			bytes,
			content_type,
		}),
	};

	match result {
		Ok(content) => {
			debug!(bytes = content.bytes.len(), "fetched source");
			Ok(content)
		}
		Err(cause) => {
			warn!("failed to fetch {}: {}", locator, cause);
			Err(Error::Fetch {
				locator: locator.to_string(),
				source: cause,
			})
		}
	}
}

fn fetch_url(url: &url::Url, config: &FetchConfig) -> std::result::Result<(Vec<u8>, Option<String>), FetchCause> {
	let mut builder = Client::builder().user_agent(config.user_agent.clone());
	if let Some(timeout) = config.timeout {
		builder = builder.timeout(timeout);
	}
	let client = builder.build().map_err(transport)?;

	let response = client.get(url.as_str()).send().map_err(transport)?;
	let status = response.status();
	if !status.is_success() {
		return Err(FetchCause::Status(status.as_u16()));
	}

	let content_type =
		response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).map(str::to_string);
	let bytes = response.bytes().map_err(transport)?;
	Ok((bytes.to_vec(), content_type))
}

fn transport(err: reqwest::Error) -> FetchCause {
	FetchCause::Transport(Box::new(err))
}
