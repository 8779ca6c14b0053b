// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error taxonomy of the external source adapter.
//!
//! Every variant keeps the lower-level cause reachable through
//! [`std::error::Error::source`]. Structural irregularities in source
//! documents are absorbed by the reader and never show up here.

mod diagnostic;

pub use diagnostic::{Diagnostic, IntoDiagnostic};

pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The source address is syntactically malformed or names a scheme the
	/// adapter cannot read. The message is the message of the cause.
	#[error("{source}")]
	SourceResolution {
		locator: String,
		source: LocatorError,
	},

	/// The source could not be read from the network or the filesystem.
	#[error("failed to fetch {locator}: {source}")]
	Fetch {
		locator: String,
		source: FetchCause,
	},

	#[error("bad selector {selector}: {}", no_match_reason(.index, .matches))]
	NoMatch {
		selector: String,
		index: usize,
		matches: usize,
	},

	#[error("invalid selector {selector}: {reason}")]
	Selector {
		selector: String,
		reason: String,
	},

	#[error("failed to parse {locator}: {source}")]
	Parse {
		locator: String,
		source: ParseCause,
	},

	#[error("invalid relation definition '{name}': {reason}")]
	InvalidDefinition {
		name: String,
		reason: String,
	},

	/// A pushdown request or plan the executor cannot evaluate.
	#[error("cannot evaluate {relation}: {reason}")]
	Unsupported {
		relation: String,
		reason: String,
	},
}

fn no_match_reason(index: &usize, matches: &usize) -> String {
	if *matches == 0 {
		"no element matched".to_string()
	} else {
		format!("index {} out of range for {} match(es)", index, matches)
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.into_diagnostic()
	}

	pub fn unsupported(relation: impl Into<String>, reason: impl Into<String>) -> Self {
		Error::Unsupported {
			relation: relation.into(),
			reason: reason.into(),
		}
	}

	pub fn no_match(selector: impl Into<String>, index: usize, matches: usize) -> Self {
		Error::NoMatch {
			selector: selector.into(),
			index,
			matches,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
	#[error("unknown protocol: {0}")]
	UnknownProtocol(String),

	#[error(transparent)]
	Syntax(#[from] url::ParseError),

	#[error("url does not denote a local file: {0}")]
	NotAFile(String),

	#[error("empty source address")]
	Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchCause {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("server responded with status {0}")]
	Status(u16),

	#[error(transparent)]
	Transport(BoxedCause),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseCause {
	#[error(transparent)]
	Format(BoxedCause),

	#[error("{0}")]
	Shape(String),
}
