// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use super::{Error, FetchCause, LocatorError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] {}", self.code, self.message)?;
		if let Some(cause) = &self.cause {
			write!(f, "\n  caused by: {}", cause)?;
		}
		Ok(())
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

fn cause_of(err: &(dyn StdError + 'static)) -> Option<Box<Diagnostic>> {
	err.source().map(|source| {
		Box::new(Diagnostic {
			code: "CAUSE".to_string(),
			message: source.to_string(),
			label: None,
			help: None,
			notes: vec![],
			cause: cause_of(source),
		})
	})
}

impl IntoDiagnostic for Error {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		let cause = cause_of(&self);
		match self {
			Error::SourceResolution {
				locator,
				source,
			} => {
				let (label, help) = match &source {
					LocatorError::UnknownProtocol(scheme) => (
						format!("scheme '{}' is not supported", scheme),
						"use an http, https or file url, or a plain filesystem path".to_string(),
					),
					LocatorError::Syntax(_) => (
						"address is not a well-formed url".to_string(),
						"check the address for typos or missing characters".to_string(),
					),
					LocatorError::NotAFile(_) => (
						"file url without a local path".to_string(),
						"file urls must point at the local filesystem".to_string(),
					),
					LocatorError::Empty => (
						"empty address".to_string(),
						"provide a filesystem path or a url".to_string(),
					),
				};
				Diagnostic {
					code: "SOURCE_001".to_string(),
					message,
					label: Some(label),
					help: Some(help),
					notes: vec![format!("source address: {}", locator)],
					cause,
				}
			}

			Error::Fetch {
				locator,
				source,
			} => {
				let mut notes = vec![format!("source address: {}", locator)];
				if let FetchCause::Status(status) = &source {
					notes.push(format!("http status: {}", status));
				}
				notes.push("the fetch is not retried; reopen the source to try again".to_string());
				Diagnostic {
					code: "SOURCE_002".to_string(),
					message,
					label: Some("source could not be read".to_string()),
					help: Some("check that the file exists or the host is reachable".to_string()),
					notes,
					cause,
				}
			}

			Error::NoMatch {
				selector,
				index,
				matches,
			} => Diagnostic {
				code: "READER_001".to_string(),
				message,
				label: Some("selector matched no usable table".to_string()),
				help: Some(if matches == 0 {
					format!("no element matches '{}'; check the selector against the document", selector)
				} else {
					format!("use an occurrence index below {}", matches)
				}),
				notes: vec![
					format!("requested occurrence: {}", index),
					format!("matching elements: {}", matches),
				],
				cause,
			},

			Error::Selector {
				selector,
				reason,
			} => Diagnostic {
				code: "READER_003".to_string(),
				message,
				label: Some(reason),
				help: Some("use a css selector, optionally ending in :eq(N) to pick the Nth match".to_string()),
				notes: vec![format!("selector: {}", selector)],
				cause,
			},

			Error::Parse {
				locator,
				..
			} => Diagnostic {
				code: "READER_002".to_string(),
				message,
				label: Some("content could not be parsed".to_string()),
				help: Some("check that the source format matches its file extension".to_string()),
				notes: vec![format!("source address: {}", locator)],
				cause,
			},

			Error::InvalidDefinition {
				name,
				reason,
			} => Diagnostic {
				code: "ADAPTER_001".to_string(),
				message,
				label: Some(reason),
				help: Some("fix the relation definition and register it again".to_string()),
				notes: vec![format!("relation: {}", name)],
				cause,
			},

			Error::Unsupported {
				relation,
				reason,
			} => Diagnostic {
				code: "ADAPTER_002".to_string(),
				message,
				label: Some(reason),
				help: Some("only $match, $project and $group stages produced by the pushdown rules are supported"
					.to_string()),
				notes: vec![format!("relation: {}", relation)],
				cause,
			},
		}
	}
}
