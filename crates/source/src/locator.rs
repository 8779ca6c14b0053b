// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	path::{Path, PathBuf},
};

use reifydb_type::{Error, LocatorError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// A resolved external address: a local file or a network url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceLocator {
	File(PathBuf),
	Url(Url),
}

impl SourceLocator {
	/// Resolves an address that is either a filesystem path or a url.
	///
	/// Anything that starts with a scheme of two or more characters is
	/// treated as a url; single letter prefixes are drive letters.
	pub fn resolve(address: &str) -> Result<Self> {
		let address = address.trim();
		if address.is_empty() {
			return Err(resolution_error(address, LocatorError::Empty));
		}
		if has_scheme(address) {
			Self::url(address)
		} else {
			Ok(SourceLocator::File(PathBuf::from(address)))
		}
	}

	/// Resolves an address that must be a url.
	pub fn url(address: &str) -> Result<Self> {
		let url = Url::parse(address.trim()).map_err(|e| resolution_error(address, e.into()))?;

		let scheme = url.scheme().to_string();
		if !SUPPORTED_SCHEMES.contains(&scheme.as_str()) {
			return Err(resolution_error(address, LocatorError::UnknownProtocol(scheme)));
		}

		if scheme == "file" {
			let path = url
				.to_file_path()
				.map_err(|_| resolution_error(address, LocatorError::NotAFile(url.to_string())))?;
			return Ok(SourceLocator::File(path));
		}

		Ok(SourceLocator::Url(url))
	}

	pub fn file(path: impl Into<PathBuf>) -> Self {
		SourceLocator::File(path.into())
	}

	pub fn is_file(&self) -> bool {
		matches!(self, SourceLocator::File(_))
	}

	pub fn as_path(&self) -> Option<&Path> {
		match self {
			SourceLocator::File(path) => Some(path),
			SourceLocator::Url(_) => None,
		}
	}

	/// The last path segment, without any query or fragment.
	pub fn file_name(&self) -> Option<String> {
		match self {
			SourceLocator::File(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
			SourceLocator::Url(url) => url
				.path_segments()
				.and_then(|mut segments| segments.next_back())
				.filter(|segment| !segment.is_empty())
				.map(str::to_string),
		}
	}

	/// Lower-cased extension of the last path segment.
	pub fn extension(&self) -> Option<String> {
		let name = self.file_name()?;
		let (stem, extension) = name.rsplit_once('.')?;
		if stem.is_empty() || extension.is_empty() {
			return None;
		}
		Some(extension.to_ascii_lowercase())
	}

	/// Resolves `child` against this locator. Absolute children are kept
	/// as they are.
	pub fn join(&self, child: &str) -> Result<Self> {
		if has_scheme(child) {
			return Self::url(child);
		}
		match self {
			SourceLocator::File(path) => Ok(SourceLocator::File(path.join(child))),
			SourceLocator::Url(url) => {
				let joined = url.join(child).map_err(|e| resolution_error(child, e.into()))?;
				Ok(SourceLocator::Url(joined))
			}
		}
	}
}

impl Display for SourceLocator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SourceLocator::File(path) => write!(f, "{}", path.display()),
			SourceLocator::Url(url) => write!(f, "{}", url),
		}
	}
}

fn resolution_error(address: &str, source: LocatorError) -> Error {
	Error::SourceResolution {
		locator: address.to_string(),
		source,
	}
}

fn has_scheme(address: &str) -> bool {
	match address.split_once(':') {
		Some((scheme, _)) => {
			scheme.len() > 1
				&& scheme.starts_with(|c: char| c.is_ascii_alphabetic())
				&& scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
		}
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as StdError;

	use super::*;

	#[test]
	fn test_plain_path() {
		let locator = SourceLocator::resolve("sales/DEPTS.csv").unwrap();
		assert_eq!(locator, SourceLocator::File(PathBuf::from("sales/DEPTS.csv")));
		assert_eq!(locator.extension().as_deref(), Some("csv"));
	}

	#[test]
	fn test_drive_letter_is_a_path() {
		let locator = SourceLocator::resolve("C:\\data\\table.html").unwrap();
		assert!(locator.is_file());
	}

	#[test]
	fn test_http_url() {
		let locator =
			SourceLocator::resolve("http://en.wikipedia.org/wiki/List_of_United_States_cities_by_population")
				.unwrap();
		assert!(!locator.is_file());
		assert_eq!(locator.file_name().as_deref(), Some("List_of_United_States_cities_by_population"));
		assert_eq!(locator.extension(), None);
	}

	#[test]
	fn test_file_url_becomes_path() {
		let locator = SourceLocator::resolve("file:///tmp/tableOK.html").unwrap();
		assert_eq!(locator, SourceLocator::File(PathBuf::from("/tmp/tableOK.html")));
	}

	#[test]
	fn test_unknown_protocol() {
		let err = SourceLocator::url("badhttp://en.wikipedia.org/wiki/List_of_United_States_cities_by_population")
			.unwrap_err();
		assert!(matches!(err, Error::SourceResolution { .. }));
		assert_eq!(err.to_string(), "unknown protocol: badhttp");

		let cause = err.source().unwrap().downcast_ref::<LocatorError>().unwrap();
		assert!(matches!(cause, LocatorError::UnknownProtocol(scheme) if scheme == "badhttp"));
		assert_eq!(cause.to_string(), "unknown protocol: badhttp");
	}

	#[test]
	fn test_malformed_url() {
		let err = SourceLocator::resolve("http://[::1").unwrap_err();
		match err {
			Error::SourceResolution {
				source: LocatorError::Syntax(_),
				..
			} => {}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn test_url_without_scheme() {
		let err = SourceLocator::url("en.wikipedia.org/wiki").unwrap_err();
		assert!(matches!(
			err,
			Error::SourceResolution {
				source: LocatorError::Syntax(url::ParseError::RelativeUrlWithoutBase),
				..
			}
		));
	}

	#[test]
	fn test_empty_address() {
		let err = SourceLocator::resolve("  ").unwrap_err();
		assert!(matches!(
			err,
			Error::SourceResolution {
				source: LocatorError::Empty,
				..
			}
		));
	}

	#[test]
	fn test_join() {
		let base = SourceLocator::resolve("http://example.org/data/index.html").unwrap();
		let joined = base.join("depts.csv").unwrap();
		assert_eq!(joined.to_string(), "http://example.org/data/depts.csv");

		let dir = SourceLocator::file("/srv/sales");
		assert_eq!(dir.join("EMPS.json").unwrap(), SourceLocator::file("/srv/sales/EMPS.json"));
	}
}
