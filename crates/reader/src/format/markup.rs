// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use once_cell::sync::Lazy;
use reifydb_type::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{RawCell, RawRow, RawTable, Section, TableLocator};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("static selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));

pub(crate) fn parse(text: &str, locator: Option<&TableLocator>) -> Result<RawTable> {
	let document = Html::parse_document(text);
	let table = match locator {
		Some(locator) => select(&document, locator)?,
		None => best_table(&document)?,
	};
	Ok(read_table(table))
}

fn select<'a>(document: &'a Html, locator: &TableLocator) -> Result<ElementRef<'a>> {
	let selector = Selector::parse(locator.css()).map_err(|e| Error::Selector {
		selector: locator.text().to_string(),
		reason: e.to_string(),
	})?;

	let matches: Vec<ElementRef<'a>> = document.select(&selector).collect();
	let element = matches
		.get(locator.index())
		.copied()
		.ok_or_else(|| Error::no_match(locator.text(), locator.index(), matches.len()))?;

	if is_table(element) {
		return Ok(element);
	}
	element.select(&TABLE).next().ok_or_else(|| Error::no_match(locator.text(), locator.index(), 0))
}

/// Without a selector the table with the most `rows x first-row cells` wins;
/// ties go to the earlier table.
fn best_table(document: &Html) -> Result<ElementRef<'_>> {
	let mut best: Option<(usize, ElementRef<'_>)> = None;
	for table in document.select(&TABLE) {
		let rows = rows_of(table);
		let score = rows.len() * rows.first().map(|row| cells_of(*row).count()).unwrap_or(0);
		if best.is_none_or(|(best_score, _)| score > best_score) {
			best = Some((score, table));
		}
	}

	let (score, table) = best.ok_or_else(|| Error::no_match("table", 0, 0))?;
	debug!(score, "selected best table");
	Ok(table)
}

fn read_table(table: ElementRef<'_>) -> RawTable {
	let rows = rows_of(table)
		.into_iter()
		.map(|row| {
			let cells = cells_of(row)
				.map(|cell| RawCell {
					text: normalize(cell),
					header: cell.value().name() == "th",
				})
				.collect();
			RawRow::new(section_of(row), cells)
		})
		.collect();
	RawTable::new(rows)
}

/// Rows owned by `table`, skipping rows of nested tables.
fn rows_of(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
	table.select(&ROW).filter(|row| owning_table(*row).is_some_and(|owner| owner.id() == table.id())).collect()
}

fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
	row.ancestors().filter_map(ElementRef::wrap).find(|element| is_table(*element))
}

fn cells_of(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
	row.children().filter_map(ElementRef::wrap).filter(|cell| matches!(cell.value().name(), "th" | "td"))
}

fn section_of(row: ElementRef<'_>) -> Section {
	match row.parent().and_then(ElementRef::wrap).map(|parent| parent.value().name()) {
		Some("thead") => Section::Head,
		Some("tfoot") => Section::Foot,
		_ => Section::Body,
	}
}

fn is_table(element: ElementRef<'_>) -> bool {
	element.value().name() == "table"
}

fn normalize(cell: ElementRef<'_>) -> String {
	let text: String = cell.text().collect();
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	const TWO_TABLES: &str = r#"
		<html><body>
		<table id="small"><tr><td>a</td></tr></table>
		<table id="large">
			<thead><tr><th>H0</th><th>H1</th></tr></thead>
			<tbody>
				<tr><td>R0C0</td><td>R0<b>C1</b></td></tr>
				<tr><td>R1C0</td><td>
					<table><tr><td>nested</td></tr></table>
				</td></tr>
			</tbody>
		</table>
		</body></html>
	"#;

	#[test]
	fn test_best_table() {
		let table = parse(TWO_TABLES, None).unwrap();
		assert_eq!(table.rows.len(), 3);
		assert_eq!(table.rows[0].section, Section::Head);
		assert!(table.rows[0].cells.iter().all(|cell| cell.header));
		assert_eq!(table.rows[1].texts(), vec!["R0C0", "R0C1"]);
	}

	#[test]
	fn test_nested_rows_are_excluded() {
		let table = parse(TWO_TABLES, Some(&TableLocator::new("#large"))).unwrap();
		assert_eq!(table.rows.len(), 3);
		assert_eq!(table.rows[2].texts(), vec!["R1C0", "nested"]);
	}

	#[test]
	fn test_eq_selects_occurrence() {
		let table = parse(TWO_TABLES, Some(&TableLocator::new("table:eq(0)"))).unwrap();
		assert_eq!(table.rows.len(), 1);
		assert_eq!(table.rows[0].texts(), vec!["a"]);
	}

	#[test]
	fn test_selector_on_container() {
		let html = r#"<div id="content"><p>intro</p><table><tr><td>x</td></tr></table></div>"#;
		let table = parse(html, Some(&TableLocator::new("#content"))).unwrap();
		assert_eq!(table.rows[0].texts(), vec!["x"]);
	}

	#[test]
	fn test_no_match() {
		let err = parse(TWO_TABLES, Some(&TableLocator::new("table.wikitable"))).unwrap_err();
		assert!(matches!(err, Error::NoMatch { matches: 0, .. }));

		let err = parse(TWO_TABLES, Some(&TableLocator::new("table:eq(5)"))).unwrap_err();
		assert!(matches!(
			err,
			Error::NoMatch {
				index: 5,
				..
			}
		));
	}

	#[test]
	fn test_document_without_tables() {
		let err = parse("<p>nothing here</p>", None).unwrap_err();
		assert!(matches!(err, Error::NoMatch { .. }));
	}

	#[test]
	fn test_invalid_selector() {
		let err = parse(TWO_TABLES, Some(&TableLocator::new("table[["))).unwrap_err();
		assert!(matches!(err, Error::Selector { .. }));
	}

	#[test]
	fn test_rows_without_sections_get_an_implicit_body() {
		let html = "<table><tr><th>H0</th></tr><tr><td>R0C0</td></tr></table>";
		let table = parse(html, None).unwrap();
		assert!(table.rows.iter().all(|row| row.section == Section::Body));
		assert!(table.rows[0].cells[0].header);
	}
}
