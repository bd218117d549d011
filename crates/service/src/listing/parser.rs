//! Extraction of cashbox rows from the console's listing grid.
//!
//! The grid has no stable ids or classes, so rows are located structurally
//! (`table > tbody > tr`) and cells are read by position through
//! [`ColumnLayout`].

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::domain::{CashboxRecord, RawDocument};
use super::errors::ListingError;

/// Zero-based `<td>` positions of each field within a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub ip: usize,
    pub online: usize,
    pub version: usize,
    pub open: usize,
    pub cashier: usize,
}

/// Layout of the console's `pos/index` grid.
pub const LISTING_COLUMNS: ColumnLayout = ColumnLayout {
    name: 2,
    ip: 3,
    online: 4,
    version: 5,
    open: 6,
    cashier: 8,
};

impl ColumnLayout {
    /// Minimum number of cells a row must have.
    pub fn width(&self) -> usize {
        [self.name, self.ip, self.online, self.version, self.open, self.cashier]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        LISTING_COLUMNS
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListingParser {
    layout: ColumnLayout,
}

impl ListingParser {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    /// Parse the listing page and keep the rows that have an address and run
    /// the reference version (see [`resolve_version_reference`]).
    pub fn parse(&self, doc: &RawDocument) -> Result<Vec<CashboxRecord>, ListingError> {
        let html = Html::parse_document(doc.as_str());
        let rows = listing_rows(&html)?;
        if rows.is_empty() {
            return Err(ListingError::parse("listing table has no rows"));
        }

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| self.row_cells(idx, row))
            .collect::<Result<Vec<_>, _>>()?;

        let versions: Vec<String> = rows.iter().map(|cells| cell_text(cells[self.layout.version])).collect();
        let reference = resolve_version_reference(&versions)
            .ok_or_else(|| ListingError::parse("no version cells to resolve a reference from"))?;
        debug!(rows = rows.len(), reference, "resolved version reference");

        let records = rows
            .iter()
            .map(|cells| self.record(cells))
            .filter(|rec| !rec.ip.is_empty() && rec.version == reference)
            .collect();
        Ok(records)
    }

    fn row_cells<'a>(&self, idx: usize, row: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, ListingError> {
        let cells: Vec<ElementRef<'a>> = child_elements(row, "td").collect();
        if cells.len() < self.layout.width() {
            return Err(ListingError::parse(format!(
                "row {idx} has {} cells, expected at least {}",
                cells.len(),
                self.layout.width()
            )));
        }
        Ok(cells)
    }

    fn record(&self, cells: &[ElementRef<'_>]) -> CashboxRecord {
        let l = &self.layout;
        CashboxRecord {
            name: cell_text(cells[l.name]),
            ip: cell_text(cells[l.ip]),
            online: is_indicator_set(cells[l.online]),
            version: cell_text(cells[l.version]),
            open: is_indicator_set(cells[l.open]),
            cashier: cell_text(cells[l.cashier]),
        }
    }
}

/// Body rows of the first table in the document.
fn listing_rows(html: &Html) -> Result<Vec<ElementRef<'_>>, ListingError> {
    let table_sel = Selector::parse("table").map_err(|e| ListingError::parse(format!("bad selector: {e}")))?;
    let table = html
        .select(&table_sel)
        .next()
        .ok_or_else(|| ListingError::parse("listing table not found"))?;

    Ok(child_elements(table, "tbody")
        .flat_map(|body| child_elements(body, "tr"))
        .collect())
}

fn child_elements<'a>(parent: ElementRef<'a>, tag: &'static str) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// Concatenated descendant text, untrimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

/// State flag of an indicator cell: the console renders a set flag as an
/// icon element carrying a status attribute and leaves the cell empty
/// otherwise. True iff the cell's first child node is an element with at
/// least one attribute.
pub fn is_indicator_set(cell: ElementRef<'_>) -> bool {
    cell.first_child()
        .and_then(|child| child.value().as_element())
        .map_or(false, |el| el.attrs().next().is_some())
}

/// First entry of the byte-wise sorted version strings, i.e. the
/// lexicographic minimum. Multi-part versions do not order numerically
/// here (`"10.0"` < `"2.0"`); rows are filtered against exactly this value.
pub fn resolve_version_reference(versions: &[String]) -> Option<&str> {
    let mut sorted: Vec<&str> = versions.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.first().copied()
}
