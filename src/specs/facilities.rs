// src/specs/facilities.rs
//! Scraping *spec* for the facility search results page.
//!
//! Purpose:
//! - Find the results container in the POSTed search response.
//! - Cut it into fragments, one per facility entry, in document order.
//! - Map each fragment's labeled values onto a `FacilityRecord`.
//!
//! Two layouts are read:
//! - **Tabular**: a `<table>` with a header row of `<th>` cells; every later
//!   row with `<td>` cells is one facility, labeled by column header.
//! - **Block**: `li` / `article` / `.facility` / `.result-item` / `.card` / `dl`
//!   entries (or a headerless two-column label table) whose values are labeled
//!   by `<dt>`/`<dd>`, `<th>`/`<td>` rows, or inline "Label: value" text.
//!
//! Fragments without a name and an identifier are page noise and are dropped.
//! A page without any results container is `MalformedDocument`; a container
//! with no entries is simply an empty result.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::core::html::{child_elements, hrefs, id_or_class_in, is_inside, sel, tag_is, text_lines, text_of};
use crate::error::{Result, ScrapeError};
use crate::record::FacilityRecord;
use crate::specs::fields::{Field, Labeled, RecordBuilder};

/// id/class names that mark the results region.
const CONTAINER_NAMES: &[&str] = &[
    "results",
    "searchresults",
    "search-results",
    "facilityresults",
    "facility-results",
];

static ID_OR_CLASS: LazyLock<Selector> = LazyLock::new(|| sel("[id], [class]"));
static TABLE: LazyLock<Selector> = LazyLock::new(|| sel("table"));
static TR: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static THEAD_TR: LazyLock<Selector> = LazyLock::new(|| sel("thead tr"));
static DL: LazyLock<Selector> = LazyLock::new(|| sel("dl"));
static CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| sel("table, li, article, .facility, .result-item, .card, dl"));
static TOO_MANY_MODAL: LazyLock<Selector> =
    LazyLock::new(|| sel("#AllFacilitiesModal, #ClinicLabModal"));

/// The raw markup of one facility entry, reduced to labeled values.
#[derive(Clone, Debug, Default)]
pub struct Fragment {
    pub pairs: Vec<Labeled>,
    /// Cell texts of a table row, for the phone fallback. Empty for blocks and
    /// for tables with a phone column.
    pub cells: Vec<String>,
    pub links: Vec<String>,
}

impl Fragment {
    fn to_record(&self) -> Option<FacilityRecord> {
        let mut b = RecordBuilder::default();
        for p in &self.pairs {
            b.apply(p);
        }
        b.fallbacks(&self.links, &self.cells);
        b.finish()
    }
}

/// Lazy, single-pass sequence of records in page order.
/// Fragments are cut eagerly; records are assembled (and noise dropped) on `next()`.
pub struct Records {
    fragments: std::vec::IntoIter<Fragment>,
    dropped: usize,
}

impl Records {
    /// Fragments discarded so far for lacking a name or identifier.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Iterator for Records {
    type Item = FacilityRecord;

    fn next(&mut self) -> Option<FacilityRecord> {
        for frag in self.fragments.by_ref() {
            match frag.to_record() {
                Some(rec) => return Some(rec),
                None => {
                    self.dropped += 1;
                    debug!("dropping fragment without name/identifier");
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.fragments.len()))
    }
}

/// Parse a results page into facility records.
pub fn extract(raw_markup: &str) -> Result<Records> {
    let doc = Html::parse_document(raw_markup);
    let fragments = fragments(&doc)?;
    info!(fragments = fragments.len(), "results page parsed");
    Ok(Records { fragments: fragments.into_iter(), dropped: 0 })
}

/// Cut the document into fragments, or fail if there is no results container.
///
/// id/class containers are tried in document order; the first one holding a
/// real entry wins. Page chrome that merely carries a `results` class (a
/// "2 results" counter) is skipped that way. Next comes a table whose header
/// speaks our labels. Only when every container is empty is the result empty.
pub fn fragments(doc: &Html) -> Result<Vec<Fragment>> {
    let mut fallback: Option<Vec<Fragment>> = None;

    for c in doc.select(&ID_OR_CLASS).filter(|el| id_or_class_in(*el, CONTAINER_NAMES)) {
        let frags = cut_fragments(c);
        if frags.iter().any(|f| f.to_record().is_some()) {
            debug!(tag = c.value().name(), "results container by id/class");
            return Ok(frags);
        }
        // keep the first non-empty one so its noise is still counted
        if fallback.as_ref().is_none_or(|f| f.is_empty()) {
            fallback = Some(frags);
        }
    }

    if let Some(table) = labeled_table(doc) {
        let frags = cut_fragments(table);
        if !frags.is_empty() || fallback.is_none() {
            debug!("results container by labeled table header");
            return Ok(frags);
        }
    }

    if let Some(frags) = fallback {
        debug!(fragments = frags.len(), "results container holds no entries");
        return Ok(frags);
    }

    if doc.select(&TOO_MANY_MODAL).next().is_some() {
        warn!("site answered with the bulk-download modal instead of a results list");
        return Err(ScrapeError::MalformedDocument(s!(
            "search matched too many facilities; the site offered a bulk download instead of a results list"
        )));
    }
    Err(ScrapeError::MalformedDocument(s!("results container not found")))
}

/* ---------------- container ---------------- */

/// A bare table whose header row speaks our labels.
fn labeled_table(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&TABLE).find(|t| {
        header_cells(*t).is_some_and(|h| h.iter().any(|l| Field::from_label(l).is_some()))
    })
}

/* ---------------- fragments ---------------- */

fn cut_fragments(container: ElementRef<'_>) -> Vec<Fragment> {
    let mut out = Vec::new();

    if tag_is(container, "table") {
        if let Some(headers) = header_cells(container) {
            table_rows(container, &headers, &mut out);
        } else if is_label_table(container) {
            out.push(block_fragment(container));
        }
        return out;
    }

    // Roots already turned into fragments; anything inside them is theirs.
    let mut taken: Vec<ElementRef<'_>> = Vec::new();

    for el in container.select(&CANDIDATES) {
        if el.id() == container.id() { continue; }
        if taken.iter().any(|t| is_inside(el, *t)) { continue; }

        if tag_is(el, "table") {
            if let Some(headers) = header_cells(el) {
                table_rows(el, &headers, &mut out);
                taken.push(el);
            } else if is_label_table(el) {
                out.push(block_fragment(el));
                taken.push(el);
            }
            // layout tables: look inside instead
        } else {
            out.push(block_fragment(el));
            taken.push(el);
        }
    }
    out
}

/// Header labels of a results table: the `<thead>` row, or the first row made
/// only of `<th>` cells (at least two). Label tables (`th` + `td` rows) have none.
fn header_cells(table: ElementRef<'_>) -> Option<Vec<String>> {
    let row = table
        .select(&THEAD_TR)
        .next()
        .or_else(|| {
            table.select(&TR).find(|tr| {
                let cells = child_elements(*tr, &["th", "td"]);
                cells.len() >= 2 && cells.iter().all(|c| tag_is(*c, "th"))
            })
        })?;
    let headers: Vec<String> = child_elements(row, &["th", "td"]).into_iter().map(text_of).collect();
    if headers.len() >= 2 { Some(headers) } else { None }
}

/// A detail-style table: at least two rows of `<th>Label</th><td>Value</td>`.
fn is_label_table(table: ElementRef<'_>) -> bool {
    table.select(&TR).filter(|tr| label_row(*tr).is_some()).count() >= 2
}

fn label_row(tr: ElementRef<'_>) -> Option<(ElementRef<'_>, ElementRef<'_>)> {
    let cells = child_elements(tr, &["th", "td"]);
    match cells.as_slice() {
        [l, v, ..] if tag_is(*l, "th") && tag_is(*v, "td") => Some((*l, *v)),
        _ => None,
    }
}

fn first_href(el: ElementRef<'_>) -> Option<String> {
    hrefs(el).into_iter().next()
}

fn table_rows(table: ElementRef<'_>, headers: &[String], out: &mut Vec<Fragment>) {
    // A labeled phone column is authoritative, even when it holds a placeholder.
    let phone_column = headers.iter().any(|h| Field::from_label(h) == Some(Field::Phone));

    for tr in table.select(&TR) {
        let cells = child_elements(tr, &["th", "td"]);
        if !cells.iter().any(|c| tag_is(*c, "td")) { continue; } // header / spacer rows

        let mut frag = Fragment::default();
        for (i, cell) in cells.iter().enumerate() {
            let value = text_of(*cell);
            if let Some(label) = headers.get(i) {
                frag.pairs.push(Labeled { label: label.clone(), value: value.clone(), href: first_href(*cell) });
            }
            if !phone_column {
                frag.cells.push(value);
            }
            frag.links.extend(hrefs(*cell));
        }
        out.push(frag);
    }
}

fn block_fragment(el: ElementRef<'_>) -> Fragment {
    let mut frag = Fragment::default();

    // <dt>Label</dt><dd>Value</dd>
    let lists: Vec<ElementRef<'_>> = if tag_is(el, "dl") {
        vec![el]
    } else {
        el.select(&DL).collect()
    };
    for dl in lists {
        let mut label: Option<String> = None;
        for item in child_elements(dl, &["dt", "dd"]) {
            if tag_is(item, "dt") {
                label = Some(text_of(item));
            } else if let Some(l) = label.take() {
                frag.pairs.push(Labeled { label: l, value: text_of(item), href: first_href(item) });
            }
        }
    }

    // <tr><th>Label</th><td>Value</td></tr>
    for tr in el.select(&TR) {
        if let Some((l, v)) = label_row(tr) {
            frag.pairs.push(Labeled { label: text_of(l), value: text_of(v), href: first_href(v) });
        }
    }

    // Label: value
    for line in text_lines(el) {
        if let Some((l, v)) = line.split_once(':') {
            let l = l.trim();
            if !l.is_empty() && l.len() <= 48 {
                frag.pairs.push(Labeled { label: l.to_string(), value: v.trim().to_string(), href: None });
            }
        }
    }

    frag.links = hrefs(el);
    frag
}
