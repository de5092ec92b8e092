//! Lifts section headings and sortable wikitables out of a listing page.

use once_cell::sync::Lazy;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info};

use crate::types::RawTable;

// Classic markup wraps heading text in span.mw-headline; current markup uses div.mw-heading > hN.
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "span.mw-headline, div.mw-heading > h2, div.mw-heading > h3, div.mw-heading > h4, table.wikitable.sortable",
    )
    .expect("static block selector")
});
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("static row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("static cell selector"));

/// A table together with the section heading it appears under
#[derive(Debug, Clone, PartialEq)]
pub struct HeadedTable {
    pub heading: Option<String>,
    /// Position of `heading` in `ExtractedPage::headings`
    pub heading_index: Option<usize>,
    pub table: RawTable,
}

/// Headings and tables of one page, both in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    pub headings: Vec<String>,
    pub tables: Vec<HeadedTable>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WikiTableParser;

impl WikiTableParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, bytes: &[u8]) -> ExtractedPage {
        debug!("WikiTableParser: start bytes_len={}", bytes.len());
        let body = String::from_utf8_lossy(bytes);
        let document = Html::parse_document(&body);

        let mut page = ExtractedPage::default();
        let mut current_heading: Option<String> = None;

        for element in document.select(&BLOCK_SELECTOR) {
            if element.value().name() == "table" {
                if nested_in_table(element) {
                    continue;
                }
                let table = parse_table(element);
                debug!(
                    "WikiTableParser: table under {:?} columns={:?} rows={}",
                    current_heading,
                    table.headers,
                    table.rows.len()
                );
                page.tables.push(HeadedTable {
                    heading: current_heading.clone(),
                    heading_index: page.headings.len().checked_sub(1),
                    table,
                });
            } else {
                let heading = element_text(element);
                if !heading.is_empty() {
                    page.headings.push(heading.clone());
                    current_heading = Some(heading);
                }
            }
        }

        info!(
            "WikiTableParser: extracted headings={} tables={}",
            page.headings.len(),
            page.tables.len()
        );
        page
    }
}

fn nested_in_table(table: ElementRef) -> bool {
    table
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "table")
}

/// Rows owned by `table`, excluding rows of tables nested inside it
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let table_id = table.id();
    table.select(&ROW_SELECTOR).filter(move |row| {
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "table")
            .map(|a| a.id() == table_id)
            .unwrap_or(false)
    })
}

struct Cell {
    text: String,
    header: bool,
    rowspan: usize,
    colspan: usize,
}

#[derive(Clone)]
struct Carry {
    remaining: usize,
    value: Option<String>,
}

fn parse_table(table: ElementRef) -> RawTable {
    let rows: Vec<Vec<Cell>> = own_rows(table)
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|c| CELL_SELECTOR.matches(c))
                .map(|c| Cell {
                    text: element_text(c),
                    header: c.value().name() == "th",
                    rowspan: span_attr(c.value(), "rowspan"),
                    colspan: span_attr(c.value(), "colspan"),
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let mut rows = rows.into_iter().peekable();
    let has_header_row = rows
        .peek()
        .map(|first| first.iter().all(|c| c.header))
        .unwrap_or(false);
    let headers: Vec<String> = if has_header_row {
        rows.next()
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| std::iter::repeat(c.text).take(c.colspan))
            .collect()
    } else {
        Vec::new()
    };

    let mut carry: Vec<Option<Carry>> = Vec::new();
    let mut grid = Vec::new();
    for cells in rows {
        // Secondary header rows directly under the header carry no data
        if grid.is_empty() && cells.iter().all(|c| c.header) {
            continue;
        }
        grid.push(expand_row(cells, &mut carry));
    }

    let width = grid
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(headers.len());
    let headers = if headers.len() < width {
        let mut headers = headers;
        headers.extend((headers.len()..width).map(|i| i.to_string()));
        headers
    } else {
        headers
    };
    for row in &mut grid {
        row.resize(width, None);
    }

    RawTable::new(headers, grid)
}

/// Place one row's cells into the grid, filling positions still covered by rowspans from above.
fn expand_row(cells: Vec<Cell>, carry: &mut Vec<Option<Carry>>) -> Vec<Option<String>> {
    let mut out = Vec::new();
    let mut cells = cells.into_iter();
    let mut col = 0;

    loop {
        if let Some(slot) = carry.get_mut(col) {
            if let Some(c) = slot {
                out.push(c.value.clone());
                c.remaining -= 1;
                if c.remaining == 0 {
                    *slot = None;
                }
                col += 1;
                continue;
            }
        }

        let Some(cell) = cells.next() else {
            if carry.iter().skip(col).any(Option::is_some) {
                out.push(None);
                col += 1;
                continue;
            }
            break;
        };

        let value = (!cell.text.is_empty()).then_some(cell.text);
        for _ in 0..cell.colspan {
            if cell.rowspan > 1 {
                if carry.len() <= col {
                    carry.resize(col + 1, None);
                }
                carry[col] = Some(Carry {
                    remaining: cell.rowspan - 1,
                    value: value.clone(),
                });
            }
            out.push(value.clone());
            col += 1;
        }
    }

    out
}

fn span_attr(element: &Element, name: &str) -> usize {
    element
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Visible text of an element with whitespace collapsed; hidden sort keys are skipped.
fn element_text(element: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if el.name() == "br" {
                    out.push(' ');
                } else if !is_hidden(el) {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        collect_text(child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(element: &Element) -> bool {
    element
        .attr("style")
        .map(|s| s.replace(' ', "").to_ascii_lowercase().contains("display:none"))
        .unwrap_or(false)
}
