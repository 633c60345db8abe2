//! Box Office Mojo title-page extraction.
//!
//! Two page layouts have been served over time. [`PageLayout::current`] is
//! the default; [`PageLayout::legacy`] is kept for archived pages.

use std::collections::HashSet;

use reel_core::error::AppError;
use reel_core::models::{RegionFigure, SummaryFigures};
use reel_core::traits::PageParser;
use reel_core::util::{clean_currency, clean_region_name};
use scraper::{ElementRef, Html, Selector};

/// Structural markers for one title-page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Containers holding the per-region release tables.
    pub section: &'static str,
    pub table: &'static str,
    /// Element name of the region title preceding each table.
    pub heading: &'static str,
    /// Drop the first `tr` of every table before reading cells.
    pub skip_header_row: bool,
    pub summary_panel: &'static str,
    /// First-child descents from the panel to the domestic subsection.
    pub summary_depth: usize,
}

impl PageLayout {
    pub fn current() -> Self {
        Self {
            section: "div.a-section.mojo-gutter",
            table: "table.a-bordered",
            heading: "h3",
            skip_header_row: false,
            summary_panel: "div.mojo-performance-summary-table",
            summary_depth: 1,
        }
    }

    pub fn legacy() -> Self {
        Self {
            section: r#"div[class="a-section mojo-gutter"]"#,
            table: "table.a-bordered",
            heading: "h3",
            skip_header_row: true,
            summary_panel: "div.mojo-performance-summary",
            summary_depth: 2,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::current()
    }
}

/// [`PageParser`] for Box Office Mojo title pages.
#[derive(Debug, Clone)]
pub struct MojoParser {
    layout: PageLayout,
    section: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
    panel: Selector,
    money: Selector,
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css)
        .map_err(|e| AppError::ParseFailure(format!("Invalid selector '{css}': {e}")))
}

impl MojoParser {
    pub fn new() -> Result<Self, AppError> {
        Self::with_layout(PageLayout::current())
    }

    pub fn with_layout(layout: PageLayout) -> Result<Self, AppError> {
        Ok(Self {
            section: selector(layout.section)?,
            table: selector(layout.table)?,
            row: selector("tr")?,
            cell: selector("td")?,
            panel: selector(layout.summary_panel)?,
            money: selector(".money")?,
            layout,
        })
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    fn region_heading(&self, table: ElementRef<'_>) -> Option<String> {
        table
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == self.layout.heading)
            .map(text_of)
    }

    fn section_total(&self, section: ElementRef<'_>) -> i64 {
        let money = section.select(&self.money).next().map(text_of);
        clean_currency(money.as_deref())
    }
}

impl PageParser for MojoParser {
    fn parse_regions(&self, html: &str) -> Vec<RegionFigure> {
        let document = Html::parse_document(html);
        let mut figures = Vec::new();
        // Containers can nest, so the same table may be reached more than once.
        let mut seen = HashSet::new();

        for section in document.select(&self.section) {
            for table in section.select(&self.table) {
                if !seen.insert(table.id()) {
                    continue;
                }
                let Some(heading) = self.region_heading(table) else {
                    continue;
                };
                let region = clean_region_name(&heading);

                let skip = usize::from(self.layout.skip_header_row);
                for row in table.select(&self.row).skip(skip) {
                    let cells: Vec<String> = row.select(&self.cell).map(text_of).collect();
                    if cells.len() < 2 {
                        continue;
                    }
                    figures.push(RegionFigure {
                        region: region.clone(),
                        opening: clean_currency(cells.get(2).map(String::as_str)),
                        gross: clean_currency(cells.get(3).map(String::as_str)),
                    });
                }
            }
        }

        tracing::debug!(rows = figures.len(), "Parsed region tables");
        figures
    }

    fn extract_summary(&self, html: &str) -> SummaryFigures {
        let document = Html::parse_document(html);
        let Some(panel) = document.select(&self.panel).next() else {
            tracing::debug!("Performance summary panel not found");
            return SummaryFigures::default();
        };

        let mut domestic = Some(panel);
        for _ in 0..self.layout.summary_depth {
            domestic = domestic.and_then(first_child_element);
        }
        let international = domestic.and_then(next_sibling_element);
        let worldwide = international.and_then(next_sibling_element);

        SummaryFigures {
            domestic: domestic.map(|s| self.section_total(s)),
            international: international.map(|s| self.section_total(s)),
            worldwide: worldwide.map(|s| self.section_total(s)),
        }
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_child_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

fn next_sibling_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}
