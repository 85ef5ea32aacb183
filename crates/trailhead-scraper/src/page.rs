//! Page extraction engine.
//!
//! Runs three independent heuristics over one parsed document — container,
//! heading, and table — and merges their output with within-page
//! deduplication by trail name. Strategy order decides which variant of a
//! same-named trail wins: container over heading, heading over table.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

use crate::fields;
use crate::types::Trail;

/// Class-attribute vocabulary that marks an element as a trail container.
const CONTAINER_CLASS_HINTS: &[&str] = &["trail", "hike", "activity", "card"];

/// Heading-text vocabulary that marks a heading as a trail candidate.
const HEADING_TEXT_HINTS: &[&str] = &["trail", "hike", "loop", "walk"];

/// How many sibling elements the heading strategy walks before giving up.
const MAX_SIBLINGS: usize = 8;

/// Sibling fragments longer than this feed the description.
const MIN_FRAGMENT_CHARS: usize = 15;

/// Heading candidates with a shorter description are assumed to be
/// navigation chrome and discarded.
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Park identity and page provenance stamped onto every extracted trail.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub park_code: &'a str,
    pub park_name: &'a str,
    pub url: &'a str,
    pub scraped_at: DateTime<Utc>,
}

/// Extract every trail the three strategies can find in `html`.
///
/// Output order is document order within each strategy, strategies in the
/// fixed order container → heading → table. The result never contains two
/// trails with the same name; the first accepted record for a name wins.
#[must_use]
pub fn extract_trails(html: &str, ctx: &PageContext<'_>) -> Vec<Trail> {
    let doc = Html::parse_document(html);
    let mut trails: Vec<Trail> = Vec::new();

    // Strategy 1: structured trail cards/sections.
    for trail in container_trails(&doc, ctx) {
        push_unique(&mut trails, trail);
    }

    // Strategy 2: trail headings followed by sibling descriptions.
    for trail in heading_trails(&doc, ctx) {
        push_unique(&mut trails, trail);
    }

    // Strategy 3: tables with one trail per row.
    for trail in table_trails(&doc, ctx) {
        push_unique(&mut trails, trail);
    }

    trails
}

fn push_unique(trails: &mut Vec<Trail>, candidate: Trail) {
    if !trails.iter().any(|t| t.trail_name == candidate.trail_name) {
        trails.push(candidate);
    }
}

// ---------------------------------------------------------------------------
// Strategy 1: containers
// ---------------------------------------------------------------------------

/// Block elements whose class attribute matches the container vocabulary.
/// The first heading inside is the trail name, the first paragraph the
/// description; the container's full text feeds the field extractors. A
/// container without a heading yields nothing.
fn container_trails(doc: &Html, ctx: &PageContext<'_>) -> Vec<Trail> {
    let container_sel = Selector::parse("div, section, article").expect("valid selector");
    let heading_sel = Selector::parse("h2, h3, h4, h5").expect("valid selector");
    let paragraph_sel = Selector::parse("p").expect("valid selector");

    doc.select(&container_sel)
        .filter(|el| class_matches(el))
        .filter_map(|el| {
            let name_el = el.select(&heading_sel).next()?;
            let name = element_text(&name_el);
            let description = el
                .select(&paragraph_sel)
                .next()
                .map(|p| element_text(&p))
                .unwrap_or_default();
            let text = element_text(&el);
            build_trail(ctx, &name, description, &text)
        })
        .collect()
}

fn class_matches(el: &ElementRef<'_>) -> bool {
    let Some(class) = el.value().attr("class") else {
        return false;
    };
    let class = class.to_lowercase();
    CONTAINER_CLASS_HINTS.iter().any(|hint| class.contains(hint))
}

// ---------------------------------------------------------------------------
// Strategy 2: headings
// ---------------------------------------------------------------------------

/// Headings (levels 2–5) whose text matches the heading vocabulary, with
/// the description assembled from up to [`MAX_SIBLINGS`] following sibling
/// elements (stopping early at the next heading).
fn heading_trails(doc: &Html, ctx: &PageContext<'_>) -> Vec<Trail> {
    let heading_sel = Selector::parse("h2, h3, h4, h5").expect("valid selector");

    doc.select(&heading_sel)
        .filter(|heading| {
            let text = element_text(heading).to_lowercase();
            HEADING_TEXT_HINTS.iter().any(|hint| text.contains(hint))
        })
        .filter_map(|heading| trail_from_heading(&heading, ctx))
        .collect()
}

fn trail_from_heading(heading: &ElementRef<'_>, ctx: &PageContext<'_>) -> Option<Trail> {
    let raw_name = element_text(heading);
    let name = raw_name.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut fragments: Vec<String> = Vec::new();
    let mut full_text = String::new();

    for sibling in heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(MAX_SIBLINGS)
    {
        if is_heading(&sibling) {
            break;
        }
        let text = element_text(&sibling);
        if text.is_empty() {
            continue;
        }
        if !full_text.is_empty() {
            full_text.push(' ');
        }
        full_text.push_str(&text);
        if text.chars().count() > MIN_FRAGMENT_CHARS {
            fragments.push(text);
        }
    }

    // Prefer the first three substantial fragments; fall back to everything
    // collected when no fragment was long enough.
    let description = if fragments.is_empty() {
        full_text.clone()
    } else {
        fragments
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    };

    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return None;
    }

    build_trail(ctx, &name, description, &full_text)
}

fn is_heading(el: &ElementRef<'_>) -> bool {
    matches!(el.value().name(), "h2" | "h3" | "h4" | "h5")
}

// ---------------------------------------------------------------------------
// Strategy 3: tables
// ---------------------------------------------------------------------------

/// Tables with at least two rows, row one treated as a header. The first
/// cell is the trail name, the second the description; the whole row's text
/// feeds the field extractors.
fn table_trails(doc: &Html, ctx: &PageContext<'_>) -> Vec<Trail> {
    let table_sel = Selector::parse("table").expect("valid selector");
    let row_sel = Selector::parse("tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");

    let mut trails = Vec::new();

    for table in doc.select(&table_sel) {
        let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
        if rows.len() < 2 {
            continue;
        }

        for row in rows.into_iter().skip(1) {
            let cells: Vec<String> = row.select(&cell_sel).map(|c| element_text(&c)).collect();
            if cells.len() < 2 {
                continue;
            }
            let row_text = cells.join(" ");
            if let Some(trail) = build_trail(ctx, &cells[0], cells[1].clone(), &row_text) {
                trails.push(trail);
            }
        }
    }

    trails
}

// ---------------------------------------------------------------------------
// Shared construction
// ---------------------------------------------------------------------------

/// Assemble a [`Trail`], running all five field extractors over `text`.
/// Returns `None` when the trimmed name is empty.
fn build_trail(
    ctx: &PageContext<'_>,
    name: &str,
    description: String,
    text: &str,
) -> Option<Trail> {
    let trail_name = name.trim();
    if trail_name.is_empty() {
        return None;
    }

    Some(Trail {
        park_code: ctx.park_code.to_owned(),
        park_name: ctx.park_name.to_owned(),
        trail_name: trail_name.to_owned(),
        description: description.trim().to_owned(),
        distance: fields::extract_distance(text),
        duration: fields::extract_duration(text),
        difficulty: fields::extract_difficulty(text),
        elevation_gain: fields::extract_elevation(text),
        trail_type: fields::extract_trail_type(text),
        source_url: ctx.url.to_owned(),
        scraped_at: ctx.scraped_at,
    })
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
