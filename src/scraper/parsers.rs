use crate::models::{NumberMarker, RawDrawRow, RawNumber};
use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

// ── Results table ─────────────────────────────────────────────────────────────

/// Pull the raw rows out of one results page.
///
/// Each table row holds a date link plus the drawn-number list in its first
/// cell and an optional jackpot link in its second. Rows with fewer than two
/// cells are dropped here; everything else is captured untouched and left to
/// the cleaner to validate.
pub fn parse_results_page(html: &str) -> Result<Vec<RawDrawRow>> {
    let doc = Html::parse_document(html);

    let row_sel = Selector::parse("table.results.pb tbody tr")
        .map_err(|e| anyhow::anyhow!("row selector: {:?}", e))?;
    let td_sel = Selector::parse("td").map_err(|e| anyhow::anyhow!("td selector: {:?}", e))?;
    let date_sel = Selector::parse("section.results a")
        .map_err(|e| anyhow::anyhow!("date selector: {:?}", e))?;
    let li_sel = Selector::parse("section.results ul li")
        .map_err(|e| anyhow::anyhow!("li selector: {:?}", e))?;
    let a_sel = Selector::parse("a").map_err(|e| anyhow::anyhow!("a selector: {:?}", e))?;

    let mut rows = Vec::new();

    for tr in doc.select(&row_sel) {
        let cells: Vec<ElementRef> = tr.select(&td_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let date_text = cells[0].select(&date_sel).next().map(element_text);

        let numbers = cells[0]
            .select(&li_sel)
            .map(|li| RawNumber {
                value: element_text(li),
                marker: classify_item(li),
            })
            .collect();

        let jackpot = cells[1].select(&a_sel).next().map(element_text);

        rows.push(RawDrawRow {
            date_text,
            numbers,
            jackpot,
        });
    }

    Ok(rows)
}

/// The markup tags each drawn number by class: `bonus` is the powerball,
/// `multiplier` is the Power Play factor, anything else is a white ball.
fn classify_item(li: ElementRef) -> NumberMarker {
    if li.value().classes().any(|c| c == "bonus") {
        NumberMarker::Bonus
    } else if li.value().classes().any(|c| c == "multiplier") {
        NumberMarker::Multiplier
    } else {
        NumberMarker::White
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Pagination ────────────────────────────────────────────────────────────────

/// True when the page links to results page `page + 1`.
pub fn has_next_page(html: &str, page: u32) -> bool {
    let doc = Html::parse_document(html);
    let selector = format!(r#"a.button[href="/powerball/results/{}"]"#, page + 1);

    match Selector::parse(&selector) {
        Ok(sel) => doc.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
