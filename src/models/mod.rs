use chrono::NaiveDate;
use serde::Serialize;

// ── Draw record ───────────────────────────────────────────────────────────────

/// One Powerball drawing: date, winning numbers, advertised jackpot.
///
/// Invariants (enforced by the cleaner, not the type): `white_balls` has
/// exactly five entries and `powerball` is non-empty. Rows that cannot meet
/// them are discarded before construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrawRecord {
    pub draw_date: NaiveDate,
    pub white_balls: Vec<String>,
    pub powerball: String,
    /// Free-form currency text, empty when the site shows none.
    pub jackpot: String,
}

// ── Raw scraped rows ──────────────────────────────────────────────────────────

/// How a result-list item is tagged in the source markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMarker {
    /// Untagged item: a white-ball number.
    White,
    /// `bonus` class: the powerball.
    Bonus,
    /// `multiplier` class: the Power Play factor, never part of the draw.
    Multiplier,
}

/// One `<li>` from a row's result list, before validation.
#[derive(Debug, Clone)]
pub struct RawNumber {
    pub value: String,
    pub marker: NumberMarker,
}

/// Cell text pulled from one results-table row, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawDrawRow {
    pub date_text: Option<String>,
    pub numbers: Vec<RawNumber>,
    pub jackpot: Option<String>,
}
