use crate::models::{DrawRecord, NumberMarker, RawDrawRow};
use chrono::NaiveDate;

/// White balls per drawing; extra untagged items are truncated, fewer
/// invalidate the row.
pub const WHITE_BALL_COUNT: usize = 5;

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse a date link like "Wed, March, 19, 2025".
///
/// The weekday segment is discarded; the remaining three are read as an
/// English month name, day and year. Anything else is None.
pub fn parse_draw_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let assembled = format!("{} {} {}", parts[1], parts[2], parts[3]);
    NaiveDate::parse_from_str(&assembled, "%B %d %Y").ok()
}

// ── Raw row → DrawRecord ──────────────────────────────────────────────────────

/// Validate a raw row's number list into a record.
///
/// `bonus` items become the powerball, `multiplier` items are dropped, the
/// rest are white balls in document order. None when fewer than five white
/// balls or no non-empty powerball were found.
pub fn row_to_record(draw_date: NaiveDate, raw: &RawDrawRow) -> Option<DrawRecord> {
    let mut white_balls = Vec::new();
    let mut powerball: Option<String> = None;

    for number in &raw.numbers {
        match number.marker {
            NumberMarker::Bonus => powerball = Some(number.value.clone()),
            NumberMarker::Multiplier => {}
            NumberMarker::White => white_balls.push(number.value.clone()),
        }
    }

    let powerball = powerball.filter(|p| !p.is_empty())?;
    if white_balls.len() < WHITE_BALL_COUNT {
        return None;
    }
    white_balls.truncate(WHITE_BALL_COUNT);

    Some(DrawRecord {
        draw_date,
        white_balls,
        powerball,
        jackpot: raw.jackpot.clone().unwrap_or_default(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
