use crate::models::DrawRecord;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Output column order, fixed by the consumers of the file.
pub const HEADERS: [&str; 4] = ["Draw Date", "White Balls", "Powerball", "Jackpot"];

/// Write all collected records to `path`, replacing any previous file.
///
/// Dates are rendered MM/DD/YYYY and white balls space-joined, one row per
/// record under a header row. Returns the number of data rows written.
pub fn write_csv(path: &Path, records: &[DrawRecord]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;

    writer.write_record(HEADERS)?;
    for record in records {
        let draw_date = record.draw_date.format("%m/%d/%Y").to_string();
        let white_balls = record.white_balls.join(" ");
        writer.write_record([
            draw_date.as_str(),
            white_balls.as_str(),
            record.powerball.as_str(),
            record.jackpot.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn record(y: i32, m: u32, d: u32, powerball: &str) -> DrawRecord {
        DrawRecord {
            draw_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            white_balls: vec!["5", "12", "23", "34", "41"]
                .into_iter()
                .map(String::from)
                .collect(),
            powerball: powerball.to_string(),
            jackpot: "$100 Million".to_string(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("powerball_scraper_{}_{}.csv", name, std::process::id()))
    }

    #[test]
    fn writes_header_and_formatted_rows() {
        let path = temp_path("rows");
        let records = vec![record(2025, 3, 19, "7"), record(2025, 3, 17, "3")];

        let written = write_csv(&path, &records).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Draw Date,White Balls,Powerball,Jackpot"));
        assert_eq!(
            lines.next(),
            Some("03/19/2025,5 12 23 34 41,7,$100 Million")
        );
        assert_eq!(
            lines.next(),
            Some("03/17/2025,5 12 23 34 41,3,$100 Million")
        );
        assert_eq!(lines.next(), None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_run_still_produces_a_header_only_file() {
        let path = temp_path("empty");

        let written = write_csv(&path, &[]).unwrap();
        assert_eq!(written, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let path = temp_path("overwrite");

        write_csv(&path, &[record(2025, 3, 19, "7"), record(2025, 3, 17, "3")]).unwrap();
        write_csv(&path, &[record(2025, 3, 19, "7")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        std::fs::remove_file(&path).ok();
    }
}
