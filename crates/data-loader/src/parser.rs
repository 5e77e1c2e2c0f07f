//! Parser for MovieLens data files.
//!
//! - ratings.dat: userId::movieId::rating::timestamp
//! - movies.dat: movieId::title::genres
//!
//! Malformed lines are skipped and counted instead of aborting the load: a
//! ten-million line dump with a handful of broken rows is still a usable
//! dataset.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

const FIELD_SEPARATOR: &str = "::";

/// Records parsed from one file, plus the number of lines that were rejected.
#[derive(Debug)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// The MovieLens dataset uses ISO-8859-1 encoding, not UTF-8.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    // Each Latin-1 byte maps directly to the Unicode code point of the same value
    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Parse the ratings.dat file
///
/// Lines with fewer than three fields or a non-numeric or non-finite rating
/// are skipped.
/// The timestamp is not used by the similarity core and is not required.
pub fn parse_ratings(path: &Path) -> Result<Parsed<Rating>> {
    let lines = read_lines_latin1(path)?;
    let parsed = parse_lines(&lines, parse_rating_line);

    if parsed.skipped > 0 {
        warn!(
            "Skipped {} malformed lines in {}",
            parsed.skipped,
            path.display()
        );
    }
    debug!("Parsed {} ratings from {}", parsed.records.len(), path.display());
    Ok(parsed)
}

/// Parse the movies.dat file into (movieId, title) pairs
pub fn parse_titles(path: &Path) -> Result<Parsed<(ItemId, String)>> {
    let lines = read_lines_latin1(path)?;
    let parsed = parse_lines(&lines, parse_title_line);

    if parsed.skipped > 0 {
        warn!(
            "Skipped {} malformed lines in {}",
            parsed.skipped,
            path.display()
        );
    }
    debug!("Parsed {} titles from {}", parsed.records.len(), path.display());
    Ok(parsed)
}

fn parse_lines<T>(lines: &[String], parse_line: impl Fn(&str) -> Option<T>) -> Parsed<T> {
    let mut records = Vec::with_capacity(lines.len());
    let mut skipped = 0;

    for line in lines {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        match parse_line(line_trimmed) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    Parsed { records, skipped }
}

fn parse_rating_line(line: &str) -> Option<Rating> {
    let mut parts = line.split(FIELD_SEPARATOR);

    let user_id = parts.next()?;
    let item_id = parts.next()?;
    let rating = parts
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())?;

    Some(Rating::new(user_id, item_id, rating))
}

fn parse_title_line(line: &str) -> Option<(ItemId, String)> {
    let mut parts = line.split(FIELD_SEPARATOR);

    let item_id = parts.next()?;
    let title = parts.next()?;

    Some((item_id.to_string(), title.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_latin1(lines: &[&[u8]]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            file.write_all(line).unwrap();
            file.write_all(b"\n").unwrap();
        }
        file
    }

    #[test]
    fn test_parse_rating_line() {
        let rating = parse_rating_line("1::122::5::838985046").unwrap();
        assert_eq!(rating, Rating::new("1", "122", 5.0));

        let half_star = parse_rating_line("7::3::3.5::1").unwrap();
        assert_eq!(half_star.rating, 3.5);
    }

    #[test]
    fn test_parse_rating_line_rejects_malformed() {
        assert!(parse_rating_line("1::122").is_none());
        assert!(parse_rating_line("1::122::five::838985046").is_none());
        assert!(parse_rating_line("garbage").is_none());
    }

    #[test]
    fn test_parse_rating_line_rejects_non_finite() {
        assert!(parse_rating_line("1::10::NaN::0").is_none());
        assert!(parse_rating_line("1::10::inf::0").is_none());
        assert!(parse_rating_line("1::10::-infinity::0").is_none());
    }

    #[test]
    fn test_parse_title_line() {
        let (id, title) = parse_title_line("1::Toy Story (1995)::Adventure|Animation").unwrap();
        assert_eq!(id, "1");
        assert_eq!(title, "Toy Story (1995)");
        assert!(parse_title_line("1").is_none());
    }

    #[test]
    fn test_parse_ratings_counts_skipped_lines() {
        let file = write_latin1(&[
            b"1::10::5::0",
            b"",
            b"1::11",
            b"2::10::x::0",
            b"2::11::NaN::0",
            b"2::12::4::0",
        ]);

        let parsed = parse_ratings(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn test_parse_titles_decodes_latin1() {
        // 0xE9 is 'é' in ISO-8859-1
        let file = write_latin1(&[b"5::Am\xe9lie (2001)::Comedy|Romance"]);

        let parsed = parse_titles(file.path()).unwrap();
        assert_eq!(parsed.records, vec![("5".to_string(), "Amélie (2001)".to_string())]);
    }

    #[test]
    fn test_missing_file() {
        let result = parse_ratings(Path::new("definitely/not/here/ratings.dat"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
