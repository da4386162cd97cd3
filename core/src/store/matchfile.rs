//! Line-oriented `.match` persistence: one match per line, whitespace
//! separated detection indices. Blank and `#`-prefixed lines are skipped on
//! read and never written.

use crate::prelude::{MatchError, MatchResult};
use crate::telemetry::log::LogManager;
use crate::toads::Match;
use std::io::{BufRead, Write};

pub fn save_matches<W: Write>(matches: &[Match], writer: &mut W) -> MatchResult<()> {
    for m in matches {
        let line = m
            .indices
            .iter()
            .map(|idx| idx.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Strict load: any non-integer token fails the whole read with the
/// offending 1-based line number.
pub fn load_matches<R: BufRead>(reader: R) -> MatchResult<Vec<Match>> {
    read_matches(reader, false)
}

/// Lenient load: malformed lines are skipped with a warning, valid lines
/// are kept. Opt-in recovery for hand-edited files.
pub fn load_matches_lenient<R: BufRead>(reader: R) -> MatchResult<Vec<Match>> {
    read_matches(reader, true)
}

fn read_matches<R: BufRead>(reader: R, lenient: bool) -> MatchResult<Vec<Match>> {
    let logger = LogManager::new();
    let mut matches = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed, number + 1) {
            Ok(indices) => matches.push(Match::new(indices)),
            Err(err) if lenient => {
                logger.alert(&format!("skipping malformed match line: {}", err));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(matches)
}

fn parse_line(line: &str, number: usize) -> MatchResult<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| MatchError::Parse {
                line: number,
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn round_trip(matches: &[Match]) -> Vec<Match> {
        let mut buffer = Vec::new();
        save_matches(matches, &mut buffer).unwrap();
        load_matches(Cursor::new(buffer)).unwrap()
    }

    #[test]
    fn save_then_load_preserves_order_exactly() {
        let matches = vec![
            Match::new(vec![3, 1, 7]),
            Match::new(vec![0]),
            Match::new(vec![12, 4]),
        ];
        assert_eq!(round_trip(&matches), matches);
    }

    #[test]
    fn empty_list_round_trips() {
        assert_eq!(round_trip(&[]), Vec::<Match>::new());
    }

    #[test]
    fn save_emits_one_plain_line_per_match() {
        let mut buffer = Vec::new();
        save_matches(&[Match::new(vec![5, 2]), Match::new(vec![8])], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "5 2\n8\n");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# receiver pair matches\n\n0 1\n   \n# trailer\n2 3\n";
        let matches = load_matches(Cursor::new(text)).unwrap();
        assert_eq!(matches, vec![Match::new(vec![0, 1]), Match::new(vec![2, 3])]);
    }

    #[test]
    fn strict_load_reports_the_offending_line() {
        let text = "0 1\n2 x 3\n4\n";
        match load_matches(Cursor::new(text)) {
            Err(MatchError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(load_matches(Cursor::new("0 -1\n")).is_err());
    }

    #[test]
    fn lenient_load_keeps_the_valid_lines() {
        let text = "0 1\n2 x 3\n4 5\n";
        let matches = load_matches_lenient(Cursor::new(text)).unwrap();
        assert_eq!(matches, vec![Match::new(vec![0, 1]), Match::new(vec![4, 5])]);
    }
}
