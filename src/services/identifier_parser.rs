// src/services/identifier_parser.rs
//
// Creative identifier parsing.
//
// The expected shape is
//   <sentinel>_<project>_<free text...>_<marker token>_<numbers...>
// but identifiers in the wild drop the marker, reorder segments, or follow
// older conventions entirely. Parsing therefore NEVER fails: anything that
// does not fit the shape degrades to a best-effort partial result.
//
// Deterministic: same input -> same output. No I/O.

use regex::Regex;

use crate::domain::ParsedIdentifier;

/// Parses raw creative identifiers into [`ParsedIdentifier`] values.
///
/// The defaults match the production naming convention: `_` separated,
/// `YT` sentinel, `MCC` marker.
pub struct IdentifierParser {
    separator: char,
    sentinel: String,
    marker: String,
    numeric_token: Regex,
}

impl Default for IdentifierParser {
    fn default() -> Self {
        Self::new('_', "YT", "MCC")
    }
}

impl IdentifierParser {
    pub fn new(separator: char, sentinel: &str, marker: &str) -> Self {
        Self {
            separator,
            sentinel: sentinel.to_string(),
            marker: marker.to_string(),
            numeric_token: Regex::new(r"^\d+$").expect("static pattern"),
        }
    }

    /// Parse a raw identifier. Never fails; malformed input yields a
    /// degraded result instead.
    pub fn parse(&self, raw: &str) -> ParsedIdentifier {
        let parts: Vec<&str> = raw.split(self.separator).collect();

        // Identifiers outside the convention: keep whatever can be salvaged.
        if parts.len() < 2 || parts[0] != self.sentinel {
            let project = parts.first().copied().unwrap_or("").to_string();
            let video_name = if parts.len() > 1 {
                parts[1..].join(&self.separator.to_string())
            } else {
                raw.to_string()
            };
            return ParsedIdentifier::degraded(project, video_name);
        }

        let project = parts[1].to_string();

        // Whole-identifier existence check, independent of where video name
        // accumulation stops below.
        let has_marker = parts.iter().any(|p| p.contains(self.marker.as_str()));

        // Trailing purely-numeric window, scanned from the end. Sentinel and
        // project tokens never count.
        let mut trailing_start = parts.len();
        while trailing_start > 2 && self.numeric_token.is_match(parts[trailing_start - 1]) {
            trailing_start -= 1;
        }
        let trailing_numbers: Vec<String> =
            parts[trailing_start..].iter().map(|s| s.to_string()).collect();

        // Accumulate the video name until the marker token or the trailing
        // numeric window, whichever comes first.
        let mut video_name_parts: Vec<&str> = Vec::new();
        for (i, part) in parts.iter().enumerate().skip(2) {
            if part.contains(self.marker.as_str()) {
                break;
            }
            if !trailing_numbers.is_empty() && i >= trailing_start {
                break;
            }
            video_name_parts.push(part);
        }

        let concept_name = video_name_parts.first().copied().unwrap_or("").to_string();
        let video_name = video_name_parts.join(&self.separator.to_string());

        ParsedIdentifier {
            project,
            concept_name,
            video_name,
            has_marker,
            trailing_numbers,
            degraded: false,
        }
    }
}
