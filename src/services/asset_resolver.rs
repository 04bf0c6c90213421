// src/services/asset_resolver.rs
//
// Asset resolution against the source-video catalog.
//
// Exact-then-fuzzy: an exact name match (under Unicode normalization and
// space/underscore equivalence) always wins; otherwise a word-overlap score
// decides, with a rejection threshold. A false negative is preferred to a
// false positive — nothing below the threshold is ever returned.
//
// Catalog iteration order never decides the outcome: candidates are scanned
// in lexicographic display-name order, so ties go to the smallest name.

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::domain::{AssetCandidate, MatchOutcome, ParsedIdentifier};

/// Minimum word-overlap fraction for a fuzzy match to be accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// Conventional extension tried when searching for a video by bare name.
const DEFAULT_EXTENSION: &str = ".mp4";

pub struct AssetResolver {
    threshold: f64,
    extension: String,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl AssetResolver {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Resolve a parsed identifier against the candidate pool.
    pub fn resolve(&self, parsed: &ParsedIdentifier, catalog: &[AssetCandidate]) -> MatchOutcome {
        let target = parsed.video_name.as_str();
        if target.is_empty() || catalog.is_empty() {
            return MatchOutcome::NoMatch { best_score: 0.0 };
        }

        let mut ordered: Vec<&AssetCandidate> = catalog.iter().collect();
        ordered.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        // Search variants in order: NFD with and without the conventional
        // extension (catalog entries are often stored decomposed), then the
        // raw form with and without it.
        let variants = [
            (nfd(&format!("{}{}", target, self.extension)), true),
            (nfd(target), true),
            (format!("{}{}", target, self.extension), false),
            (target.to_string(), false),
        ];

        for (variant, normalized) in &variants {
            for candidate in &ordered {
                let full = if *normalized {
                    nfd(&candidate.display_name)
                } else {
                    candidate.display_name.clone()
                };
                let stem = strip_extension(&full);

                if names_equal(&stem, variant) || names_equal(&full, variant) {
                    return MatchOutcome::Exact((*candidate).clone());
                }
            }
        }

        self.fuzzy_match(target, &ordered)
    }

    /// Word-overlap scoring: fraction of the target's words found as
    /// substrings of the candidate name.
    fn fuzzy_match(&self, target: &str, ordered: &[&AssetCandidate]) -> MatchOutcome {
        let words: Vec<String> = target
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            return MatchOutcome::NoMatch { best_score: 0.0 };
        }

        let mut best: Option<(&AssetCandidate, f64)> = None;
        for &candidate in ordered {
            let haystack = candidate.display_name.to_lowercase();
            let matched = words
                .iter()
                .filter(|w| haystack.contains(w.as_str()))
                .count();
            let score = matched as f64 / words.len() as f64;

            // Strictly greater: with candidates in lexicographic order, the
            // smallest display name wins a tie.
            let better = match best {
                None => true,
                Some((_, current)) => score > current,
            };
            if better {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score >= self.threshold => MatchOutcome::Fuzzy {
                candidate: (*candidate).clone(),
                score,
            },
            Some((_, score)) => MatchOutcome::NoMatch { best_score: score },
            None => MatchOutcome::NoMatch { best_score: 0.0 },
        }
    }
}

/// Canonical decomposition (NFD), the form catalog file names commonly use.
fn nfd(s: &str) -> String {
    s.nfd().collect()
}

fn strip_extension(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Name equality with space<->underscore substitution allowed.
fn names_equal(a: &str, b: &str) -> bool {
    a == b || a.replace(' ', "_") == b || a.replace('_', " ") == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(video_name: &str) -> ParsedIdentifier {
        ParsedIdentifier {
            project: "NB".to_string(),
            concept_name: String::new(),
            video_name: video_name.to_string(),
            has_marker: true,
            trailing_numbers: Vec::new(),
            degraded: false,
        }
    }

    fn candidate(name: &str) -> AssetCandidate {
        AssetCandidate {
            id: format!("/catalog/NB/{}", name),
            display_name: name.to_string(),
            size_bytes: 1024,
        }
    }

    #[test]
    fn test_exact_match_wins_over_variant_suffix() {
        let catalog = vec![
            candidate("老後は考えるな.mp4"),
            candidate("老後は考えるな_v2.mp4"),
        ];

        let outcome = AssetResolver::default().resolve(&parsed("老後は考えるな"), &catalog);
        match outcome {
            MatchOutcome::Exact(c) => assert_eq!(c.display_name, "老後は考えるな.mp4"),
            other => panic!("expected exact match, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_match_across_normalization_forms() {
        // Catalog name stored decomposed (NFD), identifier composed (NFC).
        let decomposed: String = "ダイエット動画.mp4".nfd().collect();
        let catalog = vec![candidate(&decomposed)];

        let outcome = AssetResolver::default().resolve(&parsed("ダイエット動画"), &catalog);
        assert!(matches!(outcome, MatchOutcome::Exact(_)));
    }

    #[test]
    fn test_exact_match_tolerates_space_underscore_swap() {
        let catalog = vec![candidate("concept take01 final.mp4")];

        let outcome = AssetResolver::default().resolve(&parsed("concept_take01_final"), &catalog);
        assert!(matches!(outcome, MatchOutcome::Exact(_)));
    }

    #[test]
    fn test_low_overlap_is_no_match() {
        let catalog = vec![candidate("X contains A only.mp4")];

        let outcome = AssetResolver::default().resolve(&parsed("A B C"), &catalog);
        match outcome {
            MatchOutcome::NoMatch { best_score } => {
                assert!((best_score - 1.0 / 3.0).abs() < 1e-9);
            }
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        // 7 of 10 words present: exactly the threshold, accepted.
        let catalog = vec![candidate("w1 w2 w3 w4 w5 w6 w7.mp4")];
        let outcome =
            AssetResolver::default().resolve(&parsed("w1 w2 w3 w4 w5 w6 w7 x8 x9 x10"), &catalog);
        match outcome {
            MatchOutcome::Fuzzy { score, .. } => assert!((score - 0.7).abs() < 1e-9),
            other => panic!("expected fuzzy match at threshold, got {:?}", other),
        }

        // 2 of 3 words present: below the threshold, rejected.
        let catalog = vec![candidate("w1 w2 only.mp4")];
        let outcome = AssetResolver::default().resolve(&parsed("w1 w2 x3"), &catalog);
        assert!(matches!(outcome, MatchOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_exact_match_precedes_higher_scoring_fuzzy() {
        // "concept.mp4" matches exactly; the other candidate contains every
        // word of the target and would score 1.0 in the fuzzy pass.
        let catalog = vec![
            candidate("concept extended director cut.mp4"),
            candidate("concept.mp4"),
        ];

        let outcome = AssetResolver::default().resolve(&parsed("concept"), &catalog);
        match outcome {
            MatchOutcome::Exact(c) => assert_eq!(c.display_name, "concept.mp4"),
            other => panic!("expected exact match, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_tie_breaks_lexicographically() {
        // Both candidates contain every target word; the smaller display
        // name must win regardless of catalog order.
        let catalog = vec![
            candidate("zz diet video.mp4"),
            candidate("aa diet video.mp4"),
        ];

        let outcome = AssetResolver::default().resolve(&parsed("diet video"), &catalog);
        match outcome {
            MatchOutcome::Fuzzy { candidate, score } => {
                assert_eq!(candidate.display_name, "aa diet video.mp4");
                assert!((score - 1.0).abs() < 1e-9);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_video_name_is_no_match() {
        let catalog = vec![candidate("anything.mp4")];
        let outcome = AssetResolver::default().resolve(&parsed(""), &catalog);
        assert!(matches!(
            outcome,
            MatchOutcome::NoMatch { best_score } if best_score == 0.0
        ));
    }

    #[test]
    fn test_empty_catalog_is_no_match() {
        let outcome = AssetResolver::default().resolve(&parsed("老後は考えるな"), &[]);
        assert!(matches!(outcome, MatchOutcome::NoMatch { .. }));
    }
}
