//! Fuzzy name resolution for manual overrides.
//!
//! A free-text name is compared with every stored name variant of every
//! candidate using case-insensitive Levenshtein distance. An exact
//! variant match wins immediately; otherwise the closest candidate is
//! accepted only within 30% of the query length.

use crate::{directory::EmployeeDirectory, types::EmployeeId};

/// Maximum accepted edit distance as a share of the query length.
pub const MATCH_THRESHOLD: f64 = 0.3;

/// Character-level edit distance (insert, delete, substitute).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Resolve `query` to one of `candidate_ids`, or `None` when nothing is
/// close enough. Candidates that cannot be read are skipped.
pub fn resolve_name(
    query: &str,
    candidate_ids: &[EmployeeId],
    directory: &dyn EmployeeDirectory,
) -> Option<EmployeeId> {
    let query_lower = query.to_lowercase();
    let mut best: Option<(usize, &EmployeeId)> = None;

    for id in candidate_ids {
        let record = match directory.get_employee(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::debug!("resolve: candidate {id} not in directory");
                continue;
            }
            Err(e) => {
                log::warn!("resolve: skipping candidate {id}: {e}");
                continue;
            }
        };

        let variants = if record.name_variants.is_empty() {
            vec![id.clone()]
        } else {
            record.name_variants
        };

        for variant in &variants {
            let variant_lower = variant.to_lowercase();
            if variant_lower == query_lower {
                return Some(id.clone());
            }
            let distance = levenshtein(&query_lower, &variant_lower);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, id));
            }
        }
    }

    let limit = query.chars().count() as f64 * MATCH_THRESHOLD;
    match best {
        Some((distance, id)) if distance as f64 <= limit => Some(id.clone()),
        Some((distance, id)) => {
            log::debug!("resolve: '{query}' closest to {id} at distance {distance}, limit {limit:.1}");
            None
        }
        None => None,
    }
}
