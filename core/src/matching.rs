//! Role matching: directory records into per-role candidate pools.
//!
//! Matching policy: a record belongs to a role's pool when it is
//! available and, for some search term of the role, the term is a
//! substring of the record's raw or normalized job title or the title is
//! a substring of the term (case-insensitive). Empty titles never match.
//!
//! A record may sit in several pools; the allocator guarantees it is
//! booked at most once.

use crate::{
    directory::{is_available, EmployeeDirectory, EmployeeRecord},
    error::PlanResult,
    requirement::FlatRequirement,
    taxonomy::{normalize_role, role_suffix, RoleTaxonomy},
    types::RoleName,
};
use std::collections::BTreeMap;

/// Matched candidates per role, each pool in directory order.
pub type CandidatePools = BTreeMap<RoleName, Vec<EmployeeRecord>>;

/// Ordered, de-duplicated search terms for a role key:
/// suffix synonyms, full-key synonyms, then the key itself.
pub fn search_terms(role: &str, taxonomy: &RoleTaxonomy) -> Vec<String> {
    let key = normalize_role(role);
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: &str| {
        let term = term.to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    if let Some(suffix) = role_suffix(&key) {
        taxonomy.synonyms(suffix).iter().for_each(|s| push(s));
    }
    taxonomy.synonyms(&key).iter().for_each(|s| push(s));
    push(&key);
    push(&key.replace('_', " "));
    terms
}

/// Bidirectional substring test between `term` and either job title.
pub fn title_matches(term: &str, record: &EmployeeRecord) -> bool {
    let term = term.to_lowercase();
    [&record.original_job_title, &record.normalized_job_title]
        .into_iter()
        .map(|title| title.trim().to_lowercase())
        .filter(|title| !title.is_empty())
        .any(|title| title.contains(&term) || term.contains(&title))
}

/// The first search term that matches `record`, if any.
pub fn matching_term<'a>(terms: &'a [String], record: &EmployeeRecord) -> Option<&'a str> {
    terms
        .iter()
        .find(|term| title_matches(term, record))
        .map(String::as_str)
}

/// Build a candidate pool for every role in `requirements` from one
/// directory snapshot.
pub fn match_employees(
    requirements: &FlatRequirement,
    directory: &dyn EmployeeDirectory,
    taxonomy: &RoleTaxonomy,
) -> PlanResult<CandidatePools> {
    let employees = directory.list_employees()?;
    let available: Vec<&EmployeeRecord> = employees.iter().filter(|r| is_available(r)).collect();
    log::debug!(
        "matching: {} of {} employees available",
        available.len(),
        employees.len()
    );

    let mut pools = CandidatePools::new();
    for (role, _) in requirements.iter() {
        let terms = search_terms(role, taxonomy);
        let pool: Vec<EmployeeRecord> = available
            .iter()
            .filter(|record| matching_term(&terms, record).is_some())
            .map(|record| (*record).clone())
            .collect();
        log::debug!("matching: role={role} terms={} candidates={}", terms.len(), pool.len());
        pools.insert(role.to_string(), pool);
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_pulls_suffix_synonyms() {
        let taxonomy = RoleTaxonomy::default();
        let terms = search_terms("inbound_forklift_driver", &taxonomy);
        assert_eq!(terms[0], "forklift");
        assert!(terms.contains(&"inbound_forklift_driver".to_string()));
        assert!(terms.contains(&"inbound forklift driver".to_string()));
    }

    #[test]
    fn matching_is_bidirectional() {
        let record = EmployeeRecord::new("e1", "Lumper");
        assert!(title_matches("lumper crew lead", &record));
        assert!(title_matches("lump", &record));
        assert!(!title_matches("receiver", &record));
    }

    #[test]
    fn empty_title_matches_nothing() {
        let record = EmployeeRecord::new("e2", "   ");
        assert!(!title_matches("forklift", &record));
    }
}
