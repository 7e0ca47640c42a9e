//! Fuzzy branch-name verification
//!
//! A candidate branch either matches a remote branch exactly or is compared
//! against every remote branch by normalized edit distance:
//!
//! ```text
//! ratio = levenshtein(candidate, existing) / chars(candidate)
//! ```
//!
//! Branches whose ratio is below [`SUGGESTION_THRESHOLD`] are offered back to the
//! human caller as "did you mean" suggestions, in the order the remote listed
//! them.

use crate::artifacts::branch::branch_name::BranchName;
use crate::error::{Error, Result};
use derive_new::new;

/// Normalized edit distance below which a branch is suggested
pub const SUGGESTION_THRESHOLD: f64 = 0.25;

/// Outcome of matching a candidate against the remote branch list
#[derive(Debug, Clone, PartialEq, Eq, Default, new)]
pub struct BranchMatch {
    pub exists: bool,
    pub suggestions: Vec<BranchName>,
}

pub struct BranchMatcher;

impl BranchMatcher {
    pub fn resolve(candidate: &str, existing: &[BranchName]) -> BranchMatch {
        let candidate_len = candidate.chars().count();

        existing
            .iter()
            .fold(BranchMatch::default(), |mut result, branch| {
                if branch.as_ref() == candidate {
                    result.exists = true;
                } else if candidate_len > 0 {
                    let distance = levenshtein(candidate, branch.as_ref());
                    if (distance as f64) / (candidate_len as f64) < SUGGESTION_THRESHOLD {
                        result.suggestions.push(branch.clone());
                    }
                }
                result
            })
    }

    /// Fail with [`Error::BranchNotFound`] unless `candidate` exists verbatim
    pub fn assert_exists(candidate: &BranchName, existing: &[BranchName]) -> Result<()> {
        let BranchMatch {
            exists,
            suggestions,
        } = Self::resolve(candidate.as_ref(), existing);

        if exists {
            Ok(())
        } else {
            Err(Error::BranchNotFound {
                branch: candidate.to_string(),
                suggestions,
            })
        }
    }
}

/// Edit distance counting single-character insertions, deletions and substitutions
pub fn levenshtein(source: &str, target: &str) -> usize {
    let target = target.chars().collect::<Vec<_>>();
    let mut previous = (0..=target.len()).collect::<Vec<_>>();
    let mut current = vec![0; target.len() + 1];

    for (i, source_char) in source.chars().enumerate() {
        current[0] = i + 1;
        for (j, target_char) in target.iter().enumerate() {
            let substitution = previous[j] + usize::from(source_char != *target_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}
