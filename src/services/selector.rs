use std::collections::HashSet;

use rand::rng;
use rand::seq::IndexedRandom;

use crate::models::domain::Question;

/// Uniformly samples one question for the target section that has not been
/// asked yet this run. Returns `None` when the pool is empty, which the
/// caller surfaces as a section skip.
pub fn pick_next<'a>(
    all_questions: &'a [Question],
    section: &str,
    asked_ids: &HashSet<String>,
) -> Option<&'a Question> {
    let pool: Vec<&Question> = all_questions
        .iter()
        .filter(|q| q.section == section && !asked_ids.contains(&q.id))
        .collect();

    pool.choose(&mut rng()).copied()
}
