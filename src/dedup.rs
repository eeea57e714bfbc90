use std::collections::HashSet;

use crate::Listing;

/// Keep candidates with a non-empty title that `existing` does not already hold.
/// Input order is preserved.
pub fn filter_new<T, I>(existing: &HashSet<String>, candidates: I) -> Vec<T>
where
    T: Listing,
    I: IntoIterator<Item = T>,
{
    candidates
        .into_iter()
        .filter(|c| !c.title().is_empty() && !existing.contains(c.title()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawContest;
    use pretty_assertions::assert_eq;

    fn raw(title: &str) -> RawContest {
        RawContest {
            title: title.to_string(),
            link: format!("https://linkareer.com/activity/{}", title.len()),
            host: "host".to_string(),
            deadline_text: "D-1".to_string(),
        }
    }

    fn titles(v: &[RawContest]) -> Vec<&str> {
        v.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn known_titles_are_dropped() {
        let existing: HashSet<String> = ["Contest A".to_string()].into();
        let new = filter_new(&existing, vec![raw("Contest A"), raw("Contest B")]);
        assert_eq!(titles(&new), vec!["Contest B"]);
    }

    #[test]
    fn empty_titles_are_dropped_and_order_kept() {
        let existing = HashSet::new();
        let new = filter_new(&existing, vec![raw("c"), raw(""), raw("a"), raw("b")]);
        assert_eq!(titles(&new), vec!["c", "a", "b"]);
    }

    #[test]
    fn titles_match_case_sensitively() {
        let existing: HashSet<String> = ["contest a".to_string()].into();
        let new = filter_new(&existing, vec![raw("Contest A")]);
        assert_eq!(titles(&new), vec!["Contest A"]);
    }

    #[test]
    fn second_pass_is_empty() {
        let mut existing: HashSet<String> = ["x".to_string()].into();
        let candidates = vec![raw("x"), raw("y"), raw("z")];

        let first = filter_new(&existing, candidates.clone());
        existing.extend(first.iter().map(|c| c.title.clone()));

        let second = filter_new(&existing, candidates);
        assert!(second.is_empty());
    }
}
