use std::collections::BTreeSet;

use super::types::Reconciliation;

/// Compare the sheet names of the previous and incoming workbooks.
///
/// `added = incoming - previous`, `removed = previous - incoming`. Added
/// sheets are processed in full; removed sheets are only reported.
pub fn reconcile<'a, P, I>(previous: P, incoming: I) -> Reconciliation
where
    P: IntoIterator<Item = &'a str>,
    I: IntoIterator<Item = &'a str>,
{
    let previous: BTreeSet<String> = previous.into_iter().map(str::to_string).collect();
    let incoming: BTreeSet<String> = incoming.into_iter().map(str::to_string).collect();

    Reconciliation {
        added: incoming.difference(&previous).cloned().collect(),
        removed: previous.difference(&incoming).cloned().collect(),
        existing: incoming.intersection(&previous).cloned().collect(),
    }
}

/// Render a name set for log lines, e.g. `{a, b}`
pub fn format_names(names: &BTreeSet<String>) -> String {
    let joined: Vec<&str> = names.iter().map(String::as_str).collect();
    format!("{{{}}}", joined.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_added_removed_existing() {
        let result = reconcile(["S1", "S2", "Old"], ["S1", "S2", "New"]);
        assert_eq!(result.added, set(&["New"]));
        assert_eq!(result.removed, set(&["Old"]));
        assert_eq!(result.existing, set(&["S1", "S2"]));
    }

    #[test]
    fn test_empty_previous_marks_everything_added() {
        let result = reconcile([], ["A", "B"]);
        assert_eq!(result.added, set(&["A", "B"]));
        assert!(result.removed.is_empty());
        assert!(result.existing.is_empty());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(format_names(&set(&["b", "a"])), "{a, b}");
        assert_eq!(format_names(&BTreeSet::new()), "{}");
    }
}
