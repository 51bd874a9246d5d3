use std::cmp::Ordering;

use super::Issue;

/// Primary key of an issue sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Enabled,
    #[default]
    Severity,
    TextUnit,
    Segment,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Multi-key comparator for presenting issues.
///
/// The primary key follows the configured direction; ties always fall back
/// to document, text unit, segment, source offset and issue type, ascending,
/// so the order is total and stable across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueComparator {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl IssueComparator {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn compare(&self, a: &Issue, b: &Issue) -> Ordering {
        let primary = match self.key {
            SortKey::Enabled => a.enabled.cmp(&b.enabled),
            SortKey::Severity => a.severity.total_cmp(&b.severity),
            SortKey::TextUnit => compare_ids(&a.tu_id, &b.tu_id),
            SortKey::Segment => compare_ids(
                a.seg_id.as_deref().unwrap_or_default(),
                b.seg_id.as_deref().unwrap_or_default(),
            ),
            SortKey::Message => a.message.cmp(&b.message),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| compare_location(a, b))
    }

    pub fn sort(&self, issues: &mut [Issue]) {
        issues.sort_by(|a, b| self.compare(a, b));
    }
}

/// Document order: document, text unit, segment, offset, type.
pub(crate) fn compare_location(a: &Issue, b: &Issue) -> Ordering {
    a.document_uri
        .cmp(&b.document_uri)
        .then_with(|| a.sub_document_id.cmp(&b.sub_document_id))
        .then_with(|| compare_ids(&a.tu_id, &b.tu_id))
        .then_with(|| {
            compare_ids(
                a.seg_id.as_deref().unwrap_or_default(),
                b.seg_id.as_deref().unwrap_or_default(),
            )
        })
        .then_with(|| a.source_start.cmp(&b.source_start))
        .then_with(|| a.issue_type.cmp(&b.issue_type))
}

/// Ids that are both numeric compare as numbers (`2` < `10`).
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
