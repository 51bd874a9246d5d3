use sha2::{Digest, Sha256};

use super::IssueType;

/// Bumped whenever the set or encoding of hashed fields changes.
pub const SIGNATURE_VERSION: u32 = 1;

const SEPARATOR: u8 = 0x1F;

/// Computes the suppression signature of an issue.
///
/// Only stable identity fields are hashed: the message text, severity and
/// target offsets can change without affecting a suppression.
///
/// ```
/// use transcheck::issues::{IssueType, compute_signature};
///
/// let a = compute_signature("file:///a.json", None, "1", Some("0"), 4, IssueType::TargetLength);
/// let b = compute_signature("file:///a.json", None, "1", Some("0"), 4, IssueType::TargetLength);
/// assert_eq!(a, b);
/// assert!(a.starts_with("1:"));
/// ```
pub fn compute_signature(
    document_uri: &str,
    sub_document_id: Option<&str>,
    tu_id: &str,
    seg_id: Option<&str>,
    source_start: i32,
    issue_type: IssueType,
) -> String {
    let mut hasher = Sha256::new();
    let start = source_start.to_string();
    let fields = [
        document_uri,
        sub_document_id.unwrap_or_default(),
        tu_id,
        seg_id.unwrap_or_default(),
        start.as_str(),
        issue_type.as_str(),
    ];
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update([SEPARATOR]);
    }
    let digest = hasher.finalize();
    format!("{}:{}", SIGNATURE_VERSION, hex::encode(&digest[..16]))
}
