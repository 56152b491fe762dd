//! Domain names and the compression pointer registry.

use std::collections::HashMap;
use std::fmt;

/// The longest a name may be in uncompressed wire form, length prefixes
/// and the terminating root label included. See RFC 1035 section 2.3.4.
pub(crate) const MAX_NAME_WIRE_LEN: usize = 255;

/// The longest a single label may be. The limit is what keeps the top two
/// bits of a length octet free for the pointer encoding.
pub(crate) const MAX_LABEL_LEN: usize = 63;

/// A domain name as an ordered list of labels, leaf first.
///
/// `www.example.com` is stored as `["www", "example", "com"]`. The empty
/// root label that terminates every name on the wire is implied and not
/// stored, so the root name itself has no labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DnsName {
    labels: Vec<String>,
}

impl DnsName {
    pub(crate) fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// The labels of this name, leaf first.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns true for the root name, i.e. a lone `0x00` on the wire.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// The length of this name in uncompressed wire form: one length octet
    /// plus the text per label, plus the terminating root label.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| 1 + l.len()).sum::<usize>() + 1
    }
}

impl fmt::Display for DnsName {
    /// Renders the absolute form with a trailing dot, `example.com.`,
    /// and `.` for the root name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for label in self.labels.iter() {
            write!(f, "{}.", label)?;
        }
        Ok(())
    }
}

/// A memo of every label suffix decoded so far in this message, indexed by
/// the absolute offset of the label's length octet.
///
/// A compression pointer may reference any label chain that appeared
/// earlier in the message, so the name decoder records one entry per
/// literal label it consumes: the offset of that label mapped to the
/// labels from there through the end of the name. Labels reached through
/// a pointer never add entries of their own, which is also what keeps
/// pointer loops unresolvable.
#[derive(Debug, Default)]
pub(crate) struct NameRegistry {
    suffixes: HashMap<usize, Vec<String>>,
}

impl NameRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The leaf-first label sequence starting at `target`, if one was
    /// decoded there.
    pub(crate) fn resolve(&self, target: usize) -> Option<&[String]> {
        self.suffixes.get(&target).map(|s| s.as_slice())
    }

    /// Records the suffix that starts at the literal label at `offset`.
    pub(crate) fn insert(&mut self, offset: usize, suffix: Vec<String>) {
        self.suffixes.insert(offset, suffix);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.suffixes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{DnsName, NameRegistry};

    #[test]
    fn test_name_display() {
        let name = DnsName::from_labels(vec!["www".to_string(), "example".to_string(), "com".to_string()]);
        assert_eq!(name.to_string(), "www.example.com.");
        assert!(!name.is_root());

        let root = DnsName::from_labels(Vec::new());
        assert_eq!(root.to_string(), ".");
        assert!(root.is_root());
    }

    #[test]
    fn test_name_wire_len() {
        // 1 + 7 ("example") + 1 + 3 ("com") + 1 (root)
        let name = DnsName::from_labels(vec!["example".to_string(), "com".to_string()]);
        assert_eq!(name.wire_len(), 13);

        let root = DnsName::from_labels(Vec::new());
        assert_eq!(root.wire_len(), 1);
    }

    #[test]
    fn test_registry_resolve() {
        let mut registry = NameRegistry::new();
        registry.insert(12, vec!["example".to_string(), "com".to_string()]);
        registry.insert(20, vec!["com".to_string()]);

        assert_eq!(
            registry.resolve(12).unwrap(),
            &["example".to_string(), "com".to_string()][..]
        );
        assert_eq!(registry.resolve(20).unwrap(), &["com".to_string()][..]);
        assert!(registry.resolve(13).is_none());
        assert_eq!(registry.len(), 2);
    }
}
