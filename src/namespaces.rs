//! XML namespace handling
//!
//! Qualified names as they appear in schema documents (`prefix:local`) and
//! the per-schema alias table that maps prefixes to target namespaces.
//! A `QName` is only a reference; turning it into a declaration is the
//! resolver's job (see `schema::graph`).

use indexmap::IndexMap;
use std::fmt;

/// Qualified name: an optional prefix plus a local name
///
/// The prefix is kept as written in the source document. It is meaningless
/// on its own and must be resolved against the alias table of the schema
/// the reference appears in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (None for an unprefixed reference)
    pub prefix: Option<String>,
    /// Local name
    pub local: String,
}

impl QName {
    /// Parse a QName from its `prefix:local` text form
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self {
                prefix: None,
                local: text.to_string(),
            },
        }
    }

    /// Create a QName without a prefix
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Create a QName with a prefix
    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// Per-schema alias table: prefix to namespace URI, in declared order
///
/// Built from the `xmlns:*` declarations on a schema document root. The
/// unprefixed `xmlns` declaration is kept separately as the default
/// namespace.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    prefixes: IndexMap<String, String>,
    default_namespace: Option<String>,
}

impl AliasTable {
    /// Create an empty alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default (unprefixed) namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace a prefix maps to
    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Namespace the given reference points into, if its prefix is known
    pub fn namespace_of(&self, qname: &QName) -> Option<&str> {
        match &qname.prefix {
            Some(prefix) => self.namespace_for(prefix),
            None => self.default_namespace(),
        }
    }

    /// Iterate over (prefix, namespace) pairs in declared order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }
}
