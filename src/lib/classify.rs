//! Classification of an index read pair against the catalog.

use std::fmt;

use fqdemux_dna::reverse_complement_str;

use crate::catalog::{IndexCatalog, IndexPair};

/// Outcome category for one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Both indexes are in the catalog and agree.
    Matched,
    /// Both indexes are in the catalog but disagree.
    Swapped,
    /// At least one index is not in the catalog, or the pair failed the quality gate.
    Unknown,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Swapped => write!(f, "swapped"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A category together with the resolved `(index1, rc(index2))` pair.
///
/// The pair is always resolved, even for [`Category::Unknown`], since it is used to annotate
/// read headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The category.
    pub category: Category,
    /// Index 1 as read and index 2 reverse complemented.
    pub pair: IndexPair,
}

impl Classification {
    /// Returns this classification moved to [`Category::Unknown`], keeping the pair.
    #[must_use]
    pub fn demote(self) -> Self {
        Self { category: Category::Unknown, ..self }
    }
}

/// Where a record stands between classification and writing.
///
/// Records are classified and counted as [`Assignment::Provisional`], and only an
/// [`Assignment::Final`] record can be routed to an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Classified and counted, not yet gated.
    Provisional(Classification),
    /// Gated, ready to write.
    Final(Classification),
}

impl Assignment {
    #[must_use]
    pub fn classification(&self) -> &Classification {
        match self {
            Self::Provisional(c) | Self::Final(c) => c,
        }
    }

    #[must_use]
    pub fn into_classification(self) -> Classification {
        match self {
            Self::Provisional(c) | Self::Final(c) => c,
        }
    }
}

/// Classifies one cluster from its raw index 1 and index 2 sequences.
///
/// Index 2 is reverse complemented before lookup. Matching is exact.
#[must_use]
pub fn classify(index1: &str, index2: &str, catalog: &IndexCatalog) -> Classification {
    let pair = IndexPair::new(index1, reverse_complement_str(index2));
    let category = if catalog.contains(&pair.index1) && catalog.contains(&pair.index2) {
        if pair.is_dual_matched() { Category::Matched } else { Category::Swapped }
    } else {
        Category::Unknown
    };
    Classification { category, pair }
}
