#![forbid(unsafe_code)]

//! Degradation reporting.
//!
//! Malformed authored content never fails a build. Each problem is recorded
//! as a [`Degradation`] and the affected feature falls back to its simplest
//! form (an entry renders plain, an image is omitted). Callers get the
//! collected [`Diagnostics`] next to the build product.

use std::fmt;

/// Category of a degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegradationKind {
    /// An expected element was absent or nested deeper than supported.
    StructuralMismatch,
    /// An image/label pairing was incomplete.
    MissingAsset,
}

impl DegradationKind {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuralMismatch => "structural_mismatch",
            Self::MissingAsset => "missing_asset",
        }
    }
}

/// One recorded degradation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    /// What went wrong.
    pub kind: DegradationKind,
    /// Where it happened, human readable.
    pub context: String,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.context)
    }
}

impl std::error::Error for Degradation {}

/// Collector for degradations raised while building a navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Degradation>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a structural mismatch.
    pub fn structural(&mut self, context: impl Into<String>) {
        self.record(DegradationKind::StructuralMismatch, context.into());
    }

    /// Record a missing asset.
    pub fn missing_asset(&mut self, context: impl Into<String>) {
        self.record(DegradationKind::MissingAsset, context.into());
    }

    fn record(&mut self, kind: DegradationKind, context: String) {
        tracing::debug!(kind = kind.as_str(), context = %context, "navigation content degraded");
        self.items.push(Degradation { kind, context });
    }

    /// Number of recorded degradations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing degraded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of degradations of `kind`.
    #[must_use]
    pub fn count(&self, kind: DegradationKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Recorded degradations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Degradation> + '_ {
        self.items.iter()
    }

    /// Append all degradations from `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}
