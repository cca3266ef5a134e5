//! The capability lattice of optics.
//!
//! Every optic carries a set of capabilities - its *kinds* - that
//! determines which operations are legal on it. The kinds form a lattice
//! where a child implies all of its ancestors' guarantees:
//!
//! ```text
//! Fold        : read zero or more foci, no write
//! Setter      : write, no guaranteed read
//! Getter      < Fold            : read exactly one focus
//! Traversal   < Fold, Setter    : read and write 0..N foci
//! Review      : construct a state from a focus
//! Lens        < Getter, Traversal        : exactly one, read + write
//! Prism       < Traversal, Review        : zero or one, read + write + construct
//! Isomorphism < Lens, Prism              : exactly one, reversible
//! Equality    < Isomorphism
//! ```
//!
//! Composing two optics intersects their capability sets; an empty
//! intersection is rejected eagerly at composition time. This makes
//! illegal compositions fail structurally rather than at first use.
//!
//! # Examples
//!
//! ```
//! use refract::kind::{Kind, KindSet};
//!
//! let lens = Kind::Lens.implied();
//! assert!(lens.contains_kind(Kind::Getter));
//! assert!(lens.contains_kind(Kind::Fold));
//! assert!(!lens.contains_kind(Kind::Prism));
//! assert_eq!(lens.most_specific(), Some(Kind::Lens));
//! ```

use bitflags::bitflags;

/// A single optic capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Reads zero or more foci; cannot write.
    Fold,
    /// Writes foci; cannot necessarily read them.
    Setter,
    /// Reads exactly one focus.
    Getter,
    /// Reads and writes zero or more foci.
    Traversal,
    /// Constructs a state from a focus.
    Review,
    /// Reads and writes exactly one focus.
    Lens,
    /// Reads, writes and constructs a focus that may not exist.
    Prism,
    /// A reversible one-to-one correspondence.
    Isomorphism,
    /// An isomorphism that is definitionally an identity.
    Equality,
}

bitflags! {
    /// A set of [`Kind`]s, closed over the lattice: if a set contains a
    /// kind it also contains everything that kind implies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u16 {
        /// See [`Kind::Fold`].
        const FOLD = 1;
        /// See [`Kind::Setter`].
        const SETTER = 1 << 1;
        /// See [`Kind::Getter`].
        const GETTER = 1 << 2;
        /// See [`Kind::Traversal`].
        const TRAVERSAL = 1 << 3;
        /// See [`Kind::Review`].
        const REVIEW = 1 << 4;
        /// See [`Kind::Lens`].
        const LENS = 1 << 5;
        /// See [`Kind::Prism`].
        const PRISM = 1 << 6;
        /// See [`Kind::Isomorphism`].
        const ISOMORPHISM = 1 << 7;
        /// See [`Kind::Equality`].
        const EQUALITY = 1 << 8;
    }
}

impl Kind {
    /// The single bit for this kind, without its ancestors.
    #[must_use]
    pub const fn flag(self) -> KindSet {
        match self {
            Self::Fold => KindSet::FOLD,
            Self::Setter => KindSet::SETTER,
            Self::Getter => KindSet::GETTER,
            Self::Traversal => KindSet::TRAVERSAL,
            Self::Review => KindSet::REVIEW,
            Self::Lens => KindSet::LENS,
            Self::Prism => KindSet::PRISM,
            Self::Isomorphism => KindSet::ISOMORPHISM,
            Self::Equality => KindSet::EQUALITY,
        }
    }

    /// The full capability set this kind guarantees: itself and every
    /// ancestor in the lattice.
    #[must_use]
    pub const fn implied(self) -> KindSet {
        match self {
            Self::Fold => KindSet::FOLD,
            Self::Setter => KindSet::SETTER,
            Self::Getter => KindSet::GETTER.union(KindSet::FOLD),
            Self::Traversal => KindSet::TRAVERSAL
                .union(KindSet::FOLD)
                .union(KindSet::SETTER),
            Self::Review => KindSet::REVIEW,
            Self::Lens => KindSet::LENS
                .union(Self::Getter.implied())
                .union(Self::Traversal.implied()),
            Self::Prism => KindSet::PRISM
                .union(Self::Traversal.implied())
                .union(KindSet::REVIEW),
            Self::Isomorphism => KindSet::ISOMORPHISM
                .union(Self::Lens.implied())
                .union(Self::Prism.implied()),
            Self::Equality => KindSet::EQUALITY.union(Self::Isomorphism.implied()),
        }
    }
}

/// Kinds ordered from most to least specific, the order `most_specific`
/// reports in.
const SPECIFICITY: [Kind; 9] = [
    Kind::Equality,
    Kind::Isomorphism,
    Kind::Prism,
    Kind::Review,
    Kind::Lens,
    Kind::Traversal,
    Kind::Getter,
    Kind::Setter,
    Kind::Fold,
];

impl KindSet {
    /// Returns `true` when the set satisfies `kind` - that is, when it
    /// contains the kind and everything the kind implies.
    #[must_use]
    pub const fn contains_kind(self, kind: Kind) -> bool {
        self.contains(kind.implied())
    }

    /// The most specific kind this set satisfies, or `None` for the
    /// empty set.
    #[must_use]
    pub fn most_specific(self) -> Option<Kind> {
        SPECIFICITY
            .into_iter()
            .find(|kind| self.contains_kind(*kind))
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fold => "Fold",
            Self::Setter => "Setter",
            Self::Getter => "Getter",
            Self::Traversal => "Traversal",
            Self::Review => "Review",
            Self::Lens => "Lens",
            Self::Prism => "Prism",
            Self::Isomorphism => "Isomorphism",
            Self::Equality => "Equality",
        };
        formatter.write_str(name)
    }
}

impl std::fmt::Display for KindSet {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return formatter.write_str("(no capabilities)");
        }
        let mut first = true;
        for kind in SPECIFICITY.into_iter().rev() {
            if self.contains(kind.flag()) {
                if !first {
                    formatter.write_str("|")?;
                }
                write!(formatter, "{kind}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_implies_getter_and_traversal() {
        let lens = Kind::Lens.implied();
        assert!(lens.contains_kind(Kind::Getter));
        assert!(lens.contains_kind(Kind::Traversal));
        assert!(lens.contains_kind(Kind::Fold));
        assert!(lens.contains_kind(Kind::Setter));
        assert!(!lens.contains_kind(Kind::Review));
    }

    #[test]
    fn test_isomorphism_implies_lens_and_prism() {
        let iso = Kind::Isomorphism.implied();
        assert!(iso.contains_kind(Kind::Lens));
        assert!(iso.contains_kind(Kind::Prism));
        assert!(iso.contains_kind(Kind::Review));
        assert!(!iso.contains_kind(Kind::Equality));
    }

    #[test]
    fn test_intersection_of_fold_and_setter_is_empty() {
        let intersection = Kind::Fold.implied() & Kind::Setter.implied();
        assert!(intersection.is_empty());
        assert_eq!(intersection.most_specific(), None);
    }

    #[test]
    fn test_most_specific_reports_the_narrowest_kind() {
        assert_eq!(Kind::Equality.implied().most_specific(), Some(Kind::Equality));
        assert_eq!(Kind::Lens.implied().most_specific(), Some(Kind::Lens));
        let traversal_like = Kind::Lens.implied() & Kind::Prism.implied();
        assert_eq!(traversal_like.most_specific(), Some(Kind::Traversal));
    }

    #[test]
    fn test_display_lists_capabilities() {
        assert_eq!(format!("{}", Kind::Lens), "Lens");
        assert_eq!(
            format!("{}", Kind::Getter.implied()),
            "Fold|Getter"
        );
    }
}
