//! Stellar variability class taxonomies.
//!
//! Two closed, versioned sets exist: the coarse level-1 set
//! ([`StellarClass`]) and the refined level-2 set ([`StellarClassLevel2`]).
//! The active set is selected by [`ClassLevel`] at classifier construction
//! and is immutable thereafter. [`ClassTag`] is the union of everything
//! either set can emit and is the key type carried in classification
//! results, so that a variant emitting a tag outside the active set remains
//! expressible (and rejectable) at the contract boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification level selecting the active taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLevel {
    /// Coarse base taxonomy.
    L1,
    /// Refined taxonomy splitting the combined base classes.
    L2,
}

impl ClassLevel {
    /// Short name used in directory layouts and artifact file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
        }
    }

    /// The closed member set of this level's taxonomy.
    #[must_use]
    pub const fn members(self) -> &'static [ClassTag] {
        match self {
            Self::L1 => &L1_TAGS,
            Self::L2 => &L2_TAGS,
        }
    }

    /// Whether `tag` belongs to this level's taxonomy.
    #[must_use]
    pub fn contains(self, tag: ClassTag) -> bool {
        self.members().contains(&tag)
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse (level-1) stellar variability classes. Stable codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StellarClass {
    /// Solar-like oscillators.
    Solarlike = 1,
    /// Transits and eclipsing binaries.
    Eclipse = 2,
    /// RR Lyrae and Cepheid pulsators.
    RrlyrCepheid = 3,
    /// Gamma Doradus and slowly-pulsating B stars.
    GdorSpb = 4,
    /// Delta Scuti and beta Cephei pulsators.
    DsctBcep = 5,
    /// Contact binaries and rotational modulation.
    ContactRot = 6,
    /// Aperiodic variability.
    Aperiodic = 7,
    /// Constant stars.
    Constant = 8,
    /// Rapid irregular variability.
    Rapid = 9,
}

impl StellarClass {
    /// Every member of the level-1 set, in code order.
    pub const ALL: [Self; 9] = [
        Self::Solarlike,
        Self::Eclipse,
        Self::RrlyrCepheid,
        Self::GdorSpb,
        Self::DsctBcep,
        Self::ContactRot,
        Self::Aperiodic,
        Self::Constant,
        Self::Rapid,
    ];

    /// Stable integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The wire tag for this class.
    #[must_use]
    pub const fn tag(self) -> ClassTag {
        match self {
            Self::Solarlike => ClassTag::Solarlike,
            Self::Eclipse => ClassTag::Eclipse,
            Self::RrlyrCepheid => ClassTag::RrlyrCepheid,
            Self::GdorSpb => ClassTag::GdorSpb,
            Self::DsctBcep => ClassTag::DsctBcep,
            Self::ContactRot => ClassTag::ContactRot,
            Self::Aperiodic => ClassTag::Aperiodic,
            Self::Constant => ClassTag::Constant,
            Self::Rapid => ClassTag::Rapid,
        }
    }

    /// Stable label string.
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.tag().label()
    }
}

/// Refined (level-2) stellar variability classes. Stable codes.
///
/// Splits the combined level-1 classes into their constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StellarClassLevel2 {
    /// Solar-like oscillators.
    Solarlike = 1,
    /// Transits and eclipsing binaries.
    Eclipse = 2,
    /// RR Lyrae pulsators.
    Rrlyr = 3,
    /// Cepheid pulsators.
    Cepheid = 4,
    /// Gamma Doradus pulsators.
    Gdor = 5,
    /// Slowly-pulsating B stars.
    Spb = 6,
    /// Delta Scuti pulsators.
    Dsct = 7,
    /// Beta Cephei pulsators.
    Bcep = 8,
    /// Contact binaries.
    Contact = 9,
    /// Rotational modulation.
    Rot = 10,
    /// Aperiodic variability.
    Aperiodic = 11,
    /// Constant stars.
    Constant = 12,
    /// Rapid irregular variability.
    Rapid = 13,
}

impl StellarClassLevel2 {
    /// Every member of the level-2 set, in code order.
    pub const ALL: [Self; 13] = [
        Self::Solarlike,
        Self::Eclipse,
        Self::Rrlyr,
        Self::Cepheid,
        Self::Gdor,
        Self::Spb,
        Self::Dsct,
        Self::Bcep,
        Self::Contact,
        Self::Rot,
        Self::Aperiodic,
        Self::Constant,
        Self::Rapid,
    ];

    /// Stable integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The wire tag for this class.
    #[must_use]
    pub const fn tag(self) -> ClassTag {
        match self {
            Self::Solarlike => ClassTag::Solarlike,
            Self::Eclipse => ClassTag::Eclipse,
            Self::Rrlyr => ClassTag::Rrlyr,
            Self::Cepheid => ClassTag::Cepheid,
            Self::Gdor => ClassTag::Gdor,
            Self::Spb => ClassTag::Spb,
            Self::Dsct => ClassTag::Dsct,
            Self::Bcep => ClassTag::Bcep,
            Self::Contact => ClassTag::Contact,
            Self::Rot => ClassTag::Rot,
            Self::Aperiodic => ClassTag::Aperiodic,
            Self::Constant => ClassTag::Constant,
            Self::Rapid => ClassTag::Rapid,
        }
    }

    /// Stable label string.
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.tag().label()
    }
}

/// The union of all class tags either taxonomy can emit.
///
/// This is the key type of classification results. Membership in the
/// *active* taxonomy is enforced at the contract boundary, not by the type,
/// so a misbehaving variant stays representable long enough to be rejected
/// with a useful error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClassTag {
    /// Solar-like oscillators (L1 and L2).
    #[serde(rename = "solarlike")]
    Solarlike,
    /// Transits and eclipsing binaries (L1 and L2).
    #[serde(rename = "eclipse")]
    Eclipse,
    /// RR Lyrae and Cepheid pulsators combined (L1).
    #[serde(rename = "rrlyr-cepheid")]
    RrlyrCepheid,
    /// Gamma Doradus and SPB pulsators combined (L1).
    #[serde(rename = "gdor-spb")]
    GdorSpb,
    /// Delta Scuti and beta Cephei pulsators combined (L1).
    #[serde(rename = "dsct-bcep")]
    DsctBcep,
    /// Contact binaries and rotational modulation combined (L1).
    #[serde(rename = "contact-rot")]
    ContactRot,
    /// RR Lyrae pulsators (L2).
    #[serde(rename = "rrlyr")]
    Rrlyr,
    /// Cepheid pulsators (L2).
    #[serde(rename = "cepheid")]
    Cepheid,
    /// Gamma Doradus pulsators (L2).
    #[serde(rename = "gdor")]
    Gdor,
    /// Slowly-pulsating B stars (L2).
    #[serde(rename = "spb")]
    Spb,
    /// Delta Scuti pulsators (L2).
    #[serde(rename = "dsct")]
    Dsct,
    /// Beta Cephei pulsators (L2).
    #[serde(rename = "bcep")]
    Bcep,
    /// Contact binaries (L2).
    #[serde(rename = "contact")]
    Contact,
    /// Rotational modulation (L2).
    #[serde(rename = "rot")]
    Rot,
    /// Aperiodic variability (L1 and L2).
    #[serde(rename = "aperiodic")]
    Aperiodic,
    /// Constant stars (L1 and L2).
    #[serde(rename = "constant")]
    Constant,
    /// Rapid irregular variability (L1 and L2).
    #[serde(rename = "rapid")]
    Rapid,
}

const L1_TAGS: [ClassTag; 9] = [
    ClassTag::Solarlike,
    ClassTag::Eclipse,
    ClassTag::RrlyrCepheid,
    ClassTag::GdorSpb,
    ClassTag::DsctBcep,
    ClassTag::ContactRot,
    ClassTag::Aperiodic,
    ClassTag::Constant,
    ClassTag::Rapid,
];

const L2_TAGS: [ClassTag; 13] = [
    ClassTag::Solarlike,
    ClassTag::Eclipse,
    ClassTag::Rrlyr,
    ClassTag::Cepheid,
    ClassTag::Gdor,
    ClassTag::Spb,
    ClassTag::Dsct,
    ClassTag::Bcep,
    ClassTag::Contact,
    ClassTag::Rot,
    ClassTag::Aperiodic,
    ClassTag::Constant,
    ClassTag::Rapid,
];

impl ClassTag {
    /// Stable label string, identical to the serde representation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Solarlike => "solarlike",
            Self::Eclipse => "eclipse",
            Self::RrlyrCepheid => "rrlyr-cepheid",
            Self::GdorSpb => "gdor-spb",
            Self::DsctBcep => "dsct-bcep",
            Self::ContactRot => "contact-rot",
            Self::Rrlyr => "rrlyr",
            Self::Cepheid => "cepheid",
            Self::Gdor => "gdor",
            Self::Spb => "spb",
            Self::Dsct => "dsct",
            Self::Bcep => "bcep",
            Self::Contact => "contact",
            Self::Rot => "rot",
            Self::Aperiodic => "aperiodic",
            Self::Constant => "constant",
            Self::Rapid => "rapid",
        }
    }

    /// Whether this tag belongs to the taxonomy of `level`.
    #[must_use]
    pub fn in_level(self, level: ClassLevel) -> bool {
        level.contains(self)
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<StellarClass> for ClassTag {
    fn from(class: StellarClass) -> Self {
        class.tag()
    }
}

impl From<StellarClassLevel2> for ClassTag {
    fn from(class: StellarClassLevel2) -> Self {
        class.tag()
    }
}

/// Collapse a possibly multi-labelled ground truth to one evaluation label.
///
/// Multi-labelled stars resolve through a fixed priority order, loosely
/// based on signal clarity: eclipse > RR Lyrae/Cepheid > contact/rotation >
/// delta Scuti/beta Cephei > gamma Dor/SPB > solar-like. The first match
/// wins. If no distinguished class is present, or the star carries exactly
/// one label, the first listed label is used unchanged.
///
/// Returns `None` only for an empty label list.
#[must_use]
pub fn resolve_primary(labels: &[ClassTag]) -> Option<ClassTag> {
    const RESOLUTION_ORDER: [ClassTag; 6] = [
        ClassTag::Eclipse,
        ClassTag::RrlyrCepheid,
        ClassTag::ContactRot,
        ClassTag::DsctBcep,
        ClassTag::GdorSpb,
        ClassTag::Solarlike,
    ];

    if labels.len() > 1 {
        for tag in RESOLUTION_ORDER {
            if labels.contains(&tag) {
                return Some(tag);
            }
        }
    }
    labels.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_member_counts() {
        assert_eq!(ClassLevel::L1.members().len(), 9);
        assert_eq!(ClassLevel::L2.members().len(), 13);
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(StellarClass::Solarlike.code(), 1);
        assert_eq!(StellarClass::Rapid.code(), 9);
        assert_eq!(StellarClassLevel2::Rrlyr.code(), 3);
        assert_eq!(StellarClassLevel2::Rapid.code(), 13);
    }

    #[test]
    fn test_combined_classes_absent_from_l2() {
        assert!(ClassTag::RrlyrCepheid.in_level(ClassLevel::L1));
        assert!(!ClassTag::RrlyrCepheid.in_level(ClassLevel::L2));
        assert!(ClassTag::Rrlyr.in_level(ClassLevel::L2));
        assert!(!ClassTag::Rrlyr.in_level(ClassLevel::L1));
    }

    #[test]
    fn test_shared_classes_present_in_both_levels() {
        for tag in [ClassTag::Solarlike, ClassTag::Eclipse, ClassTag::Constant] {
            assert!(tag.in_level(ClassLevel::L1));
            assert!(tag.in_level(ClassLevel::L2));
        }
    }

    #[test]
    fn test_all_matches_members() {
        let l1: Vec<ClassTag> = StellarClass::ALL.iter().map(|c| c.tag()).collect();
        assert_eq!(l1.as_slice(), ClassLevel::L1.members());
        let l2: Vec<ClassTag> = StellarClassLevel2::ALL.iter().map(|c| c.tag()).collect();
        assert_eq!(l2.as_slice(), ClassLevel::L2.members());
    }

    #[test]
    fn test_resolve_eclipse_beats_solarlike() {
        let labels = [ClassTag::Solarlike, ClassTag::Eclipse];
        assert_eq!(resolve_primary(&labels), Some(ClassTag::Eclipse));
    }

    #[test]
    fn test_resolve_gdor_spb_without_higher_priority() {
        let labels = [ClassTag::Solarlike, ClassTag::GdorSpb];
        assert_eq!(resolve_primary(&labels), Some(ClassTag::GdorSpb));
    }

    #[test]
    fn test_resolve_order_is_total() {
        // With all six distinguished classes present, eclipse wins.
        let labels = [
            ClassTag::Solarlike,
            ClassTag::GdorSpb,
            ClassTag::DsctBcep,
            ClassTag::ContactRot,
            ClassTag::RrlyrCepheid,
            ClassTag::Eclipse,
        ];
        assert_eq!(resolve_primary(&labels), Some(ClassTag::Eclipse));
    }

    #[test]
    fn test_resolve_single_label_unchanged() {
        assert_eq!(
            resolve_primary(&[ClassTag::Aperiodic]),
            Some(ClassTag::Aperiodic)
        );
    }

    #[test]
    fn test_resolve_no_distinguished_class_takes_first() {
        let labels = [ClassTag::Constant, ClassTag::Rapid];
        assert_eq!(resolve_primary(&labels), Some(ClassTag::Constant));
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve_primary(&[]), None);
    }

    #[test]
    fn test_label_serde_round_trip() {
        let json = serde_json::to_string(&ClassTag::RrlyrCepheid).unwrap();
        assert_eq!(json, "\"rrlyr-cepheid\"");
        let back: ClassTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ClassTag::RrlyrCepheid);
    }
}
