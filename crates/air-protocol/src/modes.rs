//! Transmission mode catalogs
//!
//! A [`ModeSet`] is an immutable, named collection of transmission modes,
//! built once at configuration time from a profile name. Each mode pairs a
//! bitrate with its modulation and a flag marking it as *mandatory*: a rate
//! every receiver in the network is guaranteed to support, usable as the
//! fallback floor for control and acknowledgment frames.

use tracing::debug;

use crate::error::ConfigError;

/// Modulation scheme of a transmission mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modulation {
    /// Differential BPSK (802.11 DSSS 1 Mbps)
    Dbpsk,
    /// Differential QPSK (802.11 DSSS 2 Mbps)
    Dqpsk,
    /// Complementary code keying (802.11b 5.5/11 Mbps)
    Cck,
    /// Binary phase-shift keying
    Bpsk,
    /// Quadrature phase-shift keying
    Qpsk,
    /// 16-point quadrature amplitude modulation
    Qam16,
    /// 64-point quadrature amplitude modulation
    Qam64,
}

impl Modulation {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Modulation::Dbpsk => "DBPSK",
            Modulation::Dqpsk => "DQPSK",
            Modulation::Cck => "CCK",
            Modulation::Bpsk => "BPSK",
            Modulation::Qpsk => "QPSK",
            Modulation::Qam16 => "16-QAM",
            Modulation::Qam64 => "64-QAM",
        }
    }
}

/// A single transmission configuration a frame can be sent at
///
/// Modes are small immutable values; they are copied freely rather than
/// referenced back into the catalog that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionMode {
    /// Bitrate in bits per second
    pub bitrate_bps: u64,
    /// Whether every receiver must support this rate
    pub mandatory: bool,
    /// Modulation scheme
    pub modulation: Modulation,
}

impl TransmissionMode {
    /// Format the bitrate for display
    pub fn bitrate_display(&self) -> String {
        if self.bitrate_bps % 1_000_000 == 0 {
            format!("{} Mbps", self.bitrate_bps / 1_000_000)
        } else {
            format!("{:.1} Mbps", self.bitrate_bps as f64 / 1_000_000.0)
        }
    }
}

impl std::fmt::Display for TransmissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.bitrate_display(), self.modulation.name())
    }
}

/// Static mode description used by the built-in profile tables
#[derive(Debug, Clone, Copy)]
struct ModeSpec {
    bps: u64,
    mandatory: bool,
    modulation: Modulation,
}

const fn spec(bps: u64, mandatory: bool, modulation: Modulation) -> ModeSpec {
    ModeSpec {
        bps,
        mandatory,
        modulation,
    }
}

static MODES_802_11B: &[ModeSpec] = &[
    spec(1_000_000, true, Modulation::Dbpsk),
    spec(2_000_000, true, Modulation::Dqpsk),
    spec(5_500_000, false, Modulation::Cck),
    spec(11_000_000, false, Modulation::Cck),
];

static MODES_802_11G: &[ModeSpec] = &[
    spec(1_000_000, true, Modulation::Dbpsk),
    spec(2_000_000, true, Modulation::Dqpsk),
    spec(5_500_000, true, Modulation::Cck),
    spec(6_000_000, true, Modulation::Bpsk),
    spec(9_000_000, false, Modulation::Bpsk),
    spec(11_000_000, true, Modulation::Cck),
    spec(12_000_000, true, Modulation::Qpsk),
    spec(18_000_000, false, Modulation::Qpsk),
    spec(24_000_000, true, Modulation::Qam16),
    spec(36_000_000, false, Modulation::Qam16),
    spec(48_000_000, false, Modulation::Qam64),
    spec(54_000_000, false, Modulation::Qam64),
];

static MODES_802_11A: &[ModeSpec] = &[
    spec(6_000_000, true, Modulation::Bpsk),
    spec(9_000_000, false, Modulation::Bpsk),
    spec(12_000_000, true, Modulation::Qpsk),
    spec(18_000_000, false, Modulation::Qpsk),
    spec(24_000_000, true, Modulation::Qam16),
    spec(36_000_000, false, Modulation::Qam16),
    spec(48_000_000, false, Modulation::Qam64),
    spec(54_000_000, false, Modulation::Qam64),
];

static MODES_802_11P: &[ModeSpec] = &[
    spec(3_000_000, true, Modulation::Bpsk),
    spec(4_500_000, false, Modulation::Bpsk),
    spec(6_000_000, true, Modulation::Qpsk),
    spec(9_000_000, false, Modulation::Qpsk),
    spec(12_000_000, true, Modulation::Qam16),
    spec(18_000_000, false, Modulation::Qam16),
    spec(24_000_000, false, Modulation::Qam64),
    spec(27_000_000, false, Modulation::Qam64),
];

static PROFILES: &[(&str, &[ModeSpec])] = &[
    ("802.11b", MODES_802_11B),
    ("802.11g", MODES_802_11G),
    ("802.11a", MODES_802_11A),
    ("802.11p", MODES_802_11P),
];

/// An immutable, named set of transmission modes, ordered by bitrate
///
/// Built once from a profile name (or, for tests and exotic deployments,
/// from an explicit mode list) and never mutated afterwards. Queries that
/// take a mode key on its exact bitrate, so modes obtained from one catalog
/// can be checked against another.
#[derive(Debug, Clone)]
pub struct ModeSet {
    name: String,
    modes: Vec<TransmissionMode>,
}

impl ModeSet {
    /// Resolve a named profile into a catalog
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        let specs = PROFILES
            .iter()
            .find(|(profile, _)| *profile == name)
            .map(|(_, specs)| *specs)
            .ok_or_else(|| ConfigError::UnknownModeSet(name.to_string()))?;

        let modes = specs
            .iter()
            .map(|s| TransmissionMode {
                bitrate_bps: s.bps,
                mandatory: s.mandatory,
                modulation: s.modulation,
            })
            .collect();

        debug!("Resolved mode set {} ({} modes)", name, specs.len());
        Self::from_modes(name, modes)
    }

    /// Build a catalog from an explicit mode list
    ///
    /// The list is sorted by bitrate. An empty list, or a list without any
    /// mandatory mode, is a configuration error.
    pub fn from_modes(
        name: impl Into<String>,
        mut modes: Vec<TransmissionMode>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if modes.is_empty() {
            return Err(ConfigError::EmptyModeSet(name));
        }
        modes.sort_by_key(|m| m.bitrate_bps);
        if !modes.iter().any(|m| m.mandatory) {
            return Err(ConfigError::NoMandatoryMode(name));
        }
        Ok(Self { name, modes })
    }

    /// Get the profile name this catalog was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of modes in the catalog
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// A catalog is never empty; kept for iterator-style completeness
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Iterate over all modes, slowest first
    pub fn iter(&self) -> impl Iterator<Item = &TransmissionMode> {
        self.modes.iter()
    }

    /// Look up the mode with exactly the given bitrate
    pub fn mode_for_bitrate(&self, bitrate_bps: u64) -> Result<TransmissionMode, ConfigError> {
        self.modes
            .iter()
            .find(|m| m.bitrate_bps == bitrate_bps)
            .copied()
            .ok_or_else(|| ConfigError::UnknownBitrate {
                bitrate: bitrate_bps,
                set: self.name.clone(),
            })
    }

    /// The fastest mode in the catalog
    pub fn fastest(&self) -> TransmissionMode {
        *self.modes.last().expect("catalog is never empty")
    }

    /// The fastest mandatory mode
    pub fn fastest_mandatory(&self) -> TransmissionMode {
        *self
            .modes
            .iter()
            .rfind(|m| m.mandatory)
            .expect("catalog always has a mandatory mode")
    }

    /// The slowest mandatory mode
    pub fn slowest_mandatory(&self) -> TransmissionMode {
        *self
            .modes
            .iter()
            .find(|m| m.mandatory)
            .expect("catalog always has a mandatory mode")
    }

    /// The mandatory mode with the largest bitrate strictly below the given
    /// mode's bitrate, or `None` if no mandatory mode is slower
    pub fn next_slower_mandatory(&self, mode: TransmissionMode) -> Option<TransmissionMode> {
        self.modes
            .iter()
            .rfind(|m| m.mandatory && m.bitrate_bps < mode.bitrate_bps)
            .copied()
    }

    /// Whether the catalog lists the given mode's bitrate as mandatory
    pub fn is_mandatory(&self, mode: TransmissionMode) -> bool {
        self.modes
            .iter()
            .any(|m| m.mandatory && m.bitrate_bps == mode.bitrate_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_profile() {
        let set = ModeSet::resolve("802.11b").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.slowest_mandatory().bitrate_bps, 1_000_000);
        assert_eq!(set.fastest_mandatory().bitrate_bps, 2_000_000);
        assert_eq!(set.fastest().bitrate_bps, 11_000_000);
    }

    #[test]
    fn resolve_unknown_profile() {
        let err = ModeSet::resolve("802.11n").unwrap_err();
        assert_eq!(err, ConfigError::UnknownModeSet("802.11n".to_string()));
    }

    #[test]
    fn bitrate_lookup() {
        let set = ModeSet::resolve("802.11b").unwrap();
        assert_eq!(set.mode_for_bitrate(5_500_000).unwrap().modulation, Modulation::Cck);
        assert!(matches!(
            set.mode_for_bitrate(6_000_000),
            Err(ConfigError::UnknownBitrate { bitrate: 6_000_000, .. })
        ));
    }

    #[test]
    fn next_slower_mandatory_steps_down() {
        let set = ModeSet::resolve("802.11b").unwrap();
        let eleven = set.mode_for_bitrate(11_000_000).unwrap();
        let two = set.next_slower_mandatory(eleven).unwrap();
        assert_eq!(two.bitrate_bps, 2_000_000);

        let one = set.mode_for_bitrate(1_000_000).unwrap();
        assert!(set.next_slower_mandatory(one).is_none());
    }

    #[test]
    fn mandatory_check_keys_on_bitrate() {
        let set = ModeSet::resolve("802.11g").unwrap();
        let other = ModeSet::resolve("802.11b").unwrap();
        // 5.5 Mbps is optional in b but mandatory in g
        let m = other.mode_for_bitrate(5_500_000).unwrap();
        assert!(!other.is_mandatory(m));
        assert!(set.is_mandatory(m));
    }

    #[test]
    fn empty_catalog_rejected() {
        let err = ModeSet::from_modes("empty", Vec::new()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyModeSet("empty".to_string()));
    }

    #[test]
    fn all_optional_catalog_rejected() {
        let modes = vec![TransmissionMode {
            bitrate_bps: 1_000_000,
            mandatory: false,
            modulation: Modulation::Dbpsk,
        }];
        let err = ModeSet::from_modes("opt", modes).unwrap_err();
        assert_eq!(err, ConfigError::NoMandatoryMode("opt".to_string()));
    }

    #[test]
    fn display_formats_fractional_rates() {
        let set = ModeSet::resolve("802.11b").unwrap();
        let m = set.mode_for_bitrate(5_500_000).unwrap();
        assert_eq!(m.to_string(), "5.5 Mbps CCK");
        assert_eq!(set.fastest().to_string(), "11 Mbps CCK");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_mode() -> impl Strategy<Value = TransmissionMode> {
            ((1u64..=60), any::<bool>()).prop_map(|(mbps, mandatory)| TransmissionMode {
                bitrate_bps: mbps * 1_000_000,
                mandatory,
                modulation: Modulation::Bpsk,
            })
        }

        fn arb_catalog() -> impl Strategy<Value = ModeSet> {
            proptest::collection::vec(arb_mode(), 1..12).prop_filter_map(
                "catalog needs a mandatory mode",
                |modes| ModeSet::from_modes("arb", modes).ok(),
            )
        }

        proptest! {
            #[test]
            fn ordering_bounds(set in arb_catalog()) {
                prop_assert!(set.slowest_mandatory().bitrate_bps <= set.fastest_mandatory().bitrate_bps);
                prop_assert!(set.fastest_mandatory().bitrate_bps <= set.fastest().bitrate_bps);
            }

            #[test]
            fn slower_mandatory_is_slower_and_mandatory(set in arb_catalog(), mode in arb_mode()) {
                if let Some(slower) = set.next_slower_mandatory(mode) {
                    prop_assert!(slower.bitrate_bps < mode.bitrate_bps);
                    prop_assert!(set.is_mandatory(slower));
                }
            }

            #[test]
            fn every_listed_mode_resolves(set in arb_catalog()) {
                for mode in set.iter() {
                    prop_assert_eq!(set.mode_for_bitrate(mode.bitrate_bps).unwrap().bitrate_bps, mode.bitrate_bps);
                }
            }
        }
    }
}
