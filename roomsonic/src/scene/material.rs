//! Frequency-dependent absorption coefficients for room surfaces.
//!
//! Every material is described across nine octave bands centered at
//! `31.25 * 2^k` Hz for `k = 0..8` (see [`FREQUENCY_BANDS`]).

use crate::error::{Result, RoomSonicError};
use std::collections::BTreeMap;

/// Number of absorption bands per material.
pub const NUM_FREQUENCY_BANDS: usize = 9;

/// Center frequencies (Hz) of the absorption bands.
pub const FREQUENCY_BANDS: [f32; NUM_FREQUENCY_BANDS] = [
    31.25, 62.5, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0,
];

/// Number of bands averaged when deriving a broadband reflection coefficient.
const REFLECTION_AVERAGING_BANDS: usize = 3;

/// First band included in the reflection average (500 Hz).
const REFLECTION_STARTING_BAND: usize = 4;

/// Absorption coefficients of a surface, one per band in [`FREQUENCY_BANDS`].
///
/// Each value is the fraction of incident energy that is *not* reflected:
/// 0.0 is a perfect mirror, 1.0 is a fully transparent (open) surface.
///
/// # Example
///
/// ```
/// use roomsonic::scene::MaterialCoefficients;
///
/// let marble = MaterialCoefficients::MARBLE;
/// assert_eq!(marble.absorption().len(), 9);
///
/// let custom = MaterialCoefficients::new([0.2; 9]).unwrap();
/// assert!(custom.reflection_coefficient() > 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialCoefficients {
    absorption: [f32; NUM_FREQUENCY_BANDS],
}

impl MaterialCoefficients {
    /// Transparent surface - absorbs everything, used for open air
    pub const TRANSPARENT: Self = Self::from_bands([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);

    /// Acoustic ceiling tiles - highly absorptive above 500 Hz
    pub const ACOUSTIC_CEILING_TILES: Self =
        Self::from_bands([0.672, 0.675, 0.7, 0.66, 0.72, 0.92, 0.88, 0.75, 1.0]);

    /// Bare brick - very reflective, slightly softer at high frequencies
    pub const BRICK_BARE: Self =
        Self::from_bands([0.03, 0.03, 0.03, 0.03, 0.03, 0.04, 0.05, 0.07, 0.14]);

    /// Painted brick - among the most reflective surfaces
    pub const BRICK_PAINTED: Self =
        Self::from_bands([0.006, 0.007, 0.01, 0.01, 0.02, 0.02, 0.02, 0.03, 0.06]);

    /// Coarse concrete block - moderately absorptive across the band
    pub const CONCRETE_BLOCK_COARSE: Self =
        Self::from_bands([0.36, 0.36, 0.36, 0.44, 0.31, 0.29, 0.39, 0.25, 0.5]);

    /// Painted concrete block - reflective, slight low-frequency absorption
    pub const CONCRETE_BLOCK_PAINTED: Self =
        Self::from_bands([0.092, 0.09, 0.1, 0.05, 0.06, 0.07, 0.09, 0.08, 0.16]);

    /// Heavy curtain - absorptive from the mids upward
    pub const CURTAIN_HEAVY: Self =
        Self::from_bands([0.073, 0.106, 0.14, 0.35, 0.55, 0.72, 0.7, 0.65, 1.0]);

    /// Fiberglass insulation - nearly fully absorptive above 250 Hz
    pub const FIBER_GLASS_INSULATION: Self =
        Self::from_bands([0.193, 0.22, 0.22, 0.82, 0.99, 0.99, 0.99, 0.99, 1.0]);

    /// Thin glass - absorbs bass, reflects the mids and highs
    pub const GLASS_THIN: Self =
        Self::from_bands([0.18, 0.169, 0.18, 0.06, 0.04, 0.03, 0.02, 0.02, 0.04]);

    /// Thick glass - stronger bass absorption than thin glass
    pub const GLASS_THICK: Self =
        Self::from_bands([0.35, 0.35, 0.35, 0.25, 0.18, 0.12, 0.07, 0.04, 0.08]);

    /// Grass - absorptive in the mids and highs, used as outdoor ground
    pub const GRASS: Self = Self::from_bands([0.05, 0.05, 0.15, 0.25, 0.4, 0.55, 0.6, 0.6, 0.6]);

    /// Linoleum on concrete - very reflective floor
    pub const LINOLEUM_ON_CONCRETE: Self =
        Self::from_bands([0.02, 0.02, 0.02, 0.03, 0.03, 0.03, 0.03, 0.02, 0.04]);

    /// Marble - near-perfect mirror across all bands
    pub const MARBLE: Self =
        Self::from_bands([0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.02, 0.02, 0.04]);

    /// Metal - very reflective
    pub const METAL: Self =
        Self::from_bands([0.03, 0.035, 0.04, 0.04, 0.05, 0.05, 0.05, 0.07, 0.09]);

    /// Parquet on concrete - reflective floor, softer at high frequencies
    pub const PARQUET_ON_CONCRETE: Self =
        Self::from_bands([0.028, 0.03, 0.04, 0.04, 0.07, 0.06, 0.06, 0.07, 0.14]);

    /// Rough plaster - reflective
    pub const PLASTER_ROUGH: Self =
        Self::from_bands([0.017, 0.018, 0.02, 0.03, 0.04, 0.05, 0.04, 0.03, 0.06]);

    /// Smooth plaster - reflective, slightly softer above 4 kHz
    pub const PLASTER_SMOOTH: Self =
        Self::from_bands([0.011, 0.012, 0.013, 0.015, 0.02, 0.03, 0.04, 0.05, 0.1]);

    /// Plywood panel - absorbs bass through panel resonance
    pub const PLYWOOD_PANEL: Self =
        Self::from_bands([0.4, 0.34, 0.28, 0.22, 0.17, 0.09, 0.1, 0.11, 0.22]);

    /// Polished concrete or tile - very reflective
    pub const POLISHED_CONCRETE_OR_TILE: Self =
        Self::from_bands([0.008, 0.008, 0.01, 0.01, 0.015, 0.02, 0.02, 0.02, 0.04]);

    /// Sheet rock - absorbs bass, reflects the mids
    pub const SHEET_ROCK: Self =
        Self::from_bands([0.29, 0.279, 0.29, 0.1, 0.05, 0.04, 0.07, 0.09, 0.18]);

    /// Water or ice - almost perfectly reflective
    pub const WATER_OR_ICE_SURFACE: Self =
        Self::from_bands([0.006, 0.006, 0.008, 0.008, 0.013, 0.015, 0.02, 0.025, 0.05]);

    /// Wooden ceiling - moderate bass absorption
    pub const WOOD_CEILING: Self =
        Self::from_bands([0.15, 0.147, 0.15, 0.11, 0.1, 0.07, 0.06, 0.07, 0.14]);

    /// Wood panel - absorbs bass, reflective in the mids
    pub const WOOD_PANEL: Self =
        Self::from_bands([0.28, 0.28, 0.28, 0.22, 0.17, 0.09, 0.1, 0.11, 0.22]);

    /// Uniform surface - absorbs half the energy in every band
    pub const UNIFORM: Self = Self::from_bands([0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);

    const fn from_bands(absorption: [f32; NUM_FREQUENCY_BANDS]) -> Self {
        Self { absorption }
    }

    /// Creates coefficients from nine absorption values, each in `[0, 1]`.
    pub fn new(absorption: [f32; NUM_FREQUENCY_BANDS]) -> Result<Self> {
        let coefficients = Self { absorption };
        coefficients.validate()?;
        Ok(coefficients)
    }

    /// Creates coefficients from a slice, which must hold exactly nine values.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let absorption: [f32; NUM_FREQUENCY_BANDS] = values.try_into().map_err(|_| {
            RoomSonicError::Configuration(format!(
                "Expected {} absorption coefficients, got {}",
                NUM_FREQUENCY_BANDS,
                values.len()
            ))
        })?;
        Self::new(absorption)
    }

    /// Validates that every band lies in `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<()> {
        for (band, &value) in self.absorption.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(RoomSonicError::Range(format!(
                    "Absorption at {} Hz must be between 0.0 and 1.0, got {}",
                    FREQUENCY_BANDS[band], value
                )));
            }
        }
        Ok(())
    }

    pub fn absorption(&self) -> &[f32; NUM_FREQUENCY_BANDS] {
        &self.absorption
    }

    /// Iterates over `(center_frequency_hz, absorption)` pairs.
    pub fn bands(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        FREQUENCY_BANDS.iter().copied().zip(self.absorption.iter().copied())
    }

    /// Broadband reflection coefficient of the surface.
    ///
    /// Averages the absorption over the 500 Hz, 1 kHz and 2 kHz bands and
    /// returns the pressure reflection `sqrt(1 - average)`.
    pub fn reflection_coefficient(&self) -> f32 {
        let bands = &self.absorption
            [REFLECTION_STARTING_BAND..REFLECTION_STARTING_BAND + REFLECTION_AVERAGING_BANDS];
        let average = bands.iter().sum::<f32>() / REFLECTION_AVERAGING_BANDS as f32;
        (1.0 - average).max(0.0).sqrt()
    }
}

/// Every built-in material, in the order the table registers them.
pub const BUILTIN_MATERIALS: [(&str, MaterialCoefficients); 24] = [
    ("transparent", MaterialCoefficients::TRANSPARENT),
    (
        "acoustic-ceiling-tiles",
        MaterialCoefficients::ACOUSTIC_CEILING_TILES,
    ),
    ("brick-bare", MaterialCoefficients::BRICK_BARE),
    ("brick-painted", MaterialCoefficients::BRICK_PAINTED),
    (
        "concrete-block-coarse",
        MaterialCoefficients::CONCRETE_BLOCK_COARSE,
    ),
    (
        "concrete-block-painted",
        MaterialCoefficients::CONCRETE_BLOCK_PAINTED,
    ),
    ("curtain-heavy", MaterialCoefficients::CURTAIN_HEAVY),
    (
        "fiber-glass-insulation",
        MaterialCoefficients::FIBER_GLASS_INSULATION,
    ),
    ("glass-thin", MaterialCoefficients::GLASS_THIN),
    ("glass-thick", MaterialCoefficients::GLASS_THICK),
    ("grass", MaterialCoefficients::GRASS),
    (
        "linoleum-on-concrete",
        MaterialCoefficients::LINOLEUM_ON_CONCRETE,
    ),
    ("marble", MaterialCoefficients::MARBLE),
    ("metal", MaterialCoefficients::METAL),
    (
        "parquet-on-concrete",
        MaterialCoefficients::PARQUET_ON_CONCRETE,
    ),
    ("plaster-rough", MaterialCoefficients::PLASTER_ROUGH),
    ("plaster-smooth", MaterialCoefficients::PLASTER_SMOOTH),
    ("plywood-panel", MaterialCoefficients::PLYWOOD_PANEL),
    (
        "polished-concrete-or-tile",
        MaterialCoefficients::POLISHED_CONCRETE_OR_TILE,
    ),
    ("sheet-rock", MaterialCoefficients::SHEET_ROCK),
    (
        "water-or-ice-surface",
        MaterialCoefficients::WATER_OR_ICE_SURFACE,
    ),
    ("wood-ceiling", MaterialCoefficients::WOOD_CEILING),
    ("wood-panel", MaterialCoefficients::WOOD_PANEL),
    ("uniform", MaterialCoefficients::UNIFORM),
];

/// Registry mapping material names to their absorption coefficients.
///
/// # Example
///
/// ```
/// use roomsonic::scene::{MaterialCoefficients, MaterialTable};
///
/// let mut materials = MaterialTable::with_presets();
/// materials.insert("foam", MaterialCoefficients::new([0.9; 9]).unwrap());
///
/// let brick = materials.coefficients("brick-bare").unwrap();
/// assert_eq!(brick, MaterialCoefficients::BRICK_BARE);
/// assert!(materials.coefficients("lava").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MaterialTable {
    materials: BTreeMap<String, MaterialCoefficients>,
}

impl MaterialTable {
    /// Creates a new empty material table
    pub fn new() -> Self {
        Self {
            materials: BTreeMap::new(),
        }
    }

    /// Creates a table pre-loaded with every entry of [`BUILTIN_MATERIALS`].
    pub fn with_presets() -> Self {
        let mut table = Self::new();
        for (name, coefficients) in BUILTIN_MATERIALS {
            table.materials.insert(name.to_string(), coefficients);
        }
        table
    }

    /// Registers a material, returning the coefficients it replaced, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        coefficients: MaterialCoefficients,
    ) -> Option<MaterialCoefficients> {
        self.materials.insert(name.into(), coefficients)
    }

    /// Looks up a material by name.
    ///
    /// # Errors
    ///
    /// Returns [`RoomSonicError::Configuration`] if the name is not registered.
    pub fn coefficients(&self, name: &str) -> Result<MaterialCoefficients> {
        self.materials.get(name).copied().ok_or_else(|| {
            RoomSonicError::Configuration(format!("Unknown material '{}'", name))
        })
    }

    pub fn get(&self, name: &str) -> Option<&MaterialCoefficients> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterates over all materials in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaterialCoefficients)> {
        self.materials.iter().map(|(name, c)| (name.as_str(), c))
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_materials_are_nine_bands_in_unit_range() {
        let table = MaterialTable::with_presets();
        assert_eq!(table.len(), BUILTIN_MATERIALS.len());

        for (name, coefficients) in table.iter() {
            assert_eq!(coefficients.absorption().len(), NUM_FREQUENCY_BANDS);
            assert!(
                coefficients.validate().is_ok(),
                "material {} has out-of-range coefficients",
                name
            );
        }
    }

    #[test]
    fn test_frequency_bands_double() {
        assert_eq!(FREQUENCY_BANDS[0], 31.25);
        for pair in FREQUENCY_BANDS.windows(2) {
            assert_eq!(pair[1], pair[0] * 2.0);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let table = MaterialTable::with_presets();
        assert_eq!(
            table.coefficients("curtain-heavy").unwrap(),
            MaterialCoefficients::CURTAIN_HEAVY
        );
        assert_eq!(
            table.coefficients("transparent").unwrap().absorption(),
            &[1.0; NUM_FREQUENCY_BANDS]
        );
        assert!(table.contains("plaster-rough"));
    }

    #[test]
    fn test_unknown_material_is_configuration_error() {
        let table = MaterialTable::with_presets();
        match table.coefficients("lava") {
            Err(RoomSonicError::Configuration(msg)) => assert!(msg.contains("lava")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_material_validation() {
        assert!(MaterialCoefficients::new([0.5; NUM_FREQUENCY_BANDS]).is_ok());

        let mut bands = [0.5; NUM_FREQUENCY_BANDS];
        bands[3] = 1.5;
        assert!(matches!(
            MaterialCoefficients::new(bands),
            Err(RoomSonicError::Range(_))
        ));

        bands[3] = -0.1;
        assert!(MaterialCoefficients::new(bands).is_err());
    }

    #[test]
    fn test_from_slice_requires_nine_values() {
        assert!(MaterialCoefficients::from_slice(&[0.1; 9]).is_ok());
        assert!(matches!(
            MaterialCoefficients::from_slice(&[0.1; 8]),
            Err(RoomSonicError::Configuration(_))
        ));
    }

    #[test]
    fn test_insert_custom_material() {
        let mut table = MaterialTable::new();
        assert!(table.is_empty());

        let foam = MaterialCoefficients::new([0.9; NUM_FREQUENCY_BANDS]).unwrap();
        assert_eq!(table.insert("foam", foam), None);
        assert_eq!(table.insert("foam", MaterialCoefficients::UNIFORM), Some(foam));
        assert_eq!(table.get("foam"), Some(&MaterialCoefficients::UNIFORM));
    }

    #[test]
    fn test_reflection_coefficient() {
        assert_eq!(MaterialCoefficients::TRANSPARENT.reflection_coefficient(), 0.0);

        // marble averages 0.01, 0.01, 0.02 over 500 Hz..2 kHz
        let expected = (1.0f32 - 0.04 / 3.0).sqrt();
        let marble = MaterialCoefficients::MARBLE.reflection_coefficient();
        assert!((marble - expected).abs() < 1e-6);

        assert!(
            MaterialCoefficients::CURTAIN_HEAVY.reflection_coefficient()
                < MaterialCoefficients::BRICK_BARE.reflection_coefficient()
        );
    }

    #[test]
    fn test_bands_pair_frequency_and_value() {
        let bands: Vec<(f32, f32)> = MaterialCoefficients::GRASS.bands().collect();
        assert_eq!(bands.len(), 9);
        assert_eq!(bands[0], (31.25, 0.05));
        assert_eq!(bands[8], (8000.0, 0.6));
    }
}
