//! Per-category drawing routines and their dispatch table.
//!
//! Each design is a function of `(surface, context, rng)` that draws around
//! the origin of the current frame, inside roughly `[-0.5, 0.5] * size`.
//! Every geometric parameter is re-sampled on each call within a narrow
//! range, so two icons of one category differ while staying recognizable.
//!
//! Categories without a design map to [`SymbolDesign::Blank`], which draws
//! nothing: a blank icon is a valid result for them, not an error.
//!
//! # Dispatch
//!
//! A [`DrawerTable`] is built once from `(key, design)` assignments and is
//! checked against the registry at construction: every key needs exactly
//! one design and every assignment must name a known key. Lookups after that
//! cannot miss.

pub mod circles;
pub mod strokes;

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::category::CategoryRegistry;
use crate::error::ConfigurationError;
use crate::surface::Surface;
use crate::transform::TransformContext;

/// Signature shared by every drawing routine.
pub type DrawFn = fn(&mut Surface, &TransformContext, &mut dyn RngCore);

// ============================================================================
// SymbolDesign
// ============================================================================

/// The available drawing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolDesign {
    /// Ring with a solid center dot.
    ConcentricCircles,
    /// Two crossing diagonal strokes.
    CrossedDiagonals,
    /// Ring around a plus made of horizontal and vertical bars.
    BarredCircle,
    /// Ring with four T-shaped strokes at right angles.
    TJunctionCircle,
    /// Pentagon outline with a cross inside.
    CrossedPentagon,
    /// Four L-shapes in 90° rotational symmetry.
    FourfoldL,
    /// Ring with eight radial spokes.
    SpokedCircle,
    /// Rectangle with a stepped, crenellated top edge.
    SteppedOutline,
    /// No design yet; the icon is left blank.
    Blank,
}

impl SymbolDesign {
    pub const ALL: [SymbolDesign; 9] = [
        Self::ConcentricCircles,
        Self::CrossedDiagonals,
        Self::BarredCircle,
        Self::TJunctionCircle,
        Self::CrossedPentagon,
        Self::FourfoldL,
        Self::SpokedCircle,
        Self::SteppedOutline,
        Self::Blank,
    ];

    /// The routine implementing this design.
    pub fn routine(self) -> DrawFn {
        match self {
            Self::ConcentricCircles => circles::concentric_circles,
            Self::CrossedDiagonals => strokes::crossed_diagonals,
            Self::BarredCircle => circles::barred_circle,
            Self::TJunctionCircle => circles::t_junction_circle,
            Self::CrossedPentagon => strokes::crossed_pentagon,
            Self::FourfoldL => strokes::fourfold_l,
            Self::SpokedCircle => circles::spoked_circle,
            Self::SteppedOutline => strokes::stepped_outline,
            Self::Blank => blank,
        }
    }

    /// Draws one variant of this design around the frame origin.
    pub fn draw(self, surface: &mut Surface, ctx: &TransformContext, rng: &mut dyn RngCore) {
        (self.routine())(surface, ctx, rng);
    }

    /// True for categories that render as blank placeholders.
    pub fn is_placeholder(self) -> bool {
        self == Self::Blank
    }
}

fn blank(_: &mut Surface, _: &TransformContext, _: &mut dyn RngCore) {}

/// Uniform sample from `[lo, hi)`.
pub(crate) fn uniform(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    rng.gen_range(lo..hi)
}

// ============================================================================
// DrawerTable
// ============================================================================

/// Design assignments of the built-in catalog.
pub const BUILTIN_DESIGNS: &[(&str, SymbolDesign)] = &[
    ("town", SymbolDesign::ConcentricCircles),
    ("crossroads", SymbolDesign::CrossedDiagonals),
    ("hospital", SymbolDesign::BarredCircle),
    ("fort", SymbolDesign::TJunctionCircle),
    ("chapel", SymbolDesign::CrossedPentagon),
    ("windmill", SymbolDesign::FourfoldL),
    ("lighthouse", SymbolDesign::SpokedCircle),
    ("castle", SymbolDesign::SteppedOutline),
    ("mine", SymbolDesign::Blank),
    ("ruins", SymbolDesign::Blank),
    ("cave", SymbolDesign::Blank),
    ("well", SymbolDesign::Blank),
];

/// Category id → design, validated against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerTable {
    designs: Vec<SymbolDesign>,
}

impl DrawerTable {
    /// Builds the table, requiring exactly one design per registry key.
    pub fn build(
        registry: &CategoryRegistry,
        assignments: &[(&str, SymbolDesign)],
    ) -> Result<Self, ConfigurationError> {
        let mut slots: Vec<Option<SymbolDesign>> = vec![None; registry.len()];

        for &(key, design) in assignments {
            let category = registry
                .by_key(key)
                .ok_or_else(|| ConfigurationError::UnknownDrawerKey(key.to_string()))?;
            let slot = &mut slots[category.id];
            if slot.is_some() {
                return Err(ConfigurationError::DuplicateDrawer(key.to_string()));
            }
            *slot = Some(design);
        }

        let designs = registry
            .iter()
            .zip(slots)
            .map(|(category, slot)| {
                slot.ok_or_else(|| ConfigurationError::MissingDrawer(category.key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { designs })
    }

    /// Builds the table for `registry` from [`BUILTIN_DESIGNS`].
    pub fn builtin(registry: &CategoryRegistry) -> Result<Self, ConfigurationError> {
        Self::build(registry, BUILTIN_DESIGNS)
    }

    pub fn get(&self, id: usize) -> Option<SymbolDesign> {
        self.designs.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    /// Ids of categories that render blank.
    pub fn placeholders(&self) -> impl Iterator<Item = usize> + '_ {
        self.designs
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_placeholder())
            .map(|(id, _)| id)
    }
}
