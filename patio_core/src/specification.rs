//! # Patio Specification
//!
//! The `Specification` is the single record of design intent: overall patio
//! size, decking, joists, beams, posts, prices and display preferences.
//! Everything else (pieces, groups, violations, prices) is regenerated from
//! it.
//!
//! ## Cascading changes
//!
//! Every change is applied either raw ([`Cascade::RawOnly`]) or together
//! with the fields that geometrically depend on it
//! ([`Cascade::Dependents`]). Which fields depend on which is declared in
//! one place, [`Change::dependents`]; each dependent is recomputed from the
//! *current* values of the other fields, in the listed order.
//!
//! Changes are applied one after another, so the same logical edit made in
//! a different order can leave different values behind. For example
//! changing the post size recomputes the patio width from the post spacing
//! but leaves the beam length alone, while changing the post spacing
//! carries the new width through to the beams and decking.
//!
//! ```rust
//! use patio_core::specification::{Cascade, Change, Specification};
//!
//! let mut spec = Specification::default();
//! spec.update(&[
//!     (Change::PatioWidth(200.5), Cascade::Dependents),
//!     (Change::CoveringSpacing(0.25), Cascade::RawOnly),
//! ])
//! .unwrap();
//!
//! assert_eq!(spec.beam_ply().depth, 200.5);
//! assert_eq!(spec.post_spacing(), (200.5 - 3.5) / 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::components::{RoleStyle, Rgb, StructuralRole};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::Dimension;
use crate::materials::{PriceTable, SizeConvention};

/// Tolerance added at exact floor/ceil boundaries (beam and joist counts).
pub const EPSILON: f64 = 1e-4;

// ============================================================================
// Display Settings
// ============================================================================

/// Per-role display attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStyles {
    pub post: RoleStyle,
    pub beam: RoleStyle,
    pub joist: RoleStyle,
    pub covering: RoleStyle,
}

impl RoleStyles {
    pub fn get(&self, role: StructuralRole) -> RoleStyle {
        match role {
            StructuralRole::Post => self.post,
            StructuralRole::Beam => self.beam,
            StructuralRole::Joist => self.joist,
            StructuralRole::Covering => self.covering,
        }
    }

    pub fn get_mut(&mut self, role: StructuralRole) -> &mut RoleStyle {
        match role {
            StructuralRole::Post => &mut self.post,
            StructuralRole::Beam => &mut self.beam,
            StructuralRole::Joist => &mut self.joist,
            StructuralRole::Covering => &mut self.covering,
        }
    }
}

impl Default for RoleStyles {
    fn default() -> Self {
        RoleStyles {
            post: RoleStyle::new(Rgb::new(139, 90, 43)),
            beam: RoleStyle::new(Rgb::new(160, 110, 60)),
            joist: RoleStyle::new(Rgb::new(196, 150, 90)),
            covering: RoleStyle::new(Rgb::new(222, 184, 135)),
        }
    }
}

/// Formatting preferences shared with the renderers and exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// How catalog sizes are labelled
    pub size_convention: SizeConvention,
    /// Draw the outlines of hidden pieces
    pub show_hidden_borders: bool,
}

// ============================================================================
// Changes
// ============================================================================

/// Whether a change also recomputes the fields that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cascade {
    RawOnly,
    Dependents,
}

/// A new value for one specification field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Change {
    PatioWidth(f64),
    PatioHeight(f64),
    PatioDepth(f64),
    CoveringDimensions(Dimension),
    CoveringSpacing(f64),
    JoistDimensions(Dimension),
    JoistSpacing(f64),
    JoistSpanMaxLength(f64),
    CantileverLength(f64),
    BeamPlyDimensions(Dimension),
    PliesPerBeam(u32),
    MaxPliesPerBeam(u32),
    PostDimensions(Dimension),
    PostSpacing(f64),
    PostsPerBeam(u32),
}

/// A field recomputed from the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Derived {
    /// beam length = patio width
    BeamLengthFromPatioWidth,
    /// plank length = patio width
    CoveringLengthFromPatioWidth,
    /// post spacing = (patio width - post width) / (posts per beam - 1)
    PostSpacingFromPatioWidth,
    /// post spacing = (beam length - post width) / (posts per beam - 1)
    PostSpacingFromBeamLength,
    /// patio width = post spacing × (posts per beam - 1) + post width
    PatioWidthFromPosts,
    /// patio width = beam length
    PatioWidthFromBeam,
    /// patio height = post + beam + joist + decking heights
    PatioHeightFromStack,
    /// post length = patio height - beam, joist and decking heights
    PostLengthFromPatioHeight,
    /// joist length = balanced span + beam ply height
    JoistLengthFromPatioDepth,
}

impl Change {
    /// Name of the field this change sets
    pub fn field(&self) -> &'static str {
        match self {
            Change::PatioWidth(_) => "patio_width",
            Change::PatioHeight(_) => "patio_height",
            Change::PatioDepth(_) => "patio_depth",
            Change::CoveringDimensions(_) => "covering_dimensions",
            Change::CoveringSpacing(_) => "covering_spacing",
            Change::JoistDimensions(_) => "joist_dimensions",
            Change::JoistSpacing(_) => "joist_spacing",
            Change::JoistSpanMaxLength(_) => "joist_span_max_length",
            Change::CantileverLength(_) => "cantilever_length",
            Change::BeamPlyDimensions(_) => "beam_ply_dimensions",
            Change::PliesPerBeam(_) => "plies_per_beam",
            Change::MaxPliesPerBeam(_) => "max_plies_per_beam",
            Change::PostDimensions(_) => "post_dimensions",
            Change::PostSpacing(_) => "post_spacing",
            Change::PostsPerBeam(_) => "posts_per_beam",
        }
    }

    /// Fields recomputed, in order, when this change cascades.
    pub fn dependents(&self) -> &'static [Derived] {
        use Derived::*;
        match self {
            Change::PatioWidth(_) => &[
                BeamLengthFromPatioWidth,
                CoveringLengthFromPatioWidth,
                PostSpacingFromPatioWidth,
            ],
            Change::PatioHeight(_) => &[PostLengthFromPatioHeight],
            Change::PatioDepth(_) => &[JoistLengthFromPatioDepth],
            Change::CoveringDimensions(_) => &[PostLengthFromPatioHeight],
            Change::CoveringSpacing(_) => &[],
            Change::JoistDimensions(_) => &[PostLengthFromPatioHeight],
            Change::JoistSpacing(_) => &[],
            Change::JoistSpanMaxLength(_) => &[JoistLengthFromPatioDepth],
            Change::CantileverLength(_) => &[JoistLengthFromPatioDepth],
            Change::BeamPlyDimensions(_) => &[
                PostSpacingFromBeamLength,
                PatioWidthFromBeam,
                CoveringLengthFromPatioWidth,
            ],
            Change::PliesPerBeam(_) => &[],
            Change::MaxPliesPerBeam(_) => &[],
            Change::PostDimensions(_) => &[PatioWidthFromPosts, PatioHeightFromStack],
            Change::PostSpacing(_) => &[
                PatioWidthFromPosts,
                BeamLengthFromPatioWidth,
                CoveringLengthFromPatioWidth,
            ],
            Change::PostsPerBeam(_) => &[PostSpacingFromPatioWidth],
        }
    }
}

// ============================================================================
// Specification
// ============================================================================

/// The parametric source of truth for one patio.
///
/// Dimensions are in inches, in each role's own (width, height, depth)
/// terms; see [`crate::components`] for how they map to world axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSpecification")]
pub struct Specification {
    /// width along the house, height to the top of the decking, depth away from the house
    patio: Dimension,
    /// one plank: face width, thickness, length
    covering: Dimension,
    covering_spacing: f64,
    /// one joist: face, thickness, length
    joist: Dimension,
    joist_spacing: f64,
    joist_span_max_length: f64,
    cantilever_length: f64,
    /// one beam ply: thickness, face, length
    beam_ply: Dimension,
    plies_per_beam: u32,
    max_plies_per_beam: u32,
    /// one post: width, height, length
    post: Dimension,
    post_spacing: f64,
    posts_per_beam: u32,
    prices: PriceTable,
    styles: RoleStyles,
    display: DisplaySettings,
}

impl Default for Specification {
    fn default() -> Self {
        Specification::factory_default()
    }
}

/// Field-for-field mirror of [`Specification`] as read from JSON, before
/// the setters' checks have run.
#[derive(Deserialize)]
struct UncheckedSpecification {
    patio: Dimension,
    covering: Dimension,
    covering_spacing: f64,
    joist: Dimension,
    joist_spacing: f64,
    joist_span_max_length: f64,
    cantilever_length: f64,
    beam_ply: Dimension,
    plies_per_beam: u32,
    max_plies_per_beam: u32,
    post: Dimension,
    post_spacing: f64,
    posts_per_beam: u32,
    prices: PriceTable,
    styles: RoleStyles,
    display: DisplaySettings,
}

impl TryFrom<UncheckedSpecification> for Specification {
    type Error = CalcError;

    fn try_from(raw: UncheckedSpecification) -> CalcResult<Self> {
        let spec = Specification {
            patio: raw.patio,
            covering: raw.covering,
            covering_spacing: raw.covering_spacing,
            joist: raw.joist,
            joist_spacing: raw.joist_spacing,
            joist_span_max_length: raw.joist_span_max_length,
            cantilever_length: raw.cantilever_length,
            beam_ply: raw.beam_ply,
            plies_per_beam: raw.plies_per_beam,
            max_plies_per_beam: raw.max_plies_per_beam,
            post: raw.post,
            post_spacing: raw.post_spacing,
            posts_per_beam: raw.posts_per_beam,
            prices: raw.prices,
            styles: raw.styles,
            display: raw.display,
        };
        spec.check()?;
        Ok(spec)
    }
}

impl Specification {
    /// Every dimension zero, one ply, one post per beam, no prices.
    pub fn zeroed() -> Self {
        Specification {
            patio: Dimension::default(),
            covering: Dimension::default(),
            covering_spacing: 0.0,
            joist: Dimension::default(),
            joist_spacing: 0.0,
            joist_span_max_length: 0.0,
            cantilever_length: 0.0,
            beam_ply: Dimension::default(),
            plies_per_beam: 1,
            max_plies_per_beam: 1,
            post: Dimension::default(),
            post_spacing: 0.0,
            posts_per_beam: 1,
            prices: PriceTable::empty(),
            styles: RoleStyles::default(),
            display: DisplaySettings::default(),
        }
    }

    /// A 188.5" × 225" patio that passes every code check: 5/4x6 decking,
    /// 2x8 joists at 16" with an 8" cantilever, 2-2x10 beams on three 4x4
    /// posts each.
    pub fn factory_default() -> Self {
        let mut spec = Specification::zeroed();
        spec.patio = Dimension::new(188.5, 70.5, 225.0);
        spec.covering = Dimension::new(5.5, 1.0, 188.5);
        spec.covering_spacing = 0.5;
        spec.joist_spacing = 16.0;
        spec.joist_span_max_length = 75.0;
        spec.cantilever_length = 8.0;
        spec.beam_ply = Dimension::new(1.5, 9.25, 188.5);
        spec.plies_per_beam = 2;
        spec.max_plies_per_beam = 3;
        spec.posts_per_beam = 3;
        spec.post_spacing = 92.5;
        spec.prices = PriceTable::default();

        let span = spec.balanced_joist_span().unwrap_or(spec.joist_span_max_length);
        spec.joist = Dimension::new(7.25, 1.5, span + spec.beam_ply.height);
        let post_length = spec.patio.height - spec.height_excluding(Some(StructuralRole::Post));
        spec.post = Dimension::new(3.5, 3.5, post_length);
        spec
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    pub fn patio(&self) -> Dimension {
        self.patio
    }

    pub fn covering(&self) -> Dimension {
        self.covering
    }

    pub fn covering_spacing(&self) -> f64 {
        self.covering_spacing
    }

    pub fn joist(&self) -> Dimension {
        self.joist
    }

    pub fn joist_spacing(&self) -> f64 {
        self.joist_spacing
    }

    pub fn joist_span_max_length(&self) -> f64 {
        self.joist_span_max_length
    }

    pub fn cantilever_length(&self) -> f64 {
        self.cantilever_length
    }

    pub fn beam_ply(&self) -> Dimension {
        self.beam_ply
    }

    pub fn plies_per_beam(&self) -> u32 {
        self.plies_per_beam
    }

    pub fn max_plies_per_beam(&self) -> u32 {
        self.max_plies_per_beam
    }

    pub fn post(&self) -> Dimension {
        self.post
    }

    pub fn post_spacing(&self) -> f64 {
        self.post_spacing
    }

    pub fn posts_per_beam(&self) -> u32 {
        self.posts_per_beam
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn styles(&self) -> &RoleStyles {
        &self.styles
    }

    pub fn display(&self) -> DisplaySettings {
        self.display
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    /// Every field as the raw change that would set it
    fn as_changes(&self) -> [Change; 15] {
        [
            Change::PatioWidth(self.patio.width),
            Change::PatioHeight(self.patio.height),
            Change::PatioDepth(self.patio.depth),
            Change::CoveringDimensions(self.covering),
            Change::CoveringSpacing(self.covering_spacing),
            Change::JoistDimensions(self.joist),
            Change::JoistSpacing(self.joist_spacing),
            Change::JoistSpanMaxLength(self.joist_span_max_length),
            Change::CantileverLength(self.cantilever_length),
            Change::BeamPlyDimensions(self.beam_ply),
            Change::PliesPerBeam(self.plies_per_beam),
            Change::MaxPliesPerBeam(self.max_plies_per_beam),
            Change::PostDimensions(self.post),
            Change::PostSpacing(self.post_spacing),
            Change::PostsPerBeam(self.posts_per_beam),
        ]
    }

    /// Run every setter's check against the current values.
    ///
    /// Deserialization calls this, so a loaded specification holds the
    /// same invariants as one built through the setters.
    pub fn check(&self) -> CalcResult<()> {
        let mut scratch = self.clone();
        for change in self.as_changes() {
            scratch.set_raw(change)?;
        }
        let mut prices = PriceTable::empty();
        for (label, price) in self.prices.iter() {
            prices.set_price(label, price)?;
        }
        Ok(())
    }

    /// Apply a batch of changes in order.
    ///
    /// The batch is all-or-nothing: if any change or recomputation fails,
    /// the specification is left as it was.
    pub fn update(&mut self, changes: &[(Change, Cascade)]) -> CalcResult<()> {
        let mut next = self.clone();
        for (change, cascade) in changes {
            next.apply(*change, *cascade)?;
        }
        *self = next;
        Ok(())
    }

    fn apply(&mut self, change: Change, cascade: Cascade) -> CalcResult<()> {
        self.set_raw(change)?;
        if cascade == Cascade::Dependents {
            for derived in change.dependents() {
                self.recompute(*derived)?;
            }
        }
        Ok(())
    }

    fn set_raw(&mut self, change: Change) -> CalcResult<()> {
        let field = change.field();
        match change {
            Change::PatioWidth(v) => self.patio.width = check_length(field, v)?,
            Change::PatioHeight(v) => self.patio.height = check_length(field, v)?,
            Change::PatioDepth(v) => self.patio.depth = check_length(field, v)?,
            Change::CoveringDimensions(d) => self.covering = check_dimension(field, d)?,
            Change::CoveringSpacing(v) => self.covering_spacing = check_length(field, v)?,
            Change::JoistDimensions(d) => self.joist = check_dimension(field, d)?,
            Change::JoistSpacing(v) => self.joist_spacing = check_length(field, v)?,
            Change::JoistSpanMaxLength(v) => self.joist_span_max_length = check_length(field, v)?,
            Change::CantileverLength(v) => self.cantilever_length = check_length(field, v)?,
            Change::BeamPlyDimensions(d) => self.beam_ply = check_dimension(field, d)?,
            Change::PliesPerBeam(n) => self.plies_per_beam = check_count(field, n)?,
            Change::MaxPliesPerBeam(n) => self.max_plies_per_beam = check_count(field, n)?,
            Change::PostDimensions(d) => self.post = check_dimension(field, d)?,
            Change::PostSpacing(v) => self.post_spacing = check_length(field, v)?,
            Change::PostsPerBeam(n) => self.posts_per_beam = check_count(field, n)?,
        }
        Ok(())
    }

    /// Recompute one derived field from the current values of the others.
    pub fn recompute(&mut self, derived: Derived) -> CalcResult<()> {
        match derived {
            Derived::BeamLengthFromPatioWidth => self.beam_ply.depth = self.patio.width,
            Derived::CoveringLengthFromPatioWidth => self.covering.depth = self.patio.width,
            Derived::PostSpacingFromPatioWidth => self.post_spacing = self.post_spacing_for(self.patio.width)?,
            Derived::PostSpacingFromBeamLength => self.post_spacing = self.post_spacing_for(self.beam_ply.depth)?,
            Derived::PatioWidthFromPosts => {
                self.patio.width = self.post_spacing * self.posts_per_beam.saturating_sub(1) as f64 + self.post.width
            }
            Derived::PatioWidthFromBeam => self.patio.width = self.beam_ply.depth,
            Derived::PatioHeightFromStack => self.patio.height = self.height_excluding(None),
            Derived::PostLengthFromPatioHeight => {
                let length = self.patio.height - self.height_excluding(Some(StructuralRole::Post));
                self.post.depth = check_length("post_length", length)?;
            }
            Derived::JoistLengthFromPatioDepth => {
                self.joist.depth = self.balanced_joist_span()? + self.beam_ply.height;
            }
        }
        Ok(())
    }

    pub fn set_patio_width(&mut self, width: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PatioWidth(width), cascade)])
    }

    pub fn set_patio_height(&mut self, height: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PatioHeight(height), cascade)])
    }

    pub fn set_patio_depth(&mut self, depth: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PatioDepth(depth), cascade)])
    }

    pub fn set_covering_dimensions(&mut self, dimensions: Dimension, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::CoveringDimensions(dimensions), cascade)])
    }

    pub fn set_covering_spacing(&mut self, spacing: f64) -> CalcResult<()> {
        self.update(&[(Change::CoveringSpacing(spacing), Cascade::RawOnly)])
    }

    pub fn set_joist_dimensions(&mut self, dimensions: Dimension, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::JoistDimensions(dimensions), cascade)])
    }

    pub fn set_joist_spacing(&mut self, spacing: f64) -> CalcResult<()> {
        self.update(&[(Change::JoistSpacing(spacing), Cascade::RawOnly)])
    }

    pub fn set_joist_span_max_length(&mut self, length: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::JoistSpanMaxLength(length), cascade)])
    }

    pub fn set_cantilever_length(&mut self, length: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::CantileverLength(length), cascade)])
    }

    pub fn set_beam_ply_dimensions(&mut self, dimensions: Dimension, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::BeamPlyDimensions(dimensions), cascade)])
    }

    pub fn set_plies_per_beam(&mut self, plies: u32) -> CalcResult<()> {
        self.update(&[(Change::PliesPerBeam(plies), Cascade::RawOnly)])
    }

    pub fn set_max_plies_per_beam(&mut self, plies: u32) -> CalcResult<()> {
        self.update(&[(Change::MaxPliesPerBeam(plies), Cascade::RawOnly)])
    }

    pub fn set_post_dimensions(&mut self, dimensions: Dimension, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PostDimensions(dimensions), cascade)])
    }

    pub fn set_post_spacing(&mut self, spacing: f64, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PostSpacing(spacing), cascade)])
    }

    pub fn set_posts_per_beam(&mut self, posts: u32, cascade: Cascade) -> CalcResult<()> {
        self.update(&[(Change::PostsPerBeam(posts), cascade)])
    }

    pub fn set_price(&mut self, label: impl Into<String>, price_per_foot: f64) -> CalcResult<()> {
        self.prices.set_price(label, price_per_foot)
    }

    pub fn set_color(&mut self, role: StructuralRole, color: Rgb) {
        self.styles.get_mut(role).color = color;
    }

    pub fn set_filled(&mut self, role: StructuralRole, filled: bool) {
        self.styles.get_mut(role).filled = filled;
    }

    pub fn set_visible(&mut self, role: StructuralRole, visible: bool) {
        self.styles.get_mut(role).visible = visible;
    }

    pub fn set_display(&mut self, display: DisplaySettings) {
        self.display = display;
    }

    // ------------------------------------------------------------------
    // Derived quantities
    // ------------------------------------------------------------------

    /// Joists in one span: `1 + floor((beam length - 2 × joist thickness) / spacing)`,
    /// with [`EPSILON`] added to the room so an exact multiple keeps its
    /// last joist.
    pub fn joist_amount_per_span(&self) -> CalcResult<u32> {
        if self.joist_spacing <= 0.0 {
            return Err(CalcError::invalid_input(
                "joist_spacing",
                self.joist_spacing.to_string(),
                "Joist spacing must be positive",
            ));
        }
        let room = self.beam_ply.depth - 2.0 * self.joist.height;
        if room < 0.0 {
            return Err(CalcError::invalid_input(
                "beam_ply_dimensions",
                self.beam_ply.depth.to_string(),
                "Beam is shorter than two joist thicknesses",
            ));
        }
        Ok(1 + ((room + EPSILON) / self.joist_spacing).floor() as u32)
    }

    /// Distance between beams: `max(beam ply height, joist length - beam ply height)`
    pub fn joist_span(&self) -> f64 {
        self.beam_ply.height.max(self.joist.depth - self.beam_ply.height)
    }

    /// Number of beams, the house beam included:
    /// `1 + floor((patio depth - cantilever + ε) / joist span)`
    pub fn beam_amount(&self) -> CalcResult<u32> {
        let span = self.joist_span();
        if span <= 0.0 {
            return Err(CalcError::invalid_input(
                "joist_dimensions",
                span.to_string(),
                "Joist span must be positive",
            ));
        }
        let available = self.patio.depth - self.cantilever_length;
        if available < 0.0 {
            return Err(CalcError::invalid_input(
                "cantilever_length",
                self.cantilever_length.to_string(),
                "Cantilever is longer than the patio depth",
            ));
        }
        Ok(1 + ((available + EPSILON) / span).floor() as u32)
    }

    /// Number of spans: `max(1, beam amount - 1)`
    pub fn span_amount(&self) -> CalcResult<u32> {
        Ok(self.beam_amount()?.saturating_sub(1).max(1))
    }

    /// Stacked height of post, beam, joist and decking, leaving out `excluded`.
    pub fn height_excluding(&self, excluded: Option<StructuralRole>) -> f64 {
        StructuralRole::ALL
            .iter()
            .filter(|role| Some(**role) != excluded)
            .map(|role| match role {
                StructuralRole::Post => self.post.depth,
                StructuralRole::Beam => self.beam_ply.height,
                StructuralRole::Joist => self.joist.width,
                StructuralRole::Covering => self.covering.height,
            })
            .sum()
    }

    /// Largest equal span not exceeding the maximum that divides
    /// `patio depth - cantilever` exactly.
    pub fn balanced_joist_span(&self) -> CalcResult<f64> {
        if self.joist_span_max_length <= 0.0 {
            return Err(CalcError::invalid_input(
                "joist_span_max_length",
                self.joist_span_max_length.to_string(),
                "Maximum joist span must be positive",
            ));
        }
        let available = self.patio.depth - self.cantilever_length;
        if available <= 0.0 {
            return Err(CalcError::invalid_input(
                "cantilever_length",
                self.cantilever_length.to_string(),
                "Nothing left to span once the cantilever is taken off the patio depth",
            ));
        }
        let spans = ((available - EPSILON) / self.joist_span_max_length).ceil().max(1.0);
        Ok(available / spans)
    }

    /// Post spacing that spreads the posts over `length`.
    pub fn post_spacing_for(&self, length: f64) -> CalcResult<f64> {
        if self.posts_per_beam < 2 {
            return Err(CalcError::invalid_input(
                "posts_per_beam",
                self.posts_per_beam.to_string(),
                "At least two posts per beam are needed to derive a spacing",
            ));
        }
        let spacing = (length - self.post.width) / (self.posts_per_beam - 1) as f64;
        check_length("post_spacing", spacing)
    }
}

fn check_length(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a non-negative length"));
    }
    Ok(value)
}

fn check_dimension(field: &str, value: Dimension) -> CalcResult<Dimension> {
    if value.is_not_valid() || !(value.width.is_finite() && value.height.is_finite() && value.depth.is_finite()) {
        return Err(CalcError::invalid_input(field, format!("{:?}", value), "Dimensions cannot be negative"));
    }
    Ok(value)
}

fn check_count(field: &str, value: u32) -> CalcResult<u32> {
    if value == 0 {
        return Err(CalcError::invalid_input(field, "0", "Must be at least 1"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_factory_default_values() {
        let spec = Specification::default();
        assert_eq!(spec.patio(), Dimension::new(188.5, 70.5, 225.0));
        assert_eq!(spec.cantilever_length(), 8.0);
        assert_eq!(spec.covering_spacing(), 0.5);
        assert_eq!(spec.joist_span_max_length(), 75.0);
        assert_eq!(spec.plies_per_beam(), 2);
        assert_eq!(spec.posts_per_beam(), 3);
        assert_eq!(spec.post().depth, 53.0);
        assert!((spec.height_excluding(None) - 70.5).abs() < 1e-9);
    }

    #[test]
    fn test_factory_default_derived_quantities() {
        let spec = Specification::default();
        assert!((spec.joist_span() - 217.0 / 3.0).abs() < 1e-9);
        let expected = 1 + ((225.0 - 8.0 + EPSILON) / spec.joist_span()).floor() as u32;
        assert_eq!(spec.beam_amount().unwrap(), expected);
        assert_eq!(spec.beam_amount().unwrap(), 4);
        assert_eq!(spec.span_amount().unwrap(), 3);
        assert_eq!(spec.joist_amount_per_span().unwrap(), 12);
    }

    #[test]
    fn test_zeroed_spec() {
        let spec = Specification::zeroed();
        assert_eq!(spec.patio(), Dimension::default());
        assert!(spec.beam_amount().is_err());
        assert!(spec.joist_amount_per_span().is_err());
    }

    #[test]
    fn test_raw_change_touches_one_field() {
        let mut spec = Specification::default();
        spec.set_patio_width(200.0, Cascade::RawOnly).unwrap();
        assert_eq!(spec.patio().width, 200.0);
        assert_eq!(spec.beam_ply().depth, 188.5);
        assert_eq!(spec.post_spacing(), 92.5);
    }

    #[test]
    fn test_patio_width_cascade() {
        let mut spec = Specification::default();
        spec.set_patio_width(200.5, Cascade::Dependents).unwrap();
        assert_eq!(spec.beam_ply().depth, 200.5);
        assert_eq!(spec.covering().depth, 200.5);
        assert_eq!(spec.post_spacing(), 98.5);
    }

    #[test]
    fn test_patio_height_cascade_solves_post_length() {
        let mut spec = Specification::default();
        spec.set_patio_height(80.0, Cascade::Dependents).unwrap();
        assert_eq!(spec.post().depth, 62.5);
        assert!(spec.set_patio_height(10.0, Cascade::Dependents).is_err());
        assert_eq!(spec.patio().height, 80.0);
    }

    #[test]
    fn test_patio_depth_cascade_rebalances_joists() {
        let mut spec = Specification::default();
        spec.set_patio_depth(158.0, Cascade::Dependents).unwrap();
        // 150" to span with at most 75" per span: two spans of 75".
        assert!((spec.joist_span() - 75.0).abs() < 1e-9);
        assert_eq!(spec.beam_amount().unwrap(), 3);
    }

    #[test]
    fn test_post_dimensions_cascade() {
        let mut spec = Specification::default();
        spec.set_post_dimensions(Dimension::new(5.5, 5.5, 60.0), Cascade::Dependents)
            .unwrap();
        assert_eq!(spec.patio().width, 92.5 * 2.0 + 5.5);
        assert!((spec.patio().height - 77.5).abs() < 1e-9);
        // The beams are not stretched to the new width.
        assert_eq!(spec.beam_ply().depth, 188.5);
    }

    #[test]
    fn test_beam_cascade() {
        let mut spec = Specification::default();
        spec.set_beam_ply_dimensions(Dimension::new(1.5, 11.25, 200.0), Cascade::Dependents)
            .unwrap();
        assert_eq!(spec.post_spacing(), (200.0 - 3.5) / 2.0);
        assert_eq!(spec.patio().width, 200.0);
        assert_eq!(spec.covering().depth, 200.0);
    }

    #[test]
    fn test_cascade_order_matters() {
        let post = Dimension::new(5.5, 5.5, 53.0);

        let mut a = Specification::default();
        a.update(&[
            (Change::PostDimensions(post), Cascade::Dependents),
            (Change::PostSpacing(90.0), Cascade::Dependents),
        ])
        .unwrap();

        let mut b = Specification::default();
        b.update(&[
            (Change::PostSpacing(90.0), Cascade::Dependents),
            (Change::PostDimensions(post), Cascade::Dependents),
        ])
        .unwrap();

        assert_eq!(a.patio().width, b.patio().width);
        assert_eq!(a.beam_ply().depth, 185.5);
        assert_eq!(b.beam_ply().depth, 183.5);
    }

    #[test]
    fn test_posts_per_beam_cascade() {
        let mut spec = Specification::default();
        spec.set_posts_per_beam(5, Cascade::Dependents).unwrap();
        assert_eq!(spec.post_spacing(), (188.5 - 3.5) / 4.0);
        assert!(spec.set_posts_per_beam(1, Cascade::Dependents).is_err());
        assert_eq!(spec.posts_per_beam(), 5);
        spec.set_posts_per_beam(1, Cascade::RawOnly).unwrap();
        assert_eq!(spec.posts_per_beam(), 1);
    }

    #[test]
    fn test_cantilever_cascade() {
        let mut spec = Specification::default();
        spec.set_cantilever_length(24.0, Cascade::Dependents).unwrap();
        assert!((spec.joist_span() - 201.0 / 3.0).abs() < 1e-9);
        assert!(spec.set_cantilever_length(300.0, Cascade::Dependents).is_err());
    }

    #[test]
    fn test_invalid_values_rejected_atomically() {
        let mut spec = Specification::default();
        let before = spec.clone();
        let result = spec.update(&[
            (Change::PatioDepth(300.0), Cascade::RawOnly),
            (Change::JoistSpacing(-1.0), Cascade::RawOnly),
        ]);
        assert!(result.is_err());
        assert_eq!(spec, before);
        assert!(spec.set_plies_per_beam(0).is_err());
        assert!(spec.set_covering_dimensions(Dimension::new(-5.5, 1.0, 1.0), Cascade::RawOnly).is_err());
    }

    #[test]
    fn test_height_excluding_each_role() {
        let spec = Specification::default();
        let total = spec.height_excluding(None);
        assert_eq!(total - spec.height_excluding(Some(StructuralRole::Beam)), 9.25);
        assert_eq!(total - spec.height_excluding(Some(StructuralRole::Joist)), 7.25);
        assert_eq!(total - spec.height_excluding(Some(StructuralRole::Covering)), 1.0);
        assert_eq!(total - spec.height_excluding(Some(StructuralRole::Post)), 53.0);
        assert_eq!(spec.height_excluding(Some(StructuralRole::Post)), 17.5);
        assert_eq!(spec.patio().height - spec.height_excluding(Some(StructuralRole::Post)), spec.post().depth);
    }

    #[test]
    fn test_joist_amount_at_exact_multiple() {
        let mut spec = Specification::default();
        // 163" beam less two 1.5" joists leaves exactly ten 16" bays
        spec.set_beam_ply_dimensions(spec.beam_ply().with_depth(163.0), Cascade::RawOnly)
            .unwrap();
        assert_eq!(spec.joist_amount_per_span().unwrap(), 11);
        spec.set_beam_ply_dimensions(spec.beam_ply().with_depth(162.9), Cascade::RawOnly)
            .unwrap();
        assert_eq!(spec.joist_amount_per_span().unwrap(), 10);
        assert_eq!(Specification::default().joist_amount_per_span().unwrap(), 12);
    }

    #[test]
    fn test_joist_amount_with_evenly_divided_spacing() {
        let mut spec = Specification::default();
        // Spacing that divides the room into 12 bays, as the cost search
        // sets it; rounding must not drop the last joist
        let room: f64 = 188.5 - 3.0;
        spec.set_joist_spacing(room / (room / 16.0).ceil()).unwrap();
        assert_eq!(spec.joist_amount_per_span().unwrap(), 13);
        spec.set_joist_spacing(room / 12.0 + 1e-3).unwrap();
        assert_eq!(spec.joist_amount_per_span().unwrap(), 12);
    }

    #[test]
    fn test_styles_and_prices() {
        let mut spec = Specification::default();
        spec.set_visible(StructuralRole::Covering, false);
        spec.set_color(StructuralRole::Post, Rgb::new(1, 2, 3));
        spec.set_price("2x8", 2.0).unwrap();
        assert!(!spec.styles().get(StructuralRole::Covering).visible);
        assert_eq!(spec.styles().post.color, Rgb::new(1, 2, 3));
        assert_eq!(spec.prices().price_per_foot("2x8"), Some(2.0));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Specification::default();
        let mut trial = original.clone();
        trial.set_patio_depth(400.0, Cascade::Dependents).unwrap();
        assert_eq!(original, Specification::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let spec = Specification::default();
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: Specification = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, parsed);
    }

    #[test]
    fn test_loading_runs_setter_checks() {
        let mut value = serde_json::to_value(Specification::default()).unwrap();
        value["posts_per_beam"] = serde_json::json!(0);
        let err = serde_json::from_value::<Specification>(value).unwrap_err();
        assert!(err.to_string().contains("posts_per_beam"), "{}", err);

        let mut value = serde_json::to_value(Specification::default()).unwrap();
        value["joist_spacing"] = serde_json::json!(-16.0);
        assert!(serde_json::from_value::<Specification>(value).is_err());

        let mut value = serde_json::to_value(Specification::default()).unwrap();
        value["post"]["width"] = serde_json::json!(-3.5);
        assert!(serde_json::from_value::<Specification>(value).is_err());
    }

    #[test]
    fn test_check_accepts_setter_built_specs() {
        assert!(Specification::default().check().is_ok());
        assert!(Specification::zeroed().check().is_ok());
        let mut spec = Specification::default();
        spec.set_patio_depth(300.0, Cascade::Dependents).unwrap();
        assert!(spec.check().is_ok());
    }

    proptest! {
        #[test]
        fn prop_beam_amount_monotonic_in_depth(
            depth in 20.0f64..600.0,
            extra in 0.0f64..100.0,
            cantilever in 0.0f64..20.0,
        ) {
            let mut shallow = Specification::default();
            shallow.update(&[
                (Change::CantileverLength(cantilever), Cascade::RawOnly),
                (Change::PatioDepth(depth), Cascade::RawOnly),
            ]).unwrap();
            let mut deep = shallow.clone();
            deep.set_patio_depth(depth + extra, Cascade::RawOnly).unwrap();
            prop_assert!(deep.beam_amount().unwrap() >= shallow.beam_amount().unwrap());
        }
    }
}
