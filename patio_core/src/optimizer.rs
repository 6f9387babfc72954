//! # Cost Optimizer
//!
//! Exhaustive search for the cheapest code-compliant patio with the same
//! overall width, height and depth.
//!
//! The search space is the product of five catalog dimensions. Each is a
//! lazy stage that takes one trial specification and yields its variations
//! along that dimension; the stages are chained with `flat_map`:
//!
//! ```text
//! joists → cantilevers → posts → beams → plies
//! ```
//!
//! | Stage        | Variations                                                   |
//! |--------------|--------------------------------------------------------------|
//! | `joists`     | every catalog joist                                          |
//! | `cantilevers`| the joist's maximum cantilever, then none                    |
//! | `posts`      | every catalog post; joists re-spaced for the decking         |
//! | `beams`      | every catalog ply meeting the primary or alternate beam entry|
//! | `plies`      | current ply count up to the configured maximum               |
//!
//! Every trial is an owned clone; the caller's specification is never
//! touched. A trial whose changes cannot be applied (a post that would need
//! a negative length, say) is dropped from the search.

use std::collections::BTreeSet;

use tracing::{info, trace, warn};

use crate::bill::BillOfMaterials;
use crate::code_tables::{self, BeamLookup};
use crate::components::StructuralRole;
use crate::errors::CalcResult;
use crate::geometry::Dimension;
use crate::materials::LumberSize;
use crate::patio::generate;
use crate::specification::{Cascade, Change, Specification};
use crate::validator::{governing_beam_lookup, validate, Violation};

/// A compliant configuration and its price.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub spec: Specification,
    pub price: f64,
}

/// Result of a full search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Cheapest compliant configuration, first found on ties
    pub best: Option<Trial>,
    /// Configurations generated
    pub trials: usize,
    /// Configurations with no violations
    pub compliant: usize,
}

fn apply(mut trial: Specification, changes: &[(Change, Cascade)], stage: &str) -> Option<Specification> {
    match trial.update(changes) {
        Ok(()) => Some(trial),
        Err(err) => {
            trace!(stage, %err, "dropping trial");
            None
        }
    }
}

fn catalog_size(role: StructuralRole, d: Dimension) -> Option<LumberSize> {
    let (thickness, face) = role.catalog_section(d);
    LumberSize::from_actual_dimensions(thickness, face)
}

// ============================================================================
// Stages
// ============================================================================

/// One trial per catalog joist.
pub fn joists(spec: Specification) -> impl Iterator<Item = Specification> {
    LumberSize::JOISTS.into_iter().filter_map(move |size| {
        let (thickness, face) = size.actual_dimensions();
        let joist = Dimension::new(face, thickness, spec.joist().depth);
        apply(spec.clone(), &[(Change::JoistDimensions(joist), Cascade::Dependents)], "joists")
    })
}

/// The joist's maximum cantilever, then no cantilever.
pub fn cantilevers(spec: Specification) -> impl Iterator<Item = Specification> {
    let max = catalog_size(StructuralRole::Joist, spec.joist())
        .and_then(|joist| code_tables::joist_max_cantilever(joist, spec.joist_spacing()))
        .unwrap_or(0.0);
    let options = if max > 0.0 { vec![max, 0.0] } else { vec![0.0] };
    options.into_iter().filter_map(move |length| {
        apply(spec.clone(), &[(Change::CantileverLength(length), Cascade::Dependents)], "cantilevers")
    })
}

/// One trial per catalog post, with the beams, decking and post length
/// re-derived and the joists spread evenly at no more than the decking's
/// maximum spacing.
pub fn posts(spec: Specification) -> impl Iterator<Item = Specification> {
    LumberSize::POSTS.into_iter().filter_map(move |size| {
        let (thickness, face) = size.actual_dimensions();
        let patio = spec.patio();
        let post = Dimension::new(thickness, face, spec.post().depth);
        let trial = apply(
            spec.clone(),
            &[
                (Change::PostDimensions(post), Cascade::RawOnly),
                (Change::PatioWidth(patio.width), Cascade::Dependents),
                (Change::PatioHeight(patio.height), Cascade::Dependents),
            ],
            "posts",
        )?;

        let max_spacing = catalog_size(StructuralRole::Covering, trial.covering())
            .and_then(code_tables::covering_max_joist_spacing);
        let room = trial.beam_ply().depth - 2.0 * trial.joist().height;
        match max_spacing {
            Some(max) if room > 0.0 => {
                let spacing = room / (room / max).ceil();
                apply(trial, &[(Change::JoistSpacing(spacing), Cascade::RawOnly)], "posts")
            }
            _ => Some(trial),
        }
    })
}

/// One trial per catalog ply that meets the governing beam entry, for the
/// primary entry and then the alternate. Each trial starts at the entry's
/// ply count.
pub fn beams(spec: Specification) -> impl Iterator<Item = Specification> {
    let branches: Vec<_> = match governing_beam_lookup(&spec) {
        Ok(BeamLookup::Found(requirement)) => requirement.branches().collect(),
        _ => Vec::new(),
    };

    branches.into_iter().flat_map(move |branch| {
        let spec = spec.clone();
        LumberSize::BEAM_PLIES
            .into_iter()
            .filter(move |ply| {
                let (thickness, face) = ply.nominal_dimensions();
                branch.section_fits(thickness, face)
            })
            .filter_map(move |ply| {
                let (thickness, face) = ply.actual_dimensions();
                let patio = spec.patio();
                let beam = Dimension::new(thickness, face, patio.width);
                apply(
                    spec.clone(),
                    &[
                        (Change::BeamPlyDimensions(beam), Cascade::Dependents),
                        (Change::PatioHeight(patio.height), Cascade::Dependents),
                        (Change::CantileverLength(spec.cantilever_length()), Cascade::Dependents),
                        (Change::PliesPerBeam(branch.plies), Cascade::RawOnly),
                    ],
                    "beams",
                )
            })
    })
}

/// Ply counts from the current one up to the configured maximum.
pub fn plies(spec: Specification) -> impl Iterator<Item = Specification> {
    (spec.plies_per_beam()..=spec.max_plies_per_beam())
        .filter_map(move |count| apply(spec.clone(), &[(Change::PliesPerBeam(count), Cascade::RawOnly)], "plies"))
}

/// Every configuration the search visits, in search order.
pub fn trials(spec: &Specification) -> impl Iterator<Item = Specification> {
    joists(spec.clone())
        .flat_map(cantilevers)
        .flat_map(posts)
        .flat_map(beams)
        .flat_map(plies)
}

// ============================================================================
// Search
// ============================================================================

/// Generate, validate and price one configuration.
pub fn evaluate(spec: &Specification) -> CalcResult<(BTreeSet<Violation>, BillOfMaterials)> {
    let components = generate(spec)?;
    let violations = validate(spec, &components);
    let bill = BillOfMaterials::from_components(&components, spec.prices());
    Ok((violations, bill))
}

/// Run every trial and keep the cheapest compliant one.
pub fn search(spec: &Specification) -> SearchOutcome {
    info!("searching for the cheapest compliant patio");
    let mut outcome = SearchOutcome::default();

    for trial in trials(spec) {
        outcome.trials += 1;
        match evaluate(&trial) {
            Ok((violations, bill)) if violations.is_empty() => {
                outcome.compliant += 1;
                trace!(price = bill.total(), "compliant trial");
                let cheaper = outcome.best.as_ref().map_or(true, |best| bill.total() < best.price);
                if cheaper {
                    outcome.best = Some(Trial {
                        spec: trial,
                        price: bill.total(),
                    });
                }
            }
            Ok((violations, _)) => trace!(?violations, "trial rejected"),
            Err(err) => trace!(%err, "trial could not be generated"),
        }
    }

    match &outcome.best {
        Some(best) => info!(
            trials = outcome.trials,
            compliant = outcome.compliant,
            price = best.price,
            "search finished"
        ),
        None => warn!(trials = outcome.trials, "no compliant configuration found"),
    }
    outcome
}
