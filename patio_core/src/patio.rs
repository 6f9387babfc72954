//! # Patio Orchestrator
//!
//! Owns the live [`Specification`] and everything generated from it.
//!
//! ## Generation cycle
//!
//! ```text
//! spans → posts → beams (spans and posts assigned) → covering
//!       → bill of materials → validation → listeners
//! ```
//!
//! Mutations go through the specification and take effect at the next
//! [`Patio::update_patio`]. A cycle that ends with no violations makes the
//! current specification the restore point; a failed optimizer run falls
//! back to it.
//!
//! ```rust
//! use patio_core::patio::Patio;
//! use patio_core::specification::{Cascade, Specification};
//!
//! let mut patio = Patio::new(Specification::default()).unwrap();
//! assert!(patio.violations().is_empty());
//!
//! patio.spec_mut().set_plies_per_beam(1).unwrap();
//! patio.update_patio().unwrap();
//! assert!(!patio.violations().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::bill::BillOfMaterials;
use crate::components::{
    Beam, BeamLayout, Component, Covering, CoveringLayout, Post, PostLayout, Span, SpanLayout, StructuralGroup,
};
use crate::errors::CalcResult;
use crate::optimizer;
use crate::snapshot::SpecSnapshot;
use crate::specification::{Cascade, Change, Specification};
use crate::validator::{validate, Violation};

/// Receives the outcome of every generation cycle.
pub trait PatioListener {
    fn violations_found(&mut self, violations: &BTreeSet<Violation>);
    fn no_violations_found(&mut self);
}

impl<L: PatioListener> PatioListener for Rc<RefCell<L>> {
    fn violations_found(&mut self, violations: &BTreeSet<Violation>) {
        self.borrow_mut().violations_found(violations);
    }

    fn no_violations_found(&mut self) {
        self.borrow_mut().no_violations_found();
    }
}

/// Lay out every component of a specification.
///
/// Components come back as spans, posts, beams, then the covering. Beam 0
/// is against the house and stands on no posts; every other beam carries
/// the span before it and, unless it is the outermost, the span after it.
pub fn generate(spec: &Specification) -> CalcResult<Vec<Component>> {
    let styles = spec.styles();
    let post = spec.post();
    let beam = spec.beam_ply();
    let joist = spec.joist();
    let joist_span = spec.joist_span();
    let beam_amount = spec.beam_amount()? as usize;
    let span_amount = spec.span_amount()?;
    let posts_per_beam = spec.posts_per_beam() as usize;

    let span_layout = SpanLayout {
        joist,
        joist_spacing: spec.joist_spacing(),
        joists_per_span: spec.joist_amount_per_span()?,
        joist_span,
        cantilever_length: spec.cantilever_length(),
        beam_length: beam.depth,
        base_height: post.depth + beam.height,
        span_amount,
    };
    let spans = (0..span_amount as usize)
        .map(|i| Span::generate(&span_layout, i, styles.joist))
        .collect::<CalcResult<Vec<_>>>()?;

    let post_layout = PostLayout {
        dimensions: post,
        joist_span,
        spacing: spec.post_spacing(),
    };
    let mut posts = Vec::with_capacity(beam_amount.saturating_sub(1) * posts_per_beam);
    for beam_index in 1..beam_amount {
        for index in 0..posts_per_beam {
            posts.push(Post::generate(&post_layout, beam_index, index, styles.post)?);
        }
    }

    let beam_layout = BeamLayout {
        ply: beam,
        plies: spec.plies_per_beam(),
        joist_span,
        base_height: post.depth,
    };
    let mut beams = Vec::with_capacity(beam_amount);
    for index in 0..beam_amount {
        let mut generated = Beam::generate(&beam_layout, index, styles.beam)?;
        let carried = index.saturating_sub(1)..=index;
        generated.assign_spans(carried.filter(|&s| s < span_amount as usize).collect());
        generated.assign_posts(
            posts
                .iter()
                .enumerate()
                .filter(|(_, p)| p.beam_index() == index)
                .map(|(i, _)| i)
                .collect(),
        );
        beams.push(generated);
    }

    let covering_layout = CoveringLayout {
        plank: spec.covering(),
        spacing: spec.covering_spacing(),
        patio_depth: spec.patio().depth,
        base_height: post.depth + beam.height + joist.width,
    };
    let covering = Covering::generate(&covering_layout, styles.covering)?;

    let mut components = Vec::with_capacity(spans.len() + posts.len() + beams.len() + 1);
    components.extend(spans.into_iter().map(Component::Span));
    components.extend(posts.into_iter().map(Component::Post));
    components.extend(beams.into_iter().map(Component::Beam));
    components.push(Component::Covering(covering));
    Ok(components)
}

/// A patio: its specification, generated components, price and code check.
pub struct Patio {
    spec: Specification,
    restore_point: Specification,
    components: Vec<Component>,
    violations: BTreeSet<Violation>,
    bill: BillOfMaterials,
    listeners: Vec<Box<dyn PatioListener>>,
}

impl std::fmt::Debug for Patio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patio")
            .field("spec", &self.spec)
            .field("components", &self.components.len())
            .field("violations", &self.violations)
            .field("total", &self.bill.total())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Patio {
    /// Generate a patio from `spec`.
    ///
    /// `spec` becomes the restore point only if it generates with no
    /// violations; until a clean cycle the factory default stands in.
    pub fn new(spec: Specification) -> CalcResult<Self> {
        let mut patio = Patio {
            restore_point: Specification::factory_default(),
            spec,
            components: Vec::new(),
            violations: BTreeSet::new(),
            bill: BillOfMaterials::default(),
            listeners: Vec::new(),
        };
        patio.regenerate()?;
        Ok(patio)
    }

    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    /// Mutable access for setters; call [`Patio::update_patio`] afterwards.
    pub fn spec_mut(&mut self) -> &mut Specification {
        &mut self.spec
    }

    /// Apply a batch of changes to the specification without regenerating.
    pub fn update(&mut self, changes: &[(Change, Cascade)]) -> CalcResult<()> {
        self.spec.update(changes)
    }

    /// Last specification that generated with no violations
    pub fn restore_point(&self) -> &Specification {
        &self.restore_point
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn groups(&self) -> impl Iterator<Item = &StructuralGroup> {
        self.components.iter().map(Component::group)
    }

    pub fn violations(&self) -> &BTreeSet<Violation> {
        &self.violations
    }

    pub fn bill(&self) -> &BillOfMaterials {
        &self.bill
    }

    pub fn beams(&self) -> impl Iterator<Item = &Beam> {
        self.components.iter().filter_map(|c| match c {
            Component::Beam(beam) => Some(beam),
            _ => None,
        })
    }

    pub fn add_listener(&mut self, listener: Box<dyn PatioListener>) {
        self.listeners.push(listener);
    }

    /// Run a full generation cycle and notify the listeners.
    ///
    /// On error nothing generated is replaced.
    pub fn update_patio(&mut self) -> CalcResult<()> {
        self.regenerate()?;
        self.notify();
        Ok(())
    }

    fn regenerate(&mut self) -> CalcResult<()> {
        let components = generate(&self.spec)?;
        self.bill = BillOfMaterials::from_components(&components, self.spec.prices());
        self.violations = validate(&self.spec, &components);
        self.components = components;

        debug!(
            components = self.components.len(),
            total = self.bill.total(),
            violations = self.violations.len(),
            "patio regenerated"
        );
        if self.violations.is_empty() {
            self.restore_point = self.spec.clone();
        }
        Ok(())
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            if self.violations.is_empty() {
                listener.no_violations_found();
            } else {
                listener.violations_found(&self.violations);
            }
        }
    }

    /// Replace the specification with the cheapest compliant variation of it.
    ///
    /// Returns `false` when nothing compliant was found; the patio is then
    /// rolled back to the restore point and reports
    /// [`Violation::NoOptimalConfiguration`].
    pub fn generate_optimal_patio(&mut self) -> CalcResult<bool> {
        let outcome = optimizer::search(&self.spec);
        match outcome.best {
            Some(best) => {
                info!(price = best.price, trials = outcome.trials, "applying cheapest configuration");
                self.spec = best.spec;
                self.update_patio()?;
                Ok(true)
            }
            None => {
                warn!("no compliant configuration, restoring last valid specification");
                self.spec = self.restore_point.clone();
                self.regenerate()?;
                self.violations.insert(Violation::NoOptimalConfiguration);
                self.notify();
                Ok(false)
            }
        }
    }

    pub fn snapshot(&self, label: impl Into<String>) -> SpecSnapshot {
        SpecSnapshot::capture(&self.spec, label)
    }

    /// Make a snapshot's specification live and regenerate.
    pub fn restore(&mut self, snapshot: &SpecSnapshot) -> CalcResult<()> {
        self.spec = snapshot.spec.clone();
        self.update_patio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::StructuralRole;

    #[derive(Default)]
    struct Recorder {
        found: Vec<BTreeSet<Violation>>,
        clean: usize,
    }

    impl PatioListener for Recorder {
        fn violations_found(&mut self, violations: &BTreeSet<Violation>) {
            self.found.push(violations.clone());
        }

        fn no_violations_found(&mut self) {
            self.clean += 1;
        }
    }

    fn recorded_patio(spec: Specification) -> (Patio, Rc<RefCell<Recorder>>) {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut patio = Patio::new(spec).unwrap();
        patio.add_listener(Box::new(Rc::clone(&recorder)));
        (patio, recorder)
    }

    #[test]
    fn test_default_scenario() {
        let patio = Patio::new(Specification::default()).unwrap();
        let spec = patio.spec();
        let expected = 1 + ((225.0 - 8.0 + 1e-4) / spec.joist_span()).floor() as usize;

        let beams: Vec<&Beam> = patio.beams().collect();
        assert_eq!(beams.len(), expected);
        for beam in &beams {
            assert_eq!(beam.group().len(), 2);
            let posts = if beam.is_house_beam() { 0 } else { 3 };
            assert_eq!(beam.supporting_posts().len(), posts);
        }
        assert!(patio.violations().is_empty());
    }

    #[test]
    fn test_component_order_and_relations() {
        let patio = Patio::new(Specification::default()).unwrap();
        let roles: Vec<StructuralRole> = patio.components().iter().map(Component::role).collect();
        let mut sorted = roles.clone();
        sorted.sort_by_key(|role| match role {
            StructuralRole::Joist => 0,
            StructuralRole::Post => 1,
            StructuralRole::Beam => 2,
            StructuralRole::Covering => 3,
        });
        assert_eq!(roles, sorted);

        let spans: Vec<Vec<usize>> = patio.beams().map(|b| b.supported_spans().to_vec()).collect();
        assert_eq!(spans, vec![vec![0], vec![0, 1], vec![1, 2], vec![2]]);
        assert_eq!(patio.beams().nth(2).unwrap().supporting_posts(), &[3, 4, 5]);
    }

    #[test]
    fn test_posts_sit_under_their_beam() {
        let patio = Patio::new(Specification::default()).unwrap();
        let span = patio.spec().joist_span();
        for component in patio.components() {
            if let Component::Post(post) = component {
                let x = post.group().pieces()[0].center().x;
                assert!((x - post.beam_index() as f64 * span).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_stacked_heights() {
        let patio = Patio::new(Specification::default()).unwrap();
        let (lo, hi) = patio
            .groups()
            .filter(|g| g.role() == StructuralRole::Covering)
            .map(|g| g.bounds().unwrap())
            .next()
            .unwrap();
        assert_eq!(lo.y, 69.5);
        assert_eq!(hi.y, 70.5);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let mut patio = Patio::new(Specification::default()).unwrap();
        let components = patio.components().to_vec();
        let violations = patio.violations().clone();
        let bill = patio.bill().clone();
        patio.update_patio().unwrap();
        assert_eq!(patio.components(), components.as_slice());
        assert_eq!(patio.violations(), &violations);
        assert_eq!(patio.bill(), &bill);
    }

    #[test]
    fn test_discarded_clone_changes_nothing() {
        let mut patio = Patio::new(Specification::default()).unwrap();
        let before = patio.components().to_vec();
        let mut trial = patio.spec().clone();
        trial.set_patio_depth(300.0, Cascade::Dependents).unwrap();
        drop(trial);
        patio.update_patio().unwrap();
        assert_eq!(patio.components(), before.as_slice());
    }

    #[test]
    fn test_listeners_notified_once_per_cycle() {
        let (mut patio, recorder) = recorded_patio(Specification::default());
        patio.update_patio().unwrap();
        assert_eq!(recorder.borrow().clean, 1);

        patio.spec_mut().set_plies_per_beam(1).unwrap();
        patio.update_patio().unwrap();
        let recorded = recorder.borrow();
        assert_eq!(recorded.clean, 1);
        assert_eq!(recorded.found.len(), 1);
        assert!(recorded.found[0].contains(&Violation::PliesTwoSpans));
    }

    #[test]
    fn test_restore_point_tracks_valid_cycles() {
        let mut patio = Patio::new(Specification::default()).unwrap();
        patio.spec_mut().set_plies_per_beam(3).unwrap();
        patio.update_patio().unwrap();
        assert_eq!(patio.restore_point().plies_per_beam(), 3);

        patio.spec_mut().set_plies_per_beam(1).unwrap();
        patio.update_patio().unwrap();
        assert_eq!(patio.restore_point().plies_per_beam(), 3);
    }

    #[test]
    fn test_generation_error_keeps_previous_output() {
        let mut patio = Patio::new(Specification::default()).unwrap();
        let before = patio.components().to_vec();
        patio.spec_mut().set_joist_spacing(0.0).unwrap();
        assert!(patio.update_patio().is_err());
        assert_eq!(patio.components(), before.as_slice());
    }

    #[test]
    fn test_optimizer_success() {
        let (mut patio, recorder) = recorded_patio(Specification::default());
        assert!(patio.generate_optimal_patio().unwrap());
        assert!(patio.violations().is_empty());
        let best = optimizer::search(&Specification::default()).best.unwrap();
        assert_eq!(patio.spec(), &best.spec);
        assert_eq!(patio.bill().total(), best.price);
        assert_eq!(patio.restore_point(), patio.spec());
        assert_eq!(recorder.borrow().clean, 1);
    }

    #[test]
    fn test_optimizer_failure_restores() {
        let (mut patio, recorder) = recorded_patio(Specification::default());
        patio
            .update(&[
                (Change::PostsPerBeam(2), Cascade::RawOnly),
                (Change::PatioWidth(400.0), Cascade::Dependents),
            ])
            .unwrap();
        patio.update_patio().unwrap();

        assert!(!patio.generate_optimal_patio().unwrap());
        assert_eq!(patio.spec(), &Specification::default());
        assert_eq!(patio.violations().iter().copied().collect::<Vec<_>>(), vec![Violation::NoOptimalConfiguration]);
        let recorded = recorder.borrow();
        assert_eq!(recorded.found.len(), 2);
        assert!(recorded.found[1].contains(&Violation::NoOptimalConfiguration));
    }

    #[test]
    fn test_failing_start_is_not_a_restore_point() {
        let mut spec = Specification::default();
        spec.update(&[
            (Change::PostsPerBeam(2), Cascade::RawOnly),
            (Change::PatioWidth(400.0), Cascade::Dependents),
        ])
        .unwrap();
        let mut patio = Patio::new(spec).unwrap();
        assert!(!patio.violations().is_empty());
        assert_eq!(patio.restore_point(), &Specification::factory_default());

        assert!(!patio.generate_optimal_patio().unwrap());
        assert_eq!(patio.spec(), &Specification::factory_default());
        assert_eq!(patio.violations().iter().copied().collect::<Vec<_>>(), vec![Violation::NoOptimalConfiguration]);
    }

    #[test]
    fn test_passing_start_is_the_restore_point() {
        let mut spec = Specification::default();
        spec.set_plies_per_beam(3).unwrap();
        let patio = Patio::new(spec.clone()).unwrap();
        assert!(patio.violations().is_empty());
        assert_eq!(patio.restore_point(), &spec);
    }

    #[test]
    fn test_snapshot_restore_reproduces_output() {
        let mut patio = Patio::new(Specification::default()).unwrap();
        let snapshot = patio.snapshot("default");
        let components = patio.components().to_vec();
        let bill = patio.bill().clone();

        patio.spec_mut().set_patio_depth(300.0, Cascade::Dependents).unwrap();
        patio.update_patio().unwrap();
        assert_ne!(patio.components(), components.as_slice());

        patio.restore(&snapshot).unwrap();
        assert_eq!(patio.components(), components.as_slice());
        assert_eq!(patio.bill(), &bill);
        assert!(patio.violations().is_empty());
    }
}
