use rand::Rng;

/// Half-width of the cost range: costs are drawn from `[-RANGE, RANGE]`.
pub const COST_RANGE: i64 = 1_000_000_000;

/// Draw one arc cost for a single trial.
///
/// Every feasible flow settles the ledger equally well; the cost exists
/// only to bias the solver's choice among them. A min-cost solve under
/// uniformly random costs lands on an extreme point of the transportation
/// polytope, which tends to concentrate flow on few, large arcs. Fresh
/// costs are drawn per arc per trial and never reused.
pub fn arc_cost<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(-COST_RANGE..=COST_RANGE)
}
