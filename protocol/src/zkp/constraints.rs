//! # Labeled Constraints
//!
//! The fair-exchange statement is laid down as R1CS through `ark-relations`
//! and `ark-r1cs-std`. The constraint system alone answers "is this instance
//! satisfied?". It does not say *which* relation broke in a form a person
//! can read, and it has no room for prover-side assertions that are not part
//! of the statement. [`CheckLog`] fills both gaps.
//!
//! Every enforced relation goes through the log: the log calls the gadget's
//! `enforce_equal` on the constraint system and records a namespaced label
//! with the assigned outcome, e.g.
//! `fair_exchange/key_agreement/db_qa_minus_qs/x/limb2`.
//!
//! | class | lives in | effect of a failure |
//! |-------|----------|---------------------|
//! | [`CheckKind::Enforced`] | R1CS and the log | the instance is unsatisfiable |
//! | [`CheckKind::WitnessSanity`] | the log only | witness construction aborts; a verifier never sees it |
//!
//! Nothing short-circuits. A failing witness lays down the same constraints
//! as an honest one.

use std::cell::RefCell;

use ark_bn254::Fr;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    R1CSVar,
};
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use serde::Serialize;

use crate::types::{PointLimbs, Uint256};

/// Which predicate set a check belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Algebraic constraint, checked by the verifier.
    Enforced,
    /// Prover-side assertion, evaluated only while building the witness.
    WitnessSanity,
}

/// One recorded relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Check {
    pub label: String,
    pub kind: CheckKind,
    pub satisfied: bool,
}

/// Labels for the relations of one synthesis, in the order they were laid
/// down.
///
/// Synthesizers hold a shared reference, so the log uses interior
/// mutability.
#[derive(Debug, Default)]
pub struct CheckLog {
    namespace: RefCell<Vec<&'static str>>,
    checks: RefCell<Vec<Check>>,
}

impl CheckLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with `name` pushed onto the label namespace.
    pub fn scope<R>(&self, name: &'static str, f: impl FnOnce() -> R) -> R {
        self.namespace.borrow_mut().push(name);
        let out = f();
        self.namespace.borrow_mut().pop();
        out
    }

    fn record(&self, name: &str, kind: CheckKind, satisfied: bool) {
        let mut label = self.namespace.borrow().join("/");
        if !label.is_empty() {
            label.push('/');
        }
        label.push_str(name);

        if !satisfied {
            tracing::debug!(constraint = %label, ?kind, "check not satisfied");
        }
        self.checks.borrow_mut().push(Check {
            label,
            kind,
            satisfied,
        });
    }

    /// Enforce `lhs == rhs`.
    pub fn enforce_equal(
        &self,
        name: &str,
        lhs: &FpVar<Fr>,
        rhs: &FpVar<Fr>,
    ) -> Result<(), SynthesisError> {
        lhs.enforce_equal(rhs)?;
        let satisfied = lhs.value()? == rhs.value()?;
        self.record(name, CheckKind::Enforced, satisfied);
        Ok(())
    }

    /// Enforce `value == 0`.
    pub fn enforce_zero(&self, name: &str, value: &FpVar<Fr>) -> Result<(), SynthesisError> {
        self.enforce_equal(name, value, &FpVar::zero())
    }

    /// Enforce that a boolean signal is set.
    pub fn enforce_true(&self, name: &str, flag: &Boolean<Fr>) -> Result<(), SynthesisError> {
        flag.enforce_equal(&Boolean::TRUE)?;
        let satisfied = flag.value()?;
        self.record(name, CheckKind::Enforced, satisfied);
        Ok(())
    }

    /// Prover-side assertion. Adds nothing to the constraint system.
    pub fn assert_witness(&self, name: &str, holds: bool) {
        self.record(name, CheckKind::WitnessSanity, holds);
    }

    pub fn into_checks(self) -> Vec<Check> {
        self.checks.into_inner()
    }
}

// ---------------------------------------------------------------------------
// Allocation helpers
// ---------------------------------------------------------------------------

/// Allocate field elements as private witnesses, in order.
pub fn alloc_elements(
    cs: ConstraintSystemRef<Fr>,
    values: &[Fr],
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    values
        .iter()
        .map(|value| FpVar::<Fr>::new_witness(cs.clone(), || Ok(*value)))
        .collect()
}

/// Allocate the four 64-bit limbs of a value, least significant first.
pub fn alloc_limbs(
    cs: ConstraintSystemRef<Fr>,
    value: &Uint256,
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    alloc_elements(cs, &value.to_field_limbs())
}

/// Allocate a point as `[x limbs, y limbs]`.
pub fn alloc_point(
    cs: ConstraintSystemRef<Fr>,
    point: &PointLimbs,
) -> Result<[Vec<FpVar<Fr>>; 2], SynthesisError> {
    Ok([
        alloc_limbs(ns!(cs, "x").cs(), &point.x)?,
        alloc_limbs(ns!(cs, "y").cs(), &point.y)?,
    ])
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// A synthesized instance: the constraint system plus its labels.
pub struct Evaluation {
    cs: ConstraintSystemRef<Fr>,
    checks: Vec<Check>,
    satisfied: bool,
}

impl Evaluation {
    /// Close a synthesis. Satisfiability comes from the constraint system.
    pub fn new(cs: ConstraintSystemRef<Fr>, log: CheckLog) -> Result<Self, SynthesisError> {
        let satisfied = cs.is_satisfied()?;
        let checks = log.into_checks();
        debug_assert_eq!(
            satisfied,
            checks
                .iter()
                .filter(|check| check.kind == CheckKind::Enforced)
                .all(|check| check.satisfied),
            "labels disagree with the constraint system"
        );
        Ok(Self {
            cs,
            checks,
            satisfied,
        })
    }

    /// True iff every R1CS constraint holds (the verifier's view).
    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// True iff every witness-sanity assertion holds.
    pub fn is_witness_sane(&self) -> bool {
        self.sanity().all(|check| check.satisfied)
    }

    /// Label of the first unsatisfied enforced check.
    pub fn which_is_unsatisfied(&self) -> Option<&str> {
        self.enforced()
            .find(|check| !check.satisfied)
            .map(|check| check.label.as_str())
    }

    /// Label of the first failed witness-sanity assertion.
    pub fn which_is_insane(&self) -> Option<&str> {
        self.sanity()
            .find(|check| !check.satisfied)
            .map(|check| check.label.as_str())
    }

    /// Number of labeled enforced checks.
    pub fn num_constraints(&self) -> usize {
        self.enforced().count()
    }

    /// Number of rows in the underlying R1CS.
    pub fn num_r1cs_constraints(&self) -> usize {
        self.cs.num_constraints()
    }

    /// Number of witness-sanity assertions.
    pub fn num_witness_assertions(&self) -> usize {
        self.sanity().count()
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn constraint_system(&self) -> &ConstraintSystemRef<Fr> {
        &self.cs
    }

    fn enforced(&self) -> impl Iterator<Item = &Check> {
        self.checks
            .iter()
            .filter(|check| check.kind == CheckKind::Enforced)
    }

    fn sanity(&self) -> impl Iterator<Item = &Check> {
        self.checks
            .iter()
            .filter(|check| check.kind == CheckKind::WitnessSanity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;

    fn witness(cs: &ConstraintSystemRef<Fr>, value: u64) -> FpVar<Fr> {
        FpVar::new_witness(cs.clone(), || Ok(Fr::from(value))).unwrap()
    }

    #[test]
    fn empty_system_is_satisfied() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let eval = Evaluation::new(cs, CheckLog::new()).unwrap();
        assert!(eval.is_satisfied());
        assert!(eval.is_witness_sane());
        assert_eq!(eval.num_constraints(), 0);
    }

    #[test]
    fn namespaces_prefix_labels() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let log = CheckLog::new();
        let one = witness(&cs, 1);
        let zero = witness(&cs, 0);

        log.scope("outer", || {
            log.scope("inner", || log.enforce_zero("z", &one)).unwrap();
            log.enforce_zero("ok", &zero).unwrap();
        });

        assert!(!cs.is_satisfied().unwrap());
        let eval = Evaluation::new(cs, log).unwrap();
        assert_eq!(eval.which_is_unsatisfied(), Some("outer/inner/z"));
        assert_eq!(eval.checks()[1].label, "outer/ok");
    }

    #[test]
    fn sanity_failures_stay_out_of_the_constraint_system() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let log = CheckLog::new();
        log.assert_witness("distinct", false);
        log.enforce_equal("eq", &witness(&cs, 3), &witness(&cs, 3))
            .unwrap();

        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints(), 1);

        let eval = Evaluation::new(cs, log).unwrap();
        assert!(eval.is_satisfied());
        assert!(!eval.is_witness_sane());
        assert_eq!(eval.which_is_insane(), Some("distinct"));
        assert_eq!(eval.num_constraints(), 1);
        assert_eq!(eval.num_witness_assertions(), 1);
    }

    #[test]
    fn every_check_is_recorded_after_a_failure() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let log = CheckLog::new();
        let unset = Boolean::new_witness(cs.clone(), || Ok(false)).unwrap();
        let set = Boolean::new_witness(cs.clone(), || Ok(true)).unwrap();

        log.enforce_true("first", &unset).unwrap();
        log.enforce_true("second", &set).unwrap();
        log.enforce_equal("third", &witness(&cs, 1), &witness(&cs, 2))
            .unwrap();

        assert!(cs.which_is_unsatisfied().unwrap().is_some());
        let eval = Evaluation::new(cs, log).unwrap();
        assert_eq!(eval.num_constraints(), 3);
        assert_eq!(eval.which_is_unsatisfied(), Some("first"));
    }

    #[test]
    fn limbs_allocate_least_significant_first() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let point = PointLimbs::new(
            Uint256::from_limbs([1, 2, 3, 4]),
            Uint256::from_limbs([5, 6, 7, 8]),
        );
        let [x, y] = alloc_point(cs.clone(), &point).unwrap();

        assert_eq!(x[0].value().unwrap(), Fr::from(1u64));
        assert_eq!(y[3].value().unwrap(), Fr::from(8u64));
        assert_eq!(cs.num_witness_variables(), 8);
        assert_eq!(cs.num_constraints(), 0);
    }
}
