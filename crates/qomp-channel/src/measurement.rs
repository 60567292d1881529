//! Measurement on density operators: outcome probabilities and instruments.

use ndarray::Array2;
use num_complex::Complex64;
use qomp_engine::Direction;
use qomp_engine::bits::MIN_DOUBLE;
use tracing::{debug, instrument};

use crate::error::{ChannelError, ChannelResult, lift};
use crate::operator::{DensityOperator, real_part};

/// How measurement operators are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorKind {
    /// Kraus operators `K`; outcome probability `Tr(KρK†)`.
    #[default]
    Kraus,
    /// POVM elements `E`; outcome probability `Tr(Eρ)`.
    Povm,
}

impl DensityOperator {
    /// Probability of each outcome of the measurement described by
    /// `operators` acting on `ids` (empty = every qubit).
    pub fn probability(
        &self,
        operators: &[Array2<Complex64>],
        ids: &[usize],
        kind: OperatorKind,
    ) -> ChannelResult<Vec<f64>> {
        if operators.is_empty() {
            return Err(ChannelError::Probability(
                "no measurement operators given".into(),
            ));
        }
        let direction = match kind {
            OperatorKind::Kraus => Direction::Both,
            OperatorKind::Povm => Direction::Left,
        };
        operators
            .iter()
            .map(|m| {
                let mut branch = self.rho.clone();
                branch.apply_matrix(m, ids, direction).map_err(lift)?;
                let p = real_part("probability", branch.trace())?;
                Ok(if p.abs() < MIN_DOUBLE { 0.0 } else { p })
            })
            .collect()
    }

    /// Apply the instrument with Kraus operators `operators` on `ids`.
    ///
    /// Without `outcome` the state becomes `Σ K_i ρ K_i†`. With an outcome
    /// `o` it becomes `K_o ρ K_o†`, left unnormalized so its trace is the
    /// probability of `o`; call [`DensityOperator::normalize`] to
    /// condition on it.
    #[instrument(skip(self, operators), fields(count = operators.len()))]
    pub fn instrument(
        &mut self,
        operators: &[Array2<Complex64>],
        ids: &[usize],
        outcome: Option<usize>,
    ) -> ChannelResult<()> {
        if operators.is_empty() {
            return Err(ChannelError::Instrument("no Kraus operators given".into()));
        }

        match outcome {
            Some(o) => {
                let kraus = operators
                    .get(o)
                    .ok_or(ChannelError::InvalidOutcomeIndex {
                        outcome: o,
                        num_operators: operators.len(),
                    })?;
                self.rho
                    .apply_matrix(kraus, ids, Direction::Both)
                    .map_err(lift)?;
            }
            None => {
                let mut branches = operators.iter().map(|kraus| {
                    let mut branch = self.rho.clone();
                    branch
                        .apply_matrix(kraus, ids, Direction::Both)
                        .map(|()| branch)
                        .map_err(lift)
                });
                let Some(first) = branches.next() else {
                    return Ok(());
                };
                let mut sum = first?;
                for branch in branches {
                    sum.add(&branch?).map_err(lift)?;
                }
                self.rho = sum;
            }
        }
        debug!(trace = self.rho.trace().re, "instrument applied");
        Ok(())
    }
}
