//! Settlement planning: turn net balances into point-to-point transfers.

use serde::{Deserialize, Serialize};

use splitledger_core::{ParticipantId, ValueObject};

use crate::EPSILON;

/// `from` should transfer `amount` to `to`. `amount` is always above [`EPSILON`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: f64,
}

impl ValueObject for Settlement {}

/// Greedy debtor/creditor matching.
///
/// Each debtor (balance below `-EPSILON`), in input order, pays creditors
/// (balance above `EPSILON`), in input order, `min(remaining debt, remaining
/// credit)` until its debt is exhausted. Transfers of `EPSILON` or less are not
/// emitted. The result is deterministic for a given input order but does not
/// minimise the number of transfers.
pub fn plan<I>(balances: I) -> Vec<Settlement>
where
    I: IntoIterator<Item = (ParticipantId, f64)>,
{
    let mut debtors: Vec<(ParticipantId, f64)> = Vec::new();
    let mut creditors: Vec<(ParticipantId, f64)> = Vec::new();

    for (id, balance) in balances {
        if balance < -EPSILON {
            debtors.push((id, -balance));
        } else if balance > EPSILON {
            creditors.push((id, balance));
        }
    }

    let mut settlements = Vec::new();

    for (debtor, debt) in debtors {
        let mut remaining = debt;

        for (creditor, credit) in creditors.iter_mut() {
            if remaining <= EPSILON {
                break;
            }
            if *credit <= EPSILON {
                continue;
            }

            let amount = remaining.min(*credit);
            if amount > EPSILON {
                settlements.push(Settlement {
                    from: debtor,
                    to: *creditor,
                    amount,
                });
                remaining -= amount;
                *credit -= amount;
            }
        }
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use splitledger_core::SequentialIdGenerator;

    fn ids(n: usize) -> Vec<ParticipantId> {
        let generator = SequentialIdGenerator::new();
        (0..n).map(|_| ParticipantId::generate(&generator)).collect()
    }

    /// Incoming minus outgoing transfer total for `id`.
    fn net_received(settlements: &[Settlement], id: ParticipantId) -> f64 {
        settlements
            .iter()
            .map(|s| {
                if s.to == id {
                    s.amount
                } else if s.from == id {
                    -s.amount
                } else {
                    0.0
                }
            })
            .sum()
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan(Vec::new()).is_empty());
    }

    #[test]
    fn near_zero_balances_plan_nothing() {
        let p = ids(3);
        assert!(plan([(p[0], 0.004), (p[1], -0.01), (p[2], 0.006)]).is_empty());
    }

    #[test]
    fn single_debtor_pays_single_creditor() {
        let p = ids(2);
        let s = plan([(p[0], 50.0), (p[1], -50.0)]);
        assert_eq!(
            s,
            vec![Settlement {
                from: p[1],
                to: p[0],
                amount: 50.0
            }]
        );
    }

    #[test]
    fn debtors_and_creditors_are_walked_in_input_order() {
        let p = ids(4);
        // creditors c0=+30, c2=+70; debtors d1=-60, d3=-40
        let s = plan([(p[0], 30.0), (p[1], -60.0), (p[2], 70.0), (p[3], -40.0)]);
        let triples: Vec<_> = s.iter().map(|s| (s.from, s.to, s.amount)).collect();
        assert_eq!(
            triples,
            vec![(p[1], p[0], 30.0), (p[1], p[2], 30.0), (p[3], p[2], 40.0)]
        );
    }

    #[test]
    fn exhausted_creditors_are_skipped() {
        let p = ids(4);
        let s = plan([(p[0], 10.0), (p[1], 20.0), (p[2], -10.0), (p[3], -20.0)]);
        assert_eq!(s.len(), 2);
        assert_eq!((s[1].from, s[1].to, s[1].amount), (p[3], p[1], 20.0));
    }

    #[test]
    fn planning_is_deterministic() {
        let p = ids(5);
        let input = [(p[0], 12.5), (p[1], -7.25), (p[2], 30.0), (p[3], -20.0), (p[4], -15.25)];
        assert_eq!(plan(input), plan(input));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: with whole-unit, zero-sum balances, every participant's
        /// received-minus-paid total equals its balance and no transfer is
        /// negative or tiny.
        #[test]
        fn settlements_conserve_balances(
            raw in prop::collection::vec(-5_000i64..5_000i64, 1..12)
        ) {
            let mut values = raw;
            let sum: i64 = values.iter().sum();
            values.push(-sum);

            let p = ids(values.len());
            let balances: Vec<(ParticipantId, f64)> = p
                .iter()
                .copied()
                .zip(values.iter().map(|v| *v as f64))
                .collect();

            let settlements = plan(balances.clone());

            for s in &settlements {
                prop_assert!(s.amount > EPSILON);
                prop_assert!(s.from != s.to);
            }
            for (id, balance) in &balances {
                prop_assert!((net_received(&settlements, *id) - balance).abs() <= EPSILON);
            }

            let positive: f64 = balances.iter().map(|(_, b)| b.max(0.0)).sum();
            let moved: f64 = settlements.iter().map(|s| s.amount).sum();
            prop_assert!(moved <= positive + EPSILON);
        }

        /// Property: balances all within epsilon of zero produce no transfers.
        #[test]
        fn settled_balances_plan_nothing(raw in prop::collection::vec(-0.01f64..=0.01f64, 0..10)) {
            let p = ids(raw.len());
            let settlements = plan(p.into_iter().zip(raw));
            prop_assert!(settlements.is_empty());
        }
    }
}
