//! Static rate tables for the yield product.
//!
//! Everything in this module is fixed at compile time. The dashboard's
//! protocol TVL and asset prices are mocked constants until the live price
//! feed lands.

/// Lock-up duration (months) → base annual rate.
pub const LOCKUP_BASE_RATES: &[(u32, f64)] = &[
    (3, 0.055),
    (6, 0.075),
    (12, 0.105),
    (24, 0.135),
];

/// TVL bonus tiers as (inclusive lower threshold, bonus), ordered
/// highest-threshold-first so the first match wins.
pub const TVL_BONUS_TIERS: &[(f64, f64)] = &[
    (50_000_000.0, 0.015),
    (10_000_000.0, 0.010),
    (1_000_000.0, 0.005),
];

/// Fixed base annual rate for loans, before the TVL bonus.
pub const BASE_LOAN_RATE: f64 = 0.08;

/// Mocked protocol total-value-locked.
pub const MOCK_TVL: f64 = 12_500_000.0;

/// Mocked asset prices used by the deposit split.
pub const MOCK_BTC_PRICE: f64 = 64_000.0;
pub const MOCK_BNB_PRICE: f64 = 580.0;

/// Deposit allocation fractions. Must sum to 1.0.
pub const DEPOSIT_BNB_FRACTION: f64 = 0.25;
pub const DEPOSIT_BTC_FRACTION: f64 = 0.15;
pub const DEPOSIT_STABLE_FRACTION: f64 = 0.60;

/// Base annual rate for a lock-up duration, `None` when the duration is not
/// a supported tier.
pub fn base_rate(lockup_months: u32) -> Option<f64> {
    LOCKUP_BASE_RATES
        .iter()
        .find(|(m, _)| *m == lockup_months)
        .map(|(_, r)| *r)
}

/// Bonus rate for the highest TVL tier `tvl` reaches, 0.0 below all tiers.
pub fn tvl_bonus(tvl: f64) -> f64 {
    TVL_BONUS_TIERS
        .iter()
        .find(|(threshold, _)| tvl >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0.0)
}

/// Whether `months` is a lock-up duration the rate table knows about.
pub fn known_lockup(months: u32) -> bool {
    LOCKUP_BASE_RATES.iter().any(|(m, _)| *m == months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rate_known_and_unknown_lockups() {
        assert_eq!(base_rate(3), Some(0.055));
        assert_eq!(base_rate(24), Some(0.135));
        assert_eq!(base_rate(5), None);
        assert_eq!(base_rate(0), None);
    }

    #[test]
    fn tvl_tiers_are_ordered_highest_first() {
        for pair in TVL_BONUS_TIERS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }

    #[test]
    fn tier_lower_bounds_are_inclusive() {
        assert_eq!(tvl_bonus(1_000_000.0), 0.005);
        assert_eq!(tvl_bonus(10_000_000.0), 0.010);
        assert_eq!(tvl_bonus(50_000_000.0), 0.015);
        assert_eq!(tvl_bonus(999_999.99), 0.0);
        assert_eq!(tvl_bonus(49_999_999.0), 0.010);
    }

    #[test]
    fn deposit_fractions_sum_to_one() {
        let sum = DEPOSIT_BNB_FRACTION + DEPOSIT_BTC_FRACTION + DEPOSIT_STABLE_FRACTION;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
