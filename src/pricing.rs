//! Pure pricing arithmetic: dynamic APY, loan amortization, compounding
//! projections and the deposit allocation split.
//!
//! Nothing here touches IO. Input guarding (positive principal, non-zero
//! term, supported lock-ups) happens at the HTTP boundary, not in these
//! functions.

use serde::Serialize;

use crate::rates;

/// Effective annual yield for a lock-up duration at the given TVL.
///
/// A lock-up absent from the rate table contributes a zero base rate, so the
/// result degrades to the bare TVL bonus. Mutating routes reject unknown
/// lock-ups before they get here; this path only serves read-only quoting.
pub fn dynamic_apy(lockup_months: u32, tvl: f64) -> f64 {
    let base = rates::base_rate(lockup_months).unwrap_or(0.0);
    base + rates::tvl_bonus(tvl)
}

/// Annual loan rate: fixed base plus the same TVL bonus tiers.
pub fn dynamic_interest_rate(tvl: f64) -> f64 {
    rates::BASE_LOAN_RATE + rates::tvl_bonus(tvl)
}

/// Fixed monthly payment for a standard amortized loan.
///
/// Callers guard `principal > 0` and `term_months > 0`. A zero rate
/// degenerates to straight-line repayment.
pub fn amortized_monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / term_months as f64;
    }
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(term_months as i32)))
}

/// A loan quote. Value type, recomputed on every request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LoanQuote {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
}

impl LoanQuote {
    pub fn compute(principal: f64, annual_rate: f64, term_months: u32) -> Self {
        let monthly_payment = amortized_monthly_payment(principal, annual_rate, term_months);
        let total_interest = monthly_payment * term_months as f64 - principal;
        Self {
            principal,
            annual_rate,
            term_months,
            monthly_payment,
            total_interest,
        }
    }
}

/// One point of a compounding projection series.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionPoint {
    pub period_label: String,
    pub value: f64,
}

/// Compounding series of `periods + 1` points: the initial value at period 0,
/// then one multiplication by `1 + periodic_rate` per period.
pub fn generate_projection(initial: f64, periodic_rate: f64, periods: u32) -> Vec<ProjectionPoint> {
    let mut points = Vec::with_capacity(periods as usize + 1);
    let mut value = initial;
    points.push(ProjectionPoint {
        period_label: "P0".to_string(),
        value,
    });
    for p in 1..=periods {
        value *= 1.0 + periodic_rate;
        points.push(ProjectionPoint {
            period_label: format!("P{p}"),
            value,
        });
    }
    points
}

/// How a deposit splits across the three buckets at the mock prices.
#[derive(Debug, Clone, Serialize)]
pub struct DepositSplit {
    pub bnb_units: f64,
    pub btc_units: f64,
    pub stable: f64,
    pub bnb_usd: f64,
    pub btc_usd: f64,
}

/// Deterministic deposit split: 25% BNB-equivalent, 15% BTC-equivalent,
/// 60% stable balance.
pub fn split_deposit(amount: f64) -> DepositSplit {
    let bnb_usd = amount * rates::DEPOSIT_BNB_FRACTION;
    let btc_usd = amount * rates::DEPOSIT_BTC_FRACTION;
    let stable = amount * rates::DEPOSIT_STABLE_FRACTION;
    DepositSplit {
        bnb_units: bnb_usd / rates::MOCK_BNB_PRICE,
        btc_units: btc_usd / rates::MOCK_BTC_PRICE,
        stable,
        bnb_usd,
        btc_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::MOCK_TVL;

    #[test]
    fn unknown_lockup_yields_bare_tvl_bonus() {
        for months in [0, 1, 5, 7, 13, 48] {
            assert_eq!(dynamic_apy(months, 12_500_000.0), 0.010);
            assert_eq!(dynamic_apy(months, 500.0), 0.0);
        }
    }

    #[test]
    fn apy_tier_boundaries_resolve_to_higher_tier() {
        assert_eq!(dynamic_apy(12, 1_000_000.0), 0.105 + 0.005);
        assert_eq!(dynamic_apy(12, 10_000_000.0), 0.105 + 0.010);
        assert_eq!(dynamic_apy(12, 50_000_000.0), 0.105 + 0.015);
        assert_eq!(dynamic_apy(12, 999_999.0), 0.105);
    }

    #[test]
    fn apy_is_idempotent_at_mock_tvl() {
        let first = dynamic_apy(12, MOCK_TVL);
        for _ in 0..10 {
            assert_eq!(dynamic_apy(12, MOCK_TVL), first);
        }
        assert_eq!(first, 0.105 + 0.010);
    }

    #[test]
    fn loan_rate_tracks_tvl_bonus() {
        assert_eq!(dynamic_interest_rate(500.0), 0.08);
        assert_eq!(dynamic_interest_rate(50_000_000.0), 0.095);
    }

    #[test]
    fn amortization_matches_reference_value() {
        // 1000 over 12 months at 12% APR → ~88.85/month.
        let payment = amortized_monthly_payment(1000.0, 0.12, 12);
        assert!((payment - 88.85).abs() < 0.01, "payment = {payment}");
    }

    #[test]
    fn amortization_zero_rate_is_straight_line() {
        let payment = amortized_monthly_payment(1200.0, 0.0, 12);
        assert!((payment - 100.0).abs() < 1e-9);
    }

    #[test]
    fn loan_quote_total_interest_is_consistent() {
        let quote = LoanQuote::compute(1000.0, 0.12, 12);
        let expected = quote.monthly_payment * 12.0 - 1000.0;
        assert!((quote.total_interest - expected).abs() < 1e-9);
        assert!(quote.total_interest > 0.0);
    }

    #[test]
    fn projection_series_values() {
        let points = generate_projection(1000.0, 0.05, 3);
        assert_eq!(points.len(), 4);
        let expected = [1000.0, 1050.0, 1102.5, 1157.625];
        for (point, want) in points.iter().zip(expected) {
            assert!((point.value - want).abs() < 1e-9, "{} != {want}", point.value);
        }
        assert_eq!(points[0].period_label, "P0");
        assert_eq!(points[3].period_label, "P3");
    }

    #[test]
    fn deposit_split_sums_back_to_amount() {
        let amount = 12_345.67;
        let split = split_deposit(amount);
        let total = split.bnb_usd + split.btc_usd + split.stable;
        assert!((total - amount).abs() < 1e-9);
        assert!(split.bnb_units > 0.0 && split.btc_units > 0.0);
    }
}
