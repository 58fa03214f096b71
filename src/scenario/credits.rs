use serde::{Deserialize, Serialize};

/// Future incentive payments tied to keeping a vehicle: a capped monthly
/// stream plus a lump sum that vests at a fixed month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSchedule {
    pub monthly_amount: f64,
    pub monthly_cap_months: u32,
    pub vesting_amount: f64,
    pub vesting_months: u32,
}

impl CreditSchedule {
    /// Total credits earned by holding for `months`. The monthly stream stops
    /// at its cap and the lump sum pays out only once the vesting month is
    /// reached.
    pub fn earned(&self, months: u32) -> f64 {
        let stream = self.monthly_amount * f64::from(months.min(self.monthly_cap_months));
        let vested = if months >= self.vesting_months {
            self.vesting_amount
        } else {
            0.0
        };
        stream + vested
    }
}
