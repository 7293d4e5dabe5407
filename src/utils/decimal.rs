use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};

pub trait BigDecimalHelpers {
    fn is_positive_amount(&self) -> bool;

    /// A ratio in [0, 1] as a whole percentage, rounded half up.
    fn ratio_to_percent(&self) -> Option<u8>;
}

impl BigDecimalHelpers for BigDecimal {
    fn is_positive_amount(&self) -> bool {
        *self > BigDecimal::zero()
    }

    fn ratio_to_percent(&self) -> Option<u8> {
        let half = BigDecimal::from(1) / BigDecimal::from(2);
        let scaled = self * BigDecimal::from(100) + half;
        // with_scale truncates, which is floor for the non-negative values used here
        scaled.with_scale(0).to_u8()
    }
}
