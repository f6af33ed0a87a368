//! Base unit → display unit conversion for log output.

use crate::config::DenominationConfig;

/// Fractional digits shown for display amounts.
pub const DISPLAY_FRACTION_DIGITS: u32 = 6;

/// Largest scale whose power of ten fits in a `u128`.
pub const MAX_DECIMALS: u32 = 38;

/// Base and display denominations of the swept token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    pub base: String,
    pub display: String,
    pub decimals: u32,
}

impl Denomination {
    pub fn from_config(config: &DenominationConfig) -> Self {
        Self {
            base: config.base.clone(),
            display: config.display.clone(),
            decimals: config.decimals.min(MAX_DECIMALS),
        }
    }

    /// `amount` in display units, e.g. `"1.000000"`.
    pub fn format(&self, amount: u128) -> String {
        format_display(amount, self.decimals)
    }
}

/// Divide `amount` by `10^decimals` and render six fractional digits,
/// rounding half up.
pub fn format_display(amount: u128, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let scale = 10u128.pow(decimals);
    let mut whole = amount / scale;
    let remainder = amount % scale;

    let fraction = if decimals <= DISPLAY_FRACTION_DIGITS {
        remainder * 10u128.pow(DISPLAY_FRACTION_DIGITS - decimals)
    } else {
        let divisor = 10u128.pow(decimals - DISPLAY_FRACTION_DIGITS);
        let mut fraction = remainder / divisor;
        if (remainder % divisor) * 2 >= divisor {
            fraction += 1;
            if fraction == 10u128.pow(DISPLAY_FRACTION_DIGITS) {
                fraction = 0;
                whole += 1;
            }
        }
        fraction
    };

    format!(
        "{}.{:0width$}",
        whole,
        fraction,
        width = DISPLAY_FRACTION_DIGITS as usize
    )
}
