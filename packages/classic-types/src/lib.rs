pub mod coins;
pub mod denom;
pub mod gas;
pub mod msgs;
pub mod tx;

mod extensions {
    use cosmwasm_std::{
        Decimal, Fraction, OverflowError, OverflowOperation, StdError, StdResult, Uint128, Uint256,
    };
    use std::cmp::Ordering;

    pub trait DecimalCheckedOps {
        fn checked_mul_uint(self, other: Uint128) -> StdResult<Uint128>;
        fn checked_mul_uint_ceil(self, other: Uint128) -> StdResult<Uint128>;
        fn checked_mul_uint_round(self, other: Uint128) -> StdResult<Uint128>;
    }

    impl DecimalCheckedOps for Decimal {
        /// `floor(self * other)`
        fn checked_mul_uint(self, other: Uint128) -> StdResult<Uint128> {
            if self.is_zero() || other.is_zero() {
                return Ok(Uint128::zero());
            }
            let product = other.full_mul(self.numerator()) / Uint256::from(self.denominator());
            narrow(product, self, other)
        }

        /// `ceil(self * other)`
        fn checked_mul_uint_ceil(self, other: Uint128) -> StdResult<Uint128> {
            if self.is_zero() || other.is_zero() {
                return Ok(Uint128::zero());
            }
            let numerator = other.full_mul(self.numerator());
            let denominator = Uint256::from(self.denominator());
            let mut product = numerator / denominator;
            if !(numerator % denominator).is_zero() {
                product += Uint256::one();
            }
            narrow(product, self, other)
        }

        /// `self * other` rounded to the nearest integer, ties to even.
        fn checked_mul_uint_round(self, other: Uint128) -> StdResult<Uint128> {
            if self.is_zero() || other.is_zero() {
                return Ok(Uint128::zero());
            }
            let product = round_half_even(
                other.full_mul(self.numerator()),
                Uint256::from(self.denominator()),
            );
            narrow(product, self, other)
        }
    }

    fn narrow(value: Uint256, lhs: Decimal, rhs: Uint128) -> StdResult<Uint128> {
        Uint128::try_from(value)
            .map_err(|_| StdError::overflow(OverflowError::new(OverflowOperation::Mul, lhs, rhs)))
    }

    /// Divides `numerator` by `denominator`, rounding half to even like the
    /// SDK's `Dec.RoundInt`. `denominator` must be non-zero.
    pub fn round_half_even(numerator: Uint256, denominator: Uint256) -> Uint256 {
        let two = Uint256::from(2u128);
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        match (remainder * two).cmp(&denominator) {
            Ordering::Greater => quotient + Uint256::one(),
            Ordering::Equal if quotient % two == Uint256::one() => quotient + Uint256::one(),
            _ => quotient,
        }
    }
}

pub use coins::Coins;
pub use extensions::{round_half_even, DecimalCheckedOps};
