// This file is part of the SORA network and Polkaswap app.

// Copyright (c) 2020, 2021, Polka Biome Ltd. All rights reserved.
// SPDX-License-Identifier: BSD-4-Clause

// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:

// Redistributions of source code must retain the above copyright notice, this list
// of conditions and the following disclaimer.
// Redistributions in binary form must reproduce the above copyright notice, this
// list of conditions and the following disclaimer in the documentation and/or other
// materials provided with the distribution.
//
// All advertising materials mentioning features or use of this software must display
// the following acknowledgement: This product includes software developed by Polka Biome
// Ltd., SORA, and Polkaswap.
//
// Neither the name of the Polka Biome Ltd. nor the names of its contributors may be used
// to endorse or promote products derived from this software without specific prior written permission.

// THIS SOFTWARE IS PROVIDED BY Polka Biome Ltd. AS IS AND ANY EXPRESS OR IMPLIED WARRANTIES,
// INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL Polka Biome Ltd. BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING,
// BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS;
// OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
// USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Fixed point helpers over [`FixedU128`].
//!
//! Every amount that moves value is either an integer [`Balance`] in the smallest unit of an
//! asset or a `FixedU128` with 18 decimal places. Products and quotients are computed on a
//! 256-bit intermediate, so the only rounding is the one each helper names.

use crate::Balance;
use sp_arithmetic::{ArithmeticError, FixedPointNumber, FixedU128};
use sp_core::U256;

fn accuracy() -> U256 {
    U256::from(FixedU128::DIV)
}

fn to_inner(value: U256) -> Result<u128, ArithmeticError> {
    if value > U256::from(u128::MAX) {
        Err(ArithmeticError::Overflow)
    } else {
        Ok(value.low_u128())
    }
}

fn mul_div(a: u128, b: u128, c: U256, round_up_half: bool) -> Result<u128, ArithmeticError> {
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(ArithmeticError::Overflow)?;
    let product = if round_up_half {
        product
            .checked_add(c / 2)
            .ok_or(ArithmeticError::Overflow)?
    } else {
        product
    };
    to_inner(product / c)
}

pub fn add(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    a.into_inner()
        .checked_add(b.into_inner())
        .map(FixedU128::from_inner)
        .ok_or(ArithmeticError::Overflow)
}

pub fn sub(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    a.into_inner()
        .checked_sub(b.into_inner())
        .map(FixedU128::from_inner)
        .ok_or(ArithmeticError::Underflow)
}

/// `a * b`, rounded half up to the last decimal place.
pub fn mul(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    mul_div(a.into_inner(), b.into_inner(), accuracy(), true).map(FixedU128::from_inner)
}

/// `a * b`, truncated.
pub fn mul_truncate(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    mul_div(a.into_inner(), b.into_inner(), accuracy(), false).map(FixedU128::from_inner)
}

/// `a / b`, rounded half up to the last decimal place.
pub fn quo(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    if b.into_inner() == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    mul_div(a.into_inner(), FixedU128::DIV, U256::from(b.into_inner()), true)
        .map(FixedU128::from_inner)
}

/// `a / b`, truncated.
pub fn quo_truncate(a: FixedU128, b: FixedU128) -> Result<FixedU128, ArithmeticError> {
    if b.into_inner() == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    mul_div(a.into_inner(), FixedU128::DIV, U256::from(b.into_inner()), false)
        .map(FixedU128::from_inner)
}

/// Integer amount as a decimal, `5` becomes `5.0`.
pub fn from_balance(amount: Balance) -> Result<FixedU128, ArithmeticError> {
    amount
        .checked_mul(FixedU128::DIV)
        .map(FixedU128::from_inner)
        .ok_or(ArithmeticError::Overflow)
}

/// `amount * multiplier`, truncated to a whole unit.
pub fn mul_balance_truncate(
    multiplier: FixedU128,
    amount: Balance,
) -> Result<Balance, ArithmeticError> {
    mul_div(amount, multiplier.into_inner(), accuracy(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(inner: u128) -> FixedU128 {
        FixedU128::from_inner(inner)
    }

    fn int(n: u128) -> FixedU128 {
        FixedU128::saturating_from_integer(n)
    }

    #[test]
    fn test_add_sub() {
        let a = FixedU128::saturating_from_rational(3, 2);
        let b = FixedU128::saturating_from_rational(1, 4);
        assert_eq!(add(a, b), Ok(FixedU128::saturating_from_rational(7, 4)));
        assert_eq!(sub(a, b), Ok(FixedU128::saturating_from_rational(5, 4)));
        assert_eq!(sub(b, a), Err(ArithmeticError::Underflow));
        assert_eq!(
            add(FixedU128::from_inner(u128::MAX), d(1)),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn test_mul_rounding() {
        // 0.000000000000000005 * 0.5 = 0.0000000000000000025
        let half = FixedU128::saturating_from_rational(1, 2);
        assert_eq!(mul(d(5), half), Ok(d(3)));
        assert_eq!(mul_truncate(d(5), half), Ok(d(2)));
        assert_eq!(mul(int(12), FixedU128::saturating_from_rational(1, 4)), Ok(int(3)));
    }

    #[test]
    fn test_quo() {
        let third = quo_truncate(int(1), int(3)).unwrap();
        assert_eq!(third, d(333_333_333_333_333_333));
        let two_thirds = quo(int(2), int(3)).unwrap();
        assert_eq!(two_thirds, d(666_666_666_666_666_667));
        let two_thirds = quo_truncate(int(2), int(3)).unwrap();
        assert_eq!(two_thirds, d(666_666_666_666_666_666));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            quo(int(1), FixedU128::from_inner(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            quo_truncate(FixedU128::from_inner(0), FixedU128::from_inner(0)),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn test_balance_conversions() {
        assert_eq!(from_balance(100), Ok(int(100)));
        assert_eq!(from_balance(u128::MAX), Err(ArithmeticError::Overflow));
        // 10 * 0.15 = 1.5, truncated to 1
        assert_eq!(
            mul_balance_truncate(FixedU128::saturating_from_rational(15, 100), 10),
            Ok(1)
        );
        assert_eq!(
            mul_balance_truncate(FixedU128::saturating_from_integer(2), u128::MAX),
            Err(ArithmeticError::Overflow)
        );
    }
}
