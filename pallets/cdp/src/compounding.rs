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

use crate::decimal;
use crate::Balance;
use sp_arithmetic::traits::One;
use sp_arithmetic::{ArithmeticError, FixedPointNumber, FixedU128};

/// Discrete compounding of a per second factor
///
/// Computes `base ^ periods` by squaring, where every intermediate product is rounded half up
/// to 18 decimal places. The rounding is part of the protocol: summing many short periods and
/// computing one long period must agree within a small, bounded relative error, so this must
/// not be replaced with an exact or continuous formula.
pub fn relative_pow(base: FixedU128, periods: u64) -> Result<FixedU128, ArithmeticError> {
    if base.into_inner() == 0 {
        return Ok(if periods == 0 {
            FixedU128::one()
        } else {
            base
        });
    }
    let mut base = base;
    let mut result = if periods % 2 == 0 {
        FixedU128::one()
    } else {
        base
    };
    let mut periods = periods / 2;
    while periods > 0 {
        base = decimal::mul(base, base)?;
        if periods % 2 == 1 {
            result = decimal::mul(result, base)?;
        }
        periods /= 2;
    }
    Ok(result)
}

/// Returns fee accrued on `principal`
///
/// - principal - outstanding amount the fee is charged on
/// - rate - fee rate per second, `0.05` means 5% per second
/// - periods - elapsed time in seconds
///
/// `principal * ((1 + rate) ^ periods - 1)`, truncated to a whole unit.
pub fn accrued_fee(
    principal: Balance,
    rate: FixedU128,
    periods: u64,
) -> Result<Balance, ArithmeticError> {
    let accumulator = relative_pow(decimal::add(FixedU128::one(), rate)?, periods)?;
    let growth = decimal::sub(accumulator, FixedU128::one())?;
    decimal::mul_balance_truncate(growth, principal)
}
