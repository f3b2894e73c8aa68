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

use frame_support::traits::Get;
use frame_support::weights::Weight;
use sp_std::marker::PhantomData;

pub trait WeightInfo {
    fn create_cdp() -> Weight {
        Weight::zero()
    }
    fn deposit_collateral() -> Weight {
        Weight::zero()
    }
    fn withdraw_collateral() -> Weight {
        Weight::zero()
    }
    fn draw_debt() -> Weight {
        Weight::zero()
    }
    fn repay_debt() -> Weight {
        Weight::zero()
    }
    fn set_params() -> Weight {
        Weight::zero()
    }
    fn accrue_fees(_collaterals: u32, _cdps: u32) -> Weight {
        Weight::zero()
    }
}

impl WeightInfo for () {}

/// Weights by storage access count, until the pallet is benchmarked.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn create_cdp() -> Weight {
        T::DbWeight::get().reads_writes(12, 12)
    }
    fn deposit_collateral() -> Weight {
        T::DbWeight::get().reads_writes(8, 6)
    }
    fn withdraw_collateral() -> Weight {
        T::DbWeight::get().reads_writes(8, 6)
    }
    fn draw_debt() -> Weight {
        T::DbWeight::get().reads_writes(12, 10)
    }
    fn repay_debt() -> Weight {
        T::DbWeight::get().reads_writes(12, 12)
    }
    fn set_params() -> Weight {
        T::DbWeight::get().writes(1)
    }
    /// Params and previous block time, then one index scan per collateral and the
    /// storage of every updated position.
    fn accrue_fees(collaterals: u32, cdps: u32) -> Weight {
        T::DbWeight::get()
            .reads_writes(2, 1)
            .saturating_add(T::DbWeight::get().reads(2 * collaterals as u64))
            .saturating_add(T::DbWeight::get().reads_writes(6 * cdps as u64, 6 * cdps as u64))
    }
}
