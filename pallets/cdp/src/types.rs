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

use crate::Balance;
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_arithmetic::{ArithmeticError, FixedPointNumber, FixedU128};
use sp_std::collections::btree_map::BTreeMap;
use sp_std::collections::btree_set::BTreeSet;
use sp_std::vec::Vec;

/// Identifier of a position, unique within its collateral asset
pub type CdpId = u64;

/// Amounts keyed by asset. Zero amounts are never stored.
pub type Coins<AssetId> = BTreeMap<AssetId, Balance>;

/// Drops zero entries.
pub fn normalize_coins<AssetId: Ord>(coins: Coins<AssetId>) -> Coins<AssetId> {
    coins.into_iter().filter(|(_, amount)| *amount > 0).collect()
}

/// Adds `other` into `coins`.
pub fn add_coins<AssetId: Ord + Copy>(
    coins: &mut Coins<AssetId>,
    other: &Coins<AssetId>,
) -> Result<(), ArithmeticError> {
    for (asset_id, amount) in other.iter().filter(|(_, amount)| **amount > 0) {
        let entry = coins.entry(*asset_id).or_insert(0);
        *entry = entry.checked_add(*amount).ok_or(ArithmeticError::Overflow)?;
    }
    Ok(())
}

/// Subtracts `other` from `coins`, removing entries which reach zero.
pub fn sub_coins<AssetId: Ord + Copy>(
    coins: &mut Coins<AssetId>,
    other: &Coins<AssetId>,
) -> Result<(), ArithmeticError> {
    for (asset_id, amount) in other.iter().filter(|(_, amount)| **amount > 0) {
        let left = coins
            .get(asset_id)
            .copied()
            .unwrap_or_default()
            .checked_sub(*amount)
            .ok_or(ArithmeticError::Underflow)?;
        if left == 0 {
            coins.remove(asset_id);
        } else {
            coins.insert(*asset_id, left);
        }
    }
    Ok(())
}

/// Sum of all amounts regardless of the asset.
pub fn coins_total<AssetId>(coins: &Coins<AssetId>) -> Result<Balance, ArithmeticError> {
    coins.values().try_fold(0, |total: Balance, amount| {
        total.checked_add(*amount).ok_or(ArithmeticError::Overflow)
    })
}

/// CDP - Collateralized Debt Position. A single collateral asset backs debt in one or more
/// debt assets.
#[derive(Debug, Clone, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct CollateralizedDebtPosition<AccountId, AssetId, Moment> {
    pub id: CdpId,

    /// CDP owner
    pub owner: AccountId,

    /// Collateral
    pub collateral_asset_id: AssetId,
    pub collateral_amount: Balance,

    /// Outstanding debt per debt asset, fees excluded
    pub principal: Coins<AssetId>,

    /// Fees owed on top of principal
    pub accumulated_fees: Coins<AssetId>,

    /// Creation time or the time fees were last added
    pub fees_updated: Moment,
}

impl<AccountId, AssetId, Moment> CollateralizedDebtPosition<AccountId, AssetId, Moment>
where
    AssetId: Ord + Copy,
{
    pub fn new(
        id: CdpId,
        owner: AccountId,
        collateral_asset_id: AssetId,
        collateral_amount: Balance,
        principal: Coins<AssetId>,
        fees_updated: Moment,
    ) -> Self {
        Self {
            id,
            owner,
            collateral_asset_id,
            collateral_amount,
            principal,
            accumulated_fees: Coins::new(),
            fees_updated,
        }
    }

    /// Locked collateral as coins.
    pub fn collateral(&self) -> Coins<AssetId> {
        let mut collateral = Coins::new();
        if self.collateral_amount > 0 {
            collateral.insert(self.collateral_asset_id, self.collateral_amount);
        }
        collateral
    }

    /// Principal plus accumulated fees.
    pub fn total_owed(&self) -> Result<Coins<AssetId>, ArithmeticError> {
        let mut owed = self.principal.clone();
        add_coins(&mut owed, &self.accumulated_fees)?;
        Ok(owed)
    }
}

/// Risk parameters of a collateral asset.
#[derive(Debug, Clone, Encode, Decode, TypeInfo, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct CollateralParam<AssetId> {
    pub asset_id: AssetId,

    /// Hard cap of principal, over all debt assets, backed by this collateral
    pub debt_limit: Balance,

    /// Inactive collateral can not back new positions or new debt
    pub active: bool,

    /// Minimal collateralization ratio
    pub liquidation_ratio: FixedU128,

    /// Fee rate per second
    pub stability_fee: FixedU128,
}

/// Debt asset which positions may mint.
#[derive(Debug, Clone, Encode, Decode, TypeInfo, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct DebtParam<AssetId> {
    pub asset_id: AssetId,

    /// Hard cap of outstanding principal in this asset
    pub debt_limit: Balance,
}

/// Governance parameters.
#[derive(Debug, Clone, Encode, Decode, TypeInfo, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct CdpParams<AssetId> {
    pub collateral_params: Vec<CollateralParam<AssetId>>,
    pub debt_params: Vec<DebtParam<AssetId>>,
}

impl<AssetId> Default for CdpParams<AssetId> {
    fn default() -> Self {
        Self {
            collateral_params: Vec::new(),
            debt_params: Vec::new(),
        }
    }
}

impl<AssetId: Ord + Copy> CdpParams<AssetId> {
    pub fn collateral_param(&self, asset_id: &AssetId) -> Option<&CollateralParam<AssetId>> {
        self.collateral_params
            .iter()
            .find(|param| param.asset_id == *asset_id)
    }

    pub fn debt_param(&self, asset_id: &AssetId) -> Option<&DebtParam<AssetId>> {
        self.debt_params
            .iter()
            .find(|param| param.asset_id == *asset_id)
    }

    /// Checks that assets are listed once, an asset is not both collateral and debt and every
    /// liquidation ratio is positive.
    pub fn validate(&self) -> bool {
        let mut collateral_assets = BTreeSet::new();
        for param in self.collateral_params.iter() {
            let duplicated = !collateral_assets.insert(param.asset_id);
            if duplicated || param.liquidation_ratio.into_inner() == 0 {
                return false;
            }
        }
        let mut debt_assets = BTreeSet::new();
        for param in self.debt_params.iter() {
            if !debt_assets.insert(param.asset_id) || collateral_assets.contains(&param.asset_id) {
                return false;
            }
        }
        true
    }
}

/// Key of the collateral ratio index.
///
/// Both parts are stored big-endian, so the byte order of encoded keys equals the numeric
/// order of (ratio, cdp id). The index relies on it for range scans.
#[derive(
    Debug, Clone, Copy, Encode, Decode, MaxEncodedLen, TypeInfo, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct CollateralRatioKey {
    ratio: [u8; 16],
    cdp_id: [u8; 8],
}

impl CollateralRatioKey {
    pub fn new(ratio: FixedU128, cdp_id: CdpId) -> Self {
        Self {
            ratio: ratio.into_inner().to_be_bytes(),
            cdp_id: cdp_id.to_be_bytes(),
        }
    }

    pub fn ratio(&self) -> FixedU128 {
        FixedU128::from_inner(u128::from_be_bytes(self.ratio))
    }

    pub fn cdp_id(&self) -> CdpId {
        CdpId::from_be_bytes(self.cdp_id)
    }
}
