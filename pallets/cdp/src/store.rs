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

//! Position store and its owner and collateral ratio indexes.

use crate::pallet::{
    AccountIdOf, CdpIdsByOwner, CdpOf, Cdps, CollateralRatioIndex, Config, IndexedCollateralRatios,
    NextCdpId, Pallet,
};
use crate::types::{CdpId, CollateralRatioKey};
use sp_arithmetic::{FixedPointNumber, FixedU128};
use sp_std::vec::Vec;

impl<T: Config> Pallet<T> {
    /// Inserts or replaces the position.
    pub fn set_cdp(cdp: &CdpOf<T>) {
        Cdps::<T>::insert(cdp.collateral_asset_id, cdp.id, cdp);
    }

    /// Removes the position and its owner index entry. The collateral ratio index entry is
    /// left to the caller.
    pub fn delete_cdp(cdp: &CdpOf<T>) {
        Cdps::<T>::remove(cdp.collateral_asset_id, cdp.id);
        Self::remove_cdp_owner_index(cdp);
    }

    pub fn iter_cdps() -> impl Iterator<Item = CdpOf<T>> {
        Cdps::<T>::iter_values()
    }

    pub fn iter_cdps_by_denom(collateral_asset_id: &T::AssetId) -> impl Iterator<Item = CdpOf<T>> {
        Cdps::<T>::iter_prefix_values(collateral_asset_id)
    }

    pub fn all_cdps() -> Vec<CdpOf<T>> {
        Self::iter_cdps().collect()
    }

    pub fn all_cdps_by_denom(collateral_asset_id: &T::AssetId) -> Vec<CdpOf<T>> {
        Self::iter_cdps_by_denom(collateral_asset_id).collect()
    }

    pub fn next_cdp_id(collateral_asset_id: &T::AssetId) -> CdpId {
        NextCdpId::<T>::get(collateral_asset_id)
    }

    pub fn index_cdp_by_owner(cdp: &CdpOf<T>) {
        CdpIdsByOwner::<T>::insert(&cdp.owner, cdp.collateral_asset_id, cdp.id);
    }

    pub fn remove_cdp_owner_index(cdp: &CdpOf<T>) {
        CdpIdsByOwner::<T>::remove(&cdp.owner, cdp.collateral_asset_id);
    }

    pub fn cdp_by_owner_and_denom(
        owner: &AccountIdOf<T>,
        collateral_asset_id: &T::AssetId,
    ) -> Option<CdpOf<T>> {
        let cdp_id = Self::cdp_id_by_owner(owner, collateral_asset_id)?;
        Self::cdp(collateral_asset_id, cdp_id)
    }

    /// Ids of all positions of `owner` in ascending order, `None` if there are none.
    pub fn cdp_ids_by_owner(owner: &AccountIdOf<T>) -> Option<Vec<CdpId>> {
        let mut cdp_ids: Vec<CdpId> = CdpIdsByOwner::<T>::iter_prefix_values(owner).collect();
        if cdp_ids.is_empty() {
            return None;
        }
        cdp_ids.sort_unstable();
        Some(cdp_ids)
    }

    pub fn index_cdp_by_collateral_ratio(
        collateral_asset_id: &T::AssetId,
        cdp_id: CdpId,
        ratio: FixedU128,
    ) {
        CollateralRatioIndex::<T>::insert(
            collateral_asset_id,
            CollateralRatioKey::new(ratio, cdp_id),
            (),
        );
        IndexedCollateralRatios::<T>::insert(collateral_asset_id, cdp_id, ratio);
    }

    /// Removes the entry indexed under exactly `ratio`, nothing otherwise.
    pub fn remove_cdp_collateral_ratio_index(
        collateral_asset_id: &T::AssetId,
        cdp_id: CdpId,
        ratio: FixedU128,
    ) {
        let key = CollateralRatioKey::new(ratio, cdp_id);
        if !CollateralRatioIndex::<T>::contains_key(collateral_asset_id, key) {
            return;
        }
        CollateralRatioIndex::<T>::remove(collateral_asset_id, key);
        if IndexedCollateralRatios::<T>::get(collateral_asset_id, cdp_id) == Some(ratio) {
            IndexedCollateralRatios::<T>::remove(collateral_asset_id, cdp_id);
        }
    }

    /// Ids of positions with a positive indexed ratio strictly below `ratio`, lowest ratio
    /// first, ties by id.
    pub fn cdp_ids_by_denom_and_ratio(
        collateral_asset_id: &T::AssetId,
        ratio: FixedU128,
    ) -> Vec<CdpId> {
        CollateralRatioIndex::<T>::iter_key_prefix(collateral_asset_id)
            .take_while(|key| key.ratio() < ratio)
            .filter(|key| key.ratio().into_inner() > 0)
            .map(|key| key.cdp_id())
            .collect()
    }

    /// Positions found by [`Self::cdp_ids_by_denom_and_ratio`]. Entries without a stored
    /// position are skipped.
    pub fn cdps_by_denom_and_ratio(
        collateral_asset_id: &T::AssetId,
        ratio: FixedU128,
    ) -> Vec<CdpOf<T>> {
        Self::cdp_ids_by_denom_and_ratio(collateral_asset_id, ratio)
            .into_iter()
            .filter_map(|cdp_id| Self::cdp(collateral_asset_id, cdp_id))
            .collect()
    }

    /// Persists the position and moves its ratio index entry to `ratio`.
    pub fn update_cdp_and_collateral_ratio_index(cdp: &CdpOf<T>, ratio: FixedU128) {
        Self::remove_indexed_collateral_ratio(&cdp.collateral_asset_id, cdp.id);
        Self::set_cdp(cdp);
        Self::index_cdp_by_collateral_ratio(&cdp.collateral_asset_id, cdp.id, ratio);
    }

    /// Deletes the position with both of its index entries.
    pub fn delete_cdp_and_collateral_ratio_index(cdp: &CdpOf<T>) {
        Self::remove_indexed_collateral_ratio(&cdp.collateral_asset_id, cdp.id);
        Self::delete_cdp(cdp);
    }

    fn remove_indexed_collateral_ratio(collateral_asset_id: &T::AssetId, cdp_id: CdpId) {
        if let Some(ratio) = IndexedCollateralRatios::<T>::get(collateral_asset_id, cdp_id) {
            Self::remove_cdp_collateral_ratio_index(collateral_asset_id, cdp_id, ratio);
        }
    }
}
