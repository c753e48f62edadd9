//! Follow identities and save lists.
//!
//! Both are stakes on a triple. When the triple already exists its vault is
//! deposited into; otherwise it is created with the stake as initial deposit.

use super::stake::{stake_args, stake_value, StakeMode};
use super::{keys, TripleRef, WriteDescriptor};
use crate::algorithms::parse_ether;
use crate::domain::{functions, AbiValue, Address, QueryKey, TxError, U256};

/// Stake on a claim identified by id, or by its atoms when not yet created.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ClaimStake {
    mode: StakeMode,
    triple: TripleRef,
    claim_id: Option<U256>,
    triple_cost: U256,
    amount: String,
}

impl ClaimStake {
    fn function(&self) -> &'static str {
        match (self.mode, self.claim_id) {
            (StakeMode::Deposit, Some(_)) => functions::DEPOSIT_TRIPLE,
            (StakeMode::Deposit, None) => functions::CREATE_TRIPLE,
            (StakeMode::Redeem, _) => functions::REDEEM_TRIPLE,
        }
    }

    fn args(&self, sender: Address) -> Result<Vec<AbiValue>, TxError> {
        match (self.mode, self.claim_id) {
            (mode, Some(id)) => stake_args(mode, sender, id, &self.amount),
            (StakeMode::Deposit, None) => Ok(self.triple.to_args()),
            (StakeMode::Redeem, None) => Err(TxError::encoding(
                functions::REDEEM_TRIPLE,
                "no existing claim to redeem from",
            )),
        }
    }

    fn value(&self) -> Result<U256, TxError> {
        match (self.mode, self.claim_id) {
            (StakeMode::Deposit, None) => self
                .triple_cost
                .checked_add(parse_ether(&self.amount)?)
                .ok_or_else(|| TxError::InvalidAmount("cost plus deposit overflows".to_string())),
            (mode, _) => stake_value(mode, &self.amount),
        }
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        let claim_key = match self.claim_id {
            Some(id) => keys::vault(id),
            None => keys::triples(),
        };
        vec![claim_key, keys::positions(sender)]
    }
}

/// Follow or unfollow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowMode {
    /// Stake on `(I, follow, target)`.
    Follow,
    /// Redeem that stake.
    Unfollow,
}

/// Follow an identity by staking on `(I, follow, target)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Follow {
    claim: ClaimStake,
}

impl Follow {
    /// `self_atom` follows `target` through `follow_predicate`.
    ///
    /// `claim_id` is the existing follow triple, if any.
    pub fn new(
        mode: FollowMode,
        self_atom: U256,
        follow_predicate: U256,
        target: U256,
        claim_id: Option<U256>,
        triple_cost: U256,
        amount: impl Into<String>,
    ) -> Self {
        let mode = match mode {
            FollowMode::Follow => StakeMode::Deposit,
            FollowMode::Unfollow => StakeMode::Redeem,
        };
        Self {
            claim: ClaimStake {
                mode,
                triple: TripleRef::new(self_atom, follow_predicate, target),
                claim_id,
                triple_cost,
                amount: amount.into(),
            },
        }
    }
}

impl WriteDescriptor for Follow {
    fn function(&self) -> &'static str {
        self.claim.function()
    }

    fn args(&self, sender: Address) -> Result<Vec<AbiValue>, TxError> {
        self.claim.args(sender)
    }

    fn value(&self) -> Result<U256, TxError> {
        self.claim.value()
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        let mut stale = self.claim.invalidates(sender);
        stale.push(keys::following(sender));
        stale
    }
}

/// Save or unsave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    /// Stake on `(identity, has-tag, list)`.
    Save,
    /// Redeem that stake.
    Unsave,
}

/// Save a list by staking on `(identity, has-tag, list)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveList {
    claim: ClaimStake,
}

impl SaveList {
    /// Tag `identity` with `list` through `has_tag_predicate`.
    ///
    /// `claim_id` is the existing tag triple, if any.
    pub fn new(
        mode: SaveMode,
        identity: U256,
        has_tag_predicate: U256,
        list: U256,
        claim_id: Option<U256>,
        triple_cost: U256,
        amount: impl Into<String>,
    ) -> Self {
        let mode = match mode {
            SaveMode::Save => StakeMode::Deposit,
            SaveMode::Unsave => StakeMode::Redeem,
        };
        Self {
            claim: ClaimStake {
                mode,
                triple: TripleRef::new(identity, has_tag_predicate, list),
                claim_id,
                triple_cost,
                amount: amount.into(),
            },
        }
    }
}

impl WriteDescriptor for SaveList {
    fn function(&self) -> &'static str {
        self.claim.function()
    }

    fn args(&self, sender: Address) -> Result<Vec<AbiValue>, TxError> {
        self.claim.args(sender)
    }

    fn value(&self) -> Result<U256, TxError> {
        self.claim.value()
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        let mut stale = self.claim.invalidates(sender);
        stale.push(keys::saved_lists(sender));
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: Address = Address::new([0x11; 20]);
    const CONTRACT: Address = Address::new([0x99; 20]);

    fn ids() -> (U256, U256, U256) {
        (U256::from(1u64), U256::from(2u64), U256::from(3u64))
    }

    #[test]
    fn test_follow_without_claim_creates_triple() {
        let (me, follows, target) = ids();
        let follow = Follow::new(
            FollowMode::Follow,
            me,
            follows,
            target,
            None,
            U256::from(400u64),
            "0.001",
        );

        let request = follow.build_request(CONTRACT, USER).unwrap();
        assert_eq!(request.function, "createTriple");
        assert_eq!(request.args, TripleRef::new(me, follows, target).to_args());
        assert_eq!(request.value, U256::from(1_000_000_000_000_400u64));
        assert!(request.invalidate.contains(&keys::triples()));
        assert!(request.invalidate.contains(&keys::following(USER)));
    }

    #[test]
    fn test_follow_with_claim_deposits() {
        let (me, follows, target) = ids();
        let claim = U256::from(77u64);
        let follow = Follow::new(
            FollowMode::Follow,
            me,
            follows,
            target,
            Some(claim),
            U256::from(400u64),
            "1",
        );

        let request = follow.build_request(CONTRACT, USER).unwrap();
        assert_eq!(request.function, "depositTriple");
        assert_eq!(
            request.args,
            vec![AbiValue::Address(USER), AbiValue::Uint(claim)]
        );
        assert_eq!(request.value, U256::from(1_000_000_000_000_000_000u64));
        assert!(request.invalidate.contains(&keys::vault(claim)));
    }

    #[test]
    fn test_unfollow_redeems_shares() {
        let (me, follows, target) = ids();
        let claim = U256::from(77u64);
        let unfollow = Follow::new(
            FollowMode::Unfollow,
            me,
            follows,
            target,
            Some(claim),
            U256::zero(),
            "2",
        );

        let request = unfollow.build_request(CONTRACT, USER).unwrap();
        assert_eq!(request.function, "redeemTriple");
        assert!(request.value.is_zero());
        assert_eq!(
            request.args[0],
            AbiValue::Uint(U256::from(2_000_000_000_000_000_000u64))
        );
    }

    #[test]
    fn test_unfollow_without_claim_fails() {
        let (me, follows, target) = ids();
        let unfollow = Follow::new(
            FollowMode::Unfollow,
            me,
            follows,
            target,
            None,
            U256::zero(),
            "1",
        );
        assert!(matches!(
            unfollow.build_request(CONTRACT, USER),
            Err(TxError::EncodingError { .. })
        ));
    }

    #[test]
    fn test_save_list_paths() {
        let (identity, has_tag, list) = ids();
        let save = SaveList::new(
            SaveMode::Save,
            identity,
            has_tag,
            list,
            None,
            U256::from(400u64),
            "",
        );
        assert_eq!(save.function(), "createTriple");
        assert_eq!(save.value().unwrap(), U256::from(400u64));
        assert!(save.invalidates(USER).contains(&keys::saved_lists(USER)));

        let unsave = SaveList::new(
            SaveMode::Unsave,
            identity,
            has_tag,
            list,
            Some(U256::from(5u64)),
            U256::from(400u64),
            "",
        );
        assert_eq!(unsave.function(), "redeemTriple");
        assert!(unsave.value().unwrap().is_zero());
    }
}
