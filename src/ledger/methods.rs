/*!
 * Compromise Methods
 * Closed enumeration of edge tags plus the bitset/probability structure
 */

use serde::{Deserialize, Serialize};

/// One way a source object can compromise a target object.
///
/// The enumeration is closed: every rule emits one of these tags, and the
/// expansion engine and exporters match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Method {
    CreateUser,
    CreateGroup,
    CreateComputer,
    CreateAnyObject,
    DeleteChildrenTarget,
    DeleteObject,
    InheritsSecurity,
    MemberOfGroup,
    /// Informational indicator only, never a traversable capability
    AclContainsDeny,
    Owns,
    GenericAll,
    WriteAll,
    WritePropertyAll,
    WriteExtendedAll,
    TakeOwnership,
    WriteDacl,
    WriteAttributeSecurityGuid,
    ResetPassword,
    HasSpn,
    HasSpnNoPreauth,
    WriteSpn,
    WriteValidatedSpn,
    WriteAllowedToAct,
    AddMember,
    AddMemberGroupAttr,
    AddSelfMember,
    ReadMsaPassword,
    WriteAltSecurityIdentities,
    WriteProfilePath,
    WriteScriptPath,
    HasMsa,
    WriteKeyCredentialLink,
    SidHistoryEquality,
    AllExtendedRights,
    LocalAdminRights,
    LocalRdpRights,
    LocalDcomRights,
    CertificateEnroll,
    ScheduledTask,
    MachineScript,
    GpoAffectsComputer,
    GpoMachineConfig,
    GpoUserConfig,
}

impl Method {
    pub const COUNT: usize = 43;

    /// Every method, in bit order
    pub const ALL: [Method; Method::COUNT] = [
        Method::CreateUser,
        Method::CreateGroup,
        Method::CreateComputer,
        Method::CreateAnyObject,
        Method::DeleteChildrenTarget,
        Method::DeleteObject,
        Method::InheritsSecurity,
        Method::MemberOfGroup,
        Method::AclContainsDeny,
        Method::Owns,
        Method::GenericAll,
        Method::WriteAll,
        Method::WritePropertyAll,
        Method::WriteExtendedAll,
        Method::TakeOwnership,
        Method::WriteDacl,
        Method::WriteAttributeSecurityGuid,
        Method::ResetPassword,
        Method::HasSpn,
        Method::HasSpnNoPreauth,
        Method::WriteSpn,
        Method::WriteValidatedSpn,
        Method::WriteAllowedToAct,
        Method::AddMember,
        Method::AddMemberGroupAttr,
        Method::AddSelfMember,
        Method::ReadMsaPassword,
        Method::WriteAltSecurityIdentities,
        Method::WriteProfilePath,
        Method::WriteScriptPath,
        Method::HasMsa,
        Method::WriteKeyCredentialLink,
        Method::SidHistoryEquality,
        Method::AllExtendedRights,
        Method::LocalAdminRights,
        Method::LocalRdpRights,
        Method::LocalDcomRights,
        Method::CertificateEnroll,
        Method::ScheduledTask,
        Method::MachineScript,
        Method::GpoAffectsComputer,
        Method::GpoMachineConfig,
        Method::GpoUserConfig,
    ];

    pub fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Plain bitmask over methods, used for enable/intersect filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMask(pub u64);

impl MethodMask {
    pub fn none() -> Self {
        MethodMask(0)
    }

    pub fn all() -> Self {
        // Every defined method bit set
        MethodMask((1u64 << Method::COUNT) - 1)
    }

    pub fn with(self, method: Method) -> Self {
        MethodMask(self.0 | method.bit())
    }

    pub fn without(self, method: Method) -> Self {
        MethodMask(self.0 & !method.bit())
    }

    pub fn contains(self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// True if the only set bit is the deny indicator
    pub fn is_only_deny_indicator(self) -> bool {
        self.0 == Method::AclContainsDeny.bit()
    }
}

impl Default for MethodMask {
    fn default() -> Self {
        MethodMask::all()
    }
}

impl FromIterator<Method> for MethodMask {
    fn from_iter<T: IntoIterator<Item = Method>>(iter: T) -> Self {
        iter.into_iter().fold(MethodMask::none(), MethodMask::with)
    }
}

/// Method tags on one edge plus their per-method success probability.
///
/// Probabilities are heuristic severity weights on a 0-100 scale, treated
/// as opaque ordinals for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSet {
    bits: u64,
    probs: [u8; Method::COUNT],
}

impl MethodSet {
    pub fn new() -> Self {
        Self {
            bits: 0,
            probs: [0; Method::COUNT],
        }
    }

    /// Tag the set with a method at the given probability.
    ///
    /// A later call for the same method overwrites only that method's
    /// probability; sibling methods keep theirs.
    pub fn set(&mut self, method: Method, probability: u8) {
        self.bits |= method.bit();
        self.probs[method as u8 as usize] = probability;
    }

    pub fn contains(&self, method: Method) -> bool {
        self.bits & method.bit() != 0
    }

    pub fn probability(&self, method: Method) -> Option<u8> {
        self.contains(method).then(|| self.probs[method as u8 as usize])
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Bitmask of methods shared with `mask`
    pub fn intersect(&self, mask: MethodMask) -> MethodMask {
        MethodMask(self.bits & mask.0)
    }

    /// Copy of this set restricted to methods in `mask`
    pub fn filtered(&self, mask: MethodMask) -> MethodSet {
        let mut out = MethodSet::new();
        for (method, probability) in self.iter() {
            if mask.contains(method) {
                out.set(method, probability);
            }
        }
        out
    }

    /// Merge another set in; on shared methods the other set's probability
    /// wins (last write semantics, matching `set`)
    pub fn union(&mut self, other: &MethodSet) {
        for (method, probability) in other.iter() {
            self.set(method, probability);
        }
    }

    /// Highest probability across all tagged methods, 0 if empty
    pub fn max_probability(&self) -> u8 {
        self.iter().map(|(_, p)| p).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, u8)> + '_ {
        Method::ALL
            .iter()
            .copied()
            .filter(|m| self.contains(*m))
            .map(|m| (m, self.probs[m as u8 as usize]))
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_positions_are_unique() {
        let mut seen = 0u64;
        for method in Method::ALL {
            assert_eq!(seen & method.bit(), 0, "{method} reuses a bit");
            seen |= method.bit();
        }
        assert_eq!(seen, MethodMask::all().0);
    }

    #[test]
    fn test_set_overwrites_only_its_method() {
        let mut set = MethodSet::new();
        set.set(Method::AddMember, 100);
        set.set(Method::WriteDacl, 80);
        set.set(Method::AddMember, 40);
        assert_eq!(set.probability(Method::AddMember), Some(40));
        assert_eq!(set.probability(Method::WriteDacl), Some(80));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_intersect_and_filter() {
        let mut set = MethodSet::new();
        set.set(Method::GenericAll, 100);
        set.set(Method::AclContainsDeny, 0);

        let mask = MethodMask::none().with(Method::AclContainsDeny);
        assert!(set.intersect(mask).is_only_deny_indicator());

        let filtered = set.filtered(MethodMask::none().with(Method::GenericAll));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.probability(Method::GenericAll), Some(100));
    }

    #[test]
    fn test_max_probability() {
        let mut set = MethodSet::new();
        assert_eq!(set.max_probability(), 0);
        set.set(Method::WriteSpn, 30);
        set.set(Method::ResetPassword, 100);
        assert_eq!(set.max_probability(), 100);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn filtered_is_a_subset_preserving_probabilities(
                tags in proptest::collection::vec((0usize..Method::COUNT, 0u8..=100), 0..16),
                mask_bits in 0u64..(1u64 << Method::COUNT),
            ) {
                let mut set = MethodSet::new();
                for (i, p) in &tags {
                    set.set(Method::ALL[*i], *p);
                }
                let mask = MethodMask(mask_bits);
                let filtered = set.filtered(mask);
                for (method, probability) in filtered.iter() {
                    prop_assert!(mask.contains(method));
                    prop_assert_eq!(set.probability(method), Some(probability));
                }
                prop_assert!(filtered.max_probability() <= set.max_probability());
                prop_assert_eq!(filtered.intersect(mask).count(), filtered.len());
            }

            #[test]
            fn union_keeps_every_tag(
                left in proptest::collection::vec((0usize..Method::COUNT, 0u8..=100), 0..16),
                right in proptest::collection::vec((0usize..Method::COUNT, 0u8..=100), 0..16),
            ) {
                let mut a = MethodSet::new();
                for (i, p) in &left {
                    a.set(Method::ALL[*i], *p);
                }
                let mut b = MethodSet::new();
                for (i, p) in &right {
                    b.set(Method::ALL[*i], *p);
                }
                let mut merged = a;
                merged.union(&b);
                for (method, probability) in b.iter() {
                    prop_assert_eq!(merged.probability(method), Some(probability));
                }
                for (method, _) in a.iter() {
                    prop_assert!(merged.contains(method));
                }
            }
        }
    }
}
