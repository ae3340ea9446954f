/*!
 * Access Decision Engine
 * Evaluates one ACE against a requested right and optional object-type scope
 */

use uuid::Uuid;

use super::rights::NULL_GUID;
use super::types::{AccessMask, Ace, SecurityDescriptor};
use crate::ledger::MembershipView;
use crate::model::{Object, ObjectIndex, Sid};

/// Decision primitive shared by every ACL-inspecting rule.
///
/// Holds the object index for trustee SID resolution and the membership
/// view for transitive group matching; both are read-only for the lifetime
/// of a rule pass.
pub struct AccessEngine<'a> {
    index: &'a ObjectIndex,
    membership: &'a MembershipView,
}

impl<'a> AccessEngine<'a> {
    pub fn new(index: &'a ObjectIndex, membership: &'a MembershipView) -> Self {
        Self { index, membership }
    }

    /// Does the entry at `entry_index` effectively grant `right` (scoped to
    /// `scope`) to its trustee?
    ///
    /// A deny entry at a lower index covering the same trustee, right and
    /// scope vetoes the grant; ACL ordering places explicit denies first, so
    /// scanning the prefix is the full deny check. `object` is the entry's
    /// owning object, used to resolve the Self principal.
    pub fn allows(
        &self,
        descriptor: &SecurityDescriptor,
        entry_index: usize,
        object: &Object,
        right: AccessMask,
        scope: Uuid,
    ) -> bool {
        let Some(entry) = descriptor.dacl.get(entry_index) else {
            return false;
        };
        if !entry.kind.is_allow() {
            return false;
        }
        if !entry.mask.contains(right) {
            return false;
        }
        if entry.kind.is_object_scoped() && !scope_matches(entry, scope) {
            return false;
        }

        for prior in &descriptor.dacl[..entry_index] {
            if !prior.kind.is_deny() {
                continue;
            }
            if !prior.mask.contains(right) {
                continue;
            }
            if prior.kind.is_object_scoped() && !scope_matches(prior, scope) {
                continue;
            }
            if self.trustee_covers(&prior.trustee, &entry.trustee, object) {
                return false;
            }
        }
        true
    }

    /// Does an entry naming `entry_trustee` apply to `principal`?
    ///
    /// Matches on identity, the always-applicable well-known principals,
    /// Self (when the principal is the owning object itself), and transitive
    /// group membership resolved through the ledger's member-of facts.
    fn trustee_covers(&self, entry_trustee: &Sid, principal: &Sid, object: &Object) -> bool {
        if entry_trustee == principal {
            return true;
        }
        if *entry_trustee == Sid::everyone() || *entry_trustee == Sid::authenticated_users() {
            return true;
        }
        if *entry_trustee == Sid::self_principal() && object.sid() == Some(principal) {
            return true;
        }
        let Some(principal_id) = self.index.find_sid(principal) else {
            return false;
        };
        self.membership
            .groups_of(principal_id)
            .iter()
            .filter_map(|group| self.index.get(*group))
            .any(|group| group.sid() == Some(entry_trustee))
    }
}

/// Scope match for object-kind entries: the entry's type GUID must equal the
/// requested scope or be absent; the null-GUID scope matches only unscoped
/// entries.
fn scope_matches(entry: &Ace, scope: Uuid) -> bool {
    match entry.object_type {
        None => true,
        Some(entry_type) => scope != NULL_GUID && entry_type == scope,
    }
}
