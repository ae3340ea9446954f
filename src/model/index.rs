/*!
 * Object Index
 * Arena of directory objects with DN/SID lookup and synthetic insertion
 */

use ahash::{AHashSet, RandomState};
use dashmap::DashMap;
use log::warn;
use parking_lot::RwLock;
use std::sync::Arc;

use super::facts::GpoFacts;
use super::object::Object;
use super::types::{ObjectId, ObjectType, Sid};

/// The distinguished name of the attacker pseudo-object
pub const ATTACKER_DN: &str = "CN=Attacker,CN=synthetic";

/// Arena-backed object index.
///
/// Objects get a stable `ObjectId` on insertion and are shared as
/// `Arc<Object>`; lookups go through DN and SID maps. The index is safe to
/// share across rule invocations; synthetic insertion takes the arena write
/// lock and must not race with enumeration of the same pass (enumeration
/// snapshots the id range up front).
pub struct ObjectIndex {
    objects: RwLock<Vec<Arc<Object>>>,
    by_dn: DashMap<String, ObjectId, RandomState>,
    by_sid: DashMap<Sid, ObjectId, RandomState>,
    gpo_facts: DashMap<ObjectId, GpoFacts, RandomState>,
    base: String,
    attacker: ObjectId,
}

impl ObjectIndex {
    /// Create an index rooted at the given base DN.
    ///
    /// The attacker pseudo-object representing an assumed-compromised
    /// external identity is always present.
    pub fn new(base: impl Into<String>) -> Self {
        let index = Self {
            objects: RwLock::new(Vec::new()),
            by_dn: DashMap::with_hasher(RandomState::new()),
            by_sid: DashMap::with_hasher(RandomState::new()),
            gpo_facts: DashMap::with_hasher(RandomState::new()),
            base: base.into(),
            attacker: ObjectId(0),
        };
        let attacker = index.insert(Object::new(ATTACKER_DN, ObjectType::Other));
        debug_assert_eq!(attacker, ObjectId(0));
        index
    }

    /// Base DN of the directory snapshot
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The attacker pseudo-object
    pub fn attacker(&self) -> ObjectId {
        self.attacker
    }

    /// Insert an object, returning its stable id.
    ///
    /// A duplicate DN returns the existing id with a warning; the analysis
    /// degrades to fewer edges rather than failing the load.
    pub fn insert(&self, object: Object) -> ObjectId {
        let dn_key = object.dn().to_ascii_lowercase();
        if let Some(existing) = self.by_dn.get(&dn_key) {
            warn!("Duplicate object DN {}, keeping first", object.dn());
            return *existing;
        }
        let mut objects = self.objects.write();
        let id = ObjectId(objects.len() as u32);
        if let Some(sid) = object.sid() {
            self.by_sid.entry(sid.clone()).or_insert(id);
        }
        self.by_dn.insert(dn_key, id);
        objects.push(Arc::new(object));
        id
    }

    /// Insert a synthetic object created by a preprocessor or rule.
    ///
    /// Sequenced through the arena write lock; callers must record any edge
    /// referencing the new object only after this returns.
    pub fn add_synthetic(&self, object: Object) -> ObjectId {
        self.insert(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<Arc<Object>> {
        self.objects.read().get(id.index()).cloned()
    }

    /// Case-insensitive DN lookup
    pub fn find_dn(&self, dn: &str) -> Option<ObjectId> {
        self.by_dn.get(&dn.to_ascii_lowercase()).map(|r| *r)
    }

    pub fn find_sid(&self, sid: &Sid) -> Option<ObjectId> {
        self.by_sid.get(sid).map(|r| *r)
    }

    /// Look up a SID, creating a foreign-security-principal stub when the
    /// snapshot has no object for it
    pub fn find_or_add_sid(&self, sid: &Sid) -> ObjectId {
        if let Some(id) = self.find_sid(sid) {
            return id;
        }
        let stub = Object::new(
            format!("CN={},CN=foreign", sid.as_str()),
            ObjectType::ForeignSecurityPrincipal,
        )
        .with_sid(sid.clone());
        self.insert(stub)
    }

    /// Parent container of an object, resolved by DN suffix
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        let object = self.get(id)?;
        let parent_dn = object.parent_dn()?;
        self.find_dn(parent_dn)
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all ids at call time.
    ///
    /// Synthetic objects inserted later in the same pass are not included,
    /// which is what the rule pass wants: each rule runs against the loaded
    /// snapshot exactly once.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        (0..self.len() as u32).map(ObjectId).collect()
    }

    /// Attach preprocessed GPO facts to a policy object
    pub fn attach_gpo_facts(&self, id: ObjectId, facts: GpoFacts) {
        self.gpo_facts.insert(id, facts);
    }

    pub fn gpo_facts(&self, id: ObjectId) -> Option<GpoFacts> {
        self.gpo_facts.get(&id).map(|r| r.clone())
    }
}

/// Set of object ids, used for seed and exclusion sets
#[derive(Debug, Clone, Default)]
pub struct ObjectSet {
    ids: AHashSet<ObjectId>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: ObjectId) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    /// Ids in ascending order, for deterministic processing
    pub fn sorted(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<ObjectId> for ObjectSet {
    fn from_iter<T: IntoIterator<Item = ObjectId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attacker_always_present() {
        let index = ObjectIndex::new("DC=example,DC=com");
        let attacker = index.attacker();
        let object = index.get(attacker).unwrap();
        assert_eq!(object.dn(), ATTACKER_DN);
    }

    #[test]
    fn test_lookup_by_dn_is_case_insensitive() {
        let index = ObjectIndex::new("DC=example,DC=com");
        let id = index.insert(Object::new("CN=Alice,DC=example,DC=com", ObjectType::User));
        assert_eq!(index.find_dn("cn=alice,dc=EXAMPLE,dc=com"), Some(id));
    }

    #[test]
    fn test_find_or_add_sid_creates_stub() {
        let index = ObjectIndex::new("DC=example,DC=com");
        let sid = Sid::parse("S-1-5-21-1-2-3-1104").unwrap();
        let id = index.find_or_add_sid(&sid);
        let object = index.get(id).unwrap();
        assert_eq!(object.object_type(), ObjectType::ForeignSecurityPrincipal);
        assert_eq!(object.sid(), Some(&sid));
        // Idempotent
        assert_eq!(index.find_or_add_sid(&sid), id);
    }

    #[test]
    fn test_parent_lookup() {
        let index = ObjectIndex::new("DC=example,DC=com");
        let parent = index.insert(Object::new("OU=Staff,DC=example,DC=com", ObjectType::OrganizationalUnit));
        let child = index.insert(Object::new("CN=Alice,OU=Staff,DC=example,DC=com", ObjectType::User));
        assert_eq!(index.parent(child), Some(parent));
        assert_eq!(index.parent(parent), None);
    }

    #[test]
    fn test_duplicate_dn_keeps_first() {
        let index = ObjectIndex::new("DC=example,DC=com");
        let first = index.insert(Object::new("CN=X,DC=example,DC=com", ObjectType::User));
        let second = index.insert(Object::new("CN=X,DC=example,DC=com", ObjectType::Group));
        assert_eq!(first, second);
        assert_eq!(index.get(first).unwrap().object_type(), ObjectType::User);
    }
}
