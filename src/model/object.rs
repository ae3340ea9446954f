/*!
 * Directory Object
 * One immutable directory entry plus its parsed security descriptor
 */

use ahash::AHashMap;
use parking_lot::Mutex;

use super::types::{Attribute, AttributeValue, ModelError, ModelResult, ObjectType, Sid};
use crate::security::SecurityDescriptor;

/// One directory object.
///
/// Objects are built by the loader and read-only for the analysis core;
/// mutation is limited to marker attributes attached by rules.
#[derive(Debug)]
pub struct Object {
    dn: String,
    sid: Option<Sid>,
    object_type: ObjectType,
    attributes: AHashMap<Attribute, Vec<AttributeValue>>,
    descriptor: Option<SecurityDescriptor>,
    markers: Mutex<AHashMap<Attribute, AttributeValue>>,
}

impl Object {
    pub fn new(dn: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            dn: dn.into(),
            sid: None,
            object_type,
            attributes: AHashMap::new(),
            descriptor: None,
            markers: Mutex::new(AHashMap::new()),
        }
    }

    pub fn with_sid(mut self, sid: Sid) -> Self {
        self.sid = Some(sid);
        self
    }

    pub fn with_attr(mut self, attribute: Attribute, value: AttributeValue) -> Self {
        self.attributes.entry(attribute).or_default().push(value);
        self
    }

    pub fn with_descriptor(mut self, descriptor: SecurityDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Distinguished name of the parent container, if any
    pub fn parent_dn(&self) -> Option<&str> {
        self.dn.split_once(',').map(|(_, rest)| rest)
    }

    pub fn sid(&self) -> Option<&Sid> {
        self.sid.as_ref()
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// All values of an attribute, empty if absent
    pub fn attr(&self, attribute: &Attribute) -> &[AttributeValue] {
        self.attributes.get(attribute).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First textual value of an attribute
    pub fn one_attr_str(&self, attribute: &Attribute) -> Option<&str> {
        self.attr(attribute).iter().find_map(AttributeValue::as_text)
    }

    /// First integer-coercible value of an attribute
    pub fn attr_int(&self, attribute: &Attribute) -> Option<i64> {
        self.attr(attribute).iter().find_map(AttributeValue::as_int)
    }

    /// Parsed security descriptor; a rule receiving `Err` skips the object
    pub fn descriptor(&self) -> ModelResult<&SecurityDescriptor> {
        self.descriptor.as_ref().ok_or_else(|| ModelError::DescriptorMissing {
            dn: self.dn.clone(),
        })
    }

    /// Attach a computed marker attribute (e.g. "has service-principal-name")
    pub fn set_marker(&self, attribute: Attribute, value: AttributeValue) {
        self.markers.lock().insert(attribute, value);
    }

    pub fn marker(&self, attribute: &Attribute) -> Option<AttributeValue> {
        self.markers.lock().get(attribute).cloned()
    }
}
