/*!
 * Security Module
 * Parsed security descriptors, well-known rights and the access decision engine
 */

pub mod access;
pub mod rights;
pub mod types;

pub use access::AccessEngine;
pub use types::{AccessMask, Ace, AceFlags, AceKind, ControlFlags, SecurityDescriptor};
