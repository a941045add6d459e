//! Specialized collection types

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable reference to a triangle buffer in the mesh asset store
    pub struct MeshHandle;
}

/// Handle-based map for assets that shapes refer to without owning
pub type HandleMap<K, T> = SlotMap<K, T>;
