//! Collision groups for filtering collision detection
//!
//! A group is a named bit in a 32-bit mask. Colliders carry at most one group
//! and a filter that decides which partner groups they are tested against.

use super::PhysicsError;
use serde::{Deserialize, Serialize};

/// Maximum number of distinct groups (one bit each)
pub const MAX_GROUPS: usize = 32;

/// One registered collision group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionGroup(u8);

impl CollisionGroup {
    /// Group at bit `index`. `None` past the last bit.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < MAX_GROUPS).then(|| Self(index as u8))
    }

    /// Bit index
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Single-bit mask
    pub fn bit(self) -> u32 {
        1 << self.0
    }
}

/// Include/exclude filter over group masks
///
/// A collider passes when its group is not excluded and the include mask is
/// either empty or contains the group. A collider without a group passes only
/// an empty include mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    /// Groups accepted (empty = all)
    pub include: u32,
    /// Groups rejected
    pub exclude: u32,
}

impl GroupFilter {
    /// Accepts everything
    pub const ALL: Self = Self { include: 0, exclude: 0 };

    /// Accept only the given groups
    pub fn including(groups: &[CollisionGroup]) -> Self {
        Self {
            include: Self::mask(groups),
            exclude: 0,
        }
    }

    /// Add groups to the exclude mask
    #[must_use]
    pub fn excluding(mut self, groups: &[CollisionGroup]) -> Self {
        self.exclude |= Self::mask(groups);
        self
    }

    /// Whether a collider in `group` passes this filter
    pub fn passes(&self, group: Option<CollisionGroup>) -> bool {
        match group {
            Some(group) => self.exclude & group.bit() == 0 && (self.include == 0 || self.include & group.bit() != 0),
            None => self.include == 0,
        }
    }

    /// Combined mask of several groups
    pub fn mask(groups: &[CollisionGroup]) -> u32 {
        groups.iter().fold(0, |acc, group| acc | group.bit())
    }
}

/// Name to group mapping
#[derive(Debug, Clone, Default)]
pub struct CollisionGroupRegistry {
    names: Vec<String>,
}

impl CollisionGroupRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `names` registered in order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PhysicsError> {
        let mut registry = Self::new();
        for name in names {
            registry.register(name.as_ref())?;
        }
        Ok(registry)
    }

    /// Register a group, returning the existing one if the name is known
    pub fn register(&mut self, name: &str) -> Result<CollisionGroup, PhysicsError> {
        if let Some(group) = self.get(name) {
            return Ok(group);
        }
        let group = CollisionGroup::from_index(self.names.len()).ok_or_else(|| {
            log::warn!("Collision group registry is full, cannot add {:?}", name);
            PhysicsError::TooManyGroups
        })?;
        self.names.push(name.to_owned());
        Ok(group)
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<CollisionGroup> {
        self.names
            .iter()
            .position(|known| known == name)
            .and_then(CollisionGroup::from_index)
    }

    /// Name of a registered group
    pub fn name(&self, group: CollisionGroup) -> Option<&str> {
        self.names.get(group.index()).map(String::as_str)
    }

    /// Build a filter from group names; unknown names are an error
    pub fn filter<S: AsRef<str>>(&self, include: &[S], exclude: &[S]) -> Result<GroupFilter, PhysicsError> {
        let resolve = |names: &[S]| -> Result<Vec<CollisionGroup>, PhysicsError> {
            names
                .iter()
                .map(|name| {
                    self.get(name.as_ref())
                        .ok_or_else(|| PhysicsError::UnknownGroup(name.as_ref().to_owned()))
                })
                .collect()
        };
        Ok(GroupFilter::including(&resolve(include)?).excluding(&resolve(exclude)?))
    }

    /// Number of registered groups
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
