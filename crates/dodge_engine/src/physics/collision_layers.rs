//! Collision layer flags for filtering collision detection
//!
//! Every collider carries a `flag` (the layers it belongs to) and a `mask`
//! (the layers it reacts to). Layers are plain integers in scene files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Set of collision layers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionLayers: u32 {
        // Games assign the meaning of every bit
        const _ = !0;
    }
}

impl CollisionLayers {
    /// Build from raw bits
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Whether a collider with this mask considers `other_flag`.
    ///
    /// The test is one-directional; the other collider's mask plays no part.
    pub const fn accepts(self, other_flag: Self) -> bool {
        self.bits() & other_flag.bits() != 0
    }
}

impl Serialize for CollisionLayers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for CollisionLayers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_is_one_directional() {
        let chicken_flag = CollisionLayers::from_raw(2);
        let chicken_mask = CollisionLayers::from_raw(1);
        let player_flag = CollisionLayers::from_raw(1);
        let player_mask = CollisionLayers::from_raw(4);

        assert!(chicken_mask.accepts(player_flag));
        assert!(!player_mask.accepts(chicken_flag));
    }

    #[test]
    fn test_high_bits_are_retained() {
        let custom = CollisionLayers::from_raw(1 << 20);
        assert_eq!(custom.bits(), 1 << 20);
        assert!(custom.accepts(CollisionLayers::from_raw((1 << 20) | 1)));
    }

    #[test]
    fn test_deserialize_from_integer() {
        let layers: CollisionLayers = ron::from_str("3").unwrap();
        assert_eq!(layers.bits(), 3);
        assert!(!CollisionLayers::empty().accepts(CollisionLayers::from_raw(u32::MAX)));
    }
}
