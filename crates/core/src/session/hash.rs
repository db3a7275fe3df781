//! Stable snapshot hashing for determinism and round-trip checks.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::GameSession;
use crate::movement::MovementMode;
use crate::types::TokenValue;

fn write_token(hasher: &mut Xxh3, token: Option<TokenValue>) {
    match token {
        Some(value) => {
            hasher.write_u8(1);
            hasher.write_u64(value);
        }
        None => hasher.write_u8(0),
    }
}

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

impl GameSession {
    /// Hash over player position, held token, movement mode, and the overlay in
    /// insertion order. Visual cells and feedback text are not part of it.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.player.position.lat.to_bits());
        hasher.write_u64(self.player.position.lng.to_bits());
        write_token(&mut hasher, self.player.inventory.held());
        hasher.write_u8(match self.movement.mode() {
            MovementMode::Buttons => 0,
            MovementMode::Geolocation => 1,
        });
        hasher.write_usize(self.store.len());
        for (coord, token) in self.store.entries() {
            hasher.write_i32(coord.i);
            hasher.write_i32(coord.j);
            write_token(&mut hasher, token);
        }
        hasher.finish()
    }
}
