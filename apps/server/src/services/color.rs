// [apps/server/src/services/color.rs]
//! Deterministic focus-cursor color assignment (spec §4.6): the same
//! principal always gets the same color within a process, with no shared
//! state to look it up in.

use std::hash::{Hash, Hasher};

use uuid::Uuid;

const PALETTE: [&str; 8] = [
    "#e03131", "#f08c00", "#2f9e44", "#1971c2", "#7048e8", "#e8590c", "#0ca678", "#c2255c",
];

pub fn color_for(principal_id: Uuid) -> &'static str {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    principal_id.hash(&mut hasher);
    let index = (hasher.finish() as usize) % PALETTE.len();
    PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_for_the_same_id() {
        let id = Uuid::new_v4();
        assert_eq!(color_for(id), color_for(id));
    }

    #[test]
    fn stays_within_the_palette() {
        for _ in 0..100 {
            assert!(PALETTE.contains(&color_for(Uuid::new_v4())));
        }
    }
}
