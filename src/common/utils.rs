use crate::*;

/// Number of distinct wall readings: one bit per relative direction.
pub const N_WALL_OBSERVATIONS: usize = 16;

/// Encodes a reading of walls (front, right, behind, left) to an integer.
pub fn encode_observation(walls: &[bool; 4]) -> Discrete {
    walls
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w)
        .map(|(i, _)| 1usize << i)
        .sum()
}

pub fn decode_observation(obs: Discrete) -> Option<[bool; 4]> {
    if obs >= N_WALL_OBSERVATIONS {
        return None;
    }

    Some([obs & 1 != 0, obs & 2 != 0, obs & 4 != 0, obs & 8 != 0])
}
