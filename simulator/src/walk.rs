//! Transition rule and single-trial walker.
//!
//! One step = one die roll. A six grants a second, independent roll that is
//! added to the position. The walker never owns a generator: callers thread
//! their own so that every trial can draw from its own seeded stream.

use rand::Rng;
use serde::Serialize;

use crate::constants::*;

/// Outcome of one step of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// Down one floor, floored at the ground.
    Slip,
    /// Up one floor.
    Climb,
    /// Up by the bonus roll (1-6).
    Elevator(u32),
}

impl Move {
    /// Classify a roll. `bonus` is only consulted when `roll` is a six.
    pub fn from_rolls(roll: u32, bonus: u32) -> Move {
        debug_assert!((DIE_MIN..=DIE_MAX).contains(&roll), "roll={roll}");
        if roll <= SLIP_MAX_ROLL {
            Move::Slip
        } else if roll <= CLIMB_MAX_ROLL {
            Move::Climb
        } else {
            debug_assert!((DIE_MIN..=DIE_MAX).contains(&bonus), "bonus={bonus}");
            Move::Elevator(bonus)
        }
    }
}

/// Apply a move to a position.
#[inline(always)]
pub fn apply_move(position: u32, mv: Move) -> u32 {
    match mv {
        Move::Slip => position.saturating_sub(1),
        Move::Climb => position + 1,
        Move::Elevator(bonus) => position + bonus,
    }
}

/// Roll a single die (1-6).
#[inline(always)]
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(DIE_MIN..=DIE_MAX)
}

/// Draw the next move. The bonus die is only rolled after a six, so the
/// generator advances by one or two draws per step.
#[inline(always)]
pub fn next_move<R: Rng + ?Sized>(rng: &mut R) -> Move {
    let roll = roll_die(rng);
    if roll == ELEVATOR_ROLL {
        Move::Elevator(roll_die(rng))
    } else {
        Move::from_rolls(roll, DIE_MIN)
    }
}

/// A completed random walk: the start position followed by one position per step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trial {
    positions: Vec<u32>,
}

impl Trial {
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Position after the last step.
    pub fn terminal(&self) -> u32 {
        // Never empty: the start position is always present.
        self.positions[self.positions.len() - 1]
    }

    /// Number of positions (`step_count + 1`).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.positions.len() - 1
    }

    /// Position after `step` steps, if the trial is that long.
    pub fn position_at(&self, step: usize) -> Option<u32> {
        self.positions.get(step).copied()
    }
}

/// Play one trial of `step_count` steps from the ground floor.
///
/// Zero steps produce a trial holding only the start position.
pub fn simulate_trial<R: Rng + ?Sized>(step_count: usize, rng: &mut R) -> Trial {
    let mut positions = Vec::with_capacity(step_count + 1);
    let mut position = START_POSITION;
    positions.push(position);
    for _ in 0..step_count {
        position = apply_move(position, next_move(rng));
        positions.push(position);
    }
    Trial { positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_rolls_classification() {
        assert_eq!(Move::from_rolls(1, 1), Move::Slip);
        assert_eq!(Move::from_rolls(2, 6), Move::Slip);
        assert_eq!(Move::from_rolls(3, 1), Move::Climb);
        assert_eq!(Move::from_rolls(4, 1), Move::Climb);
        assert_eq!(Move::from_rolls(5, 6), Move::Climb);
        assert_eq!(Move::from_rolls(6, 1), Move::Elevator(1));
        assert_eq!(Move::from_rolls(6, 6), Move::Elevator(6));
    }

    #[test]
    fn test_slip_at_ground_stays_at_ground() {
        assert_eq!(apply_move(0, Move::Slip), 0);
        assert_eq!(apply_move(0, Move::from_rolls(1, 1)), 0);
        assert_eq!(apply_move(0, Move::from_rolls(2, 1)), 0);
    }

    #[test]
    fn test_apply_move() {
        assert_eq!(apply_move(7, Move::Slip), 6);
        assert_eq!(apply_move(7, Move::Climb), 8);
        assert_eq!(apply_move(7, Move::Elevator(4)), 11);
    }

    #[test]
    fn test_roll_die_range() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..10000 {
            let d = roll_die(&mut rng);
            assert!((1..=6).contains(&d), "Die out of range: {}", d);
        }
    }

    #[test]
    fn test_roll_die_distribution() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts = [0u64; 6];
        let n = 120_000;
        for _ in 0..n {
            counts[(roll_die(&mut rng) - 1) as usize] += 1;
        }
        let expected = n as f64 / 6.0;
        for (face, &count) in counts.iter().enumerate() {
            let ratio = count as f64 / expected;
            assert!(
                ratio > 0.97 && ratio < 1.03,
                "Face {} has count {} (expected ~{:.0}, ratio {:.3})",
                face + 1,
                count,
                expected,
                ratio
            );
        }
    }

    #[test]
    fn test_move_frequencies() {
        // P(slip) = 2/6, P(climb) = 3/6, P(elevator) = 1/6
        let mut rng = SmallRng::seed_from_u64(7);
        let n = 60_000;
        let (mut slips, mut climbs, mut elevators) = (0usize, 0usize, 0usize);
        for _ in 0..n {
            match next_move(&mut rng) {
                Move::Slip => slips += 1,
                Move::Climb => climbs += 1,
                Move::Elevator(b) => {
                    assert!((1..=6).contains(&b));
                    elevators += 1;
                }
            }
        }
        let frac = |c: usize| c as f64 / n as f64;
        assert!((frac(slips) - 2.0 / 6.0).abs() < 0.01, "slips={}", frac(slips));
        assert!((frac(climbs) - 3.0 / 6.0).abs() < 0.01, "climbs={}", frac(climbs));
        assert!(
            (frac(elevators) - 1.0 / 6.0).abs() < 0.01,
            "elevators={}",
            frac(elevators)
        );
    }

    #[test]
    fn test_trial_shape() {
        let mut rng = SmallRng::seed_from_u64(1);
        let trial = simulate_trial(100, &mut rng);
        assert_eq!(trial.len(), 101);
        assert_eq!(trial.step_count(), 100);
        assert_eq!(trial.positions()[0], 0);
        assert_eq!(trial.terminal(), trial.positions()[100]);
        assert_eq!(trial.position_at(0), Some(0));
        assert_eq!(trial.position_at(101), None);
    }

    #[test]
    fn test_trial_steps_follow_rule() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let trial = simulate_trial(1000, &mut rng);
        for w in trial.positions().windows(2) {
            let (prev, next) = (w[0] as i64, w[1] as i64);
            let delta = next - prev;
            let legal = delta == -1 || (1..=6).contains(&delta) || (prev == 0 && delta == 0);
            assert!(legal, "illegal step {} -> {}", prev, next);
        }
    }

    #[test]
    fn test_zero_step_trial() {
        let mut rng = SmallRng::seed_from_u64(0);
        let trial = simulate_trial(0, &mut rng);
        assert_eq!(trial.positions(), &[0]);
        assert_eq!(trial.terminal(), 0);
        assert_eq!(trial.step_count(), 0);
    }

    #[test]
    fn test_trial_deterministic() {
        let mut rng1 = SmallRng::seed_from_u64(42);
        let mut rng2 = SmallRng::seed_from_u64(42);
        assert_eq!(simulate_trial(250, &mut rng1), simulate_trial(250, &mut rng2));
    }
}
