use rand::seq::IteratorRandom;
use rand::Rng;

use crate::snake::{Bounds, Point};

// Rejected samples tolerated before switching to an exhaustive pick.
const SAMPLE_LIMIT: usize = 64;

/// Picks a uniformly random cell inside `bounds` that no body segment
/// occupies. Returns `None` when the body covers every cell.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, body: &[Point], bounds: Bounds) -> Option<Point> {
    if bounds.is_empty() {
        return None;
    }

    for _ in 0..SAMPLE_LIMIT {
        let candidate = Point::new(
            rng.gen_range(0..bounds.height as i32),
            rng.gen_range(0..bounds.width as i32),
        );

        if !body.contains(&candidate) {
            return Some(candidate);
        }
    }

    // Crowded board, choose among what's left
    bounds.cells().filter(|cell| !body.contains(cell)).choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[test]
    fn food_lands_inside_bounds_and_off_the_body() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let bounds = Bounds::new(10, 10);
        let body = [Point::new(5, 5), Point::new(5, 4), Point::new(5, 3)];

        for _ in 0..1000 {
            let food = place_food(&mut rng, &body, bounds).unwrap();
            assert!(bounds.contains(food));
            assert!(!body.contains(&food));
        }
    }

    #[test]
    fn nearly_full_board_finds_the_last_cell() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let bounds = Bounds::new(3, 4);

        for free in bounds.cells() {
            let body: Vec<Point> = bounds.cells().filter(|cell| *cell != free).collect();
            assert_eq!(place_food(&mut rng, &body, bounds), Some(free));
        }
    }

    #[test]
    fn full_board_has_no_room() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let bounds = Bounds::new(2, 2);
        let body: Vec<Point> = bounds.cells().collect();

        assert_eq!(place_food(&mut rng, &body, bounds), None);
        assert_eq!(place_food(&mut rng, &[], Bounds::new(0, 5)), None);
    }

    #[test]
    fn body_outside_bounds_is_ignored() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let bounds = Bounds::new(1, 2);
        let body = [Point::new(0, 0), Point::new(0, 5), Point::new(4, 4)];

        assert_eq!(place_food(&mut rng, &body, bounds), Some(Point::new(0, 1)));
    }
}
