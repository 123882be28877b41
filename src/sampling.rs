use crate::*;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

pub trait Weighted<S> {
    fn s(&self) -> S;

    fn p(&self) -> f64;
}

impl Weighted<Discrete> for (Discrete, f64) {
    fn s(&self) -> Discrete {
        self.0
    }

    fn p(&self) -> f64 {
        self.1
    }
}

impl Weighted<Discrete> for Transition {
    fn s(&self) -> Discrete {
        self.next_state
    }

    fn p(&self) -> f64 {
        self.probability
    }
}

/// Draws one item in proportion to its weight.
pub fn pick_next<T, S, R>(rng: &mut R, ts: &[T]) -> Result<S>
where
    T: Weighted<S>,
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p()))
        .map_err(|e| EnvError::InvalidConfig(format!("bad weights: {e}")))?;
    Ok(ts[dist.sample(rng)].s())
}

#[cfg(test)]
mod tests {
    use super::{pick_next, Weighted};
    use float_eq::*;
    use rand::prelude::*;

    #[test]
    fn test_pick_next_seeded() {
        let items = &mut vec![
            TX {
                s: 0,
                p: 0.2,
                count: 0,
            },
            TX {
                s: 1,
                p: 0.8,
                count: 0,
            },
        ];

        let rng = &mut StdRng::seed_from_u64(2718);
        let n = 10000;
        for _ in 0..n {
            let i: usize = pick_next(rng, items).unwrap();
            items[i].count += 1;
        }

        assert_float_eq!(items[0].count as f64 / n as f64, 0.2, abs <= 2e-2);
        assert_float_eq!(items[1].count as f64 / n as f64, 0.8, abs <= 2e-2);
    }

    #[test]
    fn zero_weights_are_an_error() {
        let rng = &mut StdRng::seed_from_u64(0);
        let items = [(0usize, 0.0), (1usize, 0.0)];
        assert!(pick_next::<_, usize, _>(rng, &items).is_err());
    }

    #[test]
    fn zero_weight_items_are_never_picked() {
        let rng = &mut StdRng::seed_from_u64(1);
        let items = [(7usize, 0.0), (9usize, 1.0)];
        for _ in 0..100 {
            assert_eq!(pick_next::<_, usize, _>(rng, &items).unwrap(), 9);
        }
    }

    struct TX {
        pub s: usize,
        pub p: f64,
        pub count: i32,
    }

    impl Weighted<usize> for TX {
        fn p(&self) -> f64 {
            self.p
        }

        fn s(&self) -> usize {
            self.s
        }
    }
}
