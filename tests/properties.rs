use model::grid::Neighborhood;
use model::submodels::culture::{interact, overlap};
use model::{Culture, Parameters, Simulation};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn culture_pair() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    (1_usize..8).prop_flat_map(|features| {
        (
            prop::collection::vec(0_u32..4, features),
            prop::collection::vec(0_u32..4, features),
        )
    })
}

fn neighborhood() -> impl Strategy<Value = Neighborhood> {
    prop_oneof![
        Just(Neighborhood::Euclidean),
        Just(Neighborhood::Moore),
        Just(Neighborhood::VonNeumann),
    ]
}

fn parameters() -> impl Strategy<Value = Parameters> {
    (
        1_usize..7,
        1_usize..5,
        1_u32..4,
        0.0_f64..3.5,
        neighborhood(),
        any::<u64>(),
    )
        .prop_map(
            |(world_size, features, traits, radius, neighborhood, seed)| Parameters {
                world_size,
                features,
                traits,
                radius,
                neighborhood,
                seed: Some(seed),
            },
        )
}

proptest! {
    #[test]
    fn overlap_is_symmetric_and_reflexive((a, b) in culture_pair()) {
        let features = a.len();
        let a = Culture::from(a);
        let b = Culture::from(b);
        prop_assert_eq!(overlap(&a, &b), overlap(&b, &a));
        prop_assert_eq!(overlap(&a, &a), features);
        prop_assert!(overlap(&a, &b) <= features);
    }

    #[test]
    fn interaction_only_ever_moves_the_target_one_step_closer(
        (a, b) in culture_pair(),
        seed in any::<u64>(),
    ) {
        let features = a.len();
        let mut target = Culture::from(a);
        let neighbor = Culture::from(b);
        let before = target.clone();
        let neighbor_before = neighbor.clone();
        let shared = overlap(&target, &neighbor);

        let mut rng = StdRng::seed_from_u64(seed);
        let changed = interact(&mut target, &neighbor, &mut rng);

        prop_assert_eq!(&neighbor, &neighbor_before);
        if shared == 0 || shared == features {
            prop_assert_eq!(changed, None);
            prop_assert_eq!(&target, &before);
        }
        match changed {
            None => {
                prop_assert_eq!(&target, &before);
            }
            Some(i) => {
                prop_assert_eq!(overlap(&target, &neighbor), shared + 1);
                prop_assert_eq!(target.traits()[i], neighbor.traits()[i]);
                prop_assert_ne!(before.traits()[i], neighbor.traits()[i]);
                prop_assert_eq!(overlap(&target, &before), features - 1);
            }
        }
    }

    #[test]
    fn regions_partition_the_grid(p in parameters(), ticks in 0_usize..6) {
        let size = p.world_size;
        let mut s = Simulation::new(p).unwrap();
        for _ in 0..ticks {
            s.run_tick().unwrap();
        }
        let (count, giant) = s.compute_regions().unwrap();
        prop_assert!(count >= 1);
        prop_assert!(giant >= 1 && giant <= size * size);
        let sizes = s.regions().unwrap().sizes.clone();
        prop_assert_eq!(sizes.len(), count);
        prop_assert_eq!(sizes.iter().sum::<usize>(), size * size);
        prop_assert_eq!(s.compute_regions().unwrap(), (count, giant));
    }

    #[test]
    fn cultures_stay_in_range(p in parameters(), ticks in 1_usize..6) {
        let (features, traits) = (p.features, p.traits);
        let mut s = Simulation::new(p).unwrap();
        for _ in 0..ticks {
            let active = s.run_tick().unwrap();
            prop_assert!(active <= s.agents().len());
            prop_assert!(s.distinct_culture_count() >= 1);
        }
        for agent in s.agents() {
            prop_assert_eq!(agent.culture.len(), features);
            prop_assert!(agent.culture.traits().iter().all(|&t| t < traits));
        }
    }

    #[test]
    fn seeded_runs_repeat_exactly(p in parameters()) {
        let history = |p: Parameters| {
            let mut s = Simulation::new(p).unwrap();
            (0..8)
                .map(|_| (s.run_tick().unwrap(), s.distinct_culture_count()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(history(p.clone()), history(p));
    }
}
