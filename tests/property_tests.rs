#[cfg(test)]
mod property_tests {
    use ndarray::Array2;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spreadcheck::activations::Activation;
    use spreadcheck::metrics::MomentStats;
    use spreadcheck::sampling::sample_flat;

    // Strategy for generating non-empty matrices of bounded values
    fn matrix_strategy() -> impl Strategy<Value = Array2<f32>> {
        (1usize..=12, 1usize..=12).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(-100.0f32..100.0, rows * cols)
                .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
        })
    }

    proptest! {
        #[test]
        fn test_variance_matches_raw_moments(m in matrix_strategy()) {
            let s = MomentStats::from_array(&m).unwrap();
            let tol = 1e-9 * s.ex2.max(1.0);
            prop_assert!((s.var - (s.ex2 - s.mean * s.mean)).abs() <= tol);
            prop_assert!(s.var >= 0.0);
            prop_assert!(s.ex2 >= 0.0);
        }

        #[test]
        fn test_sample_length(m in matrix_strategy(), k in 1usize..200, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = sample_flat(&m, k, &mut rng);
            if m.len() <= k {
                prop_assert_eq!(s, m.iter().copied().collect::<Vec<_>>());
            } else {
                prop_assert_eq!(s.len(), k);
                for v in &s {
                    prop_assert!(m.iter().any(|x| x == v));
                }
            }
        }

        #[test]
        fn test_relu_is_nonnegative_and_shape_preserving(m in matrix_strategy()) {
            let a = Activation::Relu.apply(m.view());
            prop_assert_eq!(a.dim(), m.dim());
            for (&out, &inp) in a.iter().zip(m.iter()) {
                prop_assert_eq!(out, inp.max(0.0));
            }
            let frac = Activation::Relu.zero_fraction(a.view()).unwrap();
            prop_assert!((0.0..=1.0).contains(&frac));
        }

        #[test]
        fn test_identity_has_no_zero_fraction(m in matrix_strategy()) {
            let a = Activation::Identity.apply(m.view());
            prop_assert_eq!(&a, &m);
            prop_assert_eq!(Activation::Identity.zero_fraction(a.view()), None);
        }
    }
}
