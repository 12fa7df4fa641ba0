use super::error::ChoiceError;
use log::trace;
use rand::Rng;

///
/// Picks one of `options` with probability proportional to its weight.
///
/// Draws from the thread-local generator. Use [`weighted_choice_with`] to
/// supply the draw yourself.
///
pub fn weighted_choice<'a, T>(options: &'a [T], weights: &[f64]) -> Result<&'a T, ChoiceError> {
    let mut rng = rand::thread_rng();
    weighted_choice_with(options, weights, || rng.gen::<f64>())
}

///
/// Picks one of `options` using `draw`, which should return a value in `[0, 1)`.
///
/// `draw` is only called once the inputs are known to be valid. The result is
/// the first option with a positive weight whose cumulative fraction reaches
/// the draw, so zero weighted options are never picked.
///
pub fn weighted_choice_with<'a, T, F>(
    options: &'a [T],
    weights: &[f64],
    draw: F,
) -> Result<&'a T, ChoiceError>
where
    F: FnOnce() -> f64,
{
    weighted_index_with(options, weights, draw).map(|index| &options[index])
}

///
/// Same walk as [`weighted_choice_with`], returning the index of the pick.
///
/// A draw of exactly `0.0` never lands on a zero weighted option; it picks
/// the first option with a positive weight instead.
///
pub fn weighted_index_with<T, F>(
    options: &[T],
    weights: &[f64],
    draw: F,
) -> Result<usize, ChoiceError>
where
    F: FnOnce() -> f64,
{
    let Totals { scale, total } = validate(options, weights)?;

    let random = draw();
    let mut running_total = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        running_total += weight / scale;
        // running_total is summed in the same order as total, so the last
        // positive weight lands on exactly 1.0
        if *weight > 0.0 && running_total / total >= random {
            trace!("Drew {} and picked option {} of {}", random, index, options.len());
            return Ok(index);
        }
    }

    Err(ChoiceError::Internal(format!(
        "weighted choice selected nothing (drew {})",
        random
    )))
}

/// Divisor applied to every weight, and the total of the divided weights.
pub(crate) struct Totals {
    scale: f64,
    total: f64,
}

/// Checks the inputs and returns the weight totals.
pub(crate) fn validate<T>(options: &[T], weights: &[f64]) -> Result<Totals, ChoiceError> {
    if options.len() != weights.len() {
        return Err(ChoiceError::InvalidArgument(
            "options and weights must be the same length".to_string(),
        ));
    }
    if options.is_empty() {
        return Err(ChoiceError::InvalidArgument(
            "must provide at least one option".to_string(),
        ));
    }

    let weights_valid = weights.iter().all(|weight| weight.is_finite() && *weight >= 0.0);
    let mut totals = Totals {
        scale: 1.0,
        total: weights.iter().fold(0.0, |sum, weight| sum + weight),
    };
    if weights_valid && totals.total.is_infinite() {
        // Large finite weights can overflow the sum; dividing by the largest
        // keeps every weight in [0, 1]
        totals.scale = weights.iter().fold(0.0, |max: f64, weight| max.max(*weight));
        totals.total = weights
            .iter()
            .fold(0.0, |sum, weight| sum + weight / totals.scale);
    }
    if !weights_valid || totals.total <= 0.0 {
        return Err(ChoiceError::InvalidArgument(format!(
            "weights must be non-negative and sum to more than zero (got {:?})",
            weights
        )));
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_option_always_chosen() {
        for _ in 0..1000 {
            assert_eq!(weighted_choice(&["a"], &[1.0]), Ok(&"a"));
        }
    }

    #[test]
    fn test_zero_weight_never_chosen() {
        for _ in 0..1000 {
            assert_eq!(weighted_choice(&["a", "b"], &[0.0, 1.0]), Ok(&"b"));
        }
        // Even a draw of exactly zero skips the empty slot
        assert_eq!(
            weighted_choice_with(&["a", "b"], &[0.0, 1.0], || 0.0),
            Ok(&"b")
        );
    }

    #[test]
    fn test_fixed_draw_picks_first_reaching_option() {
        let options = ["a", "b", "c", "d"];
        let weights = [1.0, 1.0, 0.0, 2.0];
        // Cumulative fractions are 0.25, 0.5, 0.5 (skipped), 1.0
        let cases = [
            (0.0, "a"),
            (0.1, "a"),
            (0.25, "a"),
            (0.2500001, "b"),
            (0.5, "b"),
            (0.50001, "d"),
            (0.99999, "d"),
        ];
        for (random, expected) in cases {
            assert_eq!(
                weighted_choice_with(&options, &weights, || random),
                Ok(&expected),
                "draw {}",
                random
            );
        }
    }

    #[test]
    fn test_largest_draw_picks_last_positive_weight() {
        let draw = 1.0 - f64::EPSILON;
        assert_eq!(
            weighted_choice_with(&[1, 2, 3], &[0.1, 0.2, 0.3], || draw),
            Ok(&3)
        );
        assert_eq!(
            weighted_choice_with(&[1, 2, 3], &[0.1, 0.2, 0.0], || draw),
            Ok(&2)
        );
    }

    #[test]
    fn test_overflowing_weights_are_rescaled() {
        assert_eq!(
            weighted_choice_with(&["a", "b"], &[f64::MAX, f64::MAX], || 0.75),
            Ok(&"b")
        );
        assert_eq!(
            weighted_choice_with(&["a", "b"], &[f64::MAX, f64::MAX], || 0.25),
            Ok(&"a")
        );
        // Shares stay proportional after rescaling
        let weights = [f64::MAX / 2.0, 0.0, f64::MAX];
        assert_eq!(weighted_choice_with(&[1, 2, 3], &weights, || 0.33), Ok(&1));
        assert_eq!(weighted_choice_with(&[1, 2, 3], &weights, || 0.34), Ok(&3));
    }

    #[test]
    fn test_mismatched_lengths() {
        let result = weighted_choice(&["a", "b"], &[1.0]);
        assert_eq!(
            result,
            Err(ChoiceError::InvalidArgument(
                "options and weights must be the same length".to_string()
            ))
        );
    }

    #[test]
    fn test_empty_options() {
        let options: [&str; 0] = [];
        let result = weighted_choice(&options, &[]);
        assert_eq!(
            result,
            Err(ChoiceError::InvalidArgument(
                "must provide at least one option".to_string()
            ))
        );
    }

    #[test]
    fn test_negative_sum_reports_weights() {
        let result = weighted_choice(&["a", "b"], &[-5.0, -5.0]);
        match result {
            Err(ChoiceError::InvalidArgument(message)) => {
                assert!(message.contains("[-5.0, -5.0]"), "{}", message)
            }
            other => panic!("Expected invalid argument, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_negative_weight_with_positive_sum() {
        let result = weighted_choice(&["a", "b", "c"], &[2.0, -1.0, 1.0]);
        assert!(result.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_rejects_zero_sum() {
        let result = weighted_choice(&["a", "b"], &[0.0, 0.0]);
        assert!(result.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        for bad in [f64::NAN, f64::INFINITY] {
            let result = weighted_choice(&["a", "b"], &[1.0, bad]);
            assert!(result.unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn test_invalid_input_does_not_draw() {
        let mut drawn = false;
        let result = weighted_choice_with(&["a"], &[1.0, 2.0], || {
            drawn = true;
            0.5
        });
        assert!(result.is_err());
        assert!(!drawn);
    }

    #[test]
    fn test_bad_draw_is_internal() {
        for random in [1.5, f64::NAN] {
            let result = weighted_choice_with(&["a", "b"], &[1.0, 1.0], || random);
            let err = result.unwrap_err();
            assert!(err.is_internal(), "draw {} gave {:?}", random, err);
            assert!(!err.is_invalid_argument());
        }
    }
}
