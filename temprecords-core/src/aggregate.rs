use crate::model::{AggregationMode, Extremum, Unit};

/// Max or min of `temperatures`, or `None` when there is nothing to compare.
pub fn aggregate(temperatures: &[f64], mode: AggregationMode) -> Option<f64> {
    let mut values = temperatures.iter().copied();
    let first = values.next()?;

    Some(match mode {
        AggregationMode::Max => values.fold(first, f64::max),
        AggregationMode::Min => values.fold(first, f64::min),
    })
}

/// Like [`aggregate`], rounded to two decimals and tagged with mode and unit.
pub fn extremum(temperatures: &[f64], mode: AggregationMode, unit: Unit) -> Option<Extremum> {
    aggregate(temperatures, mode).map(|value| Extremum {
        mode,
        value: round_hundredths(value),
        unit,
    })
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_result() {
        assert_eq!(aggregate(&[], AggregationMode::Max), None);
        assert_eq!(aggregate(&[], AggregationMode::Min), None);
    }

    #[test]
    fn singleton_is_both_max_and_min() {
        for t in [-40.0, 0.0, 12.34] {
            assert_eq!(aggregate(&[t], AggregationMode::Max), Some(t));
            assert_eq!(aggregate(&[t], AggregationMode::Min), Some(t));
        }
    }

    #[test]
    fn picks_extremes_with_negatives() {
        let temps = [3.5, -12.25, 40.1, 0.0, -12.25];
        assert_eq!(aggregate(&temps, AggregationMode::Max), Some(40.1));
        assert_eq!(aggregate(&temps, AggregationMode::Min), Some(-12.25));
    }

    #[test]
    fn extremum_keeps_two_decimals_and_unit() {
        let result = extremum(&[98.6, 101.3], AggregationMode::Max, Unit::Fahrenheit).unwrap();
        assert_eq!(result.value, 101.3);
        assert_eq!(result.unit, Unit::Fahrenheit);
        assert_eq!(result.to_string(), "101.30°F");
    }
}
