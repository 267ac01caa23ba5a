use crate::{HostData, current_test_mode};

/// Selection of indices along one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimFilter {
    Any,
    Index(usize),
    /// Inclusive range.
    Range(usize, usize),
}

pub type TensorFilter = Vec<DimFilter>;

impl DimFilter {
    fn contains(&self, index: usize) -> bool {
        match self {
            DimFilter::Any => true,
            DimFilter::Index(i) => *i == index,
            DimFilter::Range(start, end) => (*start..=*end).contains(&index),
        }
    }
}

pub fn parse_tensor_filter(text: &str) -> Result<TensorFilter, String> {
    text.split(',')
        .map(|entry| {
            let entry = entry.trim();
            if entry == "." {
                return Ok(DimFilter::Any);
            }
            match entry.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(start)?;
                    let end = parse_index(end)?;
                    if start > end {
                        return Err(format!("Empty range {entry}"));
                    }
                    Ok(DimFilter::Range(start, end))
                }
                None => parse_index(entry).map(DimFilter::Index),
            }
        })
        .collect()
}

fn parse_index(text: &str) -> Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("Invalid index '{text}'"))
}

fn filter_matches(filter: &TensorFilter, index: &[usize]) -> bool {
    filter.is_empty()
        || (filter.len() == index.len() && filter.iter().zip(index).all(|(f, i)| f.contains(*i)))
}

/// Compares two tensors element by element with a relative tolerance.
///
/// Elements pass when `|actual - expected| <= epsilon * max(1, |expected|)`, or when both
/// are NaN. Under a print test mode, the selected elements are printed.
pub fn assert_equals_approx(
    actual: &HostData,
    expected: &HostData,
    epsilon: f32,
) -> Result<(), String> {
    if actual.shape != expected.shape {
        return Err(format!(
            "Shape mismatch: got {:?}, expected {:?}",
            actual.shape, expected.shape
        ));
    }

    let mode = current_test_mode();
    let print = mode.print_filter();
    let mut first_failure = None;
    let mut failures = 0usize;

    for index in actual.indices() {
        let a = actual.get(&index);
        let e = expected.get(&index);
        let ok = (a.is_nan() && e.is_nan()) || (a - e).abs() <= epsilon * e.abs().max(1.0);

        if let Some((filter, fail_only)) = print {
            if (!ok || !fail_only) && filter_matches(filter, &index) {
                println!(
                    "{index:?} got={a} expected={e} {}",
                    if ok { "" } else { "<-- mismatch" }
                );
            }
        }

        if !ok {
            failures += 1;
            first_failure.get_or_insert((index, a, e));
        }
    }

    match first_failure {
        None => Ok(()),
        Some((index, a, e)) => Err(format!(
            "{failures} elements differ beyond epsilon {epsilon}, first at {index:?}: got {a}, expected {e}"
        )),
    }
}

/// Bitwise comparison, used when two runs of the same kernel must agree exactly.
pub fn assert_equals_bitwise(actual: &HostData, expected: &HostData) -> Result<(), String> {
    if actual.shape != expected.shape {
        return Err(format!(
            "Shape mismatch: got {:?}, expected {:?}",
            actual.shape, expected.shape
        ));
    }

    match actual
        .indices()
        .find(|index| actual.get(index).to_bits() != expected.get(index).to_bits())
    {
        None => Ok(()),
        Some(index) => Err(format!(
            "Outputs differ at {index:?}: {} vs {}",
            actual.get(&index),
            expected.get(&index)
        )),
    }
}
