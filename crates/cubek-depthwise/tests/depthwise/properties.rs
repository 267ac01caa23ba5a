use cubecl::TestRuntime;
use cubecl::client::ComputeClient;
use cubek_depthwise::{Affine, DepthwiseProblem, DepthwiseSetupError, DepthwiseVariant, Strategy};
use cubek_test_utils::{HostData, HostDataType, assert_equals_bitwise, current_test_mode};
use half::f16;

use crate::suite::{client, run_depthwise, variant_problem};

/// Runs on f32, or returns `None` when the device can't run the kernel and the test mode
/// tolerates it.
fn run_or_skip(
    client: &ComputeClient<TestRuntime>,
    problem: &DepthwiseProblem,
    affine: Affine,
    input: &HostData,
    filter: &HostData,
) -> Option<HostData> {
    run_or_skip_as(client, problem, affine, HostDataType::F32, input, filter)
}

fn run_or_skip_as(
    client: &ComputeClient<TestRuntime>,
    problem: &DepthwiseProblem,
    affine: Affine,
    dtype: HostDataType,
    input: &HostData,
    filter: &HostData,
) -> Option<HostData> {
    match run_depthwise(client, problem, affine, Strategy::Auto, dtype, input, filter) {
        Ok(output) => Some(output),
        Err(err) if !current_test_mode().should_fail_on_launch_error() => {
            log::warn!("Skipping: {err}");
            None
        }
        Err(err) => panic!("{err}"),
    }
}

#[test_log::test]
fn ones_over_14x14_count_window_taps() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S1In14, 1, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 1.0);
    let filter = HostData::filled(problem.filter_shape().to_vec(), 1.0);
    let affine = Affine::new(0.5, 2.0);

    let Some(out) = run_or_skip(&client, &problem, affine, &input, &filter) else {
        return;
    };

    for c in 0..problem.channels {
        for (row, col, taps) in [
            (0, 0, 4.0),
            (0, 13, 4.0),
            (13, 0, 4.0),
            (13, 13, 4.0),
            (0, 5, 6.0),
            (9, 0, 6.0),
            (13, 7, 6.0),
            (6, 13, 6.0),
            (1, 1, 9.0),
            (7, 7, 9.0),
        ] {
            assert_eq!(out.get(&[0, c, row, col]), affine.apply(taps), "({c}, {row}, {col})");
        }
    }
}

#[test_log::test]
fn ones_over_14x14_in_f16_round_like_half() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S1In14, 1, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 1.0);
    let filter = HostData::filled(problem.filter_shape().to_vec(), 1.0);
    let affine = Affine::new(0.5, 2.0);

    let Some(out) = run_or_skip_as(&client, &problem, affine, HostDataType::F16, &input, &filter)
    else {
        return;
    };

    let (alpha, beta) = (f16::from_f32(affine.alpha), f16::from_f32(affine.beta));
    for (row, col, taps) in [(0, 0, 4.0), (0, 5, 6.0), (7, 7, 9.0)] {
        let expected = f16::from_f32(taps) * alpha + beta;
        assert_eq!(out.get(&[0, 0, row, col]), expected.to_f32(), "({row}, {col})");
    }
}

#[test_log::test]
fn stride_two_28x28_ends_on_last_real_row() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S2In28, 1, 1);
    assert_eq!(problem.output_shape(), [1, 8, 14, 14]);

    // Only the last input row is set, each filter row has its own weight.
    let input = HostData::from_fn(problem.input_shape().to_vec(), |i| {
        if i[2] == 27 { 1.0 } else { 0.0 }
    });
    let filter = HostData::from_fn(problem.filter_shape().to_vec(), |i| {
        [1.0, 10.0, 100.0][i[2]]
    });

    let Some(out) = run_or_skip(&client, &problem, Affine::IDENTITY, &input, &filter) else {
        return;
    };

    for c in 0..problem.channels {
        // Row 13 reads input rows 25..=27, so row 27 meets the third filter row.
        assert_eq!(out.get(&[0, c, 13, 5]), 300.0);
        assert_eq!(out.get(&[0, c, 13, 0]), 200.0);
        for row in 0..13 {
            assert_eq!(out.get(&[0, c, row, 5]), 0.0);
        }
    }
}

#[test_log::test]
fn zero_input_yields_beta_everywhere() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K5S1In28, 2, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 0.0);
    let filter = HostData::random(problem.filter_shape().to_vec(), 3, -1.0, 1.0);
    let affine = Affine::new(4.0, -0.75);

    let Some(out) = run_or_skip(&client, &problem, affine, &input, &filter) else {
        return;
    };

    assert!(out.data.iter().all(|v| *v == -0.75));
}

#[test_log::test]
fn padded_taps_add_nothing() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S1In56, 1, 1);
    let input = HostData::from_fn(problem.input_shape().to_vec(), |i| {
        if i[2] == 0 && i[3] == 0 { 1.0 } else { 0.0 }
    });
    // Only the top-left tap, which lies in the halo for output (0, 0).
    let filter = HostData::from_fn(problem.filter_shape().to_vec(), |i| {
        if i[2] == 0 && i[3] == 0 { 1.0 } else { 0.0 }
    });

    let Some(out) = run_or_skip(&client, &problem, Affine::IDENTITY, &input, &filter) else {
        return;
    };

    assert_eq!(out.get(&[0, 0, 0, 0]), 0.0);
    assert_eq!(out.get(&[0, 0, 1, 1]), 1.0);
    assert_eq!(out.data.iter().sum::<f32>(), 1.0);
}

#[test_log::test]
fn affine_matches_scaled_identity() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S2In56, 1, 2);
    let input = HostData::random(problem.input_shape().to_vec(), 11, -1.0, 1.0);
    let filter = HostData::random(problem.filter_shape().to_vec(), 12, -1.0, 1.0);
    let affine = Affine::new(2.0, 0.5);

    let Some(plain) = run_or_skip(&client, &problem, Affine::IDENTITY, &input, &filter) else {
        return;
    };
    let Some(fused) = run_or_skip(&client, &problem, affine, &input, &filter) else {
        return;
    };

    for (p, f) in plain.data.iter().zip(&fused.data) {
        assert!((affine.apply(*p) - f).abs() <= 1e-5, "{p} -> {f}");
    }
}

#[test_log::test]
fn repeated_runs_are_bitwise_identical() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K5S2In14, 2, 1);
    let input = HostData::random(problem.input_shape().to_vec(), 21, -1.0, 1.0);
    let filter = HostData::random(problem.filter_shape().to_vec(), 22, -1.0, 1.0);
    let affine = Affine::new(0.3, 0.1);

    let Some(first) = run_or_skip(&client, &problem, affine, &input, &filter) else {
        return;
    };
    let Some(second) = run_or_skip(&client, &problem, affine, &input, &filter) else {
        return;
    };

    if let Err(err) = assert_equals_bitwise(&first, &second) {
        panic!("{err}");
    }
}

#[test_log::test]
fn invalid_channel_count_is_rejected_before_launch() {
    let client = client();
    let problem = DepthwiseProblem::same_padded(1, 12, 14, 3, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 1.0);
    let filter = HostData::filled(problem.filter_shape().to_vec(), 1.0);

    let err = run_depthwise(
        &client,
        &problem,
        Affine::IDENTITY,
        Strategy::Auto,
        HostDataType::F32,
        &input,
        &filter,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        DepthwiseSetupError::ChannelMultiple {
            channels: 12,
            group: 16
        }
    ));
}

#[test_log::test]
fn handles_must_store_the_launched_element_type() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S1In7, 1, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 1.0)
        .to_handle(&client, HostDataType::F32);
    let filter = HostData::filled(problem.filter_shape().to_vec(), 1.0)
        .to_handle(&client, HostDataType::F32);
    let output =
        HostData::empty_handle(&client, problem.output_shape().to_vec(), HostDataType::F32);

    let err = cubek_depthwise::launch_ref(
        &Strategy::Auto,
        &client,
        &input.as_ref(),
        &filter.as_ref(),
        &output.as_ref(),
        &problem,
        Affine::IDENTITY,
        HostDataType::F16.storage_type(),
    )
    .unwrap_err();

    assert!(matches!(err, DepthwiseSetupError::InvalidHandle(_)));
}

#[test_log::test]
fn forced_variant_must_fit_problem() {
    let client = client();
    let problem = variant_problem(DepthwiseVariant::K3S1In7, 1, 1);
    let input = HostData::filled(problem.input_shape().to_vec(), 1.0);
    let filter = HostData::filled(problem.filter_shape().to_vec(), 1.0);

    let err = run_depthwise(
        &client,
        &problem,
        Affine::IDENTITY,
        Strategy::Forced(DepthwiseVariant::K5S1In7),
        HostDataType::F32,
        &input,
        &filter,
    )
    .unwrap_err();

    assert!(matches!(err, DepthwiseSetupError::VariantMismatch { .. }));
}
