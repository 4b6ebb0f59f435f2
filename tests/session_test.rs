mod reference;

use std::fs;

use halofir::config::{StreamConfig, TailPolicy, WindowAlignment};
use halofir::error::{FilterError, StreamRole};
use halofir::simulation::{generate_uniform, write_test_file};
use halofir::stream::{filter_file, read_samples_file, write_samples_file};

#[test]
fn test_default_run_filters_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("test_in.dat");
    let output_path = dir.path().join("test_out.dat");
    write_test_file(&input_path, 1000, 0).unwrap();

    let config = StreamConfig::default();
    let summary = filter_file(&config, &input_path, &output_path).unwrap();

    assert_eq!(summary.blocks_processed, 10);
    assert_eq!(summary.samples_written, 1000);
    assert_eq!(summary.samples_dropped, 0);
    assert_eq!(fs::metadata(&output_path).unwrap().len(), 8000);

    let input = read_samples_file(&input_path).unwrap();
    let output = read_samples_file(&output_path).unwrap();
    let weights = config.build_weights().unwrap();
    let expected = reference::filter_whole(&input, weights.as_slice(), WindowAlignment::Preceding);
    assert_eq!(output, expected);
}

#[test]
fn test_remainder_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.dat");
    let output_path = dir.path().join("out.dat");
    write_test_file(&input_path, 1055, 1).unwrap();

    let config = StreamConfig {
        input_size: None,
        ..Default::default()
    };
    let summary = filter_file(&config, &input_path, &output_path).unwrap();

    assert_eq!(summary.input_size, 1055);
    assert_eq!(summary.samples_read, 1000);
    assert_eq!(summary.samples_written, 1000);
    assert_eq!(summary.samples_dropped, 55);
    assert_eq!(read_samples_file(&output_path).unwrap().len(), 1000);
}

#[test]
fn test_remainder_is_zero_padded() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.dat");
    let output_path = dir.path().join("out.dat");
    let input = generate_uniform(1055, 1);
    write_samples_file(&input_path, &input).unwrap();

    let config = StreamConfig {
        input_size: None,
        tail: TailPolicy::ZeroPad,
        alignment: WindowAlignment::Inclusive,
        weights: Some(vec![0.1, 0.2, 0.4, 0.2, 0.1]),
        halo_size: 4,
        ..Default::default()
    };
    let summary = filter_file(&config, &input_path, &output_path).unwrap();
    assert!(summary.padded_tail);
    assert_eq!(summary.samples_written, 1055);

    let output = read_samples_file(&output_path).unwrap();
    let expected = reference::filter_whole(
        &input,
        &[0.1, 0.2, 0.4, 0.2, 0.1],
        WindowAlignment::Inclusive,
    );
    assert_eq!(output, expected);
}

#[test]
fn test_declared_size_beyond_file_is_short_read() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.dat");
    let output_path = dir.path().join("out.dat");
    write_test_file(&input_path, 450, 2).unwrap();

    // Default config declares 1000 samples
    let err = filter_file(&StreamConfig::default(), &input_path, &output_path).unwrap_err();
    assert!(matches!(
        err,
        FilterError::ShortRead {
            block: 4,
            expected: 100,
            got: 50
        }
    ));
}

#[test]
fn test_missing_input_aborts_before_output_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("out.dat");

    let err = filter_file(
        &StreamConfig::default(),
        dir.path().join("missing.dat"),
        &output_path,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        FilterError::StreamOpen {
            stream: StreamRole::Input,
            ..
        }
    ));
    assert!(!output_path.exists());
}

#[test]
fn test_invalid_halo_rejected_before_streams_open() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("out.dat");

    let config = StreamConfig {
        halo_size: 5,
        ..Default::default()
    };
    let err = filter_file(&config, dir.path().join("missing.dat"), &output_path).unwrap_err();

    assert!(matches!(err, FilterError::HaloTooSmall { .. }));
    assert!(!output_path.exists());
}

#[test]
fn test_independent_sessions_run_in_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let config = StreamConfig {
        input_size: None,
        ..Default::default()
    };

    let paths: Vec<_> = (0..2u64)
        .map(|n| {
            let input = dir.path().join(format!("in{n}.dat"));
            write_test_file(&input, 2000, n).unwrap();
            (input, dir.path().join(format!("out{n}.dat")))
        })
        .collect();

    std::thread::scope(|s| {
        for (input, output) in &paths {
            let config = &config;
            s.spawn(move || filter_file(config, input, output).unwrap());
        }
    });

    let weights = config.build_weights().unwrap();
    for (input, output) in &paths {
        let expected = reference::filter_whole(
            &read_samples_file(input).unwrap(),
            weights.as_slice(),
            WindowAlignment::Preceding,
        );
        assert_eq!(read_samples_file(output).unwrap(), expected);
    }
}
