//! End-to-end checks through the public library API.

use clap::Parser;
use dcf_valuation::app::pipeline::{resolve_inputs, run_valuation};
use dcf_valuation::cli::{Cli, Command};
use dcf_valuation::domain::{InputMode, ValuationInputs, GRID_SIDE};
use dcf_valuation::engine::{compute_valuation, WaccInputs};
use dcf_valuation::io::{apply_fcf_values, decode_share_link, encode_share_link, parse_fcf_csv, ScenarioStore};
use dcf_valuation::report::format_valuation;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * b.abs().max(1.0)
}

fn value_command(args: &[&str]) -> ValuationInputs {
    let mut argv = vec!["dcf", "value"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Value(args) => resolve_inputs(&args.source, &args.inputs).unwrap(),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn default_company_matches_reference_figures() {
    let result = compute_valuation(&ValuationInputs::default());

    let expected_fcf = [105_000.0, 110_250.0, 115_762.5, 121_550.625, 127_628.156_25];
    assert_eq!(result.projected_fcf.len(), expected_fcf.len());
    for (got, want) in result.projected_fcf.iter().zip(expected_fcf) {
        assert!(close(*got, want), "{got} vs {want}");
    }

    assert!(close(result.pv_fcf, 453_644.364_095_882_7));
    assert!(close(result.terminal_value, 2_180_314.335_937_5));
    assert!(close(result.pv_terminal_value, 1_450_008.070_445_400_4));
    assert!(close(result.enterprise_value, 1_903_652.434_541_283_2));
    assert!(close(result.equity_value, 1_853_652.434_541_283_2));
    assert!(close(result.intrinsic_value_per_share, 119.590_479_647_824_72));
    assert!(result.warnings.is_empty());

    let table = result.sensitivity_table();
    assert_eq!(table.rows.len(), GRID_SIDE);
    assert!(table.rows.iter().all(|row| row.len() == GRID_SIDE));
    let center = table.rows[2][2];
    assert!(close(center.value, result.intrinsic_value_per_share));
}

#[test]
fn cli_flags_flow_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.json");
    let store = store.to_str().unwrap();

    let inputs = value_command(&["--store", store, "--fcf", "100,200,300", "-r", "10", "-g", "2"]);
    assert_eq!(inputs.input_mode, InputMode::Explicit);
    assert_eq!(inputs.forecast_years, 3);

    let run = run_valuation(inputs);
    assert_eq!(run.result.projected_fcf, vec![100.0, 200.0, 300.0]);
    assert!(run.result.warnings.is_empty());

    let report = format_valuation(&run.inputs, &run.result);
    assert!(report.contains("Explicit"));
    assert!(report.contains("Sensitivity"));
}

#[test]
fn degenerate_rates_warn_and_report_na() {
    let mut inputs = ValuationInputs::default();
    inputs.discount_rate = 2.5;
    let result = compute_valuation(&inputs);

    assert_eq!(result.terminal_value, 0.0);
    assert_eq!(result.intrinsic_value_per_share, 0.0);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.per_share().is_none());
    assert!(close(result.enterprise_value, result.pv_fcf));

    inputs.shares_outstanding = 0.0;
    let result = compute_valuation(&inputs);
    assert_eq!(result.warnings.len(), 2);
    let report = format_valuation(&inputs, &result);
    assert!(report.contains("Input warnings:"));
    assert!(report.contains("N/A"));
}

#[test]
fn shared_link_restores_a_saved_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = ScenarioStore::new(dir.path().join("scenarios.json"));

    let mut inputs = ValuationInputs::default();
    WaccInputs::default().apply_to(&mut inputs);
    assert_eq!(inputs.discount_rate, 9.39);

    let saved = store.save("Apple base", &inputs).unwrap();
    let link = encode_share_link(&store.get(&saved.id).unwrap().inputs, "https://dcf.example/").unwrap();
    let restored = decode_share_link(&link).unwrap();
    assert_eq!(restored, inputs);
    assert_eq!(compute_valuation(&restored), compute_valuation(&inputs));
}

#[test]
fn csv_import_replaces_the_forecast() {
    let csv = "year,fcf\n1,90000\n2,95000\n3,99000\n4,104000\n5,110000\n";
    let values = parse_fcf_csv(csv.as_bytes()).unwrap();

    let mut inputs = ValuationInputs::default();
    apply_fcf_values(&mut inputs, values).unwrap();
    assert_eq!(inputs.input_mode, InputMode::Explicit);

    let result = compute_valuation(&inputs);
    assert_eq!(result.projected_fcf[4], 110_000.0);
    assert!(result.intrinsic_value_per_share < 119.59);

    let short = parse_fcf_csv("year,fcf\n1,5\n".as_bytes()).unwrap();
    let err = apply_fcf_values(&mut inputs, short).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(inputs.explicit_fcfs.len(), 5);
}
