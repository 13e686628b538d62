//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves valuation inputs (scenario, link, flags, CSV)
//! - runs the valuation engine
//! - calls the network collaborators for the AI commands
//! - prints reports and writes optional exports

use clap::Parser;
use serde::Serialize;

use crate::cli::{
    AskArgs, AssumptionsArgs, Command, ScenarioCommand, ScenarioSaveArgs, ScenarioShowArgs, ShareArgs, StoreArgs,
    SummaryArgs, TuiArgs, ValueArgs, WaccArgs,
};
use crate::data::{AssumptionAdvisor, ServiceConfig, Summarizer, Tutor};
use crate::domain::InputMode;
use crate::error::AppError;
use crate::io::{ScenarioStore, encode_share_link, write_grid_csv, write_result_json};
use crate::report;

pub mod pipeline;

/// Entry point for the `dcf` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dcf` and `dcf -t MSFT` to behave like `dcf tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Value(args) => handle_value(args),
        Command::Wacc(args) => handle_wacc(args),
        Command::Share(args) => handle_share(args),
        Command::Scenario(args) => match args.action {
            ScenarioCommand::Save(args) => handle_scenario_save(args),
            ScenarioCommand::List(args) => handle_scenario_list(args),
            ScenarioCommand::Show(args) => handle_scenario_show(args),
        },
        Command::Assumptions(args) => handle_assumptions(args),
        Command::Summary(args) => handle_summary(args),
        Command::Ask(args) => handle_ask(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// Whether `args` will run the TUI (used by `main` to pick the default log filter).
pub fn is_tui_invocation(args: &[String]) -> bool {
    rewrite_args(args.to_vec()).get(1).is_some_and(|a| a == "tui")
}

fn handle_value(args: ValueArgs) -> Result<(), AppError> {
    let inputs = pipeline::resolve_inputs(&args.source, &args.inputs)?;
    let run = pipeline::run_valuation(inputs);

    if args.json {
        #[derive(Serialize)]
        struct Output<'a> {
            inputs: &'a crate::domain::ValuationInputs,
            result: &'a crate::domain::ValuationResult,
        }
        print_json(&Output {
            inputs: &run.inputs,
            result: &run.result,
        })?;
    } else {
        println!("{}", report::format_valuation(&run.inputs, &run.result));
    }

    // Optional exports.
    if let Some(path) = &args.export_json {
        write_result_json(path, &run.inputs, &run.result)?;
    }
    if let Some(path) = &args.export_grid {
        write_grid_csv(path, &run.result)?;
    }

    Ok(())
}

fn handle_wacc(args: WaccArgs) -> Result<(), AppError> {
    let wacc = args.to_inputs();
    if args.json {
        print_json(&wacc.breakdown())
    } else {
        print!("{}", report::format_wacc(&wacc));
        Ok(())
    }
}

fn handle_share(args: ShareArgs) -> Result<(), AppError> {
    let inputs = pipeline::resolve_inputs(&args.source, &args.inputs)?;
    println!("{}", encode_share_link(&inputs, &args.base_url)?);
    Ok(())
}

fn handle_scenario_save(args: ScenarioSaveArgs) -> Result<(), AppError> {
    let inputs = pipeline::resolve_inputs(&args.source, &args.inputs)?;
    let name = args.name.clone().unwrap_or_else(|| inputs.ticker.clone());
    let store = pipeline::open_store(&args.source)?;
    let saved = store.save(&name, &inputs)?;
    println!("Scenario \"{}\" saved (id {}) to {}", saved.name, saved.id, store.path().display());
    Ok(())
}

fn handle_scenario_list(args: StoreArgs) -> Result<(), AppError> {
    let store = ScenarioStore::resolve(args.store.as_deref())?;
    print!("{}", report::format_scenarios(&store.load()));
    Ok(())
}

fn handle_scenario_show(args: ScenarioShowArgs) -> Result<(), AppError> {
    let store = ScenarioStore::resolve(args.store.store.as_deref())?;
    let scenario = store.get(&args.key)?;
    if args.json {
        return print_json(&scenario);
    }

    println!("Scenario \"{}\" (id {})\n", scenario.name, scenario.id);
    let run = pipeline::run_valuation(scenario.inputs);
    println!("{}", report::format_valuation(&run.inputs, &run.result));
    Ok(())
}

fn handle_assumptions(args: AssumptionsArgs) -> Result<(), AppError> {
    let config = ServiceConfig::from_env();
    let advisor = AssumptionAdvisor::new(&config)?;
    let assumptions = advisor.generate(&args.ticker)?;

    if args.json {
        print_json(&assumptions)?;
    } else {
        println!("{}", report::format_assumptions(&args.ticker, &assumptions));
    }

    if let Some(scenario) = args.apply {
        let mut inputs = pipeline::load_base_inputs(&args.source)?;
        inputs.ticker = args.ticker.trim().to_uppercase();
        inputs.input_mode = InputMode::BaseGrowth;
        inputs.fcf_growth_rate = assumptions.case(scenario).rate;

        let run = pipeline::run_valuation(inputs);
        println!("Applied {}:\n", scenario.display_name());
        println!("{}", report::format_valuation(&run.inputs, &run.result));
    }

    Ok(())
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let inputs = pipeline::resolve_inputs(&args.source, &args.inputs)?;
    let run = pipeline::run_valuation(inputs);
    let Some(per_share) = run.result.per_share() else {
        return Err(AppError::new(
            2,
            format!("Cannot summarize an invalid valuation: {}", run.result.warnings.join(" ")),
        ));
    };

    let config = ServiceConfig::from_env();
    let summary = Summarizer::new(&config)?.summarize(&run.inputs.ticker, per_share)?;

    if args.json {
        print_json(&summary)
    } else {
        print!("{}", report::format_summary(&summary));
        Ok(())
    }
}

fn handle_ask(args: AskArgs) -> Result<(), AppError> {
    let config = ServiceConfig::from_env();
    let answer = Tutor::new(&config)?.ask(&args.question.join(" "))?;
    println!("{answer}");
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let inputs = pipeline::resolve_inputs(&args.source, &args.inputs)?;
    let store = pipeline::open_store(&args.source)?;
    crate::tui::run(inputs, store, ServiceConfig::from_env())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Rewrite argv so `dcf` defaults to `dcf tui`.
///
/// Rules:
/// - `dcf`                      -> `dcf tui`
/// - `dcf -t MSFT ...`          -> `dcf tui -t MSFT ...`
/// - `dcf --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "value" | "wacc" | "share" | "scenario" | "assumptions" | "summary" | "ask" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
