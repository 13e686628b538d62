//! Command-line parsing for the DCF valuation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the valuation math.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::GrowthScenario;
use crate::domain::{InputMode, ValuationInputs};
use crate::engine::WaccInputs;
use crate::io::{DEFAULT_SHARE_BASE_URL, STORE_ENV_VAR};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dcf", version, about = "Discounted Cash Flow valuation calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a valuation and print the report (or JSON).
    Value(ValueArgs),
    /// Compute a discount rate from CAPM and capital structure.
    Wacc(WaccArgs),
    /// Print a shareable link for a set of inputs.
    Share(ShareArgs),
    /// Save, list or show named scenarios.
    Scenario(ScenarioArgs),
    /// Ask the AI for base/bull/bear FCF growth assumptions.
    Assumptions(AssumptionsArgs),
    /// Compare the intrinsic value with the live market price.
    Summary(SummaryArgs),
    /// Ask the DCF tutor a question.
    Ask(AskArgs),
    /// Launch the interactive TUI.
    ///
    /// Edits are recomputed live with the same engine as `dcf value`.
    Tui(TuiArgs),
}

/// Valuation input overrides shared by every command that values a company.
///
/// Unset flags keep the value from the loaded scenario/link (or the defaults).
#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// Ticker symbol.
    #[arg(short = 't', long)]
    pub ticker: Option<String>,

    /// Number of forecast years.
    #[arg(short = 'y', long)]
    pub years: Option<u32>,

    /// How projected cash flows are derived.
    #[arg(long, value_enum)]
    pub mode: Option<InputMode>,

    /// Base free cash flow ($M), grown from year 1.
    #[arg(long, allow_negative_numbers = true)]
    pub base_fcf: Option<f64>,

    /// Annual FCF growth rate (%).
    #[arg(long, allow_negative_numbers = true)]
    pub growth: Option<f64>,

    /// Explicit FCF values ($M), repeatable or comma-separated. Implies `--mode explicit`.
    #[arg(long = "fcf", value_name = "FCF", value_delimiter = ',', allow_negative_numbers = true)]
    pub fcf: Vec<f64>,

    /// Discount rate / WACC (%).
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub discount_rate: Option<f64>,

    /// Terminal growth rate (%).
    #[arg(short = 'g', long, allow_negative_numbers = true)]
    pub terminal_growth: Option<f64>,

    /// Shares outstanding (M).
    #[arg(long, allow_negative_numbers = true)]
    pub shares: Option<f64>,

    /// Net debt ($M); negative for net cash.
    #[arg(long, allow_negative_numbers = true)]
    pub net_debt: Option<f64>,

    /// Load explicit FCFs from a CSV (header row, FCF in column 2).
    ///
    /// Applied after the other flags, so the row count is checked against the final horizon.
    #[arg(long, value_name = "PATH", conflicts_with = "fcf")]
    pub csv: Option<PathBuf>,
}

impl InputArgs {
    /// Overlay the set flags onto `inputs`. `--csv` is left to the caller since it does I/O.
    ///
    /// `--fcf` switches to explicit mode and, without `--years`, sets the
    /// horizon to the number of values. Changing the horizon in explicit mode
    /// without `--fcf` pads or truncates the existing series, like the form does.
    pub fn apply_to(&self, inputs: &mut ValuationInputs) {
        if let Some(ticker) = &self.ticker {
            inputs.ticker = ticker.trim().to_string();
        }
        if let Some(years) = self.years {
            inputs.forecast_years = years;
        }
        if let Some(mode) = self.mode {
            inputs.input_mode = mode;
        }
        if let Some(v) = self.base_fcf {
            inputs.base_fcf = v;
        }
        if let Some(v) = self.growth {
            inputs.fcf_growth_rate = v;
        }
        if let Some(v) = self.discount_rate {
            inputs.discount_rate = v;
        }
        if let Some(v) = self.terminal_growth {
            inputs.terminal_growth_rate = v;
        }
        if let Some(v) = self.shares {
            inputs.shares_outstanding = v;
        }
        if let Some(v) = self.net_debt {
            inputs.net_debt = v;
        }

        if !self.fcf.is_empty() {
            inputs.explicit_fcfs = self.fcf.clone();
            if self.mode.is_none() {
                inputs.input_mode = InputMode::Explicit;
            }
            if self.years.is_none() {
                inputs.forecast_years = self.fcf.len() as u32;
            }
        } else if self.years.is_some() && inputs.input_mode == InputMode::Explicit {
            inputs.resize_explicit_fcfs();
        }
    }
}

/// Where the starting inputs come from.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Start from a saved scenario (id or exact name).
    #[arg(long, value_name = "NAME_OR_ID", conflicts_with = "link")]
    pub scenario: Option<String>,

    /// Start from a share link (full URL or bare token).
    #[arg(long, value_name = "URL")]
    pub link: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args, Clone, Default)]
pub struct StoreArgs {
    /// Scenario store file (defaults to the user data directory).
    #[arg(long, value_name = "PATH", env = STORE_ENV_VAR)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print `{inputs, result}` as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Write inputs and the full result to a JSON file.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Write the sensitivity grid to a CSV file.
    #[arg(long = "export-grid", value_name = "PATH")]
    pub export_grid: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WaccArgs {
    /// Risk-free rate (%).
    #[arg(long, default_value_t = WaccInputs::default().risk_free_rate)]
    pub rf: f64,

    /// Equity beta.
    #[arg(long, allow_negative_numbers = true, default_value_t = WaccInputs::default().beta)]
    pub beta: f64,

    /// Market risk premium (%).
    #[arg(long, default_value_t = WaccInputs::default().market_risk_premium)]
    pub mrp: f64,

    /// Pre-tax cost of debt (%).
    #[arg(long, default_value_t = WaccInputs::default().pre_tax_cost_of_debt)]
    pub cost_of_debt: f64,

    /// Marginal tax rate (%).
    #[arg(long, default_value_t = WaccInputs::default().tax_rate)]
    pub tax_rate: f64,

    /// Weight of equity (%).
    #[arg(long, default_value_t = WaccInputs::default().equity_weight)]
    pub equity_weight: f64,

    /// Weight of debt (%).
    #[arg(long, default_value_t = WaccInputs::default().debt_weight)]
    pub debt_weight: f64,

    /// Print the breakdown as JSON.
    #[arg(long)]
    pub json: bool,
}

impl WaccArgs {
    pub fn to_inputs(&self) -> WaccInputs {
        WaccInputs {
            risk_free_rate: self.rf,
            beta: self.beta,
            market_risk_premium: self.mrp,
            pre_tax_cost_of_debt: self.cost_of_debt,
            tax_rate: self.tax_rate,
            equity_weight: self.equity_weight,
            debt_weight: self.debt_weight,
        }
    }
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Page the link points at.
    #[arg(long, default_value = DEFAULT_SHARE_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub action: ScenarioCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenarioCommand {
    /// Save the resolved inputs under a name.
    Save(ScenarioSaveArgs),
    /// List saved scenarios.
    List(StoreArgs),
    /// Show one scenario's valuation.
    Show(ScenarioShowArgs),
}

#[derive(Debug, Args)]
pub struct ScenarioSaveArgs {
    /// Scenario name (defaults to the ticker).
    pub name: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub inputs: InputArgs,
}

#[derive(Debug, Args)]
pub struct ScenarioShowArgs {
    /// Scenario id or exact name.
    pub key: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the stored record as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AssumptionsArgs {
    /// Ticker symbol.
    pub ticker: String,

    /// Also value the company with this case's growth rate.
    #[arg(long, value_enum)]
    pub apply: Option<GrowthScenario>,

    /// Starting inputs when `--apply` is used.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the assumptions as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question (words are joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub inputs: InputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn value_flags_parse() {
        let cli = parse(&["dcf", "value", "-t", "msft", "-y", "3", "-r", "9", "-g", "2", "--net-debt", "-5000"]);
        let Command::Value(args) = cli.command else {
            panic!("expected value");
        };
        assert_eq!(args.inputs.ticker.as_deref(), Some("msft"));
        assert_eq!(args.inputs.years, Some(3));
        assert_eq!(args.inputs.net_debt, Some(-5000.0));
        assert!(!args.json);
    }

    #[test]
    fn fcf_accepts_repeats_and_commas() {
        let cli = parse(&["dcf", "value", "--fcf", "1,2", "--fcf", "-3"]);
        let Command::Value(args) = cli.command else {
            panic!("expected value");
        };
        assert_eq!(args.inputs.fcf, vec![1.0, 2.0, -3.0]);
    }

    #[test]
    fn scenario_and_link_conflict() {
        assert!(Cli::try_parse_from(["dcf", "value", "--scenario", "a", "--link", "b"]).is_err());
        assert!(Cli::try_parse_from(["dcf", "value", "--csv", "f.csv", "--fcf", "1"]).is_err());
    }

    #[test]
    fn fcf_flag_switches_to_explicit_and_sets_years() {
        let args = InputArgs {
            fcf: vec![10.0, 20.0, 30.0],
            ..InputArgs::default()
        };
        let mut inputs = ValuationInputs::default();
        args.apply_to(&mut inputs);
        assert_eq!(inputs.input_mode, InputMode::Explicit);
        assert_eq!(inputs.forecast_years, 3);
        assert_eq!(inputs.explicit_fcfs, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn years_change_resizes_explicit_series() {
        let mut inputs = ValuationInputs {
            input_mode: InputMode::Explicit,
            ..ValuationInputs::default()
        };
        let args = InputArgs {
            years: Some(7),
            ..InputArgs::default()
        };
        args.apply_to(&mut inputs);
        assert_eq!(inputs.explicit_fcfs.len(), 7);
        assert_eq!(inputs.explicit_fcfs[6], 0.0);

        // Base-growth mode leaves the explicit series alone.
        let mut inputs = ValuationInputs::default();
        args.apply_to(&mut inputs);
        assert_eq!(inputs.explicit_fcfs.len(), 5);
    }

    #[test]
    fn wacc_defaults_match_helper() {
        let cli = parse(&["dcf", "wacc"]);
        let Command::Wacc(args) = cli.command else {
            panic!("expected wacc");
        };
        assert_eq!(args.to_inputs(), WaccInputs::default());
    }

    #[test]
    fn scenario_subcommands_parse() {
        let cli = parse(&["dcf", "scenario", "save", "bull", "--growth", "9", "--store", "/tmp/s.json"]);
        let Command::Scenario(ScenarioArgs {
            action: ScenarioCommand::Save(save),
        }) = cli.command
        else {
            panic!("expected scenario save");
        };
        assert_eq!(save.name.as_deref(), Some("bull"));
        assert_eq!(save.inputs.growth, Some(9.0));
        assert_eq!(save.source.store.store, Some(PathBuf::from("/tmp/s.json")));

        let cli = parse(&["dcf", "ask", "what", "is", "wacc?"]);
        let Command::Ask(ask) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(ask.question.join(" "), "what is wacc?");
    }
}
