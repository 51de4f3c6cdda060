use std::io::Write;

use anyhow::Result;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use colored::*;
use env_logger::Builder;
use log::info;

use cofold::energy_parsers::EnergyModelArguments;
use cofold::input_parsers::read_cofold_input;
use cofold::input_parsers::ruler;
use cofold::energy::PartitionFunctionModel;
use cofold::pf::cofold;
use cofold::pf::CofoldOptions;

#[derive(Debug, Args)]
pub struct EvalInput {
    /// Input file (FASTA-like, strands separated by '&'), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Parser)]
#[command(name = "cofold-eval")]
#[command(author, version, about = "Report dimer/monomer ensemble free energies")]
pub struct Cli {
    #[command(flatten)]
    pub eval: EvalInput,

    #[command(flatten, next_help_heading = "Energy model parameters")]
    pub energy: EnergyModelArguments,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.eval.verbose);

    let model = cli.energy.build_model();
    let (header, sequence, cut_point) = read_cofold_input(&cli.eval.input)?;
    if let Some(h) = header {
        println!("{}", h.yellow());
    }

    info!("{}", ruler(sequence.len() - 1).magenta());
    let (_ctx, result) = cofold(&sequence, cut_point, &model, CofoldOptions::default())?;
    println!("{}", sequence);
    info!("{}", ruler(sequence.len() - 1).magenta());

    let e = result.energies;
    let kt = model.kt();
    println!("FA  = {:>8.2} kcal/mol", e.fa);
    println!("FB  = {:>8.2} kcal/mol", e.fb);
    println!("FAB = {:>8.2} kcal/mol", e.fab);
    println!("F0AB= {:>8.2} kcal/mol", e.f0ab);
    println!("FcAB= {:>8.2} kcal/mol", e.fcab);
    println!("kT  = {:>8.4} kcal/mol", kt);

    Ok(())
}
