use std::io::Write;

use anyhow::anyhow;
use anyhow::Result;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use colored::*;
use env_logger::Builder;

use cofold::conc_parsers::ConcentrationArguments;
use cofold::energy::NucleotideVec;
use cofold::energy::PartitionFunctionModel;
use cofold::energy_parsers::EnergyModelArguments;
use cofold::input_parsers::read_cofold_input;
use cofold::pf::cofold;
use cofold::pf::dimer_concentrations_from_runs;
use cofold::pf::CofoldOptions;

#[derive(Debug, Args)]
pub struct ConcInput {
    /// Input file with a two-strand record "A&B", or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Parser)]
#[command(name = "cofold-conc")]
#[command(author, version, about = "Equilibrium concentrations of A, B, AA, BB and AB")]
pub struct Cli {
    #[command(flatten)]
    pub input: ConcInput,

    #[command(flatten, next_help_heading = "Energy model parameters")]
    pub energy: EnergyModelArguments,

    #[command(flatten, next_help_heading = "Starting concentrations")]
    pub conc: ConcentrationArguments,
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
    init_logging(cli.input.verbose);
    cli.conc.validate()?;
    let startconc = cli.conc.start_concentrations()?;

    let model = cli.energy.build_model();
    let (header, sequence, cut_point) = read_cofold_input(&cli.input.input)?;
    if let Some(h) = header {
        println!("{}", h.yellow());
    }
    if cut_point == 0 {
        return Err(anyhow!("cofold-conc requires a two-strand input (A&B)"));
    }

    let strand_a = NucleotideVec(sequence[..cut_point - 1].to_vec());
    let strand_b = NucleotideVec(sequence[cut_point - 1..].to_vec());

    let (_, ab) = cofold(&sequence, cut_point, &model, CofoldOptions::default())?;
    let fea = ab.energies.fa;
    let feb = ab.energies.fb;
    let fcab = ab.energies.fcab;

    let seq_aa = NucleotideVec([strand_a.0.clone(), strand_a.0.clone()].concat());
    let (_, aa) = cofold(&seq_aa, strand_a.len() + 1, &model, CofoldOptions::default())?;
    let fcaa = aa.energies.fcab;

    let seq_bb = NucleotideVec([strand_b.0.clone(), strand_b.0.clone()].concat());
    let (_, bb) = cofold(&seq_bb, strand_b.len() + 1, &model, CofoldOptions::default())?;
    let fcbb = bb.energies.fcab;

    let results = dimer_concentrations_from_runs(fcab, fcaa, fcbb, fea, feb, model.kt(), &startconc);

    println!("{:>10} {:>10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "concA", "concB", "[A]", "[B]", "[AA]", "[BB]", "[AB]", "converged");
    for c in &results {
        println!("{:>10.4e} {:>10.4e} {:>12.4e} {:>12.4e} {:>12.4e} {:>12.4e} {:>12.4e} {:>10}",
            c.ac_start, c.bc_start, c.a_c, c.b_c, c.aa_c, c.bb_c, c.ab_c, c.converged);
    }

    println!("{}", serde_json::to_string_pretty(&results.iter().map(|c| {
        serde_json::json!({
            "concA": c.ac_start,
            "concB": c.bc_start,
            "A": c.a_c,
            "B": c.b_c,
            "AA": c.aa_c,
            "BB": c.bb_c,
            "AB": c.ab_c,
            "converged": c.converged,
        })
    }).collect::<Vec<_>>())?);

    Ok(())
}
