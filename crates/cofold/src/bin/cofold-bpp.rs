use std::io::Write;

use anyhow::Result;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use colored::*;
use env_logger::Builder;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

use cofold::energy_parsers::EnergyModelArguments;
use cofold::input_parsers::read_cofold_input;
use cofold::pf::cofold;
use cofold::pf::mea_structure;
use cofold::pf::CofoldOptions;
use cofold::pf::DEFAULT_GAMMA;
use cofold::structure::with_cut_point;
use cofold::structure::DotBracketVec;

#[derive(Debug, Args)]
pub struct BppInput {
    /// Input file (FASTA-like, strands separated by '&'), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Also print the maximum-expected-accuracy dot-bracket structure.
    #[arg(long)]
    pub mea: bool,

    /// Paired-vs-unpaired reliability weight for the MEA structure.
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Only print pairs with probability at or above this threshold.
    #[arg(long, default_value_t = 1e-6)]
    pub cutoff: f64,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Parser)]
#[command(name = "cofold-bpp")]
#[command(author, version, about = "Report base pair probabilities (and optionally an MEA structure)")]
pub struct Cli {
    #[command(flatten)]
    pub bpp: BppInput,

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
    init_logging(cli.bpp.verbose);

    let model = cli.energy.build_model();
    let (header, sequence, cut_point) = read_cofold_input(&cli.bpp.input)?;
    if let Some(h) = header {
        println!("{}", h.yellow());
    }
    println!("{}", sequence);

    let n = sequence.len();
    let pb = if n > 1600 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} computing base pair probabilities...").unwrap());
        Some(pb)
    } else {
        None
    };

    let (ctx, result) = cofold(&sequence, cut_point, &model, CofoldOptions { compute_bpp: true })?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let probs = result.probs.expect("compute_bpp was requested");
    for j in 2..=ctx.n {
        for i in 1..j {
            let p = probs[ctx.pair_index(i, j)];
            if p >= cli.bpp.cutoff {
                println!("{:>5} {:>5} {:.6}", i, j, p);
            }
        }
    }

    if cli.bpp.mea {
        let pt = mea_structure(&ctx, &probs, cli.bpp.gamma);
        let dbv = DotBracketVec::from(&pt);
        let rendered = with_cut_point(&dbv, cut_point);
        println!("{}", rendered.to_string().green());
    }

    Ok(())
}
