use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::Args;

/// Starting concentrations for the equilibrium concentration solver.
#[derive(Debug, Args)]
pub struct ConcentrationArguments {
    /// File with one "concA concB" pair per line, terminated by an explicit
    /// "0 0" line or end of file.
    #[arg(long, value_name = "FILE")]
    pub startconc: Option<PathBuf>,

    /// A starting concentration pair given directly as "--conc concA
    /// concB". May be repeated.
    #[arg(long = "conc", num_args = 2, value_names = ["CONC_A", "CONC_B"])]
    pub conc: Vec<f64>,
}

impl ConcentrationArguments {
    /// Validate that at least one source of starting concentrations was
    /// given.
    pub fn validate(&self) -> Result<()> {
        if self.startconc.is_none() && self.conc.is_empty() {
            bail!("at least one of --startconc or --conc is required");
        }
        Ok(())
    }

    /// Flatten `--conc` pairs and the `--startconc` file into a single
    /// list of `(concA, concB)` pairs, stopping at the file's `(0, 0)`
    /// sentinel line if present.
    pub fn start_concentrations(&self) -> Result<Vec<(f64, f64)>> {
        let mut pairs = Vec::new();
        for chunk in self.conc.chunks(2) {
            if let [a, b] = *chunk {
                pairs.push((a, b));
            }
        }

        if let Some(path) = &self.startconc {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let mut parts = line.split_whitespace();
                let a: f64 = parts
                    .next()
                    .ok_or_else(|| anyhow!("missing concA in line {:?}", line))?
                    .parse()?;
                let b: f64 = parts
                    .next()
                    .ok_or_else(|| anyhow!("missing concB in line {:?}", line))?
                    .parse()?;
                if a == 0.0 && b == 0.0 {
                    break;
                }
                pairs.push((a, b));
            }
        }

        if pairs.is_empty() {
            return Err(anyhow!("no starting concentrations provided"));
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_rejects_empty_arguments() {
        let args = ConcentrationArguments { startconc: None, conc: vec![] };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_inline_conc_pairs_are_collected() {
        let args = ConcentrationArguments { startconc: None, conc: vec![1.0, 2.0, 3.0, 4.0] };
        let pairs = args.start_concentrations().unwrap();
        assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_file_parsing_stops_at_sentinel() {
        let mut path = std::env::temp_dir();
        path.push(format!("cofold-conc-test-{:?}.txt", std::thread::current().id()));
        File::create(&path).unwrap().write_all(b"1.0 2.0\n3.0 4.0\n0 0\n5.0 6.0\n").unwrap();

        let args = ConcentrationArguments { startconc: Some(path), conc: vec![] };
        let pairs = args.start_concentrations().unwrap();
        assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 4.0)]);
    }
}
