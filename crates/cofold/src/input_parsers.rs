use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::{anyhow, Result};
use cf_energy::NucleotideVec;

// ============================================================
//  Cofold-aware sequence parsing: splits on the strand
//  separator ('&' or '+') and reports the resulting cut point.
// ============================================================

/// Split a raw sequence token on a strand separator and report the
/// resulting cut point (the 1-indexed first position of strand B, or `0`
/// for a single strand).
fn split_strands(token: &str) -> Result<(NucleotideVec, usize)> {
    let parts: Vec<&str> = token.split(['&', '+']).collect();
    match parts.as_slice() {
        [single] => Ok((NucleotideVec::from_lossy(single), 0)),
        [a, b] => {
            if a.is_empty() || b.is_empty() {
                return Err(anyhow!("empty strand in cofold input: {:?}", token));
            }
            let cut_point = a.len() + 1;
            let joined = format!("{}{}", a, b);
            Ok((NucleotideVec::from_lossy(&joined), cut_point))
        }
        _ => Err(anyhow!("cofold input supports at most two strands, got: {:?}", token)),
    }
}

/// Core parsing logic shared by all adapters: a FASTA-like record with an
/// optional header line, a sequence line (possibly two strands joined by
/// `&` or `+`), and nothing else.
fn parse_cofold_input<R: BufRead>(reader: R) -> Result<(Option<String>, NucleotideVec, usize)> {
    let mut header: Option<String> = None;
    let mut sequence: Option<(NucleotideVec, usize)> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            if sequence.is_some() {
                break;
            } else {
                continue;
            }
        }

        if line.starts_with('>') {
            header = Some(line.to_string());
        } else if sequence.is_none() {
            let token = line.split_whitespace().next().unwrap();
            sequence = Some(split_strands(token)?);
            break;
        }
    }

    let (sequence, cut_point) = sequence.ok_or_else(|| anyhow!("Missing sequence line"))?;
    Ok((header, sequence, cut_point))
}

// ============================================================
//  Input adapters: string / file / stdin / dispatch
// ============================================================

/// Read from a string buffer.
pub fn read_cofold_input_string(s: &str) -> Result<(Option<String>, NucleotideVec, usize)> {
    parse_cofold_input(Cursor::new(s))
}

/// Read from a file path.
pub fn read_cofold_input_file<P: AsRef<Path>>(path: P) -> Result<(Option<String>, NucleotideVec, usize)> {
    let reader = BufReader::new(File::open(path)?);
    parse_cofold_input(reader)
}

/// Read from stdin.
pub fn read_cofold_input_stdin() -> Result<(Option<String>, NucleotideVec, usize)> {
    let reader = BufReader::new(stdin());
    parse_cofold_input(reader)
}

/// Read either from stdin ("-") or a file path.
pub fn read_cofold_input(s: &str) -> Result<(Option<String>, NucleotideVec, usize)> {
    if s == "-" {
        read_cofold_input_stdin()
    } else {
        read_cofold_input_file(s)
    }
}

// ============================================================
//  Position ruler, for annotating sequence output
// ============================================================

pub fn ruler(len: usize) -> String {
    let mut s = String::new();
    let mut c = 0;
    for i in 0..=len {
        if i % 10 == 0 {
            let t = format!("{}", i / 10);
            c = t.len() - 1;
            s.push_str(&t);
            continue;
        } else if c > 0 {
            c -= 1;
            continue;
        }
        if i % 10 == 5 {
            s.push(',');
        } else {
            s.push('.');
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruler() {
        assert_eq!(ruler(0), "0");
        assert_eq!(ruler(5), "0....,");
        assert_eq!(ruler(10), "0....,....1");
    }

    #[test]
    fn test_single_strand_input_has_cut_point_zero() {
        let input = ">test\nGCGCAUAUGCGC\n";
        let (hdr, seq, cp) = read_cofold_input_string(input).unwrap();
        assert_eq!(hdr, Some(">test".into()));
        assert_eq!(seq.to_string(), "GCGCAUAUGCGC");
        assert_eq!(cp, 0);
    }

    #[test]
    fn test_two_strand_input_reports_cut_point() {
        let input = ">dimer\nGCGC&AUAU\n";
        let (_hdr, seq, cp) = read_cofold_input_string(input).unwrap();
        assert_eq!(seq.to_string(), "GCGCAUAU");
        assert_eq!(cp, 5);
    }

    #[test]
    fn test_three_strands_is_rejected() {
        let input = "GCGC&AUAU&GCGC\n";
        let res = read_cofold_input_string(input);
        assert!(res.is_err());
    }

    #[test]
    fn test_empty_strand_is_rejected() {
        let input = "GCGC&\n";
        let res = read_cofold_input_string(input);
        assert!(res.is_err());
    }
}
