//! `.toads` input parsing: one detection per line,
//! `timestamp txid rxid energy block`, whitespace separated. Blank and
//! `#`-prefixed lines are skipped.

use anyhow::{bail, Context};
use std::io::BufRead;
use std::str::FromStr;
use toadcore::toads::DetectionRecord;

pub fn load_toads<R: BufRead>(reader: R) -> anyhow::Result<Vec<DetectionRecord>> {
    let mut toads = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading toads line {}", number + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let toad = parse_line(trimmed, toads.len())
            .with_context(|| format!("toads line {}", number + 1))?;
        toads.push(toad);
    }

    Ok(toads)
}

/// Orders a freshly loaded batch by timestamp and reassigns indices so that
/// each record's identity is its final position.
pub fn sort_by_timestamp(toads: &mut [DetectionRecord]) {
    toads.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    for (index, toad) in toads.iter_mut().enumerate() {
        toad.index = index;
    }
}

fn parse_line(line: &str, index: usize) -> anyhow::Result<DetectionRecord> {
    let mut fields = line.split_whitespace();
    let timestamp: f64 = next_field(&mut fields, "timestamp")?;
    let txid = next_field(&mut fields, "txid")?;
    let rxid = next_field(&mut fields, "rxid")?;
    let energy: f64 = next_field(&mut fields, "energy")?;
    let block = next_field(&mut fields, "block")?;
    if fields.next().is_some() {
        bail!("trailing fields after block id");
    }
    if !timestamp.is_finite() {
        bail!("timestamp {} is not finite", timestamp);
    }
    if !(energy.is_finite() && energy >= 0.0) {
        bail!("energy {} is not a non-negative finite value", energy);
    }
    Ok(DetectionRecord::new(
        index, timestamp, txid, rxid, energy, block,
    ))
}

fn next_field<'a, T>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = fields
        .next()
        .with_context(|| format!("missing {} field", name))?;
    token
        .parse()
        .with_context(|| format!("invalid {} {:?}", name, token))
}
