use anyhow::{Result, bail};
use montyhall_game::DEFAULT_SEED;
use serde::Serialize;
use std::collections::HashSet;

/// Seed requested on the command line or in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedInfo {
    pub seed: u64,
    /// Token as typed, when it differs from the decimal form.
    pub source: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self { seed, source: None }
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| self.seed.to_string())
    }
}

/// Resolve seed tokens into unique seeds, preserving first-seen order.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hexadecimal. An empty list resolves to the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut resolved: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let info = parse_seed_token(token)?;
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        let Ok(seed) = u64::from_str_radix(&hex.replace('_', ""), 16) else {
            bail!("Unrecognized seed token: {token}");
        };
        return Ok(SeedInfo {
            seed,
            source: Some(token.to_ascii_uppercase().replacen("0X", "0x", 1)),
        });
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(SeedInfo::from_numeric(value));
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(SeedInfo::from_numeric(value.unsigned_abs()));
    }

    bail!("Unrecognized seed token: {token}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xff"])).unwrap();
        assert_eq!(seeds.len(), 3);
        assert!(seeds.iter().any(|s| s.seed == 42 && s.source.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7));
        assert!(
            seeds
                .iter()
                .any(|s| s.seed == 255 && s.source.as_deref() == Some("0xFF"))
        );
    }

    #[test]
    fn deduplicates_preserving_order() {
        let seeds = resolve_seed_inputs(&tokens(&["9", "0x9", "3", "9"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![9, 3]);
        assert_eq!(seeds[0].label(), "9");
    }

    #[test]
    fn empty_input_uses_default_seed() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
    }
}
