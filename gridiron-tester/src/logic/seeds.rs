use anyhow::{Result, bail};

/// Fallback seed when the CLI supplies none.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into numeric seeds.
///
/// Accepts plain integers (negative values use their magnitude) and
/// `a..b` ranges with an exclusive upper bound. Duplicates keep their first
/// position.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let (Ok(start), Ok(end)) = (start.parse::<u64>(), end.parse::<u64>()) else {
                bail!("Unrecognized seed range: {token}");
            };
            if start >= end {
                bail!("Empty seed range: {token}");
            }
            for seed in start..end {
                push_unique(&mut seeds, seed);
            }
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            push_unique(&mut seeds, value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            push_unique(&mut seeds, value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

fn push_unique(seeds: &mut Vec<u64>, seed: u64) {
    if !seeds.contains(&seed) {
        seeds.push(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| (*token).to_string()).collect()
    }

    #[test]
    fn resolves_numbers_ranges_and_negatives() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "3..6", "42"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 3, 4, 5]);
    }

    #[test]
    fn empty_input_uses_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["CL-ORANGE42"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["9..2"])).is_err());
    }
}
