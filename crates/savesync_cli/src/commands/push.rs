//! Push command implementation.

use crate::RemoteArgs;

/// Splits `key=value`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// Runs the push command.
pub fn run(
    remote: &RemoteArgs,
    strings: &[String],
    ints: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate every assignment before touching the server.
    let strings = strings
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let ints = ints
        .iter()
        .map(|raw| {
            let (key, value) = parse_assignment(raw)?;
            let value = value
                .parse::<i32>()
                .map_err(|e| format!("{key}: {e}"))?;
            Ok::<_, String>((key, value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (runtime, session) = super::connect(remote)?;
    let loaded = runtime.block_on(session.load()?)?;
    tracing::info!(sn = loaded.sn, existed = loaded.existed, "loaded");

    for (key, value) in strings {
        session.set_string(key, value);
    }
    for (key, value) in ints {
        session.set_int(key, value);
    }

    let saved = runtime.block_on(session.save()?)?;
    println!("Saved sequence {}", saved.sn);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments() {
        assert_eq!(parse_assignment("a=b").unwrap(), ("a", "b"));
        assert_eq!(parse_assignment("a=").unwrap(), ("a", ""));
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a", "b=c"));
        assert!(parse_assignment("=b").is_err());
        assert!(parse_assignment("ab").is_err());
    }
}
