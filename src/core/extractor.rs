//! Extraction of a job's declared thread requirement from its source text.
//!
//! A job declares its requirement with a single assignment such as
//! `max_threads='8'` or `max_threads="8"`. Either quote character is accepted
//! on each side. The first matching line wins.
//! There is no default: a source without a declaration is rejected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{JobDescriptor, SchedulerError};

static THREAD_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"max_threads\s*=\s*['"](\d+)['"]"#).expect("static pattern compiles")
});

/// Read `source` and build its [`JobDescriptor`].
pub fn extract(source: &Path) -> Result<JobDescriptor, SchedulerError> {
    let file = File::open(source).map_err(|e| SchedulerError::io(source, e))?;
    let job = source.display().to_string();
    let required = parse_required_threads(&job, BufReader::new(file))?;
    Ok(JobDescriptor::new(source, required))
}

/// Scan `reader` line by line for the first thread declaration of `job`.
pub fn parse_required_threads<R: BufRead>(job: &str, reader: R) -> Result<u32, SchedulerError> {
    for line in reader.lines() {
        let line = line.map_err(|e| SchedulerError::io(job, e))?;
        let Some(caps) = THREAD_DECLARATION.captures(&line) else {
            continue;
        };
        let Some(raw) = caps.get(1) else {
            continue;
        };
        return match raw.as_str().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(SchedulerError::InvalidThreadDeclaration {
                job: job.to_string(),
                value: raw.as_str().to_string(),
            }),
        };
    }
    Err(SchedulerError::MissingThreadDeclaration {
        job: job.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<u32, SchedulerError> {
        parse_required_threads("job.sh", text.as_bytes())
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(parse("#!/bin/bash\nmax_threads='8'\n").unwrap(), 8);
    }

    #[test]
    fn test_double_quoted_with_spaces() {
        assert_eq!(parse("max_threads = \"12\"").unwrap(), 12);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "sim=foo\nmax_threads='2'\nmax_threads='16'\n";
        assert_eq!(parse(text).unwrap(), 2);
    }

    #[test]
    fn test_unquoted_is_not_a_declaration() {
        let err = parse("max_threads=4\n").unwrap_err();
        assert!(matches!(err, SchedulerError::MissingThreadDeclaration { .. }));
    }

    #[test]
    fn test_mixed_quotes_accepted() {
        assert_eq!(parse("max_threads='4\"\n").unwrap(), 4);
    }

    #[test]
    fn test_missing_declaration() {
        let err = parse("duration=10\nlink_speed=100\n").unwrap_err();
        match err {
            SchedulerError::MissingThreadDeclaration { job } => assert_eq!(job, "job.sh"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_is_invalid() {
        let err = parse("max_threads='0'").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidThreadDeclaration { .. }));
    }

    #[test]
    fn test_overflow_is_invalid() {
        let err = parse("max_threads='99999999999'").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidThreadDeclaration { value, .. } if value == "99999999999"));
    }
}
