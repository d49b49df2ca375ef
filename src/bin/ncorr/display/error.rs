use std::io::{self, Write};

use anyhow::Error;

use crate::util::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Turns typed library errors anywhere in the chain into actionable hints.
#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    typed: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<nmr_correlate::io::Error>() {
                collector.typed = true;
                collector.io_hints(e);
            } else if let Some(e) = cause.downcast_ref::<nmr_correlate::CorrelationError>() {
                collector.typed = true;
                collector.engine_hints(e);
            } else if let Some(e) = cause.downcast_ref::<std::io::Error>() {
                collector.typed = true;
                collector.std_io_hints(e);
            }
        }

        if !collector.typed {
            collector.fallback_hints(err);
        }
        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn io_hints(&mut self, err: &nmr_correlate::io::Error) {
        use nmr_correlate::io::Error as IoError;

        match err {
            // The wrapped std::io::Error follows in the chain.
            IoError::Io { .. } => {}

            IoError::Json { what, .. } => {
                match err.line() {
                    Some(line) => self.add(format!("The {what} is not valid near line {line}")),
                    None => self.add(format!("The {what} is not valid JSON")),
                }
                match *what {
                    "signal snapshot" => {
                        self.add("Expected an object with signals1D, signals2D and editing maps");
                        self.add("Atom types are element symbols (\"C\"), signs are 1 or -1");
                    }
                    _ => {
                        self.add("Expected a correlation list or a {correlations, state} object");
                        self.add("Use the output of `ncorr build` as input");
                    }
                }
            }
        }
    }

    fn engine_hints(&mut self, err: &nmr_correlate::CorrelationError) {
        use nmr_correlate::CorrelationError as EngineError;

        match err {
            EngineError::ConfigParse(_) => {
                self.add("The options file has invalid TOML syntax or unknown keys");
                self.add("Allowed keys: formula = \"...\" and a [tolerance] table");
            }

            EngineError::InvalidTolerance { atom_type, .. } => {
                self.add(format!("The tolerance for {atom_type} must be a finite ppm value ≥ 0"));
                self.add("Use 0 to require exactly equal shifts");
            }

            EngineError::CorrelationIndex { len, .. } => {
                self.add(format!("Valid correlation indices are 0..{len}"));
                self.add("Indices refer to the table returned by the last rebuild");
            }

            EngineError::InvalidEquivalences(_) => {
                self.add("Equivalences count additional identical atoms and cannot be negative");
            }

            EngineError::SelfLink(_) => {
                self.add("A manual link needs two different correlations");
            }
        }
    }

    fn std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Ensure you have read/write access as needed");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of input");
                self.add("The JSON document may be truncated");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: the output consumer terminated early");
            }

            _ => {
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn fallback_hints(&mut self, err: &Error) {
        let text = err
            .chain()
            .map(|cause| cause.to_string().to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        if text.contains("stdin is a terminal") {
            self.add("Provide input via -i/--input or pipe JSON to stdin");
        } else if text.contains("formula") {
            self.add("Pass the target molecule with --formula, e.g. --formula C2H6");
        }
    }
}
