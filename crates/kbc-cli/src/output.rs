//! Output formatting for CLI responses.

use kbc_config::ConfigError;
use kbc_types::DiagnosticError;

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("[OK] {message}");
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Prints an error with hint and fix when the cause is a `ConfigError`.
pub fn print_failure(error: &anyhow::Error) {
    print_error(&format!("{error:#}"));
    if let Some(config_error) = error.downcast_ref::<ConfigError>() {
        for line in diagnostic_lines(config_error) {
            eprintln!("{line}");
        }
    }
}

/// Formats the `hint:` / `fix:` lines of a diagnostic.
pub fn diagnostic_lines(error: &dyn DiagnosticError) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(hint) = error.hint() {
        lines.push(format!("  hint: {hint}"));
    }
    if let Some(fix) = error.fix() {
        lines.push(format!("  fix:  {fix}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_for_unset_dir() {
        let lines = diagnostic_lines(&ConfigError::DataDirUnset);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  hint:"));
        assert!(lines[1].contains("KBC_DATADIR"));
    }

    #[test]
    fn no_diagnostics_for_missing_file() {
        let err = ConfigError::FileNotFound { name: "x".into() };
        assert!(diagnostic_lines(&err).is_empty());
    }
}
