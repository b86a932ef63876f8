/// Normalizes income typed by a user: trims whitespace, drops a leading
/// dollar sign and removes commas (thousands separator).
///
/// The result is handed to the calculator unparsed, so blank input stays
/// blank and is reported as missing.
pub fn normalize_income_input(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.trim_start().replace(',', "")
}

/// Returns `true` when the line asks to leave interactive mode.
pub fn is_quit_command(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "quit" | "exit" | "q")
}
