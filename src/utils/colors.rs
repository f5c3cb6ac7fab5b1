/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Retry counter color:
/// 0 → reset
/// below the limit → yellow
/// at or above the limit → red
pub fn color_for_retries(retry_count: u32, limit: u32) -> &'static str {
    if retry_count == 0 {
        RESET
    } else if retry_count < limit {
        YELLOW
    } else {
        RED
    }
}

pub fn colorize_kind(kind: &str) -> String {
    match kind {
        "START" => format!("{GREEN}{kind}{RESET}"),
        "STOP" => format!("{RED}{kind}{RESET}"),
        other => other.to_string(),
    }
}

/// Empty optional fields are printed in grey.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
