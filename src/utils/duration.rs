//! Duration display helpers

/// Render seconds as `{minutes}m {seconds}s`; minutes are not capped at 60
pub fn format_minutes_seconds(total_seconds: u64) -> String {
    format!("{}m {}s", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes_seconds() {
        assert_eq!(format_minutes_seconds(125), "2m 5s");
        assert_eq!(format_minutes_seconds(0), "0m 0s");
        assert_eq!(format_minutes_seconds(59), "0m 59s");
        assert_eq!(format_minutes_seconds(60), "1m 0s");
        assert_eq!(format_minutes_seconds(3661), "61m 1s");
    }
}
