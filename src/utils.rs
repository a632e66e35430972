/// Time and formatting utilities
pub mod time {
    use std::time::{Duration, Instant};

    /// Format duration as human readable string
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Formatted time elapsed since `start`
    pub fn elapsed_since(start: Instant) -> String {
        format_duration(start.elapsed())
    }
}
