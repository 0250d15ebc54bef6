/// Human form of a remaining-minutes value.
///
/// `≤ 0` → `"Overdue"`, a day or more → `"Xd Yh"`, an hour or more →
/// `"Xh Ym"`, otherwise `"Xm"`.
pub fn format_time_remaining(minutes: i64) -> String {
    if minutes <= 0 {
        return "Overdue".to_string();
    }
    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
