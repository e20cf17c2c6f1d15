/// Group the integer part in thousands: `760505847.5` → `760,505,847.5`.
pub fn human_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let raw = v.abs().to_string();
    let (int, frac) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
    let mut out = String::with_capacity(raw.len() + int.len() / 3 + 1);
    if v < 0.0 {
        out.push('-');
    }
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
