/// Compact engagement counter: `999`, `1.2K`, `3.4M`, `1.1B`.
///
/// One decimal is kept and a trailing `.0` is dropped. Values are truncated, never rounded
/// up into the next unit (`999_999` renders as `999.9K`).
pub fn format_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    for (scale, suffix) in UNITS {
        if n >= scale {
            let tenths = n / (scale / 10);
            let whole = tenths / 10;
            let frac = tenths % 10;
            return if frac == 0 {
                format!("{whole}{suffix}")
            } else {
                format!("{whole}.{frac}{suffix}")
            };
        }
    }
    n.to_string()
}
