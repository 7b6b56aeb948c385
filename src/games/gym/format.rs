//! Display formatting for very large numbers and durations.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notation {
    #[default]
    Standard,
    Scientific,
}

impl Notation {
    pub fn toggle(self) -> Notation {
        match self {
            Notation::Standard => Notation::Scientific,
            Notation::Scientific => Notation::Standard,
        }
    }
}

const SUFFIXES: &[&str] = &[
    "", "K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc", "UDc", "DDc", "TDc", "QaDc", "QiDc",
    "SxDc", "SpDc", "OcDc", "NoDc", "Vg", "UVg", "DVg", "TVg", "QaVg", "QiVg", "SxVg", "SpVg", "OcVg",
    "NoVg", "Tg", "UTg", "DTg", "TTg", "QaTg", "QiTg", "SxTg", "SpTg", "OcTg", "NoTg", "Qd", "UQd", "DQd",
    "TQd", "QaQd", "QiQd", "SxQd", "SpQd", "OcQd", "NoQd", "Qq", "UQq", "DQq", "TQq", "QaQq", "QiQq",
    "SxQq", "SpQq", "OcQq", "NoQq", "Sg", "USg", "DSg", "TSg", "QaSg", "QiSg", "SxSg", "SpSg", "OcSg",
    "NoSg", "St", "USt", "DSt", "TSt", "QaSt", "QiSt", "SxSt", "SpSt", "OcSt", "NoSt", "Og", "UOg", "DOg",
    "TOg", "QaOg", "QiOg", "SxOg", "SpOg", "OcOg", "NoOg", "Ng", "UNg", "DNg", "TNg", "QaNg", "QiNg",
    "SxNg", "SpNg", "OcNg", "NoNg", "Ce",
];

/// Format with two decimals in the given notation.
pub fn format_number(n: f64, notation: Notation) -> String {
    format_number_with(n, 2, notation)
}

/// Suffix notation (`1.50K`, `2.00M`, ...) with scientific fallback.
///
/// Never panics: non-finite input renders as `∞`.
pub fn format_number_with(n: f64, decimals: usize, notation: Notation) -> String {
    if !n.is_finite() {
        return "∞".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number_with(-n, decimals, notation));
    }
    if n < 1000.0 {
        return if n.fract() == 0.0 {
            format!("{n}")
        } else {
            format!("{n:.decimals$}")
        };
    }
    if notation == Notation::Scientific {
        return format!("{n:.decimals$e}");
    }

    let exponent = n.log10().floor() as usize;
    let idx = exponent / 3;
    match SUFFIXES.get(idx) {
        Some(suffix) => {
            let value = n / 10f64.powi((idx * 3) as i32);
            format!("{value:.decimals$}{suffix}")
        }
        None => format!("{n:.decimals$e}"),
    }
}

/// `45s`, `3m 12s`, `2h 5m`.
pub fn format_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    if secs < 60.0 {
        format!("{}s", secs.floor())
    } else if secs < 3600.0 {
        format!("{}m {}s", (secs / 60.0).floor(), (secs % 60.0).floor())
    } else {
        format!("{}h {}m", (secs / 3600.0).floor(), ((secs % 3600.0) / 60.0).floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(format_number(0.0, Notation::Standard), "0");
        assert_eq!(format_number(42.0, Notation::Standard), "42");
        assert_eq!(format_number(1.5, Notation::Standard), "1.50");
        assert_eq!(format_number(999.0, Notation::Standard), "999");
    }

    #[test]
    fn suffixes() {
        assert_eq!(format_number(1000.0, Notation::Standard), "1.00K");
        assert_eq!(format_number(1500.0, Notation::Standard), "1.50K");
        assert_eq!(format_number(2_000_000.0, Notation::Standard), "2.00M");
        assert_eq!(format_number(3.5e9, Notation::Standard), "3.50B");
        assert_eq!(format_number(1e12, Notation::Standard), "1.00T");
    }

    #[test]
    fn negative_and_non_finite() {
        assert_eq!(format_number(-1500.0, Notation::Standard), "-1.50K");
        assert_eq!(format_number(f64::INFINITY, Notation::Standard), "∞");
        assert_eq!(format_number(f64::NAN, Notation::Standard), "∞");
    }

    #[test]
    fn scientific_option() {
        assert_eq!(format_number(12345.0, Notation::Scientific), "1.23e4");
        // below 1000 stays plain
        assert_eq!(format_number(12.0, Notation::Scientific), "12");
    }

    #[test]
    fn beyond_suffix_table_falls_back_to_exponent() {
        let s = format_number(f64::MAX, Notation::Standard);
        assert!(s.contains('e'), "{s}");
        let s = format_number(5e303, Notation::Standard);
        assert!(s.ends_with("Ce"), "{s}");
    }

    #[test]
    fn time_formats() {
        assert_eq!(format_time(0.0), "0s");
        assert_eq!(format_time(59.9), "59s");
        assert_eq!(format_time(192.0), "3m 12s");
        assert_eq!(format_time(7500.0), "2h 5m");
    }
}
