//! Shared formatting utilities for UI components.

use crate::plot::{IntrinsicSize, PlotSize, PlotUnit};

/// Format a number with thousand separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a byte count for display.
pub fn format_bytes(n: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = n as f64;
    if bytes < KIB {
        format!("{} B", n)
    } else if bytes < KIB * KIB {
        format!("{:.1} KiB", bytes / KIB)
    } else {
        format!("{:.1} MiB", bytes / (KIB * KIB))
    }
}

fn format_dimension(val: f64, unit: PlotUnit) -> String {
    match unit {
        PlotUnit::Pixels => format!("{}", val.round() as i64),
        _ => format!("{:.2}", val),
    }
}

/// Format a plot size, e.g. `800x600 pixels`.
pub fn format_size(size: &PlotSize) -> String {
    format!(
        "{}x{} {}",
        format_dimension(size.width, size.unit),
        format_dimension(size.height, size.unit),
        size.unit.name()
    )
}

/// Format an intrinsic size with its source.
pub fn format_intrinsic(size: &IntrinsicSize) -> String {
    format!("{} ({})", format_size(&size.to_size()), size.source)
}
