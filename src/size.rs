//! Human-readable byte sizes

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// How many decimals to show once a size leaves the byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Live progress line: more digits the bigger the unit, so the
    /// counter visibly moves even on large trees.
    Progress,
    /// Final report: three decimals at every unit.
    Report,
}

impl Precision {
    fn decimals(self, unit: u64) -> usize {
        match self {
            Precision::Report => 3,
            Precision::Progress => match unit {
                KIB => 2,
                MIB => 4,
                GIB => 6,
                _ => 8,
            },
        }
    }
}

/// Format a size in bytes using binary units (`B`, `KiB`, `MiB`, `GiB`, `TiB`).
pub fn format_size(bytes: u64, precision: Precision) -> String {
    let (unit, suffix) = if bytes >= TIB {
        (TIB, "TiB")
    } else if bytes >= GIB {
        (GIB, "GiB")
    } else if bytes >= MIB {
        (MIB, "MiB")
    } else if bytes >= KIB {
        (KIB, "KiB")
    } else {
        return format!("{}B", bytes);
    };

    format!(
        "{:.*}{}",
        precision.decimals(unit),
        bytes as f64 / unit as f64,
        suffix
    )
}
