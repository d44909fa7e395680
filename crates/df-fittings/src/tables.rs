//! Empirical coefficient tables for transitions.
//!
//! Confuser rows are relative length bands (l/D ascending), columns are cone
//! angle bands. Diffuser rows are area ratio bands (Fin/Fout ascending),
//! columns are the same cone angle bands.

pub const CONFUSER_ROUND: [[f64; 4]; 3] = [
    [0.25, 0.22, 0.20, 0.24],
    [0.15, 0.12, 0.10, 0.18],
    [0.10, 0.08, 0.07, 0.15],
];

pub const CONFUSER_RECT: [[f64; 4]; 3] = [
    [0.30, 0.27, 0.24, 0.28],
    [0.19, 0.16, 0.13, 0.22],
    [0.13, 0.11, 0.10, 0.19],
];

pub const DIFFUSER_ROUND: [[f64; 4]; 4] = [
    [0.17, 0.28, 0.45, 0.59],
    [0.12, 0.19, 0.31, 0.41],
    [0.07, 0.11, 0.17, 0.23],
    [0.03, 0.04, 0.07, 0.09],
];

pub const DIFFUSER_RECT: [[f64; 4]; 4] = [
    [0.19, 0.32, 0.51, 0.66],
    [0.14, 0.22, 0.35, 0.46],
    [0.08, 0.13, 0.20, 0.26],
    [0.04, 0.05, 0.08, 0.10],
];

/// Column for a full cone angle in degrees: ≤10, ≤20, ≤30, wider.
pub fn angle_band(angle_deg: f64) -> usize {
    if angle_deg <= 10.0 {
        0
    } else if angle_deg <= 20.0 {
        1
    } else if angle_deg <= 30.0 {
        2
    } else {
        3
    }
}

/// Confuser row for relative length l/D: ≤0.15, ≤1.0, longer.
pub fn length_band(relative_length: f64) -> usize {
    if relative_length <= 0.15 {
        0
    } else if relative_length <= 1.0 {
        1
    } else {
        2
    }
}

/// Diffuser row for area ratio Fin/Fout: ≤0.2, ≤0.4, ≤0.6, larger.
pub fn area_ratio_band(ratio: f64) -> usize {
    if ratio <= 0.2 {
        0
    } else if ratio <= 0.4 {
        1
    } else if ratio <= 0.6 {
        2
    } else {
        3
    }
}
