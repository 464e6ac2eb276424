// SPDX-License-Identifier: MIT

/// Sum computed one element at a time, wrapping like the reduction does.
pub fn serial_sum(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, &v| acc.wrapping_add(v))
}

/// `1..=n` as a plain vector.
pub fn ascending(n: usize) -> Vec<i64> {
    (1..=n as i64).collect()
}

/// Deterministic mix of positive and negative values.
pub fn alternating(n: usize) -> Vec<i64> {
    (0..n as i64)
        .map(|i| if i % 2 == 0 { i * 7 + 3 } else { -(i * 5) })
        .collect()
}
