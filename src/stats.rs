//! Numerically stable primitives used by the Bayesian scoring functions.

use std::f64::consts::PI;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // published numerical constants
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the Gamma function (log |Gamma(z)|).
///
/// Uses a Lanczos approximation with reflection for z < 0.5.
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && (z - z.round()).abs() < 1e-15 {
        // poles at the non-positive integers
        return f64::NAN;
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        if sin_pi == 0.0 {
            return f64::NAN;
        }
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let z_minus = z - 1.0;
    let mut x = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += coeff / (z_minus + i as f64);
    }
    let t = z_minus + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z_minus + 0.5) * t.ln() - t + x.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        // Gamma(1) = Gamma(2) = 1
        assert!(log_gamma(1.0).abs() < 1e-12);
        assert!(log_gamma(2.0).abs() < 1e-12);

        // Gamma(5) = 4! = 24
        assert!((log_gamma(5.0) - 24f64.ln()).abs() < 1e-10);

        // Gamma(11) = 10! = 3628800
        assert!((log_gamma(11.0) - 3_628_800f64.ln()).abs() < 1e-9);

        // Gamma(0.5) = sqrt(pi)
        assert!((log_gamma(0.5) - 0.5 * PI.ln()).abs() < 1e-10);
    }

    #[test]
    fn recurrence() {
        // log Gamma(z + 1) = log Gamma(z) + log z
        for &z in &[0.7, 1.3, 4.5, 10.25, 33.0] {
            let lhs = log_gamma(z + 1.0);
            let rhs = log_gamma(z) + z.ln();
            assert!((lhs - rhs).abs() < 1e-9, "z = {}", z);
        }
    }

    #[test]
    fn poles() {
        assert!(log_gamma(0.0).is_nan());
        assert!(log_gamma(-3.0).is_nan());
    }
}
