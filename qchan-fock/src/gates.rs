//! Fock-basis matrices of Gaussian gates
//!
//! All matrices are truncations of the exact infinite-dimensional
//! operators: element `(m, n)` is ⟨m|G|n⟩ and does not depend on the cutoff.
//! Single-mode matrices are `cutoff × cutoff`; the two-mode beamsplitter is
//! `cutoff² × cutoff²` with row-major `(first mode, second mode)` indices.

use ndarray::Array2;
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Phase rotation R(φ) = exp(iφ n̂)
pub fn rotation(phi: f64, cutoff: usize) -> Array2<Complex64> {
    let mut out = Array2::zeros((cutoff, cutoff));
    for n in 0..cutoff {
        out[[n, n]] = Complex64::from_polar(1.0, phi * n as f64);
    }
    out
}

/// Displacement D(α) = exp(α a† − α* a) with α = r e^{iφ}
///
/// Built from the recurrences
/// ```text
/// D[m,0] = α/√m · D[m−1,0]
/// D[m,n] = (√m · D[m−1,n−1] − α* · D[m,n−1]) / √n
/// ```
pub fn displacement(r: f64, phi: f64, cutoff: usize) -> Array2<Complex64> {
    let alpha = Complex64::from_polar(r, phi);
    let mut out = Array2::zeros((cutoff, cutoff));
    if cutoff == 0 {
        return out;
    }

    out[[0, 0]] = Complex64::new((-0.5 * r * r).exp(), 0.0);
    for m in 1..cutoff {
        out[[m, 0]] = alpha / (m as f64).sqrt() * out[[m - 1, 0]];
    }
    for m in 0..cutoff {
        for n in 1..cutoff {
            let diagonal = if m > 0 {
                (m as f64).sqrt() * out[[m - 1, n - 1]]
            } else {
                ZERO
            };
            out[[m, n]] = (diagonal - alpha.conj() * out[[m, n - 1]]) / (n as f64).sqrt();
        }
    }
    out
}

/// Squeezing S(ζ) = exp(½(ζ* a² − ζ a†²)) with ζ = r e^{iφ}
///
/// Built from the recurrences
/// ```text
/// S[0,0] = √sech r
/// S[m,0] = −e^{iφ} tanh r · √((m−1)/m) · S[m−2,0]
/// S[m,n] = (√m sech r · S[m−1,n−1] + √(n−1) e^{−iφ} tanh r · S[m,n−2]) / √n
/// ```
/// Entries with `m + n` odd are exactly zero.
pub fn squeezing(r: f64, phi: f64, cutoff: usize) -> Array2<Complex64> {
    let mut out = Array2::zeros((cutoff, cutoff));
    if cutoff == 0 {
        return out;
    }

    let sech = 1.0 / r.cosh();
    let tanh = r.tanh();
    let phase = Complex64::from_polar(1.0, phi);

    out[[0, 0]] = Complex64::new(sech.sqrt(), 0.0);
    for m in (2..cutoff).step_by(2) {
        let ratio = ((m - 1) as f64 / m as f64).sqrt();
        out[[m, 0]] = -phase * tanh * ratio * out[[m - 2, 0]];
    }
    for m in 0..cutoff {
        for n in 1..cutoff {
            if (m + n) % 2 != 0 {
                continue;
            }
            let diagonal = if m > 0 {
                (m as f64).sqrt() * sech * out[[m - 1, n - 1]]
            } else {
                ZERO
            };
            let vertical = if n > 1 {
                ((n - 1) as f64).sqrt() * phase.conj() * tanh * out[[m, n - 2]]
            } else {
                ZERO
            };
            out[[m, n]] = (diagonal + vertical) / (n as f64).sqrt();
        }
    }
    out
}

/// Beamsplitter with transmission amplitude t = cos θ and reflection r = e^{iφ} sin θ
///
/// Acts on creation operators as a† → t a† + r b†, b† → −r* a† + t b†.
/// Photon number is conserved, so ⟨p,q|B|n₁,n₂⟩ vanishes unless
/// `p + q = n₁ + n₂`; outputs beyond the cutoff are dropped.
pub fn beamsplitter(theta: f64, phi: f64, cutoff: usize) -> Array2<Complex64> {
    let d = cutoff;
    let t = Complex64::new(theta.cos(), 0.0);
    let r = Complex64::from_polar(theta.sin(), phi);
    let minus_r_conj = -r.conj();
    let mut out = Array2::zeros((d * d, d * d));

    for n1 in 0..d {
        for n2 in 0..d {
            let column = n1 * d + n2;
            for k in 0..=n1 {
                for l in 0..=n2 {
                    // a† power p, b† power q
                    let p = k + l;
                    let q = n1 + n2 - p;
                    if p >= d || q >= d {
                        continue;
                    }
                    let log_weight = ln_binomial(n1, k)
                        + ln_binomial(n2, l)
                        + 0.5 * (ln_factorial(p) + ln_factorial(q)
                            - ln_factorial(n1)
                            - ln_factorial(n2));
                    let amplitude = t.powu(k as u32)
                        * r.powu((n1 - k) as u32)
                        * minus_r_conj.powu(l as u32)
                        * t.powu((n2 - l) as u32);
                    out[[p * d + q, column]] += amplitude * log_weight.exp();
                }
            }
        }
    }
    out
}

pub(crate) fn ln_factorial(n: usize) -> f64 {
    (2..=n).map(|k| (k as f64).ln()).sum()
}

pub(crate) fn ln_binomial(n: usize, k: usize) -> f64 {
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}
