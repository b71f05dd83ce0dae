//! Gate matrices
//!
//! Fixed gates are compile-time constants; rotations are generated per angle.
//! Two-qubit matrices use the textbook ordering: the local basis index is
//! `2·b₀ + b₁` where `b₀` is the first qubit of the operation (the control).

use num_complex::Complex64;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];

/// Row-major 4×4 complex matrix
pub type Matrix4 = [[Complex64; 4]; 4];

// Compile-time constant helpers
const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Hadamard gate matrix
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: Matrix2 = [
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(INV_SQRT2, 0.0),
    ],
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(-INV_SQRT2, 0.0),
    ],
];

/// Pauli-X gate matrix (NOT gate)
/// X = [[0, 1],
///      [1, 0]]
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Z gate matrix
/// Z = [[1,  0],
///      [0, -1]]
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Identity gate matrix
pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// CNOT gate matrix (Controlled-NOT)
/// CNOT = [[1, 0, 0, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1],
///         [0, 0, 1, 0]]
pub const CNOT: Matrix4 = controlled(&PAULI_X);

/// CZ gate matrix (Controlled-Z)
/// CZ = diag(1, 1, 1, -1)
pub const CZ: Matrix4 = controlled(&PAULI_Z);

/// Controlled-Hadamard gate matrix
pub const CH: Matrix4 = controlled(&HADAMARD);

/// Generate rotation-Y gate matrix for a given angle
/// RY(θ) = [[cos(θ/2),  -sin(θ/2)],
///          [sin(θ/2),   cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> Matrix2 {
    let half_theta = theta / 2.0;
    let cos_val = half_theta.cos();
    let sin_val = half_theta.sin();

    [
        [
            Complex64::new(cos_val, 0.0),
            Complex64::new(-sin_val, 0.0),
        ],
        [
            Complex64::new(sin_val, 0.0),
            Complex64::new(cos_val, 0.0),
        ],
    ]
}

/// Controlled rotation-Y gate matrix
#[inline]
pub fn controlled_rotation_y(theta: f64) -> Matrix4 {
    controlled(&rotation_y(theta))
}

/// Lift a single-qubit matrix to its controlled form
///
/// The result is `|0⟩⟨0| ⊗ I + |1⟩⟨1| ⊗ U` with the control as the high bit.
pub const fn controlled(u: &Matrix2) -> Matrix4 {
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, u[0][0], u[0][1]],
        [ZERO, ZERO, u[1][0], u[1][1]],
    ]
}

/// Matrix product `a · b`
pub fn multiply<const N: usize>(a: &[[Complex64; N]; N], b: &[[Complex64; N]; N]) -> [[Complex64; N]; N] {
    let mut result = [[ZERO; N]; N];
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Conjugate transpose
pub fn dagger<const N: usize>(m: &[[Complex64; N]; N]) -> [[Complex64; N]; N] {
    let mut result = [[ZERO; N]; N];
    for i in 0..N {
        for j in 0..N {
            result[i][j] = m[j][i].conj();
        }
    }
    result
}

/// Check `U†U = I` entrywise within `tolerance`
pub fn is_unitary<const N: usize>(m: &[[Complex64; N]; N], tolerance: f64) -> bool {
    let product = multiply(&dagger(m), m);
    for (i, row) in product.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let expected = if i == j { ONE } else { ZERO };
            if (value - expected).norm() > tolerance {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn assert_matrix_eq<const N: usize>(a: &[[Complex64; N]; N], b: &[[Complex64; N]; N]) {
        for i in 0..N {
            for j in 0..N {
                assert_relative_eq!(a[i][j].re, b[i][j].re, epsilon = 1e-10);
                assert_relative_eq!(a[i][j].im, b[i][j].im, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_pauli_x_squaring() {
        // X² = I
        assert_matrix_eq(&multiply(&PAULI_X, &PAULI_X), &IDENTITY);
    }

    #[test]
    fn test_hadamard_self_inverse() {
        // H² = I
        assert_matrix_eq(&multiply(&HADAMARD, &HADAMARD), &IDENTITY);
    }

    #[test]
    fn test_hzh_is_x() {
        let hzh = multiply(&multiply(&HADAMARD, &PAULI_Z), &HADAMARD);
        assert_matrix_eq(&hzh, &PAULI_X);
    }

    #[test]
    fn test_cnot_flip_on_control_1() {
        // |10⟩ -> |11⟩
        assert_eq!(CNOT[3][2], ONE);
        assert_eq!(CNOT[2][3], ONE);
        assert_eq!(CNOT[2][2], ZERO);
        assert_eq!(CNOT[0][0], ONE);
        assert_eq!(CNOT[1][1], ONE);
    }

    #[test]
    fn test_cz_diagonal() {
        for i in 0..4 {
            for j in 0..4 {
                let expected = match (i, j) {
                    (3, 3) => NEG_ONE,
                    (a, b) if a == b => ONE,
                    _ => ZERO,
                };
                assert_eq!(CZ[i][j], expected);
            }
        }
    }

    #[test]
    fn test_rotation_y_pi() {
        // RY(π) = [[0, -1], [1, 0]]
        let m = rotation_y(PI);
        assert_relative_eq!(m[0][0].re, 0.0, epsilon = 1e-10);
        assert_relative_eq!(m[0][1].re, -1.0, epsilon = 1e-10);
        assert_relative_eq!(m[1][0].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(m[1][1].re, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rotation_y_zero_is_identity() {
        assert_matrix_eq(&rotation_y(0.0), &IDENTITY);
    }

    #[test]
    fn test_rotation_y_composes() {
        let combined = multiply(&rotation_y(0.4), &rotation_y(0.7));
        assert_matrix_eq(&combined, &rotation_y(1.1));
    }

    #[test]
    fn test_all_unitary() {
        for m in [HADAMARD, PAULI_X, PAULI_Z, IDENTITY, rotation_y(1.234)] {
            assert!(is_unitary(&m, 1e-10));
        }
        for m in [CNOT, CZ, CH, controlled_rotation_y(-0.3)] {
            assert!(is_unitary(&m, 1e-10));
        }

        let not_unitary = [[ONE, ONE], [ZERO, ONE]];
        assert!(!is_unitary(&not_unitary, 1e-10));
    }
}
