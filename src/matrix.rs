//! Affine transform matrices as found in SVG `transform` attributes.

/// Per-component tolerance when comparing matrices serialized independently.
pub const MATRIX_TOLERANCE: f64 = 1e-4;

/// An affine map `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Map a point through the matrix.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Component-wise comparison within [`MATRIX_TOLERANCE`].
    pub fn fuzzy_eq(&self, other: &Matrix) -> bool {
        self.components()
            .iter()
            .zip(other.components())
            .all(|(l, r)| (l - r).abs() < MATRIX_TOLERANCE)
    }

    pub fn components(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Parse a `matrix(a b c d e f)` transform.
    ///
    /// The six numbers are separated by whitespace only. Anything else
    /// (commas, `translate(...)`, lists of transforms, exponents) yields `None`.
    pub fn from_transform(value: &str) -> Option<Matrix> {
        let start = value.find("matrix(")? + "matrix(".len();
        let len = value[start..].find(')')?;
        let args: Vec<&str> = value[start..start + len].split_whitespace().collect();
        if args.len() != 6 {
            return None;
        }

        let mut n = [0.0; 6];
        for (slot, arg) in n.iter_mut().zip(&args) {
            if !arg.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
                return None;
            }
            *slot = arg.parse().ok()?;
        }
        Some(Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }
}

/// Format a coordinate with six fixed decimals and a `.` separator.
pub fn format_coord(n: f64) -> String {
    format!("{:.6}", n)
}
