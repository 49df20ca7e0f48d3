use super::boys::boys;
use nalgebra::Vector3;

/// Hermite expansion coefficients `E^{ij}_t` of a one-dimensional Gaussian product.
///
/// The product of `x_A^i exp(-a x_A²)` and `x_B^j exp(-b x_B²)` is expanded in Hermite
/// Gaussians centred on the composite centre `P`; coefficients with `t > i + j` vanish.
#[derive(Debug, Clone)]
pub struct HermiteExpansion {
    max_j: usize,
    stride_t: usize,
    data: Vec<f64>,
}

impl HermiteExpansion {
    /// Tabulates all coefficients with `i <= max_i` and `j <= max_j`.
    ///
    /// `separation` is `A - B` along this axis; `a` and `b` are the primitive exponents.
    pub fn new(max_i: usize, max_j: usize, separation: f64, a: f64, b: f64) -> Self {
        let p = a + b;
        let reduced = a * b / p;
        let pa = -b * separation / p;
        let pb = a * separation / p;
        let one_over_2p = 0.5 / p;

        let stride_t = max_i + max_j + 1;
        let mut table = Self {
            max_j,
            stride_t,
            data: vec![0.0; (max_i + 1) * (max_j + 1) * stride_t],
        };

        for i in 0..=max_i {
            for j in 0..=max_j {
                for t in 0..=(i + j) {
                    let value = if i == 0 && j == 0 {
                        (-reduced * separation * separation).exp()
                    } else if j == 0 {
                        let lower = |t: usize| table.get_raw(i - 1, 0, t);
                        let down = if t > 0 { lower(t - 1) } else { 0.0 };
                        one_over_2p * down + pa * lower(t) + (t + 1) as f64 * lower(t + 1)
                    } else {
                        let lower = |t: usize| table.get_raw(i, j - 1, t);
                        let down = if t > 0 { lower(t - 1) } else { 0.0 };
                        one_over_2p * down + pb * lower(t) + (t + 1) as f64 * lower(t + 1)
                    };
                    let index = table.index(i, j, t);
                    table.data[index] = value;
                }
            }
        }
        table
    }

    #[inline]
    fn index(&self, i: usize, j: usize, t: usize) -> usize {
        (i * (self.max_j + 1) + j) * self.stride_t + t
    }

    #[inline]
    fn get_raw(&self, i: usize, j: usize, t: usize) -> f64 {
        if t > i + j {
            0.0
        } else {
            self.data[self.index(i, j, t)]
        }
    }

    /// `E^{ij}_t`; zero outside the tabulated range of `t`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, t: usize) -> f64 {
        self.get_raw(i, j, t)
    }
}

/// Hermite Coulomb integrals `R_{tuv}` for a Gaussian exponent and a separation vector.
#[derive(Debug, Clone)]
pub struct HermiteCoulomb {
    max_order: usize,
    data: Vec<f64>,
}

impl HermiteCoulomb {
    /// Tabulates `R^0_{tuv}` for all `t + u + v <= max_order`.
    pub fn new(max_order: usize, exponent: f64, separation: &Vector3<f64>) -> Self {
        let dim = max_order + 1;
        let mut table = Self {
            max_order,
            data: vec![0.0; dim * dim * dim * dim],
        };
        let (x, y, z) = (separation.x, separation.y, separation.z);
        let boys_values = boys(max_order, exponent * separation.norm_squared());

        let mut factor = 1.0;
        for (n, value) in boys_values.iter().enumerate() {
            let index = table.index(n, 0, 0, 0);
            table.data[index] = factor * value;
            factor *= -2.0 * exponent;
        }

        for order in 1..=max_order {
            for n in 0..=(max_order - order) {
                for t in 0..=order {
                    for u in 0..=(order - t) {
                        let v = order - t - u;
                        let value = if t > 0 {
                            let two_down = if t > 1 {
                                (t - 1) as f64 * table.at(n + 1, t - 2, u, v)
                            } else {
                                0.0
                            };
                            two_down + x * table.at(n + 1, t - 1, u, v)
                        } else if u > 0 {
                            let two_down = if u > 1 {
                                (u - 1) as f64 * table.at(n + 1, t, u - 2, v)
                            } else {
                                0.0
                            };
                            two_down + y * table.at(n + 1, t, u - 1, v)
                        } else {
                            let two_down = if v > 1 {
                                (v - 1) as f64 * table.at(n + 1, t, u, v - 2)
                            } else {
                                0.0
                            };
                            two_down + z * table.at(n + 1, t, u, v - 1)
                        };
                        let index = table.index(n, t, u, v);
                        table.data[index] = value;
                    }
                }
            }
        }
        table
    }

    #[inline]
    fn index(&self, n: usize, t: usize, u: usize, v: usize) -> usize {
        let dim = self.max_order + 1;
        ((n * dim + t) * dim + u) * dim + v
    }

    #[inline]
    fn at(&self, n: usize, t: usize, u: usize, v: usize) -> f64 {
        self.data[self.index(n, t, u, v)]
    }

    #[inline]
    pub fn get(&self, t: usize, u: usize, v: usize) -> f64 {
        self.at(0, t, u, v)
    }
}
