use crate::affine::Affine;
use crate::{double_scalar_mul_basepoint_affine, mul_generator_affine, BaseField, Group, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Projective point on the elliptic curve.
/// Represents a point in Jacobian coordinates (X:Y:Z) where (x,y) = (X/Z^2, Y/Z^3).
/// The point at infinity is any point with Z = 0; the canonical one is (1:1:0).
#[derive(Copy, Clone, Debug)]
pub struct Projective {
    pub x: BaseField,
    pub y: BaseField,
    pub z: BaseField,
}

impl Projective {
    /// The point at infinity (identity element): (1:1:0)
    pub const INFINITY: Self = Projective {
        x: BaseField::ONE,
        y: BaseField::ONE,
        z: BaseField::ZERO,
    };

    /// Create a new projective point.
    pub fn new(x: BaseField, y: BaseField, z: BaseField) -> Self {
        Projective { x, y, z }
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Convert to affine coordinates.
    pub fn to_affine(&self) -> Affine {
        if self.is_infinity() {
            return Affine::INFINITY;
        }

        let z_inv = self.z.inverse();
        let z_inv2 = z_inv.square();
        Affine::new(self.x * z_inv2, self.y * z_inv2 * z_inv)
    }

    /// Convert from affine coordinates.
    pub fn from_affine(point: &Affine) -> Self {
        if point.is_infinity() {
            return Self::INFINITY;
        }

        Projective::new(point.x, point.y, BaseField::ONE)
    }

    /// Check if a point is on the curve: Y^2 = X^3 + b*Z^6.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }

        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        self.y.square() == self.x.square() * self.x + Affine::curve_b() * z6
    }

    pub fn generator() -> Self {
        Self::from_affine(&Affine::generator())
    }

    /// Point doubling, dbl-2009-l (a = 0).
    pub fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.double() + a;
        let f = e.square();

        let x3 = f - d.double();
        let eight_c = c.double().double().double();
        let y3 = e * (d - x3) - eight_c;
        let z3 = (self.y * self.z).double();

        Projective::new(x3, y3, z3)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity() {
            return *self;
        }
        Projective::new(self.x, -self.y, self.z)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        Projective::from_affine(&mul_generator_affine(scalar))
    }

    /// Compute a * G + b * P, where G is the fixed generator.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        let affine_point = point.to_affine();
        Projective::from_affine(&double_scalar_mul_basepoint_affine(a, b, &affine_point))
    }

    /// Batch normalization: convert multiple projective points to affine
    /// with a single field inversion (Montgomery's trick).
    pub fn batch_normalize(points: &[Self]) -> Vec<Affine> {
        let mut prefix = Vec::with_capacity(points.len());
        let mut acc = BaseField::ONE;
        for point in points {
            prefix.push(acc);
            if !point.is_infinity() {
                acc *= point.z;
            }
        }

        let mut inv = acc.inverse();
        let mut out = vec![Affine::INFINITY; points.len()];
        for (i, point) in points.iter().enumerate().rev() {
            if point.is_infinity() {
                continue;
            }
            let z_inv = inv * prefix[i];
            inv *= point.z;
            let z_inv2 = z_inv.square();
            out[i] = Affine::new(point.x * z_inv2, point.y * z_inv2 * z_inv);
        }
        out
    }
}

impl PartialEq for Projective {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => true,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
            _ => false,
        }
    }
}

impl Eq for Projective {}

impl Group for Projective {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity()
    }

    #[inline]
    fn generator() -> Self {
        Projective::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Projective::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

// add-2007-bl
impl Add for Projective {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity() {
            return other;
        }
        if other.is_infinity() {
            return self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * other.z * z2z2;
        let s2 = other.y * self.z * z1z1;

        let h = u2 - u1;
        let r = (s2 - s1).double();

        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::INFINITY
            };
        }

        let i = h.double().square();
        let j = h * i;
        let v = u1 * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;

        Projective::new(x3, y3, z3)
    }
}

impl AddAssign for Projective {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Projective {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Projective {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Projective {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, scalar)
    }
}

impl Mul<Projective> for ScalarField {
    type Output = Projective;

    fn mul(self, point: Projective) -> Projective {
        <Projective as Group>::scalar_mul(&point, &self)
    }
}

impl From<Affine> for Projective {
    fn from(point: Affine) -> Self {
        Projective::from_affine(&point)
    }
}

impl From<&Affine> for Projective {
    fn from(point: &Affine) -> Self {
        Projective::from_affine(point)
    }
}

impl From<Projective> for Affine {
    fn from(point: Projective) -> Self {
        point.to_affine()
    }
}

impl From<&Projective> for Affine {
    fn from(point: &Projective) -> Self {
        point.to_affine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn test_infinity() {
        let inf = Projective::INFINITY;
        assert!(inf.is_infinity());
        assert!(inf.is_on_curve());
        assert_eq!(inf.to_affine(), Affine::INFINITY);
    }

    #[test]
    fn test_conversion_affine_projective() {
        let affine = Affine::generator();
        let projective = Projective::from_affine(&affine);
        assert_eq!(affine, projective.to_affine());
    }

    #[test]
    fn test_double_matches_affine() {
        let g = Projective::generator();
        let doubled = g.double();
        assert!(doubled.is_on_curve());
        assert_eq!(doubled.to_affine(), Affine::generator().double());
    }

    #[test]
    fn test_add_matches_affine() {
        let g = Affine::generator();
        let h = g.double().double() + g;
        let sum = Projective::from(g) + Projective::from(h);
        assert!(sum.is_on_curve());
        assert_eq!(sum.to_affine(), g + h);
    }

    #[test]
    fn test_add_same_point_doubles() {
        let g = Projective::generator().double();
        let g_scaled = Projective::new(
            g.x * BaseField::from_canonical_u64(4),
            g.y * BaseField::from_canonical_u64(8),
            g.z * BaseField::from_canonical_u64(2),
        );
        assert_eq!(g, g_scaled);
        assert_eq!(g + g_scaled, g.double());
        assert!((g - g_scaled).is_infinity());
    }

    #[test]
    fn test_scalar_mul_matches_repeated_addition() {
        let g = Projective::generator();
        let mut sum = Projective::INFINITY;
        for k in 1..=37u64 {
            sum += g;
            assert_eq!(g.scalar_mul(&ScalarField::from_canonical_u64(k)), sum);
        }
        let scalar = ScalarField::from_canonical_u64(0xdead_beef);
        assert_eq!(g * scalar, Projective::mul_generator(&scalar));
    }

    #[test]
    fn test_batch_normalize() {
        let g = Projective::generator();
        let points = [g, Projective::INFINITY, g.double(), g.double() + g];
        let normalized = Projective::batch_normalize(&points);
        for (p, a) in points.iter().zip(normalized.iter()) {
            assert_eq!(p.to_affine(), *a);
        }
    }
}
