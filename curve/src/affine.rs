// Grumpkin: E(GF(r)) : y^2 = x^3 - 17, r = BN254 scalar field modulus
// Generator: (1, sqrt(-16)) = (1, 0x2cf135e7506a45d632d270d45f1181294833fc48d823f272c)
// Curve prime order: 21888242871839275222246405745257275088696311157297823662689037894645226208583 (254 bits)
// Curve prime order (hex): 0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47
// Curve cofactor: 1
// Cycle partner of BN254: the coordinate field is BN254's scalar field and vice versa.

use crate::{double_scalar_mul_basepoint_affine, mul_generator_affine, BaseField, Group, Projective, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Affine point on the elliptic curve.
/// Represents a point in affine coordinates (x, y) or the point at infinity.
///
/// Deserialization only yields points on the curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "AffineRepr", try_from = "AffineRepr")]
pub struct Affine {
    /// The x-coordinate of the point
    pub x: BaseField,
    /// The y-coordinate of the point
    pub y: BaseField,
    /// Whether this point is the point at infinity (identity element)
    pub is_infinity: bool,
}

/// Wire form of [`Affine`]; the identity travels as `(0, 0, true)`.
#[derive(Serialize, Deserialize)]
struct AffineRepr {
    x: BaseField,
    y: BaseField,
    is_infinity: bool,
}

impl From<Affine> for AffineRepr {
    fn from(point: Affine) -> Self {
        let (x, y) = point.coordinates();
        AffineRepr {
            x,
            y,
            is_infinity: point.is_infinity,
        }
    }
}

impl TryFrom<AffineRepr> for Affine {
    type Error = &'static str;

    fn try_from(repr: AffineRepr) -> Result<Self, Self::Error> {
        if repr.is_infinity {
            return Ok(Affine::INFINITY);
        }
        Affine::new_checked(repr.x, repr.y).ok_or("point is not on the curve")
    }
}

impl Affine {
    /// Get the 'b' coefficient: -17
    #[inline]
    pub(crate) fn curve_b() -> BaseField {
        -BaseField::from_canonical_u64(17)
    }

    /// The point at infinity (identity element). Its coordinates are (0, 0).
    pub const INFINITY: Self = Affine {
        x: BaseField::ZERO,
        y: BaseField::ZERO,
        is_infinity: true,
    };

    /// Create a new affine point without checking the curve equation.
    pub fn new(x: BaseField, y: BaseField) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    /// Create a new affine point, rejecting coordinates off the curve.
    pub fn new_checked(x: BaseField, y: BaseField) -> Option<Self> {
        let point = Self::new(x, y);
        point.is_on_curve().then_some(point)
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Coordinates as fed to the hash oracle; the identity encodes as (0, 0).
    #[inline]
    pub fn coordinates(&self) -> (BaseField, BaseField) {
        if self.is_infinity {
            (BaseField::ZERO, BaseField::ZERO)
        } else {
            (self.x, self.y)
        }
    }

    /// Check if a point is on the curve: y^2 = x^3 - 17.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }

        let y2 = self.y.square();
        let x3 = self.x.square() * self.x;
        y2 == x3 + Self::curve_b()
    }

    /// The fixed base point G = (1, sqrt(-16)).
    pub fn generator() -> Self {
        let y = BaseField::from_canonical_limbs([
            0x833fc48d823f272c,
            0x2d270d45f1181294,
            0xcf135e7506a45d63,
            0x0000000000000002,
        ]);
        Affine::new(BaseField::ONE, y)
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        if self.is_infinity {
            return *self;
        }

        // If y = 0, then 2P = O
        if self.y.is_zero() {
            return Self::INFINITY;
        }

        // λ = 3x^2 / (2y), a = 0
        let x2 = self.x.square();
        let numerator = x2 + x2 + x2;
        let lambda = numerator / self.y.double();

        let x_r = lambda.square() - self.x.double();
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Affine::new(self.x, -self.y)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator_affine(scalar)
    }

    /// Compute a * G + b * P, where G is the fixed generator.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        double_scalar_mul_basepoint_affine(a, b, point)
    }
}

impl Group for Affine {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity
    }

    #[inline]
    fn generator() -> Self {
        Affine::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Affine::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }

    /// Affine additions need a field inversion each, so the ladder runs in
    /// Jacobian coordinates and normalizes once.
    fn scalar_mul(&self, scalar: &ScalarField) -> Self {
        Projective::from_affine(self)
            .scalar_mul(scalar)
            .to_affine()
    }

    /// Accumulates in Jacobian coordinates with one final normalization.
    fn multi_scalar_mul(points: &[Self], scalars: &[ScalarField]) -> Self {
        debug_assert_eq!(points.len(), scalars.len());
        points
            .iter()
            .zip(scalars.iter())
            .fold(Projective::INFINITY, |acc, (point, scalar)| {
                acc + Projective::from_affine(point).scalar_mul(scalar)
            })
            .to_affine()
    }
}

impl Add for Affine {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity {
            return other;
        }
        if other.is_infinity {
            return self;
        }

        if self.x == other.x {
            if self.y == other.y {
                return self.double();
            } else {
                return Self::INFINITY;
            }
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = (other.y - self.y) / (other.x - self.x);

        // x_r = λ^2 - x1 - x2
        let x_r = lambda.square() - self.x - other.x;

        // y_r = λ(x1 - x_r) - y1
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }
}

impl AddAssign for Affine {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Affine {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Affine {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Affine {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, scalar)
    }
}

impl Mul<Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: Affine) -> Affine {
        <Affine as Group>::scalar_mul(&point, &self)
    }
}

impl Mul<&Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: &Affine) -> Affine {
        <Affine as Group>::scalar_mul(point, &self)
    }
}
