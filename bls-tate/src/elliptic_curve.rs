//! Elliptic curves in short Weierstrass form y^2 = x^3 + ax + b.
//!
//! Generic over any [`Field`], so the same group law serves the base curve
//! E(F_p) and its lift E(F_{p^k}). Chord-tangent law:
//! - distinct P, Q: the line through P and Q meets the curve again at -R, so P + Q = R
//! - P = Q: the tangent at P meets the curve again at -R, so 2P = R
//! - the point at infinity O is the identity

use num_bigint::{BigInt, BigUint, Sign};
use std::fmt;

use crate::error::{BlsError, Result};
use crate::field::{Field, FieldElement, PrimeField};
use crate::number_theory;

/// Represents a point on an elliptic curve over a finite field
/// Points are either (x, y) coordinates or the point at infinity
#[derive(Debug, Clone, PartialEq)]
pub enum EllipticCurvePoint<F: Field> {
    /// Point at infinity (identity element)
    Infinity,
    /// Affine point (x, y) on the curve
    Point { x: F, y: F },
}

/// Elliptic curve y^2 = x^3 + ax + b with a non-zero discriminant.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticCurve<F: Field> {
    a: F,
    b: F,
}

impl<F: Field> EllipticCurve<F> {
    /// Rejects singular curves (4a^3 + 27b^2 = 0).
    pub fn new(a: F, b: F) -> Result<Self> {
        let four = a.from_integer_like(4);
        let twenty_seven = a.from_integer_like(27);
        let discriminant = four
            .mul(&a.square().mul(&a))
            .add(&twenty_seven.mul(&b.square()));
        if discriminant.is_zero() {
            return Err(BlsError::validation(format!(
                "curve y^2 = x^3 + {}x + {} is singular",
                a, b
            )));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &F {
        &self.a
    }

    pub fn b(&self) -> &F {
        &self.b
    }

    /// x^3 + ax + b
    pub fn rhs(&self, x: &F) -> F {
        x.square().mul(x).add(&self.a.mul(x)).add(&self.b)
    }

    /// Check if a point (x, y) satisfies the curve equation y^2 = x^3 + ax + b
    pub fn is_on_curve(&self, point: &EllipticCurvePoint<F>) -> bool {
        match point {
            EllipticCurvePoint::Infinity => true,
            EllipticCurvePoint::Point { x, y } => y.square() == self.rhs(x),
        }
    }

    /// Create a point on this curve, rejecting coordinates off the curve.
    pub fn point(&self, x: F, y: F) -> Result<EllipticCurvePoint<F>> {
        let point = EllipticCurvePoint::Point { x, y };
        if !self.is_on_curve(&point) {
            return Err(BlsError::validation(format!(
                "{} is not on {}",
                point, self
            )));
        }
        Ok(point)
    }

    /// Return the point at infinity
    pub fn infinity(&self) -> EllipticCurvePoint<F> {
        EllipticCurvePoint::Infinity
    }

    /// Slope of the chord through `p` and `q`, or of the tangent when they
    /// coincide. `None` when the line is vertical or either point is O.
    ///
    /// - chord: m = (y2 - y1) / (x2 - x1)
    /// - tangent: m = (3x1^2 + a) / (2y1)
    pub fn slope(&self, p: &EllipticCurvePoint<F>, q: &EllipticCurvePoint<F>) -> Option<F> {
        let (
            EllipticCurvePoint::Point { x: x1, y: y1 },
            EllipticCurvePoint::Point { x: x2, y: y2 },
        ) = (p, q)
        else {
            return None;
        };

        let (numerator, denominator) = if x1 != x2 {
            (y2.sub(y1), x2.sub(x1))
        } else if y1 == y2 {
            let three = x1.from_integer_like(3);
            (three.mul(&x1.square()).add(&self.a), y1.add(y1))
        } else {
            return None;
        };

        // A zero denominator here is 2y = 0, the vertical tangent.
        denominator.inv().ok().map(|inv| numerator.mul(&inv))
    }

    /// Add two points on the curve using the Chord-Tangent Law
    ///
    /// - x3 = m^2 - x1 - x2
    /// - y3 = m(x1 - x3) - y1
    ///
    /// Vertical lines (P + (-P), or doubling a point with y = 0) give O.
    pub fn add(
        &self,
        p: &EllipticCurvePoint<F>,
        q: &EllipticCurvePoint<F>,
    ) -> EllipticCurvePoint<F> {
        match (p, q) {
            // Identity cases: O + P = P
            (EllipticCurvePoint::Infinity, _) => q.clone(),
            (_, EllipticCurvePoint::Infinity) => p.clone(),

            (
                EllipticCurvePoint::Point { x: x1, y: y1 },
                EllipticCurvePoint::Point { x: x2, .. },
            ) => {
                let Some(m) = self.slope(p, q) else {
                    return EllipticCurvePoint::Infinity;
                };
                let x3 = m.square().sub(x1).sub(x2);
                let y3 = m.mul(&x1.sub(&x3)).sub(y1);
                EllipticCurvePoint::Point { x: x3, y: y3 }
            }
        }
    }

    /// Double a point on the curve (compute 2P) using the Tangent Law
    pub fn double(&self, p: &EllipticCurvePoint<F>) -> EllipticCurvePoint<F> {
        self.add(p, p)
    }

    /// Negate a point on the curve (compute -P)
    /// For P = (x, y), -P = (x, -y)
    pub fn negate(&self, p: &EllipticCurvePoint<F>) -> EllipticCurvePoint<F> {
        match p {
            EllipticCurvePoint::Infinity => EllipticCurvePoint::Infinity,
            EllipticCurvePoint::Point { x, y } => EllipticCurvePoint::Point {
                x: x.clone(),
                y: y.neg(),
            },
        }
    }

    /// Scalar multiplication: compute n*P using double-and-add algorithm
    /// This is efficient O(log n) operation
    pub fn scalar_mul(&self, n: &BigUint, p: &EllipticCurvePoint<F>) -> EllipticCurvePoint<F> {
        let mut result = EllipticCurvePoint::Infinity;
        let mut base = p.clone();

        for i in 0..n.bits() {
            if n.bit(i) {
                result = self.add(&result, &base);
            }
            base = self.double(&base);
        }

        result
    }

    /// `n*P` for a signed scalar; negative scalars multiply -P.
    pub fn scalar_mul_signed(
        &self,
        n: &BigInt,
        p: &EllipticCurvePoint<F>,
    ) -> EllipticCurvePoint<F> {
        let product = self.scalar_mul(n.magnitude(), p);
        match n.sign() {
            Sign::Minus => self.negate(&product),
            _ => product,
        }
    }

    pub fn scalar_mul_u64(&self, n: u64, p: &EllipticCurvePoint<F>) -> EllipticCurvePoint<F> {
        self.scalar_mul(&BigUint::from(n), p)
    }

    /// Smallest divisor `d` of `group_order` with `d*P = O`.
    pub fn point_order(&self, p: &EllipticCurvePoint<F>, group_order: u64) -> Result<u64> {
        (1..=group_order)
            .filter(|d| group_order % d == 0)
            .find(|&d| self.scalar_mul_u64(d, p).is_infinity())
            .ok_or_else(|| {
                BlsError::internal(format!(
                    "{} is not annihilated by the group order {}",
                    p, group_order
                ))
            })
    }
}

/// #E(F_p) together with the prime-order subgroup used for signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOrder {
    /// Number of points, the point at infinity included.
    pub order: u64,
    /// Largest prime factor of `order`.
    pub r: u64,
    /// `order / r`
    pub cofactor: u64,
}

impl EllipticCurve<FieldElement> {
    /// y^2 = x^3 + Ax + B over `field`, with A and B reduced mod p.
    pub fn from_coefficients(field: &PrimeField, a: i64, b: i64) -> Result<Self> {
        Self::new(field.element(a), field.element(b))
    }

    pub fn characteristic(&self) -> u64 {
        self.a.modulus()
    }

    /// Counts #E(F_p) by scanning every x.
    ///
    /// A nonzero residue x^3 + Ax + B contributes two points, zero contributes
    /// one, and the point at infinity adds one more. O(p log p).
    pub fn count_points(&self) -> u64 {
        let p = self.characteristic();
        let affine: u64 = (0..p)
            .map(|x| {
                let z = self.rhs(&self.a.from_integer_like(x as i64));
                if z.is_zero() {
                    1
                } else if z.is_square() {
                    2
                } else {
                    0
                }
            })
            .sum();
        affine + 1
    }

    /// Group order, its largest prime factor r, and the cofactor.
    pub fn group_order(&self) -> Result<GroupOrder> {
        let order = self.count_points();
        let r = number_theory::largest_prime_factor(order)?;
        if order % r != 0 {
            return Err(BlsError::internal(format!(
                "r = {} does not divide the group order {}",
                r, order
            )));
        }
        Ok(GroupOrder {
            order,
            r,
            cofactor: order / r,
        })
    }

    /// The point with abscissa `x` and the smaller square root as ordinate,
    /// or `None` when x^3 + Ax + B is not a square.
    pub fn lift_x(&self, x: &FieldElement) -> Option<EllipticCurvePoint<FieldElement>> {
        let y = self.rhs(x).sqrt()?;
        Some(EllipticCurvePoint::Point { x: *x, y })
    }
}

impl<F: Field> EllipticCurvePoint<F> {
    /// Check if this is the point at infinity
    pub fn is_infinity(&self) -> bool {
        matches!(self, EllipticCurvePoint::Infinity)
    }

    /// Get the x-coordinate if this is a point (not infinity)
    pub fn x(&self) -> Option<&F> {
        match self {
            EllipticCurvePoint::Infinity => None,
            EllipticCurvePoint::Point { x, .. } => Some(x),
        }
    }

    /// Get the y-coordinate if this is a point (not infinity)
    pub fn y(&self) -> Option<&F> {
        match self {
            EllipticCurvePoint::Infinity => None,
            EllipticCurvePoint::Point { y, .. } => Some(y),
        }
    }
}

impl<F: Field> fmt::Display for EllipticCurvePoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EllipticCurvePoint::Infinity => write!(f, "O"),
            EllipticCurvePoint::Point { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}

impl<F: Field> fmt::Display for EllipticCurve<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "y^2 = x^3 + {}x + {}", self.a, self.b)
    }
}
