//! Deterministic map from messages to points of the order-r subgroup.
//!
//! message -> x0 in F_p -> first x = x0, x0 + 1, ... on the curve -> cofactor
//! multiple. This is a try-and-increment construction, not a constant-time
//! hash-to-curve.

use log::debug;

use crate::elliptic_curve::{EllipticCurve, EllipticCurvePoint, GroupOrder};
use crate::error::{BlsError, Result};
use crate::field::{Field, FieldElement, PrimeField};

/// The UTF-8 bytes of `message` read as a little-endian base-256 integer,
/// reduced mod p. The empty message maps to 0.
///
/// For "שלום" on y^2 = x^3 + x over F_103 this gives x0 = 18 and
/// H(m) = (26, 68), not the (32, 47) quoted in older worked examples.
pub fn string_to_field_element(message: &str, field: &PrimeField) -> FieldElement {
    encode(message, &field.zero())
}

fn encode(message: &str, zero: &FieldElement) -> FieldElement {
    let radix = zero.from_integer_like(256);
    message
        .as_bytes()
        .iter()
        .rev()
        .fold(*zero, |acc, &byte| {
            acc.mul(&radix).add(&zero.from_integer_like(byte as i64))
        })
}

/// Curve points with abscissa x0, x0 + 1, ... (mod p), skipping abscissae
/// whose right-hand side is not a square. One pass over F_p at most.
fn walk_from<'a>(
    x0: &'a FieldElement,
    curve: &'a EllipticCurve<FieldElement>,
) -> impl Iterator<Item = EllipticCurvePoint<FieldElement>> + 'a {
    (0..curve.characteristic()).filter_map(move |offset| {
        let x = x0.add(&x0.from_integer_like(offset as i64));
        debug!("hash-to-point trying x = {}", x);
        curve.lift_x(&x)
    })
}

/// First point (x, y) with x = x0 + i for the smallest i >= 0, y the smaller
/// square root.
pub fn increment_and_try(
    x0: &FieldElement,
    curve: &EllipticCurve<FieldElement>,
) -> Result<EllipticCurvePoint<FieldElement>> {
    walk_from(x0, curve)
        .next()
        .ok_or_else(|| exhausted(x0, curve))
}

/// `cofactor * P`, projecting into the order-r subgroup.
pub fn cofactor_clear(
    point: &EllipticCurvePoint<FieldElement>,
    curve: &EllipticCurve<FieldElement>,
    cofactor: u64,
) -> EllipticCurvePoint<FieldElement> {
    curve.scalar_mul_u64(cofactor, point)
}

/// H(m): a non-identity point whose order divides r.
///
/// Candidates that clear to the identity are skipped and the walk continues
/// from the next abscissa.
pub fn hash_to_point(
    message: &str,
    curve: &EllipticCurve<FieldElement>,
    order: &GroupOrder,
) -> Result<EllipticCurvePoint<FieldElement>> {
    let x0 = encode(message, &curve.a().zero_like());

    let found = walk_from(&x0, curve)
        .map(|point| cofactor_clear(&point, curve, order.cofactor))
        .find(|point| !point.is_infinity());
    found.ok_or_else(|| exhausted(&x0, curve))
}

fn exhausted(x0: &FieldElement, curve: &EllipticCurve<FieldElement>) -> BlsError {
    BlsError::exhausted(
        "hash-to-point",
        format!("x = {} + i for i < {} on {}", x0, curve.characteristic(), curve),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(p: u64, a: i64, b: i64) -> (PrimeField, EllipticCurve<FieldElement>, GroupOrder) {
        let field = PrimeField::new(p).unwrap();
        let curve = EllipticCurve::from_coefficients(&field, a, b).unwrap();
        let order = curve.group_order().unwrap();
        (field, curve, order)
    }

    #[test]
    fn test_string_to_field_element() {
        let field = PrimeField::new(103).unwrap();
        // bytes d7 a9 d7 9c d7 95 d7 9d, little-endian, mod 103
        assert_eq!(string_to_field_element("שלום", &field).value(), 18);
        assert_eq!(string_to_field_element("", &field).value(), 0);
        // 'a' = 97
        assert_eq!(string_to_field_element("a", &field).value(), 97);
        // "ab" = 97 + 98 * 256 = 25185 ≡ 53 (mod 103)
        assert_eq!(string_to_field_element("ab", &field).value(), 25185 % 103);

        let field23 = PrimeField::new(23).unwrap();
        assert_eq!(string_to_field_element("hello", &field23).value(), 15);
    }

    #[test]
    fn test_increment_and_try() {
        let (field, curve, _) = curve(103, 1, 0);
        let p = increment_and_try(&field.element(18), &curve).unwrap();
        assert_eq!(p, curve.point(field.element(18), field.element(44)).unwrap());

        // Walking past non-residues lands on a curve point
        let q = increment_and_try(&field.element(19), &curve).unwrap();
        assert!(curve.is_on_curve(&q));
        assert!(!q.is_infinity());
    }

    #[test]
    fn test_cofactor_clear() {
        let (field, curve, order) = curve(103, 1, 0);
        let p = curve.point(field.element(18), field.element(44)).unwrap();
        let cleared = cofactor_clear(&p, &curve, order.cofactor);
        assert!(curve.scalar_mul_u64(order.r, &cleared).is_infinity());
    }

    #[test]
    fn test_hash_to_point() {
        let (field, curve, order) = curve(103, 1, 0);
        let h = hash_to_point("שלום", &curve, &order).unwrap();
        assert_eq!(h, curve.point(field.element(26), field.element(68)).unwrap());
        assert_eq!(curve.point_order(&h, order.order).unwrap(), 13);
    }

    #[test]
    fn test_hash_to_point_cubic_case() {
        let (field, curve, order) = curve(23, 1, 1);
        let h = hash_to_point("hello", &curve, &order).unwrap();
        assert_eq!(h, curve.point(field.element(5), field.element(19)).unwrap());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let (_, curve, order) = curve(103, 1, 0);
        for message in ["", "a", "hello", "שלום", "a longer message with spaces"] {
            let h1 = hash_to_point(message, &curve, &order).unwrap();
            let h2 = hash_to_point(message, &curve, &order).unwrap();
            assert_eq!(h1, h2);
            assert!(!h1.is_infinity());
            assert!(curve.scalar_mul_u64(order.r, &h1).is_infinity());
        }
    }

    #[test]
    fn test_identity_after_clearing_is_skipped() {
        // x = 0 gives (0, 0), which the cofactor 8 sends to O
        let (_, curve, order) = curve(103, 1, 0);
        let h = hash_to_point("", &curve, &order).unwrap();
        assert!(!h.is_infinity());
        assert_ne!(h.x().unwrap().value(), 0);
    }
}
