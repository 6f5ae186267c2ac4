//! The base curve lifted to F_{p^k}, and the search for the second pairing
//! argument Q.

use log::debug;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use std::sync::Arc;

use crate::elliptic_curve::{EllipticCurve, EllipticCurvePoint};
use crate::error::{BlsError, Result};
use crate::extension_field::{ExtFieldElement, ExtensionField};
use crate::field::FieldElement;

pub type ExtCurve = EllipticCurve<ExtFieldElement>;
pub type ExtCurvePoint = EllipticCurvePoint<ExtFieldElement>;

/// The same equation with A and B embedded into F_{p^k}.
pub fn lift_curve(
    curve: &EllipticCurve<FieldElement>,
    ext: &Arc<ExtensionField>,
) -> Result<ExtCurve> {
    EllipticCurve::new(ext.embed(curve.a()), ext.embed(curve.b()))
}

/// Image of a base-curve point on the lifted curve.
pub fn lift_point(
    point: &EllipticCurvePoint<FieldElement>,
    ext: &Arc<ExtensionField>,
) -> ExtCurvePoint {
    match point {
        EllipticCurvePoint::Infinity => EllipticCurvePoint::Infinity,
        EllipticCurvePoint::Point { x, y } => EllipticCurvePoint::Point {
            x: ext.embed(x),
            y: ext.embed(y),
        },
    }
}

fn is_base_point(point: &ExtCurvePoint) -> bool {
    match point {
        EllipticCurvePoint::Infinity => true,
        EllipticCurvePoint::Point { x, y } => x.is_in_base_field() && y.is_in_base_field(),
    }
}

/// #E(F_{p^k}) from #E(F_p) through the Frobenius trace.
///
/// With t = p + 1 - #E(F_p): s_0 = 2, s_1 = t, s_n = t*s_{n-1} - p*s_{n-2},
/// and #E(F_{p^k}) = p^k + 1 - s_k.
pub fn extension_group_order(p: u64, base_order: u64, k: u32) -> Result<BigUint> {
    let p_big = BigInt::from(p);
    let t = BigInt::from(p) + 1u32 - BigInt::from(base_order);

    if k == 0 {
        return Err(BlsError::validation("extension degree must be at least 1"));
    }

    let mut s_prev = BigInt::from(2);
    let mut s = t.clone();
    for _ in 1..k {
        let next = &t * &s - &p_big * &s_prev;
        s_prev = std::mem::replace(&mut s, next);
    }

    let order = p_big.pow(k) + 1u32 - s;
    order.to_biguint().ok_or_else(|| {
        BlsError::internal(format!(
            "negative extension group order for p = {}, #E = {}, k = {}",
            p, base_order, k
        ))
    })
}

/// Affine points with x in enumeration order (the first `window` abscissae),
/// canonical ordinate, and at least one coordinate outside F_p.
fn candidates<'a>(
    curve: &'a ExtCurve,
    ext: &'a Arc<ExtensionField>,
    window: u64,
) -> impl Iterator<Item = (usize, ExtCurvePoint)> + 'a {
    ext.elements()
        .take(usize::try_from(window).unwrap_or(usize::MAX))
        .enumerate()
        .filter_map(move |(index, x)| {
            let y = ext.sqrt(&curve.rhs(&x))?;
            let point = EllipticCurvePoint::Point { x, y };
            (!is_base_point(&point)).then_some((index, point))
        })
}

/// First point of order r on `curve` (over F_{p^k}) that is not a base-field
/// point.
///
/// Candidate abscissae are taken in enumeration order, at most `window` of
/// them, with the canonical square root as ordinate. A direct pass accepts
/// the first candidate already killed by r. If none is, a second pass scales
/// each candidate by h = #E(F_{p^k}) / r^e (e = 2 when r^2 divides the order,
/// else 1) and accepts the first non-trivial multiple killed by r.
pub fn find_point_of_order_r(
    curve: &ExtCurve,
    r: u64,
    base_order: u64,
    window: u64,
) -> Result<ExtCurvePoint> {
    let ext = Arc::clone(curve.a().field());
    let r_big = BigUint::from(r);

    for (index, point) in candidates(curve, &ext, window) {
        if curve.scalar_mul(&r_big, &point).is_infinity() {
            debug!("order-{} point {} found at candidate {}", r, point, index);
            return Ok(point);
        }
    }

    let ext_order = extension_group_order(ext.characteristic(), base_order, ext.degree() as u32)?;
    let r_squared = &r_big * &r_big;
    let h = if (&ext_order % &r_squared).is_zero() {
        &ext_order / &r_squared
    } else {
        &ext_order / &r_big
    };
    debug!(
        "no direct order-{} point in {} candidates; scaling by h = {}",
        r, window, h
    );

    if !h.is_one() {
        for (index, point) in candidates(curve, &ext, window) {
            let scaled = curve.scalar_mul(&h, &point);
            if is_base_point(&scaled) {
                continue;
            }
            if curve.scalar_mul(&r_big, &scaled).is_infinity() {
                debug!("order-{} point {} found at scaled candidate {}", r, scaled, index);
                return Ok(scaled);
            }
        }
    }

    Err(BlsError::exhausted(
        "order-r point",
        format!("{} candidates in F_{}^{}", window, ext.characteristic(), ext.degree()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PrimeField;

    fn setup(
        p: u64,
        a: i64,
        b: i64,
        k: usize,
    ) -> (EllipticCurve<FieldElement>, Arc<ExtensionField>, ExtCurve) {
        let field = PrimeField::new(p).unwrap();
        let curve = EllipticCurve::from_coefficients(&field, a, b).unwrap();
        let ext = ExtensionField::with_degree(field, k).unwrap();
        let lifted = lift_curve(&curve, &ext).unwrap();
        (curve, ext, lifted)
    }

    fn coords(point: &ExtCurvePoint) -> (String, String) {
        (point.x().unwrap().to_string(), point.y().unwrap().to_string())
    }

    #[test]
    fn test_extension_group_order() {
        // supersingular: t = 0, so #E(F_{p^2}) = (p + 1)^2
        assert_eq!(extension_group_order(103, 104, 2).unwrap(), BigUint::from(104u32 * 104));
        assert_eq!(extension_group_order(103, 104, 1).unwrap(), BigUint::from(104u32));
        // t = -4: s_3 = 212, #E = 23^3 + 1 - 212
        assert_eq!(extension_group_order(23, 28, 3).unwrap(), BigUint::from(11956u32));
    }

    #[test]
    fn test_lifted_curve_contains_base_points() {
        let (curve, ext, lifted) = setup(103, 1, 0, 2);
        let field = ext.base();
        let p = curve.point(field.element(18), field.element(44)).unwrap();
        let lifted_p = lift_point(&p, &ext);
        assert!(lifted.is_on_curve(&lifted_p));
        assert_eq!(
            lift_point(&curve.double(&p), &ext),
            lifted.double(&lifted_p)
        );
        assert!(lift_point(&curve.infinity(), &ext).is_infinity());
    }

    #[test]
    fn test_find_point_of_order_13() {
        let (_, _, lifted) = setup(103, 1, 0, 2);
        let q = find_point_of_order_r(&lifted, 13, 104, 1 << 16).unwrap();
        assert_eq!(coords(&q), ("8i".to_string(), "47 + 56i".to_string()));
        assert!(lifted.is_on_curve(&q));
        assert!(lifted.scalar_mul_u64(13, &q).is_infinity());
        assert!(!is_base_point(&q));
    }

    #[test]
    fn test_find_point_in_cubic_extension() {
        let (_, _, lifted) = setup(23, 1, 1, 3);
        let q = find_point_of_order_r(&lifted, 7, 28, 1 << 16).unwrap();
        assert_eq!(
            coords(&q),
            ("14i + 20i^2".to_string(), "5 + 12i + 17i^2".to_string())
        );
    }

    #[test]
    fn test_small_window_exhausts() {
        let (_, _, lifted) = setup(103, 1, 0, 2);
        let err = find_point_of_order_r(&lifted, 13, 104, 2).unwrap_err();
        assert!(matches!(err, BlsError::SearchExhaustion { search: "order-r point", .. }));
    }

    #[test]
    fn test_degree_one_has_no_independent_point() {
        // N = 15, r = 5, 11 ≡ 1 (mod 5)
        let (_, _, lifted) = setup(11, 1, 7, 1);
        assert!(find_point_of_order_r(&lifted, 5, 15, 1 << 16).is_err());
    }
}
