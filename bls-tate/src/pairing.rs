//! Reduced Tate pairing e(P, Q) = f_{r,P}(Q)^((p^k - 1) / r).
//!
//! P lives on the base curve E(F_p) and Q on the lifted curve E(F_{p^k}).
//! Miller's algorithm builds f_{r,P} from line and vertical-line evaluations
//! at Q. An evaluation that comes out zero is replaced by 1, which keeps
//! degenerate inputs away from a division by zero.

use log::trace;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use std::sync::Arc;

use crate::elliptic_curve::{EllipticCurve, EllipticCurvePoint};
use crate::error::{BlsError, Result};
use crate::ext_curve::ExtCurvePoint;
use crate::extension_field::{ExtFieldElement, ExtensionField};
use crate::field::{Field, FieldElement};

/// Pairing context for one subgroup order r and one extension field.
#[derive(Debug, Clone)]
pub struct TatePairing {
    curve: EllipticCurve<FieldElement>,
    ext: Arc<ExtensionField>,
    r: u64,
    final_exponent: BigUint,
}

impl TatePairing {
    /// Fails with an internal error if r does not divide p^k - 1.
    pub fn new(
        curve: EllipticCurve<FieldElement>,
        ext: Arc<ExtensionField>,
        r: u64,
    ) -> Result<Self> {
        let q_minus_1 = ext.order() - 1u32;
        let (final_exponent, remainder) = q_minus_1.div_rem(&BigUint::from(r));
        if !remainder.is_zero() {
            return Err(BlsError::internal(format!(
                "r = {} does not divide {}^{} - 1",
                r,
                ext.characteristic(),
                ext.degree()
            )));
        }
        Ok(TatePairing {
            curve,
            ext,
            r,
            final_exponent,
        })
    }

    /// (p^k - 1) / r
    pub fn final_exponent(&self) -> &BigUint {
        &self.final_exponent
    }

    /// The line through base points `t` and `u` evaluated at `q`.
    ///
    /// Tangent when t = u, chord otherwise, and the vertical x_Q - x_T when
    /// u = -t (which includes doubling a point with y = 0).
    pub fn line_function(
        &self,
        t: &EllipticCurvePoint<FieldElement>,
        u: &EllipticCurvePoint<FieldElement>,
        q: &ExtCurvePoint,
    ) -> ExtFieldElement {
        let (
            EllipticCurvePoint::Point { x: xt, y: yt },
            EllipticCurvePoint::Point { x: xq, y: yq },
        ) = (t, q)
        else {
            return self.ext.one();
        };
        if u.is_infinity() {
            return self.ext.one();
        }

        let dx = xq.sub(&self.ext.embed(xt));
        match self.curve.slope(t, u) {
            None => dx,
            Some(m) => yq.sub(&self.ext.embed(yt)).sub(&self.ext.embed(&m).mul(&dx)),
        }
    }

    /// x_Q - x_T, or 1 when T = O.
    pub fn vertical_line(
        &self,
        t: &EllipticCurvePoint<FieldElement>,
        q: &ExtCurvePoint,
    ) -> ExtFieldElement {
        match (t, q) {
            (EllipticCurvePoint::Point { x: xt, .. }, EllipticCurvePoint::Point { x: xq, .. }) => {
                xq.sub(&self.ext.embed(xt))
            }
            _ => self.ext.one(),
        }
    }

    /// Miller's algorithm for f_{r,P}(Q), most significant bit first.
    ///
    /// - doubling: f <- f^2 * l_{T,T}(Q) / v_{2T}(Q), T <- 2T
    /// - addition: f <- f * l_{T,P}(Q) / v_{T+P}(Q), T <- T + P
    pub fn miller(
        &self,
        p: &EllipticCurvePoint<FieldElement>,
        q: &ExtCurvePoint,
    ) -> Result<ExtFieldElement> {
        let mut f = self.ext.one();
        if p.is_infinity() || q.is_infinity() {
            return Ok(f);
        }

        let mut t = p.clone();
        let bits = u64::BITS - self.r.leading_zeros();
        for i in (0..bits.saturating_sub(1)).rev() {
            let line = unit_if_zero(self.line_function(&t, &t, q));
            t = self.curve.double(&t);
            let vertical = unit_if_zero(self.vertical_line(&t, q));
            f = f.square().mul(&line.div(&vertical)?);

            if (self.r >> i) & 1 == 1 {
                let line = unit_if_zero(self.line_function(&t, p, q));
                t = self.curve.add(&t, p);
                let vertical = unit_if_zero(self.vertical_line(&t, q));
                f = f.mul(&line.div(&vertical)?);
            }
            trace!("miller bit {}: T = {}, f = {}", i, t, f);
        }

        Ok(f)
    }

    /// e(P, Q) = f_{r,P}(Q)^((p^k - 1) / r). Either argument at infinity gives 1.
    pub fn pair(
        &self,
        p: &EllipticCurvePoint<FieldElement>,
        q: &ExtCurvePoint,
    ) -> Result<ExtFieldElement> {
        if p.is_infinity() || q.is_infinity() {
            return Ok(self.ext.one());
        }
        Ok(self.miller(p, q)?.pow(&self.final_exponent))
    }
}

fn unit_if_zero(value: ExtFieldElement) -> ExtFieldElement {
    if value.is_zero() {
        value.one_like()
    } else {
        value
    }
}

/// One-shot reduced Tate pairing.
pub fn tate_pairing(
    curve: &EllipticCurve<FieldElement>,
    ext: &Arc<ExtensionField>,
    r: u64,
    p: &EllipticCurvePoint<FieldElement>,
    q: &ExtCurvePoint,
) -> Result<ExtFieldElement> {
    TatePairing::new(curve.clone(), Arc::clone(ext), r)?.pair(p, q)
}
