//! BLS signatures over the reduced Tate pairing.
//!
//! Setup derives every public value from (p, A, B):
//!
//! ```text
//! F_p -> E(F_p) -> #E, r, cofactor -> k -> f(x) -> F_{p^k} -> Q in E(F_{p^k})[r]
//! ```
//!
//! A signature is sig = a * H(m). Verification checks
//! e(sig, Q) = e(H(m), a * Q), which holds by bilinearity since both sides
//! equal e(H(m), Q)^a.

use log::info;
use num_bigint::BigInt;
use std::sync::Arc;

use crate::config::SchemeConfig;
use crate::elliptic_curve::{EllipticCurve, EllipticCurvePoint, GroupOrder};
use crate::error::Result;
use crate::ext_curve::{self, ExtCurve, ExtCurvePoint};
use crate::extension_field::{self, ExtFieldElement, ExtensionField};
use crate::field::{FieldElement, PrimeField};
use crate::hash_to_point;
use crate::pairing::TatePairing;
use crate::polynomial::Polynomial;

/// Base-field point type used for H(m) and signatures.
pub type G1Point = EllipticCurvePoint<FieldElement>;

/// Public parameters of one scheme instance. Immutable once built.
#[derive(Debug, Clone)]
pub struct BlsParams {
    field: PrimeField,
    curve: EllipticCurve<FieldElement>,
    group_order: GroupOrder,
    embedding_degree: u32,
    ext: Arc<ExtensionField>,
    ext_curve: ExtCurve,
    q: ExtCurvePoint,
    pairing: TatePairing,
}

/// Output of [`BlsParams::sign`].
#[derive(Debug, Clone, PartialEq)]
pub struct Signed {
    pub hash_point: G1Point,
    pub signature: G1Point,
}

/// Both sides of the verification identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// e(sig, Q)
    pub lhs: ExtFieldElement,
    /// e(H(m), a * Q)
    pub rhs: ExtFieldElement,
    pub verified: bool,
}

/// Every intermediate value of one sign-and-verify run.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub group_order: u64,
    pub r: u64,
    pub cofactor: u64,
    pub embedding_degree: u32,
    pub irreducible_poly: Polynomial<FieldElement>,
    pub hash_point: G1Point,
    pub signature: G1Point,
    pub q: ExtCurvePoint,
    pub public_key: ExtCurvePoint,
    pub lhs: ExtFieldElement,
    pub rhs: ExtFieldElement,
    pub verified: bool,
    pub summary: String,
}

impl BlsParams {
    /// Setup with [`SchemeConfig::default`].
    pub fn setup(p: u64, a: i64, b: i64) -> Result<Self> {
        Self::setup_with(p, a, b, &SchemeConfig::default())
    }

    pub fn setup_with(p: u64, a: i64, b: i64, config: &SchemeConfig) -> Result<Self> {
        let field = PrimeField::with_config(p, config)?;
        let curve = EllipticCurve::from_coefficients(&field, a, b)?;
        info!("curve {} over {}", curve, field);

        let group_order = curve.group_order()?;
        info!(
            "#E = {}, r = {}, cofactor = {}",
            group_order.order, group_order.r, group_order.cofactor
        );

        let embedding_degree =
            extension_field::embedding_degree(p, group_order.r, config.max_embedding_degree)?;
        let ext = ExtensionField::with_degree(field, embedding_degree as usize)?;
        info!("k = {}, f(x) = {}", embedding_degree, ext.modulus());

        let ext_curve = ext_curve::lift_curve(&curve, &ext)?;
        let q = ext_curve::find_point_of_order_r(
            &ext_curve,
            group_order.r,
            group_order.order,
            config.point_search_window,
        )?;
        info!("Q = {}", q);

        let pairing = TatePairing::new(curve.clone(), Arc::clone(&ext), group_order.r)?;

        Ok(BlsParams {
            field,
            curve,
            group_order,
            embedding_degree,
            ext,
            ext_curve,
            q,
            pairing,
        })
    }

    pub fn field(&self) -> PrimeField {
        self.field
    }

    pub fn curve(&self) -> &EllipticCurve<FieldElement> {
        &self.curve
    }

    pub fn group_order(&self) -> &GroupOrder {
        &self.group_order
    }

    pub fn r(&self) -> u64 {
        self.group_order.r
    }

    pub fn cofactor(&self) -> u64 {
        self.group_order.cofactor
    }

    pub fn embedding_degree(&self) -> u32 {
        self.embedding_degree
    }

    pub fn irreducible_poly(&self) -> &Polynomial<FieldElement> {
        self.ext.modulus()
    }

    pub fn extension_field(&self) -> &Arc<ExtensionField> {
        &self.ext
    }

    pub fn extension_curve(&self) -> &ExtCurve {
        &self.ext_curve
    }

    /// The public point Q of order r in E(F_{p^k}).
    pub fn q(&self) -> &ExtCurvePoint {
        &self.q
    }

    pub fn pairing(&self) -> &TatePairing {
        &self.pairing
    }

    /// H(m)
    pub fn hash(&self, message: &str) -> Result<G1Point> {
        hash_to_point::hash_to_point(message, &self.curve, &self.group_order)
    }

    /// a * Q
    pub fn public_key(&self, private_key: i64) -> ExtCurvePoint {
        self.ext_curve
            .scalar_mul_signed(&BigInt::from(private_key), &self.q)
    }

    /// sig = a * H(m)
    pub fn sign(&self, private_key: i64, message: &str) -> Result<Signed> {
        let hash_point = self.hash(message)?;
        let signature = self
            .curve
            .scalar_mul_signed(&BigInt::from(private_key), &hash_point);
        info!("signed: H(m) = {}, sig = {}", hash_point, signature);
        Ok(Signed {
            hash_point,
            signature,
        })
    }

    /// Compare e(sig, Q) with e(H(m), a * Q).
    pub fn verify(
        &self,
        signature: &G1Point,
        hash_point: &G1Point,
        private_key: i64,
    ) -> Result<Verification> {
        let lhs = self.pairing.pair(signature, &self.q)?;
        let rhs = self.pairing.pair(hash_point, &self.public_key(private_key))?;
        let verified = lhs == rhs;
        info!("verify: lhs = {}, rhs = {}, verified = {}", lhs, rhs, verified);
        Ok(Verification { lhs, rhs, verified })
    }

    /// Recompute H(m) and verify against it.
    pub fn verify_message(
        &self,
        message: &str,
        signature: &G1Point,
        private_key: i64,
    ) -> Result<Verification> {
        let hash_point = self.hash(message)?;
        self.verify(signature, &hash_point, private_key)
    }

    /// Sign `message` and verify the result, keeping every intermediate value.
    pub fn transcript(&self, private_key: i64, message: &str) -> Result<Transcript> {
        let Signed {
            hash_point,
            signature,
        } = self.sign(private_key, message)?;
        let Verification { lhs, rhs, verified } =
            self.verify(&signature, &hash_point, private_key)?;
        let summary = summarize(&lhs, &rhs, verified);

        Ok(Transcript {
            group_order: self.group_order.order,
            r: self.group_order.r,
            cofactor: self.group_order.cofactor,
            embedding_degree: self.embedding_degree,
            irreducible_poly: self.ext.modulus().clone(),
            hash_point,
            signature,
            q: self.q.clone(),
            public_key: self.public_key(private_key),
            lhs,
            rhs,
            verified,
            summary,
        })
    }
}

fn summarize(lhs: &ExtFieldElement, rhs: &ExtFieldElement, verified: bool) -> String {
    if verified {
        format!(
            "Signature verified: e(sig, Q) = e(H(m), aQ) = {}",
            lhs
        )
    } else {
        format!(
            "Signature rejected: e(sig, Q) = {} but e(H(m), aQ) = {}",
            lhs, rhs
        )
    }
}

/// The full pipeline for one request with default limits.
pub fn run(p: u64, a: i64, b: i64, private_key: i64, message: &str) -> Result<Transcript> {
    run_with(p, a, b, private_key, message, &SchemeConfig::default())
}

pub fn run_with(
    p: u64,
    a: i64,
    b: i64,
    private_key: i64,
    message: &str,
    config: &SchemeConfig,
) -> Result<Transcript> {
    BlsParams::setup_with(p, a, b, config)?.transcript(private_key, message)
}
