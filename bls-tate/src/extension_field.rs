//! Extension fields F_{p^k} = F_p[x] / (f(x)).
//!
//! Elements are coefficient vectors of length k, lowest degree first, and
//! share their field description through an [`Arc`]. The generator x is
//! printed as `i`, so with f = x^2 + 1 the element 47 + 56x reads `47 + 56i`.

use log::debug;
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{BlsError, Result};
use crate::field::{impl_field_ops, Field, FieldElement, PrimeField};
use crate::polynomial::Polynomial;

/// Smallest k >= 1 with p^k ≡ 1 (mod r), searched up to `max_k`.
pub fn embedding_degree(p: u64, r: u64, max_k: u32) -> Result<u32> {
    let range = || format!("k in 1..={} for p = {}, r = {}", max_k, p, r);
    if r < 2 || p % r == 0 {
        return Err(BlsError::exhausted("embedding degree", range()));
    }
    let (p, r) = (p as u128, r as u128);
    let mut power = 1u128;
    for k in 1..=max_k {
        power = power * p % r;
        if power == 1 {
            return Ok(k);
        }
    }
    Err(BlsError::exhausted("embedding degree", range()))
}

/// First monic irreducible polynomial of degree `k` over `field`.
///
/// Candidates x^k + c_{k-1}x^{k-1} + ... + c_0 are tried in increasing order
/// of n = sum(c_i * p^i), starting at n = 1. For k = 1 the extension is F_p
/// itself and the modulus is x.
pub fn find_irreducible(field: &PrimeField, k: usize) -> Result<Polynomial<FieldElement>> {
    if k == 0 {
        return Err(BlsError::validation("extension degree must be at least 1"));
    }
    if k == 1 {
        return Ok(Polynomial::monomial(field.one(), 1));
    }

    let p = field.characteristic();
    let mut digits = vec![0u64; k];
    let mut tried = 0u64;
    // c_0 is the least significant digit of n
    while advance(digits.iter_mut(), p) {
        tried += 1;
        let mut coeffs: Vec<FieldElement> =
            digits.iter().map(|&c| field.element(c as i64)).collect();
        coeffs.push(field.one());
        let candidate = Polynomial::new(coeffs);

        if candidate.has_root_in_base_field() {
            continue;
        }
        if candidate.is_irreducible()? {
            debug!("irreducible {} found after {} candidates", candidate, tried);
            return Ok(candidate);
        }
    }

    Err(BlsError::exhausted(
        "irreducible polynomial",
        format!("monic degree {} over {}", k, field),
    ))
}

/// Odometer step over base-`p` digits, first yielded digit fastest.
/// Returns false once every digit has wrapped back to zero.
fn advance<'a>(digits: impl Iterator<Item = &'a mut u64>, p: u64) -> bool {
    for d in digits {
        *d += 1;
        if *d < p {
            return true;
        }
        *d = 0;
    }
    false
}

/// F_p[x] / (f) for a monic irreducible f of degree k.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionField {
    base: PrimeField,
    modulus: Polynomial<FieldElement>,
    k: usize,
    /// Coefficients of the first non-square in enumeration order.
    non_residue: Vec<FieldElement>,
}

impl ExtensionField {
    /// Validate `modulus` (monic, irreducible, degree >= 1) and build the field.
    pub fn new(base: PrimeField, modulus: Polynomial<FieldElement>) -> Result<Arc<Self>> {
        let Some(k) = modulus.degree().filter(|&k| k >= 1) else {
            return Err(BlsError::validation(
                "extension modulus must have degree at least 1",
            ));
        };
        if !modulus.is_monic() {
            return Err(BlsError::validation(format!(
                "extension modulus {} is not monic",
                modulus
            )));
        }
        if modulus.coeffs()[0].modulus() != base.characteristic() {
            return Err(BlsError::validation(format!(
                "extension modulus {} is not defined over {}",
                modulus, base
            )));
        }
        if !modulus.is_irreducible()? {
            return Err(BlsError::validation(format!(
                "{} is reducible over {}",
                modulus, base
            )));
        }

        let mut field = ExtensionField {
            base,
            modulus,
            k,
            non_residue: Vec::new(),
        };
        // Tonelli-Shanks needs a fixed non-square; find it once per field
        let scratch = Arc::new(field.clone());
        let found = scratch.elements().find(|c| !c.is_square());
        let Some(non_residue) = found else {
            return Err(BlsError::internal(format!("no non-square in {}", field)));
        };
        field.non_residue = non_residue.coeffs;
        debug!(
            "non-square {:?} fixed for {}",
            field.non_residue.iter().map(|c| c.value()).collect::<Vec<_>>(),
            field
        );
        Ok(Arc::new(field))
    }

    /// The extension of degree `k` defined by [`find_irreducible`].
    pub fn with_degree(base: PrimeField, k: usize) -> Result<Arc<Self>> {
        let modulus = find_irreducible(&base, k)?;
        Self::new(base, modulus)
    }

    pub fn base(&self) -> PrimeField {
        self.base
    }

    pub fn characteristic(&self) -> u64 {
        self.base.characteristic()
    }

    pub fn degree(&self) -> usize {
        self.k
    }

    pub fn modulus(&self) -> &Polynomial<FieldElement> {
        &self.modulus
    }

    /// p^k
    pub fn order(&self) -> BigUint {
        BigUint::from(self.characteristic()).pow(self.k as u32)
    }

    /// Element with the given coefficients, lowest degree first, reduced mod f.
    pub fn element(self: &Arc<Self>, coeffs: &[i64]) -> ExtFieldElement {
        let coeffs = coeffs.iter().map(|&c| self.base.element(c)).collect();
        self.from_base_coefficients(coeffs)
    }

    fn from_base_coefficients(self: &Arc<Self>, coeffs: Vec<FieldElement>) -> ExtFieldElement {
        ExtFieldElement {
            coeffs: self.reduce(coeffs),
            field: Arc::clone(self),
        }
    }

    pub fn zero(self: &Arc<Self>) -> ExtFieldElement {
        self.element(&[])
    }

    pub fn one(self: &Arc<Self>) -> ExtFieldElement {
        self.element(&[1])
    }

    /// Image of a base-field element.
    pub fn embed(self: &Arc<Self>, a: &FieldElement) -> ExtFieldElement {
        self.from_base_coefficients(vec![*a])
    }

    /// Every element, lexicographic in (c_0, ..., c_{k-1}) with the last
    /// coefficient changing fastest.
    pub fn elements(self: &Arc<Self>) -> ExtElements {
        ExtElements {
            field: Arc::clone(self),
            digits: Some(vec![0; self.k]),
        }
    }

    /// Euler's criterion in F_{p^k}. Zero counts as a square.
    pub fn is_square(&self, z: &ExtFieldElement) -> bool {
        z.is_square()
    }

    /// Tonelli–Shanks square root, or `None` for a non-square.
    ///
    /// Of the two roots ±y the one with the lexicographically smaller
    /// coefficient vector is returned.
    pub fn sqrt(self: &Arc<Self>, z: &ExtFieldElement) -> Option<ExtFieldElement> {
        if z.is_zero() {
            return Some(z.clone());
        }
        if !self.is_square(z) {
            return None;
        }

        // q - 1 = t * 2^s with t odd
        let q_minus_1 = self.order() - 1u32;
        let s = q_minus_1.trailing_zeros().unwrap_or(0);
        let t = &q_minus_1 >> s;

        let non_residue = self.from_base_coefficients(self.non_residue.clone());

        let mut m = s;
        let mut c = non_residue.pow(&t);
        let mut big_t = z.pow(&t);
        let mut root = z.pow(&((&t + 1u32) >> 1));

        while !big_t.is_one() {
            // least i with T^(2^i) = 1
            let mut i = 0;
            let mut power = big_t.clone();
            while !power.is_one() {
                power = power.square();
                i += 1;
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = b.square();
            }
            m = i;
            c = b.square();
            big_t = big_t.mul(&c);
            root = root.mul(&b);
        }

        let neg = root.neg();
        Some(match neg.cmp_coefficients(&root) {
            Ordering::Less => neg,
            _ => root,
        })
    }

    /// Reduce a coefficient vector of any length modulo the monic f.
    fn reduce(&self, mut coeffs: Vec<FieldElement>) -> Vec<FieldElement> {
        let k = self.k;
        let f = self.modulus.coeffs();
        for i in (k..coeffs.len()).rev() {
            let lead = coeffs[i];
            if lead.is_zero() {
                continue;
            }
            for (j, fj) in f[..k].iter().enumerate() {
                coeffs[i - k + j] = coeffs[i - k + j].sub(&lead.mul(fj));
            }
        }
        coeffs.resize(k, self.base.zero());
        coeffs
    }
}

impl fmt::Display for ExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = self.characteristic();
        write!(f, "F_{}^{} = F_{}[x]/({})", p, self.k, p, self.modulus)
    }
}

/// Iterator returned by [`ExtensionField::elements`].
pub struct ExtElements {
    field: Arc<ExtensionField>,
    digits: Option<Vec<u64>>,
}

impl Iterator for ExtElements {
    type Item = ExtFieldElement;

    fn next(&mut self) -> Option<ExtFieldElement> {
        let digits = self.digits.as_mut()?;
        let coeffs = digits
            .iter()
            .map(|&c| self.field.base.element(c as i64))
            .collect();
        let item = ExtFieldElement {
            coeffs,
            field: Arc::clone(&self.field),
        };
        if !advance(digits.iter_mut().rev(), self.field.characteristic()) {
            self.digits = None;
        }
        Some(item)
    }
}

/// Element of F_{p^k}: k coefficients over F_p, lowest degree first.
#[derive(Clone, Debug)]
pub struct ExtFieldElement {
    coeffs: Vec<FieldElement>,
    field: Arc<ExtensionField>,
}

impl ExtFieldElement {
    pub fn field(&self) -> &Arc<ExtensionField> {
        &self.field
    }

    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coeffs
    }

    /// Euler's criterion: z^((q-1)/2) = 1. Zero counts as a square.
    pub fn is_square(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        let half = (self.field.order() - 1u32) >> 1;
        self.pow(&half).is_one()
    }

    /// True when every coefficient above the constant term is zero.
    pub fn is_in_base_field(&self) -> bool {
        self.coeffs[1..].iter().all(|c| c.is_zero())
    }

    /// Lexicographic comparison of (c_0, c_1, ...).
    pub fn cmp_coefficients(&self, other: &Self) -> Ordering {
        self.check_field(other, "compare");
        let key = |e: &Self| e.coeffs.iter().map(|c| c.value()).collect::<Vec<_>>();
        key(self).cmp(&key(other))
    }

    fn check_field(&self, other: &Self, op: &str) {
        if !Arc::ptr_eq(&self.field, &other.field) && self.field != other.field {
            panic!(
                "Cannot {} elements from different extension fields ({} and {})",
                op, self.field, other.field
            );
        }
    }

    fn with_coeffs(&self, coeffs: Vec<FieldElement>) -> Self {
        ExtFieldElement {
            coeffs,
            field: Arc::clone(&self.field),
        }
    }

    fn to_polynomial(&self) -> Polynomial<FieldElement> {
        Polynomial::new(self.coeffs.clone())
    }
}

impl PartialEq for ExtFieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.check_field(other, "compare");
        self.coeffs == other.coeffs
    }
}

impl Eq for ExtFieldElement {}

impl Field for ExtFieldElement {
    fn add(&self, other: &Self) -> Self {
        self.check_field(other, "add");
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(a, b)| a.add(b))
            .collect();
        self.with_coeffs(coeffs)
    }

    fn neg(&self) -> Self {
        self.with_coeffs(self.coeffs.iter().map(|c| c.neg()).collect())
    }

    fn mul(&self, other: &Self) -> Self {
        self.check_field(other, "multiply");
        let k = self.coeffs.len();
        let zero = self.field.base.zero();
        let mut product = vec![zero; 2 * k - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                product[i + j] = product[i + j].add(&a.mul(b));
            }
        }
        self.with_coeffs(self.field.reduce(product))
    }

    /// Extended Euclid against f: a*s + f*t = g with g a nonzero constant.
    fn inv(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(BlsError::arithmetic("non-invertible element"));
        }
        let (g, s) = poly_extended_gcd(&self.to_polynomial(), self.field.modulus())?;
        let g0 = match (g.degree(), g.coeff(0)) {
            (Some(0), Some(g0)) => *g0,
            _ => {
                return Err(BlsError::arithmetic(format!(
                    "{} is not invertible modulo {}",
                    self, self.field.modulus
                )))
            }
        };
        let inverse = s.scale(&g0.inv()?);
        Ok(self.field.from_base_coefficients(inverse.coeffs().to_vec()))
    }

    fn zero_like(&self) -> Self {
        self.field.zero()
    }

    fn one_like(&self) -> Self {
        self.field.one()
    }

    fn from_integer_like(&self, n: i64) -> Self {
        self.field.element(&[n])
    }

    fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    fn order(&self) -> BigUint {
        self.field.order()
    }
}

impl_field_ops!(ExtFieldElement);

/// Extended Euclidean Algorithm for polynomials.
/// Returns (gcd, s) such that a*s ≡ gcd (mod b).
fn poly_extended_gcd<F: Field>(
    a: &Polynomial<F>,
    b: &Polynomial<F>,
) -> Result<(Polynomial<F>, Polynomial<F>)> {
    let Some(one) = a.leading_coefficient().map(|c| c.one_like()) else {
        return Ok((b.clone(), Polynomial::zero()));
    };

    let mut old_r = a.clone();
    let mut r = b.clone();
    let mut old_s = Polynomial::constant(one);
    let mut s = Polynomial::zero();

    while !r.is_zero() {
        let (quotient, remainder) = old_r.div_rem(&r)?;
        old_r = std::mem::replace(&mut r, remainder);
        let next_s = &old_s - &(&quotient * &s);
        old_s = std::mem::replace(&mut s, next_s);
    }

    Ok((old_r, old_s))
}

/// `47 + 56i`, `8i`, `1 + 21i + 20i^2`, `0`.
impl fmt::Display for ExtFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut terms = Vec::new();
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let coeff = if c.is_one() && i > 0 {
                String::new()
            } else {
                c.to_string()
            };
            terms.push(match i {
                0 => coeff,
                1 => format!("{}i", coeff),
                _ => format!("{}i^{}", coeff, i),
            });
        }
        if terms.is_empty() {
            return write!(f, "0");
        }
        write!(f, "{}", terms.join(" + "))
    }
}
