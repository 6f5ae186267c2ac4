use num_bigint::BigUint;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::{BlsError, Result};
use crate::field::{Field, FieldElement, PrimeField};
use crate::number_theory;

/// Polynomial with coefficients in a field F
/// Coefficients stored from lowest to highest degree: [a0, a1, a2, ...] = a0 + a1*x + a2*x^2 + ...
#[derive(Clone, Debug)]
pub struct Polynomial<F: Field> {
    coeffs: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    /// Create a new polynomial from coefficients, trimming trailing zeros.
    pub fn new(coeffs: Vec<F>) -> Self {
        let mut poly = Polynomial { coeffs };
        poly.normalize();
        poly
    }

    pub fn zero() -> Self {
        Polynomial { coeffs: vec![] }
    }

    /// Create polynomial from a single coefficient (constant)
    pub fn constant(coeff: F) -> Self {
        Polynomial::new(vec![coeff])
    }

    /// `coeff * x^degree`
    pub fn monomial(coeff: F, degree: usize) -> Self {
        let mut coeffs = vec![coeff.zero_like(); degree];
        coeffs.push(coeff);
        Polynomial::new(coeffs)
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Get coefficient at index (None past the degree)
    pub fn coeff(&self, index: usize) -> Option<&F> {
        self.coeffs.get(index)
    }

    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    pub fn leading_coefficient(&self) -> Option<&F> {
        self.coeffs.last()
    }

    pub fn is_monic(&self) -> bool {
        self.leading_coefficient().map_or(false, |c| c.is_one())
    }

    /// Remove leading zero coefficients
    fn normalize(&mut self) {
        while matches!(self.coeffs.last(), Some(c) if c.is_zero()) {
            self.coeffs.pop();
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let max_len = self.coeffs.len().max(other.coeffs.len());
        let mut result = Vec::with_capacity(max_len);

        for i in 0..max_len {
            let sum = match (self.coeffs.get(i), other.coeffs.get(i)) {
                (Some(a), Some(b)) => a.add(b),
                (Some(a), None) => a.clone(),
                (None, Some(b)) => b.clone(),
                (None, None) => break,
            };
            result.push(sum);
        }

        Polynomial::new(result)
    }

    pub fn neg(&self) -> Self {
        Polynomial::new(self.coeffs.iter().map(|c| c.neg()).collect())
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        let (Some(first), false) = (self.coeffs.first(), other.is_zero()) else {
            return Polynomial::zero();
        };

        let mut result = vec![first.zero_like(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                result[i + j] = result[i + j].add(&a.mul(b));
            }
        }

        Polynomial::new(result)
    }

    /// Multiply every coefficient by `scalar`.
    pub fn scale(&self, scalar: &F) -> Self {
        Polynomial::new(self.coeffs.iter().map(|c| c.mul(scalar)).collect())
    }

    /// Long division. Returns (quotient, remainder) such that
    /// self = quotient * divisor + remainder and deg(remainder) < deg(divisor).
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let (Some(divisor_degree), Some(divisor_lead)) =
            (divisor.degree(), divisor.leading_coefficient())
        else {
            return Err(BlsError::arithmetic("division by the zero polynomial"));
        };
        let divisor_lead_inv = divisor_lead.inv()?;

        let mut remainder = self.clone();
        let mut quotient = vec![divisor_lead.zero_like(); self.coeffs.len()];

        while let Some(rem_degree) = remainder.degree() {
            if rem_degree < divisor_degree {
                break;
            }
            let shift = rem_degree - divisor_degree;
            let coeff = remainder.coeffs[rem_degree].mul(&divisor_lead_inv);

            // Subtract coeff * x^shift * divisor from remainder
            for (i, d) in divisor.coeffs.iter().enumerate() {
                remainder.coeffs[i + shift] = remainder.coeffs[i + shift].sub(&d.mul(&coeff));
            }
            quotient[shift] = coeff;
            remainder.normalize();
        }

        Ok((Polynomial::new(quotient), remainder))
    }

    pub fn modulo(&self, divisor: &Self) -> Result<Self> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Evaluate at `x` by Horner's method.
    pub fn eval(&self, x: &F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(x.zero_like(), |acc, c| acc.mul(x).add(c))
    }

    /// Divide through by the leading coefficient. The zero polynomial stays zero.
    pub fn make_monic(&self) -> Result<Self> {
        match self.leading_coefficient() {
            None => Ok(self.clone()),
            Some(lead) => Ok(self.scale(&lead.inv()?)),
        }
    }

    /// Monic greatest common divisor.
    pub fn gcd(&self, other: &Self) -> Result<Self> {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.modulo(&b)?;
            a = b;
            b = r;
        }
        a.make_monic()
    }

    /// `self^exp mod modulus` by square-and-multiply.
    pub fn pow_mod(&self, exp: &BigUint, modulus: &Self) -> Result<Self> {
        let Some(lead) = modulus.leading_coefficient() else {
            return Err(BlsError::arithmetic("division by the zero polynomial"));
        };
        let mut result = Polynomial::constant(lead.one_like()).modulo(modulus)?;
        let mut base = self.modulo(modulus)?;
        for i in 0..exp.bits() {
            if exp.bit(i) {
                result = result.mul(&base).modulo(modulus)?;
            }
            base = base.mul(&base).modulo(modulus)?;
        }
        Ok(result)
    }
}

impl Polynomial<FieldElement> {
    /// Build from small integer coefficients, lowest degree first.
    pub fn from_coefficients(field: &PrimeField, coeffs: &[i64]) -> Self {
        Polynomial::new(coeffs.iter().map(|&c| field.element(c)).collect())
    }

    /// The polynomial `x` over the same field as `coeff`.
    fn x_like(coeff: &FieldElement) -> Self {
        Polynomial::monomial(coeff.one_like(), 1)
    }

    /// True if some `a` in F_p satisfies `f(a) = 0`.
    ///
    /// For degree 2 and 3 this is equivalent to reducibility.
    pub fn has_root_in_base_field(&self) -> bool {
        let Some(lead) = self.leading_coefficient() else {
            return true;
        };
        (0..lead.modulus()).any(|a| self.eval(&lead.from_integer_like(a as i64)).is_zero())
    }

    /// Rabin's irreducibility test.
    ///
    /// A polynomial f of degree k over F_p is irreducible iff
    /// gcd(x^(p^(k/q)) - x mod f, f) = 1 for every prime q | k, and
    /// x^(p^k) ≡ x (mod f).
    pub fn is_irreducible(&self) -> Result<bool> {
        let (Some(k), Some(lead)) = (self.degree(), self.leading_coefficient()) else {
            return Ok(false);
        };
        if k == 0 {
            return Ok(false);
        }
        let f = self.make_monic()?;
        let p = BigUint::from(lead.modulus());
        let x = Polynomial::x_like(lead);

        for q in number_theory::distinct_prime_factors(k as u64) {
            let exp = p.pow((k as u64 / q) as u32);
            let h = x.pow_mod(&exp, &f)?.sub(&x);
            if f.gcd(&h)?.degree() != Some(0) {
                return Ok(false);
            }
        }

        let frobenius = x.pow_mod(&p.pow(k as u32), &f)?;
        Ok(frobenius == x.modulo(&f)?)
    }
}

impl<F: Field> PartialEq for Polynomial<F> {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
    }
}

impl<F: Field> Eq for Polynomial<F> {}

impl<F: Field> Add for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, other: &Polynomial<F>) -> Polynomial<F> {
        Polynomial::add(self, other)
    }
}

impl<F: Field> Sub for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, other: &Polynomial<F>) -> Polynomial<F> {
        Polynomial::sub(self, other)
    }
}

impl<F: Field> Mul for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, other: &Polynomial<F>) -> Polynomial<F> {
        Polynomial::mul(self, other)
    }
}

/// Descending form: `x^2 + 1`, `x^3 + 2x + 5`.
impl<F: Field> fmt::Display for Polynomial<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut terms = Vec::new();
        for (i, coeff) in self.coeffs.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }
            let c = if coeff.is_one() && i > 0 {
                String::new()
            } else {
                coeff.to_string()
            };
            terms.push(match i {
                0 => c,
                1 => format!("{}x", c),
                _ => format!("{}x^{}", c, i),
            });
        }

        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(p: u64) -> PrimeField {
        PrimeField::new(p).unwrap()
    }

    #[test]
    fn test_polynomial_arithmetic() {
        // Work in F_7
        let field = f(7);

        // P(x) = 2 + 3x + x^2
        let p1 = Polynomial::from_coefficients(&field, &[2, 3, 1]);
        // Q(x) = 1 + x
        let p2 = Polynomial::from_coefficients(&field, &[1, 1]);

        let sum = &p1 + &p2;
        assert_eq!(sum, Polynomial::from_coefficients(&field, &[3, 4, 1]));

        // (2 + 3x + x^2)(1 + x) = 2 + 5x + 4x^2 + x^3
        let prod = &p1 * &p2;
        assert_eq!(prod, Polynomial::from_coefficients(&field, &[2, 5, 4, 1]));
        assert_eq!(prod.degree(), Some(3));

        // P(2) = 2 + 3*2 + 2^2 = 12 ≡ 5 (mod 7)
        assert_eq!(p1.eval(&field.element(2)).value(), 5);

        // x^2 - x^2 trims to zero
        assert!((&p1 - &p1).is_zero());
        assert_eq!(Polynomial::<FieldElement>::zero().degree(), None);
        assert!(Polynomial::constant(field.zero()).is_zero());
    }

    #[test]
    fn test_polynomial_division() {
        // Work in F_7
        let field = f(7);

        // Dividend: x^2 + 2x + 3
        let dividend = Polynomial::from_coefficients(&field, &[3, 2, 1]);
        // Divisor: x + 1
        let divisor = Polynomial::from_coefficients(&field, &[1, 1]);

        let (quotient, remainder) = dividend.div_rem(&divisor).unwrap();
        // x^2 + 2x + 3 = (x + 1)(x + 1) + 2
        assert_eq!(quotient, Polynomial::from_coefficients(&field, &[1, 1]));
        assert_eq!(remainder, Polynomial::from_coefficients(&field, &[2]));

        let reconstructed = &(&quotient * &divisor) + &remainder;
        assert_eq!(dividend, reconstructed);

        // Lower degree dividend is its own remainder
        let (q, r) = divisor.div_rem(&dividend).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, divisor);
    }

    #[test]
    fn test_division_by_zero_polynomial() {
        let field = f(7);
        let p = Polynomial::from_coefficients(&field, &[1, 1]);
        let err = p.div_rem(&Polynomial::zero()).unwrap_err();
        assert!(matches!(err, BlsError::Arithmetic(_)));
    }

    #[test]
    fn test_gcd_and_monic() {
        let field = f(7);
        // (x + 1)(x + 2) and (x + 1)(x + 3)
        let a = Polynomial::from_coefficients(&field, &[2, 3, 1]);
        let b = Polynomial::from_coefficients(&field, &[3, 4, 1]);
        assert_eq!(a.gcd(&b).unwrap(), Polynomial::from_coefficients(&field, &[1, 1]));

        let two_x = Polynomial::from_coefficients(&field, &[0, 2]);
        let monic = two_x.make_monic().unwrap();
        assert!(monic.is_monic());
        assert_eq!(monic, Polynomial::from_coefficients(&field, &[0, 1]));
    }

    #[test]
    fn test_pow_mod() {
        let field = f(103);
        let modulus = Polynomial::from_coefficients(&field, &[1, 0, 1]);
        let x = Polynomial::from_coefficients(&field, &[0, 1]);
        // x^2 ≡ -1 (mod x^2 + 1)
        let sq = x.pow_mod(&BigUint::from(2u32), &modulus).unwrap();
        assert_eq!(sq, Polynomial::from_coefficients(&field, &[-1]));
        // x^p ≡ -x for p ≡ 3 (mod 4)
        let frob = x.pow_mod(&BigUint::from(103u32), &modulus).unwrap();
        assert_eq!(frob, Polynomial::from_coefficients(&field, &[0, -1]));
    }

    #[test]
    fn test_irreducibility() {
        let field = f(103);
        let x2_plus_1 = Polynomial::from_coefficients(&field, &[1, 0, 1]);
        assert!(x2_plus_1.is_irreducible().unwrap());
        assert!(!x2_plus_1.has_root_in_base_field());

        // x^2 - 1 = (x - 1)(x + 1)
        let x2_minus_1 = Polynomial::from_coefficients(&field, &[-1, 0, 1]);
        assert!(!x2_minus_1.is_irreducible().unwrap());
        assert!(x2_minus_1.has_root_in_base_field());

        // Over F_23, x^3 + x + 3 has no root
        let field23 = f(23);
        let cubic = Polynomial::from_coefficients(&field23, &[3, 1, 0, 1]);
        assert!(cubic.is_irreducible().unwrap());
        assert!(!cubic.has_root_in_base_field());

        // Degree 4 with no roots but reducible: (x^2 + 1)^2 over F_7
        let field7 = f(7);
        let q = Polynomial::from_coefficients(&field7, &[1, 0, 1]);
        let quartic = &q * &q;
        assert!(!quartic.has_root_in_base_field());
        assert!(!quartic.is_irreducible().unwrap());

        // Linear polynomials are irreducible, constants are not
        assert!(Polynomial::from_coefficients(&field7, &[3, 1]).is_irreducible().unwrap());
        assert!(!Polynomial::from_coefficients(&field7, &[3]).is_irreducible().unwrap());
    }

    #[test]
    fn test_display() {
        let field = f(103);
        assert_eq!(Polynomial::from_coefficients(&field, &[1, 0, 1]).to_string(), "x^2 + 1");
        assert_eq!(
            Polynomial::from_coefficients(&field, &[5, 2, 0, 1]).to_string(),
            "x^3 + 2x + 5"
        );
        assert_eq!(Polynomial::from_coefficients(&field, &[0, 1]).to_string(), "x");
        assert_eq!(Polynomial::from_coefficients(&field, &[1]).to_string(), "1");
        assert_eq!(Polynomial::<FieldElement>::zero().to_string(), "0");
    }
}
