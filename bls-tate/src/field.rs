use num_bigint::BigUint;
use std::fmt;

use crate::config::SchemeConfig;
use crate::error::{BlsError, Result};
use crate::number_theory;

/// Arithmetic shared by F_p and F_p^k.
///
/// Elements carry their own context (modulus or extension field), so the
/// identities are produced from an existing element rather than from nothing.
pub trait Field: Sized + Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Addition
    fn add(&self, other: &Self) -> Self;

    /// Negation
    fn neg(&self) -> Self;

    /// Subtraction (a - b = a + (-b))
    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplication
    fn mul(&self, other: &Self) -> Self;

    /// Multiplicative inverse. Zero is not invertible.
    fn inv(&self) -> Result<Self>;

    /// Division (a / b = a * b^(-1))
    fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.mul(&other.inv()?))
    }

    fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation by square-and-multiply.
    /// Complexity: O(log(exp)) multiplications
    fn pow(&self, exp: &BigUint) -> Self {
        let mut result = self.one_like();
        let mut base = self.clone();
        for i in 0..exp.bits() {
            if exp.bit(i) {
                result = result.mul(&base);
            }
            base = base.square();
        }
        result
    }

    /// Additive identity in the same field as `self`.
    fn zero_like(&self) -> Self;

    /// Multiplicative identity in the same field as `self`.
    fn one_like(&self) -> Self;

    /// The integer `n` reduced into the same field as `self`.
    fn from_integer_like(&self, n: i64) -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool {
        *self == self.one_like()
    }

    /// Number of elements of the field.
    fn order(&self) -> BigUint;
}

/// Implements the std operators on owned values and references by delegating
/// to [`Field`].
macro_rules! impl_field_ops {
    ($t:ty) => {
        impl std::ops::Add for &$t {
            type Output = $t;
            fn add(self, other: &$t) -> $t {
                $crate::field::Field::add(self, other)
            }
        }

        impl std::ops::Add for $t {
            type Output = $t;
            fn add(self, other: $t) -> $t {
                $crate::field::Field::add(&self, &other)
            }
        }

        impl std::ops::Sub for &$t {
            type Output = $t;
            fn sub(self, other: &$t) -> $t {
                $crate::field::Field::sub(self, other)
            }
        }

        impl std::ops::Sub for $t {
            type Output = $t;
            fn sub(self, other: $t) -> $t {
                $crate::field::Field::sub(&self, &other)
            }
        }

        impl std::ops::Mul for &$t {
            type Output = $t;
            fn mul(self, other: &$t) -> $t {
                $crate::field::Field::mul(self, other)
            }
        }

        impl std::ops::Mul for $t {
            type Output = $t;
            fn mul(self, other: $t) -> $t {
                $crate::field::Field::mul(&self, &other)
            }
        }

        impl std::ops::Neg for &$t {
            type Output = $t;
            fn neg(self) -> $t {
                $crate::field::Field::neg(self)
            }
        }

        impl std::ops::Neg for $t {
            type Output = $t;
            fn neg(self) -> $t {
                $crate::field::Field::neg(&self)
            }
        }
    };
}

pub(crate) use impl_field_ops;

/// The prime field F_p, restricted to p ≡ 3 (mod 4) so that square roots have
/// the closed form z^((p+1)/4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeField {
    p: u64,
}

impl PrimeField {
    /// Validate `p` against the default limits.
    pub fn new(p: u64) -> Result<Self> {
        Self::with_config(p, &SchemeConfig::default())
    }

    pub fn with_config(p: u64, config: &SchemeConfig) -> Result<Self> {
        // size first: trial division is O(sqrt(p))
        if p > config.max_prime {
            return Err(BlsError::validation(format!(
                "p = {} exceeds the supported maximum {}",
                p, config.max_prime
            )));
        }
        if !number_theory::is_prime(p) {
            return Err(BlsError::validation(format!("p = {} is not prime", p)));
        }
        if p % 4 != 3 {
            return Err(BlsError::validation(format!(
                "p = {} is not congruent to 3 mod 4",
                p
            )));
        }
        Ok(PrimeField { p })
    }

    pub fn characteristic(&self) -> u64 {
        self.p
    }

    /// Reduce any integer, negative included, into F_p.
    pub fn element(&self, n: i64) -> FieldElement {
        FieldElement::new(n, self.p)
    }

    pub fn zero(&self) -> FieldElement {
        self.element(0)
    }

    pub fn one(&self) -> FieldElement {
        self.element(1)
    }

    /// All elements 0, 1, ..., p-1 in order.
    pub fn elements(&self) -> impl Iterator<Item = FieldElement> {
        let p = self.p;
        (0..p).map(move |v| FieldElement { value: v, modulus: p })
    }

    /// Euler's criterion. Zero counts as a residue.
    pub fn is_quadratic_residue(&self, z: &FieldElement) -> bool {
        z.is_square()
    }

    /// The smaller square root of `z`, or `None` for a non-residue.
    pub fn sqrt(&self, z: &FieldElement) -> Option<FieldElement> {
        z.sqrt()
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "F_{}", self.p)
    }
}

/// Element of F_p, kept reduced into `[0, p)`.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement {
    value: u64,
    modulus: u64,
}

impl FieldElement {
    /// Reduce `value` modulo `modulus`.
    pub fn new(value: i64, modulus: u64) -> Self {
        let value = (value as i128).rem_euclid(modulus as i128) as u64;
        FieldElement { value, modulus }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Euler's criterion: z^((p-1)/2) = 1. Zero counts as a square.
    pub fn is_square(&self) -> bool {
        self.is_zero() || self.pow(&BigUint::from((self.modulus - 1) / 2)).is_one()
    }

    /// The smaller of the two roots z^((p+1)/4) and its negation.
    ///
    /// Only valid for p ≡ 3 (mod 4), which [`PrimeField`] guarantees.
    pub fn sqrt(&self) -> Option<FieldElement> {
        if !self.is_square() {
            return None;
        }
        let y = self.pow(&BigUint::from((self.modulus + 1) / 4));
        let neg_y = y.neg();
        Some(if neg_y.value < y.value { neg_y } else { y })
    }

    fn check_modulus(&self, other: &Self, op: &str) {
        if self.modulus != other.modulus {
            panic!(
                "Cannot {} field elements with different moduli ({} and {})",
                op, self.modulus, other.modulus
            );
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.check_modulus(other, "compare");
        self.value == other.value
    }
}

impl Eq for FieldElement {}

impl Field for FieldElement {
    fn add(&self, other: &Self) -> Self {
        self.check_modulus(other, "add");
        let sum = (self.value as u128 + other.value as u128) % self.modulus as u128;
        FieldElement {
            value: sum as u64,
            modulus: self.modulus,
        }
    }

    fn neg(&self) -> Self {
        if self.value == 0 {
            return *self;
        }
        FieldElement {
            value: self.modulus - self.value,
            modulus: self.modulus,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        self.check_modulus(other, "multiply");
        let prod = (self.value as u128 * other.value as u128) % self.modulus as u128;
        FieldElement {
            value: prod as u64,
            modulus: self.modulus,
        }
    }

    fn inv(&self) -> Result<Self> {
        if self.value == 0 {
            return Err(BlsError::arithmetic("non-invertible element"));
        }
        let inv = number_theory::mod_inverse(self.value as i64, self.modulus as i64)?;
        Ok(FieldElement::new(inv, self.modulus))
    }

    fn zero_like(&self) -> Self {
        FieldElement {
            value: 0,
            modulus: self.modulus,
        }
    }

    fn one_like(&self) -> Self {
        FieldElement::new(1, self.modulus)
    }

    fn from_integer_like(&self, n: i64) -> Self {
        FieldElement::new(n, self.modulus)
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn order(&self) -> BigUint {
        BigUint::from(self.modulus)
    }
}

impl_field_ops!(FieldElement);

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_field_arithmetic() {
        // Work in F_7
        let f = PrimeField::new(7).unwrap();

        let a = f.element(3);
        let b = f.element(5);

        // 3 + 5 = 8 ≡ 1 (mod 7)
        assert_eq!((&a + &b).value(), 1);

        // 3 - 5 = -2 ≡ 5 (mod 7)
        assert_eq!((&a - &b).value(), 5);

        // 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((&a * &b).value(), 1);

        // 3^(-1) ≡ 5 (mod 7)
        assert_eq!(a.inv().unwrap().value(), 5);

        // 3 / 5 = 3 * 3 = 9 ≡ 2 (mod 7)
        assert_eq!(a.div(&b).unwrap().value(), 2);
    }

    #[test]
    fn test_negative_reduction() {
        let f = PrimeField::new(103).unwrap();
        assert_eq!(f.element(-1).value(), 102);
        assert_eq!(f.element(-206).value(), 0);
        assert_eq!(f.element(i64::MIN).value(), (i64::MIN as i128).rem_euclid(103) as u64);
    }

    #[test]
    fn test_exponentiation() {
        // Work in F_11
        let f = PrimeField::new(11).unwrap();
        let a = f.element(2);

        // 2^10 ≡ 1 (mod 11) by Fermat's Little Theorem
        assert!(a.pow(&BigUint::from(10u32)).is_one());

        // 2^5 = 32 ≡ 10 (mod 11)
        assert_eq!(a.pow(&BigUint::from(5u32)).value(), 10);

        assert!(a.pow(&BigUint::from(0u32)).is_one());
    }

    #[test]
    fn test_inverse_of_zero_fails() {
        let f = PrimeField::new(11).unwrap();
        assert!(matches!(f.zero().inv(), Err(BlsError::Arithmetic(_))));
        assert!(f.one().div(&f.zero()).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(PrimeField::new(103).is_ok());
        // not prime
        assert!(matches!(PrimeField::new(105), Err(BlsError::Validation(_))));
        // prime but 1 mod 4
        assert!(matches!(PrimeField::new(101), Err(BlsError::Validation(_))));
        assert!(PrimeField::new(2).is_err());
        let small = SchemeConfig {
            max_prime: 50,
            ..SchemeConfig::default()
        };
        assert!(PrimeField::with_config(103, &small).is_err());
        assert!(PrimeField::with_config(47, &small).is_ok());
        // the size limit is checked before trial division
        assert!(matches!(
            PrimeField::new(18446744073709551557),
            Err(BlsError::Validation(_))
        ));
    }

    #[test]
    fn test_sqrt_returns_smaller_root() {
        let f = PrimeField::new(103).unwrap();
        // 18^3 + 18 = 5850 ≡ 82, roots 44 and 59
        let z = f.element(18 * 18 * 18 + 18);
        let y = f.sqrt(&z).unwrap();
        assert_eq!(y.value(), 44);
        assert_eq!((y * y), z);

        assert_eq!(f.sqrt(&f.zero()).unwrap().value(), 0);
        // -1 is a non-residue when p ≡ 3 (mod 4)
        assert!(!f.is_quadratic_residue(&f.element(-1)));
        assert!(f.sqrt(&f.element(-1)).is_none());
    }

    #[test]
    fn test_residue_count() {
        let f = PrimeField::new(23).unwrap();
        let residues = f
            .elements()
            .filter(|z| !z.is_zero() && f.is_quadratic_residue(z))
            .count();
        assert_eq!(residues, 11);
    }

    #[test]
    #[should_panic(expected = "different moduli")]
    fn test_mixed_moduli_panics() {
        let a = FieldElement::new(1, 7);
        let b = FieldElement::new(1, 11);
        let _ = a + b;
    }

    fn any_element() -> impl Strategy<Value = FieldElement> {
        (0i64..103).prop_map(|v| FieldElement::new(v, 103))
    }

    proptest! {
        #[test]
        fn field_laws(a in any_element(), b in any_element(), c in any_element()) {
            prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
            prop_assert_eq!(&a + &b, &b + &a);
            prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
            prop_assert_eq!(&a * &b, &b * &a);
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
            prop_assert!((&a + &(-&a)).is_zero());
            if !a.is_zero() {
                prop_assert!((&a * &a.inv().unwrap()).is_one());
            }
        }

        #[test]
        fn sqrt_squares_back(a in any_element()) {
            let f = PrimeField::new(103).unwrap();
            let z = a * a;
            let y = f.sqrt(&z).unwrap();
            prop_assert_eq!(y * y, z);
            prop_assert!(y.value() <= 51);
        }
    }
}
