//! # bls-tate - BLS signatures over the reduced Tate pairing
//!
//! A small, fully transparent implementation of the Boneh-Lynn-Shacham
//! signature scheme on toy-sized curves y^2 = x^3 + Ax + B over F_p with
//! p ≡ 3 (mod 4). Every intermediate value (group order, subgroup order r,
//! embedding degree, irreducible polynomial, Q, both pairing values) is
//! exposed so the whole computation can be followed by hand.
//!
//! ## Features
//!
//! - **Prime Fields (𝔽_p)**: modular arithmetic and canonical square roots
//! - **Extension Fields (𝔽_p^k)**: F_p[x]/(f) with a searched irreducible f
//! - **Elliptic Curves**: one affine group law over any [`Field`]
//! - **Hash to Point**: try-and-increment plus cofactor clearing
//! - **Tate Pairing**: Miller's algorithm with the final exponentiation
//! - **Service Layer**: JSON request/response types with error classification
//!
//! ## Quick Start
//!
//! ```rust
//! use bls_tate::BlsParams;
//!
//! let params = BlsParams::setup(103, 1, 0).unwrap();
//! assert_eq!(params.r(), 13);
//! assert_eq!(params.embedding_degree(), 2);
//!
//! let signed = params.sign(7, "שלום").unwrap();
//! let check = params.verify(&signed.signature, &signed.hash_point, 7).unwrap();
//! assert!(check.verified);
//! ```
//!
//! ## Module Overview
//!
//! - [`number_theory`] - gcd, modular inverse, primality, factorization
//! - [`field`] - the [`Field`] trait and prime field arithmetic (𝔽_p)
//! - [`polynomial`] - polynomials over a field, irreducibility testing
//! - [`extension_field`] - embedding degree and extension fields (𝔽_p^k)
//! - [`elliptic_curve`] - curves, points, group order over 𝔽_p
//! - [`ext_curve`] - the curve over 𝔽_p^k and the search for Q
//! - [`hash_to_point`] - messages to points of order r
//! - [`pairing`] - the reduced Tate pairing
//! - [`bls`] - setup, signing and verification
//! - [`service`] - JSON boundary for the whole pipeline
//! - [`config`] - search limits
//! - [`error`] - error type and classification

// Public modules
pub mod number_theory;
pub mod field;
pub mod polynomial;
pub mod extension_field;
pub mod elliptic_curve;
pub mod ext_curve;
pub mod hash_to_point;
pub mod pairing;
pub mod bls;
pub mod service;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use bls::{BlsParams, G1Point, Signed, Transcript, Verification};
pub use config::SchemeConfig;
pub use elliptic_curve::{EllipticCurve, EllipticCurvePoint, GroupOrder};
pub use error::{BlsError, ErrorKind, Result};
pub use ext_curve::{ExtCurve, ExtCurvePoint};
pub use extension_field::{ExtFieldElement, ExtensionField};
pub use field::{Field, FieldElement, PrimeField};
pub use pairing::TatePairing;
pub use polynomial::Polynomial;
pub use service::{BlsRequest, BlsResponse, PointResponse, ServiceError};
