//! Request and response types for running the pipeline from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bls::{self, Transcript};
use crate::config::SchemeConfig;
use crate::elliptic_curve::EllipticCurvePoint;
use crate::error::{BlsError, ErrorKind};
use crate::field::Field;

/// Curve parameters, private key and message for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlsRequest {
    /// Field characteristic; must be prime and ≡ 3 (mod 4).
    pub p: u64,
    #[serde(rename = "A")]
    pub a: i64,
    #[serde(rename = "B")]
    pub b: i64,
    pub private_key: i64,
    pub message: String,
}

impl BlsRequest {
    /// p = 103, y^2 = x^3 + x, a = 7, message "שלום".
    pub fn reference() -> Self {
        BlsRequest {
            p: 103,
            a: 1,
            b: 0,
            private_key: 7,
            message: "שלום".to_string(),
        }
    }
}

/// Point coordinates as display strings; the identity is `("O", "O")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResponse {
    pub x: String,
    pub y: String,
}

impl<F: Field> From<&EllipticCurvePoint<F>> for PointResponse {
    fn from(point: &EllipticCurvePoint<F>) -> Self {
        match point {
            EllipticCurvePoint::Infinity => PointResponse {
                x: "O".to_string(),
                y: "O".to_string(),
            },
            EllipticCurvePoint::Point { x, y } => PointResponse {
                x: x.to_string(),
                y: y.to_string(),
            },
        }
    }
}

/// Every intermediate value of a run, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlsResponse {
    pub group_order: u64,
    pub r: u64,
    pub cofactor: u64,
    pub embedding_degree: u32,
    pub irreducible_poly: String,
    pub hash_point: PointResponse,
    pub signature: PointResponse,
    #[serde(rename = "Q")]
    pub q: PointResponse,
    pub public_key: PointResponse,
    pub pairing_lhs: String,
    pub pairing_rhs: String,
    pub verified: bool,
    pub display_message: String,
}

impl From<&Transcript> for BlsResponse {
    fn from(t: &Transcript) -> Self {
        BlsResponse {
            group_order: t.group_order,
            r: t.r,
            cofactor: t.cofactor,
            embedding_degree: t.embedding_degree,
            irreducible_poly: t.irreducible_poly.to_string(),
            hash_point: (&t.hash_point).into(),
            signature: (&t.signature).into(),
            q: (&t.q).into(),
            public_key: (&t.public_key).into(),
            pairing_lhs: t.lhs.to_string(),
            pairing_rhs: t.rhs.to_string(),
            verified: t.verified,
            display_message: t.summary.clone(),
        }
    }
}

/// Error as reported across the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    /// HTTP-style status for a transport layer: 400, 501 or 500.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::InvalidParameters => 400,
            ErrorKind::NotImplemented => 501,
            ErrorKind::Internal => 500,
        }
    }
}

impl From<BlsError> for ServiceError {
    fn from(err: BlsError) -> Self {
        ServiceError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        BlsError::validation(format!("request: {}", err)).into()
    }
}

/// Run the pipeline for `request` with default limits.
pub fn run(request: &BlsRequest) -> Result<BlsResponse, ServiceError> {
    run_with(request, &SchemeConfig::default())
}

pub fn run_with(request: &BlsRequest, config: &SchemeConfig) -> Result<BlsResponse, ServiceError> {
    let transcript = bls::run_with(
        request.p,
        request.a,
        request.b,
        request.private_key,
        &request.message,
        config,
    )?;
    Ok(BlsResponse::from(&transcript))
}

/// Parse a JSON request, run it, and serialize the response.
pub fn handle_json(body: &str, config: &SchemeConfig) -> Result<String, ServiceError> {
    let request: BlsRequest = serde_json::from_str(body)?;
    let response = run_with(&request, config)?;
    serde_json::to_string_pretty(&response)
        .map_err(|e| BlsError::internal(format!("response: {}", e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let request: BlsRequest = serde_json::from_str(
            r#"{"p": 103, "A": 1, "B": 0, "private_key": 7, "message": "hi"}"#,
        )
        .unwrap();
        assert_eq!(request.a, 1);
        assert_eq!(request.b, 0);
        assert_eq!(request.message, "hi");
    }

    #[test]
    fn test_identity_point_response() {
        let point: EllipticCurvePoint<crate::field::FieldElement> = EllipticCurvePoint::Infinity;
        let response = PointResponse::from(&point);
        assert_eq!(response.x, "O");
        assert_eq!(response.y, "O");
    }

    #[test]
    fn test_status_codes() {
        let invalid: ServiceError = BlsError::validation("p").into();
        assert_eq!(invalid.status_code(), 400);
        let missing: ServiceError = BlsError::NotImplemented("batch verification").into();
        assert_eq!(missing.status_code(), 501);
        let internal: ServiceError = BlsError::internal("cofactor").into();
        assert_eq!(internal.status_code(), 500);
    }

    #[test]
    fn test_malformed_json_is_invalid_parameters() {
        let err = handle_json("{\"p\": 103}", &SchemeConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameters);
    }

    #[test]
    fn test_error_serializes_kind() {
        let err: ServiceError = BlsError::validation("p = 101 is not congruent to 3 mod 4").into();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"invalid_parameters\""));
    }
}
