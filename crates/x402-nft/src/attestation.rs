//! Payer extraction from the forwarded x402 payment header.
//!
//! The external payment gate verifies and settles the payment before the
//! request reaches this process; the header is decoded here only to learn who
//! paid. Decoding fails closed: any malformed header yields "payer absent",
//! which callers map to a payment-required rejection. A malformed attestation
//! must never be treated as "payer unknown but proceed anyway".

use alloy::primitives::Address;
use base64::Engine;
use serde::Deserialize;

/// Request header carrying the base64-encoded payment attestation.
pub const PAYMENT_HEADER: &str = "x-payment";

#[derive(Debug, Deserialize)]
struct AttestationHeader {
    #[serde(default)]
    payload: Option<AttestationPayload>,
}

#[derive(Debug, Deserialize)]
struct AttestationPayload {
    #[serde(default)]
    authorization: Option<Authorization>,
}

#[derive(Debug, Deserialize)]
struct Authorization {
    #[serde(default)]
    from: Option<Address>,
}

/// Extract the payer address from a raw `x-payment` header value.
///
/// Returns `None` when the header is absent, not valid base64, not valid
/// JSON, missing any of the `payload.authorization.from` keys, or when `from`
/// is not a well-formed address. Never returns an error and never panics.
pub fn decode_payer(raw: Option<&str>) -> Option<Address> {
    let raw = raw?;

    let bytes = match base64::engine::general_purpose::STANDARD.decode(raw) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "payment header is not valid base64");
            return None;
        }
    };

    let header: AttestationHeader = match serde_json::from_slice(&bytes) {
        Ok(header) => header,
        Err(e) => {
            tracing::warn!(error = %e, "payment header is not a valid attestation");
            return None;
        }
    };

    header.payload?.authorization?.from
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &serde_json::Value) -> String {
        base64::engine::general_purpose::STANDARD.encode(value.to_string())
    }

    #[test]
    fn test_absent_header_is_absent_payer() {
        assert_eq!(decode_payer(None), None);
    }

    #[test]
    fn test_invalid_base64_fails_closed() {
        assert_eq!(decode_payer(Some("not-valid-base64!!!")), None);
    }

    #[test]
    fn test_invalid_json_fails_closed() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"this is not json");
        assert_eq!(decode_payer(Some(encoded.as_str())), None);
    }

    #[test]
    fn test_invalid_utf8_fails_closed() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0xff, 0xfe, 0x80]);
        assert_eq!(decode_payer(Some(encoded.as_str())), None);
    }

    #[test]
    fn test_missing_payload_is_absent() {
        let encoded = encode(&serde_json::json!({ "x402Version": 1 }));
        assert_eq!(decode_payer(Some(&encoded)), None);
    }

    #[test]
    fn test_missing_authorization_is_absent() {
        let encoded = encode(&serde_json::json!({ "payload": { "signature": "0xdead" } }));
        assert_eq!(decode_payer(Some(&encoded)), None);
    }

    #[test]
    fn test_missing_from_is_absent() {
        let encoded = encode(&serde_json::json!({
            "payload": { "authorization": { "to": "0x1111111111111111111111111111111111111111" } }
        }));
        assert_eq!(decode_payer(Some(&encoded)), None);
    }

    #[test]
    fn test_malformed_address_fails_closed() {
        let encoded = encode(&serde_json::json!({
            "payload": { "authorization": { "from": "0x1234" } }
        }));
        assert_eq!(decode_payer(Some(&encoded)), None);
    }

    #[test]
    fn test_non_object_payload_fails_closed() {
        let encoded = encode(&serde_json::json!({ "payload": "surprise" }));
        assert_eq!(decode_payer(Some(&encoded)), None);
    }

    #[test]
    fn test_valid_attestation_yields_payer() {
        let payer: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse()
            .unwrap();
        let encoded = encode(&serde_json::json!({
            "x402Version": 1,
            "payload": {
                "authorization": {
                    "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                    "to": "0x1111111111111111111111111111111111111111",
                    "value": "500000"
                },
                "signature": "0xdead"
            }
        }));
        assert_eq!(decode_payer(Some(&encoded)), Some(payer));
    }

    #[test]
    fn test_address_case_variants_decode_to_same_payer() {
        let lower = encode(&serde_json::json!({
            "payload": { "authorization": { "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266" } }
        }));
        let checksummed = encode(&serde_json::json!({
            "payload": { "authorization": { "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266" } }
        }));
        let a = decode_payer(Some(&lower)).unwrap();
        let b = decode_payer(Some(&checksummed)).unwrap();
        assert_eq!(a, b);
    }
}
