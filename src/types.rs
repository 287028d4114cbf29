//! Request and response types for the PortOne REST API.
//!
//! Every response shares the same envelope, `{code, message, response}`, modelled
//! by [`Envelope`]. The payload types mirror the remote JSON contract field by field.

use crate::errors::{PortoneError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `{code, message, response}` wrapper returned by every endpoint.
///
/// `response` is `null` when the gateway reports an error, so it is optional here.
///
/// # Examples
///
/// ```
/// use portone::types::{Envelope, PaymentIntent};
///
/// let envelope: Envelope<PaymentIntent> = serde_json::from_str(
///     r#"{"code":0,"message":"success","response":{"merchant_uid":"m-1","amount":1000}}"#,
/// ).unwrap();
///
/// assert!(envelope.is_success());
/// assert_eq!(envelope.into_response().unwrap().amount, 1000);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    /// Numeric status code; `0` means success
    pub code: i64,

    /// Human-readable status message
    #[serde(default)]
    pub message: Option<String>,

    /// Endpoint-specific payload
    pub response: Option<T>,
}

impl<T> Envelope<T> {
    /// Returns true when the gateway reported success (`code == 0`).
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Converts the envelope into its payload, treating a non-zero code or a
    /// missing payload as an error.
    pub fn into_response(self) -> Result<T> {
        match self.response {
            Some(response) if self.code == 0 => Ok(response),
            _ => Err(PortoneError::Api {
                code: self.code,
                message: self.message.unwrap_or_default(),
            }),
        }
    }
}

/// Request for `POST /users/getToken`.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct GetTokenRequest {
    /// REST API key
    #[serde(rename = "imp_key")]
    pub api_key: String,

    /// REST API secret
    #[serde(rename = "imp_secret")]
    pub api_secret: String,
}

impl std::fmt::Debug for GetTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetTokenRequest")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Payload of `POST /users/getToken`.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessToken {
    /// Opaque token sent verbatim in the `Authorization` header
    pub access_token: String,

    /// Issue time, Unix seconds
    pub now: i64,

    /// Expiry time, Unix seconds
    pub expired_at: i64,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("now", &self.now)
            .field("expired_at", &self.expired_at)
            .finish()
    }
}

/// Request for `POST /payments/prepare`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatePaymentIntentRequest {
    /// Merchant-assigned order identifier
    pub merchant_uid: String,

    /// Amount the payment must match
    pub amount: i64,
}

/// Payload of `POST /payments/prepare`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    /// Merchant-assigned order identifier
    pub merchant_uid: String,

    /// Registered amount
    pub amount: i64,
}

/// Decodes an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single cancellation recorded against a payment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PaymentCancelHistory {
    /// PG transaction id of the cancellation
    pub pg_tid: Option<String>,

    /// Cancelled amount
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,

    /// Cancellation time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub cancelled_at: i64,

    /// Cancellation reason
    pub reason: Option<String>,

    /// Receipt URL for the cancellation
    pub receipt_url: Option<String>,
}

/// Payload of `GET /payments/{imp_uid}`.
///
/// Fields the gateway leaves out or sends as `null` decode to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Payment {
    /// Gateway-assigned payment identifier
    #[serde(deserialize_with = "null_as_default")]
    pub imp_uid: String,
    /// Merchant-assigned order identifier
    #[serde(deserialize_with = "null_as_default")]
    pub merchant_uid: String,
    /// Payment method (`card`, `trans`, `vbank`, ...)
    pub pay_method: Option<String>,
    /// Channel the payment was made through (`pc`, `mobile`, `api`)
    pub channel: Option<String>,
    /// PG provider
    pub pg_provider: Option<String>,
    /// Embedded PG provider (e.g. a simple-pay inside a PG)
    pub emb_pg_provider: Option<String>,
    /// PG transaction id
    pub pg_tid: Option<String>,
    /// PG merchant id
    pub pg_id: Option<String>,
    /// Whether escrow was applied
    #[serde(deserialize_with = "null_as_default")]
    pub escrow: bool,
    /// Card approval number
    pub apply_num: Option<String>,
    /// Bank code
    pub bank_code: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
    /// Card issuer code
    pub card_code: Option<String>,
    /// Card issuer name
    pub card_name: Option<String>,
    /// Installment months, `0` for lump sum
    #[serde(deserialize_with = "null_as_default")]
    pub card_quota: i64,
    /// Masked card number
    pub card_number: Option<String>,
    /// Card type, `0` credit and `1` check
    pub card_type: Option<i64>,
    /// Virtual account bank code
    pub vbank_code: Option<String>,
    /// Virtual account bank name
    pub vbank_name: Option<String>,
    /// Virtual account number
    pub vbank_num: Option<String>,
    /// Virtual account holder
    pub vbank_holder: Option<String>,
    /// Virtual account deposit deadline, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub vbank_date: i64,
    /// Virtual account issue time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub vbank_issued_at: i64,
    /// Order name
    pub name: Option<String>,
    /// Paid amount
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    /// Cumulative cancelled amount
    #[serde(deserialize_with = "null_as_default")]
    pub cancel_amount: i64,
    /// Currency code
    pub currency: Option<String>,
    /// Buyer name
    pub buyer_name: Option<String>,
    /// Buyer email
    pub buyer_email: Option<String>,
    /// Buyer phone number
    pub buyer_tel: Option<String>,
    /// Buyer address
    pub buyer_addr: Option<String>,
    /// Buyer postcode
    pub buyer_postcode: Option<String>,
    /// Merchant data attached at checkout
    pub custom_data: Option<Value>,
    /// User agent of the paying client
    pub user_agent: Option<String>,
    /// Payment status (`ready`, `paid`, `cancelled`, `failed`)
    pub status: Option<String>,
    /// Request time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub started_at: i64,
    /// Payment time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub paid_at: i64,
    /// Failure time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub failed_at: i64,
    /// Cancellation time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub cancelled_at: i64,
    /// Failure reason
    pub fail_reason: Option<String>,
    /// Cancellation reason
    pub cancel_reason: Option<String>,
    /// Sales receipt URL
    pub receipt_url: Option<String>,
    /// Cancellations applied to this payment
    #[serde(deserialize_with = "null_as_default")]
    pub cancel_history: Vec<PaymentCancelHistory>,
    /// Receipt URLs for cancellations
    #[serde(deserialize_with = "null_as_default")]
    pub cancel_receipt_urls: Vec<String>,
    /// Whether a cash receipt was issued
    #[serde(deserialize_with = "null_as_default")]
    pub cash_receipt_issued: bool,
    /// Billing key owner, for recurring payments
    pub customer_uid: Option<String>,
    /// How the billing key was used (`issue`, `payment`, `payment.scheduled`)
    pub customer_uid_usage: Option<String>,
}

impl Payment {
    /// Returns true once the payment has been captured.
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_token_request_wire_names() {
        let req = GetTokenRequest {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"imp_key": "key", "imp_secret": "secret"}));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let req = GetTokenRequest {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };
        assert!(!format!("{:?}", req).contains("\"secret\""));

        let token = AccessToken {
            access_token: "tok_123".to_string(),
            now: 1,
            expired_at: 2,
        };
        assert!(!format!("{:?}", token).contains("tok_123"));
    }

    #[test]
    fn test_error_envelope_with_null_response() {
        let envelope: Envelope<AccessToken> = serde_json::from_value(json!({
            "code": -1,
            "message": "Unauthorized",
            "response": null
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert!(envelope.response.is_none());

        let err = envelope.into_response().unwrap_err();
        assert!(matches!(
            err,
            PortoneError::Api { code: -1, ref message } if message == "Unauthorized"
        ));
    }

    #[test]
    fn test_success_code_without_payload_is_an_error() {
        let envelope: Envelope<PaymentIntent> =
            serde_json::from_value(json!({"code": 0, "message": null})).unwrap();

        assert!(matches!(
            envelope.into_response(),
            Err(PortoneError::Api { code: 0, .. })
        ));
    }

    #[test]
    fn test_payment_with_sparse_and_null_fields() {
        let payment: Payment = serde_json::from_value(json!({
            "imp_uid": "imp_123",
            "merchant_uid": "order_1",
            "pay_method": "card",
            "amount": 1000,
            "status": "paid",
            "card_type": null,
            "custom_data": "{\"sku\":\"A1\"}",
            "cancel_history": [{
                "pg_tid": "t1",
                "amount": 500,
                "cancelled_at": null,
                "reason": "partial",
                "receipt_url": null
            }],
            "cancel_receipt_urls": ["https://receipt.example/1"]
        }))
        .unwrap();

        assert_eq!(payment.imp_uid, "imp_123");
        assert!(payment.is_paid());
        assert_eq!(payment.card_type, None);
        assert_eq!(payment.card_quota, 0);
        assert_eq!(payment.cancel_history.len(), 1);
        assert_eq!(payment.cancel_history[0].amount, 500);
        assert_eq!(payment.cancel_history[0].cancelled_at, 0);
        assert_eq!(payment.cancel_receipt_urls.len(), 1);
    }

    #[test]
    fn test_payment_null_scalars_and_lists_decode_to_defaults() {
        let payment: Payment = serde_json::from_value(json!({
            "imp_uid": "imp_123",
            "merchant_uid": null,
            "amount": 1000,
            "escrow": null,
            "card_quota": null,
            "vbank_date": null,
            "paid_at": null,
            "cancel_history": null,
            "cancel_receipt_urls": null,
            "cash_receipt_issued": null
        }))
        .unwrap();

        assert_eq!(payment.amount, 1000);
        assert_eq!(payment.merchant_uid, "");
        assert!(!payment.escrow);
        assert_eq!(payment.card_quota, 0);
        assert_eq!(payment.vbank_date, 0);
        assert_eq!(payment.paid_at, 0);
        assert!(payment.cancel_history.is_empty());
        assert!(payment.cancel_receipt_urls.is_empty());
        assert!(!payment.cash_receipt_issued);
    }
}
