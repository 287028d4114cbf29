//! Payment endpoints.
//!
//! Every call goes through the [`AuthTransport`], so it is authenticated without
//! the caller ever handling a token.

use crate::errors::Result;
use crate::transport::AuthTransport;
use crate::types::{CreatePaymentIntentRequest, Envelope, Payment, PaymentIntent};
use crate::utils::{decode_envelope, join_path, new_request};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Path of the payments service, relative to the service root.
pub const PAYMENTS_SERVICE_PATH: &str = "payments";

/// Client for the `/payments` resource.
#[derive(Debug, Clone)]
pub struct PaymentsService {
    transport: Arc<AuthTransport>,
    base_url: Url,
}

impl PaymentsService {
    /// Creates a service rooted at `{service_root}/payments`.
    pub fn new(transport: Arc<AuthTransport>, service_root: &Url) -> Result<Self> {
        Ok(Self {
            transport,
            base_url: join_path(service_root, &[PAYMENTS_SERVICE_PATH])?,
        })
    }

    /// Registers the amount expected for `merchant_uid` ahead of checkout.
    ///
    /// Calls `POST /payments/prepare`. The envelope is returned as decoded;
    /// use [`Envelope::into_response`] to reject non-zero codes.
    #[instrument(skip(self), fields(merchant_uid = %req.merchant_uid))]
    pub async fn create_payment_intent(
        &self,
        req: &CreatePaymentIntentRequest,
    ) -> Result<Envelope<PaymentIntent>> {
        self.call(Method::POST, &["prepare"], Some(req)).await
    }

    /// Looks up a payment by its gateway-assigned `imp_uid`.
    ///
    /// Calls `GET /payments/{imp_uid}` with no body.
    #[instrument(skip(self))]
    pub async fn get_payment(&self, imp_uid: &str) -> Result<Envelope<Payment>> {
        self.call::<(), _>(Method::GET, &[imp_uid], None).await
    }

    async fn call<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = join_path(&self.base_url, segments)?;
        debug!(%method, %url, "Dispatching payments request");

        let request = new_request(self.transport.http(), method, url, body)?;
        let response = self.transport.execute(request).await?;
        decode_envelope(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticate::TokenSource;
    use crate::config::Credentials;
    use crate::types::AccessToken;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticToken;

    #[async_trait]
    impl TokenSource for StaticToken {
        async fn fetch_token(&self, _credentials: &Credentials) -> Result<AccessToken> {
            Ok(AccessToken {
                access_token: "static-token".to_string(),
                now: 0,
                expired_at: 4_102_444_800,
            })
        }
    }

    fn service(server: &MockServer) -> PaymentsService {
        let transport = AuthTransport::new(
            reqwest::Client::new(),
            Arc::new(StaticToken),
            Credentials::new("key", "secret"),
            Duration::ZERO,
        )
        .unwrap();
        let root = Url::parse(&server.uri()).unwrap();
        PaymentsService::new(Arc::new(transport), &root).unwrap()
    }

    #[tokio::test]
    async fn test_get_payment_encodes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payments/imp%2F1"))
            .and(header("Authorization", "static-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": null,
                "response": {"imp_uid": "imp/1", "merchant_uid": "m-1", "amount": 10}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = service(&server).get_payment("imp/1").await.unwrap();

        assert_eq!(envelope.response.unwrap().imp_uid, "imp/1");
    }

    #[tokio::test]
    async fn test_error_status_still_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/prepare"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": -1,
                "message": "amount must be positive",
                "response": null
            })))
            .mount(&server)
            .await;

        let envelope = service(&server)
            .create_payment_intent(&CreatePaymentIntentRequest {
                merchant_uid: "m-1".to_string(),
                amount: -5,
            })
            .await
            .unwrap();

        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.message.as_deref(), Some("amount must be positive"));
        assert!(envelope.response.is_none());
    }
}
