use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use ::stripe::{
    Client, CreatePaymentIntent, CreatePaymentIntentAutomaticPaymentMethods, Currency, Metadata,
    PaymentIntent, PaymentIntentId,
};
use std::str::FromStr;

/// Thin wrapper over the Stripe PaymentIntent API.
#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key.clone()),
            config,
        }
    }

    pub fn currency_code(&self) -> &str {
        &self.config.currency
    }

    fn currency(&self) -> AppResult<Currency> {
        Currency::from_str(&self.config.currency.to_lowercase()).map_err(|_| {
            AppError::ConfigError(format!("Unsupported currency: {}", self.config.currency))
        })
    }

    fn ensure_configured(&self) -> AppResult<()> {
        if self.config.secret_key.trim().is_empty() {
            return Err(AppError::ConfigError(
                "Stripe secret key is not configured".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_payment_intent(
        &self,
        amount: i64,
        description: &str,
        metadata: Metadata,
    ) -> AppResult<PaymentIntent> {
        self.ensure_configured()?;
        let mut params = CreatePaymentIntent::new(amount, self.currency()?);
        params.description = Some(description);
        params.metadata = Some(metadata);
        params.automatic_payment_methods = Some(CreatePaymentIntentAutomaticPaymentMethods {
            enabled: true,
            allow_redirects: None,
        });

        let pi = PaymentIntent::create(&self.client, params).await?;
        log::info!("Created payment intent {} for {amount}", pi.id);
        Ok(pi)
    }

    pub async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> AppResult<PaymentIntent> {
        self.ensure_configured()?;
        let id = PaymentIntentId::from_str(payment_intent_id).map_err(|_| {
            AppError::ValidationError(format!("Invalid payment intent id: {payment_intent_id}"))
        })?;
        Ok(PaymentIntent::retrieve(&self.client, &id, &[]).await?)
    }
}
