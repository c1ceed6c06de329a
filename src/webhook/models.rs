use serde::Deserialize;

/// The only event type that triggers a credit; all others are acknowledged and ignored
pub const PAYMENT_SUCCEEDED_EVENT: &str = "payment.succeeded";

/// Inbound payment event body, untrusted until the signature is verified
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    pub payment_id: Option<String>,
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub product_cart: Vec<CartLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRef {
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub product_id: Option<String>,
}

impl PaymentNotification {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.customer_id.as_deref())
    }

    /// Only the first cart line's product is consulted
    pub fn first_product_id(&self) -> Option<&str> {
        self.product_cart
            .first()
            .and_then(|line| line.product_id.as_deref())
    }
}
