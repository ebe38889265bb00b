//! The nine section records of a merchant request, in wire order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FieldLookup, Section};
use crate::error::Result;

section_record! {
    /// Transaction section: order identity, amount, currency and return URLs.
    ///
    /// `me_id` has no static default; the request builder fills it with the
    /// merchant id of the call when the caller leaves it unset.
    TxnDetails => "txn" {
        /// Aggregator id.
        ag_id = "yagout",
        /// Merchant id, echoed inside the encrypted message.
        me_id = "",
        /// Merchant order number.
        order_no = "",
        /// Amount as a decimal string.
        amount = "",
        /// Country code.
        country = "ETH",
        /// Currency code.
        currency = "ETB",
        /// Transaction type.
        txn_type = "SALE",
        /// URL the gateway returns to after a successful payment.
        success_url = "",
        /// URL the gateway returns to after a failed payment.
        failure_url = "",
        /// Sales channel.
        channel = "WEB",
    }
}

section_record! {
    /// Payment-gateway section: preselected gateway and payment mode.
    PgDetails => "pg" {
        /// Payment gateway id.
        pg_id = "",
        /// Payment mode.
        paymode = "",
        /// Card scheme.
        scheme = "",
        /// Wallet type.
        wallet_type = "",
    }
}

section_record! {
    /// Card section. Normally left empty so the card is captured on the gateway page.
    CardDetails => "card" {
        /// Card number.
        card_no = "",
        /// Expiry month.
        exp_month = "",
        /// Expiry year.
        exp_year = "",
        /// Card verification value.
        cvv = "",
        /// Name on card.
        card_name = "",
    }
}

section_record! {
    /// Customer section.
    CustomerDetails => "cust" {
        /// Customer name.
        cust_name = "",
        /// Customer email address.
        email_id = "",
        /// Customer mobile number.
        mobile_no = "",
        /// Merchant-side customer id.
        unique_id = "",
        /// `Y` if the customer is logged in on the merchant site.
        is_logged_in = "Y",
    }
}

section_record! {
    /// Billing address section.
    BillingDetails => "bill" {
        /// Street address.
        bill_address = "",
        /// City.
        bill_city = "",
        /// State or region.
        bill_state = "",
        /// Country.
        bill_country = "",
        /// Postal code.
        bill_zip = "",
    }
}

section_record! {
    /// Shipping section.
    ShippingDetails => "ship" {
        /// Street address.
        ship_address = "",
        /// City.
        ship_city = "",
        /// State or region.
        ship_state = "",
        /// Country.
        ship_country = "",
        /// Postal code.
        ship_zip = "",
        /// Expected shipping days.
        ship_days = "",
        /// Number of shipping addresses.
        address_count = "",
    }
}

section_record! {
    /// Item summary section.
    ItemDetails => "item" {
        /// Number of items.
        item_count = "",
        /// Item value.
        item_value = "",
        /// Item category.
        item_category = "",
    }
}

section_record! {
    /// User-defined fields, free-form merchant metadata.
    OtherDetails => "other" {
        /// User-defined field 1.
        udf_1 = "",
        /// User-defined field 2.
        udf_2 = "",
        /// User-defined field 3.
        udf_3 = "",
        /// User-defined field 4.
        udf_4 = "",
        /// User-defined field 5.
        udf_5 = "",
    }
}

/// UPI section.
///
/// The gateway has no published field layout for this section, so it is sent
/// as an empty placeholder. Caller-supplied fields are kept on the record but
/// never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpiDetails(pub BTreeMap<String, String>);

impl Section for UpiDetails {
    const NAME: &'static str = "upi";
    const FIELDS: &'static [&'static str] = &[];
    const DEFAULTS: &'static [&'static str] = &[];

    fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn set(&mut self, name: &str, value: String) -> Result<()> {
        self.0.insert(name.to_owned(), value);
        Ok(())
    }
}

impl FieldLookup for UpiDetails {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.value(name)
    }
}
