//! User attribute catalog

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Semantic type of an attribute, used to select the legal operator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    String,
    Number,
    Date,
    Boolean,
    Array,
}

impl SemanticType {
    /// Lenient parse: unknown type names fall back to `String`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => SemanticType::Number,
            "date" => SemanticType::Date,
            "boolean" => SemanticType::Boolean,
            "array" => SemanticType::Array,
            _ => SemanticType::String,
        }
    }
}

// Deserialization goes through `parse` so the JSON payload boundary is as
// lenient as the Python one
impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SemanticType::parse(&s))
    }
}

/// One known user attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub display_label: String,
    pub semantic_type: SemanticType,
}

/// Built-in attribute table: (key, display label, semantic type)
///
/// Mirrors the columns of the user segmentation table. Serves as the default
/// when no catalog is fetched from the reference-data endpoint.
const BUILTIN_ATTRIBUTES: &[(&str, &str, SemanticType)] = &[
    ("USER_ID", "User ID", SemanticType::String),
    ("USER_TYPE", "User type", SemanticType::String),
    ("USER_EMAIL", "Email", SemanticType::String),
    ("USER_COUNTRY", "Country", SemanticType::String),
    ("USER_CITY", "City", SemanticType::String),
    ("USER_REGION", "Region", SemanticType::String),
    ("USER_LANGUAGE", "Language", SemanticType::String),
    ("ACCOUNT_TIER", "Account tier", SemanticType::String),
    ("ACQUISITION_CHANNEL", "Acquisition channel", SemanticType::String),
    ("ACQUISITION_CAMPAIGN", "Acquisition campaign", SemanticType::String),
    ("PREFERRED_CONTACT_METHOD", "Preferred contact method", SemanticType::String),
    ("DEVICE_PLATFORM", "Device platform", SemanticType::String),
    ("APP_VERSION", "App version", SemanticType::String),
    ("PAYMENT_METHOD", "Payment method", SemanticType::String),
    ("SUBSCRIPTION_PLAN", "Subscription plan", SemanticType::String),
    ("CHURN_RISK_BAND", "Churn risk band", SemanticType::String),
    ("SELLER_SEGMENT", "Seller segment", SemanticType::String),
    ("KYC_STATUS", "KYC status", SemanticType::String),
    ("REFERRAL_CODE", "Referral code", SemanticType::String),
    ("SUPPORT_TIER", "Support tier", SemanticType::String),
    ("TOTAL_LISTINGS_COUNT", "Total listings", SemanticType::Number),
    ("ACTIVE_LISTINGS_COUNT", "Active listings", SemanticType::Number),
    ("PAID_LISTINGS_COUNT", "Paid listings", SemanticType::Number),
    ("FREE_LISTINGS_COUNT", "Free listings", SemanticType::Number),
    ("EXPIRED_LISTINGS_COUNT", "Expired listings", SemanticType::Number),
    ("SOLD_ITEMS_COUNT", "Sold items", SemanticType::Number),
    ("PURCHASED_ITEMS_COUNT", "Purchased items", SemanticType::Number),
    ("TOTAL_SPEND", "Total spend", SemanticType::Number),
    ("TOTAL_REVENUE", "Total revenue", SemanticType::Number),
    ("AVG_ORDER_VALUE", "Average order value", SemanticType::Number),
    ("WALLET_BALANCE", "Wallet balance", SemanticType::Number),
    ("PROMO_CREDITS", "Promo credits", SemanticType::Number),
    ("SESSIONS_LAST_30D", "Sessions last 30 days", SemanticType::Number),
    ("PAGE_VIEWS_LAST_30D", "Page views last 30 days", SemanticType::Number),
    ("MESSAGES_SENT_COUNT", "Messages sent", SemanticType::Number),
    ("MESSAGES_RECEIVED_COUNT", "Messages received", SemanticType::Number),
    ("REVIEWS_GIVEN_COUNT", "Reviews given", SemanticType::Number),
    ("REVIEWS_RECEIVED_COUNT", "Reviews received", SemanticType::Number),
    ("AVG_SELLER_RATING", "Average seller rating", SemanticType::Number),
    ("DISPUTES_OPENED_COUNT", "Disputes opened", SemanticType::Number),
    ("REFUNDS_ISSUED_COUNT", "Refunds issued", SemanticType::Number),
    ("DAYS_SINCE_LAST_LOGIN", "Days since last login", SemanticType::Number),
    ("DAYS_SINCE_LAST_LISTING", "Days since last listing", SemanticType::Number),
    ("BUMP_PURCHASES_COUNT", "Bump purchases", SemanticType::Number),
    ("SEARCH_COUNT_LAST_30D", "Searches last 30 days", SemanticType::Number),
    ("SIGNUP_DATE", "Signup date", SemanticType::Date),
    ("FIRST_LISTING_DATE", "First listing date", SemanticType::Date),
    ("LAST_LISTING_DATE", "Last listing date", SemanticType::Date),
    ("FIRST_PURCHASE_DATE", "First purchase date", SemanticType::Date),
    ("LAST_PURCHASE_DATE", "Last purchase date", SemanticType::Date),
    ("LAST_LOGIN_DATE", "Last login date", SemanticType::Date),
    ("LAST_ACTIVE_DATE", "Last active date", SemanticType::Date),
    ("SUBSCRIPTION_START_DATE", "Subscription start date", SemanticType::Date),
    ("SUBSCRIPTION_END_DATE", "Subscription end date", SemanticType::Date),
    ("KYC_VERIFIED_DATE", "KYC verified date", SemanticType::Date),
    ("IS_BLOCK", "Blocked", SemanticType::Boolean),
    ("IS_VERIFIED", "Verified", SemanticType::Boolean),
    ("IS_SELLER", "Seller", SemanticType::Boolean),
    ("IS_BUYER", "Buyer", SemanticType::Boolean),
    ("IS_SUBSCRIBED", "Subscribed", SemanticType::Boolean),
    ("HAS_PAYMENT_METHOD", "Has payment method", SemanticType::Boolean),
    ("HAS_PROFILE_PHOTO", "Has profile photo", SemanticType::Boolean),
    ("EMAIL_OPT_IN", "Email opt-in", SemanticType::Boolean),
    ("PUSH_OPT_IN", "Push opt-in", SemanticType::Boolean),
    ("SMS_OPT_IN", "SMS opt-in", SemanticType::Boolean),
    ("VERTICALS_LISTED_IN", "Verticals listed in", SemanticType::Array),
    ("VERTICALS_PURCHASED_IN", "Verticals purchased in", SemanticType::Array),
    ("CATEGORIES_BROWSED", "Categories browsed", SemanticType::Array),
    ("FAVORITE_CATEGORIES", "Favorite categories", SemanticType::Array),
    ("ACTIVE_PROMOTIONS", "Active promotions", SemanticType::Array),
    ("DEVICE_IDS", "Device IDs", SemanticType::Array),
    ("EXPERIMENT_GROUPS", "Experiment groups", SemanticType::Array),
];

/// Attribute catalog: static lookup from attribute key to its definition
#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    attributes: AHashMap<String, Attribute>,
    order: Vec<String>,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        let mut map = AHashMap::with_capacity(attributes.len());
        let mut order = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if !map.contains_key(&attr.key) {
                order.push(attr.key.clone());
            }
            map.insert(attr.key.clone(), attr);
        }
        Self {
            attributes: map,
            order,
        }
    }

    /// Catalog built from the built-in attribute table
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ATTRIBUTES
                .iter()
                .map(|(key, label, semantic_type)| Attribute {
                    key: (*key).to_string(),
                    display_label: (*label).to_string(),
                    semantic_type: *semantic_type,
                })
                .collect(),
        )
    }

    pub fn lookup(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// Semantic type for an attribute key.
    ///
    /// Unknown keys fall back to `String`, which selects the string operator
    /// set. Intentional permissiveness, not an error path.
    pub fn semantic_type_of(&self, key: &str) -> SemanticType {
        self.lookup(key)
            .map(|attr| attr.semantic_type)
            .unwrap_or(SemanticType::String)
    }

    /// Attribute definitions in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.order.iter().filter_map(|key| self.attributes.get(key))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
