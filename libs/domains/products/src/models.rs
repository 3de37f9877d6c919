use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Seconds from `0001-01-01T00:00:00Z` to the Unix epoch.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Product as exchanged over HTTP.
///
/// Every field except `id` is optional in request bodies; missing or `null`
/// values take their zero value (`0001-01-01T00:00:00Z` for timestamps).
/// `id` is rendered as a 24-character hex string and omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Product {
    /// Store-assigned identifier (hex)
    #[serde(skip_serializing_if = "Option::is_none", with = "object_id_hex")]
    #[schema(value_type = Option<String>, example = "65f1c0a2b3d4e5f601234567")]
    pub id: Option<ObjectId>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    /// Set once by the server on create
    #[serde(deserialize_with = "null_as_zero_time")]
    pub created_at: DateTime<Utc>,
    /// Refreshed by the server on every create and update
    #[serde(deserialize_with = "null_as_zero_time")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: 0.0,
            stock: 0,
            category: String::new(),
            image_url: String::new(),
            created_at: zero_time(),
            updated_at: zero_time(),
        }
    }
}

/// Product as stored in the `products` collection.
///
/// Fields missing from a stored document, or stored as `null`, decode to
/// their zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_zero_bson_time")]
    pub created_at: bson::DateTime,
    #[serde(deserialize_with = "null_as_zero_bson_time")]
    pub updated_at: bson::DateTime,
}

impl Default for ProductDocument {
    fn default() -> Self {
        Product::default().into()
    }
}

/// `0001-01-01T00:00:00Z`, the value of a timestamp nobody set.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or_default()
}

fn zero_bson_time() -> bson::DateTime {
    bson::DateTime::from_millis(ZERO_TIME_SECS * 1000)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(zero_time))
}

fn null_as_zero_bson_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bson::DateTime, D::Error> {
    Ok(Option::<bson::DateTime>::deserialize(deserializer)?.unwrap_or_else(zero_bson_time))
}

/// Current time at the precision the store keeps (milliseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl Product {
    /// Stamp a new product: drops any client-supplied id and sets both timestamps.
    pub fn prepare_for_insert(&mut self, at: DateTime<Utc>) {
        self.id = None;
        self.created_at = at;
        self.updated_at = at;
    }
}

impl From<Product> for ProductDocument {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            image_url: product.image_url,
            created_at: bson::DateTime::from_millis(product.created_at.timestamp_millis()),
            updated_at: bson::DateTime::from_millis(product.updated_at.timestamp_millis()),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            price: doc.price,
            stock: doc.stock,
            category: doc.category,
            image_url: doc.image_url,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_else(zero_time)
}

/// Serde adapter rendering `Option<ObjectId>` as a plain hex string.
///
/// An empty string or `null` reads as `None`; any other non-hex value is an error.
pub mod object_id_hex {
    use mongodb::bson::oid::ObjectId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_str(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ObjectId>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(None),
            Some(hex) => ObjectId::parse_str(hex).map(Some).map_err(D::Error::custom),
        }
    }
}
