//! DynamoDB post store.
//!
//! Table layout: partition key `id` (S, always the collection value), sort
//! key `createdAt` (N, epoch millis), payload `post` (S, omitted when absent)
//! and `ttl` (N, epoch seconds) which the table's TTL feature expires.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus, TimeToLiveSpecification,
};

use bbs_core::domain::{COLLECTION, PostRecord};
use bbs_core::error::RepoError;
use bbs_core::ports::PostStore;

const ATTR_ID: &str = "id";
const ATTR_CREATED_AT: &str = "createdAt";
const ATTR_POST: &str = "post";
const ATTR_TTL: &str = "ttl";

/// Table used when `POSTS_TABLE` is not set.
pub const DEFAULT_TABLE: &str = "portfolioTable";

/// DynamoDB connection configuration.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    /// Table holding the post log.
    pub table_name: String,
    /// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local.
    pub endpoint_url: Option<String>,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE.to_string(),
            endpoint_url: None,
        }
    }
}

impl DynamoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `POSTS_TABLE` and `DYNAMODB_ENDPOINT` through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| lookup(key).filter(|s| !s.is_empty());
        Self {
            table_name: set("POSTS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            endpoint_url: set("DYNAMODB_ENDPOINT"),
        }
    }

    /// Build a client from the ambient AWS configuration (env, profile, IAM role).
    pub async fn client(&self) -> Client {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Client::from_conf(builder.build())
    }
}

/// DynamoDB-backed post store.
#[derive(Clone)]
pub struct DynamoPostStore {
    client: Client,
    table_name: String,
}

impl DynamoPostStore {
    pub async fn new(config: DynamoConfig) -> Self {
        let client = config.client().await;
        tracing::info!(table = %config.table_name, "DynamoDB post store configured");
        Self::with_client(client, config.table_name)
    }

    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl PostStore for DynamoPostStore {
    async fn put(&self, record: PostRecord) -> Result<(), RepoError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(&record)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(table = %self.table_name, error = %DisplayErrorContext(&e), "PutItem failed");
                map_sdk_error(e)
            })?;

        tracing::debug!(created_at = record.created_at, "Post written");
        Ok(())
    }

    async fn query_latest(&self, limit: usize) -> Result<Vec<PostRecord>, RepoError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#id = :id")
            .expression_attribute_names("#id", ATTR_ID)
            .expression_attribute_values(":id", AttributeValue::S(COLLECTION.to_string()))
            .scan_index_forward(false)
            .limit(i32::try_from(limit).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(table = %self.table_name, error = %DisplayErrorContext(&e), "Query failed");
                map_sdk_error(e)
            })?;

        let items = output.items.unwrap_or_default();
        tracing::debug!(count = items.len(), "Posts queried");
        items.iter().map(from_item).collect()
    }
}

/// Create the post table if it does not exist and enable TTL on `ttl`.
///
/// Returns `true` when the table was created by this call.
pub async fn ensure_table(client: &Client, table_name: &str) -> Result<bool, RepoError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::info!(table = %table_name, "Table already exists");
            return Ok(false);
        }
        Err(e)
            if e.as_service_error()
                .is_some_and(|se| se.is_resource_not_found_exception()) => {}
        Err(e) => return Err(map_sdk_error(e)),
    }

    tracing::info!(table = %table_name, "Creating table");
    client
        .create_table()
        .table_name(table_name)
        .key_schema(key_element(ATTR_ID, KeyType::Hash)?)
        .key_schema(key_element(ATTR_CREATED_AT, KeyType::Range)?)
        .attribute_definitions(attribute(ATTR_ID, ScalarAttributeType::S)?)
        .attribute_definitions(attribute(ATTR_CREATED_AT, ScalarAttributeType::N)?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(map_sdk_error)?;

    wait_until_active(client, table_name).await?;

    let ttl = TimeToLiveSpecification::builder()
        .enabled(true)
        .attribute_name(ATTR_TTL)
        .build()
        .map_err(|e| RepoError::Query(e.to_string()))?;
    client
        .update_time_to_live()
        .table_name(table_name)
        .time_to_live_specification(ttl)
        .send()
        .await
        .map_err(map_sdk_error)?;

    tracing::info!(table = %table_name, attribute = ATTR_TTL, "Table created with TTL enabled");
    Ok(true)
}

async fn wait_until_active(client: &Client, table_name: &str) -> Result<(), RepoError> {
    for _ in 0..60 {
        let output = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(map_sdk_error)?;
        let status = output.table().and_then(|t| t.table_status());
        if status == Some(&TableStatus::Active) {
            return Ok(());
        }
        tracing::debug!(table = %table_name, ?status, "Waiting for table to become active");
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Err(RepoError::Connection(format!(
        "table {table_name} did not become active"
    )))
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, RepoError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| RepoError::Query(e.to_string()))
}

fn attribute(name: &str, kind: ScalarAttributeType) -> Result<AttributeDefinition, RepoError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(kind)
        .build()
        .map_err(|e| RepoError::Query(e.to_string()))
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> RepoError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => RepoError::Connection(message),
        _ => RepoError::Query(message),
    }
}

fn to_item(record: &PostRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::from([
        (
            ATTR_ID.to_string(),
            AttributeValue::S(record.partition_key().to_string()),
        ),
        (
            ATTR_CREATED_AT.to_string(),
            AttributeValue::N(record.created_at.to_string()),
        ),
        (ATTR_TTL.to_string(), AttributeValue::N(record.ttl.to_string())),
    ]);
    if let Some(content) = &record.content {
        item.insert(ATTR_POST.to_string(), AttributeValue::S(content.clone()));
    }
    item
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<PostRecord, RepoError> {
    let content = match item.get(ATTR_POST) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(AttributeValue::S(s)) => Some(s.clone()),
        Some(other) => {
            return Err(RepoError::Malformed(format!(
                "{ATTR_POST} is not a string: {other:?}"
            )));
        }
    };

    Ok(PostRecord {
        created_at: number(item, ATTR_CREATED_AT)?,
        content,
        ttl: number(item, ATTR_TTL)?,
    })
}

fn number(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64, RepoError> {
    let raw = item
        .get(name)
        .ok_or_else(|| RepoError::Malformed(format!("missing {name}")))?
        .as_n()
        .map_err(|_| RepoError::Malformed(format!("{name} is not a number")))?;
    raw.parse()
        .map_err(|_| RepoError::Malformed(format!("{name} is not an integer: {raw}")))
}
