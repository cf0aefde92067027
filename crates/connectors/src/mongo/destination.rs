use crate::{
    destination::DocumentDestination,
    error::{ConnectorError, DbError},
    mongo::encode::to_bson,
};
use async_trait::async_trait;
use model::{
    records::document::Document,
    schema::index::{IndexCollation, IndexSpec},
};
use mongodb::{
    Client, Collection, IndexModel,
    bson::{Document as BsonDocument, doc},
    options::{Collation, CollationStrength, IndexOptions},
};
use tracing::{debug, error, info};

/// Where the documents go.
#[derive(Debug, Clone)]
pub struct MongoParams {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// One collection on a shared client. Cloning is cheap and clones share the
/// driver's connection pool.
#[derive(Clone)]
pub struct MongoDestination {
    client: Client,
    collection: Collection<BsonDocument>,
}

impl MongoDestination {
    pub async fn connect(params: &MongoParams) -> Result<Self, ConnectorError> {
        let client = Client::with_uri_str(&params.uri).await?;
        let collection = client
            .database(&params.database)
            .collection::<BsonDocument>(&params.collection);

        Ok(MongoDestination { client, collection })
    }

    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }

    /// Runs `{ ping: 1 }` against the admin database.
    pub async fn ping(&self) -> Result<(), ConnectorError> {
        info!("Pinging MongoDB for '{}'", self.namespace());

        let reply = self
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                error!("MongoDB ping failed: {}", e);
                ConnectorError::Mongo(e)
            })?;

        let ok = reply
            .get("ok")
            .and_then(|v| v.as_f64().or_else(|| v.as_i32().map(f64::from)));
        if ok != Some(1.0) {
            return Err(ConnectorError::UnexpectedPing {
                target: "MongoDB",
                detail: reply.to_string(),
            });
        }

        info!("MongoDB ping succeeded");
        Ok(())
    }
}

#[async_trait]
impl DocumentDestination for MongoDestination {
    async fn check_connection(&self) -> Result<(), DbError> {
        Ok(self.ping().await?)
    }

    async fn drop_collection(&self) -> Result<(), DbError> {
        info!("Dropping collection '{}'", self.namespace());
        self.collection.drop().await?;
        Ok(())
    }

    async fn insert_batch(&self, docs: &[Document]) -> Result<(), DbError> {
        if docs.is_empty() {
            return Ok(());
        }

        let encoded: Vec<BsonDocument> = docs.iter().map(to_bson).collect();
        let result = self.collection.insert_many(encoded).await?;
        debug!("Inserted {} documents", result.inserted_ids.len());
        Ok(())
    }

    async fn create_indexes(&self, specs: &[IndexSpec]) -> Result<(), DbError> {
        let models: Vec<IndexModel> = specs.iter().map(index_model).collect();
        let result = self.collection.create_indexes(models).await?;
        info!("Created indexes: {}", result.index_names.join(", "));
        Ok(())
    }
}

fn index_model(spec: &IndexSpec) -> IndexModel {
    let mut keys = BsonDocument::new();
    for (field, order) in &spec.keys {
        keys.insert(field.clone(), order.as_i32());
    }

    let options = IndexOptions::builder()
        .name(spec.name())
        .unique(spec.unique)
        .collation(spec.collation.as_ref().map(collation))
        .build();

    IndexModel::builder().keys(keys).options(options).build()
}

fn collation(spec: &IndexCollation) -> Collation {
    Collation::builder()
        .locale(spec.locale.clone())
        .strength(strength(spec.strength))
        .build()
}

fn strength(level: u32) -> CollationStrength {
    match level {
        1 => CollationStrength::Primary,
        2 => CollationStrength::Secondary,
        4 => CollationStrength::Quaternary,
        5 => CollationStrength::Identical,
        _ => CollationStrength::Tertiary,
    }
}
