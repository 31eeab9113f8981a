use mongodb::{Client, Database};

use crate::error::{MemoryError, Result};

/// Connect to MongoDB and select the database
pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Database> {
    let client = Client::with_uri_str(mongodb_uri)
        .await
        .map_err(|e| MemoryError::Connection(e.to_string()))?;
    Ok(client.database(database))
}
