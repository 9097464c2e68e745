use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Database};

use crate::config::Config;
use crate::dal::ToDoDal;

const COLLECTION_NAME: &str = "todo_lists";

/// Process-wide handle on the MongoDB connection pool.
#[derive(Clone, Debug)]
pub struct MongoDbClient {
    client: Client,
    database_name: String,
}

impl MongoDbClient {
    /// Builds the client. No connection is made until the first operation.
    pub async fn new(config: &Config) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.app_name = Some("todo-lists".to_string());
        let mongodb_client = Client::with_options(client_options)?;
        Ok(Self {
            client: mongodb_client,
            database_name: config.database_name.clone(),
        })
    }

    /// Round-trips a `ping` command to the server.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.database().run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Closes the pool and stops the driver's background workers, shared by every clone.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }

    pub fn todo_dal(&self) -> ToDoDal {
        ToDoDal::new(self.database().collection(COLLECTION_NAME))
    }

    fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use testcontainers::core::{IntoContainerPort, WaitFor};
    use testcontainers::runners::AsyncRunner;
    use testcontainers::{ContainerAsync, GenericImage};

    /// Starts a throwaway MongoDB and returns it with its connection string.
    /// The container is removed when the handle is dropped.
    pub async fn start_mongo() -> (ContainerAsync<GenericImage>, String) {
        let container = GenericImage::new("mongo", "6.0.7")
            .with_exposed_port(27017.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .start()
            .await
            .expect("failed to start mongo container");
        let port = container
            .get_host_port_ipv4(27017.tcp())
            .await
            .expect("mongo port is not mapped");
        (container, format!("mongodb://localhost:{}", port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_new_does_not_connect() {
        let config = Config::new_mongodb_uri("mongodb://localhost:1".to_string());
        let client = MongoDbClient::new(&config).await;
        assert!(client.is_ok());
    }

    #[actix_web::test]
    async fn test_new_rejects_invalid_uri() {
        let config = Config::new_mongodb_uri("postgres://localhost".to_string());
        assert!(MongoDbClient::new(&config).await.is_err());
    }

    #[actix_web::test]
    async fn test_ping() {
        let (_container, uri) = testing::start_mongo().await;
        let client = MongoDbClient::new(&Config::new_mongodb_uri(uri)).await.unwrap();
        client.ping().await.unwrap();
    }

    #[actix_web::test]
    async fn test_shutdown_after_use() {
        let (_container, uri) = testing::start_mongo().await;
        let client = MongoDbClient::new(&Config::new_mongodb_uri(uri)).await.unwrap();
        client.ping().await.unwrap();
        let dal = client.todo_dal();
        dal.create_list("Groceries", None).await.unwrap();

        client.shutdown().await;
    }

    #[actix_web::test]
    async fn test_shutdown_without_connecting() {
        let config = Config::new_mongodb_uri("mongodb://localhost:1".to_string());
        MongoDbClient::new(&config).await.unwrap().shutdown().await;
    }
}
