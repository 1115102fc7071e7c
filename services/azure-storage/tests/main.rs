mod client;
mod management;
mod mock;

use azaccess_azure_identity::ClientSecretCredential;
use azaccess_azure_storage::{BlobClient, Config};
use azaccess_core::Context;
use azaccess_file_read_tokio::TokioFileRead;
use mock::{FakeAzure, ACCOUNT, ACCOUNT_KEY};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn context(fake: &FakeAzure) -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(fake.clone())
}

fn config() -> Config {
    Config {
        account_name: Some(ACCOUNT.to_string()),
        ..Default::default()
    }
}

fn credential() -> ClientSecretCredential {
    ClientSecretCredential::new("my-tenant", "my-client", "my-secret").unwrap()
}

/// A client authorized with the account key.
fn shared_key_client(fake: &FakeAzure) -> BlobClient {
    init();

    let config = Config {
        account_key: Some(ACCOUNT_KEY.to_string()),
        ..config()
    };
    BlobClient::with_shared_key(context(fake), &config).unwrap()
}

/// A client authorized with Entra ID tokens.
fn token_client(fake: &FakeAzure, config: Config) -> BlobClient {
    init();

    BlobClient::new(context(fake), &config, &credential()).unwrap()
}
