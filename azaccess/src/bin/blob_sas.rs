//! Print a read only SAS url for `CONTAINER_NAME/BLOB_NAME`.

use azaccess::flows;
use log::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let ctx = azaccess::default_context();
    match flows::sign_blob_url(&ctx).await {
        Ok(signed) => {
            println!("{}", signed.url);
            Ok(())
        }
        Err(err) => {
            error!("signing blob url failed: {err}");
            Err(err.into())
        }
    }
}
