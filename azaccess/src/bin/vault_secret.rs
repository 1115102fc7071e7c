//! Print the value of the Key Vault secret named by `SECRET_NAME`.

use azaccess::flows;
use log::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let ctx = azaccess::default_context();
    match flows::read_secret(&ctx).await {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(err) => {
            error!("reading secret failed: {err}");
            Err(err.into())
        }
    }
}
