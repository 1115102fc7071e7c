mod static_provider;
pub use static_provider::StaticCredentialProvider;

mod token;
pub use token::TokenCredentialProvider;
