#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use azaccess_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

pub mod flows;

pub mod azure_identity {
    pub use azaccess_azure_identity::*;
}

#[cfg(feature = "storage")]
pub mod azure_storage {
    pub use azaccess_azure_storage::*;
}

#[cfg(feature = "keyvault")]
pub mod azure_keyvault {
    pub use azaccess_azure_keyvault::*;
}
