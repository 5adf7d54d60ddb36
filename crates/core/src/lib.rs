pub mod catalog;
pub mod service;

pub use catalog::DomainDefinition;
pub use service::{
    create_domains_all, create_one_domain, AcquireError, CreatedDomain, DomainConnection,
    DomainPool, DomainService, ProvisioningSummary, StatementError,
};
