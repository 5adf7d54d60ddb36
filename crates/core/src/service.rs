use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::catalog;

/// Fixed message returned by [`DomainService::create_domains`].
///
/// The summary communicates "the batch ran to completion", not "every
/// domain exists"; per-domain outcomes are only visible through
/// [`create_domains_all`].
pub const COMPLETION_MESSAGE: &str = "Domains creation completed";

/// Error returned when the pool cannot hand out a connection.
#[derive(Debug, Error)]
#[error("failed to acquire a database connection: {0}")]
pub struct AcquireError(pub Box<dyn std::error::Error + Send + Sync>);

/// Error produced by a single statement submission.
#[derive(Debug, Error)]
#[error("statement execution failed: {0}")]
pub struct StatementError(pub Box<dyn std::error::Error + Send + Sync>);

/// Connection-pool capability the provisioning service consumes.
///
/// The leased connection is exclusively owned by the caller and is returned
/// to the pool when dropped, so release happens on every exit path.
#[async_trait]
pub trait DomainPool: Send + Sync {
    type Connection: DomainConnection;

    async fn acquire(&self) -> Result<Self::Connection, AcquireError>;
}

/// A leased database session able to run schema-definition statements.
#[async_trait]
pub trait DomainConnection: Send {
    async fn execute(&mut self, statement: &str) -> Result<(), StatementError>;
}

/// Successful creation of one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedDomain {
    pub name: String,
}

/// Result of a full provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProvisioningSummary {
    pub message: &'static str,
}

impl ProvisioningSummary {
    fn completed() -> Self {
        Self {
            message: COMPLETION_MESSAGE,
        }
    }
}

/// Issues a single `CREATE DOMAIN` statement and translates the result into
/// an outcome value without raising.
///
/// Statement failures, including "domain already exists", are swallowed here
/// and reported as `None`; one bad or duplicate domain must not stop the
/// batch. Exactly one attempt per invocation, no retries.
pub async fn create_one_domain<C: DomainConnection>(
    conn: &mut C,
    name: &str,
    base_type: &str,
    default_value: &str,
) -> Option<CreatedDomain> {
    let statement = format!("CREATE DOMAIN {name} AS {base_type} DEFAULT {default_value}");
    match conn.execute(&statement).await {
        Ok(()) => Some(CreatedDomain {
            name: name.to_string(),
        }),
        Err(_) => None,
    }
}

/// Drives [`create_one_domain`] once per catalog entry, in catalog order,
/// over one caller-supplied connection.
///
/// The connection lifecycle belongs to the caller. The returned vector always
/// has one slot per catalog entry, with `None` marking failed attempts.
pub async fn create_domains_all<C: DomainConnection>(conn: &mut C) -> Vec<Option<CreatedDomain>> {
    let definitions = catalog::entries();
    let mut outcomes = Vec::with_capacity(definitions.len());
    for definition in definitions {
        outcomes.push(
            create_one_domain(
                conn,
                definition.name,
                definition.base_type,
                definition.default_value,
            )
            .await,
        );
    }
    outcomes
}

/// Domain provisioning service owning the catalog and the pool handle.
#[derive(Clone)]
pub struct DomainService<P> {
    pool: P,
}

impl<P: DomainPool> DomainService<P> {
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    /// Self-contained entry point owning the full connection lifecycle.
    ///
    /// Acquires one connection, provisions every catalog entry through it,
    /// and returns the fixed summary. The lease is dropped (and therefore
    /// released) on every exit path past acquisition; when acquisition
    /// itself fails nothing was leased and nothing is released.
    pub async fn create_domains(&self) -> Result<ProvisioningSummary, AcquireError> {
        let mut conn = self.pool.acquire().await?;
        let _outcomes = create_domains_all(&mut conn).await;
        Ok(ProvisioningSummary::completed())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    #[derive(Default)]
    struct Recorder {
        statements: Mutex<Vec<String>>,
        acquired: AtomicUsize,
        released: AtomicUsize,
    }

    impl Recorder {
        fn statements(&self) -> Vec<String> {
            self.statements.lock().expect("recorder poisoned").clone()
        }
    }

    struct MockConnection {
        recorder: Arc<Recorder>,
        failing_statements: Vec<usize>,
    }

    #[async_trait]
    impl DomainConnection for MockConnection {
        async fn execute(&mut self, statement: &str) -> Result<(), StatementError> {
            let index = {
                let mut statements = self.recorder.statements.lock().expect("recorder poisoned");
                statements.push(statement.to_string());
                statements.len() - 1
            };
            if self.failing_statements.contains(&index) {
                Err(StatementError("domain already exists".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Drop for MockConnection {
        fn drop(&mut self) {
            self.recorder.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct MockPool {
        recorder: Arc<Recorder>,
        failing_statements: Vec<usize>,
        refuse_acquire: bool,
    }

    #[async_trait]
    impl DomainPool for MockPool {
        type Connection = MockConnection;

        async fn acquire(&self) -> Result<Self::Connection, AcquireError> {
            if self.refuse_acquire {
                return Err(AcquireError("pool exhausted".into()));
            }
            self.recorder.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(MockConnection {
                recorder: self.recorder.clone(),
                failing_statements: self.failing_statements.clone(),
            })
        }
    }

    #[tokio::test]
    async fn create_one_domain_submits_exact_statement() {
        let recorder = Arc::new(Recorder::default());
        let mut conn = MockConnection {
            recorder: recorder.clone(),
            failing_statements: Vec::new(),
        };

        let outcome = create_one_domain(&mut conn, "dom_test", "varchar(100)", "default value")
            .await
            .expect("statement should succeed");

        assert_eq!(outcome.name, "dom_test");
        assert_eq!(
            recorder.statements(),
            vec!["CREATE DOMAIN dom_test AS varchar(100) DEFAULT default value"]
        );
    }

    #[tokio::test]
    async fn create_one_domain_swallows_statement_failure() {
        let recorder = Arc::new(Recorder::default());
        let mut conn = MockConnection {
            recorder: recorder.clone(),
            failing_statements: vec![0],
        };

        let outcome = create_one_domain(&mut conn, "dom_test", "varchar(100)", "default value").await;

        assert!(outcome.is_none());
        assert_eq!(
            recorder.statements(),
            vec!["CREATE DOMAIN dom_test AS varchar(100) DEFAULT default value"]
        );
    }

    #[tokio::test]
    async fn duplicate_creation_yields_no_outcome_on_second_attempt() {
        let recorder = Arc::new(Recorder::default());
        let mut conn = MockConnection {
            recorder: recorder.clone(),
            failing_statements: vec![1],
        };

        let first = create_one_domain(&mut conn, "dom_test", "varchar(100)", "''").await;
        let second = create_one_domain(&mut conn, "dom_test", "varchar(100)", "''").await;

        assert_eq!(first.expect("first attempt succeeds").name, "dom_test");
        assert!(second.is_none());
        assert_eq!(recorder.statements().len(), 2);
    }

    #[tokio::test]
    async fn create_domains_all_covers_every_catalog_entry_in_order() {
        let recorder = Arc::new(Recorder::default());
        let mut conn = MockConnection {
            recorder: recorder.clone(),
            failing_statements: Vec::new(),
        };

        let outcomes = create_domains_all(&mut conn).await;

        let definitions = catalog::entries();
        assert_eq!(outcomes.len(), definitions.len());
        assert_eq!(recorder.statements().len(), definitions.len());
        for (outcome, definition) in outcomes.iter().zip(definitions) {
            let created = outcome.as_ref().expect("every statement succeeded");
            assert_eq!(created.name, definition.name);
        }
    }

    #[tokio::test]
    async fn failed_entry_does_not_abort_the_batch() {
        let recorder = Arc::new(Recorder::default());
        let mut conn = MockConnection {
            recorder: recorder.clone(),
            failing_statements: vec![4],
        };

        let outcomes = create_domains_all(&mut conn).await;

        assert_eq!(outcomes.len(), catalog::entries().len());
        assert!(outcomes[4].is_none());
        let successes = outcomes.iter().filter(|outcome| outcome.is_some()).count();
        assert_eq!(successes, catalog::entries().len() - 1);
        assert_eq!(recorder.statements().len(), catalog::entries().len());
    }

    #[tokio::test]
    async fn create_domains_acquires_and_releases_exactly_once() {
        let recorder = Arc::new(Recorder::default());
        let service = DomainService::new(MockPool {
            recorder: recorder.clone(),
            ..MockPool::default()
        });

        let summary = service.create_domains().await.expect("run completes");

        assert_eq!(summary.message, COMPLETION_MESSAGE);
        assert_eq!(recorder.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.released.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.statements().len(), catalog::entries().len());
    }

    #[tokio::test]
    async fn create_domains_reports_completion_even_when_every_entry_fails() {
        let recorder = Arc::new(Recorder::default());
        let service = DomainService::new(MockPool {
            recorder: recorder.clone(),
            failing_statements: (0..catalog::entries().len()).collect(),
            refuse_acquire: false,
        });

        let summary = service.create_domains().await.expect("run completes");

        assert_eq!(summary.message, COMPLETION_MESSAGE);
        assert_eq!(recorder.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_domains_skips_provisioning_when_acquisition_fails() {
        let recorder = Arc::new(Recorder::default());
        let service = DomainService::new(MockPool {
            recorder: recorder.clone(),
            failing_statements: Vec::new(),
            refuse_acquire: true,
        });

        let err = service
            .create_domains()
            .await
            .expect_err("acquisition failure should surface");

        assert!(err.to_string().contains("pool exhausted"));
        assert!(recorder.statements().is_empty());
        assert_eq!(recorder.acquired.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.released.load(Ordering::SeqCst), 0);
    }
}
