//! Tests for registration form checks and the registration service.

use crate::{
    account::{
        adapters::memory::InMemoryAuthGateway,
        domain::{AccountDomainError, RegistrationForm, UserId},
        ports::{AuthError, AuthGateway, AuthResult},
        services::{RegistrationError, RegistrationService},
    },
    notice::{Notice, RecordingNotifier},
};
use async_trait::async_trait;
use eyre::ensure;
use rstest::{fixture, rstest};
use std::sync::Arc;

/// Gateway whose calls always fail in transit.
#[derive(Debug, Default)]
struct OfflineGateway;

#[async_trait]
impl AuthGateway for OfflineGateway {
    async fn sign_up(&self, _email: &str, _password: &str) -> AuthResult<UserId> {
        Err(AuthError::transport(std::io::Error::other("auth offline")))
    }
}

struct Harness {
    service: RegistrationService<InMemoryAuthGateway, RecordingNotifier>,
    gateway: InMemoryAuthGateway,
    notifier: Arc<RecordingNotifier>,
}

#[fixture]
fn harness() -> Harness {
    let gateway = InMemoryAuthGateway::new();
    let notifier = Arc::new(RecordingNotifier::new());
    Harness {
        service: RegistrationService::new(Arc::new(gateway.clone()), Arc::clone(&notifier)),
        gateway,
        notifier,
    }
}

#[rstest]
#[case(RegistrationForm::new("a@example.com", "secret", "secret"), Ok(()))]
#[case(
    RegistrationForm::new("a@example.com", "secret", "secreT"),
    Err(AccountDomainError::PasswordMismatch)
)]
#[case(RegistrationForm::new("   ", "secret", "secret"), Err(AccountDomainError::EmptyEmail))]
#[case(RegistrationForm::new("a@example.com", "", ""), Err(AccountDomainError::EmptyPassword))]
fn validate_checks_form_locally(
    #[case] form: RegistrationForm,
    #[case] expected: Result<(), AccountDomainError>,
) {
    assert_eq!(form.validate(), expected);
}

#[rstest]
fn debug_output_redacts_passwords() {
    let form = RegistrationForm::new("a@example.com", "hunter2", "hunter2");

    let rendered = format!("{form:?}");

    assert!(rendered.contains("a@example.com"));
    assert!(!rendered.contains("hunter2"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mismatched_passwords_never_reach_gateway(harness: Harness) -> eyre::Result<()> {
    let form = RegistrationForm::new("a@example.com", "secret", "different");

    let result = harness.service.register(form).await;

    ensure!(matches!(
        result,
        Err(RegistrationError::Invalid(AccountDomainError::PasswordMismatch))
    ));
    ensure!(harness.gateway.user_for("a@example.com").is_none());
    ensure!(harness.notifier.notices() == vec![Notice::error("Passwords do not match")]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn matching_passwords_register_user(harness: Harness) -> eyre::Result<()> {
    let form = RegistrationForm::new("  A@Example.com ", "secret", "secret");

    let user_id = harness.service.register(form).await?;

    ensure!(harness.gateway.user_for("a@example.com") == Some(user_id));
    ensure!(
        harness.notifier.last()
            == Some(Notice::success("Registration successful! Please sign in."))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_sign_up_notifies_failure(harness: Harness) -> eyre::Result<()> {
    harness
        .service
        .register(RegistrationForm::new("a@example.com", "secret", "secret"))
        .await?;

    let result = harness
        .service
        .register(RegistrationForm::new("A@example.com", "other", "other"))
        .await;

    ensure!(matches!(
        result,
        Err(RegistrationError::Gateway(AuthError::Rejected(_)))
    ));
    ensure!(harness.notifier.last() == Some(Notice::error("Registration failed")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_failure_notifies_failure() -> eyre::Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let service = RegistrationService::new(Arc::new(OfflineGateway), Arc::clone(&notifier));

    let result = service
        .register(RegistrationForm::new("a@example.com", "secret", "secret"))
        .await;

    ensure!(matches!(result, Err(RegistrationError::Gateway(AuthError::Transport(_)))));
    ensure!(notifier.notices() == vec![Notice::error("Registration failed")]);
    Ok(())
}
