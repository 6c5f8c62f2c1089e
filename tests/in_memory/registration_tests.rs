//! In-memory integration tests for registration.

use rstest::rstest;
use std::sync::Arc;
use taskboard::{
    account::{
        adapters::memory::InMemoryAuthGateway, domain::RegistrationForm,
        services::RegistrationService,
    },
    notice::{Notice, RecordingNotifier},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sign_up_after_correcting_confirmation() -> eyre::Result<()> {
    let gateway = InMemoryAuthGateway::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let service = RegistrationService::new(Arc::new(gateway.clone()), Arc::clone(&notifier));

    let first = service
        .register(RegistrationForm::new("sam@example.com", "secret", "secert"))
        .await;
    let second = service
        .register(RegistrationForm::new("sam@example.com", "secret", "secret"))
        .await?;

    eyre::ensure!(first.is_err());
    eyre::ensure!(gateway.user_for("sam@example.com") == Some(second));
    eyre::ensure!(
        notifier.notices()
            == vec![
                Notice::error("Passwords do not match"),
                Notice::success("Registration successful! Please sign in."),
            ]
    );
    Ok(())
}
