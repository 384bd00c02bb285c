//! Scenario tests for the `provision` application service.
//!
//! Every collaborator is a recording fake, so each test checks both the
//! outcome and which external calls were (not) made.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use agent_provision::app::{EXIT_FAILED, EXIT_OK, exit_code};
use agent_provision::application::services::provision::RunOutcome;
use agent_provision::domain::{InstallOutcome, ProvisionError};

use crate::fakes::{
    FakeAgent, FakeHasher, FakeInstaller, FakeServices, FakeSource, InstallBehavior, KEY, World,
};

fn provision_error(err: &anyhow::Error) -> &ProvisionError {
    err.downcast_ref::<ProvisionError>()
        .expect("error should be a ProvisionError")
}

// ── Service already present ──────────────────────────────────────────────────

#[tokio::test]
async fn test_running_service_exits_zero_without_install() {
    let world = World {
        services: FakeServices::running(),
        ..World::fresh_install(0)
    };
    let result = world.run(Some("Engineering"), None).await;

    assert!(matches!(result, Ok(RunOutcome::AlreadyRunning)));
    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(world.services.start_count(), 0);
    assert_eq!(world.source.call_count(), 0);
    assert_eq!(world.installer.call_count(), 0);
    assert!(world.agent.calls().is_empty());
}

#[tokio::test]
async fn test_stopped_service_is_started_and_exits_zero() {
    let world = World {
        services: FakeServices::stopped(true),
        ..World::fresh_install(0)
    };
    let result = world.run(None, None).await;

    assert!(matches!(result, Ok(RunOutcome::Started)));
    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(world.services.start_count(), 1);
    assert_eq!(world.source.call_count(), 0);
    assert_eq!(world.installer.call_count(), 0);
}

#[tokio::test]
async fn test_unstartable_service_exits_one_without_install() {
    let world = World {
        services: FakeServices::stopped(false),
        ..World::fresh_install(0)
    };
    let result = world.run(None, None).await;

    let err = result.as_ref().unwrap_err();
    assert!(matches!(
        provision_error(err),
        ProvisionError::ServiceStart { .. }
    ));
    assert_eq!(exit_code(&result), EXIT_FAILED);
    assert_eq!(world.source.call_count(), 0);
    assert_eq!(world.installer.call_count(), 0);
    let errors = world.log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("could not be started"));
    assert!(errors[0].contains("access denied"));
}

#[tokio::test]
async fn test_completed_steps_are_logged_as_success() {
    let world = World {
        services: FakeServices::stopped(true),
        ..World::fresh_install(0)
    };
    world.run(None, None).await.expect("started");
    assert_eq!(world.log.successes(), vec!["Agent service 'EndpointAgent' started."]);

    let world = World::fresh_install(0);
    world.run(Some("Engineering"), None).await.expect("installed");
    let successes = world.log.successes();
    assert_eq!(successes.len(), 2);
    assert!(successes[0].starts_with("Agent installed"));
    assert!(successes[1].contains("Default Group/Engineering"));
}

// ── Download ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_absent_service_downloads_exactly_once_to_configured_path() {
    let world = World::fresh_install(0);
    world.run(None, None).await.expect("run succeeds");

    let calls = world.source.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, world.config.installer_url);
    assert_eq!(calls[0].1, world.config.installer_path);
}

#[tokio::test]
async fn test_download_failure_skips_install_and_exits_one() {
    let world = World {
        source: FakeSource::failing(),
        ..World::fresh_install(0)
    };
    let result = world.run(Some("Eng"), None).await;

    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::Download { .. }
    ));
    assert_eq!(exit_code(&result), EXIT_FAILED);
    assert_eq!(world.installer.call_count(), 0);
    assert!(world.agent.calls().is_empty());
    assert!(world.log.errors()[0].contains("connection reset by peer"));
}

#[tokio::test]
async fn test_checksum_mismatch_skips_install() {
    let mut world = World::fresh_install(0);
    world.config.installer_sha256 = Some("cd".repeat(32));
    let result = world.run(None, None).await;

    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::Checksum { .. }
    ));
    assert_eq!(world.installer.call_count(), 0);
}

#[tokio::test]
async fn test_checksum_match_is_case_insensitive() {
    let mut world = World::fresh_install(0);
    world.config.installer_sha256 = Some("AB".repeat(32));
    world.run(None, None).await.expect("run succeeds");
    assert_eq!(world.installer.call_count(), 1);
}

#[tokio::test]
async fn test_unreadable_installer_is_fatal_only_with_expected_checksum() {
    let world = World {
        hasher: FakeHasher(None),
        ..World::fresh_install(0)
    };
    world.run(None, None).await.expect("hash is informational");
    assert_eq!(world.installer.call_count(), 1);

    let mut world = World {
        hasher: FakeHasher(None),
        ..World::fresh_install(0)
    };
    world.config.installer_sha256 = Some("ab".repeat(32));
    assert!(world.run(None, None).await.is_err());
    assert_eq!(world.installer.call_count(), 0);
}

// ── Install ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_install_receives_downloaded_path_and_key() {
    let world = World::fresh_install(0);
    world.run(None, None).await.expect("run succeeds");

    let calls = world.installer.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(world.config.installer_path.clone(), KEY.to_string())]);
}

#[tokio::test]
async fn test_fresh_install_without_group_makes_no_group_calls() {
    let world = World::fresh_install(0);
    let result = world.run(None, None).await;

    match &result {
        Ok(RunOutcome::Installed { outcome, group }) => {
            assert_eq!(*outcome, InstallOutcome::Success);
            assert!(group.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(exit_code(&result), EXIT_OK);
    assert!(world.agent.calls().is_empty());
    assert!(world.log.errors().is_empty());
}

#[tokio::test]
async fn test_reboot_required_still_assigns_group() {
    let world = World::fresh_install(3010);
    let result = world.run(Some("Engineering"), None).await;

    match &result {
        Ok(RunOutcome::Installed { outcome, group }) => {
            assert_eq!(*outcome, InstallOutcome::SuccessRebootRequired);
            let group = group.as_ref().expect("group assigned");
            assert_eq!(group.path.as_str(), "Default Group/Engineering");
            assert!(group.succeeded());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(
        world.agent.calls(),
        vec!["set-group:Default Group/Engineering", "deregister"]
    );
    assert!(world.log.contains("reboot is pending"));
}

#[tokio::test]
async fn test_reboot_initiated_is_success() {
    let world = World::fresh_install(1641);
    let result = world.run(Some("Eng"), Some("IT")).await;
    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(
        world.agent.calls(),
        vec!["set-group:Default Group/IT/Eng", "deregister"]
    );
}

#[tokio::test]
async fn test_install_failure_skips_group_and_exits_one() {
    let world = World::fresh_install(1603);
    let result = world.run(Some("Eng"), Some("IT")).await;

    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::InstallerFailed { code: 1603 }
    ));
    assert_eq!(exit_code(&result), EXIT_FAILED);
    assert!(world.agent.calls().is_empty());
    assert!(world.log.errors()[0].contains("1603"));
}

#[tokio::test]
async fn test_launch_failure_is_distinct_from_exit_code_one() {
    let world = World {
        installer: FakeInstaller::new(InstallBehavior::LaunchFails),
        ..World::fresh_install(0)
    };
    let result = world.run(None, None).await;
    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::InstallLaunch { .. }
    ));
    assert_eq!(exit_code(&result), EXIT_FAILED);

    let world = World::fresh_install(1);
    let result = world.run(None, None).await;
    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::InstallerFailed { code: 1 }
    ));
    assert_eq!(exit_code(&result), EXIT_FAILED);
}

#[tokio::test]
async fn test_install_timeout_is_fatal() {
    let world = World {
        installer: FakeInstaller::new(InstallBehavior::TimesOut(900)),
        ..World::fresh_install(0)
    };
    let result = world.run(Some("Eng"), None).await;
    assert!(matches!(
        provision_error(result.as_ref().unwrap_err()),
        ProvisionError::InstallTimedOut { secs: 900 }
    ));
    assert!(world.agent.calls().is_empty());
}

// ── Group assignment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_group_failure_is_not_fatal_and_still_deregisters() {
    let world = World {
        agent: FakeAgent::new(Err("agent.exe not found".to_string()), true),
        ..World::fresh_install(0)
    };
    let result = world.run(Some("Eng"), None).await;

    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(
        world.agent.calls(),
        vec!["set-group:Default Group/Eng", "deregister"]
    );
    match result {
        Ok(RunOutcome::Installed {
            group: Some(group), ..
        }) => assert_eq!(group.errors.len(), 1),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(world.log.errors()[0].contains("agent.exe not found"));
}

#[tokio::test]
async fn test_group_nonzero_exit_is_reported() {
    let world = World {
        agent: FakeAgent::new(Ok(2), false),
        ..World::fresh_install(0)
    };
    let result = world.run(Some("Eng"), None).await;
    assert_eq!(exit_code(&result), EXIT_OK);
    match result {
        Ok(RunOutcome::Installed {
            group: Some(group), ..
        }) => {
            assert_eq!(group.errors.len(), 2);
            assert!(!group.succeeded());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(world.log.errors().len(), 2);
}

#[tokio::test]
async fn test_parent_without_group_is_ignored() {
    let world = World::fresh_install(0);
    let result = world.run(None, Some("IT")).await;
    assert_eq!(exit_code(&result), EXIT_OK);
    assert!(world.agent.calls().is_empty());
    assert!(world.log.contains("without a group name"));
}

#[tokio::test]
async fn test_custom_root_group_is_used() {
    let mut world = World::fresh_install(0);
    world.config.root_group = "Fleet".to_string();
    world.run(Some("Eng"), None).await.expect("run succeeds");
    assert_eq!(world.agent.calls()[0], "set-group:Fleet/Eng");
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_access_key_is_never_logged_in_clear() {
    let world = World::fresh_install(0);
    world.run(Some("Eng"), None).await.expect("run succeeds");
    assert!(world.log.entries().iter().all(|e| !e.message.contains(KEY)));
    assert!(world.log.contains("aaaaaaaa-****"));
}

#[tokio::test]
async fn test_log_write_failure_aborts_run() {
    let mut world = World::fresh_install(0);
    world.log.fail_after = Some(1);
    let result = world.run(None, None).await;
    let err = result.as_ref().unwrap_err();
    assert!(err.downcast_ref::<ProvisionError>().is_none());
    assert_eq!(exit_code(&result), EXIT_FAILED);
    assert_eq!(world.source.call_count(), 0);
}
