//! End-to-end tests for `run_capture`.

use std::path::{Path, PathBuf};

use cxxcap_lib::capture::{BuildStep, CapturePhase, CaptureRule, run_capture};
use cxxcap_lib::depfile::DepFileError;
use cxxcap_lib::headers::{DependencyClass, HeaderVerification, HeaderVerificationMode};
use cxxcap_lib::step::StepError;
use serial_test::serial;

use super::common::{Project, invocation};

fn rule(project: &Project, mode: HeaderVerificationMode) -> CaptureRule {
  CaptureRule::new(project.config(mode), invocation())
}

mod success {
  use super::*;

  #[tokio::test]
  #[serial]
  async fn writes_argfile_runs_tool_and_builds_predicate() {
    let project = Project::new();
    project.set_deps(&format!(
      "buck-out/gen/a.o: src/a.c \\\n  {}/include/foo.h\n",
      project.root.display()
    ));

    let result = run_capture(&rule(&project, HeaderVerificationMode::Error)).await.unwrap();

    assert_eq!(result.results_dir, PathBuf::from("buck-out/gen/infer-out-a"));
    assert!(project.root.join("buck-out/gen/infer-out-a").is_dir());
    assert_eq!(result.tool_output, "captured buck-out/gen/infer-capture.argsfile");
    assert_eq!(
      project.read("buck-out/gen/infer-capture.argsfile"),
      "-MD\n-MF\nbuck-out/gen/a.o.dep\n-DFOO\n-std=c11\n-x\nc\n-o\nbuck-out/gen/a.o\n-c\nsrc/a.c\n"
    );

    let argv: Vec<String> = project.read("argv.txt").lines().map(str::to_string).collect();
    assert_eq!(
      argv,
      vec![
        "-a".to_string(),
        "capture".to_string(),
        "--project_root".to_string(),
        project.root.to_string_lossy().to_string(),
        "--out".to_string(),
        "buck-out/gen/infer-out-a".to_string(),
        "--".to_string(),
        "clang".to_string(),
        "@buck-out/gen/infer-capture.argsfile".to_string(),
      ]
    );

    let relevance = &result.relevance;
    assert!(relevance.is_relevant(Path::new("src/a.c")));
    assert!(relevance.is_relevant(&project.root.join("include/foo.h")));
    assert!(relevance.is_relevant(Path::new("include/foo.h")));
    assert!(!relevance.is_relevant(&project.root.join("include/unused.h")));
  }

  #[tokio::test]
  #[serial]
  async fn records_results_dir_as_artifact() {
    let project = Project::new();
    project.set_deps("buck-out/gen/a.o: src/a.c\n");

    let result = run_capture(&rule(&project, HeaderVerificationMode::Ignore)).await.unwrap();

    assert_eq!(result.artifacts, vec![PathBuf::from("buck-out/gen/infer-out-a")]);
    assert_eq!(result.dependencies.len(), 1);
    assert_eq!(result.dependencies[0].class, DependencyClass::InTree);
  }

  #[tokio::test]
  #[serial]
  async fn inputs_after_build_matches_run_result() {
    let project = Project::new();
    project.set_deps("buck-out/gen/a.o: src/a.c include/foo.h\n");
    let rule = rule(&project, HeaderVerificationMode::Error);

    let result = run_capture(&rule).await.unwrap();
    let after = rule.inputs_after_build().await.unwrap();

    assert_eq!(after, result.relevance);
  }

  #[tokio::test]
  #[serial]
  async fn warn_mode_keeps_going_without_forbidden_headers() {
    let project = Project::new();
    let outside = project.temp.path().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    let stray = outside.join("stray.h");
    std::fs::write(&stray, "").unwrap();
    project.set_deps(&format!("buck-out/gen/a.o: src/a.c {}\n", stray.display()));

    let result = run_capture(&rule(&project, HeaderVerificationMode::Warn)).await.unwrap();

    assert!(result.relevance.is_relevant(Path::new("src/a.c")));
    assert!(!result.relevance.is_relevant(&stray));
  }

  #[tokio::test]
  #[serial]
  async fn whitelisted_header_is_relevant() {
    let project = Project::new();
    let sdk = project.temp.path().join("sdk/include");
    std::fs::create_dir_all(&sdk).unwrap();
    let sdk = dunce::canonicalize(&sdk).unwrap();
    std::fs::write(sdk.join("sdk.h"), "").unwrap();
    project.set_deps(&format!("buck-out/gen/a.o: src/a.c {}/sdk.h\n", sdk.display()));

    let config = project
      .config(HeaderVerificationMode::Error)
      .with_header_verification(HeaderVerification::new(HeaderVerificationMode::Error).with_whitelist([&sdk]));
    let result = run_capture(&CaptureRule::new(config, invocation())).await.unwrap();

    assert!(result.relevance.is_relevant(&sdk.join("sdk.h")));
  }
}

mod failure {
  use super::*;

  #[tokio::test]
  #[serial]
  async fn tool_exit_code_is_a_tool_run_failure() {
    let project = Project::new();
    project.set_exit_code(3);

    let err = run_capture(&rule(&project, HeaderVerificationMode::Ignore))
      .await
      .unwrap_err();

    assert_eq!(err.phase(), CapturePhase::ToolRun);
    match err {
      cxxcap_lib::capture::CaptureError::Step(StepError::CmdFailed { code, stderr, .. }) => {
        assert_eq!(code, Some(3));
        assert!(stderr.contains("capture failed"));
      }
      other => panic!("expected CmdFailed, got {other:?}"),
    }
  }

  #[tokio::test]
  #[serial]
  async fn missing_tool_is_a_tool_run_failure() {
    let project = Project::new();
    let mut config = project.config(HeaderVerificationMode::Ignore);
    config.infer_bin = project.temp.path().join("no-such-infer").to_string_lossy().to_string();

    let err = run_capture(&CaptureRule::new(config, invocation())).await.unwrap_err();

    assert_eq!(err.phase(), CapturePhase::ToolRun);
    assert!(err.to_string().starts_with("tool run failed:"));
  }

  #[tokio::test]
  #[serial]
  async fn missing_dep_file_is_a_dependency_parse_failure() {
    let project = Project::new();

    let err = run_capture(&rule(&project, HeaderVerificationMode::Ignore))
      .await
      .unwrap_err();

    assert_eq!(err.phase(), CapturePhase::DependencyParse);
    assert!(matches!(
      err,
      cxxcap_lib::capture::CaptureError::DepFile(DepFileError::Missing { .. })
    ));
  }

  #[tokio::test]
  #[serial]
  async fn malformed_dep_file_is_a_dependency_parse_failure() {
    let project = Project::new();
    project.set_deps("buck-out/gen/a.o src/a.c\n");

    let err = run_capture(&rule(&project, HeaderVerificationMode::Ignore))
      .await
      .unwrap_err();

    assert_eq!(err.phase(), CapturePhase::DependencyParse);
  }

  #[tokio::test]
  #[serial]
  async fn forbidden_header_fails_in_error_mode() {
    let project = Project::new();
    let outside = project.temp.path().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    let stray = outside.join("stray.h");
    std::fs::write(&stray, "").unwrap();
    project.set_deps(&format!("buck-out/gen/a.o: src/a.c {}\n", stray.display()));

    let err = run_capture(&rule(&project, HeaderVerificationMode::Error))
      .await
      .unwrap_err();

    assert_eq!(err.phase(), CapturePhase::HeaderVerification);
    let message = err.to_string();
    assert!(message.contains("//:a: src/a.c included an untracked header"), "{message}");
    assert!(message.contains("stray.h"));
  }

  #[tokio::test]
  #[serial]
  async fn unwritable_output_dir_is_a_directory_setup_failure() {
    let project = Project::new();
    project.write_file("buck-out", "not a directory");

    let err = run_capture(&rule(&project, HeaderVerificationMode::Ignore))
      .await
      .unwrap_err();

    assert_eq!(err.phase(), CapturePhase::DirectorySetup);
    assert!(!project.root.join("argv.txt").exists());
  }
}
