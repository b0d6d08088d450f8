//! engine::planner
//!
//! Derives the pipeline plan from environment flags and configuration.
//!
//! # Branch selection
//!
//! `CHECK_DOCS` picks the documentation path; otherwise the test path runs.
//! Exactly one of the two is ever planned. `CHECK_FORMATTING` inserts the
//! formatting check into the test path, before the test suite, so a
//! formatting failure stops the run before any test executes.
//!
//! # Invariants
//!
//! - Pure: no I/O, no environment reads, no process spawning
//! - Deterministic: same flags and config produce the same plan
//! - The common prefix (revision, interpreter info, tool upgrade, sdist
//!   build + install) is identical for both branches

use std::path::Path;

use crate::core::config::schema::PipelineConfig;
use crate::core::flags::EnvFlags;

use super::plan::{Plan, PlanError, PlanStep};

/// Build the pipeline plan for the given flags and configuration.
///
/// # Errors
///
/// Returns `PlanError::MissingConfig` when the test path is selected but
/// no package import name is configured.
pub fn build_plan(flags: &EnvFlags, config: &PipelineConfig) -> Result<Plan, PlanError> {
    let branch = if flags.check_docs { "docs" } else { "tests" };
    let mut plan = Plan::new(branch).with_steps(common_prefix(config));

    if flags.check_docs {
        plan = plan.with_steps(docs_branch(config));
    } else {
        plan = plan.with_steps(test_branch(flags, config)?);
    }

    Ok(plan)
}

/// Steps shared by both branches.
fn common_prefix(config: &PipelineConfig) -> Vec<PlanStep> {
    vec![
        PlanStep::PrintRevision,
        PlanStep::PrintInterpreterInfo,
        PlanStep::Exec {
            program: config.python.clone(),
            args: strings(&["-m", "pip", "install", "--upgrade", "pip", "setuptools", "wheel"]),
            description: "upgrade packaging tools".to_string(),
        },
        PlanStep::Exec {
            program: config.python.clone(),
            args: vec![
                "setup.py".to_string(),
                "sdist".to_string(),
                format!("--formats={}", config.build.sdist_format),
            ],
            description: "build source distribution".to_string(),
        },
        PlanStep::InstallSdist {
            dist_dir: config.build.dist_dir.clone(),
        },
    ]
}

/// Documentation branch: toolchain install, changelog check, HTML build.
fn docs_branch(config: &PipelineConfig) -> Vec<PlanStep> {
    vec![
        pip_install_requirements(
            config,
            &config.docs.requirements,
            "install documentation toolchain",
        ),
        PlanStep::Exec {
            program: "towncrier".to_string(),
            args: vec!["--draft".to_string()],
            description: "validate pending changelog fragments".to_string(),
        },
        PlanStep::Exec {
            program: "sphinx-build".to_string(),
            args: vec![
                // -n flags missing cross-references, -W promotes warnings to errors
                "-nW".to_string(),
                "-b".to_string(),
                "html".to_string(),
                path_string(&config.docs.source),
                path_string(&config.docs.build_dir),
            ],
            description: "build HTML documentation".to_string(),
        },
    ]
}

/// Test branch: dependency install, optional formatting check, locate the
/// installed copy, run the suite, upload coverage.
fn test_branch(flags: &EnvFlags, config: &PipelineConfig) -> Result<Vec<PlanStep>, PlanError> {
    let package = config
        .package
        .as_deref()
        .ok_or_else(|| PlanError::MissingConfig("package (required for the test path)".into()))?;

    let mut steps = vec![pip_install_requirements(
        config,
        &config.tests.requirements,
        "install test dependencies",
    )];

    if flags.check_formatting {
        steps.push(formatting_step(config, package));
    }

    steps.push(PlanStep::LocateInstallDir {
        package: package.to_string(),
    });
    steps.push(PlanStep::RunTests {
        junit_path: config.tests.junit_path.clone(),
        coverage_config: config.tests.coverage_config.clone(),
        faulthandler_timeout: config.tests.faulthandler_timeout,
        run_slow: config.tests.run_slow,
        extra_args: config.tests.extra_args.clone(),
    });
    steps.push(PlanStep::UploadCoverage {
        command: config.coverage.upload_command.clone(),
        skip_versions: config.coverage.skip_versions.clone(),
    });

    Ok(steps)
}

/// The formatting check: configured argv, or the yapf default.
fn formatting_step(config: &PipelineConfig, package: &str) -> PlanStep {
    let argv = if config.formatting.command.is_empty() {
        vec![
            "yapf".to_string(),
            "-rpd".to_string(),
            "setup.py".to_string(),
            package.to_string(),
        ]
    } else {
        config.formatting.command.clone()
    };

    PlanStep::Exec {
        program: argv[0].clone(),
        args: argv[1..].to_vec(),
        description: "check formatting".to_string(),
    }
}

fn pip_install_requirements(
    config: &PipelineConfig,
    requirements: &Path,
    description: &str,
) -> PlanStep {
    PlanStep::Exec {
        program: config.python.clone(),
        args: vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            "-r".to_string(),
            path_string(requirements),
        ],
        description: description.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::schema::FormattingConfig;

    fn config_with_package() -> PipelineConfig {
        PipelineConfig {
            package: Some("trio".to_string()),
            ..Default::default()
        }
    }

    fn flags(check_docs: bool, check_formatting: bool) -> EnvFlags {
        EnvFlags {
            check_docs,
            check_formatting,
        }
    }

    fn descriptions(plan: &Plan) -> Vec<String> {
        plan.steps.iter().map(|s| s.description()).collect()
    }

    #[test]
    fn docs_flag_selects_docs_branch_only() {
        let plan = build_plan(&flags(true, false), &config_with_package()).unwrap();
        assert_eq!(plan.command, "docs");

        let descs = descriptions(&plan);
        assert!(descs.iter().any(|d| d.contains("documentation")));
        assert!(!descs.iter().any(|d| d.contains("test")));
        assert!(!descs.iter().any(|d| d.contains("coverage")));
    }

    #[test]
    fn unset_docs_flag_selects_test_branch_only() {
        let plan = build_plan(&flags(false, false), &config_with_package()).unwrap();
        assert_eq!(plan.command, "tests");

        let descs = descriptions(&plan);
        assert!(descs.iter().any(|d| d.contains("test suite")));
        assert!(descs.iter().any(|d| d.contains("coverage")));
        assert!(!descs.iter().any(|d| d.contains("documentation")));
        assert!(!descs.iter().any(|d| d.contains("changelog")));
    }

    #[test]
    fn common_prefix_is_shared_and_ordered() {
        for docs in [true, false] {
            let plan = build_plan(&flags(docs, false), &config_with_package()).unwrap();
            let descs = descriptions(&plan);
            assert_eq!(descs[0], "print workspace revision");
            assert_eq!(descs[1], "print interpreter version and pointer width");
            assert_eq!(descs[2], "upgrade packaging tools");
            assert_eq!(descs[3], "build source distribution");
            assert_eq!(descs[4], "install package from source distribution");
        }
    }

    #[test]
    fn changelog_check_precedes_docs_build() {
        let plan = build_plan(&flags(true, false), &config_with_package()).unwrap();
        let descs = descriptions(&plan);

        let changelog = descs.iter().position(|d| d.contains("changelog")).unwrap();
        let build = descs
            .iter()
            .position(|d| d.contains("HTML documentation"))
            .unwrap();
        assert!(changelog < build);
    }

    #[test]
    fn formatting_check_is_opt_in_and_precedes_tests() {
        let without = build_plan(&flags(false, false), &config_with_package()).unwrap();
        assert!(!descriptions(&without)
            .iter()
            .any(|d| d.contains("formatting")));

        let with = build_plan(&flags(false, true), &config_with_package()).unwrap();
        let descs = descriptions(&with);
        let fmt = descs.iter().position(|d| d.contains("formatting")).unwrap();
        let tests = descs.iter().position(|d| d.contains("test suite")).unwrap();
        assert!(fmt < tests);
    }

    #[test]
    fn formatting_flag_is_ignored_on_docs_branch() {
        let plan = build_plan(&flags(true, true), &config_with_package()).unwrap();
        assert!(!descriptions(&plan).iter().any(|d| d.contains("formatting")));
    }

    #[test]
    fn default_formatting_command_is_yapf_over_package() {
        let plan = build_plan(&flags(false, true), &config_with_package()).unwrap();
        let step = plan
            .steps
            .iter()
            .find(|s| s.description() == "check formatting")
            .unwrap();

        match step {
            PlanStep::Exec { program, args, .. } => {
                assert_eq!(program, "yapf");
                assert_eq!(args, &["-rpd", "setup.py", "trio"]);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn configured_formatting_command_is_used_verbatim() {
        let mut config = config_with_package();
        config.formatting = FormattingConfig {
            command: vec!["black".to_string(), "--check".to_string(), ".".to_string()],
        };

        let plan = build_plan(&flags(false, true), &config).unwrap();
        let step = plan
            .steps
            .iter()
            .find(|s| s.description() == "check formatting")
            .unwrap();

        match step {
            PlanStep::Exec { program, args, .. } => {
                assert_eq!(program, "black");
                assert_eq!(args, &["--check", "."]);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_branch_requires_package() {
        let config = PipelineConfig::default();
        let err = build_plan(&flags(false, false), &config).unwrap_err();
        assert!(matches!(err, PlanError::MissingConfig(_)));

        // The docs branch never imports the package
        build_plan(&flags(true, false), &config).unwrap();
    }

    #[test]
    fn locate_precedes_tests_precedes_upload() {
        let plan = build_plan(&flags(false, false), &config_with_package()).unwrap();
        let descs = descriptions(&plan);

        let locate = descs.iter().position(|d| d.contains("locate")).unwrap();
        let tests = descs.iter().position(|d| d.contains("test suite")).unwrap();
        let upload = descs.iter().position(|d| d.contains("coverage")).unwrap();
        assert!(locate < tests);
        assert!(tests < upload);
    }

    #[test]
    fn sdist_format_flows_into_build_step() {
        let mut config = config_with_package();
        config.build.sdist_format = "gztar".to_string();

        let plan = build_plan(&flags(false, false), &config).unwrap();
        let build = plan
            .steps
            .iter()
            .find(|s| s.description() == "build source distribution")
            .unwrap();
        match build {
            PlanStep::Exec { args, .. } => {
                assert!(args.contains(&"--formats=gztar".to_string()));
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn plans_are_deterministic() {
        let config = config_with_package();
        let a = build_plan(&flags(false, true), &config).unwrap();
        let b = build_plan(&flags(false, true), &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
    }
}
