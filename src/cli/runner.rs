//! Orchestration core of the CLI: mode dispatch, option validation,
//! foreign-option hygiene, and the batch execution loop.
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{CommandFactory, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use doccheck::core::check::{Check, ReportNaming, build_pipeline};
use doccheck::core::params::{BatchParams, DaemonParams, RunMode, default_worker_count};
use doccheck::core::targets::resolve_targets;
use doccheck::daemon::Daemon;
use doccheck::io::{DocumentInput, Scenarios};
use doccheck::types::RunStatus;

use super::args::CliArgs;
use super::errors::AppError;

/// Entry point of one invocation. Zero arguments, the help flag, and
/// argument grammar errors all display usage and return `Exited(0)`;
/// the daemon flag selects daemon mode unconditionally; everything else
/// runs the batch and maps its verdict to the exit code contract.
pub fn run<I, T>(argv: I) -> RunStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if argv.len() <= 1 {
        print_help();
        return RunStatus::Exited(0);
    }
    let args = match CliArgs::try_parse_from(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error processing command line arguments: {e}");
            print_help();
            return RunStatus::Exited(0);
        }
    };
    if args.help {
        print_help();
        return RunStatus::Exited(0);
    }
    init_logging(args.debug);
    dispatch(&args)
}

fn dispatch(args: &CliArgs) -> RunStatus {
    match determine_mode(args) {
        Ok(RunMode::Daemon(params)) => run_daemon(args, params),
        Ok(RunMode::Batch(params)) => RunStatus::Exited(run_batch(args, params)),
        Err(e) => {
            report_error(args, &e);
            RunStatus::Exited(-1)
        }
    }
}

/// Decide the run mode first, then validate only the fields relevant to the
/// chosen variant. Options foreign to that mode warn and are dropped.
fn determine_mode(args: &CliArgs) -> Result<RunMode, AppError> {
    if args.daemon {
        warn_unused_options(args, true);
        Ok(RunMode::Daemon(daemon_params(args)?))
    } else {
        warn_unused_options(args, false);
        Ok(RunMode::Batch(batch_params(args)?))
    }
}

fn run_daemon(args: &CliArgs, params: DaemonParams) -> RunStatus {
    match start_daemon(args, params) {
        Ok(()) => RunStatus::DaemonStarted,
        Err(e) => {
            report_error(args, &e);
            RunStatus::Exited(-1)
        }
    }
}

fn start_daemon(args: &CliArgs, params: DaemonParams) -> Result<(), AppError> {
    let scenarios = load_scenarios(args)?;
    let mut daemon = Daemon::new(params);
    if args.disable_gui {
        daemon.set_gui_enabled(false);
    }
    daemon.start(scenarios)?;
    Ok(())
}

fn run_batch(args: &CliArgs, params: BatchParams) -> i32 {
    match process_targets(args, params) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            report_error(args, &e);
            -1
        }
    }
}

/// The batch executor: setup, then one strict sequential pass over the
/// targets. A failure anywhere aborts the whole run; there is no per-target
/// recovery.
fn process_targets(args: &CliArgs, params: BatchParams) -> Result<bool, AppError> {
    let setup = Instant::now();
    let scenarios = load_scenarios(args)?;
    let mut check = Check::new(scenarios);
    check.add_steps(build_pipeline(&params)?);
    info!("Setup completed in {}ms", setup.elapsed().as_millis());

    let targets = resolve_targets(&args.targets)?;
    let processing = Instant::now();
    for target in &targets {
        let input = DocumentInput::read(target)?;
        check.check_input(input)?;
    }
    let result = check.print_and_evaluate();
    info!(
        "Processing {} object(s) completed in {}ms",
        targets.len(),
        processing.elapsed().as_millis()
    );
    Ok(result)
}

fn batch_params(args: &CliArgs) -> Result<BatchParams, AppError> {
    let output_directory = determine_output_directory(args)?;
    let assertions_file = option_value("check-assertions", args.check_assertions.as_deref(), false)?
        .map(Path::to_path_buf);
    Ok(BatchParams {
        output_directory,
        print: args.print,
        extract_html: args.html,
        serialize_report_input: args.serialize_report_input,
        memory_stats: args.memory_stats,
        assertions_file,
        naming: ReportNaming::new(args.report_prefix.clone(), args.report_postfix.clone()),
    })
}

fn daemon_params(args: &CliArgs) -> Result<DaemonParams, AppError> {
    let host = match option_value("host", args.host.as_deref(), false)? {
        Some(host) => host.to_string(),
        None => "localhost".to_string(),
    };
    Ok(DaemonParams {
        host,
        port: args.port.unwrap_or(8080),
        workers: args.threads.unwrap_or_else(default_worker_count),
        gui_enabled: true,
    })
}

/// The one reusable option validation routine: a present option must carry
/// a non-blank value, a required option must be present.
fn option_value<'a, T>(
    option: &'static str,
    value: Option<&'a T>,
    required: bool,
) -> Result<Option<&'a T>, AppError>
where
    T: AsRef<OsStr> + ?Sized,
{
    match value {
        Some(v) if v.as_ref().to_string_lossy().trim().is_empty() => {
            Err(AppError::BlankOptionValue { option })
        }
        Some(v) => Ok(Some(v)),
        None if required => Err(AppError::MissingOption { option }),
        None => Ok(None),
    }
}

fn determine_definition(args: &CliArgs) -> Result<PathBuf, AppError> {
    let path = option_value("scenarios", args.scenarios.as_deref(), true)?
        .ok_or(AppError::MissingOption { option: "scenarios" })?;
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(AppError::InvalidScenarioDefinition {
            path: path.display().to_string(),
        })
    }
}

fn determine_repository(args: &CliArgs) -> Result<Option<PathBuf>, AppError> {
    match option_value("repository", args.repository.as_deref(), false)? {
        Some(dir) if dir.is_dir() => Ok(Some(dir.to_path_buf())),
        Some(dir) => Err(AppError::InvalidRepository {
            path: dir.display().to_string(),
        }),
        None => Ok(None),
    }
}

fn load_scenarios(args: &CliArgs) -> Result<Scenarios, AppError> {
    let definition = determine_definition(args)?;
    let repository = determine_repository(args)?;
    Ok(Scenarios::load(&definition, repository.as_deref())?)
}

fn determine_output_directory(args: &CliArgs) -> Result<PathBuf, AppError> {
    match option_value("output-directory", args.output_directory.as_deref(), false)? {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|_| AppError::InvalidOutputDirectory {
                    path: dir.display().to_string(),
                })?;
            }
            if !dir.is_dir() {
                return Err(AppError::InvalidOutputDirectory {
                    path: dir.display().to_string(),
                });
            }
            Ok(dir.to_path_buf())
        }
        // empty path: artifacts land relative to the cwd
        None => Ok(PathBuf::new()),
    }
}

/// One warning line per option foreign to the selected mode; never fatal.
fn warn_unused_options(args: &CliArgs, daemon: bool) {
    let batch_only = [
        ("print", args.print),
        ("output-directory", args.output_directory.is_some()),
        ("html", args.html),
        ("debug", args.debug),
        ("serialize-report-input", args.serialize_report_input),
        ("check-assertions", args.check_assertions.is_some()),
        ("report-prefix", args.report_prefix.is_some()),
        ("report-postfix", args.report_postfix.is_some()),
        ("memory-stats", args.memory_stats),
    ];
    let daemon_only = [
        ("host", args.host.is_some()),
        ("port", args.port.is_some()),
        ("threads", args.threads.is_some()),
        ("disable-gui", args.disable_gui),
    ];
    let (foreign, mode): (&[(&str, bool)], &str) = if daemon {
        (&batch_only, "daemon")
    } else {
        (&daemon_only, "batch")
    };
    for (option, present) in foreign {
        if *present {
            warn!("The option {} is not available in {} mode", option, mode);
        }
    }
    if daemon && !args.targets.is_empty() {
        info!("Ignoring test targets in daemon mode");
    }
}

fn report_error(args: &CliArgs, e: &AppError) {
    if args.debug {
        error!("{:?}", e);
    } else {
        error!("{}", e);
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn print_help() {
    let mut cmd = CliArgs::command();
    if let Err(e) = cmd.print_help() {
        eprintln!("Failed to print help: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("scenarios.xml");
        fs::write(
            &definition,
            r#"<scenarios><scenario name="order"><match root="order"/></scenario></scenarios>"#,
        )
        .unwrap();
        let path = definition.to_string_lossy().into_owned();
        (dir, path)
    }

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn zero_arguments_show_help() {
        assert_eq!(run(["doccheck"]), RunStatus::Exited(0));
    }

    #[test]
    fn help_flag_short_circuits() {
        assert_eq!(run(["doccheck", "--help"]), RunStatus::Exited(0));
        assert_eq!(run(["doccheck", "-?"]), RunStatus::Exited(0));
        // help wins even when combined with otherwise-fatal options
        assert_eq!(run(["doccheck", "-?", "missing.xml"]), RunStatus::Exited(0));
    }

    #[test]
    fn parse_errors_degrade_to_help() {
        assert_eq!(run(["doccheck", "--bogus"]), RunStatus::Exited(0));
        assert_eq!(run(["doccheck", "-P", "nope"]), RunStatus::Exited(0));
    }

    #[test]
    fn missing_scenarios_is_a_fatal_configuration_error() {
        assert_eq!(run(["doccheck", "whatever.xml"]), RunStatus::Exited(-1));
    }

    #[test]
    fn blank_scenarios_value_is_a_fatal_configuration_error() {
        assert_eq!(run(["doccheck", "-s", "", "x.xml"]), RunStatus::Exited(-1));
        assert_eq!(run(["doccheck", "-s", "  ", "x.xml"]), RunStatus::Exited(-1));
    }

    #[test]
    fn batch_accept_and_reject_exit_codes() {
        let (dir, definition) = fixture();
        let good = dir.path().join("good.xml");
        fs::write(&good, "<order/>").unwrap();
        let bad = dir.path().join("bad.xml");
        fs::write(&bad, "<unknown/>").unwrap();
        let out = dir.path().join("out");

        let status = run([
            "doccheck",
            "-s",
            definition.as_str(),
            "-o",
            out.to_str().unwrap(),
            good.to_str().unwrap(),
        ]);
        assert_eq!(status, RunStatus::Exited(0));
        assert!(out.join("good-report.json").exists());

        let status = run([
            "doccheck",
            "-s",
            definition.as_str(),
            "-o",
            out.to_str().unwrap(),
            bad.to_str().unwrap(),
        ]);
        assert_eq!(status, RunStatus::Exited(1));
        assert!(out.join("bad-report.json").exists());
    }

    #[test]
    fn no_targets_is_a_fatal_error() {
        let (dir, definition) = fixture();
        let out = dir.path().join("out");
        let status = run([
            "doccheck",
            "-s",
            definition.as_str(),
            "-o",
            out.to_str().unwrap(),
            "/no/such/target.xml",
        ]);
        assert_eq!(status, RunStatus::Exited(-1));
    }

    #[test]
    fn invalid_scenario_definition_path_is_fatal() {
        let status = run(["doccheck", "-s", "/no/such/scenarios.xml", "x.xml"]);
        assert_eq!(status, RunStatus::Exited(-1));
    }

    #[test]
    fn daemon_mode_builds_daemon_config_without_target_resolution() {
        // positional targets are ignored by mode selection; defaults apply
        let args = parse(&["doccheck", "-D", "-s", "scenarios.xml", "ignored.xml"]);
        let mode = determine_mode(&args).unwrap();
        match mode {
            RunMode::Daemon(params) => {
                assert_eq!(params.host, "localhost");
                assert_eq!(params.port, 8080);
                assert!(params.workers >= 1);
                assert!(params.gui_enabled);
            }
            RunMode::Batch(_) => panic!("daemon flag must select daemon mode"),
        }
    }

    #[test]
    fn daemon_config_honors_overrides() {
        let args = parse(&[
            "doccheck", "-D", "-s", "scenarios.xml", "-H", "0.0.0.0", "-P", "9090", "-T", "2",
        ]);
        match determine_mode(&args).unwrap() {
            RunMode::Daemon(params) => {
                assert_eq!(params.host, "0.0.0.0");
                assert_eq!(params.port, 9090);
                assert_eq!(params.workers, 2);
            }
            RunMode::Batch(_) => panic!("daemon flag must select daemon mode"),
        }
    }

    #[test]
    fn blank_host_is_a_configuration_error() {
        let args = parse(&["doccheck", "-D", "-s", "scenarios.xml", "-H", " "]);
        assert!(matches!(
            determine_mode(&args),
            Err(AppError::BlankOptionValue { option: "host" })
        ));
    }

    #[test]
    fn output_directory_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let args = parse(&[
            "doccheck",
            "-s",
            "scenarios.xml",
            "-o",
            out.to_str().unwrap(),
            "x.xml",
        ]);

        let first = determine_output_directory(&args).unwrap();
        assert!(first.is_dir());
        // second resolution must not error and must not recreate
        let second = determine_output_directory(&args).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_directory_over_a_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let args = parse(&[
            "doccheck",
            "-s",
            "scenarios.xml",
            "-o",
            blocker.to_str().unwrap(),
            "x.xml",
        ]);

        assert!(matches!(
            determine_output_directory(&args),
            Err(AppError::InvalidOutputDirectory { .. })
        ));
    }

    #[test]
    fn default_output_directory_is_cwd_relative() {
        let args = parse(&["doccheck", "-s", "scenarios.xml", "x.xml"]);
        assert_eq!(determine_output_directory(&args).unwrap(), PathBuf::new());
    }

    #[test]
    fn repository_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("repo.txt");
        fs::write(&file, "x").unwrap();
        let args = parse(&[
            "doccheck",
            "-s",
            "scenarios.xml",
            "-r",
            file.to_str().unwrap(),
            "x.xml",
        ]);

        assert!(matches!(
            determine_repository(&args),
            Err(AppError::InvalidRepository { .. })
        ));
    }

    #[test]
    fn assertions_mismatch_fails_the_run() {
        let (dir, definition) = fixture();
        let good = dir.path().join("good.xml");
        fs::write(&good, "<order/>").unwrap();
        let assertions = dir.path().join("assertions.xml");
        fs::write(
            &assertions,
            r#"<assertions><assertion target="good.xml" expect="reject"/></assertions>"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let status = run([
            "doccheck",
            "-s",
            definition.as_str(),
            "-o",
            out.to_str().unwrap(),
            "-c",
            assertions.to_str().unwrap(),
            good.to_str().unwrap(),
        ]);
        assert_eq!(status, RunStatus::Exited(1));
    }

    #[test]
    fn missing_assertions_file_does_not_fail_the_run() {
        let (dir, definition) = fixture();
        let good = dir.path().join("good.xml");
        fs::write(&good, "<order/>").unwrap();
        let out = dir.path().join("out");

        let status = run([
            "doccheck",
            "-s",
            definition.as_str(),
            "-o",
            out.to_str().unwrap(),
            "-c",
            "/no/such/assertions.xml",
            good.to_str().unwrap(),
        ]);
        assert_eq!(status, RunStatus::Exited(0));
    }
}
