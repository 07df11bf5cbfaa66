//! End-to-end tests for RunContext::main: validation gate, routing and exit outcomes

use choria::error::{ChoriaError, Outcome};
use choria::dispatch::RpcRequest;

use crate::integration::test_utils::{
    configuration, context, run_main, FakeDdlSource, FakeDispatcher, FakeResolver,
};

fn catalogue() -> FakeDdlSource {
    FakeDdlSource::with_agents(&[
        ("rpcutil", "General helpful actions", &["ping", "inventory"]),
        ("puppet", "Manage the Puppet Agent", &["status", "runonce"]),
    ])
}

fn echo(request: &RpcRequest) -> Result<String, ChoriaError> {
    Ok(format!("{} {} {}", request.agent, request.action, request.arguments.join(" ")))
}

#[test]
fn test_missing_certificate_is_a_critical_error_that_exits_zero() {
    let ctx = context(
        FakeResolver::new(false),
        catalogue(),
        FakeDispatcher::replying(echo),
    );

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["rpcutil", "ping"]));
    let outcome = outcome.unwrap();

    assert_eq!(outcome.exit_code(), 0);
    assert!(matches!(outcome, Outcome::UserFacingFailure(_)));
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Encountered a critical error:"));
    assert!(stderr.contains("critical error"));
    assert!(stderr.contains("rip.mcollective"));
    assert!(stderr.contains("choria request_cert"));
}

#[test]
fn test_validate_matrix() {
    let cases = [
        (false, false, true),
        (false, true, false),
        (true, false, false),
        (true, true, false),
    ];

    for (show_config, has_cert, expect_error) in cases {
        let ctx = context(
            FakeResolver::new(has_cert),
            catalogue(),
            FakeDispatcher::replying(echo),
        );
        let mut config = configuration(&[]);
        config.show_config = show_config;

        let result = ctx.validate(&config);
        assert_eq!(
            matches!(result, Err(ChoriaError::User(_))),
            expect_error,
            "show_config={} has_cert={}",
            show_config,
            has_cert
        );
        assert!(expect_error || result.is_ok());
    }
}

#[test]
fn test_dispatch_result_is_printed_verbatim() {
    let dispatcher = FakeDispatcher::replying(echo);
    let requests = dispatcher.requests.clone();
    let ctx = context(FakeResolver::new(true), catalogue(), dispatcher);

    let (outcome, stdout, stderr) = run_main(
        &ctx,
        &configuration(&["--environment", "staging", "rpcutil", "ping", "--limit", "5"]),
    );

    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert_eq!(stdout, "rpcutil ping --limit 5\n");
    assert!(stderr.is_empty());

    let requests = requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].environment, "staging");
}

#[test]
fn test_selectors_after_agent_reach_the_dispatcher() {
    let dispatcher = FakeDispatcher::replying(echo);
    let requests = dispatcher.requests.clone();
    let ctx = context(FakeResolver::new(true), catalogue(), dispatcher);

    let (outcome, stdout, _) = run_main(
        &ctx,
        &configuration(&["rpcutil", "--environment", "staging", "ping", "--instance", "eu1"]),
    );

    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert_eq!(stdout, "rpcutil ping \n");

    let requests = requests.borrow();
    assert_eq!(requests[0].environment, "staging");
    assert_eq!(requests[0].instance.as_deref(), Some("eu1"));
}

#[test]
fn test_abort_exits_one_without_stderr() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| Err(ChoriaError::Abort("interrupted".to_string()))),
    );

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["puppet", "runonce"]));
    let outcome = outcome.unwrap();

    assert_eq!(outcome, Outcome::FatalAbort);
    assert_eq!(outcome.exit_code(), 1);
    assert!(stdout.is_empty());
    assert!(stderr.is_empty());
}

#[test]
fn test_partial_output_is_printed_before_the_failure() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| {
            Err(ChoriaError::RequestFailed {
                output: "node1: OK".to_string(),
                reason: "1 of 2 nodes failed".to_string(),
            })
        }),
    );

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["rpcutil", "ping"]));

    assert_eq!(
        outcome.unwrap(),
        Outcome::UserFacingFailure("1 of 2 nodes failed".to_string())
    );
    assert_eq!(stdout, "node1: OK\n");
    assert_eq!(stderr, "Encountered a critical error: 1 of 2 nodes failed\n");
}

#[test]
fn test_partial_output_is_printed_before_an_abort() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| {
            Err(ChoriaError::RequestAborted {
                output: "node1: OK".to_string(),
                reason: "interrupted".to_string(),
            })
        }),
    );

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["puppet", "runonce"]));

    assert_eq!(outcome.unwrap(), Outcome::FatalAbort);
    assert_eq!(stdout, "node1: OK\n");
    assert!(stderr.is_empty());
}

#[test]
fn test_other_errors_propagate() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| Err(ChoriaError::Dispatch("broker gone".to_string()))),
    );

    let (outcome, _, stderr) = run_main(&ctx, &configuration(&["puppet", "status"]));
    assert!(matches!(outcome, Err(ChoriaError::Dispatch(_))));
    assert!(stderr.is_empty());
}

#[test]
fn test_no_agent_prints_overview() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| panic!("dispatcher must not be called")),
    );

    let (outcome, stdout, _) = run_main(&ctx, &configuration(&[]));
    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert!(stdout.starts_with(choria::cli::USAGE));
    assert!(stdout.contains("  rpcutil       General helpful actions"));
    assert!(stdout.contains("  puppet        Manage the Puppet Agent"));
    assert!(stdout.contains("--show-config"));
}

#[test]
fn test_agent_without_action_prints_agent_help() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| panic!("dispatcher must not be called")),
    );

    let (_, stdout, _) = run_main(&ctx, &configuration(&["puppet"]));
    assert!(stdout.starts_with("choria puppet <action>"));
    assert!(stdout.contains("runonce"));

    let (_, stdout, _) = run_main(&ctx, &configuration(&["rpcutil", "ping", "--help"]));
    assert!(stdout.starts_with("choria rpcutil <action>"));
}

#[test]
fn test_unknown_agent_and_action_are_user_errors() {
    let ctx = context(
        FakeResolver::new(true),
        catalogue(),
        FakeDispatcher::replying(|_| panic!("dispatcher must not be called")),
    );

    let (outcome, _, stderr) = run_main(&ctx, &configuration(&["nosuch"]));
    assert_eq!(outcome.unwrap().exit_code(), 0);
    assert!(stderr.contains("Unknown agent `nosuch`"));

    let (_, _, stderr) = run_main(&ctx, &configuration(&["puppet", "explode"]));
    assert!(stderr.contains("Agent `puppet` has no action `explode`"));
}

#[test]
fn test_uncatalogued_agent_is_still_dispatched() {
    let dispatcher = FakeDispatcher::replying(echo);
    let requests = dispatcher.requests.clone();
    let ctx = context(FakeResolver::new(true), catalogue(), dispatcher);

    let (outcome, stdout, _) = run_main(&ctx, &configuration(&["nrpe", "runcommand"]));
    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert!(stdout.starts_with("nrpe runcommand"));
    assert_eq!(requests.borrow().len(), 1);
}

#[test]
fn test_catalogue_enumerated_once_per_context() {
    let source = catalogue();
    let enumerations = source.enumerations.clone();
    let ctx = context(FakeResolver::new(true), source, FakeDispatcher::replying(echo));

    let _ = ctx.overview_text();
    let _ = run_main(&ctx, &configuration(&["puppet", "status"]));
    let _ = run_main(&ctx, &configuration(&[]));
    assert_eq!(ctx.agent_catalogue().len(), 2);

    assert_eq!(enumerations.get(), 1);
}

#[test]
fn test_broken_ddl_is_left_out_of_overview() {
    let mut source = catalogue();
    source
        .ddls
        .push(("broken".to_string(), Err("unexpected token".to_string())));
    let ctx = context(FakeResolver::new(true), source, FakeDispatcher::replying(echo));

    let names: Vec<&str> = ctx.agent_catalogue().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["rpcutil", "puppet"]);
    assert!(!ctx.overview_text().contains("broken"));
}
