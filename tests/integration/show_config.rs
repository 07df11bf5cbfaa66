//! Integration tests for the --show-config report

use choria::error::{ChoriaError, Outcome};
use std::collections::BTreeMap;

use crate::integration::test_utils::{
    configuration, context, run_main, FakeDdlSource, FakeDispatcher, FakeResolver,
};

fn no_dispatch() -> FakeDispatcher {
    FakeDispatcher::replying(|_| panic!("dispatcher must not be called"))
}

#[test]
fn test_report_contents_without_certificate() {
    let resolver = FakeResolver::new(false);
    let ctx = context(resolver, FakeDdlSource::with_agents(&[]), no_dispatch());

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["--show-config"]));
    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert!(stderr.is_empty());

    assert!(stdout.starts_with("Active Choria configuration:"));
    assert!(stdout.contains("      Choria Version: 0.1.0"));
    assert!(stdout.contains("  Client Config File: /home/rip/.config/choria/client.toml"));
    assert!(stdout.contains("  Active Config File: /etc/choria/client.toml"));
    assert!(stdout.contains("   Plugin Config Dir: /etc/choria/plugin.d"));
    assert!(stdout.contains("   Using SRV Records: true"));
    assert!(stdout.contains("          SRV Domain: example.net"));
    assert!(stdout.contains("  Middleware Servers: nats1.example.net:4222, puppet:42222"));
    assert!(stdout.contains("       Puppet Server: puppet.example.net:8140"));
    assert!(stdout.contains("     PuppetCA Server: ca.example.net:8140"));
    assert!(stdout.contains("     PuppetDB Server: puppetdb.example.net:8081"));
    assert!(stdout.contains("     Valid SSL Setup: yes"));
    assert!(stdout.contains("            Certname: rip.mcollective"));
    assert!(stdout.contains("rip.mcollective.pem (absent)"));
    assert!(stdout.contains("certs/ca.pem (found)"));
    assert!(stdout.contains("  No custom Choria settings found in your configuration files"));
}

#[test]
fn test_disconnect_precedes_every_query() {
    let resolver = FakeResolver::new(true);
    let calls = resolver.calls.clone();
    let ctx = context(resolver, FakeDdlSource::with_agents(&[]), no_dispatch());

    let config = configuration(&["--show_config"]);
    let (outcome, _, _) = run_main(&ctx, &config);
    assert_eq!(outcome.unwrap(), Outcome::Completed);

    let calls = calls.borrow();
    assert_eq!(calls.first().map(String::as_str), Some("disconnect"));
    assert!(calls.len() > 1);
    assert_eq!(calls.iter().filter(|c| *c == "disconnect").count(), 1);
}

#[test]
fn test_ssl_check_failure_reports_invalid() {
    let mut resolver = FakeResolver::new(true);
    resolver.ssl_check = || Err(ChoriaError::User("CA missing".to_string()));
    let ctx = context(resolver, FakeDdlSource::with_agents(&[]), no_dispatch());

    let (outcome, stdout, stderr) = run_main(&ctx, &configuration(&["--show-config"]));
    assert_eq!(outcome.unwrap(), Outcome::Completed);
    assert!(stdout.contains("     Valid SSL Setup: no run 'choria request_cert'"));
    assert!(stderr.is_empty());
}

#[test]
fn test_choria_settings_are_right_aligned() {
    let mut resolver = FakeResolver::new(true);
    resolver.settings = BTreeMap::from([
        ("choria.srv_domain".to_string(), "example.net".to_string()),
        ("choria.middleware_hosts".to_string(), "nats1:4222".to_string()),
        ("rpcutil.enabled".to_string(), "1".to_string()),
    ]);
    let ctx = context(resolver, FakeDdlSource::with_agents(&[]), no_dispatch());

    let report = ctx.show_config(false).unwrap();
    assert!(report.contains("  choria.middleware_hosts: nats1:4222"));
    assert!(report.contains("        choria.srv_domain: example.net"));
    assert!(!report.contains("rpcutil.enabled"));
    assert!(!report.contains("No custom Choria settings"));
}
