//! Property-based tests for agent/action extraction

use choria::cli::{extract_positionals, parse};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn flag() -> impl Strategy<Value = String> {
    "--?[a-z][a-z0-9-]{0,8}".prop_filter("reserved flags are lifted out", |f| {
        !matches!(f.as_str(), "--help" | "-h" | "--show-config" | "--show_config")
    })
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![word(), flag()]
}

/// With two or more positional words the first two become agent and action and
/// everything else keeps its order.
#[test]
fn test_first_two_positionals_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&proptest::collection::vec(token(), 0..12), |words| {
            let positional: Vec<&String> =
                words.iter().filter(|w| !w.starts_with('-')).collect();
            let p = extract_positionals(&words);

            if positional.len() >= 2 {
                assert_eq!(p.agent.as_ref(), Some(positional[0]));
                assert_eq!(p.action.as_ref(), Some(positional[1]));
            }

            let mut expected = words.clone();
            for taken in [&p.agent, &p.action].into_iter().flatten() {
                let idx = expected.iter().position(|w| w == taken).unwrap();
                expected.remove(idx);
            }
            assert_eq!(p.remaining, expected);
            assert!(!p.show_config);

            Ok(())
        })
        .unwrap();
}

/// Fewer than two positional words leave the missing fields as `None`.
#[test]
fn test_unset_fields_are_none_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(proptest::option::of(word()), proptest::collection::vec(flag(), 0..4)),
            |(agent, flags)| {
                let mut argv = vec!["choria".to_string()];
                if let Some(ref agent) = agent {
                    argv.push(agent.clone());
                }
                argv.extend(flags.iter().cloned());

                let config = match parse(argv) {
                    Ok(config) => config,
                    // clap may reject a leading unknown flag; nothing to check then
                    Err(_) => return Ok(()),
                };

                assert_eq!(config.agent, agent);
                assert_eq!(config.action, None);
                Ok(())
            },
        )
        .unwrap();
}
