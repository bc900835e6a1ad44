//! Integration tests for Binix CSP
//!
//! These tests drive the public API end to end: header text in, policy
//! decisions out.

use binix_csp::{
    CspError, MediaType, ParseErrorKind, ParserConfig, Policy, SchemeHostPortTriple,
    SharedWarnings, SourceExpression, SourceListName, Uri, Warning, WarningSink, parse,
    parse_with_config, parse_with_warnings,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn origin() -> SchemeHostPortTriple {
    SchemeHostPortTriple::new("https", "example.com", None)
}

fn uri(s: &str) -> Uri {
    Uri::parse(s).unwrap()
}

fn source_expression() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("'self'".to_string()),
        Just("'unsafe-inline'".to_string()),
        Just("'unsafe-eval'".to_string()),
        Just("'nonce-abc123=='".to_string()),
        Just("'sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU='".to_string()),
        "[a-z][a-z0-9+.-]{0,6}:",
        (
            prop::option::of(prop_oneof![Just("http://"), Just("https://"), Just("wss://")]),
            prop_oneof![Just("*."), Just("")],
            "[a-z][a-z0-9-]{0,8}(\\.[a-z]{2,4}){0,2}",
            prop::option::of(prop_oneof![
                Just(":*".to_string()),
                (1u16..=u16::MAX).prop_map(|p| format!(":{}", p)),
            ]),
            prop::option::of("(/[a-z0-9_~.-]{1,6}){1,3}/?"),
        )
            .prop_map(|(scheme, wildcard, host, port, path)| {
                format!(
                    "{}{}{}{}{}",
                    scheme.unwrap_or(""),
                    wildcard,
                    host,
                    port.unwrap_or_default(),
                    path.unwrap_or_default()
                )
            }),
    ]
}

fn source_list_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("default-src"),
        Just("script-src"),
        Just("style-src"),
        Just("img-src"),
        Just("connect-src"),
        Just("child-src"),
        Just("frame-src"),
        Just("form-action"),
        Just("base-uri"),
    ]
}

fn directive() -> impl Strategy<Value = String> {
    prop_oneof![
        (
            source_list_name(),
            prop::collection::vec(source_expression(), 0..5)
        )
            .prop_map(|(name, sources)| format!("{} {}", name, sources.join(" "))),
        source_list_name().prop_map(|name| format!("{} 'none'", name)),
        prop::collection::vec(prop_oneof![Just("allow-forms"), Just("allow-scripts"), Just("allow-popups")], 0..3)
            .prop_map(|tokens| format!("sandbox {}", tokens.join(" "))),
        prop::collection::vec(prop_oneof![Just("application/pdf"), Just("image/svg+xml")], 1..3)
            .prop_map(|types| format!("plugin-types {}", types.join(" "))),
        prop::collection::vec(prop_oneof![Just("/csp"), Just("https://reports.test/r"), Just("report?id=1")], 1..3)
            .prop_map(|uris| format!("report-uri {}", uris.join(" "))),
        prop_oneof![Just("'none'"), Just("https: *.example.com"), Just("https://parent.test:*")]
            .prop_map(|sources| format!("frame-ancestors {}", sources)),
    ]
}

fn policy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(directive(), 0..5).prop_map(|directives| directives.join("; "))
}

proptest! {
    #[test]
    fn test_serialization_round_trips(text in policy_text()) {
        let policy = parse(&text, &origin()).unwrap();
        let reparsed = parse(&policy.to_string(), &origin()).unwrap();
        prop_assert_eq!(policy, reparsed);
    }

    #[test]
    fn test_parse_never_panics(text in "\\PC*") {
        let _ = parse(&text, &origin());
    }

    #[test]
    fn test_parse_never_panics_on_policy_like_input(text in "[a-z' ;:*/.-]{0,64}") {
        let _ = parse(&text, &origin());
    }
}

#[cfg(test)]
mod parsing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_realistic_policy() {
        init_logging();
        let text = "default-src 'self'; script-src 'self' 'nonce-r4nd0m==' https://cdn.test; \
                    style-src 'self' 'unsafe-inline'; img-src * data:; \
                    frame-ancestors 'none'; report-uri /csp-violations";
        let policy = parse(text, &origin()).unwrap();
        assert_eq!(policy.directives().len(), 6);
        assert_eq!(
            policy.to_string(),
            "default-src 'self'; script-src 'self' 'nonce-r4nd0m==' https://cdn.test; \
             style-src 'self' 'unsafe-inline'; img-src * data:; \
             frame-ancestors 'none'; report-uri https://example.com/csp-violations"
        );
    }

    #[test]
    fn test_none_then_more_sources_is_rejected() {
        let err = parse("default-src 'none' 'self'", &origin()).unwrap_err();
        match err {
            CspError::Parse(err) => assert_eq!(
                err.message(),
                "expecting semicolon or end of policy but found 'self'"
            ),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_removed_directive_fails_regardless_of_sink() {
        assert!(parse("allow 'self'", &origin()).is_err());
        let mut warnings: Vec<Warning> = Vec::new();
        assert!(parse_with_warnings("allow 'self'", &origin(), &mut warnings).is_err());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_report_uri_eof_and_semicolon_differ() {
        let eof = parse("report-uri", &origin()).unwrap_err();
        let semi = parse("report-uri;", &origin()).unwrap_err();
        match (eof, semi) {
            (CspError::Parse(eof), CspError::Parse(semi)) => {
                assert_eq!(eof.kind(), ParseErrorKind::UnexpectedEof);
                assert_eq!(semi.kind(), ParseErrorKind::Syntax);
                assert_eq!(eof.message(), semi.message());
            }
            other => panic!("unexpected errors {:?}", other),
        }
    }

    #[test]
    fn test_hash_source_value() {
        let policy = parse(
            "script-src 'sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU='",
            &origin(),
        )
        .unwrap();
        assert!(policy.allows_inline_content(SourceListName::ScriptSrc, b""));
        assert!(!policy.allows_inline_content(SourceListName::ScriptSrc, b"alert(1)"));
    }

    #[test]
    fn test_unrecognised_hash_algorithm() {
        let err = parse("script-src 'sha999-AAAA'", &origin()).unwrap_err();
        assert!(err.to_string().contains("unrecognised hash algorithm"));
    }
}

#[cfg(test)]
mod warning_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mockall::mock! {
        Sink {}
        impl WarningSink for Sink {
            fn push(&mut self, warning: Warning);
        }
    }

    #[test]
    fn test_frame_src_warns_exactly_once() {
        let mut sink = MockSink::new();
        sink.expect_push().times(1).return_const(());
        parse_with_warnings("frame-src https://example.com", &origin(), &mut sink).unwrap();
    }

    #[test]
    fn test_no_warnings_for_current_syntax() {
        let mut sink = MockSink::new();
        sink.expect_push().times(0);
        parse_with_warnings(
            "child-src https://example.com; script-src 'self'",
            &origin(),
            &mut sink,
        )
        .unwrap();
    }

    #[test]
    fn test_short_hash_digest_warns() {
        let mut sink = MockSink::new();
        sink.expect_push()
            .withf(|warning| warning.message().contains("should be 32 bytes but is 16 bytes"))
            .times(1)
            .return_const(());
        parse_with_warnings(
            "script-src 'sha256-AAAAAAAAAAAAAAAAAAAAAA=='",
            &origin(),
            &mut sink,
        )
        .unwrap();
    }

    #[test]
    fn test_config_silences_deprecations() {
        let mut sink = MockSink::new();
        sink.expect_push().times(0);
        let config = ParserConfig {
            warn_deprecated: false,
            check_hash_length: true,
        };
        parse_with_config("frame-src 'unsafe-redirect'", &origin(), &mut sink, config).unwrap();
    }

    #[test]
    fn test_shared_sink_collects_from_threads() {
        let shared = SharedWarnings::new();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let mut sink = shared.clone();
                std::thread::spawn(move || {
                    parse_with_warnings("frame-src 'self'", &origin(), &mut sink).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.len(), 3);
    }
}

#[cfg(test)]
mod matching_tests {
    use super::*;

    fn policy(text: &str) -> Policy {
        parse(text, &origin()).unwrap()
    }

    #[test]
    fn test_wildcard_subdomain_matching() {
        let policy = policy("img-src *.example.com");
        assert!(policy.allows_uri(SourceListName::ImgSrc, &uri("https://a.example.com/x.png")));
        assert!(policy.allows_uri(SourceListName::ImgSrc, &uri("https://a.b.example.com/x.png")));
        assert!(!policy.allows_uri(SourceListName::ImgSrc, &uri("https://example.com/x.png")));
    }

    #[test]
    fn test_scheme_upgrade() {
        let http = policy("script-src http://example.com");
        assert!(http.allows_uri(SourceListName::ScriptSrc, &uri("https://example.com:443/a.js")));

        let https = policy("script-src https://example.com");
        assert!(!https.allows_uri(SourceListName::ScriptSrc, &uri("http://example.com/a.js")));
    }

    #[test]
    fn test_fallback_to_default_src() {
        let policy = policy("default-src 'self'; img-src *");
        assert!(policy.allows_uri(SourceListName::ImgSrc, &uri("https://any.test/i.png")));
        assert!(!policy.allows_uri(SourceListName::ScriptSrc, &uri("https://any.test/s.js")));
        assert!(policy.allows_uri(SourceListName::ScriptSrc, &uri("https://example.com/s.js")));
    }

    #[test]
    fn test_frame_src_prefers_child_src() {
        let policy = policy("default-src 'none'; child-src https://frames.test");
        assert!(policy.allows_uri(SourceListName::FrameSrc, &uri("https://frames.test/embed")));
        assert!(!policy.allows_uri(SourceListName::ImgSrc, &uri("https://frames.test/i.png")));
    }

    #[test]
    fn test_first_directive_wins() {
        let policy = policy("script-src https://a.test; script-src https://b.test");
        assert!(policy.allows_uri(SourceListName::ScriptSrc, &uri("https://a.test/s.js")));
        assert!(!policy.allows_uri(SourceListName::ScriptSrc, &uri("https://b.test/s.js")));
    }

    #[test]
    fn test_nonce_and_inline() {
        let policy = policy("script-src 'unsafe-inline' 'nonce-abc123=='");
        assert!(policy.allows_nonce(SourceListName::ScriptSrc, "abc123=="));
        assert!(!policy.allows_unsafe_inline(SourceListName::ScriptSrc));
        assert!(!policy.allows_unsafe_eval());
    }

    #[test]
    fn test_plugin_types() {
        let policy = policy("plugin-types application/pdf");
        assert!(policy.allows_plugin_type(&MediaType::parse("application/PDF").unwrap()));
        assert!(!policy.allows_plugin_type(&MediaType::parse("application/x-java-applet").unwrap()));
    }

    #[test]
    fn test_self_uses_policy_origin() {
        let policy = parse("default-src 'self'", &SchemeHostPortTriple::new("http", "localhost", Some(8080))).unwrap();
        assert!(policy.allows_uri(SourceListName::ConnectSrc, &uri("http://localhost:8080/api")));
        assert!(!policy.allows_uri(SourceListName::ConnectSrc, &uri("http://localhost/api")));
        assert!(matches!(
            policy.directives()[0].sources().and_then(|s| s.first()),
            Some(SourceExpression::Keyword(_))
        ));
    }
}
