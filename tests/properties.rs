use chrono::Utc;
use probe_report::models::RawResult;
use probe_report::narrative::{truncate_chars, Breakdown, HOST_WIDTH};
use probe_report::structured::StructuredReport;
use probe_report::{classify, Analysis, ReportModel, RunInfo};
use proptest::prelude::*;

fn raw_result() -> impl Strategy<Value = RawResult> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(prop::sample::select(vec!["IPv4", "IPv6", "v4"])),
        prop::option::of(prop::sample::select(vec!["h3", "h3-29", "none", "h2"])),
        prop::option::of(prop::sample::select(vec![
            "timeout",
            "connection refused",
            "DNS lookup failed",
            "TLS alert",
            "DNS timeout",
            "reset by peer",
        ])),
    )
        .prop_map(|(success, ip_version, protocol, error_msg)| RawResult {
            success,
            ip_version: ip_version.map(String::from),
            protocol: protocol.map(String::from),
            error_msg: error_msg.map(String::from),
            ..Default::default()
        })
}

fn run_info() -> RunInfo {
    RunInfo {
        generated_at: Utc::now(),
        source_file: "results.json".into(),
    }
}

proptest! {
    #[test]
    fn counts_are_conserved(results in prop::collection::vec(raw_result(), 0..40)) {
        let analysis = Analysis::from_results(&results, Utc::now());
        let stats = analysis.statistics;
        let undecided = results.iter().filter(|r| r.success.is_none()).count();

        prop_assert_eq!(stats.total, results.len());
        prop_assert_eq!(stats.failed, analysis.failures.len());
        prop_assert_eq!(stats.success + stats.failed + undecided, stats.total);
    }

    #[test]
    fn indices_match_source_positions(results in prop::collection::vec(raw_result(), 0..40)) {
        let analysis = Analysis::from_results(&results, Utc::now());
        prop_assert!(analysis.failures.windows(2).all(|w| w[0].index < w[1].index));
        for failure in &analysis.failures {
            prop_assert_eq!(results[failure.index - 1].success, Some(false));
        }
    }

    #[test]
    fn every_failure_has_one_category(results in prop::collection::vec(raw_result(), 0..40)) {
        let model = ReportModel::build(&results, run_info());
        prop_assert_eq!(model.categories.total(), model.statistics.failed);
        for failure in &model.failures {
            prop_assert!(model.categories.get(&classify(failure)) > 0);
        }
    }

    #[test]
    fn renderer_breakdowns_agree(results in prop::collection::vec(raw_result(), 0..40)) {
        let model = ReportModel::build(&results, run_info());
        let narrative = Breakdown::from_failures(&model.failures);
        let structured = StructuredReport::build(&model).unwrap();
        prop_assert_eq!(narrative.ipv4, structured.statistics.by_ip_version.ipv4);
        prop_assert_eq!(narrative.ipv6, structured.statistics.by_ip_version.ipv6);
        prop_assert_eq!(&narrative.by_protocol, &structured.statistics.by_protocol);
    }

    #[test]
    fn truncated_hosts_fit_the_column(host in "[a-z0-9.-]{0,64}") {
        let cell = truncate_chars(&host, HOST_WIDTH);
        prop_assert!(cell.chars().count() <= HOST_WIDTH);
        if host.chars().count() <= HOST_WIDTH {
            prop_assert_eq!(cell, host);
        } else {
            prop_assert!(cell.ends_with("..."));
        }
    }
}
