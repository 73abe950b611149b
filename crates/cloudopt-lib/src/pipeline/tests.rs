//! End-to-end tests for the optimize and aggregation drivers
//!
//! These feed CSV text through the table reader so the whole
//! row → resource → recommendation → report path is exercised.

use super::*;
use crate::config::Thresholds;
use crate::error::{CloudOptError, ExitStatus};
use crate::models::Action;
use crate::observability::RunLogger;
use crate::table::TableReader;
use rust_decimal::Decimal;
use tempfile::TempDir;

const MIXED_CSV: &str = "\
provider,region,resource_type,sku,cost_per_month,usage_percent
aws,eu-west-1,vm,t3.large,100,2
aws,eu-west-1,vm,m5.xlarge,200,20
azure,westeurope,vm,D4s_v5,50,80
gcp,europe-west4,vm,e2-standard-4,not-a-number,10
";

fn optimizer() -> Optimizer {
    Optimizer::new(Thresholds::default(), RunLogger::new("optimize", "test.csv"))
}

fn optimize(csv: &str) -> OptimizeReport {
    let reader = TableReader::from_bytes(csv.as_bytes()).unwrap();
    optimizer().run(reader).unwrap()
}

mod optimize_tests {
    use super::*;

    #[test]
    fn test_example_scenarios() {
        let report = optimize(MIXED_CSV);

        assert_eq!(report.findings, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.outcome(), RunOutcome::Success);

        let actions: Vec<_> = report.rows.iter().map(|r| r.get("action").unwrap()).collect();
        assert_eq!(actions, vec!["Stop", "Downsize", "Keep"]);

        let stop = &report.rows[0];
        assert_eq!(stop.get("rule_id"), Some("R001_STOP_IDLE"));
        assert_eq!(stop.get("optimized_cost"), Some("0.00"));
        assert_eq!(stop.get("savings"), Some("100.00"));
        assert_eq!(stop.get("reason"), Some("usage_percent < 5.0"));

        let downsize = &report.rows[1];
        assert_eq!(downsize.get("optimized_cost"), Some("100.00"));
        assert_eq!(downsize.get("savings"), Some("100.00"));

        let keep = &report.rows[2];
        assert_eq!(keep.get("rule_id"), Some("R000_KEEP"));
        assert_eq!(keep.get("optimized_cost"), Some("50.00"));
        assert_eq!(keep.get("savings"), Some("0.00"));
        assert_eq!(keep.get("reason"), Some("no rule matched"));

        assert_eq!(report.total_savings, Decimal::from(200));
    }

    #[test]
    fn test_unparseable_row_is_absent_from_output() {
        let report = optimize(MIXED_CSV);
        assert!(report.rows.iter().all(|r| r.get("provider") != Some("gcp")));
    }

    #[test]
    fn test_output_rows_keep_input_fields() {
        let report = optimize(MIXED_CSV);
        let input: Vec<_> = TableReader::from_bytes(MIXED_CSV.as_bytes())
            .unwrap()
            .collect::<crate::error::Result<_>>()
            .unwrap();

        for (out, input_row) in report.rows.iter().zip(input.iter()) {
            assert_eq!(out.len(), input_row.len() + 5);
            for key in input_row.keys() {
                assert_eq!(out.get(key), input_row.get(key));
            }
            let appended: Vec<_> = out.keys().skip(input_row.len()).collect();
            assert_eq!(appended, crate::models::Recommendation::COLUMNS.to_vec());
        }
    }

    #[test]
    fn test_total_savings_matches_row_differences() {
        let csv = "\
provider,cost_per_month,usage_percent
aws,10.01,10
aws,99.99,1
aws,33.33,29.9
aws,12,95
aws,10.005,90
aws,10.009,90
aws,99.995,1
";
        let report = optimize(csv);
        assert_eq!(report.findings, 7);

        let parse = |r: &crate::models::Row, key: &str| -> Decimal {
            r.get(key).unwrap().parse().unwrap()
        };
        for r in &report.rows {
            let cost = parse(r, "cost_per_month");
            let optimized = parse(r, "optimized_cost");
            let savings = parse(r, "savings");
            assert_eq!(
                savings,
                crate::models::round_currency(cost - optimized),
                "row {:?}",
                r
            );
            if r.get("action") == Some("Keep") {
                assert_eq!(optimized, cost);
                assert_eq!(savings, Decimal::ZERO);
            }
        }

        let keep_costs: Vec<_> = report
            .rows
            .iter()
            .filter(|r| r.get("action") == Some("Keep"))
            .map(|r| r.get("optimized_cost").unwrap())
            .collect();
        assert_eq!(keep_costs, vec!["12.00", "10.005", "10.009"]);

        let sub_cent_stop = &report.rows[6];
        assert_eq!(sub_cent_stop.get("optimized_cost"), Some("0.00"));
        assert_eq!(sub_cent_stop.get("savings"), Some("100.00"));

        let summed: Decimal = report.rows.iter().map(|r| parse(r, "savings")).sum();
        assert_eq!(report.total_savings, summed);
    }

    #[test]
    fn test_savings_overflow_is_bad_input() {
        let csv = "\
provider,cost_per_month,usage_percent
aws,79228162514264337593543950335,1
aws,79228162514264337593543950335,1
";
        let reader = TableReader::from_bytes(csv.as_bytes()).unwrap();
        let err = optimizer().run(reader).unwrap_err();
        match &err {
            CloudOptError::AmountOverflow { row, field } => {
                assert_eq!(*row, 2);
                assert_eq!(*field, "savings");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_status(), ExitStatus::BadInput);
    }

    #[test]
    fn test_existing_decision_columns_are_overwritten() {
        let csv = "provider,action,cost_per_month,usage_percent\naws,Keep,100,1\n";
        let report = optimize(csv);
        let keys: Vec<_> = report.rows[0].keys().collect();
        assert_eq!(
            keys,
            vec![
                "provider",
                "action",
                "cost_per_month",
                "usage_percent",
                "rule_id",
                "optimized_cost",
                "savings",
                "reason"
            ]
        );
        assert_eq!(report.rows[0].get("action"), Some("Stop"));
    }

    #[test]
    fn test_only_bad_rows_is_no_findings() {
        let csv = "provider,cost_per_month,usage_percent\naws,abc,1\n,10,1\naws,10\n";
        let report = optimize(csv);
        assert_eq!(report.outcome(), RunOutcome::NoFindings);
        assert_eq!(report.skipped, 3);
        assert_eq!(
            ExitStatus::from(report.outcome()),
            ExitStatus::NoFindings
        );
    }

    #[test]
    fn test_empty_input_is_no_findings() {
        assert_eq!(optimize("").outcome(), RunOutcome::NoFindings);
        assert_eq!(
            optimize("provider,cost_per_month,usage_percent\n").outcome(),
            RunOutcome::NoFindings
        );
    }

    #[test]
    fn test_action_breakdown() {
        let report = optimize(MIXED_CSV);
        let by_action: Vec<_> = report
            .by_action
            .iter()
            .map(|s| (s.action, s.count, s.savings))
            .collect();
        assert_eq!(
            by_action,
            vec![
                (Action::Stop, 1, Decimal::from(100)),
                (Action::Downsize, 1, Decimal::from(100)),
                (Action::Keep, 1, Decimal::ZERO),
            ]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds::new(Decimal::from(90), Decimal::from(25));
        let optimizer = Optimizer::new(thresholds, RunLogger::new("optimize", "test.csv"));
        let report = optimizer
            .run(TableReader::from_bytes(MIXED_CSV.as_bytes()).unwrap())
            .unwrap();
        let actions: Vec<_> = report.rows.iter().map(|r| r.get("action").unwrap()).collect();
        assert_eq!(actions, vec!["Stop", "Stop", "Downsize"]);
        assert_eq!(report.rows[2].get("reason"), Some("usage_percent < 90.0"));
    }

    #[test]
    fn test_identical_input_gives_identical_bytes() {
        let first = optimize(MIXED_CSV).to_csv_bytes().unwrap();
        let second = optimize(MIXED_CSV).to_csv_bytes().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_error_aborts_run() {
        let reader = TableReader::from_bytes(b"provider,cost_per_month,usage_percent\n\xFF,1,1\n")
            .unwrap();
        let err = optimizer().run(reader).unwrap_err();
        assert!(matches!(err, CloudOptError::Csv(_)));
        assert_eq!(err.exit_status(), ExitStatus::BadInput);
    }

    #[test]
    fn test_write_report_header_from_first_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.csv");

        let optimizer = optimizer();
        let report = optimizer
            .run(TableReader::from_bytes(MIXED_CSV.as_bytes()).unwrap())
            .unwrap();
        optimizer.write_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "provider,region,resource_type,sku,cost_per_month,usage_percent,rule_id,action,optimized_cost,savings,reason"
        );
        assert_eq!(
            lines[1],
            "aws,eu-west-1,vm,t3.large,100,2,R001_STOP_IDLE,Stop,0.00,100.00,usage_percent < 5.0"
        );
    }

    #[test]
    fn test_write_report_to_missing_directory_fails() {
        let report = optimize(MIXED_CSV);
        let err = optimizer()
            .write_report(&report, std::path::Path::new("/nonexistent/dir/report.csv"))
            .unwrap_err();
        assert_eq!(err.exit_status(), ExitStatus::Failure);
    }
}

mod aggregate_tests {
    use super::*;

    const COSTS_CSV: &str = "\
provider,region,cost_per_month
gcp,europe-west4,10.50
aws,eu-west-1,100
aws,us-east-1,25.25
";

    fn logger() -> RunLogger {
        RunLogger::new("stats", "costs.csv")
    }

    fn rows(csv: &str) -> TableReader<&[u8]> {
        TableReader::from_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_simulate_groups_by_provider() {
        let summary = simulate(rows(COSTS_CSV), RowPolicy::Skip, &logger()).unwrap();
        assert_eq!(summary.group_by, "provider");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_cost, Decimal::new(13575, 2));

        let groups: Vec<_> = summary.groups.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(
            groups,
            vec![("aws", Decimal::new(12525, 2)), ("gcp", Decimal::new(1050, 2))]
        );
    }

    #[test]
    fn test_stats_by_arbitrary_field() {
        let summary = stats(rows(COSTS_CSV), "region", RowPolicy::Skip, &logger()).unwrap();
        let keys: Vec<_> = summary.groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["eu-west-1", "europe-west4", "us-east-1"]);
    }

    #[test]
    fn test_skip_policy_ignores_rows_without_group_field() {
        let csv = "provider,team,cost_per_month\naws,core,10\naws\naws,data,x\n";
        let summary = stats(rows(csv), "team", RowPolicy::Skip, &logger()).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.total_cost, Decimal::from(10));
    }

    #[test]
    fn test_strict_policy_fails_on_missing_group_field() {
        let err = stats(rows(COSTS_CSV), "team", RowPolicy::Strict, &logger()).unwrap_err();
        match &err {
            CloudOptError::MissingField { row, field } => {
                assert_eq!(*row, 1);
                assert_eq!(field, "team");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_status(), ExitStatus::BadInput);
    }

    #[test]
    fn test_strict_policy_fails_on_non_numeric_cost() {
        let csv = "provider,cost_per_month\naws,1\ngcp,free\n";
        let err = simulate(rows(csv), RowPolicy::Strict, &logger()).unwrap_err();
        match err {
            CloudOptError::InvalidNumber { row, field, value } => {
                assert_eq!(row, 2);
                assert_eq!(field, "cost_per_month");
                assert_eq!(value, "free");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cost_overflow_is_bad_input() {
        let csv = "provider,cost_per_month\naws,79228162514264337593543950335\naws,1\n";
        let err = simulate(rows(csv), RowPolicy::Skip, &logger()).unwrap_err();
        assert!(matches!(
            err,
            CloudOptError::AmountOverflow {
                row: 2,
                field: "cost_per_month"
            }
        ));
        assert_eq!(err.exit_status(), ExitStatus::BadInput);
    }
}
