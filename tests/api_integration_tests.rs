// API Integration Tests
//
// Exercises every endpoint against a fixture dataset written to a temp file.
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sales_dashboard_rust::{create_router, AppState};
    use serde_json::Value;
    use std::fs;
    use std::path::PathBuf;
    use tower::ServiceExt; // for oneshot

    // Twelve executives across three regions; percentage columns as text.
    const FIXTURE: &str = "\
Emp Code,Sales Executive,Region,Total Sales,Target,Target Hit %,Away From Target %
E01,Asha,North,1200,2000,60.00%,40.00%
E02,Bram,North,2400,2000,120.00%,0.00%
E03,Cleo,North,800,2000,40.00%,60.00%
E04,Dara,North,3000,2000,150.00%,0.00%
E05,Emil,South,500,2000,25.00%,75.00%
E06,Fern,South,2000,2000,100.00%,0.00%
E07,Gita,South,1500,2000,75.00%,25.00%
E08,Hugo,South,700,2000,35.00%,65.00%
E09,Ines,East,2600,2000,130.00%,0.00%
E10,Joon,East,900,2000,45.00%,55.00%
E11,Kaja,East,1100,2000,55.00%,45.00%
E12,Lior,East,1800,2000,90.00%,10.00%
";

    // Helper: Write the fixture and build a test app
    fn create_test_app(name: &str) -> (axum::Router, PathBuf) {
        let path = std::env::temp_dir().join(format!("sales_dashboard_api_{}.csv", name));
        fs::write(&path, FIXTURE).expect("failed to write fixture");

        let state = AppState::new(path.to_str().expect("fixture path is not UTF-8"))
            .expect("failed to build app state");
        (create_router(state), path)
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    // =========================================================================
    // Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = create_test_app("health");

        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // KPIs
    // =========================================================================

    #[tokio::test]
    async fn test_kpis_all_regions() {
        let (app, _) = create_test_app("kpis_all");

        let response = get(app, "/api/kpis").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["total_sales"].as_f64().unwrap(), 18500.0);
        assert_eq!(body["total_salesmen"].as_u64().unwrap(), 12);
        // E02, E04, E06, E09 reach their targets.
        assert_eq!(body["target_achieved"].as_u64().unwrap(), 4);
        // Mean of the twelve hit ratios.
        let avg = body["avg_target_hit_pct"].as_f64().unwrap();
        assert!((avg - 0.7708333333).abs() < 1e-6, "unexpected mean {}", avg);
    }

    #[tokio::test]
    async fn test_kpis_region_filter_sums_only_selected_rows() {
        let (app, _) = create_test_app("kpis_filtered");

        let response = get(app, "/api/kpis?regions=North").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["total_sales"].as_f64().unwrap(), 7400.0);
        assert_eq!(body["total_salesmen"].as_u64().unwrap(), 4);
        assert_eq!(body["target_achieved"].as_u64().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_all_regions_sentinel_matches_unfiltered() {
        let (app, _) = create_test_app("sentinel");

        let unfiltered = json_response(get(app.clone(), "/api/kpis").await).await;
        let sentinel =
            json_response(get(app, "/api/kpis?regions=All%20Regions,North").await).await;

        assert_eq!(unfiltered, sentinel);
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    #[tokio::test]
    async fn test_ranking_top_and_bottom() {
        let (app, _) = create_test_app("ranking");

        let response = get(app, "/api/ranking").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        let top = body["top"].as_array().unwrap();
        let bottom = body["bottom"].as_array().unwrap();

        assert_eq!(top.len(), 5);
        assert_eq!(bottom.len(), 5);
        assert_eq!(top[0]["emp_code"], "E04"); // 3000
        assert_eq!(top[1]["emp_code"], "E09"); // 2600
        assert_eq!(bottom[4]["emp_code"], "E05"); // 500, smallest last

        // Twelve rows: the two ends are disjoint.
        for t in top {
            assert!(bottom.iter().all(|b| b["emp_code"] != t["emp_code"]));
        }
    }

    // =========================================================================
    // Regional Rollup
    // =========================================================================

    #[tokio::test]
    async fn test_rollup_groups_and_flags() {
        let (app, _) = create_test_app("rollup");

        let response = get(app, "/api/rollup").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        let groups = body.as_array().unwrap();
        assert_eq!(groups.len(), 3);

        // North mean = (0.6+1.2+0.4+1.5)/4 = 0.925, the highest; none >= 1.0.
        assert_eq!(groups[0]["region"], "North");
        let north_avg = groups[0]["avg_target_hit_pct"].as_f64().unwrap();
        assert!((north_avg - 0.925).abs() < 1e-9);
        assert_eq!(groups[0]["hit_target"], false);
        assert_eq!(groups[0]["total_sales"].as_f64().unwrap(), 7400.0);
    }

    // =========================================================================
    // Support List
    // =========================================================================

    #[tokio::test]
    async fn test_support_membership_and_order() {
        let (app, _) = create_test_app("support");

        let response = get(app, "/api/support?threshold=0.6").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        let rows = body.as_array().unwrap();

        // Strictly below 0.6: E05 (0.25), E08 (0.35), E03 (0.40), E10 (0.45),
        // E11 (0.55). E01 sits exactly at 0.6 and stays out.
        let codes: Vec<&str> = rows
            .iter()
            .map(|r| r["emp_code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["E05", "E08", "E03", "E10", "E11"]);

        for row in rows {
            assert!(row["target_hit_pct"].as_f64().unwrap() < 0.6);
        }
    }

    #[tokio::test]
    async fn test_support_threshold_out_of_range_is_bad_request() {
        let (app, _) = create_test_app("support_range");

        let response = get(app, "/api/support?threshold=1.5").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("threshold"));
    }

    // =========================================================================
    // Region Options
    // =========================================================================

    #[tokio::test]
    async fn test_region_options_sentinel_first_then_sorted() {
        let (app, _) = create_test_app("regions");

        let response = get(app, "/api/regions").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        let options: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(options, vec!["All Regions", "East", "North", "South"]);
    }

    // =========================================================================
    // Dashboard Snapshot
    // =========================================================================

    #[tokio::test]
    async fn test_dashboard_snapshot_is_consistent_with_views() {
        let (app, _) = create_test_app("dashboard");

        let snapshot =
            json_response(get(app.clone(), "/api/dashboard?regions=South&threshold=0.5").await)
                .await;
        let kpis = json_response(get(app.clone(), "/api/kpis?regions=South").await).await;
        let support =
            json_response(get(app, "/api/support?regions=South&threshold=0.5").await).await;

        assert_eq!(snapshot["kpis"], kpis);
        assert_eq!(snapshot["support"], support);
        assert!(snapshot["ranking"]["top"].is_array());
        assert!(snapshot["regions"].is_array());
    }

    // =========================================================================
    // Refresh and Caching
    // =========================================================================

    #[tokio::test]
    async fn test_refresh_reports_row_count() {
        let (app, _) = create_test_app("refresh");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "reloaded");
        assert_eq!(body["rows"].as_u64().unwrap(), 12);
    }

    #[tokio::test]
    async fn test_identical_queries_return_identical_bodies() {
        let (app, _) = create_test_app("caching");

        let first =
            json_response(get(app.clone(), "/api/dashboard?regions=North&threshold=0.6").await)
                .await;
        let second =
            json_response(get(app, "/api/dashboard?regions=North&threshold=0.6").await).await;

        assert_eq!(first, second);
    }
}
