#[cfg(test)]
pub mod tests {
    use crate::models::{ChartAnalysis, ChartType};
    use crate::pipeline::ChartPipeline;
    use crate::server::AppState;
    use crate::server::routes::app;
    use crate::utils::config::LlmSettings;
    use crate::utils::fallback::FALLBACK_REASONING;
    use crate::utils::graph::ChartRenderer;
    use crate::utils::llm::OpenAiGateway;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    const COMPLETIONS: &str = "/v1/chat/completions";

    fn router_with(api_url: &str, api_key: Option<&str>) -> Router {
        let settings = LlmSettings::new(Url::parse(api_url).unwrap(), api_key.map(str::to_string));
        let gateway = OpenAiGateway::new(settings).unwrap();
        app(AppState::new(ChartPipeline::new(
            Arc::new(gateway),
            ChartRenderer::default(),
        )))
    }

    fn unconfigured_router() -> Router {
        router_with("http://127.0.0.1:9/v1/chat/completions", None)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    fn model_reply(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    // Group 1: no credential configured
    mod unconfigured_tests {
        use super::*;

        #[tokio::test]
        async fn test_health() {
            let response = unconfigured_router()
                .oneshot(Request::builder().uri("/api/charts/health").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert_eq!(body, json!({ "status": "UP" }));
        }

        #[tokio::test]
        async fn test_generate_returns_png_via_fallback() {
            let response = unconfigured_router()
                .oneshot(post_json(
                    "/api/charts/generate",
                    json!({ "data": { "Q1": 5, "Q2": 15 }, "chartType": "line" }),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

            let img = image::load_from_memory(&body_bytes(response).await).unwrap();
            assert_eq!((img.width(), img.height()), (800, 600));
        }

        #[tokio::test]
        async fn test_analyze_returns_fallback_bar() {
            let response = unconfigured_router()
                .oneshot(post_json(
                    "/api/charts/analyze",
                    json!({ "data": { "Q1": 5, "Q2": 15 }, "chartType": "line" }),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let analysis: ChartAnalysis =
                serde_json::from_slice(&body_bytes(response).await).unwrap();

            assert_eq!(analysis.chart_type, ChartType::Bar);
            assert_eq!(analysis.categories, vec!["Q1", "Q2"]);
            assert_eq!(analysis.series["Series 1"], vec![5.0, 15.0]);
            assert_eq!(analysis.reasoning, FALLBACK_REASONING);
        }

        #[tokio::test]
        async fn test_empty_request_still_renders() {
            let response = unconfigured_router()
                .oneshot(post_json("/api/charts/generate", json!({})))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert!(!body_bytes(response).await.is_empty());
        }

        #[tokio::test]
        async fn test_malformed_body_is_rejected() {
            let request = Request::builder()
                .method("POST")
                .uri("/api/charts/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap();
            let response = unconfigured_router().oneshot(request).await.unwrap();

            assert!(response.status().is_client_error());
        }

        #[tokio::test]
        async fn test_openapi_document_lists_every_endpoint() {
            let response = unconfigured_router()
                .oneshot(
                    Request::builder()
                        .uri("/api-docs/openapi.json")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let doc: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

            assert_eq!(doc["info"]["title"], "Chart Generation LLM API");
            let generate = &doc["paths"]["/api/charts/generate"]["post"];
            assert!(generate["responses"]["200"]["content"]["image/png"].is_object());
            for status in ["400", "500"] {
                assert!(generate["responses"][status].is_object());
            }

            let analyze = &doc["paths"]["/api/charts/analyze"]["post"];
            assert_eq!(
                analyze["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
                "#/components/schemas/ChartAnalysis"
            );
            assert!(doc["paths"]["/api/charts/health"]["get"].is_object());
            assert!(doc["components"]["schemas"]["ChartRequest"]["properties"]["data"].is_object());
        }
    }

    // Group 2: model reachable through a mock endpoint
    mod model_tests {
        use super::*;

        #[tokio::test]
        async fn test_analyze_uses_model_answer() {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST).path(COMPLETIONS);
                    then.status(200).json_body(model_reply(
                        "```json\n{\"chartType\": \"pie\", \"title\": \"Share\", \"categories\": [\"A\", \"B\"], \"series\": {\"share\": [60, 40]}, \"reasoning\": \"Parts of a whole\"}\n```",
                    ));
                })
                .await;

            let response = router_with(&server.url(COMPLETIONS), Some("test-key"))
                .oneshot(post_json("/api/charts/analyze", json!({ "data": { "A": 60, "B": 40 } })))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let analysis: ChartAnalysis =
                serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert_eq!(analysis.chart_type, ChartType::Pie);
            assert_eq!(analysis.title, "Share");
            assert_eq!(analysis.reasoning, "Parts of a whole");
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn test_prose_answer_still_returns_image() {
            let server = MockServer::start_async().await;
            let _mock = server
                .mock_async(|when, then| {
                    when.method(POST).path(COMPLETIONS);
                    then.status(200).json_body(model_reply("I think bar charts are nice"));
                })
                .await;

            let router = router_with(&server.url(COMPLETIONS), Some("test-key"));
            let response = router
                .clone()
                .oneshot(post_json("/api/charts/generate", json!({ "data": { "x": 1, "y": 2 } })))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let img = image::load_from_memory(&body_bytes(response).await).unwrap();
            assert_eq!((img.width(), img.height()), (800, 600));

            let response = router
                .oneshot(post_json("/api/charts/analyze", json!({ "data": { "x": 1, "y": 2 } })))
                .await
                .unwrap();
            let analysis: ChartAnalysis =
                serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert!(analysis.is_fallback());
        }

        #[tokio::test]
        async fn test_upstream_failure_still_returns_image() {
            let server = MockServer::start_async().await;
            let _mock = server
                .mock_async(|when, then| {
                    when.method(POST).path(COMPLETIONS);
                    then.status(503);
                })
                .await;

            let response = router_with(&server.url(COMPLETIONS), Some("test-key"))
                .oneshot(post_json(
                    "/api/charts/generate",
                    json!({ "labels": ["a"], "values": [1] }),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        }
    }
}
