use axum::Json;
use serde_json::{Value, json};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const API_TITLE: &str = "Chart Generation LLM API";
const API_DESCRIPTION: &str = "REST API that accepts JSON data, uses LLM to analyze and recommend \
appropriate charts, then generates and returns chart images";
const TAG: &str = "Chart Generator";

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorBody" } }
        }
    })
}

fn chart_request_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ChartRequest" } }
        }
    })
}

fn schemas() -> Value {
    json!({
        "ChartType": {
            "type": "string",
            "enum": ["BAR", "LINE", "PIE", "SCATTER"]
        },
        "ChartRequest": {
            "type": "object",
            "properties": {
                "chartType": {
                    "type": "string",
                    "description": "Preferred chart type, case-insensitive"
                },
                "title": { "type": "string" },
                "description": { "type": "string" },
                "data": {
                    "description": "Data to visualize: a mapping, a sequence or any nested JSON"
                },
                "labels": { "type": "array", "items": { "type": "string" } },
                "values": { "type": "array", "items": { "type": "number" } }
            }
        },
        "ChartAnalysis": {
            "type": "object",
            "required": [
                "chartType", "title", "xAxisLabel", "yAxisLabel", "categories", "series",
                "reasoning"
            ],
            "properties": {
                "chartType": { "$ref": "#/components/schemas/ChartType" },
                "title": { "type": "string" },
                "xAxisLabel": { "type": "string" },
                "yAxisLabel": { "type": "string" },
                "categories": { "type": "array", "items": { "type": "string" } },
                "series": {
                    "type": "object",
                    "additionalProperties": { "type": "array", "items": { "type": "number" } }
                },
                "reasoning": { "type": "string" }
            }
        },
        "ErrorBody": {
            "type": "object",
            "properties": { "error": { "type": "string" } }
        },
        "HealthStatus": {
            "type": "object",
            "properties": { "status": { "type": "string" } }
        }
    })
}

fn generate_path() -> Value {
    json!({
        "post": {
            "tags": [TAG],
            "summary": "Generate a chart image from JSON data",
            "description": "Accepts JSON data and uses LLM to analyze the data and generate an \
                appropriate chart image",
            "operationId": "generateChart",
            "requestBody": chart_request_body(),
            "responses": {
                "200": {
                    "description": "Chart image generated successfully",
                    "content": {
                        "image/png": { "schema": { "type": "string", "format": "binary" } }
                    }
                },
                "400": { "description": "Invalid input data" },
                "500": error_response("Internal server error")
            }
        }
    })
}

fn analyze_path() -> Value {
    json!({
        "post": {
            "tags": [TAG],
            "summary": "Analyze JSON data with LLM",
            "description": "Uses LLM to analyze the provided data and return chart \
                recommendations without generating the image",
            "operationId": "analyzeData",
            "requestBody": chart_request_body(),
            "responses": {
                "200": {
                    "description": "Analysis completed successfully",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/ChartAnalysis" }
                        }
                    }
                },
                "400": { "description": "Invalid input data" }
            }
        }
    })
}

fn health_path() -> Value {
    json!({
        "get": {
            "tags": [TAG],
            "summary": "Health check endpoint",
            "operationId": "health",
            "responses": {
                "200": {
                    "description": "Service is up",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/HealthStatus" }
                        }
                    }
                }
            }
        }
    })
}

/// OpenAPI 3 description of every endpoint the service exposes.
pub fn openapi_document() -> Value {
    let version = env!("CARGO_PKG_VERSION");

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": API_TITLE,
            "version": version,
            "description": API_DESCRIPTION,
            "contact": { "name": "API Support", "email": "support@example.com" }
        },
        "tags": [
            { "name": TAG, "description": "API for generating charts from JSON data using LLM" }
        ],
        "paths": {
            "/api/charts/generate": generate_path(),
            "/api/charts/analyze": analyze_path(),
            "/api/charts/health": health_path()
        },
        "components": { "schemas": schemas() }
    })
}

pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}
