// Integration tests for the clustering service

use std::collections::{HashMap, HashSet};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde_json::{json, Value};
use tower::ServiceExt;

use embed_cluster::core::PipelineParams;
use embed_cluster::routes::{create_router, AppState};

fn app(params: PipelineParams) -> axum::Router {
	create_router(AppState::new(params))
}

fn seeded() -> PipelineParams {
	let mut params = PipelineParams::default();
	params.reduction.seed = Some(42);
	params
}

async fn post_cluster(router: axum::Router, body: String) -> (StatusCode, Value) {
	let request = Request::builder()
		.method("POST")
		.uri("/cluster")
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.expect("Failed to build request");

	let response = router.oneshot(request).await.expect("Request failed");
	let status = response.status();
	let bytes = response
		.into_body()
		.collect()
		.await
		.expect("Failed to read body")
		.to_bytes();
	let json: Value = serde_json::from_slice(&bytes).expect("Response is not JSON");
	(status, json)
}

fn ids(value: &Value) -> Vec<String> {
	value
		.as_array()
		.map(|items| {
			items
				.iter()
				.map(|v| v.as_str().unwrap_or_default().to_string())
				.collect()
		})
		.unwrap_or_default()
}

/// Two groups of five: members share a base axis plus one private axis.
/// Within a group cosine similarity is about 0.70, across groups it is 0.
fn two_groups() -> Vec<Value> {
	let mut items = Vec::new();
	for (group, base) in [(0usize, 0usize), (1, 6)] {
		for member in 0..5 {
			let mut vector = vec![0.0f32; 12];
			vector[base] = 1.0;
			vector[base + 1 + member] = 0.65;
			items.push(json!({
				"vector": vector,
				"filename": format!("g{}_{}.jpg", group, member),
			}));
		}
	}
	items
}

/// `per_group` noisy members around each of two orthogonal axes in 32 dimensions
fn noisy_groups(per_group: usize, seed: u64) -> Vec<Value> {
	let mut rng = StdRng::seed_from_u64(seed);
	let mut items = Vec::new();
	for group in 0..2 {
		for member in 0..per_group {
			let mut vector: Vec<f32> = (0..32).map(|_| rng.random_range(-0.25f32..0.25)).collect();
			vector[group] += 1.0;
			items.push(json!({
				"vector": vector,
				"filename": format!("g{}_{:02}.jpg", group, member),
			}));
		}
	}
	items
}

fn filenames(embeddings: &[Value]) -> Vec<String> {
	let mut names: Vec<String> = embeddings
		.iter()
		.map(|e| e["filename"].as_str().unwrap_or_default().to_string())
		.collect();
	names.sort();
	names
}

/// fileId -> cluster for every clustered file
fn assignments(json: &Value) -> HashMap<String, i64> {
	json["fileClusterMapping"]
		.as_array()
		.expect("mapping array")
		.iter()
		.map(|m| {
			(
				m["fileId"].as_str().unwrap_or_default().to_string(),
				m["cluster"].as_i64().expect("integer cluster"),
			)
		})
		.collect()
}

#[tokio::test]
async fn test_health() {
	let request = Request::builder()
		.uri("/health")
		.body(Body::empty())
		.expect("Failed to build request");
	let response = app(seeded()).oneshot(request).await.expect("Request failed");

	assert_eq!(response.status(), StatusCode::OK);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_identical_vectors_collapse() {
	let embeddings: Vec<Value> = (1..=6)
		.map(|i| json!({ "vector": [1.0, 0.0, 0.0], "filename": format!("f{}", i) }))
		.collect();
	let body = json!({ "embeddings": embeddings }).to_string();

	let (status, json) = post_cluster(app(seeded()), body).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["fileClusterMapping"], json!([]));
	assert_eq!(ids(&json["outliers"]), vec!["f1"]);
	assert_eq!(ids(&json["duplicates"]), vec!["f2", "f3", "f4", "f5", "f6"]);
}

#[tokio::test]
async fn test_two_groups_partition() {
	let embeddings = two_groups();
	let body = json!({ "embeddings": &embeddings }).to_string();

	let (status, json) = post_cluster(app(seeded()), body).await;
	assert_eq!(status, StatusCode::OK, "unexpected error: {}", json);

	assert_eq!(json["duplicates"], json!([]));
	assert_eq!(json["outliers"], json!([]));

	let clusters = assignments(&json);
	let mut clustered: Vec<String> = clusters.keys().cloned().collect();
	clustered.sort();
	assert_eq!(clustered, filenames(&embeddings));

	let group_label = |group: usize| -> HashSet<i64> {
		(0..5)
			.map(|member| clusters[&format!("g{}_{}.jpg", group, member)])
			.collect()
	};
	let first = group_label(0);
	let second = group_label(1);
	assert_eq!(first.len(), 1, "group 0 split: {}", json);
	assert_eq!(second.len(), 1, "group 1 split: {}", json);
	assert!(first.is_disjoint(&second), "groups share a cluster: {}", json);
	assert!(clusters.values().all(|&l| l >= 0));
}

#[tokio::test]
async fn test_noisy_groups_never_share_a_cluster() {
	let embeddings = noisy_groups(20, 7);
	let body = json!({ "embeddings": &embeddings }).to_string();

	let (status, json) = post_cluster(app(seeded()), body).await;
	assert_eq!(status, StatusCode::OK, "unexpected error: {}", json);

	let clusters = assignments(&json);
	let outliers = ids(&json["outliers"]);
	let duplicates = ids(&json["duplicates"]);

	let mut seen: Vec<String> = clusters
		.keys()
		.cloned()
		.chain(outliers)
		.chain(duplicates)
		.collect();
	seen.sort();
	assert_eq!(seen, filenames(&embeddings));

	let mut groups_by_cluster: HashMap<i64, HashSet<&str>> = HashMap::new();
	for (file, &cluster) in &clusters {
		assert!(cluster >= 0);
		groups_by_cluster.entry(cluster).or_default().insert(&file[..2]);
	}
	assert!(
		groups_by_cluster.values().all(|groups| groups.len() == 1),
		"a cluster mixes both groups: {}",
		json
	);
	for group in ["g0", "g1"] {
		assert!(
			groups_by_cluster.values().any(|groups| groups.contains(group)),
			"{} has no cluster: {}",
			group,
			json
		);
	}
}

#[tokio::test]
async fn test_without_dedup_omits_duplicates() {
	let params = PipelineParams {
		dedup: false,
		..seeded()
	};
	let body = json!({ "embeddings": [{ "vector": [1.0, 0.0] }, { "vector": [1.0, 0.0] }] }).to_string();

	let (status, json) = post_cluster(app(params), body).await;

	assert_eq!(status, StatusCode::OK);
	assert!(json.get("duplicates").is_none());
	assert_eq!(ids(&json["outliers"]), vec!["0", "1"]);
}

#[tokio::test]
async fn test_mismatched_dimensions_error() {
	let body = json!({
		"embeddings": [
			{ "vector": [1.0, 0.0, 0.0], "filename": "a" },
			{ "vector": [1.0, 0.0], "filename": "b" }
		]
	})
	.to_string();

	let (status, json) = post_cluster(app(seeded()), body).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	let error = json["error"].as_str().expect("error string");
	assert!(!error.is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_error() {
	for body in ["not json", r#"{"vectors": []}"#, r#"{"embeddings": [{"vector": ["x"]}]}"#] {
		let (status, json) = post_cluster(app(seeded()), body.to_string()).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {}", body);
		assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
	}
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
	let request = Request::builder()
		.uri("/health")
		.header(header::ORIGIN, "http://uploader.example")
		.body(Body::empty())
		.expect("Failed to build request");
	let response = app(seeded()).oneshot(request).await.expect("Request failed");

	assert_eq!(
		response
			.headers()
			.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.and_then(|v| v.to_str().ok()),
		Some("*")
	);
}
